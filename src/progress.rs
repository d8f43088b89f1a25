// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/veilcore

//! Global progress tracking and cooperative cancellation.
//!
//! Uses atomics so callers may poll or cancel from another thread while an
//! embed or extract runs. The multi-frame orchestrator advances one step per
//! frame; the coefficient engine advances one step per component. Single-frame
//! operations are fast enough that they never report.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::error::StegoError;

static STEP: AtomicU32 = AtomicU32::new(0);
static TOTAL: AtomicU32 = AtomicU32::new(0);
static CANCELLED: AtomicBool = AtomicBool::new(false);

/// Reset progress to 0 and set the total step count.
/// Also clears the cancellation flag so a fresh operation starts clean.
pub fn init(total: u32) {
    CANCELLED.store(false, Ordering::Relaxed);
    STEP.store(0, Ordering::Relaxed);
    TOTAL.store(total, Ordering::Relaxed);
}

/// Advance progress by one step, capped at the configured total.
pub fn advance() {
    let total = TOTAL.load(Ordering::Relaxed);
    let _ = STEP.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |step| {
        if total == 0 || step < total {
            Some(step + 1)
        } else {
            None
        }
    });
}

/// Snap progress to the configured total.
pub fn finish() {
    let total = TOTAL.load(Ordering::Relaxed);
    STEP.store(total, Ordering::Relaxed);
}

/// Current (step, total). Total 0 means indeterminate.
pub fn current() -> (u32, u32) {
    (STEP.load(Ordering::Relaxed), TOTAL.load(Ordering::Relaxed))
}

/// Request cancellation of the current operation.
///
/// The frame and coefficient loops check this flag at natural boundaries and
/// return `Err(StegoError::Cancelled)` when set.
pub fn cancel() {
    CANCELLED.store(true, Ordering::Relaxed);
}

/// Returns `true` if cancellation has been requested.
pub fn is_cancelled() -> bool {
    CANCELLED.load(Ordering::Relaxed)
}

/// Check for cancellation and return an error if requested.
pub fn check_cancelled() -> Result<(), StegoError> {
    if is_cancelled() {
        Err(StegoError::Cancelled)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_caps_at_total() {
        init(2);
        advance();
        advance();
        advance();
        assert_eq!(current(), (2, 2));
    }

    // Cancellation itself is not poked here: the flag is process-global and
    // the engine tests in this binary poll it. Flipping it mid-run would race
    // them.
    #[test]
    fn fresh_init_is_not_cancelled() {
        init(1);
        assert!(check_cancelled().is_ok());
        assert!(!is_cancelled());
    }
}
