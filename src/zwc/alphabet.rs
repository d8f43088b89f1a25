// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/veilcore

//! The zero-width alphabet and text-level helpers.
//!
//! Six zero-width code points form an ordered alphabet; the index of a
//! character is its base-6 digit value. The START and END sentinels are
//! three-character sequences over the first two alphabet characters.

/// U+200B ZERO WIDTH SPACE.
pub const ZWSP: char = '\u{200B}';
/// U+200C ZERO WIDTH NON-JOINER.
pub const ZWNJ: char = '\u{200C}';
/// U+200D ZERO WIDTH JOINER.
pub const ZWJ: char = '\u{200D}';
/// U+FEFF ZERO WIDTH NO-BREAK SPACE (byte order mark).
pub const BOM: char = '\u{FEFF}';
/// U+2060 WORD JOINER.
pub const WJ: char = '\u{2060}';
/// U+2061 FUNCTION APPLICATION.
pub const FUN: char = '\u{2061}';

/// The ordered base-6 alphabet: index = digit value.
pub const ALPHABET: [char; 6] = [ZWSP, ZWNJ, ZWJ, BOM, WJ, FUN];

/// Sentinel opening the embedded region.
pub const START: &str = "\u{200B}\u{200C}\u{200B}";
/// Sentinel closing the embedded region.
pub const END: &str = "\u{200C}\u{200B}\u{200C}";

/// Base-6 digit value of a zero-width character.
pub fn digit_of(c: char) -> Option<u8> {
    ALPHABET.iter().position(|&a| a == c).map(|i| i as u8)
}

/// Is this one of the six alphabet code points?
pub fn is_zwc(c: char) -> bool {
    ALPHABET.contains(&c)
}

/// Symbolic name of a zero-width character, for debugging output.
pub fn name_of(c: char) -> Option<&'static str> {
    match c {
        ZWSP => Some("ZWSP"),
        ZWNJ => Some("ZWNJ"),
        ZWJ => Some("ZWJ"),
        BOM => Some("BOM"),
        WJ => Some("WJ"),
        FUN => Some("FUN"),
        _ => None,
    }
}

/// Remove every alphabet code point, sentinels included.
pub fn strip_zwc(text: &str) -> String {
    text.chars().filter(|&c| !is_zwc(c)).collect()
}

/// Annotate zero-width characters with their symbolic names.
///
/// Sentinel sequences become `[START]` / `[END]`; lone zero-width characters
/// become `[ZWSP]`, `[ZWNJ]`, and so on. Visible text passes through.
pub fn visualize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while !rest.is_empty() {
        if rest.starts_with(START) {
            out.push_str("[START]");
            rest = &rest[START.len()..];
            continue;
        }
        if rest.starts_with(END) {
            out.push_str("[END]");
            rest = &rest[END.len()..];
            continue;
        }
        let c = rest.chars().next().expect("non-empty remainder");
        match name_of(c) {
            Some(name) => {
                out.push('[');
                out.push_str(name);
                out.push(']');
            }
            None => out.push(c),
        }
        rest = &rest[c.len_utf8()..];
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alphabet_is_a_bijection() {
        for (i, &c) in ALPHABET.iter().enumerate() {
            assert_eq!(digit_of(c), Some(i as u8));
        }
        assert_eq!(digit_of('a'), None);
    }

    #[test]
    fn sentinels_use_first_two_characters() {
        assert_eq!(START.chars().collect::<Vec<_>>(), vec![ZWSP, ZWNJ, ZWSP]);
        assert_eq!(END.chars().collect::<Vec<_>>(), vec![ZWNJ, ZWSP, ZWNJ]);
    }

    #[test]
    fn strip_removes_all_zwc() {
        let mixed = format!("vis{}ib{}le{}", ZWSP, BOM, FUN);
        assert_eq!(strip_zwc(&mixed), "visible");
        assert_eq!(strip_zwc("plain"), "plain");
    }

    #[test]
    fn visualize_names_characters() {
        let text = format!("a{}b{}", ZWJ, WJ);
        assert_eq!(visualize(&text), "a[ZWJ]b[WJ]");
    }

    #[test]
    fn visualize_marks_sentinels() {
        let text = format!("cover{}{}{}tail", START, FUN, END);
        assert_eq!(visualize(&text), "cover[START][FUN][END]tail");
    }
}
