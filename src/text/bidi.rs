use unicode_bidi::{BidiClass, bidi_class};

/// Whether the first strongly-directional character of `text` is right-to-left (R or AL).
///
/// Text with no strong character (digits, punctuation, whitespace) is not RTL.
pub fn is_rtl(text: &str) -> bool {
    for ch in text.chars() {
        match bidi_class(ch) {
            BidiClass::L => return false,
            BidiClass::R | BidiClass::AL => return true,
            _ => {}
        }
    }
    false
}

/// Reverse a line character by character.
///
/// This is whole-line visual reordering only; embedded LTR runs are reversed as well.
pub fn reverse_chars(text: &str) -> String {
    text.chars().rev().collect()
}

/// The string to hand to the shaper for one line: reversed when it reads right-to-left.
pub fn visual_line(line: &str) -> std::borrow::Cow<'_, str> {
    if is_rtl(line) {
        std::borrow::Cow::Owned(reverse_chars(line))
    } else {
        std::borrow::Cow::Borrowed(line)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/bidi.rs"]
mod tests;
