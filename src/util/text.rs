use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Display width of `s` in terminal columns (CJK and emoji count as 2).
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

const ELLIPSIS: &str = "...";
const ELLIPSIS_WIDTH: usize = 3;

/// Truncate `s` to at most `max_width` columns, appending "..." when cut.
///
/// Widths of 3 or fewer columns have no room for an ellipsis, so as many
/// whole characters as fit are returned instead. Returns `Cow::Borrowed`
/// when `s` already fits.
///
/// ```
/// use appshelf::util::truncate_to_width;
///
/// assert_eq!(truncate_to_width("Short", 10), "Short");
/// assert_eq!(truncate_to_width("Hello World", 8), "Hello...");
/// assert_eq!(truncate_to_width("你好世界", 7), "你好...");
/// assert_eq!(truncate_to_width("Test", 2), "Te");
/// ```
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if max_width == 0 {
        return Cow::Borrowed("");
    }

    if max_width <= ELLIPSIS_WIDTH {
        let end = prefix_end(s, max_width);
        return if end == s.len() {
            Cow::Borrowed(s)
        } else {
            Cow::Owned(s[..end].to_string())
        };
    }

    if display_width(s) <= max_width {
        return Cow::Borrowed(s);
    }

    let cut = prefix_end(s, max_width - ELLIPSIS_WIDTH);
    Cow::Owned(format!("{}{}", &s[..cut], ELLIPSIS))
}

/// Byte index just past the longest prefix of `s` that fits in `width` columns.
fn prefix_end(s: &str, width: usize) -> usize {
    let mut used = 0;
    for (idx, c) in s.char_indices() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > width {
            return idx;
        }
        used += w;
    }
    s.len()
}

fn is_stripped_control(c: char) -> bool {
    matches!(
        c,
        '\u{00}'..='\u{08}' | '\u{0b}' | '\u{0c}' | '\u{0e}'..='\u{1f}' | '\u{7f}'..='\u{9f}'
    )
}

/// Remove terminal control characters and ANSI escape sequences.
///
/// CSI (`ESC [` or U+009B ... final byte) and OSC (`ESC ]` or U+009D ...
/// BEL, `ESC \` or U+009C) sequences are dropped whole, a bare ESC is
/// dropped alone. C1 controls are dropped like C0 controls. Tab, newline
/// and carriage return are kept. Clean input is returned borrowed.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    if !s.chars().any(|c| c == '\u{1b}' || is_stripped_control(c)) {
        return Cow::Borrowed(s);
    }

    enum State {
        Text,
        Escape,
        Csi,
        Osc,
        OscEscape,
    }

    let mut out = String::with_capacity(s.len());
    let mut state = State::Text;

    for c in s.chars() {
        state = match state {
            State::Text if c == '\u{1b}' => State::Escape,
            State::Text if c == '\u{9b}' => State::Csi,
            State::Text if c == '\u{9d}' => State::Osc,
            State::Text => {
                if !is_stripped_control(c) {
                    out.push(c);
                }
                State::Text
            }
            State::Escape => match c {
                '[' => State::Csi,
                ']' => State::Osc,
                '\u{1b}' => State::Escape,
                _ => {
                    if !is_stripped_control(c) {
                        out.push(c);
                    }
                    State::Text
                }
            },
            State::Csi if ('\u{40}'..='\u{7e}').contains(&c) => State::Text,
            State::Csi => State::Csi,
            State::Osc if c == '\u{07}' || c == '\u{9c}' => State::Text,
            State::Osc if c == '\u{1b}' => State::OscEscape,
            State::Osc => State::Osc,
            State::OscEscape if c == '\\' => State::Text,
            State::OscEscape => State::Osc,
        };
    }

    Cow::Owned(out)
}

/// Flatten text for a single-line cell: strip controls, then turn any
/// remaining line breaks and tabs into spaces.
pub fn sanitize_inline(s: &str) -> Cow<'_, str> {
    let stripped = strip_control_chars(s);
    if !stripped.contains(['\n', '\r', '\t']) {
        return stripped;
    }
    Cow::Owned(
        stripped
            .chars()
            .map(|c| if matches!(c, '\n' | '\r' | '\t') { ' ' } else { c })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_width() {
        assert_eq!(display_width("Hello"), 5);
        assert_eq!(display_width("你好"), 4);
        assert_eq!(display_width("Hi 🎉"), 5);
    }

    #[test]
    fn test_ascii_truncation() {
        assert_eq!(truncate_to_width("Hello World", 8), "Hello...");
        assert_eq!(truncate_to_width("Short", 10), "Short");
        assert_eq!(truncate_to_width("12345", 5), "12345");
    }

    #[test]
    fn test_cjk_truncation() {
        assert_eq!(truncate_to_width("你好世界", 7), "你好...");
        assert_eq!(truncate_to_width("你好", 10), "你好");
        assert_eq!(truncate_to_width("你好世界", 5), "你...");
    }

    #[test]
    fn test_emoji_truncation() {
        // "Hello 🎉 World" is 14 columns
        assert_eq!(truncate_to_width("Hello 🎉 World", 11), "Hello 🎉...");
    }

    #[test]
    fn test_narrow_widths() {
        assert_eq!(truncate_to_width("Test", 0), "");
        assert_eq!(truncate_to_width("Test", 1), "T");
        assert_eq!(truncate_to_width("你好", 1), "");
        assert_eq!(truncate_to_width("你好", 3), "你");
        assert_eq!(truncate_to_width("Testing", 4), "T...");
    }

    #[test]
    fn test_borrowed_when_fits() {
        assert!(matches!(truncate_to_width("fits", 10), Cow::Borrowed(_)));
    }

    #[test]
    fn test_strip_clean_text_returns_borrowed() {
        let input = "Alpha Games Ltd.\tline\nnext";
        let result = strip_control_chars(input);
        assert!(matches!(result, Cow::Borrowed(_)));
        assert_eq!(result, input);
    }

    #[test]
    fn test_strip_c0_and_del() {
        assert_eq!(strip_control_chars("he\x00ll\x07o\x08 w\x7forld"), "hello world");
    }

    #[test]
    fn test_strip_ansi_sequences() {
        assert_eq!(strip_control_chars("\x1b[31mRed\x1b[0m"), "Red");
        assert_eq!(strip_control_chars("up\x1b[2Adown"), "updown");
        assert_eq!(strip_control_chars("\x1b]0;title\x07safe"), "safe");
        assert_eq!(strip_control_chars("\x1b]0;title\x1b\\safe"), "safe");
        assert_eq!(strip_control_chars("a\x1bb"), "ab");
    }

    #[test]
    fn test_strip_c1_controls_and_sequences() {
        assert_eq!(strip_control_chars("Evil\u{9b}2JName"), "EvilName");
        assert_eq!(strip_control_chars("a\u{9d}0;title\u{07}b"), "ab");
        assert_eq!(strip_control_chars("a\u{9d}0;title\u{9c}b"), "ab");
        assert_eq!(strip_control_chars("x\u{85}y\u{80}z"), "xyz");
        // Latin-1 letters right after the C1 block survive
        assert_eq!(strip_control_chars("caf\u{e9}\u{a0}"), "caf\u{e9}\u{a0}");
    }

    #[test]
    fn test_strip_unicode_preserved() {
        assert_eq!(
            strip_control_chars("日本語 \x1b[31m赤い\x1b[0m テキスト"),
            "日本語 赤い テキスト"
        );
    }

    #[test]
    fn test_markup_is_left_as_text() {
        let input = "<img src=x onerror=alert(1)>";
        assert_eq!(sanitize_inline(input), input);
    }

    #[test]
    fn test_sanitize_inline_flattens_breaks() {
        assert_eq!(sanitize_inline("two\nlines\there"), "two lines here");
        assert!(matches!(sanitize_inline("plain"), Cow::Borrowed(_)));
    }
}
