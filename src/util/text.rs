use std::borrow::Cow;

use chrono::DateTime;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: &str = "...";
const ELLIPSIS_WIDTH: usize = 3;

/// Display format for normalized publish dates.
const PUBLISHED_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Terminal columns occupied by `s`.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Byte index of the longest prefix of `s` that fits in `max_width` columns.
fn fit_prefix(s: &str, max_width: usize) -> usize {
    let mut width = 0;
    for (idx, c) in s.char_indices() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if width + w > max_width {
            return idx;
        }
        width += w;
    }
    s.len()
}

/// Truncate `s` to `max_width` columns, appending "..." when cut.
///
/// Widths of 3 or less have no room for an ellipsis and just cut.
///
/// ```
/// use newsdash::util::truncate_to_width;
///
/// assert_eq!(truncate_to_width("Short", 10), "Short");
/// assert_eq!(truncate_to_width("Hello World", 8), "Hello...");
/// assert_eq!(truncate_to_width("Test", 2), "Te");
/// ```
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if display_width(s) <= max_width {
        return Cow::Borrowed(s);
    }
    if max_width <= ELLIPSIS_WIDTH {
        return Cow::Borrowed(&s[..fit_prefix(s, max_width)]);
    }
    let cut = fit_prefix(s, max_width - ELLIPSIS_WIDTH);
    Cow::Owned(format!("{}{}", &s[..cut], ELLIPSIS))
}

/// Greedy word wrap into at most `max_lines` lines of `width` columns.
///
/// Words wider than a line are hard-split. If text remains after the last
/// permitted line, that line is truncated with an ellipsis.
pub fn wrap_to_width(s: &str, width: usize, max_lines: usize) -> Vec<String> {
    if width == 0 || max_lines == 0 {
        return Vec::new();
    }

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut overflow = false;

    for word in s.split_whitespace() {
        let mut word = word;
        loop {
            let sep = usize::from(!current.is_empty());
            if display_width(&current) + sep + display_width(word) <= width {
                if sep == 1 {
                    current.push(' ');
                }
                current.push_str(word);
                break;
            }
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                if lines.len() == max_lines {
                    overflow = true;
                    break;
                }
                continue;
            }
            // A single word wider than the line
            let cut = fit_prefix(word, width).max(word.chars().next().map_or(0, char::len_utf8));
            lines.push(word[..cut].to_string());
            word = &word[cut..];
            if lines.len() == max_lines {
                overflow = !word.is_empty();
                break;
            }
            if word.is_empty() {
                break;
            }
        }
        if overflow {
            break;
        }
    }

    if !overflow && !current.is_empty() {
        if lines.len() < max_lines {
            lines.push(current);
        } else {
            overflow = true;
        }
    }

    if overflow {
        if let Some(last) = lines.last_mut() {
            let room = width.saturating_sub(ELLIPSIS_WIDTH);
            let cut = fit_prefix(last, room);
            last.truncate(cut);
            last.push_str(ELLIPSIS);
        }
    }

    lines
}

/// Normalize a publish date for display.
///
/// RFC 2822 (`Tue, 05 Mar 2024 14:30:00 GMT`) and RFC 3339 timestamps are
/// rendered as `YYYY-MM-DD HH:MM`; anything else, including the backend's
/// own already-formatted dates, is returned trimmed and otherwise verbatim.
pub fn format_published(raw: &str) -> String {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return dt.format(PUBLISHED_FORMAT).to_string();
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format(PUBLISHED_FORMAT).to_string();
    }
    strip_control_chars(raw).into_owned()
}

fn is_stripped(b: u8) -> bool {
    b == 0x1b || b == 0x7f || (b < 0x20 && b != b'\t' && b != b'\n' && b != b'\r')
}

/// Remove ANSI escape sequences and C0 control characters.
///
/// Server-provided text ends up in the terminal verbatim, so CSI
/// (`ESC [ ... final`) and OSC (`ESC ] ... BEL|ST`) sequences are dropped
/// whole. Tab, newline and carriage return are kept. Clean input is
/// returned borrowed.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    let bytes = s.as_bytes();
    if !bytes.iter().any(|&b| is_stripped(b)) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            0x1b => match bytes.get(i + 1) {
                Some(b'[') => {
                    i += 2;
                    while i < bytes.len() {
                        let c = bytes[i];
                        i += 1;
                        if (0x40..=0x7e).contains(&c) {
                            break;
                        }
                    }
                }
                Some(b']') => {
                    i += 2;
                    while i < bytes.len() {
                        if bytes[i] == 0x07 {
                            i += 1;
                            break;
                        }
                        if bytes[i] == 0x1b && bytes.get(i + 1) == Some(&b'\\') {
                            i += 2;
                            break;
                        }
                        i += 1;
                    }
                }
                _ => i += 1,
            },
            b if is_stripped(b) => i += 1,
            _ => {
                let start = i;
                while i < bytes.len() && !is_stripped(bytes[i]) {
                    i += 1;
                }
                // Only ASCII bytes stop the run, so this is a char boundary
                out.push_str(&s[start..i]);
            }
        }
    }

    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_truncate_ascii() {
        assert_eq!(truncate_to_width("Hello World", 8), "Hello...");
        assert_eq!(truncate_to_width("12345", 5), "12345");
        assert_eq!(truncate_to_width("Testing", 4), "T...");
    }

    #[test]
    fn test_truncate_narrow_widths() {
        assert_eq!(truncate_to_width("Test", 0), "");
        assert_eq!(truncate_to_width("Test", 3), "Tes");
        assert_eq!(truncate_to_width("日本", 1), "");
        assert_eq!(truncate_to_width("日本", 3), "日");
    }

    #[test]
    fn test_truncate_wide_chars() {
        // 8 columns, target 4 → two CJK chars
        assert_eq!(truncate_to_width("日本語版", 7), "日本...");
    }

    #[test]
    fn test_wrap_basic() {
        let lines = wrap_to_width("the quick brown fox jumps", 10, 5);
        assert_eq!(lines, vec!["the quick", "brown fox", "jumps"]);
    }

    #[test]
    fn test_wrap_truncates_overflow() {
        let lines = wrap_to_width("one two three four five six", 9, 2);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "one two");
        assert!(lines[1].ends_with("..."));
        assert!(display_width(&lines[1]) <= 9);
    }

    #[test]
    fn test_wrap_splits_long_word() {
        let lines = wrap_to_width("abcdefghij", 4, 5);
        assert_eq!(lines, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_wrap_empty_and_zero() {
        assert!(wrap_to_width("", 10, 2).is_empty());
        assert!(wrap_to_width("text", 0, 2).is_empty());
        assert!(wrap_to_width("text", 10, 0).is_empty());
    }

    #[test]
    fn test_format_published_rfc2822() {
        assert_eq!(
            format_published("Tue, 05 Mar 2024 14:30:00 GMT"),
            "2024-03-05 14:30"
        );
        assert_eq!(
            format_published("Tue, 05 Mar 2024 14:30:00 +0100"),
            "2024-03-05 14:30"
        );
    }

    #[test]
    fn test_format_published_passthrough() {
        assert_eq!(format_published("2024-03-05 14:30"), "2024-03-05 14:30");
        assert_eq!(format_published("  yesterday "), "yesterday");
        assert_eq!(format_published(""), "");
    }

    #[test]
    fn test_strip_clean_is_borrowed() {
        let input = "clean\ttext\nhere";
        assert!(matches!(strip_control_chars(input), Cow::Borrowed(_)));
    }

    #[test]
    fn test_strip_sequences() {
        assert_eq!(strip_control_chars("\x1b[31mRed\x1b[0m"), "Red");
        assert_eq!(strip_control_chars("\x1b]0;title\x07safe"), "safe");
        assert_eq!(strip_control_chars("\x1b]0;title\x1b\\safe"), "safe");
        assert_eq!(strip_control_chars("a\x1bb\x00c\x7f"), "abc");
        assert_eq!(strip_control_chars("日本\x1b[1m語"), "日本語");
    }
}
