//! Wire-format text escaping
//!
//! Free text inserted into a message must not collide with the five
//! delimiter characters of the wire format. Each delimiter is replaced by
//! its escape sequence; CR/LF runs are collapsed to a single space because
//! a raw carriage return would terminate the segment.
//!
//! Ordering constraint: the backslash must be escaped before any of the
//! other replacements, since every escape sequence introduces backslashes
//! of its own.

/// Escapes free text for insertion into a message field
///
/// - CR/LF runs collapse to a single space
/// - `\` becomes `\E\`
/// - `|` becomes `\F\`
/// - `^` becomes `\S\`
/// - `~` becomes `\R\`
/// - `&` becomes `\T\`
///
/// # Examples
///
/// ```
/// use hiebridge::core::convert::escape::escape_text;
///
/// assert_eq!(escape_text("A|B^C~D&E\\F"), "A\\F\\B\\S\\C\\R\\D\\T\\E\\E\\F");
/// ```
pub fn escape_text(input: &str) -> String {
    let mut collapsed = String::with_capacity(input.len());
    let mut in_line_break = false;
    for ch in input.chars() {
        if ch == '\r' || ch == '\n' {
            if !in_line_break {
                collapsed.push(' ');
                in_line_break = true;
            }
        } else {
            collapsed.push(ch);
            in_line_break = false;
        }
    }

    collapsed
        .replace('\\', "\\E\\")
        .replace('|', "\\F\\")
        .replace('^', "\\S\\")
        .replace('~', "\\R\\")
        .replace('&', "\\T\\")
}

/// Strips everything but ASCII digits
pub fn digits_only(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Reduces a timestamp-ish value to at most 14 digits (YYYYMMDDHHMMSS)
pub fn extract_timestamp(input: &str) -> String {
    let mut digits = digits_only(input);
    digits.truncate(14);
    digits
}
