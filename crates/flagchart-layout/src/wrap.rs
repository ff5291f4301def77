//! Greedy word wrapping for flag labels

/// Marker joining wrapped lines, understood by the rendering backend
pub const LINE_BREAK: &str = "<br>";

/// Default maximum line length, in characters
pub const DEFAULT_LINE_LENGTH: usize = 13;

/// Wrap `text` at the default line length
pub fn wrap(text: &str) -> String {
    wrap_with(text, DEFAULT_LINE_LENGTH)
}

/// Wrap `text` so that lines stay within `max_line_length` where possible
///
/// Words are appended to the current line, each with a leading space, while
/// the line length so far plus the word length fits. A word that would
/// overflow starts a new line. Words are never split, so a word longer than
/// the limit sits alone on its own line. Empty lines are dropped, so such a
/// word never comes out as `"<br>Word"` the way older chart exports had it.
pub fn wrap_with(text: &str, max_line_length: usize) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.chars().count() + word.chars().count() <= max_line_length {
            current.push(' ');
            current.push_str(word);
        } else {
            flush(&mut lines, &current);
            current = word.to_string();
        }
    }
    flush(&mut lines, &current);

    lines.join(LINE_BREAK)
}

fn flush(lines: &mut Vec<String>, line: &str) {
    let line = line.trim();
    if !line.is_empty() {
        lines.push(line.to_string());
    }
}
