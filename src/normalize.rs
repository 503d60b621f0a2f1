/// Splits markdown into lines, accepting LF and CRLF endings.
///
/// Only a `\r` directly before `\n` is a line ending. Any other byte,
/// including a lone `\r`, is kept so fenced code survives byte for byte.
pub fn lines(text: &str) -> Vec<&str> {
    if text.is_empty() {
        return Vec::new();
    }
    text.split('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .collect()
}
