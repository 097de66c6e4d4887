/// Splits text into lines on `\n`, `\r\n` or a lone `\r`.
///
/// Terminators are not included in the yielded lines. A terminator at the very end of the text does not produce an
/// extra, empty line; but a blank line anywhere else does.
pub(crate) fn split_lines(text: &str) -> Lines<'_> {
    Lines { remaining: text }
}

/// Drops a UTF-8 byte order mark, if the text starts with one.
pub(crate) fn strip_bom(text: &str) -> &str {
    text.strip_prefix('\u{feff}').unwrap_or(text)
}

pub(crate) struct Lines<'a> {
    remaining: &'a str,
}

impl<'a> Iterator for Lines<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining.is_empty() {
            return None;
        }
        let bytes = self.remaining.as_bytes();
        match memchr::memchr2(b'\n', b'\r', bytes) {
            None => {
                let line = self.remaining;
                self.remaining = "";
                Some(line)
            }
            Some(idx) => {
                let line = &self.remaining[..idx];
                let terminator_len = if bytes[idx] == b'\r' && bytes.get(idx + 1) == Some(&b'\n') {
                    2
                } else {
                    1
                };
                self.remaining = &self.remaining[idx + terminator_len..];
                Some(line)
            }
        }
    }
}
