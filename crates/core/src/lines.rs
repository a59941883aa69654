/// Iterator over lines that keeps each line's terminator attached.
///
/// Recognized terminators are `\r\n`, `\n`, `\r`, VT, FF, the U+001C..U+001E
/// separators, NEL (U+0085) and the Unicode line/paragraph separators. A
/// trailing fragment without a terminator is yielded as its own line; an empty
/// input yields nothing.
pub struct LinesWithEnds<'a> {
    rest: &'a str,
}

pub fn lines_with_ends(text: &str) -> LinesWithEnds<'_> {
    LinesWithEnds { rest: text }
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\u{0b}' | '\u{0c}' | '\u{1c}' | '\u{1d}' | '\u{1e}' | '\u{85}' | '\u{2028}'
            | '\u{2029}'
    )
}

impl<'a> Iterator for LinesWithEnds<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.rest.is_empty() {
            return None;
        }

        let end = match self.rest.char_indices().find(|&(_, c)| is_line_break(c)) {
            Some((idx, '\r')) if self.rest[idx + 1..].starts_with('\n') => idx + 2,
            Some((idx, c)) => idx + c.len_utf8(),
            None => self.rest.len(),
        };

        let (line, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(line)
    }
}
