//! Locates JSON embedded in free-form completion text.
//!
//! Completions may wrap JSON in commentary or markdown fences. The scanner finds the
//! first balanced `{...}` or `[...]` literal, ignoring brackets inside JSON strings.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonShape {
    Object,
    Array,
}

impl JsonShape {
    fn delimiters(self) -> (char, char) {
        match self {
            JsonShape::Object => ('{', '}'),
            JsonShape::Array => ('[', ']'),
        }
    }
}

/// First balanced literal of the requested shape, or `None`.
///
/// Scanning stops at the first opener that runs off the end of the text unclosed,
/// so the cost stays linear in the length of `text`.
pub fn extract_json(text: &str, shape: JsonShape) -> Option<&str> {
    let (open, close) = shape.delimiters();
    let start = text.find(open)?;
    balanced_end(text, start, open, close).map(|end| &text[start..end])
}

/// Byte offset just past the delimiter closing the one at `start`.
fn balanced_end(text: &str, start: usize, open: char, close: char) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            _ if c == open => depth += 1,
            _ if c == close => {
                depth -= 1;
                if depth == 0 {
                    return Some(start + offset + c.len_utf8());
                }
            }
            _ => {}
        }
    }
    None
}
