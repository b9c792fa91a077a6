//! Preprocessor for statement lines. The preprocessor transforms a line into
//! a form that can be easily lexed.
//!
//! The preprocessor:
//! * removes whitespace
//! * converts letters to upper case
//! * replaces characters outside ASCII with a placeholder
//!
//! Because removing whitespace moves characters, the preprocessor remembers
//! where each kept character came from so that diagnostics still point at
//! the original text.

/// A line with whitespace removed and letters in upper case.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Compacted {
    /// The compacted text.
    pub text: String,
    /// For each byte of `text`, the byte range of its character in the
    /// original line.
    offsets: Vec<(usize, usize)>,
    /// Length of the original line in bytes.
    original_len: usize,
}

impl Compacted {
    /// Maps a byte range of the compacted text back to the original line.
    pub fn original_range(&self, start: usize, end: usize) -> std::ops::Range<usize> {
        let original_start = self
            .offsets
            .get(start)
            .map(|(first, _)| *first)
            .unwrap_or(self.original_len);
        let original_end = if end == 0 {
            original_start
        } else {
            self.offsets
                .get(end - 1)
                .map(|(_, last)| *last)
                .unwrap_or(self.original_len)
        };
        original_start..original_end.max(original_start)
    }
}

/// Stands in for a character outside ASCII.
pub const NON_ASCII: char = '?';

pub fn preprocess(line: &str) -> Compacted {
    let mut text = String::with_capacity(line.len());
    let mut offsets = Vec::with_capacity(line.len());

    for (offset, char) in line.char_indices() {
        if char.is_whitespace() {
            continue;
        }
        // Characters outside ASCII cannot be part of a label. Each becomes
        // one placeholder byte so that the compacted text stays ASCII.
        let compact = if char.is_ascii() {
            char.to_ascii_uppercase()
        } else {
            NON_ASCII
        };
        text.push(compact);
        offsets.push((offset, offset + char.len_utf8()));
    }

    Compacted {
        text,
        offsets,
        original_len: line.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preprocess_when_spaces_then_removed() {
        let compacted = preprocess("O1 = ( !i1 ^ i2 )");
        assert_eq!(compacted.text, "O1=(!I1^I2)");
    }

    #[test]
    fn preprocess_when_tabs_and_lower_case_then_upper_case_without_tabs() {
        let compacted = preprocess("\tton1=\ti3");
        assert_eq!(compacted.text, "TON1=I3");
    }

    #[test]
    fn original_range_when_spaces_removed_then_maps_to_source() {
        let compacted = preprocess("O1 = I12");
        // "I12" is at 3..6 in "O1=I12" and at 5..8 in the original line.
        assert_eq!(compacted.original_range(3, 6), 5..8);
    }

    #[test]
    fn preprocess_when_non_ascii_then_placeholder_maps_to_whole_char() {
        let compacted = preprocess("O1=é");
        assert_eq!(compacted.text, "O1=?");
        assert_eq!(compacted.original_range(3, 4), 3..5);
    }

    #[test]
    fn original_range_when_past_end_then_end_of_line() {
        let compacted = preprocess("O1 = ");
        assert_eq!(compacted.original_range(3, 3), 5..5);
    }
}
