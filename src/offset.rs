//! Character offset handling for standoff annotations.
//!
//! brat offsets count *characters* (Unicode scalar values), while Rust
//! strings are indexed by *bytes*. The two agree only for ASCII text:
//!
//! ```text
//! Text:  "Crohn’s disease"
//!
//!   char  C  r  o  h  n  ’        s     d ...
//!         0  1  2  3  4  5        6  7  8
//!   byte  0  1  2  3  4  5-6-7    8  9  10
//!                     └3 bytes┘
//!
//! brat:  T1  Disease 8 15  disease   -> bytes 10..17
//! ```
//!
//! Slicing `&text[8..15]` would return the wrong text (or panic on a char
//! boundary). Everything in this crate that compares annotation text with
//! the document goes through [`char_slice`] or a [`SpanConverter`].

/// Convert character offsets to byte offsets.
///
/// Offsets past the end of the text clamp to `text.len()`.
#[must_use]
pub fn chars_to_bytes(text: &str, char_start: usize, char_end: usize) -> (usize, usize) {
    let mut byte_start = text.len();
    let mut byte_end = text.len();

    for (char_idx, (byte_idx, _ch)) in text.char_indices().enumerate() {
        if char_idx == char_start {
            byte_start = byte_idx;
        }
        if char_idx == char_end {
            byte_end = byte_idx;
            break;
        }
    }

    (byte_start, byte_end)
}

/// Build an offset mapping table from char to byte.
///
/// Returns a vec where `mapping[char_idx]` gives the byte index; the last
/// entry is `text.len()`.
#[must_use]
pub fn build_char_to_byte_map(text: &str) -> Vec<usize> {
    let mut map: Vec<usize> = text.char_indices().map(|(byte_idx, _)| byte_idx).collect();
    map.push(text.len());
    map
}

/// Number of characters in `text`.
#[must_use]
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Slice `text` by character offsets `[start, end)`.
///
/// Returns `None` if the range is inverted or extends past the end.
#[must_use]
pub fn char_slice(text: &str, start: usize, end: usize) -> Option<&str> {
    if start > end {
        return None;
    }
    if text.is_ascii() {
        return text.get(start..end);
    }
    if end > char_len(text) {
        return None;
    }
    let (byte_start, byte_end) = chars_to_bytes(text, start, end);
    text.get(byte_start..byte_end)
}

/// Converter for slicing many spans out of the same text.
///
/// Pre-computes the char-to-byte table once so each slice is O(1).
pub struct SpanConverter<'a> {
    text: &'a str,
    char_to_byte: Vec<usize>,
    is_ascii: bool,
}

impl<'a> SpanConverter<'a> {
    /// Create a converter for the given text.
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        let is_ascii = text.is_ascii();
        Self {
            text,
            // For ASCII the mapping is the identity.
            char_to_byte: if is_ascii {
                Vec::new()
            } else {
                build_char_to_byte_map(text)
            },
            is_ascii,
        }
    }

    /// Length of the text in characters.
    #[must_use]
    pub fn char_len(&self) -> usize {
        if self.is_ascii {
            self.text.len()
        } else {
            self.char_to_byte.len() - 1
        }
    }

    /// Convert a char offset to a byte offset; `None` past the end.
    #[must_use]
    pub fn char_to_byte(&self, char_idx: usize) -> Option<usize> {
        if self.is_ascii {
            (char_idx <= self.text.len()).then_some(char_idx)
        } else {
            self.char_to_byte.get(char_idx).copied()
        }
    }

    /// Slice the text by character offsets `[start, end)`.
    #[must_use]
    pub fn slice(&self, start: usize, end: usize) -> Option<&'a str> {
        if start > end {
            return None;
        }
        let byte_start = self.char_to_byte(start)?;
        let byte_end = self.char_to_byte(end)?;
        self.text.get(byte_start..byte_end)
    }

    /// Check if this text is ASCII.
    #[must_use]
    pub const fn is_ascii(&self) -> bool {
        self.is_ascii
    }
}
