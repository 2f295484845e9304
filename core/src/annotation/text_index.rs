/// UTF-16 offset view over a UTF-8 string.
///
/// Classifier offsets count UTF-16 code units, the way `String.length` and
/// `slice` do on the client. Every slice the engine takes goes through here,
/// so it never lands inside a multi-byte sequence. An offset that falls
/// between the two halves of a surrogate pair snaps down to the start of
/// that character.
pub struct TextIndex<'a> {
    text: &'a str,
    // per char boundary, plus one entry for the end of the text
    units: Vec<usize>,
    bytes: Vec<usize>,
}

impl<'a> TextIndex<'a> {
    pub fn new(text: &'a str) -> Self {
        let mut units = Vec::with_capacity(text.len() + 1);
        let mut bytes = Vec::with_capacity(text.len() + 1);
        let mut unit = 0;
        for (b, c) in text.char_indices() {
            units.push(unit);
            bytes.push(b);
            unit += c.len_utf16();
        }
        units.push(unit);
        bytes.push(text.len());
        TextIndex { text, units, bytes }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Length in UTF-16 code units.
    pub fn len_units(&self) -> usize {
        self.units[self.units.len() - 1]
    }

    fn boundary(&self, unit: usize) -> usize {
        match self.units.binary_search(&unit.min(self.len_units())) {
            Ok(i) => i,
            // units[0] == 0, so a miss is always past the first boundary
            Err(i) => i - 1,
        }
    }

    /// Nearest char boundary at or below `unit`, clamped to the text.
    pub fn snap(&self, unit: usize) -> usize {
        self.units[self.boundary(unit)]
    }

    /// Byte offset of UTF-16 offset `unit`, snapped and clamped.
    pub fn byte_offset(&self, unit: usize) -> usize {
        self.bytes[self.boundary(unit)]
    }

    pub fn unit_index_of_byte(&self, byte: usize) -> Option<usize> {
        self.bytes.binary_search(&byte).ok().map(|i| self.units[i])
    }

    /// `text[start..end]` in UTF-16 units. Out-of-range bounds are clamped.
    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        let s = self.byte_offset(start);
        let e = self.byte_offset(end.max(start));
        &self.text[s..e]
    }

    /// First exact occurrence of `needle`, as a UTF-16 offset.
    pub fn find(&self, needle: &str) -> Option<usize> {
        self.find_from(needle, 0)
    }

    /// First exact occurrence of `needle` at or after UTF-16 offset `from`.
    pub fn find_from(&self, needle: &str, from: usize) -> Option<usize> {
        let from_byte = self.byte_offset(from);
        let hit = self.text[from_byte..].find(needle)?;
        self.unit_index_of_byte(from_byte + hit)
    }
}

/// Length of `s` in UTF-16 code units.
pub fn unit_len(s: &str) -> usize {
    s.encode_utf16().count()
}
