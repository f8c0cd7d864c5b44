//! Code-point cursor with a four-slot lookahead window.
//!
//! See [`Reader`] for the main entry point.

use std::rc::Rc;

use crate::chars::{combine_surrogate_pair, is_lead_surrogate, is_trail_surrogate};

/// Encode `source` as the shared UTF-16 buffer the reader works on.
pub fn utf16_units(source: &str) -> Rc<[u16]> {
    source.encode_utf16().collect()
}

/// A cursor over UTF-16 source text.
///
/// In legacy mode every code unit is one character. In Unicode mode a
/// surrogate pair is read as a single supplementary code point of width 2.
/// Reads past `end` yield `None`.
///
/// # Example
///
/// ```
/// use esregex_core::reader::Reader;
///
/// let units: Vec<u16> = "a😀b".encode_utf16().collect();
/// let mut reader = Reader::new();
/// reader.reset(units.into(), 0, 4, true);
/// assert_eq!(reader.current_code_point(), Some('a' as u32));
/// assert_eq!(reader.next_code_point(), Some(0x1f600));
/// reader.advance();
/// reader.advance();
/// assert_eq!(reader.index(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct Reader {
    source: Rc<[u16]>,
    unicode: bool,
    index: usize,
    end: usize,
    cp1: Option<u32>,
    w1: usize,
    cp2: Option<u32>,
    w2: usize,
    cp3: Option<u32>,
    w3: usize,
    cp4: Option<u32>,
}

impl Default for Reader {
    fn default() -> Self {
        Self::new()
    }
}

impl Reader {
    /// Create a reader over empty input.
    pub fn new() -> Self {
        Self {
            source: Rc::from(Vec::new()),
            unicode: false,
            index: 0,
            end: 0,
            cp1: None,
            w1: 1,
            cp2: None,
            w2: 1,
            cp3: None,
            w3: 1,
            cp4: None,
        }
    }

    /// The UTF-16 source being read.
    pub fn source(&self) -> &Rc<[u16]> {
        &self.source
    }

    /// The code-unit offset of the current character.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current_code_point(&self) -> Option<u32> {
        self.cp1
    }

    pub fn next_code_point(&self) -> Option<u32> {
        self.cp2
    }

    pub fn next_code_point2(&self) -> Option<u32> {
        self.cp3
    }

    pub fn next_code_point3(&self) -> Option<u32> {
        self.cp4
    }

    /// Point the reader at `source[start..end]` and select the reading mode.
    pub fn reset(&mut self, source: Rc<[u16]>, start: usize, end: usize, unicode: bool) {
        self.end = end.min(source.len());
        self.source = source;
        self.unicode = unicode;
        self.rewind(start);
    }

    // ── Low-level helpers ───────────────────────────────────────────────────

    fn at(&self, i: usize) -> Option<u32> {
        if i >= self.end {
            return None;
        }
        let unit = u32::from(self.source[i]);
        if self.unicode && is_lead_surrogate(unit) && i + 1 < self.end {
            let trail = u32::from(self.source[i + 1]);
            if is_trail_surrogate(trail) {
                return Some(combine_surrogate_pair(unit, trail));
            }
        }
        Some(unit)
    }

    fn width(&self, cp: Option<u32>) -> usize {
        match cp {
            Some(c) if self.unicode && c > 0xffff => 2,
            _ => 1,
        }
    }

    // ── Movement ────────────────────────────────────────────────────────────

    /// Move to `index` and refill the whole lookahead window.
    pub fn rewind(&mut self, index: usize) {
        self.index = index;
        self.cp1 = self.at(index);
        self.w1 = self.width(self.cp1);
        self.cp2 = self.at(index + self.w1);
        self.w2 = self.width(self.cp2);
        self.cp3 = self.at(index + self.w1 + self.w2);
        self.w3 = self.width(self.cp3);
        self.cp4 = self.at(index + self.w1 + self.w2 + self.w3);
    }

    /// Step past the current character. Does nothing at end of input.
    pub fn advance(&mut self) {
        if self.cp1.is_none() {
            return;
        }
        self.index += self.w1;
        self.cp1 = self.cp2;
        self.w1 = self.w2;
        self.cp2 = self.cp3;
        self.w2 = self.width(self.cp2);
        self.cp3 = self.cp4;
        self.w3 = self.width(self.cp3);
        self.cp4 = self.at(self.index + self.w1 + self.w2 + self.w3);
    }

    /// Consume the current character if it is `ch`.
    pub fn eat(&mut self, ch: char) -> bool {
        if self.cp1 == Some(ch as u32) {
            self.advance();
            return true;
        }
        false
    }

    /// Consume the next two characters if they are `ch1`, `ch2`.
    pub fn eat2(&mut self, ch1: char, ch2: char) -> bool {
        if self.cp1 == Some(ch1 as u32) && self.cp2 == Some(ch2 as u32) {
            self.advance();
            self.advance();
            return true;
        }
        false
    }

    /// Consume the next three characters if they are `ch1`, `ch2`, `ch3`.
    pub fn eat3(&mut self, ch1: char, ch2: char, ch3: char) -> bool {
        if self.cp1 == Some(ch1 as u32)
            && self.cp2 == Some(ch2 as u32)
            && self.cp3 == Some(ch3 as u32)
        {
            self.advance();
            self.advance();
            self.advance();
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader(src: &str, unicode: bool) -> Reader {
        let units: Vec<u16> = src.encode_utf16().collect();
        let end = units.len();
        let mut r = Reader::new();
        r.reset(units.into(), 0, end, unicode);
        r
    }

    #[test]
    fn test_legacy_reads_code_units() {
        let mut r = reader("😀a", false);
        assert_eq!(r.current_code_point(), Some(0xd83d));
        assert_eq!(r.next_code_point(), Some(0xde00));
        assert_eq!(r.next_code_point2(), Some('a' as u32));
        assert_eq!(r.next_code_point3(), None);
        r.advance();
        assert_eq!(r.index(), 1);
    }

    #[test]
    fn test_unicode_combines_pairs() {
        let mut r = reader("😀a", true);
        assert_eq!(r.current_code_point(), Some(0x1f600));
        assert_eq!(r.next_code_point(), Some('a' as u32));
        r.advance();
        assert_eq!(r.index(), 2);
        assert_eq!(r.current_code_point(), Some('a' as u32));
    }

    #[test]
    fn test_lone_surrogate_in_unicode_mode() {
        let units: Vec<u16> = vec![0xd83d, 'a' as u16];
        let mut r = Reader::new();
        r.reset(units.into(), 0, 2, true);
        assert_eq!(r.current_code_point(), Some(0xd83d));
        r.advance();
        assert_eq!(r.index(), 1);
    }

    #[test]
    fn test_end_is_respected() {
        let units: Vec<u16> = "abc".encode_utf16().collect();
        let mut r = Reader::new();
        r.reset(units.into(), 1, 2, false);
        assert_eq!(r.current_code_point(), Some('b' as u32));
        assert_eq!(r.next_code_point(), None);
        r.advance();
        r.advance();
        assert_eq!(r.index(), 2);
        assert_eq!(r.current_code_point(), None);
    }

    #[test]
    fn test_eat_and_rewind() {
        let mut r = reader("abcd", false);
        assert!(!r.eat('b'));
        assert!(r.eat('a'));
        assert!(!r.eat3('b', 'c', 'x'));
        assert!(r.eat2('b', 'c'));
        assert_eq!(r.current_code_point(), Some('d' as u32));
        r.rewind(0);
        assert!(r.eat3('a', 'b', 'c'));
        assert_eq!(r.index(), 3);
    }
}
