//! Brightness-based character matcher over a mutable working charset.

use crate::glyph::{ink_count, GlyphSource, CELL};
use crate::{AsciiArtError, Result};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Printable ASCII, `' '` through `'~'`.
pub const PRINTABLE: (char, char) = (' ', '~');

pub struct BrightnessMatcher {
    glyphs: Box<dyn GlyphSource>,
    /// Working set, code point -> ink count.
    active: BTreeMap<char, u16>,
    /// Ink count -> characters sharing it.
    buckets: BTreeMap<u16, BTreeSet<char>>,
    /// Every ink count ever computed, kept across removals.
    known: HashMap<char, u16>,
    /// Normalised brightness -> lowest code point of its bucket, ascending.
    stretched: Vec<(f64, char)>,
    stale: bool,
}

impl BrightnessMatcher {
    pub fn new(glyphs: impl GlyphSource + 'static, charset: impl IntoIterator<Item = char>) -> Self {
        Self::boxed(Box::new(glyphs), charset)
    }

    /// Same as [`new`](Self::new) for a glyph source chosen at runtime.
    pub fn boxed(glyphs: Box<dyn GlyphSource>, charset: impl IntoIterator<Item = char>) -> Self {
        let mut matcher = Self {
            glyphs,
            active: BTreeMap::new(),
            buckets: BTreeMap::new(),
            known: HashMap::new(),
            stretched: Vec::new(),
            stale: true,
        };
        for c in charset {
            matcher.add_char(c);
        }
        matcher
    }

    /// Add `c` to the working set. Adding a present character changes nothing.
    pub fn add_char(&mut self, c: char) {
        if self.active.contains_key(&c) {
            return;
        }
        let ink = self.ink(c);
        self.active.insert(c, ink);
        self.buckets.entry(ink).or_default().insert(c);
        self.stale = true;
    }

    /// Remove `c` from the working set; absent characters are ignored.
    pub fn remove_char(&mut self, c: char) {
        let Some(ink) = self.active.remove(&c) else {
            return;
        };
        if let Some(bucket) = self.buckets.get_mut(&ink) {
            bucket.remove(&c);
            if bucket.is_empty() {
                self.buckets.remove(&ink);
            }
        }
        self.stale = true;
    }

    /// Add every character in the inclusive range, in either order.
    pub fn add_range(&mut self, start: char, end: char) {
        for c in ordered_range(start, end) {
            self.add_char(c);
        }
    }

    /// Remove every character in the inclusive range, in either order.
    pub fn remove_range(&mut self, start: char, end: char) {
        for c in ordered_range(start, end) {
            self.remove_char(c);
        }
    }

    pub fn contains(&self, c: char) -> bool {
        self.active.contains_key(&c)
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Active characters in ascending code-point order.
    pub fn list_chars(&self) -> Vec<char> {
        self.active.keys().copied().collect()
    }

    /// Character whose normalised brightness is closest to `query`.
    ///
    /// The query is clamped to [0, 1] (NaN counts as 0). On equal distance the
    /// dimmer character wins.
    pub fn match_brightness(&mut self, query: f64) -> Result<char> {
        if self.is_empty() {
            return Err(AsciiArtError::EmptyCharset);
        }
        if self.stale {
            self.restretch();
        }
        let query = if query.is_nan() { 0.0 } else { query.clamp(0.0, 1.0) };

        let view = &self.stretched;
        let above = view.partition_point(|&(v, _)| v <= query);
        let floor = above.checked_sub(1).map(|i| view[i]);
        let ceiling = match floor {
            Some((v, c)) if v == query => Some((v, c)),
            _ => view.get(above).copied(),
        };

        match (floor, ceiling) {
            (Some((fv, fc)), Some((cv, cc))) => {
                Ok(if query - fv <= cv - query { fc } else { cc })
            }
            (Some((_, c)), None) | (None, Some((_, c))) => Ok(c),
            (None, None) => Err(AsciiArtError::EmptyCharset),
        }
    }

    /// Raw brightness of `c` (inked fraction of its glyph cell).
    pub fn raw_brightness(&mut self, c: char) -> f64 {
        f64::from(self.ink(c)) / (CELL * CELL) as f64
    }

    fn ink(&mut self, c: char) -> u16 {
        if let Some(&ink) = self.known.get(&c) {
            return ink;
        }
        let ink = ink_count(&self.glyphs.mask(c));
        self.known.insert(c, ink);
        ink
    }

    fn restretch(&mut self) {
        self.stretched.clear();
        let (Some(&min), Some(&max)) = (self.buckets.keys().next(), self.buckets.keys().next_back())
        else {
            self.stale = false;
            return;
        };
        let span = f64::from(max - min);
        for (&ink, bucket) in &self.buckets {
            let Some(&first) = bucket.first() else { continue };
            let normalised = if span == 0.0 { 0.0 } else { f64::from(ink - min) / span };
            self.stretched.push((normalised, first));
        }
        self.stale = false;
    }
}

fn ordered_range(a: char, b: char) -> std::ops::RangeInclusive<char> {
    if a <= b {
        a..=b
    } else {
        b..=a
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyph::{BuiltinGlyphs, GlyphMask};

    /// Glyphs whose ink count is looked up from a table; unknown chars are blank.
    struct Inked(HashMap<char, u16>);

    impl Inked {
        fn new(entries: &[(char, u16)]) -> Self {
            Self(entries.iter().copied().collect())
        }
    }

    impl GlyphSource for Inked {
        fn mask(&self, c: char) -> GlyphMask {
            let n = self.0.get(&c).copied().unwrap_or(0) as usize;
            let mut mask = [[false; CELL]; CELL];
            for i in 0..n {
                mask[i / CELL][i % CELL] = true;
            }
            mask
        }
    }

    fn digits() -> BrightnessMatcher {
        BrightnessMatcher::new(BuiltinGlyphs, '0'..='9')
    }

    #[test]
    fn ties_go_to_the_dimmer_character() {
        let glyphs = Inked::new(&[('a', 0), ('b', 40), ('c', 60), ('d', 100)]);
        let mut m = BrightnessMatcher::new(glyphs, ['a', 'b', 'c', 'd']);
        assert_eq!(m.match_brightness(0.5).unwrap(), 'b');
        assert_eq!(m.match_brightness(0.51).unwrap(), 'c');
        assert_eq!(m.match_brightness(0.0).unwrap(), 'a');
        assert_eq!(m.match_brightness(1.0).unwrap(), 'd');
    }

    #[test]
    fn bucket_represented_by_lowest_code_point() {
        let glyphs = Inked::new(&[('x', 10), ('q', 10), ('z', 50)]);
        let mut m = BrightnessMatcher::new(glyphs, ['x', 'q', 'z']);
        assert_eq!(m.match_brightness(0.1).unwrap(), 'q');
        m.remove_char('q');
        assert_eq!(m.match_brightness(0.1).unwrap(), 'x');
    }

    #[test]
    fn single_bucket_answers_everything() {
        let glyphs = Inked::new(&[('a', 12), ('b', 12)]);
        let mut m = BrightnessMatcher::new(glyphs, ['b', 'a']);
        for q in [0.0, 0.3, 1.0] {
            assert_eq!(m.match_brightness(q).unwrap(), 'a');
        }
    }

    #[test]
    fn out_of_range_queries_are_clamped() {
        let glyphs = Inked::new(&[('a', 0), ('b', 100)]);
        let mut m = BrightnessMatcher::new(glyphs, ['a', 'b']);
        assert_eq!(m.match_brightness(-0.2).unwrap(), 'a');
        assert_eq!(m.match_brightness(1.0 + 1e-12).unwrap(), 'b');
        assert_eq!(m.match_brightness(f64::NAN).unwrap(), 'a');
    }

    #[test]
    fn matching_is_monotonic() {
        let mut m = BrightnessMatcher::new(BuiltinGlyphs, PRINTABLE.0..=PRINTABLE.1);
        let mut prev = 0.0;
        for step in 0..=200 {
            let c = m.match_brightness(f64::from(step) / 200.0).unwrap();
            let b = m.raw_brightness(c);
            assert!(b >= prev, "brightness fell at step {step}");
            prev = b;
        }
    }

    #[test]
    fn add_then_remove_restores_listing() {
        let mut m = digits();
        let before = m.list_chars();
        for c in ['a', '#', ' ', '5'] {
            let had = m.contains(c);
            m.add_char(c);
            if !had {
                m.remove_char(c);
            }
            assert_eq!(m.list_chars(), before);
        }
    }

    #[test]
    fn adding_twice_is_idempotent() {
        let mut m = digits();
        m.add_char('7');
        assert_eq!(m.len(), 10);
        m.remove_char('7');
        assert!(!m.contains('7'));
        assert_eq!(m.len(), 9);
    }

    #[test]
    fn empty_charset_is_an_error() {
        let mut m = digits();
        m.remove_range('9', '0');
        assert!(m.is_empty());
        assert!(m.list_chars().is_empty());
        assert!(matches!(m.match_brightness(0.5), Err(AsciiArtError::EmptyCharset)));
    }

    #[test]
    fn mutation_invalidates_the_view() {
        let glyphs = Inked::new(&[('a', 0), ('b', 50), ('c', 100)]);
        let mut m = BrightnessMatcher::new(glyphs, ['a', 'c']);
        assert_eq!(m.match_brightness(0.5).unwrap(), 'a');
        m.add_char('b');
        assert_eq!(m.match_brightness(0.5).unwrap(), 'b');
        m.remove_char('c');
        // 'b' is now the brightest, stretched to 1.0
        assert_eq!(m.match_brightness(0.9).unwrap(), 'b');
    }

    #[test]
    fn list_chars_is_sorted() {
        let mut m = BrightnessMatcher::new(BuiltinGlyphs, ['z', 'a', 'M']);
        m.add_range('3', '1');
        assert_eq!(m.list_chars(), vec!['1', '2', '3', 'M', 'a', 'z']);
    }
}
