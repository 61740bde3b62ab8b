// Dictionary entries and the exact-match lookup oracle.

use hashbrown::HashMap;

use crate::flags::{FlagId, FlagSet};

/// One dictionary entry: a stem with its flag vector and optional
/// morphological annotation. Entries are created by the dictionary loader
/// and never mutated afterward; the engine only reads them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordEntry {
    pub text: String,
    pub flags: FlagSet,
    pub morph: Option<String>,
}

impl WordEntry {
    pub fn new(text: impl Into<String>, flags: FlagSet) -> Self {
        Self {
            text: text.into(),
            flags,
            morph: None,
        }
    }

    pub fn with_morph(mut self, morph: impl Into<String>) -> Self {
        self.morph = Some(morph.into());
        self
    }

    /// Shorthand for `flags.contains`.
    pub fn has_flag(&self, flag: FlagId) -> bool {
        self.flags.contains(flag)
    }
}

/// The dictionary oracle: exact-text lookup returning every homonym.
///
/// Words that appear on multiple dictionary lines with different flag
/// vectors are homonyms; the oracle returns all of them in file order and
/// the caller scans for the one that satisfies its flag constraints. An
/// empty slice is a miss. Implementations must support concurrent reads.
pub trait Lexicon: Sync {
    fn homonyms(&self, word: &[char]) -> &[WordEntry];

    /// First homonym, if any. Convenience for callers that only need to
    /// know whether the word exists at all.
    fn lookup(&self, word: &[char]) -> Option<&WordEntry> {
        self.homonyms(word).first()
    }
}

/// Hash-table reference implementation of [`Lexicon`].
///
/// Built once by the loader, then shared read-only across checking calls.
#[derive(Debug, Default)]
pub struct MemoryLexicon {
    table: HashMap<String, Vec<WordEntry>>,
    len: usize,
}

impl MemoryLexicon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry; a repeated `text` extends its homonym chain.
    pub fn insert(&mut self, text: &str, flags: FlagSet) {
        self.insert_entry(WordEntry::new(text, flags));
    }

    pub fn insert_entry(&mut self, entry: WordEntry) {
        self.len += 1;
        self.table
            .entry(entry.text.clone())
            .or_default()
            .push(entry);
    }

    /// Number of entries (homonyms counted individually).
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Lexicon for MemoryLexicon {
    fn homonyms(&self, word: &[char]) -> &[WordEntry] {
        let key: String = word.iter().collect();
        self.table.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }
}
