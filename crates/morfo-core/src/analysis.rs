// Morphological field tags and the analysis trace accumulator.

/// Separates fields within one analysis record.
pub const FIELD_SEPARATOR: char = ' ';

/// Separates analysis records from each other.
pub const RECORD_SEPARATOR: char = '\n';

/// Separates alternative sub-analyses spliced into a single record.
pub const ALT_SEPARATOR: char = '\u{B}';

// ---------------------------------------------------------------------------
// Field tags. Each tag is a three-character prefix (`xx:`) immediately
// followed by its value.
// ---------------------------------------------------------------------------

pub const TAG_STEM: &str = "st:";
pub const TAG_ALLOMORPH: &str = "al:";
pub const TAG_PART: &str = "pa:";
pub const TAG_FLAG: &str = "fl:";
pub const TAG_PHONETIC: &str = "ph:";
pub const TAG_DERI_PFX: &str = "dp:";
pub const TAG_INFL_PFX: &str = "ip:";
pub const TAG_TERM_PFX: &str = "tp:";
pub const TAG_SURF_PFX: &str = "sp:";
pub const TAG_DERI_SFX: &str = "ds:";
pub const TAG_INFL_SFX: &str = "is:";
pub const TAG_TERM_SFX: &str = "ts:";

pub const TAG_LEN: usize = 3;

/// Accumulator for morphological analysis output.
///
/// The `*_morph` engine entry points append one record per matching
/// rule/stem combination; each record is a space-separated list of tagged
/// fields and records are newline-separated. The trace is a plain value
/// threaded through the call chain, so concurrent checks cannot observe
/// each other's output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MorphTrace {
    out: String,
}

impl MorphTrace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a tagged field: ` st:walk`.
    pub fn field(&mut self, tag: &str, value: &str) {
        self.out.push(FIELD_SEPARATOR);
        self.out.push_str(tag);
        self.out.push_str(value);
    }

    /// Append pre-formatted text (a rule's morph annotation, an entry's
    /// stored data) as a field.
    pub fn raw(&mut self, text: &str) {
        self.out.push(FIELD_SEPARATOR);
        self.out.push_str(text);
    }

    /// Terminate the current record.
    pub fn end_record(&mut self) {
        self.out.push(RECORD_SEPARATOR);
    }

    /// Append a fully built record.
    pub fn push_record(&mut self, record: &str) {
        self.out.push_str(record);
        self.out.push(RECORD_SEPARATOR);
    }

    /// Drop a trailing record separator, if present. Used when a nested
    /// trace is spliced into an enclosing record.
    pub fn trim_record(&mut self) {
        if self.out.ends_with(RECORD_SEPARATOR) {
            self.out.pop();
        }
    }

    /// Current length, usable as a rollback/progress mark.
    pub fn mark(&self) -> usize {
        self.out.len()
    }

    /// Roll back to a previous [`mark`](Self::mark).
    pub fn truncate(&mut self, mark: usize) {
        self.out.truncate(mark);
    }

    /// Splice another trace's content into this one verbatim.
    pub fn append(&mut self, other: &MorphTrace) {
        self.out.push_str(&other.out);
    }

    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.out
    }

    pub fn into_string(self) -> String {
        self.out
    }

    /// Iterate over the completed records.
    pub fn records(&self) -> impl Iterator<Item = &str> {
        self.out
            .split(RECORD_SEPARATOR)
            .filter(|r| !r.trim().is_empty())
    }
}
