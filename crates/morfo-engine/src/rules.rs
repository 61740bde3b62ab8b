// The immutable affix rule model, global options, and the AffixData bundle.

use morfo_core::codec::FlagCodec;
use morfo_core::flags::{FlagId, FlagSet, FLAG_NONE};

use crate::condition::{ConditionError, ConditionPattern};
use crate::index::AffixIndex;
use crate::BuildError;

/// Which end of the word an affix attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Prefix,
    Suffix,
}

/// One affix rule: strip `strip`, attach `append`, applicable when
/// `condition` holds on the bare stem. Created by the rule-table loader and
/// immutable afterward.
#[derive(Debug, Clone)]
pub struct AffixRule {
    pub side: Side,
    /// The flag a stem must carry for this rule to apply to it.
    pub flag: FlagId,
    pub strip: Vec<char>,
    pub append: Vec<char>,
    pub condition: ConditionPattern,
    /// Flags this rule passes forward: a second affix layer, compounding
    /// permissions, circumfix pairing.
    pub continuation: Option<FlagSet>,
    /// Whether this rule may combine with an affix on the opposite side.
    pub cross_product: bool,
    pub morph: Option<String>,
}

impl AffixRule {
    /// Build a rule from the textual fields the loader reads. `strip` and
    /// `append` use the file convention where `"0"` spells the empty string.
    pub fn parse(
        side: Side,
        flag: FlagId,
        strip: &str,
        append: &str,
        condition: &str,
    ) -> Result<Self, ConditionError> {
        let field = |s: &str| -> Vec<char> {
            if s == "0" { Vec::new() } else { s.chars().collect() }
        };
        Ok(Self {
            side,
            flag,
            strip: field(strip),
            append: field(append),
            condition: ConditionPattern::parse(condition)?,
            continuation: None,
            cross_product: false,
            morph: None,
        })
    }

    pub fn with_continuation(mut self, continuation: FlagSet) -> Self {
        self.continuation = Some(continuation);
        self
    }

    pub fn with_cross_product(mut self) -> Self {
        self.cross_product = true;
        self
    }

    pub fn with_morph(mut self, morph: impl Into<String>) -> Self {
        self.morph = Some(morph.into());
        self
    }

    /// True when the continuation set carries `flag`. `FLAG_NONE` is never
    /// carried.
    pub fn continuation_has(&self, flag: FlagId) -> bool {
        flag != FLAG_NONE
            && self
                .continuation
                .as_ref()
                .is_some_and(|c| c.contains(flag))
    }

    /// Reconstruct the candidate stem this rule would have produced `word`
    /// from: remove `append` at the boundary, re-insert `strip`, and test
    /// the condition. `None` is the ordinary "rule does not apply here"
    /// outcome.
    ///
    /// The caller guarantees the boundary characters already match
    /// `append` (that is what the index traversal established).
    pub fn reconstruct(&self, word: &[char], full_strip: bool) -> Option<Vec<char>> {
        let bare = word.len().checked_sub(self.append.len())?;
        if bare == 0 && !full_strip {
            return None;
        }
        if bare + self.strip.len() < self.condition.len() {
            return None;
        }
        let mut stem = Vec::with_capacity(bare + self.strip.len());
        match self.side {
            Side::Prefix => {
                stem.extend_from_slice(&self.strip);
                stem.extend_from_slice(&word[self.append.len()..]);
                self.condition.matches_start(&stem).then_some(stem)
            }
            Side::Suffix => {
                stem.extend_from_slice(&word[..bare]);
                stem.extend_from_slice(&self.strip);
                self.condition.matches_end(&stem).then_some(stem)
            }
        }
    }

    /// Forward application: produce the affixed form of a bare stem, or
    /// `None` when the stem does not satisfy the rule. Re-applying `apply`
    /// to a stem returned by [`reconstruct`](Self::reconstruct) yields the
    /// original word.
    pub fn apply(&self, stem: &[char], full_strip: bool) -> Option<Vec<char>> {
        let len = stem.len();
        if len <= self.strip.len() && !(len == 0 && full_strip) {
            return None;
        }
        if len < self.condition.len() {
            return None;
        }
        let (cond_ok, strip_ok) = match self.side {
            Side::Prefix => (
                self.condition.matches_start(stem),
                stem.starts_with(&self.strip),
            ),
            Side::Suffix => (
                self.condition.matches_end(stem),
                stem.ends_with(&self.strip),
            ),
        };
        if !cond_ok || !strip_ok {
            return None;
        }
        let mut word = Vec::with_capacity(len - self.strip.len() + self.append.len());
        match self.side {
            Side::Prefix => {
                word.extend_from_slice(&self.append);
                word.extend_from_slice(&stem[self.strip.len()..]);
            }
            Side::Suffix => {
                word.extend_from_slice(&stem[..len - self.strip.len()]);
                word.extend_from_slice(&self.append);
            }
        }
        Some(word)
    }
}

/// One entry of the common-misspelling substitution table, used by the
/// segmenter's "more likely a typo" probe.
#[derive(Debug, Clone)]
pub struct RepEntry {
    pub pattern: Vec<char>,
    pub replacement: Vec<char>,
}

impl RepEntry {
    pub fn new(pattern: &str, replacement: &str) -> Self {
        Self {
            pattern: pattern.chars().collect(),
            replacement: replacement.chars().collect(),
        }
    }
}

/// The left-side requirement of a junction pattern.
#[derive(Debug, Clone, Default)]
pub enum JunctionText {
    /// No text requirement; only the flag conditions apply.
    #[default]
    None,
    /// The first member must end at the boundary unmodified (no affix
    /// rewriting), spelled `0` in the table.
    UnmodifiedStem,
    /// The literal characters that must precede the boundary.
    Literal(Vec<char>),
}

/// A junction pattern evaluated at a candidate split boundary: forbidden
/// when matched, or -- in its simplified form -- a required rewrite of the
/// junction text.
#[derive(Debug, Clone, Default)]
pub struct CheckCompoundPattern {
    pub left_text: JunctionText,
    pub right_text: Vec<char>,
    /// The simplified junction spelling that stands for
    /// `left_text + right_text` in the written word.
    pub simplified_text: Option<Vec<char>>,
    pub left_cond: FlagId,
    pub right_cond: FlagId,
}

impl CheckCompoundPattern {
    pub fn new(left: &str, right: &str) -> Self {
        let left_text = match left {
            "" => JunctionText::None,
            "0" => JunctionText::UnmodifiedStem,
            s => JunctionText::Literal(s.chars().collect()),
        };
        Self {
            left_text,
            right_text: right.chars().collect(),
            ..Self::default()
        }
    }

    pub fn with_simplified(mut self, text: &str) -> Self {
        self.simplified_text = Some(text.chars().collect());
        self
    }

    pub fn with_conds(mut self, left: FlagId, right: FlagId) -> Self {
        self.left_cond = left;
        self.right_cond = right;
        self
    }
}

/// One token of a compound rule pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompoundRuleToken {
    Flag(FlagId),
    /// `*` -- the preceding flag may repeat zero or more times.
    ZeroOrMore,
    /// `?` -- the preceding flag is optional.
    ZeroOrOne,
}

/// A compound rule: a flag pattern that a sequence of member flag sets must
/// match for the compound to be legal.
#[derive(Debug, Clone)]
pub struct CompoundRule {
    pub tokens: Vec<CompoundRuleToken>,
}

impl CompoundRule {
    pub fn new(tokens: Vec<CompoundRuleToken>) -> Self {
        Self { tokens }
    }
}

/// Global scalars and feature toggles supplied by the rule-table loader.
/// A `FlagId` field of `FLAG_NONE` means the feature's flag is not
/// configured.
#[derive(Debug, Clone)]
pub struct AffixOptions {
    /// Permits a stem anywhere in a compound.
    pub compound_flag: FlagId,
    /// Permits a stem as the first compound member.
    pub compound_begin: FlagId,
    /// Permits a stem as a middle compound member.
    pub compound_middle: FlagId,
    /// Permits a stem as the last compound member.
    pub compound_end: FlagId,
    /// Marks a root that counts as an extra word for the arity limits.
    pub compound_root: FlagId,
    /// Forbids an affixed form inside compounds, overriding permits.
    pub compound_forbid: FlagId,
    /// Permits an affix at an inner compound boundary.
    pub compound_permit: FlagId,
    /// Restricts a stem or affix to compound members only (fogemorphemes).
    pub only_in_compound: FlagId,
    /// Marks a stem or rule that may not stand alone.
    pub need_affix: FlagId,
    /// Marks the two halves of a circumfix; both or neither must be present.
    pub circumfix: FlagId,
    /// Marks an entry as an explicitly forbidden word.
    pub forbidden_word: FlagId,
    /// Marks an entry that must not be offered while suggesting.
    pub no_suggest: FlagId,
    /// Marks a compound member that forces a capitalized original.
    pub force_ucase: FlagId,
    /// Minimum compound member length.
    pub compound_min: usize,
    /// Maximum member count; `None` is unlimited.
    pub compound_word_max: Option<usize>,
    /// Syllable budget for the syllable-based arity relaxation; 0 disables.
    pub compound_max_syllable: usize,
    /// The vowels counted by the syllable budget.
    pub compound_vowels: Box<[char]>,
    /// Flags of suffixes that adjust the syllable count (legacy heuristic
    /// hook input).
    pub compound_syllable_num: Option<String>,
    /// Forbid the same entry twice in a row.
    pub check_compound_dup: bool,
    /// Forbid compounds that a single REP substitution turns into a word.
    pub check_compound_rep: bool,
    /// Forbid case juxtaposition at boundaries.
    pub check_compound_case: bool,
    /// Forbid triple repeated letters across boundaries.
    pub check_compound_triple: bool,
    /// Allow the simplified two-letter spelling of a forbidden triple.
    pub simplified_triple: bool,
    /// Allow twofold suffixes on compound members.
    pub compound_more_suffixes: bool,
    /// Allow an affix to consume the whole word.
    pub full_strip: bool,
}

impl Default for AffixOptions {
    fn default() -> Self {
        Self {
            compound_flag: FLAG_NONE,
            compound_begin: FLAG_NONE,
            compound_middle: FLAG_NONE,
            compound_end: FLAG_NONE,
            compound_root: FLAG_NONE,
            compound_forbid: FLAG_NONE,
            compound_permit: FLAG_NONE,
            only_in_compound: FLAG_NONE,
            need_affix: FLAG_NONE,
            circumfix: FLAG_NONE,
            forbidden_word: FLAG_NONE,
            no_suggest: FLAG_NONE,
            force_ucase: FLAG_NONE,
            compound_min: 3,
            compound_word_max: None,
            compound_max_syllable: 0,
            compound_vowels: Box::new([]),
            compound_syllable_num: None,
            check_compound_dup: false,
            check_compound_rep: false,
            check_compound_case: false,
            check_compound_triple: false,
            simplified_triple: false,
            compound_more_suffixes: false,
            full_strip: false,
        }
    }
}

/// The immutable rule bundle the checker and segmenter walk: both affix
/// indexes, the global options, and the compound tables. Built once at load
/// time; read-only afterward, so concurrent checks can share a reference
/// without locking.
#[derive(Debug)]
pub struct AffixData {
    pub prefixes: AffixIndex,
    pub suffixes: AffixIndex,
    pub options: AffixOptions,
    pub codec: FlagCodec,
    pub rep_table: Vec<RepEntry>,
    pub compound_patterns: Vec<CheckCompoundPattern>,
    pub compound_rules: Vec<CompoundRule>,
    continuation_classes: FlagSet,
    simplified_junctions: bool,
}

impl AffixData {
    pub fn build(
        prefix_rules: Vec<AffixRule>,
        suffix_rules: Vec<AffixRule>,
        options: AffixOptions,
    ) -> Result<Self, BuildError> {
        Self::builder(prefix_rules, suffix_rules, options).finish()
    }

    pub fn builder(
        prefix_rules: Vec<AffixRule>,
        suffix_rules: Vec<AffixRule>,
        options: AffixOptions,
    ) -> AffixDataBuilder {
        AffixDataBuilder {
            prefix_rules,
            suffix_rules,
            options,
            codec: FlagCodec::default(),
            rep_table: Vec::new(),
            compound_patterns: Vec::new(),
            compound_rules: Vec::new(),
        }
    }

    /// Whether any rule declares a continuation set at all. Gates the
    /// twofold passes of `affix_check`.
    pub fn has_continuation(&self) -> bool {
        !self.continuation_classes.is_empty()
    }

    /// Whether `flag` appears in some rule's continuation set, i.e. a rule
    /// carrying it may be the outer layer of a twofold affix.
    pub fn is_continuation_class(&self, flag: FlagId) -> bool {
        self.continuation_classes.contains(flag)
    }

    /// Whether any junction pattern uses the simplified-text form.
    pub fn has_simplified_junctions(&self) -> bool {
        self.simplified_junctions
    }
}

/// Staged construction of [`AffixData`], so the optional tables read like
/// the affix file they come from.
pub struct AffixDataBuilder {
    prefix_rules: Vec<AffixRule>,
    suffix_rules: Vec<AffixRule>,
    options: AffixOptions,
    codec: FlagCodec,
    rep_table: Vec<RepEntry>,
    compound_patterns: Vec<CheckCompoundPattern>,
    compound_rules: Vec<CompoundRule>,
}

impl AffixDataBuilder {
    pub fn codec(mut self, codec: FlagCodec) -> Self {
        self.codec = codec;
        self
    }

    pub fn rep_table(mut self, table: Vec<RepEntry>) -> Self {
        self.rep_table = table;
        self
    }

    pub fn compound_patterns(mut self, table: Vec<CheckCompoundPattern>) -> Self {
        self.compound_patterns = table;
        self
    }

    pub fn compound_rules(mut self, table: Vec<CompoundRule>) -> Self {
        self.compound_rules = table;
        self
    }

    pub fn finish(self) -> Result<AffixData, BuildError> {
        let continuation_classes: FlagSet = self
            .prefix_rules
            .iter()
            .chain(&self.suffix_rules)
            .filter_map(|r| r.continuation.as_ref())
            .flat_map(|c| c.iter())
            .collect();
        let simplified_junctions = self
            .compound_patterns
            .iter()
            .any(|p| p.simplified_text.as_ref().is_some_and(|t| !t.is_empty()));
        Ok(AffixData {
            prefixes: AffixIndex::build(self.prefix_rules, Side::Prefix)?,
            suffixes: AffixIndex::build(self.suffix_rules, Side::Suffix)?,
            options: self.options,
            codec: self.codec,
            rep_table: self.rep_table,
            compound_patterns: self.compound_patterns,
            compound_rules: self.compound_rules,
            continuation_classes,
            simplified_junctions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn suffix(flag: FlagId, strip: &str, append: &str, cond: &str) -> AffixRule {
        AffixRule::parse(Side::Suffix, flag, strip, append, cond).unwrap()
    }

    fn prefix(flag: FlagId, strip: &str, append: &str, cond: &str) -> AffixRule {
        AffixRule::parse(Side::Prefix, flag, strip, append, cond).unwrap()
    }

    #[test]
    fn zero_spells_empty() {
        let r = suffix(1, "0", "ed", ".");
        assert!(r.strip.is_empty());
        assert_eq!(r.append, chars("ed"));
    }

    #[test]
    fn suffix_reconstruct_strips_and_restores() {
        // strip "y", append "ies": "flies" -> "fly"
        let r = suffix(1, "y", "ies", ".");
        assert_eq!(r.reconstruct(&chars("flies"), false), Some(chars("fly")));
    }

    #[test]
    fn prefix_reconstruct() {
        let r = prefix(1, "0", "un", ".");
        assert_eq!(r.reconstruct(&chars("undone"), false), Some(chars("done")));
    }

    #[test]
    fn reconstruct_honors_condition() {
        // only applies after a consonant + y
        let r = suffix(1, "y", "ies", "[^aeiou]y");
        assert_eq!(r.reconstruct(&chars("flies"), false), Some(chars("fly")));
        // reconstructed stem "buy" ends in vowel + y: rejected
        assert_eq!(r.reconstruct(&chars("buies"), false), None);
    }

    #[test]
    fn reconstruct_rejects_whole_word_without_full_strip() {
        let r = suffix(1, "0", "ed", ".");
        assert_eq!(r.reconstruct(&chars("ed"), false), None);
        assert_eq!(r.reconstruct(&chars("ed"), true), Some(vec![]));
    }

    #[test]
    fn reconstruct_rejects_stem_shorter_than_condition() {
        let r = suffix(1, "0", "s", "abc");
        assert_eq!(r.reconstruct(&chars("abs"), false), None);
        assert_eq!(r.reconstruct(&chars("abcs"), false), Some(chars("abc")));
    }

    #[test]
    fn apply_round_trips_reconstruct() {
        let rules = [
            suffix(1, "y", "ies", "[^aeiou]y"),
            suffix(1, "0", "ed", "."),
            prefix(1, "0", "un", "."),
            prefix(1, "a", "An", "a."),
        ];
        let words = ["flies", "walked", "undone", "Anlage"];
        for (r, w) in rules.iter().zip(words) {
            let stem = r.reconstruct(&chars(w), false).unwrap();
            assert_eq!(r.apply(&stem, false), Some(chars(w)), "rule for {w:?}");
        }
    }

    #[test]
    fn apply_rejects_wrong_strip() {
        let r = suffix(1, "y", "ies", ".");
        assert_eq!(r.apply(&chars("walk"), false), None);
    }

    #[test]
    fn continuation_has_flag() {
        let r = suffix(1, "0", "ed", ".").with_continuation(FlagSet::new(vec![9]));
        assert!(r.continuation_has(9));
        assert!(!r.continuation_has(8));
        assert!(!r.continuation_has(FLAG_NONE));
    }

    #[test]
    fn data_continuation_classes() {
        let sfx = vec![
            suffix(1, "0", "ed", ".").with_continuation(FlagSet::new(vec![2, 3])),
            suffix(4, "0", "s", "."),
        ];
        let data = AffixData::build(vec![], sfx, AffixOptions::default()).unwrap();
        assert!(data.has_continuation());
        assert!(data.is_continuation_class(2));
        assert!(data.is_continuation_class(3));
        assert!(!data.is_continuation_class(4));
    }

    #[test]
    fn data_without_continuations() {
        let data = AffixData::build(
            vec![],
            vec![suffix(1, "0", "ed", ".")],
            AffixOptions::default(),
        )
        .unwrap();
        assert!(!data.has_continuation());
    }

    #[test]
    fn simplified_junction_detection() {
        let data = AffixData::builder(vec![], vec![], AffixOptions::default())
            .compound_patterns(vec![
                CheckCompoundPattern::new("ph", "o").with_simplified("f"),
            ])
            .finish()
            .unwrap();
        assert!(data.has_simplified_junctions());
    }
}
