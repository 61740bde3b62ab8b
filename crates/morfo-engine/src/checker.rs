// The recursive affix-stripping word validator.

use morfo_core::entry::{Lexicon, WordEntry};
use morfo_core::flags::{FlagId, FLAG_NONE};

use crate::compound::heuristic::{CompoundHeuristic, NoHeuristic};
use crate::rules::{AffixData, AffixRule};

/// Where in a compound the word under test sits. Affix applicability
/// depends on it: fogemorphemes only exist inside compounds, ordinary
/// affixes need an explicit permit at inner boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompoundPos {
    /// Not inside a compound.
    Not,
    /// A non-final compound member.
    Begin,
    /// The final compound member.
    End,
    /// A loose probe position used by partial-compound callers.
    Other,
}

/// A successful validation: the dictionary entry plus the rule or rules
/// that produced the word from it. Carrying the rules in the result (rather
/// than in shared mutable fields) is what lets the segmenter and the
/// morphological output interrogate the match after the fact.
#[derive(Debug, Clone, Copy)]
pub struct AffixHit<'a> {
    pub entry: &'a WordEntry,
    pub prefix: Option<&'a AffixRule>,
    pub suffix: Option<&'a AffixRule>,
}

impl<'a> AffixHit<'a> {
    pub(crate) fn bare(entry: &'a WordEntry) -> Self {
        Self {
            entry,
            prefix: None,
            suffix: None,
        }
    }

    pub fn is_affixed(&self) -> bool {
        self.prefix.is_some() || self.suffix.is_some()
    }

    /// Whether either applied affix passes `flag` forward.
    pub fn affix_continuation_has(&self, flag: FlagId) -> bool {
        self.prefix.is_some_and(|p| p.continuation_has(flag))
            || self.suffix.is_some_and(|s| s.continuation_has(flag))
    }
}

/// The word validator: walks the affix indexes, reconstructs candidate
/// stems, and consults the dictionary oracle. One instance borrows the
/// read-only tables and can serve any number of sequential checks; distinct
/// instances over the same tables may run on distinct threads.
pub struct Checker<'a> {
    pub(crate) data: &'a AffixData,
    pub(crate) lexicon: &'a dyn Lexicon,
    pub(crate) heuristic: &'a dyn CompoundHeuristic,
}

impl<'a> Checker<'a> {
    pub fn new(data: &'a AffixData, lexicon: &'a dyn Lexicon) -> Self {
        Self {
            data,
            lexicon,
            heuristic: &NoHeuristic,
        }
    }

    /// A checker whose segmenter consults a language-specific compounding
    /// heuristic at its hook points.
    pub fn with_heuristic(
        data: &'a AffixData,
        lexicon: &'a dyn Lexicon,
        heuristic: &'a dyn CompoundHeuristic,
    ) -> Self {
        Self {
            data,
            lexicon,
            heuristic,
        }
    }

    pub fn data(&self) -> &'a AffixData {
        self.data
    }

    /// Is `word` a valid affixed form of some dictionary stem?
    ///
    /// Tries prefixes (each cross-checked with suffixes where permitted),
    /// then suffixes, then -- only when some rule declares a continuation
    /// class -- the twofold variants. First success wins; `None` means
    /// "not a valid affixed form", which the caller interprets.
    pub fn affix_check(
        &self,
        word: &[char],
        need_flag: FlagId,
        pos: CompoundPos,
    ) -> Option<AffixHit<'a>> {
        if let Some(hit) = self.prefix_check(word, pos, need_flag) {
            return Some(hit);
        }
        let hit = self.suffix_check(word, None, FLAG_NONE, need_flag, pos);
        if !self.data.has_continuation() {
            return hit;
        }
        hit.or_else(|| self.suffix_check_twofold(word, None, need_flag))
            .or_else(|| self.prefix_check_twofold(word, need_flag))
    }

    /// Validate `word` as prefix + stem (or prefix + stem + suffix through
    /// the cross-product recursion).
    pub fn prefix_check(
        &self,
        word: &[char],
        pos: CompoundPos,
        need_flag: FlagId,
    ) -> Option<AffixHit<'a>> {
        let opt = &self.data.options;
        for rule in self.data.prefixes.candidates(word) {
            // fogemorphemes exist only inside compounds
            if pos == CompoundPos::Not && rule.continuation_has(opt.only_in_compound) {
                continue;
            }
            // a prefix on a final member needs the explicit permit
            if pos == CompoundPos::End && !rule.continuation_has(opt.compound_permit) {
                continue;
            }
            if let Some(hit) = self.check_prefix_rule(rule, word, pos, need_flag) {
                return Some(hit);
            }
        }
        None
    }

    fn check_prefix_rule(
        &self,
        rule: &'a AffixRule,
        word: &[char],
        pos: CompoundPos,
        need_flag: FlagId,
    ) -> Option<AffixHit<'a>> {
        let opt = &self.data.options;
        let stem = rule.reconstruct(word, opt.full_strip)?;
        if !rule.continuation_has(opt.need_affix) {
            for entry in self.lexicon.homonyms(&stem) {
                if self.prefix_homonym_ok(rule, entry, need_flag) {
                    return Some(AffixHit {
                        entry,
                        prefix: Some(rule),
                        suffix: None,
                    });
                }
            }
        }
        // The prefix fit but no stem was found; with cross products the
        // remainder may still carry a suffix neither side alone validates.
        if rule.cross_product {
            if let Some(hit) = self.suffix_check(&stem, Some(rule), FLAG_NONE, need_flag, pos) {
                return Some(hit);
            }
        }
        None
    }

    pub(crate) fn prefix_homonym_ok(
        &self,
        rule: &AffixRule,
        entry: &WordEntry,
        need_flag: FlagId,
    ) -> bool {
        entry.has_flag(rule.flag)
            && (need_flag == FLAG_NONE
                || entry.has_flag(need_flag)
                || rule.continuation_has(need_flag))
    }

    /// Validate `word` as stem + suffix. `cross` carries the already
    /// stripped prefix during cross-product checking; `cclass` the outer
    /// suffix flag during twofold checking.
    pub fn suffix_check(
        &self,
        word: &[char],
        cross: Option<&'a AffixRule>,
        cclass: FlagId,
        need_flag: FlagId,
        pos: CompoundPos,
    ) -> Option<AffixHit<'a>> {
        for rule in self.data.suffixes.candidates(word) {
            if !self.suffix_rule_admissible(rule, cross, cclass, pos) {
                continue;
            }
            if let Some(hit) = self.check_suffix_rule(rule, word, cross, cclass, need_flag, pos) {
                return Some(hit);
            }
        }
        None
    }

    /// The context gates shared by the plain and morph suffix walks.
    pub(crate) fn suffix_rule_admissible(
        &self,
        rule: &AffixRule,
        cross: Option<&AffixRule>,
        cclass: FlagId,
        pos: CompoundPos,
    ) -> bool {
        let opt = &self.data.options;
        // a chained suffix must have a continuation set at all
        if cclass != FLAG_NONE && rule.continuation.is_none() {
            return false;
        }
        // suffixes are not allowed on a non-final member without the permit
        if pos == CompoundPos::Begin && !rule.continuation_has(opt.compound_permit) {
            return false;
        }
        // circumfix halves appear on both sides or on neither
        if opt.circumfix != FLAG_NONE {
            let prefix_half = cross.is_some_and(|p| p.continuation_has(opt.circumfix));
            if prefix_half != rule.continuation_has(opt.circumfix) {
                return false;
            }
        }
        // fogemorpheme
        if pos == CompoundPos::Not && rule.continuation_has(opt.only_in_compound) {
            return false;
        }
        // needaffix may not ride the first affix applied
        if cclass == FLAG_NONE
            && rule.continuation_has(opt.need_affix)
            && !cross.is_some_and(|p| !p.continuation_has(opt.need_affix))
        {
            return false;
        }
        // a compound-only suffix cannot close a compound by itself
        if !rule.append.is_empty()
            && pos == CompoundPos::End
            && cross.is_none()
            && rule.continuation_has(opt.only_in_compound)
        {
            return false;
        }
        true
    }

    fn check_suffix_rule(
        &self,
        rule: &'a AffixRule,
        word: &[char],
        cross: Option<&'a AffixRule>,
        cclass: FlagId,
        need_flag: FlagId,
        pos: CompoundPos,
    ) -> Option<AffixHit<'a>> {
        let opt = &self.data.options;
        if cross.is_some() && !rule.cross_product {
            return None;
        }
        let stem = rule.reconstruct(word, opt.full_strip)?;
        // outside compounds, compound-only homonyms are not acceptable
        let bad_flag = if pos == CompoundPos::Not {
            opt.only_in_compound
        } else {
            FLAG_NONE
        };
        for entry in self.lexicon.homonyms(&stem) {
            if self.suffix_homonym_ok(rule, entry, cross, cclass, need_flag, bad_flag) {
                return Some(AffixHit {
                    entry,
                    prefix: cross,
                    suffix: Some(rule),
                });
            }
        }
        None
    }

    pub(crate) fn suffix_homonym_ok(
        &self,
        rule: &AffixRule,
        entry: &WordEntry,
        cross: Option<&AffixRule>,
        cclass: FlagId,
        need_flag: FlagId,
        bad_flag: FlagId,
    ) -> bool {
        // the stem carries the suffix flag, or the governing prefix
        // passes it forward
        let flag_ok = entry.has_flag(rule.flag)
            || cross.is_some_and(|p| p.continuation_has(rule.flag));
        // under a cross product both sides must agree on the prefix flag
        let cross_ok = match cross {
            None => true,
            Some(p) => entry.has_flag(p.flag) || rule.continuation_has(p.flag),
        };
        let class_ok = cclass == FLAG_NONE || rule.continuation_has(cclass);
        let not_bad = bad_flag == FLAG_NONE || !entry.has_flag(bad_flag);
        let need_ok = need_flag == FLAG_NONE
            || entry.has_flag(need_flag)
            || rule.continuation_has(need_flag);
        flag_ok && cross_ok && class_ok && not_bad && need_ok
    }

    /// Two-level pass: strip an outer suffix whose flag is a continuation
    /// class, then validate the remainder for the inner suffix it chains
    /// through. Supports layered inflection (suffix-of-suffix).
    pub fn suffix_check_twofold(
        &self,
        word: &[char],
        cross: Option<&'a AffixRule>,
        need_flag: FlagId,
    ) -> Option<AffixHit<'a>> {
        for rule in self.data.suffixes.candidates(word) {
            if !self.data.is_continuation_class(rule.flag) {
                continue;
            }
            if let Some(hit) = self.check_suffix_twofold_rule(rule, word, cross, need_flag) {
                return Some(hit);
            }
        }
        None
    }

    fn check_suffix_twofold_rule(
        &self,
        rule: &'a AffixRule,
        word: &[char],
        cross: Option<&'a AffixRule>,
        need_flag: FlagId,
    ) -> Option<AffixHit<'a>> {
        if cross.is_some() && !rule.cross_product {
            return None;
        }
        let stem = rule.reconstruct(word, self.data.options.full_strip)?;
        let inner = match cross {
            // the outer suffix itself is enabled by the prefix: the inner
            // check no longer needs the prefix constraint
            Some(p) if rule.continuation_has(p.flag) => {
                self.suffix_check(&stem, None, rule.flag, need_flag, CompoundPos::Not)
            }
            other => self.suffix_check(&stem, other, rule.flag, need_flag, CompoundPos::Not),
        }?;
        Some(AffixHit {
            entry: inner.entry,
            prefix: cross,
            suffix: Some(rule),
        })
    }

    /// Two-level pass from the prefix side: strip a cross-product prefix,
    /// then look for a twofold suffix pair on the remainder.
    pub fn prefix_check_twofold(&self, word: &[char], need_flag: FlagId) -> Option<AffixHit<'a>> {
        for rule in self.data.prefixes.candidates(word) {
            if let Some(hit) = self.check_prefix_twofold_rule(rule, word, need_flag) {
                return Some(hit);
            }
        }
        None
    }

    fn check_prefix_twofold_rule(
        &self,
        rule: &'a AffixRule,
        word: &[char],
        need_flag: FlagId,
    ) -> Option<AffixHit<'a>> {
        if !rule.cross_product {
            return None;
        }
        let stem = rule.reconstruct(word, self.data.options.full_strip)?;
        let inner = self.suffix_check_twofold(&stem, Some(rule), need_flag)?;
        Some(AffixHit {
            entry: inner.entry,
            prefix: Some(rule),
            suffix: inner.suffix,
        })
    }
}
