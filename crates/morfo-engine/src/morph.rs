// Trace-accumulating variants of the word validator.
//
// Where the plain checker stops at the first acceptable rule/stem
// combination, these walk every candidate and append one record per
// combination to a MorphTrace: the input of human-readable morphological
// analysis and of the generation side of a suggestion engine.

use morfo_core::analysis::{MorphTrace, TAG_FLAG, TAG_STEM};
use morfo_core::entry::WordEntry;
use morfo_core::flags::{FlagId, FLAG_NONE};

use crate::checker::{Checker, CompoundPos};
use crate::rules::AffixRule;

impl<'a> Checker<'a> {
    /// Accumulate a record for every rule/stem combination that validates
    /// `word`. An empty trace is the morph analogue of `affix_check`
    /// returning `None`.
    pub fn affix_check_morph(
        &self,
        word: &[char],
        need_flag: FlagId,
        pos: CompoundPos,
    ) -> MorphTrace {
        let mut trace = MorphTrace::new();
        self.prefix_check_morph(&mut trace, word, pos, need_flag);
        self.suffix_check_morph(&mut trace, word, None, FLAG_NONE, need_flag, pos);
        if self.data.has_continuation() {
            self.suffix_check_twofold_morph(&mut trace, word, None, need_flag);
            self.prefix_check_twofold_morph(&mut trace, word, need_flag);
        }
        trace
    }

    pub fn prefix_check_morph(
        &self,
        trace: &mut MorphTrace,
        word: &[char],
        pos: CompoundPos,
        need_flag: FlagId,
    ) {
        let opt = &self.data.options;
        for rule in self.data.prefixes.candidates(word) {
            if pos == CompoundPos::Not && rule.continuation_has(opt.only_in_compound) {
                continue;
            }
            let Some(stem) = rule.reconstruct(word, opt.full_strip) else {
                continue;
            };
            if !rule.continuation_has(opt.need_affix) {
                for entry in self.lexicon.homonyms(&stem) {
                    if self.prefix_homonym_ok(rule, entry, need_flag) {
                        self.affix_field(trace, rule);
                        self.entry_fields(trace, entry);
                        trace.end_record();
                    }
                }
            }
            if rule.cross_product && pos != CompoundPos::Begin {
                self.suffix_check_morph(trace, &stem, Some(rule), FLAG_NONE, need_flag, pos);
            }
        }
    }

    pub fn suffix_check_morph(
        &self,
        trace: &mut MorphTrace,
        word: &[char],
        cross: Option<&'a AffixRule>,
        cclass: FlagId,
        need_flag: FlagId,
        pos: CompoundPos,
    ) {
        let opt = &self.data.options;
        for rule in self.data.suffixes.candidates(word) {
            if !self.suffix_rule_admissible(rule, cross, cclass, pos) {
                continue;
            }
            if cross.is_some() && !rule.cross_product {
                continue;
            }
            let Some(stem) = rule.reconstruct(word, opt.full_strip) else {
                continue;
            };
            for entry in self.lexicon.homonyms(&stem) {
                if self.suffix_homonym_ok(rule, entry, cross, cclass, need_flag, FLAG_NONE) {
                    if let Some(prefix) = cross {
                        self.affix_field(trace, prefix);
                    }
                    self.entry_fields(trace, entry);
                    self.affix_field(trace, rule);
                    trace.end_record();
                }
            }
        }
    }

    pub fn suffix_check_twofold_morph(
        &self,
        trace: &mut MorphTrace,
        word: &[char],
        cross: Option<&'a AffixRule>,
        need_flag: FlagId,
    ) {
        let opt = &self.data.options;
        for rule in self.data.suffixes.candidates(word) {
            if !self.data.is_continuation_class(rule.flag) {
                continue;
            }
            if cross.is_some() && !rule.cross_product {
                continue;
            }
            let Some(stem) = rule.reconstruct(word, opt.full_strip) else {
                continue;
            };
            let mark = trace.mark();
            match cross {
                Some(p) if rule.continuation_has(p.flag) => {
                    let mut inner = MorphTrace::new();
                    self.suffix_check_morph(
                        &mut inner,
                        &stem,
                        None,
                        rule.flag,
                        need_flag,
                        CompoundPos::Not,
                    );
                    if !inner.is_empty() {
                        inner.trim_record();
                        self.affix_field(trace, p);
                        trace.append(&inner);
                    }
                }
                other => {
                    self.suffix_check_morph(
                        trace,
                        &stem,
                        other,
                        rule.flag,
                        need_flag,
                        CompoundPos::Not,
                    );
                    if trace.mark() > mark {
                        trace.trim_record();
                    }
                }
            }
            if trace.mark() > mark {
                self.affix_field(trace, rule);
                trace.end_record();
            }
        }
    }

    pub fn prefix_check_twofold_morph(
        &self,
        trace: &mut MorphTrace,
        word: &[char],
        need_flag: FlagId,
    ) {
        for rule in self.data.prefixes.candidates(word) {
            if !rule.cross_product {
                continue;
            }
            let Some(stem) = rule.reconstruct(word, self.data.options.full_strip) else {
                continue;
            };
            self.suffix_check_twofold_morph(trace, &stem, Some(rule), need_flag);
        }
    }

    /// The rule's own annotation, or its encoded flag when it has none.
    fn affix_field(&self, trace: &mut MorphTrace, rule: &AffixRule) {
        match &rule.morph {
            Some(morph) => trace.raw(morph),
            None => trace.field(TAG_FLAG, &self.data.codec.encode_one(rule.flag)),
        }
    }

    /// The entry's stem (unless its annotation already names one) and its
    /// stored annotation.
    fn entry_fields(&self, trace: &mut MorphTrace, entry: &WordEntry) {
        let has_stem_tag = entry
            .morph
            .as_deref()
            .is_some_and(|m| m.contains(TAG_STEM));
        if !has_stem_tag {
            trace.field(TAG_STEM, &entry.text);
        }
        if let Some(morph) = entry.morph.as_deref() {
            trace.raw(morph);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use morfo_core::entry::MemoryLexicon;
    use morfo_core::flags::FlagSet;

    use crate::rules::{AffixData, AffixOptions, Side};

    const S: FlagId = 'S' as FlagId;
    const P: FlagId = 'P' as FlagId;

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
    fn suffix_record_carries_stem_and_rule() {
        let data = AffixData::build(
            vec![],
            vec![suffix(S, "0", "ed", ".").with_morph("ds:past")],
            AffixOptions::default(),
        )
        .unwrap();
        let mut lex = MemoryLexicon::new();
        lex.insert("walk", FlagSet::new(vec![S]));
        let checker = Checker::new(&data, &lex);

        let trace = checker.affix_check_morph(&chars("walked"), FLAG_NONE, CompoundPos::Not);
        let records: Vec<&str> = trace.records().collect();
        assert_eq!(records.len(), 1);
        assert!(records[0].contains("st:walk"));
        assert!(records[0].contains("ds:past"));
    }

    #[test]
    fn rule_without_morph_reports_its_flag() {
        let data = AffixData::build(
            vec![],
            vec![suffix(S, "0", "ed", ".")],
            AffixOptions::default(),
        )
        .unwrap();
        let mut lex = MemoryLexicon::new();
        lex.insert("walk", FlagSet::new(vec![S]));
        let checker = Checker::new(&data, &lex);

        let trace = checker.affix_check_morph(&chars("walked"), FLAG_NONE, CompoundPos::Not);
        assert!(trace.as_str().contains("fl:S"));
    }

    #[test]
    fn every_matching_combination_is_recorded() {
        // two homonyms and two applicable rules -> one record each
        let data = AffixData::build(
            vec![],
            vec![suffix(S, "0", "s", "."), suffix(P, "0", "s", ".")],
            AffixOptions::default(),
        )
        .unwrap();
        let mut lex = MemoryLexicon::new();
        lex.insert("walk", FlagSet::new(vec![S]));
        lex.insert("walk", FlagSet::new(vec![P]));
        let checker = Checker::new(&data, &lex);

        let trace = checker.affix_check_morph(&chars("walks"), FLAG_NONE, CompoundPos::Not);
        assert_eq!(trace.records().count(), 2);
    }

    #[test]
    fn entry_annotation_is_spliced_in() {
        let data = AffixData::build(
            vec![],
            vec![suffix(S, "0", "ed", ".")],
            AffixOptions::default(),
        )
        .unwrap();
        let mut lex = MemoryLexicon::new();
        lex.insert_entry(
            morfo_core::entry::WordEntry::new("walk", FlagSet::new(vec![S]))
                .with_morph("st:walken po:verb"),
        );
        let checker = Checker::new(&data, &lex);

        let trace = checker.affix_check_morph(&chars("walked"), FLAG_NONE, CompoundPos::Not);
        let out = trace.as_str();
        // the annotation's own stem wins; no synthesized st: field
        assert!(out.contains("st:walken"));
        assert!(out.contains("po:verb"));
        assert!(!out.contains("st:walk "));
    }

    #[test]
    fn miss_yields_an_empty_trace() {
        let data = AffixData::build(
            vec![],
            vec![suffix(S, "0", "ed", ".")],
            AffixOptions::default(),
        )
        .unwrap();
        let lex = MemoryLexicon::new();
        let checker = Checker::new(&data, &lex);
        assert!(checker
            .affix_check_morph(&chars("walked"), FLAG_NONE, CompoundPos::Not)
            .is_empty());
    }
}
