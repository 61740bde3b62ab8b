// Trace-accumulating variant of the compound segmenter.
//
// Instead of the first accepted reading, this enumerates every
// decomposition, one record per reading, each member a `pa:` field. The
// control flow is a simplified mirror of the plain segmenter: no junction
// rewriting and no triple-letter retry, matching the reference behavior of
// the analysis path.

use std::time::Instant;

use morfo_core::analysis::{MorphTrace, ALT_SEPARATOR, TAG_PART, TAG_STEM};
use morfo_core::entry::WordEntry;
use morfo_core::flags::{FLAG_NONE, ONLY_UPCASE_FLAG};

use crate::checker::{AffixHit, Checker, CompoundPos};

use super::heuristic::{CompoundTally, SyllableCounter};
use super::{rules, CompoundProbe, CompoundState, COMPOUND_TIME_LIMIT, MAX_COMPOUND_MEMBERS};

impl<'a> Checker<'a> {
    /// Enumerate the compound decompositions of `word` as analysis
    /// records. An empty trace means no compound reading exists.
    pub fn compound_check_morph(&self, word: &[char], probe: CompoundProbe) -> MorphTrace {
        let mut state = CompoundState {
            deadline: Instant::now() + COMPOUND_TIME_LIMIT,
            is_suggestion: probe.is_suggestion,
            origin_capitalized: probe.origin_capitalized,
            words: vec![None; MAX_COMPOUND_MEMBERS],
        };
        let mut result = MorphTrace::new();
        self.compound_morph_step(
            word,
            CompoundTally::default(),
            0,
            false,
            probe.mov_rule,
            &mut state,
            &mut result,
            "",
        );
        result
    }

    #[allow(clippy::too_many_arguments)]
    fn compound_morph_step(
        &self,
        word: &[char],
        tally: CompoundTally,
        wnum: usize,
        use_trace: bool,
        mov_rule: bool,
        state: &mut CompoundState<'a>,
        result: &mut MorphTrace,
        partial: &str,
    ) {
        let opt = &self.data.options;
        let cpd_rules = &self.data.compound_rules;
        let counter = SyllableCounter::new(&opt.compound_vowels, opt.compound_max_syllable);
        let word_num = tally.word_count;

        let cmin = opt.compound_min;
        let cmax = (word.len() + 1).saturating_sub(cmin);
        let modes: &[bool] = if use_trace {
            &[true]
        } else if !cpd_rules.is_empty() && word_num == 0 {
            &[false, true]
        } else {
            &[false]
        };

        for i in cmin..cmax {
            'mode: for &rule_mode in modes {
                if Instant::now() >= state.deadline {
                    return;
                }
                let mut trace_active = use_trace;
                let member = &word[..i];
                let mut presult = String::from(partial);

                // FIRST MEMBER
                let homonyms = self.lexicon.homonyms(member);
                if let Some(head) = homonyms.first() {
                    if head.has_flag(opt.compound_forbid) && !mov_rule {
                        continue 'mode;
                    }
                }
                let mut first_direct: Option<&'a WordEntry> = None;
                if mov_rule {
                    first_direct = homonyms.first();
                } else {
                    for entry in homonyms {
                        if opt.need_affix != FLAG_NONE && entry.has_flag(opt.need_affix) {
                            continue;
                        }
                        let gate = if rule_mode {
                            !cpd_rules.is_empty()
                                && (trace_active || word_num == 0)
                                && rules::def_compound_check(
                                    cpd_rules,
                                    &mut state.words,
                                    wnum,
                                    entry,
                                    false,
                                )
                        } else {
                            (!trace_active && entry.has_flag(opt.compound_flag))
                                || (word_num == 0 && entry.has_flag(opt.compound_begin))
                                || (word_num > 0
                                    && !trace_active
                                    && entry.has_flag(opt.compound_middle))
                        };
                        if gate {
                            if rule_mode {
                                trace_active = true;
                            }
                            first_direct = Some(entry);
                            break;
                        }
                    }
                }

                let mut checked_prefix = false;
                let first: Option<AffixHit<'a>> = match first_direct {
                    Some(entry) => {
                        if entry.has_flag(opt.forbidden_word)
                            || entry.has_flag(ONLY_UPCASE_FLAG)
                            || (opt.need_affix != FLAG_NONE && entry.has_flag(opt.need_affix))
                        {
                            continue 'mode;
                        }
                        push_part(&mut presult, member, Some(entry));
                        Some(AffixHit::bare(entry))
                    }
                    None => {
                        let hit = self.first_member_affixed(member, word_num, mov_rule);
                        if let Some(h) = hit {
                            checked_prefix = true;
                            if h.entry.has_flag(opt.forbidden_word)
                                || h.entry.has_flag(ONLY_UPCASE_FLAG)
                            {
                                continue 'mode;
                            }
                            let pos = if mov_rule {
                                CompoundPos::Other
                            } else {
                                CompoundPos::Begin
                            };
                            let mut p = MorphTrace::new();
                            if opt.compound_flag != FLAG_NONE {
                                p = self.affix_check_morph(member, opt.compound_flag, pos);
                            }
                            if p.is_empty() {
                                let position_flag = if word_num == 0 {
                                    opt.compound_begin
                                } else {
                                    opt.compound_middle
                                };
                                if position_flag != FLAG_NONE {
                                    p = self.affix_check_morph(member, position_flag, pos);
                                }
                            }
                            if !p.is_empty() {
                                push_part(&mut presult, member, None);
                                presult.push(' ');
                                presult.push_str(&squash(&p));
                            }
                        }
                        hit
                    }
                };
                let Some(first_hit) = first else {
                    continue 'mode;
                };
                if !mov_rule && first_hit.affix_continuation_has(opt.compound_forbid) {
                    continue 'mode;
                }

                let mut tally = tally;
                if first_hit.entry.has_flag(opt.compound_root) {
                    tally.word_count += 1;
                }

                // first member acceptable here?
                let member_ok = checked_prefix
                    || (trace_active && state.words[wnum].is_some())
                    || first_hit.entry.has_flag(opt.compound_flag)
                    || (word_num == 0 && first_hit.entry.has_flag(opt.compound_begin))
                    || (word_num > 0 && first_hit.entry.has_flag(opt.compound_middle))
                    || (mov_rule && self.heuristic.loose_member(first_hit.entry));
                let vetoed = (opt.check_compound_triple
                    && !trace_active
                    && super::violates_triple(word, i))
                    || (!self.data.compound_patterns.is_empty()
                        && !trace_active
                        && self.junction_forbidden(word, i, Some(first_hit.entry), None))
                    || (opt.check_compound_case
                        && !trace_active
                        && super::violates_case(word, i));
                if !member_ok || vetoed {
                    continue 'mode;
                }

                self.heuristic
                    .first_member(member, first_hit.prefix, &counter, &mut tally);
                let remainder = &word[i..];
                let mut ok = false;

                // SECOND MEMBER, direct
                let mut second: Option<&'a WordEntry> = None;
                for entry in self.lexicon.homonyms(remainder) {
                    if opt.need_affix != FLAG_NONE && entry.has_flag(opt.need_affix) {
                        continue;
                    }
                    let gate = if trace_active {
                        !cpd_rules.is_empty()
                            && rules::def_compound_check(
                                cpd_rules,
                                &mut state.words,
                                wnum + 1,
                                entry,
                                true,
                            )
                    } else {
                        entry.has_flag(opt.compound_flag) || entry.has_flag(opt.compound_end)
                    };
                    if gate {
                        second = Some(entry);
                        break;
                    }
                }

                if let Some(entry) = second {
                    if trace_active && state.words[wnum + 1].is_some() {
                        let mut rec = presult.clone();
                        push_part(&mut rec, remainder, Some(entry));
                        result.push_record(&rec);
                        return;
                    }
                }

                let saved = tally;
                if let Some(entry) = second {
                    self.heuristic.direct_member(entry, &mut tally);
                    if entry.has_flag(opt.compound_root) {
                        tally.word_count += 1;
                    }
                    if entry.has_flag(opt.forbidden_word) || entry.has_flag(ONLY_UPCASE_FLAG) {
                        continue 'mode;
                    }
                    let flag_ok =
                        entry.has_flag(opt.compound_flag) || entry.has_flag(opt.compound_end);
                    let entry_text: Vec<char> = entry.text.chars().collect();
                    let arity_ok = self.members_within(tally.word_count + 1)
                        || (opt.compound_max_syllable != 0
                            && tally.syllables + counter.count(&entry_text)
                                <= opt.compound_max_syllable as i32);
                    let dup_ok = !opt.check_compound_dup || !std::ptr::eq(entry, first_hit.entry);
                    if flag_ok && arity_ok && dup_ok {
                        let mut rec = presult.clone();
                        push_part(&mut rec, remainder, Some(entry));
                        result.push_record(&rec);
                        ok = true;
                    }
                }
                let mut tally = saved;

                // SECOND MEMBER, affixed
                let mut hit = if !rule_mode && opt.compound_flag != FLAG_NONE {
                    self.affix_check(remainder, opt.compound_flag, CompoundPos::Not)
                } else {
                    None
                };
                if hit.is_none() && !rule_mode && opt.compound_end != FLAG_NONE {
                    hit = self.affix_check(remainder, opt.compound_end, CompoundPos::Not);
                }
                if hit.is_none() && !cpd_rules.is_empty() && trace_active {
                    if let Some(h) = self.affix_check(remainder, FLAG_NONE, CompoundPos::End) {
                        if rules::def_compound_check(
                            cpd_rules,
                            &mut state.words,
                            wnum + 1,
                            h.entry,
                            true,
                        ) {
                            let mut rec = presult.clone();
                            let p = self.second_member_morph(remainder);
                            if !p.is_empty() {
                                push_part(&mut rec, remainder, None);
                                rec.push(' ');
                                rec.push_str(&squash(&p));
                            }
                            result.push_record(&rec);
                            ok = true;
                            hit = None;
                        }
                    }
                }
                if let Some(h) = hit {
                    if h.affix_continuation_has(opt.compound_forbid) {
                        hit = None;
                    } else if (h.entry.has_flag(opt.forbidden_word)
                        || h.entry.has_flag(ONLY_UPCASE_FLAG))
                        && !(opt.need_affix != FLAG_NONE && h.entry.has_flag(opt.need_affix))
                    {
                        continue 'mode;
                    }
                }
                if let Some(h) = hit {
                    self.heuristic.affixed_remainder(
                        remainder,
                        &h,
                        opt.compound_syllable_num.as_deref(),
                        &counter,
                        &mut tally,
                    );
                    if h.entry.has_flag(opt.compound_root) {
                        tally.word_count += 1;
                    }
                    let arity_ok = self.members_within(tally.word_count + 1)
                        || (opt.compound_max_syllable != 0
                            && tally.syllables <= opt.compound_max_syllable as i32);
                    let dup_ok = !opt.check_compound_dup || !std::ptr::eq(h.entry, first_hit.entry);
                    if arity_ok && dup_ok {
                        let p = self.second_member_morph(remainder);
                        if !p.is_empty() {
                            let mut rec = presult.clone();
                            push_part(&mut rec, remainder, None);
                            rec.push(' ');
                            rec.push_str(&squash(&p));
                            result.push_record(&rec);
                            ok = true;
                        }
                    }
                }
                let tally = saved;

                // SECOND MEMBER, itself a compound
                if tally.word_count + 2 < MAX_COMPOUND_MEMBERS && !ok {
                    self.compound_morph_step(
                        remainder,
                        CompoundTally {
                            word_count: tally.word_count + 1,
                            syllables: tally.syllables,
                        },
                        wnum + 1,
                        trace_active,
                        false,
                        state,
                        result,
                        &presult,
                    );
                }
            }
        }
    }

    /// The analysis of a final member: under the generic compound flag,
    /// falling back to the end flag.
    fn second_member_morph(&self, remainder: &[char]) -> MorphTrace {
        let opt = &self.data.options;
        let mut p = MorphTrace::new();
        if opt.compound_flag != FLAG_NONE {
            p = self.affix_check_morph(remainder, opt.compound_flag, CompoundPos::Not);
        }
        if p.is_empty() && opt.compound_end != FLAG_NONE {
            p = self.affix_check_morph(remainder, opt.compound_end, CompoundPos::Not);
        }
        p
    }
}

/// Append one `pa:` member field, with the entry's stem and annotation
/// when it came straight from the dictionary.
fn push_part(buf: &mut String, span: &[char], entry: Option<&WordEntry>) {
    buf.push(' ');
    buf.push_str(TAG_PART);
    buf.extend(span.iter());
    if let Some(e) = entry {
        let has_stem = e.morph.as_deref().is_some_and(|m| m.contains(TAG_STEM));
        if !has_stem {
            buf.push(' ');
            buf.push_str(TAG_STEM);
            buf.push_str(&e.text);
        }
        if let Some(m) = e.morph.as_deref() {
            buf.push(' ');
            buf.push_str(m);
        }
    }
}

/// Collapse a multi-record affix analysis into a single field value,
/// alternatives separated and duplicates dropped.
fn squash(trace: &MorphTrace) -> String {
    let mut seen: Vec<&str> = Vec::new();
    for record in trace.records() {
        let record = record.trim();
        if !seen.contains(&record) {
            seen.push(record);
        }
    }
    seen.join(&ALT_SEPARATOR.to_string())
}
