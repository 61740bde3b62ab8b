// The compound segmenter: splits a word into dictionary-valid members
// under flag, pattern, case, and arity constraints, bounded by a shared
// wall-clock deadline.

pub mod heuristic;
mod morph;
mod rules;

use std::time::{Duration, Instant};

use morfo_core::case::capital_type;
use morfo_core::entry::WordEntry;
use morfo_core::flags::{FlagId, FLAG_NONE, ONLY_UPCASE_FLAG};

use crate::checker::{AffixHit, Checker, CompoundPos};
use crate::rules::JunctionText;

use heuristic::{CompoundTally, SyllableCounter};

/// Wall-clock budget for one top-level segmentation. The number of ways a
/// long word can be split is exponential; the deadline is the single
/// safety valve.
const COMPOUND_TIME_LIMIT: Duration = Duration::from_millis(50);

/// Capacity of the member trace. Also the recursion bound: a segmentation
/// never goes deeper than this many members, regardless of input.
pub const MAX_COMPOUND_MEMBERS: usize = 100;

/// Caller-supplied context for one segmentation.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompoundProbe {
    /// The check runs on behalf of the suggestion engine: entries marked
    /// no-suggest are rejected as members.
    pub is_suggestion: bool,
    /// The original spelling was capitalized, satisfying force-uppercase
    /// members.
    pub origin_capitalized: bool,
    /// Accept loose members through the heuristic hooks (partial-compound
    /// probing).
    pub mov_rule: bool,
}

impl CompoundProbe {
    /// Derive the capitalization context from the original spelling. The
    /// segmenter itself runs on the case-folded word; force-uppercase
    /// members only care how the word was written.
    pub fn for_word(original: &[char]) -> Self {
        Self {
            origin_capitalized: capital_type(original).is_capitalized(),
            ..Self::default()
        }
    }
}

/// Per-call segmentation state, shared down the recursion: the deadline
/// and the member trace the compound-rule grammar is matched against.
struct CompoundState<'a> {
    deadline: Instant,
    is_suggestion: bool,
    origin_capitalized: bool,
    words: Vec<Option<&'a WordEntry>>,
}

impl<'a> Checker<'a> {
    /// Is `word` a legal compound?
    ///
    /// Returns the first accepted member; the remainder was validated as a
    /// final member or, recursively, as a compound of its own. `None`
    /// covers every negative outcome, the elapsed deadline included.
    pub fn compound_check(&self, word: &[char], probe: CompoundProbe) -> Option<&'a WordEntry> {
        let mut state = CompoundState {
            deadline: Instant::now() + COMPOUND_TIME_LIMIT,
            is_suggestion: probe.is_suggestion,
            origin_capitalized: probe.origin_capitalized,
            words: vec![None; MAX_COMPOUND_MEMBERS],
        };
        self.compound_step(
            word,
            CompoundTally::default(),
            0,
            false,
            probe.mov_rule,
            &mut state,
        )
    }

    /// One recursion level: try every split of `word` into a first member
    /// and a remainder. `tally.word_count` is the number of members
    /// accepted so far, `wnum` this level's slot in the member trace.
    fn compound_step(
        &self,
        word: &[char],
        tally: CompoundTally,
        wnum: usize,
        use_trace: bool,
        mov_rule: bool,
        state: &mut CompoundState<'a>,
    ) -> Option<&'a WordEntry> {
        let opt = &self.data.options;
        let patterns = &self.data.compound_patterns;
        let cpd_rules = &self.data.compound_rules;
        let counter = SyllableCounter::new(&opt.compound_vowels, opt.compound_max_syllable);
        let word_num = tally.word_count;

        let cmin = opt.compound_min;
        let cmax = (word.len() + 1).saturating_sub(cmin);

        // Flag mode first, then -- at the top level, when a rule grammar is
        // configured -- rule mode. A recursion level that already collects
        // a trace stays in rule mode.
        let modes: &[bool] = if use_trace {
            &[true]
        } else if !cpd_rules.is_empty() && word_num == 0 {
            &[false, true]
        } else {
            &[false]
        };

        for i in cmin..cmax {
            for &rule_mode in modes {
                let mut trace_active = use_trace;
                let simplified = !rule_mode && self.data.has_simplified_junctions();
                // 1-based index into the junction-pattern table; 0 is the
                // unrewritten attempt.
                let mut scpd: usize = 0;

                'junction: loop {
                    if Instant::now() >= state.deadline {
                        return None;
                    }

                    // Rewrite the junction when a simplified pattern
                    // spells it differently in the written word.
                    let mut rewritten: Option<Vec<char>> = None;
                    let mut split = i;
                    let mut scpd_left_cond = FLAG_NONE;
                    let mut scpd_right_cond = FLAG_NONE;
                    if scpd > 0 {
                        while scpd <= patterns.len() {
                            let p = &patterns[scpd - 1];
                            let fits = p.simplified_text.as_ref().is_some_and(|simp| {
                                !simp.is_empty()
                                    && i < word.len()
                                    && word[i..].starts_with(simp)
                            });
                            if fits {
                                break;
                            }
                            scpd += 1;
                        }
                        if scpd > patterns.len() {
                            break 'junction;
                        }
                        let p = &patterns[scpd - 1];
                        let simp = p.simplified_text.as_ref().unwrap();
                        let left: &[char] = match &p.left_text {
                            JunctionText::Literal(l) => l,
                            _ => &[],
                        };
                        let mut st = Vec::with_capacity(
                            word.len() + left.len() + p.right_text.len() - simp.len(),
                        );
                        st.extend_from_slice(&word[..i]);
                        st.extend_from_slice(left);
                        st.extend_from_slice(&p.right_text);
                        st.extend_from_slice(&word[i + simp.len()..]);
                        split = i + left.len();
                        rewritten = Some(st);
                        scpd_left_cond = p.left_cond;
                        scpd_right_cond = p.right_cond;
                    }
                    let st: &[char] = rewritten.as_deref().unwrap_or(word);
                    if split >= st.len() {
                        return None;
                    }
                    let member = &st[..split];

                    // FIRST MEMBER, direct dictionary entry
                    let homonyms = self.lexicon.homonyms(member);

                    // a compound-forbidden stem overrides any permit
                    if let Some(head) = homonyms.first() {
                        if head.has_flag(opt.compound_forbid) && !mov_rule {
                            if scpd == 0 {
                                break 'junction;
                            }
                            scpd += 1;
                            continue 'junction;
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
                            if !gate {
                                continue;
                            }
                            if scpd != 0
                                && scpd_left_cond != FLAG_NONE
                                && !entry.has_flag(scpd_left_cond)
                            {
                                continue;
                            }
                            if rule_mode {
                                trace_active = true;
                            }
                            first_direct = Some(entry);
                            break;
                        }
                    }

                    let mut checked_prefix = false;
                    let mut first: Option<AffixHit<'a>> = match first_direct {
                        Some(entry) => {
                            if entry.has_flag(opt.forbidden_word)
                                || entry.has_flag(ONLY_UPCASE_FLAG)
                                || (opt.need_affix != FLAG_NONE
                                    && entry.has_flag(opt.need_affix))
                                || (state.is_suggestion && entry.has_flag(opt.no_suggest))
                            {
                                break 'junction;
                            }
                            Some(AffixHit::bare(entry))
                        }
                        None if rule_mode => break 'junction,
                        None => {
                            let hit = self.first_member_affixed(member, word_num, mov_rule);
                            checked_prefix = hit.is_some();
                            hit
                        }
                    };

                    // an affix that forbids compounding vetoes the member
                    if let Some(h) = first {
                        if !mov_rule && h.affix_continuation_has(opt.compound_forbid) {
                            first = None;
                        }
                    }
                    if let Some(h) = first {
                        if h.entry.has_flag(opt.forbidden_word)
                            || h.entry.has_flag(ONLY_UPCASE_FLAG)
                            || (state.is_suggestion && h.entry.has_flag(opt.no_suggest))
                        {
                            return None;
                        }
                    }

                    let mut tally = tally;
                    if let Some(h) = first {
                        if h.entry.has_flag(opt.compound_root) {
                            tally.word_count += 1;
                        }
                    }

                    let accepted = self.first_member_ok(
                        first,
                        member,
                        word,
                        i,
                        word_num,
                        checked_prefix,
                        trace_active,
                        scpd,
                        scpd_left_cond,
                        wnum,
                        mov_rule,
                        state,
                    );

                    if let Some(first_hit) = accepted {
                        self.heuristic
                            .first_member(member, first_hit.prefix, &counter, &mut tally);

                        if let Some(found) = self.remainder_check(
                            first_hit,
                            word,
                            st,
                            i,
                            split,
                            tally,
                            wnum,
                            trace_active,
                            rule_mode,
                            scpd,
                            scpd_right_cond,
                            &counter,
                            state,
                        )? {
                            return Some(found);
                        }
                    }

                    scpd += 1;
                    if !(simplified && scpd <= patterns.len()) {
                        break 'junction;
                    }
                }
            }
        }
        None
    }

    /// Validate a first member through the affix checker under the
    /// compound flags appropriate for its position.
    fn first_member_affixed(
        &self,
        member: &[char],
        word_num: usize,
        mov_rule: bool,
    ) -> Option<AffixHit<'a>> {
        let opt = &self.data.options;
        let pos = if mov_rule {
            CompoundPos::Other
        } else {
            CompoundPos::Begin
        };
        let more = opt.compound_more_suffixes;

        if opt.compound_flag != FLAG_NONE {
            if let Some(hit) = self.prefix_check(member, pos, opt.compound_flag) {
                return Some(hit);
            }
            let sfx_hit = self
                .suffix_check(member, None, FLAG_NONE, opt.compound_flag, pos)
                .or_else(|| {
                    more.then(|| self.suffix_check_twofold(member, None, opt.compound_flag))
                        .flatten()
                });
            if let Some(hit) = sfx_hit {
                // a suffix that forbids compounding or closes a compound
                // cannot open one
                let closes = hit.suffix.is_some_and(|s| {
                    s.continuation_has(opt.compound_forbid)
                        || s.continuation_has(opt.compound_end)
                });
                if mov_rule || !closes {
                    return Some(hit);
                }
            }
        }

        let position_flag = if word_num == 0 {
            opt.compound_begin
        } else {
            opt.compound_middle
        };
        if position_flag == FLAG_NONE {
            return None;
        }
        self.suffix_check(member, None, FLAG_NONE, position_flag, pos)
            .or_else(|| {
                more.then(|| self.suffix_check_twofold(member, None, position_flag))
                    .flatten()
            })
            .or_else(|| self.prefix_check(member, pos, position_flag))
    }

    /// The ordered acceptance test for a first member: position flags,
    /// junction conditions, and the boundary vetoes.
    #[allow(clippy::too_many_arguments)]
    fn first_member_ok(
        &self,
        first: Option<AffixHit<'a>>,
        member: &[char],
        word: &[char],
        i: usize,
        word_num: usize,
        checked_prefix: bool,
        trace_active: bool,
        scpd: usize,
        scpd_left_cond: FlagId,
        wnum: usize,
        mov_rule: bool,
        state: &CompoundState<'a>,
    ) -> Option<AffixHit<'a>> {
        let opt = &self.data.options;
        if let Some(h) = first {
            let member_ok = checked_prefix
                || (trace_active && state.words[wnum].is_some())
                || h.entry.has_flag(opt.compound_flag)
                || (word_num == 0 && h.entry.has_flag(opt.compound_begin))
                || (word_num > 0 && h.entry.has_flag(opt.compound_middle))
                || (mov_rule && self.heuristic.loose_member(h.entry));
            let junction_ok =
                scpd == 0 || scpd_left_cond == FLAG_NONE || h.entry.has_flag(scpd_left_cond);
            let vetoed = (opt.check_compound_triple
                && scpd == 0
                && !trace_active
                && violates_triple(word, i))
                || (opt.check_compound_case
                    && scpd == 0
                    && !trace_active
                    && violates_case(word, i));
            (member_ok && junction_ok && !vetoed).then_some(h)
        } else if mov_rule {
            // partial-compound probe: any affixed reading the heuristic
            // recognizes will do
            self.affix_check(member, FLAG_NONE, CompoundPos::Not)
                .filter(|h| self.heuristic.loose_affixed(h))
        } else {
            None
        }
    }

    /// Try the remainder after an accepted first member: as a direct final
    /// member, as an affixed final member, and as a nested compound.
    ///
    /// Two layers of negative result: the outer `None` aborts every
    /// remaining split of this recursion level (a forbidden word or a
    /// typo-probe hit poisons the whole reading), while `Some(None)` just
    /// fails this split and lets the caller try the next one.
    #[allow(clippy::too_many_arguments)]
    fn remainder_check(
        &self,
        first_hit: AffixHit<'a>,
        word: &[char],
        st: &[char],
        i: usize,
        split: usize,
        tally: CompoundTally,
        wnum: usize,
        trace_active: bool,
        rule_mode: bool,
        scpd: usize,
        scpd_right_cond: FlagId,
        counter: &SyllableCounter<'_>,
        state: &mut CompoundState<'a>,
    ) -> Option<Option<&'a WordEntry>> {
        let opt = &self.data.options;
        let cpd_rules = &self.data.compound_rules;
        let first_entry = first_hit.entry;

        let mut striple = false;
        let mut pass = 0;
        loop {
            // With the simplified-triple option, a boundary that swallowed
            // a doubled letter is retried with the letter restored: the
            // remainder starts one character earlier on the second pass.
            let mut rem_start = split;
            let mut bi = i;
            if opt.simplified_triple {
                if striple && pass == 1 {
                    rem_start = split - 1;
                    bi = i - 1;
                } else if pass == 0 && i > 2 && i <= word.len() && word[i - 1] == word[i - 2] {
                    striple = true;
                }
            }
            let remainder = &st[rem_start..];

            // SECOND MEMBER, direct dictionary entry
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
                if !gate {
                    continue;
                }
                if scpd != 0 && scpd_right_cond != FLAG_NONE && !entry.has_flag(scpd_right_cond)
                {
                    continue;
                }
                second = Some(entry);
                break;
            }

            if let Some(entry) = second {
                if entry.has_flag(opt.force_ucase) && !state.origin_capitalized {
                    second = None;
                } else if trace_active && state.words[wnum + 1].is_some() {
                    // the rule grammar matched the full member chain
                    return Some(Some(first_entry));
                }
            }

            let saved = tally;
            let mut tally = tally;
            if let Some(entry) = second {
                self.heuristic.direct_member(entry, &mut tally);
                if entry.has_flag(opt.compound_root) {
                    tally.word_count += 1;
                }
                if entry.has_flag(opt.forbidden_word)
                    || entry.has_flag(ONLY_UPCASE_FLAG)
                    || (state.is_suggestion && entry.has_flag(opt.no_suggest))
                {
                    return None;
                }

                // acceptable as a bare final member?
                let flag_ok =
                    entry.has_flag(opt.compound_flag) || entry.has_flag(opt.compound_end);
                let entry_text: Vec<char> = entry.text.chars().collect();
                let arity_ok = self.members_within(tally.word_count + 1)
                    || (opt.compound_max_syllable != 0
                        && tally.syllables + counter.count(&entry_text)
                            <= opt.compound_max_syllable as i32);
                let junction_ok = self.data.compound_patterns.is_empty()
                    || scpd != 0
                    || (bi < word.len()
                        && !self.junction_forbidden(word, bi, Some(first_entry), Some(entry)));
                let dup_ok = !opt.check_compound_dup || !std::ptr::eq(entry, first_entry);
                let scpd_ok = scpd == 0
                    || scpd_right_cond == FLAG_NONE
                    || entry.has_flag(scpd_right_cond);
                if flag_ok && arity_ok && junction_ok && dup_ok && scpd_ok {
                    if (opt.check_compound_rep && self.rep_probe(word))
                        || self.word_pair_probe(word)
                    {
                        return None;
                    }
                    return Some(Some(first_entry));
                }
            }
            let mut tally = saved;

            // SECOND MEMBER, affixed
            let mut hit = if !rule_mode && opt.compound_flag != FLAG_NONE {
                self.affix_check(remainder, opt.compound_flag, CompoundPos::End)
            } else {
                None
            };
            if hit.is_none() && !rule_mode && opt.compound_end != FLAG_NONE {
                hit = self.affix_check(remainder, opt.compound_end, CompoundPos::End);
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
                        return Some(Some(first_entry));
                    }
                }
            }
            if let Some(h) = hit {
                if scpd != 0
                    && scpd_right_cond != FLAG_NONE
                    && !h.entry.has_flag(scpd_right_cond)
                {
                    hit = None;
                } else if !self.data.compound_patterns.is_empty()
                    && scpd == 0
                    && self.junction_forbidden(word, bi, Some(first_entry), Some(h.entry))
                {
                    hit = None;
                } else if h.affix_continuation_has(opt.compound_forbid) {
                    hit = None;
                } else if h.entry.has_flag(opt.force_ucase) && !state.origin_capitalized {
                    hit = None;
                }
            }
            if let Some(h) = hit {
                if h.entry.has_flag(opt.forbidden_word)
                    || h.entry.has_flag(ONLY_UPCASE_FLAG)
                    || (state.is_suggestion && h.entry.has_flag(opt.no_suggest))
                {
                    return None;
                }
                self.heuristic.affixed_remainder(
                    remainder,
                    &h,
                    opt.compound_syllable_num.as_deref(),
                    counter,
                    &mut tally,
                );
                if h.entry.has_flag(opt.compound_root) {
                    tally.word_count += 1;
                }
                let arity_ok = self.members_within(tally.word_count + 1)
                    || (opt.compound_max_syllable != 0
                        && tally.syllables <= opt.compound_max_syllable as i32);
                let dup_ok = !opt.check_compound_dup || !std::ptr::eq(h.entry, first_entry);
                if arity_ok && dup_ok {
                    if (opt.check_compound_rep && self.rep_probe(word))
                        || self.word_pair_probe(word)
                    {
                        return None;
                    }
                    return Some(Some(first_entry));
                }
            }
            let tally = saved;

            // SECOND MEMBER, itself a compound
            if tally.word_count + 2 < MAX_COMPOUND_MEMBERS {
                let mut deeper = self.compound_step(
                    remainder,
                    CompoundTally {
                        word_count: tally.word_count + 1,
                        syllables: tally.syllables,
                    },
                    wnum + 1,
                    trace_active,
                    false,
                    state,
                );
                if let Some(entry) = deeper {
                    if !self.data.compound_patterns.is_empty() && bi < word.len() {
                        let forbidden = self.junction_forbidden(
                            word,
                            bi,
                            Some(first_entry),
                            Some(entry),
                        );
                        // unrewritten boundaries must avoid the junction
                        // patterns; rewritten ones must match theirs
                        if (scpd == 0 && forbidden) || (scpd != 0 && !forbidden) {
                            deeper = None;
                        }
                    }
                }
                if let Some(entry) = deeper {
                    if self.word_pair_probe(word) {
                        return None;
                    }
                    if opt.check_compound_rep || opt.forbidden_word != FLAG_NONE {
                        if opt.check_compound_rep && self.rep_probe(word) {
                            return None;
                        }
                        let entry_text: Vec<char> = entry.text.chars().collect();
                        if remainder.starts_with(&entry_text) {
                            // the nested compound's first member closes a
                            // two-member reading; probe that reading too
                            let head = &st[..rem_start + entry_text.len()];
                            if (opt.check_compound_rep && self.rep_probe(head))
                                || self.word_pair_probe(head)
                            {
                                // reads like a typo; fall through to the
                                // next simplified-triple pass, if any
                                pass += 1;
                                if striple && pass < 2 {
                                    continue;
                                }
                                break;
                            }
                            if opt.forbidden_word != FLAG_NONE {
                                if let Some(whole) = self.probe_whole_word(word) {
                                    if whole.has_flag(opt.forbidden_word)
                                        && whole.text.chars().count() >= head.len()
                                        && whole
                                            .text
                                            .chars()
                                            .take(head.len())
                                            .eq(head.iter().copied())
                                    {
                                        return None;
                                    }
                                }
                            }
                        }
                    }
                    return Some(Some(first_entry));
                }
            }

            pass += 1;
            if !(striple && pass < 2) {
                break;
            }
        }
        Some(None)
    }

    /// The arity limit: unlimited, or strictly fewer members than the cap.
    fn members_within(&self, members: usize) -> bool {
        self.data
            .options
            .compound_word_max
            .map_or(true, |max| members < max)
    }

    /// Whole word as a simple (possibly affixed) non-compound reading.
    fn probe_whole_word(&self, word: &[char]) -> Option<&'a WordEntry> {
        self.lexicon
            .lookup(word)
            .or_else(|| self.affix_check(word, FLAG_NONE, CompoundPos::Not).map(|h| h.entry))
    }

    /// Does any junction pattern fire at `pos`?
    fn junction_forbidden(
        &self,
        word: &[char],
        pos: usize,
        first: Option<&WordEntry>,
        second: Option<&WordEntry>,
    ) -> bool {
        for p in &self.data.compound_patterns {
            if !subset_at(&p.right_text, &word[pos..]) {
                continue;
            }
            if let Some(r1) = first {
                if p.left_cond != FLAG_NONE && !r1.has_flag(p.left_cond) {
                    continue;
                }
            }
            if let Some(r2) = second {
                if p.right_cond != FLAG_NONE && !r2.has_flag(p.right_cond) {
                    continue;
                }
            }
            let left_ok = match &p.left_text {
                JunctionText::None => true,
                JunctionText::UnmodifiedStem => first.is_some_and(|r1| {
                    let stem: Vec<char> = r1.text.chars().collect();
                    stem.len() <= pos && word[pos - stem.len()..pos] == stem[..]
                }),
                JunctionText::Literal(l) => {
                    !l.is_empty() && l.len() <= pos && word[pos - l.len()..pos] == l[..]
                }
            };
            if left_ok {
                return true;
            }
        }
        false
    }

    /// Would a single common-misspelling substitution turn `word` into a
    /// plain (non-compound) word? If so the compound reading is more
    /// likely a typo.
    fn rep_probe(&self, word: &[char]) -> bool {
        if word.len() < 2 || self.data.rep_table.is_empty() {
            return false;
        }
        for rep in &self.data.rep_table {
            if rep.replacement.is_empty() || rep.pattern.is_empty() {
                continue;
            }
            let plen = rep.pattern.len();
            if plen > word.len() {
                continue;
            }
            for at in 0..=word.len() - plen {
                if word[at..at + plen] == rep.pattern[..] {
                    let mut candidate =
                        Vec::with_capacity(word.len() - plen + rep.replacement.len());
                    candidate.extend_from_slice(&word[..at]);
                    candidate.extend_from_slice(&rep.replacement);
                    candidate.extend_from_slice(&word[at + plen..]);
                    if self.simple_reading_exists(&candidate) {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Is the word already listed as a two-word pair with a space?
    fn word_pair_probe(&self, word: &[char]) -> bool {
        if word.len() <= 2 {
            return false;
        }
        let mut candidate = Vec::with_capacity(word.len() + 1);
        for at in 1..word.len() - 1 {
            candidate.clear();
            candidate.extend_from_slice(&word[..at]);
            candidate.push(' ');
            candidate.extend_from_slice(&word[at..]);
            if self.simple_reading_exists(&candidate) {
                return true;
            }
        }
        false
    }

    fn simple_reading_exists(&self, candidate: &[char]) -> bool {
        !self.lexicon.homonyms(candidate).is_empty()
            || self
                .affix_check(candidate, FLAG_NONE, CompoundPos::Not)
                .is_some()
    }
}

/// Three identical letters meet at the boundary.
fn violates_triple(word: &[char], i: usize) -> bool {
    if i == 0 || i >= word.len() {
        return false;
    }
    word[i - 1] == word[i]
        && ((i > 1 && word[i - 1] == word[i - 2])
            || (i + 1 < word.len() && word[i - 1] == word[i + 1]))
}

/// An uppercase letter touches the boundary and no hyphen intervenes.
fn violates_case(word: &[char], i: usize) -> bool {
    if i == 0 || i >= word.len() {
        return false;
    }
    let (a, b) = (word[i - 1], word[i]);
    (a.is_uppercase() || b.is_uppercase()) && a != '-' && b != '-'
}

/// Whether `key` lines up with the start of `span`, `.` matching any
/// character.
fn subset_at(key: &[char], span: &[char]) -> bool {
    key.len() <= span.len() && key.iter().zip(span).all(|(&k, &c)| k == c || k == '.')
}

#[cfg(test)]
mod tests;
