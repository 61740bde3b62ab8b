// Matching member flag sequences against compound rule patterns.
//
// A compound rule is a tiny regular expression over flag sets rather than
// text: literal flag tokens, `*` (zero or more of the preceding flag), and
// `?` (zero or one). The segmenter matches the flags collected so far in
// partial mode while members are still being gathered, and in exact mode
// once a candidate final member is in place.

use morfo_core::entry::WordEntry;
use morfo_core::flags::FlagSet;

use crate::rules::{CompoundRule, CompoundRuleToken};

impl CompoundRule {
    /// Match a sequence of member flag sets against this rule.
    ///
    /// With `exact`, the whole pattern must be consumed along with the
    /// whole sequence (trailing wildcards may match empty). Without it, the
    /// sequence only has to be a viable prefix of the pattern -- the mode
    /// used while members are still being collected.
    pub fn matches(&self, members: &[&FlagSet], exact: bool) -> bool {
        match_from(&self.tokens, members, 0, exact)
    }
}

/// Backtracking happens through the recursion: each wildcard tries the
/// zero-width reading first and re-enters with one more member consumed on
/// failure. Depth is bounded by pattern length plus member count.
fn match_from(tokens: &[CompoundRuleToken], members: &[&FlagSet], at: usize, exact: bool) -> bool {
    if members.is_empty() {
        // sequence consumed: a prefix match is already a success, an exact
        // match still needs the rest of the pattern to be skippable
        return !exact || skippable(&tokens[at..]);
    }
    let Some(&token) = tokens.get(at) else {
        // pattern exhausted with members left over
        return false;
    };
    let CompoundRuleToken::Flag(flag) = token else {
        // a dangling wildcard without its flag never matches anything
        return false;
    };
    match tokens.get(at + 1) {
        Some(CompoundRuleToken::ZeroOrMore) => {
            match_from(tokens, members, at + 2, exact)
                || (members[0].contains(flag) && match_from(tokens, &members[1..], at, exact))
        }
        Some(CompoundRuleToken::ZeroOrOne) => {
            match_from(tokens, members, at + 2, exact)
                || (members[0].contains(flag) && match_from(tokens, &members[1..], at + 2, exact))
        }
        _ => members[0].contains(flag) && match_from(tokens, &members[1..], at + 1, exact),
    }
}

/// Whether a pattern tail can match the empty sequence.
fn skippable(tokens: &[CompoundRuleToken]) -> bool {
    let mut at = 0;
    while at < tokens.len() {
        if matches!(tokens[at], CompoundRuleToken::Flag(_))
            && matches!(
                tokens.get(at + 1),
                Some(CompoundRuleToken::ZeroOrMore) | Some(CompoundRuleToken::ZeroOrOne)
            )
        {
            at += 2;
        } else {
            return false;
        }
    }
    true
}

/// Whether `flags` carries any literal flag mentioned by any rule. Cheap
/// pre-filter before the per-rule matching.
pub(crate) fn rules_mention(rules: &[CompoundRule], flags: &FlagSet) -> bool {
    rules.iter().any(|rule| {
        rule.tokens.iter().any(|t| match t {
            CompoundRuleToken::Flag(f) => flags.contains(*f),
            _ => false,
        })
    })
}

/// Install `entry` as member `slot` of the trace and test whether the
/// member sequence so far satisfies some rule (as a viable prefix, or
/// exactly). On failure the slot is cleared again; on success it stays, so
/// the caller can detect a fully matched chain.
pub(crate) fn def_compound_check<'a>(
    rules: &[CompoundRule],
    words: &mut [Option<&'a WordEntry>],
    slot: usize,
    entry: &'a WordEntry,
    exact: bool,
) -> bool {
    words[slot] = Some(entry);
    if entry.flags.is_empty() || !rules_mention(rules, &entry.flags) {
        words[slot] = None;
        return false;
    }
    let mut seq: Vec<&FlagSet> = Vec::with_capacity(slot + 1);
    for filled in &words[..=slot] {
        match filled {
            Some(e) => seq.push(&e.flags),
            None => {
                words[slot] = None;
                return false;
            }
        }
    }
    if rules.iter().any(|rule| rule.matches(&seq, exact)) {
        return true;
    }
    words[slot] = None;
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use morfo_core::flags::FlagId;

    const A: FlagId = 'A' as FlagId;
    const B: FlagId = 'B' as FlagId;
    const C: FlagId = 'C' as FlagId;
    const D: FlagId = 'D' as FlagId;

    use CompoundRuleToken::{Flag, ZeroOrMore, ZeroOrOne};

    fn sets(flags: &[FlagId]) -> Vec<FlagSet> {
        flags.iter().map(|&f| FlagSet::new(vec![f])).collect()
    }

    fn matches(rule: &CompoundRule, flags: &[FlagId], exact: bool) -> bool {
        let owned = sets(flags);
        let refs: Vec<&FlagSet> = owned.iter().collect();
        rule.matches(&refs, exact)
    }

    #[test]
    fn literal_sequence() {
        let rule = CompoundRule::new(vec![Flag(A), Flag(B)]);
        assert!(matches(&rule, &[A, B], true));
        assert!(!matches(&rule, &[A], true));
        assert!(!matches(&rule, &[B, A], true));
        assert!(!matches(&rule, &[A, B, B], true));
    }

    #[test]
    fn star_consumes_zero_or_more() {
        // A B* C
        let rule = CompoundRule::new(vec![Flag(A), Flag(B), ZeroOrMore, Flag(C)]);
        assert!(matches(&rule, &[A, B, B, C], true));
        assert!(matches(&rule, &[A, C], true));
        assert!(!matches(&rule, &[A, B, D], true));
    }

    #[test]
    fn question_is_bounded_to_one() {
        let rule = CompoundRule::new(vec![Flag(A), Flag(B), ZeroOrOne, Flag(C)]);
        assert!(matches(&rule, &[A, C], true));
        assert!(matches(&rule, &[A, B, C], true));
        assert!(!matches(&rule, &[A, B, B, C], true));
    }

    #[test]
    fn trailing_wildcards_may_match_empty() {
        let rule = CompoundRule::new(vec![Flag(A), Flag(B), ZeroOrMore]);
        assert!(matches(&rule, &[A], true));
        assert!(matches(&rule, &[A, B, B], true));
    }

    #[test]
    fn partial_mode_accepts_viable_prefixes() {
        let rule = CompoundRule::new(vec![Flag(A), Flag(B), Flag(C)]);
        assert!(matches(&rule, &[A], false));
        assert!(matches(&rule, &[A, B], false));
        // a full match is also a viable prefix
        assert!(matches(&rule, &[A, B, C], false));
        // but a wrong member is not
        assert!(!matches(&rule, &[B], false));
        assert!(!matches(&rule, &[A, C], false));
        // and exact mode still wants the whole pattern
        assert!(!matches(&rule, &[A, B], true));
    }

    #[test]
    fn member_with_several_flags() {
        let rule = CompoundRule::new(vec![Flag(A), Flag(B)]);
        let m1 = FlagSet::new(vec![A, D]);
        let m2 = FlagSet::new(vec![B, C]);
        assert!(rule.matches(&[&m1, &m2], true));
    }

    #[test]
    fn def_check_installs_and_clears_slots() {
        let rules = vec![CompoundRule::new(vec![Flag(A), Flag(B)])];
        let e1 = WordEntry::new("one", FlagSet::new(vec![A]));
        let e2 = WordEntry::new("two", FlagSet::new(vec![B]));
        let bad = WordEntry::new("bad", FlagSet::new(vec![D]));
        let mut words: Vec<Option<&WordEntry>> = vec![None; 4];

        assert!(def_compound_check(&rules, &mut words, 0, &e1, false));
        assert!(words[0].is_some());

        // a member no rule mentions clears its slot
        assert!(!def_compound_check(&rules, &mut words, 1, &bad, false));
        assert!(words[1].is_none());

        assert!(def_compound_check(&rules, &mut words, 1, &e2, true));
        assert!(words[1].is_some());
    }

    #[test]
    fn def_check_exact_needs_the_whole_pattern() {
        let rules = vec![CompoundRule::new(vec![Flag(A), Flag(B), Flag(C)])];
        let e1 = WordEntry::new("one", FlagSet::new(vec![A]));
        let e2 = WordEntry::new("two", FlagSet::new(vec![B]));
        let mut words: Vec<Option<&WordEntry>> = vec![None; 4];
        assert!(def_compound_check(&rules, &mut words, 0, &e1, false));
        assert!(!def_compound_check(&rules, &mut words, 1, &e2, true));
        assert!(words[1].is_none());
    }
}
