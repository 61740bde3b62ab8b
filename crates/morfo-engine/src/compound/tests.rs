use std::time::Instant;

use morfo_core::entry::MemoryLexicon;
use morfo_core::flags::{FlagId, FlagSet};

use crate::checker::Checker;
use crate::compound::heuristic::MagyarHeuristic;
use crate::compound::CompoundProbe;
use crate::rules::{
    AffixData, AffixOptions, AffixRule, CheckCompoundPattern, CompoundRule, CompoundRuleToken,
    RepEntry, Side,
};

const B: FlagId = 'B' as FlagId; // compound begin
const M: FlagId = 'M' as FlagId; // compound middle
const E: FlagId = 'E' as FlagId; // compound end
const C: FlagId = 'C' as FlagId; // compound anywhere
const S: FlagId = 'S' as FlagId; // suffix rule
const PERMIT: FlagId = 'P' as FlagId;
const UCASE: FlagId = 'U' as FlagId;

fn chars(s: &str) -> Vec<char> {
    s.chars().collect()
}

fn positional_options() -> AffixOptions {
    AffixOptions {
        compound_begin: B,
        compound_middle: M,
        compound_end: E,
        ..AffixOptions::default()
    }
}

fn lexicon(entries: &[(&str, &[FlagId])]) -> MemoryLexicon {
    let mut lex = MemoryLexicon::new();
    for (text, flags) in entries {
        lex.insert(text, FlagSet::new(flags.to_vec()));
    }
    lex
}

fn check(data: &AffixData, lex: &MemoryLexicon, word: &str) -> Option<String> {
    let checker = Checker::new(data, lex);
    checker
        .compound_check(&chars(word), CompoundProbe::default())
        .map(|e| e.text.clone())
}

#[test]
fn two_member_compound() {
    let data = AffixData::build(vec![], vec![], positional_options()).unwrap();
    let lex = lexicon(&[("sun", &[B]), ("flower", &[E])]);
    // the first accepted member is reported, i.e. the split sits at 3
    assert_eq!(check(&data, &lex, "sunflower"), Some("sun".to_string()));
    assert_eq!(check(&data, &lex, "flowersun"), None);
    assert_eq!(check(&data, &lex, "sunflowers"), None);
    // single members are not compounds
    assert_eq!(check(&data, &lex, "flower"), None);
}

#[test]
fn generic_compound_flag_allows_any_position() {
    let options = AffixOptions {
        compound_flag: C,
        ..AffixOptions::default()
    };
    let data = AffixData::build(vec![], vec![], options).unwrap();
    let lex = lexicon(&[("boek", &[C]), ("kast", &[C]), ("deur", &[C])]);
    assert_eq!(check(&data, &lex, "boekkast"), Some("boek".to_string()));
    assert_eq!(check(&data, &lex, "boekkastdeur"), Some("boek".to_string()));
}

#[test]
fn members_shorter_than_compound_min_are_rejected() {
    let options = AffixOptions {
        compound_min: 4,
        ..positional_options()
    };
    let data = AffixData::build(vec![], vec![], options).unwrap();
    let lex = lexicon(&[("sun", &[B]), ("flower", &[E])]);
    assert_eq!(check(&data, &lex, "sunflower"), None);
}

#[test]
fn three_members_need_middle_flag() {
    let data = AffixData::build(vec![], vec![], positional_options()).unwrap();
    let lex = lexicon(&[("sun", &[B]), ("flower", &[M]), ("seed", &[E])]);
    assert_eq!(check(&data, &lex, "sunflowerseed"), Some("sun".to_string()));
    // without the middle flag the inner member has no licence
    let lex = lexicon(&[("sun", &[B]), ("flower", &[]), ("seed", &[E])]);
    assert_eq!(check(&data, &lex, "sunflowerseed"), None);
}

#[test]
fn member_count_limit() {
    let limited = AffixOptions {
        compound_word_max: Some(2),
        ..positional_options()
    };
    let data = AffixData::build(vec![], vec![], limited).unwrap();
    let lex = lexicon(&[("sun", &[B]), ("flower", &[M]), ("seed", &[E])]);
    // three members but only two allowed
    assert_eq!(check(&data, &lex, "sunflowerseed"), None);
    // two members stay fine
    let lex2 = lexicon(&[("sun", &[B]), ("seed", &[E])]);
    assert_eq!(check(&data, &lex2, "sunseed"), Some("sun".to_string()));
}

#[test]
fn duplicate_member_veto() {
    let options = AffixOptions {
        check_compound_dup: true,
        ..positional_options()
    };
    let data = AffixData::build(vec![], vec![], options).unwrap();
    let lex = lexicon(&[("tam", &[B, E])]);
    assert_eq!(check(&data, &lex, "tamtam"), None);

    let relaxed = AffixData::build(vec![], vec![], positional_options()).unwrap();
    assert_eq!(check(&relaxed, &lex, "tamtam"), Some("tam".to_string()));
}

#[test]
fn triple_letter_veto() {
    let options = AffixOptions {
        check_compound_triple: true,
        ..positional_options()
    };
    let data = AffixData::build(vec![], vec![], options).unwrap();
    let lex = lexicon(&[("fall", &[B]), ("like", &[E])]);
    assert_eq!(check(&data, &lex, "falllike"), None);

    let relaxed = AffixData::build(vec![], vec![], positional_options()).unwrap();
    assert_eq!(check(&relaxed, &lex, "falllike"), Some("fall".to_string()));
}

#[test]
fn simplified_triple_restores_the_swallowed_letter() {
    let options = AffixOptions {
        check_compound_triple: true,
        simplified_triple: true,
        ..positional_options()
    };
    let data = AffixData::build(vec![], vec![], options).unwrap();
    let lex = lexicon(&[("schiff", &[B]), ("fahrt", &[E])]);
    // written with two f's instead of three
    assert_eq!(check(&data, &lex, "schiffahrt"), Some("schiff".to_string()));

    let strict = AffixData::build(
        vec![],
        vec![],
        AffixOptions {
            check_compound_triple: true,
            ..positional_options()
        },
    )
    .unwrap();
    assert_eq!(check(&strict, &lex, "schiffahrt"), None);
}

#[test]
fn case_boundary_veto() {
    let options = AffixOptions {
        check_compound_case: true,
        ..positional_options()
    };
    let data = AffixData::build(vec![], vec![], options).unwrap();
    let lex = lexicon(&[("sun", &[B]), ("Flower", &[E])]);
    assert_eq!(check(&data, &lex, "sunFlower"), None);

    let relaxed = AffixData::build(vec![], vec![], positional_options()).unwrap();
    assert_eq!(check(&relaxed, &lex, "sunFlower"), Some("sun".to_string()));
}

#[test]
fn forbidden_junction_pattern() {
    let data = AffixData::builder(vec![], vec![], positional_options())
        .compound_patterns(vec![CheckCompoundPattern::new("", "ba")])
        .finish()
        .unwrap();
    let lex = lexicon(&[("foo", &[B]), ("bar", &[E])]);
    assert_eq!(check(&data, &lex, "foobar"), None);

    let relaxed = AffixData::build(vec![], vec![], positional_options()).unwrap();
    assert_eq!(check(&relaxed, &lex, "foobar"), Some("foo".to_string()));
}

#[test]
fn simplified_junction_rewrites_the_boundary() {
    let data = AffixData::builder(vec![], vec![], positional_options())
        .compound_patterns(vec![CheckCompoundPattern::new("ph", "o").with_simplified("fo")])
        .finish()
        .unwrap();
    let lex = lexicon(&[("graph", &[B]), ("ology", &[E])]);
    // the junction is written "fo" but stands for "ph" + "o"
    assert_eq!(check(&data, &lex, "grafology"), Some("graph".to_string()));
    // the unsimplified spelling is exactly what the pattern forbids
    assert_eq!(check(&data, &lex, "graphology"), None);
}

#[test]
fn compound_forbid_overrides_membership() {
    let options = AffixOptions {
        compound_forbid: 'X' as FlagId,
        ..positional_options()
    };
    let data = AffixData::build(vec![], vec![], options).unwrap();
    let lex = lexicon(&[("sun", &[B, 'X' as FlagId]), ("flower", &[E])]);
    assert_eq!(check(&data, &lex, "sunflower"), None);
}

#[test]
fn affixed_member_needs_the_permit_flag() {
    let options = AffixOptions {
        compound_flag: C,
        compound_permit: PERMIT,
        ..AffixOptions::default()
    };
    let permitted = AffixRule::parse(Side::Suffix, S, "0", "ed", ".")
        .unwrap()
        .with_continuation(FlagSet::new(vec![PERMIT]));
    let data = AffixData::build(vec![], vec![permitted], options.clone()).unwrap();
    let lex = lexicon(&[("walk", &[C, S]), ("talk", &[C])]);
    assert_eq!(check(&data, &lex, "walkedtalk"), Some("walk".to_string()));

    // the same suffix without the permit cannot sit at the boundary
    let bare = AffixRule::parse(Side::Suffix, S, "0", "ed", ".").unwrap();
    let data = AffixData::build(vec![], vec![bare], options).unwrap();
    assert_eq!(check(&data, &lex, "walkedtalk"), None);
}

#[test]
fn rep_probe_suppresses_likely_typos() {
    let options = AffixOptions {
        check_compound_rep: true,
        ..positional_options()
    };
    let data = AffixData::builder(vec![], vec![], options)
        .rep_table(vec![RepEntry::new("flawer", "flower")])
        .finish()
        .unwrap();
    let lex = lexicon(&[("sun", &[B]), ("flawer", &[E]), ("sunflower", &[])]);
    // naive segmentation would split sun|flawer, but one substitution
    // yields the plain word "sunflower"
    assert_eq!(check(&data, &lex, "sunflawer"), None);

    // without the REP check the compound reading goes through
    let relaxed = AffixData::build(vec![], vec![], positional_options()).unwrap();
    assert_eq!(check(&relaxed, &lex, "sunflawer"), Some("sun".to_string()));
}

#[test]
fn word_pair_probe_suppresses_known_pairs() {
    let data = AffixData::build(vec![], vec![], positional_options()).unwrap();
    let lex = lexicon(&[("ice", &[B]), ("cream", &[E]), ("ice cream", &[])]);
    assert_eq!(check(&data, &lex, "icecream"), None);

    let lex = lexicon(&[("ice", &[B]), ("cream", &[E])]);
    assert_eq!(check(&data, &lex, "icecream"), Some("ice".to_string()));
}

#[test]
fn force_uppercase_member_needs_a_capitalized_origin() {
    let options = AffixOptions {
        force_ucase: UCASE,
        ..positional_options()
    };
    let data = AffixData::build(vec![], vec![], options).unwrap();
    let lex = lexicon(&[("bos", &[B]), ("man", &[E, UCASE])]);

    let checker = Checker::new(&data, &lex);
    // the probe derives its case context from the original spelling
    assert!(checker
        .compound_check(&chars("bosman"), CompoundProbe::for_word(&chars("bosman")))
        .is_none());
    assert!(checker
        .compound_check(&chars("bosman"), CompoundProbe::for_word(&chars("Bosman")))
        .is_some());
}

#[test]
fn rule_grammar_compounds() {
    use CompoundRuleToken::{Flag, ZeroOrMore};
    let a = 'a' as FlagId;
    let b = 'b' as FlagId;
    let c = 'c' as FlagId;
    let data = AffixData::builder(vec![], vec![], AffixOptions::default())
        .compound_rules(vec![CompoundRule::new(vec![
            Flag(a),
            Flag(b),
            ZeroOrMore,
            Flag(c),
        ])])
        .finish()
        .unwrap();
    let lex = lexicon(&[("uno", &[a]), ("due", &[b]), ("tre", &[c])]);

    assert_eq!(check(&data, &lex, "unotre"), Some("uno".to_string()));
    assert_eq!(check(&data, &lex, "unoduetre"), Some("uno".to_string()));
    assert_eq!(check(&data, &lex, "unodueduetre"), Some("uno".to_string()));
    // the grammar orders members
    assert_eq!(check(&data, &lex, "duetre"), None);
    assert_eq!(check(&data, &lex, "treuno"), None);
}

#[test]
fn loose_members_through_the_heuristic() {
    let data = AffixData::build(vec![], vec![], positional_options()).unwrap();
    let lex = lexicon(&[("alma", &['F' as FlagId]), ("szeder", &[E])]);
    let heuristic = MagyarHeuristic;
    let checker = Checker::with_heuristic(&data, &lex, &heuristic);

    let probe = CompoundProbe {
        mov_rule: true,
        ..CompoundProbe::default()
    };
    assert!(checker.compound_check(&chars("almaszeder"), probe).is_some());
    // without the probe flag the loose member is not consulted
    assert!(checker
        .compound_check(&chars("almaszeder"), CompoundProbe::default())
        .is_none());
}

#[test]
fn deadline_bounds_pathological_backtracking() {
    let options = AffixOptions {
        compound_begin: B,
        compound_middle: M,
        compound_min: 1,
        ..AffixOptions::default()
    };
    let data = AffixData::build(vec![], vec![], options).unwrap();
    // plenty of overlapping members, but never a legal final one
    let lex = lexicon(&[
        ("a", &[B, M]),
        ("aa", &[B, M]),
        ("aaa", &[B, M]),
        ("aaaa", &[B, M]),
    ]);
    let word: String = std::iter::repeat('a').take(60).collect();

    let start = Instant::now();
    assert_eq!(check(&data, &lex, &word), None);
    // the 50 ms budget plus generous slack for slow machines
    assert!(start.elapsed().as_millis() < 2_000);
}

#[test]
fn compound_morph_reports_member_decompositions() {
    let data = AffixData::build(vec![], vec![], positional_options()).unwrap();
    let lex = lexicon(&[("sun", &[B]), ("flower", &[E])]);
    let checker = Checker::new(&data, &lex);

    let trace = checker.compound_check_morph(&chars("sunflower"), CompoundProbe::default());
    let records: Vec<&str> = trace.records().collect();
    assert_eq!(records.len(), 1);
    assert!(records[0].contains("pa:sun"));
    assert!(records[0].contains("pa:flower"));

    let empty = checker.compound_check_morph(&chars("flowersun"), CompoundProbe::default());
    assert!(empty.is_empty());
}
