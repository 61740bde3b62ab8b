// Per-direction affix search structure with subset-pruning links.

use hashbrown::HashMap;

use crate::rules::{AffixRule, Side};
use crate::BuildError;

/// One arena slot: a rule plus its traversal links. The links are derived
/// from the sorted bucket order at build time and never mutated afterward;
/// they carry arena indices, not references, so the whole structure is a
/// plain read-only value.
#[derive(Debug)]
struct IndexNode {
    rule: AffixRule,
    /// Search key: the rule's `append` for prefixes, reversed `append` for
    /// suffixes, so that matching from the relevant end of the word is a
    /// forward scan in both directions. A `.` in a key matches any
    /// character.
    key: Vec<char>,
    /// Next node reachable when this node's key matched.
    next_matches: Option<u32>,
    /// Next node reachable when it did not: skips every key this one is a
    /// leading subset of.
    next_skip: Option<u32>,
}

/// The search structure over all rules of one direction: rules with an
/// empty `append` in a separate chain (they apply to any word), the rest
/// bucketed by boundary character, each bucket a sorted chain annotated
/// with pruning links.
///
/// Built once after the rule table is loaded. Per-candidate search cost is
/// proportional to the number of plausible rules, not the table size: a
/// failed key test skips the whole run of keys that extend it.
#[derive(Debug)]
pub struct AffixIndex {
    side: Side,
    nodes: Vec<IndexNode>,
    buckets: HashMap<char, u32>,
    /// Arena indices of the zero-length rules, in rule-table order.
    zero: Vec<u32>,
}

impl AffixIndex {
    /// Bucket, order, and link the rules of one direction.
    pub fn build(rules: Vec<AffixRule>, side: Side) -> Result<Self, BuildError> {
        let mut zero_rules = Vec::new();
        let mut keyed: Vec<(Vec<char>, usize, AffixRule)> = Vec::new();
        for (order, rule) in rules.into_iter().enumerate() {
            if rule.append.is_empty() {
                zero_rules.push(rule);
            } else {
                let mut key = rule.append.clone();
                if side == Side::Suffix {
                    key.reverse();
                }
                keyed.push((key, order, rule));
            }
        }

        let mut nodes: Vec<IndexNode> = Vec::with_capacity(zero_rules.len() + keyed.len());
        let mut zero = Vec::with_capacity(zero_rules.len());
        for rule in zero_rules {
            zero.push(nodes.len() as u32);
            nodes.push(IndexNode {
                rule,
                key: Vec::new(),
                next_matches: None,
                next_skip: None,
            });
        }

        // Group by boundary character, then order each bucket
        // lexicographically by key with rule order breaking ties.
        let mut grouped: HashMap<char, Vec<(Vec<char>, usize, AffixRule)>> = HashMap::new();
        for entry in keyed {
            grouped.entry(entry.0[0]).or_default().push(entry);
        }

        let mut buckets = HashMap::with_capacity(grouped.len());
        for (boundary, mut bucket) in grouped {
            bucket.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));
            let base = nodes.len() as u32;
            buckets.insert(boundary, base);
            for (key, _, rule) in bucket {
                nodes.push(IndexNode {
                    rule,
                    key,
                    next_matches: None,
                    next_skip: None,
                });
            }
            let end = nodes.len();
            link_bucket(&mut nodes[base as usize..end], base);
        }

        let index = Self {
            side,
            nodes,
            buckets,
            zero,
        };
        index.validate_links()?;
        Ok(index)
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Total number of rules, zero-length chain included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every rule of this direction, unpruned. Used by exhaustive scans
    /// (tests, analyses); checking goes through [`candidates`](Self::candidates).
    pub fn rules(&self) -> impl Iterator<Item = &AffixRule> {
        self.nodes.iter().map(|n| &n.rule)
    }

    /// The rules whose key plausibly matches `word` at its boundary: the
    /// zero-length chain first, then the pruned bucket walk for the word's
    /// boundary character.
    pub fn candidates<'w>(&self, word: &'w [char]) -> Candidates<'_, 'w> {
        let boundary = match self.side {
            Side::Prefix => word.first(),
            Side::Suffix => word.last(),
        };
        let cursor = boundary.and_then(|c| self.buckets.get(c).copied());
        Candidates {
            index: self,
            word,
            zero_pos: 0,
            cursor,
        }
    }

    /// Whether `key` is a boundary subset of `word`: its characters line up
    /// with the word's leading (prefix) or trailing (suffix) characters,
    /// `.` matching anything.
    fn key_matches(&self, key: &[char], word: &[char]) -> bool {
        if key.len() > word.len() {
            return false;
        }
        match self.side {
            Side::Prefix => key
                .iter()
                .zip(word)
                .all(|(&k, &c)| k == c || k == '.'),
            Side::Suffix => key
                .iter()
                .zip(word.iter().rev())
                .all(|(&k, &c)| k == c || k == '.'),
        }
    }

    /// Fail fast if any traversal link fails to advance through the arena.
    /// The construction above only ever links forward; a violation means a
    /// construction bug, and catching it here keeps the checking loops
    /// free of cycle guards.
    fn validate_links(&self) -> Result<(), BuildError> {
        for (i, node) in self.nodes.iter().enumerate() {
            for link in [node.next_matches, node.next_skip].into_iter().flatten() {
                if link as usize <= i || link as usize >= self.nodes.len() {
                    return Err(BuildError::IndexCycle);
                }
            }
        }
        Ok(())
    }
}

/// Synthesize the pruning links of one sorted bucket.
///
/// First pass: each node's `next_skip` is the nearest following node whose
/// key it is *not* a leading subset of, and `next_matches` is the immediate
/// successor when that successor extends it. Second pass: the last node of
/// every subset run ends the search outright, since anything after it was
/// already reachable through an earlier skip.
fn link_bucket(bucket: &mut [IndexNode], base: u32) {
    let n = bucket.len();
    for i in 0..n {
        let mut skip = None;
        for j in i + 1..n {
            if !leading_subset(&bucket[i].key, &bucket[j].key) {
                skip = Some(base + j as u32);
                break;
            }
        }
        bucket[i].next_skip = skip;
        bucket[i].next_matches = (i + 1 < n
            && leading_subset(&bucket[i].key, &bucket[i + 1].key))
        .then(|| base + i as u32 + 1);
    }
    for i in 0..n {
        let mut last_in_run = None;
        for j in i + 1..n {
            if !leading_subset(&bucket[i].key, &bucket[j].key) {
                break;
            }
            last_in_run = Some(j);
        }
        if let Some(j) = last_in_run {
            bucket[j].next_skip = None;
        }
    }
}

/// Whether `a` is a leading subset of `b`, `.` in `a` matching any
/// character of `b`.
fn leading_subset(a: &[char], b: &[char]) -> bool {
    a.len() <= b.len() && a.iter().zip(b).all(|(&x, &y)| x == y || x == '.')
}

/// Iterator over the plausible rules for one word. See
/// [`AffixIndex::candidates`]. The yielded rules borrow from the index,
/// not from the word, so they outlive the candidate span being tested.
pub struct Candidates<'a, 'w> {
    index: &'a AffixIndex,
    word: &'w [char],
    zero_pos: usize,
    cursor: Option<u32>,
}

impl<'a> Iterator for Candidates<'a, '_> {
    type Item = &'a AffixRule;

    fn next(&mut self) -> Option<&'a AffixRule> {
        if self.zero_pos < self.index.zero.len() {
            let node = &self.index.nodes[self.index.zero[self.zero_pos] as usize];
            self.zero_pos += 1;
            return Some(&node.rule);
        }
        while let Some(cur) = self.cursor {
            let node = &self.index.nodes[cur as usize];
            if self.index.key_matches(&node.key, self.word) {
                self.cursor = node.next_matches;
                return Some(&node.rule);
            }
            self.cursor = node.next_skip;
        }
        None
    }
}
