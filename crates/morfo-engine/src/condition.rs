// Affix condition patterns: character classes anchored at the affix boundary.

/// One position of a condition pattern. Every atom consumes exactly one
/// character of the candidate stem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CondAtom {
    /// A literal character.
    Literal(char),
    /// `.` -- matches any character.
    Any,
    /// `[...]` / `[^...]` -- a character class, one character wide.
    Group { chars: Box<[char]>, negated: bool },
}

impl CondAtom {
    fn matches(&self, c: char) -> bool {
        match self {
            CondAtom::Literal(l) => *l == c,
            CondAtom::Any => true,
            CondAtom::Group { chars, negated } => chars.contains(&c) != *negated,
        }
    }
}

/// Errors in the textual form of a condition. These surface when the rule
/// table is loaded; a parsed pattern is well-formed by construction.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConditionError {
    #[error("unclosed bracket group in condition {0:?}")]
    UnclosedGroup(String),
    #[error("empty bracket group in condition {0:?}")]
    EmptyGroup(String),
}

/// A parsed condition: an ordered atom sequence.
///
/// For a suffix rule the sequence is anchored at the *end* of the candidate
/// stem (the last atom constrains the last character); for a prefix rule it
/// is anchored at the start. The bare pattern `.` is the conventional
/// spelling of "unconstrained" and parses to an empty sequence, so its
/// length pre-filter costs nothing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConditionPattern {
    atoms: Box<[CondAtom]>,
}

impl ConditionPattern {
    /// Parse the textual condition of an affix rule.
    pub fn parse(text: &str) -> Result<Self, ConditionError> {
        if text == "." || text.is_empty() {
            return Ok(Self::default());
        }
        let mut atoms = Vec::new();
        let mut chars = text.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '[' => {
                    let negated = chars.peek() == Some(&'^');
                    if negated {
                        chars.next();
                    }
                    let mut members = Vec::new();
                    loop {
                        match chars.next() {
                            Some(']') => break,
                            Some(m) => members.push(m),
                            None => {
                                return Err(ConditionError::UnclosedGroup(text.to_string()));
                            }
                        }
                    }
                    if members.is_empty() {
                        return Err(ConditionError::EmptyGroup(text.to_string()));
                    }
                    atoms.push(CondAtom::Group {
                        chars: members.into_boxed_slice(),
                        negated,
                    });
                }
                '.' => atoms.push(CondAtom::Any),
                c => atoms.push(CondAtom::Literal(c)),
            }
        }
        Ok(Self {
            atoms: atoms.into_boxed_slice(),
        })
    }

    /// Number of candidate characters the pattern constrains. Used as a
    /// cheap length pre-filter before matching.
    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Match anchored at the start of the candidate (prefix rules).
    /// A candidate shorter than the pattern fails.
    pub fn matches_start(&self, candidate: &[char]) -> bool {
        candidate.len() >= self.atoms.len()
            && self
                .atoms
                .iter()
                .zip(candidate)
                .all(|(atom, &c)| atom.matches(c))
    }

    /// Match anchored at the end of the candidate (suffix rules).
    pub fn matches_end(&self, candidate: &[char]) -> bool {
        candidate.len() >= self.atoms.len()
            && self
                .atoms
                .iter()
                .rev()
                .zip(candidate.iter().rev())
                .all(|(atom, &c)| atom.matches(c))
    }
}
