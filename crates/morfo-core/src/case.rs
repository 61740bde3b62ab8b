// Capitalization pattern detection.

/// Classification of character casing within a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapitalType {
    /// No uppercase letters: "walk".
    None,
    /// First letter uppercase, rest lowercase: "Walk".
    Init,
    /// All letters uppercase: "WALK".
    All,
    /// Mixed case not starting with uppercase: "openGL".
    Huh,
    /// Mixed case starting with uppercase: "McDonald".
    HuhInit,
}

impl CapitalType {
    /// True for the patterns that count as "originally capitalized" when
    /// the force-uppercase compound veto is evaluated.
    pub fn is_capitalized(self) -> bool {
        matches!(self, CapitalType::Init | CapitalType::All | CapitalType::HuhInit)
    }
}

/// Detect the capitalization pattern of a word.
///
/// Characters without case (digits, hyphens) are ignored except that a word
/// with no letters at all classifies as `None`.
pub fn capital_type(word: &[char]) -> CapitalType {
    let first_upper = word.first().is_some_and(|c| c.is_uppercase());
    let upper_tail = word.iter().skip(1).filter(|c| c.is_uppercase()).count();
    let lower = word.iter().filter(|c| c.is_lowercase()).count();

    match (first_upper, upper_tail, lower) {
        (false, 0, _) => CapitalType::None,
        (true, 0, _) => CapitalType::Init,
        (_, _, 0) => CapitalType::All,
        (true, _, _) => CapitalType::HuhInit,
        (false, _, _) => CapitalType::Huh,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ct(s: &str) -> CapitalType {
        let chars: Vec<char> = s.chars().collect();
        capital_type(&chars)
    }

    #[test]
    fn plain_lowercase() {
        assert_eq!(ct("walk"), CapitalType::None);
        assert_eq!(ct("walk7"), CapitalType::None);
    }

    #[test]
    fn initial_capital() {
        assert_eq!(ct("Walk"), CapitalType::Init);
    }

    #[test]
    fn all_capitals() {
        assert_eq!(ct("WALK"), CapitalType::All);
        assert_eq!(ct("W"), CapitalType::All);
    }

    #[test]
    fn mixed() {
        assert_eq!(ct("openGL"), CapitalType::Huh);
        assert_eq!(ct("McDonald"), CapitalType::HuhInit);
    }

    #[test]
    fn no_letters_is_none() {
        assert_eq!(ct("1234"), CapitalType::None);
        assert_eq!(ct(""), CapitalType::None);
    }

    #[test]
    fn capitalized_predicate() {
        assert!(CapitalType::Init.is_capitalized());
        assert!(CapitalType::All.is_capitalized());
        assert!(CapitalType::HuhInit.is_capitalized());
        assert!(!CapitalType::None.is_capitalized());
        assert!(!CapitalType::Huh.is_capitalized());
    }
}
