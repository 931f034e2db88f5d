// Danish character helpers and case pattern detection.

/// Classification of character casing within a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaseType {
    /// No letters found in the token (only digits, punctuation, etc.).
    NoLetters,
    /// All letters are lowercase: "hygge".
    AllLower,
    /// First letter is uppercase, rest are lowercase: "Aarhus".
    FirstUpper,
    /// Mixed case that does not fit other patterns: "MilkoScna".
    Complex,
    /// All letters are uppercase: "DSB".
    AllUpper,
}

/// Detect the case pattern of a token.
///
/// Non-letter characters (digits, punctuation) are ignored when
/// determining the pattern.
pub fn detect_case(token: &str) -> CaseType {
    let mut first_letter: Option<char> = None;
    let mut rest_all_lower = true;
    let mut all_upper = true;

    for c in token.chars() {
        if !c.is_alphabetic() {
            continue;
        }
        if first_letter.is_none() {
            first_letter = Some(c);
            if c.is_lowercase() {
                all_upper = false;
            }
            continue;
        }
        if c.is_uppercase() {
            rest_all_lower = false;
        } else {
            all_upper = false;
        }
    }

    let Some(first) = first_letter else {
        return CaseType::NoLetters;
    };
    if all_upper && first.is_uppercase() {
        return CaseType::AllUpper;
    }
    if first.is_uppercase() && rest_all_lower {
        return CaseType::FirstUpper;
    }
    if first.is_lowercase() && rest_all_lower {
        return CaseType::AllLower;
    }
    CaseType::Complex
}

/// Count of decimal digits in the token.
pub fn digit_count(token: &str) -> usize {
    token.chars().filter(|c| c.is_ascii_digit()).count()
}

/// Count of alphabetic characters in the token.
pub fn alpha_count(token: &str) -> usize {
    token.chars().filter(|c| c.is_alphabetic()).count()
}

/// Returns `true` if every character is a decimal digit (and the token
/// is non-empty). Separators such as "1.234" are not purely numeric.
pub fn is_purely_numeric(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_case_patterns() {
        assert_eq!(detect_case("hygge"), CaseType::AllLower);
        assert_eq!(detect_case("Aarhus"), CaseType::FirstUpper);
        assert_eq!(detect_case("DSB"), CaseType::AllUpper);
        assert_eq!(detect_case("MilkoScna"), CaseType::Complex);
        assert_eq!(detect_case("1234"), CaseType::NoLetters);
        assert_eq!(detect_case(""), CaseType::NoLetters);
    }

    #[test]
    fn detect_case_ignores_non_letters() {
        assert_eq!(detect_case("bør-ne"), CaseType::AllLower);
        assert_eq!(detect_case("A1b"), CaseType::FirstUpper);
    }

    #[test]
    fn single_letter_tokens() {
        assert_eq!(detect_case("a"), CaseType::AllLower);
        assert_eq!(detect_case("A"), CaseType::AllUpper);
    }

    #[test]
    fn numeric_detection() {
        assert!(is_purely_numeric("2024"));
        assert!(!is_purely_numeric("20kr"));
        assert!(!is_purely_numeric("1.234"));
        assert!(!is_purely_numeric(""));
    }

    #[test]
    fn digit_and_alpha_counts() {
        assert_eq!(digit_count("abc123"), 3);
        assert_eq!(alpha_count("abc123"), 3);
        assert_eq!(alpha_count("søer"), 4);
    }
}
