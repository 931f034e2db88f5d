// Bounded Damerau-Levenshtein distance (optimal string alignment).
//
// Operates on `&[char]` so candidate verification indexes characters, not
// bytes; Danish words routinely contain multi-byte letters.

/// Damerau-Levenshtein distance with transpositions counted as one edit
/// (optimal string alignment variant: a substring is edited at most once).
pub fn damerau_levenshtein(a: &[char], b: &[char]) -> usize {
    within_distance(a, b, usize::MAX).unwrap_or(usize::MAX)
}

/// Compute the Damerau-Levenshtein distance between `a` and `b`, returning
/// `None` as soon as the distance provably exceeds `max_distance`.
///
/// The early exit checks the length difference up front and the row minimum
/// after each DP row, so verification cost stays proportional to
/// `max_distance`, not to the longer string.
pub fn within_distance(a: &[char], b: &[char], max_distance: usize) -> Option<usize> {
    if a == b {
        return Some(0);
    }
    let (alen, blen) = (a.len(), b.len());
    if alen.abs_diff(blen) > max_distance {
        return None;
    }
    if alen == 0 {
        return (blen <= max_distance).then_some(blen);
    }
    if blen == 0 {
        return (alen <= max_distance).then_some(alen);
    }

    // Three rolling rows: i-2, i-1, i. Row index walks `a`.
    let mut prev2: Vec<usize> = vec![0; blen + 1];
    let mut prev: Vec<usize> = (0..=blen).collect();
    let mut curr: Vec<usize> = vec![0; blen + 1];

    for i in 1..=alen {
        curr[0] = i;
        let mut row_min = curr[0];
        for j in 1..=blen {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            let mut best = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
            if i > 1 && j > 1 && a[i - 1] == b[j - 2] && a[i - 2] == b[j - 1] {
                best = best.min(prev2[j - 2] + 1);
            }
            curr[j] = best;
            row_min = row_min.min(best);
        }
        if row_min > max_distance {
            return None;
        }
        std::mem::swap(&mut prev2, &mut prev);
        std::mem::swap(&mut prev, &mut curr);
    }

    let distance = prev[blen];
    (distance <= max_distance).then_some(distance)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn dist(a: &str, b: &str) -> usize {
        damerau_levenshtein(&chars(a), &chars(b))
    }

    #[test]
    fn identical_words_have_zero_distance() {
        assert_eq!(dist("spiser", "spiser"), 0);
        assert_eq!(dist("", ""), 0);
    }

    #[test]
    fn single_edits() {
        assert_eq!(dist("spisr", "spiser"), 1); // insertion
        assert_eq!(dist("spiseer", "spiser"), 1); // deletion
        assert_eq!(dist("spisar", "spiser"), 1); // substitution
    }

    #[test]
    fn transposition_counts_as_one_edit() {
        assert_eq!(dist("spsier", "spiser"), 1);
        assert_eq!(dist("hygeg", "hygge"), 1);
    }

    #[test]
    fn danish_letters_are_single_characters() {
        assert_eq!(dist("born", "børn"), 1);
        assert_eq!(dist("soer", "søer"), 1);
    }

    #[test]
    fn empty_versus_word() {
        assert_eq!(dist("", "kat"), 3);
        assert_eq!(dist("kat", ""), 3);
    }

    #[test]
    fn within_distance_rejects_on_length_gap() {
        assert_eq!(within_distance(&chars("ab"), &chars("abcdef"), 2), None);
    }

    #[test]
    fn within_distance_accepts_at_bound() {
        assert_eq!(within_distance(&chars("kat"), &chars("kay"), 1), Some(1));
        assert_eq!(within_distance(&chars("kat"), &chars("hund"), 1), None);
    }

    #[test]
    fn within_distance_matches_unbounded() {
        let pairs = [("spisr", "spiser"), ("borne", "børne"), ("abc", "cba")];
        for (a, b) in pairs {
            let (a, b) = (chars(a), chars(b));
            let full = damerau_levenshtein(&a, &b);
            assert_eq!(within_distance(&a, &b, full), Some(full));
        }
    }
}
