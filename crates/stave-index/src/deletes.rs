// Deletion-variant generation for the candidate index.
//
// A word matches a query within edit distance k when some deletion variant
// of the word (up to k characters removed) equals some deletion variant of
// the query. Keys are generated from a prefix-truncated form so index size
// stays bounded for long words; true distances are verified afterwards.

use hashbrown::HashSet;

/// Generate every deletion variant of `word` with up to `max_deletes`
/// characters removed (order-preserving), including the zero-deletion form.
///
/// When `prefix_length` is non-zero, variants are generated from the first
/// `prefix_length` characters only; both index build and query lookup must
/// use the same truncation for keys to match.
pub fn deletion_variants(word: &str, max_deletes: usize, prefix_length: usize) -> HashSet<String> {
    let mut base: Vec<char> = word.chars().collect();
    if prefix_length > 0 && base.len() > prefix_length {
        base.truncate(prefix_length);
    }

    let mut variants: HashSet<String> = HashSet::new();
    variants.insert(base.iter().collect());

    let mut frontier: Vec<Vec<char>> = vec![base];
    for _ in 0..max_deletes {
        let mut next: Vec<Vec<char>> = Vec::new();
        for form in &frontier {
            if form.len() <= 1 {
                // Deleting the last character would map every word to "".
                continue;
            }
            for skip in 0..form.len() {
                let mut shorter: Vec<char> = Vec::with_capacity(form.len() - 1);
                shorter.extend(form[..skip].iter());
                shorter.extend(form[skip + 1..].iter());
                let key: String = shorter.iter().collect();
                if variants.insert(key) {
                    next.push(shorter);
                }
            }
        }
        if next.is_empty() {
            break;
        }
        frontier = next;
    }
    variants
}
