// Candidate generation: bounded approximate search over the dictionary.
//
// Primary path: deletion-variant lookup against the precomputed index,
// verified with true Damerau-Levenshtein distance. Fallback path (index
// miss): a bounded scan over length buckets, most frequent words first.
// Both paths terminate in time independent of total dictionary size.

use hashbrown::HashMap;

use stave_core::result::SourceFlag;
use stave_index::deletes::deletion_variants;
use stave_index::distance::within_distance;
use stave_index::{CandidateIndex, Lexicon};

use crate::normalize::ComparisonForms;
use crate::policy::CandidateConfig;

/// An ephemeral correction candidate, produced per query.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub word: String,
    pub distance: usize,
    pub frequency: u64,
    pub source_weight: f64,
    pub source: SourceFlag,
}

/// Generate the bounded candidate set for a token's comparison forms.
///
/// Candidates found through any comparison form keep the smallest distance
/// seen. The result is capped at `max_candidates`, keeping the
/// lowest-distance, highest-frequency entries, ordered deterministically.
pub fn generate(
    forms: &ComparisonForms,
    lexicon: &Lexicon,
    index: &CandidateIndex,
    config: &CandidateConfig,
) -> Vec<Candidate> {
    if forms.normalized.is_empty() || lexicon.is_empty() {
        return Vec::new();
    }
    let max_distance = config.max_edit_distance.min(index.params().max_edit_distance);

    // word -> smallest verified distance across forms
    let mut best: HashMap<u32, usize> = HashMap::new();
    for form in &forms.alternates {
        collect_indexed(form, index, max_distance, &mut best);
    }
    if best.is_empty() {
        for form in &forms.alternates {
            collect_fallback(form, index, max_distance, config.fallback_scan_limit, &mut best);
        }
    }

    let mut candidates: Vec<Candidate> = best
        .into_iter()
        .filter_map(|(id, distance)| {
            let entry = lexicon.get(index.word(id))?;
            Some(Candidate {
                word: entry.word.clone(),
                distance,
                frequency: entry.frequency,
                source_weight: entry.source_weight,
                source: entry.source,
            })
        })
        .collect();

    candidates.sort_by(|a, b| {
        a.distance
            .cmp(&b.distance)
            .then_with(|| b.frequency.cmp(&a.frequency))
            .then_with(|| a.word.cmp(&b.word))
    });
    candidates.truncate(config.max_candidates);
    candidates
}

/// Deletion-variant lookup for one comparison form.
fn collect_indexed(
    form: &str,
    index: &CandidateIndex,
    max_distance: usize,
    best: &mut HashMap<u32, usize>,
) {
    let form_chars: Vec<char> = form.chars().collect();
    for variant in deletion_variants(form, max_distance, index.params().prefix_length) {
        for &id in index.lookup(&variant) {
            if best.get(&id).is_some_and(|&d| d <= 1) {
                continue; // already verified at the floor for corrections
            }
            let word_chars: Vec<char> = index.word(id).chars().collect();
            if let Some(distance) = within_distance(&form_chars, &word_chars, max_distance) {
                if distance == 0 {
                    // The form IS a dictionary word; that is the engine's
                    // dictionary self-check, not a correction candidate.
                    continue;
                }
                best.entry(id)
                    .and_modify(|d| *d = (*d).min(distance))
                    .or_insert(distance);
            }
        }
    }
}

/// Bounded linear scan over length buckets, used when the index misses.
fn collect_fallback(
    form: &str,
    index: &CandidateIndex,
    max_distance: usize,
    scan_limit: usize,
    best: &mut HashMap<u32, usize>,
) {
    let form_chars: Vec<char> = form.chars().collect();
    let form_len = form_chars.len();
    let mut scanned = 0usize;

    let min_len = form_len.saturating_sub(max_distance).max(1);
    for length in min_len..=form_len + max_distance {
        for &id in index.bucket(length) {
            if scanned >= scan_limit {
                return;
            }
            scanned += 1;
            let word_chars: Vec<char> = index.word(id).chars().collect();
            if let Some(distance) = within_distance(&form_chars, &word_chars, max_distance) {
                if distance == 0 {
                    continue;
                }
                best.entry(id)
                    .and_modify(|d| *d = (*d).min(distance))
                    .or_insert(distance);
            }
        }
    }
}
