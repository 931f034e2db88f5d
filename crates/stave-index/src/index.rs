// Precomputed candidate-retrieval index.
//
// Maps deletion-variant keys of dictionary words back to the originating
// word ids, plus length buckets for the linear-scan fallback. Built once
// per dictionary snapshot and never mutated afterwards; a dictionary
// change produces a whole new index.

use hashbrown::HashMap;

use crate::deletes::deletion_variants;
use crate::lexicon::Lexicon;

/// Build parameters for the index. Must match the query side: lookups use
/// the same deletion radius and prefix truncation as the build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexParams {
    /// Precomputed deletion radius (also the verification bound).
    pub max_edit_distance: usize,
    /// Prefix truncation for deletion keys; 0 disables truncation.
    pub prefix_length: usize,
}

/// Read-only candidate index derived from a [`Lexicon`].
pub struct CandidateIndex {
    params: IndexParams,
    /// All indexed words, lexicographically sorted so ids are deterministic
    /// across rebuilds of the same dictionary set.
    words: Vec<String>,
    /// Deletion-variant key -> ids of words producing that variant.
    deletes: HashMap<String, Vec<u32>>,
    /// Word length (in chars) -> ids sorted by frequency descending, then
    /// lexicographically. Drives the bounded fallback scan.
    by_length: HashMap<usize, Vec<u32>>,
}

impl CandidateIndex {
    /// Build the index from a merged lexicon.
    pub fn build(lexicon: &Lexicon, params: IndexParams) -> Self {
        let mut words: Vec<String> = lexicon.entries().map(|e| e.word.clone()).collect();
        words.sort_unstable();

        let mut deletes: HashMap<String, Vec<u32>> = HashMap::new();
        let mut by_length: HashMap<usize, Vec<u32>> = HashMap::new();

        for (id, word) in words.iter().enumerate() {
            let id = id as u32;
            for variant in deletion_variants(word, params.max_edit_distance, params.prefix_length)
            {
                deletes.entry(variant).or_default().push(id);
            }
            by_length
                .entry(word.chars().count())
                .or_default()
                .push(id);
        }

        for bucket in by_length.values_mut() {
            bucket.sort_by(|&a, &b| {
                let (wa, wb) = (&words[a as usize], &words[b as usize]);
                let (fa, fb) = (
                    lexicon.get(wa).map_or(0, |e| e.frequency),
                    lexicon.get(wb).map_or(0, |e| e.frequency),
                );
                fb.cmp(&fa).then_with(|| wa.cmp(wb))
            });
        }

        Self {
            params,
            words,
            deletes,
            by_length,
        }
    }

    pub fn params(&self) -> IndexParams {
        self.params
    }

    /// Word ids whose deletion variants include `key`.
    pub fn lookup(&self, key: &str) -> &[u32] {
        self.deletes.get(key).map_or(&[], Vec::as_slice)
    }

    /// Ids of all words of the given character length, most frequent first.
    pub fn bucket(&self, length: usize) -> &[u32] {
        self.by_length.get(&length).map_or(&[], Vec::as_slice)
    }

    pub fn word(&self, id: u32) -> &str {
        &self.words[id as usize]
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stave_core::result::SourceFlag;

    fn lexicon() -> Lexicon {
        let mut lexicon = Lexicon::new();
        for (word, freq) in [("spiser", 400), ("spise", 350), ("kat", 120), ("hat", 110)] {
            lexicon.insert(word, freq, 0.6, SourceFlag::CoreWordlist);
        }
        lexicon
    }

    fn params() -> IndexParams {
        IndexParams {
            max_edit_distance: 2,
            prefix_length: 7,
        }
    }

    #[test]
    fn exact_word_key_maps_to_its_id() {
        let index = CandidateIndex::build(&lexicon(), params());
        let ids = index.lookup("spiser");
        assert!(ids.iter().any(|&id| index.word(id) == "spiser"));
    }

    #[test]
    fn deletion_key_reaches_originating_words() {
        let index = CandidateIndex::build(&lexicon(), params());
        // "at" is a deletion variant of both "kat" and "hat".
        let words: Vec<&str> = index.lookup("at").iter().map(|&id| index.word(id)).collect();
        assert!(words.contains(&"kat"));
        assert!(words.contains(&"hat"));
    }

    #[test]
    fn unknown_key_yields_empty_slice() {
        let index = CandidateIndex::build(&lexicon(), params());
        assert!(index.lookup("zzz").is_empty());
    }

    #[test]
    fn buckets_are_frequency_ordered() {
        let index = CandidateIndex::build(&lexicon(), params());
        let words: Vec<&str> = index.bucket(3).iter().map(|&id| index.word(id)).collect();
        assert_eq!(words, vec!["kat", "hat"]);
    }

    #[test]
    fn word_ids_are_deterministic_across_builds() {
        let a = CandidateIndex::build(&lexicon(), params());
        let b = CandidateIndex::build(&lexicon(), params());
        for id in 0..a.word_count() as u32 {
            assert_eq!(a.word(id), b.word(id));
        }
    }

    #[test]
    fn empty_lexicon_builds_empty_index() {
        let index = CandidateIndex::build(&Lexicon::new(), params());
        assert_eq!(index.word_count(), 0);
        assert!(index.bucket(3).is_empty());
    }
}
