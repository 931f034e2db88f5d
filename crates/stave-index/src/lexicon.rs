// Merged dictionary: flat wordlists folded into a single entry map with
// source-weighted precedence.

use std::path::{Path, PathBuf};

use hashbrown::HashMap;

use stave_core::result::SourceFlag;

/// Error type for dictionary loading.
#[derive(Debug, thiserror::Error)]
pub enum LexiconError {
    #[error("failed to read wordlist {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("bad frequency on line {line} of {path}: {value:?}")]
    BadFrequency {
        path: PathBuf,
        line: usize,
        value: String,
    },
}

/// One immutable dictionary entry after merging.
#[derive(Debug, Clone, PartialEq)]
pub struct DictionaryEntry {
    pub word: String,
    /// Corpus frequency; membership-only lists carry 1.
    pub frequency: u64,
    /// Weight of the highest-weight source that contains this word, in `[0, 1]`.
    pub source_weight: f64,
    /// The source that fixed the weight.
    pub source: SourceFlag,
}

/// A wordlist to merge into the lexicon.
///
/// File format: one entry per line, either `word`, `word<TAB>freq`, or
/// `word<SP>freq`. Blank lines and `#` comments are skipped. Words are
/// lowercased on load.
#[derive(Debug, Clone)]
pub struct DictionarySource {
    pub flag: SourceFlag,
    /// Source weight in `[0, 1]`; higher-weight sources win merges.
    pub weight: f64,
    pub path: PathBuf,
}

impl DictionarySource {
    pub fn new(flag: SourceFlag, weight: f64, path: impl Into<PathBuf>) -> Self {
        Self {
            flag,
            weight,
            path: path.into(),
        }
    }
}

/// The merged dictionary. Immutable once a snapshot is built from it;
/// cloning supports rebuild-and-swap on user lexeme additions.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    entries: HashMap<String, DictionaryEntry>,
    max_frequency: u64,
}

impl Lexicon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a single word into the lexicon.
    ///
    /// A word present in a higher-weight source keeps that weight (and
    /// source flag) even if also present elsewhere; frequency keeps the
    /// maximum seen across sources.
    pub fn insert(&mut self, word: &str, frequency: u64, weight: f64, flag: SourceFlag) {
        let word = word.trim().to_lowercase();
        if word.is_empty() {
            return;
        }
        self.max_frequency = self.max_frequency.max(frequency);
        match self.entries.get_mut(&word) {
            Some(entry) => {
                entry.frequency = entry.frequency.max(frequency);
                if weight > entry.source_weight {
                    entry.source_weight = weight;
                    entry.source = flag;
                }
            }
            None => {
                self.entries.insert(
                    word.clone(),
                    DictionaryEntry {
                        word,
                        frequency,
                        source_weight: weight,
                        source: flag,
                    },
                );
            }
        }
    }

    /// Load and merge one wordlist file. Returns the number of lines merged.
    pub fn load_source(&mut self, source: &DictionarySource) -> Result<usize, LexiconError> {
        let text = std::fs::read_to_string(&source.path).map_err(|e| LexiconError::Io {
            path: source.path.clone(),
            source: e,
        })?;
        let mut merged = 0;
        for (line_no, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (word, frequency) = parse_line(line, &source.path, line_no + 1)?;
            self.insert(word, frequency, source.weight, source.flag);
            merged += 1;
        }
        Ok(merged)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.entries.contains_key(word)
    }

    pub fn get(&self, word: &str) -> Option<&DictionaryEntry> {
        self.entries.get(word)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Highest frequency across all entries (0 when empty). Used by the
    /// ranker to normalize the frequency signal.
    pub fn max_frequency(&self) -> u64 {
        self.max_frequency
    }

    /// Iterate over all entries in arbitrary order.
    pub fn entries(&self) -> impl Iterator<Item = &DictionaryEntry> {
        self.entries.values()
    }
}

fn parse_line<'a>(
    line: &'a str,
    path: &Path,
    line_no: usize,
) -> Result<(&'a str, u64), LexiconError> {
    let Some((word, freq)) = line.split_once(['\t', ' ']) else {
        return Ok((line, 1));
    };
    let freq = freq.trim();
    let frequency = freq
        .parse::<u64>()
        .map_err(|_| LexiconError::BadFrequency {
            path: path.to_path_buf(),
            line: line_no,
            value: freq.to_string(),
        })?;
    Ok((word, frequency))
}
