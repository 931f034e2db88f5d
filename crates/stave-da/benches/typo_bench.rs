// Criterion benchmarks for stave-da.
//
// All benchmarks run against a synthetic in-process lexicon so they need
// no dictionary files on disk.
//
// Run:
//   cargo bench -p stave-da

use criterion::{Criterion, criterion_group, criterion_main};

use stave_core::result::SourceFlag;
use stave_da::engine::{ClassifyRequest, TypoEngine};
use stave_da::policy::PolicyConfig;
use stave_index::{CandidateIndex, IndexParams, Lexicon};

// ---------------------------------------------------------------------------
// Fixture construction
// ---------------------------------------------------------------------------

const STEMS: &[&str] = &[
    "spise", "drikke", "løbe", "skrive", "læse", "arbejde", "tænke", "høre",
    "finde", "komme", "blive", "kunne", "ville", "skulle", "hygge", "vente",
    "hund", "kat", "barn", "hus", "bord", "stol", "vindue", "dør",
    "gade", "by", "land", "skov", "strand", "himmel", "regn", "sol",
    "kaffe", "te", "brød", "smør", "ost", "mælk", "æble", "pære",
];

const SUFFIXES: &[&str] = &["", "r", "t", "n", "ne", "rne", "de", "et", "en", "erne"];

fn build_lexicon() -> Lexicon {
    let mut lexicon = Lexicon::new();
    for (i, stem) in STEMS.iter().enumerate() {
        for (j, suffix) in SUFFIXES.iter().enumerate() {
            let word = format!("{stem}{suffix}");
            let frequency = 1 + ((i * SUFFIXES.len() + j) as u64 * 17) % 500;
            lexicon.insert(&word, frequency, 0.6, SourceFlag::CoreWordlist);
        }
    }
    lexicon
}

fn policy() -> PolicyConfig {
    PolicyConfig::builtin().expect("reference policy")
}

const MISSPELLED: &[&str] = &["spisr", "drikkr", "arbejd", "kafffe", "hygeg", "vindeu"];

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Build the deletion-variant index from the full synthetic lexicon.
fn bench_index_build(c: &mut Criterion) {
    let lexicon = build_lexicon();
    let policy = policy();
    let params = IndexParams {
        max_edit_distance: policy.candidate_generation.max_edit_distance,
        prefix_length: policy.candidate_generation.prefix_length,
    };

    c.bench_function("index_build_400_words", |b| {
        b.iter(|| {
            std::hint::black_box(CandidateIndex::build(&lexicon, params));
        });
    });
}

/// Raw candidate generation for misspelled tokens, no cache in the path.
fn bench_candidate_generation(c: &mut Criterion) {
    let lexicon = build_lexicon();
    let policy = policy();
    let params = IndexParams {
        max_edit_distance: policy.candidate_generation.max_edit_distance,
        prefix_length: policy.candidate_generation.prefix_length,
    };
    let index = CandidateIndex::build(&lexicon, params);

    let forms: Vec<_> = MISSPELLED
        .iter()
        .map(|w| stave_da::normalize::comparison_forms(w))
        .collect();

    c.bench_function("candidates_6_misspelled", |b| {
        b.iter(|| {
            for f in &forms {
                std::hint::black_box(stave_da::candidates::generate(
                    f,
                    &lexicon,
                    &index,
                    &policy.candidate_generation,
                ));
            }
        });
    });
}

/// Full pipeline on first sight of each token. Distinct tokens per
/// iteration batch defeat the result cache, so this measures the cold path.
fn bench_classify_cold(c: &mut Criterion) {
    let engine = TypoEngine::from_lexicon(policy(), build_lexicon());
    let mut round = 0u64;

    c.bench_function("classify_cold_6_misspelled", |b| {
        b.iter(|| {
            round += 1;
            let scope = round.to_string();
            for word in MISSPELLED {
                let mut request = ClassifyRequest::new(word);
                request.scope = Some(&scope);
                std::hint::black_box(engine.classify(&request));
            }
        });
    });
}

/// Full pipeline on repeated tokens, dominated by the result cache.
fn bench_classify_cached(c: &mut Criterion) {
    let engine = TypoEngine::from_lexicon(policy(), build_lexicon());
    for word in MISSPELLED {
        engine.classify(&ClassifyRequest::new(word));
    }

    c.bench_function("classify_cached_6_misspelled", |b| {
        b.iter(|| {
            for word in MISSPELLED {
                std::hint::black_box(engine.classify(&ClassifyRequest::new(word)));
            }
        });
    });
}

/// Gate-rejected tokens: the short-circuit path that skips the index.
fn bench_classify_gated(c: &mut Criterion) {
    let engine = TypoEngine::from_lexicon(policy(), build_lexicon());
    let gated = ["2024", "ab", "jens@example.dk", "https://example.dk", "A/S"];

    c.bench_function("classify_gated_5_tokens", |b| {
        b.iter(|| {
            for word in &gated {
                std::hint::black_box(engine.classify(&ClassifyRequest::new(word)));
            }
        });
    });
}

criterion_group!(
    benches,
    bench_index_build,
    bench_candidate_generation,
    bench_classify_cold,
    bench_classify_cached,
    bench_classify_gated,
);
criterion_main!(benches);
