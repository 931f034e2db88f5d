// TypoEngine: top-level integration point for typo classification.
//
// Owns the policy (immutable for the process lifetime), the dictionary
// snapshot, the ignored-token set, and the result cache, and runs the
// pipeline: normalize -> gate -> candidates -> rank -> decide.
//
// Design notes:
// - The dictionary snapshot lives behind an `RwLock<Arc<..>>`. Lexeme
//   additions rebuild it while holding the write lock, so concurrent
//   mutations serialize instead of losing each other's entries;
//   in-flight calls keep the `Arc` they started with.
// - `classify` is total. Internal faults are mapped to `new` with the
//   `internal_error` tag at the decision boundary; a single bad token
//   must never fail note analysis.
// - Every dictionary or ignore-set mutation clears the result cache, so
//   the engine stays a pure function of its declared inputs.

use std::sync::{Arc, Mutex, RwLock, RwLockWriteGuard};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use tracing::{debug, error, warn};

use stave_core::reason::{ReasonLog, ReasonTag};
use stave_core::result::{RankedSuggestion, SourceFlag, TypoResult};
use stave_index::{CandidateIndex, DictionarySource, IndexParams, Lexicon};

use crate::cache::ResultCache;
use crate::candidates::generate;
use crate::decision::{decide, DecisionError};
use crate::gate::{evaluate, GateDecision, GateInput};
use crate::ignore::{IgnoredTokenSet, GLOBAL_SCOPE};
use crate::normalize::comparison_forms;
use crate::policy::PolicyConfig;
use crate::ranking::{rank, ContextHints};

/// Result cache capacity.
const RESULT_CACHE_CAPACITY: usize = 4096;

/// Frequency assigned to user-added lexemes; high enough to rank them
/// with common words, since the user has confirmed them explicitly.
const USER_LEXEME_FREQUENCY: u64 = 100;

/// One immutable dictionary snapshot: the merged lexicon and its derived
/// candidate index. Rebuilt whole on any dictionary change.
pub struct DictionarySnapshot {
    pub lexicon: Lexicon,
    pub index: CandidateIndex,
    /// `false` when dictionary loading failed and the engine is degraded
    /// to "no correction available".
    pub available: bool,
}

impl DictionarySnapshot {
    fn build(lexicon: Lexicon, params: IndexParams) -> Self {
        let index = CandidateIndex::build(&lexicon, params);
        let available = !lexicon.is_empty();
        Self {
            lexicon,
            index,
            available,
        }
    }

    fn unavailable(params: IndexParams) -> Self {
        let lexicon = Lexicon::new();
        let index = CandidateIndex::build(&lexicon, params);
        Self {
            lexicon,
            index,
            available: false,
        }
    }
}

/// One classification request.
///
/// POS tag and lemma handling happen upstream; the engine only consumes
/// the tag as an opaque string. The caller guarantees the token already
/// failed exact and lemma matching.
#[derive(Debug, Clone, Copy)]
pub struct ClassifyRequest<'a> {
    pub token: &'a str,
    pub pos_tag: Option<&'a str>,
    pub sentence_start: bool,
    /// Ignore-set scope (note id or similar); `None` matches only
    /// global ignore entries.
    pub scope: Option<&'a str>,
    /// Optional neighboring-token plausibility hints.
    pub context: Option<&'a ContextHints>,
    /// Clock override for ignore-entry expiry, epoch seconds.
    pub now_epoch_secs: Option<u64>,
}

impl<'a> ClassifyRequest<'a> {
    pub fn new(token: &'a str) -> Self {
        Self {
            token,
            pos_tag: None,
            sentence_start: false,
            scope: None,
            context: None,
            now_epoch_secs: None,
        }
    }
}

/// The typo detection and classification engine.
pub struct TypoEngine {
    policy: PolicyConfig,
    dictionary: RwLock<Arc<DictionarySnapshot>>,
    ignored: IgnoredTokenSet,
    cache: Mutex<ResultCache>,
}

impl TypoEngine {
    /// Create an engine from wordlist sources.
    ///
    /// Sources that fail to load are logged and skipped; if nothing loads
    /// the engine degrades to "no correction available" instead of
    /// failing, and every pass-through token classifies as `new` with
    /// the `dictionary_unavailable` tag.
    pub fn new(policy: PolicyConfig, sources: &[DictionarySource]) -> Self {
        let params = index_params(&policy);
        let mut lexicon = Lexicon::new();
        for source in sources {
            match lexicon.load_source(source) {
                Ok(merged) => {
                    debug!(path = %source.path.display(), merged, "loaded wordlist");
                }
                Err(e) => warn!(error = %e, "skipping wordlist source"),
            }
        }
        let snapshot = if lexicon.is_empty() {
            warn!("no dictionary entries loaded; typo correction degraded");
            DictionarySnapshot::unavailable(params)
        } else {
            DictionarySnapshot::build(lexicon, params)
        };
        Self::with_snapshot(policy, snapshot)
    }

    /// Create an engine from an already-merged lexicon.
    pub fn from_lexicon(policy: PolicyConfig, lexicon: Lexicon) -> Self {
        let params = index_params(&policy);
        let snapshot = DictionarySnapshot::build(lexicon, params);
        Self::with_snapshot(policy, snapshot)
    }

    fn with_snapshot(policy: PolicyConfig, snapshot: DictionarySnapshot) -> Self {
        Self {
            policy,
            dictionary: RwLock::new(Arc::new(snapshot)),
            ignored: IgnoredTokenSet::new(),
            cache: Mutex::new(ResultCache::new(RESULT_CACHE_CAPACITY)),
        }
    }

    pub fn policy(&self) -> &PolicyConfig {
        &self.policy
    }

    /// Whether the normalized token (or a digraph alternate) is present
    /// verbatim in the merged dictionary.
    pub fn is_known_word(&self, token: &str) -> bool {
        let forms = comparison_forms(token);
        let snapshot = self.snapshot();
        forms.alternates.iter().any(|f| snapshot.lexicon.contains(f))
    }

    /// Classify a token that failed exact and lemma matching upstream.
    pub fn classify(&self, request: &ClassifyRequest<'_>) -> TypoResult {
        let started = Instant::now();
        let forms = comparison_forms(request.token);
        let now = request.now_epoch_secs.unwrap_or_else(epoch_secs);
        let ignored = self
            .ignored
            .snapshot()
            .contains(&forms.normalized, request.scope, now);

        let gate_decision = evaluate(
            GateInput {
                raw: request.token,
                normalized: &forms.normalized,
                pos_tag: request.pos_tag,
                sentence_start: request.sentence_start,
                ignored,
            },
            &self.policy.gating,
        );
        let proper_noun_bias = match gate_decision {
            GateDecision::Reject(tag) => {
                return self.finish(
                    request,
                    TypoResult::terminal_new(&forms.normalized, ReasonLog::with(tag)),
                    started,
                );
            }
            GateDecision::Pass { proper_noun_bias } => proper_noun_bias,
        };

        // The key carries the raw token, not the normalized form: casing
        // feeds the proper-noun bias, so "Spisr" and "spisr" must not
        // share an entry. Context hints are not part of the key; skip the
        // cache entirely when they are present.
        let cache_key = (request.context.is_none()).then(|| {
            format!(
                "{}|{}|{}|{}",
                request.token,
                request.pos_tag.unwrap_or("-"),
                u8::from(request.sentence_start),
                request.scope.unwrap_or("-"),
            )
        });
        if let Some(key) = &cache_key {
            if let Some(hit) = self.with_cache(|cache| cache.get(key)) {
                return hit;
            }
        }

        let snapshot = self.snapshot();

        // Idempotent self-check: a token present verbatim in the merged
        // dictionary must never classify as a typo, whatever the caller
        // did upstream.
        if forms.alternates.iter().any(|f| snapshot.lexicon.contains(f)) {
            let result = TypoResult::terminal_new(
                &forms.normalized,
                ReasonLog::with(ReasonTag::DictionaryTerm),
            );
            return self.finish_cached(request, cache_key, result, started);
        }

        if !snapshot.available {
            let result = TypoResult::terminal_new(
                &forms.normalized,
                ReasonLog::with(ReasonTag::DictionaryUnavailable),
            );
            return self.finish_cached(request, cache_key, result, started);
        }

        let result = match self.classify_inner(request, &forms, proper_noun_bias, &snapshot) {
            Ok(result) => result,
            Err(e) => {
                error!(token = request.token, error = %e, "typo classification fault");
                TypoResult::terminal_new(
                    &forms.normalized,
                    ReasonLog::with(ReasonTag::InternalError),
                )
            }
        };
        self.finish_cached(request, cache_key, result, started)
    }

    fn classify_inner(
        &self,
        request: &ClassifyRequest<'_>,
        forms: &crate::normalize::ComparisonForms,
        proper_noun_bias: bool,
        snapshot: &DictionarySnapshot,
    ) -> Result<TypoResult, DecisionError> {
        let candidates = generate(
            forms,
            &snapshot.lexicon,
            &snapshot.index,
            &self.policy.candidate_generation,
        );
        let ranking = rank(
            &forms.normalized,
            &candidates,
            request.context,
            &self.policy.scoring_weights,
            snapshot.lexicon.max_frequency(),
        );
        let decision = decide(&ranking, proper_noun_bias, &self.policy.decision_thresholds)?;

        let suggestions: Vec<RankedSuggestion> = ranking
            .candidates
            .iter()
            .take(self.policy.candidate_generation.max_suggestions)
            .map(|c| RankedSuggestion {
                value: c.value.clone(),
                score: c.score,
                source_flags: c.source_flags.clone(),
            })
            .collect();

        Ok(TypoResult {
            status: decision.status,
            normalized: forms.normalized.clone(),
            suggestions,
            confidence: decision.confidence.clamp(0.0, 1.0),
            reason_tags: decision.reasons.into_tags(),
            latency_ms: 0.0,
        })
    }

    /// Add a single user-confirmed lexeme, rebuilding and swapping the
    /// dictionary snapshot. Readers holding the old snapshot are
    /// unaffected until their call completes.
    pub fn add_user_lexeme(&self, lemma: &str) {
        self.add_user_lexemes(std::iter::once(lemma));
    }

    /// Add several user-confirmed lexemes with a single rebuild.
    pub fn add_user_lexemes<'a, I>(&self, lemmas: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        // Rebuild under the write lock: two concurrent additions must not
        // clone the same base snapshot and drop one another's entries.
        let mut guard = self.dictionary_write();
        let mut lexicon = guard.lexicon.clone();
        for lemma in lemmas {
            let normalized = crate::normalize::normalize(lemma);
            if normalized.is_empty() {
                continue;
            }
            lexicon.insert(&normalized, USER_LEXEME_FREQUENCY, 1.0, SourceFlag::UserLexicon);
        }
        *guard = Arc::new(DictionarySnapshot::build(lexicon, index_params(&self.policy)));
        drop(guard);
        self.with_cache(ResultCache::clear);
    }

    /// Reload all wordlist sources from disk, replacing the snapshot.
    pub fn reload_dictionaries(&self, sources: &[DictionarySource]) {
        let params = index_params(&self.policy);
        let mut lexicon = Lexicon::new();
        for source in sources {
            if let Err(e) = lexicon.load_source(source) {
                warn!(error = %e, "skipping wordlist source on reload");
            }
        }
        let snapshot = if lexicon.is_empty() {
            warn!("dictionary reload produced no entries; typo correction degraded");
            DictionarySnapshot::unavailable(params)
        } else {
            DictionarySnapshot::build(lexicon, params)
        };
        self.swap_snapshot(snapshot);
    }

    /// Ignore a token. `scope` defaults to global; expiry is epoch seconds.
    pub fn add_ignored_token(&self, token: &str, scope: Option<&str>, expires_at: Option<u64>) {
        self.ignored
            .add(token, scope.unwrap_or(GLOBAL_SCOPE), expires_at);
        self.with_cache(ResultCache::clear);
    }

    /// Stop ignoring a token, in one scope or everywhere.
    pub fn remove_ignored_token(&self, token: &str, scope: Option<&str>) {
        self.ignored.remove(token, scope);
        self.with_cache(ResultCache::clear);
    }

    /// Replace the ignore set from already-materialized store rows.
    pub fn hydrate_ignored_tokens<I>(&self, rows: I)
    where
        I: IntoIterator<Item = (String, String, Option<u64>)>,
    {
        self.ignored.hydrate(rows);
        self.with_cache(ResultCache::clear);
    }

    fn snapshot(&self) -> Arc<DictionarySnapshot> {
        match self.dictionary.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    fn dictionary_write(&self) -> RwLockWriteGuard<'_, Arc<DictionarySnapshot>> {
        match self.dictionary.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn swap_snapshot(&self, snapshot: DictionarySnapshot) {
        *self.dictionary_write() = Arc::new(snapshot);
        self.with_cache(ResultCache::clear);
    }

    fn with_cache<T>(&self, f: impl FnOnce(&mut ResultCache) -> T) -> T {
        match self.cache.lock() {
            Ok(mut guard) => f(&mut guard),
            Err(poisoned) => f(&mut poisoned.into_inner()),
        }
    }

    fn finish(
        &self,
        request: &ClassifyRequest<'_>,
        mut result: TypoResult,
        started: Instant,
    ) -> TypoResult {
        result.latency_ms = started.elapsed().as_secs_f64() * 1000.0;
        debug!(
            token = request.token,
            status = result.status.as_str(),
            confidence = result.confidence,
            latency_ms = result.latency_ms,
            "classified token"
        );
        result
    }

    fn finish_cached(
        &self,
        request: &ClassifyRequest<'_>,
        cache_key: Option<String>,
        result: TypoResult,
        started: Instant,
    ) -> TypoResult {
        let result = self.finish(request, result, started);
        if let Some(key) = cache_key {
            self.with_cache(|cache| cache.insert(key, result.clone()));
        }
        result
    }
}

fn index_params(policy: &PolicyConfig) -> IndexParams {
    IndexParams {
        max_edit_distance: policy.candidate_generation.max_edit_distance,
        prefix_length: policy.candidate_generation.prefix_length,
    }
}

fn epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
