// Bounded LRU cache for classification results.
//
// Keyed on the normalized token plus the request fields that influence
// the outcome. The engine clears it on every dictionary or ignore-set
// mutation, so a hit can never outlive the inputs that produced it.

use hashbrown::HashMap;

use stave_core::result::TypoResult;

/// Least-recently-used result cache with a fixed capacity.
///
/// Recency is tracked with a monotonic tick; eviction scans for the
/// stalest entry. Linear eviction is fine at this capacity and keeps the
/// structure a plain map.
#[derive(Debug)]
pub struct ResultCache {
    capacity: usize,
    tick: u64,
    entries: HashMap<String, (TypoResult, u64)>,
}

impl ResultCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            tick: 0,
            entries: HashMap::with_capacity(capacity.min(1024)),
        }
    }

    /// Look up a result, refreshing its recency on a hit.
    pub fn get(&mut self, key: &str) -> Option<TypoResult> {
        self.tick += 1;
        let tick = self.tick;
        let (result, stamp) = self.entries.get_mut(key)?;
        *stamp = tick;
        Some(result.clone())
    }

    /// Insert a result, evicting the least recently used entry when full.
    pub fn insert(&mut self, key: String, result: TypoResult) {
        self.tick += 1;
        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            if let Some(stalest) = self
                .entries
                .iter()
                .min_by_key(|(_, (_, stamp))| *stamp)
                .map(|(k, _)| k.clone())
            {
                self.entries.remove(&stalest);
            }
        }
        self.entries.insert(key, (result, self.tick));
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
