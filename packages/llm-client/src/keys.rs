//! API key pool.
//!
//! Free-tier Gemini keys hit per-key quotas quickly, so deployments configure
//! several keys and every request picks one at random.

use rand::Rng;

/// A non-empty set of API keys.
#[derive(Clone)]
pub struct KeyPool {
    keys: Vec<String>,
}

impl KeyPool {
    /// Build a pool from individual keys. Blank keys are dropped.
    ///
    /// Returns `None` when no usable key remains.
    pub fn new<I, S>(keys: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keys: Vec<String> = keys
            .into_iter()
            .map(Into::into)
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect();

        if keys.is_empty() {
            None
        } else {
            Some(Self { keys })
        }
    }

    /// Build a pool from a comma-separated list, falling back to a single key.
    pub fn from_list(list: Option<&str>, single: Option<&str>) -> Option<Self> {
        list.and_then(|l| Self::new(l.split(',')))
            .or_else(|| single.and_then(|k| Self::new([k])))
    }

    /// Pick a key for the next request.
    pub fn pick(&self) -> &str {
        // `new` never builds an empty pool, so the index is always in range.
        let index = rand::thread_rng().gen_range(0..self.keys.len());
        &self.keys[index]
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl std::fmt::Debug for KeyPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPool").field("keys", &self.keys.len()).finish()
    }
}
