//! Persisted-state store.
//!
//! The persisted state is the page fragment, an `application/x-www-form-urlencoded` list of
//! `key=value` pairs. Every [`PersistedState::put`] and [`PersistedState::remove`] re-encodes the
//! whole list and writes it through the [`FragmentCarrier`] immediately; there is no batching at
//! this layer.

use std::sync::{Arc, Mutex, MutexGuard};

use url::form_urlencoded;

/// Well-known persisted keys.
pub mod keys {
    pub const LANG: &str = "lang";
    pub const MODE: &str = "mode";
    pub const GROUPED_CLASSIFICATION: &str = "grouped-classification";
    pub const GROUPED_REGION: &str = "grouped-region";
    pub const REGION_TYPE: &str = "regionType";
    pub const REGION: &str = "region";
    pub const MEASURE: &str = "measure";
    pub const CLASSIFICATION: &str = "classification";
}

/// Keys listed first by [`PersistedState::sorted`], in this order.
pub const PRIORITY_KEYS: [&str; 7] = [
    keys::MODE,
    keys::GROUPED_CLASSIFICATION,
    keys::GROUPED_REGION,
    keys::REGION_TYPE,
    keys::REGION,
    keys::MEASURE,
    keys::CLASSIFICATION,
];

/// Location the encoded state lives in (a URL fragment in a browser host).
pub trait FragmentCarrier: Send {
    /// Current encoded fragment, with or without a leading `#`.
    fn read(&self) -> String;
    /// Replace the encoded fragment.
    fn write(&mut self, fragment: &str);
}

#[derive(Debug, Default)]
struct MemoryFragmentInner {
    fragment: String,
    commits: usize,
}

/// In-memory carrier. Clones share the same fragment so a host can keep a handle and observe
/// commits made by the engine.
#[derive(Debug, Clone, Default)]
pub struct MemoryFragment {
    inner: Arc<Mutex<MemoryFragmentInner>>,
}

impl MemoryFragment {
    pub fn new(fragment: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MemoryFragmentInner {
                fragment: fragment.into(),
                commits: 0,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MemoryFragmentInner> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn fragment(&self) -> String {
        self.lock().fragment.clone()
    }

    /// Number of writes since creation.
    pub fn commits(&self) -> usize {
        self.lock().commits
    }

    /// Overwrite the fragment without counting a commit (simulates the user editing the URL).
    pub fn replace(&self, fragment: impl Into<String>) {
        self.lock().fragment = fragment.into();
    }
}

impl FragmentCarrier for MemoryFragment {
    fn read(&self) -> String {
        self.fragment()
    }

    fn write(&mut self, fragment: &str) {
        let mut inner = self.lock();
        inner.fragment = fragment.to_string();
        inner.commits += 1;
    }
}

/// Ordered key/value view over a [`FragmentCarrier`].
pub struct PersistedState {
    pairs: Vec<(String, String)>,
    carrier: Box<dyn FragmentCarrier>,
}

impl std::fmt::Debug for PersistedState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistedState")
            .field("pairs", &self.pairs)
            .finish_non_exhaustive()
    }
}

impl PersistedState {
    /// Read the carrier's current fragment. Repeated keys keep their first value.
    pub fn load(carrier: Box<dyn FragmentCarrier>) -> Self {
        let pairs = decode(&carrier.read());
        Self { pairs, carrier }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Pairs in insertion order.
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Pairs with [`PRIORITY_KEYS`] first (in that order), then every other key in insertion
    /// order.
    pub fn sorted(&self) -> Vec<(String, String)> {
        let mut out = self.pairs.clone();
        out.sort_by_key(|(key, _)| priority_rank(key));
        out
    }

    /// Insert or replace `key`, keeping the position of an existing entry, and commit.
    pub fn put(&mut self, key: &str, value: &str) {
        match self.pairs.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.pairs.push((key.to_string(), value.to_string())),
        }
        self.commit();
    }

    /// Delete `key` if present and commit.
    pub fn remove(&mut self, key: &str) {
        self.pairs.retain(|(k, _)| k != key);
        self.commit();
    }

    /// Delete every key and commit once.
    pub fn clear(&mut self) {
        self.pairs.clear();
        self.commit();
    }

    /// Current encoded fragment (without `#`).
    pub fn encode(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish()
    }

    fn commit(&mut self) {
        let encoded = self.encode();
        log::trace!("commit fragment: {encoded}");
        self.carrier.write(&encoded);
    }
}

fn priority_rank(key: &str) -> usize {
    PRIORITY_KEYS
        .iter()
        .position(|k| *k == key)
        .unwrap_or(PRIORITY_KEYS.len())
}

fn decode(fragment: &str) -> Vec<(String, String)> {
    let raw = fragment.strip_prefix('#').unwrap_or(fragment);
    let mut pairs: Vec<(String, String)> = Vec::new();
    for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
        if pairs.iter().any(|(k, _)| *k == key) {
            continue;
        }
        pairs.push((key.into_owned(), value.into_owned()));
    }
    pairs
}
