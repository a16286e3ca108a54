use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// A zero-argument packet constructor.
pub type Factory<P> = Arc<dyn Fn() -> P + Send + Sync>;

/// A packet-ID indexed table of constructors for one traffic direction.
///
/// Pools are immutable once built. A version derives its pool from the next newer
/// version's by copying it and applying overrides and removals, which leaves the
/// source pool untouched.
pub struct Pool<P> {
    entries: BTreeMap<u32, Factory<P>>,
}

impl<P> Clone for Pool<P> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<P> Default for Pool<P> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<P> fmt::Debug for Pool<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.entries.keys()).finish()
    }
}

impl<P: 'static> Pool<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `factory` under `id`, replacing whatever occupied it.
    pub fn with(mut self, id: u32, factory: impl Fn() -> P + Send + Sync + 'static) -> Self {
        self.entries.insert(id, Arc::new(factory));
        self
    }

    /// Removes the entry for `id`.
    pub fn without(mut self, id: u32) -> Self {
        self.entries.remove(&id);
        self
    }

    /// Constructs an empty packet for `id`, if the pool knows it.
    pub fn create(&self, id: u32) -> Option<P> {
        self.entries.get(&id).map(|factory| factory())
    }

    pub fn contains(&self, id: u32) -> bool {
        self.entries.contains_key(&id)
    }

    /// Registered IDs in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.entries.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Wraps every constructor's output, e.g. to lift a pool into a wider packet type.
    pub fn map<Q: 'static>(self, wrap: fn(P) -> Q) -> Pool<Q> {
        let entries = self
            .entries
            .into_iter()
            .map(|(id, factory)| {
                let lifted: Factory<Q> = Arc::new(move || wrap(factory()));
                (id, lifted)
            })
            .collect();
        Pool { entries }
    }
}
