//! Deferred, memoized access to item registries.
//!
//! A [`Resolver`] wraps a supplier of "the current registry". The supplier is
//! consulted on every access until it first yields a registry; that registry
//! is then memoized behind a [`OnceLock`] and the supplier is never called
//! again. This lets a link be built (for example while deserializing) before
//! the registry it will query exists.

use std::fmt;
use std::sync::{Arc, OnceLock};

/// Keyed lookup from identifier to live item.
pub trait ItemLookup<T>: Send + Sync {
    /// Current item with `id`, if one exists.
    fn lookup(&self, id: &str) -> Option<Arc<T>>;

    /// Whether an item with `id` currently exists.
    fn contains(&self, id: &str) -> bool {
        self.lookup(id).is_some()
    }

    /// All items, in registry order.
    fn items(&self) -> Vec<Arc<T>>;
}

type Supplier<T> = dyn Fn() -> Option<Arc<dyn ItemLookup<T>>> + Send + Sync;

struct ResolverInner<T> {
    supplier: Box<Supplier<T>>,
    registry: OnceLock<Arc<dyn ItemLookup<T>>>,
}

/// Lazily acquired handle to the registry of `T`.
///
/// Clones share the memoized registry.
pub struct Resolver<T> {
    inner: Arc<ResolverInner<T>>,
}

impl<T: 'static> Resolver<T> {
    /// Defer acquisition to `supplier`, which may return `None` until the
    /// registry becomes available.
    pub fn deferred<F>(supplier: F) -> Self
    where
        F: Fn() -> Option<Arc<dyn ItemLookup<T>>> + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(ResolverInner {
                supplier: Box::new(supplier),
                registry: OnceLock::new(),
            }),
        }
    }

    /// A resolver bound to an existing registry.
    pub fn ready(registry: Arc<dyn ItemLookup<T>>) -> Self {
        let resolver = Self::deferred(|| None);
        let _ = resolver.inner.registry.set(registry);
        resolver
    }

    /// A resolver that never reaches a registry. Every id stays unresolved.
    pub fn detached() -> Self {
        Self::deferred(|| None)
    }

    /// The registry, acquiring and memoizing it on first success.
    pub fn registry(&self) -> Option<&Arc<dyn ItemLookup<T>>> {
        if let Some(registry) = self.inner.registry.get() {
            return Some(registry);
        }
        let acquired = (self.inner.supplier)()?;
        // A racing initializer may win; either value came from the same supplier.
        Some(self.inner.registry.get_or_init(|| acquired))
    }

    /// Whether a registry has been acquired.
    pub fn is_ready(&self) -> bool {
        self.inner.registry.get().is_some()
    }

    /// Resolve `id` to its live item. `None` is a resolution gap, not an error.
    pub fn resolve(&self, id: &str) -> Option<Arc<T>> {
        self.registry()?.lookup(id)
    }
}

impl<T> Clone for Resolver<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for Resolver<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("ready", &self.inner.registry.get().is_some())
            .finish()
    }
}
