//! Generic element pool
//!
//! A free list of released elements plus injectable `create`, `on_acquire`
//! and `on_release` hooks. Elements whose canvas node has been destroyed
//! while they sat in the free list are discarded on the way out.

use super::canvas::UiCanvas;
use super::nodes::PooledElement;
use super::ElementError;

/// Factory for new elements
pub type CreateHook<T> = Box<dyn FnMut(&mut UiCanvas) -> T>;

/// Hook run on an element entering or leaving the free list
pub type ElementHook<T> = Box<dyn FnMut(&T, &mut UiCanvas) -> Result<(), ElementError>>;

/// Pool traffic counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Elements built by the factory
    pub created: u64,
    /// Elements handed out
    pub acquired: u64,
    /// Elements returned to the free list
    pub released: u64,
    /// Dead elements dropped from the free list
    pub discarded: u64,
}

impl PoolStats {
    /// Sum of two sets of counters
    pub fn merged(self, other: Self) -> Self {
        Self {
            created: self.created + other.created,
            acquired: self.acquired + other.acquired,
            released: self.released + other.released,
            discarded: self.discarded + other.discarded,
        }
    }
}

/// Pool of one element kind
pub struct ElementPool<T> {
    name: String,
    free: Vec<T>,
    create: CreateHook<T>,
    on_acquire: Option<ElementHook<T>>,
    on_release: Option<ElementHook<T>>,
    stats: PoolStats,
}

impl<T: PooledElement + PartialEq> ElementPool<T> {
    /// Create an empty pool with no hooks besides the factory
    pub fn new(name: impl Into<String>, create: impl FnMut(&mut UiCanvas) -> T + 'static) -> Self {
        Self {
            name: name.into(),
            free: Vec::new(),
            create: Box::new(create),
            on_acquire: None,
            on_release: None,
            stats: PoolStats::default(),
        }
    }

    /// Run `hook` on every element handed out
    pub fn with_on_acquire(
        mut self,
        hook: impl FnMut(&T, &mut UiCanvas) -> Result<(), ElementError> + 'static,
    ) -> Self {
        self.on_acquire = Some(Box::new(hook));
        self
    }

    /// Run `hook` on every element returned
    pub fn with_on_release(
        mut self,
        hook: impl FnMut(&T, &mut UiCanvas) -> Result<(), ElementError> + 'static,
    ) -> Self {
        self.on_release = Some(Box::new(hook));
        self
    }

    /// Pool name used in log output
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Take the most recently released live element, or create one
    pub fn acquire(&mut self, canvas: &mut UiCanvas) -> T {
        let element = loop {
            match self.free.pop() {
                Some(element) if element.is_destroyed(canvas) => {
                    self.stats.discarded += 1;
                    log::trace!("Pool '{}' discarded a destroyed element", self.name);
                }
                Some(element) => break element,
                None => {
                    self.stats.created += 1;
                    break (self.create)(canvas);
                }
            }
        };

        if let Some(hook) = self.on_acquire.as_mut() {
            if let Err(err) = hook(&element, canvas) {
                log::warn!("Pool '{}' acquire hook failed: {err}", self.name);
            }
        }

        self.stats.acquired += 1;
        log::trace!("Pool '{}' acquired element ({} free)", self.name, self.free.len());
        element
    }

    /// Return an element to the free list
    ///
    /// Destroyed elements and elements already in the free list are ignored.
    pub fn release(&mut self, element: T, canvas: &mut UiCanvas) {
        if element.is_destroyed(canvas) {
            log::trace!("Pool '{}' ignored release of a destroyed element", self.name);
            return;
        }
        if self.free.contains(&element) {
            return;
        }

        if let Some(hook) = self.on_release.as_mut() {
            if let Err(err) = hook(&element, canvas) {
                log::warn!("Pool '{}' release hook failed: {err}", self.name);
            }
        }

        self.free.push(element);
        self.stats.released += 1;
    }

    /// Release a batch of elements
    pub fn release_all(&mut self, elements: impl IntoIterator<Item = T>, canvas: &mut UiCanvas) {
        for element in elements {
            self.release(element, canvas);
        }
    }

    /// Drop every pooled element without running the release hook
    pub fn clear(&mut self) {
        log::debug!("Pool '{}' cleared {} free elements", self.name, self.free.len());
        self.free.clear();
    }

    /// Number of elements waiting in the free list
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Traffic counters
    pub fn stats(&self) -> PoolStats {
        self.stats
    }
}

impl<T> std::fmt::Debug for ElementPool<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElementPool")
            .field("name", &self.name)
            .field("free", &self.free.len())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
