//! Bounded reuse pools for retired cells.
//!
//! Each reuse identifier owns one pool: a LIFO stack of cells that scrolled
//! out of view, plus a factory used when the stack is empty. The stack never
//! grows past its capacity; extra cells are dropped.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use super::CellHandle;
use crate::error::{Result, SheetError};

/// Builds a fresh cell for a pool whose stack is empty.
pub type CellFactory = Box<dyn Fn() -> CellHandle>;

/// Counters describing how a pool has been used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PoolStats {
    /// Cells built by the factory
    pub allocated: usize,
    /// Dequeues served from the stack
    pub reused: usize,
    /// Cells discarded because the stack was full
    pub dropped: usize,
    /// Cells currently waiting on the stack
    pub pooled: usize,
}

/// A per-identifier stack of reusable cells with a fixed capacity.
pub struct ReusePool {
    identifier: String,
    capacity: usize,
    stack: Vec<CellHandle>,
    factory: CellFactory,
    stats: PoolStats,
}

impl ReusePool {
    /// Create an empty pool.
    ///
    /// A capacity of 0 disables pooling: every enqueue drops its cell.
    pub fn new(
        identifier: impl Into<String>,
        capacity: usize,
        factory: impl Fn() -> CellHandle + 'static,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            capacity,
            stack: Vec::new(),
            factory: Box::new(factory),
            stats: PoolStats::default(),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of cells waiting on the stack.
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            pooled: self.stack.len(),
            ..self.stats
        }
    }

    /// Push a retired cell. Returns `false` if the pool was full and the cell
    /// was dropped.
    pub fn enqueue(&mut self, cell: CellHandle) -> bool {
        if self.stack.len() >= self.capacity {
            if self.stats.dropped == 0 {
                tracing::warn!(
                    target: "sheetview::pool",
                    identifier = %self.identifier,
                    capacity = self.capacity,
                    "reuse pool full, dropping cells"
                );
            }
            self.stats.dropped += 1;
            return false;
        }
        self.stack.push(cell);
        true
    }

    /// Pop a pooled cell, or build a new one when the stack is empty.
    ///
    /// The returned cell carries this pool's identifier and has had
    /// `prepare_for_reuse` called on it.
    pub fn dequeue(&mut self) -> CellHandle {
        let mut cell = match self.stack.pop() {
            Some(cell) => {
                self.stats.reused += 1;
                cell
            }
            None => {
                self.stats.allocated += 1;
                (self.factory)()
            }
        };
        cell.state_mut().reuse_identifier.clone_from(&self.identifier);
        cell.prepare_for_reuse();
        cell
    }
}

impl std::fmt::Debug for ReusePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReusePool")
            .field("identifier", &self.identifier)
            .field("capacity", &self.capacity)
            .field("pooled", &self.stack.len())
            .finish_non_exhaustive()
    }
}

/// All reuse pools of one sheet, keyed by reuse identifier.
#[derive(Debug, Default)]
pub struct CellRegistry {
    pools: HashMap<String, ReusePool>,
}

impl CellRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the pool for `identifier`.
    ///
    /// # Errors
    /// [`SheetError::DuplicateReuseIdentifier`] if the identifier already has a pool.
    pub fn register(
        &mut self,
        identifier: &str,
        capacity: usize,
        factory: impl Fn() -> CellHandle + 'static,
    ) -> Result<()> {
        if self.pools.contains_key(identifier) {
            tracing::error!(target: "sheetview::pool", identifier, "duplicate reuse identifier");
            return Err(SheetError::DuplicateReuseIdentifier(identifier.to_string()));
        }
        tracing::debug!(target: "sheetview::pool", identifier, capacity, "registered reuse pool");
        self.pools.insert(
            identifier.to_string(),
            ReusePool::new(identifier, capacity, factory),
        );
        Ok(())
    }

    /// Take a cell from the pool registered for `identifier`.
    ///
    /// # Errors
    /// [`SheetError::UnregisteredReuseIdentifier`] if no pool exists.
    pub fn dequeue(&mut self, identifier: &str) -> Result<CellHandle> {
        match self.pools.get_mut(identifier) {
            Some(pool) => Ok(pool.dequeue()),
            None => {
                tracing::error!(target: "sheetview::pool", identifier, "dequeue of unregistered identifier");
                Err(SheetError::UnregisteredReuseIdentifier(identifier.to_string()))
            }
        }
    }

    /// Return a retired cell to the pool matching its reuse identifier.
    ///
    /// Cells without a registered identifier (e.g. placeholders) are dropped.
    pub fn recycle(&mut self, cell: CellHandle) {
        if let Some(pool) = self.pools.get_mut(cell.reuse_identifier()) {
            pool.enqueue(cell);
        }
    }

    pub fn pool(&self, identifier: &str) -> Option<&ReusePool> {
        self.pools.get(identifier)
    }

    /// Stats per identifier, sorted by identifier.
    pub fn stats(&self) -> BTreeMap<String, PoolStats> {
        self.pools
            .iter()
            .map(|(id, pool)| (id.clone(), pool.stats()))
            .collect()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::cell::{EmptyCell, TextCell};

    fn text_pool(capacity: usize) -> ReusePool {
        ReusePool::new("text", capacity, || Box::new(TextCell::default()))
    }

    #[test]
    fn test_dequeue_allocates_when_empty() {
        let mut pool = text_pool(3);
        let cell = pool.dequeue();
        assert_eq!(cell.reuse_identifier(), "text");
        assert!(cell.downcast_ref::<TextCell>().is_some());
        assert_eq!(pool.stats().allocated, 1);
        assert_eq!(pool.stats().reused, 0);
    }

    #[test]
    fn test_enqueue_then_reuse() {
        let mut pool = text_pool(3);
        let mut cell = pool.dequeue();
        cell.downcast_mut::<TextCell>().unwrap().text = "stale".to_string();
        assert!(pool.enqueue(cell));
        assert_eq!(pool.len(), 1);

        let cell = pool.dequeue();
        assert_eq!(pool.stats().reused, 1);
        assert!(pool.is_empty());
        // prepare_for_reuse ran
        assert!(cell.downcast_ref::<TextCell>().unwrap().text.is_empty());
    }

    #[test]
    fn test_capacity_bound() {
        let mut pool = text_pool(2);
        for _ in 0..5 {
            pool.enqueue(Box::new(TextCell::default()));
        }
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.stats().dropped, 3);
        assert_eq!(pool.stats().pooled, 2);
    }

    #[test]
    fn test_zero_capacity_drops_everything() {
        let mut pool = text_pool(0);
        assert!(!pool.enqueue(Box::new(TextCell::default())));
        assert!(pool.is_empty());
    }

    #[test]
    fn test_registry_errors() {
        let mut registry = CellRegistry::new();
        registry
            .register("text", 4, || Box::new(TextCell::default()))
            .unwrap();
        let err = registry
            .register("text", 4, || Box::new(TextCell::default()))
            .unwrap_err();
        assert!(matches!(err, SheetError::DuplicateReuseIdentifier(id) if id == "text"));

        let err = registry.dequeue("missing").unwrap_err();
        assert!(matches!(err, SheetError::UnregisteredReuseIdentifier(id) if id == "missing"));
    }

    #[test]
    fn test_recycle_routes_by_identifier() {
        let mut registry = CellRegistry::new();
        registry
            .register("text", 4, || Box::new(TextCell::default()))
            .unwrap();
        let cell = registry.dequeue("text").unwrap();
        registry.recycle(cell);
        registry.recycle(Box::new(EmptyCell::default()));
        assert_eq!(registry.pool("text").unwrap().len(), 1);
        assert_eq!(registry.stats()["text"].pooled, 1);
    }
}
