//! Backing store handle
//!
//! The handle is owned by exactly one adapter. It moves through
//! `Unopened -> Open -> Closed`. Opening again from `Closed` installs a new
//! store. Only `close` reaches `Closed`.

use crate::error::{StoreError, StoreResult};
use std::mem;

/// Lifecycle state of a backing store owned by an adapter
#[derive(Debug, Default)]
pub enum StoreHandle<B> {
    /// No store has been opened yet
    #[default]
    Unopened,
    /// The store is open
    Open(B),
    /// The store was released by `close`
    Closed,
}

impl<B> StoreHandle<B> {
    pub fn is_open(&self) -> bool {
        matches!(self, StoreHandle::Open(_))
    }

    /// Open store, or `None` when unopened or closed
    pub fn get(&self) -> Option<&B> {
        match self {
            StoreHandle::Open(store) => Some(store),
            _ => None,
        }
    }

    /// Open store, materializing one with `init` while unopened
    ///
    /// Fails with [`StoreError::Closed`] once the handle was closed.
    pub fn get_or_open_with<F>(&mut self, init: F) -> StoreResult<&mut B>
    where
        F: FnOnce() -> StoreResult<B>,
    {
        if let StoreHandle::Unopened = self {
            *self = StoreHandle::Open(init()?);
        }
        match self {
            StoreHandle::Open(store) => Ok(store),
            StoreHandle::Unopened | StoreHandle::Closed => Err(StoreError::Closed),
        }
    }

    /// Open store, failing unless the handle is open
    pub fn get_mut(&mut self) -> StoreResult<&mut B> {
        match self {
            StoreHandle::Open(store) => Ok(store),
            StoreHandle::Unopened | StoreHandle::Closed => Err(StoreError::Closed),
        }
    }

    /// Install a newly opened store, returning the one it replaces
    pub fn replace(&mut self, store: B) -> Option<B> {
        match mem::replace(self, StoreHandle::Open(store)) {
            StoreHandle::Open(previous) => Some(previous),
            _ => None,
        }
    }

    /// Give the store back without closing the handle
    ///
    /// The handle returns to `Unopened`, so the next access may open a store
    /// again.
    pub fn take(&mut self) -> Option<B> {
        if !self.is_open() {
            return None;
        }
        match mem::replace(self, StoreHandle::Unopened) {
            StoreHandle::Open(store) => Some(store),
            _ => None,
        }
    }

    /// Release the store, returning it so the caller controls when it drops
    pub fn close(&mut self) -> Option<B> {
        match mem::replace(self, StoreHandle::Closed) {
            StoreHandle::Open(store) => Some(store),
            _ => None,
        }
    }
}
