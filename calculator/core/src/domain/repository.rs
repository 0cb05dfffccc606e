// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Domain Repository Interface
//!
//! Persistence contract for the [`Calculation`] aggregate, following the DDD
//! Repository pattern: the interface lives in the domain layer and is
//! implemented in `crate::infrastructure::repositories`.
//!
//! | Trait | Aggregate | Implementations |
//! |-------|-----------|----------------|
//! | `CalculationRepository` | `Calculation` | `InMemoryCalculationRepository` |
//!
//! ## Storage Backend Abstraction
//!
//! The concrete store is picked once at startup from configuration
//! (`spec.storage.backend`) by `crate::application::repository_factory`.
//! Only the in-memory store exists today; a durable backend plugs in behind
//! the same trait without changing any caller.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::calculation::{Calculation, CalculationId};

/// Storage backend enum for pluggable persistence
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// Process-lifetime map; contents are lost on restart.
    #[default]
    InMemory,
}

/// Repository interface for Calculation aggregates.
///
/// Every operation is atomic with respect to every other call on the same
/// repository. Concurrent saves to the same id are last-writer-wins.
#[async_trait]
pub trait CalculationRepository: Send + Sync {
    /// Save calculation, replacing any entry with the same id
    async fn save(&self, calculation: &Calculation) -> Result<(), RepositoryError>;

    /// Find calculation by ID; `None` when absent
    async fn find_by_id(&self, id: CalculationId) -> Result<Option<Calculation>, RepositoryError>;

    /// List all calculations. Order is unspecified.
    async fn list_all(&self) -> Result<Vec<Calculation>, RepositoryError>;

    /// Delete calculation by ID. Returns `true` iff an entry was removed.
    async fn delete(&self, id: CalculationId) -> Result<bool, RepositoryError>;
}

/// Repository errors
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// The backing store could not complete the operation.
    #[error("Storage error: {0}")]
    Storage(String),
}
