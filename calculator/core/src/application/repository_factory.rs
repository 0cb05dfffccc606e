// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Repository Factory - Application Layer
//!
//! Creates the concrete repository implementation for the configured storage
//! backend. The domain layer only sees the trait; this is the one place that
//! names an infrastructure type.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Wire a storage backend to the repository interface

use std::sync::Arc;

use crate::domain::repository::{CalculationRepository, StorageBackend};
use crate::infrastructure::repositories::InMemoryCalculationRepository;

/// Creates a CalculationRepository implementation based on the configured backend
pub fn create_calculation_repository(backend: &StorageBackend) -> Arc<dyn CalculationRepository> {
    match backend {
        StorageBackend::InMemory => Arc::new(InMemoryCalculationRepository::new()),
    }
}
