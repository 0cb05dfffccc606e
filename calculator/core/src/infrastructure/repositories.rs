// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Repository Implementations
//!
//! Infrastructure implementations of the repository abstraction defined in
//! the domain layer.
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure
//! - **Purpose:** Persist and retrieve calculation aggregates
//! - **Pattern:** Repository (DDD), Adapter (Hexagonal Architecture)
//!
//! # Available Implementations
//!
//! - **InMemoryCalculationRepository** - `RwLock<HashMap>` store living as
//!   long as the process. Cloning shares the same map.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::domain::calculation::{Calculation, CalculationId};
use crate::domain::repository::{CalculationRepository, RepositoryError};

#[derive(Clone, Default)]
pub struct InMemoryCalculationRepository {
    calculations: Arc<RwLock<HashMap<CalculationId, Calculation>>>,
}

impl InMemoryCalculationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CalculationRepository for InMemoryCalculationRepository {
    async fn save(&self, calculation: &Calculation) -> Result<(), RepositoryError> {
        let mut calculations = self.calculations.write();
        calculations.insert(calculation.id(), calculation.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: CalculationId) -> Result<Option<Calculation>, RepositoryError> {
        let calculations = self.calculations.read();
        Ok(calculations.get(&id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Calculation>, RepositoryError> {
        let calculations = self.calculations.read();
        Ok(calculations.values().cloned().collect())
    }

    async fn delete(&self, id: CalculationId) -> Result<bool, RepositoryError> {
        let mut calculations = self.calculations.write();
        Ok(calculations.remove(&id).is_some())
    }
}
