// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Calculation Service
//!
//! Orchestrates parser → aggregation → repository to turn raw record text
//! into a stored [`Calculation`], and exposes the read and delete side.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Use cases consumed by the presentation adapters
//!
//! Operations are single-shot: no caching and no retries. Creating is not
//! idempotent, every call mints a new id even for identical text.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::aggregation::{AggregationStrategy, SummationStrategy};
use crate::domain::calculation::{Calculation, CalculationId, Metadata};
use crate::domain::repository::{CalculationRepository, RepositoryError};
use crate::infrastructure::record_parser::{self, Dialect};

#[derive(Debug, thiserror::Error)]
pub enum CalculationError {
    #[error("Ingestion failed: input is not valid UTF-8 text ({0})")]
    InvalidEncoding(#[from] std::str::Utf8Error),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

#[async_trait]
pub trait CalculationService: Send + Sync {
    /// Parse `raw`, aggregate the inputs, persist and return the new calculation.
    async fn create_from_records(
        &self,
        dialect: Dialect,
        raw: &str,
        metadata: Metadata,
    ) -> Result<Calculation, CalculationError>;

    /// Same as [`create_from_records`](Self::create_from_records) for
    /// undecoded bytes. Fails with [`CalculationError::InvalidEncoding`]
    /// when the bytes are not UTF-8.
    async fn create_from_bytes(
        &self,
        dialect: Dialect,
        raw: &[u8],
        metadata: Metadata,
    ) -> Result<Calculation, CalculationError> {
        let text = std::str::from_utf8(raw)?;
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        self.create_from_records(dialect, text, metadata).await
    }

    async fn get_calculation(
        &self,
        id: CalculationId,
    ) -> Result<Option<Calculation>, CalculationError>;

    /// All stored calculations, in no particular order.
    async fn list_calculations(&self) -> Result<Vec<Calculation>, CalculationError>;

    /// `true` iff a calculation was removed.
    async fn delete_calculation(&self, id: CalculationId) -> Result<bool, CalculationError>;
}

pub struct StandardCalculationService {
    repository: Arc<dyn CalculationRepository>,
    strategy: Arc<dyn AggregationStrategy>,
}

impl StandardCalculationService {
    /// Service using the plain summation rule.
    pub fn new(repository: Arc<dyn CalculationRepository>) -> Self {
        Self::with_strategy(repository, Arc::new(SummationStrategy))
    }

    pub fn with_strategy(
        repository: Arc<dyn CalculationRepository>,
        strategy: Arc<dyn AggregationStrategy>,
    ) -> Self {
        Self {
            repository,
            strategy,
        }
    }
}

#[async_trait]
impl CalculationService for StandardCalculationService {
    async fn create_from_records(
        &self,
        dialect: Dialect,
        raw: &str,
        metadata: Metadata,
    ) -> Result<Calculation, CalculationError> {
        let inputs = record_parser::parse(dialect, raw);
        let calculation = Calculation::create(inputs, metadata, self.strategy.as_ref());

        self.repository.save(&calculation).await?;

        info!(
            calculation_id = %calculation.id(),
            %dialect,
            inputs = calculation.inputs().len(),
            total_emergy = calculation.total_emergy(),
            "Calculation created"
        );
        Ok(calculation)
    }

    async fn get_calculation(
        &self,
        id: CalculationId,
    ) -> Result<Option<Calculation>, CalculationError> {
        let calculation = self.repository.find_by_id(id).await?;
        if calculation.is_none() {
            debug!(calculation_id = %id, "Calculation not found");
        }
        Ok(calculation)
    }

    async fn list_calculations(&self) -> Result<Vec<Calculation>, CalculationError> {
        Ok(self.repository.list_all().await?)
    }

    async fn delete_calculation(&self, id: CalculationId) -> Result<bool, CalculationError> {
        let removed = self.repository.delete(id).await?;
        if removed {
            info!(calculation_id = %id, "Calculation deleted");
        } else {
            debug!(calculation_id = %id, "Delete requested for unknown calculation");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::calculation::InputQuantity;
    use crate::infrastructure::repositories::InMemoryCalculationRepository;

    struct UnavailableRepository;

    #[async_trait]
    impl CalculationRepository for UnavailableRepository {
        async fn save(&self, _calculation: &Calculation) -> Result<(), RepositoryError> {
            Err(RepositoryError::Storage("disk offline".to_string()))
        }

        async fn find_by_id(
            &self,
            _id: CalculationId,
        ) -> Result<Option<Calculation>, RepositoryError> {
            Err(RepositoryError::Storage("disk offline".to_string()))
        }

        async fn list_all(&self) -> Result<Vec<Calculation>, RepositoryError> {
            Err(RepositoryError::Storage("disk offline".to_string()))
        }

        async fn delete(&self, _id: CalculationId) -> Result<bool, RepositoryError> {
            Err(RepositoryError::Storage("disk offline".to_string()))
        }
    }

    struct CountingStrategy;

    impl AggregationStrategy for CountingStrategy {
        fn aggregate(&self, inputs: &[InputQuantity]) -> f64 {
            inputs.len() as f64
        }
    }

    #[tokio::test]
    async fn test_generic_dialect_uses_stub_inputs() {
        let service =
            StandardCalculationService::new(Arc::new(InMemoryCalculationRepository::new()));

        let calculation = service
            .create_from_records(Dialect::Generic, "anything,at,all", Metadata::new())
            .await
            .unwrap();

        assert_eq!(calculation.inputs().len(), 2);
        assert_eq!(calculation.total_emergy(), 30.0);
    }

    #[tokio::test]
    async fn test_strategy_is_swappable() {
        let service = StandardCalculationService::with_strategy(
            Arc::new(InMemoryCalculationRepository::new()),
            Arc::new(CountingStrategy),
        );

        let calculation = service
            .create_from_records(Dialect::Generic, "", Metadata::new())
            .await
            .unwrap();

        assert_eq!(calculation.total_emergy(), 2.0);
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_rejected_and_nothing_stored() {
        let repository = Arc::new(InMemoryCalculationRepository::new());
        let service = StandardCalculationService::new(repository.clone());

        let result = service
            .create_from_bytes(Dialect::TimeSeries, &[0x44, 0xff, 0xfe, 0x3b], Metadata::new())
            .await;

        assert!(matches!(result, Err(CalculationError::InvalidEncoding(_))));
        assert!(repository.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_bytes_with_byte_order_mark() {
        let service =
            StandardCalculationService::new(Arc::new(InMemoryCalculationRepository::new()));
        let raw = "\u{feff}Date;Time;Global_active_power\n16/12/2006;17:24:00;4.216";

        let calculation = service
            .create_from_bytes(Dialect::TimeSeries, raw.as_bytes(), Metadata::new())
            .await
            .unwrap();

        assert_eq!(calculation.inputs().len(), 7);
        assert_eq!(calculation.inputs()[0].name, "Active Power 16/12/2006 17:24:00");
    }

    #[tokio::test]
    async fn test_storage_failures_surface_as_repository_errors() {
        let service = StandardCalculationService::new(Arc::new(UnavailableRepository));

        let created = service
            .create_from_records(Dialect::Generic, "", Metadata::new())
            .await;
        assert!(matches!(
            created,
            Err(CalculationError::Repository(RepositoryError::Storage(_)))
        ));

        let err = service.list_calculations().await.unwrap_err();
        assert_eq!(err.to_string(), "Repository error: Storage error: disk offline");
        assert!(service.get_calculation(CalculationId::new()).await.is_err());
        assert!(service.delete_calculation(CalculationId::new()).await.is_err());
    }
}
