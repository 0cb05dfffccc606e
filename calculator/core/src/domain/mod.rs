// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Domain Layer
//!
//! Value objects, the calculation aggregate, the aggregation rule and the
//! persistence contract. Nothing in here performs I/O.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Pure model of an emergy calculation

pub mod aggregation;
pub mod calculation;
pub mod config;
pub mod repository;

pub use aggregation::{AggregationStrategy, SummationStrategy};
pub use calculation::{Calculation, CalculationId, InputQuantity, Metadata};
pub use repository::{CalculationRepository, RepositoryError, StorageBackend};
