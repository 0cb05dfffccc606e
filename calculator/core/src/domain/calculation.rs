// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::aggregation::AggregationStrategy;

/// Caller-supplied context stored alongside a calculation (e.g. source filename).
/// Opaque to the core.
pub type Metadata = HashMap<String, serde_json::Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CalculationId(pub Uuid);

impl CalculationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for CalculationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CalculationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One normalized, unit-tagged measurement extracted from raw text.
///
/// No range or unit validation happens here; malformed numbers are rejected
/// by the parser before a quantity is ever built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputQuantity {
    pub name: String,
    pub value: f64,
    pub unit: String,
    pub category: String,
    pub description: Option<String>,
}

impl InputQuantity {
    pub fn new(
        name: impl Into<String>,
        value: f64,
        unit: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            value,
            unit: unit.into(),
            category: category.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// The persisted result of one ingestion: its inputs and the derived total.
///
/// Built only through [`Calculation::create`]. Fields are read-only after
/// construction and `total_emergy` is never recomputed. It serializes for
/// the wire but cannot be deserialized back into a stored aggregate:
///
/// ```compile_fail
/// let forged: emergy_core::Calculation = serde_json::from_str("{}").unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Calculation {
    id: CalculationId,
    total_emergy: f64,
    created_at: DateTime<Utc>,
    inputs: Vec<InputQuantity>,
    metadata: Metadata,
}

impl Calculation {
    /// Mint a new identity, run the aggregation rule over `inputs` and stamp
    /// the creation time.
    pub fn create(
        inputs: Vec<InputQuantity>,
        metadata: Metadata,
        strategy: &dyn AggregationStrategy,
    ) -> Self {
        let total_emergy = strategy.aggregate(&inputs);

        Self {
            id: CalculationId::new(),
            total_emergy,
            created_at: Utc::now(),
            inputs,
            metadata,
        }
    }

    pub fn id(&self) -> CalculationId {
        self.id
    }

    pub fn inputs(&self) -> &[InputQuantity] {
        &self.inputs
    }

    pub fn total_emergy(&self) -> f64 {
        self.total_emergy
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }
}
