// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Aggregation rules that reduce a calculation's inputs to a single total.
//!
//! The rule is a strategy so that a real emergy accounting method (unit-aware
//! transformities, weighting by category) can replace the placeholder without
//! touching the service or the repository.

use super::calculation::InputQuantity;

/// Deterministic, pure reduction of a set of input quantities to a scalar.
///
/// Implementations must not depend on input order or on anything besides the
/// values they are handed.
pub trait AggregationStrategy: Send + Sync {
    fn aggregate(&self, inputs: &[InputQuantity]) -> f64;
}

/// Plain arithmetic sum of every `value`, ignoring units. Empty input sums to 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct SummationStrategy;

impl AggregationStrategy for SummationStrategy {
    fn aggregate(&self, inputs: &[InputQuantity]) -> f64 {
        inputs.iter().map(|input| input.value).sum()
    }
}
