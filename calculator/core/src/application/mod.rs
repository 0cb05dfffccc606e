// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod calculation_service;
pub mod repository_factory;

pub use calculation_service::{CalculationError, CalculationService, StandardCalculationService};
pub use repository_factory::create_calculation_repository;
