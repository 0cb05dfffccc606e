// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Emergy Calculator Core
//!
//! Turns delimited measurement text into stored emergy calculations.
//!
//! # Architecture
//!
//! - **Layer:** Core System
//! - **Purpose:** Record parsing, aggregation, persistence and the HTTP adapter
//!
//! Raw text flows through [`infrastructure::record_parser`] into
//! [`domain::InputQuantity`] values, [`domain::Calculation::create`] derives the
//! total through an [`domain::AggregationStrategy`], and the
//! [`application::CalculationService`] persists the result behind a
//! [`domain::CalculationRepository`].

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
