// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Infrastructure layer: text parsing and storage adapters

pub mod record_parser;
pub mod repositories;

pub use record_parser::{Dialect, RecordParser, UnknownDialect};
pub use repositories::InMemoryCalculationRepository;
