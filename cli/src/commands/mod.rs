// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Command implementations for the emergy CLI

pub mod config;
pub mod ingest;
pub mod serve;

pub use self::config::ConfigCommand;
pub use self::ingest::IngestArgs;
pub use self::serve::ServeArgs;
