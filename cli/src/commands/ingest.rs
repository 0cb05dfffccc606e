// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! One-shot ingestion command
//!
//! Runs a file through parser, aggregation and an in-memory store, then
//! prints the calculation as JSON on stdout.

use anyhow::{Context, Result};
use clap::Args;
use serde_json::json;
use std::path::{Path, PathBuf};

use emergy_core::application::{
    create_calculation_repository, CalculationService, StandardCalculationService,
};
use emergy_core::domain::{Calculation, Metadata, StorageBackend};
use emergy_core::infrastructure::Dialect;

#[derive(Args, Debug, Clone)]
pub struct IngestArgs {
    /// Record file to ingest (.csv or .txt)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Input dialect (generic, csv, time_series, txt). Inferred from the extension when omitted.
    #[arg(short, long, value_name = "DIALECT")]
    pub dialect: Option<Dialect>,

    /// Print single-line JSON
    #[arg(long)]
    pub compact: bool,
}

pub async fn execute(args: IngestArgs) -> Result<()> {
    let dialect = resolve_dialect(&args.file, args.dialect)?;
    let bytes = tokio::fs::read(&args.file)
        .await
        .with_context(|| format!("Failed to read {:?}", args.file))?;

    let file_name = args
        .file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let calculation = ingest_bytes(dialect, &bytes, &file_name).await?;

    let output = if args.compact {
        serde_json::to_string(&calculation)?
    } else {
        serde_json::to_string_pretty(&calculation)?
    };
    println!("{}", output);

    Ok(())
}

/// Explicit dialect wins; otherwise the file extension decides.
pub fn resolve_dialect(file: &Path, explicit: Option<Dialect>) -> Result<Dialect> {
    if let Some(dialect) = explicit {
        return Ok(dialect);
    }

    let name = file.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    Dialect::from_file_name(name).with_context(|| {
        format!(
            "Cannot infer dialect from {:?}; use a .csv or .txt file or pass --dialect",
            file
        )
    })
}

/// Run `bytes` through the full pipeline against a fresh in-memory store.
pub async fn ingest_bytes(dialect: Dialect, bytes: &[u8], file_name: &str) -> Result<Calculation> {
    let repository = create_calculation_repository(&StorageBackend::InMemory);
    let service = StandardCalculationService::new(repository);

    let metadata = Metadata::from([
        ("filename".to_string(), json!(file_name)),
        ("source".to_string(), json!("cli")),
    ]);

    service
        .create_from_bytes(dialect, bytes, metadata)
        .await
        .with_context(|| format!("Failed to ingest {}", file_name))
}
