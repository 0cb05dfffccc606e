// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Record Parser
//!
//! Translates raw delimited text into domain [`InputQuantity`] values.
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure
//! - **Purpose:** Parse external text → Domain objects
//! - **Anti-Corruption:** Column names and units of the source format stop here
//!
//! # Dialects
//!
//! ## Generic (`.csv`)
//!
//! Comma-delimited rows of `name,value,unit,category,description`. Not parsed
//! yet: [`GenericStubParser`] ignores its input and returns two fixed sample
//! quantities.
//!
//! ## Time series (`.txt`)
//!
//! Semicolon-delimited household power-meter readings with a header line:
//!
//! ```text
//! Date;Time;Global_active_power;Global_reactive_power;Voltage;Global_intensity;Sub_metering_1;Sub_metering_2;Sub_metering_3
//! 16/12/2006;17:24:00;4.216;0.418;234.840;18.400;0.000;1.000;17.000
//! ```
//!
//! Every accepted row expands into seven quantities, one per channel, in the
//! column order above. Rows whose field count differs from the header, or
//! with a non-numeric channel value, are dropped whole. A channel column
//! missing from the header reads as `0`.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::calculation::InputQuantity;

// ============================================================================
// Dialect selection
// ============================================================================

/// Input-text format variant selecting which parsing rule applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    /// Comma-delimited generic rows (stubbed)
    Generic,
    /// Semicolon-delimited power-meter time series
    TimeSeries,
}

impl Dialect {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::Generic => "generic",
            Dialect::TimeSeries => "time_series",
        }
    }

    /// Infer the dialect from an uploaded file name (`.csv` or `.txt`).
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let (_, extension) = file_name.rsplit_once('.')?;
        match extension.to_ascii_lowercase().as_str() {
            "csv" => Some(Dialect::Generic),
            "txt" => Some(Dialect::TimeSeries),
            _ => None,
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown dialect '{0}'. Expected one of: generic, csv, time_series, txt")]
pub struct UnknownDialect(pub String);

impl FromStr for Dialect {
    type Err = UnknownDialect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "generic" | "csv" => Ok(Dialect::Generic),
            "time_series" | "time-series" | "timeseries" | "txt" => Ok(Dialect::TimeSeries),
            other => Err(UnknownDialect(other.to_string())),
        }
    }
}

// ============================================================================
// Parsers
// ============================================================================

/// Converts raw text into an ordered sequence of input quantities.
///
/// Parsing is best-effort: malformed rows are dropped, never reported.
pub trait RecordParser: Send + Sync {
    fn parse(&self, raw: &str) -> Vec<InputQuantity>;
}

/// Parser for the given dialect.
pub fn parser_for(dialect: Dialect) -> &'static dyn RecordParser {
    match dialect {
        Dialect::Generic => &GenericStubParser,
        Dialect::TimeSeries => &TimeSeriesParser,
    }
}

/// Parse `raw` with the rule selected by `dialect`.
pub fn parse(dialect: Dialect, raw: &str) -> Vec<InputQuantity> {
    parser_for(dialect).parse(raw)
}

/// Placeholder for the comma-delimited dialect.
///
/// The input text is discarded and two fixed sample quantities come back.
/// Column mapping for real generic rows has not been defined yet.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericStubParser;

impl RecordParser for GenericStubParser {
    fn parse(&self, raw: &str) -> Vec<InputQuantity> {
        debug!(bytes = raw.len(), "Generic dialect is stubbed; returning sample inputs");

        vec![
            InputQuantity::new("Input 1", 10.0, "kg", "Material")
                .with_description("Sample input 1"),
            InputQuantity::new("Input 2", 20.0, "kWh", "Energy")
                .with_description("Sample input 2"),
        ]
    }
}

/// One measured column of the power-meter format.
struct Channel {
    column: &'static str,
    label: &'static str,
    unit: &'static str,
    category: &'static str,
    location: Option<&'static str>,
}

/// Emission order within a row.
const CHANNELS: [Channel; 7] = [
    Channel {
        column: "Global_active_power",
        label: "Active Power",
        unit: "kW",
        category: "Active Power",
        location: None,
    },
    Channel {
        column: "Global_reactive_power",
        label: "Reactive Power",
        unit: "kVAR",
        category: "Reactive Power",
        location: None,
    },
    Channel {
        column: "Voltage",
        label: "Voltage",
        unit: "V",
        category: "Voltage",
        location: None,
    },
    Channel {
        column: "Global_intensity",
        label: "Intensity",
        unit: "A",
        category: "Intensity",
        location: None,
    },
    Channel {
        column: "Sub_metering_1",
        label: "Sub Metering 1",
        unit: "Wh",
        category: "Sub Metering",
        location: Some("Kitchen"),
    },
    Channel {
        column: "Sub_metering_2",
        label: "Sub Metering 2",
        unit: "Wh",
        category: "Sub Metering",
        location: Some("Laundry Room"),
    },
    Channel {
        column: "Sub_metering_3",
        label: "Sub Metering 3",
        unit: "Wh",
        category: "Sub Metering",
        location: Some("Water Heater & AC"),
    },
];

const DELIMITER: char = ';';
const DATE_COLUMN: &str = "Date";
const TIME_COLUMN: &str = "Time";

#[derive(Debug, thiserror::Error)]
enum RowRejection {
    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("column '{column}' is not numeric: '{value}'")]
    NotNumeric { column: &'static str, value: String },
}

/// Parser for semicolon-delimited power-meter readings.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeSeriesParser;

impl TimeSeriesParser {
    fn parse_row(headers: &[&str], line: &str) -> Result<[InputQuantity; 7], RowRejection> {
        let fields: Vec<&str> = line.split(DELIMITER).collect();
        if fields.len() != headers.len() {
            return Err(RowRejection::FieldCount {
                expected: headers.len(),
                found: fields.len(),
            });
        }

        let row: HashMap<&str, &str> = headers.iter().copied().zip(fields).collect();

        // Every channel must read cleanly before anything is emitted
        let mut values = [0.0_f64; 7];
        for (slot, channel) in values.iter_mut().zip(CHANNELS.iter()) {
            if let Some(raw) = row.get(channel.column) {
                *slot = raw.trim().parse().map_err(|_| RowRejection::NotNumeric {
                    column: channel.column,
                    value: raw.to_string(),
                })?;
            }
        }

        let date = row.get(DATE_COLUMN).copied().unwrap_or_default();
        let time = row.get(TIME_COLUMN).copied().unwrap_or_default();
        let stamp = format!("Date: {}, Time: {}", date, time);

        Ok(std::array::from_fn(|i| {
            let channel = &CHANNELS[i];
            let description = match channel.location {
                Some(location) => format!("{} - {}", location, stamp),
                None => stamp.clone(),
            };
            InputQuantity::new(
                format!("{} {} {}", channel.label, date, time),
                values[i],
                channel.unit,
                channel.category,
            )
            .with_description(description)
        }))
    }
}

impl RecordParser for TimeSeriesParser {
    fn parse(&self, raw: &str) -> Vec<InputQuantity> {
        let mut lines = raw.trim().lines();

        let Some(header_line) = lines.next() else {
            return Vec::new();
        };
        let headers: Vec<&str> = header_line.split(DELIMITER).collect();

        let mut inputs = Vec::new();
        let mut skipped = 0usize;

        for (offset, line) in lines.enumerate() {
            match Self::parse_row(&headers, line) {
                Ok(quantities) => inputs.extend(quantities),
                Err(reason) => {
                    skipped += 1;
                    // Header is line 1
                    debug!(line = offset + 2, %reason, "Skipping time-series row");
                }
            }
        }

        debug!(
            quantities = inputs.len(),
            skipped_rows = skipped,
            "Parsed time-series records"
        );
        inputs
    }
}
