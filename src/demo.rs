//! Synthetic data-processing demo.
//!
//! Generates records with injected malformations and runs them through a
//! [`DataProcessor`] in batches, so that the logging and error paths of the
//! tool can be observed end to end.

use crate::config::DemoConfig;
use crate::stats::{self, StatsError};
use anyhow::{Context, Result, bail};
use chrono::Utc;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Record produced by [`generate_sample_data`].
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: Option<String>,
    pub alt_id: Option<String>,
    pub value: Value,
    pub timestamp: String,
}

/// Problem found while processing an [`Item`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ItemError {
    #[error("invalid item format: missing 'id' (alt_id: {alt_id:?})")]
    MissingId { alt_id: Option<String> },

    #[error("item {id}: 'value' is not a number, found {found}")]
    NonNumericValue { id: String, found: String },
}

/// Mean and standard deviation of the numeric values seen by a processor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueStats {
    pub mean: f64,
    pub std_dev: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub processor_name: String,
    pub processed_count: usize,
    pub invalid_count: usize,
    pub warning_count: usize,
    pub issues: Vec<ItemError>,
    pub value_stats: Option<ValueStats>,
}

/// Generate `cfg.n_items` items, some of them deliberately malformed.
pub fn generate_sample_data(cfg: &DemoConfig) -> Vec<Item> {
    (0..cfg.n_items)
        .map(|i| {
            let mut item = Item {
                id: Some(format!("item_{i:04}")),
                alt_id: None,
                value: Value::from(i * 10),
                timestamp: Utc::now().to_rfc3339(),
            };
            if i % cfg.bad_value_every == 0 {
                item.value = Value::from("not_a_number");
            }
            if i % cfg.missing_id_every == 0 {
                item.id = None;
                item.alt_id = Some(format!("corrupt_{i:04}"));
            }
            item
        })
        .collect()
}

/// One entry of a [`DataProcessor`]'s processing log.
#[derive(Debug, Clone, PartialEq)]
pub enum LogEntry {
    Processed(String),
    Rejected(ItemError),
    Warned(ItemError),
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogEntry::Processed(id) => write!(f, "PROCESSED: {id}"),
            LogEntry::Rejected(error) => write!(f, "ERROR: {error}"),
            LogEntry::Warned(warning) => write!(f, "WARNING: {warning}"),
        }
    }
}

pub struct DataProcessor {
    name: String,
    processed_count: usize,
    log: Vec<LogEntry>,
    vals: Vec<f64>,
}

impl DataProcessor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            processed_count: 0,
            log: Vec::new(),
            vals: Vec::new(),
        }
    }

    /// Process a single item.
    ///
    /// Items without an id are rejected. Items with a non-numeric value are
    /// processed but leave a warning behind.
    pub fn process_item(&mut self, item: &Item) -> Result<(), ItemError> {
        let Some(id) = &item.id else {
            let error = ItemError::MissingId {
                alt_id: item.alt_id.clone(),
            };
            log::warn!("[{}] rejected item: {error}", self.name);
            self.log.push(LogEntry::Rejected(error.clone()));
            return Err(error);
        };

        match item.value.as_f64() {
            Some(val) => self.vals.push(val),
            None => {
                let warning = ItemError::NonNumericValue {
                    id: id.clone(),
                    found: json_type_name(&item.value).to_string(),
                };
                log::warn!("[{}] {warning}", self.name);
                self.log.push(LogEntry::Warned(warning));
            }
        }

        log::debug!("[{}] processed item {id}", self.name);
        self.processed_count += 1;
        self.log.push(LogEntry::Processed(id.clone()));
        Ok(())
    }

    pub fn processed_count(&self) -> usize {
        self.processed_count
    }

    /// Every processed, rejected and warned item, in processing order.
    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    /// Summarize the items seen so far.
    ///
    /// # Errors
    /// Propagates any statistics error other than an empty value list,
    /// which leaves [`Summary::value_stats`] unset.
    pub fn summary(&self) -> Result<Summary, StatsError> {
        let value_stats = match stats::average(&self.vals) {
            Ok(mean) => Some(ValueStats {
                mean,
                std_dev: stats::stddev(&self.vals)?,
            }),
            Err(StatsError::EmptyInput) => None,
            Err(error) => return Err(error),
        };

        let mut invalid_count = 0;
        let mut issues = Vec::new();
        for entry in &self.log {
            match entry {
                LogEntry::Rejected(error) => {
                    invalid_count += 1;
                    issues.push(error.clone());
                }
                LogEntry::Warned(warning) => issues.push(warning.clone()),
                LogEntry::Processed(_) => {}
            }
        }

        Ok(Summary {
            processor_name: self.name.clone(),
            processed_count: self.processed_count,
            invalid_count,
            warning_count: issues.len() - invalid_count,
            issues,
            value_stats,
        })
    }
}

/// Outcome of [`run_demo`].
#[derive(Debug, Clone, PartialEq)]
pub struct DemoReport {
    pub summary: Summary,
    pub log: Vec<LogEntry>,
}

/// Generate sample data and process it in batches.
///
/// # Errors
/// Returns an error if the number of processed items does not match the
/// number of items that passed validation.
pub fn run_demo(cfg: &DemoConfig) -> Result<DemoReport> {
    cfg.validate().context("failed to validate config")?;

    let items = generate_sample_data(cfg);
    log::info!("generated {} sample items", items.len());

    let mut processor = DataProcessor::new(cfg.processor_name.clone());

    for (i_batch, batch) in items.chunks(cfg.batch_size).enumerate() {
        let first = i_batch * cfg.batch_size + 1;
        let last = first + batch.len() - 1;
        log::info!("processing batch {} (items {first}-{last})", i_batch + 1);

        for item in batch {
            // Rejections are recorded by the processor.
            let _ = processor.process_item(item);
        }
    }

    let summary = processor.summary().context("failed to summarize values")?;

    let exp_processed = cfg.n_items - summary.invalid_count;
    if summary.processed_count != exp_processed {
        bail!(
            "processed {} items, but expected {exp_processed}",
            summary.processed_count
        );
    }

    Ok(DemoReport {
        summary,
        log: processor.log().to_vec(),
    })
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn item(id: Option<&str>, value: Value) -> Item {
        Item {
            id: id.map(str::to_string),
            alt_id: None,
            value,
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    #[test]
    fn sample_data_injects_malformations() {
        let items = generate_sample_data(&DemoConfig::default());
        assert_eq!(items.len(), 250);

        assert_eq!(items[0].id, None);
        assert_eq!(items[0].alt_id.as_deref(), Some("corrupt_0000"));
        assert_eq!(items[0].value, Value::from("not_a_number"));

        assert_eq!(items[1].id.as_deref(), Some("item_0001"));
        assert_eq!(items[1].value, Value::from(10));

        assert_eq!(items[14].value, Value::from("not_a_number"));
        assert_eq!(items[26].id, None);

        assert_eq!(items.iter().filter(|item| item.id.is_none()).count(), 20);
    }

    #[test]
    fn processor_rejects_items_without_id() {
        let mut processor = DataProcessor::new("test");
        let result = processor.process_item(&item(None, Value::from(3)));

        assert_eq!(result, Err(ItemError::MissingId { alt_id: None }));
        assert_eq!(processor.processed_count(), 0);
        assert_eq!(processor.summary().unwrap().invalid_count, 1);
    }

    #[test]
    fn processor_keeps_items_with_non_numeric_values() {
        let mut processor = DataProcessor::new("test");
        processor
            .process_item(&item(Some("a"), Value::from("oops")))
            .unwrap();
        processor
            .process_item(&item(Some("b"), Value::from(4.0)))
            .unwrap();
        processor
            .process_item(&item(Some("c"), Value::from(8.0)))
            .unwrap();

        let summary = processor.summary().unwrap();
        assert_eq!(summary.processed_count, 3);
        assert_eq!(summary.warning_count, 1);
        assert_eq!(
            summary.issues,
            vec![ItemError::NonNumericValue {
                id: "a".to_string(),
                found: "string".to_string(),
            }]
        );
        assert_eq!(
            summary.value_stats,
            Some(ValueStats {
                mean: 6.0,
                std_dev: 2.0,
            })
        );
    }

    #[test]
    fn processing_log_records_every_outcome() {
        let mut processor = DataProcessor::new("test");
        let _ = processor.process_item(&item(Some("a"), Value::from(1)));
        let _ = processor.process_item(&item(None, Value::from(2)));
        let _ = processor.process_item(&item(Some("c"), Value::Bool(true)));

        let entries: Vec<_> = processor.log().iter().map(ToString::to_string).collect();
        assert_eq!(
            entries,
            vec![
                "PROCESSED: a",
                "ERROR: invalid item format: missing 'id' (alt_id: None)",
                "WARNING: item c: 'value' is not a number, found bool",
                "PROCESSED: c",
            ]
        );
    }

    #[test]
    fn summary_without_numeric_values_has_no_stats() {
        let mut processor = DataProcessor::new("test");
        processor.process_item(&item(Some("a"), Value::Null)).unwrap();
        assert_eq!(processor.summary().unwrap().value_stats, None);

        let empty = DataProcessor::new("empty");
        assert_eq!(empty.summary().unwrap().value_stats, None);
    }

    #[test]
    fn default_demo_counts() {
        let report = run_demo(&DemoConfig::default()).unwrap();
        let summary = &report.summary;
        assert_eq!(summary.processed_count, 230);
        assert_eq!(summary.invalid_count, 20);
        assert_eq!(summary.warning_count, 33);
        assert_eq!(summary.issues.len(), 53);
        assert!(summary.value_stats.is_some());
        assert_eq!(report.log.len(), 230 + 53);
    }

    #[test]
    fn demo_rejects_invalid_config() {
        let cfg = DemoConfig {
            batch_size: 0,
            ..DemoConfig::default()
        };
        assert!(run_demo(&cfg).is_err());
    }
}
