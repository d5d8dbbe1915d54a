use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{fmt::Debug, fs, ops::RangeBounds, path::Path};

/// Demo configuration parameters.
///
/// Loaded from a TOML file and validated before use.
/// See [`DemoConfig::from_file`] for loading.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DemoConfig {
    /// Name reported by the processor.
    pub processor_name: String,

    /// Number of generated items.
    pub n_items: usize,
    /// Number of items processed per batch.
    pub batch_size: usize,

    /// Every item whose index is a multiple of this gets a non-numeric value.
    pub bad_value_every: usize,
    /// Every item whose index is a multiple of this loses its id.
    pub missing_id_every: usize,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            processor_name: "numstat-demo".to_string(),
            n_items: 250,
            batch_size: 100,
            bad_value_every: 7,
            missing_id_every: 13,
        }
    }
}

impl DemoConfig {
    /// Load a [`DemoConfig`] from a file.
    ///
    /// Missing fields take their default values.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, deserialized,
    /// or if the configuration values are invalid.
    pub fn from_file<P: AsRef<Path>>(file: P) -> Result<Self> {
        let file = file.as_ref();
        let contents =
            fs::read_to_string(file).with_context(|| format!("failed to read {file:?}"))?;

        let config: DemoConfig = toml::from_str(&contents).context("failed to deserialize config")?;

        config.validate().context("failed to validate config")?;

        Ok(config)
    }

    /// Check every parameter against its allowed range.
    pub fn validate(&self) -> Result<()> {
        if self.processor_name.trim().is_empty() {
            bail!("processor name must not be empty");
        }

        check_num(self.n_items, 1..1_000_000).context("invalid number of items")?;
        check_num(self.batch_size, 1..100_000).context("invalid batch size")?;
        check_num(self.bad_value_every, 1..100_000).context("invalid bad value period")?;
        check_num(self.missing_id_every, 1..100_000).context("invalid missing id period")?;

        Ok(())
    }
}

fn check_num<T, R>(num: T, range: R) -> Result<()>
where
    T: PartialOrd + Debug,
    R: RangeBounds<T> + Debug,
{
    if !range.contains(&num) {
        bail!("number must be in the range {range:?}, but is {num:?}");
    }
    Ok(())
}
