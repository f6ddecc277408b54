//! Harness configuration: defaults, an optional JSON file, then
//! `SEARCHBENCH_*` environment overrides.

use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::skip_list::{SkipListConfig, level_for_size};

/// Skip list tuning as it appears in the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkipListSettings {
    pub promote_probability: f64,
    /// Fixed lane cap. When absent the cap is derived from each size.
    pub max_level: Option<usize>,
}

impl Default for SkipListSettings {
    fn default() -> Self {
        return SkipListSettings { promote_probability: SkipListConfig::HALF, max_level: None };
    }
}

impl SkipListSettings {
    /// Engine config for a list expected to hold `n` values.
    pub fn for_size(&self, n: usize) -> Result<SkipListConfig> {
        let max_level = self.max_level.unwrap_or_else(|| level_for_size(n));
        return SkipListConfig::new(max_level, self.promote_probability);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Where `data_{n}.bin` files live.
    pub data_dir: PathBuf,
    pub external_sizes: Vec<usize>,
    /// Quickselect runs per external size.
    pub select_iterations: usize,
    pub search_sizes: Vec<usize>,
    /// Queries per search size.
    pub search_ops: usize,
    /// Fraction of queries drawn from inserted keys.
    pub hit_ratio: f64,
    pub skip_list: SkipListSettings,
    /// Base seed for every random stream. Filled from the clock by `load`
    /// when absent.
    pub seed: Option<u64>,
    /// Emit one JSON object per report line.
    pub json: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        return HarnessConfig {
            data_dir: PathBuf::from("data"),
            external_sizes: vec![1_000_000, 2_000_000, 4_000_000],
            select_iterations: 10,
            search_sizes: vec![100_000, 200_000, 500_000],
            search_ops: 100_000,
            hit_ratio: 0.5,
            skip_list: SkipListSettings::default(),
            seed: None,
            json: false,
        };
    }
}

impl HarnessConfig {
    /// Defaults, overlaid by `path` if given, overlaid by the environment.
    pub fn load(path: Option<&Path>) -> Result<HarnessConfig> {
        let mut config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
                serde_json::from_str(&text)?
            }
            None => HarnessConfig::default(),
        };
        config.apply_overrides(|name| std::env::var(name).ok())?;
        if config.seed.is_none() {
            let seed = std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or_default();
            tracing::info!(seed, "no seed configured, using clock");
            config.seed = Some(seed);
        }
        config.validate()?;
        return Ok(config);
    }

    /// Apply `SEARCHBENCH_*` variables, looked up through `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(v) = lookup("SEARCHBENCH_DATA_DIR") {
            self.data_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("SEARCHBENCH_EXTERNAL_SIZES") {
            self.external_sizes = parse_list("SEARCHBENCH_EXTERNAL_SIZES", &v)?;
        }
        if let Some(v) = lookup("SEARCHBENCH_SEARCH_SIZES") {
            self.search_sizes = parse_list("SEARCHBENCH_SEARCH_SIZES", &v)?;
        }
        if let Some(v) = lookup("SEARCHBENCH_SELECT_ITERATIONS") {
            self.select_iterations = parse("SEARCHBENCH_SELECT_ITERATIONS", &v)?;
        }
        if let Some(v) = lookup("SEARCHBENCH_SEARCH_OPS") {
            self.search_ops = parse("SEARCHBENCH_SEARCH_OPS", &v)?;
        }
        if let Some(v) = lookup("SEARCHBENCH_HIT_RATIO") {
            self.hit_ratio = parse("SEARCHBENCH_HIT_RATIO", &v)?;
        }
        if let Some(v) = lookup("SEARCHBENCH_PROMOTE_PROBABILITY") {
            self.skip_list.promote_probability = parse("SEARCHBENCH_PROMOTE_PROBABILITY", &v)?;
        }
        if let Some(v) = lookup("SEARCHBENCH_MAX_LEVEL") {
            self.skip_list.max_level = Some(parse("SEARCHBENCH_MAX_LEVEL", &v)?);
        }
        if let Some(v) = lookup("SEARCHBENCH_SEED") {
            self.seed = Some(parse("SEARCHBENCH_SEED", &v)?);
        }
        if let Some(v) = lookup("SEARCHBENCH_JSON") {
            self.json = v == "1" || v.eq_ignore_ascii_case("true");
        }
        return Ok(());
    }

    pub fn validate(&self) -> Result<()> {
        if self.external_sizes.is_empty() && self.search_sizes.is_empty() {
            return Err(Error::InvalidConfig("no sizes to run".to_string()));
        }
        if self.external_sizes.contains(&0) || self.search_sizes.contains(&0) {
            return Err(Error::InvalidConfig("sizes must be positive".to_string()));
        }
        if self.select_iterations == 0 || self.search_ops == 0 {
            return Err(Error::InvalidConfig("iteration counts must be positive".to_string()));
        }
        if !(0.0..=1.0).contains(&self.hit_ratio) {
            return Err(Error::InvalidConfig(format!("hit_ratio {} outside [0, 1]", self.hit_ratio)));
        }
        // Surfaces a bad probability or level cap before any work starts.
        self.skip_list.for_size(1)?;
        return Ok(());
    }

    pub fn base_seed(&self) -> u64 {
        return self.seed.unwrap_or_default();
    }
}

fn parse<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    return value
        .trim()
        .parse()
        .map_err(|_| Error::InvalidConfig(format!("{}: cannot parse {:?}", name, value)));
}

fn parse_list(name: &str, value: &str) -> Result<Vec<usize>> {
    return value
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(|s| parse(name, s))
        .collect();
}
