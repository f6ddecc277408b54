//! The two benchmark drivers.
//!
//! - Search: insert the same keys into a treap and a skip list, then run the
//!   same queries against both and average the step counts.
//! - External: time quickselect at random ranks and a full quicksort over a
//!   mapped dataset file.
//!
//! A size that fails is logged and reported as skipped; the remaining sizes
//! still run.

use std::time::Duration;
use std::time::Instant;

use serde::Serialize;

use crate::config::HarnessConfig;
use crate::dataset;
use crate::error::Result;
use crate::external;
use crate::rng::{RandomSource, Stream, stream_rng};
use crate::search::SearchEngine;
use crate::skip_list::SkipList;
use crate::treap::Treap;
use crate::workload::{Query, QueryStream, insert_keys};

/// Result for one size: either a report or the reason it was skipped.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome<T> {
    Done(T),
    Skipped { size: usize, reason: String },
}

impl<T> Outcome<T> {
    fn from_result(size: usize, result: Result<T>) -> Outcome<T> {
        return match result {
            Ok(report) => Outcome::Done(report),
            Err(e) => {
                tracing::warn!(size, error = %e, "skipping size");
                Outcome::Skipped { size, reason: e.to_string() }
            }
        };
    }
}

/// Step statistics for one engine at one size.
#[derive(Debug, Clone, Serialize)]
pub struct EngineStats {
    pub engine: &'static str,
    /// Keys actually stored (a skip list drops repeats).
    pub stored: usize,
    pub queries: usize,
    pub avg_steps: f64,
    pub hits: usize,
    /// Queries whose outcome disagreed with how they were drawn. Always zero
    /// for a correct engine.
    pub mismatches: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchReport {
    pub size: usize,
    pub treap: EngineStats,
    pub treap_height: usize,
    pub skip_list: EngineStats,
    pub skip_list_level: usize,
    pub skip_list_max_level: usize,
    /// Nodes per active lane, bottom lane first.
    pub skip_list_lanes: Vec<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExternalReport {
    pub size: usize,
    pub select_iterations: usize,
    pub avg_select_secs: f64,
    pub sort_secs: f64,
    /// The file was non-decreasing after the sort.
    pub sorted: bool,
}

/// Insert every key into `engine`.
pub fn build<E: SearchEngine, R: RandomSource>(engine: &mut E, keys: &[i64], rng: &mut R) -> Result<()> {
    let start = Instant::now();
    for &key in keys {
        engine.insert(key, rng)?;
    }
    tracing::debug!(
        engine = engine.name(),
        keys = keys.len(),
        stored = engine.len(),
        elapsed = ?start.elapsed(),
        "built"
    );
    return Ok(());
}

/// Run `queries` against `engine` and summarize.
pub fn measure<E: SearchEngine>(engine: &E, queries: &[Query]) -> EngineStats {
    let mut steps = 0u64;
    let mut hits = 0;
    let mut mismatches = 0;
    for query in queries {
        let result = engine.search(query.key);
        steps += result.steps;
        if result.found {
            hits += 1;
        }
        if result.found != query.expect_hit {
            mismatches += 1;
        }
    }
    let avg_steps = if queries.is_empty() { 0.0 } else { steps as f64 / queries.len() as f64 };
    return EngineStats {
        engine: engine.name(),
        stored: engine.len(),
        queries: queries.len(),
        avg_steps,
        hits,
        mismatches,
    };
}

/// Search benchmark for one size.
pub fn search_size(config: &HarnessConfig, n: usize) -> Result<SearchReport> {
    let seed = config.base_seed();
    let keys = insert_keys(n, &mut stream_rng(seed, Stream::InsertKeys, n));
    let queries: Vec<Query> = QueryStream::new(&keys, config.hit_ratio, stream_rng(seed, Stream::QueryKeys, n))
        .take(config.search_ops)
        .collect();

    let mut treap = Treap::new();
    build(&mut treap, &keys, &mut stream_rng(seed, Stream::Priorities, n))?;
    let skip_config = config.skip_list.for_size(n)?;
    let mut list = SkipList::new(skip_config);
    build(&mut list, &keys, &mut stream_rng(seed, Stream::Levels, n))?;

    let report = SearchReport {
        size: n,
        treap: measure(&treap, &queries),
        treap_height: treap.height(),
        skip_list: measure(&list, &queries),
        skip_list_level: list.level(),
        skip_list_max_level: skip_config.max_level(),
        skip_list_lanes: list.lane_counts(),
    };
    for stats in [&report.treap, &report.skip_list] {
        if stats.mismatches > 0 {
            tracing::warn!(engine = stats.engine, mismatches = stats.mismatches, "search results disagree with workload");
        }
    }
    tracing::info!(n, treap = report.treap.avg_steps, skip_list = report.skip_list.avg_steps, "search size done");
    return Ok(report);
}

pub fn run_search_benchmark(config: &HarnessConfig) -> Vec<Outcome<SearchReport>> {
    return config
        .search_sizes
        .iter()
        .map(|&n| Outcome::from_result(n, search_size(config, n)))
        .collect();
}

/// External benchmark for one size. Each quickselect maps the file afresh;
/// the sort maps it once. Both permute the file in place.
pub fn external_size(config: &HarnessConfig, n: usize) -> Result<ExternalReport> {
    let seed = config.base_seed();
    let path = dataset::ensure(&config.data_dir, n, &mut stream_rng(seed, Stream::Dataset, n))?;
    let mut pivots = stream_rng(seed, Stream::Pivots, n);
    let mut ranks = stream_rng(seed, Stream::QueryKeys, n);

    let mut select_total = Duration::ZERO;
    for _ in 0..config.select_iterations {
        select_total += external::with_mapped(&path, |view| {
            let high = view.len().saturating_sub(1);
            let k = ranks.index_in(0, high);
            let start = Instant::now();
            external::select(view, 0, high, k, &mut pivots)?;
            return Ok(start.elapsed());
        })?;
    }

    let (sort_time, sorted) = external::with_mapped(&path, |view| {
        let high = view.len().saturating_sub(1);
        let start = Instant::now();
        external::sort(view, 0, high, &mut pivots)?;
        let elapsed = start.elapsed();
        return Ok((elapsed, view.windows(2).all(|w| w[0] <= w[1])));
    })?;

    let report = ExternalReport {
        size: n,
        select_iterations: config.select_iterations,
        avg_select_secs: select_total.as_secs_f64() / config.select_iterations as f64,
        sort_secs: sort_time.as_secs_f64(),
        sorted,
    };
    tracing::info!(n, select = report.avg_select_secs, sort = report.sort_secs, "external size done");
    return Ok(report);
}

pub fn run_external_benchmark(config: &HarnessConfig) -> Vec<Outcome<ExternalReport>> {
    return config
        .external_sizes
        .iter()
        .map(|&n| Outcome::from_result(n, external_size(config, n)))
        .collect();
}

pub fn print_search(outcomes: &[Outcome<SearchReport>], json: bool) -> Result<()> {
    if json {
        for outcome in outcomes {
            println!("{}", serde_json::to_string(outcome)?);
        }
        return Ok(());
    }
    println!("| {:>10} | {:>12} | {:>12} | {:>8} | {:>8} |", "n", "Treap", "SkipList", "Height", "Level");
    println!("|------------|--------------|--------------|----------|----------|");
    for outcome in outcomes {
        match outcome {
            Outcome::Done(r) => println!(
                "| {:>10} | {:>12.2} | {:>12.2} | {:>8} | {:>8} |",
                r.size, r.treap.avg_steps, r.skip_list.avg_steps, r.treap_height, r.skip_list_level
            ),
            Outcome::Skipped { size, reason } => println!("| {:>10} | skipped: {}", size, reason),
        }
    }
    return Ok(());
}

pub fn print_external(outcomes: &[Outcome<ExternalReport>], json: bool) -> Result<()> {
    if json {
        for outcome in outcomes {
            println!("{}", serde_json::to_string(outcome)?);
        }
        return Ok(());
    }
    println!("| {:>10} | {:>14} | {:>12} |", "n", "QuickSelect s", "QuickSort s");
    println!("|------------|----------------|--------------|");
    for outcome in outcomes {
        match outcome {
            Outcome::Done(r) => {
                println!("| {:>10} | {:>14.4} | {:>12.4} |", r.size, r.avg_select_secs, r.sort_secs)
            }
            Outcome::Skipped { size, reason } => println!("| {:>10} | skipped: {}", size, reason),
        }
    }
    return Ok(());
}
