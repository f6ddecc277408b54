use std::path::PathBuf;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use searchbench::HarnessConfig;
use searchbench::harness;

const USAGE: &str = "Usage: searchbench [search|external|all] [--config <file.json>]";

#[derive(Clone, Copy, PartialEq)]
enum Task {
    Search,
    External,
    All,
}

fn parse_args(args: &[String]) -> Option<(Task, Option<PathBuf>)> {
    let mut task = Task::All;
    let mut config = None;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "search" => task = Task::Search,
            "external" => task = Task::External,
            "all" => task = Task::All,
            "--config" => config = Some(PathBuf::from(iter.next()?)),
            _ => return None,
        }
    }
    return Some((task, config));
}

/// Section title for table output. JSON-lines output carries no titles so
/// every stdout line stays a JSON object.
fn heading(title: &'static str, json: bool) -> Option<&'static str> {
    if json {
        return None;
    }
    return Some(title);
}

fn run(task: Task, config: &HarnessConfig) -> searchbench::Result<()> {
    if task != Task::Search && !config.external_sizes.is_empty() {
        if let Some(title) = heading("External selection/sort:", config.json) {
            println!("{}", title);
        }
        let outcomes = harness::run_external_benchmark(config);
        harness::print_external(&outcomes, config.json)?;
    }
    if task != Task::External && !config.search_sizes.is_empty() {
        if let Some(title) = heading("\nAverage search steps:", config.json) {
            println!("{}", title);
        }
        let outcomes = harness::run_search_benchmark(config);
        harness::print_search(&outcomes, config.json)?;
    }
    return Ok(());
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some((task, config_path)) = parse_args(&args) else {
        eprintln!("{}", USAGE);
        return ExitCode::from(2);
    };

    let config = match HarnessConfig::load(config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "bad configuration");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(seed = config.base_seed(), "starting");

    if let Err(e) = run(task, &config) {
        tracing::error!(error = %e, "benchmark failed");
        return ExitCode::FAILURE;
    }
    return ExitCode::SUCCESS;
}
