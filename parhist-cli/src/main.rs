use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use log::{info, warn};
use parhist_common::{Config, Topology};
use parhist_core::{
    compare_topologies, export_csv, export_json, generate_uniform, print_comparison,
    print_histogram, print_run_summary, read_float_column, Layout, Orchestrator,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "parhist", version, about = "Parallel equal-width histogram")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Layout, worker and dataset flags shared by `run` and `compare`.
/// Anything left unset falls back to the config file.
#[derive(Args, Clone)]
struct DataArgs {
    #[arg(long)]
    bins: Option<usize>,
    #[arg(long, allow_negative_numbers = true)]
    min: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    max: Option<f64>,
    #[arg(long, short = 'w')]
    workers: Option<usize>,
    /// number of generated values (ignored with --input)
    #[arg(long, short = 'n')]
    count: Option<usize>,
    #[arg(long)]
    seed: Option<u64>,
    /// Parquet file to read measurements from instead of generating them
    #[arg(long, requires = "column")]
    input: Option<PathBuf>,
    #[arg(long, requires = "input")]
    column: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Count a dataset into a histogram
    Run {
        #[command(flatten)]
        data: DataArgs,
        #[arg(long, short = 't')]
        topology: Option<Topology>,
        /// text, json or csv
        #[arg(long)]
        format: Option<String>,
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
    /// Run both topologies on the same dataset and check they agree
    Compare {
        #[command(flatten)]
        data: DataArgs,
    },
    /// Print the effective configuration as TOML
    Config,
    /// Generate shell completions
    Completions { shell: Shell },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    let config = Config::load().unwrap_or_else(|e| {
        warn!("ignoring config file: {e}");
        Config::default()
    });
    match cli.command {
        Commands::Run { data, topology, format, output } => {
            run_histogram(data, topology, format, output, &config)?
        }
        Commands::Compare { data } => run_compare(data, &config)?,
        Commands::Config => print!("{}", config.to_toml()?),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "parhist", &mut std::io::stdout());
        }
    }
    Ok(())
}

/// Resolve the layout and worker count, then load or generate the dataset.
/// Layout and worker count are validated before any data is produced.
fn prepare(data: &DataArgs, config: &Config) -> anyhow::Result<(Layout, usize, Vec<f64>)> {
    let layout = Layout::new(
        data.min.unwrap_or(config.histogram.min),
        data.max.unwrap_or(config.histogram.max),
        data.bins.unwrap_or(config.histogram.bins),
    )?;
    let workers = data.workers.unwrap_or_else(|| config.workers.resolved_count());
    if workers == 0 {
        return Err(parhist_common::ParhistError::InvalidWorkerCount(workers).into());
    }
    let values = match (&data.input, &data.column) {
        (Some(path), Some(column)) => {
            let values = read_float_column(path, column)?;
            info!("loaded {} values from {}:{column}", values.len(), path.display());
            values
        }
        _ => {
            let count = data.count.unwrap_or(config.data.count);
            let seed = data.seed.or(config.data.seed);
            info!("generating {count} values in [{}, {}]", layout.min(), layout.max());
            generate_uniform(count, layout.min(), layout.max(), seed)
        }
    };
    Ok((layout, workers, values))
}

fn run_histogram(
    data: DataArgs,
    topology: Option<Topology>,
    format: Option<String>,
    output: Option<PathBuf>,
    config: &Config,
) -> anyhow::Result<()> {
    let (layout, workers, values) = prepare(&data, config)?;
    let topology = topology.unwrap_or(config.workers.topology);
    let run = Orchestrator::new(layout, workers, topology)?.run(&values)?;

    let format = format.unwrap_or_else(|| config.export.format.clone());
    match format.as_str() {
        "text" => {
            print_run_summary(&run);
            print_histogram(&run.histogram)?;
        }
        "json" | "csv" => {
            let out_path = output_path(output, &format, config)?;
            if format == "json" {
                export_json(&out_path, &run)?;
            } else {
                export_csv(&out_path, &run.histogram)?;
            }
            println!("Exported to {}", out_path.display());
        }
        _ => anyhow::bail!("Unknown format: {format} (use text, json or csv)"),
    }
    Ok(())
}

fn output_path(output: Option<PathBuf>, format: &str, config: &Config) -> anyhow::Result<PathBuf> {
    let out_path = match output {
        Some(o) => o,
        None => Path::new(&config.export.output_dir).join(format!("histogram.{format}")),
    };
    if let Some(parent) = out_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(out_path)
}

fn run_compare(data: DataArgs, config: &Config) -> anyhow::Result<()> {
    let (layout, workers, values) = prepare(&data, config)?;
    let cmp = compare_topologies(&values, layout, workers)?;
    print_comparison(&cmp);
    print_histogram(&cmp.shared.histogram)?;
    if !cmp.identical {
        print_histogram(&cmp.distributed.histogram)?;
        anyhow::bail!("topologies disagree on {} values", values.len());
    }
    Ok(())
}
