// ./src/main.rs

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use boundary_generalization::generalization::{
    FanOutSink, GeneralizationConfig, GeneralizationPolicy, Metrics, Parameter, ParameterRange,
    ParameterSweep, ProcessingMode, ResampleSimplifySmoothPolicy, SweepPlan, SweepResult,
    SweepRunner, SweepSink,
};
use boundary_generalization::io::{IoResult, LayerDirectorySink, StatsFileSink, read_layer};
use boundary_generalization::math::algorithms::{DecimationPolicy, StrideAveraging};

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "generalize")]
#[command(author, version, about = "Generalization of polygon boundaries with parameter sweeps", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the reference values of a layer
    Measure {
        /// Input layer (JSON)
        input: PathBuf,
    },
    /// Run a parameter sweep over a layer
    Run {
        /// Input layer (JSON)
        input: PathBuf,
        /// Output directory for stats.txt and the generalized layers
        output: PathBuf,
        /// Sweep plan as JSON; replaces all policy and range flags
        #[arg(long)]
        config: Option<PathBuf>,
        /// Generalization policy
        #[arg(short, long, value_enum, default_value = "resample-simplify-smooth")]
        policy: PolicyArg,
        /// Primary swept parameter (default depends on the policy)
        #[arg(long)]
        primary: Option<Parameter>,
        /// Range of the primary parameter as start:end:step
        #[arg(long, value_parser = parse_range)]
        primary_range: Option<ParameterRange>,
        /// Secondary swept parameter (default depends on the policy)
        #[arg(long)]
        secondary: Option<Parameter>,
        /// Range of the secondary parameter as start:end:step
        #[arg(long, value_parser = parse_range)]
        secondary_range: Option<ParameterRange>,
        /// Sweep only the primary parameter
        #[arg(long)]
        no_secondary: bool,
        /// Minimum polygon area in squared CRS units
        #[arg(long, default_value = "40000")]
        min_area: f64,
        /// Minimum number of remaining vertices, closing point excluded
        #[arg(long, default_value = "4")]
        min_vertices: u32,
        /// Chaikin iterations for resample-simplify-smooth
        #[arg(long, default_value = "2")]
        iterations: u32,
        /// Averaging of retained vertices for stride decimation
        #[arg(long, value_enum, default_value = "y-only")]
        averaging: AveragingArg,
        /// Worker threads (0 = all cores, 1 = sequential)
        #[arg(short, long)]
        threads: Option<usize>,
        /// Only write stats.txt, no layer per configuration
        #[arg(long)]
        no_layers: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PolicyArg {
    ResampleSimplifySmooth,
    Stride,
    Distance,
}

#[derive(Clone, Copy, ValueEnum)]
enum AveragingArg {
    YOnly,
    Midpoint,
    Keep,
}

impl From<AveragingArg> for StrideAveraging {
    fn from(arg: AveragingArg) -> Self {
        match arg {
            AveragingArg::YOnly => StrideAveraging::YOnly,
            AveragingArg::Midpoint => StrideAveraging::Midpoint,
            AveragingArg::Keep => StrideAveraging::Keep,
        }
    }
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")
}

fn parse_range(value: &str) -> std::result::Result<ParameterRange, String> {
    let parts: Vec<&str> = value.split(':').collect();
    let number = |s: &str| {
        s.trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid number '{s}': {e}"))
    };
    let range = match parts.as_slice() {
        [single] => ParameterRange::single(number(*single)?),
        [start, end, step] => {
            ParameterRange::new(number(*start)?, number(*end)?, number(*step)?)
        }
        _ => return Err(format!("expected start:end:step, got '{value}'")),
    };
    range.validate().map_err(|e| e.to_string())?;
    Ok(range)
}

/// Standard-Sweep je Politik
fn default_sweeps(policy: PolicyArg) -> (ParameterSweep, Option<ParameterSweep>) {
    match policy {
        PolicyArg::ResampleSimplifySmooth => (
            ParameterSweep::new(Parameter::StepDistance, ParameterRange::default()),
            Some(ParameterSweep::new(
                Parameter::Epsilon,
                ParameterRange::default(),
            )),
        ),
        PolicyArg::Stride => (
            ParameterSweep::new(Parameter::Stride, ParameterRange::new(2.0, 10.0, 1.0)),
            None,
        ),
        PolicyArg::Distance => (
            ParameterSweep::new(
                Parameter::DistanceThreshold,
                ParameterRange::default(),
            ),
            None,
        ),
    }
}

struct PlanArgs {
    policy: PolicyArg,
    primary: Option<Parameter>,
    primary_range: Option<ParameterRange>,
    secondary: Option<Parameter>,
    secondary_range: Option<ParameterRange>,
    no_secondary: bool,
    min_area: f64,
    min_vertices: u32,
    iterations: u32,
    averaging: AveragingArg,
}

fn build_plan(args: PlanArgs) -> SweepPlan {
    let policy = match args.policy {
        PolicyArg::ResampleSimplifySmooth => GeneralizationPolicy::ResampleSimplifySmooth(
            ResampleSimplifySmoothPolicy::default().with_smoothing_iterations(args.iterations),
        ),
        PolicyArg::Stride => GeneralizationPolicy::Decimation(DecimationPolicy::Stride {
            stride: None,
            averaging: args.averaging.into(),
        }),
        PolicyArg::Distance => GeneralizationPolicy::Decimation(
            DecimationPolicy::DistanceThreshold { threshold: 50.0 },
        ),
    };
    let base = GeneralizationConfig::new(policy)
        .with_min_area(args.min_area)
        .with_min_vertices(args.min_vertices);

    let (default_primary, default_secondary) = default_sweeps(args.policy);
    let primary = ParameterSweep::new(
        args.primary.unwrap_or(default_primary.parameter),
        args.primary_range.unwrap_or(default_primary.range),
    );

    let secondary = match (args.secondary, default_secondary) {
        _ if args.no_secondary => None,
        (Some(parameter), _) => Some(ParameterSweep::new(
            parameter,
            args.secondary_range.unwrap_or_default(),
        )),
        (None, Some(default)) => Some(ParameterSweep::new(
            default.parameter,
            args.secondary_range.unwrap_or(default.range),
        )),
        (None, None) => None,
    };

    SweepPlan {
        base,
        primary,
        secondary,
    }
}

fn load_plan(path: &Path) -> Result<SweepPlan> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read sweep plan {}", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse sweep plan {}", path.display()))
}

fn print_metrics(title: &str, metrics: &Metrics) {
    println!("{title}");
    println!("  Total area: {:.2}", metrics.total_area);
    println!("  Total perimeter: {:.2}", metrics.perimeter);
    println!("  Total vertex count: {}", metrics.vertex_count);
}

/// Leitet an den eigentlichen Sink weiter und zählt den Fortschrittsbalken hoch.
struct ProgressSink<S> {
    inner: S,
    progress: ProgressBar,
}

impl<S: SweepSink> SweepSink for ProgressSink<S> {
    fn begin(&mut self, reference: &Metrics) -> IoResult<()> {
        self.inner.begin(reference)
    }

    fn record(&mut self, result: &SweepResult) -> IoResult<()> {
        self.inner.record(result)?;
        self.progress.set_message(result.config.label());
        self.progress.inc(1);
        Ok(())
    }

    fn finish(&mut self) -> IoResult<()> {
        self.inner.finish()
    }
}

fn progress_bar(len: usize) -> Result<ProgressBar> {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .map_err(|e| anyhow!("invalid progress template: {e}"))?,
    );
    Ok(pb)
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    match cli.command {
        Commands::Measure { input } => {
            let layer = read_layer(&input)
                .with_context(|| format!("Failed to read layer {}", input.display()))?;
            println!("Layer: {}", input.display());
            println!("  CRS: {}", layer.crs.as_deref().unwrap_or("unknown"));
            println!("  Features: {}", layer.features.len());
            println!("  Polygons: {}", layer.decompose().len());
            print_metrics("Reference values:", &layer.reference_metrics());
        }

        Commands::Run {
            input,
            output,
            config,
            policy,
            primary,
            primary_range,
            secondary,
            secondary_range,
            no_secondary,
            min_area,
            min_vertices,
            iterations,
            averaging,
            threads,
            no_layers,
        } => {
            let layer = read_layer(&input)
                .with_context(|| format!("Failed to read layer {}", input.display()))?;
            let reference = layer.reference_metrics();
            let polygons = layer.decompose();

            let plan = match config {
                Some(path) => load_plan(&path)?,
                None => build_plan(PlanArgs {
                    policy,
                    primary,
                    primary_range,
                    secondary,
                    secondary_range,
                    no_secondary,
                    min_area,
                    min_vertices,
                    iterations,
                    averaging,
                }),
            };
            let configs = plan
                .configurations()
                .context("Invalid sweep plan")?;
            info!(configurations = configs.len(), "Sweep plan ready");

            std::fs::create_dir_all(&output)
                .with_context(|| format!("Failed to create {}", output.display()))?;
            let stats_path = output.join("stats.txt");
            let mut sinks = FanOutSink::new().with_sink(
                StatsFileSink::create(&stats_path).context("Failed to create stats file")?,
            );
            if !no_layers {
                sinks = sinks.with_sink(
                    LayerDirectorySink::create(&output)
                        .context("Failed to prepare output directory")?,
                );
            }

            let progress = progress_bar(configs.len())?;
            let mut sink = ProgressSink {
                inner: sinks,
                progress: progress.clone(),
            };

            let runner = SweepRunner::new(ProcessingMode::from_threads(threads));
            let start = Instant::now();
            let summary = runner
                .run(&polygons, &reference, &configs, &mut sink)
                .context("Sweep failed")?;
            let elapsed = start.elapsed();
            progress.finish_and_clear();

            print_metrics("Reference values:", &reference);
            println!(
                "Configurations: {} completed, {} failed, {} cancelled",
                summary.completed, summary.failed, summary.cancelled
            );
            println!("Statistics saved to: {}", stats_path.display());
            println!("  Processing time: {:.2?}", elapsed);
        }
    }

    Ok(())
}
