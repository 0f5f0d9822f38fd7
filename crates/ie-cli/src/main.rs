use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use ie_session::{
    InferenceSession, ModelFormat, ModelHandle, ModelSource, PostProcess, SessionConfig,
};

#[derive(Parser)]
#[command(
    name = "ie",
    about = "Inference engine harness",
    long_about = "Load a model into a real-time inference session, feed it test vectors,\nand report predictions and per-call latency.",
    version
)]
struct Cli {
    /// Log session construction at info level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a model's format, shapes, and element counts
    Info {
        /// Path to a .json or .gguf model
        model: PathBuf,
        #[arg(long, value_enum, default_value = "auto")]
        format: FormatArg,
    },
    /// Build a session and invoke it repeatedly
    Run {
        /// Path to a .json or .gguf model
        model: PathBuf,
        #[arg(long, value_enum, default_value = "auto")]
        format: FormatArg,
        /// Input vector fed on every call
        #[arg(long, value_enum, default_value = "zeros")]
        input: InputKind,
        /// Seed for --input random
        #[arg(long, default_value = "0")]
        seed: u64,
        /// Number of invocations to time
        #[arg(long, default_value = "1")]
        repeat: usize,
        /// Skip softmax and report the model's raw outputs
        #[arg(long)]
        raw_logits: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Auto,
    Json,
    Gguf,
}

impl From<FormatArg> for ModelFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Auto => ModelFormat::Auto,
            FormatArg::Json => ModelFormat::Json,
            FormatArg::Gguf => ModelFormat::Gguf,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
enum InputKind {
    Zeros,
    Ones,
    Random,
}

fn make_input(kind: InputKind, len: usize, seed: u64) -> Vec<f32> {
    match kind {
        InputKind::Zeros => vec![0.0; len],
        InputKind::Ones => vec![1.0; len],
        InputKind::Random => {
            let mut rng = StdRng::seed_from_u64(seed);
            let dist = Uniform::new_inclusive(-1.0f32, 1.0);
            (0..len).map(|_| dist.sample(&mut rng)).collect()
        }
    }
}

/// Mean, min, and max of a set of latencies, in microseconds.
#[derive(Debug, PartialEq)]
struct LatencyStats {
    mean_us: f64,
    min_us: f64,
    max_us: f64,
}

impl LatencyStats {
    fn from_samples(samples: &[Duration]) -> Option<Self> {
        let us = |d: &Duration| d.as_secs_f64() * 1e6;
        let min = samples.iter().min()?;
        let max = samples.iter().max()?;
        let total: f64 = samples.iter().map(us).sum();
        Some(Self {
            mean_us: total / samples.len() as f64,
            min_us: us(min),
            max_us: us(max),
        })
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn open(model: &Path, config: SessionConfig) -> Result<InferenceSession> {
    InferenceSession::from_path(model, config)
        .with_context(|| format!("failed to build a session for {}", model.display()))
}

fn cmd_info(model: &Path, format: ModelFormat, verbose: bool) -> Result<()> {
    let resolved = format.resolve(&ModelSource::Path(model))?;
    let config = SessionConfig::default()
        .with_verbose(verbose)
        .with_format(format);
    let session = open(model, config)?;
    let d = session.descriptor();

    println!("Model   {}", model.display());
    println!("  format:  {}", resolved);
    println!("  adapter: {}", session.handle().name());
    println!("  dtype:   {}", d.dtype);
    println!("  input:   {} ({} elements)", d.input_shape, d.input_element_count);
    if let Some((rows, cols)) = session.input_size_2d() {
        println!("           2-D: {} rows x {} cols", rows, cols);
    }
    println!("  output:  {} ({} elements)", d.output_shape, d.output_element_count);
    Ok(())
}

struct RunArgs {
    format: ModelFormat,
    input: InputKind,
    seed: u64,
    repeat: usize,
    raw_logits: bool,
    verbose: bool,
}

fn cmd_run(model: &Path, args: RunArgs) -> Result<()> {
    if args.repeat == 0 {
        bail!("--repeat must be at least 1");
    }
    let post_process = if args.raw_logits {
        PostProcess::RawLogits
    } else {
        PostProcess::Softmax
    };
    let config = SessionConfig::default()
        .with_verbose(args.verbose)
        .with_format(args.format)
        .with_post_process(post_process);

    let started = Instant::now();
    let mut session = open(model, config)?;
    let setup = started.elapsed();

    let input = make_input(args.input, session.input_size(), args.seed);
    let mut output = vec![0.0f32; session.output_size()];
    let mut samples = Vec::with_capacity(args.repeat);
    let mut class = 0;
    for _ in 0..args.repeat {
        let t = Instant::now();
        class = session.invoke(&input, &mut output)?;
        samples.push(t.elapsed());
    }

    println!("Session ready in {:.3} ms", setup.as_secs_f64() * 1e3);
    println!("Input   {:?} x {}", args.input, input.len());
    println!("Class   {}", class);
    let label = if args.raw_logits { "Outputs" } else { "Probabilities" };
    println!("{}", label);
    for (i, p) in output.iter().enumerate() {
        let marker = if i == class { " <" } else { "" };
        println!("  [{:>3}] {:.6}{}", i, p, marker);
    }
    if let Some(stats) = LatencyStats::from_samples(&samples) {
        println!(
            "Latency over {} calls: mean {:.2} us, min {:.2} us, max {:.2} us",
            samples.len(),
            stats.mean_us,
            stats.min_us,
            stats.max_us
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Info { model, format } => cmd_info(&model, format.into(), cli.verbose),
        Commands::Run {
            model,
            format,
            input,
            seed,
            repeat,
            raw_logits,
        } => cmd_run(
            &model,
            RunArgs {
                format: format.into(),
                input,
                seed,
                repeat,
                raw_logits,
                verbose: cli.verbose,
            },
        ),
    }
}
