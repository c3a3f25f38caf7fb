use clap::{ArgAction, Parser, Subcommand};
use photo_optimizer::config::{self, FlagOverrides};
use photo_optimizer::imaging::{RustBackend, SizeTier};
use photo_optimizer::optimize::{OptimizeOptions, optimize_files};
use photo_optimizer::output;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn version_string() -> &'static str {
    let hash = env!("PHOTO_OPTIMIZER_GIT_HASH");
    if hash.is_empty() {
        env!("CARGO_PKG_VERSION")
    } else {
        // Leaked once at startup
        Box::leak(format!("{} ({hash})", env!("CARGO_PKG_VERSION")).into_boxed_str())
    }
}

#[derive(Parser)]
#[command(name = "photo-optimizer")]
#[command(about = "Shrink photos to the best JPEG that fits a byte budget")]
#[command(long_about = "\
Shrink photos to the best JPEG that fits a byte budget

Each photo is turned upright according to its EXIF orientation, then
re-encoded as JPEG. Sizes are tried largest first; at each size, quality
steps down from 100 to the floor. The first encoding strictly smaller than
the target wins:

  unbounded: q100 q95 q90 q85 q80
  3200px:    q100 q95 q90 q85 q80
  2800px:    ...

Output goes next to the source, named after what was given up:

  IMG_0001.jpg → IMG_0001.optimized.jpg      (full size, quality 100)
  IMG_0002.jpg → IMG_0002.90q.jpg            (full size, quality 90)
  IMG_0003.jpg → IMG_0003.2400px.85q.jpg     (2400px, quality 85)

Run 'photo-optimizer gen-config' to generate a documented config file.")]
#[command(version = version_string())]
struct Cli {
    /// Config file (defaults to ./photo-optimizer.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

/// Search and output flags; each overrides the config file.
#[derive(clap::Args)]
struct OptimizeArgs {
    /// Images to optimize
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Lowest JPEG quality tried at each size (0-100)
    #[arg(long, allow_negative_numbers = true)]
    min_quality: Option<i32>,

    /// Quality decrement between attempts
    #[arg(long)]
    quality_step: Option<u32>,

    /// Byte budget; output must be strictly smaller
    #[arg(long)]
    target_size: Option<u64>,

    /// Size ladder, e.g. "unbounded,2000,1000"
    #[arg(long, value_delimiter = ',')]
    sizes: Option<Vec<SizeTier>>,

    /// Write results here instead of next to each source
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Replace existing output files
    #[arg(long)]
    overwrite: bool,

    /// Print one JSON object per optimized file instead of text
    #[arg(long)]
    json: bool,
}

impl OptimizeArgs {
    fn overrides(&self) -> FlagOverrides {
        FlagOverrides {
            min_quality: self.min_quality,
            quality_step: self.quality_step,
            target_size: self.target_size,
            sizes: self.sizes.clone(),
            overwrite: self.overwrite.then_some(true),
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Optimize one or more images
    Optimize(OptimizeArgs),
    /// Print a stock config file with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Optimize(args) => {
            let config = config::load_config(cli.config.as_deref(), &args.overrides())?;
            let options = OptimizeOptions::from_config(&config, args.out_dir.clone());
            let backend = RustBackend::new();

            let outcome = optimize_files(&backend, &args.files, &options, |source, result| {
                match result {
                    Ok(report) if args.json => match output::format_report_json(report) {
                        Ok(line) => println!("{line}"),
                        Err(e) => tracing::error!(error = %e, "failed to serialize report"),
                    },
                    Ok(report) => output::print_report(report),
                    Err(e) if args.json => {
                        tracing::error!(file = %source.display(), error = %e, "not optimized")
                    }
                    Err(e) => output::print_failure(source, e),
                }
            });

            if !args.json {
                println!();
                println!(
                    "{}",
                    output::format_summary(outcome.optimized.len(), outcome.failed.len())
                );
            }
            if !outcome.failed.is_empty() {
                std::process::exit(1);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Log to stderr so stdout stays clean for reports.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}
