use clap::{Parser, Subcommand};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use watermark_manager::config::{self, Config};
use watermark_manager::imaging::{Intensity, ToneKind, WatermarkSettings};
use watermark_manager::output;
use watermark_manager::pipeline::{self, PipelineError, RunRequest, WatermarkSource};
use watermark_manager::prompt::{Outcome, Session};

#[derive(Parser)]
#[command(name = "watermark-manager")]
#[command(about = "Add a text or image watermark to a photo")]
#[command(long_about = "\
Add a text or image watermark to a photo

Copy your photos and logos into the working folder (img/ by default), then
answer a few questions. The result is saved next to the original as
NAME-with-watermark-N.EXT; earlier results are never overwritten.

Optionally the whole image is adjusted before marking: brighten, contrast,
greyscale or invert.

Run 'watermark-manager gen-config' to generate a documented watermark.toml.")]
#[command(version)]
struct Cli {
    /// Working image folder; file names are resolved against it
    #[arg(long, default_value = "img", global = true)]
    dir: PathBuf,

    /// Config file (default: watermark.toml inside --dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive session (default)
    Run,
    /// Mark one image without prompting
    Apply(ApplyArgs),
    /// Print a stock watermark.toml with all options documented
    GenConfig,
}

#[derive(clap::Args)]
#[command(group(clap::ArgGroup::new("mark").required(true).args(["text", "image"])))]
struct ApplyArgs {
    /// Image to mark
    #[arg(long)]
    input: PathBuf,

    /// Text watermark
    #[arg(long)]
    text: Option<String>,

    /// Image watermark
    #[arg(long)]
    image: Option<PathBuf>,

    /// Adjust the whole image before marking
    #[arg(long, value_enum)]
    adjust: Option<ToneKind>,

    /// Strength for brighten and contrast, -1.0 to 1.0
    #[arg(
        long,
        default_value_t = 0.5,
        allow_negative_numbers = true,
        value_parser = parse_intensity
    )]
    intensity: f32,
}

fn parse_intensity(s: &str) -> Result<f32, String> {
    let value: f32 = s.parse().map_err(|_| format!("'{s}' is not a number"))?;
    if (-1.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err("must be between -1.0 and 1.0".to_string())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => {
            let config = load_config(&cli.dir, cli.config.as_deref())?;
            interactive(&cli.dir, &config)?;
        }
        Command::Apply(args) => {
            let config = load_config(&cli.dir, cli.config.as_deref())?;
            let request = RunRequest {
                input: cli.dir.join(&args.input),
                adjustment: args
                    .adjust
                    .map(|kind| kind.with_intensity(Intensity::new(args.intensity))),
                // clap guarantees exactly one of --text / --image
                watermark: match args.image {
                    Some(image) => WatermarkSource::Image(cli.dir.join(image)),
                    None => WatermarkSource::Text(args.text.unwrap_or_default()),
                },
            };
            let path = run_with_progress(request, &config.watermark_settings())?;
            output::print_success(&path);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn load_config(dir: &Path, explicit: Option<&Path>) -> Result<Config, config::ConfigError> {
    match explicit {
        Some(path) => config::load_config_file(path),
        None => config::load_config(dir),
    }
}

/// Ask, run, report, repeat until the user declines or stdin closes.
fn interactive(dir: &Path, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let settings = config.watermark_settings();
    let mut session = Session::new(io::stdin().lock(), io::stdout(), dir, config.prompt.clone());

    loop {
        match session.ask()? {
            Outcome::Quit => break,
            Outcome::Restart => continue,
            Outcome::Run(request) => match run_with_progress(request, &settings) {
                Ok(path) => output::print_success(&path),
                Err(e) => output::print_error(&e),
            },
        }
    }

    Ok(())
}

/// Run the pipeline and print its progress events.
fn run_with_progress(
    request: RunRequest,
    settings: &WatermarkSettings,
) -> Result<PathBuf, PipelineError> {
    let (tx, rx) = mpsc::channel();
    let result = pipeline::run(request, settings, Some(&tx));
    for event in rx.try_iter() {
        output::print_pipeline_event(&event);
    }
    result
}
