//! Grab the root window of an X11 display, save it, and click.
//!
//! With no subcommand this runs the configured sequence:
//! connect, capture, save, click, disconnect.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use xredirect::{save_image, Config, DisplayCapture, MouseButton};

#[derive(Parser)]
#[command(name = "xredirect")]
#[command(about = "Capture an X11 screen to an image file and inject pointer clicks")]
#[command(version)]
struct Cli {
    /// Config file (default: ~/.config/xredirect/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// X display to open, e.g. :0 (default: config, then $DISPLAY, then :0)
    #[arg(short, long, global = true)]
    display: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Capture the root window and save it
    Capture {
        /// Output image; the extension picks the format
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Click at absolute screen coordinates
    Click {
        #[arg(allow_hyphen_values = true)]
        x: i32,
        #[arg(allow_hyphen_values = true)]
        y: i32,
        /// left, middle, right, side, extra
        #[arg(long, default_value = "left")]
        button: MouseButton,
    },
    /// Print the display name and screen size
    Info,
    /// Write the default config file if none exists
    InitConfig,
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "xredirect={},xredirect_capture={},xredirect_input={}",
            level, level, level
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

fn run_sequence(display: &str, config: &Config) -> anyhow::Result<()> {
    debug!(
        interval_ms = config.capture.interval_ms,
        "single-shot capture; interval is not used"
    );
    let button = config.click.mouse_button()?;

    let mut capture = DisplayCapture::connect(display)?;
    save_frame(&mut capture, &config.capture.output)?;

    if config.click.enabled {
        capture.click_button(config.click.x, config.click.y, button)?;
        info!(x = config.click.x, y = config.click.y, %button, "clicked");
    }
    Ok(())
}

fn save_frame(capture: &mut DisplayCapture, output: &Path) -> anyhow::Result<()> {
    let frame = capture.capture()?;
    save_image(&frame, output).with_context(|| format!("saving {}", output.display()))?;
    info!(
        path = %output.display(),
        dimensions = %frame.dimensions(),
        "saved capture"
    );
    Ok(())
}

fn run_info(display: &str) -> anyhow::Result<()> {
    let capture = DisplayCapture::connect(display)?;
    let dims = capture.dimensions()?;
    println!("display: {}", capture.display_id());
    println!("size:    {}", dims);
    Ok(())
}

fn run_init_config(path: Option<&Path>) -> anyhow::Result<()> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(Config::path);
    if path.exists() {
        println!("Config already exists at {}", path.display());
        return Ok(());
    }
    Config::default().save_to(&path)?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    if let Some(Commands::InitConfig) = cli.command {
        return run_init_config(cli.config.as_deref());
    }

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load(),
    };
    let display = cli.display.clone().unwrap_or_else(|| config.display_name());

    match cli.command {
        None => run_sequence(&display, &config),
        Some(Commands::Capture { output }) => {
            let output = output.unwrap_or_else(|| config.capture.output.clone());
            let mut capture = DisplayCapture::connect(&display)?;
            save_frame(&mut capture, &output)
        }
        Some(Commands::Click { x, y, button }) => {
            let mut capture = DisplayCapture::connect(&display)?;
            capture.click_button(x, y, button)?;
            Ok(())
        }
        Some(Commands::Info) => run_info(&display),
        Some(Commands::InitConfig) => unreachable!("handled above"),
    }
}
