//! Wire3D terminal viewer
//!
//! Controls:
//!   - WASD / Arrow Keys: Rotate the model
//!   - E/R: Roll rotation
//!   - Space: Toggle animation
//!   - Mouse drag: Rotate the model
//!   - Q/ESC: Quit
use anyhow::Context;
use clap::Parser;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use tracing_subscriber::{fmt::writer::BoxMakeWriter, EnvFilter};
use wire3d_core::Mesh;
use wire3d_terminal::{TerminalApp, Viewer, ViewerConfig};

#[derive(Parser)]
#[command(name = "wire3d-terminal", about = "Depth-cued wireframe viewer for OBJ models")]
struct Cli {
    /// OBJ model to display; a cube is shown when omitted
    model: Option<PathBuf>,

    /// Zoom applied on top of the automatic fit
    #[arg(short, long, default_value_t = 1.0)]
    scale: f64,

    /// Start with the animation paused
    #[arg(long)]
    no_animate: bool,

    /// Milliseconds between animation steps
    #[arg(long, default_value_t = 80)]
    refresh_ms: u64,

    /// Height-to-width ratio of a terminal cell
    #[arg(long, default_value_t = 2.0)]
    cell_aspect: f64,

    /// Print a single frame to stdout and exit
    #[arg(long)]
    once: bool,

    /// Canvas size for --once, as COLSxROWS
    #[arg(long, default_value = "80x40", value_parser = parse_size)]
    size: (u16, u16),

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn parse_size(value: &str) -> Result<(u16, u16), String> {
    let (cols, rows) = value
        .split_once(|c: char| c == 'x' || c == 'X')
        .ok_or_else(|| format!("expected COLSxROWS, got `{value}`"))?;
    let cols = cols
        .trim()
        .parse::<u16>()
        .map_err(|e| format!("bad column count `{cols}`: {e}"))?;
    let rows = rows
        .trim()
        .parse::<u16>()
        .map_err(|e| format!("bad row count `{rows}`: {e}"))?;
    Ok((cols, rows))
}

fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    let filter = if cli.verbose { "debug" } else { "info" };
    // The interactive viewer owns the screen, so logs only go to a file there.
    let writer = match &cli.log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("cannot create log file {}", path.display()))?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        None if cli.once => BoxMakeWriter::new(io::stderr),
        None => BoxMakeWriter::new(io::sink),
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let mesh = match &cli.model {
        Some(path) => Mesh::open(path)
            .with_context(|| format!("failed to load model {}", path.display()))?,
        None => Mesh::cube(2.0),
    };
    tracing::info!(
        vertices = mesh.vertex_count(),
        edges = mesh.edge_count(),
        "model ready"
    );

    let config = ViewerConfig {
        scale: cli.scale,
        animate: !cli.no_animate,
        refresh: Duration::from_millis(cli.refresh_ms),
        cell_aspect: cli.cell_aspect,
    };

    if cli.once {
        let (cols, rows) = cli.size;
        let mut viewer = Viewer::new(mesh, &config, cols, rows);
        print!("{}", viewer.render().to_text());
        return Ok(());
    }

    let mut app = TerminalApp::new(mesh, config)?;
    app.run()?;
    Ok(())
}
