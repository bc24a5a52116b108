//! serpentone - play a QWERTY or MIDI keyboard in different tuning systems
//!
//! Run with: cargo run --release -- --tuning just --key D

mod app;
mod input;
mod ui;

use std::{
    fs::File,
    path::{Path, PathBuf},
    sync::Mutex,
};

use clap::Parser;
use color_eyre::eyre::{Result as EyreResult, WrapErr};
use tracing_subscriber::EnvFilter;

use serpentone::{
    synth::Patch,
    tuning::{Key, TuningKind},
    InstrumentConfig,
};

/// Terminal instrument with switchable tuning systems
#[derive(Parser, Debug)]
#[command(name = "serpentone")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Print the available MIDI input ports and exit
    #[arg(long)]
    list_midi_inputs: bool,

    /// Connect to the MIDI input whose name contains PORT
    #[arg(long, value_name = "PORT")]
    midi: Option<String>,

    /// Only accept MIDI on this channel (1-16)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=16))]
    midi_channel: Option<u8>,

    /// Don't read notes from the computer keyboard
    #[arg(long)]
    no_qwerty: bool,

    /// Starting tuning system (equal, just, pythagorean)
    #[arg(long, default_value = "equal")]
    tuning: TuningKind,

    /// Key the ratio-based tunings are anchored to
    #[arg(long, default_value = "C")]
    key: Key,

    /// Starting patch (default, sine, mockingboard)
    #[arg(long, default_value = "sine")]
    patch: Patch,

    /// Frequency of A4 in Hz
    #[arg(long, default_value_t = 440.0)]
    reference_hz: f64,

    /// Octave the QWERTY home row starts in
    #[arg(long, default_value_t = 5)]
    octave: u8,

    /// Note release time in seconds
    #[arg(long, default_value_t = 0.3)]
    release: f32,

    /// Write logs here (the terminal belongs to the UI)
    #[arg(long, default_value = "serpentone.log")]
    log_file: PathBuf,
}

impl Cli {
    fn config(&self) -> InstrumentConfig {
        InstrumentConfig::new()
            .tuning(self.tuning)
            .key(self.key)
            .patch(self.patch)
            .reference_hz(self.reference_hz)
            .start_octave(self.octave)
            .release(self.release)
            .midi_channel(self.midi_channel.map(|c| c - 1))
    }
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    if cli.list_midi_inputs {
        for (index, name) in app::midi_input_names()?.iter().enumerate() {
            println!("{index}: {name}");
        }
        return Ok(());
    }

    init_logging(&cli.log_file)?;

    let config = cli.config();
    config.validate()?;

    app::Serpentone::new(config)
        .qwerty(!cli.no_qwerty)
        .midi_port(cli.midi)
        .run()
}

fn init_logging(path: &Path) -> EyreResult<()> {
    let file = File::create(path)
        .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
