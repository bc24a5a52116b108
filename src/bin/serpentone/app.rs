//! Wires the pieces together: audio stream, performer thread, input sources
//! and the terminal UI.

use std::sync::{
    atomic::{AtomicBool, AtomicU8, Ordering},
    Arc,
};

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use midir::{MidiInput, MidiInputConnection};
use rtrb::{Producer, RingBuffer};
use tracing::{debug, info, warn};

use serpentone::{
    engine::{command_channel, Dispatcher, PerformanceEvent, Performer},
    io::{midi_to_command, MidiEvent, QwertyKeyboard},
    synth::{voice_ring, PolyphonyManager, RingBackend, VoiceBank},
    InstrumentConfig, MAX_BLOCK_SIZE,
};

use super::{input, ui};

/// Start/stop messages that can queue up between the performer and the
/// audio callback.
const VOICE_RING_CAPACITY: usize = 512;

/// Names of the MIDI inputs midir can see.
pub fn midi_input_names() -> EyreResult<Vec<String>> {
    let midi_in = MidiInput::new("serpentone-list").wrap_err("failed to open MIDI input")?;
    Ok(midi_in
        .ports()
        .iter()
        .map(|port| midi_in.port_name(port).unwrap_or_else(|_| "<unnamed>".into()))
        .collect())
}

/// Main application builder
pub struct Serpentone {
    config: InstrumentConfig,
    qwerty: bool,
    midi_port: Option<String>,
}

impl Serpentone {
    pub fn new(config: InstrumentConfig) -> Self {
        Self {
            config,
            qwerty: true,
            midi_port: None,
        }
    }

    /// Read notes from the computer keyboard
    pub fn qwerty(mut self, enabled: bool) -> Self {
        self.qwerty = enabled;
        self
    }

    /// Also listen to the MIDI input whose name contains `port`
    pub fn midi_port(mut self, port: Option<String>) -> Self {
        self.midi_port = port;
        self
    }

    /// Run until the user quits
    pub fn run(self) -> EyreResult<()> {
        let config = self.config;

        // Audio side: voice bank inside the cpal callback
        let (voice_tx, voice_rx) = voice_ring(VOICE_RING_CAPACITY);
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let stream_config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;
        let sample_rate = stream_config.sample_rate().0 as f32;
        let channels = stream_config.channels() as usize;
        info!(sample_rate, channels, "audio output opened");

        let mut bank = VoiceBank::new(sample_rate, config.max_voices, voice_rx);
        let mut render_buf = vec![0.0f32; MAX_BLOCK_SIZE];
        let stream = device.build_output_stream(
            &stream_config.into(),
            move |data: &mut [f32], _| {
                let total_frames = data.len() / channels;
                let mut frames_written = 0;

                while frames_written < total_frames {
                    let frames = (total_frames - frames_written).min(MAX_BLOCK_SIZE);
                    let block = &mut render_buf[..frames];
                    bank.render_block(block);

                    // Mono to all channels
                    let out_off = frames_written * channels;
                    for (i, &s) in block.iter().enumerate() {
                        for ch in 0..channels {
                            data[out_off + i * channels + ch] = s;
                        }
                    }
                    frames_written += frames;
                }
            },
            |err| warn!("audio stream error: {err}"),
            None,
        )?;
        stream.play()?;

        // Control side: one performer owns the manager and the backend
        let backend = RingBackend::new(voice_tx).with_patch(config.patch);
        let tuning = config.build_tuning()?;
        let manager = PolyphonyManager::new(backend, tuning.clone())
            .with_release(config.release_seconds);
        let (dispatcher, commands) = command_channel(config.command_capacity);
        let (event_tx, event_rx) = RingBuffer::new(config.event_capacity);
        let performer = Performer::new(manager)
            .spawn(commands, forward_events(event_tx))
            .wrap_err("failed to start performer thread")?;

        // Inputs only ever hold a dispatcher
        let midi = match &self.midi_port {
            Some(port) => Some(connect_midi(port, dispatcher.clone(), config.midi_channel)?),
            None => None,
        };

        let octave = Arc::new(AtomicU8::new(config.start_octave));
        let keyboard = self.qwerty.then(|| {
            QwertyKeyboard::new(config.start_octave).with_tuning(
                config.tuning,
                config.key,
                tuning.reference(),
            )
        });
        let control = dispatcher.clone();
        let quit = Arc::new(AtomicBool::new(false));

        let mut terminal = ratatui::init();
        // Keyboard enhancement has to be pushed once raw mode is on.
        let input = match input::spawn(dispatcher, keyboard, octave.clone(), quit.clone()) {
            Ok(handle) => handle,
            Err(err) => {
                ratatui::restore();
                return Err(err);
            }
        };

        let state = ui::UiState::new(&config, &tuning, octave);
        let result = ui::UiApp::new(event_rx, state).run(&mut terminal, || {
            if performer.is_finished() {
                Err("performer thread exited")
            } else if input.is_finished() {
                Err("input thread exited")
            } else {
                Ok(())
            }
        });
        ratatui::restore();

        // Normally the performer is already gone; this covers a UI error.
        quit.store(true, Ordering::Relaxed);
        if control.shutdown().is_ok() {
            debug!("performer stopped from UI");
        }
        if input.join().is_err() {
            warn!("input thread panicked");
        }
        match performer.join() {
            Ok(report) => info!(?report, "session finished"),
            Err(_) => warn!("performer thread panicked"),
        }
        drop(midi);
        drop(stream);

        result
    }
}

/// Observer that pushes performer events to the UI ring. Events are dropped
/// when the UI falls behind; the UI also watches the threads themselves, so
/// a lost `Stopped` does not keep it running.
fn forward_events(mut tx: Producer<PerformanceEvent>) -> impl FnMut(PerformanceEvent) + Send {
    move |event| {
        if tx.push(event).is_err() {
            debug!("UI event ring full, dropping event");
        }
    }
}

fn connect_midi(
    port_name: &str,
    dispatcher: Dispatcher,
    channel: Option<u8>,
) -> EyreResult<MidiInputConnection<()>> {
    let midi_in = MidiInput::new("serpentone").wrap_err("failed to open MIDI input")?;
    let ports = midi_in.ports();
    let port = ports
        .iter()
        .find(|p| {
            midi_in
                .port_name(p)
                .is_ok_and(|name| name.contains(port_name))
        })
        .ok_or_else(|| eyre!("no MIDI input matching {port_name:?}"))?;
    let name = midi_in.port_name(port).unwrap_or_else(|_| port_name.into());

    let connection = midi_in
        .connect(
            port,
            "serpentone-in",
            move |_timestamp, message, _| {
                let Some(command) = MidiEvent::from_bytes(message)
                    .and_then(|event| midi_to_command(event, channel))
                else {
                    return;
                };
                if let Err(err) = dispatcher.send(command) {
                    debug!("dropping MIDI input: {err}");
                }
            },
            (),
        )
        .map_err(|e| eyre!("failed to connect to MIDI input {name:?}: {e}"))?;

    info!(port = %name, "MIDI input connected");
    Ok(connection)
}
