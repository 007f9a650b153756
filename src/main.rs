use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossbeam_channel::unbounded;
use vocap::audio::capture::{CpalCaptureSource, list_devices};
use vocap::cli::{Cli, Commands};
use vocap::config::Config;
use vocap::playback::{PlaybackState, RodioPlayback};
use vocap::waveform::format_level_bar;
use vocap::{AudioArtifact, RecorderWidget, defaults, format_time};

const UI_POLL: Duration = Duration::from_millis(100);

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_deref())?;
    if cli.device.is_some() {
        config.audio.device = cli.device.clone();
    }

    match cli.command {
        None => {
            run_record(&config, None, cli.quiet)?;
        }
        Some(Commands::Record { output }) => {
            run_record(&config, output, cli.quiet)?;
        }
        Some(Commands::Play { file, seek }) => {
            run_play(&config, &file, seek, cli.quiet)?;
        }
        Some(Commands::Devices) => {
            let devices = list_devices()?;
            if devices.is_empty() {
                println!("No audio input devices found");
            } else {
                for device in devices {
                    println!("{device}");
                }
            }
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::load(path)?,
        None => match Config::default_path() {
            Some(path) => Config::load_or_default(&path)?,
            None => Config::default(),
        },
    };
    Ok(config.with_env_overrides())
}

fn build_widget(
    config: &Config,
) -> Result<RecorderWidget<CpalCaptureSource, RodioPlayback>> {
    let source = CpalCaptureSource::new(config.audio.device.as_deref(), config.audio.sample_rate)?;
    let channel = unbounded();
    let device = RodioPlayback::new(channel.0.clone())?;
    Ok(RecorderWidget::with_playback_channel(source, device, channel)
        .with_waveform_bars(config.waveform.bars))
}

/// Record until Enter is pressed, then save the WAV.
fn run_record(config: &Config, output: Option<PathBuf>, quiet: bool) -> Result<()> {
    let mut widget = build_widget(config)?;

    eprintln!("vocap {}", vocap::version_string());
    eprintln!("Recording... press Enter to stop");
    widget.start_recording()?;

    let stop = wait_for_enter();
    loop {
        if stop.try_recv().is_ok() {
            break;
        }
        thread::sleep(UI_POLL);
        let update = widget.poll_recording()?;
        if !quiet {
            eprint!(
                "\r{} [{}]",
                format_time(update.elapsed_seconds as f64),
                format_level_bar(update.level, defaults::METER_WIDTH),
            );
            let _ = std::io::stderr().flush();
        }
    }
    if !quiet {
        eprintln!();
    }

    let artifact = widget
        .stop_recording()?
        .context("recording produced no audio")?;
    widget.pump_deadline(Duration::from_secs(10))?;

    if let Some(waveform) = widget.waveform() {
        println!("{}", waveform.render());
    }
    println!(
        "Recorded {} ({} bytes)",
        format_time(widget.duration_secs()),
        artifact.bytes().len()
    );

    let output = output.or_else(|| Some(PathBuf::from(&config.export.filename)));
    let path = widget.download(output.as_deref())?;
    println!("Saved to {}", path.display());
    Ok(())
}

/// Play a WAV file, drawing the waveform and playhead until the clip ends.
fn run_play(config: &Config, file: &Path, seek: f64, quiet: bool) -> Result<()> {
    let bytes =
        std::fs::read(file).with_context(|| format!("failed to read {}", file.display()))?;

    let mut widget = build_widget(config)?;
    widget.adopt_artifact(Some(AudioArtifact::new(bytes, 0.0)))?;
    widget.pump_deadline(Duration::from_secs(10))?;

    if widget.playback_state() == PlaybackState::Stopped {
        anyhow::bail!("{} is not playable", file.display());
    }

    if seek > 0.0 {
        widget.seek(seek)?;
    }
    widget.toggle_play_pause();

    while widget.playback_state() == PlaybackState::Playing {
        thread::sleep(UI_POLL);
        widget.pump()?;
        if !quiet && let Some(waveform) = widget.waveform() {
            eprint!("\r{}  {}", waveform.render(), widget.controls_line());
            let _ = std::io::stderr().flush();
        }
    }
    if !quiet {
        eprintln!();
    }
    Ok(())
}

/// Fire a message when the user presses Enter.
fn wait_for_enter() -> mpsc::Receiver<()> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = [0u8; 1];
        let mut stdin = std::io::stdin();
        loop {
            match stdin.read(&mut buf) {
                Ok(0) | Err(_) => break,
                Ok(_) if buf[0] == b'\n' => break,
                Ok(_) => {}
            }
        }
        let _ = tx.send(());
    });
    rx
}
