//! Command-line interface for vocap
//!
//! Provides argument parsing using clap derive macros.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Record, review and export voice clips
#[derive(Parser, Debug)]
#[command(name = "vocap", version, about = "Record, review and export voice clips")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Audio input device (e.g., hw:0)
    #[arg(long, value_name = "DEVICE")]
    pub device: Option<String>,

    /// Suppress the live level meter
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Record from the microphone until Enter is pressed, then save a WAV
    Record {
        /// Output file (default: recording.wav)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Play back a WAV file with an interactive waveform
    Play {
        /// File to play
        file: PathBuf,

        /// Start position in seconds
        #[arg(long, value_name = "SECONDS", default_value = "0")]
        seek: f64,
    },

    /// List available audio input devices
    Devices,
}
