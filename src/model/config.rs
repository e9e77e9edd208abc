use crate::model::document::DEFAULT_TICKS_PER_QUARTER;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Settings fixed when a writer is created.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct WriterOptions {
    /// MIDI resolution written as the header's division.
    pub ticks_per_quarter: u16,

    /// Emit the channel table as program change events at the start of track 0.
    pub program_changes: bool,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            ticks_per_quarter: DEFAULT_TICKS_PER_QUARTER,
            program_changes: false,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "smf_writer",
    about = "Write a Standard MIDI File from a JSON song or a built-in demo!"
)]
pub struct Args {
    /// Path to a JSON song description.
    #[arg(conflicts_with = "demo", required_unless_present = "demo")]
    pub song: Option<PathBuf>,

    /// Render a built-in demo instead: scale|sextuplets|twinkle|chords|multi_track|amen|disco.
    #[arg(short, long)]
    pub demo: Option<String>,

    /// Where to write the MIDI file. Missing parent directories are created.
    /// Defaults to the song or demo name with a `.mid` extension.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Ticks per quarter note for demos. JSON songs carry their own.
    #[arg(long, default_value_t = DEFAULT_TICKS_PER_QUARTER)]
    pub ticks_per_quarter: u16,

    /// Write channel assignments as program change events at the start of track 0.
    #[arg(short, long, default_value_t = false)]
    pub program_changes: bool,

    /// Dry run (print a summary of the tracks and exit without writing).
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Prints extra information to the terminal.
    #[arg(short, long)]
    pub verbose: bool,
}
