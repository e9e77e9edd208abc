use crate::error::{MidiError, Result};
use crate::model::config::WriterOptions;
use crate::model::document::MAX_TRACKS;
use crate::model::mappings::{drum_for_name, program_for_name};
use crate::writer::MidiWriter;
use serde::{Deserialize, Serialize};

const DEFAULT_BPM: f64 = 120.0;
const DEFAULT_DURATION: u64 = 480;
const DEFAULT_PITCH: u8 = 60;
const DEFAULT_VELOCITY: u8 = 127;

/// Either a raw MIDI number or a General MIDI name.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum NameOrNumber {
    Number(u8),
    Name(String),
}

impl NameOrNumber {
    fn resolve(
        &self,
        param: &'static str,
        expected: &'static str,
        lookup: fn(&str) -> Option<u8>,
    ) -> Result<u8> {
        match self {
            NameOrNumber::Number(n) => Ok(*n),
            NameOrNumber::Name(name) => {
                lookup(name).ok_or_else(|| MidiError::invalid(param, name, expected))
            }
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChannelAssignment {
    pub channel: u8,
    pub program: NameOrNumber,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TempoChange {
    #[serde(default)]
    pub track: usize,
    #[serde(default)]
    pub start: u64,
    #[serde(default = "default_bpm")]
    pub bpm: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NoteSpec {
    #[serde(default)]
    pub track: usize,
    #[serde(default)]
    pub channel: u8,
    #[serde(default)]
    pub start: u64,
    #[serde(default = "default_duration")]
    pub duration: u64,
    /// A note number, or a percussion name such as `"snare_drum"`.
    #[serde(default = "default_pitch")]
    pub pitch: NameOrNumber,
    #[serde(default = "default_velocity")]
    pub velocity: u8,
}

/// A whole piece as stored on disk, replayed onto a [`MidiWriter`].
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Song {
    #[serde(flatten)]
    pub options: WriterOptions,

    /// Empty tracks to create up front.
    #[serde(default)]
    pub tracks: usize,

    #[serde(default)]
    pub channels: Vec<ChannelAssignment>,

    #[serde(default)]
    pub tempos: Vec<TempoChange>,

    #[serde(default)]
    pub notes: Vec<NoteSpec>,
}

fn default_bpm() -> f64 {
    DEFAULT_BPM
}

fn default_duration() -> u64 {
    DEFAULT_DURATION
}

fn default_pitch() -> NameOrNumber {
    NameOrNumber::Number(DEFAULT_PITCH)
}

fn default_velocity() -> u8 {
    DEFAULT_VELOCITY
}

impl Song {
    /// Build a writer holding this song: channels first, then tempos, then notes.
    pub fn to_writer(&self) -> Result<MidiWriter> {
        if self.tracks > MAX_TRACKS {
            return Err(MidiError::invalid(
                "tracks",
                self.tracks,
                "at most 65535 tracks",
            ));
        }

        let mut writer = MidiWriter::with_options(self.options)?;
        for _ in 0..self.tracks {
            writer.add_track();
        }

        for assignment in &self.channels {
            let program = assignment.program.resolve(
                "program",
                "a General MIDI program name",
                program_for_name,
            )?;
            writer.set_channel(assignment.channel, program)?;
        }

        for tempo in &self.tempos {
            writer.add_bpm(tempo.track, tempo.start, tempo.bpm)?;
        }

        for note in &self.notes {
            let pitch = note
                .pitch
                .resolve("pitch", "a General MIDI percussion name", drum_for_name)?;
            writer.add_note(
                note.track,
                note.channel,
                note.start,
                note.duration,
                pitch,
                note.velocity,
            )?;
        }

        Ok(writer)
    }
}
