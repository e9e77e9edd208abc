use crate::error::{MidiError, Result};
use log::warn;

pub const MAX_CHANNEL: u8 = 15;
pub const MAX_DATA_BYTE: u8 = 127;
pub const MICROSECONDS_PER_MINUTE: f64 = 60_000_000.0;

/// A single timed event inside a track. Ticks are absolute, counted from the start of the track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Tempo {
        tick: u64,
        microseconds_per_quarter: u64,
    },
    NoteOn {
        tick: u64,
        channel: u8,
        pitch: u8,
        velocity: u8,
    },
    /// Note-off events always carry a release velocity of 0.
    NoteOff { tick: u64, channel: u8, pitch: u8 },
    ProgramChange { tick: u64, channel: u8, program: u8 },
}

impl Event {
    /// Build a tempo change at `tick` from a beats-per-minute value.
    ///
    /// Values too slow to fit the 24-bit tempo field are accepted here and
    /// rejected when the track is encoded.
    pub fn tempo(tick: u64, bpm: f64) -> Result<Self> {
        Ok(Event::Tempo {
            tick,
            microseconds_per_quarter: bpm_to_microseconds(bpm)?,
        })
    }

    /// Expand a note into its note-on at `start` and note-off at `start + duration`.
    pub fn note(channel: u8, start: u64, duration: u64, pitch: u8, velocity: u8) -> Result<[Self; 2]> {
        let channel = check_channel(channel)?;
        let pitch = check_data_byte("pitch", pitch)?;
        let velocity = check_data_byte("velocity", velocity)?;
        let Some(end) = start.checked_add(duration) else {
            return Err(MidiError::invalid(
                "duration",
                duration,
                "start + duration to fit in 64 bits",
            ));
        };

        if velocity == 0 {
            warn!(
                "Note {} on channel {} at tick {} has velocity 0 and will read as a note-off..!",
                pitch, channel, start
            );
        }
        if duration == 0 {
            warn!(
                "Zero-length note {} on channel {} at tick {}..!",
                pitch, channel, start
            );
        }

        Ok([
            Event::NoteOn {
                tick: start,
                channel,
                pitch,
                velocity,
            },
            Event::NoteOff {
                tick: end,
                channel,
                pitch,
            },
        ])
    }

    pub fn program_change(tick: u64, channel: u8, program: u8) -> Result<Self> {
        Ok(Event::ProgramChange {
            tick,
            channel: check_channel(channel)?,
            program: check_data_byte("program", program)?,
        })
    }

    pub const fn tick(&self) -> u64 {
        match self {
            Event::Tempo { tick, .. }
            | Event::NoteOn { tick, .. }
            | Event::NoteOff { tick, .. }
            | Event::ProgramChange { tick, .. } => *tick,
        }
    }

    pub const fn is_note(&self) -> bool {
        matches!(self, Event::NoteOn { .. } | Event::NoteOff { .. })
    }

    /// Range-check an event built by hand instead of through the constructors above.
    ///
    /// Tempos wider than 24 bits pass here and fail when the track is encoded.
    pub fn validate(&self) -> Result<()> {
        match *self {
            Event::Tempo {
                microseconds_per_quarter,
                ..
            } => {
                if microseconds_per_quarter == 0 {
                    return Err(MidiError::invalid(
                        "microseconds_per_quarter",
                        microseconds_per_quarter,
                        "a value > 0",
                    ));
                }
            }
            Event::NoteOn {
                channel,
                pitch,
                velocity,
                ..
            } => {
                check_channel(channel)?;
                check_data_byte("pitch", pitch)?;
                check_data_byte("velocity", velocity)?;
            }
            Event::NoteOff { channel, pitch, .. } => {
                check_channel(channel)?;
                check_data_byte("pitch", pitch)?;
            }
            Event::ProgramChange {
                channel, program, ..
            } => {
                check_channel(channel)?;
                check_data_byte("program", program)?;
            }
        }
        Ok(())
    }
}

/// `round(60_000_000 / bpm)`.
pub fn bpm_to_microseconds(bpm: f64) -> Result<u64> {
    if !bpm.is_finite() || bpm <= 0.0 {
        return Err(MidiError::invalid("bpm", bpm, "a finite value > 0"));
    }

    let microseconds = (MICROSECONDS_PER_MINUTE / bpm).round() as u64;
    if microseconds == 0 {
        return Err(MidiError::invalid(
            "bpm",
            bpm,
            "at most 120000000 (one microsecond per quarter note)",
        ));
    }
    Ok(microseconds)
}

pub fn microseconds_to_bpm(microseconds_per_quarter: u64) -> f64 {
    MICROSECONDS_PER_MINUTE / microseconds_per_quarter as f64
}

pub(crate) fn check_channel(channel: u8) -> Result<u8> {
    if channel > MAX_CHANNEL {
        return Err(MidiError::invalid("channel", channel, "a value in [0, 15]"));
    }
    Ok(channel)
}

pub(crate) fn check_data_byte(name: &'static str, value: u8) -> Result<u8> {
    if value > MAX_DATA_BYTE {
        return Err(MidiError::invalid(name, value, "a value in [0, 127]"));
    }
    Ok(value)
}
