use crate::error::{MidiError, Result};
use crate::model::config::WriterOptions;
use crate::model::mappings::{DRUM_CHANNEL, drum_for_name, program_for_name};
use crate::writer::MidiWriter;
use log::{debug, warn};

const DEFAULT_BPM: f64 = 120.0;
const DEFAULT_VELOCITY: u8 = 120;
const FULL_VELOCITY: u8 = 127;
const METRONOME_CLICK: u8 = 32;

/// Smallest resolution that still gives sixteenth notes and sextuplets a non-zero length.
pub const MIN_PRESET_TICKS_PER_QUARTER: u16 = 6;

/// A small built-in song used to try out the writer.
#[derive(Debug, Clone, Copy)]
pub struct Preset {
    pub name: &'static str,
    pub description: &'static str,
    build: fn(&mut MidiWriter) -> Result<()>,
}

impl Preset {
    pub fn render(&self, options: WriterOptions) -> Result<MidiWriter> {
        if options.ticks_per_quarter < MIN_PRESET_TICKS_PER_QUARTER {
            return Err(MidiError::invalid(
                "ticks_per_quarter",
                options.ticks_per_quarter,
                "at least 6 ticks per quarter note for built-in demos",
            ));
        }

        let mut writer = MidiWriter::with_options(options)?;
        (self.build)(&mut writer)?;

        debug!(
            "Rendered preset '{}' into {} track(s)",
            self.name,
            writer.track_count()
        );
        Ok(writer)
    }
}

pub const PRESETS: &[Preset] = &[
    Preset {
        name: "scale",
        description: "C major scale in quarter notes",
        build: scale,
    },
    Preset {
        name: "sextuplets",
        description: "24 rising sextuplet notes",
        build: sextuplets,
    },
    Preset {
        name: "twinkle",
        description: "Twinkle Twinkle Little Star with two tempo changes",
        build: twinkle,
    },
    Preset {
        name: "chords",
        description: "Stacked and staggered seventh chords",
        build: chords,
    },
    Preset {
        name: "multi_track",
        description: "One note on each of four tracks, alternating channels",
        build: multi_track,
    },
    Preset {
        name: "amen",
        description: "The Amen break at 170 bpm",
        build: amen,
    },
    Preset {
        name: "disco",
        description: "A disco beat at 125 bpm",
        build: disco,
    },
];

pub fn preset_for_name(name: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|p| p.name == name)
}

fn quarter(writer: &MidiWriter) -> u64 {
    writer.ticks_per_quarter() as u64
}

fn scale(writer: &mut MidiWriter) -> Result<()> {
    let tpq = quarter(writer);
    writer.add_bpm(0, 0, DEFAULT_BPM)?;
    writer.set_channel(0, program_for_name("acoustic_grand_piano").unwrap_or(0))?;

    for (beat, pitch) in [60, 62, 64, 65, 67, 69, 71, 72].into_iter().enumerate() {
        writer.add_note(0, 0, beat as u64 * tpq, tpq, pitch, DEFAULT_VELOCITY)?;
    }
    Ok(())
}

fn sextuplets(writer: &mut MidiWriter) -> Result<()> {
    let tpq = quarter(writer);
    writer.add_bpm(0, 0, DEFAULT_BPM)?;
    writer.set_channel(0, 0)?;

    for beat in 0..24u64 {
        writer.add_note(0, 0, beat * tpq / 6, tpq / 6, 60 + beat as u8, 100)?;
    }
    Ok(())
}

fn twinkle(writer: &mut MidiWriter) -> Result<()> {
    let tpq = quarter(writer);
    writer.add_bpm(0, 0, DEFAULT_BPM)?;
    writer.set_channel(0, 0)?;

    // one character per beat, `_` rests
    let melody = "CCGGAAG_FFEEDDC_GGFFEED_GGFFEED_CCGGAAG_FFEEDDC_";
    for (beat, letter) in melody.chars().enumerate() {
        let pitch = match letter {
            'C' => 60,
            'D' => 62,
            'E' => 64,
            'F' => 65,
            'G' => 67,
            'A' => 69,
            'B' => 71,
            _ => continue,
        };

        let start = beat as u64 * tpq;
        writer.add_note(0, 0, start, tpq, pitch, FULL_VELOCITY)?;
        match beat {
            8 => writer.add_bpm(0, start, 80.0)?,
            16 => writer.add_bpm(0, start, 180.0)?,
            _ => {}
        }
    }
    Ok(())
}

fn chords(writer: &mut MidiWriter) -> Result<()> {
    let tpq = quarter(writer);
    writer.add_bpm(0, 0, DEFAULT_BPM)?;
    writer.set_channel(0, 0)?;

    // (start, duration) in quarter notes
    let notes: [(u64, u64, u8); 8] = [
        (0, 3, 60),
        (0, 3, 64),
        (0, 3, 67),
        (0, 3, 71),
        (4, 4, 60),
        (5, 4, 64),
        (6, 4, 67),
        (7, 4, 71),
    ];
    for (start, duration, pitch) in notes {
        writer.add_note(0, 0, start * tpq, duration * tpq, pitch, FULL_VELOCITY)?;
    }
    Ok(())
}

/// Score editors tend to merge staves sharing a program, so the tracks alternate channels.
fn multi_track(writer: &mut MidiWriter) -> Result<()> {
    let tpq = quarter(writer);
    writer.add_bpm(0, 0, DEFAULT_BPM)?;
    writer.set_channel(0, 0)?;
    writer.set_channel(1, 0)?;

    for (track, pitch) in [60, 62, 64, 65].into_iter().enumerate() {
        let channel = (track % 2) as u8;
        writer.add_note(track, channel, track as u64 * tpq, tpq, pitch, FULL_VELOCITY)?;
    }
    Ok(())
}

fn amen(writer: &mut MidiWriter) -> Result<()> {
    drum_patterns(
        writer,
        170.0,
        &[
            ("cymbal_crash1", "................|................|................|..........x.....|"),
            ("cymbal_ride", "x.x.x.x.x.x.x.x.|x.x.x.x.x.x.x.x.|x.x.x.x.x.x.x.x.|x.x.x.x.x...x.x.|"),
            ("snare_drum", "....x.......x...|....x.......x...|....x.........x.|....x.........x.|"),
            ("snare_drum_rim", ".......x.x.....x|.......x.x.....x|.......x.x......|.x.....x.x......|"),
            ("kick_drum", "x.........xx....|x.........xx....|x.x.......x.....|..xx......x.....|"),
        ],
    )
}

fn disco(writer: &mut MidiWriter) -> Result<()> {
    drum_patterns(
        writer,
        125.0,
        &[
            ("cymbal_crash1", "|x...............|................|................|................|x...............|"),
            ("cymbal_ride", "|................|................|x...x...x...x...|................|................|"),
            ("cymbal_ride_bell", "|................|................|..x...x...x...x.|................|................|"),
            ("cymbal_hihat_closed", "|....xx.xxx.xxx.x|xx.xxx.xxx.xxx.x|................|................|................|"),
            ("cymbal_hihat_open", "|......x...x...x.|..x...x...x...x.|................|................|................|"),
            ("tom5", "|................|................|................|xxx.............|................|"),
            ("tom4", "|................|................|................|...xxx..........|................|"),
            ("tom3", "|................|................|................|......xxx.......|................|"),
            ("tom2", "|................|................|................|.........xxx....|................|"),
            ("cowbell", "|x...x...x...x...|x...x...x...x...|x...x...x...x...|x...x...x...x...|x...............|"),
            ("snare_drum", "|....x.......x..x|....x.......xxxx|...x..x....x..x.|............xxxx|................|"),
            ("kick_drum", "|x.....x...x..x..|x.....x...x..x..|x.....x...x..x..|x...x...x...x...|x...............|"),
        ],
    )
}

/// Lay out `(drum, pattern)` rows on the percussion channel, one sixteenth note per step.
fn drum_patterns(writer: &mut MidiWriter, bpm: f64, patterns: &[(&str, &str)]) -> Result<()> {
    let sixteenth = quarter(writer) / 4;
    writer.add_bpm(0, 0, bpm)?;

    for (drum, pattern) in patterns {
        let key = drum_for_name(drum).unwrap_or_else(|| {
            warn!("Unknown drum '{}', using the metronome click..!", drum);
            METRONOME_CLICK
        });

        for step in pattern_hits(pattern) {
            writer.add_note(
                0,
                DRUM_CHANNEL,
                step * sixteenth,
                sixteenth,
                key,
                DEFAULT_VELOCITY,
            )?;
        }
    }
    Ok(())
}

/// Step indices of every `x`. Bar separators (`|`) do not take up a step.
pub fn pattern_hits(pattern: &str) -> impl Iterator<Item = u64> + '_ {
    pattern
        .chars()
        .filter(|c| *c != '|')
        .enumerate()
        .filter(|(_, c)| *c == 'x')
        .map(|(step, _)| step as u64)
}
