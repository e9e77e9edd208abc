use crate::model::event::{Event, microseconds_to_bpm};
use crate::model::mappings::program_name;
use crate::presets::{PRESETS, Preset, preset_for_name};
use crate::writer::MidiWriter;
use log::info;
use std::path::{Path, PathBuf};

pub fn parse_preset(input: &str) -> Option<&'static Preset> {
    let name = match input.to_lowercase().replace('-', "_").as_str() {
        "s" | "scale" => "scale",
        "6" | "sextuplet" | "sextuplets" => "sextuplets",
        "t" | "twinkle" => "twinkle",
        "c" | "chord" | "chords" => "chords",
        "m" | "multi" | "multitrack" | "multi_track" => "multi_track",
        "a" | "amen" => "amen",
        "d" | "disco" => "disco",
        other => {
            let known = PRESETS.iter().map(|p| p.name).collect::<Vec<_>>();
            info!("Unknown demo '{}', expected one of: {}..!", other, known.join("|"));
            return None;
        }
    };
    preset_for_name(name)
}

/// `explicit` if given, otherwise `<stem>.mid` next to the song or in the working directory.
pub fn output_path(explicit: Option<&Path>, song: Option<&Path>, demo: Option<&str>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }

    match (song, demo) {
        (Some(song), _) => song.with_extension("mid"),
        (None, Some(demo)) => PathBuf::from(format!("{demo}.mid")),
        (None, None) => PathBuf::from("output.mid"),
    }
}

/// Human readable per-track overview for dry runs.
pub fn describe(writer: &MidiWriter) -> Vec<String> {
    let mut lines = vec![format!(
        "{} track(s) at {} ticks per quarter note",
        writer.track_count(),
        writer.ticks_per_quarter()
    )];

    for (channel, program) in writer.document().channels().assigned() {
        lines.push(format!(
            "channel {:>2}: program {:>3} ({})",
            channel,
            program,
            program_name(program).unwrap_or("?")
        ));
    }

    for track in writer.document().tracks() {
        let tempos = track
            .events()
            .iter()
            .filter_map(|e| match e {
                Event::Tempo {
                    tick,
                    microseconds_per_quarter,
                } => Some(format!(
                    "{:.0}bpm@{}",
                    microseconds_to_bpm(*microseconds_per_quarter),
                    tick
                )),
                _ => None,
            })
            .collect::<Vec<_>>();
        let last_tick = track.events().iter().map(Event::tick).max().unwrap_or(0);

        lines.push(format!(
            "track {:>2}: {} note(s), ends at tick {}{}",
            track.index(),
            track.note_count(),
            last_tick,
            if tempos.is_empty() {
                String::new()
            } else {
                format!(", tempo {}", tempos.join(" "))
            }
        ));
    }

    lines
}
