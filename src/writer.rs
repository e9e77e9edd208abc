use crate::encoder::chunk::write_smf;
use crate::error::Result;
use crate::model::config::WriterOptions;
use crate::model::document::Document;
use crate::model::event::Event;
use log::debug;
use std::borrow::Cow;

/// Builds a multi-track Standard MIDI File from tempo changes and notes.
///
/// All times are absolute MIDI ticks. With the default 480 ticks per quarter note:
///   - 480 ticks = quarter note
///   - 240 ticks = eighth note
///   - 120 ticks = sixteenth note
///
/// ```
/// use smf_writer::MidiWriter;
///
/// let mut midi = MidiWriter::new();
/// midi.add_bpm(0, 0, 120.0)?;
/// midi.set_channel(0, 0)?;
/// for (beat, pitch) in [60, 62, 64, 65].into_iter().enumerate() {
///     midi.add_note(0, 0, beat as u64 * 480, 480, pitch, 120)?;
/// }
///
/// let bytes = midi.finalize()?;
/// assert_eq!(&bytes[..4], b"MThd");
/// # Ok::<(), smf_writer::MidiError>(())
/// ```
///
/// Tracks referenced before they exist are created on demand, along with any
/// lower-numbered tracks. A failing call never changes the document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MidiWriter {
    document: Document,
    options: WriterOptions,
}

impl MidiWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: WriterOptions) -> Result<Self> {
        Ok(Self {
            document: Document::new(options.ticks_per_quarter)?,
            options,
        })
    }

    pub fn options(&self) -> WriterOptions {
        self.options
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn ticks_per_quarter(&self) -> u16 {
        self.document.ticks_per_quarter()
    }

    pub fn track_count(&self) -> usize {
        self.document.tracks().len()
    }

    /// Append a new empty track and return its index.
    pub fn add_track(&mut self) -> usize {
        self.document.add_track()
    }

    /// Assign `program` to `channel` for the whole file.
    pub fn set_channel(&mut self, channel: u8, program: u8) -> Result<()> {
        self.document.set_channel(channel, program)
    }

    /// Insert a tempo change at tick `start` of `track`.
    pub fn add_bpm(&mut self, track: usize, start: u64, bpm: f64) -> Result<()> {
        let event = Event::tempo(start, bpm)?;
        self.document.add_event(track, event)?;

        debug!("Tempo {} bpm at tick {} on track {}", bpm, start, track);
        Ok(())
    }

    /// Insert a note, stored as a note-on at `start` and a note-off at `start + duration`.
    pub fn add_note(
        &mut self,
        track: usize,
        channel: u8,
        start: u64,
        duration: u64,
        pitch: u8,
        velocity: u8,
    ) -> Result<()> {
        let pair = Event::note(channel, start, duration, pitch, velocity)?;
        self.document.add_events(track, pair)
    }

    /// Serialize the current document into Standard MIDI File bytes.
    ///
    /// Does not modify the writer, so repeated calls give identical output.
    pub fn finalize(&self) -> Result<Vec<u8>> {
        let mut tracks: Vec<Cow<'_, [Event]>> = self
            .document
            .tracks()
            .iter()
            .map(|track| Cow::Borrowed(track.events()))
            .collect();

        let channels = self.document.channels();
        if self.options.program_changes && !channels.is_empty() {
            let mut head = channels
                .assigned()
                .map(|(channel, program)| Event::ProgramChange {
                    tick: 0,
                    channel,
                    program,
                })
                .collect::<Vec<_>>();

            match tracks.first_mut() {
                Some(first) => {
                    head.extend_from_slice(first);
                    *first = Cow::Owned(head);
                }
                None => tracks.push(Cow::Owned(head)),
            }
        }

        debug!(
            "Finalizing {} track(s) at {} ticks per quarter note..!",
            tracks.len(),
            self.ticks_per_quarter()
        );

        write_smf(self.ticks_per_quarter(), &tracks)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::event::microseconds_to_bpm;
    use midly::{Format, MetaMessage, MidiMessage, Smf, Timing, TrackEventKind};
    use std::collections::HashMap;

    /// Decoded `(absolute tick, kind)` pairs of one track.
    fn absolute_events<'a>(smf: &'a Smf, track: usize) -> Vec<(u64, TrackEventKind<'a>)> {
        let mut tick = 0u64;
        smf.tracks[track]
            .iter()
            .map(|ev| {
                tick += ev.delta.as_int() as u64;
                (tick, ev.kind)
            })
            .collect()
    }

    fn note_events(events: &[(u64, TrackEventKind)]) -> Vec<(u64, u8, u8, bool)> {
        events
            .iter()
            .filter_map(|(tick, kind)| match kind {
                TrackEventKind::Midi { channel, message } => match message {
                    MidiMessage::NoteOn { key, .. } => {
                        Some((*tick, channel.as_int(), key.as_int(), true))
                    }
                    MidiMessage::NoteOff { key, .. } => {
                        Some((*tick, channel.as_int(), key.as_int(), false))
                    }
                    _ => None,
                },
                _ => None,
            })
            .collect()
    }

    #[test]
    fn quarter_note_scenario_is_byte_exact() {
        env_logger::try_init().unwrap_or(());

        let mut midi = MidiWriter::new();
        midi.add_bpm(0, 0, 120.0).unwrap();
        midi.set_channel(0, 0).unwrap();
        midi.add_note(0, 0, 0, 480, 60, 120).unwrap();

        let bytes = midi.finalize().unwrap();

        #[rustfmt::skip]
        let expected = [
            b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 1, 0, 1, 0x01, 0xE0,
            b'M', b'T', b'r', b'k', 0, 0, 0, 20,
            0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20,
            0x00, 0x90, 0x3C, 0x78,
            0x83, 0x60, 0x80, 0x3C, 0x00,
            0x00, 0xFF, 0x2F, 0x00,
        ];
        assert_eq!(bytes, expected);
    }

    #[test]
    fn output_parses_as_format_one() {
        env_logger::try_init().unwrap_or(());

        let mut midi = MidiWriter::new();
        midi.add_bpm(0, 0, 120.0).unwrap();
        midi.add_note(0, 0, 0, 480, 60, 120).unwrap();
        midi.add_note(1, 1, 480, 240, 67, 100).unwrap();

        let bytes = midi.finalize().unwrap();
        let smf = Smf::parse(&bytes).unwrap();

        assert_eq!(smf.header.format, Format::Parallel);
        let Timing::Metrical(tpq) = smf.header.timing else {
            panic!("expected metrical timing, got {:?}", smf.header.timing);
        };
        assert_eq!(tpq.as_int(), 480);
        assert_eq!(smf.tracks.len(), 2);

        let second = note_events(&absolute_events(&smf, 1));
        assert_eq!(second, vec![(480, 1, 67, true), (720, 1, 67, false)]);
    }

    #[test]
    fn tempo_survives_decoding() {
        for bpm in [4u32, 30, 60, 91, 120, 133, 177, 240, 300, 999] {
            let mut midi = MidiWriter::new();
            midi.add_bpm(0, 0, bpm as f64).unwrap();

            let bytes = midi.finalize().unwrap();
            let smf = Smf::parse(&bytes).unwrap();
            let tempo = smf.tracks[0]
                .iter()
                .find_map(|ev| match ev.kind {
                    TrackEventKind::Meta(MetaMessage::Tempo(t)) => Some(t.as_int()),
                    _ => None,
                })
                .unwrap();

            assert!((microseconds_to_bpm(tempo as u64) - bpm as f64).abs() <= 1.0);
        }
    }

    #[test]
    fn finalize_is_idempotent() {
        let mut midi = MidiWriter::with_options(WriterOptions {
            ticks_per_quarter: 96,
            program_changes: true,
        })
        .unwrap();
        midi.set_channel(3, 40).unwrap();
        midi.add_bpm(0, 0, 100.0).unwrap();
        midi.add_note(2, 3, 96, 48, 72, 64).unwrap();

        let before = midi.clone();
        let first = midi.finalize().unwrap();
        let second = midi.finalize().unwrap();
        assert_eq!(first, second);
        assert_eq!(midi, before);
    }

    #[test]
    fn note_events_come_in_matched_pairs() {
        env_logger::try_init().unwrap_or(());

        let mut midi = MidiWriter::new();
        let mut seed = 0x2545_F491u32;
        let mut next = |modulo: u32| {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            seed % modulo
        };

        let mut added = [0usize; 3];
        for _ in 0..300 {
            let track = next(3) as usize;
            let start = next(20) as u64 * 120;
            let duration = next(5) as u64 * 120;
            let channel = next(16) as u8;
            let pitch = 48 + next(12) as u8;
            midi.add_note(track, channel, start, duration, pitch, 100).unwrap();
            added[track] += 1;
        }

        let bytes = midi.finalize().unwrap();
        let smf = Smf::parse(&bytes).unwrap();
        assert_eq!(smf.tracks.len(), 3);

        for (track, count) in added.iter().enumerate() {
            let notes = note_events(&absolute_events(&smf, track));
            assert_eq!(notes.len(), 2 * count);

            // Walking backwards, every note-on must be covered by a later note-off.
            let mut pending_offs: HashMap<(u8, u8), i64> = HashMap::new();
            for (_, channel, key, is_on) in notes.iter().rev() {
                let balance = pending_offs.entry((*channel, *key)).or_default();
                if *is_on {
                    *balance -= 1;
                    assert!(*balance >= 0, "note-on {key} ch{channel} has no later note-off");
                } else {
                    *balance += 1;
                }
            }
        }
    }

    #[test]
    fn referencing_track_four_creates_five_tracks() {
        env_logger::try_init().unwrap_or(());

        let mut midi = MidiWriter::new();
        midi.add_note(4, 0, 0, 480, 60, 100).unwrap();
        assert_eq!(midi.track_count(), 5);
        assert!(midi.document().tracks()[..4].iter().all(|t| t.is_empty()));

        let bytes = midi.finalize().unwrap();
        assert_eq!(u16::from_be_bytes([bytes[10], bytes[11]]), 5);

        let smf = Smf::parse(&bytes).unwrap();
        assert_eq!(smf.tracks.len(), 5);
        for track in 0..4 {
            assert!(note_events(&absolute_events(&smf, track)).is_empty());
        }
    }

    #[test]
    fn empty_tracks_still_get_a_chunk() {
        let mut midi = MidiWriter::new();
        assert_eq!(midi.add_track(), 0);
        assert_eq!(midi.add_track(), 1);

        let bytes = midi.finalize().unwrap();
        let empty_chunk = [b'M', b'T', b'r', b'k', 0, 0, 0, 4, 0x00, 0xFF, 0x2F, 0x00];
        assert_eq!(bytes.len(), 14 + 2 * empty_chunk.len());
        assert_eq!(&bytes[14..26], &empty_chunk);
        assert_eq!(&bytes[26..], &empty_chunk);
    }

    #[test]
    fn rejected_calls_leave_the_document_alone() {
        env_logger::try_init().unwrap_or(());

        let mut midi = MidiWriter::new();
        midi.add_note(0, 0, 0, 480, 60, 100).unwrap();
        let before = midi.clone();

        assert!(midi.add_note(0, 0, 480, 480, 62, 200).unwrap_err().is_invalid_parameter());
        assert!(midi.add_note(0, 16, 480, 480, 62, 100).unwrap_err().is_invalid_parameter());
        assert!(midi.add_note(0, 0, 480, 480, 130, 100).unwrap_err().is_invalid_parameter());
        assert!(midi.add_note(7, 0, 480, 480, 130, 100).unwrap_err().is_invalid_parameter());
        assert!(midi.add_bpm(0, 0, 0.0).unwrap_err().is_invalid_parameter());
        assert!(midi.add_bpm(3, 0, -10.0).unwrap_err().is_invalid_parameter());
        assert!(midi.set_channel(16, 0).unwrap_err().is_invalid_parameter());
        assert!(midi.set_channel(0, 128).unwrap_err().is_invalid_parameter());

        assert_eq!(midi, before);
        assert_eq!(midi.document().track(0).unwrap().len(), 2);
        assert_eq!(midi.track_count(), 1);
    }

    #[test]
    fn encoding_errors_surface_from_finalize() {
        let mut midi = MidiWriter::new();
        midi.add_bpm(0, 0, 2.0).unwrap();
        assert!(midi.finalize().unwrap_err().is_encoding_overflow());

        let mut midi = MidiWriter::new();
        midi.add_note(0, 0, 0x1000_0000, 1, 60, 100).unwrap();
        assert!(midi.finalize().unwrap_err().is_encoding_overflow());
    }

    #[test]
    fn channel_table_is_not_written_by_default() {
        let mut plain = MidiWriter::new();
        plain.add_note(0, 0, 0, 480, 60, 100).unwrap();

        let mut assigned = plain.clone();
        assigned.set_channel(0, 13).unwrap();
        assigned.set_channel(5, 73).unwrap();

        assert_eq!(assigned.document().channels().program(5), 73);
        assert_eq!(assigned.document().channels().program(6), 0);
        assert_eq!(plain.finalize().unwrap(), assigned.finalize().unwrap());
    }

    #[test]
    fn program_changes_lead_track_zero() {
        env_logger::try_init().unwrap_or(());

        let mut midi = MidiWriter::with_options(WriterOptions {
            program_changes: true,
            ..Default::default()
        })
        .unwrap();
        midi.add_bpm(0, 0, 120.0).unwrap();
        midi.set_channel(9, 0).unwrap();
        midi.set_channel(1, 13).unwrap();
        midi.set_channel(1, 18).unwrap();
        midi.add_note(1, 1, 0, 480, 60, 100).unwrap();

        let bytes = midi.finalize().unwrap();
        let smf = Smf::parse(&bytes).unwrap();
        let programs: Vec<(u64, u8, u8)> = absolute_events(&smf, 0)
            .into_iter()
            .filter_map(|(tick, kind)| match kind {
                TrackEventKind::Midi {
                    channel,
                    message: MidiMessage::ProgramChange { program },
                } => Some((tick, channel.as_int(), program.as_int())),
                _ => None,
            })
            .collect();
        assert_eq!(programs, vec![(0, 1, 18), (0, 9, 0)]);

        // program changes come before the tempo event that shares tick 0
        assert!(matches!(
            smf.tracks[0][0].kind,
            TrackEventKind::Midi {
                message: MidiMessage::ProgramChange { .. },
                ..
            }
        ));
        assert!(absolute_events(&smf, 1).iter().all(|(_, kind)| !matches!(
            kind,
            TrackEventKind::Midi {
                message: MidiMessage::ProgramChange { .. },
                ..
            }
        )));
    }

    #[test]
    fn program_changes_without_tracks_emit_one_track() {
        let mut midi = MidiWriter::with_options(WriterOptions {
            program_changes: true,
            ..Default::default()
        })
        .unwrap();
        midi.set_channel(2, 24).unwrap();
        assert_eq!(midi.track_count(), 0);

        let bytes = midi.finalize().unwrap();
        assert_eq!(u16::from_be_bytes([bytes[10], bytes[11]]), 1);
        assert_eq!(&bytes[22..], &[0x00, 0xC2, 24, 0x00, 0xFF, 0x2F, 0x00]);
    }

    #[test]
    fn rejects_bad_resolution() {
        let err = MidiWriter::with_options(WriterOptions {
            ticks_per_quarter: 0,
            ..Default::default()
        })
        .unwrap_err();
        assert!(err.is_invalid_parameter());
    }
}
