use crate::error::{MidiError, Result};
use crate::model::event::Event;
use crate::model::track::{ChannelTable, Track};
use log::debug;

pub const DEFAULT_TICKS_PER_QUARTER: u16 = 480;

/// Largest division expressible as metrical timing; the high bit selects SMPTE.
pub const MAX_TICKS_PER_QUARTER: u16 = 0x7FFF;

/// The header stores the track count in 16 bits.
pub const MAX_TRACKS: usize = u16::MAX as usize;

/// Everything that ends up in the file: tracks, the shared channel table and the resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    ticks_per_quarter: u16,
    channels: ChannelTable,
    tracks: Vec<Track>,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            ticks_per_quarter: DEFAULT_TICKS_PER_QUARTER,
            channels: ChannelTable::default(),
            tracks: Vec::new(),
        }
    }
}

impl Document {
    pub fn new(ticks_per_quarter: u16) -> Result<Self> {
        if ticks_per_quarter == 0 || ticks_per_quarter > MAX_TICKS_PER_QUARTER {
            return Err(MidiError::invalid(
                "ticks_per_quarter",
                ticks_per_quarter,
                "a value in [1, 32767]",
            ));
        }

        Ok(Self {
            ticks_per_quarter,
            ..Default::default()
        })
    }

    pub fn ticks_per_quarter(&self) -> u16 {
        self.ticks_per_quarter
    }

    pub fn channels(&self) -> &ChannelTable {
        &self.channels
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn track(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn add_track(&mut self) -> usize {
        let index = self.tracks.len();
        self.tracks.push(Track::new(index));
        index
    }

    /// Allocate every track up to and including `index`. Never shrinks.
    pub fn ensure_track(&mut self, index: usize) -> Result<&mut Track> {
        if index >= MAX_TRACKS {
            return Err(MidiError::invalid("track", index, "a track index below 65535"));
        }

        if index >= self.tracks.len() {
            debug!(
                "Implicitly allocating tracks {}..={}..!",
                self.tracks.len(),
                index
            );
            while index >= self.tracks.len() {
                self.add_track();
            }
        }

        Ok(&mut self.tracks[index])
    }

    pub fn set_channel(&mut self, channel: u8, program: u8) -> Result<()> {
        self.channels.set(channel, program)
    }

    /// Append `event` to `track`. Out-of-range events are rejected before any track is allocated.
    pub fn add_event(&mut self, track: usize, event: Event) -> Result<()> {
        event.validate()?;
        self.ensure_track(track)?.add_event(event);
        Ok(())
    }

    /// Append several events to one track at once. Either all of them are added or none.
    pub fn add_events(&mut self, track: usize, events: impl IntoIterator<Item = Event>) -> Result<()> {
        let events = events.into_iter().collect::<Vec<_>>();
        for event in &events {
            event.validate()?;
        }

        self.ensure_track(track)?.extend(events);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn rejects_unusable_division() {
        assert!(Document::new(0).unwrap_err().is_invalid_parameter());
        assert!(Document::new(0x8000).unwrap_err().is_invalid_parameter());
        assert_eq!(Document::new(96).unwrap().ticks_per_quarter(), 96);
        assert_eq!(Document::default().ticks_per_quarter(), 480);
    }

    #[test]
    fn add_track_indices_increase_from_zero() {
        let mut doc = Document::default();
        assert_eq!(doc.add_track(), 0);
        assert_eq!(doc.add_track(), 1);
        assert_eq!(doc.add_track(), 2);
        assert_eq!(doc.tracks().len(), 3);
    }

    #[test]
    fn ensure_track_fills_gaps_with_empty_tracks() {
        env_logger::try_init().unwrap_or(());

        let mut doc = Document::default();
        let tempo = Event::tempo(0, 120.0).unwrap();
        doc.add_event(4, tempo).unwrap();

        assert_eq!(doc.tracks().len(), 5);
        for (i, track) in doc.tracks().iter().enumerate() {
            assert_eq!(track.index(), i);
        }
        assert!(doc.tracks()[..4].iter().all(Track::is_empty));
        assert_eq!(doc.track(4).unwrap().events(), &[tempo]);

        // never shrinks
        doc.ensure_track(1).unwrap();
        assert_eq!(doc.tracks().len(), 5);
    }

    #[test]
    fn ensure_track_rejects_index_beyond_header_limit() {
        let mut doc = Document::default();
        let err = doc.ensure_track(MAX_TRACKS).unwrap_err();
        assert!(err.is_invalid_parameter());
        assert!(doc.tracks().is_empty());
    }

    #[test]
    fn hand_built_events_are_range_checked() {
        let mut doc = Document::default();

        let loud = Event::NoteOn {
            tick: 0,
            channel: 0x4F,
            pitch: 200,
            velocity: 255,
        };
        assert!(doc.add_event(0, loud).unwrap_err().is_invalid_parameter());
        assert!(doc.tracks().is_empty());

        let good = Event::NoteOff {
            tick: 0,
            channel: 1,
            pitch: 60,
        };
        let bad = Event::ProgramChange {
            tick: 0,
            channel: 1,
            program: 128,
        };
        assert!(doc.add_events(2, [good, bad]).unwrap_err().is_invalid_parameter());
        assert!(doc.tracks().is_empty());

        doc.add_events(2, [good]).unwrap();
        assert_eq!(doc.track(2).unwrap().events(), &[good]);
    }
}
