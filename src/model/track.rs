use crate::error::Result;
use crate::model::event::{Event, MAX_CHANNEL, check_channel, check_data_byte};
use log::debug;

pub const DEFAULT_PROGRAM: u8 = 0;

/// Events of a single track, kept in insertion order until encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    index: usize,
    events: Vec<Event>,
}

impl Track {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            events: Vec::new(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn note_count(&self) -> usize {
        self.events.iter().filter(|e| e.is_note()).count() / 2
    }

    pub(crate) fn add_event(&mut self, event: Event) {
        self.events.push(event);
    }

    pub(crate) fn extend(&mut self, events: impl IntoIterator<Item = Event>) {
        self.events.extend(events);
    }
}

/// Program assignment for each of the 16 channels, shared by every track of a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelTable {
    programs: [Option<u8>; MAX_CHANNEL as usize + 1],
}

impl ChannelTable {
    /// Last write wins.
    pub fn set(&mut self, channel: u8, program: u8) -> Result<()> {
        let channel = check_channel(channel)?;
        let program = check_data_byte("program", program)?;

        if let Some(previous) = self.programs[channel as usize].replace(program)
            && previous != program
        {
            debug!(
                "Channel {} program reassigned from {} to {}..!",
                channel, previous, program
            );
        }

        Ok(())
    }

    /// The program for `channel`, or [`DEFAULT_PROGRAM`] when it was never assigned.
    pub fn program(&self, channel: u8) -> u8 {
        self.programs
            .get(channel as usize)
            .copied()
            .flatten()
            .unwrap_or(DEFAULT_PROGRAM)
    }

    /// Explicitly assigned `(channel, program)` pairs in ascending channel order.
    pub fn assigned(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        self.programs
            .iter()
            .enumerate()
            .filter_map(|(ch, program)| program.map(|p| (ch as u8, p)))
    }

    pub fn is_empty(&self) -> bool {
        self.programs.iter().all(Option::is_none)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn track_keeps_insertion_order() {
        let mut track = Track::new(2);
        let [on, off] = Event::note(0, 480, 480, 60, 100).unwrap();
        let tempo = Event::tempo(0, 90.0).unwrap();

        track.add_event(on);
        track.add_event(off);
        track.add_event(tempo);

        assert_eq!(track.index(), 2);
        assert_eq!(track.events(), &[on, off, tempo]);
        assert_eq!(track.note_count(), 1);
    }

    #[test]
    fn channel_table_defaults_to_program_zero() {
        let table = ChannelTable::default();
        for ch in 0..=MAX_CHANNEL {
            assert_eq!(table.program(ch), DEFAULT_PROGRAM);
        }
        assert!(table.is_empty());
    }

    #[test]
    fn channel_table_last_write_wins() {
        env_logger::try_init().unwrap_or(());

        let mut table = ChannelTable::default();
        table.set(9, 13).unwrap();
        table.set(9, 13).unwrap();
        assert_eq!(table.program(9), 13);

        table.set(9, 40).unwrap();
        assert_eq!(table.program(9), 40);

        table.set(2, 5).unwrap();
        assert_eq!(table.assigned().collect::<Vec<_>>(), vec![(2, 5), (9, 40)]);
    }

    #[test]
    fn channel_table_rejects_out_of_range() {
        let mut table = ChannelTable::default();
        assert!(table.set(16, 0).unwrap_err().is_invalid_parameter());
        assert!(table.set(0, 128).unwrap_err().is_invalid_parameter());
        assert!(table.is_empty());
    }
}
