use crate::encoder::Encode;
use crate::encoder::vlq::{MAX_VLQ, vlq_len, write_vlq};
use crate::error::{MidiError, Result};
use crate::model::event::{Event, MAX_CHANNEL, MAX_DATA_BYTE};
use log::trace;

const META: u8 = 0xFF;
const META_TEMPO: u8 = 0x51;
const META_END_OF_TRACK: u8 = 0x2F;

const NOTE_OFF: u8 = 0x80;
const NOTE_ON: u8 = 0x90;
const PROGRAM_CHANGE: u8 = 0xC0;

/// Largest tempo the 3-byte meta event can hold.
pub const MAX_TEMPO: u64 = 0xFF_FFFF;

pub const END_OF_TRACK: [u8; 3] = [META, META_END_OF_TRACK, 0x00];

/// One event of a track body: the ticks since the previous event and the event bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedEvent {
    pub delta: u32,
    pub body: Vec<u8>,
}

impl EncodedEvent {
    pub fn end_of_track() -> Self {
        Self {
            delta: 0,
            body: END_OF_TRACK.to_vec(),
        }
    }

    /// Encoded size including the delta-time prefix.
    pub fn encoded_len(&self) -> usize {
        vlq_len(self.delta) + self.body.len()
    }
}

impl Encode for EncodedEvent {
    fn encode(&self, out: &mut Vec<u8>) -> Result<()> {
        write_vlq(out, self.delta)?;
        out.extend_from_slice(&self.body);
        Ok(())
    }
}

/// The event bytes alone, without a delta-time. Every channel event carries its own status byte.
impl Encode for Event {
    fn encode(&self, out: &mut Vec<u8>) -> Result<()> {
        match *self {
            Event::Tempo {
                microseconds_per_quarter,
                ..
            } => {
                if microseconds_per_quarter > MAX_TEMPO {
                    return Err(MidiError::overflow(
                        "tempo (microseconds per quarter note)",
                        microseconds_per_quarter,
                        MAX_TEMPO,
                    ));
                }
                let [_, hi, mid, lo] = (microseconds_per_quarter as u32).to_be_bytes();
                out.extend_from_slice(&[META, META_TEMPO, 0x03, hi, mid, lo]);
            }
            Event::NoteOn {
                channel,
                pitch,
                velocity,
                ..
            } => out.extend_from_slice(&[
                NOTE_ON | status_channel(channel)?,
                data_byte("pitch", pitch)?,
                data_byte("velocity", velocity)?,
            ]),
            Event::NoteOff { channel, pitch, .. } => out.extend_from_slice(&[
                NOTE_OFF | status_channel(channel)?,
                data_byte("pitch", pitch)?,
                0x00,
            ]),
            Event::ProgramChange {
                channel, program, ..
            } => out.extend_from_slice(&[
                PROGRAM_CHANGE | status_channel(channel)?,
                data_byte("program", program)?,
            ]),
        }
        Ok(())
    }
}

/// The low nibble of a status byte.
fn status_channel(channel: u8) -> Result<u8> {
    if channel > MAX_CHANNEL {
        return Err(MidiError::overflow(
            "channel",
            channel as u64,
            MAX_CHANNEL as u64,
        ));
    }
    Ok(channel)
}

/// Data bytes must keep the high bit clear.
fn data_byte(field: &'static str, value: u8) -> Result<u8> {
    if value > MAX_DATA_BYTE {
        return Err(MidiError::overflow(field, value as u64, MAX_DATA_BYTE as u64));
    }
    Ok(value)
}

/// Order a track's events by tick and convert them to delta-times.
///
/// The sort is stable so events sharing a tick keep their insertion order.
/// The returned sequence always ends with the end-of-track marker at delta 0.
pub fn encode_events(events: &[Event]) -> Result<Vec<EncodedEvent>> {
    let mut sorted: Vec<&Event> = events.iter().collect();
    sorted.sort_by_key(|event| event.tick());

    let mut encoded = Vec::with_capacity(sorted.len() + 1);
    let mut previous_tick: u64 = 0;
    for event in sorted {
        let tick = event.tick();
        let delta = tick - previous_tick;
        previous_tick = tick;

        let delta = u32::try_from(delta)
            .ok()
            .filter(|d| *d <= MAX_VLQ)
            .ok_or(MidiError::overflow("delta time", delta, MAX_VLQ as u64))?;

        trace!("tick {} (+{}): {:?}", tick, delta, event);
        encoded.push(EncodedEvent {
            delta,
            body: event.to_bytes()?,
        });
    }

    encoded.push(EncodedEvent::end_of_track());
    Ok(encoded)
}

/// The complete body of a track chunk.
pub fn encode_track_body(events: &[Event]) -> Result<Vec<u8>> {
    let encoded = encode_events(events)?;

    let mut body = Vec::with_capacity(encoded.iter().map(EncodedEvent::encoded_len).sum());
    for event in &encoded {
        event.encode(&mut body)?;
    }
    Ok(body)
}
