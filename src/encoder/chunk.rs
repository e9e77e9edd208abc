use crate::encoder::Encode;
use crate::encoder::delta::encode_track_body;
use crate::error::{MidiError, Result};
use crate::model::event::Event;
use log::debug;

pub const HEADER_TAG: &[u8; 4] = b"MThd";
pub const TRACK_TAG: &[u8; 4] = b"MTrk";
pub const HEADER_LENGTH: u32 = 6;

/// Format 1: several tracks played simultaneously.
pub const FORMAT_MULTI_TRACK: u16 = 1;

/// Contents of the `MThd` chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub format: u16,
    pub tracks: u16,
    pub division: u16,
}

impl Header {
    pub fn multi_track(track_count: usize, ticks_per_quarter: u16) -> Result<Self> {
        let tracks = u16::try_from(track_count).map_err(|_| {
            MidiError::overflow("track count", track_count as u64, u16::MAX as u64)
        })?;

        Ok(Self {
            format: FORMAT_MULTI_TRACK,
            tracks,
            division: ticks_per_quarter,
        })
    }
}

impl Encode for Header {
    fn encode(&self, out: &mut Vec<u8>) -> Result<()> {
        out.extend_from_slice(HEADER_TAG);
        out.extend_from_slice(&HEADER_LENGTH.to_be_bytes());
        out.extend_from_slice(&self.format.to_be_bytes());
        out.extend_from_slice(&self.tracks.to_be_bytes());
        out.extend_from_slice(&self.division.to_be_bytes());
        Ok(())
    }
}

/// Write a length-prefixed chunk. `body` must be complete, its length is measured here.
pub fn write_chunk(out: &mut Vec<u8>, tag: &[u8; 4], body: &[u8]) -> Result<()> {
    let length = u32::try_from(body.len())
        .map_err(|_| MidiError::overflow("chunk length", body.len() as u64, u32::MAX as u64))?;

    out.reserve(8 + body.len());
    out.extend_from_slice(tag);
    out.extend_from_slice(&length.to_be_bytes());
    out.extend_from_slice(body);
    Ok(())
}

pub fn write_track_chunk(out: &mut Vec<u8>, events: &[Event]) -> Result<()> {
    let body = encode_track_body(events)?;
    write_chunk(out, TRACK_TAG, &body)
}

/// Serialize a whole format 1 file, tracks emitted in the order given.
pub fn write_smf<T: AsRef<[Event]>>(ticks_per_quarter: u16, tracks: &[T]) -> Result<Vec<u8>> {
    let header = Header::multi_track(tracks.len(), ticks_per_quarter)?;

    let mut out = header.to_bytes()?;
    for (index, track) in tracks.iter().enumerate() {
        let start = out.len();
        write_track_chunk(&mut out, track.as_ref())?;
        debug!(
            "Track {}: {} events -> {} bytes..!",
            index,
            track.as_ref().len(),
            out.len() - start
        );
    }

    Ok(out)
}
