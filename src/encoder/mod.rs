use crate::error::Result;

pub mod chunk;
pub mod delta;
pub mod vlq;

/// Anything that can be serialized into Standard MIDI File bytes.
pub trait Encode {
    /// Append the encoded form of `self` to `out`.
    ///
    /// On error `out` may hold a partial encoding; callers discard the buffer.
    fn encode(&self, out: &mut Vec<u8>) -> Result<()>;

    fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.encode(&mut out)?;
        Ok(out)
    }
}
