use crate::error::{MidiError, Result};

/// Largest value a 4-byte variable-length quantity can carry.
pub const MAX_VLQ: u32 = 0x0FFF_FFFF;

/// Write `value` as a MIDI variable-length quantity.
///
/// Big-endian base 128, every byte but the last has its high bit set. The
/// shortest encoding is always used, so 0 is a single `0x00` byte.
pub fn write_vlq(out: &mut Vec<u8>, value: u32) -> Result<()> {
    if value > MAX_VLQ {
        return Err(MidiError::overflow("delta time", value as u64, MAX_VLQ as u64));
    }

    let mut value = value;
    let mut bytes = [0u8; 4];
    let mut i = 3;
    bytes[i] = (value & 0x7F) as u8;
    value >>= 7;
    while value > 0 {
        i -= 1;
        bytes[i] = ((value & 0x7F) | 0x80) as u8;
        value >>= 7;
    }

    out.extend_from_slice(&bytes[i..]);
    Ok(())
}

/// Number of bytes `value` occupies once encoded.
pub const fn vlq_len(value: u32) -> usize {
    match value {
        0..=0x7F => 1,
        0x80..=0x3FFF => 2,
        0x4000..=0x1F_FFFF => 3,
        _ => 4,
    }
}

#[cfg(test)]
pub(crate) fn read_vlq(bytes: &[u8]) -> Option<(u32, usize)> {
    let mut value = 0u32;
    for (i, byte) in bytes.iter().take(4).enumerate() {
        value = (value << 7) | (byte & 0x7F) as u32;
        if byte & 0x80 == 0 {
            return Some((value, i + 1));
        }
    }
    None
}
