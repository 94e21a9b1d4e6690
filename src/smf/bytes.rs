//! Big-endian integer reads and variable length quantities over an in-memory byte slice

use super::error::{MidiError, MidiResult};

/// Most bytes a variable length quantity may span
pub const MAX_VLQ_BYTES: usize = 4;

/// Read-only cursor over the raw bytes of a MIDI file
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    /// The whole source
    data: &'a [u8],
    /// Offset of the next byte to be read
    position: usize,
}

impl<'a> ByteCursor<'a> {
    /// Creates a cursor at the start of `data`
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Offset of the next unread byte
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of unread bytes
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// True once every byte has been read
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Moves the cursor to an absolute offset, which may be at most the end of the data
    pub fn seek(&mut self, position: usize) -> MidiResult<()> {
        if position > self.data.len() {
            return Err(MidiError::OutOfBounds {
                position: self.position,
                needed: position - self.position,
                remaining: self.remaining(),
            });
        }

        self.position = position;
        Ok(())
    }

    /// Fails unless at least `needed` bytes are left
    fn ensure(&self, needed: usize) -> MidiResult<()> {
        if self.remaining() < needed {
            Err(MidiError::OutOfBounds {
                position: self.position,
                needed,
                remaining: self.remaining(),
            })
        } else {
            Ok(())
        }
    }

    /// Returns the next byte without advancing
    pub fn peek_u8(&self) -> MidiResult<u8> {
        self.ensure(1)?;
        Ok(self.data[self.position])
    }

    /// Reads a single byte
    pub fn read_u8(&mut self) -> MidiResult<u8> {
        let byte = self.peek_u8()?;
        self.position += 1;
        Ok(byte)
    }

    /// Reads the next `n` bytes as a borrowed slice
    pub fn read_bytes(&mut self, n: usize) -> MidiResult<&'a [u8]> {
        self.ensure(n)?;
        let bytes = &self.data[self.position..self.position + n];
        self.position += n;
        Ok(bytes)
    }

    /// Reads a fixed size array
    fn read_array<const N: usize>(&mut self) -> MidiResult<[u8; N]> {
        let mut array = [0u8; N];
        array.copy_from_slice(self.read_bytes(N)?);
        Ok(array)
    }

    /// Reads a big-endian `u16`
    pub fn read_u16_be(&mut self) -> MidiResult<u16> {
        Ok(u16::from_be_bytes(self.read_array()?))
    }

    /// Reads a big-endian 24 bit unsigned integer
    pub fn read_u24_be(&mut self) -> MidiResult<u32> {
        let [a, b, c] = self.read_array()?;
        Ok(u32::from_be_bytes([0, a, b, c]))
    }

    /// Reads a big-endian `u32`
    pub fn read_u32_be(&mut self) -> MidiResult<u32> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    /// Reads a MIDI variable length quantity.
    ///
    /// Every byte contributes its low 7 bits, most significant group first, and a set high
    /// bit means another byte follows. At most 4 bytes are read, so the value never exceeds
    /// 28 bits; a 4th byte that still asks for more is rejected.
    pub fn read_vlq(&mut self) -> MidiResult<u32> {
        let start = self.position;
        let mut value: u32 = 0;

        for _ in 0..MAX_VLQ_BYTES {
            let byte = self.read_u8()?;
            value = (value << 7) | (byte & 0x7F) as u32;

            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }

        Err(MidiError::VlqOverrun { position: start })
    }

    /// Checks whether the next bytes equal `magic`, consuming them only on a match.
    ///
    /// Fails with [`MidiError::OutOfBounds`] when fewer than `magic.len()` bytes remain.
    pub fn expect_magic(&mut self, magic: &[u8]) -> MidiResult<bool> {
        self.ensure(magic.len())?;

        let end = self.position + magic.len();
        if &self.data[self.position..end] == magic {
            self.position = end;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

/// Decodes a variable length quantity from the start of `bytes`, returning the value and how
/// many bytes it spanned
pub fn decode_vlq(bytes: &[u8]) -> MidiResult<(u32, usize)> {
    let mut cursor = ByteCursor::new(bytes);
    let value = cursor.read_vlq()?;
    Ok((value, cursor.position()))
}

/// Goes backwards from a value to its variable length encoding
#[cfg(test)]
pub(crate) fn encode_vlq(mut value: u32) -> Vec<u8> {
    let mut bytes = Vec::new();

    loop {
        let mut byte = (value & 0x7F) as u8;
        value >>= 7;

        if !bytes.is_empty() {
            byte |= 0x80;
        }

        bytes.push(byte);

        if value == 0 {
            break;
        }
    }

    bytes.reverse();
    bytes
}
