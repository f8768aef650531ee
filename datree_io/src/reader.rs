//! Cursor over a byte slice with the primitive reads the header format needs.
//! Every read returns `None` on truncation instead of failing; header probing
//! must stay silent on unrelated files.

/// Forward-only reader over a borrowed buffer.
#[derive(Debug)]
pub struct ByteReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Fill `out` from the current position. A fill that would consume the
    /// buffer exactly to its end is treated as truncated.
    pub fn read_into(&mut self, out: &mut [u8]) -> Option<()> {
        if self.pos + out.len() >= self.buf.len() {
            return None;
        }
        out.copy_from_slice(&self.buf[self.pos..self.pos + out.len()]);
        self.pos += out.len();
        Some(())
    }

    pub fn next_u8(&mut self) -> Option<u8> {
        if self.pos >= self.buf.len() {
            return None;
        }
        let byte = self.buf[self.pos];
        self.pos += 1;
        Some(byte)
    }

    /// Little-endian 32-bit signed read. Shares the end-of-buffer boundary
    /// with [`read_into`]: the last four bytes of a buffer are not readable.
    pub fn next_i32(&mut self) -> Option<i32> {
        if self.pos + 4 >= self.buf.len() {
            return None;
        }
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&self.buf[self.pos..self.pos + 4]);
        self.pos += 4;
        Some(i32::from_le_bytes(bytes))
    }

    /// 7-bit varint: low seven bits per byte, high bit flags continuation,
    /// least-significant group first. Stops at the first byte with the high
    /// bit clear; more than five groups cannot fit a u32 and read as `None`.
    pub fn next_7bit_encoded_uint(&mut self) -> Option<u32> {
        let mut num: u32 = 0;
        let mut shift = 0;
        loop {
            let byte = self.next_u8()?;
            if shift > 28 {
                return None;
            }
            num |= ((byte & 0x7f) as u32) << shift;
            if byte & 0x80 == 0 {
                return Some(num);
            }
            shift += 7;
        }
    }

    /// Everything after the current position.
    pub fn remaining(&self) -> &'a [u8] {
        &self.buf[self.pos..]
    }

    pub fn position(&self) -> usize {
        self.pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_u8_reads_to_the_last_byte() {
        let mut reader = ByteReader::new(&[1, 2]);
        assert_eq!(reader.next_u8(), Some(1));
        assert_eq!(reader.next_u8(), Some(2));
        assert_eq!(reader.next_u8(), None);
    }

    #[test]
    fn read_into_rejects_exact_tail_fill() {
        // Boundary pin: filling [0..4) of a 4-byte buffer is refused, while a
        // 5-byte buffer serves the same read.
        let mut reader = ByteReader::new(&[1, 2, 3, 4]);
        let mut out = [0u8; 4];
        assert_eq!(reader.read_into(&mut out), None);

        let mut reader = ByteReader::new(&[1, 2, 3, 4, 5]);
        assert_eq!(reader.read_into(&mut out), Some(()));
        assert_eq!(out, [1, 2, 3, 4]);
        assert_eq!(reader.remaining(), &[5]);
    }

    #[test]
    fn next_i32_rejects_exact_tail_read() {
        let exact = 0x01020304_i32.to_le_bytes();
        let mut reader = ByteReader::new(&exact);
        assert_eq!(reader.next_i32(), None);

        let mut bytes = 0x01020304_i32.to_le_bytes().to_vec();
        bytes.push(0xff);
        let mut reader = ByteReader::new(&bytes);
        assert_eq!(reader.next_i32(), Some(0x01020304));
    }

    #[test]
    fn varint_single_and_multi_byte() {
        let mut reader = ByteReader::new(&[0x00]);
        assert_eq!(reader.next_7bit_encoded_uint(), Some(0));

        let mut reader = ByteReader::new(&[0x7f]);
        assert_eq!(reader.next_7bit_encoded_uint(), Some(127));

        let mut reader = ByteReader::new(&[0x80, 0x01]);
        assert_eq!(reader.next_7bit_encoded_uint(), Some(128));

        let mut reader = ByteReader::new(&[0xff, 0xff, 0xff, 0xff, 0x0f]);
        assert_eq!(reader.next_7bit_encoded_uint(), Some(u32::MAX));
    }

    #[test]
    fn varint_truncated_is_none() {
        let mut reader = ByteReader::new(&[0x80]);
        assert_eq!(reader.next_7bit_encoded_uint(), None);
    }

    #[test]
    fn varint_overlong_is_none() {
        let mut reader = ByteReader::new(&[0x80, 0x80, 0x80, 0x80, 0x80, 0x01]);
        assert_eq!(reader.next_7bit_encoded_uint(), None);
    }
}
