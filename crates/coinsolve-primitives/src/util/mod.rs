//! Binary helpers for the transaction wire format.
//!
//! `VarInt` is the compact-size integer used for counts and lengths,
//! `ByteReader` walks a borrowed buffer, and `ByteWriter` accumulates an
//! owned one. All multi-byte integers are little-endian.

use crate::PrimitivesError;

// ---------------------------------------------------------------------------
// VarInt
// ---------------------------------------------------------------------------

/// A compact-size integer as it appears in transactions and scripts.
///
/// Values below 0xfd take one byte; larger values are prefixed with
/// 0xfd, 0xfe or 0xff followed by 2, 4 or 8 little-endian bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarInt(pub u64);

impl VarInt {
    /// Decode a VarInt from the front of a byte slice.
    ///
    /// # Arguments
    /// * `data` - Bytes beginning with a compact-size encoding.
    ///
    /// # Returns
    /// The value and the number of bytes consumed, or `UnexpectedEof`
    /// when the slice is shorter than the prefix announces.
    pub fn from_bytes(data: &[u8]) -> Result<(Self, usize), PrimitivesError> {
        let mut reader = ByteReader::new(data);
        let value = reader.read_varint()?;
        Ok((value, data.len() - reader.remaining()))
    }

    /// Encoded size in bytes: 1, 3, 5 or 9.
    pub fn length(&self) -> usize {
        match self.0 {
            0..=0xfc => 1,
            0xfd..=0xffff => 3,
            0x1_0000..=0xffff_ffff => 5,
            _ => 9,
        }
    }

    /// Encode into a fresh byte vector.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.length());
        match self.length() {
            1 => out.push(self.0 as u8),
            3 => {
                out.push(0xfd);
                out.extend_from_slice(&(self.0 as u16).to_le_bytes());
            }
            5 => {
                out.push(0xfe);
                out.extend_from_slice(&(self.0 as u32).to_le_bytes());
            }
            _ => {
                out.push(0xff);
                out.extend_from_slice(&self.0.to_le_bytes());
            }
        }
        out
    }

    /// The wrapped integer.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl From<u64> for VarInt {
    fn from(v: u64) -> Self {
        VarInt(v)
    }
}

impl From<usize> for VarInt {
    fn from(v: usize) -> Self {
        VarInt(v as u64)
    }
}

// ---------------------------------------------------------------------------
// ByteReader
// ---------------------------------------------------------------------------

/// Cursor over a borrowed byte slice.
///
/// Every read either returns exactly the requested bytes and advances, or
/// fails with `UnexpectedEof` and leaves the position unchanged.
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    /// Create a reader positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        ByteReader { data, pos: 0 }
    }

    /// Read `n` bytes and advance.
    ///
    /// # Arguments
    /// * `n` - Number of bytes to take.
    ///
    /// # Returns
    /// A sub-slice of the underlying buffer, or `UnexpectedEof`.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], PrimitivesError> {
        let end = self.pos.checked_add(n).ok_or(PrimitivesError::UnexpectedEof)?;
        let slice = self
            .data
            .get(self.pos..end)
            .ok_or(PrimitivesError::UnexpectedEof)?;
        self.pos = end;
        Ok(slice)
    }

    /// Read a fixed-size array and advance.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], PrimitivesError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    /// Read one byte.
    pub fn read_u8(&mut self) -> Result<u8, PrimitivesError> {
        Ok(self.read_array::<1>()?[0])
    }

    /// Read a little-endian `u16`.
    pub fn read_u16_le(&mut self) -> Result<u16, PrimitivesError> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    /// Read a little-endian `u32`.
    pub fn read_u32_le(&mut self) -> Result<u32, PrimitivesError> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    /// Read a little-endian `u64`.
    pub fn read_u64_le(&mut self) -> Result<u64, PrimitivesError> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    /// Read a compact-size integer.
    ///
    /// # Returns
    /// The decoded `VarInt`, or `UnexpectedEof` if the prefix promises more
    /// bytes than remain.
    pub fn read_varint(&mut self) -> Result<VarInt, PrimitivesError> {
        let start = self.pos;
        let value = match self.read_u8()? {
            0xff => self.read_u64_le().map(VarInt),
            0xfe => self.read_u32_le().map(|v| VarInt(v as u64)),
            0xfd => self.read_u16_le().map(|v| VarInt(v as u64)),
            b => Ok(VarInt(b as u64)),
        };
        if value.is_err() {
            self.pos = start;
        }
        value
    }

    /// Read a compact-size length followed by that many bytes.
    pub fn read_var_bytes(&mut self) -> Result<&'a [u8], PrimitivesError> {
        let start = self.pos;
        let len = self.read_varint()?.value();
        let len = usize::try_from(len).map_err(|_| PrimitivesError::UnexpectedEof)?;
        let bytes = self.read_bytes(len);
        if bytes.is_err() {
            self.pos = start;
        }
        bytes
    }

    /// Number of unread bytes.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }
}

// ---------------------------------------------------------------------------
// ByteWriter
// ---------------------------------------------------------------------------

/// Growable little-endian output buffer.
#[derive(Debug, Default, Clone)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    /// An empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with room for `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        ByteWriter {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Append raw bytes.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Append one byte.
    pub fn write_u8(&mut self, val: u8) {
        self.buf.push(val);
    }

    /// Append a little-endian `u16`.
    pub fn write_u16_le(&mut self, val: u16) {
        self.buf.extend_from_slice(&val.to_le_bytes());
    }

    /// Append a little-endian `u32`.
    pub fn write_u32_le(&mut self, val: u32) {
        self.buf.extend_from_slice(&val.to_le_bytes());
    }

    /// Append a little-endian `u64`.
    pub fn write_u64_le(&mut self, val: u64) {
        self.buf.extend_from_slice(&val.to_le_bytes());
    }

    /// Append a VarInt in its shortest form.
    pub fn write_varint(&mut self, varint: VarInt) {
        self.buf.extend_from_slice(&varint.to_bytes());
    }

    /// Write a compact-size length prefix followed by `bytes`.
    pub fn write_var_bytes(&mut self, bytes: &[u8]) {
        self.write_varint(VarInt::from(bytes.len()));
        self.write_bytes(bytes);
    }

    /// Consume the writer and return its buffer.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Bytes written so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Number of bytes written.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- VarInt --

    /// Each size class encodes to the expected prefix and width.
    #[test]
    fn test_varint_encoding_boundaries() {
        let cases: Vec<(u64, Vec<u8>)> = vec![
            (0, vec![0x00]),
            (0xfc, vec![0xfc]),
            (0xfd, vec![0xfd, 0xfd, 0x00]),
            (0xffff, vec![0xfd, 0xff, 0xff]),
            (0x1_0000, vec![0xfe, 0x00, 0x00, 0x01, 0x00]),
            (0xffff_ffff, vec![0xfe, 0xff, 0xff, 0xff, 0xff]),
            (
                0x1_0000_0000,
                vec![0xff, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00],
            ),
        ];
        for (value, expected) in cases {
            let vi = VarInt(value);
            assert_eq!(vi.to_bytes(), expected, "encoding of {}", value);
            assert_eq!(vi.length(), expected.len(), "length of {}", value);
        }
    }

    /// Decoding reports the consumed width.
    #[test]
    fn test_varint_from_bytes() {
        assert_eq!(VarInt::from_bytes(&[0x05, 0xaa]).unwrap(), (VarInt(5), 1));
        assert_eq!(
            VarInt::from_bytes(&[0xfd, 0x00, 0x01]).unwrap(),
            (VarInt(256), 3)
        );
        assert_eq!(
            VarInt::from_bytes(&[0xfe, 0x00, 0x00, 0x01, 0x00]).unwrap(),
            (VarInt(65536), 5)
        );
    }

    /// A truncated prefix is an error rather than a panic.
    #[test]
    fn test_varint_truncated() {
        assert!(VarInt::from_bytes(&[]).is_err());
        assert!(VarInt::from_bytes(&[0xfd, 0x01]).is_err());
        assert!(VarInt::from_bytes(&[0xff, 0, 0, 0]).is_err());
    }

    // -- ByteReader / ByteWriter --

    /// Values written by the writer are read back in order.
    #[test]
    fn test_reader_writer_sequence() {
        let mut writer = ByteWriter::new();
        writer.write_u8(0x42);
        writer.write_u16_le(0x1234);
        writer.write_u32_le(0xDEADBEEF);
        writer.write_u64_le(0x0102030405060708);
        writer.write_var_bytes(b"hello");

        let data = writer.into_bytes();
        let mut reader = ByteReader::new(&data);
        assert_eq!(reader.read_u8().unwrap(), 0x42);
        assert_eq!(reader.read_u16_le().unwrap(), 0x1234);
        assert_eq!(reader.read_u32_le().unwrap(), 0xDEADBEEF);
        assert_eq!(reader.read_u64_le().unwrap(), 0x0102030405060708);
        assert_eq!(reader.read_var_bytes().unwrap(), b"hello");
        assert_eq!(reader.remaining(), 0);
    }

    /// A failed read does not move the cursor.
    #[test]
    fn test_reader_eof_keeps_position() {
        let data = [0x03, 0xaa];
        let mut reader = ByteReader::new(&data);
        assert!(reader.read_var_bytes().is_err());
        assert_eq!(reader.remaining(), 2);
        assert!(reader.read_u32_le().is_err());
        assert_eq!(reader.read_u8().unwrap(), 0x03);
    }
}
