//! Primitive reads and writes of the ROS1 wire format.
//!
//! Everything is little-endian with no padding. Errors carry the field path
//! given by the caller and the byte offset where the failing item starts.

use bytes::{Buf, BufMut, BytesMut};
use msgc_core::CodecError;

/// Cursor over an encoded message.
#[derive(Debug, Clone)]
pub struct WireReader<'a> {
    buf: &'a [u8],
    initial_len: usize,
}

macro_rules! read_le {
    ($($name:ident => $ty:ty, $get:ident;)*) => {
        $(
            pub fn $name(&mut self, path: &str) -> Result<$ty, CodecError> {
                let offset = self.offset();
                self.buf
                    .$get()
                    .map_err(|_| eof(path, offset, size_of::<$ty>()))
            }
        )*
    };
}

impl<'a> WireReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            initial_len: buf.len(),
        }
    }

    pub fn offset(&self) -> usize {
        self.initial_len - self.buf.remaining()
    }

    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    /// Fails if any bytes are left over.
    pub fn finish(self, path: &str) -> Result<(), CodecError> {
        if self.buf.is_empty() {
            return Ok(());
        }
        Err(CodecError::Decode {
            field: path.to_string(),
            offset: self.offset(),
            detail: format!("{} trailing bytes after message", self.buf.len()),
        })
    }

    read_le! {
        read_i8 => i8, try_get_i8;
        read_u8 => u8, try_get_u8;
        read_i16 => i16, try_get_i16_le;
        read_u16 => u16, try_get_u16_le;
        read_i32 => i32, try_get_i32_le;
        read_u32 => u32, try_get_u32_le;
        read_i64 => i64, try_get_i64_le;
        read_u64 => u64, try_get_u64_le;
        read_f32 => f32, try_get_f32_le;
        read_f64 => f64, try_get_f64_le;
    }

    pub fn read_bool(&mut self, path: &str) -> Result<bool, CodecError> {
        Ok(self.read_u8(path)? != 0)
    }

    /// `time`: seconds and nanoseconds, both unsigned.
    pub fn read_time(&mut self, path: &str) -> Result<(u32, u32), CodecError> {
        Ok((self.read_u32(path)?, self.read_u32(path)?))
    }

    /// `duration`: seconds and nanoseconds, both signed.
    pub fn read_duration(&mut self, path: &str) -> Result<(i32, i32), CodecError> {
        Ok((self.read_i32(path)?, self.read_i32(path)?))
    }

    /// A u32 count prefix. Fails, before anything is allocated, when
    /// `count * min_element_size` exceeds the remaining bytes. Elements that
    /// encode to zero bytes are capped at the length of the whole input.
    pub fn read_len(&mut self, path: &str, min_element_size: usize) -> Result<usize, CodecError> {
        let offset = self.offset();
        let len = self.read_u32(path)? as usize;
        let detail = if min_element_size == 0 {
            (len > self.initial_len).then(|| {
                format!(
                    "length prefix {len} of zero-sized elements exceeds the {}-byte input",
                    self.initial_len
                )
            })
        } else {
            (len.saturating_mul(min_element_size) > self.remaining()).then(|| {
                format!(
                    "length prefix {len} exceeds the {} remaining bytes",
                    self.remaining()
                )
            })
        };
        match detail {
            Some(detail) => Err(CodecError::Decode {
                field: path.to_string(),
                offset,
                detail,
            }),
            None => Ok(len),
        }
    }

    pub fn read_bytes(&mut self, path: &str, len: usize) -> Result<&'a [u8], CodecError> {
        if len > self.buf.len() {
            return Err(eof(path, self.offset(), len));
        }
        let (head, tail) = self.buf.split_at(len);
        self.buf = tail;
        Ok(head)
    }

    /// A u32 byte length followed by UTF-8 bytes.
    pub fn read_string(&mut self, path: &str) -> Result<String, CodecError> {
        let len = self.read_len(path, 1)?;
        let offset = self.offset();
        let bytes = self.read_bytes(path, len)?;
        String::from_utf8(bytes.to_vec()).map_err(|e| CodecError::Decode {
            field: path.to_string(),
            offset,
            detail: format!("invalid UTF-8 in string: {e}"),
        })
    }

    /// A length-prefixed sequence, each element decoded by `read_one` with
    /// the indexed path `path[i]`.
    pub fn read_seq<T>(
        &mut self,
        path: &str,
        min_element_size: usize,
        mut read_one: impl FnMut(&mut Self, &str) -> Result<T, CodecError>,
    ) -> Result<Vec<T>, CodecError> {
        let len = self.read_len(path, min_element_size)?;
        self.read_fixed(path, len, &mut read_one)
    }

    /// Exactly `len` elements with no prefix.
    pub fn read_fixed<T>(
        &mut self,
        path: &str,
        len: usize,
        mut read_one: impl FnMut(&mut Self, &str) -> Result<T, CodecError>,
    ) -> Result<Vec<T>, CodecError> {
        let mut out = Vec::with_capacity(len.min(self.remaining()));
        for i in 0..len {
            out.push(read_one(self, &format!("{path}[{i}]"))?);
        }
        Ok(out)
    }
}

fn eof(path: &str, offset: usize, wanted: usize) -> CodecError {
    CodecError::Decode {
        field: path.to_string(),
        offset,
        detail: format!("unexpected end of buffer, needed {wanted} bytes"),
    }
}

/// Growable output buffer for an encoded message.
#[derive(Debug, Clone, Default)]
pub struct WireWriter {
    buf: BytesMut,
}

macro_rules! put_le {
    ($($name:ident => $ty:ty, $put:ident;)*) => {
        $(
            pub fn $name(&mut self, v: $ty) {
                self.buf.$put(v);
            }
        )*
    };
}

impl WireWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    put_le! {
        put_i8 => i8, put_i8;
        put_u8 => u8, put_u8;
        put_i16 => i16, put_i16_le;
        put_u16 => u16, put_u16_le;
        put_i32 => i32, put_i32_le;
        put_u32 => u32, put_u32_le;
        put_i64 => i64, put_i64_le;
        put_u64 => u64, put_u64_le;
        put_f32 => f32, put_f32_le;
        put_f64 => f64, put_f64_le;
    }

    pub fn put_bool(&mut self, v: bool) {
        self.buf.put_u8(u8::from(v));
    }

    pub fn put_time(&mut self, secs: u32, nsecs: u32) {
        self.put_u32(secs);
        self.put_u32(nsecs);
    }

    pub fn put_duration(&mut self, secs: i32, nsecs: i32) {
        self.put_i32(secs);
        self.put_i32(nsecs);
    }

    /// A u32 count prefix. Fails when `len` does not fit.
    pub fn put_len(&mut self, path: &str, len: usize) -> Result<(), CodecError> {
        let len = u32::try_from(len).map_err(|_| CodecError::Encoding {
            field: path.to_string(),
            offset: self.len(),
            detail: format!("length {len} does not fit a u32 prefix"),
        })?;
        self.put_u32(len);
        Ok(())
    }

    pub fn put_bytes(&mut self, bytes: &[u8]) {
        self.buf.put_slice(bytes);
    }

    pub fn put_string(&mut self, path: &str, s: &str) -> Result<(), CodecError> {
        self.put_len(path, s.len())?;
        self.put_bytes(s.as_bytes());
        Ok(())
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.buf.to_vec()
    }
}
