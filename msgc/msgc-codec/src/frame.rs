//! TCPROS message framing: a u32 length prefix before each serialized message.

use msgc_core::CodecError;

use crate::wire::{WireReader, WireWriter};

const FRAME: &str = "frame";

/// Prefix `payload` with its length.
pub fn frame(payload: &[u8]) -> Result<Vec<u8>, CodecError> {
    let mut w = WireWriter::with_capacity(payload.len() + 4);
    w.put_len(FRAME, payload.len())?;
    w.put_bytes(payload);
    Ok(w.into_vec())
}

/// Split the first frame off `buf`, returning its payload and the bytes after it.
pub fn unframe(buf: &[u8]) -> Result<(&[u8], &[u8]), CodecError> {
    let mut r = WireReader::new(buf);
    let len = r.read_len(FRAME, 1)?;
    let payload = r.read_bytes(FRAME, len)?;
    Ok((payload, &buf[4 + len..]))
}
