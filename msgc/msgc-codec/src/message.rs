//! Traits implemented by generated message and service bindings.

use msgc_core::CodecError;

use crate::wire::{WireReader, WireWriter};

/// A statically typed message with a compiled wire contract.
pub trait RosMessage: Sized {
    /// `package/Name`.
    const TYPE_NAME: &'static str;
    /// Lower-case hex md5sum.
    const MD5SUM: &'static str;
    /// Expanded definition text, as sent in connection headers.
    const DEFINITION: &'static str;

    /// Append the fields of `self` in wire order.
    fn encode_to(&self, w: &mut WireWriter, path: &str) -> Result<(), CodecError>;

    /// Read the fields in wire order.
    fn decode_from(r: &mut WireReader<'_>, path: &str) -> Result<Self, CodecError>;

    fn encode(&self) -> Result<Vec<u8>, CodecError> {
        let mut w = WireWriter::new();
        self.encode_to(&mut w, short_name(Self::TYPE_NAME))?;
        Ok(w.into_vec())
    }

    /// Decode one message; trailing bytes are an error.
    fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        let path = short_name(Self::TYPE_NAME);
        let mut r = WireReader::new(bytes);
        let msg = Self::decode_from(&mut r, path)?;
        r.finish(path)?;
        Ok(msg)
    }
}

/// A `.srv` binding: a request and a response message sharing one md5sum.
pub trait RosService {
    const SERVICE_NAME: &'static str;
    const MD5SUM: &'static str;

    type Request: RosMessage;
    type Response: RosMessage;
}

fn short_name(type_name: &str) -> &str {
    type_name.rsplit('/').next().unwrap_or(type_name)
}
