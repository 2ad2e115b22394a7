//! Field-by-field builders for encoding and decoding RLP lists.

use bytes::BufMut;

use crate::{
    decode::{RLPDecode, decode_rlp_item, get_item_with_prefix},
    encode::{RLPEncode, encode_length},
    error::RLPDecodeError,
};

/// Accumulates the fields of a list and writes the whole list on [`Encoder::finish`].
///
/// ```ignore
/// Encoder::new(buf)
///     .encode_field(&self.address)
///     .encode_field(&self.topics)
///     .finish();
/// ```
pub struct Encoder<'a> {
    buf: &'a mut dyn BufMut,
    temp_buf: Vec<u8>,
}

impl<'a> Encoder<'a> {
    pub fn new(buf: &'a mut dyn BufMut) -> Self {
        Self {
            buf,
            temp_buf: Vec::new(),
        }
    }

    pub fn encode_field<T: RLPEncode + ?Sized>(mut self, value: &T) -> Self {
        value.encode(&mut self.temp_buf);
        self
    }

    /// Appends an item that is already RLP encoded.
    pub fn encode_raw(mut self, encoded: &[u8]) -> Self {
        self.temp_buf.put_slice(encoded);
        self
    }

    pub fn finish(self) {
        encode_length(self.temp_buf.len(), self.buf);
        self.buf.put_slice(&self.temp_buf);
    }
}

/// Walks the items of an RLP list one field at a time.
#[derive(Debug)]
#[must_use = "`Decoder` must be consumed with `finish` to perform decoding checks"]
pub struct Decoder<'a> {
    payload: &'a [u8],
    remaining: &'a [u8],
}

impl<'a> Decoder<'a> {
    pub fn new(buf: &'a [u8]) -> Result<Self, RLPDecodeError> {
        match decode_rlp_item(buf)? {
            (true, payload, remaining) => Ok(Self { payload, remaining }),
            (false, _, _) => Err(RLPDecodeError::UnexpectedString),
        }
    }

    pub fn decode_field<T: RLPDecode>(self, name: &str) -> Result<(T, Self), RLPDecodeError> {
        let (field, rest) = T::decode_unfinished(self.payload)
            .map_err(|err| field_decode_error::<T>(name, err))?;
        let updated_self = Self {
            payload: rest,
            ..self
        };
        Ok((field, updated_self))
    }

    /// Returns the next item with its prefix, without decoding it.
    pub fn get_encoded_item(self) -> Result<(&'a [u8], Self), RLPDecodeError> {
        let (item, rest) = get_item_with_prefix(self.payload)?;
        let updated_self = Self {
            payload: rest,
            ..self
        };
        Ok((item, updated_self))
    }

    pub fn is_done(&self) -> bool {
        self.payload.is_empty()
    }

    /// Fails if the list still has undecoded items, otherwise returns what follows the list.
    pub fn finish(self) -> Result<&'a [u8], RLPDecodeError> {
        if self.is_done() {
            Ok(self.remaining)
        } else {
            Err(RLPDecodeError::MalformedData)
        }
    }
}

fn field_decode_error<T>(field_name: &str, err: RLPDecodeError) -> RLPDecodeError {
    let typ = std::any::type_name::<T>();
    RLPDecodeError::Custom(format!("Error decoding field '{field_name}' of type {typ}: {err}"))
}
