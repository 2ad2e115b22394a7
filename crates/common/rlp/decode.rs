use bytes::Bytes;
use ethereum_types::{Bloom, H64, H160, H256, U256};

use crate::{constants::RLP_NULL, error::RLPDecodeError};

pub trait RLPDecode: Sized {
    /// Decodes the first item of `rlp`, returning it along with the bytes that follow it.
    fn decode_unfinished(rlp: &[u8]) -> Result<(Self, &[u8]), RLPDecodeError>;

    fn decode(rlp: &[u8]) -> Result<Self, RLPDecodeError> {
        let (decoded, remaining) = Self::decode_unfinished(rlp)?;
        if !remaining.is_empty() {
            return Err(RLPDecodeError::InvalidLength);
        }
        Ok(decoded)
    }
}

/// Splits off the first RLP item of `data`.
/// Returns whether the item is a list, its payload, and the remaining bytes.
pub fn decode_rlp_item(data: &[u8]) -> Result<(bool, &[u8], &[u8]), RLPDecodeError> {
    let first_byte = *data.first().ok_or(RLPDecodeError::InvalidLength)?;
    match first_byte {
        0..=0x7f => Ok((false, &data[..1], &data[1..])),
        0x80..=0xb7 => {
            let length = (first_byte - RLP_NULL) as usize;
            let payload = data
                .get(1..1 + length)
                .ok_or(RLPDecodeError::InvalidLength)?;
            // single bytes below 0x80 must be encoded as themselves
            if payload.len() == 1 && payload[0] < RLP_NULL {
                return Err(RLPDecodeError::MalformedData);
            }
            Ok((false, payload, &data[1 + length..]))
        }
        0xb8..=0xbf => {
            let (payload, rest) = split_long_payload(data, (first_byte - 0xb7) as usize)?;
            Ok((false, payload, rest))
        }
        0xc0..=0xf7 => {
            let length = (first_byte - 0xc0) as usize;
            let payload = data
                .get(1..1 + length)
                .ok_or(RLPDecodeError::InvalidLength)?;
            Ok((true, payload, &data[1 + length..]))
        }
        0xf8..=0xff => {
            let (payload, rest) = split_long_payload(data, (first_byte - 0xf7) as usize)?;
            Ok((true, payload, rest))
        }
    }
}

fn split_long_payload(
    data: &[u8],
    length_of_length: usize,
) -> Result<(&[u8], &[u8]), RLPDecodeError> {
    let length_bytes = data
        .get(1..1 + length_of_length)
        .ok_or(RLPDecodeError::InvalidLength)?;
    if length_bytes.first() == Some(&0) || length_bytes.len() > size_of::<usize>() {
        return Err(RLPDecodeError::MalformedData);
    }
    let length = length_bytes
        .iter()
        .fold(0usize, |acc, byte| (acc << 8) | *byte as usize);
    if length < 56 {
        return Err(RLPDecodeError::MalformedData);
    }
    let start = 1 + length_of_length;
    let end = start
        .checked_add(length)
        .ok_or(RLPDecodeError::InvalidLength)?;
    let payload = data.get(start..end).ok_or(RLPDecodeError::InvalidLength)?;
    Ok((payload, &data[end..]))
}

/// Returns the first item of `data` including its prefix, and the remaining bytes.
pub fn get_item_with_prefix(data: &[u8]) -> Result<(&[u8], &[u8]), RLPDecodeError> {
    let (_, _, rest) = decode_rlp_item(data)?;
    let item_len = data.len() - rest.len();
    Ok((&data[..item_len], rest))
}

/// Decodes a string item, failing on lists.
pub fn decode_bytes(data: &[u8]) -> Result<(&[u8], &[u8]), RLPDecodeError> {
    let (is_list, payload, rest) = decode_rlp_item(data)?;
    if is_list {
        return Err(RLPDecodeError::UnexpectedList);
    }
    Ok((payload, rest))
}

impl RLPDecode for bool {
    fn decode_unfinished(rlp: &[u8]) -> Result<(Self, &[u8]), RLPDecodeError> {
        let (payload, rest) = decode_bytes(rlp)?;
        let value = match payload {
            [] => false,
            [0x01] => true,
            _ => return Err(RLPDecodeError::MalformedBoolean),
        };
        Ok((value, rest))
    }
}

macro_rules! impl_decode_uint {
    ($($t:ty),*) => {
        $(
            impl RLPDecode for $t {
                fn decode_unfinished(rlp: &[u8]) -> Result<(Self, &[u8]), RLPDecodeError> {
                    let (payload, rest) = decode_bytes(rlp)?;
                    if payload.len() > size_of::<$t>() {
                        return Err(RLPDecodeError::InvalidLength);
                    }
                    if payload.first() == Some(&0) {
                        return Err(RLPDecodeError::MalformedData);
                    }
                    let value = payload
                        .iter()
                        .fold(0 as $t, |acc, byte| (acc << 8) | *byte as $t);
                    Ok((value, rest))
                }
            }
        )*
    };
}

impl_decode_uint!(u16, u32, u64, usize, u128);

impl RLPDecode for u8 {
    fn decode_unfinished(rlp: &[u8]) -> Result<(Self, &[u8]), RLPDecodeError> {
        let (payload, rest) = decode_bytes(rlp)?;
        match payload {
            [] => Ok((0, rest)),
            [0] => Err(RLPDecodeError::MalformedData),
            [value] => Ok((*value, rest)),
            _ => Err(RLPDecodeError::InvalidLength),
        }
    }
}

impl RLPDecode for U256 {
    fn decode_unfinished(rlp: &[u8]) -> Result<(Self, &[u8]), RLPDecodeError> {
        let (payload, rest) = decode_bytes(rlp)?;
        if payload.len() > 32 {
            return Err(RLPDecodeError::InvalidLength);
        }
        if payload.first() == Some(&0) {
            return Err(RLPDecodeError::MalformedData);
        }
        Ok((U256::from_big_endian(payload), rest))
    }
}

impl<const N: usize> RLPDecode for [u8; N] {
    fn decode_unfinished(rlp: &[u8]) -> Result<(Self, &[u8]), RLPDecodeError> {
        let (payload, rest) = decode_bytes(rlp)?;
        let value = payload
            .try_into()
            .map_err(|_| RLPDecodeError::InvalidLength)?;
        Ok((value, rest))
    }
}

impl RLPDecode for Bytes {
    fn decode_unfinished(rlp: &[u8]) -> Result<(Self, &[u8]), RLPDecodeError> {
        let (payload, rest) = decode_bytes(rlp)?;
        Ok((Bytes::copy_from_slice(payload), rest))
    }
}

impl RLPDecode for String {
    fn decode_unfinished(rlp: &[u8]) -> Result<(Self, &[u8]), RLPDecodeError> {
        let (payload, rest) = decode_bytes(rlp)?;
        let value =
            String::from_utf8(payload.to_vec()).map_err(|_| RLPDecodeError::MalformedData)?;
        Ok((value, rest))
    }
}

macro_rules! impl_decode_fixed_hash {
    ($($t:ty),*) => {
        $(
            impl RLPDecode for $t {
                fn decode_unfinished(rlp: &[u8]) -> Result<(Self, &[u8]), RLPDecodeError> {
                    let (payload, rest) = decode_bytes(rlp)?;
                    if payload.len() != <$t>::len_bytes() {
                        return Err(RLPDecodeError::InvalidLength);
                    }
                    Ok((<$t>::from_slice(payload), rest))
                }
            }
        )*
    };
}

impl_decode_fixed_hash!(H64, H160, H256, Bloom);

impl<T: RLPDecode> RLPDecode for Vec<T> {
    fn decode_unfinished(rlp: &[u8]) -> Result<(Self, &[u8]), RLPDecodeError> {
        let (is_list, mut payload, rest) = decode_rlp_item(rlp)?;
        if !is_list {
            return Err(RLPDecodeError::UnexpectedString);
        }
        let mut items = Vec::new();
        while !payload.is_empty() {
            let (item, remaining) = T::decode_unfinished(payload)?;
            items.push(item);
            payload = remaining;
        }
        Ok((items, rest))
    }
}

impl<A: RLPDecode, B: RLPDecode> RLPDecode for (A, B) {
    fn decode_unfinished(rlp: &[u8]) -> Result<(Self, &[u8]), RLPDecodeError> {
        let (is_list, payload, rest) = decode_rlp_item(rlp)?;
        if !is_list {
            return Err(RLPDecodeError::UnexpectedString);
        }
        let (first, payload) = A::decode_unfinished(payload)?;
        let (second, payload) = B::decode_unfinished(payload)?;
        if !payload.is_empty() {
            return Err(RLPDecodeError::MalformedData);
        }
        Ok(((first, second), rest))
    }
}
