use bytes::{BufMut, Bytes};
use ethereum_types::{Bloom, H64, H160, H256, U256};

use crate::constants::{RLP_EMPTY_LIST, RLP_NULL};

pub trait RLPEncode {
    fn encode(&self, buf: &mut dyn BufMut);

    fn length(&self) -> usize {
        let mut buf = Vec::new();
        self.encode(&mut buf);
        buf.len()
    }

    fn encode_to_vec(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.encode(&mut buf);
        buf
    }
}

/// Writes a list prefix for a payload of `total_len` bytes.
pub fn encode_length(total_len: usize, buf: &mut dyn BufMut) {
    encode_prefix(RLP_EMPTY_LIST, total_len, buf);
}

fn encode_prefix(offset: u8, len: usize, buf: &mut dyn BufMut) {
    if len < 56 {
        buf.put_u8(offset + len as u8);
    } else {
        let be = len.to_be_bytes();
        let start = be.iter().position(|b| *b != 0).unwrap_or(be.len() - 1);
        buf.put_u8(offset + 55 + (be.len() - start) as u8);
        buf.put_slice(&be[start..]);
    }
}

impl RLPEncode for bool {
    fn encode(&self, buf: &mut dyn BufMut) {
        if *self {
            buf.put_u8(0x01);
        } else {
            buf.put_u8(RLP_NULL);
        }
    }
}

macro_rules! impl_encode_uint {
    ($($t:ty),*) => {
        $(
            impl RLPEncode for $t {
                fn encode(&self, buf: &mut dyn BufMut) {
                    if *self == 0 {
                        buf.put_u8(RLP_NULL);
                    } else {
                        let be = self.to_be_bytes();
                        let start = (self.leading_zeros() / 8) as usize;
                        be[start..].encode(buf);
                    }
                }
            }
        )*
    };
}

impl_encode_uint!(u8, u16, u32, u64, usize, u128);

impl RLPEncode for U256 {
    fn encode(&self, buf: &mut dyn BufMut) {
        if self.is_zero() {
            buf.put_u8(RLP_NULL);
        } else {
            let be = self.to_big_endian();
            let start = (self.leading_zeros() / 8) as usize;
            be[start..].encode(buf);
        }
    }
}

impl RLPEncode for [u8] {
    fn encode(&self, buf: &mut dyn BufMut) {
        match self {
            [single] if *single < RLP_NULL => buf.put_u8(*single),
            _ => {
                encode_prefix(RLP_NULL, self.len(), buf);
                buf.put_slice(self);
            }
        }
    }
}

impl<const N: usize> RLPEncode for [u8; N] {
    fn encode(&self, buf: &mut dyn BufMut) {
        self.as_slice().encode(buf)
    }
}

impl RLPEncode for Bytes {
    fn encode(&self, buf: &mut dyn BufMut) {
        <[u8] as RLPEncode>::encode(self, buf)
    }
}

impl RLPEncode for str {
    fn encode(&self, buf: &mut dyn BufMut) {
        self.as_bytes().encode(buf)
    }
}

impl RLPEncode for String {
    fn encode(&self, buf: &mut dyn BufMut) {
        self.as_bytes().encode(buf)
    }
}

macro_rules! impl_encode_fixed_hash {
    ($($t:ty),*) => {
        $(
            impl RLPEncode for $t {
                fn encode(&self, buf: &mut dyn BufMut) {
                    self.as_bytes().encode(buf)
                }
            }
        )*
    };
}

impl_encode_fixed_hash!(H64, H160, H256, Bloom);

impl<T: RLPEncode> RLPEncode for Vec<T> {
    fn encode(&self, buf: &mut dyn BufMut) {
        if self.is_empty() {
            buf.put_u8(RLP_EMPTY_LIST);
            return;
        }
        let mut payload = Vec::new();
        for item in self {
            item.encode(&mut payload);
        }
        encode_length(payload.len(), buf);
        buf.put_slice(&payload);
    }
}

impl<A: RLPEncode, B: RLPEncode> RLPEncode for (A, B) {
    fn encode(&self, buf: &mut dyn BufMut) {
        let mut payload = Vec::new();
        self.0.encode(&mut payload);
        self.1.encode(&mut payload);
        encode_length(payload.len(), buf);
        buf.put_slice(&payload);
    }
}
