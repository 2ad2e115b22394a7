/// A trie path expressed as half-bytes (each element is in `0..16`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Nibbles {
    data: Vec<u8>,
}

impl Nibbles {
    pub fn from_hex(hex: Vec<u8>) -> Self {
        Self { data: hex }
    }

    /// Splits every byte of a key into its high and low nibble.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let data = bytes
            .iter()
            .flat_map(|byte| [byte >> 4, byte & 0x0f])
            .collect();
        Self { data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Nibble at `index`. Callers check bounds with [`Nibbles::len`].
    pub fn at(&self, index: usize) -> usize {
        self.data[index] as usize
    }

    /// Path with the first `offset` nibbles removed.
    pub fn offset(&self, offset: usize) -> Self {
        self.slice(offset, self.len())
    }

    pub fn slice(&self, start: usize, end: usize) -> Self {
        Self::from_hex(self.data[start..end].to_vec())
    }

    /// Length of the prefix shared with `other`.
    pub fn count_prefix(&self, other: &Nibbles) -> usize {
        self.data
            .iter()
            .zip(other.data.iter())
            .take_while(|(a, b)| a == b)
            .count()
    }

    pub fn starts_with(&self, prefix: &Nibbles) -> bool {
        self.data.starts_with(&prefix.data)
    }

    /// Hex-prefix (compact) encoding. The flag nibble carries the leaf marker and the parity.
    pub fn encode_compact(&self, is_leaf: bool) -> Vec<u8> {
        let odd = self.len() % 2 == 1;
        let flag = (if is_leaf { 2 } else { 0 }) + u8::from(odd);
        let mut compact = Vec::with_capacity(self.len() / 2 + 1);
        let rest = if odd {
            compact.push((flag << 4) | self.data[0]);
            &self.data[1..]
        } else {
            compact.push(flag << 4);
            &self.data[..]
        };
        for pair in rest.chunks(2) {
            compact.push((pair[0] << 4) | pair.get(1).copied().unwrap_or_default());
        }
        compact
    }

    /// Inverse of [`Nibbles::encode_compact`], returning the path and the leaf marker.
    pub fn decode_compact(compact: &[u8]) -> Option<(Self, bool)> {
        let (first, rest) = compact.split_first()?;
        let flag = first >> 4;
        if flag > 3 {
            return None;
        }
        let mut data = Vec::with_capacity(rest.len() * 2 + 1);
        if flag & 1 == 1 {
            data.push(first & 0x0f);
        } else if first & 0x0f != 0 {
            return None;
        }
        data.extend(rest.iter().flat_map(|byte| [byte >> 4, byte & 0x0f]));
        Some((Self { data }, flag & 2 == 2))
    }
}
