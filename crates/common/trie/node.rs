use ethereum_types::H256;
use frontier_rlp::{
    constants::RLP_NULL,
    decode::decode_bytes,
    structs::{Decoder, Encoder},
};

use crate::{error::TrieError, nibbles::Nibbles};

/// Reference from a parent node to a child.
/// Children whose encoding is shorter than 32 bytes are embedded in the parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeHash {
    Hashed(H256),
    Inline(Vec<u8>),
}

impl NodeHash {
    fn encode_into<'a>(&self, encoder: Encoder<'a>) -> Encoder<'a> {
        match self {
            NodeHash::Hashed(hash) => encoder.encode_field(hash),
            NodeHash::Inline(encoded) => encoder.encode_raw(encoded),
        }
    }

    fn decode_child(item: &[u8]) -> Result<Option<Self>, TrieError> {
        // an embedded node is itself a list
        if item.first().is_some_and(|byte| *byte >= 0xc0) {
            return Ok(Some(NodeHash::Inline(item.to_vec())));
        }
        let (payload, _) = decode_bytes(item)?;
        match payload.len() {
            0 => Ok(None),
            32 => Ok(Some(NodeHash::Hashed(H256::from_slice(payload)))),
            len => Err(TrieError::InvalidNode(format!("child reference of {len} bytes"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Branch(Box<BranchNode>),
    Extension(ExtensionNode),
    Leaf(LeafNode),
}

/// Sixteen children, one per nibble, plus the value of a key ending at this node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchNode {
    pub choices: [Option<NodeHash>; 16],
    pub value: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionNode {
    pub prefix: Nibbles,
    pub child: NodeHash,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafNode {
    pub partial: Nibbles,
    pub value: Vec<u8>,
}

impl Node {
    pub fn encode_raw(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        match self {
            Node::Branch(branch) => {
                let mut encoder = Encoder::new(&mut buf);
                for choice in &branch.choices {
                    encoder = match choice {
                        Some(child) => child.encode_into(encoder),
                        None => encoder.encode_raw(&[RLP_NULL]),
                    };
                }
                encoder.encode_field(branch.value.as_slice()).finish();
            }
            Node::Extension(extension) => {
                let encoder = Encoder::new(&mut buf)
                    .encode_field(extension.prefix.encode_compact(false).as_slice());
                extension.child.encode_into(encoder).finish();
            }
            Node::Leaf(leaf) => {
                Encoder::new(&mut buf)
                    .encode_field(leaf.partial.encode_compact(true).as_slice())
                    .encode_field(leaf.value.as_slice())
                    .finish();
            }
        }
        buf
    }

    pub fn decode_raw(rlp: &[u8]) -> Result<Self, TrieError> {
        let mut decoder = Decoder::new(rlp)?;
        let mut items = Vec::with_capacity(17);
        while !decoder.is_done() {
            let (item, rest) = decoder.get_encoded_item()?;
            items.push(item);
            decoder = rest;
        }
        decoder.finish()?;

        match items.as_slice() {
            [path, second] => {
                let (compact, _) = decode_bytes(path)?;
                let (partial, is_leaf) = Nibbles::decode_compact(compact)
                    .ok_or_else(|| TrieError::InvalidNode("bad hex-prefix path".to_string()))?;
                if is_leaf {
                    let value = Vec::<u8>::from(bytes_of(second)?);
                    Ok(Node::Leaf(LeafNode { partial, value }))
                } else {
                    let child = NodeHash::decode_child(second)?.ok_or_else(|| {
                        TrieError::InvalidNode("extension without child".to_string())
                    })?;
                    Ok(Node::Extension(ExtensionNode {
                        prefix: partial,
                        child,
                    }))
                }
            }
            [choices @ .., value] if choices.len() == 16 => {
                let mut branch = BranchNode {
                    value: bytes_of(value)?.to_vec(),
                    ..Default::default()
                };
                for (slot, item) in branch.choices.iter_mut().zip(choices) {
                    *slot = NodeHash::decode_child(item)?;
                }
                Ok(Node::Branch(Box::new(branch)))
            }
            _ => Err(TrieError::InvalidNode(format!("list of {} items", items.len()))),
        }
    }
}

fn bytes_of(item: &[u8]) -> Result<&[u8], TrieError> {
    let (payload, rest) = decode_bytes(item)?;
    if !rest.is_empty() {
        return Err(TrieError::InvalidNode("trailing bytes in value".to_string()));
    }
    Ok(payload)
}
