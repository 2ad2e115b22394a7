//! Ethereum Modified Merkle-Patricia trie.
//!
//! Every insertion writes the touched nodes through to a [`TrieDB`], so the
//! root returned by [`Trie::hash`] is always current and a trie can be
//! reopened later from that root alone.

pub mod db;
pub mod error;
pub mod nibbles;
pub mod node;

use ethereum_types::H256;
use hex_literal::hex;
use sha3::{Digest, Keccak256};
use tracing::trace;

pub use db::{InMemoryTrieDB, TrieDB};
pub use error::TrieError;
pub use nibbles::Nibbles;
pub use node::{BranchNode, ExtensionNode, LeafNode, Node, NodeHash};

/// keccak256(rlp("")): the root of a trie with no entries.
pub const EMPTY_TRIE_HASH: H256 = H256(hex!(
    "56e81f171bcc55a6ff8345e692c0f86e5b48e01b996cadc001622fb5e363b421"
));

pub type PathRLP = Vec<u8>;
pub type ValueRLP = Vec<u8>;

pub(crate) fn keccak(data: impl AsRef<[u8]>) -> H256 {
    H256(Keccak256::digest(data.as_ref()).into())
}

pub struct Trie {
    db: Box<dyn TrieDB>,
    root: H256,
}

impl Trie {
    /// Creates an empty trie over `db`.
    pub fn new(db: Box<dyn TrieDB>) -> Self {
        Self {
            db,
            root: EMPTY_TRIE_HASH,
        }
    }

    /// Opens the trie rooted at `root`. Nodes are read lazily, so this never touches `db`.
    pub fn open(db: Box<dyn TrieDB>, root: H256) -> Self {
        Self { db, root }
    }

    /// Creates a trie backed by a fresh in-memory database.
    pub fn stateless() -> Self {
        Self::new(Box::new(InMemoryTrieDB::default()))
    }

    pub fn hash(&self) -> H256 {
        self.root
    }

    pub fn get(&self, path: &[u8]) -> Result<Option<ValueRLP>, TrieError> {
        let Some(root) = self.root_node()? else {
            return Ok(None);
        };
        self.get_at(root, Nibbles::from_bytes(path))
    }

    pub fn insert(&mut self, path: &[u8], value: ValueRLP) -> Result<(), TrieError> {
        if value.is_empty() {
            return Err(TrieError::EmptyValue);
        }
        let root = self.root_node()?;
        let new_root = self.insert_at(root, Nibbles::from_bytes(path), value)?;
        // the root is always stored by hash, even when its encoding is short
        let encoded = new_root.encode_raw();
        let root_hash = keccak(&encoded);
        self.db.put(root_hash, encoded)?;
        trace!(old_root = %self.root, new_root = %root_hash, "Trie root updated");
        self.root = root_hash;
        Ok(())
    }

    /// Computes the root of a trie holding `entries`, using a throwaway in-memory database.
    pub fn compute_hash_from_unsorted_iter(
        entries: impl Iterator<Item = (PathRLP, ValueRLP)>,
    ) -> Result<H256, TrieError> {
        let mut trie = Trie::stateless();
        for (path, value) in entries {
            trie.insert(&path, value)?;
        }
        Ok(trie.hash())
    }

    fn root_node(&self) -> Result<Option<Node>, TrieError> {
        if self.root == EMPTY_TRIE_HASH {
            return Ok(None);
        }
        self.load(&NodeHash::Hashed(self.root)).map(Some)
    }

    fn load(&self, node_hash: &NodeHash) -> Result<Node, TrieError> {
        match node_hash {
            NodeHash::Inline(encoded) => Node::decode_raw(encoded),
            NodeHash::Hashed(hash) => {
                let encoded = self
                    .db
                    .get(*hash)?
                    .ok_or(TrieError::InconsistentTree(*hash))?;
                Node::decode_raw(&encoded)
            }
        }
    }

    fn commit(&self, node: Node) -> Result<NodeHash, TrieError> {
        let encoded = node.encode_raw();
        if encoded.len() < 32 {
            return Ok(NodeHash::Inline(encoded));
        }
        let hash = keccak(&encoded);
        self.db.put(hash, encoded)?;
        Ok(NodeHash::Hashed(hash))
    }

    fn get_at(&self, node: Node, path: Nibbles) -> Result<Option<ValueRLP>, TrieError> {
        match node {
            Node::Leaf(leaf) => Ok((leaf.partial == path).then_some(leaf.value)),
            Node::Extension(extension) => {
                if !path.starts_with(&extension.prefix) {
                    return Ok(None);
                }
                let child = self.load(&extension.child)?;
                self.get_at(child, path.offset(extension.prefix.len()))
            }
            Node::Branch(branch) => {
                if path.is_empty() {
                    return Ok((!branch.value.is_empty()).then_some(branch.value));
                }
                match &branch.choices[path.at(0)] {
                    Some(child) => {
                        let child = self.load(child)?;
                        self.get_at(child, path.offset(1))
                    }
                    None => Ok(None),
                }
            }
        }
    }

    fn insert_at(
        &self,
        node: Option<Node>,
        path: Nibbles,
        value: ValueRLP,
    ) -> Result<Node, TrieError> {
        let Some(node) = node else {
            return Ok(Node::Leaf(LeafNode {
                partial: path,
                value,
            }));
        };
        match node {
            Node::Leaf(leaf) => {
                if leaf.partial == path {
                    return Ok(Node::Leaf(LeafNode {
                        partial: path,
                        value,
                    }));
                }
                let common = leaf.partial.count_prefix(&path);
                let mut branch = BranchNode::default();
                self.place_in_branch(&mut branch, leaf.partial.offset(common), leaf.value)?;
                self.place_in_branch(&mut branch, path.offset(common), value)?;
                self.wrap_with_prefix(path.slice(0, common), branch)
            }
            Node::Extension(extension) => {
                let common = extension.prefix.count_prefix(&path);
                if common == extension.prefix.len() {
                    let child = self.load(&extension.child)?;
                    let new_child = self.insert_at(Some(child), path.offset(common), value)?;
                    return Ok(Node::Extension(ExtensionNode {
                        prefix: extension.prefix,
                        child: self.commit(new_child)?,
                    }));
                }
                // split the extension at the first diverging nibble
                let mut branch = BranchNode::default();
                let remaining_prefix = extension.prefix.offset(common);
                branch.choices[remaining_prefix.at(0)] = Some(if remaining_prefix.len() == 1 {
                    extension.child
                } else {
                    self.commit(Node::Extension(ExtensionNode {
                        prefix: remaining_prefix.offset(1),
                        child: extension.child,
                    }))?
                });
                self.place_in_branch(&mut branch, path.offset(common), value)?;
                self.wrap_with_prefix(path.slice(0, common), branch)
            }
            Node::Branch(mut branch) => {
                if path.is_empty() {
                    branch.value = value;
                    return Ok(Node::Branch(branch));
                }
                let choice = path.at(0);
                let child = branch.choices[choice]
                    .take()
                    .map(|child| self.load(&child))
                    .transpose()?;
                let new_child = self.insert_at(child, path.offset(1), value)?;
                branch.choices[choice] = Some(self.commit(new_child)?);
                Ok(Node::Branch(branch))
            }
        }
    }

    /// Stores `value` in `branch` at `rest`: as the branch value if `rest` is empty,
    /// otherwise as a leaf under the first nibble of `rest`.
    fn place_in_branch(
        &self,
        branch: &mut BranchNode,
        rest: Nibbles,
        value: ValueRLP,
    ) -> Result<(), TrieError> {
        if rest.is_empty() {
            branch.value = value;
        } else {
            let leaf = Node::Leaf(LeafNode {
                partial: rest.offset(1),
                value,
            });
            branch.choices[rest.at(0)] = Some(self.commit(leaf)?);
        }
        Ok(())
    }

    fn wrap_with_prefix(&self, prefix: Nibbles, branch: BranchNode) -> Result<Node, TrieError> {
        let branch = Node::Branch(Box::new(branch));
        if prefix.is_empty() {
            return Ok(branch);
        }
        Ok(Node::Extension(ExtensionNode {
            prefix,
            child: self.commit(branch)?,
        }))
    }
}
