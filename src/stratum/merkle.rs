use super::*;

/// A branch step in the transaction merkle tree, carried in `mining.notify`
/// as plain hex in internal byte order (unlike txids, never reversed).
#[derive(Copy, Clone, Debug, PartialEq, Eq, DeserializeFromStr, SerializeDisplay)]
pub struct MerkleNode(sha256d::Hash);

impl MerkleNode {
    pub fn as_byte_array(&self) -> &[u8; 32] {
        self.0.as_byte_array()
    }

    pub fn from_byte_array(bytes: [u8; 32]) -> Self {
        Self(sha256d::Hash::from_byte_array(bytes))
    }
}

impl From<sha256d::Hash> for MerkleNode {
    fn from(hash: sha256d::Hash) -> Self {
        Self(hash)
    }
}

impl From<MerkleNode> for sha256d::Hash {
    fn from(node: MerkleNode) -> Self {
        node.0
    }
}

impl fmt::Display for MerkleNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0.as_byte_array()))
    }
}

impl FromStr for MerkleNode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ensure!(s.len() == 64, "merkle node hex must be 64 chars");
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes)?;
        Ok(Self(sha256d::Hash::from_byte_array(bytes)))
    }
}

fn hash_pair(left: sha256d::Hash, right: sha256d::Hash) -> sha256d::Hash {
    let mut concat = Vec::with_capacity(64);
    concat.extend_from_slice(left.as_byte_array());
    concat.extend_from_slice(right.as_byte_array());
    sha256d::Hash::hash(&concat)
}

/// Naive merkle root with Bitcoin's odd-duplication rule. Quadratic-ish and
/// only used where the full leaf set is already in hand.
pub fn merkle_root(mut level: Vec<sha256d::Hash>) -> Option<sha256d::Hash> {
    if level.is_empty() {
        return None;
    }

    while level.len() > 1 {
        level = level
            .chunks(2)
            .map(|pair| hash_pair(pair[0], *pair.get(1).unwrap_or(&pair[0])))
            .collect();
    }

    Some(level[0])
}

/// Root over the witness leaf set with a zeroed coinbase slot, as committed
/// to by the segwit coinbase output.
pub fn witness_merkle_root(wtxids: &[sha256d::Hash]) -> sha256d::Hash {
    let mut leaves = Vec::with_capacity(wtxids.len() + 1);
    leaves.push(sha256d::Hash::all_zeros());
    leaves.extend_from_slice(wtxids);
    merkle_root(leaves).expect("leaf set is never empty")
}

/// Branch steps precomputed from the non-coinbase leaves, ready to fold a
/// candidate coinbase hash into the root without rebuilding the tree.
///
/// The coinbase occupies index zero at every level, so the sibling to pair
/// with is always the element at index one (duplicated when a level runs
/// out).
#[derive(Clone, Debug)]
pub struct MerkleTree {
    branches: Vec<MerkleNode>,
}

impl MerkleTree {
    /// `leaves` are the non-coinbase transaction hashes, already in
    /// internal byte order.
    pub fn new(leaves: Vec<sha256d::Hash>) -> Self {
        if leaves.is_empty() {
            return Self {
                branches: Vec::new(),
            };
        }

        let mut level = Vec::with_capacity(leaves.len() + 1);
        level.push(sha256d::Hash::all_zeros());
        level.extend(leaves);

        let mut branches = Vec::new();

        while level.len() > 1 {
            branches.push(MerkleNode::from(*level.get(1).unwrap_or(&level[0])));

            level = level
                .chunks(2)
                .map(|pair| hash_pair(pair[0], *pair.get(1).unwrap_or(&pair[0])))
                .collect();
        }

        Self { branches }
    }

    pub fn branches(&self) -> &[MerkleNode] {
        &self.branches
    }

    /// Thread `first` up through the branch steps to the root.
    pub fn with_first(&self, first: sha256d::Hash) -> sha256d::Hash {
        self.branches
            .iter()
            .fold(first, |acc, step| hash_pair(acc, (*step).into()))
    }
}
