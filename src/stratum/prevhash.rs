use {
    super::*,
    byteorder::{BigEndian, ByteOrder, LittleEndian},
};

/// The previous block hash in `mining.notify` form. The protocol swaps
/// every u32 word of the internal hash into big endian, a quirk every
/// implementation has faithfully reproduced since slush's original pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, DeserializeFromStr, SerializeDisplay)]
pub struct PrevHash(BlockHash);

impl PrevHash {
    pub fn to_block_hash(self) -> BlockHash {
        self.0
    }

    fn swap_words(bytes: [u8; 32]) -> [u8; 32] {
        let mut swapped = [0u8; 32];
        for (src, dst) in bytes.chunks_exact(4).zip(swapped.chunks_exact_mut(4)) {
            let word = BigEndian::read_u32(src);
            LittleEndian::write_u32(dst, word);
        }
        swapped
    }
}

impl From<BlockHash> for PrevHash {
    fn from(hash: BlockHash) -> Self {
        Self(hash)
    }
}

impl From<PrevHash> for BlockHash {
    fn from(prevhash: PrevHash) -> Self {
        prevhash.0
    }
}

impl fmt::Display for PrevHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(Self::swap_words(self.0.to_byte_array())))
    }
}

impl FromStr for PrevHash {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ensure!(s.len() == 64, "prevhash must be 64 hex characters");
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes)?;
        Ok(Self(BlockHash::from_byte_array(Self::swap_words(bytes))))
    }
}
