use super::*;

mod difficulty;
mod error;
mod extranonce;
mod job_id;
mod job_params;
mod merkle;
mod nbits;
mod ntime;
mod prevhash;
mod version;

pub use {
    difficulty::{BITCOIN_DIFF1, share_difficulty, u256_to_f64},
    error::ShareError,
    extranonce::Extranonce,
    job_id::JobId,
    job_params::JobParams,
    merkle::{MerkleNode, MerkleTree, witness_merkle_root},
    nbits::Nbits,
    ntime::Ntime,
    prevhash::PrevHash,
    version::Version,
};
