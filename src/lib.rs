//! Share validation and block assembly core for Bitcoin-family mining
//! pools: derive an immutable job from a daemon block template, hand its
//! parameters to stratum connections, and validate every submitted share
//! against it, producing a rejection, an accepted share, or a serialized
//! block ready for `submitblock`.

use {
    anyhow::{Context, Error, bail, ensure},
    bitcoin::{
        Address, Amount, BlockHash, CompactTarget, Network, ScriptBuf, Target, Transaction,
        TxMerkleNode, Txid, VarInt, Wtxid,
        address::NetworkUnchecked,
        block::{Header as BlockHeader, Version as BlockVersion},
        consensus::{self, encode},
        hashes::{Hash, sha256, sha256d},
        opcodes,
        script::{self, PushBytesBuf},
    },
    crypto::{HashAlgorithm, HashContext},
    dashmap::DashSet,
    derive_more::Display,
    primitive_types::U256,
    serde::{Deserialize, Deserializer, Serialize, Serializer},
    serde_with::{DeserializeFromStr, SerializeDisplay},
    std::{
        collections::HashMap,
        fmt,
        slice,
        str::FromStr,
        sync::{Arc, LazyLock, RwLock},
        time::{SystemTime, UNIX_EPOCH},
    },
    stratum::{
        BITCOIN_DIFF1, Extranonce, JobId, JobParams, MerkleTree, Nbits, Ntime, PrevHash,
        ShareError, Version, share_difficulty, u256_to_f64, witness_merkle_root,
    },
    tracing::{debug, info},
};

mod block;
mod block_template;
mod coin;
mod coinbase;
pub mod crypto;
mod job;
mod rewards;
mod share;
pub mod stratum;
mod submissions;
mod worker;

pub use {
    block_template::{
        BlockTemplate, CoinbaseAux, CommunityAutonomousParameters, FundParameters, OneOrMany,
        PayeeParameters, ScriptParameters, TemplateExtra, TemplateTransaction,
    },
    coin::CoinTemplate,
    coinbase::{CoinbaseBuilder, CoinbaseParts, DEFAULT_COINBASE_TAG},
    job::Job,
    rewards::{RewardOutput, RewardPlan},
    share::Share,
    submissions::SubmissionRegistry,
    worker::{VARDIFF_GRACE_SECS, WorkerContext},
};

/// Extranonce1 is assigned per connection, extranonce2 is rolled by the
/// miner; together they fill the placeholder reserved in the coinbase
/// scriptSig.
pub const EXTRANONCE1_SIZE: usize = 4;
pub const EXTRANONCE2_SIZE: usize = 4;
pub const EXTRANONCE_PLACEHOLDER_SIZE: usize = EXTRANONCE1_SIZE + EXTRANONCE2_SIZE;

type Result<T = (), E = Error> = std::result::Result<T, E>;

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
