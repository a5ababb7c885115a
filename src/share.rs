use super::*;

/// Outcome of a validated submission. The stratum layer attaches worker
/// identity and routes it to accounting; block candidates additionally
/// come with the serialized block for the daemon.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Share {
    pub block_height: u64,

    pub network_difficulty: f64,

    /// Difficulty credited to the worker, already divided by the coin's
    /// share multiplier.
    pub difficulty: f64,

    pub is_block_candidate: bool,

    /// Display-order block hash, present on candidates.
    pub block_hash: Option<String>,
}
