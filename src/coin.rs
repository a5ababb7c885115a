use super::*;

/// Per-coin policy: which reward splits apply, which hash capabilities
/// run, and the serialization quirks of the coinbase and block. Operators
/// configure one of these per pool.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct CoinTemplate {
    pub symbol: String,

    pub coinbase_tx_version: u32,

    /// Free-form comment appended to the coinbase as a varstring trailer.
    pub coinbase_tx_comment: Option<String>,

    /// Maximum target as 64-char hex; Bitcoin's when unset.
    pub diff1: Option<String>,

    /// Scales reported share difficulty for coins whose hash output is not
    /// diff1-calibrated.
    pub share_multiplier: f64,

    pub coinbase_hasher: String,
    pub header_hasher: String,
    pub block_hasher: String,

    /// Peercoin-lineage coins embed a timestamp after the tx version and
    /// leave a signature slot at the end of the block.
    pub is_pos: bool,

    pub has_segwit: bool,

    /// Recompute the witness commitment from the template transactions
    /// instead of trusting `default_witness_commitment`.
    pub segwit_commitment_recompute: bool,

    pub has_mweb: bool,

    pub coinbase_ignore_aux_flags: bool,

    pub has_payee: bool,
    pub has_masternodes: bool,
    pub has_founder: bool,
    pub has_miner_dev_fund: bool,
    pub has_miner_fund: bool,
    pub has_community_autonomous: bool,
    pub has_coinbase_dev_reward: bool,
    pub has_foundation: bool,
    pub has_community: bool,
    pub has_data_mining: bool,
    pub has_developer: bool,

    /// Data-mining outputs historically ride on top of the block reward
    /// instead of deducting from it. Set this to make them deduct like
    /// every other split.
    pub data_mining_deducts: bool,
}

impl Default for CoinTemplate {
    fn default() -> Self {
        Self {
            symbol: "BTC".into(),
            coinbase_tx_version: 1,
            coinbase_tx_comment: None,
            diff1: None,
            share_multiplier: 1.0,
            coinbase_hasher: "sha256d".into(),
            header_hasher: "sha256d".into(),
            block_hasher: "sha256d-reverse".into(),
            is_pos: false,
            has_segwit: true,
            segwit_commitment_recompute: false,
            has_mweb: false,
            coinbase_ignore_aux_flags: false,
            has_payee: false,
            has_masternodes: false,
            has_founder: false,
            has_miner_dev_fund: false,
            has_miner_fund: false,
            has_community_autonomous: false,
            has_coinbase_dev_reward: false,
            has_foundation: false,
            has_community: false,
            has_data_mining: false,
            has_developer: false,
            data_mining_deducts: false,
        }
    }
}

impl CoinTemplate {
    /// The coin's difficulty-1 target.
    pub fn max_target(&self) -> Result<U256> {
        let Some(diff1) = &self.diff1 else {
            return Ok(*BITCOIN_DIFF1);
        };

        ensure!(diff1.len() == 64, "diff1 must be 64 hex characters");
        Ok(U256::from_big_endian(&hex::decode(diff1)?))
    }
}
