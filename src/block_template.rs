use super::*;

/// A `getblocktemplate` result, plus the coin-specific reward fields some
/// daemons ride on the same object. Transaction payloads stay as the hex
/// the daemon sent so blocks can be reassembled byte-for-byte.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct BlockTemplate {
    pub height: u64,

    #[serde(rename = "previousblockhash")]
    pub previous_block_hash: BlockHash,

    pub version: i32,

    pub bits: Nbits,

    /// Full 256-bit target hex; not every daemon reports it, `bits` is the
    /// fallback.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    #[serde(rename = "curtime")]
    pub cur_time: u64,

    #[serde(
        rename = "coinbasevalue",
        with = "bitcoin::amount::serde::as_sat",
        default
    )]
    pub coinbase_value: Amount,

    #[serde(default)]
    pub transactions: Vec<TemplateTransaction>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_witness_commitment: Option<String>,

    #[serde(rename = "coinbaseaux", default)]
    pub coinbase_aux: CoinbaseAux,

    #[serde(flatten)]
    pub extra: TemplateExtra,
}

impl Default for BlockTemplate {
    fn default() -> Self {
        Self {
            height: 0,
            previous_block_hash: BlockHash::all_zeros(),
            version: 0x2000_0000,
            bits: CompactTarget::from_consensus(0x1d00_ffff).into(),
            target: None,
            cur_time: 0,
            coinbase_value: Amount::ZERO,
            transactions: Vec::new(),
            default_witness_commitment: None,
            coinbase_aux: CoinbaseAux::default(),
            extra: TemplateExtra::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct TemplateTransaction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub txid: Option<Txid>,

    /// The wtxid under segwit rules; equal to `txid` for legacy
    /// transactions, and all some daemons report.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<Wtxid>,

    /// Raw transaction hex, passed through to the assembled block verbatim.
    pub data: String,
}

impl TemplateTransaction {
    /// The merkle leaf for this transaction, in internal byte order.
    pub fn leaf(&self) -> Result<sha256d::Hash> {
        if let Some(txid) = self.txid {
            return Ok(txid.to_raw_hash());
        }
        if let Some(hash) = self.hash {
            return Ok(hash.to_raw_hash());
        }
        bail!("template transaction carries neither txid nor hash");
    }

    /// The witness merkle leaf: the wtxid when present, the txid otherwise.
    pub fn witness_leaf(&self) -> Result<sha256d::Hash> {
        if let Some(hash) = self.hash {
            return Ok(hash.to_raw_hash());
        }
        if let Some(txid) = self.txid {
            return Ok(txid.to_raw_hash());
        }
        bail!("template transaction carries neither hash nor txid");
    }

    pub fn raw(&self) -> Result<Vec<u8>> {
        hex::decode(&self.data).context("template transaction data is not hex")
    }

    pub fn parsed(&self) -> Result<Transaction> {
        encode::deserialize_hex(&self.data).context("template transaction data does not parse")
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct CoinbaseAux {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flags: Option<String>,
}

/// A reward field some daemons emit as a single object and others as an
/// array. Resolved once at job construction; downstream code iterates a
/// single slice either way.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn as_slice(&self) -> &[T] {
        match self {
            Self::One(value) => slice::from_ref(value),
            Self::Many(values) => values,
        }
    }
}

/// The coin-specific reward fields riding on the template object.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct TemplateExtra {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payee: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payee_amount: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub masternode: Option<OneOrMany<PayeeParameters>>,

    /// Special-transaction payload appended to masternode coinbases.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coinbase_payload: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub founder: Option<PayeeParameters>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minerdevfund: Option<FundParameters>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minerfund: Option<FundParameters>,

    #[serde(
        rename = "communityautonomous",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub community_autonomous: Option<CommunityAutonomousParameters>,

    #[serde(
        rename = "coinbasedevreward",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub coinbase_dev_reward: Option<OneOrMany<ScriptParameters>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foundation: Option<PayeeParameters>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub community: Option<OneOrMany<PayeeParameters>>,

    #[serde(rename = "datamining", default, skip_serializing_if = "Option::is_none")]
    pub data_mining: Option<OneOrMany<PayeeParameters>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub developer: Option<OneOrMany<PayeeParameters>>,

    /// Opaque extension-block payload appended after the block proper.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mweb: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct PayeeParameters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payee: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,

    #[serde(default)]
    pub amount: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct FundParameters {
    #[serde(default)]
    pub addresses: Vec<String>,

    #[serde(rename = "minimumvalue", default)]
    pub minimum_value: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct CommunityAutonomousParameters {
    #[serde(rename = "communityautonomousaddress")]
    pub address: String,

    #[serde(rename = "communityautonomousvalue", default)]
    pub value: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct ScriptParameters {
    #[serde(rename = "scriptpubkey")]
    pub script_pubkey: String,

    #[serde(default)]
    pub value: u64,
}
