use super::*;

/// Pool signature pushed at the tail of the coinbase scriptSig when the
/// operator configures nothing else.
pub const DEFAULT_COINBASE_TAG: &str = "Miningcore";

/// The serialized halves of the coinbase transaction, split at the
/// extranonce insertion point. Splicing `extranonce1 ∥ extranonce2` of the
/// reserved placeholder size between them yields a parseable transaction.
#[derive(Clone, Debug, PartialEq)]
pub struct CoinbaseParts {
    pub coinbase_initial: Vec<u8>,
    pub coinbase_final: Vec<u8>,
}

/// Assembles the coinbase halves for a template.
pub struct CoinbaseBuilder<'a> {
    template: &'a BlockTemplate,
    coin: &'a CoinTemplate,
    plan: &'a RewardPlan,
    pool_tag: &'a str,
    witness_commitment: Option<ScriptBuf>,
    placeholder_size: usize,
    now: u64,
}

impl<'a> CoinbaseBuilder<'a> {
    /// Consensus limit on the coinbase scriptSig.
    const MAX_SCRIPT_SIG_SIZE: usize = 100;

    pub fn new(
        template: &'a BlockTemplate,
        coin: &'a CoinTemplate,
        plan: &'a RewardPlan,
        pool_tag: &'a str,
    ) -> Self {
        Self {
            template,
            coin,
            plan,
            pool_tag,
            witness_commitment: None,
            placeholder_size: EXTRANONCE_PLACEHOLDER_SIZE,
            now: unix_now(),
        }
    }

    pub fn with_witness_commitment(mut self, script: ScriptBuf) -> Self {
        self.witness_commitment = Some(script);
        self
    }

    pub fn with_placeholder_size(mut self, size: usize) -> Self {
        self.placeholder_size = size;
        self
    }

    pub fn build(self) -> Result<CoinbaseParts> {
        let script_sig_initial = self.script_sig_initial()?;

        let script_sig_final = script::Builder::new()
            .push_slice(
                PushBytesBuf::try_from(self.pool_tag.as_bytes().to_vec())
                    .context("coinbase tag exceeds script push limits")?,
            )
            .into_script();

        let script_sig_size =
            script_sig_initial.len() + self.placeholder_size + script_sig_final.len();

        ensure!(
            script_sig_size <= Self::MAX_SCRIPT_SIG_SIZE,
            "script sig too large: {script_sig_size} bytes (max {})",
            Self::MAX_SCRIPT_SIG_SIZE
        );

        let mut initial = Vec::with_capacity(64 + script_sig_initial.len());

        initial.extend_from_slice(&self.plan.tx_version.to_le_bytes());

        if self.coin.is_pos {
            let timestamp =
                u32::try_from(self.template.cur_time).context("template time overflows u32")?;
            initial.extend_from_slice(&timestamp.to_le_bytes());
        }

        // a single input spending the null outpoint
        initial.extend_from_slice(&consensus::serialize(&VarInt(1)));
        initial.extend_from_slice(&[0u8; 32]);
        initial.extend_from_slice(&u32::MAX.to_le_bytes());

        initial.extend_from_slice(&consensus::serialize(&VarInt(script_sig_size as u64)));
        initial.extend_from_slice(script_sig_initial.as_bytes());

        let mut tail = Vec::new();

        tail.extend_from_slice(script_sig_final.as_bytes());
        tail.extend_from_slice(&0u32.to_le_bytes()); // nSequence

        let output_count = self.plan.outputs.len() as u64 + self.witness_commitment.is_some() as u64;
        tail.extend_from_slice(&consensus::serialize(&VarInt(output_count)));

        if let Some(commitment) = &self.witness_commitment {
            tail.extend_from_slice(&0u64.to_le_bytes());
            tail.extend_from_slice(&consensus::serialize(&VarInt(commitment.len() as u64)));
            tail.extend_from_slice(commitment.as_bytes());
        }

        for output in &self.plan.outputs {
            tail.extend_from_slice(&output.value.to_sat().to_le_bytes());
            tail.extend_from_slice(&consensus::serialize(&VarInt(output.script.len() as u64)));
            tail.extend_from_slice(output.script.as_bytes());
        }

        tail.extend_from_slice(&0u32.to_le_bytes()); // nLockTime

        if let Some(comment) = &self.coin.coinbase_tx_comment {
            push_var_string(&mut tail, comment.as_bytes());
        }

        if let Some(payload) = &self.plan.coinbase_payload {
            push_var_string(&mut tail, payload);
        }

        Ok(CoinbaseParts {
            coinbase_initial: initial,
            coinbase_final: tail,
        })
    }

    /// Height, optional aux flags, wall-clock entropy and a zero, each as a
    /// script push. The timestamp is not a consensus field, only entropy.
    fn script_sig_initial(&self) -> Result<ScriptBuf> {
        let mut builder = script::Builder::new().push_int(
            self.template
                .height
                .try_into()
                .context("block height overflows script int")?,
        );

        if !self.coin.coinbase_ignore_aux_flags {
            if let Some(flags) = &self.template.coinbase_aux.flags {
                if !flags.is_empty() {
                    builder = builder.push_slice(
                        PushBytesBuf::try_from(
                            hex::decode(flags).context("coinbase aux flags are not hex")?,
                        )
                        .context("coinbase aux flags exceed script push limits")?,
                    );
                }
            }
        }

        let now = i64::try_from(self.now).context("wall clock overflows script int")?;

        Ok(builder.push_int(now).push_int(0).into_script())
    }
}

fn push_var_string(buf: &mut Vec<u8>, bytes: &[u8]) {
    buf.extend_from_slice(&consensus::serialize(&VarInt(bytes.len() as u64)));
    buf.extend_from_slice(bytes);
}
