use super::*;

/// Upper bound on how far a submitted ntime may run ahead of the wall
/// clock.
const MAX_NTIME_FUTURE_DRIFT: u64 = 7200;

/// Shares scoring at least this fraction of the worker's target are
/// accepted, absorbing float rounding at the boundary.
const SHARE_RATIO_FLOOR: f64 = 0.99;

/// Everything derived from one block template: coinbase halves, merkle
/// branch steps, targets and the cached notify tuple. Frozen after `init`
/// apart from the submission registry, so worker tasks share it freely.
///
/// Retirement is the caller's business: a job never checks whether a newer
/// template has superseded it.
pub struct Job {
    pub job_id: JobId,
    coin: CoinTemplate,
    template: BlockTemplate,
    prev_block_hash: BlockHash,
    pub coinbase_initial: Vec<u8>,
    pub coinbase_final: Vec<u8>,
    merkle_tree: MerkleTree,
    block_target: U256,
    diff1: U256,
    /// Network difficulty derived from the template target, for reporting.
    pub difficulty: f64,
    share_multiplier: f64,
    submissions: SubmissionRegistry,
    params: JobParams,
    coinbase_hasher: Arc<dyn HashAlgorithm>,
    header_hasher: Arc<dyn HashAlgorithm>,
    block_hasher: Arc<dyn HashAlgorithm>,
}

impl Job {
    pub fn init(
        template: BlockTemplate,
        job_id: JobId,
        coin: CoinTemplate,
        network: Network,
        pool_address: &Address,
        coinbase_tag: Option<&str>,
    ) -> Result<Job> {
        ensure!(
            coin.share_multiplier > 0.0,
            "share multiplier must be positive"
        );

        let diff1 = coin.max_target()?;

        let block_target = match &template.target {
            Some(target) if !target.is_empty() => {
                ensure!(target.len() == 64, "template target must be 64 hex characters");
                U256::from_big_endian(&hex::decode(target).context("template target is not hex")?)
            }
            _ => U256::from_big_endian(&template.bits.to_target().to_be_bytes()),
        };
        ensure!(!block_target.is_zero(), "template target is zero");

        let difficulty = u256_to_f64(diff1) / u256_to_f64(block_target);

        let coinbase_hasher = crypto::algorithm(&coin.coinbase_hasher)?;
        let header_hasher = crypto::algorithm(&coin.header_hasher)?;
        let block_hasher = crypto::algorithm(&coin.block_hasher)?;

        let leaves = template
            .transactions
            .iter()
            .map(|tx| tx.leaf())
            .collect::<Result<Vec<_>>>()?;
        let merkle_tree = MerkleTree::new(leaves);

        let witness_commitment = witness_commitment(&template, &coin)?;

        let plan = RewardPlan::resolve(&template, &coin, network, pool_address.script_pubkey())?;

        let mut builder = CoinbaseBuilder::new(
            &template,
            &coin,
            &plan,
            coinbase_tag.unwrap_or(DEFAULT_COINBASE_TAG),
        );
        if let Some(commitment) = witness_commitment {
            builder = builder.with_witness_commitment(commitment);
        }
        let CoinbaseParts {
            coinbase_initial,
            coinbase_final,
        } = builder.build()?;

        let prev_block_hash = template.previous_block_hash;

        let params = JobParams {
            job_id,
            prev_hash: PrevHash::from(prev_block_hash),
            coinbase_initial: hex::encode(&coinbase_initial),
            coinbase_final: hex::encode(&coinbase_final),
            merkle_branches: merkle_tree.branches().to_vec(),
            version: Version::from_consensus(template.version),
            nbits: template.bits,
            ntime: Ntime::try_from(template.cur_time).context("template time overflows u32")?,
            clean_jobs: false,
        };

        debug!(
            job = %job_id,
            height = template.height,
            transactions = template.transactions.len(),
            difficulty,
            "prepared job"
        );

        Ok(Job {
            job_id,
            share_multiplier: coin.share_multiplier,
            coin,
            template,
            prev_block_hash,
            coinbase_initial,
            coinbase_final,
            merkle_tree,
            block_target,
            diff1,
            difficulty,
            submissions: SubmissionRegistry::new(),
            params,
            coinbase_hasher,
            header_hasher,
            block_hasher,
        })
    }

    pub fn template(&self) -> &BlockTemplate {
        &self.template
    }

    pub fn block_target(&self) -> U256 {
        self.block_target
    }

    pub fn submission_count(&self) -> usize {
        self.submissions.len()
    }

    /// The nine-element `mining.notify` tuple for this job. `clean_jobs`
    /// tells clients whether to drop in-flight work.
    pub fn stratum_params(&self, clean_jobs: bool) -> JobParams {
        JobParams {
            clean_jobs,
            ..self.params.clone()
        }
    }

    /// Validates one submission against this job. Returns the scored share
    /// and, when the hash also meets the network target, the serialized
    /// block hex ready for `submitblock`.
    ///
    /// Extranonce2 length policy is the connection layer's concern; a
    /// mismatched length simply produces a coinbase no chain would accept.
    pub fn process_share(
        &self,
        worker: &WorkerContext,
        extranonce2: &str,
        ntime: &str,
        nonce: &str,
        version_bits: Option<&str>,
    ) -> Result<(Share, Option<String>), ShareError> {
        let now = unix_now();

        if ntime.len() != 8 {
            return Err(ShareError::other("incorrect size of ntime"));
        }

        let n_time =
            u32::from_str_radix(ntime, 16).map_err(|_| ShareError::other("malformed ntime"))?;

        if u64::from(n_time) < self.template.cur_time
            || u64::from(n_time) > now + MAX_NTIME_FUTURE_DRIFT
        {
            return Err(ShareError::other("ntime out of range"));
        }

        if nonce.len() != 8 {
            return Err(ShareError::other("incorrect size of nonce"));
        }

        let nonce_value =
            u32::from_str_radix(nonce, 16).map_err(|_| ShareError::other("malformed nonce"))?;

        let version_bits = version_bits
            .map(|bits| {
                Version::from_str(bits).map_err(|_| ShareError::other("malformed version bits"))
            })
            .transpose()?;

        let mut version = Version::from_consensus(self.template.version);

        if let (Some(mask), Some(bits)) = (worker.version_rolling_mask, version_bits) {
            if bits.disallowed(mask) != 0 {
                return Err(ShareError::other("rolling-version mask violation"));
            }

            version = version.overlay(bits, mask);
        }

        let extranonce2_bytes =
            hex::decode(extranonce2).map_err(|_| ShareError::other("malformed extranonce2"))?;

        let extranonce1 = worker.extranonce1.to_string();
        if !self
            .submissions
            .insert(&extranonce1, extranonce2, ntime, nonce)
        {
            return Err(ShareError::DuplicateShare);
        }

        let mut coinbase = Vec::with_capacity(
            self.coinbase_initial.len()
                + worker.extranonce1.len()
                + extranonce2_bytes.len()
                + self.coinbase_final.len(),
        );
        coinbase.extend_from_slice(&self.coinbase_initial);
        coinbase.extend_from_slice(worker.extranonce1.as_bytes());
        coinbase.extend_from_slice(&extranonce2_bytes);
        coinbase.extend_from_slice(&self.coinbase_final);

        let context = HashContext {
            ntime: Some(n_time),
            template: Some(&self.template),
            coin: Some(&self.coin),
        };

        let mut coinbase_hash = [0u8; 32];
        self.coinbase_hasher
            .digest(&coinbase, &mut coinbase_hash, &context);

        let merkle_root = self
            .merkle_tree
            .with_first(sha256d::Hash::from_byte_array(coinbase_hash));

        let header = BlockHeader {
            version: BlockVersion::from_consensus(version.to_consensus()),
            prev_blockhash: self.prev_block_hash,
            merkle_root: TxMerkleNode::from_raw_hash(merkle_root),
            time: n_time,
            bits: self.template.bits.to_compact(),
            nonce: nonce_value,
        };
        let header_bytes = consensus::serialize(&header);

        let mut header_hash = [0u8; 32];
        self.header_hasher
            .digest(&header_bytes, &mut header_hash, &context);
        let header_value = U256::from_little_endian(&header_hash);

        let share_diff = share_difficulty(self.diff1, header_value, self.share_multiplier);
        let is_block_candidate = header_value <= self.block_target;

        // a block candidate is accepted no matter what the worker's
        // difficulty says
        let mut accepted_difficulty = worker.difficulty;

        if !is_block_candidate && share_diff / worker.difficulty < SHARE_RATIO_FLOOR {
            match worker.recent_previous_difficulty(now) {
                Some(previous) if share_diff / previous >= SHARE_RATIO_FLOOR => {
                    accepted_difficulty = previous;
                }
                _ => {
                    return Err(ShareError::LowDifficultyShare {
                        difficulty: share_diff,
                    });
                }
            }
        }

        let mut share = Share {
            block_height: self.template.height,
            network_difficulty: self.difficulty,
            difficulty: accepted_difficulty / self.share_multiplier,
            is_block_candidate,
            block_hash: None,
        };

        if !is_block_candidate {
            return Ok((share, None));
        }

        let mut block_hash = [0u8; 32];
        self.block_hasher
            .digest(&header_bytes, &mut block_hash, &context);
        let block_hash = hex::encode(block_hash);

        let block = block::serialize_block(&header_bytes, &coinbase, &self.template, &self.coin)
            .map_err(|e| ShareError::other(format!("failed to assemble block: {e}")))?;

        info!(
            job = %self.job_id,
            height = self.template.height,
            block = %block_hash,
            "share meets the network target"
        );

        share.block_hash = Some(block_hash);

        Ok((share, Some(hex::encode(block))))
    }
}

/// The segwit commitment output script for this template, if the coin
/// wants one: recomputed from the witness leaves when the coin flags it,
/// otherwise the template's own commitment.
fn witness_commitment(
    template: &BlockTemplate,
    coin: &CoinTemplate,
) -> Result<Option<ScriptBuf>> {
    if !coin.has_segwit {
        return Ok(None);
    }

    if coin.segwit_commitment_recompute {
        let mut leaves = Vec::with_capacity(template.transactions.len());

        for tx in &template.transactions {
            if tx
                .parsed()?
                .input
                .iter()
                .any(|input| !input.witness.is_empty())
            {
                leaves.push(tx.witness_leaf()?);
            }
        }

        let root = witness_merkle_root(&leaves);

        let mut preimage = Vec::with_capacity(64);
        preimage.extend_from_slice(root.as_byte_array());
        preimage.extend_from_slice(&[0u8; 32]); // zero witness nonce
        let commitment = sha256d::Hash::hash(&preimage);

        let mut payload = Vec::with_capacity(36);
        payload.extend_from_slice(&[0xaa, 0x21, 0xa9, 0xed]);
        payload.extend_from_slice(commitment.as_byte_array());

        let script = script::Builder::new()
            .push_opcode(opcodes::all::OP_RETURN)
            .push_slice(
                PushBytesBuf::try_from(payload)
                    .context("witness commitment exceeds script push limits")?,
            )
            .into_script();

        return Ok(Some(script));
    }

    match &template.default_witness_commitment {
        Some(commitment) if !commitment.is_empty() => Ok(Some(ScriptBuf::from_bytes(
            hex::decode(commitment).context("default witness commitment is not hex")?,
        ))),
        _ => Ok(None),
    }
}
