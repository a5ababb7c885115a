use {
    bitcoin::{Address, Amount, Network, address::NetworkUnchecked, consensus::encode},
    galena::{
        BlockTemplate, CoinTemplate, Job, TemplateExtra, WorkerContext,
        stratum::{JobId, ShareError},
    },
    std::time::{SystemTime, UNIX_EPOCH},
};

fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

fn pool_address() -> Address {
    "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4"
        .parse::<Address<NetworkUnchecked>>()
        .unwrap()
        .assume_checked()
}

fn template() -> BlockTemplate {
    BlockTemplate {
        height: 700_000,
        version: 0x2000_0000,
        bits: "170d1ab4".parse().unwrap(),
        cur_time: now(),
        coinbase_value: Amount::from_sat(625_000_000),
        ..BlockTemplate::default()
    }
}

fn job_with(template: BlockTemplate, coin: CoinTemplate) -> Job {
    Job::init(
        template,
        JobId::new(1),
        coin,
        Network::Bitcoin,
        &pool_address(),
        None,
    )
    .unwrap()
}

fn job() -> Job {
    job_with(template(), CoinTemplate::default())
}

fn worker(difficulty: f64) -> WorkerContext {
    WorkerContext::new("ab120401".parse().unwrap(), difficulty)
}

fn ntime_hex(job: &Job) -> String {
    format!("{:08x}", job.template().cur_time)
}

#[test]
fn easy_worker_difficulty_accepts_a_share() {
    let job = job();
    let ntime = ntime_hex(&job);

    let (share, block) = job
        .process_share(&worker(1e-12), "00000000", &ntime, "00000000", None)
        .unwrap();

    assert_eq!(share.block_height, 700_000);
    assert!(!share.is_block_candidate);
    assert!(share.block_hash.is_none());
    assert!(block.is_none());
    assert_eq!(share.difficulty, 1e-12);
    assert!(share.network_difficulty > 1e12, "mainnet-scale difficulty");
}

#[test]
fn mainnet_worker_difficulty_rejects_a_trivial_share() {
    let job = job();
    let ntime = ntime_hex(&job);

    let result = job.process_share(&worker(1e9), "00000000", &ntime, "00000000", None);

    match result {
        Err(ShareError::LowDifficultyShare { difficulty }) => {
            assert!(difficulty >= 0.0);
        }
        other => panic!("expected low difficulty rejection, got {other:?}"),
    }
}

#[test]
fn second_identical_submission_is_a_duplicate() {
    let job = job();
    let ntime = ntime_hex(&job);
    let worker = worker(1e-12);

    job.process_share(&worker, "00000000", &ntime, "00000000", None)
        .unwrap();

    assert_eq!(
        job.process_share(&worker, "00000000", &ntime, "00000000", None),
        Err(ShareError::DuplicateShare)
    );

    // the rejected duplicate did not grow the registry
    assert_eq!(job.submission_count(), 1);
}

#[test]
fn rejected_share_does_not_occupy_the_registry() {
    let job = job();
    let worker = worker(1e-12);

    // size gates fire before the duplicate check, so the same tuple can be
    // resubmitted once it is well-formed
    assert_eq!(
        job.process_share(&worker, "00000000", "00", "00000000", None),
        Err(ShareError::other("incorrect size of ntime"))
    );
    assert_eq!(job.submission_count(), 0);
}

#[test]
fn malformed_extranonce2_does_not_occupy_the_registry() {
    let job = job();
    let ntime = ntime_hex(&job);
    let worker = worker(1e-12);

    assert_eq!(
        job.process_share(&worker, "zzzzzzzz", &ntime, "00000000", None),
        Err(ShareError::other("malformed extranonce2"))
    );
    assert_eq!(job.submission_count(), 0);

    // resubmitting the tuple is still judged on its own merits, not
    // bounced as a duplicate of the rejected attempt
    assert_eq!(
        job.process_share(&worker, "zzzzzzzz", &ntime, "00000000", None),
        Err(ShareError::other("malformed extranonce2"))
    );
    assert_eq!(job.submission_count(), 0);
}

#[test]
fn ntime_must_be_eight_hex_chars() {
    let job = job();

    assert_eq!(
        job.process_share(&worker(1e-12), "00000000", "123", "00000000", None),
        Err(ShareError::other("incorrect size of ntime"))
    );
}

#[test]
fn ntime_before_the_template_is_out_of_range() {
    let job = job();
    let early = format!("{:08x}", job.template().cur_time - 1);

    assert_eq!(
        job.process_share(&worker(1e-12), "00000000", &early, "00000000", None),
        Err(ShareError::other("ntime out of range"))
    );
}

#[test]
fn ntime_beyond_two_hours_ahead_is_out_of_range() {
    let job = job();
    let late = format!("{:08x}", now() + 7201);

    assert_eq!(
        job.process_share(&worker(1e-12), "00000000", &late, "00000000", None),
        Err(ShareError::other("ntime out of range"))
    );
}

#[test]
fn nonce_must_be_eight_hex_chars() {
    let job = job();
    let ntime = ntime_hex(&job);

    assert_eq!(
        job.process_share(&worker(1e-12), "00000000", &ntime, "0000", None),
        Err(ShareError::other("incorrect size of nonce"))
    );
}

#[test]
fn version_rolling_within_the_mask_is_accepted() {
    let job = job();
    let ntime = ntime_hex(&job);

    let mut worker = worker(1e-12);
    worker.version_rolling_mask = Some("1fffe000".parse().unwrap());

    job.process_share(&worker, "00000000", &ntime, "00000000", Some("00400000"))
        .unwrap();
}

#[test]
fn version_rolling_outside_the_mask_is_rejected() {
    let job = job();
    let ntime = ntime_hex(&job);

    let mut worker = worker(1e-12);
    worker.version_rolling_mask = Some("1fffe000".parse().unwrap());

    assert_eq!(
        job.process_share(&worker, "00000000", &ntime, "00000000", Some("00000001")),
        Err(ShareError::other("rolling-version mask violation"))
    );
}

#[test]
fn block_candidate_returns_a_decodable_block() {
    // an all-ones target makes every well-formed share a candidate
    let job = job_with(
        BlockTemplate {
            target: Some("f".repeat(64)),
            ..template()
        },
        CoinTemplate::default(),
    );
    let ntime = ntime_hex(&job);

    // worker difficulty is astronomical on purpose: candidacy overrides it
    let (share, block_hex) = job
        .process_share(&worker(1e15), "00000000", &ntime, "00000000", None)
        .unwrap();

    assert!(share.is_block_candidate);
    let block_hex = block_hex.expect("candidates carry the serialized block");
    let block_hash = share.block_hash.expect("candidates carry the block hash");
    assert_eq!(block_hash.len(), 64);

    let block: bitcoin::Block = encode::deserialize_hex(&block_hex).unwrap();

    // the first 80 bytes are the assembled header
    assert_eq!(
        hex::encode(encode::serialize(&block.header)),
        block_hex[..160]
    );
    assert_eq!(block.header.time, u32::try_from(job.template().cur_time).unwrap());
    assert_eq!(block.header.nonce, 0);
    assert_eq!(block.header.bits, job.template().bits.to_compact());
    assert_eq!(
        block.header.prev_blockhash,
        job.template().previous_block_hash
    );

    // the coinbase reassembled through the extranonce placeholder commits
    // to the header's merkle root
    assert!(block.check_merkle_root());
    assert_eq!(block.txdata.len(), 1);
    assert_eq!(block.bip34_block_height().unwrap(), 700_000);
}

#[test]
fn pos_blocks_end_with_a_signature_slot() {
    let coin = CoinTemplate {
        is_pos: true,
        coinbase_tx_comment: Some("galena".into()),
        ..CoinTemplate::default()
    };

    let job = job_with(
        BlockTemplate {
            target: Some("f".repeat(64)),
            ..template()
        },
        coin,
    );
    let ntime = ntime_hex(&job);

    let (_, block_hex) = job
        .process_share(&worker(1e-12), "00000000", &ntime, "00000000", None)
        .unwrap();

    assert!(block_hex.unwrap().ends_with("00"));

    // the same template without PoS ends with the coinbase comment instead
    let coin = CoinTemplate {
        coinbase_tx_comment: Some("galena".into()),
        ..CoinTemplate::default()
    };
    let job = job_with(
        BlockTemplate {
            target: Some("f".repeat(64)),
            ..template()
        },
        coin,
    );
    let ntime = ntime_hex(&job);

    let (_, block_hex) = job
        .process_share(&worker(1e-12), "00000000", &ntime, "00000000", None)
        .unwrap();

    assert!(block_hex.unwrap().ends_with(&hex::encode(b"galena")));
}

#[test]
fn mweb_trailer_rides_after_the_block() {
    let job = job_with(
        BlockTemplate {
            target: Some("f".repeat(64)),
            extra: TemplateExtra {
                mweb: Some("deadbeef".into()),
                ..TemplateExtra::default()
            },
            ..template()
        },
        CoinTemplate {
            has_mweb: true,
            ..CoinTemplate::default()
        },
    );
    let ntime = ntime_hex(&job);

    let (_, block_hex) = job
        .process_share(&worker(1e-12), "00000000", &ntime, "00000000", None)
        .unwrap();

    assert!(block_hex.unwrap().ends_with("01deadbeef"));
}

#[test]
fn previous_difficulty_covers_a_recent_retarget() {
    let job = job();
    let ntime = ntime_hex(&job);

    // the retarget just happened, so the old (trivial) difficulty still
    // applies even though the new one is unreachable
    let worker = WorkerContext {
        difficulty: 1e9,
        previous_difficulty: Some(1e-12),
        vardiff_updated_at: Some(now()),
        ..worker(1e9)
    };

    let (share, _) = job
        .process_share(&worker, "00000000", &ntime, "00000000", None)
        .unwrap();

    assert_eq!(share.difficulty, 1e-12);

    // a stale retarget no longer helps
    let worker = WorkerContext {
        vardiff_updated_at: Some(now() - 3600),
        ..worker
    };

    assert!(matches!(
        job.process_share(&worker, "00000001", &ntime, "00000000", None),
        Err(ShareError::LowDifficultyShare { .. })
    ));
}

#[test]
fn share_multiplier_divides_the_credited_difficulty() {
    let coin = CoinTemplate {
        share_multiplier: 65536.0,
        ..CoinTemplate::default()
    };

    let job = job_with(template(), coin);
    let ntime = ntime_hex(&job);

    let (share, _) = job
        .process_share(&worker(1e-9), "00000000", &ntime, "00000000", None)
        .unwrap();

    assert_eq!(share.difficulty, 1e-9 / 65536.0);
}

#[test]
fn notify_params_serialize_as_the_stratum_tuple() {
    let job = job();
    let params = serde_json::to_value(job.stratum_params(true)).unwrap();

    let array = params.as_array().unwrap();
    assert_eq!(array.len(), 9);
    assert_eq!(array[0], serde_json::json!("1"));
    assert_eq!(array[5], serde_json::json!("20000000"));
    assert_eq!(array[6], serde_json::json!("170d1ab4"));
    assert_eq!(array[8], serde_json::json!(true));

    // the coinbase halves reassemble around the default placeholder
    let initial = array[2].as_str().unwrap();
    let finale = array[3].as_str().unwrap();
    let spliced = format!("{initial}ab120401{:08x}{finale}", 0);
    let tx: bitcoin::Transaction = encode::deserialize_hex(&spliced).unwrap();
    assert_eq!(tx.input.len(), 1);
    assert_eq!(tx.output.len(), 1);
}
