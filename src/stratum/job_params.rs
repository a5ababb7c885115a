use {super::*, serde::ser::SerializeSeq};

/// The nine-element job tuple pushed to miners in `mining.notify`, in wire
/// order. Serializes as a JSON array, never an object.
#[derive(Clone, Debug, PartialEq)]
pub struct JobParams {
    pub job_id: JobId,
    pub prev_hash: PrevHash,
    pub coinbase_initial: String,
    pub coinbase_final: String,
    pub merkle_branches: Vec<MerkleNode>,
    pub version: Version,
    pub nbits: Nbits,
    pub ntime: Ntime,
    pub clean_jobs: bool,
}

impl Serialize for JobParams {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(9))?;
        seq.serialize_element(&self.job_id)?;
        seq.serialize_element(&self.prev_hash)?;
        seq.serialize_element(&self.coinbase_initial)?;
        seq.serialize_element(&self.coinbase_final)?;
        seq.serialize_element(&self.merkle_branches)?;
        seq.serialize_element(&self.version)?;
        seq.serialize_element(&self.nbits)?;
        seq.serialize_element(&self.ntime)?;
        seq.serialize_element(&self.clean_jobs)?;
        seq.end()
    }
}

impl<'de> Deserialize<'de> for JobParams {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (
            job_id,
            prev_hash,
            coinbase_initial,
            coinbase_final,
            merkle_branches,
            version,
            nbits,
            ntime,
            clean_jobs,
        ) = <(
            JobId,
            PrevHash,
            String,
            String,
            Vec<MerkleNode>,
            Version,
            Nbits,
            Ntime,
            bool,
        )>::deserialize(deserializer)?;

        Ok(Self {
            job_id,
            prev_hash,
            coinbase_initial,
            coinbase_final,
            merkle_branches,
            version,
            nbits,
            ntime,
            clean_jobs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> JobParams {
        JobParams {
            job_id: JobId::new(0xbf),
            prev_hash: "4d16b6f85af6e2198f44ae2a6de67f78487ae5611b77c6c0440b921e00000000"
                .parse()
                .unwrap(),
            coinbase_initial: "0100000001".into(),
            coinbase_final: "ffffffff00".into(),
            merkle_branches: vec![MerkleNode::from_byte_array([0x11; 32])],
            version: Version::from_consensus(0x20000000),
            nbits: "170d1ab4".parse().unwrap(),
            ntime: "665f1e2c".parse().unwrap(),
            clean_jobs: true,
        }
    }

    #[test]
    fn serializes_as_nine_element_array() {
        let value = serde_json::to_value(params()).unwrap();

        assert_eq!(
            value,
            serde_json::json!([
                "bf",
                "4d16b6f85af6e2198f44ae2a6de67f78487ae5611b77c6c0440b921e00000000",
                "0100000001",
                "ffffffff00",
                ["1111111111111111111111111111111111111111111111111111111111111111"],
                "20000000",
                "170d1ab4",
                "665f1e2c",
                true
            ])
        );
    }

    #[test]
    fn round_trips() {
        let params = params();
        let json = serde_json::to_string(&params).unwrap();
        assert_eq!(serde_json::from_str::<JobParams>(&json).unwrap(), params);
    }

    #[test]
    fn rejects_wrong_arity() {
        assert!(serde_json::from_str::<JobParams>(r#"["bf","00"]"#).is_err());
    }
}
