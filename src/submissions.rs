use super::*;

/// The submission keys already seen for one job. Insertion is the only
/// mutation a job undergoes after construction, so it has to be an atomic
/// test-and-insert under concurrent submitters; everything else on the job
/// is shared read-only.
///
/// No eviction: jobs are superseded on the next template long before the
/// set grows past a few thousand entries.
#[derive(Debug, Default)]
pub struct SubmissionRegistry {
    seen: DashSet<String>,
}

impl SubmissionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `(extranonce1, extranonce2, ntime, nonce)`, returning false
    /// when the tuple was already submitted. Hex case differences do not
    /// make a submission novel.
    pub fn insert(
        &self,
        extranonce1: &str,
        extranonce2: &str,
        ntime: &str,
        nonce: &str,
    ) -> bool {
        let mut key = String::with_capacity(
            extranonce1.len() + extranonce2.len() + ntime.len() + nonce.len(),
        );

        for part in [extranonce1, extranonce2, ntime, nonce] {
            key.push_str(&part.to_ascii_lowercase());
        }

        self.seen.insert(key)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
