use super::*;

/// Share rejection reasons surfaced to the stratum layer. The numeric
/// codes are the ones Bitcoin-family pools answer `mining.submit` with,
/// so they live here even though some of them (stale job, authorization)
/// are raised by the connection layer rather than the job itself.
#[derive(Debug, Clone, PartialEq, Display)]
pub enum ShareError {
    #[display("{message}")]
    Other { message: String },

    #[display("job not found")]
    JobNotFound,

    #[display("duplicate share")]
    DuplicateShare,

    #[display("low difficulty share ({difficulty})")]
    LowDifficultyShare { difficulty: f64 },

    #[display("unauthorized worker")]
    UnauthorizedWorker,

    #[display("not subscribed")]
    NotSubscribed,
}

impl ShareError {
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            Self::Other { .. } => 20,
            Self::JobNotFound => 21,
            Self::DuplicateShare => 22,
            Self::LowDifficultyShare { .. } => 23,
            Self::UnauthorizedWorker => 24,
            Self::NotSubscribed => 25,
        }
    }
}

impl std::error::Error for ShareError {}

/// Serializes as `[code, message, null]`, the error triple stratum
/// responses carry.
impl Serialize for ShareError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (self.code(), self.to_string(), Option::<()>::None).serialize(serializer)
    }
}
