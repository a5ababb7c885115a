use super::*;

/// Header timestamp as stratum carries it: exactly 8 big-endian hex chars.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, DeserializeFromStr, SerializeDisplay,
)]
pub struct Ntime(u32);

impl FromStr for Ntime {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ensure!(s.len() == 8, "ntime must be 8 hex characters, got {}", s.len());
        Ok(Self(
            u32::from_str_radix(s, 16).with_context(|| format!("invalid ntime '{s}'"))?,
        ))
    }
}

impl fmt::Display for Ntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}", self.0)
    }
}

impl From<u32> for Ntime {
    fn from(n: u32) -> Self {
        Self(n)
    }
}

impl From<Ntime> for u32 {
    fn from(ntime: Ntime) -> u32 {
        ntime.0
    }
}

impl TryFrom<u64> for Ntime {
    type Error = std::num::TryFromIntError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Ok(Self(u32::try_from(value)?))
    }
}
