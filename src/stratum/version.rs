use super::*;

/// Block version as stratum carries it: 8 hex chars, bit-addressable for
/// version rolling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, DeserializeFromStr, SerializeDisplay)]
pub struct Version(u32);

impl Version {
    pub fn from_consensus(n: i32) -> Self {
        Self(n as u32)
    }

    pub fn to_consensus(self) -> i32 {
        self.0 as i32
    }

    pub fn bits(self) -> u32 {
        self.0
    }

    /// Bits of `self` that fall outside `mask`. Non-zero means the miner
    /// rolled bits it was never granted.
    pub fn disallowed(self, mask: Version) -> u32 {
        self.0 & !mask.0
    }

    /// Replace the masked bit range of `self` with `bits`.
    pub fn overlay(self, bits: Version, mask: Version) -> Version {
        Version((self.0 & !mask.0) | (bits.0 & mask.0))
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(
            u32::from_str_radix(s, 16).with_context(|| format!("invalid version '{s}'"))?,
        ))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}", self.0)
    }
}

impl From<u32> for Version {
    fn from(n: u32) -> Self {
        Self(n)
    }
}
