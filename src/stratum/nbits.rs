use super::*;

/// Compact network target, forwarded to miners exactly as the template
/// carried it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, DeserializeFromStr, SerializeDisplay)]
pub struct Nbits(CompactTarget);

impl Nbits {
    pub fn to_compact(self) -> CompactTarget {
        self.0
    }

    pub fn to_target(self) -> Target {
        self.0.into()
    }
}

impl FromStr for Nbits {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(CompactTarget::from_unprefixed_hex(s)?))
    }
}

impl fmt::Display for Nbits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}", self.0.to_consensus())
    }
}

impl From<CompactTarget> for Nbits {
    fn from(compact: CompactTarget) -> Self {
        Self(compact)
    }
}

impl From<Nbits> for CompactTarget {
    fn from(nbits: Nbits) -> CompactTarget {
        nbits.0
    }
}
