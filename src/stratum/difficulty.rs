use super::*;

/// Bitcoin's maximum target, the denominator of difficulty 1. Coins that
/// scale differently override it via `CoinTemplate::diff1`.
pub static BITCOIN_DIFF1: LazyLock<U256> =
    LazyLock::new(|| U256::from_big_endian(&Target::MAX.to_be_bytes()));

/// Lossy but monotonic conversion; plenty for share accounting, which has
/// always been double-precision on the wire.
pub fn u256_to_f64(value: U256) -> f64 {
    value
        .0
        .iter()
        .rev()
        .fold(0.0, |acc, &limb| acc * 2f64.powi(64) + limb as f64)
}

/// Difficulty met by a header hash, scaled by the coin's share multiplier.
/// A lower hash means a higher difficulty.
pub fn share_difficulty(diff1: U256, header_value: U256, multiplier: f64) -> f64 {
    if header_value.is_zero() {
        return f64::INFINITY;
    }

    u256_to_f64(diff1) / u256_to_f64(header_value) * multiplier
}
