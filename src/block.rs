use super::*;

/// Serializes a full block for `submitblock`: header, transaction count,
/// coinbase, then the template transactions verbatim, plus whatever
/// trailer the coin's consensus demands.
pub(crate) fn serialize_block(
    header: &[u8],
    coinbase: &[u8],
    template: &BlockTemplate,
    coin: &CoinTemplate,
) -> Result<Vec<u8>> {
    let mut block = Vec::with_capacity(header.len() + coinbase.len() + 1024);

    block.extend_from_slice(header);
    block.extend_from_slice(&consensus::serialize(&VarInt(
        template.transactions.len() as u64 + 1,
    )));
    block.extend_from_slice(coinbase);

    for tx in &template.transactions {
        block.extend_from_slice(&tx.raw()?);
    }

    // proof-of-stake daemons fill a trailing signature slot on submission
    if coin.is_pos {
        block.push(0x00);
    }

    if coin.has_mweb {
        if let Some(mweb) = &template.extra.mweb {
            if !mweb.is_empty() {
                block.push(0x01);
                block.extend_from_slice(&hex::decode(mweb).context("mweb payload is not hex")?);
            }
        }
    }

    Ok(block)
}
