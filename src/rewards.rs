use super::*;

/// Coinbase transaction version for masternode coinbases carrying a
/// special-transaction payload: type 5 in the high 16 bits, version 3
/// below.
const PAYLOAD_TX_VERSION: u32 = 3 | (5 << 16);

#[derive(Clone, Debug, PartialEq)]
pub struct RewardOutput {
    pub value: Amount,
    pub script: ScriptBuf,
}

/// The fully resolved coinbase output set for one template. Built once at
/// job construction so share processing never touches the template extras
/// again.
#[derive(Clone, Debug, PartialEq)]
pub struct RewardPlan {
    /// All outputs in emission order, the pool remainder last.
    pub outputs: Vec<RewardOutput>,

    /// What was left for the pool after every deducting split.
    pub reward_to_pool: Amount,

    pub tx_version: u32,

    pub coinbase_payload: Option<Vec<u8>>,
}

impl RewardPlan {
    /// Applies the coin's enabled splits in their fixed order: payee,
    /// masternode, founder, miner-dev-fund, miner-fund,
    /// community-autonomous, coinbase-dev-reward, foundation, community,
    /// data-mining, developer, then the pool remainder.
    pub fn resolve(
        template: &BlockTemplate,
        coin: &CoinTemplate,
        network: Network,
        pool_script: ScriptBuf,
    ) -> Result<Self> {
        let mut plan = Self {
            outputs: Vec::new(),
            reward_to_pool: template.coinbase_value,
            tx_version: coin.coinbase_tx_version,
            coinbase_payload: None,
        };

        let extra = &template.extra;

        if coin.has_payee {
            if let (Some(payee), Some(amount)) = (&extra.payee, extra.payee_amount) {
                plan.push(Amount::from_sat(amount), address_script(payee, network)?, true)?;
            }
        }

        if coin.has_masternodes {
            plan.split_masternodes(extra, network)?;
        }

        if coin.has_founder {
            if let Some(founder) = &extra.founder {
                plan.push_payee(founder, network, true)?;
            }
        }

        if coin.has_miner_dev_fund {
            plan.split_fund(extra.minerdevfund.as_ref(), network)?;
        }

        if coin.has_miner_fund {
            plan.split_fund(extra.minerfund.as_ref(), network)?;
        }

        if coin.has_community_autonomous {
            if let Some(community) = &extra.community_autonomous {
                plan.push(
                    Amount::from_sat(community.value),
                    address_script(&community.address, network)?,
                    true,
                )?;
            }
        }

        if coin.has_coinbase_dev_reward {
            if let Some(rewards) = &extra.coinbase_dev_reward {
                for reward in rewards.as_slice() {
                    plan.push(
                        Amount::from_sat(reward.value),
                        ScriptBuf::from_bytes(hex::decode(&reward.script_pubkey)?),
                        true,
                    )?;
                }
            }
        }

        if coin.has_foundation {
            if let Some(foundation) = &extra.foundation {
                plan.push_payee(foundation, network, true)?;
            }
        }

        if coin.has_community {
            if let Some(community) = &extra.community {
                for entry in community.as_slice() {
                    plan.push_payee(entry, network, true)?;
                }
            }
        }

        if coin.has_data_mining {
            if let Some(data_mining) = &extra.data_mining {
                for entry in data_mining.as_slice() {
                    plan.push_payee(entry, network, coin.data_mining_deducts)?;
                }
            }
        }

        if coin.has_developer {
            if let Some(developer) = &extra.developer {
                for entry in developer.as_slice() {
                    plan.push_payee(entry, network, true)?;
                }
            }
        }

        plan.outputs.push(RewardOutput {
            value: plan.reward_to_pool,
            script: pool_script,
        });

        Ok(plan)
    }

    fn split_masternodes(&mut self, extra: &TemplateExtra, network: Network) -> Result<()> {
        if let Some(masternode) = &extra.masternode {
            for entry in masternode.as_slice() {
                if entry.amount > 0 {
                    self.push_payee(entry, network, true)?;
                }
            }
        }

        if let Some(payload) = &extra.coinbase_payload {
            if !payload.is_empty() {
                self.tx_version = PAYLOAD_TX_VERSION;
                self.coinbase_payload =
                    Some(hex::decode(payload).context("coinbase payload is not hex")?);
            }
        }

        Ok(())
    }

    fn split_fund(&mut self, fund: Option<&FundParameters>, network: Network) -> Result<()> {
        let Some(fund) = fund else {
            return Ok(());
        };

        let Some(address) = fund.addresses.first() else {
            return Ok(());
        };

        self.push(
            Amount::from_sat(fund.minimum_value),
            address_script(address, network)?,
            true,
        )
    }

    fn push_payee(
        &mut self,
        entry: &PayeeParameters,
        network: Network,
        deducts: bool,
    ) -> Result<()> {
        let script = if let Some(script) = &entry.script {
            ScriptBuf::from_bytes(hex::decode(script)?)
        } else if let Some(payee) = &entry.payee {
            address_script(payee, network)?
        } else {
            bail!("reward entry names neither script nor payee");
        };

        self.push(Amount::from_sat(entry.amount), script, deducts)
    }

    fn push(&mut self, value: Amount, script: ScriptBuf, deducts: bool) -> Result<()> {
        if deducts {
            self.reward_to_pool = self.reward_to_pool.checked_sub(value).with_context(|| {
                format!("reward split of {value} exceeds remaining pool reward")
            })?;
        }

        self.outputs.push(RewardOutput { value, script });

        Ok(())
    }
}

fn address_script(address: &str, network: Network) -> Result<ScriptBuf> {
    Ok(address
        .parse::<Address<NetworkUnchecked>>()
        .with_context(|| format!("invalid reward address '{address}'"))?
        .require_network(network)
        .with_context(|| format!("reward address '{address}' is for the wrong network"))?
        .script_pubkey())
}
