//! Per-contributor settlement step and batch aggregation.

use soroban_sdk::{contracttype, Address, Env};

use crate::fixed::{NativeAmount, TokenAmount};
use crate::presale::PresaleClient;
use crate::rate::RateConfig;
use crate::token::MintableTokenClient;
use crate::{DataKey, SettlementError, EVENT_BUYER_COMPENSATED};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    AlreadyCompensated,
    NoContribution,
}

/// Result of settling one contributor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Settled(TokenAmount),
    Skipped(SkipReason),
    Failed(SettlementError),
}

/// Totals for one `compensate` call.
#[contracttype]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompensationSummary {
    pub settled: u32,
    pub skipped: u32,
    pub tokens_minted: i128,
}

impl CompensationSummary {
    /// Fold one outcome in. A failure aborts the batch with its error.
    pub fn record(&mut self, outcome: Outcome) -> Result<(), SettlementError> {
        match outcome {
            Outcome::Settled(tokens) => {
                self.settled += 1;
                self.tokens_minted = self
                    .tokens_minted
                    .checked_add(tokens.raw())
                    .ok_or(SettlementError::Overflow)?;
            }
            Outcome::Skipped(_) => self.skipped += 1,
            Outcome::Failed(err) => return Err(err),
        }
        Ok(())
    }
}

pub fn is_compensated(env: &Env, contributor: &Address) -> bool {
    env.storage()
        .persistent()
        .get::<DataKey, bool>(&DataKey::Compensated(contributor.clone()))
        .unwrap_or(false)
}

/// Settles contributors at a fixed presale rate.
pub struct Distributor<'a> {
    env: &'a Env,
    rate: RateConfig,
    presale: PresaleClient<'a>,
    token: MintableTokenClient<'a>,
}

impl<'a> Distributor<'a> {
    pub fn new(env: &'a Env, rate: RateConfig, presale: &Address, token: &Address) -> Self {
        Self {
            env,
            rate,
            presale: PresaleClient::new(env, presale),
            token: MintableTokenClient::new(env, token),
        }
    }

    pub fn settle(&self, contributor: &Address) -> Outcome {
        self.try_settle(contributor).unwrap_or_else(Outcome::Failed)
    }

    fn try_settle(&self, contributor: &Address) -> Result<Outcome, SettlementError> {
        if is_compensated(self.env, contributor) {
            return Ok(Outcome::Skipped(SkipReason::AlreadyCompensated));
        }

        let contributed = NativeAmount::from_raw(self.presale.contribution_of(contributor))?;
        if contributed.is_zero() {
            return Ok(Outcome::Skipped(SkipReason::NoContribution));
        }

        let tokens = self.rate.native_to_token(self.env, contributed)?;
        if tokens.is_zero() {
            return Ok(Outcome::Skipped(SkipReason::NoContribution));
        }

        match self.token.try_mint(contributor, &tokens.raw()) {
            Ok(Ok(())) => {}
            _ => return Err(SettlementError::MintFailed),
        }

        self.mark_compensated(contributor, tokens)?;
        self.env
            .events()
            .publish((EVENT_BUYER_COMPENSATED, contributor.clone()), tokens.raw());
        Ok(Outcome::Settled(tokens))
    }

    fn mark_compensated(
        &self,
        contributor: &Address,
        tokens: TokenAmount,
    ) -> Result<(), SettlementError> {
        let storage = self.env.storage().persistent();
        storage.set(&DataKey::Compensated(contributor.clone()), &true);

        let count: u32 = storage.get(&DataKey::CompensatedCount).unwrap_or(0);
        storage.set(&DataKey::CompensatedCount, &count.saturating_add(1));

        let total: i128 = storage.get(&DataKey::TotalCompensated).unwrap_or(0);
        let total = total
            .checked_add(tokens.raw())
            .ok_or(SettlementError::Overflow)?;
        storage.set(&DataKey::TotalCompensated, &total);
        Ok(())
    }
}
