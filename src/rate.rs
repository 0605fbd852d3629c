//! Exchange-rate calculator with a time-locked fiat price.

use soroban_sdk::{contracttype, Env};

use crate::clock::Clock;
use crate::fixed::{mul_div_floor, FiatAmount, MicroFiat, NativeAmount, TokenAmount};
use crate::SettlementError;

/// Upper bound for either price. Keeps `price * 10^6` well inside an `i128`.
pub const MAX_PRICE: i128 = 1_000_000_000_000_000_000;

/// Prices used for every conversion.
///
/// `token_micro_price` and `lock_timestamp` are fixed at initialization.
/// `fiat_per_native_unit` may change only while the clock reads strictly
/// before `lock_timestamp`.
#[contracttype]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateConfig {
    /// Fiat micro-units per whole token (13_200 = 0.0132 fiat).
    pub token_micro_price: i128,
    /// Whole fiat units per whole native unit.
    pub fiat_per_native_unit: i128,
    /// Unix seconds from which `fiat_per_native_unit` is frozen.
    pub lock_timestamp: u64,
}

impl RateConfig {
    pub fn new(
        token_micro_price: i128,
        fiat_per_native_unit: i128,
        lock_timestamp: u64,
    ) -> Result<Self, SettlementError> {
        require_valid_price(token_micro_price)?;
        require_valid_price(fiat_per_native_unit)?;
        Ok(Self {
            token_micro_price,
            fiat_per_native_unit,
            lock_timestamp,
        })
    }

    /// The lock boundary itself counts as locked.
    pub fn is_locked(&self, clock: &impl Clock) -> bool {
        clock.now() >= self.lock_timestamp
    }

    /// Replace the fiat price and return the previous one.
    pub fn set_fiat_per_native_unit(
        &mut self,
        new_price: i128,
        clock: &impl Clock,
    ) -> Result<i128, SettlementError> {
        if self.is_locked(clock) {
            return Err(SettlementError::PriceLocked);
        }
        require_valid_price(new_price)?;
        let previous = self.fiat_per_native_unit;
        self.fiat_per_native_unit = new_price;
        Ok(previous)
    }

    /// Price of one whole token.
    pub fn token_price(&self) -> Result<MicroFiat, SettlementError> {
        MicroFiat::from_raw(self.token_micro_price)
    }

    /// Price of one whole native unit.
    pub fn native_price(&self) -> Result<FiatAmount, SettlementError> {
        FiatAmount::from_raw(self.fiat_per_native_unit)
    }

    /// `native * fiat_per_native_unit * 10^6 / token_micro_price`, floored.
    pub fn native_to_token(
        &self,
        env: &Env,
        native: NativeAmount,
    ) -> Result<TokenAmount, SettlementError> {
        let native_price = MicroFiat::whole(self.native_price()?.raw())?;
        let tokens = mul_div_floor(
            env,
            native.raw(),
            native_price.raw(),
            self.token_price()?.raw(),
        )?;
        TokenAmount::from_raw(tokens)
    }

    /// `fiat * 10^18 / fiat_per_native_unit`, floored.
    pub fn fiat_to_native(
        &self,
        env: &Env,
        fiat: FiatAmount,
    ) -> Result<NativeAmount, SettlementError> {
        let native = mul_div_floor(
            env,
            fiat.raw(),
            NativeAmount::ONE,
            self.native_price()?.raw(),
        )?;
        NativeAmount::from_raw(native)
    }
}

fn require_valid_price(price: i128) -> Result<(), SettlementError> {
    if price <= 0 || price > MAX_PRICE {
        return Err(SettlementError::InvalidAmount);
    }
    Ok(())
}
