//! Scaled-integer amounts.
//!
//! Native-currency and token amounts carry 18 implied decimals, the token
//! price carries 6 (fiat micro-units) and fiat amounts are whole units. All
//! multiplications happen in 256 bits before the single final division, which
//! truncates toward zero.

use core::marker::PhantomData;

use soroban_sdk::{Env, U256};

use crate::SettlementError;

/// Implied decimals of native-currency and token amounts.
pub const NATIVE_DECIMALS: u32 = 18;
/// Implied decimals of the token price (fiat micro-units).
pub const MICRO_DECIMALS: u32 = 6;

/// Unit markers. They keep amounts of the same scale from mixing.
pub mod unit {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
    pub struct Native;
    #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
    pub struct Token;
    #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
    pub struct Fiat;
}

/// A non-negative amount of unit `U` stored as a count of `10^-DECIMALS` units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Scaled<const DECIMALS: u32, U> {
    raw: i128,
    unit: PhantomData<U>,
}

/// Native currency, smallest unit is `10^-18`.
pub type NativeAmount = Scaled<NATIVE_DECIMALS, unit::Native>;
/// Issued token, smallest unit is `10^-18`.
pub type TokenAmount = Scaled<NATIVE_DECIMALS, unit::Token>;
/// Fiat in micro-units; the token price is one of these per whole token.
pub type MicroFiat = Scaled<MICRO_DECIMALS, unit::Fiat>;
/// Whole fiat units.
pub type FiatAmount = Scaled<0, unit::Fiat>;

impl<const DECIMALS: u32, U> Scaled<DECIMALS, U> {
    /// Raw value of one whole unit.
    pub const ONE: i128 = 10i128.pow(DECIMALS);
    pub const ZERO: Self = Self {
        raw: 0,
        unit: PhantomData,
    };

    /// Wrap a raw smallest-unit value. Negative values are rejected.
    pub fn from_raw(raw: i128) -> Result<Self, SettlementError> {
        if raw < 0 {
            return Err(SettlementError::InvalidAmount);
        }
        Ok(Self {
            raw,
            unit: PhantomData,
        })
    }

    /// `units` whole units.
    pub fn whole(units: i128) -> Result<Self, SettlementError> {
        let raw = units
            .checked_mul(Self::ONE)
            .ok_or(SettlementError::Overflow)?;
        Self::from_raw(raw)
    }

    pub fn raw(self) -> i128 {
        self.raw
    }

    pub fn is_zero(self) -> bool {
        self.raw == 0
    }
}

/// `value * numerator / denominator`, truncated toward zero.
///
/// Both factors are below 2^127 so the 256-bit product cannot wrap. Fails with
/// `Overflow` when the quotient does not fit back into an `i128`.
pub fn mul_div_floor(
    env: &Env,
    value: i128,
    numerator: i128,
    denominator: i128,
) -> Result<i128, SettlementError> {
    if denominator <= 0 {
        return Err(SettlementError::InvalidAmount);
    }
    if value == 0 || numerator == 0 {
        return Ok(0);
    }
    let product = widen(env, value)?.mul(&widen(env, numerator)?);
    let quotient = product.div(&widen(env, denominator)?);
    quotient
        .to_u128()
        .and_then(|q| i128::try_from(q).ok())
        .ok_or(SettlementError::Overflow)
}

fn widen(env: &Env, value: i128) -> Result<U256, SettlementError> {
    let value = u128::try_from(value).map_err(|_| SettlementError::InvalidAmount)?;
    Ok(U256::from_u128(env, value))
}
