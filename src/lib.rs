#![no_std]
#![deny(unsafe_code)]
#![deny(clippy::dbg_macro, clippy::todo, clippy::unimplemented)]
use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, symbol_short, Address, Env, Symbol, Vec,
};

pub mod clock;
pub mod distributor;
pub mod fixed;
pub mod presale;
pub mod rate;
pub mod token;

use clock::LedgerClock;
use distributor::Distributor;
use fixed::{FiatAmount, NativeAmount};
use token::MintableTokenClient;

pub use distributor::{CompensationSummary, Outcome, SkipReason};
pub use rate::RateConfig;

/// Centralized contract error codes. Missing signatures are signaled by host panic (require_auth).
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
#[repr(u32)]
pub enum SettlementError {
    /// `initialize` was already called.
    AlreadyInitialized = 1,
    /// Contract is not initialized (owner, prices or collaborators missing).
    NotInitialized = 2,
    /// Caller does not hold the role required for this action.
    NotAuthorized = 3,
    /// Fiat price can no longer change: the lock timestamp has been reached.
    PriceLocked = 4,
    /// Price outside `1..=MAX_PRICE`, or a negative amount.
    InvalidAmount = 5,
    /// The token contract refused to mint.
    MintFailed = 6,
    /// A conversion result does not fit in an i128.
    Overflow = 7,
}

// ── Event symbols ────────────────────────────────────────────
const EVENT_INIT: Symbol = symbol_short!("init");
const EVENT_PRICE_SET: Symbol = symbol_short!("price_set");
const EVENT_OWNER_TRANSFERRED: Symbol = symbol_short!("own_xfer");
const EVENT_PRICE_SETTER_SET: Symbol = symbol_short!("setter");
/// Presale buyer compensated: topics (symbol, contributor), data token amount.
pub(crate) const EVENT_BUYER_COMPENSATED: Symbol = symbol_short!("buyer_cmp");

/// Contract version identifier. Bumped when storage or semantics change.
pub const CONTRACT_VERSION: u32 = 1;

#[contracttype]
pub enum DataKey {
    /// May compensate buyers, transfer ownership and reassign the price setter.
    Owner,
    /// May update the fiat price before the lock.
    PriceSetter,
    /// Mint-capable sale token.
    Token,
    /// Presale contract holding the contributions.
    Presale,
    /// Prices and lock timestamp.
    RateConfig,
    /// Set once a contributor has been paid; never cleared.
    Compensated(Address),
    /// Number of contributors paid so far.
    CompensatedCount,
    /// Token units minted to contributors so far.
    TotalCompensated,
}

// ── Contract ─────────────────────────────────────────────────
#[contract]
pub struct PresaleDistributor;

#[contractimpl]
impl PresaleDistributor {
    fn require_owner(env: &Env, caller: &Address) -> Result<(), SettlementError> {
        caller.require_auth();
        let owner = Self::get_owner(env.clone()).ok_or(SettlementError::NotInitialized)?;
        if *caller != owner {
            return Err(SettlementError::NotAuthorized);
        }
        Ok(())
    }

    fn load_rate_config(env: &Env) -> Result<RateConfig, SettlementError> {
        env.storage()
            .persistent()
            .get(&DataKey::RateConfig)
            .ok_or(SettlementError::NotInitialized)
    }

    fn load_address(env: &Env, key: &DataKey) -> Result<Address, SettlementError> {
        env.storage()
            .persistent()
            .get(key)
            .ok_or(SettlementError::NotInitialized)
    }

    /// One-shot setup. `token_micro_price` is the presale price used for every
    /// compensation; `lock_timestamp` is the instant the fiat price freezes.
    pub fn initialize(
        env: Env,
        owner: Address,
        price_setter: Address,
        token: Address,
        presale: Address,
        token_micro_price: i128,
        fiat_per_native_unit: i128,
        lock_timestamp: u64,
    ) -> Result<(), SettlementError> {
        let storage = env.storage().persistent();
        if storage.has(&DataKey::Owner) {
            return Err(SettlementError::AlreadyInitialized);
        }
        let config = RateConfig::new(token_micro_price, fiat_per_native_unit, lock_timestamp)?;

        storage.set(&DataKey::Owner, &owner);
        storage.set(&DataKey::PriceSetter, &price_setter);
        storage.set(&DataKey::Token, &token);
        storage.set(&DataKey::Presale, &presale);
        storage.set(&DataKey::RateConfig, &config);

        env.events()
            .publish((EVENT_INIT, owner), (price_setter, token, presale));
        Ok(())
    }

    // ── Compensation ──────────────────────────────────────────

    /// Pay every listed presale contributor who has not been paid yet.
    ///
    /// Already-paid and zero-contribution addresses are skipped. If the token
    /// refuses a mint the whole call fails, so nobody in the batch is marked
    /// paid and the batch can be retried.
    pub fn compensate(
        env: Env,
        caller: Address,
        contributors: Vec<Address>,
    ) -> Result<CompensationSummary, SettlementError> {
        Self::require_owner(&env, &caller)?;

        let rate = Self::load_rate_config(&env)?;
        let presale = Self::load_address(&env, &DataKey::Presale)?;
        let token = Self::load_address(&env, &DataKey::Token)?;
        let distributor = Distributor::new(&env, rate, &presale, &token);

        let mut summary = CompensationSummary::default();
        for contributor in contributors.iter() {
            summary.record(distributor.settle(&contributor))?;
        }
        Ok(summary)
    }

    /// Return true once `contributor` has been paid.
    pub fn is_compensated(env: Env, contributor: Address) -> bool {
        distributor::is_compensated(&env, &contributor)
    }

    pub fn get_compensated_count(env: Env) -> u32 {
        env.storage()
            .persistent()
            .get(&DataKey::CompensatedCount)
            .unwrap_or(0)
    }

    /// Token units minted to presale contributors so far.
    pub fn get_total_compensated(env: Env) -> i128 {
        env.storage()
            .persistent()
            .get(&DataKey::TotalCompensated)
            .unwrap_or(0)
    }

    /// Total supply reported by the sale token.
    pub fn token_total_supply(env: Env) -> Result<i128, SettlementError> {
        let token = Self::load_address(&env, &DataKey::Token)?;
        Ok(MintableTokenClient::new(&env, &token).total_supply())
    }

    // ── Exchange rate ─────────────────────────────────────────

    /// Update whole fiat units per native unit. Price setter only, and only
    /// strictly before the lock timestamp.
    pub fn set_fiat_per_native_unit(
        env: Env,
        caller: Address,
        new_price: i128,
    ) -> Result<(), SettlementError> {
        caller.require_auth();
        let setter = Self::load_address(&env, &DataKey::PriceSetter)?;
        if caller != setter {
            return Err(SettlementError::NotAuthorized);
        }

        let mut config = Self::load_rate_config(&env)?;
        let previous = config.set_fiat_per_native_unit(new_price, &LedgerClock::new(&env))?;
        env.storage().persistent().set(&DataKey::RateConfig, &config);

        env.events()
            .publish((EVENT_PRICE_SET, caller), (previous, new_price));
        Ok(())
    }

    /// Tokens (18 decimals) bought by `native_amount` (18 decimals), floored.
    pub fn native_to_token(env: Env, native_amount: i128) -> Result<i128, SettlementError> {
        let config = Self::load_rate_config(&env)?;
        let tokens = config.native_to_token(&env, NativeAmount::from_raw(native_amount)?)?;
        Ok(tokens.raw())
    }

    /// Native amount (18 decimals) worth `fiat_amount` whole fiat units, floored.
    pub fn fiat_to_native(env: Env, fiat_amount: i128) -> Result<i128, SettlementError> {
        let config = Self::load_rate_config(&env)?;
        let native = config.fiat_to_native(&env, FiatAmount::from_raw(fiat_amount)?)?;
        Ok(native.raw())
    }

    pub fn get_rate_config(env: Env) -> Option<RateConfig> {
        env.storage().persistent().get(&DataKey::RateConfig)
    }

    /// Return true once the fiat price can no longer change.
    pub fn is_price_locked(env: Env) -> Result<bool, SettlementError> {
        let config = Self::load_rate_config(&env)?;
        Ok(config.is_locked(&LedgerClock::new(&env)))
    }

    // ── Roles ─────────────────────────────────────────────────

    /// Hand ownership to `new_owner`. Owner only.
    pub fn transfer_ownership(
        env: Env,
        caller: Address,
        new_owner: Address,
    ) -> Result<(), SettlementError> {
        Self::require_owner(&env, &caller)?;
        env.storage().persistent().set(&DataKey::Owner, &new_owner);
        env.events()
            .publish((EVENT_OWNER_TRANSFERRED, caller), new_owner);
        Ok(())
    }

    /// Replace the account allowed to update the fiat price. Owner only.
    pub fn set_price_setter(
        env: Env,
        caller: Address,
        new_setter: Address,
    ) -> Result<(), SettlementError> {
        Self::require_owner(&env, &caller)?;
        env.storage()
            .persistent()
            .set(&DataKey::PriceSetter, &new_setter);
        env.events()
            .publish((EVENT_PRICE_SETTER_SET, caller), new_setter);
        Ok(())
    }

    pub fn get_owner(env: Env) -> Option<Address> {
        env.storage().persistent().get(&DataKey::Owner)
    }

    pub fn get_price_setter(env: Env) -> Option<Address> {
        env.storage().persistent().get(&DataKey::PriceSetter)
    }

    pub fn get_token(env: Env) -> Option<Address> {
        env.storage().persistent().get(&DataKey::Token)
    }

    pub fn get_presale(env: Env) -> Option<Address> {
        env.storage().persistent().get(&DataKey::Presale)
    }

    /// Return the current contract version.
    pub fn get_version(env: Env) -> u32 {
        let _ = env;
        CONTRACT_VERSION
    }
}

mod test_auth;
