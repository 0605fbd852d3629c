use soroban_sdk::{contractclient, Address, Env};

/// The slice of the sale token this contract relies on.
///
/// The distributor must hold the mint capability. A Stellar Asset Contract
/// administered by the distributor satisfies `mint`.
#[contractclient(name = "MintableTokenClient")]
pub trait MintableToken {
    fn mint(env: Env, to: Address, amount: i128);
    fn total_supply(env: Env) -> i128;
}
