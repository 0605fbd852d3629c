use soroban_sdk::{contractclient, Address, Env};

/// Read-only view of the presale contract's contribution ledger.
#[contractclient(name = "PresaleClient")]
pub trait PresaleLedger {
    /// Native amount (18 decimals) sent by `contributor`; 0 when unknown.
    fn contribution_of(env: Env, contributor: Address) -> i128;
}
