use soroban_sdk::Env;

/// Source of the current unix time, in seconds.
pub trait Clock {
    fn now(&self) -> u64;
}

/// Ledger close time of the running invocation.
pub struct LedgerClock<'a> {
    env: &'a Env,
}

impl<'a> LedgerClock<'a> {
    pub fn new(env: &'a Env) -> Self {
        Self { env }
    }
}

impl Clock for LedgerClock<'_> {
    fn now(&self) -> u64 {
        self.env.ledger().timestamp()
    }
}

/// A clock that only moves when `set_time` is called.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FixedClock {
    now: u64,
}

impl FixedClock {
    pub fn new(now: u64) -> Self {
        Self { now }
    }

    pub fn set_time(&mut self, now: u64) {
        self.now = now;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> u64 {
        self.now
    }
}
