//! Shared harness for integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Once};

use chrono::{DateTime, Duration, Utc};

use mutuel::clock::{Clock, ManualClock};
use mutuel::config::EngineConfig;
use mutuel::domain::{AccountId, ActivityId, Amount};
use mutuel::engine::Engine;
use mutuel::ledger::InMemoryCreditLedger;

pub struct Harness {
    pub engine: Engine,
    pub ledger: Arc<InMemoryCreditLedger>,
    pub clock: Arc<ManualClock>,
    pub operator: AccountId,
}

/// Engine over an in-memory ledger and a manual clock, default policies.
pub fn start() -> Harness {
    start_with(EngineConfig::default())
}

pub fn start_with(config: EngineConfig) -> Harness {
    init_tracing();
    let ledger = Arc::new(InMemoryCreditLedger::new());
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let operator = config.operator.clone();
    let engine = Engine::with_clock(ledger.clone(), config, clock.clone());
    Harness {
        engine,
        ledger,
        clock,
        operator,
    }
}

// Opt in with e.g. RUST_LOG=mutuel=debug.
fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

impl Harness {
    /// Open an account with `balance` and approve the engine to spend all
    /// of it.
    pub fn fund(&self, name: &str, balance: Amount) -> AccountId {
        let account = AccountId::new(name);
        self.ledger.open_account(&account, balance);
        self.ledger.approve(&account, &self.operator, balance);
        account
    }

    pub fn deadline_in(&self, hours: i64) -> DateTime<Utc> {
        self.clock.now() + Duration::hours(hours)
    }

    /// A funded creator plus a two-choice activity with the given capacity,
    /// deadline one hour out.
    pub fn two_choice_activity(&self, capacity: Amount) -> (AccountId, ActivityId) {
        let creator = self.fund("creator", capacity * 10);
        let activity = self
            .engine
            .create_activity(
                &creator,
                vec!["A".into(), "B".into()],
                "test activity",
                capacity,
                self.deadline_in(1),
            )
            .expect("create activity");
        (creator, activity)
    }
}
