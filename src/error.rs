//! Error types for the crate.
//!
//! Every failure is returned to the immediate caller with enough context
//! (entity id, attempted amounts) to render a user-facing message. The engine
//! never retries and never leaves a multi-step operation partially applied.

use thiserror::Error;

use crate::domain::{AccountId, ActivityId, Amount, TicketId};

/// Errors surfaced by the external credit-token ledger.
///
/// The engine only moves the credit token; these are the failure modes of the
/// transfer primitives it consumes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("insufficient funds for {account}: required {required}, available {available}")]
    InsufficientFunds {
        account: AccountId,
        required: Amount,
        available: Amount,
    },

    #[error("insufficient allowance from {owner} to {spender}: required {required}, available {available}")]
    InsufficientAllowance {
        owner: AccountId,
        spender: AccountId,
        required: Amount,
        available: Amount,
    },

    #[error("airdrop already claimed by {account}")]
    AirdropAlreadyClaimed { account: AccountId },
}

/// Engine-level errors with structured variants.
///
/// Ledger failures propagate transparently via [`EngineError::Ledger`]; a
/// failed multi-step operation (bet placement, marketplace purchase) leaves
/// state exactly as it was before the call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("activity {activity_id} not found")]
    ActivityNotFound { activity_id: ActivityId },

    #[error("ticket {ticket_id} not found")]
    TicketNotFound { ticket_id: TicketId },

    #[error("choice {choice_index} out of range for activity {activity_id} ({choice_count} choices)")]
    InvalidChoice {
        activity_id: ActivityId,
        choice_index: usize,
        choice_count: usize,
    },

    #[error("activity {activity_id} is closed to new stakes")]
    ActivityClosed { activity_id: ActivityId },

    #[error("activity {activity_id} is already final")]
    AlreadyFinal { activity_id: ActivityId },

    #[error("activity {activity_id} is not settled")]
    ActivityNotSettled { activity_id: ActivityId },

    #[error("illegal status transition for activity {activity_id}")]
    InvalidTransition { activity_id: ActivityId },

    #[error("stake {requested} exceeds remaining capacity {remaining} of activity {activity_id}")]
    CapacityExceeded {
        activity_id: ActivityId,
        requested: Amount,
        remaining: Amount,
    },

    #[error("{claimed_by} does not own ticket {ticket_id}")]
    NotOwner {
        ticket_id: TicketId,
        claimed_by: AccountId,
    },

    #[error("{authority} may not settle or cancel activity {activity_id}")]
    NotAuthorized {
        activity_id: ActivityId,
        authority: AccountId,
    },

    #[error("ticket {ticket_id} has already been redeemed")]
    AlreadyRedeemed { ticket_id: TicketId },

    #[error("no listing for ticket {ticket_id}")]
    NoListing { ticket_id: TicketId },

    #[error("listing for ticket {ticket_id} is stale: the seller no longer owns it")]
    StaleListing { ticket_id: TicketId },

    #[error("ask price must be positive, got {ask_price}")]
    InvalidPrice { ask_price: Amount },

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Configuration-related errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, EngineError>;
