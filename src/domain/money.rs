//! Monetary amounts and payout arithmetic.
//!
//! All amounts are integer base units of the credit token; scaling to a
//! human-readable decimal form is the presentation layer's responsibility.

/// Credit-token amount in integer base units.
pub type Amount = u64;

/// Proportional share of a settled activity's pool for one winning ticket.
///
/// `stake * pool / winner_total` with the multiplication widened to u128 and
/// floor division. Truncation remainders stay in escrow; the result never
/// exceeds `pool` because `stake <= winner_total`.
///
/// # Panics
///
/// A winning ticket implies at least its own stake was recorded on the
/// winning choice, so `winner_total == 0` is an internal invariant violation
/// and asserted rather than handled.
pub(crate) fn proportional_payout(stake: Amount, pool: Amount, winner_total: Amount) -> Amount {
    assert!(
        winner_total > 0,
        "winning ticket exists but the winning choice has zero total stake"
    );
    let widened = u128::from(stake) * u128::from(pool) / u128::from(winner_total);
    // Bounded by pool, which is an Amount.
    widened as Amount
}
