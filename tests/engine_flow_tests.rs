//! End-to-end flows: bet placement, settlement, cancellation, redemption.

mod support;

use chrono::Duration;

use mutuel::clock::Clock;
use mutuel::domain::{ActivityStatus, Amount};
use mutuel::error::{EngineError, LedgerError};
use mutuel::ledger::CreditLedger;

#[test]
fn full_settlement_flow_pays_pool_to_winner() {
    let h = support::start();
    let (creator, activity) = h.two_choice_activity(100);
    let x = h.fund("x", 1_000);
    let y = h.fund("y", 1_000);

    let tx = h.engine.place_bet(activity, 0, 60, &x).unwrap();
    let ty = h.engine.place_bet(activity, 1, 40, &y).unwrap();

    let snapshot = h.engine.activity(activity).unwrap();
    assert_eq!(snapshot.remaining_capacity, 0);
    assert_eq!(snapshot.per_choice_total, vec![60, 40]);
    assert_eq!(snapshot.total_pool(), 100);

    // Capacity is exhausted.
    let overflow = h.engine.place_bet(activity, 0, 1, &x).unwrap_err();
    assert!(matches!(
        overflow,
        EngineError::CapacityExceeded {
            requested: 1,
            remaining: 0,
            ..
        }
    ));

    h.engine.settle(activity, 0, &creator).unwrap();
    assert_eq!(
        h.engine.activity(activity).unwrap().status,
        ActivityStatus::Settled { winning_choice: 0 }
    );

    // X: 60 * 100 / 60 = 100. Y: losing ticket pays zero.
    assert_eq!(h.engine.redeem(tx, &x).unwrap(), 100);
    assert_eq!(h.engine.redeem(ty, &y).unwrap(), 0);

    assert_eq!(h.ledger.balance_of(&x), 1_000 - 60 + 100);
    assert_eq!(h.ledger.balance_of(&y), 1_000 - 40);

    // Losing tickets are marked redeemed too.
    let second = h.engine.redeem(ty, &y).unwrap_err();
    assert!(matches!(second, EngineError::AlreadyRedeemed { .. }));
}

#[test]
fn winning_ticket_redeems_once() {
    let h = support::start();
    let (creator, activity) = h.two_choice_activity(100);
    let x = h.fund("x", 100);
    let y = h.fund("y", 100);

    let tx = h.engine.place_bet(activity, 0, 60, &x).unwrap();
    h.engine.place_bet(activity, 1, 40, &y).unwrap();
    h.engine.settle(activity, 0, &creator).unwrap();

    assert_eq!(h.engine.redeem(tx, &x).unwrap(), 100);
    assert!(matches!(
        h.engine.redeem(tx, &x).unwrap_err(),
        EngineError::AlreadyRedeemed { .. }
    ));
    assert_eq!(h.ledger.balance_of(&x), 100 - 60 + 100);
}

#[test]
fn cancellation_refunds_exact_stakes() {
    let h = support::start();
    let (creator, activity) = h.two_choice_activity(100);
    let x = h.fund("x", 1_000);
    let y = h.fund("y", 1_000);

    let tx = h.engine.place_bet(activity, 0, 60, &x).unwrap();
    let ty = h.engine.place_bet(activity, 1, 40, &y).unwrap();

    h.engine.cancel(activity, &creator).unwrap();

    assert_eq!(h.engine.redeem(tx, &x).unwrap(), 60);
    assert_eq!(h.engine.redeem(ty, &y).unwrap(), 40);
    assert_eq!(h.ledger.balance_of(&x), 1_000);
    assert_eq!(h.ledger.balance_of(&y), 1_000);
}

#[test]
fn redeem_requires_settlement() {
    let h = support::start();
    let (_creator, activity) = h.two_choice_activity(100);
    let x = h.fund("x", 100);
    let ticket = h.engine.place_bet(activity, 0, 10, &x).unwrap();

    let err = h.engine.redeem(ticket, &x).unwrap_err();
    assert!(matches!(err, EngineError::ActivityNotSettled { .. }));
}

#[test]
fn redeem_requires_ownership() {
    let h = support::start();
    let (creator, activity) = h.two_choice_activity(100);
    let x = h.fund("x", 100);
    let mallory = h.fund("mallory", 100);
    let ticket = h.engine.place_bet(activity, 0, 10, &x).unwrap();
    h.engine.settle(activity, 0, &creator).unwrap();

    let err = h.engine.redeem(ticket, &mallory).unwrap_err();
    assert!(matches!(err, EngineError::NotOwner { .. }));

    // A transferred ticket redeems for its new owner.
    h.engine.transfer_ticket(ticket, &x, &mallory).unwrap();
    assert!(h.engine.redeem(ticket, &mallory).is_ok());
}

#[test]
fn failed_debit_rolls_back_reservation() {
    let h = support::start();
    let (_creator, activity) = h.two_choice_activity(100);

    // Funded but with no allowance for the engine.
    let broke = mutuel::domain::AccountId::new("broke");
    h.ledger.open_account(&broke, 1_000);

    let err = h.engine.place_bet(activity, 0, 30, &broke).unwrap_err();
    assert!(matches!(
        err,
        EngineError::Ledger(LedgerError::InsufficientAllowance { .. })
    ));

    let snapshot = h.engine.activity(activity).unwrap();
    assert_eq!(snapshot.remaining_capacity, 100);
    assert_eq!(snapshot.per_choice_total, vec![0, 0]);
    assert!(h.engine.tickets_of(&broke).is_empty());
    assert_eq!(h.ledger.balance_of(&broke), 1_000);
}

#[test]
fn capacity_invariant_holds_after_every_mutation() {
    let h = support::start();
    let (_creator, activity) = h.two_choice_activity(100);
    let x = h.fund("x", 1_000);

    let check = |stage: &str| {
        let a = h.engine.activity(activity).unwrap();
        assert_eq!(
            a.per_choice_total.iter().sum::<Amount>() + a.remaining_capacity,
            a.capacity,
            "invariant broken after {stage}"
        );
    };

    check("creation");
    h.engine.place_bet(activity, 0, 33, &x).unwrap();
    check("first bet");
    h.engine.place_bet(activity, 1, 67, &x).unwrap();
    check("second bet");
    h.engine.place_bet(activity, 0, 1, &x).unwrap_err();
    check("rejected bet");
}

#[test]
fn rounding_dust_is_order_independent() {
    // Pool of 3 split between two winners staking 1 each: each gets
    // 1*3/2 = 1, and 1 unit of dust stays in escrow either way.
    let run = |first_w1: bool| -> (Amount, Amount) {
        let h = support::start();
        let (creator, activity) = h.two_choice_activity(10);
        let w1 = h.fund("w1", 10);
        let w2 = h.fund("w2", 10);
        let loser = h.fund("loser", 10);

        let t1 = h.engine.place_bet(activity, 0, 1, &w1).unwrap();
        let t2 = h.engine.place_bet(activity, 0, 1, &w2).unwrap();
        h.engine.place_bet(activity, 1, 1, &loser).unwrap();
        h.engine.settle(activity, 0, &creator).unwrap();

        if first_w1 {
            let a = h.engine.redeem(t1, &w1).unwrap();
            let b = h.engine.redeem(t2, &w2).unwrap();
            (a, b)
        } else {
            let b = h.engine.redeem(t2, &w2).unwrap();
            let a = h.engine.redeem(t1, &w1).unwrap();
            (a, b)
        }
    };

    let (a1, b1) = run(true);
    let (a2, b2) = run(false);
    assert_eq!((a1, b1), (a2, b2));
    assert_eq!(a1 + b1, 2);
    // Payouts never exceed the pool.
    assert!(a1 + b1 <= 3);
}

#[test]
fn bets_after_deadline_are_rejected() {
    let h = support::start();
    let (_creator, activity) = h.two_choice_activity(100);
    let x = h.fund("x", 100);

    h.clock.advance(Duration::hours(2));
    let err = h.engine.place_bet(activity, 0, 10, &x).unwrap_err();
    assert!(matches!(err, EngineError::ActivityClosed { .. }));
}

#[test]
fn create_activity_rejects_bad_shapes() {
    let h = support::start();
    let creator = h.fund("creator", 1_000);

    let single = h.engine.create_activity(
        &creator,
        vec!["only".into()],
        "",
        100,
        h.deadline_in(1),
    );
    assert!(matches!(single, Err(EngineError::InvalidInput { .. })));

    let past = h.engine.create_activity(
        &creator,
        vec!["A".into(), "B".into()],
        "",
        100,
        h.clock.now() - Duration::hours(1),
    );
    assert!(matches!(past, Err(EngineError::InvalidInput { .. })));

    let free = h.engine.create_activity(
        &creator,
        vec!["A".into(), "B".into()],
        "",
        0,
        h.deadline_in(1),
    );
    assert!(matches!(free, Err(EngineError::InvalidInput { .. })));

    // Nothing was recorded or debited.
    assert_eq!(h.engine.activity_count(), 0);
    assert_eq!(h.ledger.balance_of(&creator), 1_000);
}

#[test]
fn create_activity_prefunds_escrow_from_creator() {
    let h = support::start();
    let creator = h.fund("creator", 500);
    h.engine
        .create_activity(
            &creator,
            vec!["A".into(), "B".into()],
            "prefund",
            200,
            h.deadline_in(1),
        )
        .unwrap();

    assert_eq!(h.ledger.balance_of(&creator), 300);
}

#[test]
fn settle_rejects_bad_winner_and_double_settle() {
    let h = support::start();
    let (creator, activity) = h.two_choice_activity(100);

    let bad = h.engine.settle(activity, 2, &creator).unwrap_err();
    assert!(matches!(bad, EngineError::InvalidChoice { .. }));

    h.engine.settle(activity, 1, &creator).unwrap();
    let again = h.engine.settle(activity, 0, &creator).unwrap_err();
    assert!(matches!(again, EngineError::AlreadyFinal { .. }));

    let cancel_after = h.engine.cancel(activity, &creator).unwrap_err();
    assert!(matches!(cancel_after, EngineError::AlreadyFinal { .. }));
}

#[test]
fn choice_totals_are_queryable() {
    let h = support::start();
    let (_creator, activity) = h.two_choice_activity(100);
    let x = h.fund("x", 100);
    h.engine.place_bet(activity, 1, 25, &x).unwrap();

    assert_eq!(h.engine.choice_total(activity, 0).unwrap(), 0);
    assert_eq!(h.engine.choice_total(activity, 1).unwrap(), 25);
    assert!(matches!(
        h.engine.choice_total(activity, 5),
        Err(EngineError::InvalidChoice { .. })
    ));
}

#[test]
fn airdropped_newcomer_can_bet() {
    let h = support::start();
    let (_creator, activity) = h.two_choice_activity(100);

    let newcomer = mutuel::domain::AccountId::new("newcomer");
    let granted = h.ledger.claim_airdrop(&newcomer).unwrap();
    h.ledger.approve(&newcomer, &h.operator, granted);

    h.engine.place_bet(activity, 0, 50, &newcomer).unwrap();
    assert_eq!(h.ledger.balance_of(&newcomer), granted - 50);

    assert!(matches!(
        h.ledger.claim_airdrop(&newcomer),
        Err(LedgerError::AirdropAlreadyClaimed { .. })
    ));
}

#[test]
fn owner_index_tracks_mints_and_transfers() {
    let h = support::start();
    let (_creator, activity) = h.two_choice_activity(100);
    let x = h.fund("x", 100);
    let y = h.fund("y", 100);

    let t1 = h.engine.place_bet(activity, 0, 10, &x).unwrap();
    let t2 = h.engine.place_bet(activity, 1, 10, &x).unwrap();
    assert_eq!(h.engine.tickets_of(&x), vec![t1, t2]);

    h.engine.transfer_ticket(t1, &x, &y).unwrap();
    assert_eq!(h.engine.tickets_of(&x), vec![t2]);
    assert_eq!(h.engine.tickets_of(&y), vec![t1]);

    let ticket = h.engine.ticket(t1).unwrap();
    assert_eq!(ticket.owner, y);
    assert_eq!(ticket.activity_id, activity);
    assert_eq!(ticket.stake, 10);
}
