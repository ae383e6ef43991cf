//! Small loan against a large price move, and malformed price submissions

use ledger_state::Command;
use vaultline_common::{LedgerError, VaultId};
use vaultline_integration_tests::*;
use vaultline_oracle::FeedStatus;
use vaultline_vault::VaultState;

/// Blocks 1..=18: prices go live at 10, a 0.008 GOOGL loan is taken at 7,
/// both feeds jump to 2747.81 at 8 and settle by 18.
fn small_loan_chain() -> Chain {
    let mut chain = Chain::new();
    chain.block(bootstrap_loans());
    chain.block(vec![submit(0, time_at(2), &[("DFI/USD", "10"), ("GOOGL/USD", "10")])]);
    chain.advance_to(6);
    let receipt = chain.block(vec![Command::TakeLoan { vault: VaultId(0), token: token("GOOGL"), amount: amt("0.008") }]);
    assert_eq!(receipt.applied, vec![0]);
    chain.block(vec![submit(0, time_at(8), &[("DFI/USD", "2747.81"), ("GOOGL/USD", "2747.81")])]);
    chain.advance_to(18);
    chain
}

#[test]
fn test_first_prices_live_at_boundary() {
    let mut chain = Chain::new();
    chain.block(bootstrap_loans());
    chain.block(vec![submit(0, time_at(2), &[("DFI/USD", "10"), ("GOOGL/USD", "10")])]);
    chain.advance_to(5);
    assert_eq!(chain.snapshot.feed(&feed("DFI/USD")).unwrap().status, FeedStatus::Unset);

    let receipt = chain.block(vec![]);
    assert_eq!(receipt.height, 6);
    assert!(receipt.price_updates.contains(&(feed("DFI/USD"), FeedStatus::Live)));
    assert_eq!(chain.snapshot.feed(&feed("GOOGL/USD")).unwrap().active, Some(amt("10")));
}

#[test]
fn test_small_loan_valued_at_new_price() {
    let mut chain = small_loan_chain();

    let view = chain.snapshot.get_vault(VaultId(0)).unwrap();
    assert_eq!(view.collateral_value, Some(amt("2747.81")));
    assert_eq!(view.loan_value, Some(amt("21.98248")));
    assert_eq!(view.ratio, Some(amt("12500")));
    let loan = view.loans[&token("GOOGL")];
    assert_eq!(loan.principal, amt("0.008"));
    assert!(loan.interest.is_zero());

    assert_eq!(chain.snapshot.balance(&owner("alice"), &token("GOOGL")), amt("0.008"));
    assert_eq!(chain.snapshot.balance(&owner("alice"), &token("DFI")), amt("9"));

    // per-block interest on 0.008 at 6% truncates to zero
    chain.advance_to(127);
    let view = chain.snapshot.get_vault(VaultId(0)).unwrap();
    assert!(view.loans[&token("GOOGL")].interest.is_zero());
    assert_eq!(view.loan_value, Some(amt("21.98248")));
    assert_eq!(view.last_interest_height, 127);
}

#[test]
fn test_deviating_feed_blocks_new_loans() {
    let mut chain = Chain::new();
    chain.block(bootstrap_loans());
    chain.block(vec![submit(0, time_at(2), &[("DFI/USD", "10"), ("GOOGL/USD", "10")])]);
    chain.advance_to(7);
    chain.block(vec![submit(0, time_at(8), &[("DFI/USD", "2747.81"), ("GOOGL/USD", "2747.81")])]);
    chain.advance_to(11);

    let receipt = chain.block(vec![Command::TakeLoan { vault: VaultId(0), token: token("GOOGL"), amount: amt("0.008") }]);
    assert_eq!(chain.snapshot.feed(&feed("DFI/USD")).unwrap().status, FeedStatus::Deviating);
    assert_eq!(receipt.rejected, vec![(0, LedgerError::PriceUnavailable)]);
    assert!(chain.snapshot.get_vault(VaultId(0)).unwrap().loans.is_empty());
}

#[test]
fn test_odd_prices_rejected() {
    let mut chain = small_loan_chain();
    let now = time_at(chain.height() + 1);
    let receipt = chain.block(vec![
        submit(0, now, &[("GOOGL/USD", "0")]),
        submit(0, now, &[("DFI/USD", "-1")]),
        submit(0, now, &[("DFI/USD", "2747.81"), ("GOOGL/USD", "-1")]),
    ]);
    assert!(receipt.applied.is_empty());
    assert_eq!(
        receipt.rejected,
        vec![
            (0, LedgerError::AmountOutOfRange),
            (1, LedgerError::AmountOutOfRange),
            (2, LedgerError::AmountOutOfRange),
        ]
    );
    assert_eq!(chain.snapshot.feed(&feed("GOOGL/USD")).unwrap().live(), Some(amt("2747.81")));
}

#[test]
fn test_payback_and_close_returns_collateral() {
    let mut chain = small_loan_chain();
    let receipt = chain.block(vec![
        Command::CloseVault { vault: VaultId(0) },
        Command::PaybackLoan { vault: VaultId(0), from: owner("alice"), token: token("GOOGL"), amount: amt("1") },
        Command::CloseVault { vault: VaultId(0) },
    ]);
    assert_eq!(receipt.rejected, vec![(0, LedgerError::LoansOutstanding)]);
    assert_eq!(receipt.applied, vec![1, 2]);

    let alice = owner("alice");
    assert_eq!(chain.snapshot.balance(&alice, &token("DFI")), amt("10"));
    assert!(chain.snapshot.balance(&alice, &token("GOOGL")).is_zero());
    assert_eq!(chain.snapshot.get_vault(VaultId(0)), Err(LedgerError::UnknownVault));

    let history = chain.snapshot.account_history(&alice, 2);
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].1.category, ledger_state::Category::CloseVault);
    assert_eq!(history[0].1.diff[&token("DFI")], amt("1"));
    assert_eq!(history[1].1.category, ledger_state::Category::PaybackLoan);
    assert_eq!(history[1].1.diff[&token("GOOGL")], amt("-0.008"));
}

#[test]
fn test_price_drop_liquidates_vault() {
    let mut chain = Chain::new();
    chain.block(bootstrap_loans());
    chain.block(vec![submit(0, time_at(2), &[("DFI/USD", "10"), ("GOOGL/USD", "10")])]);
    chain.advance_to(6);
    chain.block(vec![
        Command::TakeLoan { vault: VaultId(0), token: token("GOOGL"), amount: amt("0.6") },
        submit(0, time_at(7), &[("DFI/USD", "8"), ("GOOGL/USD", "10")]),
    ]);

    // 10 -> 8 is within the deviation threshold; the new price is active from 18
    chain.advance_to(17);
    assert!(chain.receipts.iter().all(|r| r.liquidated.is_empty()));
    assert_eq!(chain.snapshot.get_vault(VaultId(0)).unwrap().state, VaultState::Active);

    let receipt = chain.block(vec![]);
    assert_eq!(receipt.height, 18);
    assert_eq!(receipt.liquidated, vec![VaultId(0)]);

    let view = chain.snapshot.get_vault(VaultId(0)).unwrap();
    assert_eq!(view.state, VaultState::Liquidated);
    assert!(view.collateral.is_empty() && view.loans.is_empty());

    let batch = chain.snapshot.auctions().next().unwrap();
    assert_eq!(batch.vault, VaultId(0));
    assert_eq!(batch.height, 18);
    assert_eq!(batch.collateral[&token("DFI")], amt("1"));
    assert_eq!(batch.debt[&token("GOOGL")].principal, amt("0.6"));

    let receipt = chain.block(vec![Command::DepositCollateral {
        vault: VaultId(0),
        from: owner("alice"),
        token: token("DFI"),
        amount: amt("1"),
    }]);
    assert_eq!(receipt.rejected, vec![(0, LedgerError::VaultClosed)]);
}
