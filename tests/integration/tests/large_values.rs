//! Vaults whose value no longer fits an amount must not stop the chain

use ledger_state::Command;
use vaultline_common::{LedgerError, VaultId};
use vaultline_integration_tests::*;
use vaultline_oracle::FeedStatus;
use vaultline_vault::VaultState;

/// Alice holds 1,000,001 DFI in vault 0 against a 1 GOOGL loan, then DFI/USD
/// moves to 10^8 at 8 and is live from 18 on
fn oversized_vault_chain() -> Chain {
    let mut chain = Chain::new();
    let mut bootstrap = bootstrap_loans();
    bootstrap.push(mint("alice", "DFI", "1000000"));
    bootstrap.push(Command::DepositCollateral {
        vault: VaultId(0),
        from: owner("alice"),
        token: token("DFI"),
        amount: amt("1000000"),
    });
    let receipt = chain.block(bootstrap);
    assert!(receipt.rejected.is_empty());

    chain.block(vec![submit(0, time_at(2), &[("DFI/USD", "10"), ("GOOGL/USD", "10")])]);
    chain.advance_to(6);
    let receipt = chain.block(vec![Command::TakeLoan { vault: VaultId(0), token: token("GOOGL"), amount: amt("1") }]);
    assert_eq!(receipt.applied, vec![0]);
    chain.block(vec![submit(0, time_at(8), &[("DFI/USD", "100000000")])]);
    chain.advance_to(18);
    chain
}

#[test]
fn test_blocks_commit_past_amount_range() {
    let mut chain = oversized_vault_chain();
    let dfi = chain.snapshot.feed(&feed("DFI/USD")).unwrap();
    assert_eq!(dfi.status, FeedStatus::Live);
    assert_eq!(dfi.active, Some(amt("100000000")));

    chain.advance_to(40);
    assert_eq!(chain.height(), 40);
    assert!(chain.receipts.iter().all(|r| r.liquidated.is_empty()));

    let view = chain.snapshot.get_vault(VaultId(0)).unwrap();
    assert_eq!(view.state, VaultState::Active);
    assert_eq!(view.collateral_value, None);
    assert_eq!(view.ratio, None);
    assert_eq!(view.last_interest_height, 40);
}

#[test]
fn test_oversized_vault_rejects_only_its_own_transactions() {
    let mut chain = oversized_vault_chain();

    let receipt = chain.block(vec![
        Command::TakeLoan { vault: VaultId(0), token: token("GOOGL"), amount: amt("1") },
        mint("bob", "DFI", "1"),
    ]);
    assert_eq!(receipt.rejected, vec![(0, LedgerError::AmountOutOfRange)]);
    assert_eq!(receipt.applied, vec![1]);
    assert_eq!(chain.snapshot.balance(&owner("bob"), &token("DFI")), amt("1"));

    let height = chain.height();
    chain.block(vec![]);
    assert_eq!(chain.height(), height + 1);
}
