//! Loan scheme lifecycle through blocks

use ledger_state::Command;
use vaultline_common::{LedgerError, VaultId};
use vaultline_integration_tests::*;

fn schemes_chain() -> Chain {
    let mut chain = Chain::new();
    chain.block(vec![
        Command::CreateLoanScheme { id: scheme("LOAN150"), min_ratio: 150, rate: amt("5") },
        Command::CreateLoanScheme { id: scheme("LOAN200"), min_ratio: 200, rate: amt("2") },
        Command::CreateVault { owner: owner("alice"), scheme: Some(scheme("LOAN200")) },
        Command::CreateVault { owner: owner("bob"), scheme: None },
    ]);
    chain
}

#[test]
fn test_first_scheme_is_default() {
    let chain = schemes_chain();
    let schemes = chain.snapshot.list_loan_schemes();
    assert_eq!(schemes.len(), 2);
    assert!(schemes.iter().any(|s| s.id == scheme("LOAN150") && s.default));
    assert!(schemes.iter().any(|s| s.id == scheme("LOAN200") && !s.default));
    assert_eq!(chain.snapshot.get_vault(VaultId(0)).unwrap().scheme, scheme("LOAN200"));
    assert_eq!(chain.snapshot.get_vault(VaultId(1)).unwrap().scheme, scheme("LOAN150"));
}

#[test]
fn test_invalid_schemes_rejected() {
    let mut chain = schemes_chain();
    let receipt = chain.block(vec![
        Command::CreateLoanScheme { id: scheme("LOAN150"), min_ratio: 300, rate: amt("3") },
        Command::CreateLoanScheme { id: scheme("COPY"), min_ratio: 150, rate: amt("5") },
        Command::CreateLoanScheme { id: scheme("LOW"), min_ratio: 99, rate: amt("5") },
        Command::CreateLoanScheme { id: scheme("CHEAP"), min_ratio: 300, rate: amt("0.001") },
        Command::DestroyLoanScheme { id: scheme("LOAN150"), at: None },
        Command::SetDefaultLoanScheme { id: scheme("LOAN150") },
    ]);
    assert!(receipt.applied.is_empty());
    assert_eq!(receipt.rejected[0], (0, LedgerError::DuplicateScheme));
    assert_eq!(receipt.rejected[1], (1, LedgerError::DuplicateScheme));
    assert!(matches!(receipt.rejected[2], (2, LedgerError::InvalidScheme(_))));
    assert!(matches!(receipt.rejected[3], (3, LedgerError::InvalidScheme(_))));
    assert!(matches!(receipt.rejected[4], (4, LedgerError::InvalidScheme(_))));
    assert!(matches!(receipt.rejected[5], (5, LedgerError::InvalidScheme(_))));
}

#[test]
fn test_scheduled_destroy_moves_vaults_to_default() {
    let mut chain = schemes_chain();
    let receipt = chain.block(vec![Command::DestroyLoanScheme { id: scheme("LOAN200"), at: Some(5) }]);
    assert_eq!(receipt.applied, vec![0]);

    let pending = chain.snapshot.list_loan_schemes();
    assert!(pending.iter().any(|s| s.id == scheme("LOAN200") && s.destroy_at == Some(5)));

    // A scheme set for destruction takes no new vaults
    let receipt = chain.block(vec![Command::CreateVault { owner: owner("carol"), scheme: Some(scheme("LOAN200")) }]);
    assert!(matches!(receipt.rejected[0], (0, LedgerError::InvalidScheme(_))));

    chain.advance_to(4);
    assert_eq!(chain.snapshot.get_vault(VaultId(0)).unwrap().scheme, scheme("LOAN200"));

    let receipt = chain.block(vec![]);
    assert_eq!(receipt.destroyed_schemes, vec![scheme("LOAN200")]);
    assert_eq!(chain.snapshot.get_vault(VaultId(0)).unwrap().scheme, scheme("LOAN150"));
    assert_eq!(chain.snapshot.list_loan_schemes().len(), 1);
}

#[test]
fn test_immediate_destroy_moves_vaults_to_default() {
    let mut chain = schemes_chain();
    let receipt = chain.block(vec![
        Command::DestroyLoanScheme { id: scheme("LOAN200"), at: None },
        Command::UpdateVault { vault: VaultId(1), owner: None, scheme: Some(scheme("LOAN200")) },
    ]);
    assert_eq!(receipt.applied, vec![0]);
    assert_eq!(receipt.rejected, vec![(1, LedgerError::UnknownScheme)]);
    assert_eq!(chain.snapshot.get_vault(VaultId(0)).unwrap().scheme, scheme("LOAN150"));
}

#[test]
fn test_scheduled_update_activates_at_height() {
    let mut chain = schemes_chain();
    let receipt = chain.block(vec![
        Command::UpdateLoanScheme { id: scheme("LOAN200"), min_ratio: 175, rate: amt("3"), activate_at: Some(2) },
        Command::UpdateLoanScheme { id: scheme("LOAN200"), min_ratio: 175, rate: amt("3"), activate_at: Some(6) },
    ]);
    assert_eq!(receipt.applied, vec![1]);
    assert!(matches!(receipt.rejected[0], (0, LedgerError::InvalidScheme(_))));

    chain.advance_to(5);
    let current = *chain.snapshot.schemes.get(&scheme("LOAN200")).unwrap();
    assert_eq!((current.min_ratio, current.rate), (200, amt("2")));

    chain.block(vec![]);
    let current = *chain.snapshot.schemes.get(&scheme("LOAN200")).unwrap();
    assert_eq!((current.min_ratio, current.rate), (175, amt("3")));
}

#[test]
fn test_set_default_then_destroy_old_default() {
    let mut chain = schemes_chain();
    let receipt = chain.block(vec![
        Command::SetDefaultLoanScheme { id: scheme("LOAN200") },
        Command::DestroyLoanScheme { id: scheme("LOAN150"), at: None },
    ]);
    assert_eq!(receipt.applied, vec![0, 1]);
    assert_eq!(chain.snapshot.get_vault(VaultId(1)).unwrap().scheme, scheme("LOAN200"));
    assert_eq!(chain.snapshot.schemes.default_id(), Some(scheme("LOAN200")));
}
