//! Pool pair liquidity and swaps through blocks

use ledger_state::{Category, Command};
use vaultline_common::{Amount, LedgerError, PoolId};
use vaultline_integration_tests::*;

fn pool_chain(commission: &str) -> Chain {
    let mut chain = Chain::new();
    chain.block(vec![
        mint("alice", "DFI", "100"),
        mint("alice", "DUSD", "1000"),
        mint("bob", "DFI", "20"),
        mint("carol", "DFI", "10"),
        mint("carol", "DUSD", "200"),
        Command::CreatePoolPair {
            token_a: token("DFI"),
            token_b: token("DUSD"),
            commission: amt(commission),
            owner: owner("gov"),
        },
        Command::AddLiquidity { pool: PoolId(0), owner: owner("alice"), amount_a: amt("100"), amount_b: amt("1000") },
    ]);
    chain
}

#[test]
fn test_first_deposit_mints_geometric_mean() {
    let chain = pool_chain("0");
    let pool = chain.snapshot.get_pool(PoolId(0)).unwrap();
    assert_eq!((pool.reserve_a, pool.reserve_b), (amt("100"), amt("1000")));
    assert_eq!(pool.total_liquidity, amt("316.22776601"));
    assert_eq!(chain.snapshot.get_position(PoolId(0), &owner("alice")), amt("316.22776601"));
    assert!(chain.snapshot.balance(&owner("alice"), &token("DFI")).is_zero());
    assert_eq!(chain.snapshot.get_pool_by_pair(token("DUSD"), token("DFI")).unwrap().id, PoolId(0));
}

#[test]
fn test_unbalanced_deposit_returns_excess() {
    let mut chain = pool_chain("0");
    let receipt = chain.block(vec![Command::AddLiquidity {
        pool: PoolId(0),
        owner: owner("carol"),
        amount_a: amt("10"),
        amount_b: amt("200"),
    }]);
    assert_eq!(receipt.applied, vec![0]);

    let carol = owner("carol");
    assert!(chain.snapshot.balance(&carol, &token("DFI")).is_zero());
    assert_eq!(chain.snapshot.balance(&carol, &token("DUSD")), amt("100"));
    assert_eq!(chain.snapshot.get_position(PoolId(0), &carol), amt("31.6227766"));

    // Redemption truncates in the pool's favour
    chain.block(vec![Command::RemoveLiquidity { pool: PoolId(0), owner: carol.clone(), liquidity: amt("31.6227766") }]);
    assert_eq!(chain.snapshot.balance(&carol, &token("DFI")), amt("9.99999999"));
    assert_eq!(chain.snapshot.balance(&carol, &token("DUSD")), amt("199.99999999"));
    assert!(chain.snapshot.get_position(PoolId(0), &carol).is_zero());

    let history = chain.snapshot.account_history(&carol, 10);
    assert_eq!(history[0].1.category, Category::RemovePoolLiquidity);
    assert_eq!(history[1].1.category, Category::AddPoolLiquidity);
    assert_eq!(history[1].1.diff[&token("DUSD")], amt("-100"));
}

#[test]
fn test_swap_moves_balances_and_reserves() {
    let mut chain = pool_chain("0");
    let receipt = chain.block(vec![Command::Swap {
        pool: PoolId(0),
        from: owner("bob"),
        token: token("DFI"),
        amount: amt("10"),
        min_output: amt("90"),
    }]);
    assert_eq!(receipt.applied, vec![0]);

    let bob = owner("bob");
    assert_eq!(chain.snapshot.balance(&bob, &token("DFI")), amt("10"));
    assert_eq!(chain.snapshot.balance(&bob, &token("DUSD")), amt("90.9090909"));

    let pool = chain.snapshot.get_pool(PoolId(0)).unwrap();
    assert_eq!(pool.reserve_a, amt("110"));
    assert_eq!(pool.reserve_b, amt("909.0909091"));

    let history = chain.snapshot.account_history(&bob, 1);
    assert_eq!(history[0].1.category, Category::PoolSwap);
    assert_eq!(history[0].1.diff[&token("DFI")], amt("-10"));
}

#[test]
fn test_commission_stays_in_pool() {
    let mut no_fee = pool_chain("0");
    let mut fee = pool_chain("0.1");
    let swap = Command::Swap {
        pool: PoolId(0),
        from: owner("bob"),
        token: token("DFI"),
        amount: amt("10"),
        min_output: Amount::ZERO,
    };
    no_fee.block(vec![swap.clone()]);
    fee.block(vec![swap]);

    let bob = owner("bob");
    let paid_no_fee = no_fee.snapshot.balance(&bob, &token("DUSD"));
    let paid_fee = fee.snapshot.balance(&bob, &token("DUSD"));
    assert!(paid_fee < paid_no_fee);
    assert_eq!(fee.snapshot.get_pool(PoolId(0)).unwrap().reserve_a, amt("110"));
}

#[test]
fn test_failed_swaps_leave_pool_untouched() {
    let mut chain = pool_chain("0");
    let before = chain.snapshot.get_pool(PoolId(0)).unwrap().clone();
    let receipt = chain.block(vec![
        Command::Swap { pool: PoolId(0), from: owner("bob"), token: token("DFI"), amount: amt("10"), min_output: amt("91") },
        Command::Swap { pool: PoolId(0), from: owner("bob"), token: token("DFI"), amount: amt("50"), min_output: Amount::ZERO },
        Command::Swap { pool: PoolId(0), from: owner("bob"), token: token("BTC"), amount: amt("1"), min_output: Amount::ZERO },
        Command::Swap { pool: PoolId(7), from: owner("bob"), token: token("DFI"), amount: amt("1"), min_output: Amount::ZERO },
    ]);
    assert_eq!(
        receipt.rejected,
        vec![
            (0, LedgerError::SlippageExceeded),
            (1, LedgerError::InsufficientBalance),
            (2, LedgerError::UnknownToken),
            (3, LedgerError::UnknownPool),
        ]
    );
    assert_eq!(chain.snapshot.get_pool(PoolId(0)).unwrap(), &before);
    assert_eq!(chain.snapshot.balance(&owner("bob"), &token("DFI")), amt("20"));
}

#[test]
fn test_pool_creation_rules() {
    let mut chain = pool_chain("0");
    let receipt = chain.block(vec![
        Command::CreatePoolPair { token_a: token("DUSD"), token_b: token("DFI"), commission: Amount::ZERO, owner: owner("gov") },
        Command::CreatePoolPair { token_a: token("BTC"), token_b: token("BTC"), commission: Amount::ZERO, owner: owner("gov") },
        Command::CreatePoolPair { token_a: token("BTC"), token_b: token("DFI"), commission: amt("1"), owner: owner("gov") },
        Command::CreatePoolPair { token_a: token("BTC"), token_b: token("DFI"), commission: amt("0.003"), owner: owner("gov") },
        Command::Swap { pool: PoolId(1), from: owner("bob"), token: token("DFI"), amount: amt("1"), min_output: Amount::ZERO },
    ]);
    assert_eq!(receipt.applied, vec![3]);
    assert_eq!(receipt.rejected[0], (0, LedgerError::DuplicatePair));
    assert!(matches!(receipt.rejected[1], (1, LedgerError::InvalidCommand(_))));
    assert_eq!(receipt.rejected[2], (2, LedgerError::InvalidAmount));
    assert!(matches!(receipt.rejected[3], (4, LedgerError::InvalidCommand(_))));
}
