//! Oracle instruction handlers

use crate::book::FeedBook;
use crate::state::{Observation, Oracle, OracleParams, MAX_WEIGHTAGE};
use std::collections::BTreeSet;
use vaultline_common::{Amount, FeedId, LedgerError, LedgerResult, OracleId, Owner};

impl FeedBook {
    /// Appoint a new oracle for a set of feeds
    ///
    /// Feeds that nobody has announced before are created in `Unset` state.
    pub fn process_appoint_oracle(
        &mut self,
        address: Owner,
        feeds: &[FeedId],
        weightage: u8,
    ) -> LedgerResult<OracleId> {
        if weightage == 0 || weightage > MAX_WEIGHTAGE {
            log::debug!("Oracle: weightage {} out of range", weightage);
            return Err(LedgerError::InvalidAmount);
        }
        if feeds.is_empty() {
            return Err(LedgerError::InvalidCommand("oracle needs at least one price feed".into()));
        }

        let id = OracleId(self.next_oracle_id);
        self.next_oracle_id = self
            .next_oracle_id
            .checked_add(1)
            .ok_or(LedgerError::AmountOutOfRange)?;

        let feeds: BTreeSet<FeedId> = feeds.iter().copied().collect();
        for feed in &feeds {
            self.ensure_feed(*feed);
        }
        self.oracles.insert(id, Oracle::new(id, address, weightage, feeds));

        log::debug!("Oracle: appointed {}", id);
        Ok(id)
    }

    /// Remove an oracle and every observation it contributed
    pub fn process_remove_oracle(&mut self, id: OracleId) -> LedgerResult<()> {
        let oracle = self.oracles.remove(&id).ok_or(LedgerError::UnknownOracle)?;
        for feed_id in &oracle.feeds {
            if let Some(feed) = self.feeds.get_mut(feed_id) {
                feed.observations.retain(|o| o.oracle != id);
            }
        }
        log::debug!("Oracle: removed {}", id);
        Ok(())
    }

    /// Submit a batch of price observations from one oracle
    ///
    /// The batch is validated completely before anything is recorded. A
    /// non-positive price anywhere in the batch fails with `AmountOutOfRange`
    /// ahead of every other check. A timestamp that does
    /// not advance for its feed or that lies outside the freshness window
    /// around `block_time` fails with `StaleTimestamp`. Accepted observations
    /// only influence prices from the next interval boundary on.
    pub fn process_submit_prices(
        &mut self,
        oracle_id: OracleId,
        height: u64,
        block_time: i64,
        timestamp: i64,
        prices: &[(FeedId, Amount)],
        params: &OracleParams,
    ) -> LedgerResult<()> {
        if let Some((feed, amount)) = prices.iter().find(|(_, amount)| !amount.is_positive()) {
            log::debug!("Oracle: rejected non-positive price {} for {}", amount, feed);
            return Err(LedgerError::AmountOutOfRange);
        }

        let oracle = self.oracles.get(&oracle_id).ok_or(LedgerError::UnknownOracle)?;

        if prices.is_empty() {
            return Err(LedgerError::InvalidCommand("empty price submission".into()));
        }

        if timestamp.abs_diff(block_time) > params.price_freshness_secs.unsigned_abs() {
            log::debug!("Oracle: timestamp {} too far from block time {}", timestamp, block_time);
            return Err(LedgerError::StaleTimestamp);
        }

        let mut seen = BTreeSet::new();
        for (feed, _) in prices {
            if !oracle.feeds.contains(feed) {
                return Err(LedgerError::UnknownFeed);
            }
            if !seen.insert(*feed) {
                return Err(LedgerError::InvalidCommand(format!("duplicate price for {}", feed)));
            }
            if let Some(last) = oracle.last_timestamps.get(feed) {
                if timestamp <= *last {
                    return Err(LedgerError::StaleTimestamp);
                }
            }
        }

        // Validated; record
        for (feed_id, amount) in prices {
            if let Some(oracle) = self.oracles.get_mut(&oracle_id) {
                oracle.last_timestamps.insert(*feed_id, timestamp);
            }
            self.ensure_feed(*feed_id).observations.push(Observation {
                oracle: oracle_id,
                height,
                timestamp,
                amount: *amount,
            });
        }

        log::debug!("Oracle: {} submitted {} prices at height {}", oracle_id, prices.len(), height);
        Ok(())
    }
}
