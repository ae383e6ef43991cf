//! Interval price aggregation
//!
//! At every interval boundary each feed folds the latest fresh observation of
//! every oracle into a weightage-weighted mean. The previous `next` price
//! becomes `active`, the aggregate becomes `next`. Observations submitted in
//! the boundary block itself are not considered, so prices never move in the
//! middle of a block.

use crate::book::FeedBook;
use crate::state::{FeedStatus, Observation, Oracle, OracleParams};
use std::collections::BTreeMap;
use vaultline_common::math::{mul_div, narrow_i64};
use vaultline_common::{Amount, FeedId, LedgerError, LedgerResult, OracleId, COIN};

/// Weighted mean of `(price, weight)` pairs, truncated; `None` when empty
pub fn weighted_price(entries: &[(Amount, u8)]) -> LedgerResult<Option<Amount>> {
    let mut total: i128 = 0;
    let mut weights: i128 = 0;
    for (price, weight) in entries {
        total = total
            .checked_add(price.raw() as i128 * *weight as i128)
            .ok_or(LedgerError::AmountOutOfRange)?;
        weights += *weight as i128;
    }
    if weights == 0 {
        return Ok(None);
    }
    narrow_i64(total / weights).map(|raw| Some(Amount::from_raw(raw)))
}

/// True when `|next - active| / active >= threshold`
pub fn is_deviating(active: Amount, next: Amount, threshold: Amount) -> LedgerResult<bool> {
    if !active.is_positive() {
        return Ok(true);
    }
    let diff = next.abs_diff(active)?;
    let ratio = mul_div(diff.raw() as i128, COIN as i128, active.raw() as i128)?;
    Ok(ratio >= threshold.raw() as i128)
}

/// Latest observation per oracle eligible for aggregation at `height`
fn fresh_observations<'a>(
    observations: &'a [Observation],
    oracles: &BTreeMap<OracleId, Oracle>,
    height: u64,
    block_time: i64,
    params: &OracleParams,
) -> BTreeMap<OracleId, &'a Observation> {
    let window = params.price_freshness_secs.unsigned_abs();
    let mut latest: BTreeMap<OracleId, &Observation> = BTreeMap::new();
    for obs in observations {
        if obs.height >= height || !oracles.contains_key(&obs.oracle) {
            continue;
        }
        if obs.timestamp.abs_diff(block_time) > window {
            continue;
        }
        let newer = latest
            .get(&obs.oracle)
            .map_or(true, |cur| (obs.timestamp, obs.height) >= (cur.timestamp, cur.height));
        if newer {
            latest.insert(obs.oracle, obs);
        }
    }
    latest
}

impl FeedBook {
    /// Recompute one feed's prices at an interval boundary
    pub fn compute_active_price(
        &mut self,
        feed_id: &FeedId,
        height: u64,
        block_time: i64,
        params: &OracleParams,
    ) -> LedgerResult<FeedStatus> {
        let feed = self.feeds.get_mut(feed_id).ok_or(LedgerError::UnknownFeed)?;

        let latest = fresh_observations(&feed.observations, &self.oracles, height, block_time, params);
        let entries: Vec<(Amount, u8)> = latest
            .iter()
            .filter_map(|(id, obs)| self.oracles.get(id).map(|o| (obs.amount, o.weightage)))
            .collect();
        let aggregate = weighted_price(&entries)?;

        // Keep only what a later boundary can still use
        let keep: Vec<(OracleId, i64, u64)> =
            latest.values().map(|o| (o.oracle, o.timestamp, o.height)).collect();
        feed.observations.retain(|o| {
            o.height >= height || keep.contains(&(o.oracle, o.timestamp, o.height))
        });
        feed.last_update_height = height;

        let Some(price) = aggregate else {
            if feed.status != FeedStatus::Unset {
                log::warn!("Oracle: {} has no fresh observation at height {}", feed_id, height);
                feed.status = FeedStatus::Stale;
            }
            return Ok(feed.status);
        };

        match feed.next {
            None => {
                feed.active = Some(price);
                feed.next = Some(price);
            }
            Some(next) => {
                feed.active = Some(next);
                feed.next = Some(price);
            }
        }

        let (active, next) = (feed.active.unwrap_or(price), price);
        feed.status = if is_deviating(active, next, params.price_deviation)? {
            FeedStatus::Deviating
        } else {
            FeedStatus::Live
        };

        log::debug!(
            "Oracle: {} active={} next={} status={:?}",
            feed_id,
            active,
            next,
            feed.status
        );
        Ok(feed.status)
    }

    /// Run the boundary rollover for every feed if `height` is a boundary
    pub fn on_block_start(
        &mut self,
        height: u64,
        block_time: i64,
        params: &OracleParams,
    ) -> LedgerResult<Vec<(FeedId, FeedStatus)>> {
        let interval = params.price_interval_blocks.max(1);
        if height % interval != 0 {
            return Ok(Vec::new());
        }
        let ids: Vec<FeedId> = self.feeds.keys().copied().collect();
        let mut updated = Vec::with_capacity(ids.len());
        for id in ids {
            let status = self.compute_active_price(&id, height, block_time, params)?;
            updated.push((id, status));
        }
        Ok(updated)
    }
}
