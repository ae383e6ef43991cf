//! Loan scheme instructions: create, update, set default, destroy

use crate::state::{LoanScheme, SchemeRegistry};
use vaultline_common::{Amount, LedgerError, LedgerResult, LoanSchemeId};

impl SchemeRegistry {
    /// Create a scheme; the first scheme ever created becomes the default
    pub fn process_create_loan_scheme(
        &mut self,
        id: LoanSchemeId,
        min_ratio: u32,
        rate: Amount,
    ) -> LedgerResult<()> {
        let scheme = LoanScheme::new(id, min_ratio, rate)?;
        if self.schemes.contains_key(&id) {
            log::debug!("LoanScheme: {} already exists", id);
            return Err(LedgerError::DuplicateScheme);
        }
        if let Some(other) = self.find_same_terms(&scheme) {
            log::debug!("LoanScheme: {} has the same rate and ratio as {}", id, other);
            return Err(LedgerError::DuplicateScheme);
        }

        self.schemes.insert(id, scheme);
        if self.default.is_none() {
            self.default = Some(id);
        }
        log::debug!("LoanScheme: created {} ratio={} rate={}", id, min_ratio, rate);
        Ok(())
    }

    /// Change a scheme's terms now, or at `activate_at` (> `height`)
    pub fn process_update_loan_scheme(
        &mut self,
        id: LoanSchemeId,
        min_ratio: u32,
        rate: Amount,
        activate_at: Option<u64>,
        height: u64,
    ) -> LedgerResult<()> {
        let scheme = LoanScheme::new(id, min_ratio, rate)?;
        self.get(&id)?;
        if let Some(other) = self.find_same_terms(&scheme) {
            log::debug!("LoanScheme: {} has the same rate and ratio as {}", id, other);
            return Err(LedgerError::DuplicateScheme);
        }

        match activate_at {
            Some(at) if at <= height => Err(LedgerError::InvalidScheme(
                "update height below current block height, set future height".into(),
            )),
            Some(at) => {
                self.pending_updates.entry(at).or_default().insert(id, scheme);
                log::debug!("LoanScheme: update of {} queued for height {}", id, at);
                Ok(())
            }
            None => {
                self.schemes.insert(id, scheme);
                log::debug!("LoanScheme: updated {} ratio={} rate={}", id, min_ratio, rate);
                Ok(())
            }
        }
    }

    pub fn process_set_default_loan_scheme(&mut self, id: LoanSchemeId) -> LedgerResult<()> {
        self.get(&id)?;
        if self.is_default(&id) {
            return Err(LedgerError::InvalidScheme(format!("{} is already set as default", id)));
        }
        if let Some(at) = self.destroy_height(&id) {
            return Err(LedgerError::InvalidScheme(format!(
                "cannot set {} as default, set to be destroyed on block {}",
                id, at
            )));
        }
        self.default = Some(id);
        log::debug!("LoanScheme: default is now {}", id);
        Ok(())
    }

    /// Destroy a scheme now, or at `at` (> `height`)
    ///
    /// Returns `true` when the scheme was removed immediately; the caller
    /// then moves the scheme's vaults to the default scheme.
    pub fn process_destroy_loan_scheme(
        &mut self,
        id: LoanSchemeId,
        at: Option<u64>,
        height: u64,
    ) -> LedgerResult<bool> {
        self.get(&id)?;
        if self.is_default(&id) {
            return Err(LedgerError::InvalidScheme(
                "cannot destroy default loan scheme, set new default first".into(),
            ));
        }
        match at {
            Some(at) if at <= height => Err(LedgerError::InvalidScheme(
                "destruction height below current block height, set future height".into(),
            )),
            Some(at) => {
                self.pending_destroys.insert(id, at);
                log::debug!("LoanScheme: {} scheduled for destruction at {}", id, at);
                Ok(false)
            }
            None => {
                self.remove(&id);
                Ok(true)
            }
        }
    }

    /// Apply scheduled updates and destructions due at `height`
    ///
    /// Returns the ids of the schemes destroyed by this call.
    pub fn on_block_start(&mut self, height: u64) -> Vec<LoanSchemeId> {
        let due: Vec<u64> = self.pending_updates.range(..=height).map(|(h, _)| *h).collect();
        for h in due {
            for (id, scheme) in self.pending_updates.remove(&h).unwrap_or_default() {
                if self.schemes.contains_key(&id) {
                    log::info!("LoanScheme: activated update of {} at {}", id, height);
                    self.schemes.insert(id, scheme);
                }
            }
        }

        let destroyed: Vec<LoanSchemeId> = self
            .pending_destroys
            .iter()
            .filter(|(_, at)| **at <= height)
            .map(|(id, _)| *id)
            .collect();
        for id in &destroyed {
            self.remove(id);
        }
        destroyed
    }

    fn remove(&mut self, id: &LoanSchemeId) {
        self.schemes.remove(id);
        self.pending_destroys.remove(id);
        for updates in self.pending_updates.values_mut() {
            updates.remove(id);
        }
        self.pending_updates.retain(|_, updates| !updates.is_empty());
        log::info!("LoanScheme: destroyed {}", id);
    }
}
