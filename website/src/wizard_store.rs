use std::collections::HashMap;
use std::ops::{Deref, DerefMut};
use std::sync::{Mutex, MutexGuard, PoisonError};

use clinic::wizard::ScheduleWizard;

use crate::{Error, Result};

/// Owner user id and pet id
pub type WizardKey = (i64, i64);

enum WizardSlot {
    Idle(ScheduleWizard),

    /// Leased to a request that is talking to the backend
    Busy,
}

/// In-flight booking wizards, one per user and pet.
///
/// A wizard is leased out of the map for the duration of a transition so
/// the lock is never held across a backend call.
#[derive(Default)]
pub struct WizardStore {
    wizards: Mutex<HashMap<WizardKey, WizardSlot>>,
}

impl WizardStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<WizardKey, WizardSlot>> {
        self.wizards.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Starts over, replacing any idle wizard for the same key.
    pub fn start(&self, key: WizardKey, wizard: ScheduleWizard) -> Result<()> {
        let mut wizards = self.lock();
        if let Some(WizardSlot::Busy) = wizards.get(&key) {
            return Err(busy());
        }
        wizards.insert(key, WizardSlot::Idle(wizard));
        Ok(())
    }

    /// Takes the wizard out until the lease is dropped.
    pub fn lease(&self, key: WizardKey) -> Result<WizardLease<'_>> {
        let mut wizards = self.lock();
        match wizards.insert(key, WizardSlot::Busy) {
            Some(WizardSlot::Idle(wizard)) => Ok(WizardLease {
                store: self,
                key,
                wizard: Some(wizard),
            }),
            Some(WizardSlot::Busy) => Err(busy()),
            None => {
                wizards.remove(&key);
                Err(Error::NotFound {
                    msg: "No hay una reserva en curso para esta mascota.".to_string(),
                })
            }
        }
    }

    pub fn remove(&self, key: WizardKey) {
        let mut wizards = self.lock();
        if let Some(WizardSlot::Idle(_)) = wizards.get(&key) {
            wizards.remove(&key);
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    fn restore(&self, key: WizardKey, wizard: ScheduleWizard) {
        self.lock().insert(key, WizardSlot::Idle(wizard));
    }
}

fn busy() -> Error {
    Error::Conflict {
        msg: "Ya hay una operación en curso para esta reserva.".to_string(),
    }
}

/// Exclusive access to a leased wizard. Dropping it puts the wizard back.
pub struct WizardLease<'a> {
    store: &'a WizardStore,
    key: WizardKey,
    wizard: Option<ScheduleWizard>,
}

impl WizardLease<'_> {
    /// Discards the wizard instead of putting it back.
    pub fn finish(mut self) {
        self.wizard = None;
        self.store.lock().remove(&self.key);
    }
}

impl Deref for WizardLease<'_> {
    type Target = ScheduleWizard;

    fn deref(&self) -> &Self::Target {
        match &self.wizard {
            Some(wizard) => wizard,
            None => unreachable!("wizard is only taken on drop or finish"),
        }
    }
}

impl DerefMut for WizardLease<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        match &mut self.wizard {
            Some(wizard) => wizard,
            None => unreachable!("wizard is only taken on drop or finish"),
        }
    }
}

impl Drop for WizardLease<'_> {
    fn drop(&mut self) {
        if let Some(wizard) = self.wizard.take() {
            self.store.restore(self.key, wizard);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use clinic::wizard::WizardStep;

    fn wizard(pet_id: i64) -> ScheduleWizard {
        ScheduleWizard::new(pet_id, NaiveDate::from_ymd_opt(2025, 3, 10).unwrap())
    }

    #[test]
    fn test_lease_and_restore() {
        let store = WizardStore::new();
        store.start((1, 10), wizard(10)).unwrap();

        {
            let lease = store.lease((1, 10)).unwrap();
            assert_eq!(lease.pet_id(), 10);
            assert_eq!(lease.step(), WizardStep::ReasonSelection);

            let err = store.lease((1, 10)).err().unwrap();
            assert!(matches!(err, Error::Conflict { .. }));
            assert!(store.start((1, 10), wizard(10)).is_err());
        }

        assert!(store.lease((1, 10)).is_ok());
    }

    #[test]
    fn test_missing_wizard() {
        let store = WizardStore::new();
        let err = store.lease((1, 10)).err().unwrap();
        assert!(matches!(err, Error::NotFound { .. }));
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_finished_wizard_is_not_restored() {
        let store = WizardStore::new();
        store.start((1, 10), wizard(10)).unwrap();
        store.start((1, 11), wizard(11)).unwrap();

        store.lease((1, 10)).unwrap().finish();
        assert_eq!(store.len(), 1);
        assert!(matches!(
            store.lease((1, 10)).err().unwrap(),
            Error::NotFound { .. }
        ));
    }

    #[test]
    fn test_keys_are_per_user() {
        let store = WizardStore::new();
        store.start((1, 10), wizard(10)).unwrap();
        assert!(store.lease((2, 10)).is_err());

        store.remove((1, 10));
        assert_eq!(store.len(), 0);
    }
}
