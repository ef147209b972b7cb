//! The registration ledger: which user attends which event. At most one
//! registration per (event, user) pair; unregistering a pair that does not
//! exist is a no-op. Cascade removal is only reachable from the registry's
//! delete operations, which pass their open transaction in.

use std::collections::{HashMap, HashSet};

use campus_club_hub_database::{Store, StoreError, Transaction};
use chrono::Utc;

use crate::entities::{Event, Registration};

pub(crate) const REGISTRATIONS_TABLE: &str = "registrations";

#[derive(Debug, PartialEq, Eq)]
pub enum RegisterOutcome {
    Created,
    /// The pair already existed; nothing was inserted. Reported to the
    /// user, not treated as a failure.
    AlreadyRegistered,
}

#[derive(Clone)]
pub struct Ledger {
    store: Store,
}

impl Ledger {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Check-then-insert inside one transaction, so two concurrent calls
    /// for the same pair cannot both insert.
    pub async fn register(
        &self,
        event_id: &str,
        username: &str,
    ) -> Result<RegisterOutcome, StoreError> {
        let registration = Registration {
            event_id: event_id.to_owned(),
            username: username.to_owned(),
            timestamp: Utc::now().to_rfc3339(),
        };
        self.store
            .mutate(move |txn| {
                if txn
                    .get_one(REGISTRATIONS_TABLE, |existing: &Registration| {
                        existing.event_id == registration.event_id
                            && existing.username == registration.username
                    })?
                    .is_some()
                {
                    return Ok(RegisterOutcome::AlreadyRegistered);
                }
                txn.insert(REGISTRATIONS_TABLE, &registration)?;
                Ok(RegisterOutcome::Created)
            })
            .await
    }

    pub async fn unregister(&self, event_id: &str, username: &str) -> Result<(), StoreError> {
        self.store
            .mutate(|txn| {
                txn.remove(REGISTRATIONS_TABLE, |registration: &Registration| {
                    registration.event_id == event_id && registration.username == username
                })?;
                Ok(())
            })
            .await
    }

    pub async fn is_registered(&self, event_id: &str, username: &str) -> Result<bool, StoreError> {
        Ok(self
            .store
            .get_one(REGISTRATIONS_TABLE, |registration: &Registration| {
                registration.event_id == event_id && registration.username == username
            })
            .await?
            .is_some())
    }

    pub async fn count_for_event(&self, event_id: &str) -> Result<usize, StoreError> {
        Ok(self
            .store
            .find(REGISTRATIONS_TABLE, |registration: &Registration| {
                registration.event_id == event_id
            })
            .await?
            .len())
    }

    /// Participant count per event id, for the event list page.
    pub async fn counts_by_event(&self) -> Result<HashMap<String, usize>, StoreError> {
        let registrations: Vec<Registration> = self.store.all(REGISTRATIONS_TABLE).await?;
        let mut counts = HashMap::new();
        for registration in registrations {
            *counts.entry(registration.event_id).or_insert(0) += 1;
        }
        Ok(counts)
    }

    /// The event ids a user holds registrations for.
    pub async fn event_ids_for_user(&self, username: &str) -> Result<HashSet<String>, StoreError> {
        let registrations: Vec<Registration> = self
            .store
            .find(REGISTRATIONS_TABLE, |registration: &Registration| {
                registration.username == username
            })
            .await?;
        Ok(registrations
            .into_iter()
            .map(|registration| registration.event_id)
            .collect())
    }

    pub(crate) fn cascade_remove_for_event(
        txn: &mut Transaction<'_>,
        event_id: &str,
    ) -> Result<usize, StoreError> {
        txn.remove(REGISTRATIONS_TABLE, |registration: &Registration| {
            registration.event_id == event_id
        })
    }

    pub(crate) fn cascade_remove_for_club(
        txn: &mut Transaction<'_>,
        events: &[Event],
    ) -> Result<usize, StoreError> {
        let event_ids: HashSet<&str> = events.iter().map(|event| event.id.as_str()).collect();
        txn.remove(REGISTRATIONS_TABLE, |registration: &Registration| {
            event_ids.contains(registration.event_id.as_str())
        })
    }
}
