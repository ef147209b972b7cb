//! CRUD over clubs and events, plus the consistency rules between them:
//! club names are unique, events carry a stable surrogate id, and deleting
//! a club or event removes everything that depends on it in the same store
//! transaction.

use std::sync::Arc;

use campus_club_hub_database::{Store, StoreError};
use chrono::{NaiveDate, Utc};
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use crate::entities::{Club, Event, Identity, NewClub, NewEvent};
use crate::ledger::Ledger;
use crate::policy::ModifyPolicy;

pub(crate) const CLUBS_TABLE: &str = "clubs";
pub(crate) const EVENTS_TABLE: &str = "events";

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("a club with this name already exists")]
    DuplicateName,
    /// Covers both "no such record" and "requester may not touch it".
    /// The two are deliberately indistinguishable to the caller.
    #[error("authorization failed or no such record")]
    Forbidden,
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Clone)]
pub struct Registry {
    store: Store,
    policy: Arc<dyn ModifyPolicy>,
}

impl Registry {
    pub fn new(store: Store, policy: Arc<dyn ModifyPolicy>) -> Self {
        Self { store, policy }
    }

    pub fn can_modify(&self, requester: &Identity, owner: &str) -> bool {
        self.policy.can_modify(requester, owner)
    }

    pub async fn create_club(
        &self,
        new: NewClub,
        owner: &Identity,
    ) -> Result<Club, RegistryError> {
        let club = Club {
            name: new.name,
            description: new.description,
            leader: new.leader,
            founded: Utc::now().date_naive().format("%Y-%m-%d").to_string(),
            created_by: owner.username.clone(),
        };
        self.store
            .mutate(move |txn| {
                if txn
                    .get_one(CLUBS_TABLE, |existing: &Club| existing.name == club.name)?
                    .is_some()
                {
                    return Err(RegistryError::DuplicateName);
                }
                txn.insert(CLUBS_TABLE, &club)?;
                Ok(club)
            })
            .await
    }

    /// Assigns the surrogate id. An unknown `club_name` is accepted (the
    /// form only offers existing clubs, so this is reachable only by
    /// handcrafted requests) but logged.
    pub async fn create_event(
        &self,
        new: NewEvent,
        owner: &Identity,
    ) -> Result<Event, RegistryError> {
        let event = Event {
            id: Uuid::new_v4().to_string(),
            title: new.title,
            club_name: new.club_name,
            kind: new.kind,
            date: new.date,
            location: new.location,
            description: new.description,
            created_by: owner.username.clone(),
        };
        self.store
            .mutate(move |txn| {
                if txn
                    .get_one(CLUBS_TABLE, |club: &Club| club.name == event.club_name)?
                    .is_none()
                {
                    warn!(club_name = %event.club_name, "creating event for unknown club");
                }
                txn.insert(EVENTS_TABLE, &event)?;
                Ok(event)
            })
            .await
    }

    /// Removes the club, every event hosted by it and every registration
    /// for those events, all in one transaction.
    pub async fn delete_club(
        &self,
        name: &str,
        requester: &Identity,
    ) -> Result<(), RegistryError> {
        self.store
            .mutate(|txn| {
                let Some(club) = txn.get_one(CLUBS_TABLE, |club: &Club| club.name == name)?
                else {
                    return Err(RegistryError::Forbidden);
                };
                if !self.policy.can_modify(requester, &club.created_by) {
                    return Err(RegistryError::Forbidden);
                }
                let events: Vec<Event> =
                    txn.find(EVENTS_TABLE, |event: &Event| event.club_name == name)?;
                Ledger::cascade_remove_for_club(txn, &events)?;
                txn.remove(EVENTS_TABLE, |event: &Event| event.club_name == name)?;
                txn.remove(CLUBS_TABLE, |club: &Club| club.name == name)?;
                Ok(())
            })
            .await
    }

    /// Removes the event and every registration for it, in one
    /// transaction.
    pub async fn delete_event(
        &self,
        id: &str,
        requester: &Identity,
    ) -> Result<(), RegistryError> {
        self.store
            .mutate(|txn| {
                let Some(event) = txn.get_one(EVENTS_TABLE, |event: &Event| event.id == id)?
                else {
                    return Err(RegistryError::Forbidden);
                };
                if !self.policy.can_modify(requester, &event.created_by) {
                    return Err(RegistryError::Forbidden);
                }
                Ledger::cascade_remove_for_event(txn, id)?;
                txn.remove(EVENTS_TABLE, |event: &Event| event.id == id)?;
                Ok(())
            })
            .await
    }

    /// Clubs in insertion order.
    pub async fn list_clubs(&self) -> Result<Vec<Club>, StoreError> {
        self.store.all(CLUBS_TABLE).await
    }

    /// Events ascending by date; records whose date does not parse as
    /// `YYYY-MM-DD` sort after all dated ones. Ties keep stored order.
    pub async fn list_events(&self) -> Result<Vec<Event>, StoreError> {
        let mut events: Vec<Event> = self.store.all(EVENTS_TABLE).await?;
        events.sort_by_key(|event| match NaiveDate::parse_from_str(&event.date, "%Y-%m-%d") {
            Ok(date) => (false, Some(date)),
            Err(_) => (true, None),
        });
        Ok(events)
    }
}
