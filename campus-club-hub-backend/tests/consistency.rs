//! The consistency rules between clubs, events and registrations,
//! exercised through the same components the route handlers use.

use std::sync::Arc;

use campus_club_hub_backend::entities::{Event, Identity, NewClub, NewEvent, Role};
use campus_club_hub_backend::ledger::{Ledger, RegisterOutcome};
use campus_club_hub_backend::migrate;
use campus_club_hub_backend::policy::{OwnerOnly, OwnerOrAdmin};
use campus_club_hub_backend::registry::{Registry, RegistryError};
use campus_club_hub_database::{Store, StoreError};
use tempfile::TempDir;

async fn setup() -> (TempDir, Store, Registry, Ledger) {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(dir.path().join("db.json")).await.unwrap();
    let registry = Registry::new(store.clone(), Arc::new(OwnerOrAdmin));
    let ledger = Ledger::new(store.clone());
    (dir, store, registry, ledger)
}

fn student(username: &str) -> Identity {
    Identity {
        username: username.to_owned(),
        role: Role::Student,
    }
}

fn admin(username: &str) -> Identity {
    Identity {
        username: username.to_owned(),
        role: Role::Admin,
    }
}

fn club(name: &str) -> NewClub {
    NewClub::new(
        name.to_owned(),
        "A club for testing.".to_owned(),
        "Lea Der".to_owned(),
    )
    .unwrap()
}

fn event(title: &str, club_name: &str, date: &str) -> NewEvent {
    NewEvent::new(
        title.to_owned(),
        club_name.to_owned(),
        "Workshop".to_owned(),
        date.to_owned(),
        "Hall 1".to_owned(),
        "An event for testing.".to_owned(),
    )
    .unwrap()
}

#[tokio::test]
async fn second_club_with_same_name_is_rejected() {
    let (_dir, _store, registry, _ledger) = setup().await;
    let alice = student("alice");

    registry.create_club(club("Campus Tech"), &alice).await.unwrap();
    let duplicate = registry.create_club(club("Campus Tech"), &alice).await;
    assert!(matches!(duplicate, Err(RegistryError::DuplicateName)));

    assert_eq!(registry.list_clubs().await.unwrap().len(), 1);
}

#[tokio::test]
async fn registering_twice_keeps_exactly_one_record() {
    let (_dir, _store, registry, ledger) = setup().await;
    let alice = student("alice");

    registry.create_club(club("Campus Tech"), &alice).await.unwrap();
    let hackathon = registry
        .create_event(event("Hackathon", "Campus Tech", "2026-09-01"), &alice)
        .await
        .unwrap();

    assert_eq!(
        ledger.register(&hackathon.id, "bob").await.unwrap(),
        RegisterOutcome::Created
    );
    assert_eq!(
        ledger.register(&hackathon.id, "bob").await.unwrap(),
        RegisterOutcome::AlreadyRegistered
    );

    assert_eq!(ledger.count_for_event(&hackathon.id).await.unwrap(), 1);
    assert!(ledger.is_registered(&hackathon.id, "bob").await.unwrap());
}

#[tokio::test]
async fn unregistering_without_a_registration_is_a_noop() {
    let (_dir, _store, _registry, ledger) = setup().await;

    ledger.unregister("no-such-event", "bob").await.unwrap();
    assert_eq!(ledger.count_for_event("no-such-event").await.unwrap(), 0);
}

#[tokio::test]
async fn deleting_a_club_cascades_to_its_events_and_registrations() {
    let (_dir, _store, registry, ledger) = setup().await;
    let alice = student("alice");

    registry.create_club(club("Campus Tech"), &alice).await.unwrap();
    registry.create_club(club("Drama Club"), &alice).await.unwrap();

    let hackathon = registry
        .create_event(event("Hackathon", "Campus Tech", "2026-09-01"), &alice)
        .await
        .unwrap();
    let workshop = registry
        .create_event(event("Workshop", "Campus Tech", "2026-09-02"), &alice)
        .await
        .unwrap();
    let improv = registry
        .create_event(event("Improv Night", "Drama Club", "2026-09-03"), &alice)
        .await
        .unwrap();

    ledger.register(&hackathon.id, "bob").await.unwrap();
    ledger.register(&hackathon.id, "carol").await.unwrap();
    ledger.register(&workshop.id, "bob").await.unwrap();
    ledger.register(&improv.id, "bob").await.unwrap();

    registry.delete_club("Campus Tech", &alice).await.unwrap();

    let remaining = registry.list_events().await.unwrap();
    assert_eq!(
        remaining.iter().map(|event| event.id.as_str()).collect::<Vec<_>>(),
        vec![improv.id.as_str()]
    );
    assert_eq!(ledger.count_for_event(&hackathon.id).await.unwrap(), 0);
    assert_eq!(ledger.count_for_event(&workshop.id).await.unwrap(), 0);
    assert_eq!(ledger.count_for_event(&improv.id).await.unwrap(), 1);
    assert_eq!(registry.list_clubs().await.unwrap().len(), 1);
}

#[tokio::test]
async fn deleting_an_event_leaves_other_registrations_untouched() {
    let (_dir, _store, registry, ledger) = setup().await;
    let alice = student("alice");

    registry.create_club(club("Campus Tech"), &alice).await.unwrap();
    let first = registry
        .create_event(event("First", "Campus Tech", "2026-09-01"), &alice)
        .await
        .unwrap();
    let second = registry
        .create_event(event("Second", "Campus Tech", "2026-09-02"), &alice)
        .await
        .unwrap();

    ledger.register(&first.id, "bob").await.unwrap();
    ledger.register(&second.id, "bob").await.unwrap();

    registry.delete_event(&first.id, &alice).await.unwrap();

    assert_eq!(ledger.count_for_event(&first.id).await.unwrap(), 0);
    assert_eq!(ledger.count_for_event(&second.id).await.unwrap(), 1);
    assert_eq!(registry.list_events().await.unwrap().len(), 1);
}

#[tokio::test]
async fn deleting_is_forbidden_for_strangers_and_for_missing_records() {
    let (_dir, store, _registry, _ledger) = setup().await;
    let owner_only = Registry::new(store.clone(), Arc::new(OwnerOnly));
    let owner_or_admin = Registry::new(store, Arc::new(OwnerOrAdmin));

    let alice = student("alice");
    owner_only.create_club(club("Campus Tech"), &alice).await.unwrap();

    // a stranger, even an admin, is rejected under owner-only
    let result = owner_only.delete_club("Campus Tech", &admin("root")).await;
    assert!(matches!(result, Err(RegistryError::Forbidden)));

    // a missing record reports the same way as a denied one
    let result = owner_only.delete_club("No Such Club", &alice).await;
    assert!(matches!(result, Err(RegistryError::Forbidden)));
    let result = owner_only.delete_event("no-such-id", &alice).await;
    assert!(matches!(result, Err(RegistryError::Forbidden)));

    // the admin variant lets admins moderate other people's clubs
    owner_or_admin
        .delete_club("Campus Tech", &admin("root"))
        .await
        .unwrap();
}

#[tokio::test]
async fn events_are_listed_by_date_with_undated_ones_last() {
    let (_dir, store, registry, _ledger) = setup().await;
    let alice = student("alice");

    registry.create_club(club("Campus Tech"), &alice).await.unwrap();
    registry
        .create_event(event("Later", "Campus Tech", "2026-10-01"), &alice)
        .await
        .unwrap();
    registry
        .create_event(event("Sooner", "Campus Tech", "2026-09-01"), &alice)
        .await
        .unwrap();
    registry
        .create_event(event("Sometime", "Campus Tech", "TBD"), &alice)
        .await
        .unwrap();
    // a legacy document with no date field at all
    store
        .mutate(|txn| {
            txn.insert(
                "events",
                &serde_json::json!({"id": "legacy-1", "title": "Undated"}),
            )
        })
        .await
        .unwrap();

    let titles: Vec<String> = registry
        .list_events()
        .await
        .unwrap()
        .into_iter()
        .map(|event| event.title)
        .collect();
    assert_eq!(titles, vec!["Sooner", "Later", "Sometime", "Undated"]);
}

#[tokio::test]
async fn id_backfill_is_idempotent_and_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("db.json");

    {
        let store = Store::open(&path).await.unwrap();
        store
            .mutate(|txn| {
                txn.insert("events", &serde_json::json!({"title": "Legacy A"}))?;
                txn.insert("events", &serde_json::json!({"title": "Legacy B", "id": ""}))?;
                txn.insert(
                    "events",
                    &serde_json::json!({"title": "Modern", "id": "already-set"}),
                )?;
                Ok::<_, StoreError>(())
            })
            .await
            .unwrap();

        assert_eq!(migrate::backfill_event_ids(&store).await.unwrap(), 2);
        assert_eq!(migrate::backfill_event_ids(&store).await.unwrap(), 0);
    }

    // ids survive a reopen and a re-run keeps them stable
    let store = Store::open(&path).await.unwrap();
    let before: Vec<Event> = store.all("events").await.unwrap();
    assert!(before.iter().all(|event| !event.id.is_empty()));
    assert_eq!(migrate::backfill_event_ids(&store).await.unwrap(), 0);
    let after: Vec<Event> = store.all("events").await.unwrap();
    let ids = |events: &[Event]| {
        events
            .iter()
            .map(|event| event.id.clone())
            .collect::<Vec<_>>()
    };
    assert_eq!(ids(&before), ids(&after));
    assert!(after.iter().any(|event| event.id == "already-set"));
}

#[tokio::test]
async fn club_deletion_scenario_clears_everything() {
    let (_dir, _store, registry, ledger) = setup().await;
    let alice = student("alice");

    registry.create_club(club("Campus Tech"), &alice).await.unwrap();
    let hackathon = registry
        .create_event(event("Hackathon", "Campus Tech", "2026-09-01"), &alice)
        .await
        .unwrap();
    ledger.register(&hackathon.id, "bob").await.unwrap();

    registry.delete_club("Campus Tech", &admin("root")).await.unwrap();

    assert!(registry.list_events().await.unwrap().is_empty());
    assert!(!ledger.is_registered(&hackathon.id, "bob").await.unwrap());
    assert_eq!(ledger.count_for_event(&hackathon.id).await.unwrap(), 0);
}
