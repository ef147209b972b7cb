use campus_club_hub_database::{Store, StoreError};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
struct Note {
    topic: String,
    body: String,
}

fn note(topic: &str, body: &str) -> Note {
    Note {
        topic: topic.to_owned(),
        body: body.to_owned(),
    }
}

#[tokio::test]
async fn insert_then_find_and_get_one() {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(dir.path().join("db.json")).await.unwrap();

    store
        .mutate(|txn| {
            txn.insert("notes", &note("a", "first"))?;
            txn.insert("notes", &note("b", "second"))?;
            Ok::<_, StoreError>(())
        })
        .await
        .unwrap();

    let all: Vec<Note> = store.all("notes").await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].topic, "a");

    let found: Option<Note> = store
        .get_one("notes", |n: &Note| n.topic == "b")
        .await
        .unwrap();
    assert_eq!(found, Some(note("b", "second")));

    let missing: Vec<Note> = store
        .find("notes", |n: &Note| n.topic == "z")
        .await
        .unwrap();
    assert!(missing.is_empty());
}

#[tokio::test]
async fn unknown_table_reads_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(dir.path().join("db.json")).await.unwrap();
    let records: Vec<Note> = store.all("nothing-here").await.unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn remove_only_matching_records() {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(dir.path().join("db.json")).await.unwrap();

    let removed = store
        .mutate(|txn| {
            txn.insert("notes", &note("keep", "x"))?;
            txn.insert("notes", &note("drop", "y"))?;
            txn.insert("notes", &note("drop", "z"))?;
            txn.remove("notes", |n: &Note| n.topic == "drop")
        })
        .await
        .unwrap();
    assert_eq!(removed, 2);

    let all: Vec<Note> = store.all("notes").await.unwrap();
    assert_eq!(all, vec![note("keep", "x")]);
}

#[tokio::test]
async fn failed_mutation_applies_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("db.json");
    let store = Store::open(&path).await.unwrap();

    store
        .mutate(|txn| {
            txn.insert("notes", &note("a", "first"))?;
            Ok::<_, StoreError>(())
        })
        .await
        .unwrap();

    let result: Result<(), StoreError> = store
        .mutate(|txn| {
            txn.insert("notes", &note("b", "second"))?;
            Err(std::io::Error::other("domain check failed").into())
        })
        .await;
    assert!(result.is_err());

    // neither memory nor disk saw the aborted insert
    let all: Vec<Note> = store.all("notes").await.unwrap();
    assert_eq!(all.len(), 1);
    let reopened = Store::open(&path).await.unwrap();
    let persisted: Vec<Note> = reopened.all("notes").await.unwrap();
    assert_eq!(persisted.len(), 1);
}

#[tokio::test]
async fn committed_data_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("db.json");

    {
        let store = Store::open(&path).await.unwrap();
        store
            .mutate(|txn| txn.insert("notes", &note("a", "persisted")))
            .await
            .unwrap();
    }

    let store = Store::open(&path).await.unwrap();
    let all: Vec<Note> = store.all("notes").await.unwrap();
    assert_eq!(all, vec![note("a", "persisted")]);
}

#[tokio::test]
async fn update_raw_patches_records_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(dir.path().join("db.json")).await.unwrap();

    store
        .mutate(|txn| {
            txn.insert("notes", &note("a", "x"))?;
            txn.insert("notes", &note("b", "y"))?;
            Ok::<_, StoreError>(())
        })
        .await
        .unwrap();

    let changed = store
        .mutate(|txn| {
            Ok::<_, StoreError>(txn.update_raw("notes", |value| {
                let object = value.as_object_mut().unwrap();
                if object.contains_key("stamp") {
                    false
                } else {
                    object.insert("stamp".to_owned(), serde_json::json!(1));
                    true
                }
            }))
        })
        .await
        .unwrap();
    assert_eq!(changed, 2);

    // a second run finds the field already present
    let changed_again = store
        .mutate(|txn| {
            Ok::<_, StoreError>(txn.update_raw("notes", |value| {
                let object = value.as_object_mut().unwrap();
                if object.contains_key("stamp") {
                    false
                } else {
                    object.insert("stamp".to_owned(), serde_json::json!(1));
                    true
                }
            }))
        })
        .await
        .unwrap();
    assert_eq!(changed_again, 0);
}
