//! Startup schema backfill. Event documents written before the surrogate
//! key existed have no `id`; every read path assumes one, so the pass runs
//! before the server accepts connections. Idempotent: a second run finds
//! the field already present and changes nothing.

use campus_club_hub_database::{Store, StoreError};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::registry::EVENTS_TABLE;

pub async fn backfill_event_ids(store: &Store) -> Result<usize, StoreError> {
    let changed = store
        .mutate(|txn| {
            Ok::<_, StoreError>(txn.update_raw(EVENTS_TABLE, |value| {
                let Some(object) = value.as_object_mut() else {
                    return false;
                };
                if object
                    .get("id")
                    .and_then(Value::as_str)
                    .is_some_and(|id| !id.is_empty())
                {
                    return false;
                }
                object.insert("id".to_owned(), Value::String(Uuid::new_v4().to_string()));
                true
            }))
        })
        .await?;
    if changed > 0 {
        info!(changed, "assigned ids to legacy event records");
    }
    Ok(changed)
}
