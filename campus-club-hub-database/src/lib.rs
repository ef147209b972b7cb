//! A small persistent document store: named collections of JSON records
//! backed by a single file on disk. The whole file is rewritten on every
//! committed mutation, so a transaction either lands completely or not at
//! all.

pub mod error;

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;

pub use error::StoreError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;

type Tables = BTreeMap<String, Vec<Value>>;

/// Handle to the store. Cheap to clone; all clones share the same
/// in-memory tables and file.
#[derive(Clone)]
pub struct Store {
    path: Arc<PathBuf>,
    tables: Arc<RwLock<Tables>>,
}

impl Store {
    /// Opens the store at `path`, creating an empty one if the file does
    /// not exist yet. The file is only written on the first mutation.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let tables = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(error) if error.kind() == ErrorKind::NotFound => Tables::new(),
            Err(error) => return Err(error.into()),
        };
        Ok(Self {
            path: Arc::new(path),
            tables: Arc::new(RwLock::new(tables)),
        })
    }

    pub async fn all<T: DeserializeOwned>(&self, table: &str) -> Result<Vec<T>, StoreError> {
        self.find(table, |_: &T| true).await
    }

    pub async fn find<T, P>(&self, table: &str, predicate: P) -> Result<Vec<T>, StoreError>
    where
        T: DeserializeOwned,
        P: Fn(&T) -> bool,
    {
        let tables = self.tables.read().await;
        filter_records(&tables, table, predicate)
    }

    pub async fn get_one<T, P>(&self, table: &str, predicate: P) -> Result<Option<T>, StoreError>
    where
        T: DeserializeOwned,
        P: Fn(&T) -> bool,
    {
        let tables = self.tables.read().await;
        first_record(&tables, table, predicate)
    }

    /// Runs `mutation` against a working copy of the tables. When it
    /// returns `Ok` the copy is persisted to disk (write to a sibling temp
    /// file, then rename) and published to readers. When it returns `Err`,
    /// or persisting fails, neither memory nor disk change.
    ///
    /// The write lock is held for the whole call, so concurrent mutations
    /// serialize and a check-then-insert inside one closure is atomic.
    pub async fn mutate<R, E, F>(&self, mutation: F) -> Result<R, E>
    where
        E: From<StoreError>,
        F: FnOnce(&mut Transaction<'_>) -> Result<R, E>,
    {
        let mut tables = self.tables.write().await;
        let mut working = tables.clone();
        let result = mutation(&mut Transaction {
            tables: &mut working,
        })?;
        self.persist(&working).await.map_err(E::from)?;
        *tables = working;
        Ok(result)
    }

    async fn persist(&self, tables: &Tables) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(tables)?;
        let staging = self.path.with_extension("json.tmp");
        tokio::fs::write(&staging, &bytes).await?;
        tokio::fs::rename(&staging, &*self.path).await?;
        Ok(())
    }
}

/// A mutable view of the tables inside [`Store::mutate`].
pub struct Transaction<'store> {
    tables: &'store mut Tables,
}

impl Transaction<'_> {
    pub fn insert<T: Serialize>(&mut self, table: &str, record: &T) -> Result<(), StoreError> {
        let value = serde_json::to_value(record)?;
        self.tables.entry(table.to_owned()).or_default().push(value);
        Ok(())
    }

    pub fn find<T, P>(&self, table: &str, predicate: P) -> Result<Vec<T>, StoreError>
    where
        T: DeserializeOwned,
        P: Fn(&T) -> bool,
    {
        filter_records(self.tables, table, predicate)
    }

    pub fn get_one<T, P>(&self, table: &str, predicate: P) -> Result<Option<T>, StoreError>
    where
        T: DeserializeOwned,
        P: Fn(&T) -> bool,
    {
        first_record(self.tables, table, predicate)
    }

    /// Removes every record matching `predicate`, returning how many were
    /// removed. Records that do not decode as `T` are left in place.
    pub fn remove<T, P>(&mut self, table: &str, predicate: P) -> Result<usize, StoreError>
    where
        T: DeserializeOwned,
        P: Fn(&T) -> bool,
    {
        let Some(records) = self.tables.get_mut(table) else {
            return Ok(0);
        };
        let mut removed = 0;
        records.retain(|value| {
            match serde_json::from_value::<T>(value.clone()) {
                Ok(record) if predicate(&record) => {
                    removed += 1;
                    false
                }
                _ => true,
            }
        });
        Ok(removed)
    }

    /// Applies `patch` to each raw record; `patch` returns whether it
    /// changed the record. Returns the number of changed records. Used for
    /// schema backfills that must run before records decode as their typed
    /// form.
    pub fn update_raw<F>(&mut self, table: &str, mut patch: F) -> usize
    where
        F: FnMut(&mut Value) -> bool,
    {
        let Some(records) = self.tables.get_mut(table) else {
            return 0;
        };
        let mut changed = 0;
        for value in records.iter_mut() {
            if patch(value) {
                changed += 1;
            }
        }
        changed
    }
}

fn filter_records<T, P>(tables: &Tables, table: &str, predicate: P) -> Result<Vec<T>, StoreError>
where
    T: DeserializeOwned,
    P: Fn(&T) -> bool,
{
    let Some(records) = tables.get(table) else {
        return Ok(Vec::new());
    };
    let mut matching = Vec::new();
    for value in records {
        let record: T = serde_json::from_value(value.clone())?;
        if predicate(&record) {
            matching.push(record);
        }
    }
    Ok(matching)
}

fn first_record<T, P>(tables: &Tables, table: &str, predicate: P) -> Result<Option<T>, StoreError>
where
    T: DeserializeOwned,
    P: Fn(&T) -> bool,
{
    Ok(filter_records(tables, table, predicate)?.into_iter().next())
}
