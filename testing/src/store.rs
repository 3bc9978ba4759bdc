//! In-memory record store for fast, deterministic testing.
//!
//! Provides [`InMemoryRecordStore`], a `HashMap`-backed implementation of
//! [`RecordStore`] with:
//! - Sequential record ids (`rec00001`, `rec00002`, ...)
//! - Per-operation failure injection
//! - Call counting for "exactly one batched call" assertions
//! - A yield point at the start of every call, so concurrent callers
//!   interleave the way they would against a real network store

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)] // Lock poisoning only follows a panicking test

use registration_core::record::{Fields, Query, Record, RecordId, RecordUpdate};
use registration_core::schema::ledger as schema;
use registration_core::store::{RecordStore, StoreError, StoreFuture};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, RwLock};

/// Store operation, used to target failure injection and call counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `RecordStore::select`
    Select,
    /// `RecordStore::create`
    Create,
    /// `RecordStore::update`
    Update,
}

#[derive(Debug, Default)]
struct Tables {
    rows: HashMap<String, Vec<Record>>,
    next_id: u64,
    failures: HashMap<Operation, VecDeque<StoreError>>,
    calls: HashMap<Operation, usize>,
}

impl Tables {
    fn allocate_id(&mut self) -> RecordId {
        self.next_id += 1;
        RecordId::new(format!("rec{:05}", self.next_id))
    }

    fn begin(&mut self, operation: Operation) -> Result<(), StoreError> {
        *self.calls.entry(operation).or_default() += 1;
        match self.failures.get_mut(&operation).and_then(VecDeque::pop_front) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

/// In-memory table store.
///
/// # Example
///
/// ```
/// use registration_testing::InMemoryRecordStore;
///
/// let store = InMemoryRecordStore::new();
/// store.seed_ledger("Validaciones", &[("ABC123", false), ("XYZ789", true)]);
///
/// assert_eq!(store.rows("Validaciones").len(), 2);
/// assert_eq!(store.is_code_consumed("Validaciones", "XYZ789"), Some(true));
/// ```
#[derive(Clone, Debug, Default)]
pub struct InMemoryRecordStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryRecordStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a row directly, bypassing failure injection and call counts.
    pub fn insert(&self, table: &str, fields: Fields) -> RecordId {
        let mut tables = self.tables.write().unwrap();
        let id = tables.allocate_id();
        tables
            .rows
            .entry(table.to_string())
            .or_default()
            .push(Record {
                id: id.clone(),
                fields,
            });
        id
    }

    /// Provision ledger rows as `(code, consumed)` pairs.
    ///
    /// Unconsumed rows have no `Usado` column at all, like an unchecked
    /// checkbox in the hosted store.
    pub fn seed_ledger(&self, table: &str, codes: &[(&str, bool)]) {
        for (code, consumed) in codes {
            let mut fields = Fields::new();
            fields.insert(schema::CODE.to_string(), (*code).into());
            if *consumed {
                fields.insert(schema::USED.to_string(), true.into());
            }
            self.insert(table, fields);
        }
    }

    /// Snapshot of every row in `table`, in insertion order.
    #[must_use]
    pub fn rows(&self, table: &str) -> Vec<Record> {
        self.tables
            .read()
            .unwrap()
            .rows
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    /// Consumed state of the first ledger row carrying `code`.
    #[must_use]
    pub fn is_code_consumed(&self, table: &str, code: &str) -> Option<bool> {
        self.rows(table)
            .iter()
            .find(|row| {
                row.get(schema::CODE)
                    .and_then(|value| value.as_text())
                    .is_some_and(|text| text == code)
            })
            .map(|row| row.get(schema::USED).is_some_and(|value| value.is_truthy()))
    }

    /// Make the next call of `operation` fail with `error`.
    ///
    /// Calling this repeatedly queues failures for successive calls.
    pub fn fail_next(&self, operation: Operation, error: StoreError) {
        self.tables
            .write()
            .unwrap()
            .failures
            .entry(operation)
            .or_default()
            .push_back(error);
    }

    /// Number of calls made to `operation`, failed ones included.
    #[must_use]
    pub fn calls(&self, operation: Operation) -> usize {
        self.tables
            .read()
            .unwrap()
            .calls
            .get(&operation)
            .copied()
            .unwrap_or(0)
    }
}

fn project(record: &Record, columns: &[String]) -> Record {
    if columns.is_empty() {
        return record.clone();
    }
    Record {
        id: record.id.clone(),
        fields: record
            .fields
            .iter()
            .filter(|(name, _)| columns.contains(name))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect(),
    }
}

impl RecordStore for InMemoryRecordStore {
    fn select(&self, table: String, query: Query) -> StoreFuture<'_, Vec<Record>> {
        Box::pin(async move {
            tokio::task::yield_now().await;

            let mut tables = self.tables.write().unwrap();
            tables.begin(Operation::Select)?;

            Ok(tables
                .rows
                .get(&table)
                .map(|rows| {
                    rows.iter()
                        .filter(|row| query.filter.matches(&row.fields))
                        .map(|row| project(row, &query.fields))
                        .collect()
                })
                .unwrap_or_default())
        })
    }

    fn create(&self, table: String, rows: Vec<Fields>) -> StoreFuture<'_, Vec<Record>> {
        Box::pin(async move {
            tokio::task::yield_now().await;

            let mut tables = self.tables.write().unwrap();
            tables.begin(Operation::Create)?;

            let created: Vec<Record> = rows
                .into_iter()
                .map(|fields| Record {
                    id: tables.allocate_id(),
                    fields,
                })
                .collect();

            tables
                .rows
                .entry(table)
                .or_default()
                .extend(created.iter().cloned());

            Ok(created)
        })
    }

    fn update(&self, table: String, updates: Vec<RecordUpdate>) -> StoreFuture<'_, Vec<Record>> {
        Box::pin(async move {
            tokio::task::yield_now().await;

            let mut tables = self.tables.write().unwrap();
            tables.begin(Operation::Update)?;

            let rows = tables.rows.entry(table).or_default();

            // Validate every id first so a bad batch changes nothing.
            if let Some(unknown) = updates
                .iter()
                .find(|update| !rows.iter().any(|row| row.id == update.id))
            {
                return Err(StoreError::ApiError {
                    status: 404,
                    message: format!("Record not found: {}", unknown.id),
                });
            }

            let mut updated = Vec::with_capacity(updates.len());
            for update in updates {
                if let Some(row) = rows.iter_mut().find(|row| row.id == update.id) {
                    row.fields.extend(update.fields);
                    updated.push(row.clone());
                }
            }

            Ok(updated)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use registration_core::record::{FieldValue, Filter};

    #[tokio::test]
    async fn test_select_filters_and_projects() {
        let store = InMemoryRecordStore::new();
        store.seed_ledger("Validaciones", &[("ABC123", false), ("XYZ789", true), ("OTHER0", false)]);

        let query = Query::filtered(Filter::any_of("ID Validador", ["ABC123", "XYZ789"]))
            .with_fields(["ID Validador"]);
        let rows = store.select("Validaciones".into(), query).await.unwrap();

        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|row| row.get("Usado").is_none()));
        assert_eq!(store.calls(Operation::Select), 1);
    }

    #[tokio::test]
    async fn test_injected_failure_is_consumed_once() {
        let store = InMemoryRecordStore::new();
        store.fail_next(Operation::Create, StoreError::RateLimited);

        let first = store.create("T".into(), vec![Fields::new()]).await;
        let second = store.create("T".into(), vec![Fields::new()]).await;

        assert_eq!(first, Err(StoreError::RateLimited));
        assert_eq!(second.unwrap().len(), 1);
        assert_eq!(store.rows("T").len(), 1);
        assert_eq!(store.calls(Operation::Create), 2);
    }

    #[tokio::test]
    async fn test_update_rejects_unknown_ids_atomically() {
        let store = InMemoryRecordStore::new();
        store.seed_ledger("V", &[("ABC123", false)]);
        let known = store.rows("V")[0].id.clone();

        let mut fields = Fields::new();
        fields.insert("Usado".into(), FieldValue::Bool(true));
        let result = store
            .update(
                "V".into(),
                vec![
                    RecordUpdate { id: known, fields: fields.clone() },
                    RecordUpdate { id: RecordId::new("recMISSING"), fields },
                ],
            )
            .await;

        assert!(matches!(result, Err(StoreError::ApiError { status: 404, .. })));
        assert_eq!(store.is_code_consumed("V", "ABC123"), Some(false));
    }
}
