//! Validation-code ledger.
//!
//! The ledger is the table of issuable validator codes. Each row carries the
//! code and a `consumed` checkbox that moves from unset to set exactly once,
//! when a registration redeeming the code succeeds. Rows are provisioned
//! outside this system and never deleted or reset by it.

use crate::record::{FieldValue, Fields, Filter, Query, Record, RecordId, RecordUpdate};
use crate::schema;
use crate::store::{RecordStore, StoreError};
use std::collections::BTreeSet;
use std::sync::Arc;

/// One ledger row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    /// Store identifier, needed to update the row.
    pub record_id: RecordId,
    /// Validator code.
    pub code: String,
    /// Whether the code has already been redeemed.
    pub consumed: bool,
}

impl LedgerEntry {
    /// Read an entry out of a ledger row.
    ///
    /// Returns `None` for rows without a code; those can never match a lookup.
    #[must_use]
    pub fn from_record(record: &Record) -> Option<Self> {
        let code = record.get(schema::ledger::CODE)?.as_text()?.into_owned();
        let consumed = record
            .get(schema::ledger::USED)
            .is_some_and(FieldValue::is_truthy);

        Some(Self {
            record_id: record.id.clone(),
            code,
            consumed,
        })
    }
}

/// Read/write access to the validation table.
#[derive(Clone)]
pub struct ValidationLedger {
    store: Arc<dyn RecordStore>,
    table: String,
}

impl ValidationLedger {
    /// Ledger backed by `table` in `store`.
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>, table: impl Into<String>) -> Self {
        Self {
            store,
            table: table.into(),
        }
    }

    /// Fetch every ledger row whose code is in `codes`, with one store call.
    ///
    /// Codes that are not provisioned are simply absent from the result.
    /// Duplicate rows for the same code are all returned.
    ///
    /// # Errors
    ///
    /// Propagates the store failure.
    pub async fn find_by_codes(&self, codes: &BTreeSet<String>) -> Result<Vec<LedgerEntry>, StoreError> {
        if codes.is_empty() {
            return Ok(Vec::new());
        }

        let query = Query::filtered(Filter::any_of(schema::ledger::CODE, codes.iter().cloned()))
            .with_fields([schema::ledger::CODE, schema::ledger::USED]);

        let records = self.store.select(self.table.clone(), query).await?;

        Ok(records
            .iter()
            .filter_map(LedgerEntry::from_record)
            .filter(|entry| codes.contains(&entry.code))
            .collect())
    }

    /// Mark already-fetched entries as consumed, with one store call.
    ///
    /// Entries that are already consumed are written again; the store treats
    /// that as a no-op. An empty slice makes no call.
    ///
    /// # Errors
    ///
    /// Propagates the store failure.
    pub async fn mark_entries_consumed(&self, entries: &[LedgerEntry]) -> Result<usize, StoreError> {
        if entries.is_empty() {
            return Ok(0);
        }

        let updates: Vec<RecordUpdate> = entries
            .iter()
            .map(|entry| {
                let mut fields = Fields::new();
                fields.insert(schema::ledger::USED.to_string(), FieldValue::Bool(true));
                RecordUpdate {
                    id: entry.record_id.clone(),
                    fields,
                }
            })
            .collect();

        let updated = self.store.update(self.table.clone(), updates).await?;
        Ok(updated.len())
    }

    /// Mark every ledger row for `codes` as consumed.
    ///
    /// Looks the codes up first, so unknown codes are ignored. Idempotent.
    ///
    /// # Errors
    ///
    /// Propagates the store failure of either call.
    pub async fn mark_consumed(&self, codes: &BTreeSet<String>) -> Result<usize, StoreError> {
        let entries = self.find_by_codes(codes).await?;
        self.mark_entries_consumed(&entries).await
    }
}

impl std::fmt::Debug for ValidationLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationLedger")
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, fields: &[(&str, FieldValue)]) -> Record {
        Record {
            id: RecordId::new(id),
            fields: fields
                .iter()
                .map(|(k, v)| ((*k).to_string(), v.clone()))
                .collect(),
        }
    }

    #[test]
    fn test_entry_without_used_column_is_unconsumed() {
        let entry = LedgerEntry::from_record(&record("rec1", &[("ID Validador", "ABC123".into())]));
        assert_eq!(
            entry,
            Some(LedgerEntry {
                record_id: RecordId::new("rec1"),
                code: "ABC123".into(),
                consumed: false,
            })
        );
    }

    #[test]
    fn test_entry_with_checked_box_is_consumed() {
        let entry = LedgerEntry::from_record(&record(
            "rec1",
            &[("ID Validador", "ABC123".into()), ("Usado", FieldValue::Bool(true))],
        ));
        assert!(entry.is_some_and(|e| e.consumed));
    }

    #[test]
    fn test_row_without_code_is_skipped() {
        assert_eq!(
            LedgerEntry::from_record(&record("rec1", &[("Usado", FieldValue::Bool(true))])),
            None
        );
    }
}
