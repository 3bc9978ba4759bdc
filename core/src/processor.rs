//! Registration processor: validates a batch against the ledger and writes it.
//!
//! # Flow
//!
//! ```text
//! batch ──► shape check ──► collect codes ──┐
//!                                           ▼
//!                         ┌──────── single-writer gate ────────┐
//!                         │ ledger lookup (one call)           │
//!                         │ missing? ──► Conflict              │
//!                         │ consumed? ─► Conflict              │
//!                         │ create attendee rows (one call)    │
//!                         │ mark codes consumed (one call)     │
//!                         └────────────────────────────────────┘
//!                                           ▼
//!                                  receipt (record count)
//! ```
//!
//! # Concurrency
//!
//! The lookup and the consume step are two separate store calls and the
//! hosted store has no conditional update. Two submissions sharing a code
//! could both pass the lookup before either marks it. The processor therefore
//! runs the lookup-through-mark sequence behind an async mutex owned by the
//! processor instance: within one deployment instance, at most one batch
//! redeeming a given code can succeed. Instances do not coordinate with each
//! other, so registrations must be routed to a single instance.
//!
//! The gated sequence is spawned onto the runtime and awaited, so a caller
//! that goes away mid-request cannot leave rows created with codes unmarked.
//!
//! # Partial writes
//!
//! Creating the attendee rows and marking the codes are not atomic. If the
//! mark fails, the rows stay created and the codes stay unconsumed; the
//! failure is logged with the billing key for an operator to reconcile.

use crate::batch::{BillingData, Participant, RegistrationBatch};
use crate::environment::Clock;
use crate::error::{ErrorKind, RegistrationError};
use crate::ledger::{LedgerEntry, ValidationLedger};
use crate::record::{FieldValue, Fields};
use crate::schema::inscription as col;
use crate::store::{RecordStore, StoreError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::Instrument;

/// What to do when one batch repeats a validator code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateCodePolicy {
    /// Treat repeats as one code (one code may cover several attendees).
    #[default]
    Merge,
    /// Reject the batch, naming the repeated codes.
    Reject,
}

impl FromStr for DuplicateCodePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "merge" => Ok(Self::Merge),
            "reject" => Ok(Self::Reject),
            other => Err(format!("unknown duplicate code policy: {other} (expected merge or reject)")),
        }
    }
}

impl fmt::Display for DuplicateCodePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Merge => f.write_str("merge"),
            Self::Reject => f.write_str("reject"),
        }
    }
}

/// Tables and policies the processor runs with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessorConfig {
    /// Table receiving one row per attendee.
    pub inscription_table: String,
    /// Ledger table of validator codes.
    pub validation_table: String,
    /// Handling of repeated codes within one batch.
    pub duplicate_codes: DuplicateCodePolicy,
}

impl ProcessorConfig {
    /// Configuration with the default duplicate-code policy.
    #[must_use]
    pub fn new(inscription_table: impl Into<String>, validation_table: impl Into<String>) -> Self {
        Self {
            inscription_table: inscription_table.into(),
            validation_table: validation_table.into(),
            duplicate_codes: DuplicateCodePolicy::default(),
        }
    }

    /// Override the duplicate-code policy.
    #[must_use]
    pub const fn with_duplicate_codes(mut self, policy: DuplicateCodePolicy) -> Self {
        self.duplicate_codes = policy;
        self
    }
}

/// Result of an accepted batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationReceipt {
    /// Attendee rows created.
    pub record_count: usize,
    /// Correlation key written on every row of the batch.
    pub billing_key: String,
    /// Codes now consumed.
    pub codes: BTreeSet<String>,
}

/// Server-side decision and write logic for registration batches.
///
/// Cheap to share: the store, ledger and gate live behind one `Arc`.
pub struct RegistrationProcessor {
    inner: Arc<Inner>,
}

struct Inner {
    store: Arc<dyn RecordStore>,
    ledger: ValidationLedger,
    clock: Arc<dyn Clock>,
    config: ProcessorConfig,
    gate: Mutex<()>,
}

impl RegistrationProcessor {
    /// Build a processor over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>, clock: Arc<dyn Clock>, config: ProcessorConfig) -> Self {
        let ledger = ValidationLedger::new(Arc::clone(&store), config.validation_table.clone());
        Self {
            inner: Arc::new(Inner {
                store,
                ledger,
                clock,
                config,
                gate: Mutex::new(()),
            }),
        }
    }

    /// Validate and persist one batch.
    ///
    /// Either every attendee is written and every code consumed, or the batch
    /// is rejected before any write. A store failure after the attendee rows
    /// were created is the one exception (see the module docs).
    ///
    /// The gated sequence runs on its own task: dropping the returned future
    /// (client disconnect, request timeout) does not stop it between the
    /// create and the mark.
    ///
    /// # Errors
    ///
    /// - [`RegistrationError::IncompleteBatch`] / [`RegistrationError::BlankValidatorCode`]
    ///   for malformed input
    /// - [`RegistrationError::DuplicateCodes`] when the policy is `Reject`
    /// - [`RegistrationError::UnknownCodes`], reported in preference to
    ///   [`RegistrationError::CodesAlreadyUsed`]
    /// - [`RegistrationError::Store`] for any store failure
    #[tracing::instrument(skip_all, fields(participants = batch.participants.len()))]
    pub async fn register(&self, batch: RegistrationBatch) -> Result<RegistrationReceipt, RegistrationError> {
        let result = self.process(batch).await;

        let outcome = match &result {
            Ok(_) => "accepted",
            Err(err) => match err.kind() {
                ErrorKind::BadRequest => "bad_request",
                ErrorKind::Conflict => "conflict",
                ErrorKind::Internal => "internal",
            },
        };
        metrics::counter!("registration_batches_total", "outcome" => outcome).increment(1);

        result
    }

    async fn process(&self, batch: RegistrationBatch) -> Result<RegistrationReceipt, RegistrationError> {
        let RegistrationBatch {
            billing,
            participants,
        } = batch;

        let billing = match billing {
            Some(billing) if !participants.is_empty() => billing,
            _ => return Err(RegistrationError::IncompleteBatch),
        };

        let codes = requested_codes(&participants, self.inner.config.duplicate_codes)?;

        let inner = Arc::clone(&self.inner);
        tokio::spawn(
            async move { inner.commit(billing, participants, codes).await }.instrument(tracing::Span::current()),
        )
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Registration task did not complete");
            RegistrationError::Store(StoreError::Other(format!("registration task failed: {e}")))
        })?
    }
}

impl Inner {
    /// Lookup, checks, create and mark, under the gate.
    async fn commit(
        &self,
        billing: BillingData,
        participants: Vec<Participant>,
        codes: BTreeSet<String>,
    ) -> Result<RegistrationReceipt, RegistrationError> {
        let _gate = self.gate.lock().await;

        let entries = self.ledger.find_by_codes(&codes).await?;
        if let Err(err) = check_codes(&codes, &entries) {
            tracing::warn!(codes = ?err.codes(), "Registration rejected: {err}");
            return Err(err);
        }

        let submitted_at = self.clock.now();
        let billing_key = billing_key(&billing, submitted_at);
        let rows = build_rows(&billing, &participants, &billing_key, submitted_at);

        let created = self
            .store
            .create(self.config.inscription_table.clone(), rows)
            .await?;

        if let Err(error) = self.ledger.mark_entries_consumed(&entries).await {
            tracing::error!(
                billing_key = %billing_key,
                created = created.len(),
                error = %error,
                "Attendee records persisted but validator codes were not marked consumed"
            );
            return Err(error.into());
        }

        metrics::counter!("registration_records_created_total").increment(created.len() as u64);
        tracing::info!(
            billing_key = %billing_key,
            records = created.len(),
            "Registration accepted"
        );

        Ok(RegistrationReceipt {
            record_count: created.len(),
            billing_key,
            codes,
        })
    }
}

impl fmt::Debug for RegistrationProcessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationProcessor")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

/// Trimmed, deduplicated validator codes of a batch.
///
/// # Errors
///
/// [`RegistrationError::BlankValidatorCode`] for an empty code, and
/// [`RegistrationError::DuplicateCodes`] for repeats under
/// [`DuplicateCodePolicy::Reject`].
pub fn requested_codes(
    participants: &[Participant],
    policy: DuplicateCodePolicy,
) -> Result<BTreeSet<String>, RegistrationError> {
    let mut codes = BTreeSet::new();
    let mut repeated = BTreeSet::new();

    for (index, participant) in participants.iter().enumerate() {
        let code = participant.trimmed_code();
        if code.is_empty() {
            return Err(RegistrationError::BlankValidatorCode { position: index + 1 });
        }
        if !codes.insert(code.to_string()) {
            repeated.insert(code.to_string());
        }
    }

    if policy == DuplicateCodePolicy::Reject && !repeated.is_empty() {
        return Err(RegistrationError::DuplicateCodes {
            codes: repeated.into_iter().collect(),
        });
    }

    Ok(codes)
}

/// Compare requested codes against what the ledger returned.
///
/// Missing codes win over consumed ones when both occur.
///
/// # Errors
///
/// [`RegistrationError::UnknownCodes`] or [`RegistrationError::CodesAlreadyUsed`].
pub fn check_codes(requested: &BTreeSet<String>, entries: &[LedgerEntry]) -> Result<(), RegistrationError> {
    let found: BTreeSet<&str> = entries.iter().map(|entry| entry.code.as_str()).collect();

    let missing: Vec<String> = requested
        .iter()
        .filter(|code| !found.contains(code.as_str()))
        .cloned()
        .collect();
    if !missing.is_empty() {
        return Err(RegistrationError::UnknownCodes { codes: missing });
    }

    let used: BTreeSet<&str> = entries
        .iter()
        .filter(|entry| entry.consumed)
        .map(|entry| entry.code.as_str())
        .collect();
    if !used.is_empty() {
        return Err(RegistrationError::CodesAlreadyUsed {
            codes: used.into_iter().map(str::to_string).collect(),
        });
    }

    Ok(())
}

/// Correlation key grouping one batch's rows: sanitized payer tax ID plus
/// the submission time in epoch milliseconds.
///
/// Two batches for the same payer within the same millisecond collide; the
/// key is informational and nothing enforces its uniqueness.
#[must_use]
pub fn billing_key(billing: &BillingData, submitted_at: DateTime<Utc>) -> String {
    format!("{}-{}", billing.sanitized_tax_id(), submitted_at.timestamp_millis())
}

/// One inscription row per participant, billing columns repeated on each.
#[must_use]
pub fn build_rows(
    billing: &BillingData,
    participants: &[Participant],
    billing_key: &str,
    submitted_at: DateTime<Utc>,
) -> Vec<Fields> {
    let registered_on = submitted_at.format("%Y-%m-%d").to_string();

    let mut shared = Fields::new();
    shared.insert(col::BILLING_TAX_ID.into(), billing.tax_id.as_str().into());
    shared.insert(col::BILLING_FISCAL_NAME.into(), billing.fiscal_name.as_str().into());
    shared.insert(col::BILLING_FISCAL_ADDRESS.into(), billing.fiscal_address.as_str().into());
    shared.insert(col::BILLING_PHONE.into(), billing.phone.as_str().into());
    shared.insert(col::BILLING_SECTOR.into(), billing.sector.as_str().into());
    shared.insert(col::INVOICE_TYPE.into(), billing.invoice_type_or_default().into());
    shared.insert(col::BILLING_KEY.into(), billing_key.into());
    shared.insert(col::REGISTERED_ON.into(), registered_on.into());

    participants
        .iter()
        .map(|p| {
            let mut row = shared.clone();
            row.insert(col::VALIDATOR_CODE.into(), p.trimmed_code().into());
            row.insert(col::NATIONALITY.into(), p.nationality.as_str().into());
            row.insert(col::NATIONAL_ID.into(), p.national_id.as_str().into());
            row.insert(col::TICKET_KIND.into(), p.ticket_kind.as_str().into());
            row.insert(col::FIRST_NAME.into(), p.first_name.as_str().into());
            row.insert(col::LAST_NAME.into(), p.last_name.as_str().into());
            row.insert(col::MOBILE_PHONE.into(), p.mobile_phone.as_str().into());
            if let Some(office) = p.office_phone.as_deref().filter(|phone| !phone.is_empty()) {
                row.insert(col::OFFICE_PHONE.into(), office.into());
            }
            row.insert(col::EMAIL.into(), p.email.as_str().into());
            row.insert(col::ORGANIZATION.into(), p.organization_name.as_str().into());
            row.insert(col::ORGANIZATION_TAX_ID.into(), p.organization_tax_id.as_str().into());
            row.insert(col::ROLE.into(), p.role.as_str().into());
            row.insert(col::ORGANIZATION_SECTOR.into(), FieldValue::from(p.sector.as_str()));
            row
        })
        .collect()
}
