//! The form being filled in.

use crate::validation::{ValidationError, validate_billing, validate_participant};
use registration_core::batch::{BillingData, DEFAULT_INVOICE_TYPE, Participant, RegistrationBatch};

/// Fewest participants a submission can carry.
pub const MIN_PARTICIPANTS: usize = 1;

/// Most participants a submission can carry.
pub const MAX_PARTICIPANTS: usize = 10;

/// Billing block plus the participant rows currently shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionDraft {
    /// Shared billing data
    pub billing: BillingData,
    /// Participant rows, always between 1 and 10
    participants: Vec<Participant>,
}

impl Default for SubmissionDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl SubmissionDraft {
    /// Empty billing data and one default participant.
    #[must_use]
    pub fn new() -> Self {
        Self {
            billing: BillingData::default(),
            participants: vec![Participant::default()],
        }
    }

    /// Participant rows.
    #[must_use]
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    /// Mutable access to one row, `index` being 0-based.
    pub fn participant_mut(&mut self, index: usize) -> Option<&mut Participant> {
        self.participants.get_mut(index)
    }

    /// Resize the participant list.
    ///
    /// The count is clamped to 1..=10. Growing appends default participants
    /// (nationality `V`, ticket `Venta`); shrinking drops trailing rows.
    /// Returns the count actually applied.
    pub fn set_participant_count(&mut self, count: usize) -> usize {
        let count = count.clamp(MIN_PARTICIPANTS, MAX_PARTICIPANTS);
        self.participants.resize_with(count, Participant::default);
        count
    }

    /// Run every local check, billing first, then participants in order.
    ///
    /// # Errors
    ///
    /// The first [`ValidationError`] found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_billing(&self.billing)?;
        for (index, participant) in self.participants.iter().enumerate() {
            validate_participant(participant, index + 1)?;
        }
        Ok(())
    }

    /// Request body for this draft, with the invoice type set to `Pro forma`.
    #[must_use]
    pub fn to_batch(&self) -> RegistrationBatch {
        RegistrationBatch {
            billing: Some(BillingData {
                invoice_type: Some(DEFAULT_INVOICE_TYPE.to_string()),
                ..self.billing.clone()
            }),
            participants: self.participants.clone(),
        }
    }
}
