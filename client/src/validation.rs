//! Local checks run before a submission leaves the client.
//!
//! The checks are advisory: the server never relies on them. They exist so
//! the user gets a precise message naming the field and the participant
//! instead of a round trip.

use crate::input::MAX_PHONE_DIGITS;
use registration_core::batch::{BillingData, Participant};
use registration_core::identity::{TaxId, TaxIdError};
use thiserror::Error;

/// Required length of a validator code.
pub const VALIDATOR_CODE_LEN: usize = 6;

/// First problem found in a draft.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Payer RIF/cédula is malformed.
    #[error("The billing tax ID is not valid: {source}. Example: J-001234567 or V-1234567.")]
    BillingTaxId {
        /// What was wrong with it
        source: TaxIdError,
    },

    /// Billing phone is not exactly 11 digits.
    #[error("The billing phone must have exactly 11 digits.")]
    BillingPhone,

    /// A mandatory billing field is blank.
    #[error("Please complete the billing field '{field}'.")]
    BillingField {
        /// Human label of the field
        field: &'static str,
    },

    /// A mandatory participant field is blank.
    #[error("Please complete the field '{field}' for participant #{position}.")]
    MissingField {
        /// 1-based participant number
        position: usize,
        /// Human label of the field
        field: &'static str,
    },

    /// Validator code has the wrong length.
    #[error("The validator code of participant #{position} must have exactly 6 characters.")]
    ValidatorCodeLength {
        /// 1-based participant number
        position: usize,
    },

    /// Mobile phone is not exactly 11 digits.
    #[error("The mobile phone of participant #{position} must have exactly 11 digits.")]
    MobilePhone {
        /// 1-based participant number
        position: usize,
    },

    /// Office phone has non-digits or more than 11 digits.
    #[error("The office phone of participant #{position} may only contain up to 11 digits.")]
    OfficePhone {
        /// 1-based participant number
        position: usize,
    },

    /// Organization RIF/cédula is malformed.
    #[error("The organization tax ID of participant #{position} is not valid: {source}.")]
    OrganizationTaxId {
        /// 1-based participant number
        position: usize,
        /// What was wrong with it
        source: TaxIdError,
    },
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn is_phone(value: &str, exact: bool) -> bool {
    let digits_only = value.chars().all(|c| c.is_ascii_digit());
    if exact {
        digits_only && value.len() == MAX_PHONE_DIGITS
    } else {
        digits_only && value.len() <= MAX_PHONE_DIGITS
    }
}

/// Check the shared billing block.
///
/// # Errors
///
/// The first failing check, in form order.
pub fn validate_billing(billing: &BillingData) -> Result<(), ValidationError> {
    billing
        .tax_id
        .parse::<TaxId>()
        .map_err(|source| ValidationError::BillingTaxId { source })?;

    if !is_phone(&billing.phone, true) {
        return Err(ValidationError::BillingPhone);
    }

    for (value, field) in [
        (&billing.fiscal_name, "Fiscal name"),
        (&billing.fiscal_address, "Fiscal address"),
        (&billing.sector, "Sector"),
    ] {
        if is_blank(value) {
            return Err(ValidationError::BillingField { field });
        }
    }

    Ok(())
}

/// Check one participant; `position` is 1-based.
///
/// # Errors
///
/// The first failing check, in form order.
pub fn validate_participant(participant: &Participant, position: usize) -> Result<(), ValidationError> {
    let required = [
        (&participant.national_id, "National ID"),
        (&participant.validator_code, "Validator code"),
        (&participant.first_name, "First name"),
        (&participant.last_name, "Last name"),
        (&participant.email, "Email"),
        (&participant.organization_name, "Organization name"),
        (&participant.organization_tax_id, "Organization tax ID"),
        (&participant.role, "Role"),
        (&participant.sector, "Sector"),
        (&participant.mobile_phone, "Mobile phone"),
    ];
    if let Some(&(_, field)) = required.iter().find(|(value, _)| is_blank(value)) {
        return Err(ValidationError::MissingField { position, field });
    }

    if participant.trimmed_code().chars().count() != VALIDATOR_CODE_LEN {
        return Err(ValidationError::ValidatorCodeLength { position });
    }

    if !is_phone(&participant.mobile_phone, true) {
        return Err(ValidationError::MobilePhone { position });
    }

    if let Some(office) = participant.office_phone.as_deref() {
        if !is_phone(office, false) {
            return Err(ValidationError::OfficePhone { position });
        }
    }

    participant
        .organization_tax_id
        .parse::<TaxId>()
        .map_err(|source| ValidationError::OrganizationTaxId { position, source })?;

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use registration_core::identity::IdPrefix;

    fn billing() -> BillingData {
        BillingData {
            tax_id: "J-001234567".into(),
            fiscal_name: "Acme".into(),
            fiscal_address: "Caracas".into(),
            phone: "02125551234".into(),
            sector: "Privado".into(),
            invoice_type: None,
        }
    }

    fn participant() -> Participant {
        Participant {
            national_id: "12345678".into(),
            validator_code: "ABC123".into(),
            first_name: "Ana".into(),
            last_name: "Pérez".into(),
            mobile_phone: "04145551234".into(),
            email: "ana@example.com".into(),
            organization_name: "Acme".into(),
            organization_tax_id: "G-200012345".into(),
            role: "Gerente".into(),
            sector: "Público".into(),
            ..Participant::default()
        }
    }

    #[test]
    fn test_valid_inputs_pass() {
        assert_eq!(validate_billing(&billing()), Ok(()));
        assert_eq!(validate_participant(&participant(), 1), Ok(()));
    }

    #[test]
    fn test_short_company_rif_is_rejected() {
        let billing = BillingData {
            tax_id: "J-12345".into(),
            ..billing()
        };
        assert_eq!(
            validate_billing(&billing),
            Err(ValidationError::BillingTaxId {
                source: TaxIdError::WrongLength {
                    prefix: IdPrefix::J,
                    expected: "exactly 9",
                    actual: 5,
                }
            })
        );
    }

    #[test]
    fn test_individual_billing_id_is_accepted() {
        let billing = BillingData {
            tax_id: "V-1234567".into(),
            ..billing()
        };
        assert_eq!(validate_billing(&billing), Ok(()));
    }

    #[test]
    fn test_billing_phone_must_be_eleven_digits() {
        let billing = BillingData {
            phone: "0212555123".into(),
            ..billing()
        };
        assert_eq!(validate_billing(&billing), Err(ValidationError::BillingPhone));
    }

    #[test]
    fn test_blank_billing_field() {
        let billing = BillingData {
            fiscal_address: "  ".into(),
            ..billing()
        };
        assert_eq!(
            validate_billing(&billing),
            Err(ValidationError::BillingField {
                field: "Fiscal address"
            })
        );
    }

    #[test]
    fn test_missing_field_names_participant() {
        let participant = Participant {
            email: String::new(),
            ..participant()
        };
        let err = validate_participant(&participant, 3).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Please complete the field 'Email' for participant #3."
        );
    }

    #[test]
    fn test_code_length() {
        let participant = Participant {
            validator_code: "ABC12".into(),
            ..participant()
        };
        assert_eq!(
            validate_participant(&participant, 2),
            Err(ValidationError::ValidatorCodeLength { position: 2 })
        );
    }

    #[test]
    fn test_office_phone_optional_but_numeric() {
        let empty = Participant {
            office_phone: Some(String::new()),
            ..participant()
        };
        assert_eq!(validate_participant(&empty, 1), Ok(()));

        let bad = Participant {
            office_phone: Some("0212-555".into()),
            ..participant()
        };
        assert_eq!(
            validate_participant(&bad, 1),
            Err(ValidationError::OfficePhone { position: 1 })
        );
    }

    #[test]
    fn test_organization_rif_checked_last() {
        let participant = Participant {
            organization_tax_id: "X-1".into(),
            ..participant()
        };
        assert!(matches!(
            validate_participant(&participant, 1),
            Err(ValidationError::OrganizationTaxId {
                position: 1,
                source: TaxIdError::UnknownPrefix
            })
        ));
    }
}
