//! Well-formed registration data.

use registration_core::batch::{BillingData, Participant, RegistrationBatch};
use registration_core::identity::Nationality;
use registration_core::processor::ProcessorConfig;

/// Inscription table used across tests.
pub const INSCRIPTION_TABLE: &str = "Inscripciones";

/// Ledger table used across tests.
pub const VALIDATION_TABLE: &str = "Validaciones";

/// Processor configuration pointing at the fixture tables.
#[must_use]
pub fn processor_config() -> ProcessorConfig {
    ProcessorConfig::new(INSCRIPTION_TABLE, VALIDATION_TABLE)
}

/// Billing data for a fictional company.
#[must_use]
pub fn billing() -> BillingData {
    BillingData {
        tax_id: "J-001234567".into(),
        fiscal_name: "Acme Eventos C.A.".into(),
        fiscal_address: "Av. Principal, Caracas".into(),
        phone: "02125551234".into(),
        sector: "Privado".into(),
        invoice_type: None,
    }
}

/// Fully filled participant carrying `code`.
#[must_use]
pub fn participant(code: &str) -> Participant {
    Participant {
        nationality: Nationality::V,
        national_id: "12345678".into(),
        validator_code: code.into(),
        first_name: "Ana".into(),
        last_name: "Pérez".into(),
        mobile_phone: "04145551234".into(),
        office_phone: None,
        email: "ana@example.com".into(),
        organization_name: "Acme Eventos C.A.".into(),
        organization_tax_id: "J-001234567".into(),
        role: "Gerente".into(),
        sector: "Privado".into(),
        ..Participant::default()
    }
}

/// Batch with one participant per code.
#[must_use]
pub fn batch(codes: &[&str]) -> RegistrationBatch {
    RegistrationBatch {
        billing: Some(billing()),
        participants: codes.iter().map(|code| participant(code)).collect(),
    }
}
