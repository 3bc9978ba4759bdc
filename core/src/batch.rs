//! Registration batch: shared billing data plus one or more participants.
//!
//! Field names on the wire are the form's original Spanish identifiers; the
//! Rust side uses English names and `serde` renames.

use crate::identity::Nationality;
use serde::{Deserialize, Serialize};

/// Invoice type recorded when the client does not send one.
pub const DEFAULT_INVOICE_TYPE: &str = "Pro forma";

/// Billing data shared by every participant of a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingData {
    /// Payer RIF or cédula, e.g. `J-001234567`.
    #[serde(rename = "RIFCedulaFacturacion")]
    pub tax_id: String,
    /// Legal / fiscal name.
    #[serde(rename = "DenominacionFiscalFacturacion")]
    pub fiscal_name: String,
    /// Fiscal address.
    #[serde(rename = "DireccionFiscalFacturacion")]
    pub fiscal_address: String,
    /// Billing phone (11 digits).
    #[serde(rename = "TelefonoFacturacion")]
    pub phone: String,
    /// Organization sector.
    #[serde(rename = "SectorOrganizacionFacturacion")]
    pub sector: String,
    /// Invoice type; [`DEFAULT_INVOICE_TYPE`] when absent.
    #[serde(rename = "TFactura", default, skip_serializing_if = "Option::is_none")]
    pub invoice_type: Option<String>,
}

impl BillingData {
    /// Invoice type with the default applied.
    #[must_use]
    pub fn invoice_type_or_default(&self) -> &str {
        self.invoice_type
            .as_deref()
            .filter(|kind| !kind.trim().is_empty())
            .unwrap_or(DEFAULT_INVOICE_TYPE)
    }

    /// Billing correlation prefix: the payer tax ID reduced to `[A-Z0-9]`.
    #[must_use]
    pub fn sanitized_tax_id(&self) -> String {
        self.tax_id
            .chars()
            .filter(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
            .collect()
    }
}

/// Ticket kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TicketKind {
    /// Paid ticket.
    #[default]
    #[serde(rename = "Venta")]
    Sale,
    /// Complimentary ticket.
    #[serde(rename = "Cortesia", alias = "Cortesía")]
    Courtesy,
}

impl TicketKind {
    /// Column value written to the inscription table.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sale => "Venta",
            Self::Courtesy => "Cortesia",
        }
    }
}

/// One attendee.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Nationality prefix of the cédula.
    #[serde(rename = "NacionalidadParticipante", default)]
    pub nationality: Nationality,
    /// Cédula digits.
    #[serde(rename = "CedulaParticipante")]
    pub national_id: String,
    /// Ticket kind.
    #[serde(rename = "TipoTicketParticipante", default)]
    pub ticket_kind: TicketKind,
    /// Single-use validator code proving ticket entitlement.
    #[serde(rename = "IDValidadorParticipante")]
    pub validator_code: String,
    /// First name.
    #[serde(rename = "NombreParticipante")]
    pub first_name: String,
    /// Surname.
    #[serde(rename = "ApellidoParticipante")]
    pub last_name: String,
    /// Mobile phone (11 digits).
    #[serde(rename = "TelefonoCelularParticipante")]
    pub mobile_phone: String,
    /// Office phone.
    #[serde(
        rename = "TelefonoOficinaParticipante",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub office_phone: Option<String>,
    /// Email address.
    #[serde(rename = "EmailParticipante")]
    pub email: String,
    /// Employer name.
    #[serde(rename = "NombreOrganizacionParticipante")]
    pub organization_name: String,
    /// Employer RIF.
    #[serde(rename = "RIFOrganizacionParticipante")]
    pub organization_tax_id: String,
    /// Role within the organization.
    #[serde(rename = "CargoOrganizacionParticipante")]
    pub role: String,
    /// Organization sector.
    #[serde(rename = "SectorOrganizacionParticipante")]
    pub sector: String,
}

impl Participant {
    /// Validator code with surrounding whitespace removed.
    #[must_use]
    pub fn trimmed_code(&self) -> &str {
        self.validator_code.trim()
    }
}

/// Body of `POST /api/register-participants`.
///
/// `billing` is optional on the wire so an absent object is reported as a
/// bad request by the processor instead of a decoding failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationBatch {
    /// Shared billing data.
    #[serde(rename = "billingData", default)]
    pub billing: Option<BillingData>,
    /// Attendees, in submission order.
    #[serde(default)]
    pub participants: Vec<Participant>,
}

/// Successful registration response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationResponse {
    /// Human-readable confirmation.
    pub message: String,
    /// Number of attendee records created.
    #[serde(rename = "recordCount")]
    pub record_count: usize,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_batch_deserializes_form_payload() {
        let batch: RegistrationBatch = serde_json::from_value(json!({
            "billingData": {
                "RIFCedulaFacturacion": "J-001234567",
                "DenominacionFiscalFacturacion": "Acme C.A.",
                "DireccionFiscalFacturacion": "Caracas",
                "TelefonoFacturacion": "02121234567",
                "SectorOrganizacionFacturacion": "Fintech"
            },
            "participants": [{
                "NacionalidadParticipante": "E",
                "CedulaParticipante": "12345678",
                "TipoTicketParticipante": "Cortesía",
                "IDValidadorParticipante": " ABC123 ",
                "NombreParticipante": "Ana",
                "ApellidoParticipante": "Pérez",
                "TelefonoCelularParticipante": "04141234567",
                "EmailParticipante": "ana@example.com",
                "NombreOrganizacionParticipante": "Acme",
                "RIFOrganizacionParticipante": "J-001234567",
                "CargoOrganizacionParticipante": "CTO",
                "SectorOrganizacionParticipante": "Fintech"
            }]
        }))
        .unwrap();

        let billing = batch.billing.unwrap();
        assert_eq!(billing.invoice_type_or_default(), DEFAULT_INVOICE_TYPE);
        assert_eq!(batch.participants[0].nationality, Nationality::E);
        assert_eq!(batch.participants[0].ticket_kind, TicketKind::Courtesy);
        assert_eq!(batch.participants[0].trimmed_code(), "ABC123");
        assert_eq!(batch.participants[0].office_phone, None);
    }

    #[test]
    fn test_missing_billing_is_not_a_decode_error() {
        let batch: RegistrationBatch =
            serde_json::from_value(json!({ "participants": [] })).unwrap();
        assert!(batch.billing.is_none());
        assert!(batch.participants.is_empty());
    }

    #[test]
    fn test_sanitized_tax_id() {
        let billing = BillingData {
            tax_id: "J-00123.456-7".into(),
            ..BillingData::default()
        };
        assert_eq!(billing.sanitized_tax_id(), "J001234567");
    }

    #[test]
    fn test_response_uses_camel_case_count() {
        let body = serde_json::to_value(RegistrationResponse {
            message: "ok".into(),
            record_count: 2,
        })
        .unwrap();
        assert_eq!(body, json!({ "message": "ok", "recordCount": 2 }));
    }
}
