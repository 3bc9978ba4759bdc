//! Column names of the hosted tables.
//!
//! These are the headers operators see in the spreadsheet UI, so they stay in
//! Spanish.

/// Columns of the validation (ledger) table.
pub mod ledger {
    /// Validator code.
    pub const CODE: &str = "ID Validador";
    /// Checkbox set once the code has been redeemed.
    pub const USED: &str = "Usado";
}

/// Columns of the inscription (attendee) table.
pub mod inscription {
    /// Payer RIF / cédula.
    pub const BILLING_TAX_ID: &str = "RIF/Cédula Facturación";
    /// Payer fiscal name.
    pub const BILLING_FISCAL_NAME: &str = "Denominación Fiscal";
    /// Payer fiscal address.
    pub const BILLING_FISCAL_ADDRESS: &str = "Dirección Fiscal";
    /// Payer phone.
    pub const BILLING_PHONE: &str = "Teléfono Facturación";
    /// Payer sector.
    pub const BILLING_SECTOR: &str = "Sector Facturación";
    /// Invoice type.
    pub const INVOICE_TYPE: &str = "Tipo de Factura";
    /// Billing correlation key shared by one batch.
    pub const BILLING_KEY: &str = "Clave Facturación";
    /// Validator code redeemed by this attendee.
    pub const VALIDATOR_CODE: &str = "ID Validador";
    /// Nationality prefix.
    pub const NATIONALITY: &str = "Nacionalidad";
    /// Cédula digits.
    pub const NATIONAL_ID: &str = "Cédula";
    /// Ticket kind.
    pub const TICKET_KIND: &str = "Tipo de Ticket";
    /// First name.
    pub const FIRST_NAME: &str = "Nombre";
    /// Surname.
    pub const LAST_NAME: &str = "Apellido";
    /// Mobile phone.
    pub const MOBILE_PHONE: &str = "Teléfono Celular";
    /// Office phone.
    pub const OFFICE_PHONE: &str = "Teléfono Oficina";
    /// Email.
    pub const EMAIL: &str = "Email";
    /// Employer name.
    pub const ORGANIZATION: &str = "Organización";
    /// Employer RIF.
    pub const ORGANIZATION_TAX_ID: &str = "RIF Organización";
    /// Role.
    pub const ROLE: &str = "Cargo";
    /// Employer sector.
    pub const ORGANIZATION_SECTOR: &str = "Sector Organización";
    /// Registration date, `YYYY-MM-DD`.
    pub const REGISTERED_ON: &str = "Fecha de Registro";
}
