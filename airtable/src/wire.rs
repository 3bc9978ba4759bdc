//! Airtable REST payloads.

use registration_core::record::{Fields, Record, RecordUpdate};
use serde::{Deserialize, Serialize};

/// Records per write request; Airtable rejects larger batches.
pub const MAX_RECORDS_PER_WRITE: usize = 10;

/// One page of `GET /v0/{base}/{table}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse {
    /// Records on this page
    #[serde(default)]
    pub records: Vec<Record>,
    /// Cursor for the next page; absent on the last one
    #[serde(default)]
    pub offset: Option<String>,
}

/// Body of a create (`POST`) request.
#[derive(Debug, Clone, Serialize)]
pub struct CreateRequest<'a> {
    /// Rows to create
    pub records: Vec<NewRecord<'a>>,
    /// Let Airtable coerce text into select options and dates
    pub typecast: bool,
}

/// A row without an id yet.
#[derive(Debug, Clone, Serialize)]
pub struct NewRecord<'a> {
    /// Cell values
    pub fields: &'a Fields,
}

/// Body of a partial update (`PATCH`) request.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateRequest<'a> {
    /// Rows to update
    pub records: &'a [RecordUpdate],
    /// Let Airtable coerce text into select options and dates
    pub typecast: bool,
}

/// Response of create and update requests.
#[derive(Debug, Clone, Deserialize)]
pub struct WriteResponse {
    /// Stored rows, in request order
    #[serde(default)]
    pub records: Vec<Record>,
}
