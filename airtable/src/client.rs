//! Airtable REST client implementing [`RecordStore`]

use crate::config::AirtableConfig;
use crate::error::AirtableError;
use crate::wire::{CreateRequest, ListResponse, MAX_RECORDS_PER_WRITE, NewRecord, UpdateRequest, WriteResponse};
use registration_core::record::{Fields, Query, Record, RecordUpdate};
use registration_core::store::{RecordStore, StoreError, StoreFuture};
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;

/// Airtable API client bound to one base
#[derive(Clone)]
pub struct AirtableClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl AirtableClient {
    /// Create a new client with settings from the environment
    ///
    /// # Errors
    ///
    /// See [`AirtableConfig::from_env`] and [`AirtableClient::new`].
    pub fn from_env() -> Result<Self, AirtableError> {
        Self::new(AirtableConfig::from_env()?)
    }

    /// Create a new client with explicit settings
    ///
    /// # Errors
    ///
    /// Returns `AirtableError::InvalidEndpoint` if the endpoint URL does not
    /// parse, and `AirtableError::ClientBuild` if the TLS backend fails to
    /// initialize.
    pub fn new(config: AirtableConfig) -> Result<Self, AirtableError> {
        let mut base_url =
            Url::parse(&config.api_url).map_err(|e| AirtableError::InvalidEndpoint(e.to_string()))?;

        base_url
            .path_segments_mut()
            .map_err(|()| AirtableError::InvalidEndpoint(config.api_url.clone()))?
            .pop_if_empty()
            .push("v0")
            .push(&config.base_id);

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AirtableError::ClientBuild(e.to_string()))?;

        Ok(Self {
            client,
            api_key: config.api_key,
            base_url,
        })
    }

    /// `{endpoint}/v0/{base}/{table}` with the table name percent-encoded.
    fn table_url(&self, table: &str) -> Result<Url, StoreError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| StoreError::Other(format!("endpoint cannot carry a path: {}", self.base_url)))?
            .push(table);
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, StoreError> {
        let response = request
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| StoreError::RequestFailed(e.to_string()))?;

        match response.status() {
            status if status.is_success() => response
                .json::<T>()
                .await
                .map_err(|e| StoreError::ResponseParseFailed(e.to_string())),
            StatusCode::TOO_MANY_REQUESTS => Err(StoreError::RateLimited),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(StoreError::Unauthorized),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(StoreError::ApiError {
                    status: status.as_u16(),
                    message: body,
                })
            },
        }
    }

    async fn list(&self, table: &str, query: &Query) -> Result<Vec<Record>, StoreError> {
        let mut url = self.table_url(table)?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("filterByFormula", &query.filter.to_formula());
            for field in &query.fields {
                pairs.append_pair("fields[]", field);
            }
        }

        let mut records = Vec::new();
        let mut offset: Option<String> = None;

        loop {
            let mut page_url = url.clone();
            if let Some(cursor) = &offset {
                page_url.query_pairs_mut().append_pair("offset", cursor);
            }

            let page: ListResponse = self.send(self.client.get(page_url)).await?;
            records.extend(page.records);

            match page.offset {
                Some(next) => offset = Some(next),
                None => break,
            }
        }

        tracing::debug!(table, matched = records.len(), "Selected records");
        Ok(records)
    }

    async fn insert(&self, table: &str, rows: &[Fields]) -> Result<Vec<Record>, StoreError> {
        let url = self.table_url(table)?;
        let mut created = Vec::with_capacity(rows.len());

        for chunk in rows.chunks(MAX_RECORDS_PER_WRITE) {
            let body = CreateRequest {
                records: chunk.iter().map(|fields| NewRecord { fields }).collect(),
                typecast: true,
            };
            let response: WriteResponse = self.send(self.client.post(url.clone()).json(&body)).await?;
            created.extend(response.records);
        }

        tracing::debug!(table, created = created.len(), "Created records");
        Ok(created)
    }

    async fn patch(&self, table: &str, updates: &[RecordUpdate]) -> Result<Vec<Record>, StoreError> {
        let url = self.table_url(table)?;
        let mut updated = Vec::with_capacity(updates.len());

        for chunk in updates.chunks(MAX_RECORDS_PER_WRITE) {
            let body = UpdateRequest {
                records: chunk,
                typecast: true,
            };
            let response: WriteResponse = self.send(self.client.patch(url.clone()).json(&body)).await?;
            updated.extend(response.records);
        }

        tracing::debug!(table, updated = updated.len(), "Updated records");
        Ok(updated)
    }
}

impl RecordStore for AirtableClient {
    fn select(&self, table: String, query: Query) -> StoreFuture<'_, Vec<Record>> {
        Box::pin(async move { self.list(&table, &query).await })
    }

    fn create(&self, table: String, rows: Vec<Fields>) -> StoreFuture<'_, Vec<Record>> {
        Box::pin(async move {
            if rows.is_empty() {
                return Ok(Vec::new());
            }
            self.insert(&table, &rows).await
        })
    }

    fn update(&self, table: String, updates: Vec<RecordUpdate>) -> StoreFuture<'_, Vec<Record>> {
        Box::pin(async move {
            if updates.is_empty() {
                return Ok(Vec::new());
            }
            self.patch(&table, &updates).await
        })
    }
}

impl std::fmt::Debug for AirtableClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AirtableClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_table_url_encodes_spaces() {
        let client = AirtableClient::new(AirtableConfig::new("key", "appBase")).unwrap();
        let url = client.table_url("Registro Participantes").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.airtable.com/v0/appBase/Registro%20Participantes"
        );
    }

    #[test]
    fn test_endpoint_with_trailing_slash() {
        let client = AirtableClient::new(
            AirtableConfig::new("key", "appBase").with_api_url("http://localhost:8080/"),
        )
        .unwrap();
        assert_eq!(
            client.table_url("T").unwrap().as_str(),
            "http://localhost:8080/v0/appBase/T"
        );
    }

    #[test]
    fn test_invalid_endpoint_is_rejected() {
        let result = AirtableClient::new(AirtableConfig::new("key", "appBase").with_api_url("not a url"));
        assert!(matches!(result, Err(AirtableError::InvalidEndpoint(_))));
    }
}
