// ── Google Sheets values API client ──
//
// The spreadsheet backend stores one entity type per sheet tab, one record
// per row, cells as formatted strings. Only three operations are needed:
// read a range, append a row, and batch-update scattered cells.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets/";

// ── Wire shapes ──────────────────────────────────────────────────────

/// `GET .../values/{range}` response body.
#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

/// One targeted cell-range write inside a `values:batchUpdate` call.
#[derive(Debug, Clone, Serialize)]
pub struct ValueUpdate {
    /// A1-notation range, e.g. `"sites!M4"`.
    pub range: String,
    pub values: Vec<Vec<String>>,
}

impl ValueUpdate {
    /// Single-cell write.
    pub fn cell(range: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            range: range.into(),
            values: vec![vec![value.into()]],
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchUpdateBody<'a> {
    value_input_option: &'static str,
    data: &'a [ValueUpdate],
}

#[derive(Serialize)]
struct AppendBody<'a> {
    values: [&'a [String]; 1],
}

/// Sheets API error envelope: `{"error":{"code":N,"message":"...","status":"..."}}`.
#[derive(Deserialize)]
struct SheetsError {
    error: Option<SheetsErrorInner>,
}

#[derive(Deserialize)]
struct SheetsErrorInner {
    message: Option<String>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the Google Sheets values API, scoped to one spreadsheet.
///
/// Auth is an API key passed as a `key` query parameter on every request.
#[derive(Debug)]
pub struct SheetsClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: SecretString,
    timeout_secs: u64,
}

impl SheetsClient {
    /// Build a client for the given spreadsheet.
    pub fn new(
        spreadsheet_id: &str,
        api_key: SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        Self::with_base_url(DEFAULT_BASE_URL, spreadsheet_id, api_key, transport)
    }

    /// Build against a non-default endpoint (tests point this at a mock).
    pub fn with_base_url(
        base_url: &str,
        spreadsheet_id: &str,
        api_key: SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let root = Url::parse(base_url)?;
        let base_url = root.join(&format!("{spreadsheet_id}/"))?;
        Ok(Self {
            http: transport.build_client()?,
            base_url,
            api_key,
            timeout_secs: transport.timeout_secs(),
        })
    }

    /// Read all rows in an A1-notation range. Missing ranges come back as
    /// an empty list, not an error.
    pub async fn get_values(&self, range: &str) -> Result<Vec<Vec<String>>, Error> {
        let url = self.url(&format!("values/{range}"))?;
        debug!(range, "sheets: reading values");

        let resp = self
            .http
            .get(url)
            .query(&[("key", self.api_key.expose_secret())])
            .send()
            .await
            .map_err(|e| Error::from_reqwest(&e, self.timeout_secs))?;
        let body: ValueRange = self.handle_response(resp).await?;
        Ok(body.values)
    }

    /// Append one row after the last row of the given range.
    pub async fn append_row(&self, range: &str, row: &[String]) -> Result<(), Error> {
        let url = self.url(&format!("values/{range}:append"))?;
        debug!(range, cells = row.len(), "sheets: appending row");

        let resp = self
            .http
            .post(url)
            .query(&[
                ("key", self.api_key.expose_secret()),
                ("valueInputOption", "RAW"),
            ])
            .json(&AppendBody { values: [row] })
            .send()
            .await
            .map_err(|e| Error::from_reqwest(&e, self.timeout_secs))?;
        self.handle_empty(resp).await
    }

    /// Write several scattered cell ranges in one call.
    ///
    /// This is the closest thing the spreadsheet API has to a multi-row
    /// update; it is still not transactional across sheets.
    pub async fn batch_update(&self, updates: &[ValueUpdate]) -> Result<(), Error> {
        if updates.is_empty() {
            return Ok(());
        }
        let url = self.url("values:batchUpdate")?;
        debug!(ranges = updates.len(), "sheets: batch update");

        let resp = self
            .http
            .post(url)
            .query(&[("key", self.api_key.expose_secret())])
            .json(&BatchUpdateBody {
                value_input_option: "RAW",
                data: updates,
            })
            .send()
            .await
            .map_err(|e| Error::from_reqwest(&e, self.timeout_secs))?;
        self.handle_empty(resp).await
    }

    // ── Internals ────────────────────────────────────────────────────

    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp
                .text()
                .await
                .map_err(|e| Error::from_reqwest(&e, self.timeout_secs))?;
            serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body,
            })
        } else {
            Err(parse_error(status, resp).await)
        }
    }

    async fn handle_empty(&self, resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(parse_error(status, resp).await)
        }
    }
}

async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
    let raw = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<SheetsError>(&raw)
        .ok()
        .and_then(|e| e.error)
        .and_then(|e| e.message)
        .unwrap_or_else(|| {
            if raw.is_empty() {
                status.to_string()
            } else {
                raw
            }
        });
    Error::Status {
        status: status.as_u16(),
        message,
    }
}
