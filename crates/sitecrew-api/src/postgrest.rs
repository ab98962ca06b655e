// ── PostgREST (Supabase) row API client ──
//
// The relational backend exposes each entity table through PostgREST.
// The coordinator only needs filtered selects, inserts, and patches —
// all row-level, no RPC.

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Async client for a PostgREST endpoint, e.g. `https://{ref}.supabase.co/rest/v1/`.
///
/// The service key is injected as both `apikey` and `Authorization: Bearer`
/// default headers, the way Supabase expects.
pub struct PostgrestClient {
    http: reqwest::Client,
    base_url: Url,
    timeout_secs: u64,
}

impl PostgrestClient {
    pub fn new(
        base_url: &str,
        service_key: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let base_url = normalize_base_url(base_url)?;

        let mut headers = HeaderMap::new();
        let mut key_value = HeaderValue::from_str(service_key.expose_secret()).map_err(|e| {
            Error::Credentials {
                message: format!("service key is not a valid header value: {e}"),
            }
        })?;
        key_value.set_sensitive(true);
        headers.insert("apikey", key_value);

        let bearer = format!("Bearer {}", service_key.expose_secret());
        let mut auth_value = HeaderValue::from_str(&bearer).map_err(|e| Error::Credentials {
            message: format!("service key is not a valid header value: {e}"),
        })?;
        auth_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_value);

        Ok(Self {
            http: transport.build_client_with_headers(headers)?,
            base_url,
            timeout_secs: transport.timeout_secs(),
        })
    }

    /// Select every row of a table, optionally ordered by a column.
    pub async fn select_all<T: DeserializeOwned>(
        &self,
        table: &str,
        order: Option<&str>,
    ) -> Result<Vec<T>, Error> {
        let url = self.url(table)?;
        debug!(table, "postgrest: select all");

        let mut params = vec![("select", "*".to_owned())];
        if let Some(column) = order {
            params.push(("order", column.to_owned()));
        }

        let resp = self
            .http
            .get(url)
            .query(&params)
            .send()
            .await
            .map_err(|e| Error::from_reqwest(&e, self.timeout_secs))?;
        self.handle_response(resp).await
    }

    /// Select rows where `column = value`. Callers expecting a unique key
    /// take the first element.
    pub async fn select_eq<T: DeserializeOwned>(
        &self,
        table: &str,
        column: &str,
        value: &str,
    ) -> Result<Vec<T>, Error> {
        let url = self.url(table)?;
        debug!(table, column, "postgrest: select by key");

        let resp = self
            .http
            .get(url)
            .query(&[("select", "*"), (column, &format!("eq.{value}"))])
            .send()
            .await
            .map_err(|e| Error::from_reqwest(&e, self.timeout_secs))?;
        self.handle_response(resp).await
    }

    /// Insert one row.
    pub async fn insert<B: Serialize + Sync>(&self, table: &str, row: &B) -> Result<(), Error> {
        let url = self.url(table)?;
        debug!(table, "postgrest: insert");

        let resp = self
            .http
            .post(url)
            .header("Prefer", "return=minimal")
            .json(row)
            .send()
            .await
            .map_err(|e| Error::from_reqwest(&e, self.timeout_secs))?;
        self.handle_empty(resp).await
    }

    /// Patch all rows where `column = value` with the non-null fields of `patch`.
    pub async fn update_eq<B: Serialize + Sync>(
        &self,
        table: &str,
        column: &str,
        value: &str,
        patch: &B,
    ) -> Result<(), Error> {
        let url = self.url(table)?;
        debug!(table, column, "postgrest: patch by key");

        let resp = self
            .http
            .patch(url)
            .query(&[(column, &format!("eq.{value}"))])
            .header("Prefer", "return=minimal")
            .json(patch)
            .send()
            .await
            .map_err(|e| Error::from_reqwest(&e, self.timeout_secs))?;
        self.handle_empty(resp).await
    }

    // ── Internals ────────────────────────────────────────────────────

    fn url(&self, table: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(table)?)
    }

    async fn handle_response<T: DeserializeOwned>(
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
            Err(status_error(status, resp).await)
        }
    }

    async fn handle_empty(&self, resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(status_error(status, resp).await)
        }
    }
}

/// PostgREST error bodies look like `{"message":"...","code":"..."}`.
#[derive(serde::Deserialize)]
struct PostgrestError {
    message: Option<String>,
}

async fn status_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
    let raw = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<PostgrestError>(&raw)
        .ok()
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

/// Ensure the base URL ends with a single trailing slash so `Url::join`
/// keeps the `/rest/v1/` prefix.
fn normalize_base_url(raw: &str) -> Result<Url, Error> {
    let mut url = Url::parse(raw)?;
    let path = url.path().trim_end_matches('/').to_owned();
    url.set_path(&format!("{path}/"));
    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gains_trailing_slash() {
        let url = normalize_base_url("https://example.supabase.co/rest/v1").unwrap();
        assert_eq!(url.as_str(), "https://example.supabase.co/rest/v1/");
        assert_eq!(url.join("sites").unwrap().path(), "/rest/v1/sites");
    }

    #[test]
    fn trailing_slash_preserved() {
        let url = normalize_base_url("https://example.supabase.co/rest/v1/").unwrap();
        assert_eq!(url.as_str(), "https://example.supabase.co/rest/v1/");
    }
}
