//! Raw HTTP clients for the sitecrew storage backends.
//!
//! Two interchangeable backends persist the back-office records:
//!
//! - **[`SheetsClient`]** — the Google Sheets values API. Each entity type
//!   lives on its own sheet tab; rows are positional string cells.
//! - **[`PostgrestClient`]** — a PostgREST endpoint (Supabase) exposing one
//!   table per entity type as JSON rows.
//!
//! Both clients are transport only: URL construction, auth headers, timeout
//! handling, and error mapping. They know nothing about sites, personnel, or
//! certificates — the `sitecrew-core` store adapters map rows to domain types.

pub mod error;
pub mod postgrest;
pub mod sheets;
pub mod transport;

pub use error::Error;
pub use postgrest::PostgrestClient;
pub use sheets::{SheetsClient, ValueUpdate};
pub use transport::{DEFAULT_TIMEOUT_SECS, TransportConfig};
