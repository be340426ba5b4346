//! # twin-scanner-provider
//!
//! Remote access layer of the Digital Twin Scanner: one
//! [`AttributeProvider`] per attribute, talking to the attribute service
//! through three HTTP/JSON endpoints.
//!
//! | Operation | Endpoint | Returns |
//! |-----------|----------|---------|
//! | `scan` | `GET /scan?attribute=<key>&domain=<domain>` | one status line |
//! | `fetch` | `GET /get?attribute=<key>&domain=<domain>` | sequence of records |
//! | `describe` | `GET /describe?attribute=<key>` | [`AttributeMetadata`] |
//!
//! ## Feature Flags
//!
//! - **`native-tls`** *(default)* — Use the platform's native TLS implementation.
//! - **`rustls`** — Use rustls.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use twin_scanner_provider::{AttributeProvider, ClientConfig, create_http_client, create_provider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::with_base_url("http://127.0.0.1:8000/api");
//!     let http = create_http_client(&config)?;
//!     let mx = create_provider(&http, &config, "MX");
//!
//!     println!("{}", mx.scan("example.com").await);
//!     for record in mx.fetch("example.com").await {
//!         println!("{record:?}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! None of the operations return `Result`. Failures are caught at this
//! boundary and turned into data:
//!
//! - `scan` → `"❌ Fehler bei Scan (<key>): <reason>"`
//! - `fetch` → `[{"error": "<reason>"}]`
//! - `describe` → `{"error": "<reason>"}`
//!
//! [`ProviderError`] describes the failure internally and is exported for
//! logging and for embedders that build their own clients on [`HttpUtils`].

mod client;
mod config;
mod error;
mod factory;
mod http_client;
mod normalize;
mod traits;
mod types;
mod utils;

pub use client::{ERROR_GLYPH, HttpAttributeClient, SUCCESS_GLYPH};
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use error::{ProviderError, Result};
pub use factory::{create_http_client, create_provider};
pub use http_client::HttpUtils;
pub use normalize::normalize_records;
pub use traits::AttributeProvider;
pub use types::{
    AttributeMetadata, ERROR_KEY, INFO_KEY, Record, RecordExt, ScanResponse, VALUE_KEY, Value,
    error_record,
};
pub use utils::log_sanitizer::truncate_for_log;
