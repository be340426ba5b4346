//! HTTP attribute client against a local stub server.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

mod common;

use common::{SilentServer, StubResponse, StubServer, provider_for, unreachable_base_url};
use serde_json::json;
use twin_scanner_provider::{AttributeProvider, ClientConfig, ERROR_GLYPH, RecordExt, Value};

// ============ scan ============

#[tokio::test]
async fn scan_returns_remote_status_verbatim() {
    let server = StubServer::start(|_, _| {
        StubResponse::json(200, json!({"status": "✅ A-Record gefunden"}))
    })
    .await;

    let status = server.provider("A").scan("example.com").await;
    assert_eq!(status, "✅ A-Record gefunden");
}

#[tokio::test]
async fn scan_sends_attribute_and_domain() {
    let server = StubServer::start(|_, _| StubResponse::json(200, json!({"status": "ok"}))).await;

    server.provider("SUBDOMAIN").scan("example.com").await;

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "/api/scan");
    assert_eq!(requests[0].param("attribute"), Some("SUBDOMAIN"));
    assert_eq!(requests[0].param("domain"), Some("example.com"));
}

#[tokio::test]
async fn scan_error_field_becomes_error_status() {
    let server =
        StubServer::start(|_, _| StubResponse::json(200, json!({"error": "timeout"}))).await;

    let status = server.provider("A").scan("example.com").await;
    assert_eq!(status, "❌ Fehler bei Scan (A): timeout");
}

#[tokio::test]
async fn scan_server_error_uses_detail() {
    let server = StubServer::start(|_, _| {
        StubResponse::json(500, json!({"detail": "sublist3r not installed"}))
    })
    .await;

    let status = server.provider("SUBDOMAIN").scan("example.com").await;
    assert!(status.starts_with(ERROR_GLYPH), "status: {status}");
    assert!(status.contains("sublist3r not installed"), "status: {status}");
}

#[tokio::test]
async fn scan_unknown_attribute_is_error_status() {
    let server = StubServer::start(|_, _| {
        StubResponse::json(
            404,
            json!({"detail": "Kein Plugin für Attribut 'XYZ' registriert"}),
        )
    })
    .await;

    let status = server.provider("XYZ").scan("example.com").await;
    assert_eq!(
        status,
        "❌ Fehler bei Scan (XYZ): Kein Plugin für Attribut 'XYZ' registriert"
    );
}

#[tokio::test]
async fn scan_without_status_synthesizes_success() {
    let server = StubServer::start(|_, _| StubResponse::json(200, json!({}))).await;

    let status = server.provider("MX").scan("example.com").await;
    assert_eq!(status, "✅ Scan für 'MX' abgeschlossen");
}

#[tokio::test]
async fn scan_connection_refused_never_raises() {
    let config = ClientConfig {
        max_retries: 0,
        ..ClientConfig::with_base_url(unreachable_base_url().await)
    };

    let status = provider_for(&config, "A").scan("example.com").await;
    assert!(
        status.starts_with("❌ Fehler bei Scan (A): "),
        "status: {status}"
    );
}

#[tokio::test]
async fn scan_timeout_sends_single_request() {
    let server = SilentServer::start().await;
    let config = ClientConfig {
        request_timeout_secs: 1,
        max_retries: 2,
        ..ClientConfig::with_base_url(&server.base_url)
    };

    let status = provider_for(&config, "SUBDOMAIN").scan("example.com").await;
    assert!(
        status.starts_with("❌ Fehler bei Scan (SUBDOMAIN): "),
        "status: {status}"
    );
    assert_eq!(server.connection_count(), 1);
}

#[tokio::test]
async fn scan_is_not_retried_on_transient_status() {
    let server = StubServer::start(|_, index| {
        if index == 0 {
            StubResponse::raw(503, "busy")
        } else {
            StubResponse::json(200, json!({"status": "✅ A-Record gefunden"}))
        }
    })
    .await;
    let config = ClientConfig {
        max_retries: 2,
        ..server.config()
    };

    let status = provider_for(&config, "A").scan("example.com").await;
    assert!(status.starts_with(ERROR_GLYPH), "status: {status}");
    assert_eq!(server.request_count(), 1);
}

// ============ fetch ============

#[tokio::test]
async fn fetch_wraps_single_object() {
    let server = StubServer::start(|_, _| {
        StubResponse::json(200, json!({"info": "Attribut wurde noch nicht gescannt."}))
    })
    .await;

    let records = server.provider("NS").fetch("example.com").await;
    assert_eq!(records.len(), 1);
    assert!(records[0].is_info_record());
}

#[tokio::test]
async fn fetch_keeps_array_order() {
    let server = StubServer::start(|request, _| {
        assert_eq!(request.operation(), "get");
        StubResponse::json(
            200,
            json!([
                {"Mailserver": "mx1.example.com", "Priorität": "10"},
                {"Mailserver": "mx2.example.com", "Priorität": "20"}
            ]),
        )
    })
    .await;

    let records = server.provider("MX").fetch("example.com").await;
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].text("Mailserver"), Some("mx1.example.com"));
    assert_eq!(records[1].text("Priorität"), Some("20"));
}

#[tokio::test]
async fn fetch_malformed_body_yields_error_record() {
    let server = StubServer::start(|_, _| StubResponse::raw(200, "<html>oops</html>")).await;

    let records = server.provider("A").fetch("example.com").await;
    assert_eq!(records.len(), 1);
    assert!(records[0].is_error_record(), "records: {records:?}");
}

#[tokio::test]
async fn fetch_connection_refused_yields_error_record() {
    let config = ClientConfig {
        max_retries: 0,
        ..ClientConfig::with_base_url(unreachable_base_url().await)
    };

    let records = provider_for(&config, "A").fetch("example.com").await;
    assert_eq!(records.len(), 1);
    assert!(records[0].is_error_record());
}

#[tokio::test]
async fn fetch_retries_transient_failures() {
    let server = StubServer::start(|_, index| {
        if index == 0 {
            StubResponse::raw(503, "busy")
        } else {
            StubResponse::json(200, json!([{"type": "A", "value": "93.184.216.34"}]))
        }
    })
    .await;
    let config = ClientConfig {
        max_retries: 1,
        ..server.config()
    };

    let records = provider_for(&config, "A").fetch("example.com").await;
    assert_eq!(server.request_count(), 2);
    assert_eq!(
        Value::Object(records[0].clone()),
        json!({"type": "A", "value": "93.184.216.34"})
    );
}

// ============ describe ============

#[tokio::test]
async fn describe_parses_metadata() {
    let server = StubServer::start(|request, _| {
        assert_eq!(request.param("attribute"), Some("A"));
        assert!(request.param("domain").is_none());
        StubResponse::json(
            200,
            json!({
                "name": "A-Record",
                "description": "Zeigt, unter welcher IPv4-Adresse die Domain erreichbar ist.",
                "columns": ["IPv4-Adresse", "Gescannt am"]
            }),
        )
    })
    .await;

    let meta = server.provider("A").describe().await;
    assert_eq!(meta.name.as_deref(), Some("A-Record"));
    assert_eq!(
        meta.columns,
        Some(vec!["IPv4-Adresse".to_string(), "Gescannt am".to_string()])
    );
    assert!(!meta.is_error());
}

#[tokio::test]
async fn describe_failure_yields_error_metadata() {
    let server = StubServer::start(|_, _| {
        StubResponse::json(404, json!({"detail": "Kein Plugin für Attribut 'X' registriert"}))
    })
    .await;

    let meta = server.provider("X").describe().await;
    assert!(meta.is_error());
    assert!(meta.description.is_none());
    assert_eq!(
        meta.error.as_deref(),
        Some("Kein Plugin für Attribut 'X' registriert")
    );
}
