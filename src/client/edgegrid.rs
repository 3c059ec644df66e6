//! EdgeGrid `EG1-HMAC-SHA256` request signing.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use reqwest::{Method, Url};
use sha2::{Digest, Sha256};

use crate::config::Credentials;

type HmacSha256 = Hmac<Sha256>;

/// Signing algorithm tag.
const ALGORITHM: &str = "EG1-HMAC-SHA256";

/// Formats a signing timestamp (`20211023T10:15:30+0000`).
#[must_use]
pub fn timestamp(now: DateTime<Utc>) -> String {
    now.format("%Y%m%dT%H:%M:%S+0000").to_string()
}

/// Generates a fresh request nonce.
#[must_use]
pub fn nonce() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Builds the `Authorization` header value for one request.
///
/// `timestamp` and `nonce` are parameters so signatures are reproducible.
#[must_use]
pub fn authorization(
    creds: &Credentials,
    method: &Method,
    url: &Url,
    body: &[u8],
    timestamp: &str,
    nonce: &str,
) -> String {
    let auth = format!(
        "{ALGORITHM} client_token={};access_token={};timestamp={timestamp};nonce={nonce};",
        creds.client_token, creds.access_token
    );

    let signing_key = hmac_base64(creds.client_secret.as_bytes(), timestamp.as_bytes());
    let data = [
        method.as_str().to_ascii_uppercase(),
        url.scheme().to_string(),
        authority(url),
        path_and_query(url),
        String::new(),
        content_hash(method, body, creds.max_body),
        auth.clone(),
    ]
    .join("\t");

    let signature = hmac_base64(signing_key.as_bytes(), data.as_bytes());
    format!("{auth}signature={signature}")
}

fn authority(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    url.port()
        .map_or_else(|| host.to_string(), |port| format!("{host}:{port}"))
}

fn path_and_query(url: &Url) -> String {
    match url.query() {
        Some(q) => format!("{}?{q}", url.path()),
        None => url.path().to_string(),
    }
}

/// Only POST bodies are hashed, truncated to `max_body` bytes.
fn content_hash(method: &Method, body: &[u8], max_body: usize) -> String {
    if *method != Method::POST || body.is_empty() {
        return String::new();
    }
    let signed = &body[..body.len().min(max_body)];
    STANDARD.encode(Sha256::digest(signed))
}

fn hmac_base64(key: &[u8], data: &[u8]) -> String {
    // HMAC accepts keys of any length.
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC key of any length is valid");
    mac.update(data);
    STANDARD.encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const TS: &str = "20211023T10:15:30+0000";
    const NONCE: &str = "nonce-xx-xxxx";

    fn creds() -> Credentials {
        Credentials {
            host: "akab-host.luna.akamaiapis.net".into(),
            client_token: "akab-client".into(),
            client_secret: "SOMESECRET".into(),
            access_token: "akab-access".into(),
            max_body: 131_072,
        }
    }

    #[test]
    fn timestamp_format() {
        let now = Utc.with_ymd_and_hms(2021, 10, 23, 10, 15, 30).unwrap();
        assert_eq!(timestamp(now), TS);
    }

    #[test]
    fn nonces_are_unique() {
        assert_ne!(nonce(), nonce());
    }

    #[test]
    fn signs_get_request() {
        let url = Url::parse(
            "https://akab-host.luna.akamaiapis.net/diagnostic-tools/v2/url-debug?url=https%3A%2F%2Fwww.example.com%2F",
        )
        .unwrap();
        let header = authorization(&creds(), &Method::GET, &url, b"", TS, NONCE);
        assert_eq!(
            header,
            "EG1-HMAC-SHA256 client_token=akab-client;access_token=akab-access;\
             timestamp=20211023T10:15:30+0000;nonce=nonce-xx-xxxx;\
             signature=ygsmRrxrWZDXZn5WdglsTOrAJzxZjHhBz3kafNhTC1E="
        );
    }

    #[test]
    fn signs_post_body() {
        let url =
            Url::parse("https://akab-host.luna.akamaiapis.net/papi/v1/search/find-by-value")
                .unwrap();
        let header = authorization(
            &creds(),
            &Method::POST,
            &url,
            br#"{"hostname":"www.example.com"}"#,
            TS,
            NONCE,
        );
        assert!(header.ends_with("signature=1iVJg1eIjWHxZFahJum26XCSrckOdlqdF6O8yF64bKs="));
    }

    #[test]
    fn content_hash_truncates_to_max_body() {
        let body = br#"{"hostname":"www.example.com"}"#;
        assert_eq!(
            content_hash(&Method::POST, body, 131_072),
            "Dt/KZjYB3DwJDPV4YVfH+Wn2XV5fVe17PllebnlxvSw="
        );
        assert_eq!(
            content_hash(&Method::POST, body, 8),
            "SluMtzd5nPb0Hjpcf4aUNp00YurQcPCs56YYGllJf+4="
        );
        assert_eq!(content_hash(&Method::GET, body, 131_072), "");
    }

    #[test]
    fn authority_keeps_port() {
        let url = Url::parse("http://127.0.0.1:8080/x").unwrap();
        assert_eq!(authority(&url), "127.0.0.1:8080");
    }
}
