//! HTTP Signature authentication for the payment provider's REST API.
//!
//! The signed headers are `host date (request-target) digest v-c-merchant-id`
//! (`digest` only for requests with a body), MACed with HMAC-SHA256 under the
//! base64-decoded shared secret.

use anyhow::{anyhow, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone)]
pub struct SignedHeaders {
    pub date: String,
    pub digest: Option<String>,
    pub signature: String,
}

pub struct SigningKey<'a> {
    pub merchant_id: &'a str,
    pub key_id: &'a str,
    pub secret_key: &'a str,
}

pub fn body_digest(body: &[u8]) -> String {
    format!("SHA-256={}", STANDARD.encode(Sha256::digest(body)))
}

pub fn http_date(now: chrono::DateTime<chrono::Utc>) -> String {
    now.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

pub fn sign(
    key: &SigningKey<'_>,
    method: &str,
    host: &str,
    path: &str,
    body: Option<&[u8]>,
    date: &str,
) -> Result<SignedHeaders> {
    let digest = body.map(body_digest);
    let request_target = format!("{} {}", method.to_lowercase(), path);

    let mut lines = vec![
        format!("host: {host}"),
        format!("date: {date}"),
        format!("(request-target): {request_target}"),
    ];
    let mut header_names = vec!["host", "date", "(request-target)"];
    if let Some(d) = &digest {
        lines.push(format!("digest: {d}"));
        header_names.push("digest");
    }
    lines.push(format!("v-c-merchant-id: {}", key.merchant_id));
    header_names.push("v-c-merchant-id");

    let secret = STANDARD
        .decode(key.secret_key)
        .map_err(|e| anyhow!("gateway secret key is not valid base64: {e}"))?;
    let mut mac = HmacSha256::new_from_slice(&secret).map_err(|e| anyhow!("invalid gateway secret key: {e}"))?;
    mac.update(lines.join("\n").as_bytes());
    let signature = STANDARD.encode(mac.finalize().into_bytes());

    Ok(SignedHeaders {
        date: date.to_string(),
        digest,
        signature: format!(
            "keyid=\"{}\", algorithm=\"HmacSHA256\", headers=\"{}\", signature=\"{}\"",
            key.key_id,
            header_names.join(" "),
            signature
        ),
    })
}
