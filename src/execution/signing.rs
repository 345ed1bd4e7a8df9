//! Gate.io API v4 request signing
//!
//! SIGN = hex(HMAC-SHA512(secret, "METHOD\nPATH\nQUERY\nhex(SHA512(body))\nTIMESTAMP"))

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha512};

use crate::api::GatewayError;

type HmacSha512 = Hmac<Sha512>;

#[derive(Clone, Default)]
pub struct GateCredentials {
    pub api_key: String,
    pub api_secret: String,
}

impl GateCredentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.api_key.is_empty() && !self.api_secret.is_empty()
    }
}

impl std::fmt::Debug for GateCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GateCredentials")
            .field("api_key", &mask(&self.api_key))
            .field("api_secret", &"***")
            .finish()
    }
}

fn mask(key: &str) -> String {
    match key.get(..4) {
        Some(prefix) if key.len() > 8 => format!("{}***", prefix),
        _ => "***".to_string(),
    }
}

pub fn signature_payload(method: &str, path: &str, query: &str, body: &str, timestamp: &str) -> String {
    let body_hash = hex::encode(Sha512::digest(body.as_bytes()));
    format!("{}\n{}\n{}\n{}\n{}", method, path, query, body_hash, timestamp)
}

pub fn sign(
    secret: &str,
    method: &str,
    path: &str,
    query: &str,
    body: &str,
    timestamp: &str,
) -> Result<String, GatewayError> {
    let mut mac = HmacSha512::new_from_slice(secret.as_bytes())
        .map_err(|e| GatewayError::InvalidResponse(format!("HMAC key rejected: {}", e)))?;
    mac.update(signature_payload(method, path, query, body, timestamp).as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_hashes_empty_body() {
        let payload = signature_payload("GET", "/api/v4/spot/accounts", "", "", "1700000000");
        assert_eq!(
            payload,
            "GET\n/api/v4/spot/accounts\n\n\
             cf83e1357eefb8bdf1542850d66d8007d620e4050b5715dc83f4a921d36ce9ce\
             47d0d13c5d85f2b0ff8318d2877eec2f63b931bd47417a81a538327af927da3e\n\
             1700000000"
        );
    }

    #[test]
    fn test_known_signatures() {
        let get = sign("secret", "GET", "/api/v4/spot/accounts", "currency=USDT", "", "1700000000").unwrap();
        assert_eq!(
            get,
            "c787d4b8adad55149be36a5dfcb2509fc17ef0e23ed5b1c90da2dc85042ca799\
             98221b1deb5afc0b85823fa7c28cab66a951b1ecd612b9e1f4f8820123463e26"
        );

        let post = sign(
            "secret",
            "POST",
            "/api/v4/spot/orders",
            "",
            r#"{"currency_pair":"X_USDT"}"#,
            "1700000000",
        )
        .unwrap();
        assert_eq!(
            post,
            "36ea4d15e12f0c01296faf338fec71272928c2140031bf6d4189b6e3e9d714fc\
             480f5cb4df256ab1e31ce2bebe7f9f92d866a310b09a529ca0f395d655e3715b"
        );
    }

    #[test]
    fn test_debug_masks_secrets() {
        let creds = GateCredentials::new("abcdef123456", "topsecret");
        let printed = format!("{:?}", creds);
        assert!(printed.contains("abcd***"));
        assert!(!printed.contains("topsecret"));
        assert!(creds.is_complete());
        assert!(!GateCredentials::default().is_complete());
    }
}
