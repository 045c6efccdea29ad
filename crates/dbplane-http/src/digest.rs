//! HTTP digest authentication (RFC 2617, MD5, `qop=auth`).
//!
//! Both backend APIs authenticate programmatic API keys with digest auth:
//! the public key is the username and the private key is the password.

use std::fmt;

use rand::Rng;

use crate::error::HttpError;

/// API key pair used as digest credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Public API key.
    pub username: String,
    /// Private API key.
    pub password: String,
}

impl Credentials {
    /// Create a credentials pair.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A parsed `WWW-Authenticate: Digest ...` challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    /// Protection space.
    pub realm: String,
    /// Server nonce.
    pub nonce: String,
    /// Opaque value echoed back to the server.
    pub opaque: Option<String>,
    /// Quality of protection offered by the server.
    pub qop: Option<String>,
    /// Hash algorithm; only MD5 is supported.
    pub algorithm: Option<String>,
}

impl Challenge {
    /// Parse a `WWW-Authenticate` header value.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::InvalidChallenge`] if the header is not a digest
    /// challenge, lacks `realm`/`nonce`, or asks for an unsupported algorithm.
    pub fn parse(header: &str) -> Result<Self, HttpError> {
        let header = header.trim();
        let params = match header.split_once(' ') {
            Some((scheme, rest)) if scheme.eq_ignore_ascii_case("digest") => rest,
            _ => return Err(HttpError::InvalidChallenge(header.to_string())),
        };

        let mut realm = None;
        let mut nonce = None;
        let mut opaque = None;
        let mut qop = None;
        let mut algorithm = None;

        for (key, value) in split_params(params) {
            match key.to_ascii_lowercase().as_str() {
                "realm" => realm = Some(value),
                "nonce" => nonce = Some(value),
                "opaque" => opaque = Some(value),
                "qop" => qop = Some(value),
                "algorithm" => algorithm = Some(value),
                _ => {}
            }
        }

        if let Some(alg) = &algorithm {
            if !alg.eq_ignore_ascii_case("md5") {
                return Err(HttpError::InvalidChallenge(format!(
                    "unsupported algorithm {alg}"
                )));
            }
        }

        Ok(Self {
            realm: realm.ok_or_else(|| HttpError::InvalidChallenge("missing realm".into()))?,
            nonce: nonce.ok_or_else(|| HttpError::InvalidChallenge("missing nonce".into()))?,
            opaque,
            qop,
            algorithm,
        })
    }

    fn offers_auth(&self) -> bool {
        self.qop
            .as_deref()
            .is_some_and(|qop| qop.split(',').any(|q| q.trim() == "auth"))
    }

    /// Build the `Authorization` header value for one request.
    #[must_use]
    pub fn authorization(
        &self,
        credentials: &Credentials,
        method: &str,
        uri: &str,
        cnonce: &str,
        nc: u32,
    ) -> String {
        let ha1 = hex_md5(&format!(
            "{}:{}:{}",
            credentials.username, self.realm, credentials.password
        ));
        let ha2 = hex_md5(&format!("{method}:{uri}"));
        let nc = format!("{nc:08x}");

        let mut header = format!(
            r#"Digest username="{}", realm="{}", nonce="{}", uri="{}""#,
            credentials.username, self.realm, self.nonce, uri
        );

        if self.offers_auth() {
            let response = hex_md5(&format!("{ha1}:{}:{nc}:{cnonce}:auth:{ha2}", self.nonce));
            header.push_str(&format!(
                r#", qop=auth, nc={nc}, cnonce="{cnonce}", response="{response}""#
            ));
        } else {
            let response = hex_md5(&format!("{ha1}:{}:{ha2}", self.nonce));
            header.push_str(&format!(r#", response="{response}""#));
        }

        if let Some(opaque) = &self.opaque {
            header.push_str(&format!(r#", opaque="{opaque}""#));
        }
        if let Some(algorithm) = &self.algorithm {
            header.push_str(&format!(", algorithm={algorithm}"));
        }
        header
    }
}

/// Random client nonce.
#[must_use]
pub fn cnonce() -> String {
    let bytes: [u8; 8] = rand::thread_rng().r#gen();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn hex_md5(input: &str) -> String {
    format!("{:x}", md5::compute(input.as_bytes()))
}

/// Split `k1="v1", k2=v2` into pairs, honouring commas inside quotes.
fn split_params(input: &str) -> Vec<(String, String)> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut quoted = false;

    for c in input.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                current.push(c);
            }
            ',' if !quoted => {
                parts.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    parts.push(current);

    parts
        .into_iter()
        .filter_map(|part| {
            let (key, value) = part.split_once('=')?;
            Some((
                key.trim().to_string(),
                value.trim().trim_matches('"').to_string(),
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RFC_CHALLENGE: &str = r#"Digest realm="testrealm@host.com", qop="auth,auth-int", nonce="dcd98b7102dd2f0e8b11d0f600bfb0c093", opaque="5ccc069c403ebaf9f0171e9517f40e41""#;

    #[test]
    fn parses_rfc_challenge() {
        let challenge = Challenge::parse(RFC_CHALLENGE).expect("valid challenge");
        assert_eq!(challenge.realm, "testrealm@host.com");
        assert_eq!(challenge.nonce, "dcd98b7102dd2f0e8b11d0f600bfb0c093");
        assert_eq!(
            challenge.opaque.as_deref(),
            Some("5ccc069c403ebaf9f0171e9517f40e41")
        );
        assert_eq!(challenge.qop.as_deref(), Some("auth,auth-int"));
        assert!(challenge.offers_auth());
    }

    #[test]
    fn computes_rfc_2617_response() {
        let challenge = Challenge::parse(RFC_CHALLENGE).expect("valid challenge");
        let creds = Credentials::new("Mufasa", "Circle Of Life");
        let header = challenge.authorization(&creds, "GET", "/dir/index.html", "0a4f113b", 1);

        assert!(header.starts_with(r#"Digest username="Mufasa""#));
        assert!(header.contains("nc=00000001"));
        assert!(header.contains(r#"cnonce="0a4f113b""#));
        assert!(header.contains(r#"response="6629fae49393a05397450978507c4ef1""#));
        assert!(header.contains(r#"opaque="5ccc069c403ebaf9f0171e9517f40e41""#));
    }

    #[test]
    fn response_without_qop() {
        let challenge = Challenge::parse(r#"Digest realm="r", nonce="n""#).expect("valid");
        let header = challenge.authorization(&Credentials::new("u", "p"), "GET", "/", "c", 1);
        assert!(!header.contains("qop="));
        assert!(header.contains("response="));
    }

    #[test]
    fn rejects_basic_challenge() {
        let result = Challenge::parse(r#"Basic realm="x""#);
        assert!(matches!(result, Err(HttpError::InvalidChallenge(_))));
    }

    #[test]
    fn rejects_missing_nonce() {
        let result = Challenge::parse(r#"Digest realm="x""#);
        assert!(result.expect_err("rejected").to_string().contains("missing nonce"));
    }

    #[test]
    fn rejects_sha256() {
        let result = Challenge::parse(r#"Digest realm="x", nonce="n", algorithm=SHA-256"#);
        assert!(result.is_err());
    }

    #[test]
    fn cnonce_is_hex() {
        let nonce = cnonce();
        assert_eq!(nonce.len(), 16);
        assert!(nonce.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn credentials_debug_redacts_password() {
        let creds = Credentials::new("public", "very-secret");
        let debug = format!("{creds:?}");
        assert!(debug.contains("public"));
        assert!(!debug.contains("very-secret"));
    }
}
