// Copyright (C) 2020-2026  The Blockhouse Technology Limited (TBTL).
//
// This program is free software: you can redistribute it and/or modify it
// under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or (at your
// option) any later version.
//
// This program is distributed in the hope that it will be useful, but
// WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public
// License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! The JOSE header map and the [IANA registered][1] header names used by this
//! crate and its callers.
//!
//! [1]: https://datatracker.ietf.org/doc/html/rfc7515#section-4.1

use serde_json::{Map, Value};

/// The `alg` header; the signing algorithm of a `JWS`, or the algorithm used
/// to encrypt or determine the value of the CEK of a `JWE`.
pub const HEADER_ALGORITHM: &str = "alg";

/// The `enc` header; the `JWE` content encryption algorithm.
pub const HEADER_ENCRYPTION: &str = "enc";

/// The `zip` header; the compression algorithm applied to the payload before
/// encoding, as defined in [RFC 7516, Section 4.1.3][1].
///
/// [1]: https://datatracker.ietf.org/doc/html/rfc7516#section-4.1.3
pub const HEADER_COMPRESSION: &str = "zip";

/// The only `zip` value recognized by this crate: raw `DEFLATE` compression.
pub const COMPRESSION_DEFLATE: &str = "DEF";

/// The `typ` header; the media type of the complete `JWS`/`JWE`.
pub const HEADER_TYPE: &str = "typ";

/// The `cty` header; the media type of the secured content (the payload or
/// the plaintext).
pub const HEADER_CONTENT_TYPE: &str = "cty";

/// The `kid` header; a hint indicating which key was used to secure the `JWS`,
/// or which public key the `JWE` was encrypted to.
pub const HEADER_KEY_ID: &str = "kid";

/// The `skid` header; a hint referencing the sender public key used in the
/// `JWE` key derivation, required for authenticated encryption schemes.
pub const HEADER_SENDER_KEY_ID: &str = "skid";

/// The `jku` header; a URI referring to a set of JSON-encoded public keys.
pub const HEADER_JWK_SET_URL: &str = "jku";

/// The `jwk` header; the public key corresponding to the one used to secure
/// the token.
pub const HEADER_JWK: &str = "jwk";

/// The `jwks` header; an array of public keys of the sender.
pub const HEADER_JWK_SET: &str = "jwks";

/// The `x5u` header; a URI referring to an X.509 certificate or chain.
pub const HEADER_X509_URL: &str = "x5u";

/// The `x5c` header; an X.509 certificate or certificate chain.
pub const HEADER_X509_CHAIN: &str = "x5c";

/// The `crit` header; extensions that must be understood and processed.
pub const HEADER_CRITICAL: &str = "crit";

/// The `epk` header; the ephemeral public key used to wrap the CEK.
pub const HEADER_EPK: &str = "epk";

/// The `apu` header; agreement PartyUInfo of a key agreement.
pub const HEADER_APU: &str = "apu";

/// The `apv` header; agreement PartyVInfo of a key agreement.
pub const HEADER_APV: &str = "apv";

/// The `nonce` header.
pub const HEADER_NONCE: &str = "nonce";

/// An unordered, string-keyed map of JOSE header parameters.
///
/// This is a thin wrapper around a JSON object which offers typed accessors
/// for the registered header names. The accessors are defensive: a missing
/// header or a header of an unexpected JSON type yields [`None`], never a
/// panic. The codec itself performs **no** required-field enforcement; which
/// headers must be present is the caller's protocol decision.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Headers(Map<String, Value>);

impl Headers {
    /// Creates an empty header map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a header parameter, returning the previous value if the name
    /// was already present.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(name.into(), value)
    }

    /// Returns the raw JSON value of the given header parameter.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Returns `true` if no header parameters are set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The `alg` header value.
    pub fn algorithm(&self) -> Option<&str> {
        self.string_value(HEADER_ALGORITHM)
    }

    /// The `enc` header value.
    pub fn encryption(&self) -> Option<&str> {
        self.string_value(HEADER_ENCRYPTION)
    }

    /// The `zip` header value.
    pub fn compression(&self) -> Option<&str> {
        self.string_value(HEADER_COMPRESSION)
    }

    /// The `typ` header value.
    pub fn typ(&self) -> Option<&str> {
        self.string_value(HEADER_TYPE)
    }

    /// The `cty` header value.
    pub fn content_type(&self) -> Option<&str> {
        self.string_value(HEADER_CONTENT_TYPE)
    }

    /// The `kid` header value.
    pub fn key_id(&self) -> Option<&str> {
        self.string_value(HEADER_KEY_ID)
    }

    /// The `skid` header value.
    pub fn sender_key_id(&self) -> Option<&str> {
        self.string_value(HEADER_SENDER_KEY_ID)
    }

    /// Returns `true` iff the `zip` header requests raw `DEFLATE` compression
    /// of the payload, i.e. equals the literal `"DEF"`.
    ///
    /// Any other value, or any non-string value, means the payload is encoded
    /// uncompressed.
    pub fn is_deflated(&self) -> bool {
        self.compression() == Some(COMPRESSION_DEFLATE)
    }

    /// Serializes the header map into a JSON string.
    pub(crate) fn to_json_string(&self) -> String {
        Value::Object(self.0.clone()).to_string()
    }

    fn string_value(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }
}

impl From<Map<String, Value>> for Headers {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json_headers;

    #[test]
    fn test_typed_accessors() {
        let headers = json_headers!({
            "alg": "A256KW",
            "enc": "A256GCM",
            "kid": "did:example:123#key-1",
            "skid": "did:example:456#key-1",
            "typ": "jwt",
            "cty": "didcomm-signed+json",
        });

        assert_eq!(Some("A256KW"), headers.algorithm());
        assert_eq!(Some("A256GCM"), headers.encryption());
        assert_eq!(Some("did:example:123#key-1"), headers.key_id());
        assert_eq!(Some("did:example:456#key-1"), headers.sender_key_id());
        assert_eq!(Some("jwt"), headers.typ());
        assert_eq!(Some("didcomm-signed+json"), headers.content_type());
        assert_eq!(None, headers.compression());
        assert!(!headers.is_deflated());
    }

    #[test]
    fn test_type_mismatch_yields_none() {
        let headers = json_headers!({ "alg": 42, "crit": ["b64"] });

        assert_eq!(None, headers.algorithm());
        assert!(headers.get(HEADER_CRITICAL).unwrap().is_array());
    }

    #[test]
    fn test_is_deflated_only_for_def() {
        assert!(json_headers!({ "zip": "DEF" }).is_deflated());
        assert!(!json_headers!({ "zip": "GZIP" }).is_deflated());
        assert!(!json_headers!({ "zip": true }).is_deflated());
        assert!(!Headers::new().is_deflated());
    }

    #[test]
    fn test_insert_overwrites() {
        let mut headers = Headers::new();
        assert!(headers.insert(HEADER_ALGORITHM, "ES256".into()).is_none());

        let previous = headers.insert(HEADER_ALGORITHM, "ES384".into());
        assert_eq!(Some(Value::from("ES256")), previous);
        assert_eq!(Some("ES384"), headers.algorithm());
    }
}
