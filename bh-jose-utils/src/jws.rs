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

//! The three-part `JWS` compact serialization of [RFC 7515, Section 3.1][1].
//!
//! This module is format-only: it converts between the compact string, its
//! `base64url` segments and the decoded header & payload. Computing or
//! verifying the signature is the caller's concern; an unsigned token simply
//! carries an empty third segment.
//!
//! [1]: https://datatracker.ietf.org/doc/html/rfc7515#section-3.1

use bherror::traits::{ErrorContext as _, ForeignError as _};
use serde::Serialize;
use serde_json::Value;

use crate::{
    utils::{base64_url_decode, base64_url_encode, deflate_compress, deflate_decompress},
    FormatError, Headers,
};

pub(crate) const COMPACT_JWS_NUM_PARTS: usize = 3;

/// The three `base64url`-encoded segments of a compact `JWS`.
///
/// No decoding of the segment contents is performed when constructing this
/// type; it is a purely syntactic view of the token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JwsParts {
    /// The `base64url`-encoded protected header.
    pub header: String,
    /// The `base64url`-encoded payload, possibly `DEFLATE`-compressed before
    /// encoding.
    pub payload: String,
    /// The `base64url`-encoded signature; [`None`] while the token is not yet
    /// signed.
    pub signature: Option<String>,
}

impl JwsParts {
    /// Renders the compact serialization of the token.
    ///
    /// An unsigned token renders as `<header>.<payload>.` — the trailing `.`
    /// is part of the format and must be stripped by the caller before
    /// computing the signing input.
    pub fn compact(&self) -> String {
        format!(
            "{}.{}.{}",
            self.header,
            self.payload,
            self.signature.as_deref().unwrap_or("")
        )
    }

    /// Attaches a signature computed out-of-band by the caller, replacing any
    /// previous one.
    ///
    /// The raw signature bytes are `base64url`-encoded into the third
    /// segment; no validation of their length or content is performed here,
    /// that is the verification collaborator's job.
    pub fn attach_signature(&mut self, signature: impl AsRef<[u8]>) {
        self.signature = Some(base64_url_encode(signature));
    }

    /// Decodes the header segment and recovers the payload bytes,
    /// decompressing them when the header requests it.
    ///
    /// The header must be valid `base64url`-encoded JSON object; any failure
    /// is total, there is no partially-decoded header. When the header
    /// carries `"zip": "DEF"` the payload segment is run through a raw
    /// `DEFLATE` inflater after decoding, otherwise it is decoded as-is.
    pub fn inflate(&self) -> bherror::Result<(Headers, Vec<u8>), FormatError> {
        let header_bytes = base64_url_decode(&self.header)
            .foreign_err(|| FormatError::InvalidBase64Url)
            .ctx(|| "decoding the protected header")?;
        let headers: Headers = serde_json::from_slice(&header_bytes)
            .foreign_err(|| FormatError::InvalidJson)
            .ctx(|| "parsing the protected header")?;

        let payload_bytes = base64_url_decode(&self.payload)
            .foreign_err(|| FormatError::InvalidBase64Url)
            .ctx(|| "decoding the payload")?;

        let payload_bytes = if headers.is_deflated() {
            deflate_decompress(payload_bytes).foreign_err(|| FormatError::PayloadDecompression)?
        } else {
            payload_bytes
        };

        Ok((headers, payload_bytes))
    }

    /// Fully decodes the token into its header, JSON payload and optional
    /// signature bytes.
    pub fn data(&self) -> bherror::Result<JwsData, FormatError> {
        let (header, payload_bytes) = self.inflate()?;

        let payload: Value = serde_json::from_slice(&payload_bytes)
            .foreign_err(|| FormatError::InvalidJson)
            .ctx(|| "parsing the payload")?;

        let signature = match self.signature.as_deref() {
            None | Some("") => None,
            Some(signature) => Some(
                base64_url_decode(signature)
                    .foreign_err(|| FormatError::InvalidBase64Url)
                    .ctx(|| "decoding the signature")?,
            ),
        };

        Ok(JwsData {
            header,
            payload,
            signature,
        })
    }
}

impl std::str::FromStr for JwsParts {
    type Err = bherror::Error<FormatError>;

    /// Splits a compact token on the `.` character.
    ///
    /// Succeeds only when the result is exactly three segments; any other
    /// count is a malformed token, with no partial recovery. An empty third
    /// segment parses into an unsigned token.
    fn from_str(compact: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = compact.split('.').collect();
        if parts.len() != COMPACT_JWS_NUM_PARTS {
            return Err(bherror::Error::root(FormatError::WrongNumberOfJwsParts(
                parts.len(),
            )));
        }

        let signature = match parts[2] {
            "" => None,
            signature => Some(signature.to_string()),
        };

        Ok(Self {
            header: parts[0].to_string(),
            payload: parts[1].to_string(),
            signature,
        })
    }
}

impl std::fmt::Display for JwsParts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.compact())
    }
}

/// A decoded `JWS`: header & payload as JSON data, signature as raw bytes if
/// the token was signed.
#[derive(Debug, Clone, PartialEq)]
pub struct JwsData {
    /// The protected header.
    pub header: Headers,
    /// The JSON payload claims.
    pub payload: Value,
    /// The signature bytes, if the token was signed.
    pub signature: Option<Vec<u8>>,
}

impl JwsData {
    /// Encodes the header and payload into the `base64url` segments of an
    /// unsigned token, compressing the payload when the header carries
    /// `"zip": "DEF"`.
    ///
    /// Any signature held by `self` is deliberately not carried over; signing
    /// happens over the unsigned serialization and is attached by the caller
    /// via [`JwsParts::attach_signature`].
    pub fn to_unsigned_parts(&self) -> bherror::Result<JwsParts, FormatError> {
        unsigned_parts(&self.header, &self.payload)
    }

    /// The `iss` payload claim, if present.
    pub fn issuer(&self) -> Option<&str> {
        self.payload.get("iss").and_then(Value::as_str)
    }

    /// A typed view over the registered claims of the payload.
    pub fn registered_claims(&self) -> bherror::Result<crate::RegisteredClaims, FormatError> {
        serde_json::from_value(self.payload.clone()).foreign_err(|| FormatError::InvalidJson)
    }
}

/// Encodes the given header and payload claims into the `base64url` segments
/// of an unsigned compact token.
///
/// The payload is serialized to JSON bytes and, iff the header carries
/// `"zip": "DEF"`, compressed with raw `DEFLATE` at the maximum compression
/// level before encoding. The returned parts carry no signature.
pub fn unsigned_parts<T: Serialize>(
    headers: &Headers,
    payload: &T,
) -> bherror::Result<JwsParts, FormatError> {
    let payload_bytes =
        serde_json::to_vec(payload).foreign_err(|| FormatError::JsonSerialization)?;

    let payload_bytes = if headers.is_deflated() {
        deflate_compress(payload_bytes).foreign_err(|| FormatError::PayloadCompression)?
    } else {
        payload_bytes
    };

    Ok(JwsParts {
        header: base64_url_encode(headers.to_json_string()),
        payload: base64_url_encode(payload_bytes),
        signature: None,
    })
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use serde_json::json;

    use super::*;
    use crate::json_headers;

    fn example_headers() -> Headers {
        json_headers!({ "alg": "ES256", "kid": "key-1" })
    }

    fn example_payload() -> Value {
        json!({
            "iss": "s6BhdRkqt3",
            "aud": "https://server.example.com",
            "response_type": "code id_token",
            "state": "af0ifjsldkj",
            "max_age": 86400
        })
    }

    #[test]
    fn test_split_requires_three_parts() {
        assert!(JwsParts::from_str("header.payload.signature").is_ok());
        assert!(JwsParts::from_str("header.payload.").is_ok());

        for malformed in ["", "a", "a.b", "a.b.c.d", "a.b.c.d.e", "..."] {
            let err = JwsParts::from_str(malformed).unwrap_err();
            assert!(matches!(err.error, FormatError::WrongNumberOfJwsParts(_)));
        }
    }

    #[test]
    fn test_split_counts_parts() {
        let err = JwsParts::from_str("a.b.c.d").unwrap_err();
        assert_eq!(FormatError::WrongNumberOfJwsParts(4), err.error);
    }

    #[test]
    fn test_split_is_purely_syntactic() {
        let parts = JwsParts::from_str("not base64!.still not base64!.???").unwrap();
        assert_eq!("not base64!", parts.header);
        assert_eq!("still not base64!", parts.payload);
        assert_eq!(Some("???".to_string()), parts.signature);
    }

    #[test]
    fn test_empty_signature_segment_is_unsigned() {
        let parts = JwsParts::from_str("aGVhZGVy.cGF5bG9hZA.").unwrap();
        assert_eq!(None, parts.signature);
        // the trailing dot must survive the round trip
        assert_eq!("aGVhZGVy.cGF5bG9hZA.", parts.compact());
    }

    #[test]
    fn test_unsigned_compact_ends_with_dot() {
        let parts = unsigned_parts(&example_headers(), &example_payload()).unwrap();
        let compact = parts.compact();

        assert!(compact.ends_with('.'));
        assert_eq!(2, compact.matches('.').count());
    }

    #[test]
    fn test_attach_signature() {
        let mut parts = unsigned_parts(&example_headers(), &example_payload()).unwrap();
        parts.attach_signature(b"TestKey");

        let compact = parts.compact();
        assert!(compact.ends_with(".VGVzdEtleQ"));

        let reparsed = JwsParts::from_str(&compact).unwrap();
        assert_eq!(Some(b"TestKey".to_vec()), reparsed.data().unwrap().signature);
    }

    #[test]
    fn test_round_trip_uncompressed() {
        let parts = unsigned_parts(&example_headers(), &example_payload()).unwrap();
        let (headers, payload_bytes) = parts.inflate().unwrap();

        assert_eq!(example_headers(), headers);
        let payload: Value = serde_json::from_slice(&payload_bytes).unwrap();
        assert_eq!(example_payload(), payload);
    }

    #[test]
    fn test_round_trip_deflated() {
        let mut headers = example_headers();
        headers.insert("zip", "DEF".into());

        let parts = unsigned_parts(&headers, &example_payload()).unwrap();
        let (inflated_headers, payload_bytes) = parts.inflate().unwrap();

        assert_eq!(headers, inflated_headers);
        let payload: Value = serde_json::from_slice(&payload_bytes).unwrap();
        assert_eq!(example_payload(), payload);
    }

    #[test]
    fn test_deflated_payload_is_not_plain_json() {
        let headers = json_headers!({ "zip": "DEF" });
        let parts = unsigned_parts(&headers, &example_payload()).unwrap();

        let raw = base64_url_decode(&parts.payload).unwrap();
        assert!(serde_json::from_slice::<Value>(&raw).is_err());
    }

    #[test]
    fn test_inflate_rejects_invalid_header_base64() {
        let parts = JwsParts::from_str("n√t-base64.cGF5bG9hZA.").unwrap();
        let err = parts.inflate().unwrap_err();
        assert_eq!(FormatError::InvalidBase64Url, err.error);
    }

    #[test]
    fn test_inflate_rejects_non_json_header() {
        let parts = JwsParts {
            header: base64_url_encode("not json"),
            payload: base64_url_encode("{}"),
            signature: None,
        };
        let err = parts.inflate().unwrap_err();
        assert_eq!(FormatError::InvalidJson, err.error);
    }

    #[test]
    fn test_inflate_rejects_non_object_header() {
        // a JSON array is valid JSON but not a header map
        let parts = JwsParts {
            header: base64_url_encode("[1,2,3]"),
            payload: base64_url_encode("{}"),
            signature: None,
        };
        assert!(parts.inflate().is_err());
    }

    #[test]
    fn test_inflate_rejects_corrupt_deflate_stream() {
        let headers = json_headers!({ "zip": "DEF" });
        let parts = JwsParts {
            header: base64_url_encode(headers.to_json_string()),
            payload: base64_url_encode([0xffu8, 0xff, 0xff, 0xff]),
            signature: None,
        };
        let err = parts.inflate().unwrap_err();
        assert_eq!(FormatError::PayloadDecompression, err.error);
    }

    #[test]
    fn test_zip_other_than_def_is_not_decompressed() {
        let headers = json_headers!({ "zip": "GZIP" });
        let payload = br#"{"sub":"subjectID"}"#;
        let parts = JwsParts {
            header: base64_url_encode(headers.to_json_string()),
            payload: base64_url_encode(payload),
            signature: None,
        };

        let (_, payload_bytes) = parts.inflate().unwrap();
        assert_eq!(payload.to_vec(), payload_bytes);
    }

    #[test]
    fn test_data_exposes_issuer_and_claims() {
        let headers = example_headers();
        let payload = json!({ "iss": "s6BhdRkqt3", "aud": "account", "exp": 1615406982 });

        let parts = unsigned_parts(&headers, &payload).unwrap();
        let data = parts.data().unwrap();

        assert_eq!(Some("s6BhdRkqt3"), data.issuer());
        assert_eq!(None, data.signature);

        let claims = data.registered_claims().unwrap();
        assert_eq!(Some("s6BhdRkqt3".to_string()), claims.iss);
        assert!(claims.aud.unwrap().contains("account"));
    }

    #[test]
    fn test_data_round_trips_back_to_unsigned_parts() {
        let parts = unsigned_parts(&example_headers(), &example_payload()).unwrap();
        let data = parts.data().unwrap();

        assert_eq!(parts, data.to_unsigned_parts().unwrap());
    }
}
