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

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! This crate provides the [JOSE][1] compact serialization formats: the
//! three-part `JWS`/`JWT` form of [RFC 7515][2] and the five-part `JWE` form
//! (plus its general JSON serialization) of [RFC 7516][3].
//!
//! [1]: https://datatracker.ietf.org/doc/html/rfc7515
//! [2]: https://datatracker.ietf.org/doc/html/rfc7515#section-3.1
//! [3]: https://datatracker.ietf.org/doc/html/rfc7516#section-7
//!
//! # Details
//!
//! The crate is deliberately format-only. It encodes and decodes the
//! `.`-separated, `base64url`-encoded (unpadded, [RFC 4648, Section 5][4])
//! token strings, applies the optional `"zip": "DEF"` raw-`DEFLATE` payload
//! compression, and enforces the structural rules of each serialization.
//! Producing signatures, wrapping content encryption keys and performing the
//! actual encryption are the caller's collaborators — typically
//! `bh-jws-utils` for signing.
//!
//! Every operation is a pure, synchronous function of its inputs: a call
//! either returns a fully valid result or a single
//! [`bherror::Error`] describing exactly what was malformed or
//! unrepresentable. Nothing is retried, defaulted or partially decoded.
//!
//! [4]: https://datatracker.ietf.org/doc/html/rfc4648#section-5
//!
//! # Examples
//!
//! Build an unsigned token, hand the signing input to a signer, and decode it
//! back:
//!
//! ```
//! use std::str::FromStr;
//!
//! use bh_jose_utils::{json_headers, unsigned_parts, JwsParts};
//!
//! let headers = json_headers!({ "alg": "ES256", "typ": "jwt", "zip": "DEF" });
//! let payload = serde_json::json!({ "iss": "s6BhdRkqt3", "sub": "subjectID" });
//!
//! let mut parts = unsigned_parts(&headers, &payload).unwrap();
//!
//! // The unsigned rendering keeps the trailing dot.
//! let unsigned = parts.compact();
//! assert!(unsigned.ends_with('.'));
//!
//! // The signature is computed out-of-band over the first two segments.
//! parts.attach_signature(b"signature-bytes-from-the-signer");
//!
//! let decoded = JwsParts::from_str(&parts.compact()).unwrap().data().unwrap();
//! assert_eq!(Some("s6BhdRkqt3"), decoded.issuer());
//! ```
//!
//! Compact-serialize a single-recipient `JWE`:
//!
//! ```
//! use bh_jose_utils::{json_headers, Jwe, Recipient};
//!
//! let jwe = Jwe {
//!     protected: Some(json_headers!({ "alg": "A256KW", "enc": "A256GCM" })),
//!     recipients: vec![Recipient {
//!         header: None,
//!         encrypted_key: b"wrapped-cek".to_vec(),
//!     }],
//!     iv: b"iv".to_vec(),
//!     ciphertext: b"ciphertext".to_vec(),
//!     tag: b"tag".to_vec(),
//!     ..Default::default()
//! };
//!
//! let compact = jwe.compact().unwrap();
//! assert_eq!(5, compact.split('.').count());
//! ```

mod claims;
mod error;
mod headers;
mod jwe;
mod jws;
mod utils;

pub use claims::*;
pub use error::*;
pub use headers::*;
pub use jwe::*;
pub use jws::*;
pub use utils::*;

/// Helper macro with the same syntax as [`serde_json::json`] specialized for
/// constructing a [`Headers`] map.
///
/// It panics if the syntax is valid JSON but not an object.
#[macro_export]
macro_rules! json_headers {
    ($stuff:tt) => {
        match ::serde_json::json!($stuff) {
            ::serde_json::Value::Object(o) => $crate::Headers::from(o),
            _ => unreachable!("JSON literal wasn't an object"),
        }
    };
}
