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

//! The `JWE` serializations of [RFC 7516, Section 7][1]: the five-part
//! compact form and the general (multi-recipient) JSON form.
//!
//! As with the rest of this crate, the module is format-only: the encrypted
//! key, initialization vector, ciphertext and authentication tag are opaque
//! byte strings produced by the caller's key-management and content
//! encryption collaborators.
//!
//! [1]: https://datatracker.ietf.org/doc/html/rfc7516#section-7

use bherror::traits::ForeignError as _;
use serde::{Deserialize, Serialize};

use crate::{
    utils::{base64_url_decode, base64_url_encode},
    CompactJweError, FormatError, Headers,
};

pub(crate) const COMPACT_JWE_NUM_PARTS: usize = 5;

/// A single recipient of a `JWE`: the content encryption key encrypted to
/// that recipient, paired with an optional per-recipient header fragment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recipient {
    /// The per-recipient unprotected header, if any.
    pub header: Option<Headers>,
    /// The raw (pre-`base64url`) encrypted content encryption key bytes.
    pub encrypted_key: Vec<u8>,
}

/// An in-memory `JWE` structure, as defined in [RFC 7516][1].
///
/// All byte fields hold the raw octets; `base64url` encoding happens only at
/// serialization time. The structure is constructed fresh per call and never
/// mutated by this crate.
///
/// [1]: https://datatracker.ietf.org/doc/html/rfc7516
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Jwe {
    /// The protected header, integrity-covered by the authentication tag.
    pub protected: Option<Headers>,
    /// The shared unprotected header; only representable in the general JSON
    /// serialization.
    pub unprotected: Option<Headers>,
    /// The recipients of the token.
    pub recipients: Vec<Recipient>,
    /// Additional authenticated data; only representable in the general JSON
    /// serialization.
    pub aad: Vec<u8>,
    /// The initialization vector of the content encryption.
    pub iv: Vec<u8>,
    /// The ciphertext; mandatory in every serialization.
    pub ciphertext: Vec<u8>,
    /// The authentication tag of the content encryption.
    pub tag: Vec<u8>,
}

impl Jwe {
    /// Serializes the `JWE` into the compact, URL-safe form of
    /// [RFC 7516, Section 7.1][1]:
    ///
    /// ```text
    /// BASE64URL(protected header) "." BASE64URL(encrypted key) "."
    /// BASE64URL(iv) "." BASE64URL(ciphertext) "." BASE64URL(tag)
    /// ```
    ///
    /// The segment order is mandated by the wire format. The compact form
    /// structurally cannot represent a shared unprotected header, AAD, more
    /// (or fewer) than one recipient, or a per-recipient header; each of
    /// those conditions is rejected with its own
    /// [`CompactJweError`] variant rather than silently dropping data.
    ///
    /// [1]: https://datatracker.ietf.org/doc/html/rfc7516#section-7.1
    pub fn compact(&self) -> bherror::Result<String, CompactJweError> {
        let Some(protected) = &self.protected else {
            return Err(bherror::Error::root(CompactJweError::MissingProtectedHeader));
        };

        if self.recipients.len() != 1 {
            return Err(bherror::Error::root(CompactJweError::NotExactlyOneRecipient(
                self.recipients.len(),
            )));
        }

        if self.unprotected.is_some() {
            return Err(bherror::Error::root(
                CompactJweError::UnprotectedHeaderUnsupported,
            ));
        }

        if !self.aad.is_empty() {
            return Err(bherror::Error::root(CompactJweError::AadUnsupported));
        }

        if self.recipients[0].header.is_some() {
            return Err(bherror::Error::root(
                CompactJweError::RecipientHeaderUnsupported,
            ));
        }

        Ok(format!(
            "{}.{}.{}.{}.{}",
            base64_url_encode(protected.to_json_string()),
            base64_url_encode(&self.recipients[0].encrypted_key),
            base64_url_encode(&self.iv),
            base64_url_encode(&self.ciphertext),
            base64_url_encode(&self.tag),
        ))
    }

    /// Serializes the `JWE` into the general JSON form of
    /// [RFC 7516, Section 7.2][1].
    ///
    /// The recipient list dictates the shape of the output:
    ///
    /// * zero recipients — a `recipients` array holding a single empty
    ///   object, `[{}]`. The general syntax requires the array to be present
    ///   and non-empty even when no real recipient exists; this is a
    ///   structural artifact of the format, not an error.
    /// * one recipient — the [flattened syntax][2]: the recipient's
    ///   `encrypted_key` and `header` are hoisted to the top level and no
    ///   `recipients` array is emitted.
    /// * two or more recipients — a `recipients` array with one entry per
    ///   recipient.
    ///
    /// `aad`, `iv`, `ciphertext` and `tag` are independently
    /// `base64url`-encoded top-level fields regardless of recipient count.
    /// An empty ciphertext is rejected, it is a mandatory segment.
    ///
    /// [1]: https://datatracker.ietf.org/doc/html/rfc7516#section-7.2
    /// [2]: https://datatracker.ietf.org/doc/html/rfc7516#section-7.2.2
    pub fn to_general_json(&self) -> bherror::Result<GeneralJwe, CompactJweError> {
        if self.ciphertext.is_empty() {
            return Err(bherror::Error::root(CompactJweError::EmptyCiphertext));
        }

        let mut general = GeneralJwe {
            protected: self
                .protected
                .as_ref()
                .map(|headers| base64_url_encode(headers.to_json_string())),
            unprotected: self.unprotected.clone(),
            recipients: None,
            encrypted_key: None,
            header: None,
            aad: base64_url_encode(&self.aad),
            iv: base64_url_encode(&self.iv),
            ciphertext: base64_url_encode(&self.ciphertext),
            tag: base64_url_encode(&self.tag),
        };

        match self.recipients.as_slice() {
            [] => {
                // The general syntax requires the "recipients" array to be
                // present even if all of its values are the empty JSON
                // object.
                general.recipients = Some(vec![GeneralRecipient::default()]);
            }
            [sole_recipient] => {
                general.encrypted_key =
                    Some(base64_url_encode(&sole_recipient.encrypted_key));
                general.header = sole_recipient.header.clone();
            }
            recipients => {
                general.recipients = Some(
                    recipients
                        .iter()
                        .map(|recipient| GeneralRecipient {
                            header: recipient.header.clone(),
                            encrypted_key: Some(base64_url_encode(&recipient.encrypted_key)),
                        })
                        .collect(),
                );
            }
        }

        Ok(general)
    }

    /// Serializes the `JWE` into the stringified general JSON form.
    pub fn to_general_string(&self) -> bherror::Result<String, CompactJweError> {
        let general = self.to_general_json()?;
        serde_json::to_string(&general).foreign_err(|| CompactJweError::Serialization)
    }
}

/// The general JSON serialization of a `JWE`, as defined in
/// [RFC 7516, Section 7.2][1].
///
/// Construct it via [`Jwe::to_general_json`].
///
/// [1]: https://datatracker.ietf.org/doc/html/rfc7516#section-7.2
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralJwe {
    /// The `base64url`-encoded protected header JSON.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub protected: Option<String>,
    /// The shared unprotected header, as a raw JSON object.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub unprotected: Option<Headers>,
    /// The per-recipient entries; omitted in the flattened (single-recipient)
    /// syntax.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub recipients: Option<Vec<GeneralRecipient>>,
    /// The sole recipient's `base64url`-encoded encrypted key, in the
    /// flattened syntax.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub encrypted_key: Option<String>,
    /// The sole recipient's header, in the flattened syntax.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub header: Option<Headers>,
    /// The `base64url`-encoded additional authenticated data.
    pub aad: String,
    /// The `base64url`-encoded initialization vector.
    pub iv: String,
    /// The `base64url`-encoded ciphertext.
    pub ciphertext: String,
    /// The `base64url`-encoded authentication tag.
    pub tag: String,
}

/// A per-recipient entry of the general JSON serialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneralRecipient {
    /// The per-recipient unprotected header.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub header: Option<Headers>,
    /// The `base64url`-encoded encrypted content encryption key.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub encrypted_key: Option<String>,
}

/// The five `base64url`-encoded segments of a compact `JWE`, in the fixed
/// wire order.
///
/// As with [`JwsParts`][crate::JwsParts], constructing this type performs no
/// decoding of the segment contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JweParts {
    /// The `base64url`-encoded protected header.
    pub protected: String,
    /// The `base64url`-encoded encrypted content encryption key.
    pub encrypted_key: String,
    /// The `base64url`-encoded initialization vector.
    pub iv: String,
    /// The `base64url`-encoded ciphertext.
    pub ciphertext: String,
    /// The `base64url`-encoded authentication tag.
    pub tag: String,
}

impl JweParts {
    /// Renders the compact serialization of the token.
    pub fn compact(&self) -> String {
        format!(
            "{}.{}.{}.{}.{}",
            self.protected, self.encrypted_key, self.iv, self.ciphertext, self.tag
        )
    }

    /// Decodes the protected header segment into a header map.
    ///
    /// Failure is total; there is no partially-decoded header.
    pub fn protected_headers(&self) -> bherror::Result<Headers, FormatError> {
        let header_bytes = base64_url_decode(&self.protected)
            .foreign_err(|| FormatError::InvalidBase64Url)?;
        serde_json::from_slice(&header_bytes).foreign_err(|| FormatError::InvalidJson)
    }
}

impl std::str::FromStr for JweParts {
    type Err = bherror::Error<FormatError>;

    /// Splits a compact `JWE` on the `.` character; exactly five segments or
    /// the token is malformed.
    fn from_str(compact: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = compact.split('.').collect();
        if parts.len() != COMPACT_JWE_NUM_PARTS {
            return Err(bherror::Error::root(FormatError::WrongNumberOfJweParts(
                parts.len(),
            )));
        }

        Ok(Self {
            protected: parts[0].to_string(),
            encrypted_key: parts[1].to_string(),
            iv: parts[2].to_string(),
            ciphertext: parts[3].to_string(),
            tag: parts[4].to_string(),
        })
    }
}

impl std::fmt::Display for JweParts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.compact())
    }
}
