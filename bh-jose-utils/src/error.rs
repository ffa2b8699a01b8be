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

/// Error in the compact serialization format of a token.
///
/// These are the malformed-input errors: every variant means the input cannot
/// be a valid compact token, not that some optional piece is missing.
#[derive(strum_macros::Display, Debug, PartialEq, Eq, Clone)]
pub enum FormatError {
    /// A compact `JWS` must have exactly three `.`-separated parts.
    #[strum(to_string = "compact JWS must have exactly three parts, but has {0}")]
    WrongNumberOfJwsParts(usize),

    /// A compact `JWE` must have exactly five `.`-separated parts.
    #[strum(to_string = "compact JWE must have exactly five parts, but has {0}")]
    WrongNumberOfJweParts(usize),

    /// A part is not valid unpadded `base64url`.
    #[strum(to_string = "invalid base64url encoding")]
    InvalidBase64Url,

    /// Decoded bytes are not the expected JSON value.
    #[strum(to_string = "invalid JSON content")]
    InvalidJson,

    /// A value could not be serialized into JSON bytes.
    #[strum(to_string = "unable to serialize value into JSON")]
    JsonSerialization,

    /// The payload could not be compressed with raw `DEFLATE`.
    #[strum(to_string = "unable to compress the payload")]
    PayloadCompression,

    /// A payload marked with `"zip": "DEF"` could not be decompressed.
    #[strum(to_string = "unable to decompress the payload")]
    PayloadDecompression,
}

impl bherror::BhError for FormatError {}

/// Error when serializing a [`Jwe`][crate::Jwe] structure.
///
/// The compact form structurally cannot represent a shared unprotected
/// header, AAD, multiple recipients or a per-recipient header, so each of
/// those gets its own rejection variant instead of being silently dropped.
#[derive(strum_macros::Display, Debug, PartialEq, Eq, Clone)]
pub enum CompactJweError {
    /// Compact serialization requires a protected header.
    #[strum(to_string = "unable to compact serialize: no protected header found")]
    MissingProtectedHeader,

    /// Compact serialization supports only a single recipient.
    #[strum(to_string = "unable to compact serialize: JWE must have exactly one recipient, but has {0}")]
    NotExactlyOneRecipient(usize),

    /// Compact serialization cannot carry a shared unprotected header.
    #[strum(to_string = "unable to compact serialize: shared unprotected header is not supported")]
    UnprotectedHeaderUnsupported,

    /// Compact serialization cannot carry additional authenticated data.
    #[strum(to_string = "unable to compact serialize: AAD is not supported")]
    AadUnsupported,

    /// Compact serialization cannot carry a per-recipient header.
    #[strum(to_string = "unable to compact serialize: per-recipient unprotected header is not supported")]
    RecipientHeaderUnsupported,

    /// The ciphertext is a mandatory segment of every `JWE` serialization.
    #[strum(to_string = "ciphertext cannot be empty")]
    EmptyCiphertext,

    /// The `JWE` could not be serialized into JSON.
    #[strum(to_string = "unable to serialize JWE into JSON")]
    Serialization,
}

impl bherror::BhError for CompactJweError {}
