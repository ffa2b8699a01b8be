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

use std::io::{Read as _, Write as _};

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, DecodeError, Engine as _};
use flate2::{read::DeflateDecoder, write::DeflateEncoder, Compression};

/// Returns the `base64url`-encoded `String` of the given `input`, **without**
/// padding, as defined in [RFC 4648, Section 5][1].
///
/// [1]: https://datatracker.ietf.org/doc/html/rfc4648#section-5
pub fn base64_url_encode<T: AsRef<[u8]>>(input: T) -> String {
    URL_SAFE_NO_PAD.encode(input)
}

/// Decodes the given `base64url`-encoded `input` **without padding** into
/// bytes.
pub fn base64_url_decode<T: AsRef<[u8]>>(input: T) -> Result<Vec<u8>, DecodeError> {
    URL_SAFE_NO_PAD.decode(input)
}

/// Compresses the given `payload` using raw `DEFLATE` ([RFC 1951][1]), i.e.
/// without the `ZLIB` or `GZIP` framing.
///
/// The highest possible compression level is used, matching the `"zip": "DEF"`
/// convention of the surrounding protocol family.
///
/// [1]: https://datatracker.ietf.org/doc/html/rfc1951
pub fn deflate_compress(payload: impl AsRef<[u8]>) -> std::io::Result<Vec<u8>> {
    let mut e = DeflateEncoder::new(Vec::new(), Compression::best());
    e.write_all(payload.as_ref())?;
    e.finish()
}

/// Decompresses the given `payload` that was compressed using raw `DEFLATE`
/// ([RFC 1951][1]), i.e. without the `ZLIB` or `GZIP` framing.
///
/// [1]: https://datatracker.ietf.org/doc/html/rfc1951
pub fn deflate_decompress(payload: impl AsRef<[u8]>) -> std::io::Result<Vec<u8>> {
    let mut d = DeflateDecoder::new(payload.as_ref());
    let mut decompressed = Vec::new();
    d.read_to_end(&mut decompressed)?;
    Ok(decompressed)
}
