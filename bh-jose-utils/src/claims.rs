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

//! The registered JWT claims of [RFC 7519, Section 4.1][1].
//!
//! The codec treats the payload as opaque bytes; these types are offered for
//! callers that want a typed view over the standard claims of a decoded
//! payload.
//!
//! [1]: https://datatracker.ietf.org/doc/html/rfc7519#section-4.1

use serde::{Deserialize, Serialize};

/// Date and time represented as the number of seconds since the epoch,
/// ignoring leap seconds, as defined in [RFC 7519, Section 2][1].
///
/// Non-integer values may appear in the serialized format; they are truncated
/// to whole seconds on deserialization, since sub-second accuracy has no use
/// in token lifetimes.
///
/// [1]: https://datatracker.ietf.org/doc/html/rfc7519#section-2
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NumericDate(pub i64);

impl NumericDate {
    /// The number of whole seconds since the epoch.
    pub fn as_secs(&self) -> i64 {
        self.0
    }

    /// Returns `true` if this date lies strictly after the given moment,
    /// i.e. a token expiring at `self` is still valid at `now`.
    pub fn is_after(&self, now: NumericDate) -> bool {
        self.0 > now.0
    }
}

impl<'de> Deserialize<'de> for NumericDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let seconds = f64::deserialize(deserializer)?;
        Ok(Self(seconds as i64))
    }
}

impl From<i64> for NumericDate {
    fn from(seconds: i64) -> Self {
        Self(seconds)
    }
}

/// The recipients a JWT is intended for: the `aud` claim is either a single
/// string or an array of strings on the wire, as defined in
/// [RFC 7519, Section 4.1.3][1].
///
/// [1]: https://datatracker.ietf.org/doc/html/rfc7519#section-4.1.3
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    /// The JWT is intended for a single recipient.
    Single(String),
    /// The JWT is intended for multiple recipients.
    Many(Vec<String>),
}

impl Audience {
    /// Checks whether the given recipient is included in the audience.
    pub fn contains(&self, audience: &str) -> bool {
        match self {
            Self::Single(single) => single == audience,
            Self::Many(many) => many.iter().any(|member| member == audience),
        }
    }
}

/// The registered public claims of [RFC 7519, Section 4.1][1].
///
/// Every claim is optional and omitted from the JSON representation when
/// absent; the wire format makes no distinction between an absent claim and a
/// `null` one, so neither does this type.
///
/// [1]: https://datatracker.ietf.org/doc/html/rfc7519#section-4.1
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegisteredClaims {
    /// The `iss` claim; the principal that issued the JWT.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    /// The `sub` claim; the principal that is the subject of the JWT.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// The `aud` claim; the recipients the JWT is intended for.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aud: Option<Audience>,

    /// The `exp` claim; the expiration time after which the JWT must be
    /// rejected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<NumericDate>,

    /// The `nbf` claim; the time before which the JWT must be rejected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nbf: Option<NumericDate>,

    /// The `iat` claim; the time at which the JWT was issued.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<NumericDate>,

    /// The `jti` claim; a unique identifier of the JWT.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_date_from_float() {
        let date: NumericDate = serde_json::from_str("1615406982.75").unwrap();
        assert_eq!(NumericDate(1615406982), date);
    }

    #[test]
    fn test_numeric_date_serializes_as_integer() {
        assert_eq!(
            "1615406982",
            serde_json::to_string(&NumericDate(1615406982)).unwrap()
        );
    }

    #[test]
    fn test_numeric_date_rejects_non_number() {
        assert!(serde_json::from_str::<NumericDate>("\"tomorrow\"").is_err());
    }

    #[test]
    fn test_audience_single_or_many() {
        let single: Audience = serde_json::from_str("\"account\"").unwrap();
        assert_eq!(Audience::Single("account".to_string()), single);
        assert!(single.contains("account"));
        assert!(!single.contains("other"));

        let many: Audience = serde_json::from_str(r#"["account","other"]"#).unwrap();
        assert!(many.contains("other"));
        assert!(!many.contains("nobody"));
    }

    #[test]
    fn test_registered_claims_round_trip() {
        let json = r#"{
            "iss": "https://server.example.com",
            "aud": ["account"],
            "exp": 1615406982,
            "iat": 1615406922,
            "jti": "0f64bca9-b588-41aa-ad41-2afd368df51d"
        }"#;

        let claims: RegisteredClaims = serde_json::from_str(json).unwrap();
        assert_eq!(Some("https://server.example.com".to_string()), claims.iss);
        assert_eq!(None, claims.sub);
        assert!(claims.exp.unwrap().is_after(claims.iat.unwrap()));

        // absent claims stay absent on the wire
        let serialized = serde_json::to_string(&claims).unwrap();
        assert!(!serialized.contains("sub"));
        assert!(!serialized.contains("nbf"));
    }
}
