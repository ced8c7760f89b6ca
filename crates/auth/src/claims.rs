use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Token claims (the signed payload of a bearer token).
///
/// Created once per login by the issuer and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the principal id, string-encoded.
    pub sub: String,

    /// Issued-at timestamp.
    #[serde(with = "numeric_date")]
    pub iat: DateTime<Utc>,

    /// Expiration timestamp.
    #[serde(with = "numeric_date")]
    pub exp: DateTime<Utc>,
}

impl Claims {
    pub fn subject(&self) -> &str {
        &self.sub
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.iat
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.exp
    }

    /// `true` iff the token is still live at `now` (expiry is exclusive).
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        self.exp > now
    }
}

/// RFC 7519 NumericDate: seconds since the epoch.
///
/// Whole seconds are written as integers so standard JWT libraries read them
/// as-is. Sub-second instants are written as fractional seconds with
/// millisecond precision.
pub(crate) mod numeric_date {
    use chrono::{DateTime, Utc};
    use serde::{Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        let millis = value.timestamp_millis();
        if millis % 1000 == 0 {
            serializer.serialize_i64(millis / 1000)
        } else {
            serializer.serialize_f64(millis as f64 / 1000.0)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        deserializer.deserialize_any(NumericDateVisitor)
    }

    struct NumericDateVisitor;

    impl de::Visitor<'_> for NumericDateVisitor {
        type Value = DateTime<Utc>;

        fn expecting(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
            f.write_str("a numeric timestamp in seconds since the epoch")
        }

        fn visit_i64<E: de::Error>(self, secs: i64) -> Result<Self::Value, E> {
            DateTime::from_timestamp(secs, 0).ok_or_else(|| E::custom("timestamp out of range"))
        }

        fn visit_u64<E: de::Error>(self, secs: u64) -> Result<Self::Value, E> {
            let secs = i64::try_from(secs).map_err(|_| E::custom("timestamp out of range"))?;
            self.visit_i64(secs)
        }

        fn visit_f64<E: de::Error>(self, secs: f64) -> Result<Self::Value, E> {
            if !secs.is_finite() {
                return Err(E::custom("timestamp is not finite"));
            }
            let millis = (secs * 1000.0).round();
            if millis.abs() > i64::MAX as f64 {
                return Err(E::custom("timestamp out of range"));
            }
            DateTime::from_timestamp_millis(millis as i64)
                .ok_or_else(|| E::custom("timestamp out of range"))
        }
    }
}
