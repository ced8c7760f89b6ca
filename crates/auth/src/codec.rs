//! Wire format for bearer tokens.
//!
//! `base64url(header) "." base64url(claims) "." base64url(signature)`, where the
//! signature is computed over the first two segments exactly as they appear on
//! the wire. The algorithm is fixed by the configured [`Signer`]; the `alg`
//! value carried in a token header is checked against it, never used to pick
//! one.
//!
//! Decoding order:
//! 1. exactly three segments, each decoding as unpadded base64url (`Malformed`)
//! 2. signature over the raw segments (`BadSignature`)
//! 3. header and claims parse as JSON (`Malformed`)
//! 4. claims have the expected shape and a non-empty subject (`EmptyOrInvalidClaims`)
//!
//! Segments are decoded with unused trailing bits tolerated, and the signature
//! is verified over the raw text. A single-character change to a segment of
//! valid length is therefore always reported as `BadSignature`, while a
//! segment of impossible length is `Malformed`. A signature segment must also
//! be the canonical encoding of the bytes it decodes to.

use base64::{
    Engine as _, alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig, general_purpose::URL_SAFE_NO_PAD},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::claims::Claims;
use crate::signer::{Hs256Signer, Signer};

/// Unpadded base64url that ignores non-zero trailing bits.
const SEGMENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::RequireNone)
        .with_decode_allow_trailing_bits(true),
);

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    #[error("malformed token")]
    Malformed,

    #[error("token signature does not match")]
    BadSignature,

    #[error("token claims are empty or invalid")]
    EmptyOrInvalidClaims,
}

#[derive(Debug, Serialize, Deserialize)]
struct Header {
    alg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    typ: Option<String>,
}

/// Encodes/decodes [`Claims`] to/from the wire token format.
#[derive(Debug, Clone)]
pub struct TokenCodec<S = Hs256Signer> {
    signer: S,
}

impl<S: Signer> TokenCodec<S> {
    pub fn new(signer: S) -> Self {
        Self { signer }
    }

    pub fn encode(&self, claims: &Claims) -> String {
        let header = Header {
            alg: self.signer.algorithm().to_string(),
            typ: Some("JWT".to_string()),
        };
        // Serializing these plain structs cannot fail.
        let header_json = serde_json::to_vec(&header).unwrap_or_default();
        let claims_json = serde_json::to_vec(claims).unwrap_or_default();

        let mut token = URL_SAFE_NO_PAD.encode(header_json);
        token.push('.');
        token.push_str(&URL_SAFE_NO_PAD.encode(claims_json));

        let signature = self.signer.sign(token.as_bytes());
        token.push('.');
        token.push_str(&URL_SAFE_NO_PAD.encode(signature));
        token
    }

    pub fn decode(&self, token: &str) -> Result<Claims, DecodeError> {
        let mut parts = token.split('.');
        let (Some(header_seg), Some(claims_seg), Some(signature_seg), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(DecodeError::Malformed);
        };

        let header_json = decode_segment(header_seg)?;
        let claims_json = decode_segment(claims_seg)?;
        let signature = decode_segment(signature_seg)?;

        let signing_input = &token[..header_seg.len() + 1 + claims_seg.len()];
        let canonical = URL_SAFE_NO_PAD.encode(&signature) == signature_seg;
        if !canonical || !self.signer.verify(signing_input.as_bytes(), &signature) {
            return Err(DecodeError::BadSignature);
        }

        let header: Header =
            serde_json::from_slice(&header_json).map_err(|_| DecodeError::Malformed)?;
        if header.alg != self.signer.algorithm() {
            return Err(DecodeError::Malformed);
        }

        let value: serde_json::Value =
            serde_json::from_slice(&claims_json).map_err(|_| DecodeError::Malformed)?;
        let claims: Claims =
            serde_json::from_value(value).map_err(|_| DecodeError::EmptyOrInvalidClaims)?;
        if claims.sub.trim().is_empty() {
            return Err(DecodeError::EmptyOrInvalidClaims);
        }

        Ok(claims)
    }
}

fn decode_segment(segment: &str) -> Result<Vec<u8>, DecodeError> {
    if segment.is_empty() {
        return Err(DecodeError::Malformed);
    }
    SEGMENT.decode(segment).map_err(|_| DecodeError::Malformed)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::signer::{SigningSecret, tests::test_secret};
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    pub(crate) fn codec() -> TokenCodec {
        TokenCodec::new(Hs256Signer::new(&test_secret()).unwrap())
    }

    fn claims() -> Claims {
        Claims {
            sub: "11111111-1111-1111-1111-111111111111".into(),
            iat: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            exp: Utc.timestamp_opt(1_700_000_060, 0).unwrap(),
        }
    }

    /// Sign arbitrary header/claims JSON with the test key.
    fn forge(header: serde_json::Value, claims: serde_json::Value) -> String {
        let signer = Hs256Signer::new(&test_secret()).unwrap();
        let mut token = URL_SAFE_NO_PAD.encode(header.to_string());
        token.push('.');
        token.push_str(&URL_SAFE_NO_PAD.encode(claims.to_string()));
        let sig = signer.sign(token.as_bytes());
        format!("{token}.{}", URL_SAFE_NO_PAD.encode(sig))
    }

    fn hs256() -> serde_json::Value {
        json!({"alg": "HS256", "typ": "JWT"})
    }

    #[test]
    fn encode_then_decode_returns_the_same_claims() {
        let codec = codec();
        let token = codec.encode(&claims());
        assert_eq!(token.split('.').count(), 3);
        assert_eq!(codec.decode(&token), Ok(claims()));
    }

    #[test]
    fn header_is_fixed_hs256_jwt() {
        let token = codec().encode(&claims());
        let header = token.split('.').next().unwrap();
        let header: serde_json::Value =
            serde_json::from_slice(&URL_SAFE_NO_PAD.decode(header).unwrap()).unwrap();
        assert_eq!(header, hs256());
    }

    #[test]
    fn wrong_segment_count_is_malformed() {
        let codec = codec();
        let token = codec.encode(&claims());
        let (head, _) = token.rsplit_once('.').unwrap();

        assert_eq!(codec.decode(""), Err(DecodeError::Malformed));
        assert_eq!(codec.decode("abc"), Err(DecodeError::Malformed));
        assert_eq!(codec.decode(head), Err(DecodeError::Malformed));
        assert_eq!(codec.decode(&format!("{token}.extra")), Err(DecodeError::Malformed));
        assert_eq!(codec.decode(&format!("{token}.")), Err(DecodeError::Malformed));
    }

    #[test]
    fn non_base64_segments_are_malformed() {
        let codec = codec();
        assert_eq!(codec.decode("!!!.@@@.###"), Err(DecodeError::Malformed));
        assert_eq!(codec.decode("a.b."), Err(DecodeError::Malformed));
        assert_eq!(codec.decode("..sig"), Err(DecodeError::Malformed));

        // Padded (standard) base64 is not the wire alphabet either.
        let token = codec.encode(&claims());
        let parts: Vec<&str> = token.split('.').collect();
        let padded = format!("{}=.{}.{}", parts[0], parts[1], parts[2]);
        assert_eq!(codec.decode(&padded), Err(DecodeError::Malformed));
    }

    #[test]
    fn segments_that_do_not_decode_are_malformed_before_the_signature_is_checked() {
        let codec = codec();
        assert_eq!(codec.decode("a.b.c"), Err(DecodeError::Malformed));

        // One extra character leaves the claims segment at an impossible length.
        let token = codec.encode(&claims());
        let parts: Vec<&str> = token.split('.').collect();
        let stretched = format!("{}.{}A.{}", parts[0], parts[1], parts[2]);
        assert_eq!(codec.decode(&stretched), Err(DecodeError::Malformed));

        let long_signature = format!("{token}A");
        assert_eq!(codec.decode(&long_signature), Err(DecodeError::Malformed));
    }

    #[test]
    fn non_canonical_signature_encoding_is_rejected() {
        let codec = codec();
        let token = codec.encode(&claims());
        let (head, sig) = token.rsplit_once('.').unwrap();

        // The final character of a 32-byte signature carries two unused bits.
        let last = sig.as_bytes()[sig.len() - 1];
        let alphabet = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";
        let index = alphabet.iter().position(|&c| c == last).unwrap();
        let twin = alphabet[index ^ 1] as char;
        let tampered = format!("{head}.{}{twin}", &sig[..sig.len() - 1]);

        assert_eq!(
            URL_SAFE_NO_PAD.decode(sig).unwrap(),
            SEGMENT.decode(&tampered[head.len() + 1..]).unwrap()
        );
        assert_eq!(codec.decode(&tampered), Err(DecodeError::BadSignature));
    }

    #[test]
    fn signature_from_another_key_is_rejected() {
        let other_key = SigningSecret::from_bytes(vec![42u8; 32]).unwrap();
        let other = TokenCodec::new(Hs256Signer::new(&other_key).unwrap());
        let token = other.encode(&claims());
        assert_eq!(codec().decode(&token), Err(DecodeError::BadSignature));
    }

    #[test]
    fn alg_none_and_stripped_signatures_are_rejected() {
        let codec = codec();
        let token = codec.encode(&claims());
        let parts: Vec<&str> = token.split('.').collect();

        let none_header = URL_SAFE_NO_PAD.encode(json!({"alg": "none"}).to_string());
        let unsigned = format!("{none_header}.{}.", parts[1]);
        assert_eq!(codec.decode(&unsigned), Err(DecodeError::Malformed));

        let resigned_elsewhere = format!("{none_header}.{}.{}", parts[1], parts[2]);
        assert_eq!(codec.decode(&resigned_elsewhere), Err(DecodeError::BadSignature));
    }

    #[test]
    fn header_alg_must_match_the_configured_signer() {
        let token = forge(json!({"alg": "HS512"}), json!({"sub": "x", "iat": 1, "exp": 2}));
        assert_eq!(codec().decode(&token), Err(DecodeError::Malformed));
    }

    #[test]
    fn typ_is_optional() {
        let token = forge(json!({"alg": "HS256"}), json!({"sub": "x", "iat": 1, "exp": 2}));
        assert!(codec().decode(&token).is_ok());
    }

    #[test]
    fn signed_garbage_is_malformed() {
        let signer = Hs256Signer::new(&test_secret()).unwrap();
        let header = URL_SAFE_NO_PAD.encode(hs256().to_string());
        let body = URL_SAFE_NO_PAD.encode("not json at all");
        let input = format!("{header}.{body}");
        let sig = URL_SAFE_NO_PAD.encode(signer.sign(input.as_bytes()));
        assert_eq!(codec().decode(&format!("{input}.{sig}")), Err(DecodeError::Malformed));
    }

    #[test]
    fn empty_or_incomplete_claims_are_reported_as_such() {
        let codec = codec();
        for claims in [
            json!({}),
            json!([]),
            json!(null),
            json!({"sub": "x", "iat": 1}),
            json!({"sub": "", "iat": 1, "exp": 2}),
            json!({"sub": "   ", "iat": 1, "exp": 2}),
            json!({"sub": 7, "iat": 1, "exp": 2}),
        ] {
            let token = forge(hs256(), claims.clone());
            assert_eq!(
                codec.decode(&token),
                Err(DecodeError::EmptyOrInvalidClaims),
                "claims: {claims}"
            );
        }
    }

    #[test]
    fn every_single_character_change_in_signed_segments_is_detected() {
        let codec = codec();
        let token = codec.encode(&claims());
        let header_len = token.find('.').unwrap();

        for (i, b) in token.bytes().enumerate() {
            if i <= header_len || b == b'.' {
                continue;
            }
            let replacement = if b == b'A' { b'B' } else { b'A' };
            let mut bytes = token.clone().into_bytes();
            bytes[i] = replacement;
            let tampered = String::from_utf8(bytes).unwrap();
            assert_eq!(
                codec.decode(&tampered),
                Err(DecodeError::BadSignature),
                "position {i}"
            );
        }
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Arbitrary input never panics and never decodes without a valid signature.
            #[test]
            fn arbitrary_strings_never_decode(input in ".{0,200}") {
                prop_assert!(codec().decode(&input).is_err());
            }

            #[test]
            fn dot_shaped_garbage_is_rejected(
                a in "[A-Za-z0-9_-]{0,40}",
                b in "[A-Za-z0-9_-]{0,80}",
                c in "[A-Za-z0-9_-]{0,60}",
            ) {
                let result = codec().decode(&format!("{a}.{b}.{c}"));
                prop_assert!(matches!(
                    result,
                    Err(DecodeError::Malformed) | Err(DecodeError::BadSignature)
                ));
            }

            #[test]
            fn any_subject_round_trips(sub in "[^\\s][\\PC]{0,64}", secs in 0i64..4_000_000_000, ttl_ms in 1i64..100_000_000) {
                let iat = Utc.timestamp_opt(secs, 0).unwrap();
                let claims = Claims { sub, iat, exp: iat + chrono::Duration::milliseconds(ttl_ms) };
                let codec = codec();
                prop_assert_eq!(codec.decode(&codec.encode(&claims)), Ok(claims));
            }

            #[test]
            fn single_byte_changes_in_the_signature_are_detected(pos in 0usize..43, replacement in "[A-Za-z0-9_-]") {
                let codec = codec();
                let token = codec.encode(&claims());
                let sig_start = token.rfind('.').unwrap() + 1;
                let idx = sig_start + pos;
                let replacement = replacement.as_bytes()[0];
                prop_assume!(token.as_bytes()[idx] != replacement);

                let mut bytes = token.into_bytes();
                bytes[idx] = replacement;
                let tampered = String::from_utf8(bytes).unwrap();
                prop_assert_eq!(codec.decode(&tampered), Err(DecodeError::BadSignature));
            }
        }
    }
}
