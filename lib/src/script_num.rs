//! Signed integers of arbitrary size as used inside scripts.
//!
//! Numbers are encoded big-endian in two's complement using the fewest bytes that keep
//! the sign bit correct. Zero is the empty byte string.

use num_bigint::BigInt;
use num_traits::{ToPrimitive, Zero};

use crate::error::{CoinError, Result};

#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScriptNum(BigInt);

impl ScriptNum {
    pub fn new(num: BigInt) -> Self {
        Self(num)
    }

    pub fn num(&self) -> &BigInt {
        &self.0
    }

    /// Canonical encoding
    pub fn to_bytes(&self) -> Vec<u8> {
        if self.0.is_zero() {
            return Vec::new();
        }
        // minimal two's complement: one extra 0x00 or 0xff only when the sign bit needs it
        self.0.to_signed_bytes_be()
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(BigInt::from_signed_bytes_be(bytes))
    }

    /// Decodes `bytes` and rejects anything that does not re-encode to the same bytes
    pub fn from_canonical_bytes(bytes: &[u8]) -> Result<Self> {
        let num = Self::from_bytes(bytes);
        if num.to_bytes() != bytes {
            return Err(CoinError::NonMinimalEncoding("script number"));
        }
        Ok(num)
    }

    pub fn to_u32(&self) -> Option<u32> {
        self.0.to_u32()
    }

    pub fn to_i64(&self) -> Option<i64> {
        self.0.to_i64()
    }
}

impl From<i64> for ScriptNum {
    fn from(n: i64) -> Self {
        Self(BigInt::from(n))
    }
}

impl std::str::FromStr for ScriptNum {
    type Err = CoinError;

    fn from_str(s: &str) -> Result<Self> {
        s.parse::<BigInt>()
            .map(Self)
            .map_err(|_| CoinError::InvalidScript(format!("invalid number {s:?}")))
    }
}

impl std::fmt::Display for ScriptNum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex_of(n: i64) -> String {
        hex::encode(ScriptNum::from(n).to_bytes())
    }

    #[test]
    fn known_encodings() {
        assert_eq!(hex_of(0), "");
        assert_eq!(hex_of(1), "01");
        assert_eq!(hex_of(127), "7f");
        assert_eq!(hex_of(128), "0080");
        assert_eq!(hex_of(255), "00ff");
        assert_eq!(hex_of(256), "0100");
        assert_eq!(hex_of(-1), "ff");
        assert_eq!(hex_of(-127), "81");
        assert_eq!(hex_of(-128), "80");
        assert_eq!(hex_of(-129), "ff7f");
        assert_eq!(hex_of(-256), "ff00");
        assert_eq!(hex_of(12_960), "32a0");
    }

    #[test]
    fn decodes_sign_bit() {
        assert_eq!(ScriptNum::from_bytes(&[]), ScriptNum::from(0i64));
        assert_eq!(ScriptNum::from_bytes(&[0xff]), ScriptNum::from(-1i64));
        assert_eq!(ScriptNum::from_bytes(&[0x00, 0x80]), ScriptNum::from(128i64));
        assert_eq!(ScriptNum::from_bytes(&[0x80]), ScriptNum::from(-128i64));
    }

    #[test]
    fn round_trips_over_wide_range() {
        let mut n: i64 = -70_000;
        while n <= 70_000 {
            let bytes = ScriptNum::from(n).to_bytes();
            assert_eq!(ScriptNum::from_bytes(&bytes), ScriptNum::from(n), "n = {n}");
            n += 7;
        }
        for n in [i64::MIN, i64::MIN + 1, i64::MAX, i64::MAX - 1, 1 << 40, -(1 << 40)] {
            let bytes = ScriptNum::from(n).to_bytes();
            assert_eq!(ScriptNum::from_bytes(&bytes).to_i64(), Some(n));
        }
    }

    #[test]
    fn encoding_has_no_superfluous_leading_byte() {
        for n in -100_000i64..100_000 {
            let bytes = ScriptNum::from(n).to_bytes();
            if bytes.len() > 1 {
                let redundant = (bytes[0] == 0x00 && bytes[1] & 0x80 == 0)
                    || (bytes[0] == 0xff && bytes[1] & 0x80 != 0);
                assert!(!redundant, "n = {n} encodes as {}", hex::encode(&bytes));
            }
        }
    }

    #[test]
    fn canonical_decoding_rejects_padding() {
        assert!(ScriptNum::from_canonical_bytes(&[0x00, 0x01]).is_err());
        assert!(ScriptNum::from_canonical_bytes(&[0xff, 0xff]).is_err());
        assert!(ScriptNum::from_canonical_bytes(&[0x00]).is_err());
        assert_eq!(
            ScriptNum::from_canonical_bytes(&[0x00, 0x80]).unwrap(),
            ScriptNum::from(128i64)
        );
    }

    #[test]
    fn parses_decimal_strings() {
        let n: ScriptNum = "-123456789012345678901234567890".parse().unwrap();
        assert_eq!(n.to_string(), "-123456789012345678901234567890");
        assert_eq!(ScriptNum::from_bytes(&n.to_bytes()), n);
        assert!("12a".parse::<ScriptNum>().is_err());
    }
}
