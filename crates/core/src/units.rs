//! Unit conversion between MIST, SUI and fiat.
//!
//! Amounts quoted by the network are integers in the smallest indivisible
//! unit (MIST). They can exceed 2^53, so they are kept as `u128` and divided
//! with integer arithmetic. Floating point only appears in the final rendered
//! values, which are produced by parsing an exact decimal string.

use crate::error::{Error, Result};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::num::NonZeroU128;
use std::str::FromStr;

/// Number of MIST in one SUI.
pub const MIST_PER_SUI: u64 = 1_000_000_000;

/// Fractional digits emitted for divisors whose quotient does not terminate.
const MAX_FRACTION_DIGITS: usize = 36;

/// An amount in the network's smallest accounting unit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Mist(u128);

impl Mist {
    pub const ZERO: Mist = Mist(0);

    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u128 {
        self.0
    }

    /// Exact sum; `None` if the result does not fit in 128 bits.
    pub fn checked_add(self, other: Mist) -> Option<Mist> {
        self.0.checked_add(other.0).map(Mist)
    }

    /// Exact product with a unit count; `None` on overflow.
    pub fn checked_mul(self, factor: u128) -> Option<Mist> {
        self.0.checked_mul(factor).map(Mist)
    }
}

impl From<u64> for Mist {
    fn from(value: u64) -> Self {
        Self(u128::from(value))
    }
}

impl From<u128> for Mist {
    fn from(value: u128) -> Self {
        Self(value)
    }
}

impl fmt::Display for Mist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Mist {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidAmount(format!(
                "not an unsigned integer: {s:?}"
            )));
        }
        trimmed
            .parse::<u128>()
            .map(Mist)
            .map_err(|e| Error::AmountOverflow(format!("{s:?}: {e}")))
    }
}

impl Serialize for Mist {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Mist {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct MistVisitor;

        impl Visitor<'_> for MistVisitor {
            type Value = Mist;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an unsigned integer or a decimal string")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Mist, E> {
                Ok(Mist::from(v))
            }

            fn visit_u128<E: de::Error>(self, v: u128) -> std::result::Result<Mist, E> {
                Ok(Mist(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Mist, E> {
                u64::try_from(v)
                    .map(Mist::from)
                    .map_err(|_| E::custom("amount must not be negative"))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Mist, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(MistVisitor)
    }
}

/// Ratio between the smallest unit and the human-denominated unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Denomination {
    units_per_native: NonZeroU128,
}

impl Denomination {
    /// Create a denomination; zero units per native unit is rejected.
    pub fn new(units_per_native: u128) -> Result<Self> {
        NonZeroU128::new(units_per_native)
            .map(|units_per_native| Self { units_per_native })
            .ok_or_else(|| {
                Error::InvalidDenomination("units per native unit must be non-zero".to_string())
            })
    }

    /// The SUI denomination (10^9 MIST per SUI).
    pub fn sui() -> Self {
        Self {
            units_per_native: NonZeroU128::new(u128::from(MIST_PER_SUI))
                .unwrap_or(NonZeroU128::MIN),
        }
    }

    pub fn units_per_native(&self) -> u128 {
        self.units_per_native.get()
    }

    /// Convert a smallest-unit amount into the native unit.
    pub fn to_native(&self, amount: Mist) -> NativeAmount {
        let divisor = self.units_per_native.get();
        NativeAmount {
            whole: amount.0 / divisor,
            remainder: amount.0 % divisor,
            units_per_native: self.units_per_native,
        }
    }
}

impl Default for Denomination {
    fn default() -> Self {
        Self::sui()
    }
}

/// Exact quotient of a smallest-unit amount by a denomination.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NativeAmount {
    whole: u128,
    remainder: u128,
    units_per_native: NonZeroU128,
}

impl NativeAmount {
    /// Integer part of the quotient.
    pub fn whole(&self) -> u128 {
        self.whole
    }

    /// Remainder in smallest units (always below the divisor).
    pub fn remainder(&self) -> u128 {
        self.remainder
    }

    /// Nearest `f64` to the exact decimal value.
    ///
    /// The exact decimal text is parsed, so the result carries a single
    /// correctly rounded conversion.
    pub fn to_f64(&self) -> f64 {
        self.to_string()
            .parse::<f64>()
            .unwrap_or(self.whole as f64)
    }
}

impl fmt::Display for NativeAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.whole)?;
        if self.remainder == 0 {
            return Ok(());
        }

        let divisor = self.units_per_native.get();
        let mut digits = String::new();
        let mut rem = self.remainder;
        while rem != 0 && digits.len() < MAX_FRACTION_DIGITS {
            // rem < divisor, so rem * 10 only overflows for divisors near u128::MAX
            let Some(scaled) = rem.checked_mul(10) else {
                break;
            };
            let digit = scaled / divisor;
            rem = scaled % divisor;
            digits.push(char::from(b'0' + digit as u8));
        }

        let digits = digits.trim_end_matches('0');
        if digits.is_empty() {
            Ok(())
        } else {
            write!(f, ".{digits}")
        }
    }
}

/// Convert `amount` smallest units into the native unit.
pub fn to_native_unit(amount: Mist, units_per_native: u128) -> Result<NativeAmount> {
    Ok(Denomination::new(units_per_native)?.to_native(amount))
}

/// Fiat price of one native unit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExchangeRate(f64);

impl ExchangeRate {
    /// Create a rate; it must be finite and non-negative.
    pub fn new(rate: f64) -> Result<Self> {
        if !rate.is_finite() || rate < 0.0 {
            return Err(Error::InvalidExchangeRate(format!(
                "rate must be a finite non-negative number, got {rate}"
            )));
        }
        Ok(Self(rate))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

/// Convert a native-unit amount to fiat.
pub fn to_fiat(native_amount: f64, rate: ExchangeRate) -> f64 {
    native_amount * rate.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUI: u128 = MIST_PER_SUI as u128;

    #[test]
    fn whole_sui_converts_exactly() {
        let native = to_native_unit(Mist::new(3_000_000_000), SUI).unwrap();
        assert_eq!(native.to_f64(), 3.0);
        assert_eq!(native.to_string(), "3");
    }

    #[test]
    fn single_mist_keeps_full_precision() {
        let native = to_native_unit(Mist::new(1), SUI).unwrap();
        assert_eq!(native.to_string(), "0.000000001");
        assert_eq!(native.to_f64(), 0.000000001);
    }

    #[test]
    fn fractional_amount_trims_trailing_zeros() {
        let native = to_native_unit(Mist::new(600_000_000), SUI).unwrap();
        assert_eq!(native.to_string(), "0.6");
        assert_eq!(native.to_f64(), 0.6);
    }

    #[test]
    fn amounts_above_two_pow_53_keep_every_digit() {
        // 2^63 + 1 MIST cannot be represented exactly as an f64 numerator.
        let amount = Mist::new((1u128 << 63) + 1);
        let native = to_native_unit(amount, SUI).unwrap();
        assert_eq!(native.whole(), 9_223_372_036);
        assert_eq!(native.remainder(), 854_775_809);
        assert_eq!(native.to_string(), "9223372036.854775809");

        let rendered = native.to_f64();
        let expected = 9_223_372_036.854_775_809_f64;
        assert_eq!(rendered, expected);
    }

    #[test]
    fn huge_amounts_render_exactly() {
        let amount = Mist::new(u128::MAX);
        let native = to_native_unit(amount, SUI).unwrap();
        assert_eq!(
            native.to_string(),
            "340282366920938463463374607431.768211455"
        );
    }

    #[test]
    fn non_power_of_ten_divisor_uses_long_division() {
        let native = to_native_unit(Mist::new(1), 4).unwrap();
        assert_eq!(native.to_string(), "0.25");

        let third = to_native_unit(Mist::new(1), 3).unwrap();
        assert!(third.to_string().starts_with("0.333333333333"));
        assert!((third.to_f64() - 1.0 / 3.0).abs() < 1e-15);
    }

    #[test]
    fn zero_divisor_is_rejected() {
        assert!(matches!(
            to_native_unit(Mist::new(5), 0),
            Err(Error::InvalidDenomination(_))
        ));
    }

    #[test]
    fn zero_amount_is_zero() {
        let native = Denomination::sui().to_native(Mist::ZERO);
        assert_eq!(native.to_string(), "0");
        assert_eq!(native.to_f64(), 0.0);
    }

    #[test]
    fn fiat_is_plain_multiplication() {
        let rate = ExchangeRate::new(2.5).unwrap();
        assert_eq!(to_fiat(0.6, rate), 1.5);
    }

    #[test]
    fn exchange_rate_rejects_nonsense() {
        assert!(ExchangeRate::new(-1.0).is_err());
        assert!(ExchangeRate::new(f64::NAN).is_err());
        assert!(ExchangeRate::new(f64::INFINITY).is_err());
        assert!(ExchangeRate::new(0.0).is_ok());
    }

    #[test]
    fn mist_serializes_as_string() {
        let json = serde_json::to_string(&Mist::new(600_000_000)).unwrap();
        assert_eq!(json, "\"600000000\"");

        let big: Mist = serde_json::from_str("\"340282366920938463463374607431768211455\"").unwrap();
        assert_eq!(big, Mist::new(u128::MAX));

        let from_number: Mist = serde_json::from_str("42").unwrap();
        assert_eq!(from_number, Mist::new(42));
    }

    #[test]
    fn mist_rejects_signs_and_garbage() {
        assert!("-1".parse::<Mist>().is_err());
        assert!("+1".parse::<Mist>().is_err());
        assert!("1.5".parse::<Mist>().is_err());
        assert!("".parse::<Mist>().is_err());
        assert!(serde_json::from_str::<Mist>("-3").is_err());
    }

    #[test]
    fn checked_arithmetic_reports_overflow() {
        assert_eq!(Mist::new(u128::MAX).checked_add(Mist::new(1)), None);
        assert_eq!(Mist::new(u128::MAX).checked_mul(2), None);
        assert_eq!(Mist::new(7).checked_mul(6), Some(Mist::new(42)));
    }
}
