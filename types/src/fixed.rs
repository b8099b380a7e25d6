use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

// Scaling factor for fixed-point arithmetic
// Using 10000 for easy decimal representation (4 decimal places)
pub const SCALE: i64 = 10_000;
pub const HALF_SCALE: i64 = SCALE / 2;

/// Fixed-point number with 4 decimal places of precision.
///
/// Used for payout odds (2.0, 3.8, 1.98, ...) and everywhere a stake is
/// multiplied by a ratio. Keeping odds out of floating point makes payouts
/// reproducible across platforms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Decimal(i64);

impl Decimal {
    pub const ZERO: Decimal = Decimal(0);

    /// Create from an integer value.
    pub const fn from_int(value: i64) -> Self {
        Decimal(value * SCALE)
    }

    /// Create from hundredths, e.g. `from_centi(198)` is 1.98.
    ///
    /// Odds tables are quoted with two decimal places, so this is the
    /// constructor almost all literals go through.
    pub const fn from_centi(value: i64) -> Self {
        Decimal(value * (SCALE / 100))
    }

    /// Create from a fraction (numerator / denominator).
    pub fn from_frac(numerator: i64, denominator: i64) -> Self {
        if denominator == 0 {
            return Decimal(0);
        }
        Decimal::from_int(numerator).div(Decimal::from_int(denominator))
    }

    /// Get the raw scaled value.
    pub const fn raw(self) -> i64 {
        self.0
    }

    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Convert to integer with rounding (half away from zero).
    pub fn to_int_rounded(self) -> i64 {
        if self.0 >= 0 {
            (self.0 + HALF_SCALE) / SCALE
        } else {
            (self.0 - HALF_SCALE) / SCALE
        }
    }

    /// Multiply two fixed-point numbers.
    pub fn mul(self, other: Self) -> Self {
        let scaled = (self.0 as i128) * (other.0 as i128);
        Decimal((scaled / SCALE as i128) as i64)
    }

    /// Divide two fixed-point numbers.
    pub fn div(self, other: Self) -> Self {
        if other.0 == 0 {
            return Decimal(0);
        }
        let scaled = (self.0 as i128) * (SCALE as i128);
        Decimal((scaled / other.0 as i128) as i64)
    }

    /// Multiply a chip amount by this ratio, rounding to whole chips.
    ///
    /// Negative ratios clamp to zero: a payout can never take money back.
    pub fn mul_amount(self, amount: u64) -> u64 {
        if self.0 <= 0 {
            return 0;
        }
        let scaled = (self.0 as i128) * (amount as i128);
        let rounded = (scaled + HALF_SCALE as i128) / SCALE as i128;
        u64::try_from(rounded).unwrap_or(u64::MAX)
    }
}

impl std::ops::Add for Decimal {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Decimal(self.0 + other.0)
    }
}

impl std::ops::Sub for Decimal {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Decimal(self.0 - other.0)
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / SCALE;
        let mut frac = (self.0 % SCALE).unsigned_abs();
        if frac == 0 {
            return write!(f, "{whole}");
        }
        let mut digits: usize = 4;
        while frac % 10 == 0 {
            frac /= 10;
            digits -= 1;
        }
        if self.0 < 0 && whole == 0 {
            write!(f, "-0.{frac:0digits$}")
        } else {
            write!(f, "{whole}.{frac:0digits$}")
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDecimalError(String);

impl fmt::Display for ParseDecimalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid decimal: {}", self.0)
    }
}

impl std::error::Error for ParseDecimalError {}

impl FromStr for Decimal {
    type Err = ParseDecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseDecimalError(s.to_string());
        let (neg, s) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let (whole, frac) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };
        if whole.is_empty() && frac.is_empty() {
            return Err(err());
        }
        if frac.len() > 4 {
            return Err(err());
        }
        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| err())?
        };
        let frac_scaled: i64 = if frac.is_empty() {
            0
        } else {
            let digits: i64 = frac.parse().map_err(|_| err())?;
            digits * 10_i64.pow(4 - frac.len() as u32)
        };
        let raw = whole
            .checked_mul(SCALE)
            .and_then(|w| w.checked_add(frac_scaled))
            .ok_or_else(err)?;
        Ok(Decimal(if neg { -raw } else { raw }))
    }
}

// Serialized as a decimal string ("3.8") so YAML configs stay exact and
// never round-trip through floating point.
impl Serialize for Decimal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Decimal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_int() {
        assert_eq!(Decimal::from_int(5).raw(), 50000);
        assert_eq!(Decimal::from_int(-3).raw(), -30000);
    }

    #[test]
    fn test_from_centi() {
        assert_eq!(Decimal::from_centi(198).raw(), 19800); // 1.98
        assert_eq!(Decimal::from_centi(380).raw(), 38000); // 3.8
        assert_eq!(Decimal::from_centi(5000).raw(), 500000); // 50
    }

    #[test]
    fn test_from_frac() {
        assert_eq!(Decimal::from_frac(1, 2).raw(), 5000);
        assert_eq!(Decimal::from_frac(3, 4).raw(), 7500);
        assert_eq!(Decimal::from_frac(-1, 3).raw(), -3333); // Truncated
        assert_eq!(Decimal::from_frac(1, 0).raw(), 0);
    }

    #[test]
    fn test_to_int_rounded() {
        assert_eq!(Decimal(15000).to_int_rounded(), 2); // rounds up at exactly .5
        assert_eq!(Decimal(14999).to_int_rounded(), 1);
        assert_eq!(Decimal(-15000).to_int_rounded(), -2); // away from zero
        assert_eq!(Decimal(-14999).to_int_rounded(), -1);
    }

    #[test]
    fn test_mul_amount() {
        // 100 chips at 2.0 odds
        assert_eq!(Decimal::from_centi(200).mul_amount(100), 200);
        // 100 chips at 1.98
        assert_eq!(Decimal::from_centi(198).mul_amount(100), 198);
        // Rounding: 15 chips at 1.98 = 29.7 -> 30
        assert_eq!(Decimal::from_centi(198).mul_amount(15), 30);
        // 10 chips at 50x (leopard)
        assert_eq!(Decimal::from_centi(5000).mul_amount(10), 500);
        // Zero and negative ratios pay nothing
        assert_eq!(Decimal::ZERO.mul_amount(100), 0);
        assert_eq!(Decimal::from_int(-1).mul_amount(100), 0);
    }

    #[test]
    fn test_division_by_zero_returns_zero() {
        let a = Decimal::from_int(10);
        assert_eq!(a.div(Decimal::ZERO).raw(), 0);
    }

    #[test]
    fn test_display() {
        assert_eq!(Decimal::from_centi(200).to_string(), "2");
        assert_eq!(Decimal::from_centi(198).to_string(), "1.98");
        assert_eq!(Decimal::from_centi(380).to_string(), "3.8");
        assert_eq!(Decimal::from_centi(-50).to_string(), "-0.5");
    }

    #[test]
    fn test_parse() {
        assert_eq!("2".parse::<Decimal>().unwrap(), Decimal::from_int(2));
        assert_eq!("1.98".parse::<Decimal>().unwrap(), Decimal::from_centi(198));
        assert_eq!("3.8".parse::<Decimal>().unwrap(), Decimal::from_centi(380));
        assert_eq!("-0.5".parse::<Decimal>().unwrap(), Decimal::from_centi(-50));
        assert_eq!(".5".parse::<Decimal>().unwrap(), Decimal::from_frac(1, 2));
        assert!("".parse::<Decimal>().is_err());
        assert!("1.98765".parse::<Decimal>().is_err());
        assert!("abc".parse::<Decimal>().is_err());
    }

    #[test]
    fn test_display_parse_round_trip() {
        for odds in [200, 205, 380, 420, 300, 350, 198, 160, 5000, 6000] {
            let d = Decimal::from_centi(odds);
            assert_eq!(d.to_string().parse::<Decimal>().unwrap(), d);
        }
    }

    #[test]
    fn test_comparison() {
        assert!(Decimal::from_centi(205) > Decimal::from_centi(200));
        assert!(Decimal::from_centi(160) < Decimal::from_centi(198));
    }
}
