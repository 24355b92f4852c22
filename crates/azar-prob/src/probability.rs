use std::{cmp::Ordering, fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Errors produced by exact probability arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ProbabilityError {
    /// The denominator of a probability was zero.
    ///
    /// Raised for an empty sample space and for conditioning on an event of
    /// probability zero.
    #[display("probability is undefined: division by zero")]
    DivisionByZero,
    /// The result would fall outside `[0, 1]`.
    #[display("value is not a probability (outside [0, 1])")]
    OutOfRange,
    /// The reduced fraction does not fit in 64-bit terms.
    #[display("rational arithmetic overflowed")]
    Overflow,
}

/// An exact probability value: a fraction in `[0, 1]` kept in lowest terms.
///
/// Because the fraction is always reduced, structural equality is numeric
/// equality, so `1/2 == 2/4`.
///
/// # Examples
///
/// ```
/// use azar_prob::Probability;
///
/// let p = Probability::from_counts(2, 6).unwrap();
/// assert_eq!(p.numerator(), 1);
/// assert_eq!(p.denominator(), 3);
/// assert_eq!(p.to_string(), "1/3");
/// assert_eq!(p.complement().to_string(), "2/3");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Probability {
    numerator: u64,
    denominator: u64,
}

impl Default for Probability {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Probability {
    /// The impossible event.
    pub const ZERO: Self = Self {
        numerator: 0,
        denominator: 1,
    };

    /// The certain event.
    pub const ONE: Self = Self {
        numerator: 1,
        denominator: 1,
    };

    /// Creates a probability from a fraction, reducing it to lowest terms.
    ///
    /// # Examples
    ///
    /// ```
    /// use azar_prob::{Probability, ProbabilityError};
    ///
    /// assert_eq!(Probability::new(2498, 9998).unwrap().to_string(), "1249/4999");
    /// assert_eq!(Probability::new(1, 0), Err(ProbabilityError::DivisionByZero));
    /// assert!(Probability::new(7, 6).is_err());
    /// ```
    pub fn new(numerator: u64, denominator: u64) -> Result<Self, ProbabilityError> {
        Self::from_wide(u128::from(numerator), u128::from(denominator))
    }

    /// Creates the probability `favorable / total` from outcome counts.
    pub fn from_counts(favorable: usize, total: usize) -> Result<Self, ProbabilityError> {
        // usize is at most 64 bits on every supported target
        Self::from_wide(favorable as u128, total as u128)
    }

    fn from_wide(numerator: u128, denominator: u128) -> Result<Self, ProbabilityError> {
        if denominator == 0 {
            return Err(ProbabilityError::DivisionByZero);
        }
        if numerator > denominator {
            return Err(ProbabilityError::OutOfRange);
        }
        let divisor = gcd(numerator, denominator);
        let numerator =
            u64::try_from(numerator / divisor).map_err(|_| ProbabilityError::Overflow)?;
        let denominator =
            u64::try_from(denominator / divisor).map_err(|_| ProbabilityError::Overflow)?;
        Ok(Self {
            numerator,
            denominator,
        })
    }

    #[must_use]
    pub const fn numerator(self) -> u64 {
        self.numerator
    }

    #[must_use]
    pub const fn denominator(self) -> u64 {
        self.denominator
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.numerator == 0
    }

    #[must_use]
    pub const fn is_one(self) -> bool {
        self.numerator == self.denominator
    }

    /// Returns `1 - self`, the probability of the complementary event.
    #[must_use]
    pub const fn complement(self) -> Self {
        Self {
            numerator: self.denominator - self.numerator,
            denominator: self.denominator,
        }
    }

    /// Returns `self + rhs`, failing when the sum exceeds one.
    pub fn checked_add(self, rhs: Self) -> Result<Self, ProbabilityError> {
        let (a, b) = self.wide();
        let (c, d) = rhs.wide();
        let numerator = (a * d)
            .checked_add(c * b)
            .ok_or(ProbabilityError::Overflow)?;
        Self::from_wide(numerator, b * d)
    }

    /// Returns `self - rhs`, failing when the difference is negative.
    pub fn checked_sub(self, rhs: Self) -> Result<Self, ProbabilityError> {
        let (a, b) = self.wide();
        let (c, d) = rhs.wide();
        let (lhs, rhs) = (a * d, c * b);
        if lhs < rhs {
            return Err(ProbabilityError::OutOfRange);
        }
        Self::from_wide(lhs - rhs, b * d)
    }

    /// Returns `self * rhs`, the probability of two independent events, or of
    /// a branch followed by its conditional branch.
    pub fn checked_mul(self, rhs: Self) -> Result<Self, ProbabilityError> {
        let (a, b) = self.wide();
        let (c, d) = rhs.wide();
        Self::from_wide(a * c, b * d)
    }

    /// Returns `self / rhs`.
    ///
    /// This is the ratio used by conditional probability,
    /// `P(A|B) = P(A ∩ B) / P(B)`, so it fails with
    /// [`ProbabilityError::DivisionByZero`] when `rhs` is zero and with
    /// [`ProbabilityError::OutOfRange`] when `self > rhs`.
    pub fn checked_div(self, rhs: Self) -> Result<Self, ProbabilityError> {
        let (a, b) = self.wide();
        let (c, d) = rhs.wide();
        Self::from_wide(a * d, b * c)
    }

    /// Approximates the value as a float, for display only.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn to_f64(self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    fn wide(self) -> (u128, u128) {
        (u128::from(self.numerator), u128::from(self.denominator))
    }
}

/// Sum of item counts, [`ProbabilityError::Overflow`] if it exceeds `u64`.
pub(crate) fn count_total<I>(counts: I) -> Result<u64, ProbabilityError>
where
    I: IntoIterator<Item = u64>,
{
    counts.into_iter().try_fold(0_u64, |acc, count| {
        acc.checked_add(count).ok_or(ProbabilityError::Overflow)
    })
}

fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

impl PartialOrd for Probability {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Probability {
    fn cmp(&self, other: &Self) -> Ordering {
        let (a, b) = self.wide();
        let (c, d) = other.wide();
        (a * d).cmp(&(c * b))
    }
}

/// Formats as `n/d`; `0` and `1` are printed bare.
///
/// With a precision (`{:.4}`) the value is printed as a rounded decimal.
impl fmt::Display for Probability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(precision) = f.precision() {
            return write!(f, "{:.*}", precision, self.to_f64());
        }
        if self.denominator == 1 {
            write!(f, "{}", self.numerator)
        } else {
            write!(f, "{}/{}", self.numerator, self.denominator)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum ParseProbabilityError {
    #[display("invalid probability literal '{_0}'")]
    #[from(ignore)]
    Invalid(#[error(not(source))] String),
    #[display("invalid probability value: {_0}")]
    Value(ProbabilityError),
}

/// Parses `n/d`, a bare integer (`0` or `1`), or a finite decimal such as
/// `0.88`, which is converted exactly to `22/25`.
impl FromStr for Probability {
    type Err = ParseProbabilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseProbabilityError::Invalid(s.to_owned());
        let s = s.trim();
        if let Some((numerator, denominator)) = s.split_once('/') {
            let numerator = numerator.trim().parse::<u64>().map_err(|_| invalid())?;
            let denominator = denominator.trim().parse::<u64>().map_err(|_| invalid())?;
            return Ok(Self::new(numerator, denominator)?);
        }
        if let Some((integer, fraction)) = s.split_once('.') {
            if fraction.is_empty() || !fraction.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            let integer = if integer.is_empty() {
                0
            } else {
                integer.parse::<u128>().map_err(|_| invalid())?
            };
            let digits = u32::try_from(fraction.len()).map_err(|_| invalid())?;
            let scale = 10_u128.checked_pow(digits).ok_or_else(invalid)?;
            let fraction = fraction.parse::<u128>().map_err(|_| invalid())?;
            let numerator = integer
                .checked_mul(scale)
                .and_then(|n| n.checked_add(fraction))
                .ok_or_else(invalid)?;
            return Ok(Self::from_wide(numerator, scale)?);
        }
        let numerator = s.parse::<u64>().map_err(|_| invalid())?;
        Ok(Self::new(numerator, 1)?)
    }
}

impl Serialize for Probability {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Probability {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse()
            .map_err(|e| serde::de::Error::custom(format!("{e}: {s}")))
    }
}
