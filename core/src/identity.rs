//! Venezuelan identity documents: cédula and RIF numbers.
//!
//! Both share the `<letter>-<digits>` shape. The letter decides how many
//! digits are allowed:
//!
//! | Prefix | Meaning | Digits |
//! |--------|---------|--------|
//! | `V` | Venezuelan national | 7–10 |
//! | `E` | Foreign resident | 7–10 |
//! | `P` | Passport | 7–10 |
//! | `J` | Legal entity | exactly 9 |
//! | `G` | Government entity | exactly 9 |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;
use thiserror::Error;

/// Leading letter of a cédula or RIF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdPrefix {
    /// Venezuelan national.
    V,
    /// Foreign resident.
    E,
    /// Passport holder.
    P,
    /// Legal entity (company).
    J,
    /// Government entity.
    G,
}

impl IdPrefix {
    /// Parse the prefix letter (case-sensitive, as the form upper-cases input).
    #[must_use]
    pub const fn from_char(letter: char) -> Option<Self> {
        match letter {
            'V' => Some(Self::V),
            'E' => Some(Self::E),
            'P' => Some(Self::P),
            'J' => Some(Self::J),
            'G' => Some(Self::G),
            _ => None,
        }
    }

    /// The prefix letter.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::V => 'V',
            Self::E => 'E',
            Self::P => 'P',
            Self::J => 'J',
            Self::G => 'G',
        }
    }

    /// `J` and `G` identify organizations rather than people.
    #[must_use]
    pub const fn is_organizational(self) -> bool {
        matches!(self, Self::J | Self::G)
    }

    /// Allowed number of trailing digits.
    #[must_use]
    pub const fn digit_count(self) -> RangeInclusive<usize> {
        if self.is_organizational() { 9..=9 } else { 7..=10 }
    }
}

impl fmt::Display for IdPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Why a tax ID string was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaxIdError {
    /// Nothing was entered.
    #[error("identifier is empty")]
    Empty,

    /// First character is not one of `V`, `E`, `P`, `J`, `G`.
    #[error("identifier must start with V, E, P, J or G")]
    UnknownPrefix,

    /// Missing `-` after the letter, or non-digits after it.
    #[error("identifier must look like {prefix}-<digits>")]
    Malformed {
        /// Prefix that was recognized.
        prefix: IdPrefix,
    },

    /// Digit count outside what the prefix allows.
    #[error("{prefix}-identifiers need {expected} digits, got {actual}")]
    WrongLength {
        /// Prefix that was recognized.
        prefix: IdPrefix,
        /// Human description of the allowed count.
        expected: &'static str,
        /// Digits actually supplied.
        actual: usize,
    },
}

/// A well-formed cédula or RIF.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaxId {
    prefix: IdPrefix,
    digits: String,
}

impl TaxId {
    /// Prefix letter.
    #[must_use]
    pub const fn prefix(&self) -> IdPrefix {
        self.prefix
    }

    /// Digits after the separator, leading zeros preserved.
    #[must_use]
    pub fn digits(&self) -> &str {
        &self.digits
    }
}

impl FromStr for TaxId {
    type Err = TaxIdError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let mut chars = raw.chars();
        let letter = chars.next().ok_or(TaxIdError::Empty)?;
        let prefix = IdPrefix::from_char(letter).ok_or(TaxIdError::UnknownPrefix)?;

        let rest = chars.as_str();
        let digits = rest
            .strip_prefix('-')
            .filter(|digits| digits.chars().all(|c| c.is_ascii_digit()))
            .ok_or(TaxIdError::Malformed { prefix })?;

        if !prefix.digit_count().contains(&digits.len()) {
            return Err(TaxIdError::WrongLength {
                prefix,
                expected: if prefix.is_organizational() {
                    "exactly 9"
                } else {
                    "7 to 10"
                },
                actual: digits.len(),
            });
        }

        Ok(Self {
            prefix,
            digits: digits.to_string(),
        })
    }
}

impl fmt::Display for TaxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.prefix, self.digits)
    }
}

/// Participant nationality, the individual subset of [`IdPrefix`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Nationality {
    /// Venezuelan national.
    #[default]
    V,
    /// Foreign resident.
    E,
    /// Passport holder.
    P,
}

impl Nationality {
    /// Column value written to the inscription table.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::V => "V",
            Self::E => "E",
            Self::P => "P",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_organizational_rif() {
        let rif: TaxId = "J-001234567".parse().unwrap();
        assert_eq!(rif.prefix(), IdPrefix::J);
        assert_eq!(rif.digits(), "001234567");
        assert_eq!(rif.to_string(), "J-001234567");
    }

    #[test]
    fn test_organizational_rif_requires_nine_digits() {
        assert_eq!(
            "G-12345678".parse::<TaxId>(),
            Err(TaxIdError::WrongLength {
                prefix: IdPrefix::G,
                expected: "exactly 9",
                actual: 8,
            })
        );
        assert!("J-0012345678".parse::<TaxId>().is_err());
    }

    #[test]
    fn test_individual_cedula_bounds() {
        assert!("V-1234567".parse::<TaxId>().is_ok());
        assert!("E-1234567890".parse::<TaxId>().is_ok());
        assert!("P-123456".parse::<TaxId>().is_err());
        assert!("V-12345678901".parse::<TaxId>().is_err());
    }

    #[test]
    fn test_malformed_inputs() {
        assert_eq!("".parse::<TaxId>(), Err(TaxIdError::Empty));
        assert_eq!("X-1234567".parse::<TaxId>(), Err(TaxIdError::UnknownPrefix));
        assert_eq!(
            "V1234567".parse::<TaxId>(),
            Err(TaxIdError::Malformed { prefix: IdPrefix::V })
        );
        assert_eq!(
            "J-00123456A".parse::<TaxId>(),
            Err(TaxIdError::Malformed { prefix: IdPrefix::J })
        );
    }

    proptest! {
        #[test]
        fn prop_organizational_accepts_only_nine(digits in "[0-9]{1,12}", org in prop::bool::ANY) {
            let letter = if org { 'J' } else { 'G' };
            let parsed = format!("{letter}-{digits}").parse::<TaxId>();
            prop_assert_eq!(parsed.is_ok(), digits.len() == 9);
        }

        #[test]
        fn prop_individual_accepts_seven_to_ten(digits in "[0-9]{1,12}", letter in prop::sample::select(vec!['V', 'E', 'P'])) {
            let parsed = format!("{letter}-{digits}").parse::<TaxId>();
            prop_assert_eq!(parsed.is_ok(), (7..=10).contains(&digits.len()));
        }
    }
}
