//! Keyword types of the schema document.
//!
//! Every keyword is matched case-insensitively, so `int`, `Int` and `INT`
//! all name [`LogicalType::Int`]. Serialization always writes the
//! upper-case canonical keyword.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Error returned when a keyword does not name any variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct KeywordError {
    /// What kind of keyword was expected (e.g. "type", "constraint").
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

/// Implements `FromStr`, `Display` and serde for a keyword enum.
macro_rules! keyword_enum {
    ($ty:ident, $kind:literal, { $($variant:ident => $canonical:literal $(| $alias:literal)*),+ $(,)? }) => {
        impl $ty {
            /// Canonical upper-case keyword.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $canonical,)+
                }
            }
        }

        impl FromStr for $ty {
            type Err = KeywordError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_uppercase().as_str() {
                    $($canonical $(| $alias)* => Ok(Self::$variant),)+
                    _ => Err(KeywordError {
                        kind: $kind,
                        value: s.to_string(),
                    }),
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $ty {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

/// Logical column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalType {
    Int,
    Real,
    String,
    Date,
    Timestamp,
}

keyword_enum!(LogicalType, "type", {
    Int => "INT",
    Real => "REAL",
    String => "STRING",
    Date => "DATE",
    Timestamp => "TIMESTAMP",
});

impl LogicalType {
    /// Whether values of this type can act as a key (PK/FK family).
    pub fn is_key_type(&self) -> bool {
        matches!(self, Self::Int | Self::String)
    }
}

/// Key constraint carried by a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Constraint {
    /// Single-column primary key.
    Pk,
    /// Foreign key; values repeat according to skew.
    Fk,
    /// Foreign key whose values never repeat.
    FkUnique,
    /// Member of a composite primary key.
    CompPk,
    /// Member of a composite foreign key.
    CompFk,
}

keyword_enum!(Constraint, "constraint", {
    Pk => "PK",
    Fk => "FK",
    FkUnique => "FK_UNIQUE",
    CompPk => "COMP_PK",
    CompFk => "COMP_FK",
});

impl Constraint {
    /// FK, FK_UNIQUE and COMP_FK always reference another table.
    pub fn requires_reference(&self) -> bool {
        matches!(self, Self::Fk | Self::FkUnique | Self::CompFk)
    }

    /// Whether the constraint is part of a composite key.
    pub fn is_composite(&self) -> bool {
        matches!(self, Self::CompPk | Self::CompFk)
    }
}

/// Qualitative skew knob, mapped to a Zipfian exponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Skewness {
    #[default]
    No,
    Low,
    Medium,
    High,
    Extreme,
}

keyword_enum!(Skewness, "skewness", {
    No => "NO",
    Low => "LOW",
    Medium => "MEDIUM",
    High => "HIGH",
    Extreme => "EXTREME",
});

impl Skewness {
    /// Zipfian exponent for this skew level; `None` means uniform.
    pub fn exponent(&self) -> Option<f64> {
        match self {
            Self::No => None,
            Self::Low => Some(0.5),
            Self::Medium => Some(0.9),
            Self::High => Some(1.2),
            Self::Extreme => Some(1.5),
        }
    }
}

/// Pseudo-random bit generator algorithm selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Algorithm {
    /// Platform default engine (minimal standard LCG, multiplier 16807).
    Default,
    /// Minimal standard LCG, multiplier 16807.
    MinstdRand0,
    /// Minimal standard LCG, multiplier 48271.
    MinstdRand,
    /// 32-bit Mersenne Twister.
    Mt19937,
    /// 64-bit Mersenne Twister.
    #[default]
    Mt19937_64,
    /// 24-bit subtract-with-carry (lagged Fibonacci) engine.
    Ranlux24Base,
    /// 48-bit subtract-with-carry (lagged Fibonacci) engine.
    Ranlux48Base,
    /// The `rand` crate's `StdRng`.
    StdRng,
}

keyword_enum!(Algorithm, "algorithm", {
    Default => "DEFAULT",
    MinstdRand0 => "MINSTD_RAND0",
    MinstdRand => "MINSTD_RAND" | "MINSTD_RAND1",
    Mt19937 => "MT19937",
    Mt19937_64 => "MT19937_64",
    Ranlux24Base => "RANLUX24_BASE" | "RANLUX24",
    Ranlux48Base => "RANLUX48_BASE" | "RANLUX48",
    StdRng => "STD_RNG",
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_are_case_insensitive() {
        assert_eq!("int".parse::<LogicalType>().unwrap(), LogicalType::Int);
        assert_eq!("Timestamp".parse::<LogicalType>().unwrap(), LogicalType::Timestamp);
        assert_eq!("fk_unique".parse::<Constraint>().unwrap(), Constraint::FkUnique);
        assert_eq!("extreme".parse::<Skewness>().unwrap(), Skewness::Extreme);
    }

    #[test]
    fn test_algorithm_aliases() {
        assert_eq!("MINSTD_RAND1".parse::<Algorithm>().unwrap(), Algorithm::MinstdRand);
        assert_eq!("ranlux24".parse::<Algorithm>().unwrap(), Algorithm::Ranlux24Base);
        assert_eq!(Algorithm::default(), Algorithm::Mt19937_64);
        assert_eq!(Algorithm::Ranlux48Base.to_string(), "RANLUX48_BASE");
    }

    #[test]
    fn test_unknown_keyword() {
        let err = "BLOB".parse::<LogicalType>().unwrap_err();
        assert_eq!(err.kind, "type");
        assert_eq!(err.to_string(), "unknown type 'BLOB'");
    }

    #[test]
    fn test_skew_exponents() {
        assert_eq!(Skewness::No.exponent(), None);
        assert_eq!(Skewness::Low.exponent(), Some(0.5));
        assert_eq!(Skewness::Medium.exponent(), Some(0.9));
        assert_eq!(Skewness::High.exponent(), Some(1.2));
        assert_eq!(Skewness::Extreme.exponent(), Some(1.5));
    }

    #[test]
    fn test_serde_roundtrip_uses_canonical_keyword() {
        let yaml = serde_yaml::to_string(&Constraint::CompFk).unwrap();
        assert_eq!(yaml.trim(), "COMP_FK");
        let parsed: Constraint = serde_yaml::from_str("comp_fk").unwrap();
        assert_eq!(parsed, Constraint::CompFk);
    }
}
