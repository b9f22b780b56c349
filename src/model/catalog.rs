// SPDX-FileCopyrightText: 2026 Piste Contributors
// SPDX-License-Identifier: MIT

//! Closed classification sets for tags.
//!
//! All three sets are fixed: values outside them are rejected at construction
//! and coerced to absent when they appear in persisted payloads.

use std::fmt;
use std::str::FromStr;

use smol_str::SmolStr;

/// Which fencer a tag refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "L",
            Self::Right => "R",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = ParseSideError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "L" => Ok(Self::Left),
            "R" => Ok(Self::Right),
            _ => Err(ParseSideError {
                value: s.to_owned(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSideError {
    pub value: String,
}

impl fmt::Display for ParseSideError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "side must be \"L\" or \"R\", got {:?}", self.value)
    }
}

impl std::error::Error for ParseSideError {}

/// How a touch was lost, when the coach classifies it as a mistake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MistakeType {
    Tactical,
    Execution,
}

impl MistakeType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tactical => "tactical",
            Self::Execution => "execution",
        }
    }
}

impl fmt::Display for MistakeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MistakeType {
    type Err = ParseMistakeTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tactical" => Ok(Self::Tactical),
            "execution" => Ok(Self::Execution),
            _ => Err(ParseMistakeTypeError {
                value: s.to_owned(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseMistakeTypeError {
    pub value: String,
}

impl fmt::Display for ParseMistakeTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "mistake must be \"tactical\" or \"execution\", got {:?}",
            self.value
        )
    }
}

impl std::error::Error for ParseMistakeTypeError {}

/// The closed catalogue of action codes, alphabetical.
///
/// These are the shorthand codes the tag-entry picker offers; the order here
/// is the order the picker lists them in.
pub const ACTION_CODES: &[&str] = &[
    "0", "A,R", "A,R-P", "A-A", "A-AP", "A-Cc", "A-Csh", "A-D", "A-L", "A-P", "AN-P", "AN-R",
    "AP-A", "AP-F", "AP-P", "AR,R", "bl", "Cc-A", "Cc-AP", "Cc-CT", "CCR-R", "CR,R", "CR-P",
    "CR-R", "Csh-A", "CT-R", "L-A", "R,R", "R-P", "R-R", "rc", "yc",
];

/// One code out of [`ACTION_CODES`].
///
/// The codes are opaque fencing notation, so this is a catalogue-checked
/// newtype rather than an enum: construction rejects anything outside the
/// list, which is the whole contract.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionCode(SmolStr);

impl ActionCode {
    pub fn new(code: &str) -> Result<Self, ActionCodeError> {
        if ACTION_CODES.contains(&code) {
            Ok(Self(SmolStr::new(code)))
        } else {
            Err(ActionCodeError {
                value: code.to_owned(),
            })
        }
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Every legal code, in catalogue order.
    pub fn all() -> impl Iterator<Item = ActionCode> {
        ACTION_CODES.iter().map(|code| Self(SmolStr::new(*code)))
    }
}

impl fmt::Display for ActionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionCode {
    type Err = ActionCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionCodeError {
    pub value: String,
}

impl fmt::Display for ActionCodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown action code {:?}", self.value)
    }
}

impl std::error::Error for ActionCodeError {}

#[cfg(test)]
mod tests {
    use super::{ActionCode, MistakeType, Side, ACTION_CODES};

    #[test]
    fn action_code_accepts_catalogue_members() {
        for code in ACTION_CODES {
            let parsed = ActionCode::new(code).unwrap();
            assert_eq!(parsed.as_str(), *code);
        }
    }

    #[test]
    fn action_code_rejects_unknown_values() {
        assert!(ActionCode::new("").is_err());
        assert!(ActionCode::new("Z-Z").is_err());
        assert!(ActionCode::new("a,r").is_err());
    }

    #[test]
    fn catalogue_is_sorted_and_unique() {
        let mut sorted = ACTION_CODES.to_vec();
        sorted.sort_by_key(|code| code.to_ascii_lowercase());
        assert_eq!(sorted, ACTION_CODES);
        sorted.dedup();
        assert_eq!(sorted.len(), ACTION_CODES.len());
    }

    #[test]
    fn side_round_trips_through_str() {
        assert_eq!("L".parse::<Side>().unwrap().as_str(), "L");
        assert_eq!("R".parse::<Side>().unwrap().as_str(), "R");
        assert!("left".parse::<Side>().is_err());
    }

    #[test]
    fn mistake_round_trips_through_str() {
        assert_eq!(
            "tactical".parse::<MistakeType>().unwrap(),
            MistakeType::Tactical
        );
        assert_eq!(
            "execution".parse::<MistakeType>().unwrap(),
            MistakeType::Execution
        );
        assert!("other".parse::<MistakeType>().is_err());
    }
}
