//! Backup plan data model
//!
//! One [`Entry`] describes a directory, what to do with it during backups
//! ([`Instruction`]) and who asked for it.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Backup behaviour for a directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Instruction {
    #[default]
    Backup,
    NoBackup,
    TempBackup,
}

impl Instruction {
    /// All instructions, in display order
    pub const ALL: [Instruction; 3] = [
        Instruction::Backup,
        Instruction::NoBackup,
        Instruction::TempBackup,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Instruction::Backup => "backup",
            Instruction::NoBackup => "nobackup",
            Instruction::TempBackup => "tempbackup",
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Instruction {
    type Err = Error;

    /// Surrounding whitespace is ignored, case is not.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "backup" => Ok(Instruction::Backup),
            "nobackup" => Ok(Instruction::NoBackup),
            "tempbackup" => Ok(Instruction::TempBackup),
            other => Err(Error::InvalidEntry(format!(
                "unknown instruction {:?} (expected backup, nobackup or tempbackup)",
                other
            ))),
        }
    }
}

impl TryFrom<String> for Instruction {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Instruction> for String {
    fn from(instruction: Instruction) -> Self {
        instruction.as_str().to_string()
    }
}

/// One row of the backup plan
///
/// Field order matches the CSV column order, so serde writes `id` first.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Entry {
    pub id: u16,
    pub reporting_name: String,
    pub reporting_root: String,
    pub directory: String,
    pub instruction: Instruction,
    #[serde(rename = "match")]
    pub matches: String,
    pub ignore: String,
    pub requestor: String,
    pub faculty: String,
}

/// Pick the ID for a new entry: the first gap in `used`, else one past the
/// densely packed range.
pub fn next_free_id<I>(used: I) -> Result<u16>
where
    I: IntoIterator<Item = u16>,
{
    let used: HashSet<u16> = used.into_iter().collect();

    (0..=u16::MAX)
        .find(|id| !used.contains(id))
        .ok_or(Error::IdSpaceExhausted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_free_id_appends_after_dense_range() {
        assert_eq!(next_free_id([0, 1, 2]).unwrap(), 3);
    }

    #[test]
    fn test_next_free_id_fills_gaps() {
        assert_eq!(next_free_id([0, 2, 3]).unwrap(), 1);
        assert_eq!(next_free_id([1, 5, 6]).unwrap(), 0);
        assert_eq!(next_free_id([3, 0, 1, 2, 7]).unwrap(), 4);
    }

    #[test]
    fn test_next_free_id_empty_set() {
        assert_eq!(next_free_id(Vec::new()).unwrap(), 0);
    }

    #[test]
    fn test_next_free_id_exhausted() {
        let result = next_free_id(0..=u16::MAX);
        assert!(matches!(result, Err(Error::IdSpaceExhausted)));
    }

    #[test]
    fn test_instruction_parse() {
        assert_eq!("backup".parse::<Instruction>().unwrap(), Instruction::Backup);
        assert_eq!(" nobackup ".parse::<Instruction>().unwrap(), Instruction::NoBackup);
        assert_eq!("tempbackup".parse::<Instruction>().unwrap(), Instruction::TempBackup);
        assert!("Backup".parse::<Instruction>().is_err());
        assert!("invalid".parse::<Instruction>().is_err());
        assert!("".parse::<Instruction>().is_err());
    }

    #[test]
    fn test_instruction_display_round_trips() {
        for instruction in Instruction::ALL {
            assert_eq!(instruction.to_string().parse::<Instruction>().unwrap(), instruction);
        }
    }
}
