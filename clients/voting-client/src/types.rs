use std::fmt;

use serde::{Deserialize, Serialize};

use crate::address::Address;

/// Election phase as reported by the voting contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VotingStatus {
    #[default]
    NotStarted,
    InProgress,
    Ended,
}

impl TryFrom<u8> for VotingStatus {
    type Error = u8;

    fn try_from(raw: u8) -> Result<Self, u8> {
        match raw {
            0 => Ok(VotingStatus::NotStarted),
            1 => Ok(VotingStatus::InProgress),
            2 => Ok(VotingStatus::Ended),
            other => Err(other),
        }
    }
}

impl From<VotingStatus> for u8 {
    fn from(s: VotingStatus) -> u8 {
        match s {
            VotingStatus::NotStarted => 0,
            VotingStatus::InProgress => 1,
            VotingStatus::Ended => 2,
        }
    }
}

impl VotingStatus {
    pub fn headline(&self) -> &'static str {
        match self {
            VotingStatus::NotStarted => "Voting Not Started",
            VotingStatus::InProgress => "Voting In Progress",
            VotingStatus::Ended => "Voting Ended",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Gender {
    #[default]
    NotSpecified,
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn code(&self) -> u8 {
        match self {
            Gender::NotSpecified => 0,
            Gender::Male => 1,
            Gender::Female => 2,
            Gender::Other => 3,
        }
    }

    pub fn from_code(code: u8) -> Option<Gender> {
        match code {
            0 => Some(Gender::NotSpecified),
            1 => Some(Gender::Male),
            2 => Some(Gender::Female),
            3 => Some(Gender::Other),
            _ => None,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Gender::NotSpecified => "NOT_SPECIFIED",
            Gender::Male => "MALE",
            Gender::Female => "FEMALE",
            Gender::Other => "OTHER",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "0" | "not_specified" | "unspecified" => Ok(Gender::NotSpecified),
            "1" | "male" => Ok(Gender::Male),
            "2" | "female" => Ok(Gender::Female),
            "3" | "other" => Ok(Gender::Other),
            _ => Err(format!("unknown gender `{s}`")),
        }
    }
}

/// Voting window in unix seconds. `start == 0` means no period was set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: u64,
    pub end: u64,
}

impl TimeWindow {
    pub fn is_scheduled(&self) -> bool {
        self.start > 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub candidate_id: u64,
    pub name: String,
    pub party: String,
    pub age: u32,
    pub gender: Gender,
    pub candidate_address: Address,
    pub votes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoterRecord {
    pub voter_id: u64,
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub voter_address: Address,
    /// 0 until the voter has cast a vote.
    pub vote_candidate_id: u64,
}
