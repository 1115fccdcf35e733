//! Question domain value object

use super::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A fixed category of question set (Value Object)
///
/// Every question belongs to exactly one domain and never moves between
/// them. The serialized form is the stored collection name
/// (`History`, `Social_Science`, `Computer_Security`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Domain {
    #[serde(rename = "History")]
    History,
    #[serde(rename = "Social_Science")]
    SocialScience,
    #[serde(rename = "Computer_Security")]
    ComputerSecurity,
}

impl Domain {
    /// All domains in their canonical iteration order.
    ///
    /// Passes and summaries walk domains in this order, and best/slowest
    /// domain ties resolve to whichever comes first here.
    pub const ALL: [Domain; 3] = [
        Domain::History,
        Domain::SocialScience,
        Domain::ComputerSecurity,
    ];

    /// Get the stored name for this domain
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::History => "History",
            Domain::SocialScience => "Social_Science",
            Domain::ComputerSecurity => "Computer_Security",
        }
    }

    /// Human-readable label (underscores replaced by spaces)
    pub fn display_name(&self) -> &'static str {
        match self {
            Domain::History => "History",
            Domain::SocialScience => "Social Science",
            Domain::ComputerSecurity => "Computer Security",
        }
    }

    /// Position of this domain in [`Domain::ALL`]
    pub fn ordinal(&self) -> usize {
        match self {
            Domain::History => 0,
            Domain::SocialScience => 1,
            Domain::ComputerSecurity => 2,
        }
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Domain {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .map(|c| match c {
                '-' | ' ' => '_',
                c => c.to_ascii_lowercase(),
            })
            .collect();

        match key.as_str() {
            "history" => Ok(Domain::History),
            "social_science" | "socialscience" => Ok(Domain::SocialScience),
            "computer_security" | "computersecurity" => Ok(Domain::ComputerSecurity),
            _ => Err(DomainError::UnknownDomain(s.to_string())),
        }
    }
}
