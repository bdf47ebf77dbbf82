//! Submission validators
//!
//! Checks run in a fixed order and stop at the first failure, so a caller
//! always gets exactly one message describing the earliest problem.

use crate::core::model::Player;
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// A borrowed view of a submission about to be validated
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub team_name: &'a str,
    pub igl_name: &'a str,
    pub igl_phone: &'a str,
    pub players: &'a [Player],
    pub has_payment_proof: bool,
}

/// The first check a submission failed
///
/// Player positions are 1-based, matching how the roster is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    TeamNameRequired,
    LeaderNameRequired,
    InvalidPhone,
    RosterEmpty,
    TooManyPlayers(usize),
    PlayerNameMissing(usize),
    PlayerUidMissing(usize),
    PaymentProofMissing,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::TeamNameRequired => write!(f, "Team name is required"),
            Violation::LeaderNameRequired => write!(f, "Leader name is required"),
            Violation::InvalidPhone => write!(f, "Valid 10-digit WhatsApp number is required"),
            Violation::RosterEmpty => write!(f, "At least one player is required"),
            Violation::TooManyPlayers(max) => write!(f, "A team can have at most {} players", max),
            Violation::PlayerNameMissing(n) => write!(f, "Player {} name is missing", n),
            Violation::PlayerUidMissing(n) => write!(f, "Player {} UID is missing", n),
            Violation::PaymentProofMissing => write!(f, "Please upload payment proof"),
        }
    }
}

impl std::error::Error for Violation {}

/// Exactly ten ASCII digits, nothing else
pub fn is_valid_phone(phone: &str) -> bool {
    static PHONE_REGEX: OnceLock<Regex> = OnceLock::new();
    // `\d` would also accept non-ASCII digits
    let regex = PHONE_REGEX.get_or_init(|| Regex::new(r"^[0-9]{10}$").unwrap());
    regex.is_match(phone)
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Validate a candidate submission
///
/// Order: team name, leader name, phone, a non-empty roster, each player
/// (name before uid), payment proof.
pub fn validate_candidate(candidate: &Candidate<'_>) -> Result<(), Violation> {
    if is_blank(candidate.team_name) {
        return Err(Violation::TeamNameRequired);
    }
    if is_blank(candidate.igl_name) {
        return Err(Violation::LeaderNameRequired);
    }
    if !is_valid_phone(candidate.igl_phone) {
        return Err(Violation::InvalidPhone);
    }
    if candidate.players.is_empty() {
        return Err(Violation::RosterEmpty);
    }

    for (index, player) in candidate.players.iter().enumerate() {
        if is_blank(&player.name) {
            return Err(Violation::PlayerNameMissing(index + 1));
        }
        if is_blank(&player.uid) {
            return Err(Violation::PlayerUidMissing(index + 1));
        }
    }

    if !candidate.has_payment_proof {
        return Err(Violation::PaymentProofMissing);
    }

    Ok(())
}
