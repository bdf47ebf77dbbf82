//! Registration domain model
//!
//! Two shapes coexist: persistence rows (`TeamRow`, `PlayerRow`) keep the
//! snake_case column names of the hosted database, while
//! [`RegistrationRecord`] is the camelCase record handed to admin clients.

use crate::core::error::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Registration fee per team, in NPR
pub const REGISTRATION_FEE: u32 = 250;

/// Moderation state of a registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    Pending,
    Approved,
    Rejected,
}

impl RegistrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationStatus::Pending => "pending",
            RegistrationStatus::Approved => "approved",
            RegistrationStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown status name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown registration status: {}", self.0)
    }
}

impl std::error::Error for UnknownStatus {}

impl FromStr for RegistrationStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(RegistrationStatus::Pending),
            "approved" => Ok(RegistrationStatus::Approved),
            "rejected" => Ok(RegistrationStatus::Rejected),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// A status a moderator may move a registration to
///
/// `pending` is deliberately absent: once decided, a registration never goes
/// back to review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationTarget {
    Approved,
    Rejected,
}

impl From<ModerationTarget> for RegistrationStatus {
    fn from(target: ModerationTarget) -> Self {
        match target {
            ModerationTarget::Approved => RegistrationStatus::Approved,
            ModerationTarget::Rejected => RegistrationStatus::Rejected,
        }
    }
}

impl TryFrom<RegistrationStatus> for ModerationTarget {
    type Error = ValidationError;

    fn try_from(status: RegistrationStatus) -> Result<Self, Self::Error> {
        match status {
            RegistrationStatus::Approved => Ok(ModerationTarget::Approved),
            RegistrationStatus::Rejected => Ok(ModerationTarget::Rejected),
            RegistrationStatus::Pending => Err(ValidationError::InvalidTransition {
                target: status.to_string(),
            }),
        }
    }
}

impl fmt::Display for ModerationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(RegistrationStatus::from(*self).as_str())
    }
}

/// The only way to change a registration's status
///
/// Carries the new status together with the derived `payment_verified` flag;
/// neither can be set on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusPatch {
    status: RegistrationStatus,
    payment_verified: bool,
}

impl StatusPatch {
    pub fn for_target(target: ModerationTarget) -> Self {
        Self {
            status: target.into(),
            payment_verified: target == ModerationTarget::Approved,
        }
    }

    pub fn status(&self) -> RegistrationStatus {
        self.status
    }

    pub fn payment_verified(&self) -> bool {
        self.payment_verified
    }
}

/// A roster entry as submitted and as exposed
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub uid: String,
}

impl Player {
    pub fn new(name: impl Into<String>, uid: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            uid: uid.into(),
        }
    }
}

/// Row to insert into `teams`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTeamRow {
    pub team_name: String,
    pub igl_name: String,
    pub igl_phone: String,
    pub payment_screenshot_url: String,
    pub status: RegistrationStatus,
    pub payment_amount: u32,
}

/// Row of `teams` as stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRow {
    pub id: Uuid,
    pub team_name: String,
    pub igl_name: String,
    pub igl_phone: String,
    pub payment_screenshot_url: String,
    pub status: RegistrationStatus,
    pub payment_amount: u32,
    pub payment_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl TeamRow {
    pub fn apply(&mut self, patch: &StatusPatch) {
        self.status = patch.status;
        self.payment_verified = patch.payment_verified;
    }
}

/// Row to insert into `players`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPlayerRow {
    pub team_id: Uuid,
    pub name: String,
    pub uid: String,
}

/// Row of `players` as stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRow {
    pub id: Uuid,
    pub team_id: Uuid,
    pub name: String,
    pub uid: String,
}

/// A team joined with its roster, in insertion order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamWithPlayers {
    #[serde(flatten)]
    pub team: TeamRow,
    pub players: Vec<PlayerRow>,
}

/// A registration in the shape admin clients consume
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRecord {
    pub id: Uuid,
    pub team_name: String,
    pub igl_name: String,
    pub igl_phone: String,
    pub players: Vec<Player>,
    pub payment_screenshot: String,
    status: RegistrationStatus,
    pub created_at: DateTime<Utc>,
    pub payment_amount: u32,
    payment_verified: bool,
}

impl RegistrationRecord {
    pub fn status(&self) -> RegistrationStatus {
        self.status
    }

    pub fn payment_verified(&self) -> bool {
        self.payment_verified
    }

    /// Apply a confirmed transition to this copy
    pub fn apply(&mut self, patch: &StatusPatch) {
        self.status = patch.status;
        self.payment_verified = patch.payment_verified;
    }
}

impl From<TeamWithPlayers> for RegistrationRecord {
    fn from(joined: TeamWithPlayers) -> Self {
        let TeamWithPlayers { team, players } = joined;
        Self {
            id: team.id,
            team_name: team.team_name,
            igl_name: team.igl_name,
            igl_phone: team.igl_phone,
            players: players
                .into_iter()
                .map(|p| Player {
                    name: p.name,
                    uid: p.uid,
                })
                .collect(),
            payment_screenshot: team.payment_screenshot_url,
            status: team.status,
            created_at: team.created_at,
            payment_amount: team.payment_amount,
            payment_verified: team.payment_verified,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn joined() -> TeamWithPlayers {
        let team_id = Uuid::new_v4();
        TeamWithPlayers {
            team: TeamRow {
                id: team_id,
                team_name: "Team Phoenix".to_string(),
                igl_name: "Asha".to_string(),
                igl_phone: "9812345678".to_string(),
                payment_screenshot_url: "https://cdn.test/public/abc.png".to_string(),
                status: RegistrationStatus::Pending,
                payment_amount: REGISTRATION_FEE,
                payment_verified: false,
                created_at: Utc::now(),
            },
            players: vec![
                PlayerRow {
                    id: Uuid::new_v4(),
                    team_id,
                    name: "Asha".to_string(),
                    uid: "111".to_string(),
                },
                PlayerRow {
                    id: Uuid::new_v4(),
                    team_id,
                    name: "Bikash".to_string(),
                    uid: "222".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(RegistrationStatus::Approved).unwrap(),
            json!("approved")
        );
        assert_eq!(
            "rejected".parse::<RegistrationStatus>(),
            Ok(RegistrationStatus::Rejected)
        );
        assert!("Pending".parse::<RegistrationStatus>().is_err());
    }

    #[test]
    fn test_pending_is_not_a_moderation_target() {
        assert!(ModerationTarget::try_from(RegistrationStatus::Pending).is_err());
        assert_eq!(
            ModerationTarget::try_from(RegistrationStatus::Rejected).unwrap(),
            ModerationTarget::Rejected
        );
        assert!(serde_json::from_value::<ModerationTarget>(json!("pending")).is_err());
    }

    #[test]
    fn test_patch_couples_verified_flag_to_status() {
        let approve = StatusPatch::for_target(ModerationTarget::Approved);
        assert_eq!(approve.status(), RegistrationStatus::Approved);
        assert!(approve.payment_verified());

        let reject = StatusPatch::for_target(ModerationTarget::Rejected);
        assert_eq!(reject.status(), RegistrationStatus::Rejected);
        assert!(!reject.payment_verified());
    }

    #[test]
    fn test_record_reshape_renames_fields() {
        let record = RegistrationRecord::from(joined());
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["teamName"], "Team Phoenix");
        assert_eq!(value["iglName"], "Asha");
        assert_eq!(value["iglPhone"], "9812345678");
        assert_eq!(value["paymentScreenshot"], "https://cdn.test/public/abc.png");
        assert_eq!(value["status"], "pending");
        assert_eq!(value["paymentAmount"], 250);
        assert_eq!(value["paymentVerified"], false);
        assert!(value.get("createdAt").is_some());
        assert_eq!(
            value["players"],
            json!([{"name": "Asha", "uid": "111"}, {"name": "Bikash", "uid": "222"}])
        );
        assert!(value.get("team_name").is_none());
    }

    #[test]
    fn test_record_apply_keeps_invariant() {
        let mut record = RegistrationRecord::from(joined());
        record.apply(&StatusPatch::for_target(ModerationTarget::Approved));
        assert_eq!(record.status(), RegistrationStatus::Approved);
        assert!(record.payment_verified());

        record.apply(&StatusPatch::for_target(ModerationTarget::Rejected));
        assert_eq!(record.status(), RegistrationStatus::Rejected);
        assert!(!record.payment_verified());
    }

    #[test]
    fn test_joined_row_flattens_team_columns() {
        let value = serde_json::to_value(joined()).unwrap();
        assert_eq!(value["team_name"], "Team Phoenix");
        assert_eq!(value["players"].as_array().map(Vec::len), Some(2));
    }
}
