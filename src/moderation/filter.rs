//! List filtering for the admin view

use crate::core::model::{RegistrationRecord, RegistrationStatus};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Status tab selected in the admin view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Approved,
    Rejected,
}

impl StatusFilter {
    pub fn admits(&self, status: RegistrationStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Pending => status == RegistrationStatus::Pending,
            StatusFilter::Approved => status == RegistrationStatus::Approved,
            StatusFilter::Rejected => status == RegistrationStatus::Rejected,
        }
    }
}

impl From<RegistrationStatus> for StatusFilter {
    fn from(status: RegistrationStatus) -> Self {
        match status {
            RegistrationStatus::Pending => StatusFilter::Pending,
            RegistrationStatus::Approved => StatusFilter::Approved,
            RegistrationStatus::Rejected => StatusFilter::Rejected,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(StatusFilter::All),
            other => other
                .parse::<RegistrationStatus>()
                .map(StatusFilter::from)
                .map_err(|e| e.to_string()),
        }
    }
}

/// Status tab plus free-text search
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationFilter {
    pub status: StatusFilter,
    pub search: String,
}

impl RegistrationFilter {
    pub fn new(status: StatusFilter, search: impl Into<String>) -> Self {
        Self {
            status,
            search: search.into(),
        }
    }

    /// Names match case-insensitively; the phone must contain the term verbatim
    pub fn matches(&self, record: &RegistrationRecord) -> bool {
        if !self.status.admits(record.status()) {
            return false;
        }
        if self.search.trim().is_empty() {
            return true;
        }

        let needle = self.search.to_lowercase();
        record.team_name.to_lowercase().contains(&needle)
            || record.igl_name.to_lowercase().contains(&needle)
            || record.igl_phone.contains(&self.search)
    }

    pub fn apply<'a>(&self, records: &'a [RegistrationRecord]) -> Vec<&'a RegistrationRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{ModerationTarget, StatusPatch, TeamRow, TeamWithPlayers};
    use chrono::Utc;
    use uuid::Uuid;

    fn record(team: &str, igl: &str, phone: &str, status: Option<ModerationTarget>) -> RegistrationRecord {
        let mut record = RegistrationRecord::from(TeamWithPlayers {
            team: TeamRow {
                id: Uuid::new_v4(),
                team_name: team.to_string(),
                igl_name: igl.to_string(),
                igl_phone: phone.to_string(),
                payment_screenshot_url: String::new(),
                status: RegistrationStatus::Pending,
                payment_amount: 250,
                payment_verified: false,
                created_at: Utc::now(),
            },
            players: vec![],
        });
        if let Some(target) = status {
            record.apply(&StatusPatch::for_target(target));
        }
        record
    }

    fn sample() -> Vec<RegistrationRecord> {
        vec![
            record("Team Phoenix", "Asha", "9812345678", None),
            record("Night Owls", "Bikash", "9800000001", Some(ModerationTarget::Approved)),
            record("Red Falcons", "Chandra", "9711111111", Some(ModerationTarget::Rejected)),
        ]
    }

    fn names<'a>(records: &[&'a RegistrationRecord]) -> Vec<&'a str> {
        records.iter().map(|r| r.team_name.as_str()).collect()
    }

    #[test]
    fn test_status_only() {
        let records = sample();
        let filter = RegistrationFilter::new(StatusFilter::Approved, "");
        assert_eq!(names(&filter.apply(&records)), vec!["Night Owls"]);
        assert_eq!(RegistrationFilter::default().apply(&records).len(), 3);
    }

    #[test]
    fn test_search_names_case_insensitive() {
        let records = sample();
        let filter = RegistrationFilter::new(StatusFilter::All, "PHOENIX");
        assert_eq!(names(&filter.apply(&records)), vec!["Team Phoenix"]);

        let filter = RegistrationFilter::new(StatusFilter::All, "chan");
        assert_eq!(names(&filter.apply(&records)), vec!["Red Falcons"]);
    }

    #[test]
    fn test_search_phone_substring() {
        let records = sample();
        let filter = RegistrationFilter::new(StatusFilter::All, "0000");
        assert_eq!(names(&filter.apply(&records)), vec!["Night Owls"]);
    }

    #[test]
    fn test_blank_search_keeps_everything() {
        let records = sample();
        let filter = RegistrationFilter::new(StatusFilter::All, "   ");
        assert_eq!(filter.apply(&records).len(), 3);
    }

    #[test]
    fn test_status_and_search_combine() {
        let records = sample();
        let filter = RegistrationFilter::new(StatusFilter::Pending, "owls");
        assert!(filter.apply(&records).is_empty());
    }

    #[test]
    fn test_filter_is_idempotent() {
        let records = sample();
        let filter = RegistrationFilter::new(StatusFilter::All, "98");
        let once: Vec<RegistrationRecord> = filter.apply(&records).into_iter().cloned().collect();
        let twice = filter.apply(&once);
        assert_eq!(names(&twice), names(&filter.apply(&records)));
    }

    #[test]
    fn test_parse_status_filter() {
        assert_eq!("all".parse::<StatusFilter>(), Ok(StatusFilter::All));
        assert_eq!("rejected".parse::<StatusFilter>(), Ok(StatusFilter::Rejected));
        assert!("archived".parse::<StatusFilter>().is_err());
    }
}
