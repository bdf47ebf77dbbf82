//! Aggregate counts over a registration list

use crate::core::model::{RegistrationRecord, RegistrationStatus};
use serde::{Deserialize, Serialize};

/// Counts by status; always a fold over the list they describe
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationCounts {
    pub total: usize,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
}

impl RegistrationCounts {
    pub fn tally<'a>(records: impl IntoIterator<Item = &'a RegistrationRecord>) -> Self {
        records
            .into_iter()
            .fold(Self::default(), |mut counts, record| {
                counts.total += 1;
                match record.status() {
                    RegistrationStatus::Pending => counts.pending += 1,
                    RegistrationStatus::Approved => counts.approved += 1,
                    RegistrationStatus::Rejected => counts.rejected += 1,
                }
                counts
            })
    }

    /// `pending + approved + rejected == total`
    pub fn is_consistent(&self) -> bool {
        self.pending + self.approved + self.rejected == self.total
    }
}

/// Counts plus collected revenue, as shown on the admin dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationStats {
    #[serde(flatten)]
    pub counts: RegistrationCounts,
    pub revenue: u64,
}

impl RegistrationStats {
    pub fn compute(records: &[RegistrationRecord], fee_per_team: u64) -> Self {
        let counts = RegistrationCounts::tally(records);
        Self {
            counts,
            revenue: counts.approved as u64 * fee_per_team,
        }
    }
}
