//! Admin-side view over the registration list
//!
//! The controller keeps the full list fetched from the query endpoint and a
//! filtered view derived from it. A status change is applied to the local
//! copy only after the updater confirms it; a failed update leaves the list,
//! the filtered view, and the statistics exactly as they were.

use crate::core::model::{ModerationTarget, RegistrationRecord, StatusPatch};
use crate::moderation::filter::{RegistrationFilter, StatusFilter};
use crate::moderation::stats::RegistrationStats;
use crate::moderation::updater::{ModerationError, StatusUpdater};
use crate::revenue::{RevenueBreakdown, RevenueCalculator};
use uuid::Uuid;

pub struct ModerationController<U: StatusUpdater> {
    updater: U,
    calculator: RevenueCalculator,
    records: Vec<RegistrationRecord>,
    filter: RegistrationFilter,
    // Indexes into `records`; the list is only ever mutated in place
    visible: Vec<usize>,
    stats: RegistrationStats,
    expanded: Option<Uuid>,
}

impl<U: StatusUpdater> ModerationController<U> {
    pub fn new(updater: U) -> Self {
        Self::with_calculator(updater, RevenueCalculator::default())
    }

    pub fn with_calculator(updater: U, calculator: RevenueCalculator) -> Self {
        Self {
            updater,
            calculator,
            records: Vec::new(),
            filter: RegistrationFilter::default(),
            visible: Vec::new(),
            stats: RegistrationStats::default(),
            expanded: None,
        }
    }

    /// Replace the list with a fresh fetch
    pub fn load(&mut self, records: Vec<RegistrationRecord>) {
        self.records = records;
        if self
            .expanded
            .is_some_and(|id| !self.records.iter().any(|r| r.id == id))
        {
            self.expanded = None;
        }
        self.refresh();
    }

    pub fn set_status_filter(&mut self, status: StatusFilter) {
        self.filter.status = status;
        self.refresh_visible();
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.filter.search = search.into();
        self.refresh_visible();
    }

    pub fn filter(&self) -> &RegistrationFilter {
        &self.filter
    }

    pub fn records(&self) -> &[RegistrationRecord] {
        &self.records
    }

    pub fn filtered(&self) -> Vec<&RegistrationRecord> {
        self.visible.iter().map(|&i| &self.records[i]).collect()
    }

    pub fn get(&self, id: &Uuid) -> Option<&RegistrationRecord> {
        self.records.iter().find(|r| &r.id == id)
    }

    pub fn stats(&self) -> RegistrationStats {
        self.stats
    }

    /// Revenue for the live approved count
    pub fn revenue(&self) -> RevenueBreakdown {
        self.calculator.for_approved(self.stats.counts.approved)
    }

    /// Revenue for a hypothetical approved count
    pub fn projected_revenue(&self, teams: i64) -> RevenueBreakdown {
        self.calculator.projected(teams)
    }

    pub fn expanded(&self) -> Option<Uuid> {
        self.expanded
    }

    /// Expand a card, collapsing any other; toggling the open card closes it
    pub fn toggle_expanded(&mut self, id: Uuid) {
        self.expanded = if self.expanded == Some(id) {
            None
        } else {
            Some(id)
        };
    }

    /// Move a registration to `target` and reconcile the local copy
    pub async fn transition(
        &mut self,
        id: Uuid,
        target: ModerationTarget,
    ) -> Result<&RegistrationRecord, ModerationError> {
        let index = self
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or(ModerationError::NotFound { id })?;

        if let Err(e) = self.updater.update_status(&id, target).await {
            tracing::warn!(team_id = %id, %target, error = ?e, "Status update failed");
            return Err(e);
        }

        self.records[index].apply(&StatusPatch::for_target(target));
        self.refresh();
        Ok(&self.records[index])
    }

    fn refresh(&mut self) {
        self.stats = RegistrationStats::compute(&self.records, self.calculator.fee_per_team());
        self.refresh_visible();
    }

    fn refresh_visible(&mut self) {
        self.visible = self
            .records
            .iter()
            .enumerate()
            .filter(|(_, r)| self.filter.matches(r))
            .map(|(i, _)| i)
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{RegistrationStatus, TeamRow, TeamWithPlayers};
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingUpdater {
        calls: Mutex<Vec<(Uuid, ModerationTarget)>>,
        fail: bool,
    }

    #[async_trait]
    impl StatusUpdater for RecordingUpdater {
        async fn update_status(
            &self,
            id: &Uuid,
            target: ModerationTarget,
        ) -> Result<(), ModerationError> {
            self.calls.lock().unwrap().push((*id, target));
            if self.fail {
                Err(ModerationError::UpdateFailed {
                    message: "database unavailable".to_string(),
                })
            } else {
                Ok(())
            }
        }
    }

    fn record(team: &str, phone: &str) -> RegistrationRecord {
        RegistrationRecord::from(TeamWithPlayers {
            team: TeamRow {
                id: Uuid::new_v4(),
                team_name: team.to_string(),
                igl_name: "Leader".to_string(),
                igl_phone: phone.to_string(),
                payment_screenshot_url: String::new(),
                status: RegistrationStatus::Pending,
                payment_amount: 250,
                payment_verified: false,
                created_at: Utc::now(),
            },
            players: vec![],
        })
    }

    fn loaded(updater: RecordingUpdater) -> ModerationController<RecordingUpdater> {
        let mut controller = ModerationController::new(updater);
        controller.load(vec![
            record("Team Phoenix", "9812345678"),
            record("Night Owls", "9800000001"),
            record("Red Falcons", "9711111111"),
        ]);
        controller
    }

    #[tokio::test]
    async fn test_approve_updates_stats_and_revenue() {
        let mut controller = loaded(RecordingUpdater::default());
        let before = controller.stats();
        let revenue_before = controller.stats().revenue;
        let id = controller.records()[0].id;

        let record = controller
            .transition(id, ModerationTarget::Approved)
            .await
            .unwrap();
        assert_eq!(record.status(), RegistrationStatus::Approved);
        assert!(record.payment_verified());

        let after = controller.stats();
        assert_eq!(after.counts.pending, before.counts.pending - 1);
        assert_eq!(after.counts.approved, before.counts.approved + 1);
        assert_eq!(after.revenue, revenue_before + 250);
        assert!(after.counts.is_consistent());
        assert_eq!(controller.revenue().gross, 250);
    }

    #[tokio::test]
    async fn test_transition_leaves_other_records_untouched() {
        let mut controller = loaded(RecordingUpdater::default());
        let untouched: Vec<_> = controller.records()[1..].to_vec();
        let id = controller.records()[0].id;

        controller
            .transition(id, ModerationTarget::Rejected)
            .await
            .unwrap();
        assert_eq!(&controller.records()[1..], untouched.as_slice());
    }

    #[tokio::test]
    async fn test_failed_transition_changes_nothing() {
        let mut controller = loaded(RecordingUpdater {
            fail: true,
            ..Default::default()
        });
        controller.set_status_filter(StatusFilter::Pending);
        let records = controller.records().to_vec();
        let stats = controller.stats();
        let id = records[0].id;

        let err = controller
            .transition(id, ModerationTarget::Approved)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Failed to update status");
        assert_eq!(controller.records(), records.as_slice());
        assert_eq!(controller.stats(), stats);
        assert_eq!(controller.filtered().len(), 3);
    }

    #[tokio::test]
    async fn test_unknown_id_skips_remote_call() {
        let updater = RecordingUpdater::default();
        let mut controller = loaded(updater);

        let result = controller
            .transition(Uuid::new_v4(), ModerationTarget::Approved)
            .await;
        assert!(matches!(result, Err(ModerationError::NotFound { .. })));
        assert!(controller.updater.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_filtered_view_follows_transition() {
        let mut controller = loaded(RecordingUpdater::default());
        controller.set_status_filter(StatusFilter::Pending);
        assert_eq!(controller.filtered().len(), 3);

        let id = controller.records()[1].id;
        controller
            .transition(id, ModerationTarget::Approved)
            .await
            .unwrap();
        assert_eq!(controller.filtered().len(), 2);

        controller.set_status_filter(StatusFilter::Approved);
        let approved = controller.filtered();
        assert_eq!(approved.len(), 1);
        assert_eq!(approved[0].id, id);
    }

    #[tokio::test]
    async fn test_decision_can_be_reversed() {
        let mut controller = loaded(RecordingUpdater::default());
        let id = controller.records()[0].id;

        controller
            .transition(id, ModerationTarget::Approved)
            .await
            .unwrap();
        let record = controller
            .transition(id, ModerationTarget::Rejected)
            .await
            .unwrap();
        assert_eq!(record.status(), RegistrationStatus::Rejected);
        assert!(!record.payment_verified());
        assert_eq!(controller.stats().revenue, 0);
    }

    #[test]
    fn test_search_and_filter() {
        let mut controller = loaded(RecordingUpdater::default());
        controller.set_search("owls");
        assert_eq!(controller.filtered().len(), 1);

        controller.set_search("98");
        assert_eq!(controller.filtered().len(), 2);

        controller.set_search("");
        assert_eq!(controller.filtered().len(), 3);
    }

    #[test]
    fn test_toggle_expanded_is_exclusive() {
        let mut controller = loaded(RecordingUpdater::default());
        let a = controller.records()[0].id;
        let b = controller.records()[1].id;

        controller.toggle_expanded(a);
        assert_eq!(controller.expanded(), Some(a));
        controller.toggle_expanded(b);
        assert_eq!(controller.expanded(), Some(b));
        controller.toggle_expanded(b);
        assert_eq!(controller.expanded(), None);
    }

    #[test]
    fn test_reload_drops_stale_expansion() {
        let mut controller = loaded(RecordingUpdater::default());
        let id = controller.records()[0].id;
        controller.toggle_expanded(id);

        controller.load(vec![record("Fresh", "9000000000")]);
        assert_eq!(controller.expanded(), None);
        assert_eq!(controller.stats().counts.total, 1);
    }

    #[test]
    fn test_projected_revenue() {
        let controller = loaded(RecordingUpdater::default());
        assert_eq!(controller.projected_revenue(-3).gross, 0);
        assert_eq!(controller.projected_revenue(4).gross, 1000);
    }
}
