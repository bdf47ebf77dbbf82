//! Revenue derived from approved registrations
//!
//! The platform fee is rounded half-up to a whole amount before it is
//! subtracted; `net` is never rounded on its own. The rate is held in basis
//! points so the rounding happens on an exact integer product.

use crate::core::model::REGISTRATION_FEE;
use serde::{Deserialize, Serialize};

/// Default platform cut: 5%
pub const PLATFORM_FEE_RATE: f64 = 0.05;

const BASIS_POINTS: u64 = 10_000;

/// Revenue figures for a number of approved teams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueBreakdown {
    pub teams: u64,
    pub fee_per_team: u64,
    pub gross: u64,
    pub platform_fee: u64,
    pub net: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevenueCalculator {
    fee_per_team: u64,
    rate_bps: u64,
}

impl RevenueCalculator {
    /// `rate` is a fraction (0.05 = 5%); it is clamped to [0, 1]
    pub fn new(fee_per_team: u32, rate: f64) -> Self {
        let rate = if rate.is_finite() { rate.clamp(0.0, 1.0) } else { 0.0 };
        Self {
            fee_per_team: u64::from(fee_per_team),
            rate_bps: (rate * BASIS_POINTS as f64).round() as u64,
        }
    }

    pub fn fee_per_team(&self) -> u64 {
        self.fee_per_team
    }

    /// Revenue for the live approved count
    pub fn for_approved(&self, approved: usize) -> RevenueBreakdown {
        self.breakdown(approved as u64)
    }

    /// Revenue for a hypothetical count; negative counts floor to zero
    pub fn projected(&self, teams: i64) -> RevenueBreakdown {
        self.breakdown(teams.max(0) as u64)
    }

    fn breakdown(&self, teams: u64) -> RevenueBreakdown {
        let gross = teams.saturating_mul(self.fee_per_team);
        let platform_fee = (u128::from(gross) * u128::from(self.rate_bps)
            + u128::from(BASIS_POINTS / 2))
            / u128::from(BASIS_POINTS);
        let platform_fee = platform_fee as u64;

        RevenueBreakdown {
            teams,
            fee_per_team: self.fee_per_team,
            gross,
            platform_fee,
            net: gross - platform_fee,
        }
    }
}

impl Default for RevenueCalculator {
    fn default() -> Self {
        Self::new(REGISTRATION_FEE, PLATFORM_FEE_RATE)
    }
}
