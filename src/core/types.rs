use serde::Serialize;

use super::error::ProjectionError;

pub const MONTHS_PER_YEAR: u32 = 12;

/// Age at which a FIRE projection stops even if the target was never reached.
pub const FIRE_AGE_CEILING: f64 = 100.0;

/// Number of evenly spaced payments per year. Only divisors of 12 are valid so
/// every payment lands on a whole month.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Frequency(u32);

impl Frequency {
    pub const ANNUAL: Self = Self(1);
    pub const SEMI_ANNUAL: Self = Self(2);
    pub const QUARTERLY: Self = Self(4);
    pub const MONTHLY: Self = Self(12);

    pub fn per_year(per_year: u32) -> Result<Self, ProjectionError> {
        if per_year == 0 || MONTHS_PER_YEAR % per_year != 0 {
            return Err(ProjectionError::InvalidFrequency(per_year));
        }
        Ok(Self(per_year))
    }

    pub fn times_per_year(self) -> u32 {
        self.0
    }

    pub fn interval_months(self) -> u32 {
        MONTHS_PER_YEAR / self.0
    }

    pub fn applies_in(self, month: u32) -> bool {
        month % self.interval_months() == 0
    }
}

#[derive(Debug, Clone)]
pub struct WealthParams {
    pub initial_amount: f64,
    pub annual_rate: f64,
    pub total_months: u32,
    pub deposit_amount: f64,
    pub deposit_frequency: Frequency,
    pub deposit_annual_increase: f64,
    pub withdrawal_amount: f64,
    pub withdrawal_frequency: Frequency,
    pub withdrawal_annual_increase: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WealthPeriod {
    pub period: u32,
    pub monthly_interest: f64,
    pub accrued_interest: f64,
    pub net_flow: f64,
    pub cumulative_net_principal: f64,
    /// Display balance, never below zero.
    pub balance: f64,
    /// Net flow accumulated since the start of the current 12-month block.
    pub period_flow_to_date: f64,
}

#[derive(Debug, Clone)]
pub struct WealthProjection {
    pub records: Vec<WealthPeriod>,
    /// Running balance after the last month, not clamped.
    pub final_balance: f64,
    pub total_interest: f64,
    pub net_principal: f64,
}

#[derive(Debug, Clone)]
pub struct FireParams {
    pub start_age: f64,
    pub current_savings: f64,
    pub monthly_savings: f64,
    pub annual_spending: f64,
    pub other_income: f64,
    pub safe_withdrawal_rate: f64,
    pub expected_annual_return: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FireTarget {
    pub net_annual_need: f64,
    pub balance: f64,
}

impl FireTarget {
    pub fn from_params(params: &FireParams) -> Result<Self, ProjectionError> {
        // NaN fails this comparison too.
        if !(params.safe_withdrawal_rate > 0.0) {
            return Err(ProjectionError::UndefinedFireTarget);
        }
        let net_annual_need = (params.annual_spending - params.other_income).max(0.0);
        Ok(Self {
            net_annual_need,
            balance: net_annual_need / params.safe_withdrawal_rate,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FirePeriod {
    pub month: u32,
    pub age: f64,
    pub balance: f64,
    pub total_invested: f64,
    pub total_interest: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(
    tag = "status",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum FireOutcome {
    Reached { months_to_reach: u32, age: f64 },
    CeilingHit { final_balance: f64 },
}

impl FireOutcome {
    pub fn is_reached(self) -> bool {
        matches!(self, FireOutcome::Reached { .. })
    }
}

#[derive(Debug, Clone)]
pub struct FireProjection {
    pub start_age: f64,
    pub target: FireTarget,
    pub records: Vec<FirePeriod>,
    pub outcome: FireOutcome,
}

impl FireProjection {
    pub fn months_simulated(&self) -> u32 {
        self.records.last().map(|r| r.month).unwrap_or(0)
    }

    pub fn years_simulated(&self) -> f64 {
        f64::from(self.months_simulated()) / f64::from(MONTHS_PER_YEAR)
    }

    pub fn final_age(&self) -> f64 {
        self.start_age + self.years_simulated()
    }
}
