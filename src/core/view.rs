use serde::{Deserialize, Serialize};

use super::types::{
    FireOutcome, FirePeriod, FireProjection, MONTHS_PER_YEAR, WealthPeriod, WealthProjection,
};

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Monthly,
    #[default]
    Yearly,
}

impl ViewMode {
    pub fn step(self) -> usize {
        match self {
            ViewMode::Monthly => 1,
            ViewMode::Yearly => MONTHS_PER_YEAR as usize,
        }
    }
}

/// Two stacked series sharing one set of labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub principal_label: &'static str,
    pub principal: Vec<f64>,
    pub interest_label: &'static str,
    pub interest: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WealthRow {
    /// Month number, or year number in the yearly view.
    pub period: u32,
    pub interest: f64,
    pub accrued_interest: f64,
    pub net_flow: f64,
    pub cumulative_net_principal: f64,
    pub balance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FireRow {
    /// Month number, or whole age in the yearly view.
    pub label: u32,
    pub invested: f64,
    pub interest: f64,
    pub balance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WealthSummary {
    pub future_value: f64,
    pub total_interest: f64,
    pub net_principal: f64,
    pub rate_of_return_percent: f64,
}

impl WealthSummary {
    pub fn from_projection(projection: &WealthProjection) -> Self {
        let principal = projection.net_principal;
        let rate_of_return_percent = if principal > 0.0 {
            (projection.final_balance - principal) / principal * 100.0
        } else {
            0.0
        };
        Self {
            future_value: projection.final_balance,
            total_interest: projection.total_interest,
            net_principal: principal,
            rate_of_return_percent,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FireSummary {
    pub fire_number: f64,
    pub net_annual_need: f64,
    pub outcome: FireOutcome,
    pub fire_age: f64,
    pub years_to_fire: f64,
    pub months_simulated: u32,
}

impl FireSummary {
    pub fn from_projection(projection: &FireProjection) -> Self {
        Self {
            fire_number: projection.target.balance,
            net_annual_need: projection.target.net_annual_need,
            outcome: projection.outcome,
            fire_age: projection.final_age(),
            years_to_fire: projection.years_simulated(),
            months_simulated: projection.months_simulated(),
        }
    }
}

fn wealth_selected(
    records: &[WealthPeriod],
    view: ViewMode,
) -> impl Iterator<Item = (usize, &WealthPeriod)> {
    let step = view.step();
    records
        .iter()
        .enumerate()
        .filter(move |(idx, _)| (idx + 1) % step == 0)
}

fn fire_selected(
    records: &[FirePeriod],
    view: ViewMode,
) -> impl Iterator<Item = &FirePeriod> {
    let step = view.step();
    records
        .iter()
        .enumerate()
        .filter(move |(idx, _)| idx % step == 0)
        .map(|(_, record)| record)
}

pub fn wealth_chart(records: &[WealthPeriod], view: ViewMode) -> ChartSeries {
    let mut chart = ChartSeries {
        labels: Vec::new(),
        principal_label: "Cumulative Net Deposits",
        principal: Vec::new(),
        interest_label: "Accrued Interest",
        interest: Vec::new(),
    };
    for (_, record) in wealth_selected(records, view) {
        chart.labels.push(match view {
            ViewMode::Monthly => format!("Mo {}", record.period),
            ViewMode::Yearly => format!("Yr {}", record.period / MONTHS_PER_YEAR),
        });
        chart.principal.push(round_to(record.cumulative_net_principal, 2));
        chart.interest.push(round_to(record.accrued_interest, 2));
    }
    chart
}

pub fn wealth_rows(records: &[WealthPeriod], view: ViewMode) -> Vec<WealthRow> {
    wealth_selected(records, view)
        .map(|(idx, record)| {
            let (period, net_flow) = match view {
                ViewMode::Monthly => (record.period, record.net_flow),
                ViewMode::Yearly => {
                    let year_start = idx + 1 - MONTHS_PER_YEAR as usize;
                    let net_flow: f64 = records[year_start..=idx].iter().map(|r| r.net_flow).sum();
                    (record.period / MONTHS_PER_YEAR, net_flow)
                }
            };
            WealthRow {
                period,
                interest: record.monthly_interest,
                accrued_interest: record.accrued_interest,
                net_flow,
                cumulative_net_principal: record.cumulative_net_principal,
                balance: record.balance,
            }
        })
        .collect()
}

pub fn fire_chart(records: &[FirePeriod], view: ViewMode) -> ChartSeries {
    let mut chart = ChartSeries {
        labels: Vec::new(),
        principal_label: "Total Invested",
        principal: Vec::new(),
        interest_label: "Compound Interest",
        interest: Vec::new(),
    };
    for record in fire_selected(records, view) {
        chart.labels.push(match view {
            ViewMode::Monthly => format!("Mo {}", record.month),
            ViewMode::Yearly => format!("Age {}", record.age.floor()),
        });
        chart.principal.push(record.total_invested);
        chart.interest.push(record.total_interest);
    }
    chart
}

pub fn fire_rows(records: &[FirePeriod], view: ViewMode) -> Vec<FireRow> {
    fire_selected(records, view)
        .map(|record| FireRow {
            label: match view {
                ViewMode::Monthly => record.month,
                ViewMode::Yearly => record.age.floor().max(0.0) as u32,
            },
            invested: record.total_invested.round(),
            interest: record.total_interest.round(),
            balance: record.balance.round(),
        })
        .collect()
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10_f64.powi(decimals);
    (value * scale).round() / scale
}

/// Formats `value` with a currency prefix, thousands separators and a fixed
/// number of decimals, e.g. `$12,345.68`.
pub fn format_money(currency: &str, value: f64, decimals: usize) -> String {
    let fixed = format!("{:.*}", decimals, value.abs());
    let (whole, fraction) = match fixed.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (idx, digit) in whole.chars().enumerate() {
        if idx > 0 && (whole.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };
    match fraction {
        Some(fraction) => format!("{sign}{currency}{grouped}.{fraction}"),
        None => format!("{sign}{currency}{grouped}"),
    }
}
