use super::types::{FirePeriod, WealthPeriod};

pub const WEALTH_CSV_FILENAME: &str = "wealth_projection.csv";
pub const FIRE_CSV_FILENAME: &str = "fire_plan_export.csv";

const WEALTH_CSV_HEADER: &str = "Period,Interest,Net Flow,Cumulative Deposits,Total Balance";
const FIRE_CSV_HEADER: &str = "Age,Month,Invested,Interest,TotalValue";

pub fn wealth_csv(records: &[WealthPeriod]) -> String {
    let mut out = String::with_capacity((records.len() + 1) * 48);
    out.push_str(WEALTH_CSV_HEADER);
    out.push('\n');
    for r in records {
        out.push_str(&format!(
            "{},{:.2},{:.2},{:.2},{:.2}\n",
            r.period, r.monthly_interest, r.net_flow, r.cumulative_net_principal, r.balance
        ));
    }
    out
}

pub fn fire_csv(records: &[FirePeriod]) -> String {
    let mut out = String::with_capacity((records.len() + 1) * 48);
    out.push_str(FIRE_CSV_HEADER);
    out.push('\n');
    for r in records {
        out.push_str(&format!(
            "{:.2},{},{:.2},{:.2},{:.2}\n",
            r.age, r.month, r.total_invested, r.total_interest, r.balance
        ));
    }
    out
}
