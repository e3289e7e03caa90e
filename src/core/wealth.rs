use super::types::{MONTHS_PER_YEAR, WealthParams, WealthPeriod, WealthProjection};

#[derive(Debug)]
struct WealthState {
    balance: f64,
    total_interest: f64,
    cumulative_net_principal: f64,
    current_deposit: f64,
    current_withdrawal: f64,
    block_flow: f64,
}

impl WealthState {
    fn new(params: &WealthParams) -> Self {
        Self {
            balance: params.initial_amount,
            total_interest: 0.0,
            cumulative_net_principal: params.initial_amount,
            current_deposit: params.deposit_amount,
            current_withdrawal: params.withdrawal_amount,
            block_flow: 0.0,
        }
    }

    fn scheduled_flow(&self, params: &WealthParams, month: u32) -> f64 {
        let mut net = 0.0;
        if params.deposit_frequency.applies_in(month) {
            net += self.current_deposit;
        }
        if params.withdrawal_frequency.applies_in(month) {
            net -= self.current_withdrawal;
        }
        net
    }

    fn advance(&mut self, params: &WealthParams, monthly_rate: f64, month: u32) -> WealthPeriod {
        let monthly_interest = self.balance * monthly_rate;
        let net_flow = self.scheduled_flow(params, month);

        self.balance += monthly_interest + net_flow;
        self.total_interest += monthly_interest;
        self.cumulative_net_principal += net_flow;
        self.block_flow += net_flow;

        let record = WealthPeriod {
            period: month,
            monthly_interest,
            accrued_interest: self.total_interest,
            net_flow,
            cumulative_net_principal: self.cumulative_net_principal,
            balance: self.balance.max(0.0),
            period_flow_to_date: self.block_flow,
        };

        if month % MONTHS_PER_YEAR == 0 {
            self.current_deposit *= 1.0 + params.deposit_annual_increase;
            self.current_withdrawal *= 1.0 + params.withdrawal_annual_increase;
            self.block_flow = 0.0;
        }

        record
    }
}

pub fn project_wealth(params: &WealthParams) -> WealthProjection {
    let monthly_rate = params.annual_rate / f64::from(MONTHS_PER_YEAR);
    let mut state = WealthState::new(params);
    let mut records = Vec::with_capacity(params.total_months as usize);

    for month in 1..=params.total_months {
        records.push(state.advance(params, monthly_rate, month));
    }

    tracing::debug!(
        months = params.total_months,
        final_balance = state.balance,
        total_interest = state.total_interest,
        "wealth projection complete"
    );

    WealthProjection {
        records,
        final_balance: state.balance,
        total_interest: state.total_interest,
        net_principal: state.cumulative_net_principal,
    }
}

/// Net flow of each completed 12-month block, in order. A trailing partial
/// block is not reported.
pub fn yearly_net_flows(records: &[WealthPeriod]) -> Vec<f64> {
    records
        .chunks_exact(MONTHS_PER_YEAR as usize)
        .map(|year| year.iter().map(|r| r.net_flow).sum())
        .collect()
}
