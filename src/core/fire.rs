use super::error::ProjectionError;
use super::types::{
    FIRE_AGE_CEILING, FireOutcome, FireParams, FirePeriod, FireProjection, FireTarget,
    MONTHS_PER_YEAR,
};

pub fn project_fire(params: &FireParams) -> Result<FireProjection, ProjectionError> {
    let target = FireTarget::from_params(params)?;
    let months_per_year = f64::from(MONTHS_PER_YEAR);
    let monthly_return = params.expected_annual_return / months_per_year;
    let ceiling_months = (FIRE_AGE_CEILING - params.start_age) * months_per_year;

    let mut balance = params.current_savings;
    let mut total_invested = params.current_savings;
    let mut total_interest = 0.0;
    let mut months = 0_u32;

    let mut records = vec![FirePeriod {
        month: 0,
        age: params.start_age,
        balance,
        total_invested,
        total_interest,
    }];

    let outcome = loop {
        if balance >= target.balance {
            break FireOutcome::Reached {
                months_to_reach: months,
                age: params.start_age + f64::from(months) / months_per_year,
            };
        }
        if f64::from(months) >= ceiling_months {
            break FireOutcome::CeilingHit {
                final_balance: balance,
            };
        }

        months += 1;
        let monthly_interest = balance * monthly_return;
        balance += monthly_interest + params.monthly_savings;
        total_interest += monthly_interest;
        total_invested += params.monthly_savings;

        records.push(FirePeriod {
            month: months,
            age: params.start_age + f64::from(months) / months_per_year,
            balance,
            total_invested,
            total_interest,
        });
    };

    tracing::debug!(
        target_balance = target.balance,
        months,
        reached = outcome.is_reached(),
        "fire projection complete"
    );

    Ok(FireProjection {
        start_age: params.start_age,
        target,
        records,
        outcome,
    })
}
