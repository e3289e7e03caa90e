mod error;
mod export;
mod fire;
mod types;
mod view;
mod wealth;

pub use error::ProjectionError;
pub use export::{FIRE_CSV_FILENAME, WEALTH_CSV_FILENAME, fire_csv, wealth_csv};
pub use fire::project_fire;
pub use types::{
    FIRE_AGE_CEILING, FireOutcome, FireParams, FirePeriod, FireProjection, FireTarget, Frequency,
    MONTHS_PER_YEAR, WealthParams, WealthPeriod, WealthProjection,
};
pub use view::{
    ChartSeries, FireRow, FireSummary, ViewMode, WealthRow, WealthSummary, fire_chart, fire_rows,
    format_money, wealth_chart, wealth_rows,
};
pub use wealth::{project_wealth, yearly_net_flows};
