use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tokio::net::TcpListener;

use crate::core::{
    ChartSeries, FIRE_AGE_CEILING, FIRE_CSV_FILENAME, FireOutcome, FireParams, FirePeriod,
    FireRow, FireSummary, Frequency, ViewMode, WEALTH_CSV_FILENAME, WealthParams, WealthPeriod,
    WealthRow, WealthSummary, fire_chart, fire_csv, fire_rows, format_money, project_fire,
    project_wealth, wealth_chart, wealth_csv, wealth_rows,
};

const MAX_YEARS: u32 = 150;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliViewMode {
    Monthly,
    Yearly,
}

impl From<CliViewMode> for ViewMode {
    fn from(value: CliViewMode) -> Self {
        match value {
            CliViewMode::Monthly => ViewMode::Monthly,
            CliViewMode::Yearly => ViewMode::Yearly,
        }
    }
}

impl From<ViewMode> for CliViewMode {
    fn from(value: ViewMode) -> Self {
        match value {
            ViewMode::Monthly => CliViewMode::Monthly,
            ViewMode::Yearly => CliViewMode::Yearly,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "fincalc",
    about = "Compound interest and FIRE (financial independence) projections"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Project a balance with periodic, annually escalating deposits and withdrawals
    Wealth(WealthArgs),
    /// Estimate how long savings take to reach a FIRE target
    Fire(FireArgs),
    /// Serve the JSON and CSV API over HTTP
    Serve {
        #[arg(default_value_t = 8080)]
        port: u16,
    },
}

#[derive(Args, Debug, Clone)]
pub struct WealthArgs {
    #[arg(long, default_value = "$", help = "Currency label used when printing amounts")]
    currency: String,
    #[arg(long, default_value_t = 10_000.0)]
    initial_amount: f64,
    #[arg(
        long,
        default_value_t = 7.0,
        allow_negative_numbers = true,
        help = "Annual interest rate in percent, compounded monthly"
    )]
    interest_rate: f64,
    #[arg(long, default_value_t = 10)]
    years: u32,
    #[arg(long, default_value_t = 0, help = "Extra months on top of --years (0-11)")]
    months: u32,
    #[arg(long, default_value_t = 0.0)]
    deposit_amount: f64,
    #[arg(
        long,
        default_value_t = 12,
        help = "Deposits per year: 1, 2, 3, 4, 6 or 12"
    )]
    deposit_frequency: u32,
    #[arg(
        long,
        default_value_t = 0.0,
        allow_negative_numbers = true,
        help = "Deposit increase applied after every 12 months, in percent"
    )]
    deposit_increase: f64,
    #[arg(long, default_value_t = 0.0)]
    withdrawal_amount: f64,
    #[arg(
        long,
        default_value_t = 12,
        help = "Withdrawals per year: 1, 2, 3, 4, 6 or 12"
    )]
    withdrawal_frequency: u32,
    #[arg(
        long,
        default_value_t = 0.0,
        allow_negative_numbers = true,
        help = "Withdrawal increase applied after every 12 months, in percent"
    )]
    withdrawal_increase: f64,
    #[arg(long, value_enum, default_value_t = CliViewMode::Yearly)]
    view: CliViewMode,
    #[arg(long, help = "Write the full monthly series as CSV to this path")]
    csv: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct FireArgs {
    #[arg(long, default_value = "$", help = "Currency label used when printing amounts")]
    currency: String,
    #[arg(long, default_value_t = 30.0, help = "Current age")]
    age: f64,
    #[arg(long, default_value_t = 50_000.0)]
    current_savings: f64,
    #[arg(long, default_value_t = 2_000.0, allow_negative_numbers = true)]
    monthly_savings: f64,
    #[arg(long, default_value_t = 40_000.0)]
    annual_spending: f64,
    #[arg(
        long,
        default_value_t = 0.0,
        help = "Annual income in retirement that offsets spending (pensions, rent, ...)"
    )]
    other_income: f64,
    #[arg(long, default_value_t = 4.0, help = "Safe withdrawal rate in percent")]
    swr: f64,
    #[arg(
        long,
        default_value_t = 7.0,
        allow_negative_numbers = true,
        help = "Expected annual return in percent, compounded monthly"
    )]
    expected_return: f64,
    #[arg(long, value_enum, default_value_t = CliViewMode::Yearly)]
    view: CliViewMode,
    #[arg(long, help = "Write the full monthly series as CSV to this path")]
    csv: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct WealthPayload {
    currency: Option<String>,
    initial_amount: Option<f64>,
    interest_rate: Option<f64>,
    years: Option<u32>,
    months: Option<u32>,
    deposit_amount: Option<f64>,
    #[serde(alias = "depositFrequency")]
    deposit_freq: Option<u32>,
    deposit_increase: Option<f64>,
    withdrawal_amount: Option<f64>,
    #[serde(alias = "withdrawalFrequency")]
    withdrawal_freq: Option<u32>,
    withdrawal_increase: Option<f64>,
    #[serde(alias = "view")]
    view_mode: Option<ViewMode>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct FirePayload {
    currency: Option<String>,
    #[serde(alias = "startAge")]
    age: Option<f64>,
    current_savings: Option<f64>,
    monthly_savings: Option<f64>,
    annual_spending: Option<f64>,
    other_income: Option<f64>,
    #[serde(alias = "safeWithdrawalRate")]
    swr: Option<f64>,
    expected_return: Option<f64>,
    #[serde(alias = "view")]
    view_mode: Option<ViewMode>,
}

#[derive(Debug)]
struct WealthRequest {
    currency: String,
    view: ViewMode,
    params: WealthParams,
}

#[derive(Debug)]
struct FireRequest {
    currency: String,
    view: ViewMode,
    params: FireParams,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WealthDisplay {
    future_value: String,
    total_interest: String,
    rate_of_return: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WealthResponse {
    currency: String,
    view: ViewMode,
    summary: WealthSummary,
    display: WealthDisplay,
    chart: ChartSeries,
    table: Vec<WealthRow>,
    records: Vec<WealthPeriod>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FireDisplay {
    fire_number: String,
    fire_age: String,
    years_to_fire: String,
    status: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FireResponse {
    currency: String,
    view: ViewMode,
    summary: FireSummary,
    display: FireDisplay,
    chart: ChartSeries,
    table: Vec<FireRow>,
    records: Vec<FirePeriod>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

/// Replaces NaN and infinities with zero, the way blank or unparsable form
/// fields are treated.
fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

fn build_wealth_params(args: &WealthArgs) -> Result<WealthParams, String> {
    let initial_amount = finite_or_zero(args.initial_amount);
    let deposit_amount = finite_or_zero(args.deposit_amount);
    let withdrawal_amount = finite_or_zero(args.withdrawal_amount);

    if initial_amount < 0.0 {
        return Err("--initial-amount must be >= 0".to_string());
    }

    if deposit_amount < 0.0 {
        return Err("--deposit-amount must be >= 0".to_string());
    }

    if withdrawal_amount < 0.0 {
        return Err("--withdrawal-amount must be >= 0".to_string());
    }

    if args.years > MAX_YEARS {
        return Err(format!("--years must be <= {MAX_YEARS}"));
    }

    if args.months > 11 {
        return Err("--months must be between 0 and 11".to_string());
    }

    let deposit_frequency = Frequency::per_year(args.deposit_frequency)
        .map_err(|e| format!("--deposit-frequency: {e}"))?;
    let withdrawal_frequency = Frequency::per_year(args.withdrawal_frequency)
        .map_err(|e| format!("--withdrawal-frequency: {e}"))?;

    Ok(WealthParams {
        initial_amount,
        annual_rate: finite_or_zero(args.interest_rate) / 100.0,
        total_months: args.years * 12 + args.months,
        deposit_amount,
        deposit_frequency,
        deposit_annual_increase: finite_or_zero(args.deposit_increase) / 100.0,
        withdrawal_amount,
        withdrawal_frequency,
        withdrawal_annual_increase: finite_or_zero(args.withdrawal_increase) / 100.0,
    })
}

fn build_fire_params(args: &FireArgs) -> Result<FireParams, String> {
    let start_age = finite_or_zero(args.age);
    let current_savings = finite_or_zero(args.current_savings);

    if start_age < 0.0 {
        return Err("--age must be >= 0".to_string());
    }

    if current_savings < 0.0 {
        return Err("--current-savings must be >= 0".to_string());
    }

    Ok(FireParams {
        start_age,
        current_savings,
        monthly_savings: finite_or_zero(args.monthly_savings),
        annual_spending: finite_or_zero(args.annual_spending),
        other_income: finite_or_zero(args.other_income),
        safe_withdrawal_rate: finite_or_zero(args.swr) / 100.0,
        expected_annual_return: finite_or_zero(args.expected_return) / 100.0,
    })
}

fn wealth_request_from_args(args: &WealthArgs) -> Result<WealthRequest, String> {
    Ok(WealthRequest {
        currency: args.currency.clone(),
        view: args.view.into(),
        params: build_wealth_params(args)?,
    })
}

fn fire_request_from_args(args: &FireArgs) -> Result<FireRequest, String> {
    Ok(FireRequest {
        currency: args.currency.clone(),
        view: args.view.into(),
        params: build_fire_params(args)?,
    })
}

fn default_wealth_args() -> WealthArgs {
    WealthArgs {
        currency: "$".to_string(),
        initial_amount: 10_000.0,
        interest_rate: 7.0,
        years: 10,
        months: 0,
        deposit_amount: 0.0,
        deposit_frequency: 12,
        deposit_increase: 0.0,
        withdrawal_amount: 0.0,
        withdrawal_frequency: 12,
        withdrawal_increase: 0.0,
        view: CliViewMode::Yearly,
        csv: None,
    }
}

fn default_fire_args() -> FireArgs {
    FireArgs {
        currency: "$".to_string(),
        age: 30.0,
        current_savings: 50_000.0,
        monthly_savings: 2_000.0,
        annual_spending: 40_000.0,
        other_income: 0.0,
        swr: 4.0,
        expected_return: 7.0,
        view: CliViewMode::Yearly,
        csv: None,
    }
}

fn wealth_request_from_payload(payload: WealthPayload) -> Result<WealthRequest, String> {
    let mut args = default_wealth_args();

    if let Some(v) = payload.currency {
        args.currency = v;
    }
    if let Some(v) = payload.initial_amount {
        args.initial_amount = v;
    }
    if let Some(v) = payload.interest_rate {
        args.interest_rate = v;
    }
    if let Some(v) = payload.years {
        args.years = v;
    }
    if let Some(v) = payload.months {
        args.months = v;
    }
    if let Some(v) = payload.deposit_amount {
        args.deposit_amount = v;
    }
    if let Some(v) = payload.deposit_freq {
        args.deposit_frequency = v;
    }
    if let Some(v) = payload.deposit_increase {
        args.deposit_increase = v;
    }
    if let Some(v) = payload.withdrawal_amount {
        args.withdrawal_amount = v;
    }
    if let Some(v) = payload.withdrawal_freq {
        args.withdrawal_frequency = v;
    }
    if let Some(v) = payload.withdrawal_increase {
        args.withdrawal_increase = v;
    }
    if let Some(v) = payload.view_mode {
        args.view = v.into();
    }

    wealth_request_from_args(&args)
}

fn fire_request_from_payload(payload: FirePayload) -> Result<FireRequest, String> {
    let mut args = default_fire_args();

    if let Some(v) = payload.currency {
        args.currency = v;
    }
    if let Some(v) = payload.age {
        args.age = v;
    }
    if let Some(v) = payload.current_savings {
        args.current_savings = v;
    }
    if let Some(v) = payload.monthly_savings {
        args.monthly_savings = v;
    }
    if let Some(v) = payload.annual_spending {
        args.annual_spending = v;
    }
    if let Some(v) = payload.other_income {
        args.other_income = v;
    }
    if let Some(v) = payload.swr {
        args.swr = v;
    }
    if let Some(v) = payload.expected_return {
        args.expected_return = v;
    }
    if let Some(v) = payload.view_mode {
        args.view = v.into();
    }

    fire_request_from_args(&args)
}

fn build_wealth_response(request: WealthRequest) -> WealthResponse {
    let projection = project_wealth(&request.params);
    let summary = WealthSummary::from_projection(&projection);
    let currency = request.currency;

    WealthResponse {
        display: WealthDisplay {
            future_value: format_money(&currency, summary.future_value, 2),
            total_interest: format_money(&currency, summary.total_interest, 2),
            rate_of_return: format!("{:.2}%", summary.rate_of_return_percent),
        },
        currency,
        view: request.view,
        summary,
        chart: wealth_chart(&projection.records, request.view),
        table: wealth_rows(&projection.records, request.view),
        records: projection.records,
    }
}

fn build_fire_response(request: FireRequest) -> Result<FireResponse, String> {
    let projection = project_fire(&request.params).map_err(|e| e.to_string())?;
    let summary = FireSummary::from_projection(&projection);
    let currency = request.currency;

    let status = match summary.outcome {
        FireOutcome::Reached { .. } => format!(
            "Reaches FIRE at age {:.1} after {:.1} years",
            summary.fire_age, summary.years_to_fire
        ),
        FireOutcome::CeilingHit { final_balance } => format!(
            "Never reaches FIRE by age {FIRE_AGE_CEILING} (balance {})",
            format_money(&currency, final_balance, 0)
        ),
    };

    Ok(FireResponse {
        display: FireDisplay {
            fire_number: format_money(&currency, summary.fire_number, 0),
            fire_age: format!("{:.1}", summary.fire_age),
            years_to_fire: format!("{:.1}", summary.years_to_fire),
            status,
        },
        currency,
        view: request.view,
        summary,
        chart: fire_chart(&projection.records, request.view),
        table: fire_rows(&projection.records, request.view),
        records: projection.records,
    })
}

fn render_wealth_text(report: &WealthResponse) -> String {
    let currency = report.currency.as_str();
    let mut out = String::new();
    out.push_str(&format!("Future value:    {}\n", report.display.future_value));
    out.push_str(&format!("Total interest:  {}\n", report.display.total_interest));
    out.push_str(&format!("Rate of return:  {}\n\n", report.display.rate_of_return));

    let period_heading = match report.view {
        ViewMode::Monthly => "Month",
        ViewMode::Yearly => "Year",
    };
    out.push_str(&format!(
        "{period_heading:>6} {:>16} {:>16} {:>18} {:>18}\n",
        "Interest", "Net Flow", "Cumul. Deposits", "Balance"
    ));
    for row in &report.table {
        out.push_str(&format!(
            "{:>6} {:>16} {:>16} {:>18} {:>18}\n",
            row.period,
            format_money(currency, row.interest, 2),
            format_money(currency, row.net_flow, 2),
            format_money(currency, row.cumulative_net_principal, 2),
            format_money(currency, row.balance, 2),
        ));
    }
    out
}

fn render_fire_text(report: &FireResponse) -> String {
    let currency = report.currency.as_str();
    let mut out = String::new();
    out.push_str(&format!("FIRE number:     {}\n", report.display.fire_number));
    out.push_str(&format!("FIRE age:        {}\n", report.display.fire_age));
    out.push_str(&format!("Years to FIRE:   {}\n", report.display.years_to_fire));
    out.push_str(&format!("{}\n\n", report.display.status));

    let label_heading = match report.view {
        ViewMode::Monthly => "Month",
        ViewMode::Yearly => "Age",
    };
    out.push_str(&format!(
        "{label_heading:>6} {:>16} {:>16} {:>18}\n",
        "Invested", "Interest", "Balance"
    ));
    for row in &report.table {
        out.push_str(&format!(
            "{:>6} {:>16} {:>16} {:>18}\n",
            row.label,
            format_money(currency, row.invested, 0),
            format_money(currency, row.interest, 0),
            format_money(currency, row.balance, 0),
        ));
    }
    out
}

fn write_csv(path: &Path, contents: &str) -> Result<(), String> {
    fs::write(path, contents).map_err(|e| format!("failed to write {}: {e}", path.display()))?;
    tracing::info!(path = %path.display(), "wrote CSV export");
    Ok(())
}

pub async fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Command::Wealth(args) => {
            let report = build_wealth_response(wealth_request_from_args(&args)?);
            print!("{}", render_wealth_text(&report));
            if let Some(path) = &args.csv {
                write_csv(path, &wealth_csv(&report.records))?;
            }
            Ok(())
        }
        Command::Fire(args) => {
            let report = build_fire_response(fire_request_from_args(&args)?)?;
            print!("{}", render_fire_text(&report));
            if let Some(path) = &args.csv {
                write_csv(path, &fire_csv(&report.records))?;
            }
            Ok(())
        }
        Command::Serve { port } => run_http_server(port)
            .await
            .map_err(|e| format!("Server error: {e}")),
    }
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route(
            "/api/wealth",
            get(wealth_get_handler).post(wealth_post_handler),
        )
        .route("/api/wealth/csv", get(wealth_csv_handler))
        .route("/api/fire", get(fire_get_handler).post(fire_post_handler))
        .route("/api/fire/csv", get(fire_csv_handler))
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "projection HTTP API listening");
    tracing::info!("local access: http://127.0.0.1:{port}/api/wealth");

    axum::serve(listener, app).await
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn wealth_get_handler(Query(payload): Query<WealthPayload>) -> Response {
    wealth_handler_impl(payload)
}

async fn wealth_post_handler(Json(payload): Json<WealthPayload>) -> Response {
    wealth_handler_impl(payload)
}

async fn wealth_csv_handler(Query(payload): Query<WealthPayload>) -> Response {
    wealth_csv_impl(payload)
}

async fn fire_get_handler(Query(payload): Query<FirePayload>) -> Response {
    fire_handler_impl(payload)
}

async fn fire_post_handler(Json(payload): Json<FirePayload>) -> Response {
    fire_handler_impl(payload)
}

async fn fire_csv_handler(Query(payload): Query<FirePayload>) -> Response {
    fire_csv_impl(payload)
}

fn wealth_handler_impl(payload: WealthPayload) -> Response {
    match wealth_request_from_payload(payload) {
        Ok(request) => json_response(StatusCode::OK, build_wealth_response(request)),
        Err(msg) => bad_request(&msg),
    }
}

fn wealth_csv_impl(payload: WealthPayload) -> Response {
    match wealth_request_from_payload(payload) {
        Ok(request) => {
            let projection = project_wealth(&request.params);
            csv_response(WEALTH_CSV_FILENAME, wealth_csv(&projection.records))
        }
        Err(msg) => bad_request(&msg),
    }
}

fn fire_handler_impl(payload: FirePayload) -> Response {
    match fire_request_from_payload(payload).and_then(build_fire_response) {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(msg) => bad_request(&msg),
    }
}

fn fire_csv_impl(payload: FirePayload) -> Response {
    let projection = fire_request_from_payload(payload)
        .and_then(|request| project_fire(&request.params).map_err(|e| e.to_string()));
    match projection {
        Ok(projection) => csv_response(FIRE_CSV_FILENAME, fire_csv(&projection.records)),
        Err(msg) => bad_request(&msg),
    }
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    with_cache_control((status, Json(body)))
}

fn csv_response(filename: &str, body: String) -> Response {
    with_cache_control((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    ))
}

fn bad_request(msg: &str) -> Response {
    tracing::warn!(error = msg, "rejected projection request");
    error_response(StatusCode::BAD_REQUEST, msg)
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn wealth_request_from_json(json: &str) -> Result<WealthRequest, String> {
    let payload = serde_json::from_str::<WealthPayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    wealth_request_from_payload(payload)
}

#[cfg(test)]
fn fire_request_from_json(json: &str) -> Result<FireRequest, String> {
    let payload = serde_json::from_str::<FirePayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    fire_request_from_payload(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Uri;

    const EPS: f64 = 1e-9;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn cli_parses_wealth_subcommand_flags() {
        let cli = Cli::try_parse_from([
            "fincalc",
            "wealth",
            "--initial-amount",
            "2500",
            "--interest-rate",
            "-1.5",
            "--years",
            "3",
            "--months",
            "6",
            "--deposit-frequency",
            "4",
            "--view",
            "monthly",
        ])
        .expect("valid command line");

        let Command::Wealth(args) = cli.command else {
            panic!("expected wealth subcommand");
        };
        let request = wealth_request_from_args(&args).expect("valid inputs");
        assert_eq!(request.view, ViewMode::Monthly);
        assert_eq!(request.params.total_months, 42);
        assert_approx(request.params.annual_rate, -0.015);
        assert_eq!(request.params.deposit_frequency, Frequency::QUARTERLY);
    }

    #[test]
    fn cli_parses_serve_port() {
        let cli = Cli::try_parse_from(["fincalc", "serve", "9090"]).expect("valid command line");
        assert!(matches!(cli.command, Command::Serve { port: 9090 }));
    }

    #[test]
    fn build_wealth_params_converts_percentages() {
        let mut args = default_wealth_args();
        args.interest_rate = 12.0;
        args.deposit_increase = 3.0;
        args.withdrawal_increase = 2.5;
        args.years = 2;
        args.months = 5;

        let params = build_wealth_params(&args).expect("valid inputs");
        assert_approx(params.annual_rate, 0.12);
        assert_approx(params.deposit_annual_increase, 0.03);
        assert_approx(params.withdrawal_annual_increase, 0.025);
        assert_eq!(params.total_months, 29);
    }

    #[test]
    fn build_wealth_params_rejects_invalid_frequency() {
        for freq in [0, 5, 7, 24] {
            let mut args = default_wealth_args();
            args.deposit_frequency = freq;
            let err = build_wealth_params(&args).expect_err("must reject frequency");
            assert!(err.contains("--deposit-frequency"), "{err}");
        }

        let mut args = default_wealth_args();
        args.withdrawal_frequency = 0;
        let err = build_wealth_params(&args).expect_err("must reject frequency");
        assert!(err.contains("--withdrawal-frequency"));
    }

    #[test]
    fn build_wealth_params_accepts_every_divisor_of_twelve() {
        for freq in [1, 2, 3, 4, 6, 12] {
            let mut args = default_wealth_args();
            args.deposit_frequency = freq;
            args.withdrawal_frequency = freq;
            let params = build_wealth_params(&args).expect("valid frequency");
            assert_eq!(params.deposit_frequency.times_per_year(), freq);
        }
    }

    #[test]
    fn build_wealth_params_rejects_negative_amounts() {
        let mut args = default_wealth_args();
        args.withdrawal_amount = -10.0;
        let err = build_wealth_params(&args).expect_err("must reject negative amount");
        assert!(err.contains("--withdrawal-amount"));

        let mut args = default_wealth_args();
        args.months = 12;
        let err = build_wealth_params(&args).expect_err("must reject 12 extra months");
        assert!(err.contains("--months"));
    }

    #[test]
    fn build_params_sanitize_non_finite_values() {
        let mut args = default_wealth_args();
        args.initial_amount = f64::NAN;
        args.interest_rate = f64::INFINITY;
        args.deposit_increase = f64::NEG_INFINITY;

        let params = build_wealth_params(&args).expect("sanitized inputs");
        assert_approx(params.initial_amount, 0.0);
        assert_approx(params.annual_rate, 0.0);
        assert_approx(params.deposit_annual_increase, 0.0);

        let mut args = default_fire_args();
        args.monthly_savings = f64::NAN;
        args.expected_return = f64::INFINITY;
        let params = build_fire_params(&args).expect("sanitized inputs");
        assert_approx(params.monthly_savings, 0.0);
        assert_approx(params.expected_annual_return, 0.0);
    }

    #[test]
    fn wealth_request_from_json_parses_web_keys() {
        let json = r#"{
          "currency": "€",
          "initialAmount": 1000,
          "interestRate": 12,
          "years": 1,
          "months": 0,
          "depositAmount": 100,
          "depositFreq": 1,
          "depositIncrease": 0,
          "withdrawalAmount": 0,
          "withdrawalFrequency": 12,
          "viewMode": "monthly"
        }"#;
        let request = wealth_request_from_json(json).expect("json should parse");
        assert_eq!(request.currency, "€");
        assert_eq!(request.view, ViewMode::Monthly);
        assert_eq!(request.params.total_months, 12);
        assert_eq!(request.params.deposit_frequency, Frequency::ANNUAL);
        assert_eq!(request.params.withdrawal_frequency, Frequency::MONTHLY);
        assert_approx(request.params.annual_rate, 0.12);
    }

    #[test]
    fn wealth_query_string_overrides_defaults() {
        let uri: Uri = "/api/wealth?years=2&depositAmount=50&depositFreq=4&viewMode=yearly"
            .parse()
            .expect("valid uri");
        let Query(payload) =
            Query::<WealthPayload>::try_from_uri(&uri).expect("query should parse");
        let request = wealth_request_from_payload(payload).expect("valid inputs");
        assert_eq!(request.params.total_months, 24);
        assert_approx(request.params.deposit_amount, 50.0);
        assert_approx(request.params.initial_amount, 10_000.0);
        assert_eq!(request.params.deposit_frequency, Frequency::QUARTERLY);
    }

    #[test]
    fn fire_request_from_json_parses_web_keys() {
        let json = r#"{
          "age": 42,
          "currentSavings": 150000,
          "monthlySavings": 1500,
          "annualSpending": 36000,
          "otherIncome": 6000,
          "swr": 3.5,
          "expectedReturn": 5
        }"#;
        let request = fire_request_from_json(json).expect("json should parse");
        assert_approx(request.params.start_age, 42.0);
        assert_approx(request.params.current_savings, 150_000.0);
        assert_approx(request.params.safe_withdrawal_rate, 0.035);
        assert_approx(request.params.expected_annual_return, 0.05);
        assert_eq!(request.view, ViewMode::Yearly);
    }

    #[test]
    fn fire_response_rejects_zero_withdrawal_rate() {
        let request = fire_request_from_json(r#"{"swr": 0}"#).expect("json should parse");
        let err = build_fire_response(request).expect_err("undefined target");
        assert!(err.contains("positive safe withdrawal rate"), "{err}");
    }

    #[test]
    fn fire_response_reports_ceiling_outcome() {
        let request = fire_request_from_json(
            r#"{"age": 60, "currentSavings": 1000, "monthlySavings": 0, "expectedReturn": 0}"#,
        )
        .expect("json should parse");
        let response = build_fire_response(request).expect("valid projection");
        assert!(response.display.status.starts_with("Never reaches FIRE by age 100"));
        assert_eq!(response.records.len(), 40 * 12 + 1);

        let json = serde_json::to_string(&response).expect("response should serialize");
        assert!(json.contains("\"status\":\"ceiling-hit\""));
        assert!(json.contains("\"finalBalance\""));
    }

    #[test]
    fn wealth_response_serialization_contains_expected_fields() {
        let request = wealth_request_from_json(r#"{"years": 3, "depositAmount": 100}"#)
            .expect("json should parse");
        let response = build_wealth_response(request);
        assert_eq!(response.records.len(), 36);
        assert_eq!(response.table.len(), 3);

        let json = serde_json::to_string(&response).expect("response should serialize");
        for key in [
            "\"summary\"",
            "\"futureValue\"",
            "\"rateOfReturnPercent\"",
            "\"chart\"",
            "\"labels\"",
            "\"table\"",
            "\"records\"",
            "\"accruedInterest\"",
            "\"cumulativeNetPrincipal\"",
            "\"periodFlowToDate\"",
        ] {
            assert!(json.contains(key), "missing {key}");
        }
    }

    #[test]
    fn fire_response_serialization_contains_expected_fields() {
        let request = fire_request_from_json("{}").expect("json should parse");
        let response = build_fire_response(request).expect("valid projection");
        let json = serde_json::to_string(&response).expect("response should serialize");
        for key in [
            "\"fireNumber\"",
            "\"status\":\"reached\"",
            "\"monthsToReach\"",
            "\"totalInvested\"",
            "\"display\"",
        ] {
            assert!(json.contains(key), "missing {key}");
        }
        assert_eq!(response.display.fire_number, "$1,000,000");
    }

    #[test]
    fn handlers_map_validation_errors_to_bad_request() {
        let payload = WealthPayload {
            deposit_freq: Some(5),
            ..WealthPayload::default()
        };
        let response = wealth_handler_impl(payload);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let payload = FirePayload {
            swr: Some(-1.0),
            ..FirePayload::default()
        };
        let response = fire_handler_impl(payload);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).map(|v| v.as_bytes()),
            Some(&b"no-store"[..])
        );
    }

    #[test]
    fn csv_handlers_return_attachments() {
        let response = wealth_csv_impl(WealthPayload::default());
        assert_eq!(response.status(), StatusCode::OK);
        let disposition = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .expect("content disposition");
        assert!(disposition.contains("wealth_projection.csv"));

        let response = fire_csv_impl(FirePayload::default());
        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .expect("content type");
        assert!(content_type.starts_with("text/csv"));
    }

    #[test]
    fn rendered_text_lists_summary_and_rows() {
        let request = wealth_request_from_json(r#"{"years": 2}"#).expect("json should parse");
        let text = render_wealth_text(&build_wealth_response(request));
        assert!(text.starts_with("Future value:"));
        assert!(text.contains("Cumul. Deposits"));
        // 3 summary lines, a blank line, the heading and one row per year.
        assert_eq!(text.lines().count(), 4 + 1 + 2);

        let request = fire_request_from_json(r#"{"viewMode": "monthly", "currentSavings": 2000000}"#)
            .expect("json should parse");
        let text = render_fire_text(&build_fire_response(request).expect("valid projection"));
        assert!(text.contains("Reaches FIRE at age 30.0 after 0.0 years"));
        assert!(text.contains("Month"));
    }
}
