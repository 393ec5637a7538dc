use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use itsm_core::demo::DemoIncidentSource;
use itsm_core::domain::IncidentState;
use itsm_core::error::AppError;
use itsm_core::filter::DateWindow;
use itsm_core::metrics::SummaryCard;
use itsm_core::normalize::timestamps::parse_date_bound;
use itsm_core::table::SortKey;
use itsm_core::view::ViewState;
use itsm_host_lib::{load_config, local_now, render_json, DashboardHost};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum WindowArg {
    All,
    Today,
    #[value(name = "7d")]
    Last7Days,
    #[value(name = "30d")]
    Last30Days,
    Month,
    Year,
    Custom,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortArg {
    Number,
    Opened,
    ShortDescription,
    Priority,
    State,
    Category,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CardArg {
    Total,
    Open,
    InProgress,
    OnHold,
    Resolved,
    Closed,
    Overdue,
    Stale,
    Unassigned,
}

/// Render one dashboard view over a synthetic incident snapshot as JSON.
#[derive(Debug, Parser)]
#[command(name = "itsm-host", version)]
struct Args {
    /// JSON dashboard config; defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of demo incidents (overrides the config).
    #[arg(long)]
    count: Option<usize>,
    #[arg(long, value_enum, default_value = "all")]
    window: WindowArg,
    /// Custom window start, yyyy-MM-dd.
    #[arg(long)]
    from: Option<String>,
    /// Custom window end, yyyy-MM-dd.
    #[arg(long)]
    to: Option<String>,
    #[arg(long, default_value = "")]
    search: String,
    /// Sort column; repeat to flip direction.
    #[arg(long, value_enum)]
    sort: Vec<SortArg>,
    #[arg(long, default_value_t = 0)]
    page: usize,
    #[arg(long)]
    page_size: Option<usize>,
    #[arg(long, value_enum)]
    card: Option<CardArg>,
}

fn sort_key(arg: SortArg) -> SortKey {
    match arg {
        SortArg::Number => SortKey::Number,
        SortArg::Opened => SortKey::Opened,
        SortArg::ShortDescription => SortKey::ShortDescription,
        SortArg::Priority => SortKey::Priority,
        SortArg::State => SortKey::State,
        SortArg::Category => SortKey::Category,
    }
}

fn summary_card(arg: CardArg) -> SummaryCard {
    match arg {
        CardArg::Total => SummaryCard::Total,
        CardArg::Open => SummaryCard::State(IncidentState::Open),
        CardArg::InProgress => SummaryCard::State(IncidentState::InProgress),
        CardArg::OnHold => SummaryCard::State(IncidentState::OnHold),
        CardArg::Resolved => SummaryCard::State(IncidentState::Resolved),
        CardArg::Closed => SummaryCard::State(IncidentState::Closed),
        CardArg::Overdue => SummaryCard::Overdue,
        CardArg::Stale => SummaryCard::Stale,
        CardArg::Unassigned => SummaryCard::Unassigned,
    }
}

fn build_view(args: &Args, host: &DashboardHost) -> Result<ViewState, AppError> {
    let mut view = host.initial_view();

    view = match args.window {
        WindowArg::All => view.with_window(DateWindow::All),
        WindowArg::Today => view.with_window(DateWindow::Today),
        WindowArg::Last7Days => view.with_window(DateWindow::Last7Days),
        WindowArg::Last30Days => view.with_window(DateWindow::Last30Days),
        WindowArg::Month => view.with_window(DateWindow::MonthToDate),
        WindowArg::Year => view.with_window(DateWindow::YearToDate),
        WindowArg::Custom => {
            let from = parse_date_bound("from", args.from.as_deref().unwrap_or(""))?;
            let to = parse_date_bound("to", args.to.as_deref().unwrap_or(""))?;
            match view.apply_custom_range(from, to) {
                Ok(next) => next,
                // Keep the custom selection so the payload carries the prompt.
                Err(_) => view.with_window(DateWindow::Custom { from, to }),
            }
        }
    };

    for arg in &args.sort {
        view = view.toggle_sort(sort_key(*arg));
    }
    view = view.with_search(args.search.clone());
    view = view.with_card(args.card.map(summary_card));
    if let Some(size) = args.page_size {
        view = view.with_page_size(size, host.config())?;
    }
    Ok(view.with_page(args.page))
}

fn run(args: Args) -> Result<(), AppError> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(count) = args.count {
        config.demo_incident_count = count;
    }

    let now = local_now();
    let source = DemoIncidentSource::new(config.clone()).at(now);
    let host = DashboardHost::start(config, &source)?;

    let view = build_view(&args, &host)?;
    let payload = host.get_dashboard(&view, now)?;
    info!(filtered = payload.filtered_count, "rendering dashboard payload");

    println!("{}", render_json(&payload)?);
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(code = %e.code, details = ?e.details, "{}", e.message);
            ExitCode::FAILURE
        }
    }
}
