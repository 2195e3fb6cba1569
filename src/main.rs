use chrono::Local;
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tabled::{settings::Style, Table, Tabled};

use commissions::commission::{month_name, AccountGroup, FilterChange, Filters, ViewMode};
use commissions::config::{config_dir, init_config_dir, resolve_config, Config};
use commissions::error::{CommissionsError, Result};
use commissions::report::{format_money, ReportView};
use commissions::{CommissionSource, CommissionsPage, HttpCommissionService, LoadState};

#[derive(Parser)]
#[command(name = "commissions")]
#[command(version, about = "Commissions dashboard for the CRM REST API", long_about = None)]
struct Cli {
    /// Path to config directory (default: ~/.commissions or XDG config)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    /// Log load progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config directory with a template config.toml
    Init,

    /// Show commissions summary, breakdown and related accounts
    Report(ReportArgs),

    /// Like report, reloading at a fixed interval
    Watch {
        #[command(flatten)]
        report: ReportArgs,

        /// Seconds between reloads (default: watch.interval_secs)
        #[arg(long)]
        interval: Option<u64>,

        /// Stop after this many loads
        #[arg(long)]
        count: Option<usize>,
    },

    /// List the years that have commissions
    Years {
        /// Sales rep id (default: report.default_user_id)
        #[arg(short, long)]
        user: Option<i64>,
    },

    /// Show the resolved configuration
    Config,
}

#[derive(Args)]
struct ReportArgs {
    /// Sales rep id (default: report.default_user_id)
    #[arg(short, long)]
    user: Option<i64>,

    /// Aggregation granularity (default: report.default_view)
    #[arg(long, value_enum)]
    view: Option<ViewMode>,

    /// Year for monthly and weekly views (default: this year)
    #[arg(long)]
    year: Option<i32>,

    /// Month (1-12) for the weekly view (default: this month)
    #[arg(long)]
    month: Option<u32>,

    /// First year of the yearly view (default: four years ago)
    #[arg(long)]
    from_year: Option<i32>,

    /// Last year of the yearly view (default: this year)
    #[arg(long)]
    to_year: Option<i32>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    if verbose {
        env_logger::builder().filter_level(LevelFilter::Info).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
            .init();
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Determine config directory
    let cfg_dir = match cli.config_dir {
        Some(p) => p,
        None => config_dir()?,
    };

    match cli.command {
        Commands::Init => cmd_init(&cfg_dir),
        Commands::Report(args) => cmd_report(&cfg_dir, &args),
        Commands::Watch {
            report,
            interval,
            count,
        } => cmd_watch(&cfg_dir, &report, interval, count),
        Commands::Years { user } => cmd_years(&cfg_dir, user),
        Commands::Config => cmd_config(&cfg_dir),
    }
}

/// Initialize config directory with the template config
fn cmd_init(cfg_dir: &Path) -> Result<()> {
    let path = init_config_dir(cfg_dir)?;

    println!("Initialized commissions config at: {}", cfg_dir.display());
    println!();
    println!("Next steps:");
    println!("  1. Point it at your API:  $EDITOR {}", path.display());
    println!("  2. Show your commissions: commissions report --user <id>");

    Ok(())
}

fn resolve_user(user: Option<i64>, config: &Config) -> Result<i64> {
    user.or(config.report.default_user_id)
        .ok_or(CommissionsError::MissingUser)
}

/// Build the filter selection from today's date, config defaults and flags
fn resolve_filters(args: &ReportArgs, config: &Config) -> Result<Filters> {
    let today = Local::now().date_naive();
    let mut filters = Filters::for_date(today, config.report.default_view);

    let changes = [
        args.view.map(FilterChange::ViewMode),
        args.year.map(FilterChange::Year),
        args.month.map(FilterChange::Month),
        args.from_year.map(FilterChange::FromYear),
        args.to_year.map(FilterChange::ToYear),
    ];
    for change in changes.into_iter().flatten() {
        filters = filters.apply(change);
    }

    filters.validate()?;
    Ok(filters)
}

fn prepare(cfg_dir: &Path, args: &ReportArgs) -> Result<(Config, CommissionsPage)> {
    let config = resolve_config(cfg_dir)?;
    let user_id = resolve_user(args.user, &config)?;
    let filters = resolve_filters(args, &config)?;
    Ok((config, CommissionsPage::new(user_id, filters)))
}

/// Load once and print
fn cmd_report(cfg_dir: &Path, args: &ReportArgs) -> Result<()> {
    let (config, mut page) = prepare(cfg_dir, args)?;
    let service = HttpCommissionService::from_settings(&config.api);

    page.load(&service)?;
    print_page(&page, &config, args.format)
}

/// Reload at a fixed interval. A failed load keeps showing the previous data.
fn cmd_watch(
    cfg_dir: &Path,
    args: &ReportArgs,
    interval: Option<u64>,
    count: Option<usize>,
) -> Result<()> {
    let (config, mut page) = prepare(cfg_dir, args)?;
    let service = HttpCommissionService::from_settings(&config.api);
    let interval = Duration::from_secs(interval.unwrap_or(config.watch.interval_secs));

    let mut loads = 0;
    let mut loaded_once = false;
    loop {
        loads += 1;
        if let Err(e) = page.load(&service) {
            eprintln!("Warning: {e}");
        }
        loaded_once |= page.state() == LoadState::Loaded;

        if loaded_once {
            print_page(&page, &config, args.format)?;
        } else {
            println!("No data loaded yet.");
        }

        if count.is_some_and(|c| loads >= c) {
            return Ok(());
        }
        std::thread::sleep(interval);
        println!();
    }
}

/// List the years that have commissions
fn cmd_years(cfg_dir: &Path, user: Option<i64>) -> Result<()> {
    let config = resolve_config(cfg_dir)?;
    let user_id = resolve_user(user, &config)?;
    let service = HttpCommissionService::from_settings(&config.api);

    let mut years = service.all_years(user_id)?;
    years.sort_unstable();
    years.dedup();

    if years.is_empty() {
        println!("No commission years found for sales rep {user_id}.");
        return Ok(());
    }

    for year in years {
        println!("{year}");
    }
    Ok(())
}

/// Show the resolved configuration
fn cmd_config(cfg_dir: &Path) -> Result<()> {
    let config = resolve_config(cfg_dir)?;
    let content = toml::to_string_pretty(&config).map_err(|e| {
        CommissionsError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            e.to_string(),
        ))
    })?;

    if cfg_dir.exists() {
        println!("# Config directory: {}", cfg_dir.display());
    } else {
        println!("# Config directory: {} (not found, using defaults)", cfg_dir.display());
    }
    print!("{content}");
    Ok(())
}

// Table row structs for tabled
#[derive(Tabled)]
struct PeriodRow {
    #[tabled(rename = "PERIOD")]
    period: String,
    #[tabled(rename = "COMMISSION")]
    commission: String,
}

#[derive(Tabled)]
struct InvoiceRow {
    #[tabled(rename = "INVOICE")]
    invoice: String,
    #[tabled(rename = "TOTAL")]
    total: String,
    #[tabled(rename = "COMMISSION")]
    commission: String,
    #[tabled(rename = "DATE PAID")]
    date_paid: String,
}

fn window_label(filters: &Filters) -> String {
    match filters.view_mode {
        ViewMode::Yearly => format!("{}-{}", filters.from_year, filters.to_year),
        ViewMode::Monthly => filters.selected_year.to_string(),
        ViewMode::Weekly => format!(
            "{} {}",
            month_name(filters.selected_month),
            filters.selected_year
        ),
    }
}

fn print_page(page: &CommissionsPage, config: &Config, format: OutputFormat) -> Result<()> {
    let view = ReportView::from_page(page);

    if format == OutputFormat::Json {
        let json = serde_json::to_string_pretty(&view).map_err(|e| {
            CommissionsError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                e.to_string(),
            ))
        })?;
        println!("{json}");
        return Ok(());
    }

    let symbol = &config.report.currency_symbol;

    println!(
        "Commissions for sales rep {} ({}, {})",
        view.user_id,
        view.filters.view_mode,
        window_label(view.filters)
    );
    println!("{}", "-".repeat(50));
    println!("This Month:  {}", format_money(view.summary.current_month, symbol));
    println!("This Year:   {}", format_money(view.summary.current_year, symbol));
    println!("Last Year:   {}", format_money(view.summary.last_year, symbol));
    println!("Projected:   {}", format_money(view.summary.projected, symbol));

    println!();
    println!("Commission Breakdown");
    let rows: Vec<PeriodRow> = view
        .breakdown
        .iter()
        .map(|point| PeriodRow {
            period: point.label.clone(),
            commission: format_money(point.amount, symbol),
        })
        .collect();
    if rows.is_empty() {
        println!("No periods to show.");
    } else {
        let table = Table::new(rows).with(Style::rounded()).to_string();
        println!("{table}");
    }

    println!();
    println!("Related Accounts & Invoices");
    if view.accounts.is_empty() {
        println!("No commission data available.");
    }
    for account in &view.accounts {
        print_account(account, symbol);
    }

    Ok(())
}

fn print_account(account: &AccountGroup, symbol: &str) {
    println!();
    println!("{} (account #{})", account.account_name, account.account_id);

    if account.invoices.is_empty() {
        println!("  No paid invoices.");
        return;
    }

    let rows: Vec<InvoiceRow> = account
        .invoices
        .iter()
        .map(|inv| InvoiceRow {
            invoice: format!("#{}", inv.invoice_id),
            total: format!("{}{}", symbol, inv.final_total),
            commission: format!("{}{}", symbol, inv.commission_amount),
            date_paid: inv.date_paid.clone(),
        })
        .collect();
    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");
}
