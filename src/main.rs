use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use maintdesk::lifecycle::{Clock, SystemClock, classify, term_end};
use maintdesk::sequence::SequenceSpec;
use maintdesk::view::{self, PageLink, Searchable, TableAction, TableState};
use maintdesk::{
    Customer, Desk, DeskConfig, MaintenanceAgreement, MemoryIdentityProvider, MemoryStore,
    Project, SupportTicket, open_store,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type CliDesk = Desk<MemoryStore, MemoryIdentityProvider, SystemClock>;

#[derive(Parser)]
#[command(name = "maintdesk")]
#[command(about = "Back-office tooling for customers, projects, maintenance agreements and tickets")]
struct Cli {
    /// JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Document store snapshot; overrides the config file and MAINTDESK_SNAPSHOT
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Next business id of a collection
    NextId {
        kind: Kind,
        /// Compute from this id instead of reading the snapshot
        #[arg(long)]
        last: Option<String>,
    },
    /// Lifecycle of an agreement term
    Classify {
        #[arg(long)]
        start: NaiveDate,
        /// Defaults to start + 365 days
        #[arg(long)]
        end: Option<NaiveDate>,
        /// Defaults to the local date
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// One page of a collection
    List {
        kind: Kind,
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Status report of every agreement as of today
    Agreements {
        /// Write the refreshed status back into the snapshot
        #[arg(long)]
        write: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Kind {
    Customers,
    Projects,
    Agreements,
    Tickets,
}

impl Kind {
    fn sequence(self) -> SequenceSpec {
        match self {
            Kind::Customers => SequenceSpec::CUSTOMER,
            Kind::Projects => SequenceSpec::PROJECT,
            Kind::Agreements => SequenceSpec::AGREEMENT,
            Kind::Tickets => SequenceSpec::TICKET,
        }
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(cli: &Cli) -> Result<DeskConfig> {
    let config = match &cli.config {
        Some(path) => DeskConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => DeskConfig::default(),
    };
    let config = config.with_env_overrides();
    Ok(match &cli.snapshot {
        Some(path) => config.snapshot_path(path.clone()),
        None => config,
    })
}

async fn open_desk(config: &DeskConfig) -> Result<(CliDesk, PathBuf)> {
    let path = config
        .snapshot_path
        .clone()
        .ok_or_else(|| anyhow!("No snapshot configured; pass --snapshot or set MAINTDESK_SNAPSHOT"))?;
    let store = open_store(&path)
        .await
        .with_context(|| format!("Failed to open snapshot {}", path.display()))?;

    let desk = Desk::new(store, MemoryIdentityProvider::from_config(config), SystemClock)
        .with_config(config.clone());
    Ok((desk, path))
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command {
        Command::NextId { kind, last } => next_id(&config, kind, last).await,
        Command::Classify { start, end, today } => run_classify(start, end, today),
        Command::List { kind, search, page } => list(&config, kind, search, page).await,
        Command::Agreements { write } => agreements(&config, write).await,
    }
}

async fn next_id(config: &DeskConfig, kind: Kind, last: Option<String>) -> Result<()> {
    let id = match last {
        Some(last) => kind.sequence().next(Some(&last))?,
        None => {
            let (desk, _) = open_desk(config).await?;
            match kind {
                Kind::Customers => desk.next_business_id::<Customer>().await?,
                Kind::Projects => desk.next_business_id::<Project>().await?,
                Kind::Agreements => desk.next_business_id::<MaintenanceAgreement>().await?,
                Kind::Tickets => desk.next_business_id::<SupportTicket>().await?,
            }
        }
    };
    println!("{id}");
    Ok(())
}

fn run_classify(start: NaiveDate, end: Option<NaiveDate>, today: Option<NaiveDate>) -> Result<()> {
    let end = match end {
        Some(end) => end,
        None => term_end(start)?,
    };
    let today = today.unwrap_or_else(|| SystemClock.today());
    let lifecycle = classify(start, end, today);

    println!("start:     {start}");
    println!("end:       {end}");
    println!("maturity:  {}", lifecycle.maturity);
    println!("remaining: {}", lifecycle.remaining_label());
    println!("status:    {}", lifecycle.status);
    Ok(())
}

fn table_state(config: &DeskConfig, search: String, page: usize, total: usize) -> TableState {
    let state = view::table::reduce(
        &TableState::new(config.rows_per_page),
        TableAction::Search(search),
    );
    view::table::reduce(&state, TableAction::GoTo { page, total_items: total })
}

fn print_page<T: Searchable + Clone>(items: &[T], state: &TableState, row: impl Fn(&T) -> String) {
    let page = view::visible(items, state);
    for item in &page.items {
        println!("{}", row(item));
    }

    let links: Vec<String> = view::page_links(page.current_page, page.total_pages)
        .into_iter()
        .map(|link| match link {
            PageLink::Page(n) if n == page.current_page => format!("[{n}]"),
            PageLink::Page(n) => n.to_string(),
            PageLink::Ellipsis => "...".to_string(),
        })
        .collect();
    println!("-- {} row(s), page {}", page.total_items, links.join(" "));
}

fn matching<T: Searchable>(items: &[T], search: &str) -> usize {
    view::filter(items, search).len()
}

async fn list(config: &DeskConfig, kind: Kind, search: String, page: usize) -> Result<()> {
    let (desk, _) = open_desk(config).await?;

    match kind {
        Kind::Customers => {
            let items = desk.list_customers().await?;
            let state = table_state(config, search.clone(), page, matching(&items, &search));
            print_page(&items, &state, |c| {
                let r = &c.record;
                format!(
                    "{}  {}  {}  {}",
                    r.customer_id, r.customer_name, r.tax_id_or_id_card, r.contact_name
                )
            });
        }
        Kind::Projects => {
            let items = desk.list_projects().await?;
            let state = table_state(config, search.clone(), page, matching(&items, &search));
            print_page(&items, &state, |p| {
                let r = &p.record;
                format!("{}  {}  {}", r.project_id, r.project_name, r.customer_name)
            });
        }
        Kind::Agreements => {
            let items = desk.list_agreements().await?;
            let state = table_state(config, search.clone(), page, matching(&items, &search));
            print_page(&items, &state, |row| {
                let a = &row.agreement;
                format!(
                    "{}  {}  {}  {} .. {}  {}",
                    a.ma_number, a.project_name, a.customer_name, a.start_date, a.end_date, a.status
                )
            });
        }
        Kind::Tickets => {
            let items = desk.list_tickets().await?;
            let state = table_state(config, search.clone(), page, matching(&items, &search));
            print_page(&items, &state, |t| {
                let r = &t.record;
                format!("{}  {}  {}  {}", r.ticket_id, r.ma_number, r.project_name, r.type_issue)
            });
        }
    }
    Ok(())
}

async fn agreements(config: &DeskConfig, write: bool) -> Result<()> {
    let (desk, path) = open_desk(config).await?;

    for row in desk.list_agreements().await? {
        let a = &row.agreement;
        println!(
            "{}  {:<9} {:>10}  {}  {}",
            a.ma_number,
            a.status.as_str(),
            row.lifecycle.remaining_label(),
            a.maturity,
            a.project_name
        );
    }

    if write {
        let updated = desk.refresh_stored_agreements().await?;
        save(&desk, &path).await?;
        println!("-- {updated} agreement(s) updated");
    }
    Ok(())
}

async fn save(desk: &CliDesk, path: &Path) -> Result<()> {
    desk.store()
        .save_snapshot(path)
        .await
        .with_context(|| format!("Failed to write snapshot {}", path.display()))
}
