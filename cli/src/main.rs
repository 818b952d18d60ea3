mod report;
mod tui;

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tiffin_core::model::order::fields::STANDARD_HEADERS;
use tiffin_core::repository::UnavailableSink;
use tiffin_core::time::parse_weekday_str;
use tiffin_core::usecase::weekly_order::WeeklyOrderUseCase;
use tiffin_core::{
    current_week_window, load_catalog, AppConfig, CsvOrderSink, OrderDraft, OrderService, SinkKind, SubmitOutcome,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tiffin")]
#[command(about = "Weekly tiffin ordering", long_about = None)]
struct Cli {
    /// Menu file (overrides TIFFIN_MENU_FILE)
    #[arg(long, global = true)]
    menu: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Show the dates open for ordering
    Week,
    /// Show the menu, optionally for a single weekday
    Menu {
        #[arg(long)]
        day: Option<String>,
    },
    /// Price an order file without submitting it
    Quote {
        order: PathBuf,
    },
    /// Validate an order file and send it to the order sheet
    Submit {
        order: PathBuf,
    },
    /// Create the local order sheet with the standard header row
    InitSheet,
    /// Open the interactive order form
    Form,
}

fn init_logging(config: &AppConfig, to_file: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if to_file {
        // The form owns the terminal, so logs go to a file instead
        let dir = config.data_dir.clone().unwrap_or_else(std::env::temp_dir);
        std::fs::create_dir_all(&dir)?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join("tiffin.log"))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = AppConfig::from_env()?;
    if let Some(menu) = cli.menu {
        config.menu_file = menu;
    }

    let interactive = matches!(cli.command, None | Some(Commands::Form));
    init_logging(&config, interactive)?;

    match cli.command {
        Some(Commands::Week) => {
            report::print_week(&current_week_window());
        }
        Some(Commands::Menu { day }) => {
            let catalog = load_catalog(&config.menu_file)?;
            let day = day.map(|d| parse_weekday_str(&d)).transpose()?;
            report::print_menu(&catalog, &config.features, day);
        }
        Some(Commands::Quote { order }) => {
            let draft = OrderDraft::load(&order)?;
            let catalog = load_catalog(&config.menu_file)?;
            let sink = UnavailableSink::new("quotes are never submitted");
            let service = OrderService::new(catalog, config.features.clone(), sink, config.destination());
            let usecase = WeeklyOrderUseCase::new(&service, current_week_window());
            let totals = usecase.quote_draft(&draft)?;
            report::print_quote(&totals);
        }
        Some(Commands::Submit { order }) => {
            let draft = OrderDraft::load(&order)?;
            let catalog = load_catalog(&config.menu_file)?;
            let sink = config.build_sink().context("Order sheet is not configured")?;
            let service = OrderService::new(catalog, config.features.clone(), sink, config.destination());
            let usecase = WeeklyOrderUseCase::new(&service, current_week_window());

            println!("Submitting your order to the kitchen...");
            match usecase.submit_draft(&draft)? {
                SubmitOutcome::Submitted(record) => {
                    println!("Order submitted successfully! Your tiffin order has been sent to the kitchen.");
                    println!("  Order ID: {}", record.order_id);
                    println!("  Total: ₹{}", record.total_price);
                }
                SubmitOutcome::Rejected(err) => {
                    println!("Error: {}", err);
                }
                SubmitOutcome::SinkFailed(_) => {
                    println!("Failed to submit order. Please try again or contact support if the problem persists.");
                }
            }
        }
        Some(Commands::InitSheet) => {
            if config.sink != SinkKind::Csv {
                println!("init-sheet only applies to the local CSV order sheet (TIFFIN_SINK=csv).");
                return Ok(());
            }
            let sink = CsvOrderSink::new(config.data_dir.clone())?;
            let path = sink.init_worksheet(&config.destination(), &STANDARD_HEADERS)?;
            info!(path = %path.display(), "order sheet ready");
            println!("Order sheet ready: {}", path.display());
        }
        Some(Commands::Form) | None => {
            // A broken menu stops here, before any part of the form is drawn
            let catalog = load_catalog(&config.menu_file)?;
            let service = OrderService::new(
                catalog,
                config.features.clone(),
                config.build_sink_or_unavailable(),
                config.destination(),
            );
            tui::run(service, current_week_window())?;
        }
    }
    Ok(())
}
