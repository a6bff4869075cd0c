use clap::{Parser, Subcommand};
use coinvend::application::engine::VendingEngine;
use coinvend::domain::item::Item;
use coinvend::domain::ports::{AuditSinkBox, InventoryStoreBox};
use coinvend::infrastructure::audit_file::FileAuditLog;
use coinvend::infrastructure::flat_file::FileInventoryStore;
use coinvend::interfaces::csv::receipt_writer::write_items;
use coinvend::interfaces::csv::script::run_script;
use miette::{IntoDiagnostic, Result};
use rust_decimal::Decimal;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Inventory record file (`slot::name::quantity::price` per line). Must exist.
    #[arg(long, default_value = "inventory.txt")]
    inventory: PathBuf,

    /// Audit log file, appended to on every change.
    #[arg(long, default_value = "audit.txt")]
    audit: PathBuf,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List items that are in stock
    List,
    /// Show the item at a slot, including empty slots
    Show { slot: String },
    /// Stock a new slot
    Add {
        slot: String,
        name: String,
        price: Decimal,
        quantity: u32,
    },
    /// Replace the item at a slot
    Update {
        slot: String,
        name: String,
        price: Decimal,
        quantity: u32,
        /// Move the item to another slot
        #[arg(long)]
        new_slot: Option<String>,
    },
    /// Remove the item at a slot
    Remove { slot: String },
    /// Run a CSV script of insert/purchase/refund commands
    Vend { script: PathBuf },
}

#[cfg(feature = "storage-rocksdb")]
fn open_inventory(cli: &Cli) -> Result<InventoryStoreBox> {
    use coinvend::infrastructure::rocksdb::RocksDbInventoryStore;

    match &cli.db_path {
        Some(db_path) => {
            let store = RocksDbInventoryStore::open(db_path).into_diagnostic()?;
            Ok(Box::new(store))
        }
        None => Ok(Box::new(FileInventoryStore::new(&cli.inventory))),
    }
}

#[cfg(not(feature = "storage-rocksdb"))]
fn open_inventory(cli: &Cli) -> Result<InventoryStoreBox> {
    if let Some(db_path) = &cli.db_path {
        tracing::warn!(
            db_path = %db_path.display(),
            "Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to the inventory file."
        );
    }
    Ok(Box::new(FileInventoryStore::new(&cli.inventory)))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let inventory = open_inventory(&cli)?;
    let audit: AuditSinkBox = Box::new(FileAuditLog::new(&cli.audit));
    let engine = VendingEngine::new(inventory, audit);

    match cli.command {
        Command::List => {
            let items = engine.list_available_items().await.into_diagnostic()?;
            write_items(io::stdout().lock(), &items).into_diagnostic()?;
        }
        Command::Show { slot } => {
            let item = engine.get_item(&slot).await.into_diagnostic()?;
            write_items(io::stdout().lock(), &[item]).into_diagnostic()?;
        }
        Command::Add {
            slot,
            name,
            price,
            quantity,
        } => {
            let item = Item::new(&slot, name, price, quantity);
            engine.create_item(item.clone()).await.into_diagnostic()?;
            write_items(io::stdout().lock(), &[item]).into_diagnostic()?;
        }
        Command::Update {
            slot,
            name,
            price,
            quantity,
            new_slot,
        } => {
            let target = new_slot.as_deref().unwrap_or(&slot);
            let item = Item::new(target, name, price, quantity);
            let updated = engine.update_item(&slot, item).await.into_diagnostic()?;
            write_items(io::stdout().lock(), &[updated]).into_diagnostic()?;
        }
        Command::Remove { slot } => {
            let removed = engine.delete_item(&slot).await.into_diagnostic()?;
            write_items(io::stdout().lock(), &[removed]).into_diagnostic()?;
        }
        Command::Vend { script } => {
            let file = File::open(script).into_diagnostic()?;
            let summary = run_script(&engine, file, io::stdout().lock())
                .await
                .into_diagnostic()?;
            info!(
                accepted = summary.accepted,
                rejected = summary.rejected,
                unreadable = summary.unreadable,
                "Script finished"
            );
        }
    }

    Ok(())
}
