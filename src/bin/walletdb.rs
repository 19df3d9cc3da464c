use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use graphene_wallet_store::{
    DataDir, PaymentRecord, RemoteType, StoreConfig, StoreTable, WalletStore,
};

/// Wallet database inspector
#[derive(Parser)]
#[command(name = "walletdb")]
#[command(about = "Inspect and maintain the wallet SQLite database")]
#[command(version, long_about = None)]
struct Cli {
    /// Database file path (defaults to the per-user data directory)
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    /// Only open an existing database; never create it
    #[arg(long, global = true)]
    no_create: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List stored accounts
    Accounts,

    /// List cached assets
    Assets {
        /// Only assets whose symbol starts with, or is a sub-asset of, NAME
        #[arg(long)]
        like: Option<String>,
    },

    /// Show the operation history of an account, newest first
    History {
        account: String,
    },

    /// List remote endpoints of one type
    Remotes {
        /// Remote type discriminant (0 = node, 1 = seed, 2 = gateway)
        rtype: i64,
    },

    /// List gateway payment records
    Payments {
        #[arg(long)]
        account: Option<String>,
    },

    /// Delete every row of a table
    Wipe {
        /// One of: accounts, labels, assets, history, remotes, payments
        table: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = match cli.database {
        Some(path) => StoreConfig::new(path),
        None => StoreConfig::from_data_dir(&DataDir::default())?,
    };
    if cli.no_create {
        config = config.must_exist();
    }
    let mut store = WalletStore::open(&config)?;

    match cli.command {
        Commands::Accounts => handle_accounts(&store)?,
        Commands::Assets { like } => handle_assets(&mut store, like)?,
        Commands::History { account } => handle_history(&store, &account)?,
        Commands::Remotes { rtype } => handle_remotes(&store, RemoteType(rtype))?,
        Commands::Payments { account } => handle_payments(&store, account)?,
        Commands::Wipe { table } => {
            let table: StoreTable = table.parse()?;
            store.wipe(table)?;
            println!("Wiped table {}", table);
        }
    }

    Ok(())
}

fn handle_accounts(store: &WalletStore) -> Result<(), Box<dyn std::error::Error>> {
    let names = store.accounts().get_accounts()?;
    if names.is_empty() {
        println!("No accounts stored");
        return Ok(());
    }
    for name in names {
        if let Some(record) = store.accounts().get_by_name(&name)? {
            println!("  • {} ({})", record.name, record.id.as_deref().unwrap_or("-"));
        }
    }
    Ok(())
}

fn handle_assets(store: &mut WalletStore, like: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(name) = like {
        for snapshot in store.assets().get_assets_like(&name, true, None)? {
            let symbol = snapshot.get("symbol").and_then(|s| s.as_str()).unwrap_or("?");
            let id = snapshot.get("id").and_then(|s| s.as_str()).unwrap_or("?");
            println!("  • {} ({})", symbol, id);
        }
        return Ok(());
    }

    store.refresh_asset_cache()?;
    let mut symbols: Vec<_> = store.asset_cache().symbols_to_ids().iter().collect();
    symbols.sort();
    println!("{} assets cached", symbols.len());
    for (symbol, id) in symbols {
        println!("  • {} ({})", symbol, id);
    }
    Ok(())
}

fn handle_history(store: &WalletStore, account: &str) -> Result<(), Box<dyn std::error::Error>> {
    let entries = store.history().get_entries(account)?;
    println!("{} history entries for {}", entries.len(), account);
    for entry in entries {
        println!(
            "  {} block {} {} {}",
            entry.op_index,
            entry.block_num,
            entry.date.as_deref().unwrap_or("-"),
            entry.description.as_deref().unwrap_or("")
        );
    }
    Ok(())
}

fn handle_remotes(store: &WalletStore, rtype: RemoteType) -> Result<(), Box<dyn std::error::Error>> {
    for remote in store.remotes().get_remotes(rtype)? {
        println!(
            "  [{}] {} {} ({})",
            remote.id,
            remote.label,
            remote.url,
            remote.ctype.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}

fn handle_payments(store: &WalletStore, account: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let payments = match account {
        Some(account) => store.payments().get_entries(&account)?,
        None => store.payments().get_all_entries()?,
    };
    for payment in &payments {
        print_payment(payment);
    }
    Ok(())
}

fn print_payment(payment: &PaymentRecord) {
    println!(
        "  [{}] {} via {} ioflag={} {} -> {} ({})",
        payment.id,
        payment.account.as_deref().unwrap_or("-"),
        payment.gateway.as_deref().unwrap_or("-"),
        payment.ioflag.map(|f| f.to_string()).unwrap_or_else(|| "-".into()),
        payment.inputcointype.as_deref().unwrap_or("?"),
        payment.outputcointype.as_deref().unwrap_or("?"),
        payment.creationdate.as_deref().unwrap_or("-")
    );
}
