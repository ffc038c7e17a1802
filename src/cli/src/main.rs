//! Operator CLI for the FLM token ledger.

use anyhow::Result;
use colored::Colorize;
use flm_cli::commands::{admin, approve, query, transfer};
use flm_cli::{open_ledger, LedgerConfig, Payload};
use flm_core::types::parse_amount;
use flm_core::{Account, Amount, CallContext, Delta, SignerSet};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use structopt::StructOpt;
use tracing::{debug, error};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Command line arguments for the ledger CLI.
#[derive(Debug, StructOpt)]
#[structopt(name = "flm", about = "FLM fungible token ledger")]
struct Opt {
    /// Path to the configuration file
    #[structopt(short, long, parse(from_os_str))]
    config: Option<PathBuf>,

    /// Directory holding the ledger database
    #[structopt(short, long, parse(from_os_str))]
    data_dir: Option<PathBuf>,

    /// Account whose witness this call carries; repeat for several
    #[structopt(short, long = "signer", number_of_values = 1)]
    signers: Vec<Account>,

    /// Run the call from this account's contract context
    #[structopt(long)]
    caller_contract: Option<Account>,

    /// Print results as JSON
    #[structopt(long)]
    json: bool,

    /// Subcommand to run
    #[structopt(subcommand)]
    cmd: Command,
}

/// Subcommands for the ledger CLI.
#[derive(Debug, StructOpt)]
enum Command {
    /// Show the total supply
    #[structopt(name = "supply")]
    Supply,

    /// Show the balance of an account
    #[structopt(name = "balance")]
    Balance {
        /// Account to query
        account: Account,
    },

    /// Show what a spender may withdraw from an owner
    #[structopt(name = "allowance")]
    Allowance {
        #[structopt(long)]
        owner: Account,

        #[structopt(long)]
        spender: Account,
    },

    /// List every account with a balance
    #[structopt(name = "holders")]
    Holders,

    /// Show supply, owner and authors
    #[structopt(name = "info")]
    Info,

    /// Send tokens from an account
    #[structopt(name = "transfer")]
    Transfer {
        #[structopt(long)]
        from: Account,

        #[structopt(long)]
        to: Account,

        #[structopt(long, parse(try_from_str = parse_amount))]
        amount: Amount,

        /// Hex payload handed to a contract recipient
        #[structopt(long)]
        data: Option<Payload>,
    },

    /// Send tokens out of an allowance
    #[structopt(name = "transfer-from")]
    TransferFrom {
        #[structopt(long)]
        spender: Account,

        #[structopt(long)]
        from: Account,

        #[structopt(long)]
        to: Account,

        #[structopt(long, parse(try_from_str = parse_amount))]
        amount: Amount,

        /// Hex payload handed to a contract recipient
        #[structopt(long)]
        data: Option<Payload>,
    },

    /// Adjust an allowance by a signed amount, e.g. 50 or -20
    #[structopt(name = "approve")]
    Approve {
        #[structopt(long)]
        owner: Account,

        #[structopt(long)]
        spender: Account,

        #[structopt(long, allow_hyphen_values = true)]
        delta: Delta,
    },

    /// Mint new tokens (authors and owner only)
    #[structopt(name = "mint")]
    Mint {
        #[structopt(long)]
        minter: Account,

        #[structopt(long)]
        to: Account,

        #[structopt(long, parse(try_from_str = parse_amount))]
        amount: Amount,
    },

    /// Burn tokens from an account
    #[structopt(name = "burn")]
    Burn {
        #[structopt(long)]
        from: Account,

        #[structopt(long, parse(try_from_str = parse_amount))]
        amount: Amount,
    },

    /// Register an author (owner only)
    #[structopt(name = "add-author")]
    AddAuthor { account: Account },

    /// Unregister an author (owner only)
    #[structopt(name = "remove-author")]
    RemoveAuthor { account: Account },

    /// Hand ownership to another account (owner only)
    #[structopt(name = "set-owner")]
    SetOwner { account: Account },

    /// Write the effective configuration to a file
    #[structopt(name = "init-config")]
    InitConfig {
        #[structopt(parse(from_os_str))]
        path: PathBuf,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {:#}", "Error:".red(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse command line arguments
    let mut opt = Opt::from_args();

    // Load configuration
    let mut config = match &opt.config {
        Some(path) => LedgerConfig::from_file(path)?,
        None => LedgerConfig::default(),
    };
    config.apply_env()?;

    // Override data dir if specified
    if let Some(dir) = opt.data_dir.take() {
        config.data_dir = Some(dir);
    }

    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Failures from here on reach the log as well as stderr
    execute(opt, config).map_err(|e| {
        error!("{:#}", e);
        e
    })
}

fn execute(opt: Opt, config: LedgerConfig) -> Result<()> {
    let cmd = match opt.cmd {
        Command::InitConfig { path } => {
            config.to_file(&path)?;
            println!("{} {}", "Config written:".green(), path.display());
            return Ok(());
        }
        cmd => cmd,
    };

    let signers = SignerSet::new(opt.signers);
    let ctx = match opt.caller_contract {
        Some(contract) => CallContext::from_contract(&signers, contract),
        None => CallContext::new(&signers),
    };
    debug!(caller_contract = ?ctx.calling_account(), "Call context ready");

    let mut ledger = open_ledger(&config)?;
    let json = opt.json;

    // Run the appropriate command
    match cmd {
        Command::Supply => print(json, "Total supply:", &query::supply(&ledger)?)?,
        Command::Balance { account } => print(json, "Balance:", &query::balance(&ledger, account)?)?,
        Command::Allowance { owner, spender } => {
            print(json, "Allowance:", &query::allowance(&ledger, owner, spender)?)?
        }
        Command::Holders => print(json, "Holders:", &query::holders(&ledger)?)?,
        Command::Info => print(json, "Ledger:", &query::info(&ledger)?)?,
        Command::Transfer {
            from,
            to,
            amount,
            data,
        } => {
            let committed = transfer::transfer(&mut ledger, &ctx, from, to, amount, data.as_ref())?;
            print(json, "Transferred:", &committed)?
        }
        Command::TransferFrom {
            spender,
            from,
            to,
            amount,
            data,
        } => {
            let committed =
                transfer::transfer_from(&mut ledger, &ctx, spender, from, to, amount, data.as_ref())?;
            print(json, "Transferred:", &committed)?
        }
        Command::Approve {
            owner,
            spender,
            delta,
        } => print(json, "Approved:", &approve::run(&mut ledger, &ctx, owner, spender, delta)?)?,
        Command::Mint { minter, to, amount } => {
            print(json, "Minted:", &transfer::mint(&mut ledger, &ctx, minter, to, amount)?)?
        }
        Command::Burn { from, amount } => {
            print(json, "Burned:", &transfer::burn(&mut ledger, &ctx, from, amount)?)?
        }
        Command::AddAuthor { account } => {
            print(json, "Author added:", &admin::add_author(&mut ledger, &ctx, account)?)?
        }
        Command::RemoveAuthor { account } => {
            print(json, "Author removed:", &admin::remove_author(&mut ledger, &ctx, account)?)?
        }
        Command::SetOwner { account } => {
            print(json, "Owner changed:", &admin::set_owner(&mut ledger, &ctx, account)?)?
        }
        Command::InitConfig { .. } => {}
    }

    Ok(())
}

fn print<T: Serialize + fmt::Display>(json: bool, label: &str, value: &T) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{} {}", label.green(), value);
    }
    Ok(())
}
