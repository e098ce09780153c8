//! bank-tools: seeder runner and JSON-lines tool host for the banking store.
//!
//! Usage:
//!   bank-tools seed  [--db bank.db] [--seed 42] [--config bank.json]
//!   bank-tools serve [--db bank.db] [--config bank.json]
//!   bank-tools tools

use anyhow::{bail, Result};
use bank_core::{
    config::BankConfig,
    seeder::Seeder,
    store::BankStore,
    tools::{call_tool, tool_definitions},
};
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum HostRequest {
    ListTools,
    Call {
        tool: String,
        #[serde(default)]
        args: serde_json::Value,
    },
    Quit,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let mode = args.get(1).map(String::as_str).unwrap_or("help");

    match mode {
        "seed" => {
            let config = load_config(&args)?;
            let seed = parse_arg(&args, "--seed", 42u64);
            run_seed(&config, seed)
        }
        "serve" => {
            let config = load_config(&args)?;
            let store = open_store(&config)?;
            run_host_loop(&store)
        }
        "tools" => {
            let definitions = tool_definitions()?;
            println!("{}", serde_json::to_string_pretty(&definitions)?);
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            print_usage();
            bail!("unknown mode '{other}'")
        }
    }
}

fn print_usage() {
    println!("bank-tools seed  [--db PATH] [--seed N] [--config FILE]");
    println!("bank-tools serve [--db PATH] [--config FILE]");
    println!("bank-tools tools");
}

fn load_config(args: &[String]) -> Result<BankConfig> {
    let mut config = match find_arg(args, "--config") {
        Some(path) => BankConfig::load(path)?,
        None => BankConfig::default(),
    };
    if let Some(db) = find_arg(args, "--db") {
        config.database_path = db.to_string();
    }
    Ok(config)
}

fn open_store(config: &BankConfig) -> Result<BankStore> {
    let store = BankStore::open(config)?;
    store.migrate()?;
    Ok(store)
}

fn run_seed(config: &BankConfig, seed: u64) -> Result<()> {
    println!("bank-tools seed");
    println!("  seed:      {seed}");
    println!("  db:        {}", config.database_path);
    println!();

    let store = open_store(config)?;
    let report = Seeder::new(&store, config.seed.clone(), seed).run()?;

    let unbalanced = store
        .reconcile_all()?
        .into_iter()
        .filter(|c| !c.balanced)
        .count();

    println!("=== SEED SUMMARY ===");
    println!("  customers:      {}", report.customers);
    println!("  accounts:       {}", report.accounts);
    println!("  entries:        {}", report.entries);
    println!("  transfers:      {}", report.transfers);
    println!("  rejected:       {}", report.rejected);
    println!("  total txns:     {}", store.transaction_count()?);
    println!("  unbalanced:     {unbalanced}");

    if unbalanced > 0 {
        bail!("{unbalanced} accounts failed reconciliation");
    }
    Ok(())
}

/// Read one request per line on stdin and answer with one JSON line on
/// stdout until EOF or a quit request.
fn run_host_loop(store: &BankStore) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let request: HostRequest = match serde_json::from_str(&buffer) {
            Ok(r) => r,
            Err(e) => {
                let err_json = serde_json::json!({
                    "ok": false,
                    "error": { "kind": "invalid_request", "message": e.to_string() }
                });
                writeln!(stdout, "{err_json}")?;
                stdout.flush()?;
                continue;
            }
        };

        let response = match request {
            HostRequest::Quit => break,
            HostRequest::ListTools => serde_json::json!({
                "ok": true,
                "result": tool_definitions()?,
            }),
            HostRequest::Call { tool, args } => match call_tool(store, &tool, args) {
                Ok(result) => serde_json::json!({ "ok": true, "result": result }),
                Err(e) => {
                    log::warn!("tool {tool} failed: {e}");
                    serde_json::json!({ "ok": false, "error": e.body() })
                }
            },
        };
        writeln!(stdout, "{response}")?;
        stdout.flush()?;
    }
    Ok(())
}

fn find_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    find_arg(args, flag)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
