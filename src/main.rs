use sqldbo::config::{default_config_path, load_config};
use sqldbo::{tracing_error_logger, Database, Params, StatementType, Value};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;

const USAGE: &str = "usage: sqldbo [--config <config.toml>] <sql> [params...]";

fn main() -> ExitCode {
    // Initialize the logging system using tracing subscriber
    tracing_subscriber::fmt::init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let config_path = if args.first().map(String::as_str) == Some("--config") {
        if args.len() < 2 {
            eprintln!("{}", USAGE);
            return ExitCode::FAILURE;
        }
        let path = args.remove(1);
        args.remove(0);
        Some(PathBuf::from(path))
    } else {
        default_config_path()
    };

    let Some(config_path) = config_path else {
        eprintln!("No configuration file found. {}", USAGE);
        return ExitCode::FAILURE;
    };
    if args.is_empty() {
        eprintln!("{}", USAGE);
        return ExitCode::FAILURE;
    }

    match run(&config_path, &args[0], &args[1..]) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(config_path: &Path, sql: &str, raw_params: &[String]) -> sqldbo::Result<String> {
    let config = load_config(config_path)?;
    info!(dsn = %config.database.dsn(), "connecting");

    let mut db = Database::connect(config.database)?;
    db.set_error_logger(tracing_error_logger());

    let params = if raw_params.is_empty() {
        Params::None
    } else {
        Params::Positional(raw_params.iter().map(|p| Value::from(p.as_str())).collect())
    };

    match StatementType::from_sql(sql) {
        StatementType::Select => {
            let rows = db.select(sql, params)?;
            Ok(serde_json::to_string_pretty(&rows)?)
        }
        StatementType::Insert => db.insert(sql, params),
        _ => Ok(db.update(sql, params)?.to_string()),
    }
}
