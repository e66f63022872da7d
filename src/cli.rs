use std::env;
use std::fs;

use crate::data::battle::{parse_battle_record_json, parse_fleet_losses_json};
use crate::data::guild_config::{
    configure_default_format, ActorKind, JsonFileConfigStore, DEFAULT_CONFIG_PATH,
};
use crate::parallel::{render_batch, RenderJob, WorkerPool};
use crate::report::{render_report, ReportError, ReportFormat, Result};
use crate::server;
use crate::server::api::BatchItem;

const USAGE: &str = "usage: battle_report <render|batch|config|serve>";
const VALUE_FLAGS: [&str; 5] = ["--format", "--url", "--user", "--store", "--workers"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Render,
    Batch,
    Config,
    Serve,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("render") => Some(Command::Render),
        Some("batch") => Some(Command::Batch),
        Some("config") => Some(Command::Config),
        Some("serve") => Some(Command::Serve),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    match parse_command(args) {
        Some(Command::Render) => handle_render(args),
        Some(Command::Batch) => handle_batch(args),
        Some(Command::Config) => handle_config(args),
        Some(Command::Serve) => handle_serve(),
        None => {
            eprintln!("{USAGE}");
            2
        }
    }
}

fn handle_serve() -> i32 {
    let bind_addr =
        env::var("BATTLE_REPORT_BIND").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
    match server::run_server(&bind_addr) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("server error: {err}");
            1
        }
    }
}

/// `render <record.json> [losses.json] [--format text|oneline] [--url URL] [--user NAME]`
fn handle_render(args: &[String]) -> i32 {
    let positional = positional_args(args);
    let Some(record_path) = positional.first().copied() else {
        eprintln!("usage: battle_report render <record.json> [losses.json] [--format text|oneline] [--url URL] [--user NAME]");
        return 2;
    };
    let format = match flag_value(args, "--format").map(str::parse::<ReportFormat>) {
        None => ReportFormat::Text,
        Some(Ok(format)) => format,
        Some(Err(err)) => {
            eprintln!("{err}");
            return 2;
        }
    };
    let url = flag_value(args, "--url").unwrap_or(record_path);
    let user = flag_value(args, "--user").unwrap_or("someone");

    match render_files(record_path, positional.get(1).copied(), format, url, user) {
        Ok(output) => {
            println!("{output}");
            0
        }
        Err(err) => {
            eprintln!("render failed: {err}");
            1
        }
    }
}

fn render_files(
    record_path: &str,
    losses_path: Option<&str>,
    format: ReportFormat,
    url: &str,
    user: &str,
) -> Result<String> {
    let record = parse_battle_record_json(&fs::read_to_string(record_path)?)?;
    let losses = match losses_path {
        Some(path) => Some(parse_fleet_losses_json(&fs::read_to_string(path)?)?),
        None => None,
    };
    let report = render_report(format, &record, losses.as_deref(), url, user)?;
    Ok(report.as_str().to_string())
}

/// `batch <jobs.json> [--workers N]`: prints a JSON array, one entry per job.
fn handle_batch(args: &[String]) -> i32 {
    let positional = positional_args(args);
    let Some(path) = positional.first().copied() else {
        eprintln!("usage: battle_report batch <jobs.json> [--workers N]");
        return 2;
    };
    let workers = parse_usize_arg(flag_value(args, "--workers"), "workers", 0);

    let jobs: Vec<RenderJob> = match fs::read_to_string(path)
        .map_err(ReportError::from)
        .and_then(|raw| serde_json::from_str(&raw).map_err(Into::into))
    {
        Ok(jobs) => jobs,
        Err(err) => {
            eprintln!("batch failed: {err}");
            return 1;
        }
    };

    let results = render_batch(&jobs, &WorkerPool::with_workers(workers));
    let failures = results.iter().filter(|result| result.is_err()).count();
    let items: Vec<BatchItem> = results.into_iter().map(Into::into).collect();
    match serde_json::to_string_pretty(&items) {
        Ok(payload) => println!("{payload}"),
        Err(err) => {
            eprintln!("failed to serialize batch result: {err}");
            return 1;
        }
    }
    if failures > 0 {
        tracing::warn!(failures, total = jobs.len(), "some reports failed to render");
        1
    } else {
        0
    }
}

/// `config <guild> <user|bot> [text|oneline] [--store PATH]`
fn handle_config(args: &[String]) -> i32 {
    let positional = positional_args(args);
    let (Some(guild_id), Some(actor)) = (positional.first(), positional.get(1)) else {
        eprintln!("usage: battle_report config <guild> <user|bot> [text|oneline] [--store PATH]");
        return 2;
    };
    let actor = match actor.parse::<ActorKind>() {
        Ok(actor) => actor,
        Err(err) => {
            eprintln!("{err}");
            return 2;
        }
    };
    let format = match positional.get(2).map(|raw| raw.parse::<ReportFormat>()) {
        None => None,
        Some(Ok(format)) => Some(format),
        Some(Err(err)) => {
            eprintln!("{err}");
            return 2;
        }
    };

    let store_path = flag_value(args, "--store")
        .map(str::to_string)
        .or_else(|| env::var("BATTLE_REPORT_CONFIG").ok())
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let mut store = JsonFileConfigStore::open(&store_path);

    match configure_default_format(&mut store, guild_id, actor, format) {
        Ok(reply) => {
            println!("{reply}");
            0
        }
        Err(err) => {
            eprintln!("config failed: {err}");
            1
        }
    }
}

/// Arguments after the subcommand that are neither flags nor flag values.
fn positional_args(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut rest = args.iter().skip(2);
    while let Some(arg) = rest.next() {
        if VALUE_FLAGS.contains(&arg.as_str()) {
            rest.next();
        } else if !arg.starts_with("--") {
            out.push(arg.as_str());
        }
    }
    out
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|arg| arg == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn parse_usize_arg(raw: Option<&str>, name: &str, default: usize) -> usize {
    raw.and_then(|value| value.parse::<usize>().ok())
        .unwrap_or_else(|| {
            if let Some(value) = raw {
                eprintln!("invalid {name} '{value}', defaulting to {default}");
            }
            default
        })
}
