use highlight_core::annotation::validator::validate_json;
use highlight_core::diagnostics::event::DropRecord;
use highlight_core::error::CoreResult;
use highlight_core::resolve::{OverlapResolver, ResolveMode, Segment};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use tracing::info;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 || args.len() > 4 {
        eprintln!("usage: findings_validator <text-file> <response.json> [canonical|partition]");
        std::process::exit(2);
    }
    let mode = match ResolveMode::from_str(args.get(3).map(String::as_str).unwrap_or("canonical")) {
        Ok(mode) => mode,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };

    match run(Path::new(&args[1]), Path::new(&args[2]), mode) {
        Ok(out) => match serde_json::to_string_pretty(&out) {
            Ok(s) => println!("{}", s),
            Err(e) => {
                eprintln!("serialize error: {}", e);
                std::process::exit(1);
            }
        },
        Err(e) => {
            eprintln!("validator error: {}", e);
            std::process::exit(1);
        }
    }
}

#[derive(Serialize)]
struct Report {
    mode: ResolveMode,
    received: usize,
    accepted: usize,
    dropped: Vec<DropRecord>,
    segments: Vec<Segment>,
}

fn run(text_path: &Path, response_path: &Path, mode: ResolveMode) -> CoreResult<Report> {
    let text = std::fs::read_to_string(text_path)?.replace("\r\n", "\n");
    let response: Value = serde_json::from_str(&std::fs::read_to_string(response_path)?)?;

    // Accept either a full analysis response or a bare findings array.
    let findings = match &response {
        Value::Object(map) => map.get("findings").cloned().unwrap_or(Value::Null),
        other => other.clone(),
    };
    let (validated, report) = validate_json(&Value::String(text.clone()), &findings)?;
    let outcome = OverlapResolver::default().resolve(&text, &validated, mode)?;
    info!(
        received = report.received,
        accepted = report.accepted,
        segments = outcome.segments.len(),
        "validated findings"
    );

    let mut dropped = report.dropped;
    dropped.extend(outcome.dropped);
    Ok(Report {
        mode,
        received: report.received,
        accepted: report.accepted,
        dropped,
        segments: outcome.segments,
    })
}
