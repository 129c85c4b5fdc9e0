//! Tournament CLI
//!
//! Run elimination tournaments over a roster of dilemma policies.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use tournament::{
    BatchRunner, EliminationController, TournamentConfig, TournamentReport,
};

fn print_usage() {
    println!("Dilemma Tournament Runner");
    println!();
    println!("Usage:");
    println!("  tournament run <config.toml> [--out FILE.json] [--csv FILE.csv]");
    println!("  tournament demo [--runs N] [--rounds R]");
    println!("  tournament list-policies");
    println!();
    println!("Config keys: roster (name + policy id), rounds_per_run,");
    println!("runs_per_batch, max_workers, grace_secs, elimination_depth,");
    println!("tie_retry_cap, allow_tag_aware");
    println!();
    println!("Examples:");
    println!("  tournament run tournament.toml --out report.json");
    println!("  tournament demo --runs 50 --rounds 100");
}

fn parse_flag<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    args.iter()
        .position(|arg| arg == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|value| value.parse().ok())
}

fn run_tournament(
    name: &str,
    config: &TournamentConfig,
    out: Option<&Path>,
    csv: Option<&Path>,
) -> anyhow::Result<()> {
    let roster = config.build_roster()?;
    let participants: Vec<String> = roster
        .iter()
        .map(|agent| agent.identity().to_string())
        .collect();

    println!("=== Tournament: {} ===", name);
    println!(
        "Agents: {}, rounds/run: {}, runs/batch: {}",
        roster.len(),
        config.rounds_per_run,
        config.runs_per_batch
    );
    println!();

    let runner = BatchRunner::new(config.batch_config())?;
    let controller = EliminationController::new(runner, config.tie_retry_cap);
    let outcome = controller.run(roster, config.elimination_depth)?;

    let report = TournamentReport::from_outcome(name, participants, &outcome);
    report.print_report();

    if let Some(winner) = &outcome.champion {
        println!("Champion: {winner}");
    }
    if let Some(path) = out {
        report
            .save(path)
            .with_context(|| format!("saving report to {}", path.display()))?;
        println!("Report saved to {}", path.display());
    }
    if let Some(path) = csv {
        report
            .export_csv(path)
            .with_context(|| format!("exporting CSV to {}", path.display()))?;
        println!("Generation scores exported to {}", path.display());
    }
    Ok(())
}

fn run_from_config(args: &[String]) -> anyhow::Result<()> {
    let Some(path) = args.first() else {
        eprintln!("Error: run requires a config file");
        print_usage();
        return Ok(());
    };
    let config = TournamentConfig::load(Path::new(path))?;
    let out: Option<PathBuf> = parse_flag(args, "--out");
    let csv: Option<PathBuf> = parse_flag(args, "--csv");
    let name = config.name.clone();
    run_tournament(&name, &config, out.as_deref(), csv.as_deref())
}

fn run_demo(args: &[String]) -> anyhow::Result<()> {
    let runs: u32 = parse_flag(args, "--runs").unwrap_or(50);
    let rounds: u32 = parse_flag(args, "--rounds").unwrap_or(100);

    // Every fair policy in the library, one agent each.
    let roster: Vec<_> = policies::policy_ids()
        .into_iter()
        .filter_map(|id| {
            let policy = policies::create_policy(id)?;
            (!policy.tag_aware()).then(|| tournament::RosterEntry {
                name: id.to_string(),
                policy: id.to_string(),
            })
        })
        .collect();
    let config = TournamentConfig {
        name: "demo".to_string(),
        roster,
        rounds_per_run: rounds,
        runs_per_batch: runs,
        max_workers: None,
        grace_secs: 60,
        elimination_depth: None,
        tie_retry_cap: 5,
        allow_tag_aware: false,
    };
    run_tournament("demo", &config, None, None)
}

fn list_policies() {
    println!("Available policies:");
    for id in policies::policy_ids() {
        let tag_aware = policies::create_policy(id)
            .map(|policy| policy.tag_aware())
            .unwrap_or(false);
        if tag_aware {
            println!("  {id} (tag-aware, excluded unless allow_tag_aware)");
        } else {
            println!("  {id}");
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage();
        return Ok(());
    }

    match args[1].as_str() {
        "run" => run_from_config(&args[2..]),
        "demo" => run_demo(&args[2..]),
        "list-policies" | "policies" => {
            list_policies();
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            Ok(())
        }
    }
}
