//! rtsim: simulate a periodic task set under RMS, EDF or the adaptive policy.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use rtsim::{
    init_tracing, load_scenario, render_timeline, Mode, SimulationReport, Tick, TraceStats,
};

/// Simulate a periodic real-time task set.
#[derive(Parser)]
#[command(name = "rtsim")]
struct Cli {
    /// Path to a TOML or JSON scenario file.
    scenario: PathBuf,

    /// Scheduling mode (rms, edf, adaptive). Overrides the scenario file.
    #[arg(short, long, env = "RTSIM_MODE")]
    mode: Option<Mode>,

    /// Number of ticks to simulate. Overrides the scenario file.
    #[arg(short = 't', long, env = "RTSIM_SIM_TIME")]
    sim_time: Option<Tick>,

    /// Utilization above which adaptive mode starts on EDF, in (0, 1).
    #[arg(short = 'u', long, env = "RTSIM_UTIL_THRESHOLD")]
    util_threshold: Option<f64>,

    /// Print the full result as JSON instead of the text summary.
    #[arg(long)]
    json: bool,

    /// Print every schedule slot to stderr.
    #[arg(long)]
    dump_trace: bool,

    /// Skip the timeline chart in the text summary.
    #[arg(long)]
    no_timeline: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    if let Err(e) = run(&cli) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut scenario = load_scenario(&cli.scenario)
        .with_context(|| format!("failed to load scenario {}", cli.scenario.display()))?;

    if let Some(mode) = cli.mode {
        scenario.mode = mode;
    }
    if let Some(ticks) = cli.sim_time {
        scenario.sim_time = ticks;
    }
    if let Some(threshold) = cli.util_threshold {
        scenario.util_threshold = threshold;
    }

    let result = scenario.run().context("simulation rejected the scenario")?;

    if cli.dump_trace {
        result.dump();
    }

    if cli.json {
        let report = SimulationReport::from(&result);
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "mode={} ticks={} U={:.3} busy={:.1}% initial={} final={}",
        scenario.mode,
        result.sim_time(),
        result.theoretical_utilization,
        result.utilization_percent,
        result.initial_algorithm,
        result.final_algorithm,
    );
    if let Some(t) = result.escalated_at {
        println!("adaptive policy escalated to EDF at tick {t}");
    }
    for task in result.tasks.iter().filter(|t| t.exceeds_deadline()) {
        println!(
            "warning: {} has execution time {} > deadline {}",
            task.name, task.execution_time, task.deadline
        );
    }

    let stats = TraceStats::from_result(&result);
    println!();
    println!(
        "{:<16} {:>5} {:>5} {:>5} {:>9} {:>7} {:>8} {:>9} {:>6}",
        "task", "C", "T", "D", "executed", "share", "released", "completed", "misses"
    );
    for (task, ts) in result.tasks.iter().zip(&stats.tasks) {
        println!(
            "{:<16} {:>5} {:>5} {:>5} {:>9} {:>6.1}% {:>8} {:>9} {:>6}",
            task.name,
            task.execution_time,
            task.period,
            task.deadline,
            ts.executed,
            ts.share_percent,
            ts.released,
            ts.completed,
            ts.misses,
        );
    }
    println!(
        "idle={} context_switches={}",
        stats.idle_slots, stats.context_switches
    );

    if !cli.no_timeline {
        println!();
        print!("{}", render_timeline(&result.segments(), &result.tasks));
    }

    Ok(())
}
