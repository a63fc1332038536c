//! Headless batch runner: steps seeded universes without a window and
//! reports what happened in each.
//!
//! Usage: `simulate [config.toml]`

use std::collections::BTreeMap;
use std::path::Path;
use std::process::ExitCode;

use orrery_core::{PlayField, SimConfig};
use orrery_sim::SimulationState;

const RUNS: u64 = 10;
const SECONDS: u32 = 120;
const FPS: u32 = 60;

struct RunReport {
    seed: u64,
    resets: u32,
    peak_red: usize,
    final_counts: orrery_sim::PopulationCounts,
    final_mass: f32,
    cues: BTreeMap<&'static str, u64>,
    collisions: u64,
}

fn run(base: &SimConfig, seed: u64) -> RunReport {
    let config = SimConfig {
        seed: Some(seed),
        ..base.clone()
    };
    let mut sim = SimulationState::new(config, PlayField::default());
    let mut cues = BTreeMap::new();
    let mut peak_red = 0;
    let mut collisions = 0;
    let dt = 1.0 / FPS as f32;

    for _ in 0..SECONDS * FPS {
        sim.step(dt);
        peak_red = peak_red.max(sim.reds.len());
        for event in sim.drain_events() {
            if event.is_collision() {
                collisions += 1;
            }
            *cues.entry(event.name()).or_insert(0) += 1;
        }
    }

    RunReport {
        seed,
        // the startup reset is not interesting
        resets: sim.reset_count.saturating_sub(1),
        peak_red,
        final_counts: sim.counts(),
        final_mass: sim.total_mass(),
        cues,
        collisions,
    }
}

fn main() -> ExitCode {
    let base = match std::env::args().nth(1) {
        Some(path) => match SimConfig::load(Path::new(&path)) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("Cannot use {}: {}", path, err);
                return ExitCode::FAILURE;
            }
        },
        None => SimConfig::default(),
    };
    let first_seed = base.seed.unwrap_or(1000);

    eprintln!("Simulating {} runs of {}s each...", RUNS, SECONDS);

    let mut totals: BTreeMap<&'static str, u64> = BTreeMap::new();
    let mut ceiling_runs = 0;
    let mut collisions = 0;
    for i in 0..RUNS {
        let report = run(&base, first_seed + i * 7919);
        let c = report.final_counts;
        println!(
            "seed {:>6} | resets {:>2} | peak red {:>4} | end: {} red, {} mini, {} green, {} cloud, {} yellow, {} orange, {} comet | mass {:.1}",
            report.seed,
            report.resets,
            report.peak_red,
            c.red,
            c.mini_red,
            c.green,
            c.clouds,
            c.yellow,
            c.orange,
            c.comets,
            report.final_mass,
        );
        collisions += report.collisions;
        if report.resets > 0 {
            ceiling_runs += 1;
        }
        for (name, n) in report.cues {
            *totals.entry(name).or_insert(0) += n;
        }
    }

    println!();
    println!("Runs that hit the population ceiling: {}/{}", ceiling_runs, RUNS);
    println!("Cue totals:");
    for (name, n) in &totals {
        println!("  {:<28} {:>8}", name, n);
    }
    println!("  {:<28} {:>8}", "all collisions", collisions);
    ExitCode::SUCCESS
}
