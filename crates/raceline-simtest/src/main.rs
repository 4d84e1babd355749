//! Raceline Headless Race Harness
//!
//! Runs the car race end to end without a front end: loads the race config,
//! drives the budgeted loop, and prints each rendered frame to stdout.
//! `--check` instead sweeps the loop's contract and reports ✓/✗ rows.
//!
//! Usage:
//!   cargo run -p raceline-simtest
//!   cargo run -p raceline-simtest -- --seed 42
//!   cargo run -p raceline-simtest -- --check [--verbose]

use rand::rngs::StdRng;
use rand::SeedableRng;

use raceline_core::{run_race, write_transcript, Race, RaceError};
use raceline_logic::config::{validate_config, ConfigError, RaceConfig};
use raceline_logic::standings;
use raceline_logic::state::RaceState;

// ── Race config (same JSON a front end would ship) ──────────────────────
const CONFIG_JSON: &str = include_str!("../../../data/race_config.json");

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let verbose = args.iter().any(|a| a == "--verbose");
    let check = args.iter().any(|a| a == "--check");

    let mut config: RaceConfig = match serde_json::from_str(CONFIG_JSON) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("bad race config: {}", e);
            std::process::exit(1);
        }
    };
    if let Some(seed) = parse_seed(&args) {
        config.seed = Some(seed);
    }

    if check {
        run_checks(&config, verbose);
    } else if let Err(e) = run_and_print(&config) {
        eprintln!("race failed: {}", e);
        std::process::exit(1);
    }
}

/// Value following a `--seed` flag, if present.
fn parse_seed(args: &[String]) -> Option<u64> {
    let at = args.iter().position(|a| a == "--seed")?;
    args.get(at + 1)?.parse().ok()
}

fn rng_for(config: &RaceConfig) -> StdRng {
    match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

// ── Default mode: run one race ──────────────────────────────────────────

fn run_and_print(config: &RaceConfig) -> Result<(), RaceError> {
    println!(
        "=== Raceline: {} cars, {} steps ===",
        config.car_count, config.steps
    );

    let frames = run_race(config, rng_for(config))?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_transcript(&mut out, &frames)?;

    if let Some(last) = frames.last() {
        print_summary(&last.state);
    }
    Ok(())
}

fn print_summary(final_state: &RaceState) {
    let leaders = standings::leaders(final_state);

    println!("\n=== RESULT ===");
    match leaders.len() {
        0 => println!("empty grid, no winner"),
        1 => println!("winner: car {}", leaders[0]),
        _ => {
            let names: Vec<String> = leaders.iter().map(|car| format!("car {}", car)).collect();
            println!("dead heat: {}", names.join(", "));
        }
    }
    for (car, distance) in standings::placings(final_state) {
        println!("  car {}: {} marks", car, distance);
    }
    println!(
        "total distance: {} marks",
        standings::total_distance(final_state)
    );
}

// ── --check mode: contract sweeps ───────────────────────────────────────

fn run_checks(config: &RaceConfig, verbose: bool) {
    println!("=== Raceline Race Harness ===\n");

    let mut results = Vec::new();
    results.extend(check_budget(config));
    results.extend(check_advancement(config));
    results.extend(check_rendering(config));
    results.extend(check_config());
    results.extend(check_determinism(config));

    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Step budget ──────────────────────────────────────────────────────

fn check_budget(config: &RaceConfig) -> Vec<TestResult> {
    println!("--- Step Budget ---");
    let mut results = Vec::new();

    for steps in [0u32, 1, config.steps] {
        let run = RaceConfig { steps, ..config.clone() };
        let frames = run_race(&run, StdRng::seed_from_u64(11)).expect("valid config");
        results.push(TestResult {
            name: format!("budget_{}_steps", steps),
            passed: frames.len() == steps as usize,
            detail: format!("{} steps → {} frames", steps, frames.len()),
        });
    }

    let mut race = Race::new(config, StdRng::seed_from_u64(11)).expect("valid config");
    let counted = race.by_ref().count();
    let still_done = race.next().is_none() && race.is_done();
    results.push(TestResult {
        name: "budget_done_is_terminal".into(),
        passed: counted == config.steps as usize && still_done,
        detail: "exhausted race yields None forever".into(),
    });

    results
}

// ── 2. Advancement ──────────────────────────────────────────────────────

fn check_advancement(config: &RaceConfig) -> Vec<TestResult> {
    println!("--- Advancement ---");
    let mut results = Vec::new();

    // Monotonic, bounded increment over a long seeded race
    let long = RaceConfig {
        steps: 50,
        ..config.clone()
    };
    let frames = run_race(&long, StdRng::seed_from_u64(21)).expect("valid config");
    let grid = RaceState::starting_grid(long.car_count as usize, long.starting_position);
    let mut prev = grid;
    let mut monotonic = true;
    for frame in &frames {
        if !prev.precedes(&frame.state) {
            monotonic = false;
        }
        if prev
            .positions()
            .iter()
            .zip(frame.state.positions())
            .any(|(old, new)| new.saturating_sub(*old) > 1)
        {
            monotonic = false;
        }
        prev = frame.state.clone();
    }
    results.push(TestResult {
        name: "advance_monotonic_bounded".into(),
        passed: monotonic,
        detail: format!("{} steps, every delta in {{0, 1}}", frames.len()),
    });

    // Threshold extremes: p = 0.0 advances everyone, p = 1.0 nobody
    let sprint = RaceConfig {
        stall_probability: 0.0,
        ..config.clone()
    };
    let frames = run_race(&sprint, StdRng::seed_from_u64(22)).expect("valid config");
    let expected = sprint.starting_position + sprint.steps;
    let all_finish = frames
        .last()
        .map_or(true, |f| f.state.positions().iter().all(|&p| p == expected));
    results.push(TestResult {
        name: "advance_p0_all_advance".into(),
        passed: all_finish,
        detail: format!("stall 0.0 → every car at {}", expected),
    });

    let parked = RaceConfig {
        stall_probability: 1.0,
        ..config.clone()
    };
    let frames = run_race(&parked, StdRng::seed_from_u64(23)).expect("valid config");
    let nobody_moved = frames.last().map_or(true, |f| {
        f.state
            .positions()
            .iter()
            .all(|&p| p == parked.starting_position)
    });
    results.push(TestResult {
        name: "advance_p1_none_advance".into(),
        passed: nobody_moved,
        detail: format!("stall 1.0 → every car at {}", parked.starting_position),
    });

    // Advancement builds a new snapshot; the input is untouched
    let state = RaceState::starting_grid(config.car_count as usize, config.starting_position);
    let before = state.clone();
    let mut rng = StdRng::seed_from_u64(24);
    let next = raceline_core::advance_snapshot(&state, config.stall_probability, &mut rng);
    results.push(TestResult {
        name: "advance_pure_input".into(),
        passed: state == before && next.car_count() == state.car_count(),
        detail: "input snapshot unchanged, car count preserved".into(),
    });

    results
}

// ── 3. Rendering ────────────────────────────────────────────────────────

fn check_rendering(config: &RaceConfig) -> Vec<TestResult> {
    println!("--- Rendering ---");
    let mut results = Vec::new();

    let frames = run_race(config, StdRng::seed_from_u64(31)).expect("valid config");

    let shape_ok = frames.iter().all(|f| {
        f.lines.len() == config.car_count as usize + 1
            && f.lines[0].is_empty()
            && f.lines[1..]
                .iter()
                .zip(f.state.positions())
                .all(|(row, &pos)| row.len() == pos as usize)
    });
    results.push(TestResult {
        name: "render_frame_shape".into(),
        passed: shape_ok,
        detail: format!("{} rows + separator per frame", config.car_count),
    });

    let mut out = Vec::new();
    let write_ok = write_transcript(&mut out, &frames).is_ok();
    let line_count = String::from_utf8_lossy(&out).lines().count() as u32;
    let expected = config.steps * (config.car_count + 1);
    results.push(TestResult {
        name: "render_transcript_length".into(),
        passed: write_ok && line_count == expected,
        detail: format!("{} lines = steps × (cars + 1)", line_count),
    });

    results
}

// ── 4. Config validation ────────────────────────────────────────────────

fn check_config() -> Vec<TestResult> {
    println!("--- Config Validation ---");
    let mut results = Vec::new();

    let bad = RaceConfig {
        stall_probability: 1.5,
        ..RaceConfig::default()
    };
    results.push(TestResult {
        name: "config_rejects_bad_probability".into(),
        passed: validate_config(&bad).contains(&ConfigError::StallProbabilityOutOfRange(1.5)),
        detail: "stall probability 1.5 rejected".into(),
    });

    let oversized = RaceConfig {
        car_count: raceline_logic::config::MAX_GRID_CARS + 1,
        ..RaceConfig::default()
    };
    let rejected = matches!(
        Race::new(&oversized, StdRng::seed_from_u64(41)),
        Err(RaceError::Config(_))
    );
    results.push(TestResult {
        name: "config_rejects_oversized_grid".into(),
        passed: rejected,
        detail: format!("{} cars refused at the loop boundary", oversized.car_count),
    });

    results
}

// ── 5. Determinism ──────────────────────────────────────────────────────

fn check_determinism(config: &RaceConfig) -> Vec<TestResult> {
    println!("--- Determinism ---");
    let mut results = Vec::new();

    let a = run_race(config, StdRng::seed_from_u64(51)).expect("valid config");
    let b = run_race(config, StdRng::seed_from_u64(51)).expect("valid config");
    let identical = a.len() == b.len()
        && a.iter()
            .zip(&b)
            .all(|(fa, fb)| fa.state == fb.state && fa.lines == fb.lines);
    results.push(TestResult {
        name: "determinism_same_seed".into(),
        passed: identical,
        detail: format!("seed 51 replayed over {} frames", a.len()),
    });

    results
}
