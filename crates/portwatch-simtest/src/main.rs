//! Portwatch Headless Simulation Harness
//!
//! Validates the layout pipeline, pool discipline and the full ship
//! lifecycle without any rendering. Runs entirely in-process.
//!
//! Usage:
//!   cargo run -p portwatch-simtest
//!   cargo run -p portwatch-simtest -- --verbose
//!   cargo run -p portwatch-simtest -- --json

use portwatch_core::engine::{HarborConfig, HarborEngine};
use portwatch_core::placement::assemble;
use portwatch_core::pool::{AssetPool, PartClass, PoolInventory};
use portwatch_core::scene::SceneGraph;
use portwatch_core::score::Destination;
use portwatch_core::traffic::{Routes, TrafficError};
use portwatch_logic::dimensions::{random_dimensions, ShipDimensions};
use portwatch_logic::layout::{build_layout, PartKind, PartTally};
use portwatch_logic::spline::{Spline, Vec3};
use portwatch_logic::template::{trim_template, NATIVE_LENGTH, NATIVE_WIDTH};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

// ── Test harness ────────────────────────────────────────────────────────

#[derive(Serialize)]
struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

#[derive(Serialize)]
struct RunSummary<'a> {
    passed: usize,
    failed: usize,
    total: usize,
    results: &'a [TestResult],
}

fn main() {
    env_logger::init();
    let verbose = std::env::args().any(|a| a == "--verbose");
    let json = std::env::args().any(|a| a == "--json");
    if !json {
        println!("=== Portwatch Simulation Harness ===\n");
    }

    let mut results = Vec::new();

    // 1. Template trimming sweep
    results.extend(validate_template_engine(verbose, json));

    // 2. Structure layout sweep
    results.extend(validate_layout_builder(verbose, json));

    // 3. Spline evaluation
    results.extend(validate_splines(verbose, json));

    // 4. Pool discipline
    results.extend(validate_pool(verbose, json));

    // 5. Full lifecycle across many seeds
    results.extend(validate_lifecycle(verbose, json));

    // ── Summary ──
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    if json {
        let summary = RunSummary {
            passed,
            failed,
            total,
            results: &results,
        };
        match serde_json::to_string_pretty(&summary) {
            Ok(text) => println!("{text}"),
            Err(e) => eprintln!("summary serialization failed: {e}"),
        }
    } else {
        println!();
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
    }

    if failed > 0 {
        std::process::exit(1);
    }
}

fn valid_dimensions() -> Vec<ShipDimensions> {
    (9..=17)
        .step_by(2)
        .flat_map(|l| (5..=9).step_by(2).map(move |w| ShipDimensions::new(l, w)))
        .collect()
}

// ── 1. Template Engine ──────────────────────────────────────────────────

fn validate_template_engine(verbose: bool, json: bool) -> Vec<TestResult> {
    if !json {
        println!("--- Template Engine ---");
    }
    let mut results = Vec::new();

    // Every valid dimension pair trims to exactly the requested size.
    let mut all_sized = true;
    for dims in valid_dimensions() {
        let grid = trim_template(dims.length_count, dims.width_count);
        if grid.length_count() != dims.length_count || grid.width_count() != dims.width_count {
            all_sized = false;
        }
    }
    results.push(TestResult {
        name: "template_trim_sizes".into(),
        passed: all_sized,
        detail: format!("{} dimension pairs trim exactly", valid_dimensions().len()),
    });

    // Native-size request is a no-op trim.
    let native = trim_template(NATIVE_LENGTH, NATIVE_WIDTH);
    results.push(TestResult {
        name: "template_native_untouched".into(),
        passed: native.length_count() == NATIVE_LENGTH && native.width_count() == NATIVE_WIDTH,
        detail: format!("native {}x{} preserved", NATIVE_LENGTH, NATIVE_WIDTH),
    });

    // Oversized requests clamp to native.
    let clamped = trim_template(99, 99);
    results.push(TestResult {
        name: "template_oversize_clamps".into(),
        passed: clamped.length_count() == NATIVE_LENGTH && clamped.width_count() == NATIVE_WIDTH,
        detail: "oversized request clamps to native".into(),
    });

    if verbose && !json {
        println!("  {} valid dimension pairs", valid_dimensions().len());
    }
    results
}

// ── 2. Layout Builder ───────────────────────────────────────────────────

fn validate_layout_builder(_verbose: bool, json: bool) -> Vec<TestResult> {
    if !json {
        println!("--- Layout Builder ---");
    }
    let mut results = Vec::new();

    let mut corners_ok = true;
    let mut tally_ok = true;
    let mut boundary_ok = true;
    for dims in valid_dimensions() {
        let layout = build_layout(dims.length_count, dims.width_count);
        let tally = PartTally::of(&layout);

        if tally.corner_walls != 4 {
            corners_ok = false;
        }
        if tally.total() != dims.length_count * dims.width_count {
            tally_ok = false;
        }
        let last_row = dims.length_count - 1;
        for col in 0..dims.width_count {
            for &row in &[0, last_row] {
                if layout.cell(row, col).kind.is_beam() {
                    boundary_ok = false;
                }
            }
        }
    }
    results.push(TestResult {
        name: "layout_four_corners".into(),
        passed: corners_ok,
        detail: "every layout has exactly 4 corner walls".into(),
    });
    results.push(TestResult {
        name: "layout_tally_covers_grid".into(),
        passed: tally_ok,
        detail: "part tally sums to length x width".into(),
    });
    results.push(TestResult {
        name: "layout_boundary_never_beams".into(),
        passed: boundary_ok,
        detail: "bow and stern rows are wall-family only".into(),
    });

    // Determinism: same dimensions, same grid.
    let a = build_layout(13, 7);
    let b = build_layout(13, 7);
    results.push(TestResult {
        name: "layout_deterministic".into(),
        passed: a == b,
        detail: "rebuilding 13x7 yields an identical grid".into(),
    });

    // Center cell of the center row is a floor with the mast on it.
    let layout = build_layout(9, 5);
    let center = layout.cell(layout.length_center(), layout.width_center());
    results.push(TestResult {
        name: "layout_center_is_floor".into(),
        passed: center.kind == PartKind::Floor,
        detail: format!("9x5 center cell is {:?}", center.kind),
    });

    results
}

// ── 3. Splines ──────────────────────────────────────────────────────────

fn validate_splines(_verbose: bool, json: bool) -> Vec<TestResult> {
    if !json {
        println!("--- Splines ---");
    }
    let mut results = Vec::new();

    let line = Spline::line(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0));
    let start = line.point_at(0.0);
    let end = line.point_at(1.0);
    results.push(TestResult {
        name: "spline_endpoints".into(),
        passed: start == Vec3::ZERO && end == Vec3::new(10.0, 0.0, 0.0),
        detail: "line spline hits both endpoints".into(),
    });

    let mid = line.point_at(0.5);
    results.push(TestResult {
        name: "spline_midpoint".into(),
        passed: (mid.x - 5.0).abs() < 1e-4,
        detail: format!("midpoint x = {:.4}", mid.x),
    });

    let over = line.point_at(2.0);
    results.push(TestResult {
        name: "spline_overshoot_clamps".into(),
        passed: over == end,
        detail: "t > 1 clamps to the terminal point".into(),
    });

    let bad = Spline::new(vec![Vec3::ZERO, Vec3::ONE]);
    results.push(TestResult {
        name: "spline_rejects_bad_counts".into(),
        passed: bad.is_err(),
        detail: "2 control points is not 3n+1".into(),
    });

    results
}

// ── 4. Pool Discipline ──────────────────────────────────────────────────

fn validate_pool(_verbose: bool, json: bool) -> Vec<TestResult> {
    if !json {
        println!("--- Pool Discipline ---");
    }
    let mut results = Vec::new();

    let mut scene = SceneGraph::new();
    let pool = AssetPool::populate(&mut scene, &PoolInventory::default_inventory());
    let mut rng = StdRng::seed_from_u64(100);

    let first = pool.select(&scene, PartClass::BaseFloor, 20, true, &mut rng);
    let second = pool.select(&scene, PartClass::BaseFloor, 20, true, &mut rng);
    results.push(TestResult {
        name: "pool_ordered_idempotent".into(),
        passed: first == second && first.len() == 20,
        detail: "repeated ordered selection is stable".into(),
    });

    for &e in &first {
        scene.set_active(e, true).expect("pool entry exists");
    }
    let third = pool.select(&scene, PartClass::BaseFloor, 20, true, &mut rng);
    results.push(TestResult {
        name: "pool_activation_excludes".into(),
        passed: third.iter().all(|e| !first.contains(e)),
        detail: "activated entries drop out of selection".into(),
    });

    let shortfall = pool.select(&scene, PartClass::Hull, 10, true, &mut rng);
    results.push(TestResult {
        name: "pool_shortfall_partial".into(),
        passed: shortfall.len() == 2,
        detail: format!("asked 10 hulls, got {}", shortfall.len()),
    });

    results
}

// ── 5. Lifecycle Sweep ──────────────────────────────────────────────────

fn validate_lifecycle(verbose: bool, json: bool) -> Vec<TestResult> {
    if !json {
        println!("--- Lifecycle Sweep ---");
    }
    let mut results = Vec::new();

    // Assembly across many random dimension draws.
    let mut assembled = 0usize;
    let mut rng = StdRng::seed_from_u64(500);
    for _ in 0..50 {
        let mut scene = SceneGraph::new();
        let pool = AssetPool::populate(&mut scene, &PoolInventory::default_inventory());
        let slot = scene.spawn_node();
        let dims = random_dimensions(&mut rng);
        if assemble(&mut scene, &pool, slot, dims, true, &mut rng).is_ok() {
            assembled += 1;
        }
    }
    results.push(TestResult {
        name: "lifecycle_assembly_sweep".into(),
        passed: assembled == 50,
        detail: format!("{}/50 random ships assembled", assembled),
    });

    // Full cycles through the engine, alternating destinations.
    let mut cycles_ok = true;
    let mut scored = 0u32;
    for seed in 0..10u64 {
        let mut engine = HarborEngine::new(
            HarborConfig {
                seed,
                walker_speed: 0.5,
                ..HarborConfig::default()
            },
            Routes::straight_harbor(),
        );
        for cycle in 0..4 {
            if engine.spawn_ship().is_err() {
                cycles_ok = false;
                break;
            }
            for _ in 0..8 {
                if engine.update(1.0).is_err() {
                    cycles_ok = false;
                }
            }
            let destination = if cycle % 2 == 0 {
                Destination::City
            } else {
                Destination::Out
            };
            if engine.route_ship(destination).is_err() {
                cycles_ok = false;
                break;
            }
            for _ in 0..8 {
                if engine.update(1.0).is_err() {
                    cycles_ok = false;
                }
            }
        }
        scored += engine.scoreboard().total();
        if verbose && !json {
            let board = engine.scoreboard();
            println!(
                "  seed {:2}: {} successes, {} failures",
                seed, board.successes, board.failures
            );
        }
    }
    results.push(TestResult {
        name: "lifecycle_engine_cycles".into(),
        passed: cycles_ok && scored == 40,
        detail: format!("{} routing decisions scored over 10 seeds", scored),
    });

    // Precondition guards hold.
    let mut engine = HarborEngine::new(
        HarborConfig {
            seed: 77,
            walker_speed: 0.5,
            ..HarborConfig::default()
        },
        Routes::straight_harbor(),
    );
    let no_dock = engine.route_ship(Destination::City) == Err(TrafficError::NoShipAtDock);
    engine.spawn_ship().expect("fresh engine spawns");
    let occupied = engine.spawn_ship() == Err(TrafficError::SlotOccupied);
    let approaching =
        engine.route_ship(Destination::City) == Err(TrafficError::ShipStillApproaching);
    results.push(TestResult {
        name: "lifecycle_precondition_guards".into(),
        passed: no_dock && occupied && approaching,
        detail: format!(
            "no_dock={} occupied={} approaching={}",
            no_dock, occupied, approaching
        ),
    });

    results
}
