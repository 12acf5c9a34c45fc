use cellsim_core::{
    seeded_source, Automaton, AutostopPolicy, AutostopReason, CellCoord, CellValue, Preset,
    SimulationMode, Topology,
};
use cellsim_grid::SquareGrid;
use cellsim_system_life::{fingerprint, LifeAutomaton, LifeRule};

fn life(dimension: u32, topology: Topology) -> LifeAutomaton {
    LifeAutomaton::new(dimension, topology).expect("dimension within bounds")
}

fn paint(automaton: &mut LifeAutomaton, cells: &[(u32, u32)]) {
    for (row, column) in cells {
        assert!(automaton.set_cell(CellCoord::new(*row, *column), true));
    }
}

fn alive_cells(automaton: &LifeAutomaton) -> Vec<CellCoord> {
    automaton
        .cells()
        .coords()
        .filter(|cell| automaton.cells().get(*cell) == Some(&true))
        .collect()
}

#[test]
fn blinker_returns_after_two_steps() {
    let mut automaton = life(20, Topology::Bounded);
    automaton.load_preset(Preset::Blinker);
    let initial = automaton.cells().clone();

    let first = automaton.step();
    assert!(first.changed);
    assert_ne!(automaton.cells(), &initial);
    assert_eq!(
        alive_cells(&automaton),
        vec![
            CellCoord::new(9, 10),
            CellCoord::new(10, 10),
            CellCoord::new(11, 10)
        ]
    );

    let second = automaton.step();
    assert!(second.changed);
    assert_eq!(second.generation, 2);
    assert_eq!(automaton.cells(), &initial);
}

#[test]
fn empty_grid_reports_extinction_without_change() {
    let mut automaton = life(10, Topology::Bounded);
    let report = automaton.step();
    assert!(!report.changed);
    assert_eq!(report.autostop, Some(AutostopReason::Extinction));
}

#[test]
fn lone_cell_dies_and_reports_extinction() {
    let mut automaton = life(10, Topology::Toroidal);
    paint(&mut automaton, &[(4, 4)]);
    let report = automaton.step();
    assert!(report.changed);
    assert_eq!(report.autostop, Some(AutostopReason::Extinction));
    assert!(automaton.is_extinct());
}

#[test]
fn still_life_reports_stagnation() {
    let mut automaton = life(10, Topology::Bounded);
    paint(&mut automaton, &[(5, 5), (5, 6), (6, 5), (6, 6)]);
    let report = automaton.step();
    assert!(!report.changed);
    assert_eq!(report.autostop, Some(AutostopReason::Stagnation));
    assert_eq!(automaton.alive_count(), 4);
}

#[test]
fn disabled_conditions_never_halt() {
    let mut automaton = life(10, Topology::Bounded);
    automaton.set_policy(AutostopPolicy::disabled());
    for _ in 0..5 {
        assert_eq!(automaton.step().autostop, None);
    }
}

#[test]
fn oscillator_triggers_cycle_detection_within_history() {
    let mut automaton = life(20, Topology::Bounded);
    automaton.set_policy(AutostopPolicy {
        extinction: true,
        stagnation: true,
        cycle: true,
    });
    automaton.load_preset(Preset::Blinker);

    let cap = automaton.history().capacity();
    let mut halted = None;
    for _ in 0..cap {
        let report = automaton.step();
        if report.autostop.is_some() {
            halted = Some(report);
            break;
        }
    }

    let report = halted.expect("cycle detected within the history cap");
    assert_eq!(report.autostop, Some(AutostopReason::CycleDetected));
    assert_eq!(report.generation, 3);
}

#[test]
fn history_never_exceeds_cap() {
    let mut automaton = life(10, Topology::Toroidal);
    automaton.set_policy(AutostopPolicy::disabled());
    automaton.set_history_capacity(4);
    automaton.load_preset(Preset::Glider);
    for _ in 0..12 {
        let _ = automaton.step();
    }
    assert_eq!(automaton.history().len(), 4);
    assert_eq!(
        automaton.history().latest(),
        Some(&fingerprint(automaton.cells()))
    );
}

#[test]
fn glider_wraps_around_torus() {
    let mut automaton = life(10, Topology::Toroidal);
    automaton.load_preset(Preset::Glider);
    let initial = automaton.cells().clone();
    for _ in 0..40 {
        let _ = automaton.step();
    }
    assert_eq!(automaton.cells(), &initial);
    assert_eq!(automaton.alive_count(), 5);
}

#[test]
fn custom_rule_changes_births() {
    let mut automaton = life(10, Topology::Bounded);
    automaton.set_rule(LifeRule::parse("B2/S").expect("rule parses"));
    paint(&mut automaton, &[(4, 4), (4, 5)]);
    let _ = automaton.step();
    // Both seeds die; the four cells touching both of them are born.
    assert_eq!(automaton.alive_count(), 4);
    assert_eq!(automaton.cells().get(CellCoord::new(4, 4)), Some(&false));
}

#[test]
fn top_k_selects_largest_variates_with_stable_ties() {
    let mut automaton = life(5, Topology::Bounded);
    let mut values = vec![0.5; 25];
    values[7] = 0.9;
    automaton.load_top_k(&values, 3);
    assert_eq!(
        alive_cells(&automaton),
        vec![CellCoord::new(0, 0), CellCoord::new(0, 1), CellCoord::new(1, 2)]
    );
}

#[test]
fn top_k_with_zero_is_a_no_op() {
    let mut automaton = life(5, Topology::Bounded);
    paint(&mut automaton, &[(2, 2)]);
    automaton.load_top_k(&[1.0; 25], 0);
    assert_eq!(alive_cells(&automaton), vec![CellCoord::new(2, 2)]);
}

#[test]
fn variates_only_touch_supplied_cells() {
    let mut automaton = life(5, Topology::Bounded);
    paint(&mut automaton, &[(4, 4)]);
    automaton.load_from_variates(&[0.5, 0.49, 1.0], 0.5);
    assert_eq!(
        alive_cells(&automaton),
        vec![CellCoord::new(0, 0), CellCoord::new(0, 2), CellCoord::new(4, 4)]
    );
}

#[test]
fn randomize_honours_extreme_fill_probabilities() {
    let mut source = seeded_source(11);
    let mut automaton = life(8, Topology::Bounded);
    automaton.randomize(&mut source, 1.0);
    assert_eq!(automaton.alive_count(), 64);
    automaton.randomize(&mut source, 0.0);
    assert!(automaton.is_extinct());
}

#[test]
fn seeded_randomize_is_deterministic() {
    let mut first = life(12, Topology::Toroidal);
    let mut second = life(12, Topology::Toroidal);
    first.randomize(&mut seeded_source(99), 0.3);
    second.randomize(&mut seeded_source(99), 0.3);
    assert_eq!(first.cells(), second.cells());
}

#[test]
fn snapshot_exposes_binary_cells() {
    let mut cells = SquareGrid::new(6, false);
    assert!(cells.set(CellCoord::new(1, 2), true));
    let automaton = LifeAutomaton::from_cells(cells, Topology::Toroidal).expect("valid grid");
    let snapshot = automaton.snapshot();
    assert_eq!(snapshot.mode(), SimulationMode::Life);
    assert_eq!(snapshot.dimensions(), (6, 6));
    assert!(snapshot.topology().is_toroidal());
    assert_eq!(
        snapshot.cell(CellCoord::new(1, 2)),
        Some(CellValue::Binary(true))
    );
    assert_eq!(snapshot.iter().count(), 36);
}
