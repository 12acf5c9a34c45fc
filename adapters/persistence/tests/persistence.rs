use std::path::PathBuf;

use cellsim_core::{
    seeded_source, CellCoord, CellValue, EpidemicState, ImportFormatError, Preset, SimulationMode,
    Topology,
};
use cellsim_persistence::{export, import, load, save, PersistenceError};
use cellsim_simulation::{query, Simulation};

fn square_payload(mode: &str, dimension: u32, toroidal: u8, token: &str) -> String {
    let mut text = format!("mode,{mode}\nn,{dimension},toroidal,{toroidal}\n");
    let row = vec![token; dimension as usize].join(",");
    for _ in 0..dimension {
        text.push_str(&row);
        text.push('\n');
    }
    text
}

fn scratch_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("cellsim-{}-{name}.csv", std::process::id()))
}

#[test]
fn life_grid_round_trips_cells_and_topology() {
    let mut source = Simulation::default();
    source.resize(12, Topology::Toroidal).expect("valid size");
    source.load_preset(Preset::Glider).expect("life mode");

    let text = export(&source);
    assert!(text.starts_with("mode,conway\nn,12,toroidal,1\n"));

    let mut restored = Simulation::default();
    import(&mut restored, &text).expect("round trip");
    assert_eq!(restored.mode(), SimulationMode::Life);
    assert_eq!(restored.snapshot(), source.snapshot());
    assert_eq!(query::topology(&restored), Topology::Toroidal);
}

#[test]
fn epidemic_grid_writes_state_letters() {
    let mut simulation = Simulation::default();
    simulation.resize(5, Topology::Bounded).expect("valid size");
    simulation
        .select_mode(SimulationMode::Epidemic)
        .expect("mode switch");
    let _ = simulation.edit_cell(CellCoord::new(0, 0));

    let text = export(&simulation);
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("mode,covid"));
    assert_eq!(lines.next(), Some("n,5,toroidal,0"));
    assert_eq!(lines.next(), Some("I,S,S,S,S"));

    let mut restored = Simulation::default();
    import(&mut restored, &text).expect("round trip");
    assert_eq!(restored.mode(), SimulationMode::Epidemic);
    assert_eq!(query::flat_state(&restored), query::flat_state(&simulation));
}

#[test]
fn rejected_payload_leaves_state_untouched() {
    let mut simulation = Simulation::default();
    simulation.load_preset(Preset::Blinker).expect("life mode");
    let before = simulation.snapshot();

    let mut text = square_payload("conway", 5, 0, "1");
    text.push_str("1,1,1,1,1\n");
    let error = import(&mut simulation, &text).expect_err("six rows for n=5");
    assert!(matches!(
        error,
        PersistenceError::Format(ImportFormatError::RowCountMismatch {
            expected: 5,
            found: 6
        })
    ));
    assert_eq!(simulation.snapshot(), before);
}

#[test]
fn rejects_grids_below_minimum_dimension() {
    let mut simulation = Simulation::default();
    let error = import(&mut simulation, &square_payload("conway", 4, 0, "0"))
        .expect_err("dimension below minimum");
    assert!(matches!(
        error,
        PersistenceError::Format(ImportFormatError::Dimension(_))
    ));
}

#[test]
fn lenient_tokens_fall_back_to_empty_cells() {
    let mut simulation = Simulation::default();
    let text = "mode,conway\nn,5,toroidal,0\n\
                1,2.5,x,0,-1\n0,0,0,0,0\n0,0,0,0,0\n0,0,0,0,0\n0,0,0,0,0\n";
    import(&mut simulation, text).expect("lenient import");

    let snapshot = simulation.snapshot();
    let alive: Vec<_> = (0..5)
        .map(|column| snapshot.cell(CellCoord::new(0, column)))
        .collect();
    assert_eq!(
        alive,
        vec![
            Some(CellValue::Binary(true)),
            Some(CellValue::Binary(true)),
            Some(CellValue::Binary(false)),
            Some(CellValue::Binary(false)),
            Some(CellValue::Binary(true)),
        ]
    );

    let mut epidemic = Simulation::default();
    import(&mut epidemic, &square_payload("covid", 5, 1, "7")).expect("lenient import");
    let census = query::census(&epidemic).expect("epidemic mode");
    assert_eq!(census.count(EpidemicState::Susceptible), 25);
}

#[test]
fn fractional_life_tokens_truncate_toward_zero() {
    let mut simulation = Simulation::default();
    let text = "mode,conway\nn,5,toroidal,0\n\
                0.5,-0.9,1.9,-1.2,0\n0,0,0,0,0\n0,0,0,0,0\n0,0,0,0,0\n0,0,0,0,0\n";
    import(&mut simulation, text).expect("lenient import");

    let snapshot = simulation.snapshot();
    let alive: Vec<_> = (0..4)
        .map(|column| snapshot.cell(CellCoord::new(0, column)))
        .collect();
    assert_eq!(
        alive,
        vec![
            Some(CellValue::Binary(false)),
            Some(CellValue::Binary(false)),
            Some(CellValue::Binary(true)),
            Some(CellValue::Binary(true)),
        ]
    );
}

#[test]
fn elementary_history_round_trips() {
    let mut simulation = Simulation::default();
    simulation
        .select_mode(SimulationMode::Elementary)
        .expect("mode switch");
    let _ = simulation.apply_elementary_rule(110).expect("valid rule");
    simulation.seed_single().expect("elementary mode");
    for _ in 0..5 {
        let _ = simulation.step_once(&mut seeded_source(0));
    }

    let text = export(&simulation);
    assert!(text.starts_with("mode,1d\nwidth,100,generations,100\nrule,110\n"));
    assert_eq!(text.lines().count(), 3 + 6);

    let mut restored = Simulation::default();
    import(&mut restored, &text).expect("round trip");
    assert_eq!(restored.mode(), SimulationMode::Elementary);
    assert_eq!(query::elementary_rule(&restored).number(), 110);
    assert_eq!(restored.snapshot().dimensions(), (6, 100));
    assert_eq!(
        query::elementary_history(&restored).map(|history| history.len()),
        Some(6)
    );
}

#[test]
fn cleared_strip_exports_its_current_row() {
    let mut simulation = Simulation::default();
    simulation
        .select_mode(SimulationMode::Elementary)
        .expect("mode switch");
    let text = export(&simulation);
    assert_eq!(text.lines().count(), 4);

    let mut restored = Simulation::default();
    import(&mut restored, &text).expect("round trip");
    assert_eq!(restored.snapshot().dimensions(), (1, 100));
}

#[test]
fn rejects_unknown_modes() {
    let mut simulation = Simulation::default();
    let error = import(&mut simulation, "mode,hexagonal\nn,5,toroidal,0\n")
        .expect_err("unknown mode");
    assert!(matches!(
        error,
        PersistenceError::Format(ImportFormatError::UnknownMode(ref tag)) if tag == "hexagonal"
    ));
    assert_eq!(simulation.mode(), SimulationMode::Life);
}

#[test]
fn rejects_out_of_range_elementary_rule() {
    let mut simulation = Simulation::default();
    let mut text = String::from("mode,1d\nwidth,50,generations,50\nrule,300\n");
    text.push_str(&vec!["0"; 50].join(","));
    assert!(matches!(
        import(&mut simulation, &text),
        Err(PersistenceError::Format(ImportFormatError::Rule(_)))
    ));
}

#[test]
fn save_and_load_through_the_filesystem() {
    let path = scratch_path("life");
    let mut simulation = Simulation::default();
    simulation.load_preset(Preset::Beacon).expect("life mode");
    save(&simulation, &path).expect("writable temp dir");

    let mut restored = Simulation::default();
    load(&mut restored, &path).expect("readable file");
    assert_eq!(restored.snapshot(), simulation.snapshot());

    std::fs::remove_file(&path).expect("cleanup");
    assert!(matches!(
        load(&mut restored, &path),
        Err(PersistenceError::Io { .. })
    ));
}
