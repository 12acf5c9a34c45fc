use cellsim_core::{
    seeded_source, Automaton, AutostopReason, CellCoord, EpidemicParams, EpidemicState, Topology,
    UniformSource,
};
use cellsim_grid::neighbors;
use cellsim_system_epidemic::{EpidemicAutomaton, EpidemicCell};

/// Returns the same variate forever and always picks the first candidate.
struct ConstantSource(f64);

impl UniformSource for ConstantSource {
    fn draw(&mut self) -> f64 {
        self.0
    }

    fn choose_index(&mut self, _len: usize) -> usize {
        0
    }
}

/// Replays a fixed draw sequence, then keeps returning `fallback`.
struct ScriptedSource {
    draws: std::collections::VecDeque<f64>,
    fallback: f64,
}

impl UniformSource for ScriptedSource {
    fn draw(&mut self) -> f64 {
        self.draws.pop_front().unwrap_or(self.fallback)
    }

    fn choose_index(&mut self, _len: usize) -> usize {
        0
    }
}

fn epidemic(dimension: u32, params: EpidemicParams) -> EpidemicAutomaton {
    let mut automaton =
        EpidemicAutomaton::new(dimension, Topology::Bounded).expect("dimension within bounds");
    automaton.set_params(params).expect("valid parameters");
    automaton
}

#[test]
fn population_is_conserved_every_step() {
    let mut automaton = epidemic(
        20,
        EpidemicParams {
            initial_infected: 0.1,
            initial_vaccinated: 0.1,
            infection_probability: 0.4,
            movement_probability: 0.5,
            recovery_time: 5,
        },
    );
    let mut source = seeded_source(17);
    automaton.randomize(&mut source);
    for _ in 0..60 {
        let _ = automaton.step(&mut source);
        assert_eq!(automaton.census().total(), 400);
    }
}

#[test]
fn infected_never_grow_without_transmission() {
    let mut automaton = epidemic(
        15,
        EpidemicParams {
            initial_infected: 0.3,
            infection_probability: 0.0,
            movement_probability: 0.6,
            recovery_time: 4,
            ..EpidemicParams::default()
        },
    );
    let mut source = seeded_source(3);
    automaton.randomize(&mut source);
    let mut infected = automaton.census().infected;
    for _ in 0..10 {
        let _ = automaton.step(&mut source);
        let now = automaton.census().infected;
        assert!(now <= infected, "infected grew from {infected} to {now}");
        infected = now;
    }
}

#[test]
fn certain_transmission_reaches_only_direct_neighbors() {
    let mut automaton = epidemic(
        5,
        EpidemicParams {
            infection_probability: 1.0,
            movement_probability: 0.0,
            recovery_time: 10,
            ..EpidemicParams::default()
        },
    );
    assert!(automaton.set_cell(CellCoord::new(2, 2), EpidemicState::Infected));

    let report = automaton.step(&mut ConstantSource(0.0));
    assert!(report.changed);
    assert_eq!(report.autostop, None);

    let census = automaton.census();
    assert_eq!(census.infected, 9);
    assert_eq!(census.susceptible, 16);
    let center = automaton.cells().get(CellCoord::new(2, 2)).copied();
    assert_eq!(center.map(|cell| cell.infection_age), Some(1));
    let fresh = automaton.cells().get(CellCoord::new(1, 1)).copied();
    assert_eq!(fresh.map(|cell| cell.infection_age), Some(0));
}

#[test]
fn recovery_happens_after_configured_duration() {
    let mut automaton = epidemic(
        5,
        EpidemicParams {
            infection_probability: 0.0,
            movement_probability: 0.0,
            recovery_time: 3,
            ..EpidemicParams::default()
        },
    );
    assert!(automaton.set_cell(CellCoord::new(0, 0), EpidemicState::Infected));
    let mut source = ConstantSource(0.5);

    for _ in 0..2 {
        let report = automaton.step(&mut source);
        assert_eq!(report.autostop, None);
    }
    let report = automaton.step(&mut source);
    assert_eq!(report.autostop, Some(AutostopReason::EpidemicContained));
    assert_eq!(
        automaton.cells().get(CellCoord::new(0, 0)).map(|cell| cell.state),
        Some(EpidemicState::Recovered)
    );
    assert_eq!(automaton.statistics().len(), 3);
    assert_eq!(
        automaton.statistics().series(EpidemicState::Infected),
        vec![1, 1, 0]
    );
}

#[test]
fn fully_vaccinated_population_is_static() {
    let mut automaton = epidemic(
        6,
        EpidemicParams {
            initial_infected: 0.0,
            initial_vaccinated: 1.0,
            movement_probability: 0.0,
            ..EpidemicParams::default()
        },
    );
    let mut source = seeded_source(5);
    automaton.randomize(&mut source);
    assert_eq!(automaton.census().vaccinated, 36);

    let report = automaton.step(&mut source);
    assert!(!report.changed);
    assert_eq!(report.autostop, Some(AutostopReason::EpidemicContained));
}

#[test]
fn randomize_records_initial_census() {
    let mut automaton = epidemic(
        10,
        EpidemicParams {
            initial_infected: 1.0,
            ..EpidemicParams::default()
        },
    );
    automaton.randomize(&mut seeded_source(1));
    assert_eq!(automaton.census().infected, 100);
    assert_eq!(automaton.statistics().latest().map(|c| c.infected), Some(100));
    assert_eq!(automaton.generation(), 0);
}

#[test]
fn seeded_runs_replay_identically() {
    let params = EpidemicParams {
        initial_infected: 0.05,
        initial_vaccinated: 0.1,
        ..EpidemicParams::default()
    };
    let run = || {
        let mut automaton = epidemic(25, params);
        let mut source = seeded_source(0xC0FFEE);
        automaton.randomize(&mut source);
        for _ in 0..40 {
            let _ = automaton.advance(&mut source);
        }
        (automaton.snapshot(), automaton.statistics().to_series())
    };
    assert_eq!(run(), run());
}

#[test]
fn clear_makes_everyone_susceptible() {
    let mut automaton = epidemic(5, EpidemicParams::default());
    let _ = automaton.cycle_cell(CellCoord::new(3, 3));
    automaton.clear();
    assert_eq!(automaton.census().susceptible, 25);
    assert!(automaton.statistics().is_empty());
}

#[test]
fn movement_carries_infection_age_with_the_individual() {
    let params = EpidemicParams {
        infection_probability: 0.0,
        movement_probability: 0.0,
        recovery_time: 10,
        ..EpidemicParams::default()
    };
    let mut automaton = epidemic(5, params);
    let origin = CellCoord::new(2, 2);
    assert!(automaton.set_cell(origin, EpidemicState::Infected));
    let _ = automaton.step(&mut ConstantSource(0.9));
    assert_eq!(
        automaton.cells().get(origin).map(|cell| cell.infection_age),
        Some(1)
    );

    automaton
        .set_params(EpidemicParams {
            movement_probability: 0.5,
            ..params
        })
        .expect("valid parameters");
    // Only the origin, at row-major index 12, draws below the movement probability.
    let mut draws = std::collections::VecDeque::from(vec![0.9; 12]);
    draws.push_back(0.0);
    let mut source = ScriptedSource {
        draws,
        fallback: 0.9,
    };
    let _ = automaton.step(&mut source);

    let destination = neighbors(5, Topology::Bounded, origin).as_slice()[0];
    assert_eq!(
        automaton.cells().get(destination).copied(),
        Some(EpidemicCell {
            state: EpidemicState::Infected,
            infection_age: 2,
        })
    );
    assert_eq!(
        automaton.cells().get(origin).copied(),
        Some(EpidemicCell::new(EpidemicState::Susceptible))
    );
    assert_eq!(automaton.census().infected, 1);
}
