use cityscape_sim::simulation::{DragRace, RacePhase};

#[test]
fn race_runs_through_its_phases() {
    let mut race = DragRace::new(Some(99));
    assert_eq!(race.phase(), RacePhase::Idle);

    race.stage();
    assert_eq!(race.phase(), RacePhase::Staging);
    assert_eq!(race.positions(), [0.0, 0.0]);

    // Cars roll to the staging line during the first second
    let dt = 0.1;
    for _ in 0..12 {
        race.tick(dt);
    }
    assert_eq!(race.positions(), [5.0, 5.0]);

    // Ready at three seconds, launch at six
    for _ in 0..20 {
        race.tick(dt);
    }
    assert_eq!(race.phase(), RacePhase::Ready);

    for _ in 0..30 {
        race.tick(dt);
    }
    assert_eq!(race.phase(), RacePhase::Racing);

    // Slowest possible launch speed still finishes within five seconds
    for _ in 0..50 {
        race.tick(dt);
    }
    assert_eq!(race.phase(), RacePhase::Finished);

    let winner = race.winner().unwrap();
    assert!(winner < 2);
    assert!(race.positions()[winner] >= 95.0);
    assert!(race.positions().iter().all(|&p| p <= 95.0));
}

#[test]
fn staging_is_ignored_mid_race() {
    let mut race = DragRace::new(Some(1));

    race.stage();
    for _ in 0..70 {
        race.tick(0.1);
    }
    assert_eq!(race.phase(), RacePhase::Racing);

    // A second stage request must not reset a running race
    let positions = race.positions();
    race.stage();
    assert_eq!(race.phase(), RacePhase::Racing);
    assert_eq!(race.positions(), positions);
}

#[test]
fn same_seed_produces_the_same_winner() {
    let run = |seed| {
        let mut race = DragRace::new(Some(seed));
        race.stage();
        for _ in 0..200 {
            race.tick(0.1);
        }
        race.winner().unwrap()
    };

    assert_eq!(run(5), run(5));
}
