use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Drag-strip race sequencer: two cars, a staged launch, first across the
/// finish line wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RacePhase {
    Idle,
    Staging,
    Ready,
    Racing,
    Finished,
}

/// Track positions are percentages of the strip: cars stage at 5, the finish
/// line sits at 95.
const STAGE_LINE: f32 = 5.0;
const FINISH_LINE: f32 = 95.0;

/// Phase timings from race start, seconds.
const STAGE_ROLL_IN: f32 = 1.0;
const READY_AT: f32 = 3.0;
const LAUNCH_AT: f32 = 6.0;

#[derive(Debug, Clone)]
pub struct DragRace {
    phase: RacePhase,
    positions: [f32; 2],
    speeds: [f32; 2],
    timer: f32,
    winner: Option<usize>,
    rng: StdRng,
}

impl DragRace {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            phase: RacePhase::Idle,
            positions: [0.0; 2],
            speeds: [0.0; 2],
            timer: 0.0,
            winner: None,
            rng,
        }
    }

    pub fn phase(&self) -> RacePhase {
        self.phase
    }

    pub fn positions(&self) -> [f32; 2] {
        self.positions
    }

    pub fn winner(&self) -> Option<usize> {
        self.winner
    }

    /// Begin the staging sequence. Ignored unless the race is idle or
    /// finished.
    pub fn stage(&mut self) {
        if self.phase != RacePhase::Idle && self.phase != RacePhase::Finished {
            return;
        }

        self.positions = [0.0; 2];
        self.winner = None;
        self.timer = 0.0;
        // Slightly different launch speeds, track percent per tenth-second
        self.speeds = [
            self.rng.gen_range(2.0..3.0),
            self.rng.gen_range(2.0..3.0),
        ];
        self.phase = RacePhase::Staging;

        log::info!(
            "Race staged: car speeds {:.2} / {:.2}",
            self.speeds[0],
            self.speeds[1]
        );
    }

    pub fn tick(&mut self, dt: f32) {
        match self.phase {
            RacePhase::Idle | RacePhase::Finished => {}
            RacePhase::Staging => {
                self.timer += dt;
                if self.timer >= STAGE_ROLL_IN {
                    self.positions = [STAGE_LINE; 2];
                }
                if self.timer >= READY_AT {
                    self.phase = RacePhase::Ready;
                }
            }
            RacePhase::Ready => {
                self.timer += dt;
                if self.timer >= LAUNCH_AT {
                    self.phase = RacePhase::Racing;
                }
            }
            RacePhase::Racing => {
                // Speeds are percent per 100 ms, so scale by 10 per second
                let advanced = [
                    self.positions[0] + self.speeds[0] * 10.0 * dt,
                    self.positions[1] + self.speeds[1] * 10.0 * dt,
                ];
                self.positions = [advanced[0].min(FINISH_LINE), advanced[1].min(FINISH_LINE)];

                if advanced.iter().any(|&p| p >= FINISH_LINE) {
                    // Compare unclamped progress so a same-tick double finish
                    // still picks the faster car
                    self.winner = Some(if advanced[0] >= advanced[1] { 0 } else { 1 });
                    self.phase = RacePhase::Finished;

                    log::info!("Race finished, car {} wins", self.winner.unwrap() + 1);
                }
            }
        }
    }
}
