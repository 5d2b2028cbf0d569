/// Day/night clock. Purely derived lighting values for the renderer; nothing
/// here feeds back into traffic state.
#[derive(Debug, Clone)]
pub struct DayCycle {
    duration: f32,
    elapsed: f32,
}

impl DayCycle {
    pub fn new(duration: f32) -> Self {
        Self {
            duration,
            // Start at mid-day
            elapsed: duration * 0.5,
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.elapsed = (self.elapsed + dt) % self.duration;
    }

    /// Time of day in [0, 1): 0 is midnight, 0.5 is noon.
    pub fn fraction(&self) -> f32 {
        self.elapsed / self.duration
    }

    pub fn is_night(&self) -> bool {
        let f = self.fraction();
        f < 0.25 || f > 0.75
    }

    /// Sun angle around the horizon circle, radians.
    pub fn sun_angle(&self) -> f32 {
        self.fraction() * std::f32::consts::TAU
    }

    /// Directional light intensity: brightest at noon, floor of 0.2 at night.
    pub fn sun_intensity(&self) -> f32 {
        let daylight = (self.fraction() * std::f32::consts::PI).sin() * 0.5 + 0.5;
        0.2 + daylight * 0.8
    }
}
