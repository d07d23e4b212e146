/// Damped oscillator holding the surface height at one horizontal sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spring {
    x: f32,
    height: f32,
    velocity: f32,
}

impl Spring {
    pub fn new(x: f32, height: f32) -> Self {
        Self {
            x,
            height,
            velocity: 0.0,
        }
    }

    /// One semi-implicit Euler step toward `rest_level`.
    ///
    /// Velocity is advanced before height; keep that order.
    pub fn update(&mut self, stiffness: f32, dampening: f32, rest_level: f32) {
        let acceleration = stiffness * (rest_level - self.height) - dampening * self.velocity;
        self.velocity += acceleration;
        self.height += self.velocity;
    }

    pub fn add_velocity(&mut self, dv: f32) {
        self.velocity += dv;
    }

    pub fn add_height(&mut self, dh: f32) {
        self.height += dh;
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }
}
