/// Construction-time configuration errors.
///
/// These are programmer errors; nothing at runtime produces them.
#[derive(Debug, Clone, PartialEq)]
pub enum WaterConfigError {
    /// Fewer than two springs leaves the spacing undefined.
    TooFewSprings(usize),
    /// `to < from`, or a bound is not finite.
    InvalidRange { from: f32, to: f32 },
    /// Negative offset/extent, or a sub-range sticking out of its parent.
    InvalidSubRange { offset: f32, extent: f32 },
    /// Physical sub-range not contained in the simulation range.
    PhysicsRangeOutOfBounds {
        simulation: (f32, f32),
        physics: (f32, f32),
    },
}

impl std::fmt::Display for WaterConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooFewSprings(n) => write!(f, "at least 2 springs required, got {}", n),
            Self::InvalidRange { from, to } => write!(f, "invalid range: from={}, to={}", from, to),
            Self::InvalidSubRange { offset, extent } => {
                write!(f, "invalid sub-range: offset={}, extent={}", offset, extent)
            }
            Self::PhysicsRangeOutOfBounds {
                simulation,
                physics,
            } => write!(
                f,
                "physics range [{}, {}] not within simulation range [{}, {}]",
                physics.0, physics.1, simulation.0, simulation.1
            ),
        }
    }
}

impl std::error::Error for WaterConfigError {}
