//! Level curve derived from experience
//!
//! Reaching level `L` takes `50 * L * (L + 1)` experience in total.

/// Level and distance to the next level for a given experience
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub level: i32,
    pub until_next_level: i32,
}

impl Progress {
    /// Compute progress for a non-negative experience value.
    ///
    /// `level = floor((sqrt(2500 + 200 * experience) - 50) / 100)`
    pub fn for_experience(experience: i32) -> Self {
        let experience = experience.max(0);
        // 2500 + 200x is an exact square at every level threshold, so the
        // f64 root lands on whole numbers there.
        let root = (2500.0 + 200.0 * f64::from(experience)).sqrt();
        let level = ((root - 50.0) / 100.0).floor() as i32;

        Self {
            level,
            until_next_level: experience_for_level(level + 1) - experience,
        }
    }
}

/// Total experience needed to reach `level`.
pub fn experience_for_level(level: i32) -> i32 {
    50 * level * (level + 1)
}
