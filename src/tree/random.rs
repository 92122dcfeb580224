//! Deterministic pseudo-random floats for the skeleton builder.

/// Largest value [`SeededRandom::random`] can return
const ONE_BELOW: f32 = 1.0 - f32::EPSILON;

/// Counter-based generator producing reproducible floats in `[0, 1)`.
///
/// The counter starts at the seed and advances on every draw. A generator is
/// created per generation run, so identical properties always replay the same
/// sequence.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    seed: i32,
    state: i32,
}

impl SeededRandom {
    /// Create a generator whose counter starts at `seed`
    pub fn new(seed: i32) -> Self {
        Self { seed, state: seed }
    }

    /// Rewind the counter to the seed
    pub fn reset(&mut self) {
        self.state = self.seed;
    }

    /// Current value of the internal counter
    pub fn state(&self) -> i32 {
        self.state
    }

    /// Number of values drawn since creation or the last reset
    pub fn draws(&self) -> i32 {
        self.state.wrapping_sub(self.seed)
    }

    /// Draw a value in `[0, 1)`.
    ///
    /// A non-zero `fixed` is mixed with the number of draws made so far, so a
    /// call site that always passes the same fixed value still gets distinct
    /// values within a run. With `fixed == 0.0` the value comes from the counter
    /// alone. Either way the counter advances by one.
    pub fn random(&mut self, fixed: f32) -> f32 {
        let a = if fixed != 0.0 {
            fixed + self.draws() as f32
        } else {
            self.state as f32
        };
        self.state = self.state.wrapping_add(1);
        (a + a * a).cos().abs().min(ONE_BELOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_in_unit_interval() {
        let mut random = SeededRandom::new(262);
        for i in 0..2000 {
            let fixed = if i % 3 == 0 { 0.0 } else { i as f32 * 0.37 };
            let value = random.random(fixed);
            assert!((0.0..1.0).contains(&value), "value {} out of range", value);
        }
    }

    #[test]
    fn test_every_draw_advances_state() {
        let mut random = SeededRandom::new(10);
        random.random(0.0);
        random.random(5.0);
        assert_eq!(random.state(), 12);
        assert_eq!(random.draws(), 2);
    }

    #[test]
    fn test_same_fixed_value_diverges_within_run() {
        let mut random = SeededRandom::new(262);
        let first = random.random(17.0);
        let second = random.random(17.0);
        assert_ne!(first, second);
    }

    #[test]
    fn test_reset_replays_sequence() {
        let mut random = SeededRandom::new(-4);
        let first: Vec<f32> = (0..16).map(|i| random.random(i as f32)).collect();
        random.reset();
        let second: Vec<f32> = (0..16).map(|i| random.random(i as f32)).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_seed_changes_sequence() {
        let mut a = SeededRandom::new(1);
        let mut b = SeededRandom::new(2);
        let a_values: Vec<f32> = (0..8).map(|_| a.random(0.0)).collect();
        let b_values: Vec<f32> = (0..8).map(|_| b.random(0.0)).collect();
        assert_ne!(a_values, b_values);
    }
}
