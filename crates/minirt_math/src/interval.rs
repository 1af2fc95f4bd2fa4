/// Closed range of ray parameters `[min, max]`.
///
/// Used as the distance window of shadow rays: an occluder only counts if it
/// sits strictly between the shaded point and the light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// Create a new interval given min and max values.
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Returns true if x is within the interval [min, max] (inclusive).
    pub fn contains(&self, x: f32) -> bool {
        self.min <= x && x <= self.max
    }

    /// Everything in front of a ray origin.
    pub const FORWARD: Interval = Interval {
        min: 0.0,
        max: f32::INFINITY,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_contains() {
        let interval = Interval::new(0.0, 10.0);

        // Inclusive bounds
        assert!(interval.contains(0.0));
        assert!(interval.contains(10.0));
        assert!(interval.contains(5.0));

        // Outside bounds
        assert!(!interval.contains(-0.1));
        assert!(!interval.contains(10.1));
    }

    #[test]
    fn test_inverted_window_contains_nothing() {
        // Shadow window to a light closer than epsilon
        let window = Interval::new(1e-5, -1e-5);
        assert!(!window.contains(0.0));
        assert!(!window.contains(1e-5));
        assert!(Interval::new(1.0, 1.0).contains(1.0));
    }

    #[test]
    fn test_interval_forward() {
        assert!(Interval::FORWARD.contains(0.0));
        assert!(Interval::FORWARD.contains(1e10));
        assert!(!Interval::FORWARD.contains(-1e-3));
    }
}
