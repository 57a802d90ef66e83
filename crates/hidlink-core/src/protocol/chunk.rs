//! Exact-sum decomposition of 16-bit motion vectors into hardware steps.
//!
//! The physical pointer driver accepts only signed 8-bit step increments per
//! actuation, so a decoded `MouseMove` vector must be advanced in bounded
//! steps until exhausted.  [`StepIter`] clamps the next step of each axis to
//! `[-127, 127]`, yields the pair, and subtracts what it issued, so:
//!
//! - the issued steps sum to the requested `(dx, dy)` exactly, for every
//!   signed 16-bit input, and
//! - the two axes advance together (interleaved per iteration rather than
//!   all-X-then-all-Y), so diagonal motion looks continuous instead of
//!   L-shaped.
//!
//! The step count is the minimum possible: `ceil(max(|dx|, |dy|) / 127)`
//! iterations.

/// Largest per-axis step a single pointer actuation may carry.
///
/// `-128` is deliberately excluded to keep the step range symmetric.
pub const MAX_STEP: i16 = 127;

/// Iterator over `(i8, i8)` steps whose sum is exactly the requested vector.
///
/// # Examples
///
/// ```rust
/// use hidlink_core::StepIter;
///
/// let steps: Vec<(i8, i8)> = StepIter::new(300, -200).collect();
/// assert_eq!(steps, vec![(127, -127), (127, -73), (46, 0)]);
/// ```
#[derive(Debug, Clone)]
pub struct StepIter {
    remaining_dx: i16,
    remaining_dy: i16,
}

impl StepIter {
    /// Creates an iterator that decomposes `(dx, dy)`.
    pub fn new(dx: i16, dy: i16) -> Self {
        Self {
            remaining_dx: dx,
            remaining_dy: dy,
        }
    }
}

impl Iterator for StepIter {
    type Item = (i8, i8);

    fn next(&mut self) -> Option<(i8, i8)> {
        if self.remaining_dx == 0 && self.remaining_dy == 0 {
            return None;
        }
        let step_x = self.remaining_dx.clamp(-MAX_STEP, MAX_STEP);
        let step_y = self.remaining_dy.clamp(-MAX_STEP, MAX_STEP);
        self.remaining_dx -= step_x;
        self.remaining_dy -= step_y;
        Some((step_x as i8, step_y as i8))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn sum(dx: i16, dy: i16) -> (i32, i32) {
        StepIter::new(dx, dy).fold((0, 0), |(sx, sy), (x, y)| {
            (sx + i32::from(x), sy + i32::from(y))
        })
    }

    #[test]
    fn reference_example_decomposes_in_three_steps() {
        let steps: Vec<(i8, i8)> = StepIter::new(300, -200).collect();
        assert_eq!(steps, vec![(127, -127), (127, -73), (46, 0)]);
    }

    #[test]
    fn zero_vector_yields_no_steps() {
        assert_eq!(StepIter::new(0, 0).count(), 0);
    }

    #[test]
    fn small_vector_is_a_single_step() {
        let steps: Vec<(i8, i8)> = StepIter::new(-5, 127).collect();
        assert_eq!(steps, vec![(-5, 127)]);
    }

    #[test]
    fn every_step_is_within_the_hardware_bound() {
        for (x, y) in StepIter::new(i16::MAX, i16::MIN) {
            assert!((-127..=127).contains(&i16::from(x)));
            assert!((-127..=127).contains(&i16::from(y)));
        }
    }

    #[test]
    fn sums_are_exact_at_the_extremes() {
        assert_eq!(sum(i16::MAX, i16::MAX), (32767, 32767));
        assert_eq!(sum(i16::MIN, i16::MIN), (-32768, -32768));
        assert_eq!(sum(i16::MIN, i16::MAX), (-32768, 32767));
        assert_eq!(sum(-1, 1), (-1, 1));
    }

    #[test]
    fn step_count_is_minimal() {
        // ceil(max(|dx|, |dy|) / 127)
        assert_eq!(StepIter::new(300, -200).count(), 3);
        assert_eq!(StepIter::new(127, 0).count(), 1);
        assert_eq!(StepIter::new(128, 0).count(), 2);
        assert_eq!(StepIter::new(0, -32768).count(), 259);
    }

    #[test]
    fn exact_sum_over_a_sweep_of_vectors() {
        for dx in [-32768, -301, -128, -127, -1, 0, 1, 127, 128, 300, 32767i16] {
            for dy in [-32768, -200, -1, 0, 1, 254, 32767i16] {
                assert_eq!(sum(dx, dy), (i32::from(dx), i32::from(dy)), "({dx}, {dy})");
            }
        }
    }
}
