//! Bounded compass search used to refine the best stochastic candidate.
//!
//! The objective is piecewise constant (every stage requantizes to 8 bits),
//! so the refinement probes coordinate directions with a shrinking step
//! instead of following a gradient.

use crate::fit::objective::Objective;

/// Initial step as a fraction of each bound's width.
const INITIAL_STEP_FRACTION: f64 = 0.05;
/// Stop once every step is below this fraction of its bound's width.
const MIN_STEP_FRACTION: f64 = 1e-4;
/// Upper limit on objective evaluations per polish.
pub const MAX_POLISH_EVALUATIONS: usize = 5_000;

/// Result of a polish pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Polished {
    pub x: Vec<f64>,
    pub error: f64,
    pub evaluations: usize,
}

/// Refine `start` (with known error `start_error`) inside `bounds`.
///
/// The returned point is never worse than `start`.
pub fn compass_search(
    objective: &Objective<'_>,
    bounds: &[(f64, f64)],
    start: &[f64],
    start_error: f64,
) -> Polished {
    let mut x = start.to_vec();
    let mut best = start_error;
    let mut evaluations = 0;
    let mut steps: Vec<f64> = bounds
        .iter()
        .map(|(lo, hi)| (hi - lo) * INITIAL_STEP_FRACTION)
        .collect();
    let min_steps: Vec<f64> = bounds
        .iter()
        .map(|(lo, hi)| (hi - lo) * MIN_STEP_FRACTION)
        .collect();

    while evaluations < MAX_POLISH_EVALUATIONS
        && steps.iter().zip(&min_steps).any(|(s, m)| s > m)
    {
        let mut improved = false;
        for axis in 0..x.len() {
            if steps[axis] <= min_steps[axis] {
                continue;
            }
            for direction in [1.0, -1.0] {
                let (lo, hi) = bounds[axis];
                let candidate = (x[axis] + direction * steps[axis]).clamp(lo, hi);
                if candidate == x[axis] {
                    continue;
                }
                let mut trial = x.clone();
                trial[axis] = candidate;
                let error = objective.evaluate(&trial);
                evaluations += 1;
                if error < best {
                    best = error;
                    x = trial;
                    improved = true;
                    break;
                }
            }
        }
        if !improved {
            for s in &mut steps {
                *s *= 0.5;
            }
        }
    }

    Polished {
        x,
        error: best,
        evaluations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchors::AnchorSet;
    use crate::color::Color;
    use crate::transform::params::{Param, ParameterSet, TransformParameters};

    #[test]
    fn test_polish_never_gets_worse() {
        let anchors = AnchorSet::single(Color::new(200, 100, 50), Color::new(100, 50, 25));
        let set = ParameterSet::custom([Param::Dl]);
        let obj = Objective::new(&anchors, &set, TransformParameters::IDENTITY).unwrap();
        let bounds = [(-100.0, 100.0)];

        let start = [-30.0];
        let start_error = obj.evaluate(&start);
        let polished = compass_search(&obj, &bounds, &start, start_error);
        assert!(polished.error <= start_error);
        assert!(polished.error < 1.0, "error {}", polished.error);
        assert!(polished.evaluations <= MAX_POLISH_EVALUATIONS);
    }

    #[test]
    fn test_polish_respects_bounds() {
        let anchors = AnchorSet::single(Color::new(200, 100, 50), Color::new(0, 0, 0));
        let set = ParameterSet::custom([Param::Dl]);
        let obj = Objective::new(&anchors, &set, TransformParameters::IDENTITY).unwrap();
        let bounds = [(-60.0, 0.0)];
        let start_error = obj.evaluate(&[-10.0]);
        let polished = compass_search(&obj, &bounds, &[-10.0], start_error);
        assert!(polished.x[0] >= -60.0 && polished.x[0] <= 0.0);
        assert_eq!(polished.x[0], -60.0);
    }
}
