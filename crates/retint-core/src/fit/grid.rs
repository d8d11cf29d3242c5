//! Exhaustive grid search over one to three parameters.
//!
//! Every combination of per-axis candidate values is evaluated; there is no
//! early exit. Cost is the product of the axis lengths, so a warning is
//! logged for large spaces and progress is reported while searching.
//!
//! # Complexity
//! O(Π axis_len × N) transforms for N anchors.

use std::sync::atomic::{AtomicU64, Ordering};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RetintError};
use crate::fit::objective::Objective;
use crate::fit::{FitResult, ParameterFitter};
use crate::transform::params::ParameterSet;

/// Spaces larger than this log a warning before searching.
pub const LARGE_SEARCH_WARNING: u64 = 1_000_000;

/// Slack when deciding whether the last step lands on the upper bound.
const STEP_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSearch {
    /// Step per axis. A single value applies to every axis.
    pub steps: Vec<f64>,
    /// Refuse to search more points than this.
    pub max_points: Option<u64>,
    /// Log progress every this many points (0 disables).
    pub progress_every: u64,
}

impl GridSearch {
    pub const MAX_DIMENSIONS: usize = 3;

    /// Grid with one step for every axis.
    pub fn with_step(step: f64) -> Self {
        Self {
            steps: vec![step],
            ..Self::default()
        }
    }

    fn step_for(&self, axis: usize) -> f64 {
        match self.steps.as_slice() {
            [] => 1.0,
            [single] => *single,
            many => many.get(axis).copied().unwrap_or(many[many.len() - 1]),
        }
    }

    /// Candidate values for every axis.
    pub fn axes(&self, set: &ParameterSet, bounds: &[(f64, f64)]) -> Result<Vec<Vec<f64>>> {
        bounds
            .iter()
            .enumerate()
            .map(|(i, &(min, max))| {
                let step = self.step_for(i);
                if !step.is_finite() || step <= 0.0 {
                    return Err(RetintError::InvalidStep {
                        name: set.params().get(i).map_or("?", |p| p.name()),
                        step,
                    });
                }
                Ok(axis_values(min, max, step))
            })
            .collect()
    }

    /// Number of points a search over `bounds` will evaluate.
    pub fn point_count(&self, set: &ParameterSet, bounds: &[(f64, f64)]) -> Result<u64> {
        Ok(total_points(&self.axes(set, bounds)?))
    }
}

fn total_points(axes: &[Vec<f64>]) -> u64 {
    axes.iter()
        .try_fold(1u64, |acc, a| acc.checked_mul(a.len() as u64))
        .unwrap_or(u64::MAX)
}

impl Default for GridSearch {
    fn default() -> Self {
        Self {
            steps: vec![1.0],
            max_points: None,
            progress_every: 1_000_000,
        }
    }
}

/// `min, min + step, …` up to `max`, always ending exactly on `max`.
pub fn axis_values(min: f64, max: f64, step: f64) -> Vec<f64> {
    let count = ((max - min) / step + STEP_TOLERANCE).floor() as usize;
    let mut values: Vec<f64> = (0..=count).map(|i| min + i as f64 * step).collect();
    if let Some(last) = values.last_mut() {
        if (max - *last).abs() <= STEP_TOLERANCE * step.max(1.0) {
            *last = max;
        } else {
            values.push(max);
        }
    }
    values
}

/// Mixed-radix decode of a flat point index; the last axis varies fastest.
fn point_at(axes: &[Vec<f64>], mut index: u64, out: &mut Vec<f64>) {
    out.clear();
    out.resize(axes.len(), 0.0);
    for (axis, slot) in axes.iter().zip(out.iter_mut()).rev() {
        let len = axis.len() as u64;
        *slot = axis[(index % len) as usize];
        index /= len;
    }
}

impl ParameterFitter for GridSearch {
    fn name(&self) -> &'static str {
        "grid"
    }

    fn search(&self, objective: &Objective<'_>, bounds: &[(f64, f64)]) -> Result<FitResult> {
        let dims = bounds.len();
        if dims == 0 || dims > Self::MAX_DIMENSIONS {
            return Err(RetintError::TooManyDimensions {
                strategy: "grid",
                max: Self::MAX_DIMENSIONS,
                actual: dims,
            });
        }

        let axes = self.axes(objective.set(), bounds)?;
        let total = total_points(&axes);

        if let Some(limit) = self.max_points {
            if total > limit {
                return Err(RetintError::SearchSpaceTooLarge {
                    points: total,
                    limit,
                });
            }
        }
        if total > LARGE_SEARCH_WARNING {
            tracing::warn!(
                "grid search will evaluate {total} points over {} anchors; \
                 a coarser step or the evolution strategy is much faster",
                objective.anchor_count()
            );
        } else {
            tracing::info!("grid search will evaluate {total} points");
        }

        let done = AtomicU64::new(0);
        let progress_every = self.progress_every;

        // Ties resolve to the lowest index so the result does not depend on
        // how rayon splits the range.
        let best = (0..total)
            .into_par_iter()
            .map_init(Vec::new, |point, index| {
                point_at(&axes, index, point);
                let error = objective.evaluate(point);
                if progress_every > 0 {
                    let n = done.fetch_add(1, Ordering::Relaxed) + 1;
                    if n % progress_every == 0 {
                        tracing::info!("grid search: {n}/{total} points");
                    }
                }
                (error, index)
            })
            .reduce(
                || (f64::INFINITY, u64::MAX),
                |a, b| match a.0.total_cmp(&b.0) {
                    std::cmp::Ordering::Less => a,
                    std::cmp::Ordering::Greater => b,
                    std::cmp::Ordering::Equal => {
                        if a.1 <= b.1 {
                            a
                        } else {
                            b
                        }
                    }
                },
            );

        let mut point = Vec::with_capacity(dims);
        point_at(&axes, best.1, &mut point);
        let params = objective.params_for(&point);
        tracing::info!("grid search best error {:.4} at {params}", best.0);

        Ok(FitResult {
            params,
            error: best.0,
            success: true,
            message: format!("exhaustive search over {total} points"),
            evaluations: objective.evaluations(),
            iterations: total as usize,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchors::AnchorSet;
    use crate::color::Color;
    use crate::fit::SearchSpace;
    use crate::transform::evaluate::transform;
    use crate::transform::params::{Param, ParameterSet, TransformParameters};

    #[test]
    fn test_axis_includes_both_bounds() {
        assert_eq!(axis_values(-1.0, 1.0, 0.5), vec![-1.0, -0.5, 0.0, 0.5, 1.0]);
        assert_eq!(axis_values(0.0, 1.0, 0.3).last(), Some(&1.0));
        assert_eq!(axis_values(0.0, 1.0, 0.3).len(), 5);
        assert_eq!(axis_values(2.0, 2.0, 1.0), vec![2.0]);
    }

    #[test]
    fn test_fine_step_hits_upper_bound_once() {
        let values = axis_values(-180.0, 180.0, 0.1);
        assert_eq!(values.len(), 3601);
        assert_eq!(values[0], -180.0);
        assert_eq!(values[3600], 180.0);
    }

    #[test]
    fn test_point_decoding_is_row_major() {
        let axes = vec![vec![0.0, 1.0], vec![10.0, 20.0, 30.0]];
        let mut p = Vec::new();
        point_at(&axes, 0, &mut p);
        assert_eq!(p, vec![0.0, 10.0]);
        point_at(&axes, 2, &mut p);
        assert_eq!(p, vec![0.0, 30.0]);
        point_at(&axes, 4, &mut p);
        assert_eq!(p, vec![1.0, 20.0]);
    }

    #[test]
    fn test_grid_recovers_lightness() {
        let truth = TransformParameters::hsl(0.0, 0.0, -20.0);
        let originals = [Color::new(200, 120, 40), Color::new(90, 180, 250)];
        let desired = originals.iter().map(|c| transform(*c, &truth)).collect();
        let anchors = AnchorSet::new(originals.to_vec(), desired).unwrap();

        let space = SearchSpace::new(ParameterSet::custom([Param::Dl]));
        let result = GridSearch::with_step(0.5).fit(&anchors, &space).unwrap();
        assert!(result.error < 1e-9);
        assert_eq!(result.iterations, 401);
        assert_eq!(result.evaluations, 401);
        assert_eq!(transform(originals[0], &result.params), transform(originals[0], &truth));
    }

    #[test]
    fn test_grid_is_deterministic() {
        let anchors = AnchorSet::single(Color::new(100, 150, 200), Color::new(60, 60, 60));
        let space = SearchSpace::new(ParameterSet::custom([Param::Ds, Param::Dl]));
        let grid = GridSearch::with_step(10.0);
        let a = grid.fit(&anchors, &space).unwrap();
        let b = grid.fit(&anchors, &space).unwrap();
        assert_eq!(a.params, b.params);
        assert_eq!(a.error, b.error);
    }

    #[test]
    fn test_grid_rejects_oversized_space() {
        let anchors = AnchorSet::single(Color::BLACK, Color::BLACK);
        let grid = GridSearch {
            steps: vec![1.0],
            max_points: Some(1000),
            ..GridSearch::default()
        };
        let err = grid.fit(&anchors, &SearchSpace::new(ParameterSet::hsl())).unwrap_err();
        assert!(matches!(err, RetintError::SearchSpaceTooLarge { .. }));
    }

    #[test]
    fn test_grid_rejects_four_dimensions() {
        let anchors = AnchorSet::single(Color::BLACK, Color::BLACK);
        let set = ParameterSet::custom([Param::Dr, Param::Dh, Param::Ds, Param::Dl]);
        let err = GridSearch::default().fit(&anchors, &SearchSpace::new(set)).unwrap_err();
        assert!(matches!(err, RetintError::TooManyDimensions { actual: 4, .. }));
    }

    #[test]
    fn test_point_count_of_full_hsl_grid() {
        let set = ParameterSet::hsl();
        let grid = GridSearch::default();
        assert_eq!(
            grid.point_count(&set, &set.default_bounds()).unwrap(),
            361 * 201 * 201
        );
        assert!(grid.point_count(&set, &set.default_bounds()).unwrap() > LARGE_SEARCH_WARNING);
        assert_eq!(
            GridSearch::with_step(20.0).point_count(&set, &set.default_bounds()).unwrap(),
            19 * 11 * 11
        );
    }

    #[test]
    fn test_grid_rejects_zero_step() {
        let anchors = AnchorSet::single(Color::BLACK, Color::BLACK);
        let space = SearchSpace::new(ParameterSet::custom([Param::Dl]));
        let err = GridSearch::with_step(0.0).fit(&anchors, &space).unwrap_err();
        assert!(matches!(err, RetintError::InvalidStep { name: "dl", .. }));
    }
}
