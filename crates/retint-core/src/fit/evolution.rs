//! Differential evolution (`best1bin`) for up to seven parameters.
//!
//! # Algorithm
//! 1. Latin hypercube initial population of `population_size × dims` members
//! 2. Per generation, draw a dithered mutation factor `F ∈ [lo, hi)`
//! 3. For each member: mutant = best + F × (r1 − r2), binomial crossover
//!    with at least one mutant coordinate, out-of-bounds coordinates are
//!    resampled uniformly
//! 4. Greedy, immediate replacement; the best member is tracked as we go
//! 5. Stop when `std(energies) <= atol + tol × |mean(energies)|`
//! 6. Optionally polish the best member with a bounded compass search
//!
//! Runs are reproducible when `seed` is set.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{Result, RetintError};
use crate::fit::objective::Objective;
use crate::fit::polish::compass_search;
use crate::fit::{FitResult, ParameterFitter};
use crate::transform::params::Param;

/// Message reported when the generation limit is reached.
pub const MAX_ITERATIONS_MESSAGE: &str = "Maximum number of iterations has been exceeded.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifferentialEvolution {
    /// Generation limit.
    pub max_generations: usize,
    /// Population members per free parameter.
    pub population_size: usize,
    /// Dither range for the mutation factor.
    pub mutation: (f64, f64),
    /// Crossover probability.
    pub recombination: f64,
    /// Relative convergence tolerance.
    pub tolerance: f64,
    /// Absolute convergence tolerance.
    pub atol: f64,
    /// Fixed seed for reproducible runs.
    pub seed: Option<u64>,
    /// Refine the best member after the evolution ends.
    pub polish: bool,
}

impl Default for DifferentialEvolution {
    fn default() -> Self {
        Self {
            max_generations: 1000,
            population_size: 15,
            mutation: (0.5, 1.0),
            recombination: 0.7,
            tolerance: 0.01,
            atol: 0.0,
            seed: None,
            polish: true,
        }
    }
}

impl DifferentialEvolution {
    pub const MAX_DIMENSIONS: usize = Param::ALL.len();

    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

/// Population in unit-cube coordinates plus cached energies.
struct Population {
    members: Vec<Vec<f64>>,
    energies: Vec<f64>,
    best: usize,
}

impl Population {
    fn converged(&self, atol: f64, tol: f64) -> bool {
        let n = self.energies.len() as f64;
        let mean = self.energies.iter().sum::<f64>() / n;
        let var = self.energies.iter().map(|e| (e - mean).powi(2)).sum::<f64>() / n;
        var.sqrt() <= atol + tol * mean.abs()
    }
}

fn scale(unit: &[f64], bounds: &[(f64, f64)]) -> Vec<f64> {
    unit.iter()
        .zip(bounds)
        .map(|(u, (lo, hi))| lo + u * (hi - lo))
        .collect()
}

fn latin_hypercube(rng: &mut StdRng, count: usize, dims: usize) -> Vec<Vec<f64>> {
    let segment = 1.0 / count as f64;
    let mut members = vec![vec![0.0; dims]; count];
    for d in 0..dims {
        let mut strata: Vec<usize> = (0..count).collect();
        strata.shuffle(rng);
        for (member, stratum) in members.iter_mut().zip(strata) {
            member[d] = (stratum as f64 + rng.r#gen::<f64>()) * segment;
        }
    }
    members
}

/// Two distinct indices, both different from `exclude`.
fn pick_two(rng: &mut StdRng, count: usize, exclude: usize) -> (usize, usize) {
    let mut pick = |other: Option<usize>| loop {
        let i = rng.gen_range(0..count);
        if i != exclude && Some(i) != other {
            return i;
        }
    };
    let a = pick(None);
    let b = pick(Some(a));
    (a, b)
}

impl ParameterFitter for DifferentialEvolution {
    fn name(&self) -> &'static str {
        "differential evolution"
    }

    fn search(&self, objective: &Objective<'_>, bounds: &[(f64, f64)]) -> Result<FitResult> {
        let dims = bounds.len();
        if dims == 0 || dims > Self::MAX_DIMENSIONS {
            return Err(RetintError::TooManyDimensions {
                strategy: "differential evolution",
                max: Self::MAX_DIMENSIONS,
                actual: dims,
            });
        }

        let mut rng = self.rng();
        // best1bin needs the member itself plus two others.
        let count = (self.population_size * dims).max(5);
        let (f_lo, f_hi) = self.mutation;

        let members = latin_hypercube(&mut rng, count, dims);
        let energies: Vec<f64> = members
            .iter()
            .map(|m| objective.evaluate(&scale(m, bounds)))
            .collect();
        let best = argmin(&energies);
        let mut pop = Population {
            members,
            energies,
            best,
        };

        let mut generations = 0;
        let mut converged = pop.converged(self.atol, self.tolerance);
        while !converged && generations < self.max_generations {
            generations += 1;
            let f = if f_hi > f_lo {
                rng.gen_range(f_lo..f_hi)
            } else {
                f_lo
            };

            for i in 0..count {
                let (r1, r2) = pick_two(&mut rng, count, i);
                let fill = rng.gen_range(0..dims);
                let mut trial = pop.members[i].clone();
                for d in 0..dims {
                    if d == fill || rng.r#gen::<f64>() < self.recombination {
                        let best = &pop.members[pop.best];
                        let v = best[d] + f * (pop.members[r1][d] - pop.members[r2][d]);
                        trial[d] = if (0.0..=1.0).contains(&v) {
                            v
                        } else {
                            rng.r#gen::<f64>()
                        };
                    }
                }

                let energy = objective.evaluate(&scale(&trial, bounds));
                if energy <= pop.energies[i] {
                    pop.members[i] = trial;
                    pop.energies[i] = energy;
                    if energy < pop.energies[pop.best] {
                        pop.best = i;
                    }
                }
            }

            tracing::debug!(
                "generation {generations}: best error {:.6}",
                pop.energies[pop.best]
            );
            converged = pop.converged(self.atol, self.tolerance);
        }

        let mut x = scale(&pop.members[pop.best], bounds);
        let mut error = pop.energies[pop.best];
        if self.polish {
            let polished = compass_search(objective, bounds, &x, error);
            if polished.error < error {
                tracing::debug!("polish improved error {error:.6} -> {:.6}", polished.error);
                x = polished.x;
                error = polished.error;
            }
        }

        let message = if converged {
            "Optimization terminated successfully.".to_string()
        } else {
            tracing::warn!("differential evolution stopped after {generations} generations without converging");
            MAX_ITERATIONS_MESSAGE.to_string()
        };
        let params = objective.params_for(&x);
        tracing::info!("differential evolution best error {error:.4} at {params}");

        Ok(FitResult {
            params,
            error,
            success: converged,
            message,
            evaluations: objective.evaluations(),
            iterations: generations,
        })
    }
}

fn argmin(values: &[f64]) -> usize {
    values
        .iter()
        .enumerate()
        .min_by(|a, b| a.1.total_cmp(b.1))
        .map_or(0, |(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchors::AnchorSet;
    use crate::color::Color;
    use crate::fit::SearchSpace;
    use crate::transform::evaluate::transform;
    use crate::transform::params::{ParameterSet, TransformParameters};

    #[test]
    fn test_latin_hypercube_covers_every_stratum() {
        let mut rng = StdRng::seed_from_u64(1);
        let members = latin_hypercube(&mut rng, 10, 2);
        for d in 0..2 {
            let mut strata: Vec<usize> = members.iter().map(|m| (m[d] * 10.0) as usize).collect();
            strata.sort_unstable();
            assert_eq!(strata, (0..10).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_pick_two_excludes_member() {
        let mut rng = StdRng::seed_from_u64(3);
        for i in 0..50 {
            let (a, b) = pick_two(&mut rng, 5, i % 5);
            assert_ne!(a, b);
            assert_ne!(a, i % 5);
            assert_ne!(b, i % 5);
        }
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let anchors = AnchorSet::new(
            vec![Color::new(100, 150, 200), Color::new(30, 60, 90)],
            vec![Color::new(50, 100, 50), Color::new(20, 40, 20)],
        )
        .unwrap();
        let space = SearchSpace::new(ParameterSet::hsl());
        let de = DifferentialEvolution {
            max_generations: 40,
            ..DifferentialEvolution::seeded(42)
        };
        let a = de.fit(&anchors, &space).unwrap();
        let b = de.fit(&anchors, &space).unwrap();
        assert_eq!(a.params, b.params);
        assert_eq!(a.error, b.error);
        assert_eq!(a.iterations, b.iterations);
    }

    #[test]
    fn test_generation_limit_reports_failure() {
        let anchors = AnchorSet::new(
            vec![Color::new(100, 150, 200), Color::new(200, 30, 60)],
            vec![Color::new(50, 100, 50), Color::new(10, 220, 180)],
        )
        .unwrap();
        let space = SearchSpace::new(ParameterSet::hsl());
        let de = DifferentialEvolution {
            max_generations: 1,
            tolerance: 0.0,
            polish: false,
            ..DifferentialEvolution::seeded(5)
        };
        let result = de.fit(&anchors, &space).unwrap();
        assert!(!result.success);
        assert_eq!(result.message, MAX_ITERATIONS_MESSAGE);
        assert!(result.error.is_finite());
        assert!(matches!(
            result.into_result(),
            Err(RetintError::OptimizationFailure { .. })
        ));
    }

    #[test]
    fn test_recovers_reachable_six_parameter_target() {
        let truth = TransformParameters::from_slice(&[-40.0, 20.0, 0.0, 15.0, -30.0, 10.0]).unwrap();
        let originals = vec![
            Color::new(180, 90, 60),
            Color::new(60, 140, 200),
            Color::new(220, 210, 40),
            Color::new(30, 30, 30),
        ];
        let desired = originals.iter().map(|c| transform(*c, &truth)).collect();
        let anchors = AnchorSet::new(originals, desired).unwrap();

        let de = DifferentialEvolution {
            max_generations: 300,
            ..DifferentialEvolution::seeded(11)
        };
        let result = de.fit(&anchors, &SearchSpace::new(ParameterSet::full6())).unwrap();
        assert!(result.error < 10.0, "error = {}", result.error);
        assert!(result.params.validate().is_ok());
    }

    #[test]
    fn test_rejects_empty_bounds() {
        let anchors = AnchorSet::single(Color::BLACK, Color::BLACK);
        let set = ParameterSet::custom(Vec::<Param>::new());
        let err = DifferentialEvolution::seeded(1)
            .fit(&anchors, &SearchSpace::new(set))
            .unwrap_err();
        assert!(matches!(err, RetintError::TooManyDimensions { actual: 0, .. }));
    }
}
