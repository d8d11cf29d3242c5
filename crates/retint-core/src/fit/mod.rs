//! Parameter fitting: find the transform that best maps original anchor
//! colors onto desired ones.
//!
//! Every strategy minimizes the same [`Objective`]; they differ only in how
//! they walk the bounded search space.
//!
//! | Strategy | Dimensions | Deterministic |
//! |----------|------------|---------------|
//! | [`GridSearch`] | 1 to 3 | yes |
//! | [`DifferentialEvolution`] | 1 to 7 | when seeded |

pub mod evolution;
pub mod grid;
pub mod objective;
pub mod polish;

use serde::{Deserialize, Serialize};

use crate::anchors::AnchorSet;
use crate::error::{Result, RetintError};
use crate::transform::params::{ParameterSet, TransformParameters};

pub use evolution::DifferentialEvolution;
pub use grid::GridSearch;
pub use objective::Objective;

/// Outcome of one fitting run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    /// Best parameters found, with non-free parameters taken from the base.
    pub params: TransformParameters,
    /// RMSE at `params`.
    pub error: f64,
    /// False when a stochastic search stopped without converging.
    pub success: bool,
    /// Diagnostic from the strategy.
    pub message: String,
    /// Objective evaluations spent.
    pub evaluations: usize,
    /// Grid points visited or generations run.
    pub iterations: usize,
}

impl FitResult {
    /// Turn a non-converged result into [`RetintError::OptimizationFailure`].
    pub fn into_result(self) -> Result<Self> {
        if self.success {
            Ok(self)
        } else {
            Err(RetintError::OptimizationFailure {
                message: self.message,
            })
        }
    }
}

/// Free parameters, their bounds, and the values of everything else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchSpace {
    pub set: ParameterSet,
    pub bounds: Vec<(f64, f64)>,
    /// Values for parameters outside `set`.
    #[serde(default)]
    pub base: TransformParameters,
}

impl SearchSpace {
    /// Search `set` over each parameter's full documented domain.
    pub fn new(set: ParameterSet) -> Self {
        let bounds = set.default_bounds();
        Self {
            set,
            bounds,
            base: TransformParameters::IDENTITY,
        }
    }

    pub fn with_bounds(mut self, bounds: Vec<(f64, f64)>) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn with_base(mut self, base: TransformParameters) -> Self {
        self.base = base;
        self
    }

    pub fn dimensions(&self) -> usize {
        self.set.dimensions()
    }

    /// One `(min, max)` per free parameter, ordered, inside the domain.
    pub fn validate(&self) -> Result<()> {
        if self.bounds.len() != self.set.dimensions() {
            return Err(RetintError::BoundsMismatch {
                expected: self.set.dimensions(),
                actual: self.bounds.len(),
            });
        }
        for (param, &(min, max)) in self.set.params().iter().zip(&self.bounds) {
            param.check(min)?;
            param.check(max)?;
            if min > max {
                return Err(RetintError::InvalidBounds {
                    name: param.name(),
                    min,
                    max,
                });
            }
        }
        self.base.validate()
    }
}

/// A search strategy over a [`SearchSpace`].
pub trait ParameterFitter {
    fn name(&self) -> &'static str;

    /// Minimize `objective` within `bounds`; both are already validated.
    fn search(&self, objective: &Objective<'_>, bounds: &[(f64, f64)]) -> Result<FitResult>;

    /// Validate the space, build the shared objective, and search.
    fn fit(&self, anchors: &AnchorSet, space: &SearchSpace) -> Result<FitResult> {
        space.validate()?;
        let objective = Objective::new(anchors, &space.set, space.base)?;
        tracing::info!(
            "{} search over {} parameters with {} anchors",
            self.name(),
            space.dimensions(),
            anchors.len()
        );
        self.search(&objective, &space.bounds)
    }
}

/// Selectable strategy, e.g. from a settings file or the command line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum FitStrategy {
    Grid(GridSearch),
    Evolution(DifferentialEvolution),
}

impl FitStrategy {
    /// Grid search up to three dimensions, differential evolution above.
    pub fn for_dimensions(dimensions: usize) -> Self {
        if dimensions <= GridSearch::MAX_DIMENSIONS {
            Self::Grid(GridSearch::default())
        } else {
            Self::Evolution(DifferentialEvolution::default())
        }
    }
}

impl ParameterFitter for FitStrategy {
    fn name(&self) -> &'static str {
        match self {
            Self::Grid(g) => g.name(),
            Self::Evolution(e) => e.name(),
        }
    }

    fn search(&self, objective: &Objective<'_>, bounds: &[(f64, f64)]) -> Result<FitResult> {
        match self {
            Self::Grid(g) => g.search(objective, bounds),
            Self::Evolution(e) => e.search(objective, bounds),
        }
    }
}
