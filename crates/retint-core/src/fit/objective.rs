//! RMSE objective shared by every search strategy.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::anchors::AnchorSet;
use crate::error::{Result, RetintError};
use crate::transform::evaluate::transform;
use crate::transform::params::{ParameterSet, TransformParameters};

/// Root-mean-square color error of a candidate over an anchor set.
///
/// ```text
/// error(p) = sqrt( (1/N) × Σ_i Σ_{c∈RGB} (transform(orig_i, p)[c] − desired_i[c])² )
/// ```
///
/// The objective is `Sync` and counts its evaluations atomically, so a
/// strategy may evaluate candidates from several threads.
#[derive(Debug)]
pub struct Objective<'a> {
    anchors: &'a AnchorSet,
    set: &'a ParameterSet,
    base: TransformParameters,
    evaluations: AtomicUsize,
}

impl<'a> Objective<'a> {
    /// Fails with [`RetintError::EmptySampleSet`] when there are no anchors.
    pub fn new(
        anchors: &'a AnchorSet,
        set: &'a ParameterSet,
        base: TransformParameters,
    ) -> Result<Self> {
        if anchors.is_empty() {
            return Err(RetintError::EmptySampleSet);
        }
        Ok(Self {
            anchors,
            set,
            base,
            evaluations: AtomicUsize::new(0),
        })
    }

    pub fn set(&self) -> &ParameterSet {
        self.set
    }

    pub fn anchor_count(&self) -> usize {
        self.anchors.len()
    }

    pub fn dimensions(&self) -> usize {
        self.set.dimensions()
    }

    /// Full parameters for a search vector.
    pub fn params_for(&self, x: &[f64]) -> TransformParameters {
        self.set.apply_to(&self.base, x)
    }

    /// Error of a search vector.
    pub fn evaluate(&self, x: &[f64]) -> f64 {
        self.rmse(&self.params_for(x))
    }

    /// Error of a full parameter set.
    pub fn rmse(&self, params: &TransformParameters) -> f64 {
        self.evaluations.fetch_add(1, Ordering::Relaxed);
        rmse(self.anchors, params)
    }

    pub fn evaluations(&self) -> usize {
        self.evaluations.load(Ordering::Relaxed)
    }
}

/// RMSE without the bookkeeping. Returns 0 for an empty set.
pub fn rmse(anchors: &AnchorSet, params: &TransformParameters) -> f64 {
    if anchors.is_empty() {
        return 0.0;
    }
    let total: f64 = anchors
        .iter()
        .map(|(orig, desired)| transform(orig, params).distance_squared(desired))
        .sum();
    (total / anchors.len() as f64).sqrt()
}
