//! Parameter definitions for the recolor transform.
//!
//! `TransformParameters` is the full seven-value delta set. The three-value
//! HSL variant and the six-value variant are the same struct with the
//! leading or trailing stages left at zero.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RetintError};

/// One scalar of the transform, in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Param {
    Dr,
    Dg,
    Db,
    Dh,
    Ds,
    Dl,
    FinalDl,
}

impl Param {
    pub const ALL: [Self; 7] = [
        Self::Dr,
        Self::Dg,
        Self::Db,
        Self::Dh,
        Self::Ds,
        Self::Dl,
        Self::FinalDl,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Dr => "dr",
            Self::Dg => "dg",
            Self::Db => "db",
            Self::Dh => "dh",
            Self::Ds => "ds",
            Self::Dl => "dl",
            Self::FinalDl => "final_dl",
        }
    }

    /// Human-readable label for reports.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Dr => "Red offset",
            Self::Dg => "Green offset",
            Self::Db => "Blue offset",
            Self::Dh => "Hue delta",
            Self::Ds => "Saturation delta",
            Self::Dl => "Lightness delta",
            Self::FinalDl => "Final lightness delta",
        }
    }

    /// Documented `(min, max)` domain.
    pub const fn domain(self) -> (f64, f64) {
        match self {
            Self::Dr | Self::Dg | Self::Db => (-255.0, 255.0),
            Self::Dh => (-180.0, 180.0),
            Self::Ds | Self::Dl | Self::FinalDl => (-100.0, 100.0),
        }
    }

    /// Rejects non-finite values and values outside [`Param::domain`].
    pub fn check(self, value: f64) -> Result<()> {
        let (min, max) = self.domain();
        if !value.is_finite() || value < min || value > max {
            return Err(RetintError::OutOfDomainParameter {
                name: self.name(),
                value,
                min,
                max,
            });
        }
        Ok(())
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }
}

/// Deltas applied by the transform: RGB mask, hue, saturation, lightness
/// and a secondary lightness pass.
///
/// All zeros is the identity.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "ParamsRepr")]
pub struct TransformParameters {
    /// Additive red offset. Domain `[-255, 255]`.
    pub dr: f64,
    /// Additive green offset. Domain `[-255, 255]`.
    pub dg: f64,
    /// Additive blue offset. Domain `[-255, 255]`.
    pub db: f64,
    /// Hue shift in degrees, wraps modulo 360. Domain `[-180, 180]`.
    pub dh: f64,
    /// Saturation delta in percent; -100 is grayscale.
    pub ds: f64,
    /// Lightness delta in percent; -100 is black.
    pub dl: f64,
    /// Second lightness pass, applied after `dl`.
    pub final_dl: f64,
}

impl TransformParameters {
    pub const IDENTITY: Self = Self {
        dr: 0.0,
        dg: 0.0,
        db: 0.0,
        dh: 0.0,
        ds: 0.0,
        dl: 0.0,
        final_dl: 0.0,
    };

    /// The three-value hue/saturation/lightness variant.
    pub const fn hsl(dh: f64, ds: f64, dl: f64) -> Self {
        Self {
            dh,
            ds,
            dl,
            ..Self::IDENTITY
        }
    }

    /// Build from 3 (`dh, ds, dl`), 6 (`dr, dg, db, dh, ds, dl`)
    /// or 7 (full) values.
    pub fn from_slice(values: &[f64]) -> Result<Self> {
        match *values {
            [dh, ds, dl] => Ok(Self::hsl(dh, ds, dl)),
            [dr, dg, db, dh, ds, dl] => Ok(Self {
                dr,
                dg,
                db,
                dh,
                ds,
                dl,
                final_dl: 0.0,
            }),
            [dr, dg, db, dh, ds, dl, final_dl] => Ok(Self {
                dr,
                dg,
                db,
                dh,
                ds,
                dl,
                final_dl,
            }),
            _ => Err(RetintError::ParameterCount(values.len())),
        }
    }

    pub const fn get(&self, param: Param) -> f64 {
        match param {
            Param::Dr => self.dr,
            Param::Dg => self.dg,
            Param::Db => self.db,
            Param::Dh => self.dh,
            Param::Ds => self.ds,
            Param::Dl => self.dl,
            Param::FinalDl => self.final_dl,
        }
    }

    pub fn set(&mut self, param: Param, value: f64) {
        match param {
            Param::Dr => self.dr = value,
            Param::Dg => self.dg = value,
            Param::Db => self.db = value,
            Param::Dh => self.dh = value,
            Param::Ds => self.ds = value,
            Param::Dl => self.dl = value,
            Param::FinalDl => self.final_dl = value,
        }
    }

    pub const fn to_array(&self) -> [f64; 7] {
        [
            self.dr,
            self.dg,
            self.db,
            self.dh,
            self.ds,
            self.dl,
            self.final_dl,
        ]
    }

    /// Check every field against its documented domain.
    ///
    /// Out-of-domain values are rejected, never clamped.
    pub fn validate(&self) -> Result<()> {
        for param in Param::ALL {
            param.check(self.get(param))?;
        }
        Ok(())
    }

    pub fn is_identity(&self) -> bool {
        self.to_array().iter().all(|v| *v == 0.0)
    }
}

impl fmt::Display for TransformParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "dr={:.4} dg={:.4} db={:.4} dh={:.4} ds={:.4} dl={:.4} final_dl={:.4}",
            self.dr, self.dg, self.db, self.dh, self.ds, self.dl, self.final_dl
        )
    }
}

/// Accepted on-disk shapes: a bare list of 3/6/7 numbers, or named fields.
#[derive(Deserialize)]
#[serde(untagged)]
enum ParamsRepr {
    List(Vec<f64>),
    Named(NamedParams),
}

/// Named form. Missing fields default to zero; unknown keys are an error so
/// a misspelled name cannot silently become the identity.
#[derive(Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct NamedParams {
    dr: f64,
    dg: f64,
    db: f64,
    dh: f64,
    ds: f64,
    dl: f64,
    final_dl: f64,
}

impl TryFrom<ParamsRepr> for TransformParameters {
    type Error = RetintError;

    fn try_from(repr: ParamsRepr) -> Result<Self> {
        match repr {
            ParamsRepr::List(values) => Self::from_slice(&values),
            ParamsRepr::Named(NamedParams {
                dr,
                dg,
                db,
                dh,
                ds,
                dl,
                final_dl,
            }) => Ok(Self {
                dr,
                dg,
                db,
                dh,
                ds,
                dl,
                final_dl,
            }),
        }
    }
}

/// The free parameters a fit searches over, in search-vector order.
///
/// Parameters not listed keep the value from the base set (identity by
/// default).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSet {
    params: Vec<Param>,
}

impl ParameterSet {
    /// `dh, ds, dl`.
    pub fn hsl() -> Self {
        Self {
            params: vec![Param::Dh, Param::Ds, Param::Dl],
        }
    }

    /// `dr, dg, db, dh, ds, dl`.
    pub fn full6() -> Self {
        Self {
            params: Param::ALL[..6].to_vec(),
        }
    }

    /// All seven parameters.
    pub fn full7() -> Self {
        Self {
            params: Param::ALL.to_vec(),
        }
    }

    /// Any subset. Duplicates are dropped, order is kept.
    pub fn custom(params: impl IntoIterator<Item = Param>) -> Self {
        let mut out: Vec<Param> = Vec::new();
        for p in params {
            if !out.contains(&p) {
                out.push(p);
            }
        }
        Self { params: out }
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn dimensions(&self) -> usize {
        self.params.len()
    }

    /// Each parameter's documented domain, usable directly as search bounds.
    pub fn default_bounds(&self) -> Vec<(f64, f64)> {
        self.params.iter().map(|p| p.domain()).collect()
    }

    /// Overlay a search vector onto `base`.
    pub fn apply_to(&self, base: &TransformParameters, values: &[f64]) -> TransformParameters {
        let mut out = *base;
        for (p, v) in self.params.iter().zip(values) {
            out.set(*p, *v);
        }
        out
    }

    /// Extract this set's values from a full parameter struct.
    pub fn extract(&self, params: &TransformParameters) -> Vec<f64> {
        self.params.iter().map(|p| params.get(*p)).collect()
    }
}
