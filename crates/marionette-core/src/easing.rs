//! Per-channel easing: pure remaps from normalized progress to normalized
//! progress, parameterized by a coefficient.
//!
//! Every keyframe channel (position, origin, scale, rotation, opacity, tint,
//! outline color, outline thickness) carries its own [`Ease`]; the one that
//! governs an interval is always taken from the later (target) key.

use serde::{Deserialize, Serialize};

use crate::error::RigError;

/// The closed set of easing functions.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum EasingFn {
    #[default]
    Linear,
    /// `p^coeff`.
    Power,
    /// `p^(1/coeff)`.
    Root,
    /// Monotonic S-curve; larger coefficients sharpen the midpoint.
    Gauss,
    /// Reserved in the authoring format; evaluates as Linear.
    Binary,
}

/// An easing function plus its coefficient.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Ease {
    #[serde(default)]
    pub function: EasingFn,
    #[serde(default = "coeff_one")]
    pub coeff: f32,
}

fn coeff_one() -> f32 {
    1.0
}

impl Default for Ease {
    fn default() -> Self {
        Self::LINEAR
    }
}

impl Ease {
    pub const LINEAR: Ease = Ease {
        function: EasingFn::Linear,
        coeff: 1.0,
    };

    pub fn new(function: EasingFn, coeff: f32) -> Self {
        Self { function, coeff }
    }

    /// Remap normalized progress through the easing curve.
    ///
    /// Input outside [0,1] is clamped. Coefficients are assumed validated at
    /// load time; evaluation never fails.
    pub fn remap(&self, progress: f32) -> f32 {
        let p = progress.clamp(0.0, 1.0);
        match self.function {
            EasingFn::Linear | EasingFn::Binary => p,
            EasingFn::Power => p.powf(self.coeff),
            EasingFn::Root => p.powf(1.0 / self.coeff),
            EasingFn::Gauss => gauss_remap(p, self.coeff),
        }
    }

    /// Reject coefficients that would make `remap` ill-defined. Called when
    /// an animation is loaded into a set, never during evaluation.
    pub fn validate(&self) -> Result<(), RigError> {
        let ok = match self.function {
            EasingFn::Linear | EasingFn::Binary => self.coeff.is_finite(),
            EasingFn::Power | EasingFn::Root | EasingFn::Gauss => {
                self.coeff.is_finite() && self.coeff > 0.0
            }
        };
        if ok {
            Ok(())
        } else {
            Err(RigError::InvalidCoefficient {
                function: self.function,
                coeff: self.coeff,
            })
        }
    }
}

/// Logistic S-curve rescaled so that f(0)=0 and f(1)=1.
///
/// `s(p) = 1 / (1 + e^(-k(2p-1)))`, normalized by its endpoint values. The
/// steepness `k` grows with the coefficient; near-zero coefficients flatten
/// towards the identity, which is also the numerically safe limit.
fn gauss_remap(p: f32, coeff: f32) -> f32 {
    let k = coeff * 4.0;
    if k < 1e-3 {
        return p;
    }
    let s = |x: f32| 1.0 / (1.0 + (-k * (2.0 * x - 1.0)).exp());
    let s0 = s(0.0);
    let s1 = s(1.0);
    ((s(p) - s0) / (s1 - s0)).clamp(0.0, 1.0)
}
