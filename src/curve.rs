//! Response curves: pure maps from a signal value to a gain multiplier.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A named per-vehicle value feeding a response curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SignalValue {
    Flag(bool),
    Number(f32),
}

impl SignalValue {
    pub fn as_f32(self) -> f32 {
        match self {
            SignalValue::Number(v) => v,
            SignalValue::Flag(true) => 1.0,
            SignalValue::Flag(false) => 0.0,
        }
    }
}

impl From<f32> for SignalValue {
    fn from(v: f32) -> Self {
        SignalValue::Number(v)
    }
}

impl From<bool> for SignalValue {
    fn from(v: bool) -> Self {
        SignalValue::Flag(v)
    }
}

/// Piecewise-linear interpolation table with clamped ends.
///
/// Control points are strictly ascending in x; evaluation at a control point
/// returns that point's gain exactly, with no interpolation error.
#[derive(Debug, Clone, PartialEq)]
pub struct TableCurve {
    points: Vec<(f32, f32)>,
}

impl TableCurve {
    pub fn new(points: Vec<(f32, f32)>) -> Result<Self, ConfigError> {
        if points.len() < 2 {
            return Err(ConfigError::CurveTooShort(points.len()));
        }
        for (i, pair) in points.windows(2).enumerate() {
            // Also rejects NaN x-values: the comparison fails either way.
            if !(pair[1].0 > pair[0].0) {
                return Err(ConfigError::CurveNotAscending { index: i + 1 });
            }
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[(f32, f32)] {
        &self.points
    }

    pub fn evaluate(&self, x: f32) -> f32 {
        let first = self.points[0];
        let last = self.points[self.points.len() - 1];
        if x <= first.0 {
            return first.1;
        }
        if x >= last.0 {
            return last.1;
        }
        for pair in self.points.windows(2) {
            let (x0, g0) = pair[0];
            let (x1, g1) = pair[1];
            if x >= x0 && x < x1 {
                if x == x0 {
                    return g0;
                }
                return g0 + (g1 - g0) * (x - x0) / (x1 - x0);
            }
        }
        last.1
    }
}

/// Either an interpolation table or an opaque gain function; the engine
/// treats both identically through [`ResponseCurve::evaluate`].
pub enum ResponseCurve {
    Table(TableCurve),
    Function(Box<dyn Fn(f32) -> f32 + Send + Sync>),
}

impl ResponseCurve {
    /// Table form. Fails at construction, never at evaluation.
    pub fn table(points: Vec<(f32, f32)>) -> Result<Self, ConfigError> {
        Ok(ResponseCurve::Table(TableCurve::new(points)?))
    }

    /// Degenerate two-point table for boolean signals: false hits the lower
    /// point, true the upper, both by exact lookup.
    pub fn boolean(off_gain: f32, on_gain: f32) -> Self {
        ResponseCurve::Table(TableCurve {
            points: vec![(0.0, off_gain), (1.0, on_gain)],
        })
    }

    pub fn function(f: impl Fn(f32) -> f32 + Send + Sync + 'static) -> Self {
        ResponseCurve::Function(Box::new(f))
    }

    pub fn evaluate(&self, value: SignalValue) -> f32 {
        let x = value.as_f32();
        match self {
            ResponseCurve::Table(table) => table.evaluate(x),
            ResponseCurve::Function(f) => f(x),
        }
    }
}

impl fmt::Debug for ResponseCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseCurve::Table(table) => f.debug_tuple("Table").field(table).finish(),
            ResponseCurve::Function(_) => f.write_str("Function(..)"),
        }
    }
}
