//! Difficulty curves evaluated while scaling enemy groups.

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

/// Named rows of the difficulty curve table consulted by the allocator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CurveName {
    /// Budget ceiling for randomly assembled groups, keyed by global difficulty.
    EnemyGroupSize,
    /// Movement speed multiplier.
    EnemySpeedScale,
    /// Health multiplier.
    EnemyHealthScale,
    /// Additive nuclear drop chance bonus.
    InnateNuclearChance,
    /// Additive chitin drop chance bonus.
    InnateChitinChance,
}

impl CurveName {
    /// Every curve the allocator may request.
    pub const ALL: [CurveName; 5] = [
        CurveName::EnemyGroupSize,
        CurveName::EnemySpeedScale,
        CurveName::EnemyHealthScale,
        CurveName::InnateNuclearChance,
        CurveName::InnateChitinChance,
    ];

    /// Row name of the curve inside a curve table.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            CurveName::EnemyGroupSize => "EnemyGroupSize",
            CurveName::EnemySpeedScale => "EnemySpeedScale",
            CurveName::EnemyHealthScale => "EnemyHealthScale",
            CurveName::InnateNuclearChance => "InnateNuclearChance",
            CurveName::InnateChitinChance => "InnateChitinChance",
        }
    }
}

impl fmt::Display for CurveName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source of named float-to-float lookups.
///
/// Returning `None` signals that the row is absent; callers substitute their
/// own identity default.
pub trait CurveProvider {
    /// Evaluates the named curve at `x`.
    fn evaluate(&self, curve: CurveName, x: f32) -> Option<f32>;
}

impl<F> CurveProvider for F
where
    F: Fn(CurveName, f32) -> Option<f32>,
{
    fn evaluate(&self, curve: CurveName, x: f32) -> Option<f32> {
        self(curve, x)
    }
}

/// How values between two keys are produced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpolation {
    /// Straight line between neighbouring keys.
    #[default]
    Linear,
    /// Holds the value of the preceding key.
    Constant,
}

/// Single `(time, value)` sample of a curve.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurveKey {
    /// Input coordinate.
    pub time: f32,
    /// Output at `time`.
    pub value: f32,
}

impl CurveKey {
    /// Creates a new key.
    #[must_use]
    pub const fn new(time: f32, value: f32) -> Self {
        Self { time, value }
    }
}

/// Piecewise curve with constant extrapolation beyond its end keys.
///
/// Deserialised curves go through [`Curve::new`], so keys are always sorted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "CurveRows")]
pub struct Curve {
    interpolation: Interpolation,
    keys: Vec<CurveKey>,
}

#[derive(Deserialize)]
struct CurveRows {
    #[serde(default)]
    interpolation: Interpolation,
    keys: Vec<CurveKey>,
}

impl From<CurveRows> for Curve {
    fn from(rows: CurveRows) -> Self {
        Self::new(rows.interpolation, rows.keys)
    }
}

impl Curve {
    /// Creates a curve, sorting the keys by time.
    #[must_use]
    pub fn new(interpolation: Interpolation, mut keys: Vec<CurveKey>) -> Self {
        keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self {
            interpolation,
            keys,
        }
    }

    /// Creates a linear curve from `(time, value)` pairs.
    #[must_use]
    pub fn linear(points: &[(f32, f32)]) -> Self {
        Self::new(
            Interpolation::Linear,
            points
                .iter()
                .map(|&(time, value)| CurveKey::new(time, value))
                .collect(),
        )
    }

    /// Keys of the curve ordered by time.
    #[must_use]
    pub fn keys(&self) -> &[CurveKey] {
        &self.keys
    }

    /// Interpolation mode between keys.
    #[must_use]
    pub const fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    /// Evaluates the curve at `x`. An empty curve evaluates to zero and a
    /// NaN input evaluates to the first key.
    #[must_use]
    pub fn eval(&self, x: f32) -> f32 {
        let (first, last) = match (self.keys.first(), self.keys.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return 0.0,
        };

        if x.is_nan() || x <= first.time {
            return first.value;
        }
        if x >= last.time {
            return last.value;
        }

        let upper = self.keys.partition_point(|key| key.time <= x);
        let Some(&before) = upper.checked_sub(1).and_then(|index| self.keys.get(index)) else {
            return first.value;
        };
        let Some(&after) = self.keys.get(upper) else {
            return last.value;
        };

        match self.interpolation {
            Interpolation::Constant => before.value,
            Interpolation::Linear => {
                let span = after.time - before.time;
                if span.is_nan() || span <= f32::EPSILON {
                    return after.value;
                }
                let alpha = (x - before.time) / span;
                before.value + (after.value - before.value) * alpha
            }
        }
    }
}

/// Table of named curves.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurveTable {
    rows: BTreeMap<String, Curve>,
}

impl CurveTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a row, returning the previous curve if present.
    pub fn insert(&mut self, name: impl Into<String>, curve: Curve) -> Option<Curve> {
        self.rows.insert(name.into(), curve)
    }

    /// Adds a row, builder style.
    #[must_use]
    pub fn with(mut self, name: CurveName, curve: Curve) -> Self {
        let _ = self.insert(name.as_str(), curve);
        self
    }

    /// Retrieves a row by name.
    #[must_use]
    pub fn row(&self, name: &str) -> Option<&Curve> {
        self.rows.get(name)
    }

    /// Iterates over all rows in name order.
    pub fn rows(&self) -> impl Iterator<Item = (&str, &Curve)> {
        self.rows.iter().map(|(name, curve)| (name.as_str(), curve))
    }
}

impl CurveProvider for CurveTable {
    fn evaluate(&self, curve: CurveName, x: f32) -> Option<f32> {
        self.row(curve.as_str()).map(|row| row.eval(x))
    }
}
