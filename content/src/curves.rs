//! Difficulty curve table loading.

use dust_devil_core::{Curve, CurveName, CurveTable};

use crate::ContentError;

/// Parses a curve table file, sorting every row's keys by time.
///
/// Rows the allocator never reads are kept but reported; known rows that are
/// absent are reported too, since the allocator will fall back to defaults.
pub fn load_curves(text: &str) -> Result<CurveTable, ContentError> {
    let parsed: CurveTable = toml::from_str(text).map_err(|source| ContentError::Parse {
        kind: "curve table",
        source,
    })?;

    let mut table = CurveTable::new();
    for (name, curve) in parsed.rows() {
        if curve.keys().is_empty() {
            return Err(ContentError::EmptyCurve(name.to_owned()));
        }
        if curve
            .keys()
            .iter()
            .any(|key| !key.time.is_finite() || !key.value.is_finite())
        {
            return Err(ContentError::NonFiniteCurveKey(name.to_owned()));
        }
        if !CurveName::ALL.iter().any(|known| known.as_str() == name) {
            tracing::warn!(curve = name, "curve row is not used by the director");
        }
        let _ = table.insert(
            name,
            Curve::new(curve.interpolation(), curve.keys().to_vec()),
        );
    }

    for known in CurveName::ALL {
        if table.row(known.as_str()).is_none() {
            tracing::warn!(curve = %known, "curve row missing, defaults will be used");
        }
    }

    Ok(table)
}
