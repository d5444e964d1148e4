//! Director settings loading.

use dust_devil_world::Config;

use crate::ContentError;

/// Parses a settings file. Missing fields keep their defaults.
pub fn load_settings(text: &str) -> Result<Config, ContentError> {
    let config: Config = toml::from_str(text).map_err(|source| ContentError::Parse {
        kind: "settings",
        source,
    })?;

    let non_negative = [
        ("global_difficulty", config.global_difficulty),
        ("fallback_budget", config.fallback_budget),
        ("detection_radius", config.detection_radius),
        ("max_leash_distance", config.max_leash_distance),
        ("spawn_radius_per_budget", config.spawn_radius_per_budget),
        ("max_spawn_radius", config.max_spawn_radius),
    ];
    for (field, value) in non_negative {
        if !value.is_finite() || value < 0.0 {
            return Err(ContentError::InvalidSetting {
                field,
                value: f64::from(value),
            });
        }
    }

    Ok(config)
}
