//! Unit catalog loading.

use std::collections::HashSet;

use dust_devil_core::{Catalog, UnitTemplate};
use serde::Deserialize;

use crate::ContentError;

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    templates: Vec<UnitTemplate>,
}

/// Parses a catalog file.
///
/// Drop chances outside `[0, 1]` are clamped with a warning; every other
/// numeric field must be finite and non-negative.
pub fn load_catalog(text: &str) -> Result<Catalog, ContentError> {
    let file: CatalogFile = toml::from_str(text).map_err(|source| ContentError::Parse {
        kind: "catalog",
        source,
    })?;

    let mut names = HashSet::new();
    let mut templates = Vec::with_capacity(file.templates.len());
    for mut template in file.templates {
        if !names.insert(template.name.clone()) {
            return Err(ContentError::DuplicateTemplate(template.name));
        }
        validate(&template)?;

        let clamped = template.stats.with_clamped_chances();
        if clamped != template.stats {
            tracing::warn!(template = %template.name, "drop chances clamped into [0, 1]");
            template.stats = clamped;
        }
        templates.push(template);
    }

    tracing::debug!(templates = templates.len(), "catalog loaded");
    Ok(Catalog::new(templates))
}

fn validate(template: &UnitTemplate) -> Result<(), ContentError> {
    let stats = &template.stats;
    let fields = [
        ("cost", template.cost),
        ("difficulty_coefficient", template.difficulty_coefficient),
        ("scale", template.scale),
        ("health", stats.health),
        ("armor", stats.armor),
        ("damage", stats.damage),
        ("attack_speed", stats.attack_speed),
        ("base_speed", stats.base_speed),
        ("base_bio_matter", stats.base_bio_matter),
        ("nuclear_chance", stats.nuclear_chance),
        ("chitin_chance", stats.chitin_chance),
    ];

    for (field, value) in fields {
        let chance = field.ends_with("_chance");
        if !value.is_finite() || (!chance && value < 0.0) {
            return Err(ContentError::InvalidTemplate {
                name: template.name.clone(),
                field,
                value,
            });
        }
    }
    Ok(())
}
