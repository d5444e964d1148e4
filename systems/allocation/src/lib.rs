#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Budgeted roster selection for enemy attack groups.
//!
//! The allocator turns an [`AllocationRequest`] into plain data: a list of
//! templates paired with difficulty-scaled stats. It never creates entities;
//! adapters materialise the roster afterwards.

use dust_devil_core::{
    AllocationRequest, AllocationResult, CurveName, CurveProvider, ResolvedStats, RosterEntry,
    TypeMask, UnitTemplate,
};
use rand::Rng;

/// Fraction of the health multiplier carried over into physical scale.
const SCALE_PER_HEALTH: f32 = 0.8;
/// Attack speed substituted for non-positive values when deriving the cooldown.
const MIN_ATTACK_SPEED: f32 = 0.0001;

/// Pure system that assembles group rosters under a cost budget.
#[derive(Clone, Copy, Debug, Default)]
pub struct GroupBudgetAllocator;

impl GroupBudgetAllocator {
    /// Creates a new allocator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Selects a roster for `request` from `catalog`.
    ///
    /// Preset requests return every preset entry unconditionally. Random
    /// requests repeatedly draw from the catalog, dropping templates that are
    /// unaffordable, boss or special tier, or outside the whitelist, until the
    /// budget is spent, the pool is exhausted or `max_retries` rejections
    /// accumulate. An empty result is a legitimate outcome.
    pub fn allocate<C, R>(
        &self,
        request: &AllocationRequest,
        catalog: &[UnitTemplate],
        global_difficulty: f32,
        curves: &C,
        rng: &mut R,
    ) -> AllocationResult
    where
        C: CurveProvider + ?Sized,
        R: Rng + ?Sized,
    {
        let ceiling = resolve_ceiling(request.budget, global_difficulty, curves);

        if request.is_preset() {
            let entries = request
                .preset
                .iter()
                .map(|template| scale_entry(template, global_difficulty, curves))
                .collect();
            return AllocationResult {
                entries,
                whitelist: request.whitelist,
                ceiling,
                remaining_budget: ceiling,
            };
        }

        let whitelist = if request.whitelist.is_empty() {
            randomize_whitelist(rng)
        } else {
            request.whitelist
        };

        let mut pool: Vec<&UnitTemplate> = catalog.iter().collect();
        let mut remaining = ceiling;
        let mut retries = request.max_retries;
        let mut entries = Vec::new();

        while remaining > 0.0 && retries > 0 && !pool.is_empty() {
            let index = rng.gen_range(0..pool.len());
            let template = pool[index];

            if let Some(reason) = rejection(template, remaining, whitelist) {
                tracing::debug!(template = %template.name, ?reason, "template rejected");
                let _ = pool.remove(index);
                retries -= 1;
                continue;
            }

            // Accepts that leave the budget unchanged spend retries instead.
            let next = remaining - template.cost;
            if next >= remaining {
                retries -= 1;
            }
            remaining = next;
            entries.push(scale_entry(template, global_difficulty, curves));
        }

        tracing::debug!(
            accepted = entries.len(),
            ceiling,
            remaining,
            retries,
            whitelist = whitelist.bits(),
            "random allocation finished"
        );

        AllocationResult {
            entries,
            whitelist,
            ceiling,
            remaining_budget: remaining,
        }
    }
}

/// Draws a replacement whitelist from `[1, 2^TYPE_BITS]`.
///
/// The upper value lies outside the named bits and therefore matches no
/// template; the range is kept as-is.
pub fn randomize_whitelist<R: Rng + ?Sized>(rng: &mut R) -> TypeMask {
    let upper = 1u8 << TypeMask::TYPE_BITS;
    TypeMask::from_bits_retain(rng.gen_range(1..=upper))
}

/// Resolves the budget ceiling from the group-size curve, falling back to `budget`.
///
/// A non-finite ceiling resolves to zero.
pub fn resolve_ceiling<C>(budget: f32, global_difficulty: f32, curves: &C) -> f32
where
    C: CurveProvider + ?Sized,
{
    let ceiling = lookup(curves, CurveName::EnemyGroupSize, global_difficulty, budget);
    if ceiling.is_finite() {
        ceiling
    } else {
        tracing::warn!(ceiling, "non-finite budget ceiling, allocating nothing");
        0.0
    }
}

/// Applies difficulty scaling to a template's base stats.
pub fn resolve_stats<C>(
    template: &UnitTemplate,
    global_difficulty: f32,
    curves: &C,
) -> ResolvedStats
where
    C: CurveProvider + ?Sized,
{
    let input = global_difficulty * template.difficulty_coefficient;
    let speed_multiplier = lookup(curves, CurveName::EnemySpeedScale, input, 1.0);
    let health_multiplier = lookup(curves, CurveName::EnemyHealthScale, input, 1.0);
    let nuclear_bonus = lookup(curves, CurveName::InnateNuclearChance, input, 0.0);
    let chitin_bonus = lookup(curves, CurveName::InnateChitinChance, input, 0.0);

    let base = template.stats.with_clamped_chances();
    let attack_speed = if base.attack_speed > 0.0 {
        base.attack_speed
    } else {
        MIN_ATTACK_SPEED
    };

    ResolvedStats {
        health: base.health * health_multiplier,
        armor: base.armor,
        damage: base.damage,
        attack_speed: base.attack_speed,
        attack_cooldown: 1.0 / attack_speed,
        speed: base.base_speed * speed_multiplier,
        bio_matter: base.base_bio_matter,
        nuclear_chance: (base.nuclear_chance + nuclear_bonus).clamp(0.0, 1.0),
        chitin_chance: (base.chitin_chance + chitin_bonus).clamp(0.0, 1.0),
        scale: template
            .scale
            .min(health_multiplier * template.scale * SCALE_PER_HEALTH),
    }
}

fn scale_entry<C>(template: &UnitTemplate, global_difficulty: f32, curves: &C) -> RosterEntry
where
    C: CurveProvider + ?Sized,
{
    RosterEntry {
        template: template.clone(),
        stats: resolve_stats(template, global_difficulty, curves),
    }
}

fn lookup<C>(curves: &C, curve: CurveName, x: f32, default: f32) -> f32
where
    C: CurveProvider + ?Sized,
{
    if !x.is_finite() {
        tracing::warn!(%curve, x, default, "non-finite curve input, using default");
        return default;
    }
    match curves.evaluate(curve, x) {
        Some(value) if value.is_finite() => value,
        Some(value) => {
            tracing::warn!(%curve, value, default, "non-finite curve output, using default");
            default
        }
        None => {
            tracing::warn!(%curve, default, "difficulty curve missing, using default");
            default
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Rejection {
    InvalidCost,
    OverBudget,
    ReservedTier,
    OutsideWhitelist,
}

fn rejection(template: &UnitTemplate, remaining: f32, whitelist: TypeMask) -> Option<Rejection> {
    if !template.cost.is_finite() || template.cost < 0.0 {
        Some(Rejection::InvalidCost)
    } else if template.cost > remaining {
        Some(Rejection::OverBudget)
    } else if !template.tier.is_randomly_spawnable() {
        Some(Rejection::ReservedTier)
    } else if !template.types.shares_any(whitelist) {
        Some(Rejection::OutsideWhitelist)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dust_devil_core::Tier;

    #[test]
    fn rejection_checks_budget_before_tier() {
        let boss = UnitTemplate::new("hive_queen", 5.0, Tier::Boss, TypeMask::GROUND);
        assert_eq!(
            rejection(&boss, 3.0, TypeMask::GROUND),
            Some(Rejection::OverBudget)
        );
        assert_eq!(
            rejection(&boss, 10.0, TypeMask::GROUND),
            Some(Rejection::ReservedTier)
        );
    }

    #[test]
    fn rejection_requires_shared_type_bit() {
        let flyer = UnitTemplate::new("skimmer", 1.0, Tier::Standard, TypeMask::AIR);
        assert_eq!(
            rejection(&flyer, 3.0, TypeMask::GROUND | TypeMask::BURROW),
            Some(Rejection::OutsideWhitelist)
        );
        assert_eq!(rejection(&flyer, 3.0, TypeMask::AIR), None);
    }

    #[test]
    fn rejection_refuses_non_finite_costs() {
        let broken = UnitTemplate::new("broken", f32::NAN, Tier::Standard, TypeMask::GROUND);
        assert_eq!(
            rejection(&broken, 3.0, TypeMask::GROUND),
            Some(Rejection::InvalidCost)
        );
    }

    #[test]
    fn missing_curves_fall_back_to_identity() {
        let none = |_: CurveName, _: f32| -> Option<f32> { None };
        let template = UnitTemplate::new("crawler", 1.0, Tier::Fodder, TypeMask::GROUND);
        let stats = resolve_stats(&template, 3.0, &none);
        assert_eq!(stats.health, template.stats.health);
        assert_eq!(stats.speed, template.stats.base_speed);
        assert_eq!(stats.nuclear_chance, 0.0);
        assert_eq!(resolve_ceiling(7.0, 3.0, &none), 7.0);
    }
}
