//! Commander profiles: per-kind modifiers, luck, and the power meter.

use std::collections::BTreeMap;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::CatalogError;
use crate::game::unit::UnitKind;

/// Attack and defense percentages applied to one unit kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifier {
    /// Attack percentage.
    pub attack: i32,
    /// Defense percentage.
    pub defense: i32,
}

impl Modifier {
    /// Create a modifier pair.
    #[must_use]
    pub const fn new(attack: i32, defense: i32) -> Self {
        Self { attack, defense }
    }
}

/// What activating a power does to the profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PowerEffect {
    /// Added to every listed attack modifier.
    pub attack: i32,
    /// Added to every listed defense modifier.
    pub defense: i32,
    /// Extra move points for every unit while the power is applied.
    pub movement: u8,
}

/// Which power is in effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerLevel {
    /// Commander power.
    Cop,
    /// Super commander power.
    Scop,
}

/// Source of luck rolls.
///
/// Every profile owns its own source so a session replays identically from
/// the same seed and action sequence.
#[derive(Debug, Clone)]
pub enum Luck {
    /// Uniform rolls in `0..=9` from a seeded generator.
    Seeded(ChaCha8Rng),
    /// Always the same roll.
    Fixed(u32),
}

impl Luck {
    /// Seeded luck.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::Seeded(ChaCha8Rng::seed_from_u64(seed))
    }

    fn roll(&mut self) -> u32 {
        match self {
            Self::Seeded(rng) => rng.random_range(0..=9),
            Self::Fixed(value) => *value,
        }
    }
}

/// Meter value needed for the base commander power.
pub const BASE_COP_THRESHOLD: u32 = 27_000;

/// Meter value needed for the base super commander power.
pub const BASE_SCOP_THRESHOLD: u32 = 54_000;

const BASE_POWER: PowerEffect = PowerEffect {
    attack: 10,
    defense: 10,
    movement: 0,
};

/// A player's commander.
#[derive(Debug, Clone)]
pub struct CommanderProfile {
    name: String,
    modifiers: BTreeMap<UnitKind, Modifier>,
    snapshot: Option<BTreeMap<UnitKind, Modifier>>,
    meter: u32,
    cop_threshold: u32,
    scop_threshold: u32,
    cop: PowerEffect,
    scop: PowerEffect,
    applied: Option<PowerLevel>,
    luck: Luck,
}

impl CommanderProfile {
    /// Create a profile from its parts.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        modifiers: BTreeMap<UnitKind, Modifier>,
        cop: PowerEffect,
        scop: PowerEffect,
        thresholds: (u32, u32),
        luck: Luck,
    ) -> Self {
        let (cop_threshold, scop_threshold) = thresholds;
        Self {
            name: name.into(),
            modifiers,
            snapshot: None,
            meter: 0,
            cop_threshold,
            scop_threshold: scop_threshold.max(cop_threshold),
            cop,
            scop,
            applied: None,
            luck,
        }
    }

    /// The neutral commander: 100/100 for every kind, +10/+10 powers.
    #[must_use]
    pub fn base(luck: Luck) -> Self {
        let modifiers = UnitKind::ALL
            .into_iter()
            .map(|kind| (kind, Modifier::new(100, 100)))
            .collect();
        Self::new(
            "None",
            modifiers,
            BASE_POWER,
            BASE_POWER,
            (BASE_COP_THRESHOLD, BASE_SCOP_THRESHOLD),
            luck,
        )
    }

    /// Builder: replace the luck source.
    #[must_use]
    pub fn with_luck(mut self, luck: Luck) -> Self {
        self.luck = luck;
        self
    }

    /// Commander name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attack percentage for `kind`; 0 if unlisted.
    #[must_use]
    pub fn attack_modifier(&self, kind: UnitKind) -> i32 {
        self.modifiers.get(&kind).map_or(0, |m| m.attack)
    }

    /// Defense percentage for `kind`; 0 if unlisted.
    #[must_use]
    pub fn defence_modifier(&self, kind: UnitKind) -> i32 {
        self.modifiers.get(&kind).map_or(0, |m| m.defense)
    }

    /// Draw a luck roll in `0..=9`.
    pub fn luck_roll(&mut self) -> u32 {
        self.luck.roll()
    }

    /// Current meter value.
    #[must_use]
    pub const fn meter(&self) -> u32 {
        self.meter
    }

    /// Meter needed for the commander power.
    #[must_use]
    pub const fn cop_threshold(&self) -> u32 {
        self.cop_threshold
    }

    /// Meter needed for the super commander power.
    #[must_use]
    pub const fn scop_threshold(&self) -> u32 {
        self.scop_threshold
    }

    /// The power currently applied, if any.
    #[must_use]
    pub const fn applied_power(&self) -> Option<PowerLevel> {
        self.applied
    }

    /// Whether the meter has reached the threshold for `level`.
    #[must_use]
    pub const fn can_activate(&self, level: PowerLevel) -> bool {
        let threshold = match level {
            PowerLevel::Cop => self.cop_threshold,
            PowerLevel::Scop => self.scop_threshold,
        };
        self.meter >= threshold
    }

    /// Extra move points granted by the applied power.
    #[must_use]
    pub const fn movement_bonus(&self) -> u8 {
        match self.applied {
            Some(PowerLevel::Cop) => self.cop.movement,
            Some(PowerLevel::Scop) => self.scop.movement,
            None => 0,
        }
    }

    /// Movement bonus that applying `level` would grant.
    #[must_use]
    pub const fn power_movement(&self, level: PowerLevel) -> u8 {
        match level {
            PowerLevel::Cop => self.cop.movement,
            PowerLevel::Scop => self.scop.movement,
        }
    }

    /// Add `delta` to the meter, clamped to `0..=scop_threshold`.
    /// No effect while a power is applied.
    pub fn charge_power(&mut self, delta: i64) {
        if self.applied.is_some() {
            return;
        }
        let next = (i64::from(self.meter) + delta).clamp(0, i64::from(self.scop_threshold));
        self.meter = u32::try_from(next).unwrap_or(self.scop_threshold);
    }

    /// Apply the commander power.
    pub fn apply_cop(&mut self) {
        self.apply(PowerLevel::Cop);
    }

    /// Apply the super commander power.
    pub fn apply_scop(&mut self) {
        self.apply(PowerLevel::Scop);
    }

    /// Revert the commander power, if it is the one applied.
    pub fn reset_cop(&mut self) {
        if self.applied == Some(PowerLevel::Cop) {
            self.reset_power();
        }
    }

    /// Revert the super commander power, if it is the one applied.
    pub fn reset_scop(&mut self) {
        if self.applied == Some(PowerLevel::Scop) {
            self.reset_power();
        }
    }

    /// Revert whichever power is applied, restoring the pre-power modifiers.
    pub fn reset_power(&mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            self.modifiers = snapshot;
        }
        self.applied = None;
    }

    fn apply(&mut self, level: PowerLevel) {
        let effect = match level {
            PowerLevel::Cop => self.cop,
            PowerLevel::Scop => self.scop,
        };
        if self.snapshot.is_none() {
            self.snapshot = Some(self.modifiers.clone());
        }
        for modifier in self.modifiers.values_mut() {
            modifier.attack += effect.attack;
            modifier.defense += effect.defense;
        }
        self.applied = Some(level);
        self.meter = 0;
    }
}

/// Factory for commander profiles by name.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommanderCatalog;

impl CommanderCatalog {
    /// Names accepted by [`CommanderCatalog::create`].
    pub const NAMES: [&'static str; 1] = ["None"];

    /// Create a profile by name with a seeded luck source.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownCommander`] for an unrecognized name.
    pub fn create(name: &str, seed: u64) -> Result<CommanderProfile, CatalogError> {
        match name {
            "None" => Ok(CommanderProfile::base(Luck::seeded(seed))),
            _ => Err(CatalogError::UnknownCommander(name.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_modifiers() {
        let co = CommanderProfile::base(Luck::Fixed(0));
        assert_eq!(co.attack_modifier(UnitKind::Infantry), 100);
        assert_eq!(co.defence_modifier(UnitKind::Carrier), 100);
    }

    #[test]
    fn test_unlisted_kind_defaults_to_zero() {
        let co = CommanderProfile::new(
            "Sparse",
            BTreeMap::from([(UnitKind::Tank, Modifier::new(120, 90))]),
            PowerEffect::default(),
            PowerEffect::default(),
            (100, 200),
            Luck::Fixed(0),
        );
        assert_eq!(co.attack_modifier(UnitKind::Tank), 120);
        assert_eq!(co.attack_modifier(UnitKind::Infantry), 0);
        assert_eq!(co.defence_modifier(UnitKind::Infantry), 0);
    }

    #[test]
    fn test_seeded_luck_is_reproducible() {
        let mut a = CommanderProfile::base(Luck::seeded(7));
        let mut b = CommanderProfile::base(Luck::seeded(7));
        let rolls_a: Vec<u32> = (0..50).map(|_| a.luck_roll()).collect();
        let rolls_b: Vec<u32> = (0..50).map(|_| b.luck_roll()).collect();
        assert_eq!(rolls_a, rolls_b);
        assert!(rolls_a.iter().all(|r| *r <= 9));
    }

    #[test]
    fn test_charge_clamps() {
        let mut co = CommanderProfile::base(Luck::Fixed(0));
        co.charge_power(-5);
        assert_eq!(co.meter(), 0);
        co.charge_power(1_000_000);
        assert_eq!(co.meter(), BASE_SCOP_THRESHOLD);
    }

    #[test]
    fn test_apply_and_reset_cop() {
        let mut co = CommanderProfile::base(Luck::Fixed(0));
        co.charge_power(i64::from(BASE_COP_THRESHOLD));
        assert!(co.can_activate(PowerLevel::Cop));
        assert!(!co.can_activate(PowerLevel::Scop));

        co.apply_cop();
        assert_eq!(co.meter(), 0);
        assert_eq!(co.applied_power(), Some(PowerLevel::Cop));
        assert_eq!(co.attack_modifier(UnitKind::Tank), 110);
        assert_eq!(co.defence_modifier(UnitKind::Tank), 110);

        co.charge_power(500);
        assert_eq!(co.meter(), 0, "meter frozen while a power is applied");

        co.reset_scop();
        assert_eq!(co.applied_power(), Some(PowerLevel::Cop));
        co.reset_cop();
        assert_eq!(co.applied_power(), None);
        assert_eq!(co.attack_modifier(UnitKind::Tank), 100);
    }

    #[test]
    fn test_catalog() {
        assert!(CommanderCatalog::create("None", 1).is_ok());
        assert!(matches!(
            CommanderCatalog::create("Andy", 1),
            Err(CatalogError::UnknownCommander(_))
        ));
    }
}
