//! Damage calculation.
//!
//! ```text
//! raw = ((base * atk / 100) + luck) * (attacker_hp / 10)
//!       * ((200 - (def + stars * defender_hp)) / 100)
//! damage = floor(ceil(raw / 0.05) * 0.05)
//! ```
//!
//! `attacker_hp` and `defender_hp` are display health. The arithmetic is done
//! in `f64` in exactly this order; the rounding step depends on it.

use crate::game::commander::CommanderProfile;
use crate::game::terrain::Tile;
use crate::game::unit::Unit;

/// Every input of one damage calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Engagement {
    /// Base damage percentage from the attack table.
    pub base_damage: u16,
    /// Attacker's commander attack modifier.
    pub attack_modifier: i32,
    /// Luck roll, `0..=9`.
    pub luck: u32,
    /// Attacker display health.
    pub attacker_display_health: u8,
    /// Defender's commander defense modifier.
    pub defense_modifier: i32,
    /// Defense stars of the defender's tile.
    pub terrain_stars: u8,
    /// Defender display health.
    pub defender_display_health: u8,
}

impl Engagement {
    /// Gather the inputs for `attacker` hitting `defender` standing on
    /// `terrain`. `None` if the attacker's table has no entry for the target.
    #[must_use]
    pub fn new(
        attacker: &Unit,
        attacker_co: &CommanderProfile,
        luck: u32,
        defender: &Unit,
        defender_co: &CommanderProfile,
        terrain: &Tile,
    ) -> Option<Self> {
        let entry = attacker.attack_entry(defender)?;
        Some(Self {
            base_damage: entry.damage,
            attack_modifier: attacker_co.attack_modifier(attacker.kind()),
            luck,
            attacker_display_health: attacker.display_health(),
            defense_modifier: defender_co.defence_modifier(defender.kind()),
            terrain_stars: terrain.defense(),
            defender_display_health: defender.display_health(),
        })
    }

    /// Internal health points removed from the defender. Never negative.
    #[must_use]
    pub fn damage(&self) -> u32 {
        let attack = f64::from(self.base_damage) * f64::from(self.attack_modifier) / 100.0
            + f64::from(self.luck);
        let strength = f64::from(self.attacker_display_health) / 10.0;
        let cover = f64::from(self.terrain_stars) * f64::from(self.defender_display_health);
        let defense = (200.0 - (f64::from(self.defense_modifier) + cover)) / 100.0;

        let raw = attack * strength * defense;
        let rounded = ((raw / 0.05).ceil() * 0.05).floor();

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let damage = rounded.max(0.0).min(f64::from(u32::MAX)) as u32;
        damage
    }
}
