//! Per-kind attack tables.
//!
//! Each row is `(target, base damage %, ammo cost)`. Kinds without a row for a
//! target cannot attack it; transports and the black bomb have no table.

use crate::game::unit::UnitKind;

/// One attack table row: target kind, base damage percentage, ammo consumed.
type AttackRow = (UnitKind, u16, u8);

/// Base damage and ammo cost of one attacker/target pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackEntry {
    /// Base damage percentage before modifiers.
    pub damage: u16,
    /// Ammo consumed per strike.
    pub ammo_cost: u8,
}

/// Look up the attack entry for `attacker` striking `target`.
#[must_use]
pub fn attack_entry(attacker: UnitKind, target: UnitKind) -> Option<AttackEntry> {
    table(attacker)
        .iter()
        .find(|(kind, _, _)| *kind == target)
        .map(|&(_, damage, ammo_cost)| AttackEntry { damage, ammo_cost })
}

/// All kinds `attacker` can target.
pub fn targets(attacker: UnitKind) -> impl Iterator<Item = UnitKind> {
    table(attacker).iter().map(|(kind, _, _)| *kind)
}

fn table(attacker: UnitKind) -> &'static [AttackRow] {
    match attacker {
        UnitKind::Infantry => INFANTRY,
        UnitKind::Mech => MECH,
        UnitKind::Recon => RECON,
        UnitKind::Artillery => ARTILLERY,
        UnitKind::Tank => TANK,
        UnitKind::AntiAir => ANTI_AIR,
        UnitKind::BattleCopter => BATTLE_COPTER,
        UnitKind::Missile => MISSILE,
        UnitKind::Rocket => ROCKET,
        UnitKind::MediumTank => MEDIUM_TANK,
        UnitKind::Cruiser => CRUISER,
        UnitKind::Fighter => FIGHTER,
        UnitKind::Piperunner => PIPERUNNER,
        UnitKind::Submarine => SUBMARINE,
        UnitKind::Neotank => NEOTANK,
        UnitKind::Bomber => BOMBER,
        UnitKind::Stealth => STEALTH,
        UnitKind::Battleship => BATTLESHIP,
        UnitKind::Megatank => MEGATANK,
        UnitKind::Carrier => CARRIER,
        UnitKind::TransportCopter
        | UnitKind::Apc
        | UnitKind::BlackBoat
        | UnitKind::Lander
        | UnitKind::BlackBomb => &[],
    }
}

const INFANTRY: &[AttackRow] = &[
    (UnitKind::AntiAir, 5, 0),
    (UnitKind::Apc, 14, 0),
    (UnitKind::Artillery, 15, 0),
    (UnitKind::BattleCopter, 7, 0),
    (UnitKind::Infantry, 55, 0),
    (UnitKind::MediumTank, 1, 0),
    (UnitKind::Mech, 45, 0),
    (UnitKind::Megatank, 1, 0),
    (UnitKind::Missile, 26, 0),
    (UnitKind::Neotank, 1, 0),
    (UnitKind::Piperunner, 5, 0),
    (UnitKind::Recon, 12, 0),
    (UnitKind::Rocket, 25, 0),
    (UnitKind::TransportCopter, 30, 0),
    (UnitKind::Tank, 5, 0),
];

const MECH: &[AttackRow] = &[
    (UnitKind::AntiAir, 65, 1),
    (UnitKind::Apc, 75, 1),
    (UnitKind::Artillery, 70, 1),
    (UnitKind::BattleCopter, 9, 0),
    (UnitKind::Infantry, 65, 0),
    (UnitKind::MediumTank, 15, 1),
    (UnitKind::Mech, 55, 0),
    (UnitKind::Megatank, 5, 1),
    (UnitKind::Missile, 85, 1),
    (UnitKind::Neotank, 15, 1),
    (UnitKind::Piperunner, 55, 1),
    (UnitKind::Recon, 85, 1),
    (UnitKind::Rocket, 85, 1),
    (UnitKind::TransportCopter, 35, 0),
    (UnitKind::Tank, 55, 1),
];

const RECON: &[AttackRow] = &[
    (UnitKind::AntiAir, 4, 0),
    (UnitKind::Apc, 45, 0),
    (UnitKind::Artillery, 45, 0),
    (UnitKind::BattleCopter, 12, 0),
    (UnitKind::Infantry, 70, 0),
    (UnitKind::MediumTank, 1, 0),
    (UnitKind::Mech, 65, 0),
    (UnitKind::Megatank, 1, 0),
    (UnitKind::Missile, 28, 0),
    (UnitKind::Neotank, 1, 0),
    (UnitKind::Piperunner, 6, 0),
    (UnitKind::Recon, 35, 0),
    (UnitKind::Rocket, 55, 0),
    (UnitKind::TransportCopter, 35, 0),
    (UnitKind::Tank, 6, 0),
];

const ARTILLERY: &[AttackRow] = &[
    (UnitKind::AntiAir, 75, 1),
    (UnitKind::Apc, 70, 1),
    (UnitKind::Artillery, 75, 1),
    (UnitKind::Battleship, 40, 1),
    (UnitKind::BlackBoat, 55, 1),
    (UnitKind::Carrier, 45, 1),
    (UnitKind::Cruiser, 65, 1),
    (UnitKind::Infantry, 90, 1),
    (UnitKind::Lander, 55, 1),
    (UnitKind::MediumTank, 45, 1),
    (UnitKind::Mech, 85, 1),
    (UnitKind::Megatank, 15, 1),
    (UnitKind::Missile, 80, 1),
    (UnitKind::Neotank, 40, 1),
    (UnitKind::Piperunner, 70, 1),
    (UnitKind::Recon, 80, 1),
    (UnitKind::Rocket, 80, 1),
    (UnitKind::Submarine, 60, 1),
    (UnitKind::Tank, 70, 1),
];

const TANK: &[AttackRow] = &[
    (UnitKind::AntiAir, 65, 1),
    (UnitKind::Apc, 75, 1),
    (UnitKind::Artillery, 70, 1),
    (UnitKind::BattleCopter, 10, 0),
    (UnitKind::Battleship, 1, 1),
    (UnitKind::BlackBoat, 10, 1),
    (UnitKind::Carrier, 1, 1),
    (UnitKind::Cruiser, 5, 1),
    (UnitKind::Infantry, 75, 0),
    (UnitKind::Lander, 10, 1),
    (UnitKind::MediumTank, 15, 1),
    (UnitKind::Mech, 70, 0),
    (UnitKind::Megatank, 10, 1),
    (UnitKind::Missile, 85, 1),
    (UnitKind::Neotank, 15, 1),
    (UnitKind::Piperunner, 55, 1),
    (UnitKind::Recon, 85, 1),
    (UnitKind::Rocket, 85, 1),
    (UnitKind::Submarine, 1, 1),
    (UnitKind::TransportCopter, 40, 0),
    (UnitKind::Tank, 55, 1),
];

const ANTI_AIR: &[AttackRow] = &[
    (UnitKind::AntiAir, 45, 1),
    (UnitKind::Apc, 50, 1),
    (UnitKind::Artillery, 50, 1),
    (UnitKind::BattleCopter, 120, 1),
    (UnitKind::BlackBomb, 120, 1),
    (UnitKind::Bomber, 75, 1),
    (UnitKind::Fighter, 65, 1),
    (UnitKind::Infantry, 105, 1),
    (UnitKind::MediumTank, 10, 1),
    (UnitKind::Mech, 105, 1),
    (UnitKind::Megatank, 1, 1),
    (UnitKind::Missile, 55, 1),
    (UnitKind::Neotank, 5, 1),
    (UnitKind::Piperunner, 25, 1),
    (UnitKind::Recon, 60, 1),
    (UnitKind::Rocket, 55, 1),
    (UnitKind::Stealth, 75, 1),
    (UnitKind::TransportCopter, 120, 1),
    (UnitKind::Tank, 25, 1),
];

const BATTLE_COPTER: &[AttackRow] = &[
    (UnitKind::AntiAir, 25, 1),
    (UnitKind::Apc, 60, 1),
    (UnitKind::Artillery, 65, 1),
    (UnitKind::BattleCopter, 65, 1),
    (UnitKind::Battleship, 25, 1),
    (UnitKind::BlackBoat, 25, 1),
    (UnitKind::Carrier, 25, 1),
    (UnitKind::Cruiser, 55, 1),
    (UnitKind::Infantry, 75, 0),
    (UnitKind::Lander, 25, 1),
    (UnitKind::MediumTank, 25, 1),
    (UnitKind::Mech, 75, 0),
    (UnitKind::Megatank, 10, 1),
    (UnitKind::Missile, 65, 1),
    (UnitKind::Neotank, 20, 1),
    (UnitKind::Piperunner, 55, 1),
    (UnitKind::Recon, 55, 1),
    (UnitKind::Rocket, 65, 1),
    (UnitKind::Submarine, 25, 1),
    (UnitKind::TransportCopter, 95, 0),
    (UnitKind::Tank, 55, 1),
];

const MISSILE: &[AttackRow] = &[
    (UnitKind::BattleCopter, 120, 1),
    (UnitKind::BlackBomb, 120, 1),
    (UnitKind::Bomber, 100, 1),
    (UnitKind::Fighter, 100, 1),
    (UnitKind::Stealth, 100, 1),
    (UnitKind::TransportCopter, 120, 1),
];

const ROCKET: &[AttackRow] = &[
    (UnitKind::AntiAir, 85, 1),
    (UnitKind::Apc, 80, 1),
    (UnitKind::Artillery, 80, 1),
    (UnitKind::Battleship, 55, 1),
    (UnitKind::BlackBoat, 60, 1),
    (UnitKind::Carrier, 60, 1),
    (UnitKind::Cruiser, 85, 1),
    (UnitKind::Infantry, 95, 1),
    (UnitKind::Lander, 60, 1),
    (UnitKind::MediumTank, 55, 1),
    (UnitKind::Mech, 90, 1),
    (UnitKind::Megatank, 25, 1),
    (UnitKind::Missile, 90, 1),
    (UnitKind::Neotank, 50, 1),
    (UnitKind::Piperunner, 80, 1),
    (UnitKind::Recon, 90, 1),
    (UnitKind::Rocket, 85, 1),
    (UnitKind::Submarine, 85, 1),
    (UnitKind::Tank, 80, 1),
];

const MEDIUM_TANK: &[AttackRow] = &[
    (UnitKind::AntiAir, 105, 1),
    (UnitKind::Apc, 105, 1),
    (UnitKind::Artillery, 105, 1),
    (UnitKind::BattleCopter, 12, 0),
    (UnitKind::Battleship, 10, 1),
    (UnitKind::BlackBoat, 35, 1),
    (UnitKind::Carrier, 10, 1),
    (UnitKind::Cruiser, 45, 1),
    (UnitKind::Infantry, 105, 0),
    (UnitKind::Lander, 35, 1),
    (UnitKind::MediumTank, 55, 1),
    (UnitKind::Mech, 95, 0),
    (UnitKind::Megatank, 25, 1),
    (UnitKind::Missile, 105, 1),
    (UnitKind::Neotank, 45, 1),
    (UnitKind::Piperunner, 85, 1),
    (UnitKind::Recon, 105, 1),
    (UnitKind::Rocket, 105, 1),
    (UnitKind::Submarine, 10, 1),
    (UnitKind::TransportCopter, 45, 0),
    (UnitKind::Tank, 85, 1),
];

const CRUISER: &[AttackRow] = &[
    (UnitKind::BattleCopter, 115, 0),
    (UnitKind::BlackBoat, 25, 1),
    (UnitKind::BlackBomb, 120, 0),
    (UnitKind::Bomber, 65, 0),
    (UnitKind::Carrier, 5, 1),
    (UnitKind::Fighter, 55, 0),
    (UnitKind::Stealth, 100, 0),
    (UnitKind::Submarine, 90, 1),
    (UnitKind::TransportCopter, 115, 0),
];

const FIGHTER: &[AttackRow] = &[
    (UnitKind::BattleCopter, 100, 1),
    (UnitKind::BlackBomb, 120, 1),
    (UnitKind::Bomber, 100, 1),
    (UnitKind::Fighter, 55, 1),
    (UnitKind::Stealth, 85, 1),
    (UnitKind::TransportCopter, 100, 1),
];

const PIPERUNNER: &[AttackRow] = &[
    (UnitKind::AntiAir, 85, 1),
    (UnitKind::Apc, 80, 1),
    (UnitKind::Artillery, 80, 1),
    (UnitKind::BattleCopter, 105, 1),
    (UnitKind::Battleship, 55, 1),
    (UnitKind::BlackBoat, 60, 1),
    (UnitKind::BlackBomb, 120, 1),
    (UnitKind::Bomber, 75, 1),
    (UnitKind::Carrier, 60, 1),
    (UnitKind::Cruiser, 85, 1),
    (UnitKind::Fighter, 65, 1),
    (UnitKind::Infantry, 95, 1),
    (UnitKind::Lander, 60, 1),
    (UnitKind::MediumTank, 55, 1),
    (UnitKind::Mech, 90, 1),
    (UnitKind::Megatank, 25, 1),
    (UnitKind::Missile, 90, 1),
    (UnitKind::Neotank, 50, 1),
    (UnitKind::Piperunner, 80, 1),
    (UnitKind::Recon, 90, 1),
    (UnitKind::Rocket, 85, 1),
    (UnitKind::Stealth, 75, 1),
    (UnitKind::Submarine, 85, 1),
    (UnitKind::TransportCopter, 105, 1),
    (UnitKind::Tank, 80, 1),
];

const SUBMARINE: &[AttackRow] = &[
    (UnitKind::Battleship, 55, 1),
    (UnitKind::BlackBoat, 95, 1),
    (UnitKind::Carrier, 75, 1),
    (UnitKind::Cruiser, 25, 1),
    (UnitKind::Lander, 95, 1),
    (UnitKind::Submarine, 55, 1),
];

const NEOTANK: &[AttackRow] = &[
    (UnitKind::AntiAir, 115, 1),
    (UnitKind::Apc, 125, 1),
    (UnitKind::Artillery, 115, 1),
    (UnitKind::BattleCopter, 22, 0),
    (UnitKind::Battleship, 15, 1),
    (UnitKind::BlackBoat, 40, 1),
    (UnitKind::Carrier, 15, 1),
    (UnitKind::Cruiser, 50, 1),
    (UnitKind::Infantry, 125, 0),
    (UnitKind::Lander, 50, 1),
    (UnitKind::MediumTank, 75, 1),
    (UnitKind::Mech, 115, 0),
    (UnitKind::Megatank, 35, 1),
    (UnitKind::Missile, 125, 1),
    (UnitKind::Neotank, 55, 1),
    (UnitKind::Piperunner, 105, 1),
    (UnitKind::Recon, 125, 1),
    (UnitKind::Rocket, 125, 1),
    (UnitKind::Submarine, 15, 1),
    (UnitKind::TransportCopter, 55, 0),
    (UnitKind::Tank, 105, 1),
];

const BOMBER: &[AttackRow] = &[
    (UnitKind::AntiAir, 95, 1),
    (UnitKind::Apc, 105, 1),
    (UnitKind::Artillery, 105, 1),
    (UnitKind::Battleship, 75, 1),
    (UnitKind::BlackBoat, 95, 1),
    (UnitKind::Carrier, 75, 1),
    (UnitKind::Cruiser, 85, 1),
    (UnitKind::Infantry, 110, 1),
    (UnitKind::Lander, 95, 1),
    (UnitKind::MediumTank, 95, 1),
    (UnitKind::Mech, 110, 1),
    (UnitKind::Megatank, 35, 1),
    (UnitKind::Missile, 105, 1),
    (UnitKind::Neotank, 90, 1),
    (UnitKind::Piperunner, 105, 1),
    (UnitKind::Recon, 105, 1),
    (UnitKind::Rocket, 105, 1),
    (UnitKind::Submarine, 95, 1),
    (UnitKind::Tank, 105, 1),
];

const STEALTH: &[AttackRow] = &[
    (UnitKind::AntiAir, 50, 1),
    (UnitKind::Apc, 85, 1),
    (UnitKind::Artillery, 75, 1),
    (UnitKind::BattleCopter, 85, 1),
    (UnitKind::Battleship, 45, 1),
    (UnitKind::BlackBoat, 65, 1),
    (UnitKind::BlackBomb, 120, 1),
    (UnitKind::Bomber, 70, 1),
    (UnitKind::Carrier, 45, 1),
    (UnitKind::Cruiser, 35, 1),
    (UnitKind::Fighter, 45, 1),
    (UnitKind::Infantry, 90, 1),
    (UnitKind::Lander, 65, 1),
    (UnitKind::MediumTank, 70, 1),
    (UnitKind::Mech, 90, 1),
    (UnitKind::Megatank, 15, 1),
    (UnitKind::Missile, 85, 1),
    (UnitKind::Neotank, 60, 1),
    (UnitKind::Piperunner, 80, 1),
    (UnitKind::Recon, 85, 1),
    (UnitKind::Rocket, 85, 1),
    (UnitKind::Stealth, 55, 1),
    (UnitKind::Submarine, 55, 1),
    (UnitKind::TransportCopter, 95, 1),
    (UnitKind::Tank, 75, 1),
];

const BATTLESHIP: &[AttackRow] = &[
    (UnitKind::AntiAir, 85, 1),
    (UnitKind::Apc, 80, 1),
    (UnitKind::Artillery, 80, 1),
    (UnitKind::Battleship, 50, 1),
    (UnitKind::BlackBoat, 95, 1),
    (UnitKind::Carrier, 60, 1),
    (UnitKind::Cruiser, 95, 1),
    (UnitKind::Infantry, 95, 1),
    (UnitKind::Lander, 95, 1),
    (UnitKind::MediumTank, 55, 1),
    (UnitKind::Mech, 90, 1),
    (UnitKind::Megatank, 25, 1),
    (UnitKind::Missile, 90, 1),
    (UnitKind::Neotank, 50, 1),
    (UnitKind::Piperunner, 80, 1),
    (UnitKind::Recon, 90, 1),
    (UnitKind::Rocket, 85, 1),
    (UnitKind::Submarine, 95, 1),
    (UnitKind::Tank, 80, 1),
];

const MEGATANK: &[AttackRow] = &[
    (UnitKind::AntiAir, 195, 1),
    (UnitKind::Apc, 195, 1),
    (UnitKind::Artillery, 195, 1),
    (UnitKind::BattleCopter, 22, 0),
    (UnitKind::Battleship, 45, 1),
    (UnitKind::BlackBoat, 105, 1),
    (UnitKind::Carrier, 45, 1),
    (UnitKind::Cruiser, 65, 1),
    (UnitKind::Infantry, 135, 0),
    (UnitKind::Lander, 75, 1),
    (UnitKind::MediumTank, 125, 1),
    (UnitKind::Mech, 125, 0),
    (UnitKind::Megatank, 65, 1),
    (UnitKind::Missile, 195, 1),
    (UnitKind::Neotank, 115, 1),
    (UnitKind::Piperunner, 180, 1),
    (UnitKind::Recon, 195, 1),
    (UnitKind::Rocket, 195, 1),
    (UnitKind::Submarine, 45, 1),
    (UnitKind::TransportCopter, 55, 0),
    (UnitKind::Tank, 180, 1),
];

const CARRIER: &[AttackRow] = &[
    (UnitKind::BattleCopter, 115, 1),
    (UnitKind::BlackBomb, 120, 1),
    (UnitKind::Bomber, 100, 1),
    (UnitKind::Fighter, 100, 1),
    (UnitKind::Stealth, 100, 1),
    (UnitKind::TransportCopter, 115, 1),
];
