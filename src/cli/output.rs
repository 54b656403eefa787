//! Output formatting utilities for CLI.

#![allow(clippy::format_push_string)]

use serde::Serialize;
use skirmish::selfplay::SelfPlayStats;
use skirmish::{Battlefield, GameSession, PlayerId};

/// JSON-serializable outcome of a scripted game.
#[derive(Debug, Serialize)]
pub(super) struct JsonRunResult {
    /// Winner (null while undecided).
    pub(super) winner: Option<PlayerId>,
    /// Current day.
    pub(super) day: u32,
    /// Player to move.
    pub(super) current_player: PlayerId,
    /// Actions executed.
    pub(super) actions_executed: usize,
    /// Per-player state.
    pub(super) players: Vec<JsonPlayerState>,
}

/// JSON-serializable player state.
#[derive(Debug, Serialize)]
pub(super) struct JsonPlayerState {
    /// Owner character.
    pub(super) id: PlayerId,
    /// Funds on hand.
    pub(super) funds: u32,
    /// Units on the board.
    pub(super) units: usize,
    /// Properties owned.
    pub(super) properties: usize,
    /// Power meter.
    pub(super) power_meter: u32,
    /// Knocked out.
    pub(super) eliminated: bool,
}

impl JsonRunResult {
    /// Create from a finished session.
    pub(super) fn from_session(session: &GameSession) -> Self {
        let field = session.battlefield();
        Self {
            winner: session.winner(),
            day: field.day(),
            current_player: field.current_player(),
            actions_executed: session.actions_executed(),
            players: field
                .players()
                .iter()
                .map(|p| player_state(field, *p))
                .collect(),
        }
    }
}

fn player_state(field: &Battlefield, player: PlayerId) -> JsonPlayerState {
    JsonPlayerState {
        id: player,
        funds: field.funds(player),
        units: field.units(Some(player)).count(),
        properties: field.properties(Some(player)).count(),
        power_meter: field.commander(player).map_or(0, |co| co.meter()),
        eliminated: field.is_eliminated(player),
    }
}

/// Format a scripted game outcome as human-readable text.
pub(super) fn format_run_text(session: &GameSession) -> String {
    let result = JsonRunResult::from_session(session);
    let mut output = String::new();

    match result.winner {
        Some(winner) => output.push_str(&format!("Winner: Player {winner}\n")),
        None => output.push_str("Winner: undecided\n"),
    }
    output.push_str(&format!(
        "Day {} ({} actions executed, player {} to move)\n\n",
        result.day, result.actions_executed, result.current_player
    ));

    for player in &result.players {
        output.push_str(&format!(
            "  Player {}: {} funds, {} units, {} properties, meter {}",
            player.id, player.funds, player.units, player.properties, player.power_meter
        ));
        if player.eliminated {
            output.push_str(" [eliminated]");
        }
        output.push('\n');
    }

    output
}

/// JSON-serializable self-play summary.
#[derive(Debug, Serialize)]
pub(super) struct JsonSelfPlayResult {
    /// Games played.
    pub(super) games_played: u64,
    /// Per-player results.
    pub(super) players: Vec<JsonSelfPlayPlayer>,
    /// Draws.
    pub(super) draws: u64,
    /// Average game length in days.
    pub(super) avg_days: f64,
    /// Average actions per game.
    pub(super) avg_actions: f64,
}

/// JSON-serializable per-player self-play result.
#[derive(Debug, Serialize)]
pub(super) struct JsonSelfPlayPlayer {
    /// Owner character.
    pub(super) player: PlayerId,
    /// Games won.
    pub(super) wins: u64,
    /// Fraction of games won.
    pub(super) win_rate: f64,
}

impl JsonSelfPlayResult {
    /// Create from aggregate stats.
    pub(super) fn from_stats(stats: &SelfPlayStats, players: &[PlayerId]) -> Self {
        Self {
            games_played: stats.games_played,
            players: players
                .iter()
                .map(|p| JsonSelfPlayPlayer {
                    player: *p,
                    wins: stats.wins_for(*p),
                    win_rate: stats.win_rate(*p),
                })
                .collect(),
            draws: stats.draws,
            avg_days: stats.avg_days(),
            avg_actions: stats.avg_actions(),
        }
    }
}

/// Format self-play stats as human-readable text.
#[allow(clippy::cast_precision_loss)]
pub(super) fn format_selfplay_text(stats: &SelfPlayStats, players: &[PlayerId]) -> String {
    let mut output = String::new();

    output.push_str(&format!("Self-play Results ({} games)\n", stats.games_played));
    output.push_str("========================================\n\n");

    output.push_str("Win Rates:\n");
    for player in players {
        output.push_str(&format!(
            "  Player {player}: {:.1}% ({} wins)\n",
            stats.win_rate(*player) * 100.0,
            stats.wins_for(*player)
        ));
    }
    let draw_rate = if stats.games_played == 0 {
        0.0
    } else {
        stats.draws as f64 / stats.games_played as f64 * 100.0
    };
    output.push_str(&format!("  Draws: {} ({draw_rate:.1}%)\n\n", stats.draws));

    output.push_str(&format!("Average Game Length: {:.1} days\n", stats.avg_days()));
    output.push_str(&format!("Average Actions: {:.0} per game\n", stats.avg_actions()));

    output
}
