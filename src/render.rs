//! Plain-text battlefield renderer for terminal viewing.

#![allow(clippy::format_push_string)]

use crate::game::{Battlefield, Coord, Unit};

/// Width of one cell in every line of a row.
const CELL: usize = 5;

/// Render the battlefield as text.
///
/// Each map row takes three lines: unit owner and code, unit status
/// (display health, fuel, ammo; `-` for a unit above 90 health), and the
/// terrain code with the owner filled in.
///
/// ```text
/// Day 3 | Current player: O | Funds: B=2000 O=4000
/// |O INF|     |     |
/// |-9900|     |     |
/// | OHQ | PLN | NCT |
/// ```
#[must_use]
pub fn render_ascii(field: &Battlefield) -> String {
    let mut output = String::new();

    render_header(&mut output, field);

    let dims = field.dimensions();
    for row in 0..dims.rows {
        let coords: Vec<Coord> = (0..dims.cols).map(|col| Coord::new(row, col)).collect();
        push_line(&mut output, coords.iter().map(|c| unit_cell(field.unit(*c, None))));
        push_line(&mut output, coords.iter().map(|c| status_cell(field.unit(*c, None))));
        push_line(
            &mut output,
            coords.iter().map(|c| {
                field
                    .tile(*c)
                    .map_or_else(|| " ".repeat(CELL), |tile| format!(" {tile} "))
            }),
        );
    }

    output
}

fn render_header(output: &mut String, field: &Battlefield) {
    let funds: Vec<String> = field
        .players()
        .iter()
        .map(|p| format!("{p}={}", field.funds(*p)))
        .collect();
    output.push_str(&format!(
        "Day {} | Current player: {} | Funds: {}\n",
        field.day(),
        field.current_player(),
        funds.join(" ")
    ));
}

fn push_line(output: &mut String, cells: impl Iterator<Item = String>) {
    let cells: Vec<String> = cells.collect();
    output.push('|');
    output.push_str(&cells.join("|"));
    output.push_str("|\n");
}

fn unit_cell(unit: Option<&Unit>) -> String {
    unit.map_or_else(
        || " ".repeat(CELL),
        |u| format!("{} {}", u.owner(), u.kind().code()),
    )
}

fn status_cell(unit: Option<&Unit>) -> String {
    unit.map_or_else(
        || " ".repeat(CELL),
        |u| {
            let health = if u.health() > 90 {
                "-".to_string()
            } else {
                u.display_health().to_string()
            };
            format!("{health}{:02}{:02}", u.fuel(), u.ammo())
        },
    )
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::game::{CommanderProfile, Luck, TerrainCatalog, UnitKind};

    fn field() -> Battlefield {
        let catalog = TerrainCatalog::new(['O', 'B']);
        let grid = vec![
            ["OHQ", "PLN", "NCT"].map(|c| catalog.create(c).unwrap()).to_vec(),
            ["PLN", "MTN", "BHQ"].map(|c| catalog.create(c).unwrap()).to_vec(),
        ];
        let units = vec![
            (Coord::new(0, 0), Unit::new(UnitKind::Infantry, 'O')),
            (Coord::new(1, 2), Unit::new(UnitKind::Tank, 'B').with_health(45)),
        ];
        let commanders = BTreeMap::from([
            ('O', CommanderProfile::base(Luck::Fixed(0))),
            ('B', CommanderProfile::base(Luck::Fixed(0))),
        ]);
        Battlefield::new(grid, units, commanders)
            .unwrap()
            .with_funds('O', 4000)
    }

    #[test]
    fn test_render_layout() {
        let text = render_ascii(&field());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 1 + 2 * 3);
        assert_eq!(lines[0], "Day 1 | Current player: B | Funds: B=0 O=4000");
        assert_eq!(lines[1], "|O INF|     |     |");
        assert_eq!(lines[3], "| OHQ | PLN | NCT |");
        assert_eq!(lines[4], "|     |     |B TNK|");
        assert_eq!(lines[6], "| PLN | MTN | BHQ |");
    }

    #[test]
    fn test_status_cell_formats() {
        let full = Unit::new(UnitKind::Infantry, 'O');
        assert_eq!(status_cell(Some(&full)), format!("-{:02}00", full.fuel()));
        let hurt = Unit::new(UnitKind::Tank, 'B').with_health(45).with_ammo(3);
        assert_eq!(status_cell(Some(&hurt)), format!("5{:02}03", hurt.fuel()));
        assert_eq!(status_cell(None), "     ");
    }
}
