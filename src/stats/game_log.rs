//! Per-game table for a single player, with an averages row.

use std::collections::HashMap;
use std::fmt;

use crate::stats::aggregate::season_average_from_games;
use crate::stats::model::GameStat;

/// One row of the game log. Shooting columns are percentages.
#[derive(Debug, Clone, PartialEq)]
pub struct GameLogRow {
    pub game_id: u64,
    pub date: String,
    pub player: String,
    pub team: String,
    pub opponent: String,
    pub pts: f64,
    pub reb: f64,
    pub ast: f64,
    pub stl: f64,
    pub blk: f64,
    pub fg_pct: f64,
    pub fg3_pct: f64,
    pub ft_pct: f64,
    pub min: f64,
    pub tov: f64,
    pub pf: f64,
}

/// Column means rounded to one decimal.
#[derive(Debug, Clone, PartialEq)]
pub struct GameLogAverages {
    pub pts: f64,
    pub reb: f64,
    pub ast: f64,
    pub stl: f64,
    pub blk: f64,
    pub fg_pct: f64,
    pub fg3_pct: f64,
    pub ft_pct: f64,
    pub min: f64,
    pub tov: f64,
    pub pf: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameLog {
    pub rows: Vec<GameLogRow>,
    pub averages: Option<GameLogAverages>,
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Build the log. `teams` maps team id to abbreviation for the opponent column.
pub fn build_game_log(games: &[GameStat], teams: &HashMap<u64, String>) -> GameLog {
    let rows = games
        .iter()
        .map(|g| {
            let opponent_id = if g.game.home_team_id == g.team.id {
                g.game.visitor_team_id
            } else {
                g.game.home_team_id
            };
            GameLogRow {
                game_id: g.game.id,
                date: g.game.date.chars().take(10).collect(),
                player: format!("{} {}", g.player.first_name, g.player.last_name),
                team: g.team.abbreviation.clone(),
                opponent: teams.get(&opponent_id).cloned().unwrap_or_else(|| "?".to_string()),
                pts: g.pts,
                reb: g.reb,
                ast: g.ast,
                stl: g.stl,
                blk: g.blk,
                fg_pct: g.fg_pct * 100.0,
                fg3_pct: g.fg3_pct * 100.0,
                ft_pct: g.ft_pct * 100.0,
                min: g.min,
                tov: g.turnover,
                pf: g.pf,
            }
        })
        .collect();

    let averages = season_average_from_games(games).map(|avg| GameLogAverages {
        pts: round1(avg.pts),
        reb: round1(avg.reb),
        ast: round1(avg.ast),
        stl: round1(avg.stl),
        blk: round1(avg.blk),
        fg_pct: round1(avg.fg_pct * 100.0),
        fg3_pct: round1(avg.fg3_pct * 100.0),
        ft_pct: round1(avg.ft_pct * 100.0),
        min: round1(avg.min),
        tov: round1(avg.turnover),
        pf: round1(avg.pf),
    });

    GameLog { rows, averages }
}

impl fmt::Display for GameLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:>9} {:<10} {:<22} {:<4} {:<4} {:>5} {:>5} {:>5} {:>4} {:>4} {:>6} {:>6} {:>6} {:>5} {:>4} {:>4}",
            "GAME", "DATE", "PLAYER", "TEAM", "OPP", "PTS", "REB", "AST", "STL", "BLK", "FG%", "3P%",
            "FT%", "MIN", "TOV", "PF"
        )?;
        for r in &self.rows {
            writeln!(
                f,
                "{:>9} {:<10} {:<22} {:<4} {:<4} {:>5} {:>5} {:>5} {:>4} {:>4} {:>6.1} {:>6.1} {:>6.1} {:>5.1} {:>4} {:>4}",
                r.game_id, r.date, r.player, r.team, r.opponent, r.pts, r.reb, r.ast, r.stl, r.blk,
                r.fg_pct, r.fg3_pct, r.ft_pct, r.min, r.tov, r.pf
            )?;
        }
        if let Some(a) = &self.averages {
            writeln!(
                f,
                "{:>9} {:<10} {:<22} {:<4} {:<4} {:>5.1} {:>5.1} {:>5.1} {:>4.1} {:>4.1} {:>6.1} {:>6.1} {:>6.1} {:>5.1} {:>4.1} {:>4.1}",
                "AVERAGES", "", "", "", "", a.pts, a.reb, a.ast, a.stl, a.blk, a.fg_pct, a.fg3_pct,
                a.ft_pct, a.min, a.tov, a.pf
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::aggregate::tests::game;

    #[test]
    fn test_opponent_and_averages() {
        let mut away = game(2, 21.0, 4.0, 6.0, 33.0);
        away.game.home_team_id = 10;
        away.game.visitor_team_id = 4;
        let games = vec![game(1, 30.0, 5.0, 8.0, 36.0), away];
        let teams = HashMap::from([(10, "BOS".to_string()), (4, "CHA".to_string())]);

        let log = build_game_log(&games, &teams);
        assert_eq!(log.rows.len(), 2);
        assert_eq!(log.rows[0].opponent, "BOS");
        assert_eq!(log.rows[1].opponent, "BOS");
        assert_eq!(log.rows[0].fg_pct, 50.0);

        let avg = log.averages.unwrap();
        assert_eq!(avg.pts, 25.5);
        assert_eq!(avg.min, 34.5);
        assert_eq!(avg.ft_pct, 80.0);
    }

    #[test]
    fn test_empty_log_has_no_averages_row() {
        let log = build_game_log(&[], &HashMap::new());
        assert!(log.rows.is_empty());
        assert!(log.averages.is_none());
        assert!(!log.to_string().contains("AVERAGES"));
    }
}
