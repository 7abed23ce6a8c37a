use std::collections::HashMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use rusqlite::{params, Connection};
use serde_json::Value;

use crate::nba::endpoints::{result_set, CommonAllPlayers, NBAEndpoint};

pub const DB_FILE: &str = "hooplens.db";

#[derive(Debug, Clone)]
pub struct PlayerEntry {
    pub person_id: i64,
    pub display_name: String,
    pub team_abbreviation: String,
    pub years: String,
}

#[derive(Debug, Clone)]
pub struct TeamEntry {
    pub team_id: i64,
    pub team_city: String,
    pub team_name: String,
    pub team_abbreviation: String,
}

/// Local index over the commonallplayers roster dump, so name lookups
/// do not hit the network on every run.
pub struct StatsDb {
    conn: Connection,
}

impl StatsDb {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<StatsDb> {
        let conn = Connection::open(path).context("failed to open local stats db")?;
        Ok(StatsDb { conn })
    }

    #[cfg(test)]
    fn open_in_memory() -> Result<StatsDb> {
        Ok(StatsDb {
            conn: Connection::open_in_memory()?,
        })
    }

    pub fn table_exists(&self, table_name: &str) -> Result<bool> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' AND name=?1")?;
        let found = stmt.query_row(params![table_name], |row| row.get::<_, String>(0));
        Ok(found.is_ok())
    }

    /// Populate the player index from the roster endpoint if it has not
    /// been fetched before.
    pub fn ensure_players(&mut self, endpoint: &CommonAllPlayers) -> Result<()> {
        if self.table_exists("players")? {
            return Ok(());
        }
        log::info!("player index missing, fetching roster data");
        let response = endpoint.send_request()?;
        let roster = result_set(&response, "CommonAllPlayers")?;
        let headers = roster["headers"]
            .as_array()
            .context("roster result set has no headers")?;
        let rows = roster["rowSet"]
            .as_array()
            .context("roster result set has no rowSet")?;
        self.store_players(headers, rows)
    }

    fn store_players(&mut self, headers: &[Value], rows: &[Value]) -> Result<()> {
        let index: HashMap<&str, usize> = headers
            .iter()
            .enumerate()
            .filter_map(|(pos, h)| h.as_str().map(|name| (name, pos)))
            .collect();
        let col = |name: &str| -> Result<usize> {
            index
                .get(name)
                .copied()
                .with_context(|| format!("roster response missing column {}", name))
        };
        let person_id = col("PERSON_ID")?;
        let display_name = col("DISPLAY_FIRST_LAST")?;
        let from_year = col("FROM_YEAR")?;
        let to_year = col("TO_YEAR")?;
        let team_id = col("TEAM_ID")?;
        let team_city = col("TEAM_CITY")?;
        let team_name = col("TEAM_NAME")?;
        let team_abbreviation = col("TEAM_ABBREVIATION")?;
        let team_code = col("TEAM_CODE")?;

        let tx = self.conn.transaction()?;
        tx.execute(
            "CREATE TABLE players (
                person_id INTEGER PRIMARY KEY,
                display_first_last TEXT NOT NULL,
                from_year TEXT,
                to_year TEXT,
                team_id INTEGER,
                team_city TEXT,
                team_name TEXT,
                team_abbreviation TEXT,
                team_code TEXT
            )",
            [],
        )?;
        {
            let mut insert = tx.prepare(
                "INSERT OR REPLACE INTO players VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;
            for row in rows {
                let cells = row.as_array().context("roster row is not an array")?;
                insert.execute(params![
                    cells.get(person_id).and_then(|v| v.as_i64()).unwrap_or(0),
                    cell_text(cells, display_name),
                    cell_text(cells, from_year),
                    cell_text(cells, to_year),
                    cells.get(team_id).and_then(|v| v.as_i64()).unwrap_or(0),
                    cell_text(cells, team_city),
                    cell_text(cells, team_name),
                    cell_text(cells, team_abbreviation),
                    cell_text(cells, team_code),
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    pub fn find_players(&self, name: &str) -> Result<Vec<PlayerEntry>> {
        let pattern = format!("%{}%", name.to_lowercase());
        let mut stmt = self.conn.prepare(
            "SELECT person_id, display_first_last, team_abbreviation, from_year, to_year
             FROM players WHERE lower(display_first_last) LIKE ?1
             ORDER BY display_first_last",
        )?;
        let entries = stmt
            .query_map(params![pattern], |row| {
                Ok(PlayerEntry {
                    person_id: row.get(0)?,
                    display_name: row.get(1)?,
                    team_abbreviation: row.get(2)?,
                    years: format!("{} - {}", row.get::<_, String>(3)?, row.get::<_, String>(4)?),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    /// A shot chart request needs exactly one player. Unknown names fail,
    /// and ambiguous ones fail listing the candidates so the caller can
    /// be more specific.
    pub fn resolve_player(&self, name: &str) -> Result<PlayerEntry> {
        let mut matches = self.find_players(name)?;
        match matches.len() {
            0 => bail!("no player matching '{}'", name),
            1 => Ok(matches.remove(0)),
            n => {
                let candidates: Vec<String> = matches
                    .iter()
                    .take(8)
                    .map(|p| p.display_name.clone())
                    .collect();
                bail!(
                    "{} players match '{}': {}",
                    n,
                    name,
                    candidates.join(", ")
                )
            }
        }
    }

    pub fn find_team(&self, name: &str) -> Result<Option<TeamEntry>> {
        let pattern = format!("%{}%", name.to_lowercase());
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT team_id, team_city, team_name, team_abbreviation
             FROM players
             WHERE team_id != 0
               AND (lower(team_city) LIKE ?1 OR lower(team_name) LIKE ?1
                    OR lower(team_abbreviation) LIKE ?1 OR lower(team_code) LIKE ?1)",
        )?;
        let mut teams = stmt
            .query_map(params![pattern], |row| {
                Ok(TeamEntry {
                    team_id: row.get(0)?,
                    team_city: row.get(1)?,
                    team_name: row.get(2)?,
                    team_abbreviation: row.get(3)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(if teams.is_empty() {
            None
        } else {
            Some(teams.remove(0))
        })
    }
}

fn cell_text(cells: &[Value], pos: usize) -> String {
    match cells.get(pos) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}
