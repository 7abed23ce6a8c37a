use crate::nba::params::*;
use crate::nba::shots::{parse_shot_rows, ShotRecord};
use anyhow::{Context, Result};
use polars::prelude::*;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Instant;

const NBA_BASE_URL: &str = "https://stats.nba.com/stats";

/// Shot chart detail for one player (or a whole team) over one season.
pub struct ShotChartDetail {
    pub league_id: LeagueID,
    pub team_id: TeamID,
    pub player_id: PlayerID,
    pub season: Season,
    pub season_type: SeasonType,
    pub context_measure: ContextMeasure,
    pub outcome: Outcome,
    pub location: Location,
    pub last_n_games: LastNGames,
}

/// League-wide (or single-team) per-season team statistics for one
/// measure type.
pub struct LeagueDashTeamStats {
    pub league_id: LeagueID,
    pub team_id: TeamID,
    pub season: Season,
    pub season_type: SeasonType,
    pub measure_type: MeasureType,
    pub per_mode: PerMode,
    pub location: Location,
    pub last_n_games: LastNGames,
}

pub struct CommonAllPlayers {
    pub league_id: LeagueID,
    pub season: Season,
}

pub trait NBAEndpoint {
    fn url(&self) -> String;

    fn send_request(&self) -> Result<Value> {
        fetch_nba_json(&self.url())
    }
}

impl NBAEndpoint for ShotChartDetail {
    fn url(&self) -> String {
        format!(
            "{}/shotchartdetail?{}&{}&{}&{}&{}&{}&{}&{}&{}\
             &DateFrom=&DateTo=&GameID=&GameSegment=&Month=0&OpponentTeamID=0\
             &Period=0&PlayerPosition=&RookieYear=&SeasonSegment=&VsConference=&VsDivision=",
            NBA_BASE_URL,
            self.context_measure,
            self.last_n_games,
            self.league_id,
            self.location,
            self.outcome,
            self.player_id,
            self.season,
            self.season_type,
            self.team_id
        )
    }
}

impl NBAEndpoint for LeagueDashTeamStats {
    fn url(&self) -> String {
        format!(
            "{}/leaguedashteamstats?{}&{}&{}&{}&{}&{}&{}&{}\
             &Conference=&DateFrom=&DateTo=&Division=&GameScope=&GameSegment=&Height=\
             &Month=0&OpponentTeamID=0&PORound=0&PaceAdjust=N&Period=0&PlayerExperience=\
             &PlayerPosition=&PlusMinus=N&Rank=N&SeasonSegment=&ShotClockRange=\
             &StarterBench=&TwoWay=0&VsConference=&VsDivision=",
            NBA_BASE_URL,
            self.last_n_games,
            self.league_id,
            self.location,
            self.measure_type,
            self.per_mode,
            self.season,
            self.season_type,
            self.team_id
        )
    }
}

impl LeagueDashTeamStats {
    /// Fetch the endpoint and return the LeagueDashTeamStats result set
    /// as a dataframe.
    pub fn fetch_frame(&self) -> Result<DataFrame> {
        let mut frames = self.load_dataframes()?;
        frames
            .remove("LeagueDashTeamStats")
            .context("team stats response had no LeagueDashTeamStats result set")
    }
}

impl NBAEndpoint for CommonAllPlayers {
    fn url(&self) -> String {
        format!(
            "{}/commonallplayers?{}&{}&IsOnlyCurrentSeason=0",
            NBA_BASE_URL, self.league_id, self.season
        )
    }
}

impl SaveToDataframe for ShotChartDetail {}

impl SaveToDataframe for LeagueDashTeamStats {}

impl SaveToDataframe for CommonAllPlayers {}

impl ShotChartDetail {
    /// Fetch and normalize the shot rows for this chart request. A season
    /// with no recorded shots is a valid empty result, not an error.
    pub fn fetch_shots(&self) -> Result<Vec<ShotRecord>> {
        let response = self.send_request()?;
        let detail = result_set(&response, "Shot_Chart_Detail")?;
        let headers = detail["headers"]
            .as_array()
            .context("shot chart result set has no headers")?;
        let rows = detail["rowSet"]
            .as_array()
            .context("shot chart result set has no rowSet")?;
        parse_shot_rows(headers, rows)
    }
}

pub trait SaveToDataframe: NBAEndpoint {
    fn load_dataframes(&self) -> Result<HashMap<String, DataFrame>> {
        let endpoint_json = self.send_request()?;
        let load_start = Instant::now();
        let frames = dataframes_from_response(&endpoint_json)?;
        log::debug!("dataframe loading took {:?}", load_start.elapsed());
        Ok(frames)
    }
}

/// Locate one result set by name inside the stats server's response
/// envelope.
pub fn result_set<'a>(response: &'a Value, name: &str) -> Result<&'a Value> {
    let result_sets = response["resultSets"]
        .as_array()
        .context("response has no resultSets array")?;
    result_sets
        .iter()
        .find(|set| set["name"].as_str() == Some(name))
        .with_context(|| format!("response has no result set named {}", name))
}

/// Turn every result set of a response into a dataframe keyed by set name.
/// Column types follow the first non-null value seen in each column.
pub fn dataframes_from_response(response: &Value) -> Result<HashMap<String, DataFrame>> {
    let result_sets = response["resultSets"]
        .as_array()
        .context("response has no resultSets array")?;
    let mut stats_dataframes: HashMap<String, DataFrame> = HashMap::new();
    for data_set in result_sets {
        let data_set_name = data_set["name"]
            .as_str()
            .context("result set has no name")?;
        let data_set_headers = data_set["headers"]
            .as_array()
            .context("result set has no headers")?;
        let data_set_values = data_set["rowSet"]
            .as_array()
            .context("result set has no rowSet")?;

        let mut headers_to_values: HashMap<&str, Vec<&Value>> = HashMap::new();
        for row in data_set_values {
            insert_row_values(&mut headers_to_values, row, data_set_headers)?;
        }

        let mut df_series: Vec<Series> = Vec::new();
        for header in data_set_headers {
            let col_name = header.as_str().context("column header is not a string")?;
            let json_values = match headers_to_values.get(col_name) {
                Some(values) => values,
                None => {
                    let empty: Vec<&str> = vec![];
                    df_series.push(Series::new(col_name, empty));
                    continue;
                }
            };
            if let Some(first_non_null) = json_values.iter().find(|v| !v.is_null()) {
                if first_non_null.is_i64() {
                    let typed: Vec<i64> = json_values.iter().map(|v| v.as_i64().unwrap_or(0)).collect();
                    df_series.push(Series::new(col_name, typed));
                } else if first_non_null.is_f64() {
                    let typed: Vec<f64> =
                        json_values.iter().map(|v| v.as_f64().unwrap_or(0.0)).collect();
                    df_series.push(Series::new(col_name, typed));
                } else {
                    let typed: Vec<String> = json_values
                        .iter()
                        .map(|v| v.as_str().unwrap_or("").to_string())
                        .collect();
                    df_series.push(Series::new(col_name, typed));
                }
            } else {
                let nulls: Vec<Option<f64>> = json_values.iter().map(|_| None).collect();
                df_series.push(Series::new(col_name, nulls));
            }
        }
        stats_dataframes.insert(data_set_name.to_string(), DataFrame::new(df_series)?);
    }
    Ok(stats_dataframes)
}

fn insert_row_values<'a>(
    headers_to_values: &mut HashMap<&'a str, Vec<&'a Value>>,
    row: &'a Value,
    headers: &'a [Value],
) -> Result<()> {
    let row_array = row.as_array().context("row is not an array")?;
    for (pos, col_val) in row_array.iter().enumerate() {
        let col_name = headers
            .get(pos)
            .and_then(|h| h.as_str())
            .context("row is wider than the header set")?;
        headers_to_values.entry(col_name).or_default().push(col_val);
    }
    Ok(())
}

pub fn fetch_nba_json(endpoint_url: &str) -> Result<Value> {
    log::debug!("GET {}", endpoint_url);
    let response = ureq::get(endpoint_url)
        .set("Host", "stats.nba.com")
        .set(
            "User-Agent",
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:72.0) Gecko/20100101 Firefox/72.0",
        )
        .set("Accept", "application/json, text/plain, */*")
        .set("Accept-Language", "en-US,en;q=0.5")
        .set("Accept-Encoding", "gzip, deflate, br")
        .set("Origin", "https://www.nba.com")
        .set("Referer", "https://www.nba.com/")
        .set("Connection", "keep-alive")
        .set("Pragma", "no-cache")
        .set("Cache-Control", "no-cache")
        .call()
        .context("request to stats server failed")?;
    response
        .into_json()
        .context("stats server response was not valid json")
}
