use core::fmt;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt::Display;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use serde_json::Value;

/// Side-of-court category reported by the stats server as SHOT_ZONE_AREA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ZoneArea {
    Center,
    RightSideCenter,
    LeftSideCenter,
    RightSide,
    LeftSide,
    BackCourt,
}

/// Distance category reported as SHOT_ZONE_BASIC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ZoneBasic {
    RestrictedArea,
    PaintNonRa,
    MidRange,
    LeftCorner3,
    RightCorner3,
    AboveBreak3,
    Backcourt,
}

impl ZoneArea {
    pub fn label(&self) -> &'static str {
        match self {
            ZoneArea::Center => "Center(C)",
            ZoneArea::RightSideCenter => "Right Side Center(RC)",
            ZoneArea::LeftSideCenter => "Left Side Center(LC)",
            ZoneArea::RightSide => "Right Side(R)",
            ZoneArea::LeftSide => "Left Side(L)",
            ZoneArea::BackCourt => "Back Court(BC)",
        }
    }
}

impl ZoneBasic {
    pub fn label(&self) -> &'static str {
        match self {
            ZoneBasic::RestrictedArea => "Restricted Area",
            ZoneBasic::PaintNonRa => "In The Paint (Non-RA)",
            ZoneBasic::MidRange => "Mid-Range",
            ZoneBasic::LeftCorner3 => "Left Corner 3",
            ZoneBasic::RightCorner3 => "Right Corner 3",
            ZoneBasic::AboveBreak3 => "Above the Break 3",
            ZoneBasic::Backcourt => "Backcourt",
        }
    }

    /// Point value of a make from this zone. Three-point zones all carry
    /// a '3' in their server-side label.
    pub fn points(&self) -> u32 {
        if self.label().contains('3') {
            3
        } else {
            2
        }
    }
}

impl FromStr for ZoneArea {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Center(C)" => Ok(ZoneArea::Center),
            "Right Side Center(RC)" => Ok(ZoneArea::RightSideCenter),
            "Left Side Center(LC)" => Ok(ZoneArea::LeftSideCenter),
            "Right Side(R)" => Ok(ZoneArea::RightSide),
            "Left Side(L)" => Ok(ZoneArea::LeftSide),
            "Back Court(BC)" => Ok(ZoneArea::BackCourt),
            other => bail!("unknown shot zone area '{}'", other),
        }
    }
}

impl FromStr for ZoneBasic {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Restricted Area" => Ok(ZoneBasic::RestrictedArea),
            "In The Paint (Non-RA)" => Ok(ZoneBasic::PaintNonRa),
            "Mid-Range" => Ok(ZoneBasic::MidRange),
            "Left Corner 3" => Ok(ZoneBasic::LeftCorner3),
            "Right Corner 3" => Ok(ZoneBasic::RightCorner3),
            "Above the Break 3" => Ok(ZoneBasic::AboveBreak3),
            "Backcourt" => Ok(ZoneBasic::Backcourt),
            other => bail!("unknown shot zone basic '{}'", other),
        }
    }
}

impl Display for ZoneArea {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Display for ZoneBasic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One observed field-goal attempt, hoop at the origin, coordinates in the
/// server's native unit (tenths of a foot).
#[derive(Debug, Clone, PartialEq)]
pub struct ShotRecord {
    pub loc_x: f64,
    pub loc_y: f64,
    pub made: bool,
    pub zone_area: ZoneArea,
    pub zone_basic: ZoneBasic,
    pub distance_ft: i64,
}

/// A court region, an (area, basic) pairing. Paint non-restricted-area
/// shots are rare enough that the side split is not useful, so they all
/// collapse into one zone with no area qualifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Zone {
    pub area: Option<ZoneArea>,
    pub basic: ZoneBasic,
}

impl Zone {
    pub fn for_shot(shot: &ShotRecord) -> Zone {
        if shot.zone_basic == ZoneBasic::PaintNonRa {
            Zone {
                area: None,
                basic: ZoneBasic::PaintNonRa,
            }
        } else {
            Zone {
                area: Some(shot.zone_area),
                basic: shot.zone_basic,
            }
        }
    }

    pub fn points(&self) -> u32 {
        self.basic.points()
    }
}

impl Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.area {
            Some(area) => write!(f, "{} / {}", self.basic, area),
            None => write!(f, "{}", self.basic),
        }
    }
}

/// Which summary statistic `summarize` reports per zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryMode {
    Percentage,
    ExpectedValue,
}

impl FromStr for SummaryMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "percentage" | "pct" => Ok(SummaryMode::Percentage),
            "ev" | "expected-value" | "expectedvalue" => Ok(SummaryMode::ExpectedValue),
            other => bail!("unknown summary mode '{}', expected percentage or ev", other),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ZoneSummary {
    pub zone: Zone,
    pub attempts: u32,
    pub makes: u32,
    /// Mean coordinates of the zone's shots, used for label placement.
    pub label_x: f64,
    pub label_y: f64,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DistanceBucket {
    pub attempts: u32,
    pub makes: u32,
}

impl DistanceBucket {
    pub fn make_pct(&self) -> f64 {
        if self.attempts == 0 {
            return 0.0;
        }
        round_to(100.0 * f64::from(self.makes) / f64::from(self.attempts), 1)
    }
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

fn group_by_zone(records: &[ShotRecord]) -> BTreeMap<Zone, Vec<&ShotRecord>> {
    let mut groups: BTreeMap<Zone, Vec<&ShotRecord>> = BTreeMap::new();
    for shot in records {
        groups.entry(Zone::for_shot(shot)).or_default().push(shot);
    }
    groups
}

/// One zone per distinct (area, basic) pair observed in `records`. Zones
/// with no shots are never emitted.
pub fn enumerate_zones(records: &[ShotRecord]) -> BTreeSet<Zone> {
    records.iter().map(Zone::for_shot).collect()
}

/// Reduce shots to one summary per observed zone. Every record lands in
/// exactly one zone, so summed attempts equal the input length. Empty
/// input yields an empty vector rather than an error.
pub fn summarize(records: &[ShotRecord], mode: SummaryMode) -> Vec<ZoneSummary> {
    let mut summaries = Vec::new();
    for (zone, shots) in group_by_zone(records) {
        let attempts = shots.len() as u32;
        if attempts == 0 {
            continue;
        }
        let makes = shots.iter().filter(|s| s.made).count() as u32;
        let n = f64::from(attempts);
        let label_x = shots.iter().map(|s| s.loc_x).sum::<f64>() / n;
        let label_y = shots.iter().map(|s| s.loc_y).sum::<f64>() / n;
        let make_rate = f64::from(makes) / n;
        let value = match mode {
            SummaryMode::Percentage => round_to(100.0 * make_rate, 1),
            SummaryMode::ExpectedValue => round_to(f64::from(zone.points()) * make_rate, 2),
        };
        summaries.push(ZoneSummary {
            zone,
            attempts,
            makes,
            label_x,
            label_y,
            value,
        });
    }
    summaries
}

/// Make/attempt counts keyed by exact integer foot distance. Distances
/// with no attempts are absent.
pub fn bucket_by_distance(records: &[ShotRecord]) -> BTreeMap<i64, DistanceBucket> {
    let mut buckets: BTreeMap<i64, DistanceBucket> = BTreeMap::new();
    for shot in records {
        let bucket = buckets.entry(shot.distance_ft).or_default();
        bucket.attempts += 1;
        if shot.made {
            bucket.makes += 1;
        }
    }
    buckets
}

/// Normalize shot chart rows into records, addressing columns by name so
/// the aggregation never depends on the server's column ordering.
pub fn parse_shot_rows(headers: &[Value], rows: &[Value]) -> Result<Vec<ShotRecord>> {
    let index: HashMap<&str, usize> = headers
        .iter()
        .enumerate()
        .filter_map(|(pos, h)| h.as_str().map(|name| (name, pos)))
        .collect();
    let col = |name: &str| -> Result<usize> {
        index
            .get(name)
            .copied()
            .with_context(|| format!("shot chart response missing column {}", name))
    };
    let loc_x_col = col("LOC_X")?;
    let loc_y_col = col("LOC_Y")?;
    let made_col = col("SHOT_MADE_FLAG")?;
    let area_col = col("SHOT_ZONE_AREA")?;
    let basic_col = col("SHOT_ZONE_BASIC")?;
    let distance_col = col("SHOT_DISTANCE")?;

    let mut records = Vec::with_capacity(rows.len());
    for (row_num, row) in rows.iter().enumerate() {
        let cells = row
            .as_array()
            .with_context(|| format!("shot row {} is not an array", row_num))?;
        let number = |pos: usize| -> Result<f64> {
            cells
                .get(pos)
                .and_then(|v| v.as_f64())
                .with_context(|| format!("shot row {} has no number at column {}", row_num, pos))
        };
        let text = |pos: usize| -> Result<&str> {
            cells
                .get(pos)
                .and_then(|v| v.as_str())
                .with_context(|| format!("shot row {} has no text at column {}", row_num, pos))
        };
        records.push(ShotRecord {
            loc_x: number(loc_x_col)?,
            loc_y: number(loc_y_col)?,
            made: number(made_col)? != 0.0,
            zone_area: text(area_col)?.parse()?,
            zone_basic: text(basic_col)?.parse()?,
            distance_ft: number(distance_col)? as i64,
        });
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn shot(
        loc_x: f64,
        loc_y: f64,
        made: bool,
        zone_area: ZoneArea,
        zone_basic: ZoneBasic,
        distance_ft: i64,
    ) -> ShotRecord {
        ShotRecord {
            loc_x,
            loc_y,
            made,
            zone_area,
            zone_basic,
            distance_ft,
        }
    }

    #[test]
    fn mid_range_example() {
        let records = vec![
            shot(10.0, 20.0, true, ZoneArea::RightSide, ZoneBasic::MidRange, 12),
            shot(10.0, 10.0, false, ZoneArea::RightSide, ZoneBasic::MidRange, 11),
            shot(10.0, 30.0, false, ZoneArea::RightSide, ZoneBasic::MidRange, 13),
        ];

        let pct = summarize(&records, SummaryMode::Percentage);
        assert_eq!(pct.len(), 1);
        assert_eq!(pct[0].attempts, 3);
        assert_eq!(pct[0].makes, 1);
        assert_eq!(pct[0].label_x, 10.0);
        assert_eq!(pct[0].label_y, 20.0);
        assert_eq!(pct[0].value, 33.3);

        let ev = summarize(&records, SummaryMode::ExpectedValue);
        assert_eq!(ev[0].value, 0.67);
    }

    #[test]
    fn three_point_zone_scores_three() {
        let records = vec![shot(
            -120.0,
            240.0,
            true,
            ZoneArea::LeftSideCenter,
            ZoneBasic::AboveBreak3,
            26,
        )];
        let pct = summarize(&records, SummaryMode::Percentage);
        assert_eq!(pct[0].value, 100.0);
        let ev = summarize(&records, SummaryMode::ExpectedValue);
        assert_eq!(ev[0].value, 3.0);
    }

    #[test]
    fn empty_input_yields_empty_summaries() {
        assert!(summarize(&[], SummaryMode::Percentage).is_empty());
        assert!(summarize(&[], SummaryMode::ExpectedValue).is_empty());
        assert!(enumerate_zones(&[]).is_empty());
        assert!(bucket_by_distance(&[]).is_empty());
    }

    #[test]
    fn paint_non_ra_collapses_across_areas() {
        let records = vec![
            shot(-40.0, 80.0, true, ZoneArea::LeftSide, ZoneBasic::PaintNonRa, 8),
            shot(40.0, 80.0, false, ZoneArea::RightSide, ZoneBasic::PaintNonRa, 9),
            shot(0.0, 100.0, false, ZoneArea::Center, ZoneBasic::PaintNonRa, 10),
        ];
        let zones = enumerate_zones(&records);
        assert_eq!(zones.len(), 1);
        let zone = zones.iter().next().unwrap();
        assert_eq!(zone.area, None);
        assert_eq!(zone.basic, ZoneBasic::PaintNonRa);

        let summaries = summarize(&records, SummaryMode::Percentage);
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].attempts, 3);
    }

    #[test]
    fn attempts_partition_the_input() {
        let records = vec![
            shot(0.0, 5.0, true, ZoneArea::Center, ZoneBasic::RestrictedArea, 1),
            shot(2.0, 4.0, false, ZoneArea::Center, ZoneBasic::RestrictedArea, 1),
            shot(-40.0, 90.0, true, ZoneArea::LeftSide, ZoneBasic::PaintNonRa, 9),
            shot(60.0, 95.0, false, ZoneArea::RightSide, ZoneBasic::PaintNonRa, 10),
            shot(110.0, 110.0, true, ZoneArea::RightSide, ZoneBasic::MidRange, 15),
            shot(-230.0, 30.0, true, ZoneArea::LeftSide, ZoneBasic::LeftCorner3, 23),
            shot(0.0, 260.0, false, ZoneArea::Center, ZoneBasic::AboveBreak3, 26),
            shot(-20.0, 420.0, false, ZoneArea::BackCourt, ZoneBasic::Backcourt, 44),
        ];
        let summaries = summarize(&records, SummaryMode::Percentage);
        let total: u32 = summaries.iter().map(|s| s.attempts).sum();
        assert_eq!(total as usize, records.len());
        assert_eq!(summaries.len(), enumerate_zones(&records).len());
        for s in &summaries {
            assert!(s.value >= 0.0 && s.value <= 100.0);
            assert!(s.makes <= s.attempts);
        }
    }

    #[test]
    fn expected_value_stays_within_zone_points() {
        let records = vec![
            shot(-230.0, 30.0, true, ZoneArea::LeftSide, ZoneBasic::LeftCorner3, 23),
            shot(-232.0, 25.0, true, ZoneArea::LeftSide, ZoneBasic::LeftCorner3, 23),
            shot(5.0, 3.0, true, ZoneArea::Center, ZoneBasic::RestrictedArea, 0),
            shot(-3.0, 6.0, false, ZoneArea::Center, ZoneBasic::RestrictedArea, 1),
        ];
        for s in summarize(&records, SummaryMode::ExpectedValue) {
            assert!(s.value >= 0.0);
            assert!(s.value <= f64::from(s.zone.points()));
        }
    }

    #[test]
    fn summarize_is_deterministic() {
        let records = vec![
            shot(10.0, 20.0, true, ZoneArea::RightSide, ZoneBasic::MidRange, 12),
            shot(-40.0, 80.0, false, ZoneArea::LeftSide, ZoneBasic::PaintNonRa, 8),
            shot(0.0, 260.0, true, ZoneArea::Center, ZoneBasic::AboveBreak3, 26),
        ];
        let first = summarize(&records, SummaryMode::Percentage);
        let second = summarize(&records, SummaryMode::Percentage);
        assert_eq!(first, second);
    }

    #[test]
    fn distance_buckets_are_sparse() {
        let records = vec![
            shot(0.0, 5.0, true, ZoneArea::Center, ZoneBasic::RestrictedArea, 0),
            shot(2.0, 4.0, false, ZoneArea::Center, ZoneBasic::RestrictedArea, 0),
            shot(-230.0, 30.0, true, ZoneArea::LeftSide, ZoneBasic::LeftCorner3, 23),
        ];
        let buckets = bucket_by_distance(&records);
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[&0], DistanceBucket { attempts: 2, makes: 1 });
        assert_eq!(buckets[&23], DistanceBucket { attempts: 1, makes: 1 });
        assert!(buckets.get(&10).is_none());
        assert_eq!(buckets[&0].make_pct(), 50.0);
    }

    #[test]
    fn zone_labels_round_trip() {
        let areas = [
            ZoneArea::Center,
            ZoneArea::RightSideCenter,
            ZoneArea::LeftSideCenter,
            ZoneArea::RightSide,
            ZoneArea::LeftSide,
            ZoneArea::BackCourt,
        ];
        for area in &areas {
            assert_eq!(area.label().parse::<ZoneArea>().unwrap(), *area);
        }
        let basics = [
            ZoneBasic::RestrictedArea,
            ZoneBasic::PaintNonRa,
            ZoneBasic::MidRange,
            ZoneBasic::LeftCorner3,
            ZoneBasic::RightCorner3,
            ZoneBasic::AboveBreak3,
            ZoneBasic::Backcourt,
        ];
        for basic in &basics {
            assert_eq!(basic.label().parse::<ZoneBasic>().unwrap(), *basic);
        }
        assert_eq!(ZoneBasic::LeftCorner3.points(), 3);
        assert_eq!(ZoneBasic::RightCorner3.points(), 3);
        assert_eq!(ZoneBasic::AboveBreak3.points(), 3);
        assert_eq!(ZoneBasic::MidRange.points(), 2);
        assert_eq!(ZoneBasic::RestrictedArea.points(), 2);
    }

    #[test]
    fn parses_rows_by_column_name() {
        let headers = vec![
            json!("GRID_TYPE"),
            json!("SHOT_ZONE_BASIC"),
            json!("LOC_Y"),
            json!("SHOT_MADE_FLAG"),
            json!("LOC_X"),
            json!("SHOT_DISTANCE"),
            json!("SHOT_ZONE_AREA"),
        ];
        let rows = vec![json!([
            "Shot Chart Detail",
            "Mid-Range",
            118,
            1,
            -102,
            15,
            "Left Side(L)"
        ])];
        let records = parse_shot_rows(&headers, &rows).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].loc_x, -102.0);
        assert_eq!(records[0].loc_y, 118.0);
        assert!(records[0].made);
        assert_eq!(records[0].zone_area, ZoneArea::LeftSide);
        assert_eq!(records[0].zone_basic, ZoneBasic::MidRange);
        assert_eq!(records[0].distance_ft, 15);
    }

    #[test]
    fn missing_column_is_an_error() {
        let headers = vec![json!("LOC_X"), json!("LOC_Y")];
        let rows: Vec<Value> = vec![];
        assert!(parse_shot_rows(&headers, &rows).is_err());
    }

    #[test]
    fn unknown_mode_fails_fast() {
        assert!("percentage".parse::<SummaryMode>().is_ok());
        assert!("ev".parse::<SummaryMode>().is_ok());
        assert!("frequency".parse::<SummaryMode>().is_err());
    }
}
