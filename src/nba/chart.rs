use std::cmp::Ordering;
use std::collections::BTreeMap;

use tabled::{Table, Tabled};

use crate::nba::analysis::MetricFit;
use crate::nba::shots::{DistanceBucket, ZoneSummary};

// Shot chart coordinate system: rim at the origin, units are tenths of
// a foot, y grows toward half court.
pub const COURT_X_MIN: f64 = -250.0;
pub const COURT_X_MAX: f64 = 250.0;
pub const COURT_Y_MIN: f64 = -54.2;
pub const COURT_Y_MAX: f64 = 415.8;

const GRID_WIDTH: usize = 56;
const GRID_HEIGHT: usize = 24;

#[derive(Tabled)]
struct ZoneRow {
    zone: String,
    attempts: u32,
    makes: u32,
    value: f64,
    label_x: f64,
    label_y: f64,
}

#[derive(Tabled)]
struct DistanceRow {
    distance_ft: i64,
    attempts: u32,
    makes: u32,
    pct: f64,
}

#[derive(Tabled)]
struct FitRow {
    metric: String,
    r_squared: f64,
}

/// Zone summaries as a table, best value first.
pub fn summary_table(summaries: &[ZoneSummary]) -> String {
    let mut rows: Vec<ZoneRow> = summaries
        .iter()
        .map(|s| ZoneRow {
            zone: s.zone.to_string(),
            attempts: s.attempts,
            makes: s.makes,
            value: s.value,
            label_x: round1(s.label_x),
            label_y: round1(s.label_y),
        })
        .collect();
    rows.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(Ordering::Equal));
    Table::new(rows).to_string()
}

pub fn distance_table(buckets: &BTreeMap<i64, DistanceBucket>) -> String {
    let rows: Vec<DistanceRow> = buckets
        .iter()
        .map(|(distance_ft, bucket)| DistanceRow {
            distance_ft: *distance_ft,
            attempts: bucket.attempts,
            makes: bucket.makes,
            pct: bucket.make_pct(),
        })
        .collect();
    Table::new(rows).to_string()
}

pub fn fits_table(fits: &[MetricFit]) -> String {
    let rows: Vec<FitRow> = fits
        .iter()
        .map(|f| FitRow {
            metric: f.metric.clone(),
            r_squared: f.r_squared,
        })
        .collect();
    Table::new(rows).to_string()
}

/// Coarse text rendition of the half-court scatter: each summary's value
/// is printed at its label coordinates, with 'o' marking the rim. Points
/// outside the chart bounds are dropped.
pub fn court_text(summaries: &[ZoneSummary]) -> String {
    let mut grid = vec![vec![' '; GRID_WIDTH]; GRID_HEIGHT];

    place(&mut grid, 0.0, 0.0, "o");
    for summary in summaries {
        place(&mut grid, summary.label_x, summary.label_y, &summary.value.to_string());
    }

    let mut out = String::new();
    out.push('+');
    out.push_str(&"-".repeat(GRID_WIDTH));
    out.push_str("+\n");
    for row in grid {
        out.push('|');
        out.extend(row.iter());
        out.push_str("|\n");
    }
    out.push('+');
    out.push_str(&"-".repeat(GRID_WIDTH));
    out.push('+');
    out
}

fn place(grid: &mut Vec<Vec<char>>, x: f64, y: f64, text: &str) {
    if x < COURT_X_MIN || x > COURT_X_MAX || y < COURT_Y_MIN || y > COURT_Y_MAX {
        return;
    }
    let col_f = (x - COURT_X_MIN) / (COURT_X_MAX - COURT_X_MIN) * (GRID_WIDTH - 1) as f64;
    let row_f = (COURT_Y_MAX - y) / (COURT_Y_MAX - COURT_Y_MIN) * (GRID_HEIGHT - 1) as f64;
    let row = row_f.round() as usize;
    let center = col_f.round() as usize;
    let start = center.saturating_sub(text.len() / 2);
    for (offset, ch) in text.chars().enumerate() {
        let col = start + offset;
        if col >= GRID_WIDTH {
            break;
        }
        grid[row][col] = ch;
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
