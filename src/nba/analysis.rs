use std::cmp::Ordering;

use anyhow::{Context, Result};
use polars::prelude::*;

/// Fit score of one team metric against winning percentage.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricFit {
    pub metric: String,
    pub r_squared: f64,
}

// Identity and bookkeeping columns that say nothing about playing style.
const EXCLUDED_METRICS: &[&str] = &[
    "TEAM_ID", "TEAM_NAME", "GP", "W", "L", "W_PCT", "MIN", "YEAR", "CFID", "CFPARAMS",
];

/// Stack per-season team stat frames into one table: RANK columns dropped,
/// a YEAR column appended, columns sorted so every season shares a schema.
/// Seasons with no rows are skipped; no input frames at all yield `None`.
pub fn combine_seasons(frames: Vec<(String, DataFrame)>) -> Result<Option<DataFrame>> {
    let mut combined: Option<DataFrame> = None;
    for (year, frame) in frames {
        if frame.height() == 0 {
            log::warn!("no team stat rows for {}, skipping", year);
            continue;
        }
        let frame = drop_rank_columns(&frame)?;
        let year_col = Series::new("YEAR", vec![year.clone(); frame.height()]);
        let frame = sort_columns(&frame.hstack(&[year_col])?)?;
        combined = Some(match combined {
            Some(acc) => acc.vstack(&frame)?,
            None => frame,
        });
    }
    Ok(combined)
}

/// The stats server interleaves a *_RANK twin for every metric; ranks are
/// derived data and would only pollute the regression.
pub fn drop_rank_columns(frame: &DataFrame) -> Result<DataFrame> {
    let keep: Vec<&str> = frame
        .get_column_names()
        .into_iter()
        .filter(|name| !name.contains("RANK"))
        .collect();
    Ok(frame.select(keep)?)
}

fn sort_columns(frame: &DataFrame) -> Result<DataFrame> {
    let mut names = frame.get_column_names();
    names.sort_unstable();
    Ok(frame.select(names)?)
}

/// Regress every numeric metric against W_PCT and report r-squared per
/// metric, best fit first.
pub fn fit_scores(frame: &DataFrame) -> Result<Vec<MetricFit>> {
    let win_pct = numeric_column(frame, "W_PCT")?
        .context("combined team stats have no W_PCT column")?;
    let mut fits = Vec::new();
    for name in frame.get_column_names() {
        if EXCLUDED_METRICS.contains(&name) {
            continue;
        }
        let metric_values = match numeric_column(frame, name)? {
            Some(values) => values,
            None => continue,
        };
        fits.push(MetricFit {
            metric: name.to_string(),
            r_squared: round3(r_squared(&metric_values, &win_pct)),
        });
    }
    fits.sort_by(|a, b| {
        b.r_squared
            .partial_cmp(&a.r_squared)
            .unwrap_or(Ordering::Equal)
    });
    Ok(fits)
}

fn numeric_column(frame: &DataFrame, name: &str) -> Result<Option<Vec<f64>>> {
    let series = frame.column(name)?;
    match series.dtype() {
        DataType::Float64 => Ok(Some(
            series.f64()?.into_iter().map(|v| v.unwrap_or(0.0)).collect(),
        )),
        DataType::Int64 => Ok(Some(
            series
                .i64()?
                .into_iter()
                .map(|v| v.unwrap_or(0) as f64)
                .collect(),
        )),
        _ => Ok(None),
    }
}

/// Coefficient of determination of the one-variable least-squares fit of
/// `ys` on `xs`. Degenerate inputs (empty, mismatched, zero variance)
/// score 0.
pub fn r_squared(xs: &[f64], ys: &[f64]) -> f64 {
    if xs.is_empty() || xs.len() != ys.len() {
        return 0.0;
    }
    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;
    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys.iter()) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return 0.0;
    }
    let r = cov / (var_x.sqrt() * var_y.sqrt());
    r * r
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
