use crate::error::{Result, ValuationError};
use crate::normalize::normalize;
use crate::spec::MetricSpec;
use crate::store::{MetricSeries, Period};
use crate::table::{Cell, RawStatementTable};
use chrono::{Datelike, NaiveDate};
use log::debug;

/// How many leading rows are scanned for the header row.
const HEADER_SCAN_ROWS: usize = 10;

/// Label-column markers that identify a header row even when no year appears
/// next to the label column.
const HEADER_MARKERS: &[&str] = &["item", "description", "account"];

/// Date formats attempted when a period column header is a full date string.
const HEADER_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%Y/%m/%d", "%b %d, %Y"];

/// Resolves one raw statement table into a [`MetricSeries`] keyed by canonical
/// metric name and period.
///
/// The resolver locates the header row, detects period columns in whatever
/// order the source presents them, matches each canonical metric's synonyms
/// against the label column, and normalizes every retained cell. A metric
/// whose synonyms match no row is omitted from the result entirely.
pub fn resolve_statement(table: &RawStatementTable, spec: &MetricSpec) -> Result<MetricSeries> {
    if table.is_empty() {
        return Err(ValuationError::EmptyTable);
    }

    let header_row = detect_header_row(table)?;
    debug!(
        "{:?}: header row detected at index {}",
        spec.statement_type, header_row
    );

    let period_columns = detect_period_columns(table, header_row)?;
    debug!(
        "{:?}: retained {} period columns: {:?}",
        spec.statement_type,
        period_columns.len(),
        period_columns.iter().map(|c| c.period).collect::<Vec<_>>()
    );

    let mut series = MetricSeries::new();
    for mapping in &spec.mappings {
        let matched = mapping
            .synonyms
            .iter()
            .find_map(|synonym| find_data_row(table, header_row, synonym).map(|row| (synonym, row)));

        let Some((synonym, row)) = matched else {
            debug!(
                "{:?}: no row matched any synonym of {}",
                spec.statement_type, mapping.metric
            );
            continue;
        };

        debug!(
            "{:?}: {} matched row {} via synonym '{}'",
            spec.statement_type, mapping.metric, row, synonym
        );

        for column in &period_columns {
            let value = normalize(table.cell(row, column.index));
            series.insert(mapping.metric.clone(), column.period, value);
        }
    }

    Ok(series)
}

struct PeriodColumn {
    index: usize,
    period: Period,
}

/// Finds the first row within the scan window that looks like a header: a
/// year-like value in the cell adjacent to the label column, or a known
/// header marker in the label column itself.
fn detect_header_row(table: &RawStatementTable) -> Result<usize> {
    let scanned_rows = HEADER_SCAN_ROWS.min(table.row_count());

    for row in 0..scanned_rows {
        if extract_year(table.cell(row, 1)).is_some() {
            return Ok(row);
        }
        if let Cell::Text(label) = table.cell(row, 0) {
            let label = label.trim().to_lowercase();
            if HEADER_MARKERS.contains(&label.as_str()) {
                return Ok(row);
            }
        }
    }

    Err(ValuationError::HeaderNotFound { scanned_rows })
}

/// Retains every column after the label column whose header yields a year,
/// sorted ascending. Source column order is never assumed chronological.
/// When two columns carry the same year, the first source column wins and the
/// rest are dropped.
fn detect_period_columns(table: &RawStatementTable, header_row: usize) -> Result<Vec<PeriodColumn>> {
    let mut columns: Vec<PeriodColumn> = (1..table.column_count())
        .filter_map(|index| {
            extract_year(table.cell(header_row, index)).map(|period| PeriodColumn { index, period })
        })
        .collect();

    if columns.is_empty() {
        return Err(ValuationError::NoPeriodColumns);
    }

    // Stable sort keeps duplicate years in source-column order, so dedup
    // retains the first-seen column for each year
    columns.sort_by_key(|c| c.period);
    columns.dedup_by_key(|c| c.period);
    Ok(columns)
}

/// First data row below the header whose label cell equals `synonym`,
/// compared case-insensitively after trimming.
fn find_data_row(table: &RawStatementTable, header_row: usize, synonym: &str) -> Option<usize> {
    ((header_row + 1)..table.row_count()).find(|&row| {
        matches!(
            table.cell(row, 0),
            Cell::Text(label) if label.trim().eq_ignore_ascii_case(synonym.trim())
        )
    })
}

/// Extracts a calendar year from a column header cell.
///
/// Numeric headers are accepted when they are whole years; text headers are
/// tried as full dates first, then scanned for a plausible 4-digit year
/// substring (covers headers like "FY 2023" or "Dec 2023").
fn extract_year(cell: &Cell) -> Option<Period> {
    match cell {
        Cell::Number(n) if n.fract() == 0.0 && plausible_year(*n as i32) => Some(*n as i32),
        Cell::Text(text) => {
            let text = text.trim();
            for format in HEADER_DATE_FORMATS {
                if let Ok(date) = NaiveDate::parse_from_str(text, format) {
                    return Some(date.year());
                }
            }
            find_year_substring(text)
        }
        _ => None,
    }
}

fn find_year_substring(text: &str) -> Option<Period> {
    let bytes = text.as_bytes();
    for start in 0..bytes.len().saturating_sub(3) {
        let window = &bytes[start..start + 4];
        if window.iter().all(u8::is_ascii_digit) {
            // Reject windows embedded in longer digit runs (e.g. "123456")
            let prev_digit = start > 0 && bytes[start - 1].is_ascii_digit();
            let next_digit = bytes.get(start + 4).is_some_and(u8::is_ascii_digit);
            if prev_digit || next_digit {
                continue;
            }
            let year: i32 = std::str::from_utf8(window).ok()?.parse().ok()?;
            if plausible_year(year) {
                return Some(year);
            }
        }
    }
    None
}

fn plausible_year(year: i32) -> bool {
    (1900..=2100).contains(&year)
}
