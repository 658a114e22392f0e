//! InfluxQL rendering and query-response decoding.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::domain::{ActivityPoint, LatestQuery};
use crate::error::StoreError;

/// Field holding the activity percentage in every health series.
pub const ACTIVE_PERCENT: &str = "active_percent";

/// Render the point lookup for the newest `active_percent` of one host.
#[must_use]
pub fn render(query: &LatestQuery) -> String {
    format!(
        r#"SELECT "{ACTIVE_PERCENT}" FROM "{}" WHERE "host"::tag =~ /^{}$/ ORDER BY time DESC LIMIT 1"#,
        query.series.measurement(),
        escape_regex(&query.host.tag_value()),
    )
}

/// Escape regex metacharacters (and the `/` delimiter) in a literal.
fn escape_regex(literal: &str) -> String {
    let mut out = String::with_capacity(literal.len());
    for c in literal.chars() {
        if matches!(
            c,
            '\\' | '.' | '+' | '*' | '?' | '(' | ')' | '|' | '[' | ']' | '{' | '}' | '^' | '$' | '/'
        ) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    results: Vec<StatementResult>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatementResult {
    #[serde(default)]
    series: Vec<SeriesRows>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SeriesRows {
    #[serde(default)]
    columns: Vec<String>,
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

/// Decode a `/query` JSON body into points, newest first.
///
/// A statement without `series` has no rows and yields an empty vector.
pub fn parse_points(body: &str) -> Result<Vec<ActivityPoint>, StoreError> {
    let response: QueryResponse = serde_json::from_str(body)
        .map_err(|e| StoreError::MalformedResponse(format!("invalid JSON: {e}")))?;

    if let Some(error) = response.error {
        return Err(StoreError::MalformedResponse(error));
    }

    let mut points = Vec::new();
    for statement in response.results {
        if let Some(error) = statement.error {
            return Err(StoreError::MalformedResponse(error));
        }
        for series in statement.series {
            let field = column(&series.columns, ACTIVE_PERCENT).ok_or_else(|| {
                StoreError::MalformedResponse(format!("missing column {ACTIVE_PERCENT}"))
            })?;
            let time = column(&series.columns, "time");

            for row in &series.values {
                let active_percent = match row.get(field) {
                    None | Some(Value::Null) => continue,
                    Some(value) => value.as_f64().ok_or_else(|| {
                        StoreError::MalformedResponse(format!(
                            "non-numeric {ACTIVE_PERCENT}: {value}"
                        ))
                    })?,
                };
                let time = time
                    .and_then(|i| row.get(i))
                    .and_then(Value::as_str)
                    .and_then(|t| DateTime::parse_from_rfc3339(t).ok())
                    .map(|t| t.with_timezone(&Utc));
                points.push(ActivityPoint {
                    time,
                    active_percent,
                });
            }
        }
    }
    Ok(points)
}

fn column(columns: &[String], name: &str) -> Option<usize> {
    columns.iter().position(|c| c == name)
}
