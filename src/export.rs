//! CSV formatting for the export buttons. Fields are joined with bare
//! commas and rows with newlines; embedded commas are not escaped, which
//! matches what the dashboard's consumers expect today.

use axum::http::{header, HeaderMap, HeaderValue};

pub fn to_csv(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(headers.join(","));
    for row in rows {
        lines.push(row.join(","));
    }
    lines.join("\n")
}

/// Response headers for a CSV download named by context, e.g.
/// `activity_log.csv` or `skp_report_2024-1.csv`.
pub fn download_headers(filename: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/csv; charset=utf-8"),
    );
    if let Ok(value) = HeaderValue::from_str(&format!("attachment; filename=\"{filename}\"")) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    headers
}
