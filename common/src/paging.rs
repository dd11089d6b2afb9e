//! Page-size and cursor rules shared by the page route and `/api/images`.

/// Page size when `limit` is missing or unusable.
pub const DEFAULT_LIMIT: u32 = 20;
/// Largest page a client may request.
pub const MAX_LIMIT: u32 = 100;

/// Effective page size for a raw `limit` query value:
/// `min(max(1, parsed_or_default), 100)`.
///
/// Any decimal number is accepted (`"50.0"`, `"1e2"`); fractions are
/// dropped after clamping.  Empty, non-numeric, non-finite and zero values
/// fall back to [`DEFAULT_LIMIT`].
pub fn clamp_limit(raw: Option<&str>) -> u32 {
    let parsed = raw
        .map(str::trim)
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|n| n.is_finite() && *n != 0.0)
        .unwrap_or(DEFAULT_LIMIT as f64);
    parsed.clamp(1.0, MAX_LIMIT as f64) as u32
}

/// Normalise an incoming cursor: empty strings mean "start from the top".
pub fn normalize_cursor(raw: Option<String>) -> Option<String> {
    raw.filter(|c| !c.trim().is_empty())
}
