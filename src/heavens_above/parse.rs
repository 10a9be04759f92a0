use once_cell::sync::Lazy;
use regex::Regex;

const PASS_MJD_REGEXP: &str = r#"passdetails\.aspx\?[^"']*?\bmjd=(?P<mjd>[0-9.]+)\b"#;
const PASS_ID_REGEXP: &str = r#"PassSkyChart2\.ashx\?[^"']*\bpassID=(?P<pass_id>\d+)\b"#;

static PASS_MJD: Lazy<Regex> = Lazy::new(|| Regex::new(PASS_MJD_REGEXP).unwrap());
static PASS_ID: Lazy<Regex> = Lazy::new(|| Regex::new(PASS_ID_REGEXP).unwrap());

/// MJDs of the passes linked from a pass summary page, in page order and
/// without duplicates.
pub fn parse_summary_mjds(page: &str) -> Vec<f64> {
    let page = unescape_entities(page);
    let mut mjds: Vec<f64> = Vec::new();

    for mjd in PASS_MJD
        .captures_iter(&page)
        .filter_map(|captures| captures["mjd"].parse::<f64>().ok())
    {
        if !mjds.contains(&mjd) {
            mjds.push(mjd);
        }
    }
    mjds
}

/// Pass id of the sky chart embedded in a pass details page.
pub fn parse_detail_pass_id(page: &str) -> Option<String> {
    PASS_ID
        .captures(page)
        .map(|captures| captures["pass_id"].to_owned())
}

/// The pass in `mjds` closest to `target`, if it lies within `tolerance`
/// days of it.
pub fn nearest_pass(mjds: &[f64], target: f64, tolerance: f64) -> Option<f64> {
    mjds.iter()
        .copied()
        .min_by(|a, b| (a - target).abs().total_cmp(&(b - target).abs()))
        .filter(|mjd| (mjd - target).abs() < tolerance)
}

/// Undo the entity escaping the pages apply inside attribute values.
fn unescape_entities(page: &str) -> String {
    // &amp; last, so "&amp;quot;" stays "&quot;".
    page.replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#039;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
