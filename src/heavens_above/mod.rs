//! Access to the heavens-above.com pages used to locate and draw a pass.
//!
//! Finding the chart for a pass takes three round trips: the pass summary
//! lists upcoming passes by MJD, the pass details page of one of them holds
//! the pass id, and the pass id selects the sky chart image.

pub mod client;
pub mod parse;

use crate::{error::Result, pass_chart_request::PassChartRequest};
use std::env;

pub const DEFAULT_BASE_URL: &str = "https://www.heavens-above.com";
pub const PASS_SUMMARY_PAGE: &str = "PassSummary.aspx";
pub const PASS_DETAIL_PAGE: &str = "passdetails.aspx";
pub const PASS_SKY_CHART_PAGE: &str = "PassSkyChart2.ashx";
pub const WHOLE_SKY_CHART_PAGE: &str = "wholeskychart.ashx";

/// Body of an image endpoint, as received.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChartResponse {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

/// The calls the pass chart pipeline makes against the service.
pub trait HeavensAboveApi {
    /// HTML listing the upcoming passes of the satellite.
    fn get_pass_summary(&self, request: &PassChartRequest) -> Result<String>;
    /// HTML describing the pass starting at `mjd`.
    fn get_pass_detail(&self, request: &PassChartRequest, mjd: f64) -> Result<String>;
    /// Sky chart image of one pass.
    fn get_pass_chart(&self, request: &PassChartRequest, pass_id: &str) -> Result<ChartResponse>;
    /// Chart of the whole sky at `mjd`, without any satellite track.
    fn get_whole_sky_chart(&self, request: &PassChartRequest, mjd: f64)
        -> Result<ChartResponse>;
}

/// Service base url, `HEAVENS_ABOVE_URL` if set.
pub fn get_base_url() -> String {
    if let Ok(url) = env::var("HEAVENS_ABOVE_URL") {
        url.trim_end_matches('/').to_owned()
    } else {
        DEFAULT_BASE_URL.to_string()
    }
}
