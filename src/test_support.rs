use crate::{
    error::{PassChartError, Result},
    heavens_above::{ChartResponse, HeavensAboveApi},
    pass_chart_request::PassChartRequest,
};
use std::cell::RefCell;

pub const PASS_CHART_PNG: &[u8] = b"\x89PNG\r\n\x1a\npass chart";
pub const WHOLE_SKY_PNG: &[u8] = b"\x89PNG\r\n\x1a\nwhole sky";

/// Two passes of 25544 on 2026-01-01 (61041.4127) and 2026-01-02.
pub const SUMMARY_PAGE: &str = r#"<table>
<tr><td><a href="passdetails.aspx?lat=33.6&amp;lng=130.4&amp;loc=Unspecified&amp;alt=50&amp;tz=UCT&amp;satid=25544&amp;mjd=61041.4127&amp;type=V">01 Jan</a></td></tr>
<tr><td><a href="passdetails.aspx?lat=33.6&amp;lng=130.4&amp;loc=Unspecified&amp;alt=50&amp;tz=UCT&amp;satid=25544&amp;mjd=61042.3471&amp;type=V">02 Jan</a></td></tr>
</table>"#;

pub const DETAIL_PAGE: &str = r#"<img src="PassSkyChart2.ashx?passID=1024&amp;size=800&amp;showUnlit=false" />"#;

/// Canned heavens-above that records every call made to it.
pub struct FakeHeavensAbove {
    pub summary: Option<String>,
    pub detail: Option<String>,
    pub chart: ChartResponse,
    pub network_down: bool,
    pub(crate) calls: RefCell<Vec<String>>,
}

impl Default for FakeHeavensAbove {
    fn default() -> Self {
        FakeHeavensAbove {
            summary: Some(SUMMARY_PAGE.to_owned()),
            detail: Some(DETAIL_PAGE.to_owned()),
            chart: ChartResponse {
                bytes: PASS_CHART_PNG.to_vec(),
                content_type: Some("image/png".to_owned()),
            },
            network_down: false,
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl FakeHeavensAbove {
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: String) -> Result<()> {
        self.calls.borrow_mut().push(call);
        if self.network_down {
            Err(PassChartError::Network("connection refused".to_owned()))
        } else {
            Ok(())
        }
    }

    fn page(page: &Option<String>) -> Result<String> {
        page.clone()
            .ok_or_else(|| PassChartError::Remote("service returned 404 Not Found".to_owned()))
    }
}

impl HeavensAboveApi for FakeHeavensAbove {
    fn get_pass_summary(&self, _request: &PassChartRequest) -> Result<String> {
        self.record("summary".to_owned())?;
        Self::page(&self.summary)
    }

    fn get_pass_detail(&self, _request: &PassChartRequest, mjd: f64) -> Result<String> {
        self.record(format!("detail {mjd}"))?;
        Self::page(&self.detail)
    }

    fn get_pass_chart(&self, _request: &PassChartRequest, pass_id: &str) -> Result<ChartResponse> {
        self.record(format!("chart {pass_id}"))?;
        Ok(self.chart.clone())
    }

    fn get_whole_sky_chart(
        &self,
        _request: &PassChartRequest,
        mjd: f64,
    ) -> Result<ChartResponse> {
        self.record(format!("whole sky {mjd}"))?;
        Ok(ChartResponse {
            bytes: WHOLE_SKY_PNG.to_vec(),
            content_type: Some("image/png".to_owned()),
        })
    }
}
