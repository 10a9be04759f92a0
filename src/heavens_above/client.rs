use super::{
    ChartResponse, HeavensAboveApi, PASS_DETAIL_PAGE, PASS_SKY_CHART_PAGE, PASS_SUMMARY_PAGE,
    WHOLE_SKY_CHART_PAGE,
};
use crate::{error::Result, pass_chart_request::PassChartRequest};
use reqwest::{
    blocking::{Client, Request, Response},
    header::CONTENT_TYPE,
};
use serde::Serialize;
use std::time::Duration;

/// Location name sent along with the coordinates.
const LOCATION_NAME: &str = "Unspecified";

/// Observer fields shared by every query, formatted the way the site
/// formats them in its own links.
struct Observer {
    lat: String,
    lng: String,
    alt: String,
}

impl Observer {
    fn from_request(request: &PassChartRequest) -> Observer {
        Observer {
            lat: format!("{:.6}", request.get_lat_deg()),
            lng: format!("{:.6}", request.get_lon_deg()),
            // The site wants metres.
            alt: format!("{:.0}", request.get_height_km() * 1000.0),
        }
    }
}

#[derive(Debug, Serialize)]
struct PassSummaryQuery<'a> {
    satid: String,
    lat: String,
    lng: String,
    loc: &'static str,
    alt: String,
    tz: &'a str,
}

#[derive(Debug, Serialize)]
struct PassDetailQuery<'a> {
    lat: String,
    lng: String,
    loc: &'static str,
    alt: String,
    tz: &'a str,
    satid: String,
    mjd: String,
    #[serde(rename = "type")]
    pass_type: &'static str,
}

#[derive(Debug, Serialize)]
struct PassSkyChartQuery<'a> {
    #[serde(rename = "passID")]
    pass_id: &'a str,
    size: String,
    lat: String,
    lng: String,
    loc: &'static str,
    alt: String,
    tz: &'a str,
    #[serde(rename = "showUnlit")]
    show_unlit: &'static str,
}

#[derive(Debug, Serialize)]
struct WholeSkyChartQuery<'a> {
    lat: String,
    lng: String,
    loc: &'static str,
    alt: String,
    tz: &'a str,
    size: String,
    #[serde(rename = "SL")]
    star_labels: &'static str,
    #[serde(rename = "SN")]
    star_names: &'static str,
    #[serde(rename = "BW")]
    black_white: &'static str,
    time: String,
    ecl: &'static str,
    cb: &'static str,
}

impl<'a> PassSummaryQuery<'a> {
    fn new(request: &'a PassChartRequest) -> Self {
        let Observer { lat, lng, alt } = Observer::from_request(request);
        PassSummaryQuery {
            satid: request.get_norad_id().to_string(),
            lat,
            lng,
            loc: LOCATION_NAME,
            alt,
            tz: request.get_timezone(),
        }
    }
}

impl<'a> PassDetailQuery<'a> {
    fn new(request: &'a PassChartRequest, mjd: f64) -> Self {
        let Observer { lat, lng, alt } = Observer::from_request(request);
        PassDetailQuery {
            lat,
            lng,
            loc: LOCATION_NAME,
            alt,
            tz: request.get_timezone(),
            satid: request.get_norad_id().to_string(),
            mjd: mjd.to_string(),
            pass_type: "V",
        }
    }
}

impl<'a> PassSkyChartQuery<'a> {
    fn new(request: &'a PassChartRequest, pass_id: &'a str) -> Self {
        let Observer { lat, lng, alt } = Observer::from_request(request);
        PassSkyChartQuery {
            pass_id,
            size: request.get_image_size().to_string(),
            lat,
            lng,
            loc: LOCATION_NAME,
            alt,
            tz: request.get_timezone(),
            show_unlit: "false",
        }
    }
}

impl<'a> WholeSkyChartQuery<'a> {
    fn new(request: &'a PassChartRequest, mjd: f64) -> Self {
        let Observer { lat, lng, alt } = Observer::from_request(request);
        WholeSkyChartQuery {
            lat,
            lng,
            loc: LOCATION_NAME,
            alt,
            tz: request.get_timezone(),
            size: request.get_image_size().to_string(),
            star_labels: "1",
            star_names: "1",
            black_white: "1",
            time: mjd.to_string(),
            ecl: "0",
            cb: "0",
        }
    }
}

/// Blocking http client for heavens-above.com.
pub struct HeavensAbove {
    client: Client,
    base_url: String,
}

impl HeavensAbove {
    pub fn new(base_url: &str, timeout: Duration) -> Result<HeavensAbove> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("get_hapasschart/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(HeavensAbove {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    pub fn get_base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, page: &str) -> String {
        format!("{}/{page}", self.base_url)
    }

    fn build_request<Q: Serialize>(&self, page: &str, query: &Q) -> Result<Request> {
        Ok(self.client.get(self.url(page)).query(query).build()?)
    }

    fn send<Q: Serialize>(&self, page: &str, query: &Q) -> Result<Response> {
        let request = self.build_request(page, query)?;
        log::debug!("GET {}", request.url());

        Ok(self.client.execute(request)?.error_for_status()?)
    }

    fn get_text<Q: Serialize>(&self, page: &str, query: &Q) -> Result<String> {
        let text = self.send(page, query)?.text()?;

        log::trace!("{page}: {} bytes of text", text.len());
        Ok(text)
    }

    fn get_bytes<Q: Serialize>(&self, page: &str, query: &Q) -> Result<ChartResponse> {
        let response = self.send(page, query)?;
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let bytes = response.bytes()?.to_vec();

        log::trace!("{page}: {} bytes, content type {content_type:?}", bytes.len());
        Ok(ChartResponse {
            bytes,
            content_type,
        })
    }
}

impl HeavensAboveApi for HeavensAbove {
    fn get_pass_summary(&self, request: &PassChartRequest) -> Result<String> {
        self.get_text(PASS_SUMMARY_PAGE, &PassSummaryQuery::new(request))
    }

    fn get_pass_detail(&self, request: &PassChartRequest, mjd: f64) -> Result<String> {
        self.get_text(PASS_DETAIL_PAGE, &PassDetailQuery::new(request, mjd))
    }

    fn get_pass_chart(&self, request: &PassChartRequest, pass_id: &str) -> Result<ChartResponse> {
        self.get_bytes(PASS_SKY_CHART_PAGE, &PassSkyChartQuery::new(request, pass_id))
    }

    fn get_whole_sky_chart(
        &self,
        request: &PassChartRequest,
        mjd: f64,
    ) -> Result<ChartResponse> {
        self.get_bytes(WHOLE_SKY_CHART_PAGE, &WholeSkyChartQuery::new(request, mjd))
    }
}
