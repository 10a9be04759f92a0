use crate::{
    error::{PassChartError, Result},
    heavens_above::{
        parse::{nearest_pass, parse_detail_pass_id, parse_summary_mjds},
        ChartResponse, HeavensAboveApi,
    },
    pass_chart_request::{PassChartRequest, DATE_FORMAT},
};

/// How far (in days) a listed pass may start from the requested time.
pub const PASS_TOLERANCE_DAYS: f64 = 1.0 / 48.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    /// Declared as an image by the server, but not a format we recognize.
    Other,
}

impl ImageFormat {
    fn sniff(bytes: &[u8]) -> Option<ImageFormat> {
        if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
            Some(ImageFormat::Png)
        } else if bytes.starts_with(&[0xff, 0xd8, 0xff]) {
            Some(ImageFormat::Jpeg)
        } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
            Some(ImageFormat::Gif)
        } else {
            None
        }
    }

    /// File extensions usually given to this format.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            ImageFormat::Png => &["png"],
            ImageFormat::Jpeg => &["jpg", "jpeg"],
            ImageFormat::Gif => &["gif"],
            ImageFormat::Other => &[],
        }
    }
}

/// Image bytes as returned by the service.
#[derive(Clone, Debug, PartialEq)]
pub struct PassChartImage {
    bytes: Vec<u8>,
    format: ImageFormat,
}

impl PassChartImage {
    /// Accept a response body only if it holds an image.
    pub fn from_response(response: ChartResponse) -> Result<PassChartImage> {
        let ChartResponse {
            bytes,
            content_type,
        } = response;

        if bytes.is_empty() {
            return Err(PassChartError::Remote("empty response".to_owned()));
        }

        let declared_image = content_type
            .as_deref()
            .is_some_and(|content_type| content_type.trim_start().starts_with("image/"));

        let format = match ImageFormat::sniff(&bytes) {
            Some(format) => format,
            None if declared_image => ImageFormat::Other,
            None => {
                return Err(PassChartError::Remote(format!(
                    "response is not an image (content type {})",
                    content_type.as_deref().unwrap_or("unknown")
                )))
            }
        };

        Ok(PassChartImage { bytes, format })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn get_format(&self) -> ImageFormat {
        self.format
    }
}

/// Retrieve the chart of the pass starting near the requested time.
///
/// With `fallback_whole_sky`, a pass that cannot be found yields the whole
/// sky chart at the requested time instead. Network failures are never
/// covered by the fallback.
pub fn fetch_pass_chart<A: HeavensAboveApi>(
    api: &A,
    request: &PassChartRequest,
    fallback_whole_sky: bool,
) -> Result<PassChartImage> {
    match fetch_pass_sky_chart(api, request) {
        Err(PassChartError::Remote(reason)) if fallback_whole_sky => {
            log::warn!("No pass chart available ({reason}), using the whole sky chart.");
            fetch_whole_sky_chart(api, request)
        }
        result => result,
    }
}

/// Summary, details, then the sky chart of the matching pass.
pub fn fetch_pass_sky_chart<A: HeavensAboveApi>(
    api: &A,
    request: &PassChartRequest,
) -> Result<PassChartImage> {
    let norad_id = request.get_norad_id();
    let pass_start = request.get_pass_start().format(DATE_FORMAT);
    let start_mjd = request.pass_start_mjd();

    log::info!("Looking up passes of {norad_id}...");
    let summary = api.get_pass_summary(request)?;
    let mjds = parse_summary_mjds(&summary);
    log::debug!("Listed passes (MJD): {mjds:?}");

    if mjds.is_empty() {
        return Err(PassChartError::Remote(format!(
            "no passes listed for satellite {norad_id}"
        )));
    }

    let mjd = nearest_pass(&mjds, start_mjd, PASS_TOLERANCE_DAYS).ok_or_else(|| {
        PassChartError::Remote(format!(
            "no pass of satellite {norad_id} starts within 30 minutes of {pass_start}"
        ))
    })?;
    log::info!("Found pass at MJD {mjd}.");

    let detail = api.get_pass_detail(request, mjd)?;
    let pass_id = parse_detail_pass_id(&detail).ok_or_else(|| {
        PassChartError::Remote(format!("no sky chart on the details page of pass {mjd}"))
    })?;
    log::debug!("Pass id: {pass_id}");

    PassChartImage::from_response(api.get_pass_chart(request, &pass_id)?)
}

pub fn fetch_whole_sky_chart<A: HeavensAboveApi>(
    api: &A,
    request: &PassChartRequest,
) -> Result<PassChartImage> {
    PassChartImage::from_response(api.get_whole_sky_chart(request, request.pass_start_mjd())?)
}

#[cfg(test)]
mod tests {
    use super::{fetch_pass_chart, ImageFormat, PassChartImage};
    use crate::{
        error::PassChartError,
        heavens_above::ChartResponse,
        pass_chart_request::PassChartRequest,
        test_support::{FakeHeavensAbove, PASS_CHART_PNG, WHOLE_SKY_PNG},
    };

    fn request_at(date: &str) -> PassChartRequest {
        PassChartRequest::new(25544, date, 130.4, 33.6, 0.05, "UCT", 800).unwrap()
    }

    #[test]
    fn fetches_chart_of_nearest_pass() {
        let api = FakeHeavensAbove::default();

        let image = fetch_pass_chart(&api, &request_at("2026-01-01T09:50:00"), false).unwrap();

        assert_eq!(image.as_bytes(), PASS_CHART_PNG);
        assert_eq!(image.get_format(), ImageFormat::Png);
        assert_eq!(
            api.calls(),
            vec![
                "summary".to_owned(),
                "detail 61041.4127".to_owned(),
                "chart 1024".to_owned()
            ]
        );
    }

    #[test]
    fn no_pass_near_start_is_remote_error() {
        let api = FakeHeavensAbove::default();

        let result = fetch_pass_chart(&api, &request_at("2026-01-01T20:00:00"), false);

        assert!(matches!(result, Err(PassChartError::Remote(_))), "{result:?}");
        assert_eq!(api.calls(), vec!["summary".to_owned()]);
    }

    #[test]
    fn unknown_satellite_is_remote_error() {
        let api = FakeHeavensAbove {
            summary: Some("<html>Unknown satellite</html>".to_owned()),
            ..Default::default()
        };

        let result = fetch_pass_chart(&api, &request_at("2026-01-01T09:50:00"), false);

        match result {
            Err(PassChartError::Remote(reason)) => assert!(reason.contains("no passes listed")),
            other => panic!("expected a remote error, got {other:?}"),
        }
    }

    #[test]
    fn missing_pass_id_is_remote_error() {
        let api = FakeHeavensAbove {
            detail: Some("<html>Pass not found</html>".to_owned()),
            ..Default::default()
        };

        let result = fetch_pass_chart(&api, &request_at("2026-01-01T09:50:00"), false);

        assert!(matches!(result, Err(PassChartError::Remote(_))), "{result:?}");
    }

    #[test]
    fn falls_back_to_whole_sky_chart() {
        let api = FakeHeavensAbove::default();

        let image = fetch_pass_chart(&api, &request_at("2026-01-01T12:00:00"), true).unwrap();

        assert_eq!(image.as_bytes(), WHOLE_SKY_PNG);
        assert_eq!(
            api.calls(),
            vec!["summary".to_owned(), "whole sky 61041.5".to_owned()]
        );
    }

    #[test]
    fn fallback_does_not_hide_network_errors() {
        let api = FakeHeavensAbove {
            network_down: true,
            ..Default::default()
        };

        let result = fetch_pass_chart(&api, &request_at("2026-01-01T09:50:00"), true);

        assert!(matches!(result, Err(PassChartError::Network(_))), "{result:?}");
        assert_eq!(api.calls(), vec!["summary".to_owned()]);
    }

    #[test]
    fn rejects_empty_and_non_image_bodies() {
        let empty = PassChartImage::from_response(ChartResponse {
            bytes: Vec::new(),
            content_type: Some("image/png".to_owned()),
        });
        assert!(matches!(empty, Err(PassChartError::Remote(_))));

        let html = PassChartImage::from_response(ChartResponse {
            bytes: b"<html>Error</html>".to_vec(),
            content_type: Some("text/html; charset=utf-8".to_owned()),
        });
        match html {
            Err(PassChartError::Remote(reason)) => assert!(reason.contains("text/html")),
            other => panic!("expected a remote error, got {other:?}"),
        }
    }

    #[test]
    fn declared_image_of_unknown_format() {
        let image = PassChartImage::from_response(ChartResponse {
            bytes: b"BM\x00\x00".to_vec(),
            content_type: Some("image/bmp".to_owned()),
        })
        .unwrap();
        assert_eq!(image.get_format(), ImageFormat::Other);
    }

    #[test]
    fn sniffs_jpeg_and_gif() {
        assert_eq!(
            ImageFormat::sniff(&[0xff, 0xd8, 0xff, 0xe0]),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(ImageFormat::sniff(b"GIF89a..."), Some(ImageFormat::Gif));
        assert_eq!(ImageFormat::sniff(b"<html>"), None);
    }
}
