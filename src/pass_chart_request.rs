use crate::error::{PassChartError, Result};
use chrono::NaiveDateTime;

/// Input format of the pass start time.
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
pub const DEFAULT_TIMEZONE: &str = "UCT";
pub const DEFAULT_IMAGE_SIZE: u32 = 800;

/// MJD of the unix epoch.
const MJD_UNIX_EPOCH: f64 = 40587.0;
const SECONDS_PER_DAY: f64 = 86400.0;

/// Everything needed to ask the service for one pass chart.
///
/// Only built through [`PassChartRequest::new`], so an instance is always
/// valid.
#[derive(Clone, Debug, PartialEq)]
pub struct PassChartRequest {
    norad_id: u32,
    pass_start: NaiveDateTime,
    lon_deg: f64,
    lat_deg: f64,
    height_km: f64,
    timezone: String,
    image_size: u32,
}

impl PassChartRequest {
    /// Validate raw command line values.
    ///
    /// The error names the first offending field.
    pub fn new(
        norad_id: i64,
        pass_start: &str,
        lon_deg: f64,
        lat_deg: f64,
        height_km: f64,
        timezone: &str,
        image_size: i64,
    ) -> Result<PassChartRequest> {
        let norad_id = u32::try_from(norad_id)
            .ok()
            .filter(|id| *id > 0)
            .ok_or_else(|| {
                PassChartError::invalid(
                    "norad",
                    format!("catalog number must be a positive integer, got {norad_id}"),
                )
            })?;

        let pass_start = NaiveDateTime::parse_from_str(pass_start, DATE_FORMAT).map_err(|e| {
            PassChartError::invalid(
                "date",
                format!("expected YYYY-MM-DDThh:mm:ss, got {pass_start:?} ({e})"),
            )
        })?;

        check_range("lon", lon_deg, -180.0, 180.0)?;
        check_range("lat", lat_deg, -90.0, 90.0)?;

        if !height_km.is_finite() || height_km < 0.0 {
            return Err(PassChartError::invalid(
                "height",
                format!("must be a non-negative number of kilometers, got {height_km}"),
            ));
        }

        if !is_timezone_identifier(timezone) {
            return Err(PassChartError::invalid(
                "tz",
                format!("{timezone:?} is not a timezone identifier"),
            ));
        }

        let image_size = u32::try_from(image_size)
            .ok()
            .filter(|size| *size > 0)
            .ok_or_else(|| {
                PassChartError::invalid(
                    "size",
                    format!("image size must be a positive integer, got {image_size}"),
                )
            })?;

        Ok(PassChartRequest {
            norad_id,
            pass_start,
            lon_deg,
            lat_deg,
            height_km,
            timezone: timezone.to_owned(),
            image_size,
        })
    }

    pub fn get_norad_id(&self) -> u32 {
        self.norad_id
    }

    pub fn get_pass_start(&self) -> &NaiveDateTime {
        &self.pass_start
    }

    pub fn get_lon_deg(&self) -> f64 {
        self.lon_deg
    }

    pub fn get_lat_deg(&self) -> f64 {
        self.lat_deg
    }

    pub fn get_height_km(&self) -> f64 {
        self.height_km
    }

    pub fn get_timezone(&self) -> &str {
        &self.timezone
    }

    pub fn get_image_size(&self) -> u32 {
        self.image_size
    }

    /// Modified Julian Date of the pass start.
    pub fn pass_start_mjd(&self) -> f64 {
        datetime_to_mjd(&self.pass_start)
    }
}

/// Convert a UTC date-time to a Modified Julian Date.
pub fn datetime_to_mjd(datetime: &NaiveDateTime) -> f64 {
    datetime.and_utc().timestamp() as f64 / SECONDS_PER_DAY + MJD_UNIX_EPOCH
}

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<()> {
    // NaN fails both comparisons, so test for containment.
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(PassChartError::invalid(
            field,
            format!("must be in [{min}, {max}] degrees, got {value}"),
        ))
    }
}

/// The service takes both zone abbreviations (`UCT`, `JST`) and area names
/// (`Asia/Tokyo`), so only the shape of the identifier is checked.
fn is_timezone_identifier(timezone: &str) -> bool {
    let mut chars = timezone.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    timezone.len() <= 64
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '_' | '+' | '-'))
}
