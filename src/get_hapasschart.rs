use crate::{
    error::Result,
    heavens_above::{client::HeavensAbove, get_base_url, HeavensAboveApi},
    output::save_pass_chart,
    pass_chart::fetch_pass_chart,
    pass_chart_request::{PassChartRequest, DEFAULT_IMAGE_SIZE, DEFAULT_TIMEZONE},
};
use clap::Parser;
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

/// Retrieve a satellite pass chart from heavens-above.com.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about = None,
    name = "get_hapasschart",
    allow_negative_numbers = true,
    args_override_self = true
)]
pub struct GetHaPassChart {
    /// Output image file path.
    #[arg(value_name = "output_PATH")]
    output_path: PathBuf,
    /// NORAD catalog number.
    #[arg(short = 'n', long = "norad", value_name = "NORAD_ID")]
    norad_id: i64,
    /// Date and time (UTC) when the satellite pass begins [YYYY-MM-DDThh:mm:ss].
    #[arg(short = 't', long = "date", value_name = "DATE")]
    date: String,
    /// Observer geodetic longitude [deg].
    #[arg(short = 'l', long = "lon", value_name = "LON")]
    lon: f64,
    /// Observer geodetic latitude [deg].
    #[arg(short = 'b', long = "lat", value_name = "LAT")]
    lat: f64,
    /// Observer geodetic height [km].
    #[arg(short = 'z', long = "height", value_name = "HEIGHT")]
    height: f64,
    /// Pass chart display timezone.
    #[arg(short = 'Z', long = "tz", value_name = "TZ", default_value = DEFAULT_TIMEZONE)]
    tz: String,
    /// Output pass chart image size [pix].
    #[arg(short = 'R', long = "size", value_name = "IMGSIZE", default_value_t = i64::from(DEFAULT_IMAGE_SIZE))]
    imgsize: i64,
    /// Network timeout [s].
    #[arg(
        long = "timeout",
        value_name = "SECONDS",
        default_value_t = 30,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    timeout: u64,
    /// Save the whole sky chart at DATE when no matching pass is found.
    #[arg(long = "fallback-whole-sky")]
    fallback_whole_sky: bool,
    /// Log level.
    #[arg(value_enum, long = "log-level", default_value = "info")]
    log_level: LogLevel,
}

pub trait PassChartCli {
    fn get_request(&self) -> Result<PassChartRequest>;
    fn get_output_path(&self) -> &Path;
    fn get_timeout(&self) -> Duration;
    fn get_fallback_whole_sky(&self) -> bool;
    fn get_log_level(&self) -> &LogLevel;
}

impl PassChartCli for GetHaPassChart {
    fn get_request(&self) -> Result<PassChartRequest> {
        PassChartRequest::new(
            self.norad_id,
            &self.date,
            self.lon,
            self.lat,
            self.height,
            &self.tz,
            self.imgsize,
        )
    }
    fn get_output_path(&self) -> &Path {
        &self.output_path
    }
    fn get_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
    fn get_fallback_whole_sky(&self) -> bool {
        self.fallback_whole_sky
    }
    fn get_log_level(&self) -> &LogLevel {
        &self.log_level
    }
}

pub fn run<T>(config: &T) -> Result<()>
where
    T: PassChartCli,
{
    match config.get_log_level() {
        LogLevel::Trace => log::set_max_level(log::LevelFilter::Trace),
        LogLevel::Debug => log::set_max_level(log::LevelFilter::Debug),
        LogLevel::Info => log::set_max_level(log::LevelFilter::Info),
        LogLevel::Warn => log::set_max_level(log::LevelFilter::Warn),
        LogLevel::Error => log::set_max_level(log::LevelFilter::Error),
    };

    log::info!("Running get_hapasschart...");

    // Validate before anything touches the network.
    let request = config.get_request()?;
    log::debug!("{request:?}");

    let heavens_above = HeavensAbove::new(&get_base_url(), config.get_timeout())?;
    log::debug!("Using {}", heavens_above.get_base_url());

    run_request(&heavens_above, &request, config)
}

/// Fetch the chart for a validated request and save it.
pub fn run_request<A, T>(api: &A, request: &PassChartRequest, config: &T) -> Result<()>
where
    A: HeavensAboveApi,
    T: PassChartCli,
{
    let image = fetch_pass_chart(api, request, config.get_fallback_whole_sky())?;
    save_pass_chart(&image, config.get_output_path())
}

#[derive(clap::ValueEnum, Clone, Debug)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}
