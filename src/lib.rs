//! Download satellite pass charts from heavens-above.com.
//!
//! heavens-above.com draws, for a given observer, the path a satellite takes
//! across the sky during one of its passes. This package provides the
//! `get_hapasschart` cli, which finds the pass of a satellite (by NORAD
//! catalog number) that begins at a given UTC time and saves its sky chart
//! to a local image file.
//!
//! The chart is located in three steps: the pass summary of the satellite is
//! searched for a pass starting within 30 minutes of the requested time, the
//! details page of that pass gives the id of its sky chart, and the chart
//! image is then downloaded. Optionally, when no such pass exists, the whole
//! sky chart at the requested time is saved instead.
//!
//! The output file is written atomically: it either holds the complete
//! image or is left as it was.
//!
//! A second binary, `gen_completion_get_hapasschart`, prints a bash
//! completion script for the cli.

#[macro_use]
extern crate serde_derive;
pub mod error;
pub mod get_hapasschart;
pub mod heavens_above;
pub mod output;
pub mod pass_chart;
pub mod pass_chart_request;
#[cfg(test)]
mod test_support;
