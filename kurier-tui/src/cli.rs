//! Command-line options for the kurier terminal UI.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};
use kurier_core::model::{CameraSettings, Coordinate};
use kurier_provider_location::{DEFAULT_GEOIP_URL, LocationSource};

#[derive(Parser, Debug)]
#[command(
    name = "kurier",
    version,
    about = "Pick delivery stops, order them, and hand the route to a maps app",
    long_about = "Loads delivery stops from a JSON file, lets you check off and reorder\n\
                  the stops to visit, and opens a Google Maps directions link for the\n\
                  checked stops starting from your current position."
)]
pub(crate) struct Cli {
    /// JSON file with `[{"name", "lat", "lng"}]` records.
    #[arg(long = "stops", value_name = "PATH", default_value = "stops.json")]
    pub stops: PathBuf,

    /// Use this position instead of IP geolocation.
    #[arg(long = "origin", value_name = "LAT,LNG", value_parser = parse_coordinate)]
    pub origin: Option<Coordinate>,

    /// IP geolocation endpoint (ip-api.com compatible).
    #[arg(long = "geoip-url", value_name = "URL", default_value = DEFAULT_GEOIP_URL)]
    pub geoip_url: String,

    /// Give up on a position lookup after this many seconds.
    #[arg(long = "lookup-timeout", value_name = "SECS", default_value_t = 10)]
    pub lookup_timeout: u64,

    /// Treat location access as already granted.
    #[arg(long = "grant-location")]
    pub grant_location: bool,

    /// Initial map centre.
    #[arg(long = "center", value_name = "LAT,LNG", value_parser = parse_coordinate)]
    pub center: Option<Coordinate>,

    /// Initial map zoom level.
    #[arg(long = "zoom", value_name = "Z")]
    pub zoom: Option<f32>,

    /// Show the directions link instead of opening it.
    #[arg(long = "no-open")]
    pub no_open: bool,

    /// Adjust log verbosity (-v for info, -vv for debug, -q to silence).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Write logs to this file. Logging is off without it.
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Camera placement from `--center` and `--zoom`, falling back to the defaults.
    pub(crate) fn camera(&self) -> CameraSettings {
        let defaults = CameraSettings::default();
        CameraSettings {
            center: self.center.unwrap_or(defaults.center),
            zoom: self.zoom.unwrap_or(defaults.zoom),
        }
    }

    /// Request timeout for the position lookup client.
    pub(crate) fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.lookup_timeout)
    }

    /// Location source selected on the command line.
    pub(crate) fn location_source(&self) -> LocationSource {
        match self.origin {
            Some(position) => LocationSource::Fixed(position),
            None => LocationSource::GeoIp {
                endpoint: self.geoip_url.clone(),
            },
        }
    }
}

/// Parse `lat,lng` in decimal degrees.
fn parse_coordinate(raw: &str) -> Result<Coordinate, String> {
    let (lat, lng) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LNG but got `{raw}`"))?;
    let lat = lat
        .trim()
        .parse::<f64>()
        .map_err(|err| format!("invalid latitude `{lat}`: {err}"))?;
    let lng = lng
        .trim()
        .parse::<f64>()
        .map_err(|err| format!("invalid longitude `{lng}`: {err}"))?;

    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return Err(format!("`{raw}` is not a valid position"));
    }
    Ok(Coordinate::new(lat, lng))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_lat_lng_pairs() {
        let position = parse_coordinate("52.2297, 21.0122").expect("valid pair");
        assert_eq!(position, Coordinate::new(52.2297, 21.0122));
    }

    #[test]
    fn rejects_malformed_pairs() {
        assert!(parse_coordinate("52.2").is_err());
        assert!(parse_coordinate("north,21").is_err());
        assert!(parse_coordinate("91,0").is_err());
    }

    #[test]
    fn defaults_use_warsaw_camera_and_geoip() {
        let cli = Cli::parse_from(["kurier"]);
        assert_eq!(cli.camera(), CameraSettings::default());
        assert!(matches!(cli.location_source(), LocationSource::GeoIp { .. }));
        assert_eq!(cli.stops, PathBuf::from("stops.json"));
        assert_eq!(cli.lookup_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn lookup_timeout_is_configurable() {
        let cli = Cli::parse_from(["kurier", "--lookup-timeout", "3"]);
        assert_eq!(cli.lookup_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn origin_selects_fixed_source() {
        let cli = Cli::parse_from(["kurier", "--origin", "50.06,19.94", "--zoom", "14"]);
        assert!(matches!(
            cli.location_source(),
            LocationSource::Fixed(position) if position == Coordinate::new(50.06, 19.94)
        ));
        assert!((cli.camera().zoom - 14.0).abs() < f32::EPSILON);
    }
}
