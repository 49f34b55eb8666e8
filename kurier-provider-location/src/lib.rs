//! Location providers for kurier: IP geolocation over HTTP, fixed positions, and a
//! permission gate standing in for the host's runtime location permission.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use tracing::{debug, info};

use kurier_core::{
    model::Coordinate,
    ports::{LocationPort, PortError},
};

/// Default endpoint of the ip-api.com JSON service.
pub const DEFAULT_GEOIP_URL: &str = "http://ip-api.com/json/";

/// Response of an ip-api style lookup.
#[derive(Debug, Deserialize)]
struct GeoIpResponse {
    status: String,

    #[serde(default)]
    message: Option<String>,

    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
}

/// Current position derived from the public IP address.
pub struct GeoIpLocationPort {
    client: Client,
    endpoint: String,
}

impl GeoIpLocationPort {
    /// Create a port querying `endpoint` with the given HTTP client.
    #[must_use]
    pub fn new<S: Into<String>>(client: Client, endpoint: S) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl LocationPort for GeoIpLocationPort {
    fn name(&self) -> &str {
        "geoip"
    }

    async fn current_position(&self) -> Result<Option<Coordinate>, PortError> {
        let req = self
            .client
            .get(&self.endpoint)
            .query(&[("fields", "status,message,lat,lon")]);
        let body = fetch_text(req).await?;
        decode_response(&body)
    }
}

/// Decode an ip-api answer. A `fail` status is a lookup without a fix.
fn decode_response(body: &str) -> Result<Option<Coordinate>, PortError> {
    let response: GeoIpResponse = serde_json::from_str(body)?;

    if response.status != "success" {
        debug!(
            status = %response.status,
            message = response.message.as_deref().unwrap_or(""),
            "geoip lookup returned no position"
        );
        return Ok(None);
    }

    match (response.lat, response.lon) {
        (Some(lat), Some(lng)) => Ok(Some(Coordinate::new(lat, lng))),
        _ => Err(PortError::Provider(
            "geoip success response without coordinates".into(),
        )),
    }
}

/// Position fixed at start-up.
pub struct FixedLocationPort {
    position: Coordinate,
}

impl FixedLocationPort {
    /// Create a port that always reports `position`.
    #[must_use]
    pub fn new(position: Coordinate) -> Self {
        Self { position }
    }
}

#[async_trait]
impl LocationPort for FixedLocationPort {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn current_position(&self) -> Result<Option<Coordinate>, PortError> {
        Ok(Some(self.position))
    }
}

/// Refuses lookups until location access has been granted.
pub struct PermissionGate {
    inner: Arc<dyn LocationPort>,
    granted: AtomicBool,
}

impl PermissionGate {
    /// Wrap `inner`, starting with the given permission state.
    #[must_use]
    pub fn new(inner: Arc<dyn LocationPort>, granted: bool) -> Self {
        Self {
            inner,
            granted: AtomicBool::new(granted),
        }
    }

    /// Allow lookups from now on.
    pub fn grant(&self) {
        self.granted.store(true, Ordering::Release);
        info!(provider = self.inner.name(), "location permission granted");
    }

    /// Refuse lookups from now on.
    pub fn revoke(&self) {
        self.granted.store(false, Ordering::Release);
        info!(provider = self.inner.name(), "location permission revoked");
    }

    /// Whether lookups are currently allowed.
    #[must_use]
    pub fn is_granted(&self) -> bool {
        self.granted.load(Ordering::Acquire)
    }
}

#[async_trait]
impl LocationPort for PermissionGate {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn current_position(&self) -> Result<Option<Coordinate>, PortError> {
        if !self.is_granted() {
            return Err(PortError::PermissionDenied);
        }
        self.inner.current_position().await
    }
}

/// Where the current position comes from.
#[derive(Debug, Clone)]
pub enum LocationSource {
    /// Always the given position.
    Fixed(Coordinate),
    /// IP geolocation at the given endpoint.
    GeoIp {
        /// Lookup URL.
        endpoint: String,
    },
}

/// Build the gated location port for `source`.
///
/// The gate is returned so the caller can grant access once the user agrees.
#[must_use]
pub fn location_port(
    client: Client,
    source: LocationSource,
    granted: bool,
) -> Arc<PermissionGate> {
    let inner: Arc<dyn LocationPort> = match source {
        LocationSource::Fixed(position) => Arc::new(FixedLocationPort::new(position)),
        LocationSource::GeoIp { endpoint } => Arc::new(GeoIpLocationPort::new(client, endpoint)),
    };
    Arc::new(PermissionGate::new(inner, granted))
}

// Small helper to fetch a body with status handling.
async fn fetch_text(req: RequestBuilder) -> Result<String, PortError> {
    req.send()
        .await
        .map_err(PortError::from)?
        .error_for_status()
        .map_err(PortError::from)?
        .text()
        .await
        .map_err(PortError::from)
}
