/// Response structure for the GeoNames `timezoneJSON` endpoint.
/// Only the timezone identifier is used; failures arrive as a `status` object
/// with HTTP 200.
#[derive(serde::Deserialize, Debug, Clone, Default, PartialEq)]
pub struct TimezoneResponse {
    /// IANA timezone identifier (e.g., "Europe/Paris"); absent over open sea
    #[serde(rename = "timezoneId", default)]
    pub timezone_id: Option<String>,
    /// Error report from GeoNames (bad credential, quota exceeded, ...)
    #[serde(default)]
    pub status: Option<ServiceStatus>,
}

/// Error block GeoNames returns in place of a result.
#[derive(serde::Deserialize, Debug, Clone, PartialEq)]
pub struct ServiceStatus {
    pub message: String,
    pub value: i64,
}
