/// One candidate from the Nominatim search endpoint.
/// Nominatim returns coordinates as decimal strings; other fields are ignored.
#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, PartialEq)]
pub struct PlaceSuggestion {
    /// Full human-readable place name (e.g., "Paris, Île-de-France, France")
    pub display_name: String,
    /// Latitude as decimal text (e.g., "48.8566")
    pub lat: String,
    /// Longitude as decimal text (e.g., "2.3522")
    pub lon: String,
}
