//! Static place table used when the remote search is unavailable.
//!
//! Sri Lankan cities come first, followed by south Indian cities and a
//! handful of major international ones. Matching keeps table order.

use crate::model::PlaceCandidate;

struct Entry {
    name: &'static str,
    region: &'static str,
    country: &'static str,
    latitude: f64,
    longitude: f64,
    address: &'static str,
}

const fn entry(
    name: &'static str,
    region: &'static str,
    country: &'static str,
    latitude: f64,
    longitude: f64,
    address: &'static str,
) -> Entry {
    Entry { name, region, country, latitude, longitude, address }
}

#[rustfmt::skip]
static PLACES: [Entry; 24] = [
    entry("Jaffna", "Northern Province", "Sri Lanka", 9.6615, 80.0255, "Jaffna, Northern Province, Sri Lanka"),
    entry("Colombo", "Western Province", "Sri Lanka", 6.9271, 79.8612, "Colombo, Western Province, Sri Lanka"),
    entry("Kandy", "Central Province", "Sri Lanka", 7.2906, 80.6337, "Kandy, Central Province, Sri Lanka"),
    entry("Galle", "Southern Province", "Sri Lanka", 6.0535, 80.2210, "Galle, Southern Province, Sri Lanka"),
    entry("Trincomalee", "Eastern Province", "Sri Lanka", 8.5874, 81.2152, "Trincomalee, Eastern Province, Sri Lanka"),
    entry("Anuradhapura", "North Central Province", "Sri Lanka", 8.3114, 80.4037, "Anuradhapura, North Central Province, Sri Lanka"),
    entry("Negombo", "Western Province", "Sri Lanka", 7.2086, 79.8357, "Negombo, Western Province, Sri Lanka"),
    entry("Batticaloa", "Eastern Province", "Sri Lanka", 7.7167, 81.7000, "Batticaloa, Eastern Province, Sri Lanka"),
    entry("Chennai", "Tamil Nadu", "India", 13.0827, 80.2707, "Chennai, Tamil Nadu, India"),
    entry("Coimbatore", "Tamil Nadu", "India", 11.0168, 76.9558, "Coimbatore, Tamil Nadu, India"),
    entry("Madurai", "Tamil Nadu", "India", 9.9252, 78.1198, "Madurai, Tamil Nadu, India"),
    entry("Trichy", "Tamil Nadu", "India", 10.7905, 78.7047, "Trichy, Tamil Nadu, India"),
    entry("Salem", "Tamil Nadu", "India", 11.6643, 78.1460, "Salem, Tamil Nadu, India"),
    entry("Bangalore", "Karnataka", "India", 12.9716, 77.5946, "Bangalore, Karnataka, India"),
    entry("Mumbai", "Maharashtra", "India", 19.0760, 72.8777, "Mumbai, Maharashtra, India"),
    entry("Delhi", "Delhi", "India", 28.7041, 77.1025, "Delhi, India"),
    entry("London", "England", "United Kingdom", 51.5074, -0.1278, "London, England, United Kingdom"),
    entry("New York", "New York", "United States", 40.7128, -74.0060, "New York, New York, United States"),
    entry("Tokyo", "Tokyo", "Japan", 35.6762, 139.6503, "Tokyo, Japan"),
    entry("Sydney", "NSW", "Australia", -33.8688, 151.2093, "Sydney, NSW, Australia"),
    entry("Paris", "Île-de-France", "France", 48.8566, 2.3522, "Paris, Île-de-France, France"),
    entry("Dubai", "Dubai", "UAE", 25.2048, 55.2708, "Dubai, UAE"),
    entry("Singapore", "Singapore", "Singapore", 1.3521, 103.8198, "Singapore"),
    entry("Toronto", "Ontario", "Canada", 43.6532, -79.3832, "Toronto, Ontario, Canada"),
];

impl Entry {
    fn to_candidate(&self) -> PlaceCandidate {
        PlaceCandidate {
            name: self.name.to_string(),
            region: Some(self.region.to_string()),
            country: self.country.to_string(),
            latitude: self.latitude,
            longitude: self.longitude,
            display_address: self.address.to_string(),
        }
    }
}

/// Every entry whose name, region, country or address contains `query`,
/// ignoring case, capped at `limit`.
pub fn search(query: &str, limit: usize) -> Vec<PlaceCandidate> {
    PLACES
        .iter()
        .map(Entry::to_candidate)
        .filter(|c| c.matches(query))
        .take(limit)
        .collect()
}
