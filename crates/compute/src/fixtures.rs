//! Built-in facility datasets.

use crate::analysis::proximity::{Facility, FacilityError, facilities_from_json};

/// Five drop-off points around lower Manhattan.
pub const NYC_FACILITIES_JSON: &str = r#"[
  {"id": 1, "name": "Green Earth Recycling", "address": "123 Eco Street",
   "location": {"lat": 40.7128, "lng": -74.006}, "categories": ["plastic", "ewaste", "paper"]},
  {"id": 2, "name": "E-Cycle Solutions", "address": "456 Tech Avenue",
   "location": {"lat": 40.7138, "lng": -74.013}, "categories": ["ewaste", "batteries"]},
  {"id": 3, "name": "Plastic Recovery Center", "address": "789 Bottle Boulevard",
   "location": {"lat": 40.7118, "lng": -74.009}, "categories": ["plastic", "glass"]},
  {"id": 4, "name": "Municipal Recycling Facility", "address": "101 City Plaza",
   "location": {"lat": 40.7148, "lng": -74.003}, "categories": ["plastic", "paper", "metal", "glass"]},
  {"id": 5, "name": "Electronic Waste Depot", "address": "202 Circuit Road",
   "location": {"lat": 40.7158, "lng": -74.011}, "categories": ["ewaste", "batteries", "appliances"]}
]"#;

pub fn nyc_facilities() -> Result<Vec<Facility>, FacilityError> {
    facilities_from_json(NYC_FACILITIES_JSON)
}
