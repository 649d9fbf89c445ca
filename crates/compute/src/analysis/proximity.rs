use std::collections::BTreeSet;

use foundation::math::precision::stable_total_cmp_f64;
use foundation::math::{GeoCoordinate, distance_km};
use serde::{Deserialize, Serialize};

/// A drop-off point that accepts some set of material categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    pub id: u64,
    pub name: String,
    pub address: String,
    pub location: GeoCoordinate,
    #[serde(alias = "types")]
    pub categories: BTreeSet<String>,
    /// Kilometers from the user, one decimal. Only set by a ranking pass.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

impl Facility {
    pub fn accepts(&self, category: &str) -> bool {
        self.categories.contains(category)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FacilityError {
    DuplicateId(u64),
    Parse(String),
}

impl std::fmt::Display for FacilityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FacilityError::DuplicateId(id) => write!(f, "duplicate facility id: {id}"),
            FacilityError::Parse(msg) => write!(f, "facility data invalid: {msg}"),
        }
    }
}

impl std::error::Error for FacilityError {}

pub fn facilities_from_json(raw: &str) -> Result<Vec<Facility>, FacilityError> {
    let items: Vec<Facility> =
        serde_json::from_str(raw).map_err(|e| FacilityError::Parse(e.to_string()))?;
    let mut seen = BTreeSet::new();
    for f in &items {
        if !seen.insert(f.id) {
            return Err(FacilityError::DuplicateId(f.id));
        }
    }
    Ok(items)
}

/// Category inferred from a free-text item description.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CategoryHint {
    Plastic,
    Ewaste,
    Any,
}

const EWASTE_KEYWORDS: [&str; 4] = ["phone", "battery", "electronic", "circuit"];

impl CategoryHint {
    /// Case-insensitive keyword match; "plastic" takes precedence.
    pub fn from_text(text: Option<&str>) -> Self {
        let Some(text) = text else {
            return CategoryHint::Any;
        };
        let text = text.to_lowercase();
        if text.contains("plastic") {
            CategoryHint::Plastic
        } else if EWASTE_KEYWORDS.iter().any(|k| text.contains(k)) {
            CategoryHint::Ewaste
        } else {
            CategoryHint::Any
        }
    }

    pub fn admits(self, facility: &Facility) -> bool {
        match self {
            CategoryHint::Plastic => facility.accepts("plastic"),
            CategoryHint::Ewaste => facility.accepts("ewaste"),
            CategoryHint::Any => true,
        }
    }
}

/// Filters by hint, annotates distances and sorts nearest first.
///
/// Ties (after rounding) are ordered by ascending id.
pub fn rank(user: GeoCoordinate, facilities: &[Facility], hint: Option<&str>) -> Vec<Facility> {
    let hint = CategoryHint::from_text(hint);
    let mut ranked: Vec<Facility> = facilities
        .iter()
        .filter(|f| hint.admits(f))
        .map(|f| Facility {
            distance: Some(distance_km(user, f.location)),
            ..f.clone()
        })
        .collect();

    ranked.sort_by(|a, b| {
        let da = a.distance.unwrap_or(0.0);
        let db = b.distance.unwrap_or(0.0);
        stable_total_cmp_f64(da, db).then_with(|| a.id.cmp(&b.id))
    });
    ranked
}

/// Like [`rank`], but without a user position returns the list as given:
/// unfiltered, unsorted, no distances.
pub fn rank_nearby(
    user: Option<GeoCoordinate>,
    facilities: &[Facility],
    hint: Option<&str>,
) -> Vec<Facility> {
    match user {
        Some(user) => rank(user, facilities, hint),
        None => facilities
            .iter()
            .map(|f| Facility {
                distance: None,
                ..f.clone()
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::{CategoryHint, FacilityError, facilities_from_json, rank, rank_nearby};
    use crate::fixtures::nyc_facilities;
    use foundation::math::GeoCoordinate;
    use pretty_assertions::assert_eq;

    fn user() -> GeoCoordinate {
        GeoCoordinate::new(40.7128, -74.0060).unwrap()
    }

    fn ids(list: &[super::Facility]) -> Vec<u64> {
        list.iter().map(|f| f.id).collect()
    }

    #[test]
    fn ranks_fixture_nearest_first() {
        let ranked = rank(user(), &nyc_facilities().unwrap(), None);
        assert_eq!(ids(&ranked), vec![1, 3, 4, 5, 2]);

        let distances: Vec<f64> = ranked.iter().map(|f| f.distance.unwrap()).collect();
        assert_eq!(distances, vec![0.0, 0.3, 0.3, 0.5, 0.6]);
        for d in distances {
            assert!(d >= 0.0);
            assert_eq!((d * 10.0).round() / 10.0, d);
        }
    }

    #[test]
    fn hint_filters_by_category() {
        let all = nyc_facilities().unwrap();
        assert_eq!(ids(&rank(user(), &all, Some("Plastic Bottle"))), vec![1, 3, 4]);
        assert_eq!(ids(&rank(user(), &all, Some("old PHONE"))), vec![1, 5, 2]);
        assert_eq!(ids(&rank(user(), &all, Some("circuit board"))), vec![1, 5, 2]);
        assert_eq!(rank(user(), &all, Some("cardboard box")).len(), 5);
    }

    #[test]
    fn plastic_keyword_wins_over_electronics() {
        assert_eq!(
            CategoryHint::from_text(Some("plastic battery case")),
            CategoryHint::Plastic
        );
        assert_eq!(CategoryHint::from_text(Some("")), CategoryHint::Any);
        assert_eq!(CategoryHint::from_text(None), CategoryHint::Any);
    }

    #[test]
    fn unknown_location_keeps_input_order() {
        let all = nyc_facilities().unwrap();
        let listed = rank_nearby(None, &all, Some("plastic"));
        assert_eq!(ids(&listed), vec![1, 2, 3, 4, 5]);
        assert!(listed.iter().all(|f| f.distance.is_none()));

        let ranked = rank_nearby(Some(user()), &all, Some("plastic"));
        assert_eq!(ids(&ranked), vec![1, 3, 4]);
    }

    #[test]
    fn distant_user_still_sorted() {
        let all = nyc_facilities().unwrap();
        let far = GeoCoordinate::new(51.5074, -0.1278).unwrap();
        let ranked = rank(far, &all, None);
        assert!(ranked.windows(2).all(|w| w[0].distance <= w[1].distance));
    }

    #[test]
    fn accepts_types_alias_and_rejects_duplicates() {
        let raw = r#"[
          {"id": 7, "name": "a", "address": "x", "location": {"lat": 1, "lng": 2}, "types": ["glass"]},
          {"id": 7, "name": "b", "address": "y", "location": {"lat": 1, "lng": 2}, "types": []}
        ]"#;
        assert_eq!(facilities_from_json(raw), Err(FacilityError::DuplicateId(7)));

        let bad = r#"[{"id": 1, "name": "a", "address": "x",
            "location": {"lat": 1, "lng": 200}, "categories": []}]"#;
        assert!(matches!(facilities_from_json(bad), Err(FacilityError::Parse(_))));
    }
}
