use std::collections::BTreeSet;
use std::sync::Arc;

use foundation::math::GeoCoordinate;
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct HotspotId(pub u64);

impl std::fmt::Display for HotspotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HotspotCategory {
    Plastic,
    Ewaste,
    Recycling,
}

impl HotspotCategory {
    pub const ALL: [HotspotCategory; 3] = [
        HotspotCategory::Plastic,
        HotspotCategory::Ewaste,
        HotspotCategory::Recycling,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            HotspotCategory::Plastic => "plastic",
            HotspotCategory::Ewaste => "ewaste",
            HotspotCategory::Recycling => "recycling",
        }
    }
}

impl std::str::FromStr for HotspotCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plastic" => Ok(HotspotCategory::Plastic),
            "ewaste" | "e-waste" => Ok(HotspotCategory::Ewaste),
            "recycling" => Ok(HotspotCategory::Recycling),
            other => Err(format!("unknown hotspot category: {other}")),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hotspot {
    pub id: HotspotId,
    pub name: String,
    #[serde(alias = "type")]
    pub category: HotspotCategory,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    pub location: GeoCoordinate,
}

/// Which hotspots are materialized as markers.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryFilter {
    #[default]
    All,
    Plastic,
    Ewaste,
    Recycling,
}

impl CategoryFilter {
    pub fn matches(self, category: HotspotCategory) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Plastic => category == HotspotCategory::Plastic,
            CategoryFilter::Ewaste => category == HotspotCategory::Ewaste,
            CategoryFilter::Recycling => category == HotspotCategory::Recycling,
        }
    }
}

impl std::str::FromStr for CategoryFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(CategoryFilter::All);
        }
        Ok(match s.parse::<HotspotCategory>()? {
            HotspotCategory::Plastic => CategoryFilter::Plastic,
            HotspotCategory::Ewaste => CategoryFilter::Ewaste,
            HotspotCategory::Recycling => CategoryFilter::Recycling,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum HotspotSetError {
    DuplicateId(HotspotId),
    Parse(String),
}

impl std::fmt::Display for HotspotSetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HotspotSetError::DuplicateId(id) => write!(f, "duplicate hotspot id: {id}"),
            HotspotSetError::Parse(msg) => write!(f, "hotspot data invalid: {msg}"),
        }
    }
}

impl std::error::Error for HotspotSetError {}

/// Immutable, shared set of hotspots for one session.
///
/// Cloning is cheap. Two sets compare as the same revision only when they
/// share storage, which is what marker rebuild detection keys on.
#[derive(Debug, Clone, Default)]
pub struct HotspotSet {
    items: Arc<[Hotspot]>,
}

impl HotspotSet {
    pub fn new(items: Vec<Hotspot>) -> Result<Self, HotspotSetError> {
        let mut seen = BTreeSet::new();
        for h in &items {
            if !seen.insert(h.id) {
                return Err(HotspotSetError::DuplicateId(h.id));
            }
        }
        Ok(Self {
            items: items.into(),
        })
    }

    pub fn from_json(raw: &str) -> Result<Self, HotspotSetError> {
        let items: Vec<Hotspot> =
            serde_json::from_str(raw).map_err(|e| HotspotSetError::Parse(e.to_string()))?;
        Self::new(items)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Hotspot> + '_ {
        self.items.iter()
    }

    pub fn get(&self, id: HotspotId) -> Option<&Hotspot> {
        self.items.iter().find(|h| h.id == id)
    }

    pub fn filtered(&self, filter: CategoryFilter) -> impl Iterator<Item = &Hotspot> + '_ {
        self.items.iter().filter(move |h| filter.matches(h.category))
    }

    pub fn same_revision(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.items, &other.items)
    }
}
