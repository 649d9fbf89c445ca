use scene::{Hotspot, HotspotCategory, HotspotId, Severity};
use serde::Serialize;

pub fn category_label(category: HotspotCategory) -> &'static str {
    match category {
        HotspotCategory::Plastic => "Plastic Pollution Hotspot",
        HotspotCategory::Ewaste => "E-Waste Disposal Site",
        HotspotCategory::Recycling => "Recycling Facility",
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct SeverityMeter {
    pub level: Severity,
    /// Fraction of the bar that is filled.
    pub fill: f64,
}

impl SeverityMeter {
    pub fn new(level: Severity) -> Self {
        let fill = match level {
            Severity::High => 0.8,
            Severity::Medium => 0.6,
            Severity::Low => 0.4,
        };
        Self { level, fill }
    }
}

/// Info card for the selected hotspot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HotspotPanel {
    pub id: HotspotId,
    pub name: String,
    pub category_label: &'static str,
    pub description: String,
    pub severity: Option<SeverityMeter>,
    pub offers_directions: bool,
}

impl HotspotPanel {
    pub fn for_hotspot(hotspot: &Hotspot) -> Self {
        let polluting = matches!(
            hotspot.category,
            HotspotCategory::Plastic | HotspotCategory::Ewaste
        );
        Self {
            id: hotspot.id,
            name: hotspot.name.clone(),
            category_label: category_label(hotspot.category),
            description: hotspot.description.clone(),
            severity: hotspot.severity.filter(|_| polluting).map(SeverityMeter::new),
            offers_directions: hotspot.category == HotspotCategory::Recycling,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::HotspotPanel;
    use scene::fixtures::world_hotspots;
    use scene::{HotspotId, Severity};

    #[test]
    fn plastic_hotspot_shows_severity() {
        let set = world_hotspots().unwrap();
        let panel = HotspotPanel::for_hotspot(set.get(HotspotId(3)).unwrap());
        assert_eq!(panel.category_label, "Plastic Pollution Hotspot");
        let meter = panel.severity.unwrap();
        assert_eq!(meter.level, Severity::Medium);
        assert_eq!(meter.fill, 0.6);
        assert!(!panel.offers_directions);
    }

    #[test]
    fn ewaste_hotspot_label() {
        let set = world_hotspots().unwrap();
        let panel = HotspotPanel::for_hotspot(set.get(HotspotId(9)).unwrap());
        assert_eq!(panel.category_label, "E-Waste Disposal Site");
        assert_eq!(panel.severity.map(|m| m.fill), Some(0.8));
    }

    #[test]
    fn recycling_hotspot_offers_directions_without_meter() {
        let set = world_hotspots().unwrap();
        let mut hotspot = set.get(HotspotId(11)).unwrap().clone();
        hotspot.severity = Some(Severity::Low);
        let panel = HotspotPanel::for_hotspot(&hotspot);
        assert_eq!(panel.category_label, "Recycling Facility");
        assert_eq!(panel.severity, None);
        assert!(panel.offers_directions);
    }
}
