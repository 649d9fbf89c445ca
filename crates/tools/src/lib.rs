//! Headless reports behind the `globe` command-line tool.

use compute::Facility;
use foundation::math::{GeoCoordinate, Rotation};
use gpu::HeadlessBackend;
use layers::{MarkerLayer, css_hex};
use scene::{CategoryFilter, HotspotId, HotspotSet};
use serde::Serialize;
use viewer::ViewerConfig;
use viewer::geolocation::{FixedPosition, LocationService, NoPosition, PositionSource};
use viewer::nearby::{NearbyFacilities, NearbyOutcome, RecordingOpener};
use viewer::panel::HotspotPanel;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerRow {
    pub id: HotspotId,
    pub name: String,
    pub category: &'static str,
    pub position: [f64; 3],
    pub size: f64,
    pub color: String,
}

pub fn markers_report(
    config: &ViewerConfig,
    hotspots: &HotspotSet,
    filter: CategoryFilter,
) -> Result<Vec<MarkerRow>, String> {
    let mut layer = MarkerLayer::new(0, config.globe.radius, config.markers.style())
        .map_err(|e| e.to_string())?;
    layer.sync(hotspots, filter).map_err(|e| e.to_string())?;

    let mut rows = Vec::with_capacity(layer.markers().len());
    for m in layer.markers() {
        let Some(h) = hotspots.get(m.hotspot) else {
            continue;
        };
        rows.push(MarkerRow {
            id: m.hotspot,
            name: h.name.clone(),
            category: h.category.as_str(),
            position: m.position.as_array(),
            size: m.scale(),
            color: css_hex(m.color),
        });
    }
    Ok(rows)
}

#[derive(Debug, Clone, PartialEq)]
pub struct PickRequest {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub filter: CategoryFilter,
    pub rotation: Rotation,
    pub zoom: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PickReport {
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
    pub selected: Option<HotspotId>,
    pub panel: Option<HotspotPanel>,
}

/// Runs a click through the full globe pipeline against a headless renderer.
pub fn pick_report(
    config: &ViewerConfig,
    hotspots: HotspotSet,
    req: &PickRequest,
) -> Result<PickReport, String> {
    let mut view = viewer::GlobeView::new(
        HeadlessBackend::new(),
        config,
        hotspots,
        req.width,
        req.height,
    )
    .map_err(|e| e.to_string())?;
    view.set_filter(req.filter).map_err(|e| e.to_string())?;
    view.viewport_mut().set_rotation(req.rotation);
    if let Some(z) = req.zoom {
        view.viewport_mut().set_zoom(z);
    }
    view.tick(0.0).map_err(|e| e.to_string())?;

    view.click(req.x, req.y);
    Ok(PickReport {
        x: req.x,
        y: req.y,
        zoom: view.viewport().zoom(),
        selected: view.selected().map(|h| h.id),
        panel: view.panel(),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankReport {
    pub ranked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    pub selected: Option<u64>,
    pub facilities: Vec<Facility>,
}

pub async fn rank_report(
    config: &ViewerConfig,
    facilities: Vec<Facility>,
    user: Option<GeoCoordinate>,
    hint: Option<String>,
) -> RankReport {
    match user {
        Some(user) => run_nearby(config, FixedPosition(user), facilities, hint).await,
        None => run_nearby(config, NoPosition, facilities, hint).await,
    }
}

async fn run_nearby<S: PositionSource>(
    config: &ViewerConfig,
    source: S,
    facilities: Vec<Facility>,
    hint: Option<String>,
) -> RankReport {
    let locator = LocationService::new(source, config.location.position_options());
    let mut nearby = NearbyFacilities::new(
        locator,
        RecordingOpener::default(),
        config.directions.clone(),
        facilities,
        hint,
    );
    let outcome = nearby.refresh().await;
    RankReport {
        ranked: matches!(outcome, NearbyOutcome::Ranked { .. }),
        warning: nearby.warning().map(|w| w.to_string()),
        selected: nearby.selected().map(|f| f.id),
        facilities: nearby.centers().to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::{PickRequest, markers_report, pick_report, rank_report};
    use compute::fixtures::nyc_facilities;
    use foundation::math::{GeoCoordinate, Rotation};
    use pretty_assertions::assert_eq;
    use scene::fixtures::globe_hotspots;
    use scene::{CategoryFilter, HotspotId};
    use viewer::ViewerConfig;

    #[test]
    fn marker_rows_carry_style() {
        let rows = markers_report(
            &ViewerConfig::default(),
            &globe_hotspots().unwrap(),
            CategoryFilter::Recycling,
        )
        .unwrap();
        let ids: Vec<HotspotId> = rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![HotspotId(4), HotspotId(5), HotspotId(8)]);
        assert!(rows.iter().all(|r| r.color == "#22c55e" && r.size == 0.07));
    }

    #[test]
    fn pick_in_empty_corner_selects_nothing() {
        let req = PickRequest {
            x: 2.0,
            y: 2.0,
            width: 800.0,
            height: 600.0,
            filter: CategoryFilter::All,
            rotation: Rotation::IDENTITY,
            zoom: Some(9.0),
        };
        let report = pick_report(&ViewerConfig::default(), globe_hotspots().unwrap(), &req).unwrap();
        assert_eq!(report.selected, None);
        assert_eq!(report.panel, None);
        assert_eq!(report.zoom, 5.0);
    }

    #[test]
    fn pick_at_screen_center_hits_front_marker() {
        // Amsterdam (52.37N, 4.9E) turned to face the camera.
        let cfg = ViewerConfig::default();
        let set = globe_hotspots().unwrap();
        let rows = markers_report(&cfg, &set, CategoryFilter::All).unwrap();
        let [x, y, z] = rows.iter().find(|r| r.id == HotspotId(5)).unwrap().position;
        let h = (x * x + z * z).sqrt();
        let req = PickRequest {
            x: 400.0,
            y: 300.0,
            width: 800.0,
            height: 600.0,
            filter: CategoryFilter::All,
            rotation: Rotation::new((-x).atan2(z), y.atan2(h)),
            zoom: None,
        };
        let report = pick_report(&cfg, set, &req).unwrap();
        assert_eq!(report.selected, Some(HotspotId(5)));
        assert_eq!(report.panel.map(|p| p.category_label), Some("Recycling Facility"));
    }

    #[tokio::test]
    async fn rank_with_and_without_position() {
        let cfg = ViewerConfig::default();
        let user = GeoCoordinate::new(40.7128, -74.0060).unwrap();
        let ranked = rank_report(&cfg, nyc_facilities().unwrap(), Some(user), None).await;
        assert!(ranked.ranked);
        assert_eq!(ranked.selected, Some(1));
        assert_eq!(ranked.facilities.len(), 5);

        let fallback = rank_report(&cfg, nyc_facilities().unwrap(), None, Some("battery".into())).await;
        assert!(!fallback.ranked);
        assert_eq!(fallback.selected, None);
        assert!(fallback.warning.is_some());
        assert_eq!(fallback.facilities.len(), 5);
    }
}
