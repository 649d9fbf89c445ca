use compute::{Facility, rank_nearby};
use foundation::math::GeoCoordinate;
use tracing::{info, warn};

use crate::config::DirectionsConfig;
use crate::geolocation::{LocationError, LocationService, PositionSource};

/// Opens a URL in a new browsing context.
pub trait UrlOpener {
    fn open(&mut self, url: &str) -> Result<(), String>;
}

/// Records opened URLs instead of launching anything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordingOpener {
    pub opened: Vec<String>,
}

impl UrlOpener for RecordingOpener {
    fn open(&mut self, url: &str) -> Result<(), String> {
        self.opened.push(url.to_string());
        Ok(())
    }
}

/// Non-fatal notice that the list is unranked because the position is unknown.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LocationWarning(pub LocationError);

impl std::fmt::Display for LocationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            LocationError::Unsupported => write!(f, "Geolocation is not supported by your browser"),
            _ => write!(f, "Could not get your location"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DirectionsError {
    /// Directions need a starting point.
    NoUserLocation,
    UnknownFacility(u64),
    Open(String),
}

impl std::fmt::Display for DirectionsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DirectionsError::NoUserLocation => write!(f, "user location unknown"),
            DirectionsError::UnknownFacility(id) => write!(f, "unknown facility: {id}"),
            DirectionsError::Open(msg) => write!(f, "could not open directions: {msg}"),
        }
    }
}

impl std::error::Error for DirectionsError {}

pub fn directions_url(base_url: &str, destination: GeoCoordinate) -> String {
    format!(
        "{base_url}&destination={},{}",
        destination.lat(),
        destination.lng()
    )
}

/// Identifies one locate request; results for an older ticket are dropped.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LocateTicket(u64);

/// What a finished locate request produced.
#[derive(Debug, Clone, PartialEq)]
pub enum NearbyOutcome {
    Ranked { count: usize },
    Fallback(LocationWarning),
    /// The view was torn down or re-requested while the request was in flight.
    Stale,
}

/// Nearby-facilities view model: locate, rank, auto-select, directions.
pub struct NearbyFacilities<S, O> {
    locator: LocationService<S>,
    opener: O,
    directions: DirectionsConfig,
    catalog: Vec<Facility>,
    hint: Option<String>,
    user: Option<GeoCoordinate>,
    centers: Vec<Facility>,
    selected: Option<u64>,
    warning: Option<LocationWarning>,
    generation: u64,
    loading: bool,
}

impl<S: PositionSource, O: UrlOpener> NearbyFacilities<S, O> {
    pub fn new(
        locator: LocationService<S>,
        opener: O,
        directions: DirectionsConfig,
        catalog: Vec<Facility>,
        hint: Option<String>,
    ) -> Self {
        Self {
            locator,
            opener,
            directions,
            catalog,
            hint,
            user: None,
            centers: Vec::new(),
            selected: None,
            warning: None,
            generation: 0,
            loading: false,
        }
    }

    /// Locates the user and ranks the catalog around them.
    pub async fn refresh(&mut self) -> NearbyOutcome {
        let ticket = self.begin_locate();
        let result = self.locator.locate().await;
        self.finish_locate(ticket, result)
    }

    pub fn begin_locate(&mut self) -> LocateTicket {
        self.generation += 1;
        self.loading = true;
        LocateTicket(self.generation)
    }

    pub fn locator_mut(&mut self) -> &mut LocationService<S> {
        &mut self.locator
    }

    pub fn finish_locate(
        &mut self,
        ticket: LocateTicket,
        result: Result<GeoCoordinate, LocationError>,
    ) -> NearbyOutcome {
        if ticket.0 != self.generation {
            return NearbyOutcome::Stale;
        }
        self.loading = false;

        match result {
            Ok(user) => {
                self.user = Some(user);
                self.warning = None;
                self.centers = rank_nearby(Some(user), &self.catalog, self.hint.as_deref());
                self.selected = self.centers.first().map(|f| f.id);
                info!("found {} recycling centers near you", self.centers.len());
                NearbyOutcome::Ranked {
                    count: self.centers.len(),
                }
            }
            Err(e) => {
                warn!("error getting location: {e}");
                let warning = LocationWarning(e);
                self.warning = Some(warning);
                self.centers = rank_nearby(None, &self.catalog, self.hint.as_deref());
                NearbyOutcome::Fallback(warning)
            }
        }
    }

    /// Invalidates any in-flight request.
    pub fn teardown(&mut self) {
        self.generation += 1;
        self.loading = false;
    }

    pub fn select(&mut self, facility_id: u64) -> bool {
        let known = self.centers.iter().any(|f| f.id == facility_id);
        if known {
            self.selected = Some(facility_id);
        }
        known
    }

    pub fn get_directions(&mut self, facility_id: u64) -> Result<String, DirectionsError> {
        if self.user.is_none() {
            return Err(DirectionsError::NoUserLocation);
        }
        let facility = self
            .centers
            .iter()
            .find(|f| f.id == facility_id)
            .ok_or(DirectionsError::UnknownFacility(facility_id))?;

        let url = directions_url(&self.directions.base_url, facility.location);
        match facility.distance {
            Some(d) => info!("getting directions to {} ({d}km away)", facility.name),
            None => info!("getting directions to {}", facility.name),
        }
        self.opener.open(&url).map_err(DirectionsError::Open)?;
        Ok(url)
    }

    pub fn centers(&self) -> &[Facility] {
        &self.centers
    }

    pub fn selected(&self) -> Option<&Facility> {
        let id = self.selected?;
        self.centers.iter().find(|f| f.id == id)
    }

    pub fn user_location(&self) -> Option<GeoCoordinate> {
        self.user
    }

    pub fn warning(&self) -> Option<LocationWarning> {
        self.warning
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn opener(&self) -> &O {
        &self.opener
    }
}
