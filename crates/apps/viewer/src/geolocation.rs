use std::future::Future;
use std::time::Duration;

use foundation::math::GeoCoordinate;
use tokio::time::Instant;
use tracing::debug;

/// Options for a one-shot position request.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PositionOptions {
    pub high_accuracy: bool,
    pub timeout: Duration,
    /// A cached fix younger than this is returned without asking the source.
    pub maximum_age: Duration,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LocationError {
    PermissionDenied,
    Unavailable,
    Timeout,
    Unsupported,
}

impl std::fmt::Display for LocationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocationError::PermissionDenied => write!(f, "location permission denied"),
            LocationError::Unavailable => write!(f, "location unavailable"),
            LocationError::Timeout => write!(f, "location request timed out"),
            LocationError::Unsupported => write!(f, "geolocation is not supported"),
        }
    }
}

impl std::error::Error for LocationError {}

/// Device position provider.
pub trait PositionSource {
    fn current_position(
        &self,
        opts: &PositionOptions,
    ) -> impl Future<Output = Result<GeoCoordinate, LocationError>>;
}

/// A source that always reports the same position.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FixedPosition(pub GeoCoordinate);

impl PositionSource for FixedPosition {
    async fn current_position(&self, _opts: &PositionOptions) -> Result<GeoCoordinate, LocationError> {
        Ok(self.0)
    }
}

/// A device without geolocation support.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct NoPosition;

impl PositionSource for NoPosition {
    async fn current_position(&self, _opts: &PositionOptions) -> Result<GeoCoordinate, LocationError> {
        Err(LocationError::Unsupported)
    }
}

/// Applies the request timeout and serves cached fixes younger than `maximum_age`.
#[derive(Debug)]
pub struct LocationService<S> {
    source: S,
    options: PositionOptions,
    cached: Option<(GeoCoordinate, Instant)>,
}

impl<S: PositionSource> LocationService<S> {
    pub fn new(source: S, options: PositionOptions) -> Self {
        Self {
            source,
            options,
            cached: None,
        }
    }

    pub fn options(&self) -> &PositionOptions {
        &self.options
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub async fn locate(&mut self) -> Result<GeoCoordinate, LocationError> {
        if let Some((coord, at)) = self.cached {
            if at.elapsed() < self.options.maximum_age {
                debug!("using cached location");
                return Ok(coord);
            }
        }

        let request = self.source.current_position(&self.options);
        let coord = match tokio::time::timeout(self.options.timeout, request).await {
            Ok(result) => result?,
            Err(_) => return Err(LocationError::Timeout),
        };
        self.cached = Some((coord, Instant::now()));
        Ok(coord)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::{
        FixedPosition, LocationError, LocationService, NoPosition, PositionOptions, PositionSource,
    };
    use foundation::math::GeoCoordinate;
    use std::cell::Cell;
    use std::time::Duration;

    /// Answers after `delay`, counting requests.
    pub(crate) struct SlowPosition {
        pub coord: GeoCoordinate,
        pub delay: Duration,
        pub calls: Cell<u32>,
    }

    impl SlowPosition {
        pub(crate) fn new(coord: GeoCoordinate, delay: Duration) -> Self {
            Self {
                coord,
                delay,
                calls: Cell::new(0),
            }
        }
    }

    impl PositionSource for SlowPosition {
        async fn current_position(&self, _opts: &PositionOptions) -> Result<GeoCoordinate, LocationError> {
            self.calls.set(self.calls.get() + 1);
            tokio::time::sleep(self.delay).await;
            Ok(self.coord)
        }
    }

    pub(crate) fn options() -> PositionOptions {
        PositionOptions {
            high_accuracy: true,
            timeout: Duration::from_secs(5),
            maximum_age: Duration::from_secs(60),
        }
    }

    pub(crate) fn nyc() -> GeoCoordinate {
        GeoCoordinate::new(40.7128, -74.0060).unwrap()
    }

    #[tokio::test]
    async fn fixed_source_resolves() {
        let mut svc = LocationService::new(FixedPosition(nyc()), options());
        assert_eq!(svc.locate().await, Ok(nyc()));
    }

    #[tokio::test]
    async fn unsupported_source_errors() {
        let mut svc = LocationService::new(NoPosition, options());
        assert_eq!(svc.locate().await, Err(LocationError::Unsupported));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_source_times_out() {
        let source = SlowPosition::new(nyc(), Duration::from_secs(10));
        let mut svc = LocationService::new(source, options());
        assert_eq!(svc.locate().await, Err(LocationError::Timeout));
    }

    #[tokio::test(start_paused = true)]
    async fn cached_fix_is_reused_until_it_expires() {
        let source = SlowPosition::new(nyc(), Duration::from_secs(1));
        let mut svc = LocationService::new(source, options());

        assert_eq!(svc.locate().await, Ok(nyc()));
        tokio::time::advance(Duration::from_secs(30)).await;
        assert_eq!(svc.locate().await, Ok(nyc()));
        assert_eq!(svc.source().calls.get(), 1);

        tokio::time::advance(Duration::from_secs(31)).await;
        assert_eq!(svc.locate().await, Ok(nyc()));
        assert_eq!(svc.source().calls.get(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_maximum_age_always_requests_a_fresh_fix() {
        let source = SlowPosition::new(nyc(), Duration::ZERO);
        let opts = PositionOptions {
            maximum_age: Duration::ZERO,
            ..options()
        };
        let mut svc = LocationService::new(source, opts);

        assert_eq!(svc.locate().await, Ok(nyc()));
        assert_eq!(svc.locate().await, Ok(nyc()));
        assert_eq!(svc.source().calls.get(), 2);
    }
}
