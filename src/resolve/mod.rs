//! Place resolution
//!
//! Turns a batch of free-text queries into coordinates in three steps:
//!
//! 1. Literal `lat,lng` queries resolve locally with no outbound call.
//! 2. Everything else goes to the fast geocoder, all queries at once.
//! 3. Whatever the fast geocoder could not place goes to the fallback
//!    geocoder one query at a time, with a pause between calls, up to a
//!    per-request cap.
//!
//! The batch is all-or-nothing: each position ends as a [`Slot`], and
//! [`collect_all`] either returns every place in input order or the error
//! for the first position that failed.

use crate::config::{Config, ResolverConfig};
use crate::constants::limits::MAX_QUERIES;
use crate::error::{Error, Result};
use crate::geo::latlng::parse_literal;
use crate::geo::nominatim::NominatimBackend;
use crate::geo::photon::PhotonBackend;
use crate::geo::{Coordinates, GeoLocation, Geocoder, Provider, Region};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

/// One resolved query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedPlace {
    /// The query as it was looked up (trimmed)
    pub input: String,
    /// Label shown to the user
    pub display: String,
    pub lat: f64,
    pub lng: f64,
    /// Which source produced the coordinate
    pub provider: Provider,
}

impl ResolvedPlace {
    /// A place taken verbatim from a literal coordinate query
    pub fn literal(query: &str, coords: Coordinates) -> Self {
        Self {
            input: query.to_string(),
            display: query.to_string(),
            lat: coords.lat,
            lng: coords.lng,
            provider: Provider::LatLng,
        }
    }

    /// A place returned by a geocoder
    pub fn located(query: &str, location: GeoLocation, provider: Provider) -> Self {
        Self {
            input: query.to_string(),
            display: location.display_name,
            lat: location.lat,
            lng: location.lng,
            provider,
        }
    }
}

/// Why a single position in the batch has no place
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryFailure {
    /// Nothing left to look up once trimmed
    Empty,
    /// The provider answered without a usable candidate
    NotFound,
    /// The provider call failed
    Upstream(String),
    /// The per-request fallback cap was used up before this query
    FallbackCapReached,
}

impl QueryFailure {
    /// Whether the fallback geocoder should still be tried
    fn wants_fallback(&self) -> bool {
        matches!(self, Self::NotFound | Self::Upstream(_))
    }
}

/// Outcome for one position in the batch
pub type Slot = std::result::Result<ResolvedPlace, QueryFailure>;

/// Tuning for the fallback phase
#[derive(Debug, Clone)]
pub struct ResolverSettings {
    /// Most queries sent to the fallback geocoder per request
    pub max_fallback: usize,
    /// Pause before every fallback call except the first
    pub fallback_delay: Duration,
    /// Language of the unresolved-query message
    pub language: String,
}

impl From<&ResolverConfig> for ResolverSettings {
    fn from(config: &ResolverConfig) -> Self {
        Self {
            max_fallback: config.max_fallback,
            fallback_delay: config.fallback_delay(),
            language: config.language.clone(),
        }
    }
}

/// Resolver over a fast and a fallback geocoder
#[derive(Debug)]
pub struct Resolver<F, B> {
    fast: F,
    fallback: B,
    settings: ResolverSettings,
}

/// The resolver wired to the real HTTP providers
pub type HttpResolver = Resolver<PhotonBackend, NominatimBackend>;

impl HttpResolver {
    /// Build Photon + Nominatim backends from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            PhotonBackend::new(&config.providers)?,
            NominatimBackend::new(&config.providers, &config.resolver.language)?,
            ResolverSettings::from(&config.resolver),
        ))
    }
}

impl<F: Geocoder, B: Geocoder> Resolver<F, B> {
    pub fn new(fast: F, fallback: B, settings: ResolverSettings) -> Self {
        Self {
            fast,
            fallback,
            settings,
        }
    }

    /// Resolve every query or fail the whole batch
    pub async fn resolve(&self, queries: &[String], region: Region) -> Result<Vec<ResolvedPlace>> {
        check_batch_size(queries.len())?;
        info!(queries = queries.len(), %region, "resolving places");

        let trimmed: Vec<&str> = queries.iter().map(|q| q.trim()).collect();

        let mut slots = Vec::with_capacity(trimmed.len());
        let mut lookups = Vec::new();
        for (i, query) in trimmed.iter().enumerate() {
            if query.is_empty() {
                slots.push(Err(QueryFailure::Empty));
            } else if let Some(coords) = parse_literal(query) {
                slots.push(Ok(ResolvedPlace::literal(query, coords)));
            } else {
                slots.push(Err(QueryFailure::NotFound));
                lookups.push(i);
            }
        }

        self.fast_phase(&trimmed, &lookups, region, &mut slots).await;
        self.fallback_phase(&trimmed, region, &mut slots).await?;

        collect_all(queries, slots, &self.settings.language)
    }

    /// Look up every index concurrently; completion order does not matter
    async fn fast_phase(&self, queries: &[&str], lookups: &[usize], region: Region, slots: &mut [Slot]) {
        if lookups.is_empty() {
            return;
        }
        debug!(count = lookups.len(), "fast phase");

        let outcomes = join_all(lookups.iter().map(|&i| {
            let query = queries[i];
            async move { (i, lookup(&self.fast, query, region).await) }
        }))
        .await;

        for (i, outcome) in outcomes {
            slots[i] = outcome;
        }
    }

    /// Retry what the fast phase missed, strictly one call at a time
    ///
    /// A fallback provider error ends the whole request; an empty or
    /// unusable answer only leaves that query unresolved.
    async fn fallback_phase(&self, queries: &[&str], region: Region, slots: &mut [Slot]) -> Result<()> {
        let pending: Vec<usize> = slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.as_ref().is_err_and(QueryFailure::wants_fallback))
            .map(|(i, _)| i)
            .collect();
        if pending.is_empty() {
            return Ok(());
        }

        let cap = pending.len().min(self.settings.max_fallback);
        let (attempted, skipped) = pending.split_at(cap);
        if !skipped.is_empty() {
            warn!(
                skipped = skipped.len(),
                cap = self.settings.max_fallback,
                "fallback cap reached"
            );
        }
        for &i in skipped {
            slots[i] = Err(QueryFailure::FallbackCapReached);
        }

        debug!(count = attempted.len(), "fallback phase");
        for (k, &i) in attempted.iter().enumerate() {
            if k > 0 {
                tokio::time::sleep(self.settings.fallback_delay).await;
            }
            let query = queries[i];
            let found = self
                .fallback
                .geocode(query, region)
                .await
                .inspect_err(|e| warn!(%query, error = %e, "fallback lookup failed"))?;
            slots[i] = found_slot(&self.fallback, query, found);
        }
        Ok(())
    }
}

/// One fast-phase call folded into a slot; errors only mark the query
async fn lookup<G: Geocoder>(geocoder: &G, query: &str, region: Region) -> Slot {
    match geocoder.geocode(query, region).await {
        Ok(found) => found_slot(geocoder, query, found),
        Err(e) => {
            warn!(%query, provider = %geocoder.provider(), error = %e, "lookup failed");
            Err(QueryFailure::Upstream(e.to_string()))
        }
    }
}

fn found_slot<G: Geocoder>(geocoder: &G, query: &str, found: Option<GeoLocation>) -> Slot {
    match found {
        Some(location) => Ok(ResolvedPlace::located(query, location, geocoder.provider())),
        None => {
            debug!(%query, provider = %geocoder.provider(), "no candidate");
            Err(QueryFailure::NotFound)
        }
    }
}

/// Reject empty and oversized batches
pub fn check_batch_size(len: usize) -> Result<()> {
    if len == 0 {
        return Err(Error::Validation("Missing queries[]".to_string()));
    }
    if len > MAX_QUERIES {
        return Err(Error::Validation(format!("Max {} queries", MAX_QUERIES)));
    }
    Ok(())
}

/// Every place in input order, or the error for the first failed position
///
/// `queries` are the original, untrimmed texts used in the error message.
pub fn collect_all(queries: &[String], slots: Vec<Slot>, language: &str) -> Result<Vec<ResolvedPlace>> {
    queries
        .iter()
        .zip(slots)
        .map(|(query, slot)| {
            slot.map_err(|failure| {
                info!(%query, ?failure, "query unresolved");
                Error::Unresolved {
                    query: query.clone(),
                    message: unresolved_message(language, query),
                }
            })
        })
        .collect()
}

/// User-facing message for a query no provider could place
pub fn unresolved_message(language: &str, query: &str) -> String {
    if language.eq_ignore_ascii_case("he") {
        format!(
            "לא הצלחתי לזהות את היעד: \"{}\". נסה להוסיף עיר/אזור (למשל: תל אביב) או שם מדויק יותר.",
            query
        )
    } else {
        format!(
            "Could not identify the destination: \"{}\". Try adding a city or area (e.g. Tel Aviv) or a more precise name.",
            query
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Instant;

    enum Answer {
        Found(f64, f64, &'static str),
        Fail(&'static str),
    }

    /// In-memory geocoder that records every call
    struct FakeGeocoder {
        provider: Provider,
        answers: HashMap<String, Answer>,
        calls: Mutex<Vec<(String, Region)>>,
        latency: Duration,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl FakeGeocoder {
        fn new(provider: Provider) -> Self {
            Self {
                provider,
                answers: HashMap::new(),
                calls: Mutex::new(Vec::new()),
                latency: Duration::ZERO,
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
            }
        }

        fn found(mut self, query: &str, lat: f64, lng: f64, label: &'static str) -> Self {
            self.answers.insert(query.to_string(), Answer::Found(lat, lng, label));
            self
        }

        fn failing(mut self, query: &str, reason: &'static str) -> Self {
            self.answers.insert(query.to_string(), Answer::Fail(reason));
            self
        }

        fn with_latency(mut self, latency: Duration) -> Self {
            self.latency = latency;
            self
        }

        fn calls(&self) -> Vec<(String, Region)> {
            self.calls.lock().unwrap().clone()
        }

        fn queries(&self) -> Vec<String> {
            self.calls().into_iter().map(|(q, _)| q).collect()
        }
    }

    impl Geocoder for FakeGeocoder {
        fn provider(&self) -> Provider {
            self.provider
        }

        async fn geocode(&self, query: &str, region: Region) -> Result<Option<GeoLocation>> {
            self.calls.lock().unwrap().push((query.to_string(), region));

            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(self.latency).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            match self.answers.get(query) {
                Some(Answer::Found(lat, lng, label)) => Ok(Some(GeoLocation {
                    lat: *lat,
                    lng: *lng,
                    display_name: label.to_string(),
                })),
                Some(Answer::Fail(reason)) => Err(Error::Upstream(reason.to_string())),
                None => Ok(None),
            }
        }
    }

    fn settings() -> ResolverSettings {
        ResolverSettings {
            max_fallback: 8,
            fallback_delay: Duration::ZERO,
            language: "en".to_string(),
        }
    }

    fn resolver(fast: FakeGeocoder, fallback: FakeGeocoder) -> Resolver<FakeGeocoder, FakeGeocoder> {
        Resolver::new(fast, fallback, settings())
    }

    fn photon() -> FakeGeocoder {
        FakeGeocoder::new(Provider::Photon)
    }

    fn nominatim() -> FakeGeocoder {
        FakeGeocoder::new(Provider::Nominatim)
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_literal_coordinates_skip_providers() {
        let r = resolver(photon(), nominatim());

        let places = r
            .resolve(&strings(&["32.0853,34.7818", " 31.7683 35.2137 "]), Region::Any)
            .await
            .unwrap();

        assert_eq!(places.len(), 2);
        assert_eq!(places[0].provider, Provider::LatLng);
        assert_relative_eq!(places[0].lat, 32.0853);
        assert_relative_eq!(places[0].lng, 34.7818);
        assert_eq!(places[1].input, "31.7683 35.2137");
        assert_eq!(places[1].display, "31.7683 35.2137");
        assert!(r.fast.calls().is_empty());
        assert!(r.fallback.calls().is_empty());
    }

    #[tokio::test]
    async fn test_out_of_range_pair_is_free_text() {
        let r = resolver(photon().found("91,200", 10.0, 20.0, "Somewhere"), nominatim());

        let places = r.resolve(&strings(&["91,200"]), Region::Any).await.unwrap();

        assert_eq!(places[0].provider, Provider::Photon);
        assert_eq!(r.fast.queries(), vec!["91,200"]);
    }

    #[tokio::test]
    async fn test_fast_hit_needs_no_fallback() {
        let r = resolver(
            photon().found("Haifa", 32.794, 34.9896, "Haifa, Israel"),
            nominatim(),
        );

        let places = r.resolve(&strings(&["  Haifa "]), Region::Israel).await.unwrap();

        assert_eq!(
            places,
            vec![ResolvedPlace {
                input: "Haifa".to_string(),
                display: "Haifa, Israel".to_string(),
                lat: 32.794,
                lng: 34.9896,
                provider: Provider::Photon,
            }]
        );
        assert_eq!(r.fast.calls(), vec![("Haifa".to_string(), Region::Israel)]);
        assert!(r.fallback.calls().is_empty());
    }

    #[tokio::test]
    async fn test_fast_miss_goes_to_fallback() {
        let r = resolver(
            photon(),
            nominatim().found("Ein Gedi", 31.46, 35.39, "עין גדי"),
        );

        let places = r.resolve(&strings(&["Ein Gedi"]), Region::Israel).await.unwrap();

        assert_eq!(places[0].provider, Provider::Nominatim);
        assert_eq!(places[0].display, "עין גדי");
        assert_eq!(r.fallback.calls(), vec![("Ein Gedi".to_string(), Region::Israel)]);
    }

    #[tokio::test]
    async fn test_fast_error_goes_to_fallback() {
        let r = resolver(
            photon().failing("Acre", "Photon HTTP 503"),
            nominatim().found("Acre", 32.92, 35.07, "Akko"),
        );

        let places = r.resolve(&strings(&["Acre"]), Region::Any).await.unwrap();

        assert_eq!(places[0].provider, Provider::Nominatim);
        assert_eq!(r.fallback.queries(), vec!["Acre"]);
    }

    #[tokio::test]
    async fn test_fallback_error_fails_request() {
        let r = resolver(
            photon().failing("Nowhere", "Photon HTTP 503"),
            nominatim()
                .failing("Nowhere", "Nominatim HTTP 429")
                .found("Acre", 32.92, 35.07, "Akko"),
        );

        let err = r
            .resolve(&strings(&["Nowhere", "Acre"]), Region::Any)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Nominatim HTTP 429");
        assert!(!err.is_client_error());
        // the failing call ends the loop
        assert_eq!(r.fallback.queries(), vec!["Nowhere"]);
    }

    #[tokio::test]
    async fn test_results_keep_input_order() {
        let r = resolver(
            photon()
                .found("a", 1.0, 1.0, "A")
                .found("c", 3.0, 3.0, "C")
                .with_latency(Duration::from_millis(5)),
            nominatim().found("b", 2.0, 2.0, "B"),
        );

        let places = r
            .resolve(&strings(&["a", "b", "4,4", "c"]), Region::Any)
            .await
            .unwrap();

        let labels: Vec<&str> = places.iter().map(|p| p.display.as_str()).collect();
        assert_eq!(labels, vec!["A", "B", "4,4", "C"]);
        let providers: Vec<Provider> = places.iter().map(|p| p.provider).collect();
        assert_eq!(
            providers,
            vec![Provider::Photon, Provider::Nominatim, Provider::LatLng, Provider::Photon]
        );
    }

    #[tokio::test]
    async fn test_fast_phase_runs_concurrently() {
        let r = resolver(
            photon().with_latency(Duration::from_millis(20)),
            nominatim().with_latency(Duration::from_millis(5)),
        );

        let queries = strings(&["p", "q", "r", "s", "t"]);
        let _ = r.resolve(&queries, Region::Any).await;

        assert_eq!(r.fast.max_in_flight.load(Ordering::SeqCst), 5);
        assert_eq!(r.fallback.calls().len(), 5);
        assert_eq!(r.fallback.max_in_flight.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fallback_is_sequential_in_input_order() {
        let r = resolver(photon(), nominatim());

        let queries = strings(&["x", "y", "z"]);
        let _ = r.resolve(&queries, Region::Any).await;

        assert_eq!(r.fallback.queries(), vec!["x", "y", "z"]);
    }

    #[tokio::test]
    async fn test_fallback_delay_between_calls() {
        let delay = Duration::from_millis(30);
        let r = Resolver::new(
            photon(),
            nominatim()
                .found("x", 1.0, 1.0, "X")
                .found("y", 2.0, 2.0, "Y")
                .found("z", 3.0, 3.0, "Z"),
            ResolverSettings {
                fallback_delay: delay,
                ..settings()
            },
        );

        let start = Instant::now();
        r.resolve(&strings(&["x", "y", "z"]), Region::Any).await.unwrap();

        // no delay before the first call, one before each of the other two
        assert!(start.elapsed() >= delay * 2);
    }

    #[tokio::test]
    async fn test_fallback_cap() {
        let mut fallback = nominatim();
        let queries: Vec<String> = (0..10).map(|i| format!("place {}", i)).collect();
        for q in &queries {
            fallback = fallback.found(q, 1.0, 1.0, "found");
        }
        let r = resolver(photon(), fallback);

        let err = r.resolve(&queries, Region::Any).await.unwrap_err();

        assert_eq!(r.fallback.calls().len(), 8);
        assert_eq!(r.fallback.queries(), queries[..8].to_vec());
        match err {
            Error::Unresolved { query, .. } => assert_eq!(query, "place 8"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_configurable_fallback_cap() {
        let r = Resolver::new(
            photon(),
            nominatim(),
            ResolverSettings {
                max_fallback: 2,
                ..settings()
            },
        );

        let _ = r.resolve(&strings(&["a", "b", "c", "d"]), Region::Any).await;

        assert_eq!(r.fallback.queries(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_error_names_first_unresolved_query() {
        let r = resolver(photon().found("known", 1.0, 1.0, "Known"), nominatim());

        let err = r
            .resolve(&strings(&["known", "  first miss ", "second miss"]), Region::Any)
            .await
            .unwrap_err();

        match err {
            Error::Unresolved { query, message } => {
                assert_eq!(query, "  first miss ");
                assert!(message.contains("first miss"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_query_fails_without_calls() {
        let r = resolver(photon(), nominatim());

        let err = r.resolve(&strings(&["   "]), Region::Any).await.unwrap_err();

        assert!(matches!(err, Error::Unresolved { .. }));
        assert!(r.fast.calls().is_empty());
        assert!(r.fallback.calls().is_empty());
    }

    #[tokio::test]
    async fn test_batch_size_limits() {
        let r = resolver(photon(), nominatim());

        let err = r.resolve(&[], Region::Any).await.unwrap_err();
        assert_eq!(err.to_string(), "Missing queries[]");

        let too_many: Vec<String> = (0..21).map(|i| format!("{},{}", i, i)).collect();
        let err = r.resolve(&too_many, Region::Any).await.unwrap_err();
        assert_eq!(err.to_string(), "Max 20 queries");
        assert!(err.is_client_error());

        let twenty: Vec<String> = (0..20).map(|i| format!("{},{}", i, i)).collect();
        assert_eq!(r.resolve(&twenty, Region::Any).await.unwrap().len(), 20);
    }

    #[test]
    fn test_collect_all_returns_first_failure() {
        let queries = strings(&["ok", "bad", "worse"]);
        let place = ResolvedPlace::literal("1,1", Coordinates::new(1.0, 1.0));
        let slots = vec![
            Ok(place),
            Err(QueryFailure::NotFound),
            Err(QueryFailure::FallbackCapReached),
        ];

        match collect_all(&queries, slots, "en").unwrap_err() {
            Error::Unresolved { query, .. } => assert_eq!(query, "bad"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_collect_all_success() {
        let queries = strings(&["1,1", "2,2"]);
        let slots = vec![
            Ok(ResolvedPlace::literal("1,1", Coordinates::new(1.0, 1.0))),
            Ok(ResolvedPlace::literal("2,2", Coordinates::new(2.0, 2.0))),
        ];

        let places = collect_all(&queries, slots, "en").unwrap();
        assert_eq!(places.len(), 2);
        assert_eq!(places[1].input, "2,2");
    }

    #[test]
    fn test_unresolved_message_languages() {
        let he = unresolved_message("he", "Springfield");
        assert!(he.starts_with("לא הצלחתי לזהות את היעד"));
        assert!(he.contains("\"Springfield\""));

        let en = unresolved_message("en", "Springfield");
        assert!(en.starts_with("Could not identify the destination"));
        assert!(en.contains("\"Springfield\""));
    }

    #[test]
    fn test_wants_fallback() {
        assert!(QueryFailure::NotFound.wants_fallback());
        assert!(QueryFailure::Upstream("x".to_string()).wants_fallback());
        assert!(!QueryFailure::Empty.wants_fallback());
        assert!(!QueryFailure::FallbackCapReached.wants_fallback());
    }

    #[test]
    fn test_place_serialization() {
        let place = ResolvedPlace::literal("32,35", Coordinates::new(32.0, 35.0));
        let json = serde_json::to_value(&place).unwrap();
        assert_eq!(json["provider"], "latlng");
        assert_eq!(json["input"], "32,35");
        assert_eq!(json["lat"], 32.0);
    }
}
