//! End-to-end tests for the pollen widget against mock tomorrow.io and
//! Nominatim servers.

use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use glance_core::{CacheRecord, CacheStore, Config};
use glance_pollen::data::{PollenRecord, CACHE_KEY, CACHE_NAMESPACE};
use glance_pollen::{
    render, HourlyInterval, PlaceNames, PollenForecast, PollenPayload, ResolvedLocation,
};
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn now() -> DateTime<Local> {
    Local.with_ymd_and_hms(2026, 5, 14, 10, 30, 0).unwrap()
}

fn midnight_utc(now: DateTime<Local>) -> DateTime<Utc> {
    let naive = now.date_naive().and_hms_opt(0, 0, 0).unwrap();
    Local.from_local_datetime(&naive).unwrap().with_timezone(&Utc)
}

/// 24 hourly intervals for today; the 10:00 hour reads tree 2, grass 4, weed 1.
fn timelines_body(now: DateTime<Local>) -> serde_json::Value {
    let start = midnight_utc(now);
    let intervals: Vec<_> = (0..24)
        .map(|h| {
            let (tree, grass, weed) = if h == 10 { (2, 4, 1) } else { (1, 0, 0) };
            serde_json::json!({
                "startTime": (start + Duration::hours(h)).to_rfc3339(),
                "values": { "treeIndex": tree, "grassIndex": grass, "weedIndex": weed }
            })
        })
        .collect();
    serde_json::json!({
        "data": { "timelines": [ { "timestep": "1h", "intervals": intervals } ] }
    })
}

async fn mount_geocoder(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "address": { "suburb": "Clifton", "city": "Bristol", "state": "England" }
        })))
        .mount(server)
        .await;
}

fn config(server: &MockServer, cache: &TempDir) -> Config {
    let mut config = Config::default();
    config.cache_dir = Some(cache.path().to_path_buf());
    config.pollen.api_key = "test-key".into();
    config.pollen.api_url = format!("{}/v4", server.uri());
    config.pollen.static_lat_lon = "51.45,-2.58".into();
    config.location.geocode_url = format!("{}/reverse", server.uri());
    config.location.geoip_url = format!("{}/json", server.uri());
    config
}

fn seed(cache: &TempDir, display_city: &str, updated: DateTime<Local>) {
    let store = CacheStore::new(cache.path(), CACHE_NAMESPACE);
    let start = now().with_timezone(&Utc) - Duration::minutes(30);
    let record = CacheRecord::new(
        PollenPayload {
            my_location: ResolvedLocation::new(
                51.45,
                -2.58,
                PlaceNames {
                    neighborhood: Some("Clifton".into()),
                    city: Some(display_city.into()),
                    region: None,
                },
            ),
            todays_pollen: PollenForecast::from_intervals(vec![HourlyInterval::new(
                start, 1, 0, 0,
            )]),
        },
        updated,
        updated,
    );
    store.save(CACHE_KEY, &record).unwrap();
}

fn load(cache: &TempDir) -> PollenRecord {
    CacheStore::new(cache.path(), CACHE_NAMESPACE)
        .load(CACHE_KEY)
        .unwrap()
}

#[tokio::test]
async fn test_first_run_fetches_and_caches() {
    let server = MockServer::start().await;
    let cache = TempDir::new().unwrap();
    mount_geocoder(&server).await;

    Mock::given(method("GET"))
        .and(path("/v4/timelines"))
        .and(query_param("location", "51.45,-2.58"))
        .and(query_param("timesteps", "1h"))
        .and(query_param("fields", "treeIndex,grassIndex,weedIndex"))
        .and(query_param("apikey", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(timelines_body(now())))
        .expect(1)
        .mount(&server)
        .await;

    let view = render(&config(&server, &cache), now()).await;

    assert!(!view.is_error(), "{:?}", view.error_text());
    assert_eq!(view.value_text(), Some("High"));
    assert_eq!(view.footer_texts()[0], "Clifton, Bristol");

    let record = load(&cache);
    assert_eq!(record.updated_time, now());
    assert_eq!(record.payload.todays_pollen.levels.len(), 24);
    assert_eq!(record.payload.todays_pollen.levels[10], 4);
}

#[tokio::test]
async fn test_fresh_cache_makes_no_requests() {
    let server = MockServer::start().await;
    let cache = TempDir::new().unwrap();
    seed(&cache, "Bristol", now() - Duration::minutes(30));

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let view = render(&config(&server, &cache), now()).await;

    assert_eq!(view.value_text(), Some("Very Low"));
    assert_eq!(load(&cache).accessed_time, now() - Duration::minutes(30));
}

#[tokio::test]
async fn test_stale_cache_same_location_is_marked_checked() {
    let server = MockServer::start().await;
    let cache = TempDir::new().unwrap();
    mount_geocoder(&server).await;
    let updated = now() - Duration::hours(2);
    seed(&cache, "Bristol", updated);

    Mock::given(method("GET"))
        .and(path("/v4/timelines"))
        .respond_with(ResponseTemplate::new(200).set_body_json(timelines_body(now())))
        .expect(0)
        .mount(&server)
        .await;

    let view = render(&config(&server, &cache), now()).await;
    assert!(!view.is_error());

    let record = load(&cache);
    assert_eq!(record.updated_time, updated);
    assert_eq!(record.accessed_time, now());
}

#[tokio::test]
async fn test_stale_check_keeps_place_name_when_geocoder_is_down() {
    let server = MockServer::start().await;
    let cache = TempDir::new().unwrap();
    let updated = now() - Duration::hours(2);
    seed(&cache, "Bristol", updated);

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v4/timelines"))
        .respond_with(ResponseTemplate::new(200).set_body_json(timelines_body(now())))
        .expect(0)
        .mount(&server)
        .await;

    let view = render(&config(&server, &cache), now()).await;
    assert_eq!(view.footer_texts()[0], "Clifton, Bristol");

    let record = load(&cache);
    assert_eq!(record.updated_time, updated);
    assert_eq!(record.payload.my_location.display_location, "Clifton, Bristol");
}

#[tokio::test]
async fn test_old_cache_is_refetched() {
    let server = MockServer::start().await;
    let cache = TempDir::new().unwrap();
    mount_geocoder(&server).await;
    seed(&cache, "Bristol", now() - Duration::hours(4));

    Mock::given(method("GET"))
        .and(path("/v4/timelines"))
        .respond_with(ResponseTemplate::new(200).set_body_json(timelines_body(now())))
        .expect(1)
        .mount(&server)
        .await;

    let view = render(&config(&server, &cache), now()).await;

    assert_eq!(view.value_text(), Some("High"));
    assert_eq!(load(&cache).updated_time, now());
}

#[tokio::test]
async fn test_moved_location_is_refetched() {
    let server = MockServer::start().await;
    let cache = TempDir::new().unwrap();
    mount_geocoder(&server).await;
    seed(&cache, "Bath", now() - Duration::hours(2));

    Mock::given(method("GET"))
        .and(path("/v4/timelines"))
        .respond_with(ResponseTemplate::new(200).set_body_json(timelines_body(now())))
        .expect(1)
        .mount(&server)
        .await;

    render(&config(&server, &cache), now()).await;

    assert_eq!(
        load(&cache).payload.my_location.display_location,
        "Clifton, Bristol"
    );
}

#[tokio::test]
async fn test_server_error_renders_error_view() {
    let server = MockServer::start().await;
    let cache = TempDir::new().unwrap();
    mount_geocoder(&server).await;

    Mock::given(method("GET"))
        .and(path("/v4/timelines"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid key"))
        .mount(&server)
        .await;

    let view = render(&config(&server, &cache), now()).await;

    assert!(view.is_error());
    assert!(view.error_text().unwrap().contains("401"));
    assert!(view.url.is_none());
    assert!(!CacheStore::new(cache.path(), CACHE_NAMESPACE).path_for(CACHE_KEY).exists());
}

#[tokio::test]
async fn test_empty_timelines_is_error() {
    let server = MockServer::start().await;
    let cache = TempDir::new().unwrap();
    mount_geocoder(&server).await;

    Mock::given(method("GET"))
        .and(path("/v4/timelines"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "data": { "timelines": [] } })),
        )
        .mount(&server)
        .await;

    let view = render(&config(&server, &cache), now()).await;
    assert!(view.error_text().unwrap().contains("data.timelines[0]"));
    assert_eq!(
        view.error_hint(),
        Some("Received unexpected data. Try again later.")
    );
}

#[tokio::test]
async fn test_ip_lookup_used_without_static_location() {
    let server = MockServer::start().await;
    let cache = TempDir::new().unwrap();
    mount_geocoder(&server).await;

    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "success", "lat": 51.45, "lon": -2.58
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v4/timelines"))
        .and(query_param("location", "51.45,-2.58"))
        .respond_with(ResponseTemplate::new(200).set_body_json(timelines_body(now())))
        .mount(&server)
        .await;

    let mut config = config(&server, &cache);
    config.pollen.static_lat_lon = String::new();

    let view = render(&config, now()).await;
    assert_eq!(view.value_text(), Some("High"));
}
