mod support;

use std::sync::Arc;

use support::{Reply, StubTransport};
use tunes_core::{
    CatalogClient, CatalogSettings, NetworkError, RequestPipeline,
};
use tunes_model::{
    ArtistId, CatalogItem, ItemKind, MediaKind, WrapperType,
};

const ARTIST_INFO: &str = "https://itunes.apple.com/lookup?id=909253";

const JACK_JOHNSON: &str = r#"{
    "resultCount": 1,
    "results": [{
        "wrapperType": "artist",
        "artistType": "Artist",
        "artistName": "Jack Johnson",
        "artistId": 909253,
        "amgArtistId": 468749,
        "primaryGenreName": "Rock"
    }]
}"#;

fn works_body(count: usize) -> String {
    let results: Vec<String> = (0..count)
        .map(|i| {
            format!(
                r#"{{"wrapperType":"track","kind":"song","artistId":909253,"trackId":{},"trackName":"Track {}"}}"#,
                1000 + i,
                i
            )
        })
        .collect();
    format!(
        r#"{{"resultCount":{},"results":[{}]}}"#,
        count,
        results.join(",")
    )
}

fn song_by_jack() -> CatalogItem {
    let mut item = CatalogItem::new(WrapperType::Track);
    item.kind = Some(ItemKind::Song);
    item.artist_id = Some(ArtistId(909253));
    item.track_name = Some("Upside Down".into());
    item
}

fn client(transport: Arc<StubTransport>) -> CatalogClient {
    CatalogClient::new(
        RequestPipeline::new(transport),
        CatalogSettings::default(),
    )
}

#[tokio::test]
async fn profile_prefers_amg_id_and_truncates_works() {
    let works_url = "https://itunes.apple.com/lookup?amgArtistId=468749&entity=song&limit=5&sort=recent";
    let transport = Arc::new(
        StubTransport::new()
            .route(ARTIST_INFO, Reply::json(JACK_JOHNSON))
            .route(works_url, Reply::json(&works_body(7))),
    );

    let profile = client(Arc::clone(&transport))
        .artist_profile(&song_by_jack())
        .await
        .expect("lookup succeeds")
        .expect("item has an artist");

    let artist = profile.artist.expect("artist found");
    assert_eq!(artist.artist_name.as_deref(), Some("Jack Johnson"));
    assert_eq!(profile.works.len(), 5);
    assert_eq!(profile.works[0].display_title(), "Track 0");
    assert_eq!(
        transport.requests(),
        vec![ARTIST_INFO.to_string(), works_url.to_string()]
    );
}

#[tokio::test]
async fn empty_artist_lookup_falls_back_to_plain_id() {
    let works_url = "https://itunes.apple.com/lookup?id=909253&entity=all&limit=5&sort=recent";
    let transport = Arc::new(
        StubTransport::new()
            .route(ARTIST_INFO, Reply::json(r#"{"resultCount":0,"results":[]}"#))
            .route(works_url, Reply::json(&works_body(2))),
    );
    let mut item = song_by_jack();
    item.kind = None;

    let profile = client(Arc::clone(&transport))
        .artist_profile(&item)
        .await
        .expect("lookup succeeds")
        .expect("item has an artist");

    assert!(profile.artist.is_none());
    assert_eq!(profile.works.len(), 2);
    assert_eq!(transport.calls_for(works_url), 1);
}

#[tokio::test]
async fn item_without_artist_needs_no_lookup() {
    let transport = Arc::new(StubTransport::new());
    let item = CatalogItem::new(WrapperType::Collection);

    let profile = client(Arc::clone(&transport))
        .artist_profile(&item)
        .await
        .expect("nothing to fail");

    assert!(profile.is_none());
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn failed_artist_lookup_stops_the_flow() {
    let transport = Arc::new(
        StubTransport::new()
            .route(ARTIST_INFO, Reply::Status(500, b"oops".to_vec())),
    );

    let err = client(Arc::clone(&transport))
        .artist_profile(&song_by_jack())
        .await
        .expect_err("server error");

    assert_eq!(err, NetworkError::BadResponse { status: Some(500) });
    assert_eq!(transport.calls(), 1);
}

#[tokio::test]
async fn search_returns_every_result_it_receives() {
    let url = "https://itunes.apple.com/search?term=jack%20johnson&media=music&limit=20";
    let transport =
        Arc::new(StubTransport::new().route(url, Reply::json(&works_body(3))));

    let items = client(Arc::clone(&transport))
        .search("jack johnson", MediaKind::Music, 20)
        .await
        .expect("search succeeds");

    assert_eq!(items.len(), 3);
    assert!(items.iter().all(|item| item.kind == Some(ItemKind::Song)));
}

#[tokio::test]
async fn custom_base_url_reaches_every_route() {
    let transport = Arc::new(StubTransport::new().route(
        "http://127.0.0.1:9000/lookup?id=909253",
        Reply::json(JACK_JOHNSON),
    ));
    let settings = CatalogSettings {
        base_url: "http://127.0.0.1:9000".into(),
        ..CatalogSettings::default()
    };
    let client = CatalogClient::new(RequestPipeline::new(transport), settings);

    let artist = client
        .artist_info(ArtistId(909253))
        .await
        .expect("lookup succeeds");
    assert!(artist.is_some());
}
