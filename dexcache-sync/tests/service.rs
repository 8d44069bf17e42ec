mod common;

use common::*;
use dexcache_db::*;
use dexcache_sync::*;

fn service<'a>(conn: &'a Connection, source: &'a FakeSource) -> QueryService<'a, FakeSource> {
    QueryService::new(conn, source, ServiceOptions::default()).with_progress(&SilentProgress)
}

#[tokio::test]
async fn first_listing_bootstraps_then_reads_locally() {
    let conn = open_memory().unwrap();
    let source = starter_source();
    let svc = service(&conn, &source);

    let page = svc.list_entries(&ListQuery::default()).await.unwrap();
    assert_eq!(page.count, 3);
    assert_eq!(page.results.len(), 3);
    let calls_after_bootstrap = source.call_count();

    // Store is populated now; neither listing nor lookup goes upstream
    svc.list_entries(&ListQuery::default()).await.unwrap();
    let record = svc.get_entry(4).await.unwrap();
    assert_eq!(record.entry.name, "charmander");
    assert_eq!(source.call_count(), calls_after_bootstrap);
}

#[tokio::test]
async fn listing_with_unavailable_upstream_is_empty() {
    let conn = open_memory().unwrap();
    let source = FakeSource::new().with_page_down();
    let svc = service(&conn, &source);

    let page = svc.list_entries(&ListQuery::default()).await.unwrap();
    assert_eq!(page.count, 0);
    assert_eq!(page.num_pages, 1);
    assert!(page.results.is_empty());
    assert!(!page.has_next);
}

#[tokio::test]
async fn type_filter_ignores_case() {
    let conn = open_memory().unwrap();
    let source = starter_source();
    let svc = service(&conn, &source);

    let query = ListQuery {
        type_name: Some("FIRE".to_string()),
        ..Default::default()
    };
    let page = svc.list_entries(&query).await.unwrap();
    assert_eq!(page.count, 1);
    assert_eq!(page.results[0].entry.id, 4);
    assert!(
        page.results[0]
            .types
            .iter()
            .any(|t| t.name.eq_ignore_ascii_case("fire"))
    );
}

#[tokio::test]
async fn name_filter_matches_substring() {
    let conn = open_memory().unwrap();
    let source = starter_source();
    let svc = service(&conn, &source);

    let query = ListQuery {
        name: Some("SAUR".to_string()),
        ..Default::default()
    };
    let page = svc.list_entries(&query).await.unwrap();
    assert_eq!(page.count, 1);
    assert_eq!(page.results[0].entry.name, "bulbasaur");
}

#[tokio::test]
async fn pagination_is_one_based_and_bounded() {
    let conn = open_memory().unwrap();
    let source = starter_source();
    let svc = service(&conn, &source);

    let first = svc
        .list_entries(&ListQuery {
            page_size: Some(2),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(first.num_pages, 2);
    assert!(first.has_next);
    assert!(!first.has_previous);
    assert_eq!(first.results.len(), 2);

    let second = svc
        .list_entries(&ListQuery {
            page: 2,
            page_size: Some(2),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(second.results.len(), 1);
    assert_eq!(second.results[0].entry.id, 7);
    assert!(second.has_previous);

    let past_end = svc
        .list_entries(&ListQuery {
            page: 3,
            page_size: Some(2),
            ..Default::default()
        })
        .await;
    assert!(matches!(past_end, Err(QueryError::InvalidPage(3))));

    let zero = svc
        .list_entries(&ListQuery {
            page: 0,
            ..Default::default()
        })
        .await;
    assert!(matches!(zero, Err(QueryError::InvalidPage(0))));
}

#[tokio::test]
async fn get_entry_miss_fetches_and_stores() {
    let conn = open_memory().unwrap();
    let source = starter_source();
    let svc = service(&conn, &source);

    let record = svc.get_entry(7).await.unwrap();
    assert_eq!(record.entry.name, "squirtle");
    assert_eq!(record.abilities[1].name, "rain dish");
    assert_eq!(source.calls(), vec!["entry 7"]);

    // Second read is served from the store
    svc.get_entry(7).await.unwrap();
    assert_eq!(source.call_count(), 1);
}

#[tokio::test]
async fn get_entry_unknown_upstream_is_not_found() {
    let conn = open_memory().unwrap();
    let source = starter_source();
    let svc = service(&conn, &source);

    let err = svc.get_entry(9999).await.unwrap_err();
    assert!(matches!(err, QueryError::EntryNotFound(9999)));
    assert!(!entries_exist(&conn).unwrap());
}

#[tokio::test]
async fn get_entry_upstream_outage_is_not_found() {
    let conn = open_memory().unwrap();
    let source = FakeSource::new().with_failing(25, "pikachu");
    let svc = service(&conn, &source);

    let err = svc.get_entry(25).await.unwrap_err();
    assert!(matches!(err, QueryError::EntryNotFound(25)));
}

#[tokio::test]
async fn toggle_twice_restores_favorite() {
    let conn = open_memory().unwrap();
    let source = starter_source();
    let svc = service(&conn, &source);
    svc.get_entry(1).await.unwrap();

    assert!(svc.toggle_favorite(1).await.unwrap().entry.favorite);
    assert!(!svc.toggle_favorite(1).await.unwrap().entry.favorite);
    assert!(!get_entry(&conn, 1).unwrap().unwrap().favorite);
}

#[tokio::test]
async fn toggle_unknown_entry_fetches_and_favorites() {
    let conn = open_memory().unwrap();
    let source = starter_source();
    let svc = service(&conn, &source);

    let record = svc.toggle_favorite(4).await.unwrap();
    assert!(record.entry.favorite);
    assert_eq!(record.entry.name, "charmander");
    assert_eq!(source.calls(), vec!["entry 4"]);

    let favorites = svc.list_favorites(1, None).unwrap();
    assert_eq!(favorites.count, 1);
    assert_eq!(favorites.results[0].entry.id, 4);
}

#[tokio::test]
async fn toggle_missing_everywhere_is_not_found() {
    let conn = open_memory().unwrap();
    let source = FakeSource::new();
    let svc = service(&conn, &source);

    let err = svc.toggle_favorite(9999).await.unwrap_err();
    assert!(matches!(err, QueryError::EntryNotFound(9999)));
}

#[tokio::test]
async fn favorites_listing_never_bootstraps() {
    let conn = open_memory().unwrap();
    let source = starter_source();
    let svc = service(&conn, &source);

    let page = svc.list_favorites(1, None).unwrap();
    assert_eq!(page.count, 0);
    assert_eq!(source.call_count(), 0);
}

#[tokio::test]
async fn type_names_are_sorted() {
    let conn = open_memory().unwrap();
    let source = starter_source();
    let svc = service(&conn, &source);
    svc.bootstrap().await.unwrap();

    assert_eq!(
        svc.list_type_names().unwrap(),
        vec!["fire", "grass", "poison", "water"]
    );
}

#[tokio::test]
async fn get_entry_miss_maps_minimal_payload() {
    let conn = open_memory().unwrap();
    let body = r#"{
        "id": 9999, "name": "test", "height": 10, "weight": 10,
        "types": [{"type": {"name": "normal"}}],
        "abilities": [{"ability": {"name": "run-away"}, "is_hidden": false}],
        "stats": [{"stat": {"name": "hp"}, "base_stat": 45}],
        "sprites": {}
    }"#;
    let source = FakeSource::new().with_entry(9999, "test", body.to_string());
    let svc = service(&conn, &source);

    let record = svc.get_entry(9999).await.unwrap();
    assert_eq!(record.type_names(), vec!["normal"]);
    assert_eq!(record.abilities.len(), 1);
    assert_eq!(record.abilities[0].name, "run away");
    assert!(!record.abilities[0].is_hidden);
    assert_eq!(record.entry.stats.hp, 45);
    assert_eq!(record.entry.sprites, dexcache_catalog::Sprites::default());
    assert!(!record.entry.favorite);
}
