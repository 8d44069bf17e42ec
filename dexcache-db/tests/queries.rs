use dexcache_catalog::types::*;
use dexcache_db::*;

fn insert(conn: &Connection, id: i64, name: &str, types: &[&str]) {
    upsert_entry(
        conn,
        &EntryFields {
            id,
            name: name.to_string(),
            height: 10,
            weight: 100,
            sprites: Sprites::default(),
            stats: StatUpdate::default(),
        },
    )
    .unwrap();
    set_relations(conn, id, types, &[]).unwrap();
}

fn seeded() -> Connection {
    let conn = open_memory().unwrap();
    insert(&conn, 6, "charizard", &["Fire", "flying"]);
    insert(&conn, 4, "charmander", &["fire"]);
    insert(&conn, 7, "squirtle", &["water"]);
    insert(&conn, 1, "bulbasaur", &["grass", "poison"]);
    conn
}

fn ids(records: &[EntryRecord]) -> Vec<i64> {
    records.iter().map(|r| r.entry.id).collect()
}

#[test]
fn empty_store_has_no_entries() {
    let conn = open_memory().unwrap();
    assert!(!entries_exist(&conn).unwrap());
    assert!(get_entry_record(&conn, 1).unwrap().is_none());
}

#[test]
fn list_orders_by_id() {
    let conn = seeded();
    assert!(entries_exist(&conn).unwrap());
    let all = list_entries(&conn, &ListFilter::default(), 0, 100).unwrap();
    assert_eq!(ids(&all), vec![1, 4, 6, 7]);
}

#[test]
fn list_paginates_with_offset_and_limit() {
    let conn = seeded();
    let page = list_entries(&conn, &ListFilter::default(), 1, 2).unwrap();
    assert_eq!(ids(&page), vec![4, 6]);
    assert_eq!(count_entries(&conn, &ListFilter::default()).unwrap(), 4);
}

#[test]
fn name_filter_is_case_insensitive_substring() {
    let conn = seeded();
    let filter = ListFilter {
        name_contains: Some("CHAR".to_string()),
        ..Default::default()
    };
    let found = list_entries(&conn, &filter, 0, 100).unwrap();
    assert_eq!(ids(&found), vec![4, 6]);
    assert_eq!(count_entries(&conn, &filter).unwrap(), 2);
}

#[test]
fn name_filter_treats_wildcards_literally() {
    let conn = seeded();
    let filter = ListFilter {
        name_contains: Some("%".to_string()),
        ..Default::default()
    };
    assert!(list_entries(&conn, &filter, 0, 100).unwrap().is_empty());
}

#[test]
fn type_filter_matches_regardless_of_case() {
    let conn = seeded();
    let filter = ListFilter {
        type_equals: Some("FIRE".to_string()),
        ..Default::default()
    };
    let found = list_entries(&conn, &filter, 0, 100).unwrap();
    assert_eq!(ids(&found), vec![4, 6]);
    for record in &found {
        assert!(
            record
                .types
                .iter()
                .any(|t| t.name.eq_ignore_ascii_case("fire"))
        );
    }
}

#[test]
fn type_filter_is_exact_not_substring() {
    let conn = seeded();
    let filter = ListFilter {
        type_equals: Some("fir".to_string()),
        ..Default::default()
    };
    assert!(list_entries(&conn, &filter, 0, 100).unwrap().is_empty());
}

#[test]
fn favorites_filter_combines_with_others() {
    let conn = seeded();
    toggle_favorite(&conn, 6).unwrap();
    toggle_favorite(&conn, 7).unwrap();

    let favorites = ListFilter {
        favorites_only: true,
        ..Default::default()
    };
    assert_eq!(ids(&list_entries(&conn, &favorites, 0, 100).unwrap()), vec![6, 7]);

    let fire_favorites = ListFilter {
        type_equals: Some("fire".to_string()),
        favorites_only: true,
        ..Default::default()
    };
    assert_eq!(
        ids(&list_entries(&conn, &fire_favorites, 0, 100).unwrap()),
        vec![6]
    );
}

#[test]
fn record_includes_relations_in_slot_order() {
    let conn = seeded();
    let record = get_entry_record(&conn, 6).unwrap().unwrap();
    assert_eq!(record.type_names(), vec!["Fire", "flying"]);
}

#[test]
fn type_names_are_sorted_and_distinct() {
    let conn = seeded();
    assert_eq!(
        list_type_names(&conn).unwrap(),
        vec!["Fire", "flying", "grass", "poison", "water"]
    );
}

#[test]
fn stats_count_everything() {
    let conn = seeded();
    toggle_favorite(&conn, 1).unwrap();
    let stats = catalog_stats(&conn).unwrap();
    assert_eq!(stats.entries, 4);
    assert_eq!(stats.favorites, 1);
    assert_eq!(stats.types, 5);
    assert_eq!(stats.abilities, 0);
    assert_eq!(stats.imports, 0);
}
