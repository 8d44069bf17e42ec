mod common;

use common::*;
use dexcache_catalog::types::*;
use dexcache_db::*;
use dexcache_sync::*;

#[test]
fn maps_stats_sprites_and_normalized_abilities() {
    let mapped = map_payload(&parse(&charmander()));

    assert_eq!(mapped.fields.id, 4);
    assert_eq!(mapped.fields.stats.get(StatKind::Hp), Some(39));
    assert_eq!(mapped.fields.stats.get(StatKind::Speed), Some(65));
    assert_eq!(mapped.fields.stats.get(StatKind::Attack), None);
    assert_eq!(
        mapped.fields.sprites.official_artwork.as_deref(),
        Some("https://img.test/art/4.png")
    );
    assert!(mapped.fields.sprites.back_default.is_none());
    assert_eq!(mapped.type_names, vec!["fire"]);
    assert_eq!(mapped.abilities[1].name, "solar power");
    assert!(mapped.abilities[1].is_hidden);
}

#[test]
fn unknown_stats_are_ignored() {
    let body = payload(9, "oddity", &[], &[], &[("hp", 10), ("accuracy", 100)]);
    let mapped = map_payload(&parse(&body));
    assert_eq!(mapped.fields.stats.get(StatKind::Hp), Some(10));
    assert_eq!(
        StatKind::ALL
            .iter()
            .filter(|k| mapped.fields.stats.get(**k).is_some())
            .count(),
        1
    );
}

#[test]
fn duplicate_references_collapse_to_first() {
    let body = payload(
        9,
        "oddity",
        &["Water", "water", "ice"],
        &[("swift-swim", false), ("swift-swim", true)],
        &[],
    );
    let mapped = map_payload(&parse(&body));
    assert_eq!(mapped.type_names, vec!["Water", "ice"]);
    assert_eq!(mapped.abilities.len(), 1);
    assert!(!mapped.abilities[0].is_hidden);
}

#[test]
fn reconcile_creates_entry_with_relations() {
    let conn = open_memory().unwrap();
    let outcome = reconcile_entry(&conn, &parse(&bulbasaur())).unwrap();
    assert_eq!(outcome, ReconcileOutcome::Created(1));

    let record = get_entry_record(&conn, 1).unwrap().unwrap();
    assert_eq!(record.entry.name, "bulbasaur");
    assert_eq!(record.entry.stats.special_attack, 65);
    assert!(!record.entry.favorite);
    assert_eq!(record.type_names(), vec!["grass", "poison"]);
    assert_eq!(record.abilities[0].name, "overgrow");
    assert!(record.abilities[1].is_hidden);
}

#[test]
fn reconcile_twice_is_idempotent_and_keeps_favorite() {
    let conn = open_memory().unwrap();
    let body = parse(&bulbasaur());
    reconcile_entry(&conn, &body).unwrap();
    toggle_favorite(&conn, 1).unwrap();
    let before = get_entry_record(&conn, 1).unwrap().unwrap();

    let outcome = reconcile_entry(&conn, &body).unwrap();
    assert_eq!(outcome, ReconcileOutcome::Updated(1));

    let after = get_entry_record(&conn, 1).unwrap().unwrap();
    assert!(after.entry.favorite);
    assert_eq!(after.entry.name, before.entry.name);
    assert_eq!(after.entry.stats, before.entry.stats);
    assert_eq!(after.entry.sprites, before.entry.sprites);
    assert_eq!(after.entry.created_at, before.entry.created_at);
    assert_eq!(after.types, before.types);
    assert_eq!(after.abilities, before.abilities);

    let stats = catalog_stats(&conn).unwrap();
    assert_eq!(stats.entries, 1);
    assert_eq!(stats.types, 2);
    assert_eq!(stats.abilities, 2);
}

#[test]
fn reconcile_replaces_relations_with_latest_payload() {
    let conn = open_memory().unwrap();
    reconcile_entry(&conn, &parse(&bulbasaur())).unwrap();

    let changed = payload(1, "bulbasaur", &[], &[("overgrow", false)], &[("hp", 50)]);
    reconcile_entry(&conn, &parse(&changed)).unwrap();

    let record = get_entry_record(&conn, 1).unwrap().unwrap();
    assert!(record.types.is_empty());
    assert_eq!(record.abilities.len(), 1);
    assert_eq!(record.entry.stats.hp, 50);
    assert_eq!(record.entry.stats.attack, 49);
}

#[test]
fn existing_ability_keeps_first_hidden_flag() {
    let conn = open_memory().unwrap();
    reconcile_entry(&conn, &parse(&charmander())).unwrap();

    // Same ability, visible this time
    let other = payload(
        338,
        "solrock",
        &["rock", "psychic"],
        &[("levitate", false), ("solar-power", false)],
        &[],
    );
    reconcile_entry(&conn, &parse(&other)).unwrap();

    let tag = find_ability_tag(&conn, "solar power").unwrap().unwrap();
    assert!(tag.is_hidden);
    let record = get_entry_record(&conn, 338).unwrap().unwrap();
    assert!(record.abilities[1].is_hidden);
}

#[test]
fn type_keeps_first_stored_spelling() {
    let conn = open_memory().unwrap();
    let first = payload(1, "a", &["Fire"], &[], &[]);
    let second = payload(2, "b", &["fire"], &[], &[]);
    reconcile_entry(&conn, &parse(&first)).unwrap();
    reconcile_entry(&conn, &parse(&second)).unwrap();

    assert_eq!(list_type_names(&conn).unwrap(), vec!["Fire"]);
    let record = get_entry_record(&conn, 2).unwrap().unwrap();
    assert_eq!(record.type_names(), vec!["Fire"]);
}
