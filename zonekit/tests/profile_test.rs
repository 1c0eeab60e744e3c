//! Geo and weighted record sets.

#![cfg(feature = "memory")]

mod common;

use std::sync::atomic::Ordering;

use common::{TestContext, a, a_set, all_sets};
use zonekit::{Error, Geo, MemoryProvider, RecordOrdering, ResourceRecordSet, Weighted};

fn geo_set(
    qualifier: &str,
    region: &str,
    territories: &[&str],
    address: &str,
) -> ResourceRecordSet {
    a_set(Some(300), &[address])
        .to_builder()
        .qualifier(qualifier)
        .geo(Geo::single(region, territories.iter().copied()).expect("valid geo"))
        .build()
        .expect("valid geo set")
}

fn weighted_set(qualifier: &str, weight: u32, addresses: &[&str]) -> ResourceRecordSet {
    a_set(Some(300), addresses)
        .to_builder()
        .qualifier(qualifier)
        .weighted(Weighted::new(weight))
        .build()
        .expect("valid weighted set")
}

#[test]
fn qualifiers_scope_sets_of_one_name_and_type() {
    let ctx = TestContext::new();
    let geo = require_some!(ctx.api.geo_record_sets_in_zone(ctx.zone_id()));
    let east = geo_set("US-East", "US-East", &["US-NY", "US-VA"], "192.0.2.1");
    let west = geo_set("US-West", "US-West", &["US-CA"], "192.0.2.2");

    require_ok!(geo.put(&east));
    require_ok!(geo.put(&west));

    let sets: Vec<ResourceRecordSet> =
        require_ok!(all_sets(require_ok!(geo.iterate_by_name_and_type("www.example.com.", "A"))));
    assert_eq!(sets.len(), 2);

    let found = require_some!(require_ok!(geo.get_by_name_type_and_qualifier(
        "www.example.com.",
        "A",
        "US-West"
    )));
    assert_eq!(found, west);

    // the unqualified view sees neither
    let basic = ctx.api.basic_record_sets_in_zone(ctx.zone_id());
    assert_eq!(
        require_ok!(basic.get_by_name_and_type("www.example.com.", "A")),
        None
    );
}

#[test]
fn put_only_touches_its_qualifier() {
    let ctx = TestContext::new();
    ctx.seed(&geo_set("US-East", "US-East", &["US-NY"], "192.0.2.1"));
    ctx.seed(&geo_set("US-West", "US-West", &["US-CA"], "192.0.2.2"));
    let geo = require_some!(ctx.api.geo_record_sets_in_zone(ctx.zone_id()));

    let changes = require_ok!(geo.put(&geo_set("US-East", "US-East", &["US-NY"], "192.0.2.9")));
    assert_eq!(require_some!(changes.to_add).records(), [a("192.0.2.9")]);
    assert_eq!(require_some!(changes.to_delete).records(), [a("192.0.2.1")]);

    let west = require_some!(require_ok!(geo.get_by_name_type_and_qualifier(
        "www.example.com.",
        "A",
        "US-West"
    )));
    assert_eq!(west.records(), [a("192.0.2.2")]);
}

#[test]
fn profile_only_change_replaces_the_set() {
    let ctx = TestContext::new();
    ctx.seed(&weighted_set("blue", 10, &["192.0.2.1", "192.0.2.2"]));
    let weighted = require_some!(ctx.api.weighted_record_sets_in_zone(ctx.zone_id()));

    let changes =
        require_ok!(weighted.put(&weighted_set("blue", 90, &["192.0.2.1", "192.0.2.2"])));
    let added = require_some!(changes.to_add);
    let removed = require_some!(changes.to_delete);
    assert_eq!(added.records().len(), 2);
    assert_eq!(removed.weighted(), Some(&Weighted::new(10)));
    assert_eq!(ctx.provider.applies.load(Ordering::SeqCst), 1);

    let stored = require_some!(require_ok!(weighted.get_by_name_type_and_qualifier(
        "www.example.com.",
        "A",
        "blue"
    )));
    assert_eq!(stored.weighted(), Some(&Weighted::new(90)));
    assert_eq!(ctx.stored().len(), 2);
}

#[test]
fn profile_apis_reject_other_profiles() {
    let ctx = TestContext::new();
    let geo = require_some!(ctx.api.geo_record_sets_in_zone(ctx.zone_id()));
    let weighted = require_some!(ctx.api.weighted_record_sets_in_zone(ctx.zone_id()));

    assert!(matches!(
        geo.put(&weighted_set("blue", 10, &["192.0.2.1"])),
        Err(Error::InvalidArgument(_))
    ));
    assert!(matches!(
        weighted.put(&a_set(Some(300), &["192.0.2.1"])),
        Err(Error::InvalidArgument(_))
    ));
    assert_eq!(ctx.provider.writes(), 0);
}

#[test]
fn profile_views_filter_by_kind() {
    let ctx = TestContext::new();
    ctx.seed(&a_set(Some(300), &["192.0.2.1"]));
    ctx.seed(&geo_set("US-East", "US-East", &["US-NY"], "192.0.2.2"));
    ctx.seed(&weighted_set("blue", 10, &["192.0.2.3"]));

    let all = ctx.api.record_sets_in_zone(ctx.zone_id());
    assert_eq!(require_ok!(all.iter()).count(), 3);

    let geo = require_some!(ctx.api.geo_record_sets_in_zone(ctx.zone_id()));
    let geo_sets: Vec<ResourceRecordSet> = require_ok!(all_sets(require_ok!(geo.iter())));
    assert_eq!(geo_sets.len(), 1);
    assert_eq!(geo_sets[0].qualifier(), Some("US-East"));

    let weighted = require_some!(ctx.api.weighted_record_sets_in_zone(ctx.zone_id()));
    assert_eq!(
        require_ok!(weighted.get_by_name_type_and_qualifier("www.example.com.", "A", "US-East")),
        None
    );
}

#[test]
fn delete_by_name_and_type_removes_every_qualifier() {
    let ctx = TestContext::new();
    ctx.seed(&a_set(Some(300), &["192.0.2.1"]));
    ctx.seed(&weighted_set("blue", 10, &["192.0.2.2"]));
    ctx.seed(&weighted_set("green", 20, &["192.0.2.3"]));

    let weighted = require_some!(ctx.api.weighted_record_sets_in_zone(ctx.zone_id()));
    require_ok!(weighted.delete_by_name_and_type("www.example.com.", "A"));
    // the unqualified set is not weighted and stays
    assert_eq!(ctx.stored().len(), 1);

    let all = ctx.api.record_sets_in_zone(ctx.zone_id());
    require_ok!(all.delete_by_name_and_type("www.example.com.", "A"));
    assert!(ctx.stored().is_empty());
}

#[test]
fn delete_by_qualifier_is_idempotent() {
    let ctx = TestContext::new();
    ctx.seed(&weighted_set("blue", 10, &["192.0.2.2"]));
    ctx.seed(&weighted_set("green", 20, &["192.0.2.3"]));
    let all = ctx.api.record_sets_in_zone(ctx.zone_id());

    require_ok!(all.delete_by_name_type_and_qualifier("www.example.com.", "A", "blue"));
    assert_eq!(ctx.stored().len(), 1);
    assert_eq!(ctx.stored()[0].qualifier.as_deref(), Some("green"));

    ctx.provider.reset();
    require_ok!(all.delete_by_name_type_and_qualifier("www.example.com.", "A", "blue"));
    assert_eq!(ctx.provider.writes(), 0);
}

#[test]
fn capabilities_are_exposed() {
    let ctx = TestContext::new();
    let geo = require_some!(ctx.api.geo_record_sets_in_zone(ctx.zone_id()));
    let regions = geo.supported_regions();
    assert!(regions.contains_key("US-East"));
    assert!(regions.contains_key("Anonymous Proxy"));

    let weighted = require_some!(ctx.api.weighted_record_sets_in_zone(ctx.zone_id()));
    let weights = weighted.supported_weights();
    assert_eq!(weights.first(), Some(&0));
    assert_eq!(weights.last(), Some(&100));
}

#[test]
fn unsorted_listing_is_grouped_by_full_scan() {
    let ctx = TestContext::with_provider(
        MemoryProvider::builder()
            .record_ordering(RecordOrdering::Unsorted)
            .page_size(1)
            .build(),
    );
    // interleave the records of two qualifiers and an unqualified set
    ctx.seed(&weighted_set("blue", 10, &["192.0.2.1"]));
    ctx.seed(&weighted_set("green", 20, &["192.0.2.2"]));
    ctx.seed(&a_set(Some(300), &["192.0.2.3"]));
    ctx.seed(&weighted_set("blue", 10, &["192.0.2.4"]));
    ctx.seed(&weighted_set("green", 20, &["192.0.2.5"]));

    let all = ctx.api.record_sets_in_zone(ctx.zone_id());
    let sets: Vec<ResourceRecordSet> = require_ok!(all_sets(require_ok!(all.iter())));
    let summary: Vec<(Option<&str>, usize)> = sets
        .iter()
        .map(|s| (s.qualifier(), s.records().len()))
        .collect();
    assert_eq!(summary, [(Some("blue"), 2), (Some("green"), 2), (None, 1)]);

    let blue = require_some!(require_ok!(all.get_by_name_type_and_qualifier(
        "www.example.com.",
        "A",
        "blue"
    )));
    assert_eq!(blue.records(), [a("192.0.2.1"), a("192.0.2.4")]);
}
