//! End-to-end scenarios for endpoint map building.

use std::collections::BTreeSet;

use integration_tests::{endpoints_of, init_tracing, SliceSpec};
use nebucloud_endpoints::prelude::*;

fn svc1() -> ServiceKey {
    ServiceKey::new("ns1", "svc1")
}

#[test]
fn single_slice_marks_local_endpoints() {
    init_tracing();
    let cache = EndpointSliceCache::new("host1", IpFamily::Any);
    cache.update(
        &SliceSpec {
            hosts: &["host1", "host2"],
            ports: &[80, 443],
            ..SliceSpec::new("svc1", "ns1", 1, 3)
        }
        .build(),
    );

    let map = cache.get_endpoints_map(&svc1());
    assert_eq!(map.len(), 2);

    for (port, number) in [("port-0", 80), ("port-1", 443)] {
        let endpoints = &map[&svc1().port(port)];
        let rendered: Vec<(String, bool)> = endpoints
            .iter()
            .map(|e| (e.endpoint().to_string(), e.is_local()))
            .collect();
        assert_eq!(
            rendered,
            vec![
                (format!("10.0.1.1:{number}"), false),
                (format!("10.0.1.2:{number}"), true),
                (format!("10.0.1.3:{number}"), false),
            ]
        );
    }
}

#[test]
fn overlapping_slices_merge_into_union() {
    init_tracing();
    let cache = EndpointSliceCache::default();
    cache.update(&SliceSpec { offset: 1, ..SliceSpec::new("svc1", "ns1", 1, 3) }.build());
    cache.update(&SliceSpec { offset: 1, ..SliceSpec::new("svc1", "ns1", 2, 4) }.build());

    let map = cache.get_endpoints_map(&svc1());
    assert_eq!(
        endpoints_of(&map, &svc1().port("port-0")),
        vec!["10.0.1.1:80", "10.0.1.2:80", "10.0.1.3:80", "10.0.1.4:80"]
    );
}

#[test]
fn all_unready_slices_leave_no_entry() {
    init_tracing();
    let cache = EndpointSliceCache::default();
    cache.update(&SliceSpec { unready_mod: 1, ..SliceSpec::new("svc1", "ns1", 1, 10) }.build());
    cache.update(&SliceSpec { unready_mod: 1, ..SliceSpec::new("svc1", "ns1", 2, 10) }.build());

    let map = cache.get_endpoints_map(&svc1());
    assert!(!map.contains_key(&svc1().port("port-0")));
    assert!(map.is_empty());
}

#[test]
fn services_in_other_namespaces_do_not_leak() {
    init_tracing();
    let cache = EndpointSliceCache::default();
    cache.update(&SliceSpec::new("svc1", "ns1", 1, 3).build());
    cache.update(&SliceSpec::new("svc2", "ns1", 2, 3).build());
    cache.update(&SliceSpec::new("svc1", "ns2", 3, 3).build());

    let map = cache.get_endpoints_map(&svc1());
    assert_eq!(map.len(), 1);
    assert_eq!(
        endpoints_of(&map, &svc1().port("port-0")),
        vec!["10.0.1.1:80", "10.0.1.2:80", "10.0.1.3:80"]
    );

    let other = cache.get_endpoints_map(&ServiceKey::new("ns2", "svc1"));
    assert_eq!(
        endpoints_of(&other, &ServiceKey::new("ns2", "svc1").port("port-0")),
        vec!["10.0.3.1:80", "10.0.3.2:80", "10.0.3.3:80"]
    );
}

#[test]
fn union_matches_ready_addresses_across_slices() {
    init_tracing();
    let cache = EndpointSliceCache::default();
    let specs = [
        SliceSpec { offset: 7, unready_mod: 2, ..SliceSpec::new("svc1", "ns1", 1, 9) },
        SliceSpec { offset: 7, unready_mod: 3, ..SliceSpec::new("svc1", "ns1", 2, 12) },
        SliceSpec { offset: 8, unready_mod: 5, ..SliceSpec::new("svc1", "ns1", 3, 6) },
    ];

    let mut expected = BTreeSet::new();
    for spec in &specs {
        let slice = spec.build();
        for endpoint in slice.endpoints.iter().filter(|e| e.conditions.ready) {
            expected.insert(format!("{}:80", endpoint.targets[0]));
        }
        cache.update(&slice);
    }

    let map = cache.get_endpoints_map(&svc1());
    let actual = endpoints_of(&map, &svc1().port("port-0"));

    let unique: BTreeSet<String> = actual.iter().cloned().collect();
    assert_eq!(unique.len(), actual.len(), "duplicate endpoints in {actual:?}");
    assert_eq!(unique, expected);
}

#[test]
fn unready_endpoints_never_appear() {
    init_tracing();
    let cache = EndpointSliceCache::new("host1", IpFamily::Any);
    let slice = SliceSpec {
        unready_mod: 2,
        hosts: &["host1"],
        ports: &[80, 8080],
        ..SliceSpec::new("svc1", "ns1", 1, 10)
    }
    .build();
    cache.update(&slice);

    let unready: BTreeSet<&str> = slice
        .endpoints
        .iter()
        .filter(|e| !e.conditions.ready)
        .map(|e| e.targets[0].as_str())
        .collect();

    let map = cache.get_endpoints_map(&svc1());
    for endpoints in map.values() {
        assert_eq!(endpoints.len(), 5);
        for endpoint in endpoints {
            assert!(!unready.contains(endpoint.ip()));
        }
    }
}

#[test]
fn deleting_a_slice_removes_exactly_its_contribution() {
    init_tracing();
    let cache = EndpointSliceCache::default();
    let first = SliceSpec::new("svc1", "ns1", 1, 2).build();
    let second = SliceSpec::new("svc1", "ns1", 2, 2).build();
    let shared = SliceSpec { offset: 1, ..SliceSpec::new("svc1", "ns1", 3, 1) }.build();

    cache.update(&first);
    cache.update(&second);
    cache.update(&shared);
    cache.delete(&first);

    // 10.0.1.1 survives through the shared slice.
    assert_eq!(
        endpoints_of(&cache.get_endpoints_map(&svc1()), &svc1().port("port-0")),
        vec!["10.0.1.1:80", "10.0.2.1:80", "10.0.2.2:80"]
    );

    // Deleting again changes nothing.
    cache.delete(&first);
    assert_eq!(cache.slice_count(&svc1()), 2);
}

#[test]
fn port_zero_contributes_nothing() {
    init_tracing();
    let cache = EndpointSliceCache::default();
    cache.update(&SliceSpec { ports: &[0, 80], ..SliceSpec::new("svc1", "ns1", 1, 2) }.build());

    let map = cache.get_endpoints_map(&svc1());
    assert!(!map.contains_key(&svc1().port("port-0")));
    assert_eq!(endpoints_of(&map, &svc1().port("port-1")), vec!["10.0.1.1:80", "10.0.1.2:80"]);
}

#[test]
fn addresses_sort_as_strings() {
    init_tracing();
    let cache = EndpointSliceCache::default();
    cache.update(&SliceSpec::new("svc1", "ns1", 1, 11).build());

    let endpoints = endpoints_of(&cache.get_endpoints_map(&svc1()), &svc1().port("port-0"));
    assert_eq!(&endpoints[..4], &["10.0.1.1:80", "10.0.1.10:80", "10.0.1.11:80", "10.0.1.2:80"]);
}

#[test]
fn builds_are_deterministic() {
    init_tracing();
    let cache = EndpointSliceCache::new("host2", IpFamily::Any);
    for slice_num in 1..=6 {
        cache.update(
            &SliceSpec {
                offset: slice_num % 3,
                unready_mod: 4,
                hosts: &["host1", "host2", "host3"],
                ports: &[80, 443],
                ..SliceSpec::new("svc1", "ns1", slice_num, 20)
            }
            .build(),
        );
    }

    let render = |map: &EndpointsMap| format!("{:?}", map);
    let first = render(&cache.get_endpoints_map(&svc1()));
    for _ in 0..5 {
        assert_eq!(render(&cache.get_endpoints_map(&svc1())), first);
    }
}
