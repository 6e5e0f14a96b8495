//! Diagnostic events delivered over a channel.

use std::sync::Arc;

use integration_tests::{endpoints_of, init_tracing, SliceSpec};
use nebucloud_endpoints::prelude::*;

#[tokio::test]
async fn mismatched_family_reaches_the_channel() {
    init_tracing();
    let (recorder, mut events) = ChannelRecorder::channel(16);
    let cache = EndpointSliceCache::builder()
        .hostname("host1")
        .ip_family(IpFamily::V6)
        .recorder(recorder)
        .build();

    let web = ServiceKey::new("default", "web");
    cache.update(
        &EndpointSlice::new("web-1", "default")
            .owned_by_service("web")
            .with_port(EndpointPort::new("http", 80))
            .with_endpoint(SliceEndpoint::ready("fd00::10"))
            .with_endpoint(SliceEndpoint::ready("10.1.0.5")),
    );

    let map = cache.get_endpoints_map(&web);
    assert_eq!(endpoints_of(&map, &web.port("http")), vec!["[fd00::10]:80"]);

    let event = events.recv().await.expect("event should be delivered");
    assert_eq!(event.service, web);
    assert_eq!(event.address, "10.1.0.5");
    assert_eq!(event.source, "web-1");
    assert_eq!(IncorrectIpVersion::REASON, "KubeProxyIncorrectIPVersion");
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn full_channel_never_blocks_builds() {
    init_tracing();
    let (recorder, mut events) = ChannelRecorder::channel(1);
    let cache = EndpointSliceCache::builder()
        .ip_family(IpFamily::V6)
        .recorder(recorder)
        .build();

    cache.update(&SliceSpec::new("svc1", "ns1", 1, 5).build());

    let svc1 = ServiceKey::new("ns1", "svc1");
    for _ in 0..10 {
        assert!(cache.get_endpoints_map(&svc1).is_empty());
    }

    // One buffered, the rest dropped without error.
    assert!(events.recv().await.is_some());
    assert!(events.try_recv().is_err());
    assert_eq!(cache.stats().events_dropped(), 0);
    assert_eq!(cache.stats().ip_family_mismatches(), 50);
}

#[tokio::test]
async fn cache_is_shareable_across_tasks() {
    init_tracing();
    let cache = Arc::new(EndpointSliceCache::new("host1", IpFamily::Any));
    let mut tasks = Vec::new();

    for slice_num in 1..=4u32 {
        let cache = Arc::clone(&cache);
        tasks.push(tokio::spawn(async move {
            let slice = SliceSpec::new("svc1", "ns1", slice_num, 3).build();
            cache.update(&slice);
        }));
    }

    for task in tasks {
        task.await.expect("task panicked");
    }

    let svc1 = ServiceKey::new("ns1", "svc1");
    let map = cache.get_endpoints_map(&svc1);
    assert_eq!(map[&svc1.port("port-0")].len(), 12);
}
