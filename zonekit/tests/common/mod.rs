//! Shared test utilities and helpers

#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use zonekit::{
    ChangeSet, DnsApi, DnsProvider, MemoryProvider, NativeRecord, Page, ProviderError,
    ProviderMetadata, ProviderResult, RecordData, RecordFilter, ResourceRecordSet, Zone,
};

/// Asserts that an `Option` is `Some` and unwraps it (fails the test otherwise).
#[macro_export]
macro_rules! require_some {
    ($expr:expr $(,)?) => {{
        let opt = $expr;
        assert!(opt.is_some(), "expected Some(..), got None");
        let Some(val) = opt else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let opt = $expr;
        assert!(opt.is_some(), "{}", format_args!($($msg)+));
        let Some(val) = opt else {
            return;
        };
        val
    }};
}

/// Asserts that a `Result` is `Ok` and unwraps it (fails the test otherwise).
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(val) = res else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let res = $expr;
        assert!(
            res.is_ok(),
            "{}: {res:?}",
            format_args!($($msg)+)
        );
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

pub const ZONE: &str = "example.com.";

pub fn a(address: &str) -> RecordData {
    RecordData::A {
        address: address.to_string(),
    }
}

/// `www.example.com.` A set with the given ttl and addresses.
pub fn a_set(ttl: Option<i64>, addresses: &[&str]) -> ResourceRecordSet {
    named_a_set("www.example.com.", ttl, addresses)
}

pub fn named_a_set(name: &str, ttl: Option<i64>, addresses: &[&str]) -> ResourceRecordSet {
    let mut builder = ResourceRecordSet::builder()
        .name(name)
        .rtype("A")
        .add_all(addresses.iter().map(|x| a(x)));
    if let Some(ttl) = ttl {
        builder = builder.ttl(ttl);
    }
    builder.build().expect("valid A set")
}

/// Drains a record-set iterator, stopping at the first error.
pub fn all_sets(
    iter: impl Iterator<Item = zonekit::Result<ResourceRecordSet>>,
) -> zonekit::Result<Vec<ResourceRecordSet>> {
    iter.collect()
}

/// Counts write calls and can fail record listings on demand.
pub struct CountingProvider {
    pub inner: MemoryProvider,
    pub creates: AtomicUsize,
    pub deletes: AtomicUsize,
    pub applies: AtomicUsize,
    pub record_fetches: AtomicUsize,
    /// Record page fetches succeed until this many have been served.
    fail_fetch_after: AtomicUsize,
}

impl CountingProvider {
    pub fn new(inner: MemoryProvider) -> Self {
        Self {
            inner,
            creates: AtomicUsize::new(0),
            deletes: AtomicUsize::new(0),
            applies: AtomicUsize::new(0),
            record_fetches: AtomicUsize::new(0),
            fail_fetch_after: AtomicUsize::new(usize::MAX),
        }
    }

    /// Write primitives issued so far.
    pub fn writes(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
            + self.deletes.load(Ordering::SeqCst)
            + self.applies.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        for counter in [
            &self.creates,
            &self.deletes,
            &self.applies,
            &self.record_fetches,
        ] {
            counter.store(0, Ordering::SeqCst);
        }
    }

    /// Every record page fetch after the first `n` fails with a transport error.
    pub fn fail_record_fetches_after(&self, n: usize) {
        self.record_fetches.store(0, Ordering::SeqCst);
        self.fail_fetch_after.store(n, Ordering::SeqCst);
    }
}

impl DnsProvider for CountingProvider {
    fn id(&self) -> &'static str {
        self.inner.id()
    }

    fn metadata(&self) -> &ProviderMetadata {
        self.inner.metadata()
    }

    fn fetch_zone_page(&self, page_token: Option<&str>) -> ProviderResult<Page<Zone>> {
        self.inner.fetch_zone_page(page_token)
    }

    fn get_zone(&self, id_or_name: &str) -> ProviderResult<Option<Zone>> {
        self.inner.get_zone(id_or_name)
    }

    fn create_zone(&self, zone: &Zone) -> ProviderResult<Zone> {
        self.inner.create_zone(zone)
    }

    fn delete_zone(&self, id_or_name: &str) -> ProviderResult<()> {
        self.inner.delete_zone(id_or_name)
    }

    fn fetch_record_page(
        &self,
        zone: &str,
        filter: &RecordFilter,
        page_token: Option<&str>,
    ) -> ProviderResult<Page<NativeRecord>> {
        let served = self.record_fetches.fetch_add(1, Ordering::SeqCst);
        if served >= self.fail_fetch_after.load(Ordering::SeqCst) {
            return Err(ProviderError::Transport {
                provider: self.id().to_string(),
                detail: "connection reset by peer".to_string(),
            });
        }
        self.inner.fetch_record_page(zone, filter, page_token)
    }

    fn create_records(&self, zone: &str, rrset: &ResourceRecordSet) -> ProviderResult<()> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        self.inner.create_records(zone, rrset)
    }

    fn delete_records(&self, zone: &str, rrset: &ResourceRecordSet) -> ProviderResult<()> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete_records(zone, rrset)
    }

    fn apply_changes(&self, zone: &str, changes: &ChangeSet) -> ProviderResult<()> {
        self.applies.fetch_add(1, Ordering::SeqCst);
        self.inner.apply_changes(zone, changes)
    }

    fn supported_regions(&self) -> Option<BTreeMap<String, BTreeSet<String>>> {
        self.inner.supported_regions()
    }

    fn supported_weights(&self) -> Option<Vec<u32>> {
        self.inner.supported_weights()
    }
}

/// Test context: a counting provider with zone `example.com.` created.
pub struct TestContext {
    pub provider: Arc<CountingProvider>,
    pub api: DnsApi,
    pub zone: Zone,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_provider(MemoryProvider::new())
    }

    pub fn with_provider(inner: MemoryProvider) -> Self {
        let provider = Arc::new(CountingProvider::new(inner));
        let api = DnsApi::new(provider.clone());
        let zone = api
            .zones()
            .put(&Zone::new(ZONE).expect("valid zone name"))
            .expect("zone created");
        Self {
            provider,
            api,
            zone,
        }
    }

    pub fn zone_id(&self) -> &str {
        self.zone.id_or_name()
    }

    /// Stores `rrset` directly at the provider and resets the counters.
    pub fn seed(&self, rrset: &ResourceRecordSet) {
        self.provider
            .inner
            .create_records(self.zone_id(), rrset)
            .expect("seeded");
        self.provider.reset();
    }

    /// Raw records currently stored, in listing order.
    pub fn stored(&self) -> Vec<NativeRecord> {
        let mut records = Vec::new();
        let mut token: Option<String> = None;
        loop {
            let page = self
                .provider
                .inner
                .fetch_record_page(self.zone_id(), &RecordFilter::all(), token.as_deref())
                .expect("listing");
            records.extend(page.items);
            match page.next_page_token {
                Some(next) => token = Some(next),
                None => return records,
            }
        }
    }
}
