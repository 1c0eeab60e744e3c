//! Lazily groups a provider's flat, paged record listing into record sets.

use std::collections::{HashMap, VecDeque};
use std::iter::FusedIterator;

use log::{debug, warn};

use crate::error::{ProviderResult, Result};
use crate::traits::DnsProvider;
use crate::types::{
    NativeRecord, Page, RecordData, RecordFilter, RecordOrdering, ResourceRecordSet, Zone,
};
use crate::utils::names::absolute_name;

/// Fetches one page of records; `None` asks for the first page.
pub type PageFetcher<'a> =
    Box<dyn FnMut(Option<&str>) -> ProviderResult<Page<NativeRecord>> + Send + 'a>;

/// Turns `(record_type, raw rdata)` into typed rdata.
pub type RDataConverter<'a> =
    Box<dyn Fn(&str, &str) -> ProviderResult<RecordData> + Send + 'a>;

type GroupKey = (String, String, Option<String>);

fn key_of(record: &NativeRecord) -> GroupKey {
    (
        record.name.clone(),
        record.record_type.clone(),
        record.qualifier.clone(),
    )
}

enum State {
    /// The page behind this token has not been fetched yet.
    NeedPage(Option<String>),
    /// Buffered records remain; `next` is the token of the following page.
    HaveBuffer { next: Option<String> },
    Exhausted,
}

/// Iterator over the record sets of one zone.
///
/// Records sharing owner, type and qualifier are merged into one
/// [`ResourceRecordSet`], also across page boundaries: before a set is
/// yielded, the first record of the next set is pulled into a lookahead slot,
/// fetching the following page if needed.
///
/// With [`RecordOrdering::Unsorted`] every page is drained on the first call
/// and sets are yielded in order of first appearance.
///
/// Single pass. After an error the iterator is fused.
pub struct GroupingIterator<'a> {
    fetch: PageFetcher<'a>,
    convert: RDataConverter<'a>,
    zone: String,
    filter: RecordFilter,
    ordering: RecordOrdering,
    state: State,
    buffer: VecDeque<NativeRecord>,
    lookahead: Option<NativeRecord>,
    scanned: Option<VecDeque<ResourceRecordSet>>,
}

impl<'a> GroupingIterator<'a> {
    /// `zone` is the zone name relative owners are resolved against. A
    /// relative `filter.name` is resolved the same way.
    pub fn new(
        zone: impl Into<String>,
        mut filter: RecordFilter,
        ordering: RecordOrdering,
        fetch: PageFetcher<'a>,
        convert: RDataConverter<'a>,
    ) -> Self {
        let zone = zone.into();
        filter.name = filter.name.map(|n| absolute_name(&n, &zone));
        Self {
            fetch,
            convert,
            zone,
            filter,
            ordering,
            state: State::NeedPage(None),
            buffer: VecDeque::new(),
            lookahead: None,
            scanned: None,
        }
    }

    /// Groups the records of `zone` as listed by `provider`, in the ordering
    /// its metadata declares.
    pub fn for_provider(provider: &'a dyn DnsProvider, zone: &Zone, filter: RecordFilter) -> Self {
        let zone_handle = zone.id_or_name().to_string();
        let server_filter = RecordFilter {
            name: filter.name.as_deref().map(|n| absolute_name(n, zone.name())),
            ..filter.clone()
        };
        Self::new(
            zone.name(),
            filter,
            provider.metadata().record_ordering,
            Box::new(move |token: Option<&str>| {
                provider.fetch_record_page(&zone_handle, &server_filter, token)
            }),
            Box::new(move |rtype: &str, raw: &str| provider.raw_to_rdata(rtype, raw)),
        )
    }

    fn fuse(&mut self) {
        self.state = State::Exhausted;
        self.buffer.clear();
        self.lookahead = None;
        self.scanned = Some(VecDeque::new());
    }

    /// Next record passing the filter, owner made absolute.
    fn next_record(&mut self) -> Option<ProviderResult<NativeRecord>> {
        loop {
            if let Some(record) = self.buffer.pop_front() {
                return Some(Ok(record));
            }
            match std::mem::replace(&mut self.state, State::Exhausted) {
                State::Exhausted | State::HaveBuffer { next: None } => return None,
                State::HaveBuffer { next: Some(token) } => {
                    self.state = State::NeedPage(Some(token));
                }
                State::NeedPage(token) => {
                    let page = match (self.fetch)(token.as_deref()) {
                        Ok(page) => page,
                        Err(e) => return Some(Err(e)),
                    };
                    debug!(
                        "Fetched record page for {} (token {:?}): {} records, more: {}",
                        self.zone,
                        token,
                        page.items.len(),
                        page.has_more()
                    );
                    for mut record in page.items {
                        record.name = absolute_name(&record.name, &self.zone);
                        if self.filter.matches(
                            &record.name,
                            &record.record_type,
                            record.qualifier.as_deref(),
                        ) {
                            self.buffer.push_back(record);
                        }
                    }
                    self.state = State::HaveBuffer {
                        next: page.next_page_token,
                    };
                }
            }
        }
    }

    fn rdata(&self, record: &NativeRecord) -> Result<RecordData> {
        Ok((self.convert)(&record.record_type, &record.rdata)?)
    }

    fn next_sorted(&mut self) -> Option<Result<ResourceRecordSet>> {
        let first = match self.lookahead.take() {
            Some(record) => record,
            None => match self.next_record()? {
                Ok(record) => record,
                Err(e) => return Some(Err(e.into())),
            },
        };
        let key = key_of(&first);
        let mut group = vec![first];
        loop {
            match self.next_record() {
                None => break,
                Some(Err(e)) => return Some(Err(e.into())),
                Some(Ok(record)) if key_of(&record) == key => group.push(record),
                Some(Ok(record)) => {
                    self.lookahead = Some(record);
                    break;
                }
            }
        }
        Some(self.build(&group))
    }

    fn full_scan(&mut self) -> Result<VecDeque<ResourceRecordSet>> {
        let mut index: HashMap<GroupKey, usize> = HashMap::new();
        let mut groups: Vec<Vec<NativeRecord>> = Vec::new();
        while let Some(record) = self.next_record() {
            let record = record?;
            let slot = *index.entry(key_of(&record)).or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
            groups[slot].push(record);
        }
        debug!("Full scan of {} produced {} record sets", self.zone, groups.len());
        groups.iter().map(|group| self.build(group)).collect()
    }

    fn build(&self, group: &[NativeRecord]) -> Result<ResourceRecordSet> {
        let first = &group[0];
        if group.iter().any(|r| r.ttl != first.ttl) {
            warn!(
                "Records of {} {} disagree on ttl, using {:?}",
                first.name, first.record_type, first.ttl
            );
        }
        let mut builder = ResourceRecordSet::builder()
            .name(first.name.clone())
            .rtype(first.record_type.clone())
            .profile(first.profile.clone());
        if let Some(qualifier) = &first.qualifier {
            builder = builder.qualifier(qualifier.clone());
        }
        if let Some(ttl) = first.ttl {
            builder = builder.ttl(i64::from(ttl));
        }
        for record in group {
            builder = builder.add(self.rdata(record)?);
        }
        builder.build()
    }
}

impl Iterator for GroupingIterator<'_> {
    type Item = Result<ResourceRecordSet>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = match self.ordering {
            RecordOrdering::Sorted => self.next_sorted(),
            RecordOrdering::Unsorted => {
                if self.scanned.is_none() {
                    match self.full_scan() {
                        Ok(sets) => self.scanned = Some(sets),
                        Err(e) => {
                            self.fuse();
                            return Some(Err(e));
                        }
                    }
                }
                self.scanned.as_mut().and_then(VecDeque::pop_front).map(Ok)
            }
        };
        if matches!(item, Some(Err(_))) {
            self.fuse();
        }
        item
    }
}

impl FusedIterator for GroupingIterator<'_> {}

impl std::fmt::Debug for GroupingIterator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupingIterator")
            .field("zone", &self.zone)
            .field("filter", &self.filter)
            .field("ordering", &self.ordering)
            .finish_non_exhaustive()
    }
}
