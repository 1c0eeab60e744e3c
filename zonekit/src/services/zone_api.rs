use std::collections::VecDeque;
use std::iter::FusedIterator;

use log::{debug, info};

use crate::error::{ProviderError, Result};
use crate::traits::DnsProvider;
use crate::types::Zone;

/// Zone listing and lifecycle.
#[derive(Clone, Copy)]
pub struct ZoneApi<'a> {
    provider: &'a dyn DnsProvider,
}

impl<'a> ZoneApi<'a> {
    pub(crate) fn new(provider: &'a dyn DnsProvider) -> Self {
        Self { provider }
    }

    /// Lazily pages through every zone.
    pub fn iter(&self) -> ZoneIterator<'a> {
        ZoneIterator {
            provider: self.provider,
            buffer: VecDeque::new(),
            next_token: None,
            done: false,
        }
    }

    /// Zones named `name`: at most one unless the provider supports duplicate
    /// zone names.
    pub fn iterate_by_name(&self, name: &str) -> Result<std::vec::IntoIter<Zone>> {
        Ok(self.provider.zones_by_name(name)?.into_iter())
    }

    /// Creates `zone` unless it already exists and returns the stored zone.
    ///
    /// Without duplicate-name support an existing zone of the same name is
    /// returned untouched. With it, a zone carrying an id is looked up by id
    /// and a zone without one is always created.
    pub fn put(&self, zone: &Zone) -> Result<Zone> {
        let existing = if self.provider.metadata().supports_duplicate_zone_names {
            match zone.id() {
                Some(id) => self.provider.get_zone(id)?,
                None => None,
            }
        } else {
            self.provider.zones_by_name(zone.name())?.into_iter().next()
        };
        if let Some(existing) = existing {
            debug!("Zone {} already exists", existing.id_or_name());
            return Ok(existing);
        }
        let created = self.provider.create_zone(zone)?;
        info!("Created zone {} ({})", created.name(), created.id_or_name());
        Ok(created)
    }

    /// Deletes the zone with this id (or name). Absence is success.
    pub fn delete(&self, id_or_name: &str) -> Result<()> {
        match self.provider.delete_zone(id_or_name) {
            Ok(()) => {
                info!("Deleted zone {id_or_name}");
                Ok(())
            }
            Err(ProviderError::ZoneNotFound { .. }) => {
                debug!("Zone {id_or_name} already absent");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Pages through a provider's zones on demand. Fused after an error.
pub struct ZoneIterator<'a> {
    provider: &'a dyn DnsProvider,
    buffer: VecDeque<Zone>,
    next_token: Option<String>,
    done: bool,
}

impl Iterator for ZoneIterator<'_> {
    type Item = Result<Zone>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(zone) = self.buffer.pop_front() {
                return Some(Ok(zone));
            }
            if self.done {
                return None;
            }
            match self.provider.fetch_zone_page(self.next_token.as_deref()) {
                Ok(page) => {
                    debug!("Fetched zone page: {} zones", page.items.len());
                    self.buffer.extend(page.items);
                    self.next_token = page.next_page_token;
                    self.done = self.next_token.is_none();
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e.into()));
                }
            }
        }
    }
}

impl FusedIterator for ZoneIterator<'_> {}
