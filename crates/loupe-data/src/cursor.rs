// WindowCursor — sliding-window state machine over collection series
//
// The cursor walks one collection at a time, emitting a WINDOW_LEN-row
// window that ends at the current offset and then stepping one row forward:
//
//   state            Unstarted ──load(c)──▶ At { collection: c, offset: W }
//   next_window(c)   window over rows offset, offset-1, ..., offset-W+1
//   step             offset += 1
//   rollover         offset >= len - 1  ──▶ At { collection: c + 1, offset: W }
//
// The final row of a series is never the right edge of a window: rollover
// fires as soon as the offset reaches `len - 1`.
//
// Cache rules, checked on every read before touching the series:
//   - first access, or a collection other than the cursor's: drop the
//     series and the bundle, switch to the requested collection
//   - offset == W (start of a lap): refetch the series, keep the bundle
//   - rollover: drop the series and the bundle
//
// The offset is not reset when the caller switches collections: it carries
// over and reads the new collection's series at the same position.

use std::sync::Arc;

use loupe_core::Tensor;
use tracing::{debug, info, warn};

use crate::cache::{CollectionCache, FeatureBundle};
use crate::catalog::CollectionCatalog;
use crate::config::WINDOW_LEN;
use crate::error::{Error, Result};
use crate::fetch::ResourceFetcher;
use crate::series::{TimeSeries, NUM_FIELDS};

/// Where the cursor is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    /// Nothing has been read yet.
    Unstarted,
    /// Reading `collection`; the next window ends at row `offset`.
    At { collection: usize, offset: usize },
}

/// Output of one [`WindowCursor::next_window`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowStep {
    /// `[1, WINDOW_LEN, 5]`, most recent row first.
    pub window: Tensor,
    /// The cursor finished its collection and moved on to the next one.
    pub rolled_over: bool,
}

#[derive(Debug, Clone, Copy)]
enum Refresh {
    FirstAccess,
    CollectionSwitch,
    LapStart,
    Stale,
}

impl Refresh {
    fn as_str(self) -> &'static str {
        match self {
            Refresh::FirstAccess => "first-access",
            Refresh::CollectionSwitch => "collection-switch",
            Refresh::LapStart => "lap-start",
            Refresh::Stale => "stale",
        }
    }
}

/// Stateful reader over the collections of a catalog.
///
/// Single-threaded: one cursor serves one consumer. Consumers that need to
/// read in parallel each own a cursor; the catalog can be shared.
pub struct WindowCursor<F> {
    catalog: Arc<CollectionCatalog>,
    fetcher: F,
    window_len: usize,
    strict_exhaustion: bool,
    state: CursorState,
    cache: CollectionCache,
}

impl<F: ResourceFetcher> WindowCursor<F> {
    /// A cursor with the default window length and non-strict exhaustion.
    pub fn new(catalog: Arc<CollectionCatalog>, fetcher: F) -> Self {
        Self {
            catalog,
            fetcher,
            window_len: WINDOW_LEN,
            strict_exhaustion: false,
            state: CursorState::Unstarted,
            cache: CollectionCache::new(),
        }
    }

    /// Set the window length. Must be at least 1.
    pub fn window_len(mut self, len: usize) -> Self {
        self.window_len = len;
        self
    }

    /// Fail with [`Error::Exhausted`] on ordinals past the catalog instead
    /// of letting them reach the catalog lookup.
    pub fn strict_exhaustion(mut self, strict: bool) -> Self {
        self.strict_exhaustion = strict;
        self
    }

    // Accessors

    pub fn collection_count(&self) -> usize {
        self.catalog.count()
    }

    pub fn catalog(&self) -> &Arc<CollectionCatalog> {
        &self.catalog
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn state(&self) -> CursorState {
        self.state
    }

    /// `(collection, offset)` once the cursor has started.
    pub fn position(&self) -> Option<(usize, usize)> {
        match self.state {
            CursorState::Unstarted => None,
            CursorState::At { collection, offset } => Some((collection, offset)),
        }
    }

    /// Length of the cached series, if it is fresh.
    pub fn series_len(&self) -> Option<usize> {
        self.cache.series().map(|s| s.len())
    }

    /// Whether rollovers have carried the cursor past the last collection.
    pub fn is_exhausted(&self) -> bool {
        match self.state {
            CursorState::Unstarted => false,
            CursorState::At { collection, .. } => collection >= self.catalog.count(),
        }
    }

    // Operations

    /// Feature bundle of `collection`, built on first request and served
    /// from the cache until the collection changes or the cursor rolls over.
    pub fn get_features(&mut self, collection: usize) -> Result<FeatureBundle> {
        self.check_exhaustion(collection)?;
        let (_, series) = self.load(collection)?;
        if let Some(bundle) = self.cache.bundle() {
            return Ok(bundle.clone());
        }

        let name = self.catalog.name_of(collection)?;
        let description = self.fetcher.fetch_description(name)?;
        let image = self.fetcher.fetch_image(name)?;
        let window = series.leading_window(self.window_len)?;
        debug!(collection, name, image = %image.shape(), "assembled feature bundle");

        let bundle = FeatureBundle {
            description,
            image,
            window,
        };
        self.cache.store_bundle(bundle.clone());
        Ok(bundle)
    }

    /// Window ending at the current offset, then one step forward.
    ///
    /// `collection` only selects what to load; the position itself lives in
    /// the cursor, so repeated calls with the same ordinal keep advancing.
    pub fn next_window(&mut self, collection: usize) -> Result<WindowStep> {
        self.check_exhaustion(collection)?;
        let (offset, series) = self.load(collection)?;
        let window = series.window_ending_at(offset, self.window_len)?;
        let rolled_over = self.advance(collection, offset, series.len());
        Ok(WindowStep {
            window,
            rolled_over,
        })
    }

    /// The five metrics of row `offset` of `collection`, without moving.
    pub fn row_at(&mut self, collection: usize, offset: usize) -> Result<[f64; NUM_FIELDS]> {
        self.check_exhaustion(collection)?;
        let (_, series) = self.load(collection)?;
        series.row(offset)
    }

    // Transitions

    fn check_exhaustion(&self, collection: usize) -> Result<()> {
        let count = self.catalog.count();
        if self.strict_exhaustion && collection >= count {
            return Err(Error::Exhausted { collection, count });
        }
        Ok(())
    }

    /// Apply the invalidation rules for a read of `collection` and make sure
    /// the series is fresh. Returns the current offset and the series.
    fn load(&mut self, collection: usize) -> Result<(usize, Arc<TimeSeries>)> {
        let (offset, reason) = match self.state {
            CursorState::Unstarted => (self.window_len, Some(Refresh::FirstAccess)),
            CursorState::At {
                collection: current,
                offset,
            } if current != collection => (offset, Some(Refresh::CollectionSwitch)),
            CursorState::At { offset, .. } if offset == self.window_len => {
                (offset, Some(Refresh::LapStart))
            }
            CursorState::At { offset, .. } => (offset, None),
        };

        match reason {
            Some(Refresh::FirstAccess | Refresh::CollectionSwitch) => {
                self.cache.clear();
                self.state = CursorState::At { collection, offset };
            }
            Some(Refresh::LapStart) => self.cache.mark_stale(),
            Some(Refresh::Stale) | None => {}
        }

        // Only reported when the series actually has to be fetched.
        let reason = reason.unwrap_or(Refresh::Stale);
        let catalog = &self.catalog;
        let fetcher = &self.fetcher;
        let series = self.cache.refresh(|| {
            let name = catalog.name_of(collection)?;
            let series = fetcher.fetch_series(name)?;
            debug!(
                collection,
                name,
                rows = series.len(),
                reason = reason.as_str(),
                "loaded time series"
            );
            Ok(series)
        })?;
        Ok((offset, series))
    }

    /// Step past `offset`; on reaching the end of the series move to the
    /// next collection. Returns whether a rollover happened.
    fn advance(&mut self, collection: usize, offset: usize, series_len: usize) -> bool {
        let next = offset + 1;
        if next < series_len.saturating_sub(1) {
            self.state = CursorState::At {
                collection,
                offset: next,
            };
            return false;
        }

        let following = collection + 1;
        info!(finished = collection, next = following, "collection rolled over");
        if following >= self.catalog.count() {
            warn!(
                collection = following,
                count = self.catalog.count(),
                "cursor moved past the last collection"
            );
        }
        self.state = CursorState::At {
            collection: following,
            offset: self.window_len,
        };
        self.cache.clear();
        true
    }
}
