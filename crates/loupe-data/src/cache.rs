// CollectionCache — single-entry cache for the collection under the cursor
//
// Holds at most one series and one feature bundle, both belonging to the
// cursor's current collection. The cursor decides when the entry is
// invalidated; the cache only knows how to drop and refill it.
//
//   clear()       -> series Stale, bundle empty   (collection switch, rollover)
//   mark_stale()  -> series Stale, bundle kept    (lap start)
//   refresh()     -> Stale series refetched, Fresh series returned as is

use std::sync::Arc;

use loupe_core::Tensor;

use crate::error::Result;
use crate::series::TimeSeries;

/// Description, image and initial window of one collection.
///
/// Tensors share their storage, so cloning a bundle out of the cache does
/// not copy pixel data.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureBundle {
    pub description: String,
    /// `[1, 3, H, W]`
    pub image: Tensor,
    /// `[1, WINDOW_LEN, 5]`, rows `0..WINDOW_LEN` oldest first.
    pub window: Tensor,
}

#[derive(Debug, Clone, Default)]
enum SeriesSlot {
    /// Must be refetched before the next read.
    #[default]
    Stale,
    Fresh(Arc<TimeSeries>),
}

#[derive(Debug, Default)]
pub struct CollectionCache {
    series: SeriesSlot,
    bundle: Option<FeatureBundle>,
}

impl CollectionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.series = SeriesSlot::Stale;
        self.bundle = None;
    }

    /// Force the series to be refetched on the next read.
    pub fn mark_stale(&mut self) {
        self.series = SeriesSlot::Stale;
    }

    pub fn is_fresh(&self) -> bool {
        matches!(self.series, SeriesSlot::Fresh(_))
    }

    /// The cached series if it is fresh.
    pub fn series(&self) -> Option<&Arc<TimeSeries>> {
        match &self.series {
            SeriesSlot::Fresh(s) => Some(s),
            SeriesSlot::Stale => None,
        }
    }

    /// Return the fresh series, calling `fetch` first if it is stale.
    ///
    /// On a fetch error the slot stays stale.
    pub fn refresh<F>(&mut self, fetch: F) -> Result<Arc<TimeSeries>>
    where
        F: FnOnce() -> Result<TimeSeries>,
    {
        if let SeriesSlot::Fresh(s) = &self.series {
            return Ok(Arc::clone(s));
        }
        let series = Arc::new(fetch()?);
        self.series = SeriesSlot::Fresh(Arc::clone(&series));
        Ok(series)
    }

    pub fn bundle(&self) -> Option<&FeatureBundle> {
        self.bundle.as_ref()
    }

    pub fn store_bundle(&mut self, bundle: FeatureBundle) {
        self.bundle = Some(bundle);
    }
}
