// CollectionDataset — the surface a trainer or evaluator drives
//
//   let mut ds = CollectionDataset::open(DatasetConfig::new("data").split(Split::Train))?;
//   for c in 0..ds.len() {
//       let features = ds.get_features(c)?;
//       loop {
//           let step = ds.get_window(c)?;
//           // feed features + step.window to the model
//           if step.rolled_over {
//               break;
//           }
//       }
//   }
//
// Stopping after the last collection is the caller's job unless the config
// enables strict exhaustion.

use std::sync::Arc;

use crate::cache::FeatureBundle;
use crate::catalog::CollectionCatalog;
use crate::config::DatasetConfig;
use crate::cursor::{CursorState, WindowCursor, WindowStep};
use crate::error::Result;
use crate::fetch::{FsFetcher, ResourceFetcher};

/// A collection dataset with one windowing cursor.
pub struct CollectionDataset<F = FsFetcher> {
    cursor: WindowCursor<F>,
}

impl CollectionDataset<FsFetcher> {
    /// Scan the configured split directory and read from the filesystem.
    pub fn open(config: DatasetConfig) -> Result<Self> {
        config.validate()?;
        let split_dir = config.split_dir();
        let catalog = CollectionCatalog::scan(&split_dir)?;
        let (w, h) = config.image_size;
        let fetcher = FsFetcher::new(&split_dir).image_size(w, h);
        tracing::info!(
            dir = %split_dir.display(),
            collections = catalog.count(),
            "opened collection dataset"
        );
        Self::with_fetcher(Arc::new(catalog), fetcher, &config)
    }
}

impl<F: ResourceFetcher> CollectionDataset<F> {
    /// Use an existing catalog and a custom fetcher. Only the windowing
    /// fields of `config` apply.
    pub fn with_fetcher(
        catalog: Arc<CollectionCatalog>,
        fetcher: F,
        config: &DatasetConfig,
    ) -> Result<Self> {
        config.validate()?;
        let cursor = WindowCursor::new(catalog, fetcher)
            .window_len(config.window_len)
            .strict_exhaustion(config.strict_exhaustion);
        Ok(Self { cursor })
    }

    /// Number of collections.
    pub fn len(&self) -> usize {
        self.cursor.collection_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Description, image and initial window of `collection`.
    pub fn get_features(&mut self, collection: usize) -> Result<FeatureBundle> {
        self.cursor.get_features(collection)
    }

    /// Next window of the cursor's walk, loading `collection` if needed.
    pub fn get_window(&mut self, collection: usize) -> Result<WindowStep> {
        self.cursor.next_window(collection)
    }

    pub fn catalog(&self) -> &Arc<CollectionCatalog> {
        self.cursor.catalog()
    }

    pub fn state(&self) -> CursorState {
        self.cursor.state()
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor.is_exhausted()
    }

    pub fn cursor(&self) -> &WindowCursor<F> {
        &self.cursor
    }

    pub fn cursor_mut(&mut self) -> &mut WindowCursor<F> {
        &mut self.cursor
    }
}
