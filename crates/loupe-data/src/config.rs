// DatasetConfig — where the dataset lives and how it is windowed

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Number of timesteps in every emitted window.
pub const WINDOW_LEN: usize = 16;

/// Default stretch target for collection images (width, height).
pub const IMAGE_SIZE: (u32, u32) = (224, 224);

/// Which split of the dataset root to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Split {
    Train,
    #[default]
    Test,
}

impl Split {
    /// Directory name of this split under the dataset root.
    pub fn dir_name(self) -> &'static str {
        match self {
            Split::Train => "train_data",
            Split::Test => "test_data",
        }
    }
}

/// Configuration for opening a [`CollectionDataset`](crate::CollectionDataset).
///
/// # Example
/// ```ignore
/// let config = DatasetConfig::new("data/nft")
///     .split(Split::Train)
///     .strict_exhaustion(true);
/// let mut ds = CollectionDataset::open(config)?;
/// ```
#[derive(Debug, Clone)]
pub struct DatasetConfig {
    /// Dataset root holding `train_data/` and `test_data/`.
    pub root: PathBuf,
    pub split: Split,
    /// Timesteps per window.
    pub window_len: usize,
    /// Image stretch target as (width, height).
    pub image_size: (u32, u32),
    /// Fail with [`Error::Exhausted`] instead of letting the caller run the
    /// cursor past the last collection.
    pub strict_exhaustion: bool,
}

impl DatasetConfig {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            split: Split::default(),
            window_len: WINDOW_LEN,
            image_size: IMAGE_SIZE,
            strict_exhaustion: false,
        }
    }

    pub fn split(mut self, split: Split) -> Self {
        self.split = split;
        self
    }

    pub fn window_len(mut self, len: usize) -> Self {
        self.window_len = len;
        self
    }

    pub fn image_size(mut self, width: u32, height: u32) -> Self {
        self.image_size = (width, height);
        self
    }

    pub fn strict_exhaustion(mut self, strict: bool) -> Self {
        self.strict_exhaustion = strict;
        self
    }

    /// The split directory whose subdirectories are the collections.
    pub fn split_dir(&self) -> PathBuf {
        self.root.join(self.split.dir_name())
    }

    pub fn validate(&self) -> Result<()> {
        if self.window_len == 0 {
            return Err(Error::InvalidConfig("window_len must be at least 1".into()));
        }
        let (w, h) = self.image_size;
        if w == 0 || h == 0 {
            return Err(Error::InvalidConfig(format!(
                "image_size must be non-zero, got {w}x{h}"
            )));
        }
        Ok(())
    }
}
