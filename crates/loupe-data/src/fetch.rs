// Resource fetchers — per-collection I/O primitives
//
// Each collection directory holds three resources:
//
//   <split_dir>/<collection>/
//     description.txt    plain text
//     image.png          any size, anything convertible to RGB
//     time_series.json   records with the five metric fields
//
// Fetchers are stateless: every call reads from storage again. Caching is
// the job of CollectionCache, which is why the cursor is generic over this
// trait.

use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use loupe_core::Tensor;

use crate::config::IMAGE_SIZE;
use crate::error::{Error, Result};
use crate::series::TimeSeries;

pub const DESCRIPTION_FILE: &str = "description.txt";
pub const IMAGE_FILE: &str = "image.png";
pub const SERIES_FILE: &str = "time_series.json";

/// Loads the resources of a collection, identified by its catalog name.
pub trait ResourceFetcher {
    /// The collection's description text, verbatim.
    fn fetch_description(&self, collection: &str) -> Result<String>;

    /// The collection image as a `[1, 3, H, W]` tensor.
    fn fetch_image(&self, collection: &str) -> Result<Tensor>;

    /// The collection's series in file order.
    fn fetch_series(&self, collection: &str) -> Result<TimeSeries>;
}

/// Reads collection resources from a split directory.
#[derive(Debug, Clone)]
pub struct FsFetcher {
    split_dir: PathBuf,
    /// Image stretch target (width, height).
    image_size: (u32, u32),
}

impl FsFetcher {
    pub fn new<P: AsRef<Path>>(split_dir: P) -> Self {
        Self {
            split_dir: split_dir.as_ref().to_path_buf(),
            image_size: IMAGE_SIZE,
        }
    }

    pub fn image_size(mut self, width: u32, height: u32) -> Self {
        self.image_size = (width, height);
        self
    }

    fn resource(&self, collection: &str, file: &str) -> PathBuf {
        self.split_dir.join(collection).join(file)
    }
}

impl ResourceFetcher for FsFetcher {
    fn fetch_description(&self, collection: &str) -> Result<String> {
        let path = self.resource(collection, DESCRIPTION_FILE);
        std::fs::read_to_string(&path).map_err(|e| Error::io(path, e))
    }

    fn fetch_image(&self, collection: &str) -> Result<Tensor> {
        let path = self.resource(collection, IMAGE_FILE);
        let (w, h) = self.image_size;
        load_image(&path, w, h)
    }

    fn fetch_series(&self, collection: &str) -> Result<TimeSeries> {
        let path = self.resource(collection, SERIES_FILE);
        let bytes = std::fs::read(&path).map_err(|e| Error::io(&path, e))?;
        TimeSeries::from_json_slice(&bytes).map_err(|e| Error::Parse {
            path,
            reason: e.to_string(),
        })
    }
}

/// Decode an image, force RGB, stretch it to `width x height` and return it
/// as a `[1, 3, height, width]` tensor of raw 0..255 values.
///
/// The resize ignores aspect ratio: nothing is cropped or padded.
pub fn load_image(path: &Path, width: u32, height: u32) -> Result<Tensor> {
    let bytes = std::fs::read(path).map_err(|e| Error::io(path, e))?;
    let img = image::load_from_memory(&bytes).map_err(|e| Error::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let rgb = img.to_rgb8();
    let rgb = image::imageops::resize(&rgb, width, height, FilterType::CatmullRom);
    let raw = rgb.as_raw();

    // [H, W, C] interleaved -> [C, H, W] planar
    let npix = (width as usize) * (height as usize);
    let mut data = vec![0.0f32; 3 * npix];
    for i in 0..npix {
        data[i] = raw[i * 3] as f32; // R
        data[npix + i] = raw[i * 3 + 1] as f32; // G
        data[2 * npix + i] = raw[i * 3 + 2] as f32; // B
    }

    let image = Tensor::from_vec(data, (3, height as usize, width as usize))?;
    Ok(image.unsqueeze(0)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn image_is_stretched_and_channel_first() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("image.png");
        // 64x8 image: left half red, right half blue
        let img = RgbImage::from_fn(64, 8, |x, _| {
            if x < 32 {
                Rgb([255, 0, 0])
            } else {
                Rgb([0, 0, 255])
            }
        });
        img.save(&path).unwrap();

        let t = load_image(&path, 8, 8).unwrap();
        assert_eq!(t.dims(), &[1, 3, 8, 8]);
        // top-left pixel: red
        assert!(t.get(&[0, 0, 0, 0]).unwrap() >= 254.0);
        assert_eq!(t.get(&[0, 2, 0, 0]).unwrap(), 0.0);
        // bottom-right pixel: blue
        assert_eq!(t.get(&[0, 0, 7, 7]).unwrap(), 0.0);
        assert!(t.get(&[0, 2, 7, 7]).unwrap() >= 254.0);
    }

    #[test]
    fn grayscale_image_becomes_three_channels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("image.png");
        image::GrayImage::from_pixel(3, 3, image::Luma([100])).save(&path).unwrap();

        let t = load_image(&path, 3, 3).unwrap();
        assert_eq!(t.dims(), &[1, 3, 3, 3]);
        for c in 0..3 {
            let v = t.get(&[0, c, 1, 1]).unwrap();
            assert!((v - 100.0).abs() <= 1.0, "channel {c}: {v}");
        }
    }

    #[test]
    fn corrupt_image_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("image.png");
        std::fs::write(&path, b"definitely not a png").unwrap();
        assert!(matches!(
            load_image(&path, 4, 4),
            Err(Error::Decode { .. })
        ));
    }

    #[test]
    fn missing_resources_are_not_found() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("azuki")).unwrap();
        let f = FsFetcher::new(dir.path());
        assert!(matches!(
            f.fetch_description("azuki"),
            Err(Error::NotFound { .. })
        ));
        assert!(matches!(f.fetch_image("azuki"), Err(Error::NotFound { .. })));
        assert!(matches!(f.fetch_series("azuki"), Err(Error::NotFound { .. })));
    }

    #[test]
    fn malformed_series_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("azuki")).unwrap();
        std::fs::write(dir.path().join("azuki").join(SERIES_FILE), b"{not json").unwrap();
        let f = FsFetcher::new(dir.path());
        assert!(matches!(f.fetch_series("azuki"), Err(Error::Parse { .. })));
    }

    #[test]
    fn description_is_read_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("azuki")).unwrap();
        std::fs::write(dir.path().join("azuki").join(DESCRIPTION_FILE), "A garden.\n").unwrap();
        let f = FsFetcher::new(dir.path());
        assert_eq!(f.fetch_description("azuki").unwrap(), "A garden.\n");
    }
}
