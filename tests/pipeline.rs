//! End-to-end checks through the public API: real files on disk, the real
//! codec, and a scripted backend for the exact traversal scenario.

use image::{DynamicImage, GenericImageView};
use photo_optimizer::config::{self, FlagOverrides};
use photo_optimizer::imaging::{
    BackendError, DecodedImage, EncodedArtifact, ImageBackend, Quality, RustBackend,
    SearchError, SearchOptions, SizeTier, search,
};
use photo_optimizer::optimize::{OptimizeOptions, optimize_file};
use std::cell::RefCell;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

#[path = "../src/test_helpers.rs"]
mod test_helpers;

use test_helpers::{encode_test_jpeg, with_exif_orientation};

fn write(dir: &Path, name: &str, bytes: &[u8]) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, bytes).unwrap();
    path
}

#[test]
fn portrait_phone_photo_comes_out_upright_and_under_budget() {
    let tmp = TempDir::new().unwrap();
    // Stored landscape, tagged "rotate 90° clockwise to display".
    let source = write(tmp.path(), "IMG_0042.jpg", &with_exif_orientation(&encode_test_jpeg(320, 240), 6));
    let original_len = fs::metadata(&source).unwrap().len();

    let flags = FlagOverrides {
        target_size: Some(original_len / 3),
        sizes: Some(vec![
            SizeTier::Unbounded,
            SizeTier::Bounded(200),
            SizeTier::Bounded(100),
            SizeTier::Bounded(50),
        ]),
        ..FlagOverrides::default()
    };
    let config = config::load_config(None, &flags).unwrap();
    let options = OptimizeOptions::from_config(&config, None);

    let report = optimize_file(&RustBackend::new(), &source, &options).unwrap();

    assert!(report.optimized_size < original_len / 3);
    assert!(report.dimensions.height > report.dimensions.width);
    let written = image::open(&report.destination).unwrap();
    assert_eq!(
        written.dimensions(),
        (report.dimensions.width, report.dimensions.height)
    );
    let name = report.destination.file_name().unwrap().to_string_lossy();
    assert!(name.starts_with("IMG_0042."), "{name}");
    assert!(name.ends_with(".jpg"), "{name}");
}

#[test]
fn impossible_budget_fails_without_output() {
    let tmp = TempDir::new().unwrap();
    let source = write(tmp.path(), "tiny.jpg", &encode_test_jpeg(40, 30));
    let options = OptimizeOptions {
        search: SearchOptions {
            target_size: 1,
            ..SearchOptions::default()
        },
        ..OptimizeOptions::default()
    };

    assert!(optimize_file(&RustBackend::new(), &source, &options).is_err());
    assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 1);
}

/// Backend whose encoded sizes are scripted per `(width, quality)`.
struct Scripted {
    sizes: fn(u32, u8) -> usize,
    encodes: RefCell<Vec<(u32, u8)>>,
}

impl ImageBackend for Scripted {
    fn decode(&self, _: &[u8]) -> Result<DecodedImage, BackendError> {
        Err(BackendError::Decode("not used".into()))
    }

    fn resize(
        &self,
        _: &DynamicImage,
        width: u32,
        height: u32,
    ) -> Result<DynamicImage, BackendError> {
        Ok(DynamicImage::new_luma8(width, height))
    }

    fn encode(
        &self,
        image: &DynamicImage,
        quality: Quality,
    ) -> Result<EncodedArtifact, BackendError> {
        self.encodes
            .borrow_mut()
            .push((image.width(), quality.value()));
        Ok(EncodedArtifact::new(vec![
            0;
            (self.sizes)(image.width(), quality.value())
        ]))
    }
}

#[test]
fn first_fit_in_traversal_order_wins() {
    // Unbounded never fits; at 1000px q100 is over budget and q95 fits.
    let backend = Scripted {
        sizes: |width, quality| match (width, quality) {
            (1200, _) => 80_000,
            (1000, 100) => 50_000,
            (1000, 95) => 49_000,
            _ => 10,
        },
        encodes: RefCell::new(Vec::new()),
    };
    let image = DynamicImage::new_luma8(1200, 900);
    let options = SearchOptions {
        tiers: vec![SizeTier::Unbounded, SizeTier::Bounded(1000)],
        min_quality: 80,
        quality_step: 5,
        target_size: 50_000,
    };

    let result = search(&backend, &image, 200_000, &options).unwrap();

    assert_eq!(result.tier, SizeTier::Bounded(1000));
    assert_eq!(result.quality.value(), 95);
    assert_eq!(result.artifact.len(), 49_000);
    assert_eq!(
        backend.encodes.into_inner(),
        vec![
            (1200, 100),
            (1200, 95),
            (1200, 90),
            (1200, 85),
            (1200, 80),
            (1000, 100),
            (1000, 95),
        ]
    );
}

#[test]
fn exhausted_ladder_reports_every_attempt() {
    let backend = Scripted {
        sizes: |_, _| 1_000_000,
        encodes: RefCell::new(Vec::new()),
    };
    let image = DynamicImage::new_luma8(1200, 900);
    let options = SearchOptions {
        tiers: vec![SizeTier::Unbounded, SizeTier::Bounded(1000)],
        min_quality: 80,
        quality_step: 10,
        target_size: 50_000,
    };

    let err = search(&backend, &image, 0, &options).unwrap_err();

    assert!(matches!(err, SearchError::NoSolutionFound { attempts: 6, .. }));
    assert_eq!(backend.encodes.borrow().len(), 6);
}
