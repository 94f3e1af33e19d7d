//! End-to-end coverage of location resolution, variant dispatch, and the
//! shared reader surface over real fixtures on disk.

use anyhow::Result;
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use dataroot::{create_reader, DatarootError, DecodeConfig, Reader};
use flate2::write::GzEncoder;
use flate2::Compression;
use image::{DynamicImage, Rgb, RgbImage};
use tempfile::TempDir;

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb([200, 30, 90]));
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageFormat::Png,
        )
        .expect("encode test image");
    bytes
}

/// A dataset directory with a csv annotation file and two images in a subfolder
fn create_dataset_dir(root: &Path) -> Result<()> {
    fs::write(root.join("train.csv"), "file_path,label\nimg/a.png,0\n")?;
    fs::create_dir(root.join("img"))?;
    fs::write(root.join("img").join("a.png"), png_bytes(1000, 500))?;
    fs::write(root.join("img").join("b.png"), png_bytes(32, 32))?;
    Ok(())
}

fn create_dataset_zip(path: &Path) -> Result<()> {
    let mut writer = zip::ZipWriter::new(File::create(path)?);
    let options =
        zip::write::SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
    writer.start_file("train.csv", options)?;
    writer.write_all(b"file_path,label\nimg/a.png,0\n")?;
    writer.add_directory("img/", options)?;
    writer.start_file("img/a.png", options)?;
    writer.write_all(&png_bytes(16, 16))?;
    writer.start_file("__MACOSX/._train.csv", options)?;
    writer.write_all(b"resource fork junk")?;
    writer.finish()?;
    Ok(())
}

fn create_dataset_tgz(path: &Path) -> Result<()> {
    let encoder = GzEncoder::new(File::create(path)?, Compression::default());
    let mut builder = tar::Builder::new(encoder);
    let data = png_bytes(16, 16);
    let mut header = tar::Header::new_gnu();
    header.set_size(data.len() as u64);
    header.set_mode(0o644);
    header.set_cksum();
    builder.append_data(&mut header, "img/a.png", data.as_slice())?;
    builder.into_inner()?.finish()?;
    Ok(())
}

fn as_set(entries: Vec<String>) -> HashSet<String> {
    entries.into_iter().collect()
}

#[test]
fn directory_dataset_end_to_end() -> Result<()> {
    let dir = TempDir::new()?;
    create_dataset_dir(dir.path())?;

    let reader = create_reader(dir.path(), None)?;
    assert!(matches!(reader, Reader::Directory(_)));

    // Every listed path opens
    let listed = reader.list_all()?;
    assert_eq!(listed.len(), 3);
    for path in &listed {
        let mut bytes = Vec::new();
        reader.open(path)?.read_to_end(&mut bytes)?;
        assert!(!bytes.is_empty());
    }

    // Filter laws
    assert_eq!(
        as_set(reader.list_files(&[".csv"], &[])?),
        as_set(vec!["train.csv".to_string()])
    );
    assert_eq!(
        as_set(reader.list_images(&[])?),
        as_set(vec!["img/a.png".to_string(), "img/b.png".to_string()])
    );
    assert_eq!(
        as_set(reader.list_images(&["img"])?),
        as_set(vec!["img/a.png".to_string(), "img/b.png".to_string()])
    );
    assert!(reader.list_files(&[".csv"], &["img"])?.is_empty());

    Ok(())
}

#[test]
fn zip_dataset_excludes_resource_forks() -> Result<()> {
    let dir = TempDir::new()?;
    let archive = dir.path().join("dataset.zip");
    create_dataset_zip(&archive)?;

    let reader = create_reader(archive.as_path(), None)?;
    assert!(matches!(reader, Reader::ZipArchive(_)));

    let listed = as_set(reader.list_all()?);
    assert_eq!(
        listed,
        as_set(vec!["train.csv".to_string(), "img/a.png".to_string()])
    );

    let mut content = String::new();
    reader.open("train.csv")?.read_to_string(&mut content)?;
    assert_eq!(content, "file_path,label\nimg/a.png,0\n");
    Ok(())
}

#[test]
fn gzipped_tar_dataset_end_to_end() -> Result<()> {
    let dir = TempDir::new()?;
    let archive = dir.path().join("dataset.tgz");
    create_dataset_tgz(&archive)?;

    let reader = create_reader(archive.as_path(), None)?;
    assert!(matches!(reader, Reader::TarArchive(_)));
    assert_eq!(reader.list_all()?, vec!["img/a.png"]);

    let img = reader.read_image("img/a.png", None, None)?;
    assert_eq!((img.width(), img.height()), (16, 16));
    Ok(())
}

#[test]
fn empty_input_yields_empty_reader() -> Result<()> {
    let reader = create_reader(Vec::<String>::new(), None)?;
    assert!(matches!(reader, Reader::Empty(_)));
    assert!(reader.list_all()?.is_empty());
    assert!(matches!(
        reader.open("anything"),
        Err(DatarootError::EmptyReader { .. })
    ));
    Ok(())
}

#[test]
fn multiple_distinct_roots_are_rejected() -> Result<()> {
    let dir_a = TempDir::new()?;
    let dir_b = TempDir::new()?;

    let result = create_reader(
        vec![
            dir_a.path().to_string_lossy().into_owned(),
            dir_b.path().to_string_lossy().into_owned(),
        ],
        None,
    );
    assert!(matches!(
        result,
        Err(DatarootError::MultiRootUnsupported { .. })
    ));
    Ok(())
}

#[test]
fn equality_is_reflexive_per_variant_and_fails_across_variants() -> Result<()> {
    let dir = TempDir::new()?;
    create_dataset_dir(dir.path())?;
    let archive = dir.path().join("dataset.zip");
    create_dataset_zip(&archive)?;

    let dir_reader = create_reader(dir.path(), None)?;
    let zip_a = create_reader(archive.as_path(), None)?;
    let zip_b = create_reader(archive.as_path(), None)?;
    let empty = create_reader(Option::<&str>::None, None)?;

    assert!(dir_reader.try_eq(&create_reader(dir.path(), None)?)?);
    assert!(zip_a.try_eq(&zip_b)?);
    assert!(empty.try_eq(&create_reader(Option::<&str>::None, None)?)?);

    assert!(matches!(
        dir_reader.try_eq(&zip_a),
        Err(DatarootError::ComparisonUnsupported { .. })
    ));
    Ok(())
}

#[test]
fn read_image_downscales_with_a_single_bound() -> Result<()> {
    let dir = TempDir::new()?;
    create_dataset_dir(dir.path())?;

    let reader = create_reader(dir.path(), None)?;
    // 1000x500 bounded to width 100 -> ratio 10 -> approximately 100x50
    let img = reader.read_image("img/a.png", Some(100), None)?;
    assert_eq!((img.width(), img.height()), (100, 50));

    // The small image already fits; no upscale
    let img = reader.read_image("img/b.png", Some(100), Some(100))?;
    assert_eq!((img.width(), img.height()), (32, 32));
    Ok(())
}

#[test]
fn get_image_info_summarizes_listed_images() -> Result<()> {
    let dir = TempDir::new()?;
    create_dataset_dir(dir.path())?;

    let reader = create_reader(dir.path(), None)?;
    let images = reader.list_images(&[])?;
    let rows = reader.get_image_info(&images)?;

    assert_eq!(rows.len(), 2);
    for row in &rows {
        assert!(images.contains(&row.file_path));
        assert!(row.size_kb > 0.0);
        assert!(row.width > 0 && row.height > 0);
    }
    Ok(())
}

#[test]
fn strict_summary_fails_on_undecodable_bytes() -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = TempDir::new()?;
    fs::write(dir.path().join("bad.png"), b"not an image")?;

    let reader = create_reader(dir.path(), None)?;
    let strict = DecodeConfig {
        tolerate_truncated: false,
    };
    assert!(matches!(
        reader.get_image_info_with(&["bad.png"], &strict),
        Err(DatarootError::Image { .. })
    ));

    // The tolerant default skips the row instead
    assert!(reader.get_image_info(&["bad.png"])?.is_empty());
    Ok(())
}

#[test]
fn archive_readers_resolve_through_a_downloader() -> Result<()> {
    use dataroot::{Downloader, ReaderFactory};

    struct Fixture {
        target: PathBuf,
    }

    impl Downloader for Fixture {
        fn fetch(
            &self,
            _location: &str,
            _name: Option<&str>,
            _extract: bool,
        ) -> dataroot::Result<PathBuf> {
            Ok(self.target.clone())
        }
    }

    let dir = TempDir::new()?;
    let archive = dir.path().join("dataset.zip");
    create_dataset_zip(&archive)?;

    let factory = ReaderFactory::new(Box::new(Fixture { target: archive }));
    let reader = factory.create("s3://bucket/dataset.zip", Some("dataset"))?;
    assert!(matches!(reader, Reader::ZipArchive(_)));
    assert!(reader.list_all()?.contains(&"train.csv".to_string()));
    Ok(())
}
