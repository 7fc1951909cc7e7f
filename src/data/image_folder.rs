use std::fs;
use std::path::{Path, PathBuf};

use crate::data::dataset::Dataset;
use crate::error::{Result, TrainError};

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif"];

/// Images laid out as `<root>/<split>/<class index>/<file>`.
///
/// Files are decoded on access, resized to `size × size`, converted to
/// grayscale and normalized to [0, 1].
#[derive(Debug, Clone)]
pub struct ImageFolderDataset {
    pub split: String,
    pub size: u32,
    samples: Vec<(PathBuf, usize)>,
}

impl ImageFolderDataset {
    pub fn open(root: &Path, split: &str, num_classes: usize, size: u32) -> Result<ImageFolderDataset> {
        let split_dir = root.join(split);
        if !split_dir.is_dir() {
            return Err(TrainError::Dataset(format!(
                "missing split directory {}",
                split_dir.display()
            )));
        }

        let mut class_dirs: Vec<(usize, PathBuf)> = Vec::new();
        for entry in fs::read_dir(&split_dir)? {
            let path = entry?.path();
            if !path.is_dir() {
                continue;
            }
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
            let class = name.parse::<usize>().ok().filter(|&c| c < num_classes).ok_or_else(|| {
                TrainError::Dataset(format!(
                    "{} is not a class index in 0..{}",
                    path.display(),
                    num_classes
                ))
            })?;
            class_dirs.push((class, path));
        }
        class_dirs.sort();

        let mut samples = Vec::new();
        for (class, dir) in class_dirs {
            let mut files: Vec<PathBuf> = fs::read_dir(&dir)?
                .filter_map(|e| e.ok().map(|e| e.path()))
                .filter(|p| is_image(p))
                .collect();
            files.sort();
            samples.extend(files.into_iter().map(|p| (p, class)));
        }

        log::debug!("{} split: {} images under {}", split, samples.len(), split_dir.display());

        Ok(ImageFolderDataset { split: split.to_string(), size, samples })
    }

    pub fn feature_count(&self) -> usize {
        let side = self.size as usize;
        side * side
    }
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Decodes image bytes, resizes to `size × size`, converts to grayscale,
/// and normalizes pixels to [0, 1].
pub fn image_bytes_to_grayscale_input(bytes: &[u8], size: u32) -> Result<Vec<f64>> {
    let img = image::load_from_memory(bytes)?;
    let resized = img.resize_exact(size, size, image::imageops::FilterType::Triangle);
    let gray = resized.to_luma8();
    Ok(gray.pixels().map(|p| p.0[0] as f64 / 255.0).collect())
}

impl Dataset for ImageFolderDataset {
    fn len(&self) -> usize {
        self.samples.len()
    }

    fn get(&self, index: usize) -> Result<(Vec<f64>, usize)> {
        let (path, label) = self.samples.get(index).ok_or_else(|| {
            TrainError::Dataset(format!("index {} out of range for {} images", index, self.samples.len()))
        })?;
        let bytes = fs::read(path)?;
        Ok((image_bytes_to_grayscale_input(&bytes, self.size)?, *label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    fn write_image(path: &Path, value: u8) {
        GrayImage::from_pixel(8, 8, Luma([value])).save(path).unwrap();
    }

    #[test]
    fn reads_class_directories_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let train = dir.path().join("train");
        fs::create_dir_all(train.join("0")).unwrap();
        fs::create_dir_all(train.join("1")).unwrap();
        write_image(&train.join("0/a.png"), 0);
        write_image(&train.join("1/b.png"), 255);
        fs::write(train.join("1/notes.txt"), "ignored").unwrap();

        let ds = ImageFolderDataset::open(dir.path(), "train", 2, 4).unwrap();
        assert_eq!(ds.len(), 2);

        let (pixels, label) = ds.get(1).unwrap();
        assert_eq!(label, 1);
        assert_eq!(pixels.len(), 16);
        assert!(pixels.iter().all(|&p| (p - 1.0).abs() < 1e-9));
    }

    #[test]
    fn unknown_class_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("val/7")).unwrap();
        assert!(matches!(
            ImageFolderDataset::open(dir.path(), "val", 2, 4),
            Err(TrainError::Dataset(_))
        ));
    }

    #[test]
    fn missing_split_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ImageFolderDataset::open(dir.path(), "train", 2, 4).is_err());
    }
}
