use std::path::Path;

use crate::core::{ImageArtifacts, ImageBuffer};
use crate::pipeline::PipelineError;

/// Fill the mono8 / mono16 / color8 views from a decoded image.
///
/// Channel and bit-depth conversion is delegated to the `image` crate.
pub fn artifacts_from_image(img: &::image::DynamicImage) -> ImageArtifacts {
    let (w, h) = (img.width() as usize, img.height() as usize);
    ImageArtifacts {
        mono8: ImageBuffer::from_raw(w, h, 1, img.to_luma8().into_raw()),
        mono16: ImageBuffer::from_raw(w, h, 1, img.to_luma16().into_raw()),
        color8: ImageBuffer::from_raw(w, h, 3, img.to_rgb8().into_raw()),
        file_name: None,
        directory: None,
    }
}

/// Decode an image file and record its name and directory.
pub fn load_artifacts(path: impl AsRef<Path>) -> Result<ImageArtifacts, PipelineError> {
    let path = path.as_ref();
    let img = ::image::ImageReader::open(path)
        .map_err(::image::ImageError::IoError)?
        .decode()?;
    log::debug!(
        "loaded {} ({}x{})",
        path.display(),
        img.width(),
        img.height()
    );
    Ok(ImageArtifacts {
        file_name: path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned()),
        directory: path.parent().map(Path::to_path_buf),
        ..artifacts_from_image(&img)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Point;

    #[test]
    fn converted_arrays_share_dimensions() {
        let img = ::image::DynamicImage::new_rgb8(40, 30);
        let artifacts = artifacts_from_image(&img);
        assert_eq!(artifacts.dimensions(), Some((40, 30)));
        assert_eq!(artifacts.color8.as_ref().map(|b| b.channels), Some(3));
        assert_eq!(artifacts.mono16.as_ref().map(|b| b.data.len()), Some(1200));
        assert_eq!(artifacts.center(), Some(Point::new(20.0, 15.0)));
    }

    #[test]
    fn load_records_file_metadata() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("capture_left.png");
        ::image::GrayImage::new(8, 6).save(&path).expect("write png");

        let artifacts = load_artifacts(&path).expect("load png");
        assert_eq!(artifacts.file_name.as_deref(), Some("capture_left.png"));
        assert_eq!(artifacts.directory.as_deref(), Some(dir.path()));
        assert_eq!(artifacts.dimensions(), Some((8, 6)));
    }
}
