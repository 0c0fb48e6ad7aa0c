//! PNG encoding and image decoding for [`Canvas`].
//!
//! Writes go to a temporary file in the destination directory and are
//! renamed into place, so an interrupted run never leaves a truncated PNG.

use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use art_forge_core::error::GenError;
use art_forge_core::Canvas;
use image::ImageFormat;
use tempfile::NamedTempFile;

/// Writes a canvas as a PNG image at `path`, creating parent directories.
///
/// Returns `GenError::InvalidDimensions` if the canvas dimensions overflow
/// `u32`, or `GenError::Io` on write failure.
pub fn write_png(canvas: &Canvas, path: &Path) -> Result<(), GenError> {
    let w = u32::try_from(canvas.width()).map_err(|_| GenError::InvalidDimensions)?;
    let h = u32::try_from(canvas.height()).map_err(|_| GenError::InvalidDimensions)?;
    let img = image::RgbImage::from_raw(w, h, canvas.to_rgb_bytes())
        .ok_or_else(|| GenError::Io("RGB buffer size mismatch".into()))?;

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(io_err)?;

    let mut tmp = NamedTempFile::new_in(parent).map_err(io_err)?;
    {
        let mut out = BufWriter::new(tmp.as_file_mut());
        img.write_to(&mut out, ImageFormat::Png)
            .map_err(|e| GenError::Io(e.to_string()))?;
        out.flush().map_err(io_err)?;
    }
    tmp.persist(path).map_err(|e| io_err(e.error))?;
    Ok(())
}

/// Writes `<dir>/<stem>.png` and returns the full path.
pub fn save_png(canvas: &Canvas, dir: &Path, stem: &str) -> Result<PathBuf, GenError> {
    let path = dir.join(format!("{stem}.png"));
    write_png(canvas, &path)?;
    Ok(path)
}

/// Decodes any supported image file into an RGB canvas, dropping alpha.
pub fn load_rgb(path: &Path) -> Result<Canvas, GenError> {
    let img = image::open(path)
        .map_err(|e| GenError::Decode(format!("{}: {e}", path.display())))?
        .to_rgb8();
    let (w, h) = img.dimensions();
    Canvas::from_rgb_bytes(w as usize, h as usize, img.as_raw())
}

fn io_err(e: std::io::Error) -> GenError {
    GenError::Io(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use art_forge_core::Rgb;

    #[test]
    fn write_png_round_trip() {
        let mut canvas = Canvas::filled(16, 9, Rgb::new(10, 20, 30)).unwrap();
        canvas.put(3, 4, Rgb::WHITE);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.png");

        write_png(&canvas, &path).unwrap();

        let back = load_rgb(&path).unwrap();
        assert_eq!(back, canvas);
    }

    #[test]
    fn write_png_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let canvas = Canvas::new(2, 2).unwrap();
        let path = save_png(&canvas, &dir.path().join("a/b"), "tiny").unwrap();
        assert!(path.ends_with("a/b/tiny.png"));
        assert!(path.exists());
    }

    #[test]
    fn write_png_leaves_no_temp_files_behind() {
        let dir = tempfile::tempdir().unwrap();
        let canvas = Canvas::new(3, 3).unwrap();
        save_png(&canvas, dir.path(), "only").unwrap();
        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("only.png")]);
    }

    #[test]
    fn overwrite_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("same.png");
        write_png(&Canvas::new(4, 4).unwrap(), &path).unwrap();
        write_png(&Canvas::filled(5, 2, Rgb::WHITE).unwrap(), &path).unwrap();
        let back = load_rgb(&path).unwrap();
        assert_eq!((back.width(), back.height()), (5, 2));
    }

    #[test]
    fn load_rgb_rejects_non_images() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.png");
        std::fs::write(&path, b"definitely not a png").unwrap();
        assert!(matches!(load_rgb(&path), Err(GenError::Decode(_))));
    }

    #[test]
    fn load_rgb_drops_alpha() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rgba.png");
        let rgba = image::RgbaImage::from_pixel(2, 2, image::Rgba([200, 100, 50, 7]));
        rgba.save(&path).unwrap();
        let canvas = load_rgb(&path).unwrap();
        assert!(canvas.pixels().iter().all(|&p| p == Rgb::new(200, 100, 50)));
    }
}
