//! Owned RGB pixel buffer that plotters draws into and `image` saves.

use super::ChartError;
use image::{ColorType, RgbImage};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

/// A drawing surface backed by memory.
pub struct Canvas {
    width: u32,
    height: u32,
    buffer: Vec<u8>,
}

impl Canvas {
    /// White canvas of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            buffer: vec![255; width as usize * height as usize * 3],
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Root drawing area over the whole canvas. Drop it before saving.
    pub fn area(&mut self) -> DrawingArea<BitMapBackend<'_>, Shift> {
        BitMapBackend::with_buffer(&mut self.buffer, (self.width, self.height))
            .into_drawing_area()
    }

    /// Write the canvas as an image; the format follows the file extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ChartError> {
        let path = path.as_ref();
        image::save_buffer(path, &self.buffer, self.width, self.height, ColorType::Rgb8)?;
        log::info!("Saved {}x{} image to {}", self.width, self.height, path.display());
        Ok(())
    }

    pub fn into_image(self) -> Result<RgbImage, ChartError> {
        RgbImage::from_raw(self.width, self.height, self.buffer)
            .ok_or_else(|| ChartError::Drawing("canvas buffer size mismatch".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn drawn_shapes_reach_the_buffer() {
        let mut canvas = Canvas::new(20, 10);
        {
            let area = canvas.area();
            area.draw(&Rectangle::new([(0, 0), (4, 4)], RED.filled()))
                .unwrap();
            area.present().unwrap();
        }

        let img = canvas.into_image().unwrap();
        assert_eq!(img.dimensions(), (20, 10));
        assert_eq!(img.get_pixel(2, 2).0, [255, 0, 0]);
        assert_eq!(img.get_pixel(15, 8).0, [255, 255, 255]);
    }

    #[test]
    fn save_writes_png() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("blank.png");
        Canvas::new(8, 8).save(&path).unwrap();

        let loaded = image::open(&path).unwrap();
        assert_eq!((loaded.width(), loaded.height()), (8, 8));
    }
}
