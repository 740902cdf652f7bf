/// Result panel: the input, reference and difference images side by side
use iced::widget::{column, image, row, text, Column};
use iced::{font, Alignment, Element, Font, Length};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::runner::JobImages;
use crate::Message;

/// Images are scaled to fit this square, keeping their aspect ratio
pub const DISPLAY_BOX: f32 = 600.0;

/// One labelled image ready for display
#[derive(Debug, Clone)]
pub struct ResultImage {
    pub label: &'static str,
    pub path: PathBuf,
    pub handle: image::Handle,
    /// Pixel size on disk, if the header could be read
    pub dimensions: Option<(u32, u32)>,
}

impl ResultImage {
    /// Display size inside `DISPLAY_BOX`
    pub fn display_size(&self) -> (f32, f32) {
        match self.dimensions {
            Some((width, height)) => fit_within(width, height, DISPLAY_BOX),
            None => (DISPLAY_BOX, DISPLAY_BOX),
        }
    }
}

/// Scale `width`×`height` up or down to the largest size fitting a
/// `bound`×`bound` box with the same aspect ratio
pub fn fit_within(width: u32, height: u32, bound: f32) -> (f32, f32) {
    if width == 0 || height == 0 {
        return (bound, bound);
    }

    let (w, h) = (width as f32, height as f32);
    let scale = (bound / w).min(bound / h);
    (w * scale, h * scale)
}

/// Read image headers off the UI thread
pub async fn load_results(images: JobImages) -> Vec<ResultImage> {
    let fallback = images.clone();

    tokio::task::spawn_blocking(move || describe(&images, read_dimensions))
        .await
        .unwrap_or_else(|e| {
            warn!("Task join error while reading result images: {}", e);
            describe(&fallback, |_| None)
        })
}

fn describe(images: &JobImages, dimensions: impl Fn(&Path) -> Option<(u32, u32)>) -> Vec<ResultImage> {
    [
        ("Input Image", &images.input),
        ("Reference Image", &images.reference),
        ("Difference Image", &images.diff),
    ]
    .into_iter()
    .map(|(label, path)| ResultImage {
        label,
        path: path.clone(),
        handle: image::Handle::from_path(path),
        dimensions: dimensions(path),
    })
    .collect()
}

fn read_dimensions(path: &Path) -> Option<(u32, u32)> {
    match ::image::image_dimensions(path) {
        Ok(dimensions) => Some(dimensions),
        Err(e) => {
            warn!("Could not read {}: {}", path.display(), e);
            None
        }
    }
}

/// Three labelled images in a row
pub fn view<'a>(results: &'a [ResultImage]) -> Element<'a, Message> {
    let bold = Font {
        weight: font::Weight::Bold,
        ..Font::DEFAULT
    };

    let columns = results.iter().map(|result| -> Element<'a, Message> {
        let (width, height) = result.display_size();

        let caption = match result.dimensions {
            Some((w, h)) => format!("{} × {} px", w, h),
            None => result.path.display().to_string(),
        };

        column![
            text(result.label).size(16).font(bold),
            image(result.handle.clone())
                .width(Length::Fixed(width))
                .height(Length::Fixed(height)),
            text(caption).size(12),
        ]
        .spacing(10)
        .align_x(Alignment::Center)
        .into()
    });

    row(columns).spacing(20).padding(10).into()
}

/// Shown before the first successful run. Must not fill: it lives in a
/// scrollable that scrolls both ways.
pub fn placeholder() -> Element<'static, Message> {
    Column::new()
        .push(text("Processed Images Will Appear Here").size(16))
        .padding(40)
        .into()
}
