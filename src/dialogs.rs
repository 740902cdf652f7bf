/// Native dialogs
///
/// All of these block the calling (UI) thread until dismissed, which is
/// what a modal error report or file picker is expected to do.
use rfd::{FileDialog, MessageButtons, MessageDialog, MessageLevel};
use std::path::PathBuf;

/// Extensions offered by the image pickers
pub const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Show the native image picker
pub fn pick_image() -> Option<PathBuf> {
    FileDialog::new()
        .set_title("Select Image")
        .add_filter("Image Files", &IMAGE_EXTENSIONS)
        .pick_file()
}

/// Show the native folder picker
pub fn pick_output_dir() -> Option<PathBuf> {
    FileDialog::new()
        .set_title("Select Output Directory")
        .pick_folder()
}

/// Modal error box with a single OK button
pub fn show_error(title: &str, message: &str) {
    MessageDialog::new()
        .set_level(MessageLevel::Error)
        .set_title(title)
        .set_description(message)
        .set_buttons(MessageButtons::Ok)
        .show();
}
