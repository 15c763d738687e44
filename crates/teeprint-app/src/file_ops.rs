//! Native file dialogs.

use std::path::PathBuf;

/// Ask the user for a logo image.
pub fn pick_logo() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Choose Logo")
        .add_filter("Image", &["png", "jpg", "jpeg", "webp", "gif", "bmp"])
        .pick_file()
}

/// Save the exported PNG through a save dialog.
pub fn export_png(png_data: &[u8], file_name: &str) {
    let dialog = rfd::FileDialog::new()
        .set_title("Export Design")
        .set_file_name(file_name)
        .add_filter("PNG Image", &["png"]);

    if let Some(path) = dialog.save_file() {
        if let Err(e) = std::fs::write(&path, png_data) {
            log::error!("Failed to write PNG: {}", e);
        } else {
            log::info!("Exported PNG to: {:?}", path);
        }
    }
}
