use std::path::Path;

/// Extensions (lowercase, without the dot) counted as captured images.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "tif", "tiff", "cr2", "nef", "dng", "arw"];

#[must_use]
pub fn is_image_extension(extension: &str) -> bool {
    IMAGE_EXTENSIONS.iter().any(|e| e.eq_ignore_ascii_case(extension))
}

/// True when the path's extension is in [`IMAGE_EXTENSIONS`]. Looks at the name only.
#[must_use]
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(is_image_extension)
}
