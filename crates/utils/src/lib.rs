mod bytes;
pub mod media_types;
mod natural;
pub mod path;
mod progress;

pub use bytes::{bytes_to_gib, format_bytes, format_gib};
pub use natural::{natural_cmp, natural_sort};
pub use progress::Progress;
