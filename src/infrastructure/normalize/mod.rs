mod ctm;
mod timestamped;
mod vendor;

pub use ctm::parse_ctm;
pub use timestamped::normalize_timestamped;
pub use vendor::{format_seconds, normalize_vendor_words, WireWord};
