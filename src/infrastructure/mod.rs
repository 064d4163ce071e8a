pub mod audio;
pub mod engines;
pub mod gpu;
pub mod normalize;
pub mod observability;
