pub mod overlay;
pub mod vis2d;
