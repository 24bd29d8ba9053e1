pub mod mode;
pub mod raster;
pub mod targets;
