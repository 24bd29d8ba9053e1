pub mod field_vis;
