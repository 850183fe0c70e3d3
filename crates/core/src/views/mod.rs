pub mod reading_map;

pub use reading_map::render_reading_map;
