pub mod format;
pub mod logging;
pub mod table;

pub use format::format_size;
pub use table::render_table;
