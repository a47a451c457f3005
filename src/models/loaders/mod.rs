pub mod csv_loader;
pub mod data_path;

pub use csv_loader::CompanyTable;
pub use data_path::resolve_data_path;
