pub mod company;
pub mod drive;
pub mod loaders;

pub use company::{CompanyDetail, EmployeeInfo, PROFILE_HEADERS};
pub use drive::{DriveFile, FileList};
pub use loaders::{resolve_data_path, CompanyTable};
