pub mod audit;
pub mod emissions;
pub mod file_formats;
pub mod project;
pub mod regulation;
pub mod scenario;
