//! Small shared helpers

pub mod hashing;
pub mod paths;

pub use hashing::stable_cell_id;
pub use paths::display_path;
