// Request handling module entry

pub mod headers;
pub mod router;
pub mod static_files;
