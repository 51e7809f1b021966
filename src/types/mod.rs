mod access;
mod models;

pub use access::AccessLevel;
pub use models::*;
