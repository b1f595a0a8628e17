mod r#impl;
pub use r#impl::DEV_JWT_SECRET;
mod structs;

pub use structs::*;
