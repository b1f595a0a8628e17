pub mod entities;
pub mod grading;
pub mod lifecycle;
pub mod requests;
pub mod responses;
