pub mod builder;
pub mod wrapper;
