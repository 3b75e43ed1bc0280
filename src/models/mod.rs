pub mod budget;
pub mod category;
pub mod summary;
pub mod transaction;
