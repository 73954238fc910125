mod executor;
mod helper;
pub mod models;
pub mod schema;

pub use executor::{Executor, InsertArticle};
pub use helper::{Error, Helper};
