pub mod batch;
pub mod locate;
pub mod query;
pub mod tiles;
