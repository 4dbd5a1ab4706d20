pub mod actor;
pub mod embed;
pub mod feed;
