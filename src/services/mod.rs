pub mod dates;
pub mod entries;
pub mod feeds;
pub mod fetching;
pub mod text;
