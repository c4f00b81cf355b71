pub mod catalog_browse;
pub mod providers;
pub mod recommendations;
