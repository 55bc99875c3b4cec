#[macro_use]
mod macros;

pub mod basic_types;
pub mod deep_linking;
pub mod endpoints;
pub mod files;
pub mod helpers;
pub mod inline;
pub mod params;
pub mod payments;
pub mod proto;
pub mod request;
pub mod response;
pub mod warnings;
