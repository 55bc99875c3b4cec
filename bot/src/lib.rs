#[macro_use]
pub mod macros;

pub mod bot;
pub mod command;
pub mod communicator;
pub mod connector;
pub mod filters;
pub mod handler;
pub mod persistence;
