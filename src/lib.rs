pub mod config;
pub mod events;
pub mod gauge;
pub mod gui;
pub mod macros;
pub mod sys;
