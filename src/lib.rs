#[macro_use]
extern crate log;

pub mod command;
pub mod config;
pub mod error;
pub mod runtime;
pub mod service;
pub mod state;
pub mod storage;
pub mod terminal;
pub mod utils;
pub mod view;
