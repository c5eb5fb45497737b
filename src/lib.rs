#![doc = include_str!("../README.md")]

pub mod cli;
pub mod driver;
pub mod error;
pub mod runtime;
pub mod selectors;
pub mod services;
pub mod tools;
pub mod types;

pub use driver::{DriverError, Element, PageDriver};
pub use error::*;
pub use services::*;
pub use types::*;
