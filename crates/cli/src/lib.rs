#[macro_use]
extern crate prettytable;

pub mod config_file;
pub mod constants;
pub mod csv;
pub mod file_utils;
pub mod model;
pub mod violations_table;
