#[macro_use]
extern crate glium;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;

mod id_arena;

pub mod config;
pub mod error;
pub mod terrain;

pub use crate::config::TerrainConfig;
