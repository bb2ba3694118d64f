//! Release-list to CSV library - parsing, normalization, IMDb lookup and output.

pub mod config;
pub mod enrich;
pub mod error;
pub mod error_log;
pub mod imdb;
pub mod lookup;
pub mod models;
pub mod normalize;
pub mod output;
pub mod progress;
pub mod release;
