pub mod error;
pub mod fetch;
pub mod geocode;
pub mod network;
pub mod output;
pub mod parser;
pub mod stats;
pub mod track;
pub mod vertices;
