pub mod blame;
pub mod cli;
pub mod error;
pub mod fallback;
pub mod fame;
pub mod filter;
pub mod git;
pub mod language;
pub mod model;
pub mod output;
pub mod rank;
pub mod store;
