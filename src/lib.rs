pub mod config;
pub mod connectivity;
pub mod constants;
pub mod error;
pub mod formation;
pub mod grid;
pub mod info;
pub mod march;
pub mod player;
pub mod rng;
pub mod simulator;
pub mod types;
