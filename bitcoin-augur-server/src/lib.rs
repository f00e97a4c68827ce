//! HTTP server and background collection service for Bitcoin Augur fee estimation

pub mod api;
pub mod bitcoin;
pub mod cli;
pub mod config;
pub mod persistence;
pub mod server;
pub mod service;
