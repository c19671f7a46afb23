pub mod catalog;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod importer;
pub mod models;
pub mod output;
pub mod rules;
