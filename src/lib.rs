//! Scores how well a candidate profile fits an internship opportunity and
//! builds ranking, recommendation and allocation views on top of that score.

pub mod allocation;
pub mod catalog;
pub mod config;
pub mod output;
pub mod profile;
pub mod scoring;
pub mod server;
