//! Entity, configuration and report types.

pub mod config;
pub mod entity;
pub mod report;
pub mod sites;
pub mod taxonomy;
