//! Core library for thinky: time normalization, JSON recovery from
//! generator output, the generation collaborator seam, prompt builders, and
//! the mood, schedule, and nutrition agents.

pub mod agent;
pub mod extract;
pub mod generator;
pub mod models;
pub mod prompt;
pub mod time;
