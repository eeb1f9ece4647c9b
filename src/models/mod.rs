// src/models/mod.rs

pub mod answer;
pub mod question;
pub mod report;
pub mod session;
pub mod signal;
pub mod violation;
