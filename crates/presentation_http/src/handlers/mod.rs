//! HTTP request handlers

pub mod common;
pub mod departures;
pub mod health;
pub mod stops;
