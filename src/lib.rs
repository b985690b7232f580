//! Library exports for the exercise tracker and URL shortener services
//!
//! This module exposes internal components for testing and potential library usage.

pub mod database;
pub mod error;
pub mod exercise;
pub mod model;
pub mod route;
pub mod shorturl;
