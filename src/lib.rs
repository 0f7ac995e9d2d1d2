// Sensor timeline - Multi-track sensor chart synthesis and dashboard coordination
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod presentation;
