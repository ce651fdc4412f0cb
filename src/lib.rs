//! Backend for a student planner: courses, assignments, the weekly class
//! schedule, and grades derived from them.

pub mod api;
pub mod config;
pub mod dates;
pub mod error;
pub mod grades;
pub mod models;
pub mod repository;
pub mod services;
pub mod state;
