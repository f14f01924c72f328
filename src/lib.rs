//! Server-rendered movie discovery front end for the CineSuggest backend.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
pub mod views;
