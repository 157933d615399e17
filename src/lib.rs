pub mod config;
pub mod controllers;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod schema;
pub mod seed;
pub mod session;
pub mod validation;
