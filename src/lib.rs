pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod observer;
pub mod routes;
pub mod seed;
pub mod server;
pub mod services;
pub mod state;
