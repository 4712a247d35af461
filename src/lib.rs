pub mod action;
pub mod app;
pub mod config;
pub mod controllers;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod registry;
pub mod response;
