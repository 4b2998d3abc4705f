pub mod app;
pub mod auth;
pub mod chat;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod llm;
pub mod middleware;

#[cfg(test)]
pub mod testing;
