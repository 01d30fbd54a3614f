pub mod badge;
pub mod config;
pub mod credential;
pub mod session;
