pub mod api;
pub mod auth;
pub mod config;
pub mod core;
pub mod repository;

pub use crate::auth::jwt::TokenService;
pub use crate::core::errors::UserServiceError;
pub use crate::repository::UserRepository;
pub use crate::repository::in_memory::InMemoryUserRepository;

#[cfg(test)]
mod tests;
