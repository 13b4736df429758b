//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_authorization_graph_repository;
mod postgres_authorization_graph_repository;

pub use in_memory_authorization_graph_repository::InMemoryAuthorizationGraphRepository;
pub use postgres_authorization_graph_repository::{
    MIGRATOR, PostgresAuthorizationGraphRepository,
};
