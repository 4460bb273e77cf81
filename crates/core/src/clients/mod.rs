//! Clients module - client records and their tier assignment.

mod clients_model;
mod clients_repository;

pub use clients_model::ClientDB;
pub use clients_repository::ClientRepository;
