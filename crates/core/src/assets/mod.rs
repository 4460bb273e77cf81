//! Assets module - dated asset valuations held inside portfolios.

mod assets_model;
mod assets_repository;

pub use assets_model::AssetDB;
pub use assets_repository::AssetRepository;
