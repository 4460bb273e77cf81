//! Portfolios module - portfolio records owned by clients.

mod portfolios_model;
mod portfolios_repository;

pub use portfolios_model::PortfolioDB;
pub use portfolios_repository::PortfolioRepository;
