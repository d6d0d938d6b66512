//! Infrastructure layer: config, storage adapters, application service.

pub mod config;
pub mod error;
pub mod repository;
pub mod service;


pub use config::{ConfigError, QnaConfig};
pub use error::ServiceError;
pub use repository::{
    DeleteHistoryRepository, InMemoryDeleteHistoryRepository, InMemoryUserRepository,
    RepositoryError, UserRepository,
};
pub use service::QnaService;

/// Install process-wide logging as described by `config`.
pub fn bootstrap(config: &QnaConfig) {
    qna_observability::init(&config.tracing_settings());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bootstrap_with_defaults_is_repeatable() {
        let config = QnaConfig::default();
        bootstrap(&config);
        bootstrap(&config);
    }
}
