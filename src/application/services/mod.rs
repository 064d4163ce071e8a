mod cross_validation_service;
mod ensemble_service;

pub use cross_validation_service::CrossValidationService;
pub use ensemble_service::{EnsemblePair, EnsembleService};
