pub mod config;
pub mod document;
pub mod error;
pub mod rules;
pub mod telemetry;
pub mod transfer;

pub use error::AppError;
pub use rules::{DocumentRuleset, RulePipeline, Ruleset};
pub use transfer::{AccountTransfer, DeterminationService, ResponseMode};
