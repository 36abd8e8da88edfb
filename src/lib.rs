#![recursion_limit = "256"]

//! Customer churn prediction: an offline trainer that fits a one-hot +
//! standardized logistic regression pipeline on the Telco churn table,
//! and an inference service that scores single customer records against
//! the saved artifact.
//!
//! Layers, outermost first: `cli` → `application` → `domain` / `data` /
//! `ml` → `infra`.

pub mod cli;
pub mod application;
pub mod domain;
pub mod data;
pub mod ml;
pub mod infra;
