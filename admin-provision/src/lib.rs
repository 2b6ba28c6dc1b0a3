// Library exports for the CRM admin provisioning tool

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod password;
pub mod prompt;
pub mod provision;
pub mod record;
pub mod validation;
