pub mod account;
pub mod auth;
pub mod billing;
pub mod clients;
pub mod contracts;
pub mod dashboard;
pub mod documents;
pub mod finance;
pub mod profile;
pub mod proposals;
pub mod settings;
