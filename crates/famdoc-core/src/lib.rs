//! famdoc Core Library
//!
//! Domain models and business logic for family case documentation:
//! data field definitions, typed answers and their edit rules, surveys,
//! master data, tabulation and role-based access.

pub mod access;
pub mod answer;
pub mod auth;
pub mod configuration;
pub mod data_field;
pub mod error;
pub mod family;
pub mod master_data;
pub mod settings;
pub mod survey;
pub mod user;

pub use error::{DocError, DocResult};
