//! Client library for the Galaxy customer-management mock API.
//!
//! The backend is a hosted mock (mockapi.io project) exposing a single
//! `customers` collection that doubles as the user directory. This crate
//! provides:
//! - the session/auth lifecycle: token issuance, persistence, expiry and
//!   re-validation ([`auth`])
//! - customer CRUD plus the admin panel's field-validation rules
//!   ([`customers`])
//! - endpoint configuration from the environment ([`config`])
//!
//! ## Security
//! The auth scheme reproduces the mock backend faithfully and is insecure by
//! construction: passwords are compared in plaintext against the public
//! directory, and tokens are unsigned base64 over `email:timestamp` that any
//! client can forge. Do not reuse any of it outside the mock.

pub mod auth;
pub mod config;
pub mod customers;
pub mod error;
