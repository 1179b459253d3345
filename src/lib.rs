//! # Entrata (Authentication Gateway)
//!
//! `entrata` mediates between client applications and a managed, cloud-hosted
//! identity directory. It translates application-level requests (email +
//! password, or email + confirmation code) into credentialed calls against
//! the remote directory and normalizes the directory's failure modes into a
//! small, stable error taxonomy.
//!
//! The gateway holds no user state: credentials, confirmation codes and
//! identity tokens are owned entirely by the remote directory. Every
//! credentialed call carries a per-request secret hash derived from the
//! application client id and secret, see [`auth::derive_secret_hash`].

pub mod auth;
pub mod cli;
pub mod directory;
pub mod entrata;
