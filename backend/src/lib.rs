//! # Weezart Analysis Backend
//!
//! Liked-song analysis for a music service.
//!
//! Given a user, the crate loads that user's likes, resolves each liked song
//! against the catalog and answers questions over the result: which liked
//! songs fall in a release-date range or genre, which were liked most
//! recently, which are the most popular, and how many likes landed on each
//! calendar day. A REST API built on Axum exposes the same queries.
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`models`]: Domain types (songs, likes, date ranges)
//! - [`api`]: Data Transfer Objects (DTOs) for API responses
//! - [`db`]: Repository traits, in-memory and Postgres backends
//! - [`services`]: The analysis functions and their repository-backed entry points
//! - [`http`]: Axum-based HTTP server and request handlers
//! - [`routes`]: Route-specific response types and route names

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod api;

pub mod db;
pub mod models;

pub mod routes;

pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
