//! # TDS Rust Backend
//!
//! Scheduling engine for academic thesis-defense periods.
//!
//! This crate provides a Rust backend for the Thesis Defense Scheduling (TDS)
//! system. It owns the two temporally demanding parts of the surrounding
//! application: the activation lifecycle of an academic period (and of the
//! per-period defense schedule batch), and conflict-free assignment of rooms,
//! examiners, and advisors to defense events. The backend exposes a REST API
//! via Axum for the web frontend.
//!
//! ## Features
//!
//! - **Timed activation**: periods and schedule batches can be armed with a
//!   future instant and flip state lazily on the next poll, with no durable
//!   timer process
//! - **Conflict detection**: half-open interval overlap checks over rooms and
//!   people, reporting every finding instead of only the first
//! - **Capacity rules**: role exclusivity, examiner count bounds, and advisor
//!   load ceilings derived from the committed event corpus
//! - **Slot generation**: candidate room/time slots from configurable working
//!   hours, defense duration, gaps, breaks, and holidays
//! - **HTTP API**: RESTful endpoints for frontend integration
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`api`]: Identifier newtypes shared across all layers
//! - [`models`]: Domain types (periods, batches, events, civil time)
//! - [`engine`]: Pure scheduling logic: interval math, conflict detection,
//!   capacity allocation, and the two state machines
//! - [`db`]: Repository pattern and the in-memory persistence backend
//! - [`services`]: Business logic orchestration and the reconciliation driver
//! - [`http`]: Axum-based HTTP server and request handlers

pub mod api;
pub mod config;

pub mod db;
pub mod engine;
pub mod models;

pub mod services;

pub mod http;
