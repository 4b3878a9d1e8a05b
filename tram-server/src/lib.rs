//! Real-time tram tracking server.
//!
//! Ingests periodic GPS reports, keeps a live position table, infers which
//! station each tram is at along a circular route, flags trams that stop
//! moving, and pushes alerts to connected observers.

pub mod catalog;
pub mod domain;
pub mod notify;
pub mod proximity;
pub mod store;
pub mod topology;
pub mod tracking;
pub mod web;
