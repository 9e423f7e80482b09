//! Storefront cart store and backend client.

pub mod backend;
pub mod config;
pub mod context;
pub mod domain;
pub mod observability;
pub mod render;

#[cfg(test)]
mod test;
