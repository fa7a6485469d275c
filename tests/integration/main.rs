//! End-to-end tests against the public crate API.

mod battle_flow;
mod health_properties;
