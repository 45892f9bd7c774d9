//! Support modules for the reviewer notification BDD tests.

pub(crate) mod mocks;
pub(crate) mod state;
