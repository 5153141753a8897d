//! Core selection and reporting logic.

pub mod collector;
pub mod reporter;
pub mod selector;
