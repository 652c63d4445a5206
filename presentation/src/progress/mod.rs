//! Progress reporting during runs

pub mod reporter;
