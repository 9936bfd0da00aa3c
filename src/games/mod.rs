//! Game implementations.

pub mod go;
