//! Core of the mpfem multi-physics finite element framework.
//!
//! The framework is organized around a hierarchical registry in which applications register
//! their elements, conditions, materials and settings under dotted names. Solvers and models
//! look these up by name at runtime, typically from inside parallel loops.
//!
//! - [`registry`]: the registry tree itself.
//! - [`components`]: typed categories of named component prototypes.
//! - [`kernel`]: importing applications.
//! - [`parallel`]: parallel loops over index ranges.

pub mod components;
pub mod kernel;
pub mod parallel;

pub mod registry {
    pub use mpfem_registry::*;
}

pub extern crate mpfem_registry;
