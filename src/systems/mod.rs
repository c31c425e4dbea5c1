//! Per-frame systems.
//!
//! Submodules overview
//! - [`input`] – poll the keyboard and diff snapshots into key edges
pub mod input;
