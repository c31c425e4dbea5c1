//! Event types.
//!
//! - [`input`] – key codes and the press/release edges derived from polling
pub mod input;
