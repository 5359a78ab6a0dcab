//! Browser action primitives for the Affine environment.
//!
//! This crate provides the action vocabulary agents speak over the wire:
//! - 5 actions: navigate, click, type, scroll, wait
//! - 3 selector kinds: xpath, attribute value, tag contains
//! - Structured parse errors so callers can skip a bad action and keep going
//! - A small anchor locator that resolves selectors against static HTML

pub mod errors;
mod locator;
mod parse;
pub mod types;

pub use errors::*;
pub use locator::*;
pub use parse::*;
pub use types::*;
