//! # Path Resolution
//!
//! This crate turns user-typed paths into canonical absolute paths inside
//! the managed namespace.
//!
//! ## Design
//!
//! - A canonical path always uses `/` as separator, is always absolute,
//!   and never ends in `/` unless it is exactly `/`
//! - Raw input may be relative, may use `.` and `..`, and may carry a
//!   platform drive marker pasted in from elsewhere
//! - Resolution happens against an explicit working directory passed in
//!   by the caller; there is no global state
//! - The portion of a path below a given root (the relative suffix) is
//!   what allows a copy to rebuild subtree shape under a different root

pub mod resolve;
pub mod suffix;

pub use resolve::{PathError, PathResolver};
pub use suffix::suffix_of;
