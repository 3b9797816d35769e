//! Test helpers for creating hermetic Django project trees
//!
//! This module provides utilities for creating isolated temporary directories
//! laid out like a freshly started Django project, so generators can be run
//! against real files without a Python toolchain.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_helpers::test_helpers::TestProject;
//!
//! #[test]
//! fn test_register_app() {
//!     let project = TestProject::django("school").unwrap();
//!     project.add_app("blog").unwrap();
//!
//!     // Now run generators against project.context()
//! }
//! ```
