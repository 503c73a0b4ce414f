//! Templar Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the Templar
//! behavior-template expander, following hexagonal (ports and adapters)
//! architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           templar-cli (CLI)             │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │            (ExpandService)              │
//! │      One Session per Invocation         │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │         (Driven: DocumentLoader)        │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    templar-adapters (Infrastructure)    │
//! │  (FsDocumentLoader, XML read/write)     │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │       Domain Layer (Pure Logic)         │
//! │  (Node, ParamEnv, Evaluators, Walker)   │
//! │        No External Dependencies         │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use templar_adapters::FsDocumentLoader;
//! use templar_core::{application::ExpandService, expand::ExpandOptions};
//!
//! // 1. Configure an expansion (the loader comes from templar-adapters)
//! let options = ExpandOptions::new("/path/to/behavior-defs");
//!
//! // 2. Use the application service (with an injected loader adapter)
//! let service = ExpandService::new(Box::new(FsDocumentLoader::new()), options);
//! let tree = service.expand_file("aircraft.xml").unwrap();
//! ```

// Re-export domain layer (stable, well-defined API)
pub mod domain;

// Expression machinery (RPN + boolean condition trees)
pub mod eval;

// The expansion engine itself
pub mod expand;

// Re-export application layer (orchestration logic)
pub mod application;

// Re-export error types
pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{ExpandService, ports::DocumentLoader};
    pub use crate::domain::{Node, ParamEnv};
    pub use crate::error::{TemplarError, TemplarResult};
    pub use crate::expand::{ExpandOptions, TemplateStrictness};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
