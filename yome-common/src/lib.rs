//! # Yome Common Library
//!
//! Shared code for the yome gene-annotation knowledgebase tools:
//! - Database initialization, records and the unit-of-work session
//! - Create / get-or-create helpers
//! - Query-to-table conversion and annotation-quality tagging
//! - HTML text extraction and report rendering
//! - Configuration loading
//! - Human-readable durations

pub mod annotation;
pub mod config;
pub mod db;
pub mod error;
pub mod html;
pub mod human_time;
pub mod render;
pub mod report;
pub mod table;

pub use annotation::{apply_keyword, AnnotationQuality};
pub use db::{create, get_or_create, Fields, Session, Value};
pub use error::{Error, Result};
pub use table::{to_table, Query, Table};
