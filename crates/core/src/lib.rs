//! Shop Core - record schemas and document mapping.
//!
//! This crate sits between the HTTP surface and the document store:
//! - [`schema`] - Validation contracts for each record kind and the
//!   record-kind to collection table
//! - [`document`] - The loosely typed stored document representation
//! - [`mapper`] - Conversion from stored documents to output records
//! - [`types`] - Small value types shared by the schemas
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP. The optional `mongodb` feature adds conversions between
//! [`document::RawDocument`] and `bson::Document`.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod document;
pub mod mapper;
pub mod schema;
pub mod types;

pub use document::{RawDocument, RawValue};
pub use mapper::{MappingError, OrderOut, ProductOut, to_order_out, to_product_out};
pub use schema::{
    CollectionRegistry, FieldViolation, Order, OrderItem, Product, RecordKind, RegistryError,
    Schema, User, ValidationError, ViolationKind,
};
pub use types::*;
