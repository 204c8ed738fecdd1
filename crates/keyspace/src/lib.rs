//! # Civic Keyspace
//!
//! Every entity the assistant persists lives in one table keyed by a partition key and a
//! sort key. This crate owns that key design.
//!
//! ## Layout
//!
//! ```text
//! Garbage route        T<district>#        T<district>#
//! Park reservation     P<park>#            R<date>#
//! Bulk waste request   G<route>#           R<date>#C<citizen>#
//! Form template        #F<template>#       #F<template>#
//! Template field       #F<template>#       #F<template>#F<field>#
//! Form version         #F<template>#       #F<template>#C<citizen>#V<version>#
//! Field value          #F<template>#       #F<template>#C<citizen>#V<version>#F<field>#
//! ```
//!
//! Each segment starts with a one-letter type tag and ends with `#`, so identifiers may
//! never contain `#`. The partition key groups one logical container; sort-key prefixes
//! select sub-ranges of it for `begins_with` queries.
//!
//! ## Example
//!
//! ```rust
//! use civic_keyspace::{EntityKey, ScanPrefix};
//!
//! let key = EntityKey::FormTemplateField { template_id: "permit", field_id: "3" }.encode()?;
//! assert_eq!(key.pk, "#Fpermit#");
//! assert_eq!(key.sk, "#Fpermit#F3#");
//!
//! let scan = ScanPrefix::TemplateFields { template_id: "permit" }.encode()?;
//! assert!(key.sk.starts_with(&scan.sk_prefix));
//! # Ok::<(), civic_keyspace::KeyError>(())
//! ```

mod calendar;
mod error;
mod key;
mod scan;
mod segment;

pub use calendar::{available_days, format_date, DATE_FORMAT};
pub use error::{KeyError, Result};
pub use key::{EntityKey, StorageKey};
pub use scan::{KeyPrefix, ScanPrefix};
pub use segment::DELIMITER;
