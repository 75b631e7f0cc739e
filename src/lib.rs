//! # formfaktura
//!
//! Ingestion of semi-structured e-service form-instance exports and
//! normalization into billing records for a downstream billing processor.
//!
//! The source platform exports one XML document per submitted form. The
//! document has no formal schema: repeating data groups are encoded purely
//! by naming convention (`<Computation1>`, `<Computation2>`, …, a tag stem
//! plus a 1-based row index). This crate decodes such documents, rebuilds
//! tabular invoice rows from the loosely-typed groups, validates that every
//! group family is populated consistently, and maps the result into one of
//! several recipient variants (external organization, private person, or a
//! fixed internal legal entity).
//!
//! All monetary values use [`rust_decimal::Decimal`] — never floating point.
//!
//! ## Quick Start
//!
//! ```rust
//! use formfaktura::{decode, map, FLOW_INSTANCE_NAMESPACE};
//!
//! let xml = br#"<?xml version="1.0" encoding="UTF-8"?>
//! <FlowInstance xmlns="http://www.oeplatform.org/version/1.0/schemas/flowinstance">
//!   <Header>
//!     <Flow><FamilyID>358</FamilyID></Flow>
//!     <FlowInstanceID>4711</FlowInstanceID>
//!   </Header>
//!   <Values>
//!     <payingAdministration>70 - Gatukontoret</payingAdministration>
//!     <seller>Hamnkontoret</seller>
//!     <Computation1>
//!       <text>Bryggplats maj</text>
//!       <quantity>1</quantity>
//!       <price>700</price>
//!     </Computation1>
//!     <CostCenterAccount1><costCenter>15810100</costCenter></CostCenterAccount1>
//!   </Values>
//! </FlowInstance>"#;
//!
//! let form = decode::decode_form_instance(xml, FLOW_INSTANCE_NAMESPACE).unwrap();
//! let record = map::map_form(&form).unwrap();
//! assert_eq!(record.invoice.customer_id.as_deref(), Some("70"));
//! assert_eq!(record.invoice.rows.len(), 1);
//! ```
//!
//! ## Pipeline
//!
//! [`decode`] → [`reconcile`](decode::reconcile) → [`assemble`] → [`map`],
//! producing one [`core::NormalizedBillingRecord`] per document or a typed
//! [`core::BillingError`]. The engine is synchronous and stateless across
//! invocations; every store and record is newly allocated per call, so
//! concurrent use needs no locking. Out-of-scope collaborators (document
//! retrieval, persistence, outbound delivery) are modelled as traits in
//! [`gateway`].

pub mod assemble;
pub mod core;
pub mod decode;
pub mod gateway;
pub mod map;
pub mod normalize;

// Re-export core types at crate root for convenience
pub use crate::core::*;

/// Default namespace of the platform's form-instance exports.
pub const FLOW_INSTANCE_NAMESPACE: &str =
    "http://www.oeplatform.org/version/1.0/schemas/flowinstance";
