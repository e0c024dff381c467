//! Adapters to external systems
//!
//! Ferry talks to exactly one kind of external system, a FHIR R4 server over
//! HTTP(S).

pub mod fhir;
