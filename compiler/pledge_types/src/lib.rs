//! Semantic resolution for the Pledge compiler.
//!
//! Turns the parsed AST into fully resolved, queryable descriptors:
//! one [`TypeDescription`] per declared primitive, struct, trait and
//! contract, plus free functions, free constants and derived layout
//! metadata (uids, flattened traits, dependency closure, partial
//! bounce layouts).
//!
//! # Pipeline
//!
//! [`resolve_descriptors`] runs a strict pipeline: type registration,
//! field/constant resolution, function/init/receiver resolution,
//! structural checks, trait flattening and copy-down, dependency graph
//! construction, static functions/constants, partial layouts, and
//! finally publication into the immutable [`CompilerContext`].
//! Each stage reads only descriptors finalized by earlier stages; the
//! first violation aborts with a [`pledge_diagnostic::Diagnostic`].

mod abi;
mod const_eval;
mod context;
mod crc16;
mod descriptor;
pub mod resolve;
mod type_ref;

pub use abi::{resolve_abi_type, AbiFormat, AbiType};
pub use const_eval::resolve_constant_value;
pub use context::{CompilerContext, FEATURE_EXTERNALS};
pub use crc16::crc16;
pub use descriptor::{
    ConstantDescription, FieldDescription, FunctionArg, FunctionDescription, FunctionFlags,
    InitDescription, ReceiverDescription, ReceiverSelector, TypeDescription, TypeKind, Value,
};
pub use resolve::{resolve_descriptors, resolve_partial_fields, resolve_type_ref, to_bounced};
pub use type_ref::TypeRef;
