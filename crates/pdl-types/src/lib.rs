//! PDL Type System
//!
//! Type representation, union/intersection normalization and the subtyping
//! relation shared by the parser, the type checker and the schema engine.

#![warn(missing_docs)]

pub mod normalize;
pub mod subtyping;
pub mod ty;

pub use subtyping::{is_subtype, SubtypingContext, MAX_SUBTYPE_DEPTH};
pub use ty::{
    DynamicType, Field, FunctionType, ListType, Param, PrimitiveType, PromptType, RecordType,
    Type,
};
