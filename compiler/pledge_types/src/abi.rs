//! ABI shape mapping for fields.
//!
//! Maps a field declaration (declared type plus optional serialization
//! hint) to its on-wire ABI shape. Resolution only needs the *decision*
//! of how a field serializes — bit widths for the bounce budget — never
//! the encoding itself; the serializer crate consumes the same shapes
//! downstream.

use pledge_diagnostic::{Diagnostic, ErrorCode};
use pledge_ir::{ast, ParsedType};
use thiserror::Error;

/// On-wire shape of a single field.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum AbiType {
    /// A directly stored value: builtin or nested struct reference.
    Simple {
        /// ABI type name: `int`, `uint`, `bool`, `address`, `string`,
        /// `cell`, `slice`, `builder`, or a struct name.
        name: String,
        optional: bool,
        format: Option<AbiFormat>,
    },

    /// A dictionary stored out-of-line.
    Dict { key: String, value: String },
}

/// Width/format qualifier for a simple ABI type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AbiFormat {
    /// Fixed bit width, from an `intN`/`uintN` hint or the 257-bit
    /// integer default.
    Bits(u16),
    /// Variable-length amount encoding, fixed 124-bit budget cost.
    Coins,
}

/// A parse failure for a serialization hint.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum HintError {
    #[error("unknown serialization hint `{0}`")]
    Unknown(String),
    #[error("serialization hint `{0}` is out of range")]
    OutOfRange(String),
    #[error("serialization hint `{hint}` cannot apply to type `{ty}`")]
    WrongType { hint: String, ty: String },
}

/// A recognized serialization hint.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Hint {
    Int(u16),
    Uint(u16),
    Coins,
}

/// Parse an `as`-clause hint.
fn parse_hint(hint: &str) -> Result<Hint, HintError> {
    if hint == "coins" {
        return Ok(Hint::Coins);
    }
    if let Some(width) = hint.strip_prefix("int") {
        let width: u16 = width
            .parse()
            .map_err(|_| HintError::Unknown(hint.to_string()))?;
        if !(1..=257).contains(&width) {
            return Err(HintError::OutOfRange(hint.to_string()));
        }
        return Ok(Hint::Int(width));
    }
    if let Some(width) = hint.strip_prefix("uint") {
        let width: u16 = width
            .parse()
            .map_err(|_| HintError::Unknown(hint.to_string()))?;
        if !(1..=256).contains(&width) {
            return Err(HintError::OutOfRange(hint.to_string()));
        }
        return Ok(Hint::Uint(width));
    }
    Err(HintError::Unknown(hint.to_string()))
}

/// Resolve the ABI shape of a field declaration.
///
/// Serialization hints are only legal on `Int` fields; every other type
/// has exactly one wire shape.
pub fn resolve_abi_type(field: &ast::FieldDecl) -> Result<AbiType, Diagnostic> {
    match &field.ty {
        ParsedType::Simple { name, optional, .. } => {
            let hint = match &field.serialization {
                Some(hint) => Some(parse_hint(hint).map_err(|e| {
                    Diagnostic::error(ErrorCode::E2028, e.to_string(), field.span)
                })?),
                None => None,
            };

            if hint.is_some() && name != "Int" {
                let e = HintError::WrongType {
                    hint: field.serialization.clone().unwrap_or_default(),
                    ty: name.clone(),
                };
                return Err(Diagnostic::error(ErrorCode::E2028, e.to_string(), field.span));
            }

            let (abi_name, format) = match name.as_str() {
                "Int" => match hint {
                    Some(Hint::Int(width)) => ("int", Some(AbiFormat::Bits(width))),
                    Some(Hint::Uint(width)) => ("uint", Some(AbiFormat::Bits(width))),
                    Some(Hint::Coins) => ("uint", Some(AbiFormat::Coins)),
                    None => ("int", Some(AbiFormat::Bits(257))),
                },
                "Bool" => ("bool", None),
                "Address" => ("address", None),
                "String" => ("string", None),
                "Cell" => ("cell", None),
                "Slice" => ("slice", None),
                "Builder" => ("builder", None),
                other => (other, None),
            };

            Ok(AbiType::Simple {
                name: abi_name.to_string(),
                optional: *optional,
                format,
            })
        }

        ParsedType::Map { key, value, .. } => Ok(AbiType::Dict {
            key: key.clone(),
            value: value.clone(),
        }),

        ParsedType::Bounced { .. } => Err(Diagnostic::error(
            ErrorCode::E2014,
            "bounced<> cannot be used as a field type",
            field.span,
        )),
    }
}
