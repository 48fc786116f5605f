//! Partial bounce layout (stage 8).
//!
//! A bounced message carries only a fixed-size prefix of the original
//! body. This stage decides, per struct, the longest prefix of fields a
//! bounce handler can still read.

use crate::{AbiFormat, AbiType, FieldDescription, TypeDescription};

use super::Resolver;

/// Bits of a bounced message body left for field data.
const BOUNCE_BUDGET_BITS: i64 = 224;

/// Fixed cost of the variable-length amount encoding.
const COINS_BITS: i64 = 124;

/// Fixed cost of a serialized address.
const ADDRESS_BITS: i64 = 267;

/// Compute the longest field prefix that fits the bounce budget.
///
/// Walks fields in declaration order, charging each field's bit cost
/// against the budget. The walk stops at the first field that would
/// overflow, or whose shape has no fixed bit cost (dictionaries,
/// byte-sequence references, nested structures) — later fields are
/// never considered, even if they would individually fit.
pub fn resolve_partial_fields(ty: &TypeDescription) -> Vec<FieldDescription> {
    if !ty.kind.is_struct() {
        return Vec::new();
    }

    let mut remaining = BOUNCE_BUDGET_BITS;
    let mut partial = Vec::new();

    for field in &ty.fields {
        let AbiType::Simple {
            name,
            optional,
            format,
        } = &field.abi
        else {
            break;
        };

        let mut bits = i64::from(*optional);
        match format {
            Some(AbiFormat::Bits(width)) => bits += i64::from(*width),
            Some(AbiFormat::Coins) => bits += COINS_BITS,
            None => match name.as_str() {
                "address" => bits += ADDRESS_BITS,
                "bool" => bits += 1,
                _ => break,
            },
        }

        if remaining - bits >= 0 {
            remaining -= bits;
            partial.push(field.clone());
        } else {
            break;
        }
    }

    partial
}

impl Resolver<'_> {
    /// Populate `partial_fields` on every struct (stage 8).
    pub(crate) fn resolve_partial_layouts(&mut self) {
        let names: Vec<String> = self.types.keys().cloned().collect();
        for name in names {
            let partial = resolve_partial_fields(&self.types[&name]);
            if let Some(t) = self.types.get_mut(&name) {
                t.partial_fields = partial;
            }
        }
    }
}
