//! Type registration (stage 1).
//!
//! Allocates one empty descriptor per declared type and assigns each a
//! collision-free 16-bit uid, later used for message-prefix tags.

use std::collections::BTreeMap;
use std::sync::Arc;

use pledge_diagnostic::{Diagnostic, ErrorCode};
use pledge_ir::ast::{TypeAttribute, TypeDecl};
use rustc_hash::FxHashSet;

use super::Resolver;
use crate::{crc16, TypeDescription, TypeKind};

/// Probe linearly from a hashed base until an unused uid is found.
///
/// Wraps around the 16-bit identifier space, so the probe terminates as
/// long as fewer than 65536 uids are taken.
pub(crate) fn probe_uid(base: u16, used: &FxHashSet<u16>) -> u16 {
    let mut uid = base;
    while used.contains(&uid) {
        uid = uid.wrapping_add(1);
    }
    uid
}

/// Interface tags declared directly on a contract or trait.
fn declared_interfaces(attributes: &[TypeAttribute]) -> Vec<String> {
    attributes
        .iter()
        .map(|TypeAttribute::Interface { name, .. }| name.value.clone())
        .collect()
}

impl Resolver<'_> {
    /// Register every declared type with an empty descriptor.
    pub(crate) fn register_types(&mut self) -> Result<(), Diagnostic> {
        let module = self.module;
        for decl in &module.types {
            let name = decl.name();
            if self.types.contains_key(name) {
                return Err(Diagnostic::error(
                    ErrorCode::E2001,
                    format!("Type {name} already exists"),
                    decl.span(),
                ));
            }

            let uid = probe_uid(crc16(name.as_bytes()), &self.used_uids);
            self.used_uids.insert(uid);

            let (kind, interfaces) = match decl {
                TypeDecl::Primitive(_) => (TypeKind::Primitive, Vec::new()),
                TypeDecl::Struct(_) => (TypeKind::Struct, Vec::new()),
                TypeDecl::Contract(c) => (TypeKind::Contract, declared_interfaces(&c.attributes)),
                TypeDecl::Trait(t) => (TypeKind::Trait, declared_interfaces(&t.attributes)),
            };

            self.types.insert(
                name.to_string(),
                TypeDescription {
                    kind,
                    origin: decl.origin(),
                    name: name.to_string(),
                    uid,
                    fields: Vec::new(),
                    traits: Vec::new(),
                    functions: BTreeMap::new(),
                    receivers: Vec::new(),
                    constants: Vec::new(),
                    interfaces,
                    depends_on: Vec::new(),
                    init: None,
                    partial_fields: Vec::new(),
                    ast: Arc::new(decl.clone()),
                },
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_skips_taken_uids() {
        let mut used = FxHashSet::default();
        used.insert(100);
        used.insert(101);
        assert_eq!(probe_uid(100, &used), 102);
        assert_eq!(probe_uid(99, &used), 99);
    }

    #[test]
    fn probe_wraps_around_the_identifier_space() {
        let mut used = FxHashSet::default();
        used.insert(u16::MAX);
        assert_eq!(probe_uid(u16::MAX, &used), 0);
    }
}
