//! Receiver classification (stage 3).
//!
//! Each message-handler declaration maps to exactly one dispatch
//! selector per channel. Two receivers on one type may never share a
//! dispatch key.

use std::sync::Arc;

use pledge_diagnostic::{Diagnostic, ErrorCode};
use pledge_ir::ast::{Param, ReceiverBinding, ReceiverDecl, ReceiverSource};
use pledge_ir::ParsedType;

use super::{not_found, Resolver};
use crate::{ReceiverDescription, ReceiverSelector, TypeRef};

/// Raw byte-sequence primitive accepted by fallback and bounce
/// receivers.
const RAW_TYPE: &str = "Slice";

/// Text primitive accepted by comment-fallback receivers.
const TEXT_TYPE: &str = "String";

fn duplicate_message(selector: &ReceiverSelector) -> String {
    use ReceiverSelector as S;
    match selector {
        S::InternalFallback { .. } | S::ExternalFallback { .. } => {
            "Fallback receive function already exists".into()
        }
        S::InternalCommentFallback { .. } | S::ExternalCommentFallback { .. } => {
            "Comment fallback receive function already exists".into()
        }
        S::InternalEmpty | S::ExternalEmpty => "Empty receive function already exists".into(),
        S::InternalBinary { ty, .. } | S::ExternalBinary { ty, .. } => {
            format!("Receive function for {ty} already exists")
        }
        S::InternalComment { comment } | S::ExternalComment { comment } => {
            format!("Receive function for \"{comment}\" already exists")
        }
        S::InternalBounce { ty, .. } => {
            format!("Bounce receive function for {ty} already exists")
        }
    }
}

impl Resolver<'_> {
    /// Classify one receiver declaration and attach it to `owner`.
    pub(crate) fn resolve_receiver(
        &mut self,
        owner: &str,
        decl: &ReceiverDecl,
    ) -> Result<(), Diagnostic> {
        if matches!(decl.source, ReceiverSource::External(_)) && !self.ctx.externals_enabled() {
            return Err(Diagnostic::error(
                ErrorCode::E2021,
                "External receive functions are not enabled",
                decl.span,
            ));
        }

        let selector = match &decl.source {
            ReceiverSource::Internal(binding) => self.classify_binding(binding, true, decl)?,
            ReceiverSource::External(binding) => self.classify_binding(binding, false, decl)?,
            ReceiverSource::Bounce(param) => self.classify_bounce(param, decl)?,
        };

        let t = &self.types[owner];
        if t.receivers
            .iter()
            .any(|r| r.selector.same_dispatch(&selector))
        {
            return Err(Diagnostic::error(
                ErrorCode::E2020,
                duplicate_message(&selector),
                decl.span,
            ));
        }

        if let Some(t) = self.types.get_mut(owner) {
            t.receivers.push(ReceiverDescription {
                selector,
                ast: Arc::new(decl.clone()),
            });
        }
        Ok(())
    }

    /// Classify an internal/external receiver by its argument shape.
    fn classify_binding(
        &self,
        binding: &ReceiverBinding,
        internal: bool,
        decl: &ReceiverDecl,
    ) -> Result<ReceiverSelector, Diagnostic> {
        match binding {
            ReceiverBinding::Simple(param) => {
                let ParsedType::Simple { name, optional, .. } = &param.ty else {
                    return Err(Diagnostic::error(
                        ErrorCode::E2019,
                        "Receive function can only accept a message",
                        decl.span,
                    ));
                };
                if *optional {
                    return Err(Diagnostic::error(
                        ErrorCode::E2019,
                        "Receive function cannot have an optional argument",
                        decl.span,
                    ));
                }
                let Some(t) = self.types.get(name) else {
                    return Err(not_found(name, decl.span));
                };

                if t.kind.is_primitive() {
                    // Raw and text primitives get the fallback slots.
                    let binding = param.name.clone();
                    match name.as_str() {
                        RAW_TYPE if internal => Ok(ReceiverSelector::InternalFallback { binding }),
                        RAW_TYPE => Ok(ReceiverSelector::ExternalFallback { binding }),
                        TEXT_TYPE if internal => {
                            Ok(ReceiverSelector::InternalCommentFallback { binding })
                        }
                        TEXT_TYPE => Ok(ReceiverSelector::ExternalCommentFallback { binding }),
                        _ => Err(Diagnostic::error(
                            ErrorCode::E2019,
                            format!(
                                "Receive function can only accept message, {RAW_TYPE} or {TEXT_TYPE}"
                            ),
                            decl.span,
                        )),
                    }
                } else {
                    if !(t.kind.is_struct() && t.is_message()) {
                        return Err(Diagnostic::error(
                            ErrorCode::E2019,
                            "Receive function can only accept a message",
                            decl.span,
                        ));
                    }
                    let binding = param.name.clone();
                    let ty = name.clone();
                    if internal {
                        Ok(ReceiverSelector::InternalBinary { binding, ty })
                    } else {
                        Ok(ReceiverSelector::ExternalBinary { binding, ty })
                    }
                }
            }

            ReceiverBinding::Comment(lit) => {
                if lit.value.is_empty() {
                    return Err(Diagnostic::error(
                        ErrorCode::E2022,
                        "To handle empty comments, remove the argument instead of passing an empty string",
                        decl.span,
                    ));
                }
                let comment = lit.value.clone();
                if internal {
                    Ok(ReceiverSelector::InternalComment { comment })
                } else {
                    Ok(ReceiverSelector::ExternalComment { comment })
                }
            }

            ReceiverBinding::Empty => Ok(if internal {
                ReceiverSelector::InternalEmpty
            } else {
                ReceiverSelector::ExternalEmpty
            }),
        }
    }

    /// Classify a bounce receiver: raw byte-sequence or a truncated
    /// view of a specific message struct.
    fn classify_bounce(
        &self,
        param: &Param,
        decl: &ReceiverDecl,
    ) -> Result<ReceiverSelector, Diagnostic> {
        let (name, optional, bounced_ref) = match &param.ty {
            ParsedType::Simple { name, optional, .. } => (name, *optional, false),
            ParsedType::Bounced { name, .. } => (name, false, true),
            ParsedType::Map { .. } => {
                return Err(Diagnostic::error(
                    ErrorCode::E2019,
                    format!(
                        "Bounce receive function can only accept {RAW_TYPE} or bounced<T> types"
                    ),
                    decl.span,
                ));
            }
        };

        let Some(t) = self.types.get(name) else {
            return Err(not_found(name, decl.span));
        };
        let generic = !bounced_ref && t.kind.is_primitive() && name == RAW_TYPE;

        if !bounced_ref && optional {
            return Err(Diagnostic::error(
                ErrorCode::E2019,
                "Bounce receive function cannot have an optional argument",
                decl.span,
            ));
        }

        let ty = if generic {
            TypeRef::Ref {
                name: name.clone(),
                optional: false,
            }
        } else {
            if !t.kind.is_struct() {
                return Err(Diagnostic::error(
                    ErrorCode::E2019,
                    format!(
                        "Bounce receive function can only accept a message struct or {RAW_TYPE}"
                    ),
                    decl.span,
                ));
            }
            if !t.is_message() {
                return Err(Diagnostic::error(
                    ErrorCode::E2019,
                    "Bounce receive function can only accept a message struct",
                    decl.span,
                ));
            }
            TypeRef::Bounced { name: name.clone() }
        };

        Ok(ReceiverSelector::InternalBounce {
            binding: param.name.clone(),
            ty,
        })
    }
}
