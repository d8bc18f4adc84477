// Function shape checks
//
// Decides whether a function signature can be bound as a callable. The
// reason strings end up in the generated member table and in the
// registry's skip log.

use syn::{FnArg, Pat, ReturnType, Signature, Type};

/// Largest arity rebind_sdk implements NativeFunction for
const MAX_ARITY: usize = 8;

/// Returns why `sig` cannot be bound, or `None` if it can.
pub fn unsupported_reason(sig: &Signature) -> Option<&'static str> {
    if sig.asyncness.is_some() {
        return Some("async functions are not supported");
    }
    if sig.unsafety.is_some() {
        return Some("unsafe functions are not supported");
    }
    if sig.abi.is_some() {
        return Some("extern functions are not supported");
    }
    if !sig.generics.params.is_empty() || sig.generics.where_clause.is_some() {
        return Some("generic functions are not supported");
    }
    if sig.variadic.is_some() {
        return Some("variadic functions are not supported");
    }
    if sig.inputs.len() > MAX_ARITY {
        return Some("too many parameters");
    }

    for input in &sig.inputs {
        let pat_type = match input {
            FnArg::Receiver(_) => return Some("methods are not supported"),
            FnArg::Typed(pat_type) => pat_type,
        };
        if !matches!(&*pat_type.pat, Pat::Ident(_)) {
            return Some("only simple identifiers are supported as parameters");
        }
        match strip_parens(&pat_type.ty) {
            Type::Reference(_) => return Some("reference parameters are not supported"),
            Type::ImplTrait(_) => return Some("impl Trait parameters are not supported"),
            _ => {}
        }
    }

    if let ReturnType::Type(_, ty) = &sig.output {
        if let Type::ImplTrait(_) = strip_parens(ty) {
            return Some("impl Trait return types are not supported");
        }
    }

    None
}

fn strip_parens(ty: &Type) -> &Type {
    match ty {
        Type::Paren(inner) => strip_parens(&inner.elem),
        Type::Group(inner) => strip_parens(&inner.elem),
        other => other,
    }
}
