// #[entity] proc-macro implementation
//
// Walks the items of an inline module and generates its member table.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::meta::ParseNestedMeta;
use syn::{Attribute, Expr, ExprLit, Item, ItemFn, Lit, LitStr, Meta, Result};

use crate::shape::unsupported_reason;

/// Arguments of `#[entity(...)]`
#[derive(Default)]
pub struct EntityArgs {
    name: Option<LitStr>,
}

impl EntityArgs {
    pub fn parse(&mut self, meta: ParseNestedMeta) -> Result<()> {
        if meta.path.is_ident("name") {
            let name: LitStr = meta.value()?.parse()?;
            if name.value().is_empty() {
                return Err(syn::Error::new_spanned(name, "entity name must not be empty"));
            }
            self.name = Some(name);
            Ok(())
        } else {
            Err(meta.error("unsupported entity property"))
        }
    }
}

/// Options from a function's `#[rebind(...)]` helper attributes
#[derive(Default)]
struct FunctionOptions {
    name: Option<LitStr>,
    skip: bool,
}

/// Expands the #[entity] attribute macro.
///
/// Example expansion:
/// ```ignore
/// // Input:
/// #[entity(name = "math")]
/// mod math {
///     /// Adds two numbers.
///     pub fn sum(a: i32, b: i32) -> i32 { a + b }
///     pub const LIMIT: i32 = 10;
/// }
///
/// // Output:
/// mod math {
///     /// Adds two numbers.
///     pub fn sum(a: i32, b: i32) -> i32 { a + b }
///     pub const LIMIT: i32 = 10;
///
///     const __REBIND_MEMBERS: &[::rebind_sdk::Member] = &[
///         ::rebind_sdk::Member::function("sum", || {
///             ::rebind_sdk::Callable::new("sum", "Adds two numbers.", sum)
///         }),
///         ::rebind_sdk::Member::other("LIMIT"),
///     ];
///
///     pub static REBIND_ENTITY: ::rebind_sdk::Entity =
///         ::rebind_sdk::Entity::new("math", __REBIND_MEMBERS);
/// }
/// ```
pub fn expand_entity(args: EntityArgs, item: Item) -> Result<TokenStream> {
    let mut module = match item {
        Item::Mod(module) => module,
        other => {
            return Err(syn::Error::new_spanned(
                other,
                "#[entity] must be applied to an inline module",
            ));
        }
    };

    let entity_name = match &args.name {
        Some(name) => name.value(),
        None => module.ident.to_string(),
    };

    let Some((_, items)) = module.content.as_mut() else {
        return Err(syn::Error::new_spanned(
            &module.ident,
            "module cannot be introspected: #[entity] needs an inline module body",
        ));
    };

    let mut members = Vec::new();
    let mut conditional = Vec::new();

    for (index, item) in items.iter_mut().enumerate() {
        let member = match item {
            Item::Fn(func) => {
                let options = take_function_options(&mut func.attrs)?;
                let member = function_member(func, &options);
                let cfgs: Vec<&Attribute> =
                    func.attrs.iter().filter(|a| a.path().is_ident("cfg")).collect();

                if cfgs.is_empty() {
                    member
                } else {
                    // Compiled-out functions still occupy their slot, as a skipped member.
                    let slot = format_ident!("__REBIND_MEMBER_{}", index);
                    let conditions = cfgs
                        .iter()
                        .map(|a| cfg_condition(a))
                        .collect::<Result<Vec<_>>>()?;
                    let ident = func.sig.ident.to_string();
                    conditional.push(quote! {
                        #[cfg(all(#(#conditions),*))]
                        const #slot: ::rebind_sdk::Member = #member;
                        #[cfg(not(all(#(#conditions),*)))]
                        const #slot: ::rebind_sdk::Member = ::rebind_sdk::Member::other(#ident);
                    });
                    quote! { #slot }
                }
            }
            other => {
                reject_helper_attribute(other)?;
                let ident = item_ident(other);
                quote! { ::rebind_sdk::Member::other(#ident) }
            }
        };
        members.push(member);
    }

    items.push(syn::parse_quote! {
        #[doc(hidden)]
        const __REBIND_MEMBERS: &[::rebind_sdk::Member] = &[#(#members),*];
    });
    items.push(syn::parse_quote! {
        /// Member table of this module, for `rebind_sdk::init_module`.
        pub static REBIND_ENTITY: ::rebind_sdk::Entity =
            ::rebind_sdk::Entity::new(#entity_name, __REBIND_MEMBERS);
    });
    for slot in conditional {
        items.push(Item::Verbatim(slot));
    }

    Ok(quote! { #module })
}

fn function_member(func: &ItemFn, options: &FunctionOptions) -> TokenStream {
    let ident = &func.sig.ident;
    let exposed = match &options.name {
        Some(name) => name.value(),
        None => ident.to_string(),
    };

    if options.skip {
        return quote! { ::rebind_sdk::Member::other(#exposed) };
    }

    if let Some(reason) = unsupported_reason(&func.sig) {
        return quote! { ::rebind_sdk::Member::unsupported(#exposed, #reason) };
    }

    let doc = doc_string(&func.attrs);
    quote! {
        ::rebind_sdk::Member::function(#exposed, || {
            ::rebind_sdk::Callable::new(#exposed, #doc, #ident)
        })
    }
}

/// Removes `#[rebind(...)]` attributes and returns what they asked for.
fn take_function_options(attrs: &mut Vec<Attribute>) -> Result<FunctionOptions> {
    let mut options = FunctionOptions::default();
    let mut error: Option<syn::Error> = None;

    attrs.retain(|attr| {
        if !attr.path().is_ident("rebind") {
            return true;
        }
        let parsed = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let name: LitStr = meta.value()?.parse()?;
                if name.value().is_empty() {
                    return Err(syn::Error::new_spanned(name, "function name must not be empty"));
                }
                options.name = Some(name);
                Ok(())
            } else if meta.path.is_ident("skip") {
                options.skip = true;
                Ok(())
            } else {
                Err(meta.error("unsupported rebind property"))
            }
        });
        if let Err(e) = parsed {
            error = Some(match error.take() {
                Some(mut existing) => {
                    existing.combine(e);
                    existing
                }
                None => e,
            });
        }
        false
    });

    match error {
        Some(e) => Err(e),
        None => Ok(options),
    }
}

fn reject_helper_attribute(item: &Item) -> Result<()> {
    let attrs: &[Attribute] = match item {
        Item::Const(i) => &i.attrs,
        Item::Static(i) => &i.attrs,
        Item::Struct(i) => &i.attrs,
        Item::Enum(i) => &i.attrs,
        Item::Mod(i) => &i.attrs,
        Item::Type(i) => &i.attrs,
        _ => return Ok(()),
    };
    match attrs.iter().find(|a| a.path().is_ident("rebind")) {
        Some(attr) => Err(syn::Error::new_spanned(
            attr,
            "#[rebind] is only valid on functions",
        )),
        None => Ok(()),
    }
}

/// `///` comments, each line trimmed, joined with newlines.
fn doc_string(attrs: &[Attribute]) -> String {
    let lines: Vec<String> = attrs
        .iter()
        .filter(|a| a.path().is_ident("doc"))
        .filter_map(|a| match &a.meta {
            Meta::NameValue(nv) => match &nv.value {
                Expr::Lit(ExprLit { lit: Lit::Str(s), .. }) => Some(s.value().trim().to_string()),
                _ => None,
            },
            _ => None,
        })
        .collect();
    lines.join("\n").trim().to_string()
}

fn cfg_condition(attr: &Attribute) -> Result<TokenStream> {
    let list = attr.meta.require_list()?;
    Ok(list.tokens.clone())
}

fn item_ident(item: &Item) -> String {
    match item {
        Item::Const(i) => i.ident.to_string(),
        Item::Static(i) => i.ident.to_string(),
        Item::Struct(i) => i.ident.to_string(),
        Item::Enum(i) => i.ident.to_string(),
        Item::Union(i) => i.ident.to_string(),
        Item::Type(i) => i.ident.to_string(),
        Item::Trait(i) => i.ident.to_string(),
        Item::TraitAlias(i) => i.ident.to_string(),
        Item::Mod(i) => i.ident.to_string(),
        Item::ExternCrate(i) => i.ident.to_string(),
        Item::Fn(i) => i.sig.ident.to_string(),
        Item::Macro(i) => match &i.ident {
            Some(ident) => ident.to_string(),
            None => "macro".to_string(),
        },
        Item::Use(_) => "use".to_string(),
        Item::Impl(_) => "impl".to_string(),
        Item::ForeignMod(_) => "extern".to_string(),
        _ => "item".to_string(),
    }
}
