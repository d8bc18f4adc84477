// rebind-native: build-time introspection of native entities
//
// Provides the #[entity] proc-macro, which walks an inline module and
// emits a static member table for rebind_sdk:
//
// ```
// use rebind_native::entity;
//
// #[entity(name = "math")]
// pub mod math {
//     /// Adds two numbers.
//     pub fn sum(a: i32, b: i32) -> i32 {
//         a + b
//     }
//
//     pub const LIMIT: i32 = 10;
// }
//
// // math::REBIND_ENTITY lists `sum` (bound) and `LIMIT` (skipped)
// ```

use proc_macro::TokenStream;
use syn::parse_macro_input;

mod entity;
mod shape;

/// Introspects an inline module and emits its member table.
///
/// Adds `pub static REBIND_ENTITY: rebind_sdk::Entity` inside the module.
/// Every item of the module becomes one member, in declaration order:
///
/// - functions with a bindable shape are bound through
///   `rebind_sdk::Callable::new`, using their `///` docs as doc string
/// - functions that cannot be bound (generic, async, reference
///   parameters, ...) are recorded with the reason
/// - everything else is recorded and skipped
///
/// The entity is named after the module unless `name = "..."` is given.
///
/// Functions accept a helper attribute:
///
/// ```ignore
/// #[rebind(name = "add")]   // expose under another name
/// #[rebind(skip)]           // never bind
/// ```
///
/// # Example
///
/// ```ignore
/// #[entity]
/// mod demo {
///     pub fn greeting() -> String {
///         "Hello, World!".to_string()
///     }
/// }
///
/// let registry = demo::REBIND_ENTITY.registry();
/// ```
#[proc_macro_attribute]
pub fn entity(attr: TokenStream, item: TokenStream) -> TokenStream {
    let mut args = entity::EntityArgs::default();
    let parser = syn::meta::parser(|meta| args.parse(meta));
    parse_macro_input!(attr with parser);

    let input = parse_macro_input!(item as syn::Item);
    entity::expand_entity(args, input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
