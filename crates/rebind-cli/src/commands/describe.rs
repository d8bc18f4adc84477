//! `rebind describe` — Signature and doc of one function.

use anyhow::Context;
use rebind_sdk::Entity;

use crate::output::StyledOutput;

pub fn execute(entity: &'static Entity, function: &str, out: &mut StyledOutput) -> anyhow::Result<()> {
    let callable = entity
        .registry()
        .get(function)
        .with_context(|| format!("'{}' has no function named '{}'", entity.name(), function))?;

    out.bold(callable.name());
    out.newline();
    out.info("  signature: ");
    out.plain(&callable.signature().render(callable.name()));
    out.newline();
    out.info("  arity:     ");
    out.plain(&callable.arity().to_string());
    out.newline();
    out.info("  doc:       ");
    out.plain(callable.doc());
    out.newline();

    out.flush();
    Ok(())
}
