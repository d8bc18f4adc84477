//! `rebind call` — Install the demo entity into the reference host and
//! call one function.

use rebind_sdk::{init_module, Entity, LocalHost};

use crate::args::parse_all;
use crate::config::Config;
use crate::output::StyledOutput;

pub fn execute(
    entity: &'static Entity,
    config: &Config,
    function: &str,
    args: &[String],
    out: &mut StyledOutput,
) -> anyhow::Result<()> {
    let host = LocalHost::new();
    let module = init_module(&host, &config.module, entity, config.bindings)?;
    let function = module.function(function)?;

    let args = parse_all(args);
    tracing::debug!(function = function.name(), ?args, "calling");

    let result = function.call(&args)?;
    out.plain(&result.to_string());
    out.newline();
    out.flush();
    Ok(())
}
