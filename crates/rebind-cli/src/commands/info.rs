//! `rebind info` — Display configuration and entity info.

use rebind_sdk::{Entity, Narrowing};

use crate::config::Config;

pub fn execute(entity: &'static Entity, config: &Config) -> anyhow::Result<()> {
    let registry = entity.registry();

    println!("Rebind v{}", env!("CARGO_PKG_VERSION"));
    println!();

    println!("Entity:       {}", entity.name());
    println!("Module:       {}", config.module);
    println!(
        "Narrowing:    {}",
        match config.bindings.narrowing {
            Narrowing::Wrap => "wrap",
            Narrowing::Checked => "checked",
        }
    );
    println!("Functions:    {}", registry.len());
    if !registry.skipped().is_empty() {
        println!("Skipped:      {}", registry.skipped().len());
    }

    println!();
    println!("Environment:");
    print_env("  REBIND_LOG", "REBIND_LOG");
    print_env("  NO_COLOR", "NO_COLOR");

    Ok(())
}

fn print_env(label: &str, var: &str) {
    match std::env::var(var) {
        Ok(val) => println!("{} = {}", label, val),
        Err(_) => println!("{} = (default)", label),
    }
}
