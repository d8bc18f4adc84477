//! `rebind list` — Members of the demo entity in declaration order.

use rebind_sdk::{Entity, MemberKind};

use crate::output::StyledOutput;

pub fn execute(entity: &'static Entity, out: &mut StyledOutput) -> anyhow::Result<()> {
    let registry = entity.registry();

    out.bold(entity.name());
    out.dim(&format!(" ({} members)", entity.members().len()));
    out.newline();

    for member in entity.members() {
        out.plain("  ");
        match member.kind() {
            MemberKind::Function(_) => {
                out.success("fn   ");
                match registry.get(member.ident()) {
                    Some(callable) => out.plain(&callable.signature().render(callable.name())),
                    None => out.plain(member.ident()),
                }
            }
            MemberKind::Unsupported(reason) => {
                out.warning("skip ");
                out.plain(member.ident());
                out.dim(&format!("  {}", reason));
            }
            MemberKind::Other => {
                out.dim("---  ");
                out.plain(member.ident());
            }
        }
        out.newline();
    }

    out.flush();
    Ok(())
}
