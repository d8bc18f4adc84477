//! Entities — static tables of the members of a native namespace
//!
//! An [`Entity`] is normally emitted by `#[rebind_native::entity]`, which
//! walks an inline module at build time. It can also be written by hand:
//!
//! ```ignore
//! fn sum(a: i32, b: i32) -> i32 { a + b }
//!
//! const MEMBERS: &[Member] = &[
//!     Member::other("VERSION"),
//!     Member::function("sum", || Callable::new("sum", "", sum)),
//! ];
//!
//! static MATH: Entity = Entity::new("math", MEMBERS);
//! ```
//!
//! Members are kept in declaration order. Only `Function` members are bound;
//! the rest are recorded so the registry can report what it skipped.

use std::fmt;

use once_cell::sync::OnceCell;

use crate::callable::Callable;
use crate::registry::ModuleRegistry;

/// Builds the descriptor of one function member.
pub type Binder = fn() -> Callable;

/// What a member is.
#[derive(Clone, Copy)]
pub enum MemberKind {
    /// Bindable function
    Function(Binder),
    /// Function whose shape cannot be bound
    Unsupported(&'static str),
    /// Anything that is not a function
    Other,
}

/// One member of an entity, in declaration order.
#[derive(Clone, Copy)]
pub struct Member {
    ident: &'static str,
    kind: MemberKind,
}

impl Member {
    /// Bindable function member
    pub const fn function(ident: &'static str, bind: Binder) -> Self {
        Self {
            ident,
            kind: MemberKind::Function(bind),
        }
    }

    /// Function member that cannot be bound, with the reason
    pub const fn unsupported(ident: &'static str, reason: &'static str) -> Self {
        Self {
            ident,
            kind: MemberKind::Unsupported(reason),
        }
    }

    /// Non-function member
    pub const fn other(ident: &'static str) -> Self {
        Self {
            ident,
            kind: MemberKind::Other,
        }
    }

    /// Member identifier (the exposed name for functions)
    #[inline]
    pub const fn ident(&self) -> &'static str {
        self.ident
    }

    /// Member kind
    #[inline]
    pub const fn kind(&self) -> MemberKind {
        self.kind
    }

    /// True for bindable functions
    #[inline]
    pub const fn is_function(&self) -> bool {
        matches!(self.kind, MemberKind::Function(_))
    }
}

impl fmt::Debug for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            MemberKind::Function(_) => write!(f, "Function({})", self.ident),
            MemberKind::Unsupported(reason) => write!(f, "Unsupported({}: {})", self.ident, reason),
            MemberKind::Other => write!(f, "Other({})", self.ident),
        }
    }
}

/// A native namespace: its name, its member table, and the registry built
/// from it on first use.
///
/// Entities live in statics. The registry is computed once behind an
/// init-once guard and kept for the rest of the process; later requests
/// return the same instance.
pub struct Entity {
    name: &'static str,
    members: &'static [Member],
    registry: OnceCell<ModuleRegistry>,
}

impl Entity {
    /// Create an entity over a static member table
    pub const fn new(name: &'static str, members: &'static [Member]) -> Self {
        Self {
            name,
            members,
            registry: OnceCell::new(),
        }
    }

    /// Entity name
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// All members in declaration order
    #[inline]
    pub const fn members(&self) -> &'static [Member] {
        self.members
    }

    /// Bindable function members in declaration order
    pub fn functions(&self) -> impl Iterator<Item = &'static Member> {
        self.members.iter().filter(|m| m.is_function())
    }

    /// Registry of this entity's descriptors, built on first call.
    pub fn registry(&'static self) -> &'static ModuleRegistry {
        self.registry.get_or_init(|| ModuleRegistry::build(self))
    }

    /// True once the registry has been built
    pub fn is_initialized(&self) -> bool {
        self.registry.get().is_some()
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("name", &self.name)
            .field("members", &self.members)
            .field("initialized", &self.is_initialized())
            .finish()
    }
}
