//! Demo entity exposed by the CLI.

use rebind_native::entity;

#[entity(name = "test")]
pub mod demo {
    #[allow(dead_code)]
    pub static A: i32 = 0;

    /// Prints a greeting from foo.
    pub fn foo() {
        println!("Hello from foo!");
    }

    /// Prints a greeting from bar.
    pub fn bar() {
        println!("Hello from bar!");
    }

    /// Returns a greeting.
    pub fn greeting() -> String {
        "Hello, World!".to_string()
    }

    #[allow(clippy::approx_constant)]
    pub fn pi() -> f32 {
        3.14
    }

    /// Speed of light in meters per second.
    pub fn speed_of_light() -> i64 {
        300_000_000
    }

    /// Adds two numbers.
    pub fn sum(a: i32, b: i32) -> i32 {
        a + b
    }

    /// True if `f` is close enough to zero.
    pub fn is_zero(f: f32) -> bool {
        f <= 0.001
    }

    /// Length of `s` in bytes.
    #[allow(dead_code)]
    pub fn first_len(s: &str) -> usize {
        s.len()
    }
}

pub use demo::REBIND_ENTITY as DEMO;
