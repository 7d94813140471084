//! Rules module
//!
//! Pattern-based rules deciding, for every operation of a schema, whether it
//! is removed, kept as is, or kept behind an intercept transform.
//!
//! ## Rule Model
//!
//! A rule set maps patterns (exact names or globs using `*` and `?`) to rules:
//!
//! - `false` / [`Rule::Deny`] removes matching operations
//! - `true` / [`Rule::Allow`] keeps them (the default for unmatched operations)
//! - [`Rule::Intercept`] keeps them and wraps their handler
//!
//! A non-deny rule always overrides a deny rule matching the same operation.
//! Among several non-deny matches the first declared one applies.
//!
//! ## Example Configuration
//!
//! ```toml
//! [[rules]]
//! pattern = "*"            # deny everything...
//! action = "deny"
//!
//! [[rules]]
//! pattern = "allPersons"   # ...except this query
//! action = "allow"
//!
//! [[rules]]
//! pattern = "Starship"     # ...and this one, with a fixed argument
//! action = "intercept"
//! set_args = { name = "Millennium Falcon" }
//! ```

pub mod intercept;
pub mod patterns;
pub mod registry;
pub mod resolver;
pub mod types;

pub use intercept::{Interception, Interceptor, Resolve};
pub use patterns::{Pattern, PatternMatcher, matches};
pub use registry::InterceptorRegistry;
pub use resolver::{ResolvedRules, RuleResolver, resolve_rules};
pub use types::{Decision, Rule, RuleSet};
