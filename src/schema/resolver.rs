//! Operation resolvers
//!
//! A resolver is the handler behind one operation. It receives the parent
//! value, the arguments, an opaque context and execution info, and returns a
//! boxed future of the result.

use futures::FutureExt;
use futures::future::{self, BoxFuture};
use serde_json::{Map, Value};
use std::any::Any;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Result of invoking an operation
pub type FieldResult = anyhow::Result<Value>;

/// Future returned by every resolver
pub type FieldFuture = BoxFuture<'static, FieldResult>;

/// Opaque per-request context shared with resolvers
pub type Context = Arc<dyn Any + Send + Sync>;

/// Arguments passed to an operation
pub type Arguments = Map<String, Value>;

/// Execution info describing where an operation is being resolved
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveInfo {
    /// Name of the operation being resolved
    pub field_name: String,
    /// Name of the category that owns the operation
    pub parent_type: String,
    /// Response path of the operation
    pub path: Vec<String>,
}

impl ResolveInfo {
    pub fn new(parent_type: impl Into<String>, field_name: impl Into<String>) -> Self {
        let field_name = field_name.into();
        Self {
            path: vec![field_name.clone()],
            field_name,
            parent_type: parent_type.into(),
        }
    }
}

/// Everything a resolver is called with
#[derive(Clone)]
pub struct ResolveParams {
    /// Parent (root) value
    pub parent: Value,
    /// Operation arguments
    pub args: Arguments,
    /// Request context
    pub context: Context,
    /// Execution info
    pub info: ResolveInfo,
}

impl ResolveParams {
    /// Create params with the given arguments, a null parent and an empty context
    pub fn new(args: Arguments) -> Self {
        Self {
            parent: Value::Null,
            args,
            context: Arc::new(()),
            info: ResolveInfo::default(),
        }
    }

    pub fn with_parent(mut self, parent: Value) -> Self {
        self.parent = parent;
        self
    }

    pub fn with_context<C: Any + Send + Sync>(mut self, context: C) -> Self {
        self.context = Arc::new(context);
        self
    }

    pub fn with_info(mut self, info: ResolveInfo) -> Self {
        self.info = info;
        self
    }

    /// Borrow the context as a concrete type
    pub fn context<C: Any>(&self) -> Option<&C> {
        self.context.downcast_ref::<C>()
    }

    /// Get a string argument
    pub fn str_arg(&self, name: &str) -> Option<&str> {
        self.args.get(name).and_then(Value::as_str)
    }
}

impl Default for ResolveParams {
    fn default() -> Self {
        Self::new(Arguments::new())
    }
}

impl fmt::Debug for ResolveParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolveParams")
            .field("parent", &self.parent)
            .field("args", &self.args)
            .field("info", &self.info)
            .finish_non_exhaustive()
    }
}

type ResolverFn = dyn Fn(ResolveParams) -> FieldFuture + Send + Sync;

/// Type-erased, cheaply cloneable operation handler
#[derive(Clone)]
pub struct Resolver {
    inner: Arc<ResolverFn>,
}

impl Resolver {
    /// Wrap an async handler
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(ResolveParams) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = FieldResult> + Send + 'static,
    {
        Self {
            inner: Arc::new(move |params| f(params).boxed()),
        }
    }

    /// Wrap a handler that produces its result immediately
    pub fn sync<F>(f: F) -> Self
    where
        F: Fn(ResolveParams) -> FieldResult + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(move |params| future::ready(f(params)).boxed()),
        }
    }

    /// The default resolver: reads the operation's name off the parent value
    pub fn property() -> Self {
        Self::sync(|params| {
            Ok(params
                .parent
                .get(&params.info.field_name)
                .cloned()
                .unwrap_or(Value::Null))
        })
    }

    /// Invoke the handler
    pub fn call(&self, params: ResolveParams) -> FieldFuture {
        (self.inner)(params)
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Resolver(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_sync_resolver() {
        let resolver = Resolver::sync(|params| {
            Ok(json!(format!("hi {}", params.str_arg("name").unwrap_or("?"))))
        });

        let mut args = Arguments::new();
        args.insert("name".into(), json!("Bob"));

        let result = resolver.call(ResolveParams::new(args)).await.unwrap();
        assert_eq!(result, json!("hi Bob"));
    }

    #[tokio::test]
    async fn test_async_resolver() {
        let resolver = Resolver::new(|params: ResolveParams| async move {
            Ok::<_, anyhow::Error>(json!(params.args.len()))
        });

        let result = resolver.call(ResolveParams::default()).await.unwrap();
        assert_eq!(result, json!(0));
    }

    #[tokio::test]
    async fn test_property_resolver() {
        let resolver = Resolver::property();
        let params = ResolveParams::default()
            .with_parent(json!({ "hello": "world" }))
            .with_info(ResolveInfo::new("Query", "hello"));
        assert_eq!(resolver.call(params).await.unwrap(), json!("world"));

        let params = ResolveParams::default().with_info(ResolveInfo::new("Query", "missing"));
        assert_eq!(resolver.call(params).await.unwrap(), Value::Null);
    }

    #[test]
    fn test_context_downcast() {
        let params = ResolveParams::default().with_context(42u32);
        assert_eq!(params.context::<u32>(), Some(&42));
        assert!(params.context::<String>().is_none());
    }

    #[test]
    fn test_resolve_info_path() {
        let info = ResolveInfo::new("Mutation", "alexaHello");
        assert_eq!(info.parent_type, "Mutation");
        assert_eq!(info.path, vec!["alexaHello".to_string()]);
    }
}
