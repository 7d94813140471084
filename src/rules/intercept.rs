//! Intercept transforms
//!
//! An interceptor wraps an operation's handler. It is called with the
//! arguments the caller supplied and a [`Resolve`] handle that runs the
//! original handler, so it can rewrite arguments, post-process the result,
//! call the handler several times, or not call it at all.

use crate::schema::{Arguments, Context, FieldFuture, FieldResult, ResolveInfo, ResolveParams, Resolver};
use futures::FutureExt;
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Handle to the original handler of an intercepted operation
///
/// Bundles the original resolver with the parent value, context and info of
/// the invocation being intercepted. Only the arguments can be replaced.
#[derive(Clone)]
pub struct Resolve {
    resolver: Resolver,
    parent: Value,
    context: Context,
    info: ResolveInfo,
}

impl Resolve {
    /// Capture everything but the arguments of an invocation
    pub fn new(resolver: Resolver, params: &ResolveParams) -> Self {
        Self {
            resolver,
            parent: params.parent.clone(),
            context: params.context.clone(),
            info: params.info.clone(),
        }
    }

    /// Run the original handler with `args`
    pub fn invoke(&self, args: Arguments) -> FieldFuture {
        self.resolver.call(ResolveParams {
            parent: self.parent.clone(),
            args,
            context: self.context.clone(),
            info: self.info.clone(),
        })
    }

    pub fn parent(&self) -> &Value {
        &self.parent
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn info(&self) -> &ResolveInfo {
        &self.info
    }
}

impl fmt::Debug for Resolve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolve")
            .field("parent", &self.parent)
            .field("info", &self.info)
            .finish_non_exhaustive()
    }
}

/// What an interceptor receives
#[derive(Debug, Clone)]
pub struct Interception {
    /// Arguments supplied by the caller
    pub args: Arguments,
    /// Runs the original handler
    pub resolve: Resolve,
}

impl Interception {
    /// Run the original handler with the caller's arguments
    pub fn proceed(&self) -> FieldFuture {
        self.resolve.invoke(self.args.clone())
    }
}

type InterceptFn = dyn Fn(Interception) -> FieldFuture + Send + Sync;

/// Caller-supplied transform attached to an intercept rule
#[derive(Clone)]
pub struct Interceptor {
    inner: Arc<InterceptFn>,
}

impl Interceptor {
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(Interception) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = FieldResult> + Send + 'static,
    {
        Self {
            inner: Arc::new(move |interception| f(interception).boxed()),
        }
    }

    /// Merge fixed values over the caller's arguments, then resolve
    pub fn override_args(values: Arguments) -> Self {
        Self::new(move |interception: Interception| {
            let mut args = interception.args;
            for (key, value) in &values {
                args.insert(key.clone(), value.clone());
            }
            interception.resolve.invoke(args)
        })
    }

    /// Run the transform
    pub fn call(&self, interception: Interception) -> FieldFuture {
        (self.inner)(interception)
    }
}

impl fmt::Debug for Interceptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Interceptor(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn echo_resolver() -> Resolver {
        Resolver::sync(|params| Ok(Value::Object(params.args)))
    }

    fn args(pairs: &[(&str, Value)]) -> Arguments {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[tokio::test]
    async fn test_resolve_keeps_parent_and_info() {
        let resolver = Resolver::sync(|params| {
            Ok(json!({
                "parent": params.parent,
                "field": params.info.field_name,
                "args": params.args,
            }))
        });
        let params = ResolveParams::new(args(&[("a", json!(1))]))
            .with_parent(json!("root"))
            .with_info(ResolveInfo::new("Query", "thing"));

        let resolve = Resolve::new(resolver, &params);
        let result = resolve.invoke(args(&[("b", json!(2))])).await.unwrap();

        assert_eq!(
            result,
            json!({ "parent": "root", "field": "thing", "args": { "b": 2 } })
        );
    }

    #[tokio::test]
    async fn test_override_args() {
        let interceptor = Interceptor::override_args(args(&[("name", json!("John"))]));
        let params = ResolveParams::new(args(&[("name", json!("Bob")), ("age", json!(3))]));
        let interception = Interception {
            args: params.args.clone(),
            resolve: Resolve::new(echo_resolver(), &params),
        };

        let result = interceptor.call(interception).await.unwrap();
        assert_eq!(result, json!({ "name": "John", "age": 3 }));
    }

    #[tokio::test]
    async fn test_interceptor_may_skip_resolve() {
        let interceptor = Interceptor::new(|_| async { Ok::<_, anyhow::Error>(json!("fabricated")) });
        let params = ResolveParams::default();
        let interception = Interception {
            args: Arguments::new(),
            resolve: Resolve::new(
                Resolver::sync(|_| Err(anyhow::anyhow!("must not run"))),
                &params,
            ),
        };

        assert_eq!(interceptor.call(interception).await.unwrap(), json!("fabricated"));
    }

    #[tokio::test]
    async fn test_proceed_uses_caller_args() {
        let params = ResolveParams::new(args(&[("x", json!(true))]));
        let interception = Interception {
            args: params.args.clone(),
            resolve: Resolve::new(echo_resolver(), &params),
        };
        assert_eq!(interception.proceed().await.unwrap(), json!({ "x": true }));
    }
}
