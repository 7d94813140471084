//! Operation transformer
//!
//! Applies one resolved rule to one operation descriptor.

use crate::rules::{Interception, Interceptor, Resolve, Rule};
use crate::schema::{OperationDescriptor, ResolveParams, Resolver};

/// Apply `rule` to `operation`
///
/// Returns `None` when the operation is denied. Otherwise returns a new
/// descriptor; `operation` itself is never modified.
pub fn transform_operation(operation: &OperationDescriptor, rule: &Rule) -> Option<OperationDescriptor> {
    match rule {
        Rule::Deny => None,
        Rule::Allow => Some(operation.clone()),
        Rule::Intercept(interceptor) => {
            let mut wrapped = operation.clone();
            wrapped.resolver = Some(intercepting_resolver(
                operation.effective_resolver(),
                interceptor.clone(),
            ));
            Some(wrapped)
        }
    }
}

/// A resolver that hands every invocation to `interceptor`
fn intercepting_resolver(original: Resolver, interceptor: Interceptor) -> Resolver {
    Resolver::new(move |params: ResolveParams| {
        let resolve = Resolve::new(original.clone(), &params);
        interceptor.call(Interception {
            args: params.args,
            resolve,
        })
    })
}
