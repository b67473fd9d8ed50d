use std::collections::HashSet;

use tracing::{debug, trace};

use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::error::TransformError;
use crate::finalize::finalize;
use crate::imports::remove_import;
use crate::options::{ApiNames, TransformOptions};
use crate::parse::parse;
use crate::resolve::MockPathResolver;
use crate::rewrite::{factory, method_call, remove_call, string};
use crate::scan::{find, Callee, CallShape, MockRegistration, ModuleLoadCall, Property, ScopeConstraint};
use crate::syntax::{Built, NodeKind, SyntaxTree};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transformed {
    Code(String),
    /// The file does not use the legacy library and import detection was
    /// skipped, so there is nothing to write.
    Skipped,
}

#[derive(Debug, Clone)]
pub struct TransformOutput {
    pub result: Transformed,
    pub diagnostics: Vec<Diagnostic>,
}

impl TransformOutput {
    pub fn code(&self) -> Option<&str> {
        match &self.result {
            Transformed::Code(code) => Some(code),
            Transformed::Skipped => None,
        }
    }
}

/// Rewrites one file's `mockery` usage into `jest` module mocks.
pub fn transform(source: &str, options: &TransformOptions) -> Result<TransformOutput, TransformError> {
    let mut tree = parse(source, options.parser)?;
    let api = &options.api;

    let Some(binding) = remove_import(&mut tree, &api.legacy_package, &api.loader) else {
        debug!(package = %api.legacy_package, "package not referenced");
        let result = if options.skip_import_detection {
            Transformed::Skipped
        } else {
            Transformed::Code(source.to_string())
        };
        return Ok(TransformOutput {
            result,
            diagnostics: Vec::new(),
        });
    };
    debug!(%binding, "found legacy binding");

    let mut diagnostics = Diagnostics::default();
    remove_lifecycle_calls(&mut tree, &binding, api);
    let loads = discover_loads(&tree, api);
    let resolver = MockPathResolver::new(loads.last().map(|l| l.path.clone()));
    let mocked = rewrite_registrations(&mut tree, &binding, &resolver, options, &mut diagnostics);
    rewrite_loads(&mut tree, &loads, &mocked, api);
    report_leftovers(&tree, &binding, api, &mut diagnostics);

    Ok(TransformOutput {
        result: Transformed::Code(finalize(&tree)),
        diagnostics: diagnostics.into_vec(),
    })
}

/// Drops `<binding>.enable()`-style calls wherever they appear.
pub fn remove_lifecycle_calls(tree: &mut SyntaxTree, binding: &str, api: &ApiNames) -> usize {
    let shape = CallShape::new(Callee::Member {
        object: binding,
        property: Property::OneOf(&api.legacy_lifecycle),
    });
    let calls = find(tree, &shape, ScopeConstraint::Any);
    for &call in &calls {
        trace!(line = tree.position(call).line, "removing lifecycle call");
        remove_call(tree, call);
    }
    debug!(count = calls.len(), "removed lifecycle calls");
    calls.len()
}

/// Non-global `require('<literal>')` calls in document order; the last one is
/// taken as the module under test.
pub fn discover_loads(tree: &SyntaxTree, api: &ApiNames) -> Vec<ModuleLoadCall> {
    let loads: Vec<ModuleLoadCall> = find(tree, &ModuleLoadCall::shape(&api.loader), ScopeConstraint::NonGlobal)
        .into_iter()
        .filter_map(|id| ModuleLoadCall::classify(tree, id, &api.loader))
        .collect();
    debug!(
        count = loads.len(),
        subject = loads.last().map(|l| l.path.as_str()),
        "discovered non-global loads"
    );
    loads
}

/// Turns every valid registration into `jest.mock(<path>, () => <value>)` and
/// returns the resolved paths. Invalid ones are left as written.
pub fn rewrite_registrations(
    tree: &mut SyntaxTree,
    binding: &str,
    resolver: &MockPathResolver,
    options: &TransformOptions,
    diagnostics: &mut Diagnostics,
) -> HashSet<String> {
    let api = &options.api;
    let mut mocked = HashSet::new();
    let candidates = find(
        tree,
        &MockRegistration::candidates(binding, &api.legacy_register),
        ScopeConstraint::Any,
    );
    for call in candidates {
        let Some(reg) = MockRegistration::classify(tree, call) else {
            diagnostics.emit(tree, DiagnosticKind::UnsupportedRegistration, call);
            continue;
        };
        let Some(resolved) = resolver.resolve(&reg.raw_path) else {
            diagnostics.emit(tree, DiagnosticKind::UnresolvablePath, call);
            continue;
        };
        let path = if resolved == reg.raw_path {
            Built::Node(reg.path_arg)
        } else {
            string(resolved.clone(), options.quote.pick(reg.quote))
        };
        trace!(line = tree.position(call).line, from = %reg.raw_path, to = %resolved, "rewriting registration");
        tree.replace(
            call,
            method_call(&api.target_binding, &api.target_mock, vec![path, factory(reg.value)]),
        );
        mocked.insert(resolved);
    }
    debug!(count = mocked.len(), "rewrote registrations");
    mocked
}

/// Points loads of mocked paths at `jest.requireActual`, arguments unchanged.
pub fn rewrite_loads(
    tree: &mut SyntaxTree,
    loads: &[ModuleLoadCall],
    mocked: &HashSet<String>,
    api: &ApiNames,
) -> usize {
    let mut count = 0;
    for load in loads.iter().filter(|l| mocked.contains(&l.path)) {
        if !tree.is_live(load.node) {
            continue;
        }
        let args = tree.call_args(load.node).iter().map(|&a| Built::Node(a)).collect();
        tree.replace(
            load.node,
            method_call(&api.target_binding, &api.target_require_actual, args),
        );
        count += 1;
    }
    debug!(count, "redirected loads to the actual module");
    count
}

/// Reports calls on the legacy binding that none of the passes handled.
pub fn report_leftovers(tree: &SyntaxTree, binding: &str, api: &ApiNames, diagnostics: &mut Diagnostics) {
    let shape = CallShape::new(Callee::Member {
        object: binding,
        property: Property::Any,
    });
    for call in find(tree, &shape, ScopeConstraint::Any) {
        if tree.edit(call).is_some() {
            continue;
        }
        let Some(NodeKind::Member {
            property: Some(method),
            ..
        }) = tree.kind(call).callee().map(|c| tree.kind(c))
        else {
            continue;
        };
        if *method == api.legacy_register || api.legacy_lifecycle.contains(method) {
            continue;
        }
        diagnostics.emit(tree, DiagnosticKind::LeftoverMethod(method.clone()), call);
    }
}
