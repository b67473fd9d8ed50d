use mockshift::*;

mod common;

#[test]
fn untouched_without_legacy_import() {
    let source = "const jestish = require('jest-mock');\nregisterMock('./x', y);\n";
    let out = common::run(source);
    assert_eq!(out.result, Transformed::Code(source.to_string()));
    assert!(out.diagnostics.is_empty());
}

#[test]
fn sentinel_without_legacy_import_when_detection_is_skipped() {
    let options = TransformOptions {
        skip_import_detection: true,
        ..TransformOptions::default()
    };
    let out = common::run_with("foo();\n", &options);
    assert_eq!(out.result, Transformed::Skipped);
    assert_eq!(out.code(), None);
}

#[test]
fn malformed_input_is_fatal() {
    let err = transform("const mockery = require('mockery'\n", &TransformOptions::default()).unwrap_err();
    assert!(matches!(err, TransformError::Parse { .. }), "{}", err);
}

#[test]
fn lifecycle_calls_vanish_in_every_position() {
    let source = "\
const mockery = require('mockery');
mockery.enable({ warnOnUnregistered: false });
if (done) mockery.disable();
after(() => mockery.deregisterAll());
const handle = mockery.enable();
function teardown() {
  mockery.disable();
  return 1;
}
";
    let expected = "\
if (done) {}
after(() => {});
const handle = undefined;
function teardown() {
  return 1;
}
";
    assert_eq!(common::code(source), expected);
}

#[test]
fn loads_inside_a_dropped_lifecycle_call_are_not_the_subject() {
    let source = "\
const mockery = require('mockery');
beforeEach(() => {
  mockery.registerMock('./dep', d);
  subject = require('./lib/subject');
  if (x) mockery.enable(require('./other/deep/y'));
});
";
    let expected = "\
beforeEach(() => {
  jest.mock('./lib/dep', () => d);
  subject = require('./lib/subject');
  if (x) {}
});
";
    assert_eq!(common::code(source), expected);
}

#[test]
fn registrations_inside_a_dropped_lifecycle_call_mock_nothing() {
    let source = "\
const mockery = require('mockery');
it('a', () => {
  const h = mockery.enable(mockery.registerMock('dep', d));
  x = require('dep');
});
";
    let expected = "\
it('a', () => {
  const h = undefined;
  x = require('dep');
});
";
    let out = common::run(source);
    assert_eq!(out.code(), Some(expected));
    assert!(out.diagnostics.is_empty());
}

#[test]
fn absolute_registration_keeps_its_literal() {
    let source = "\
const mockery = require('mockery');
mockery.registerMock('aws-sdk', awsStub);
";
    let out = common::code(source);
    assert_eq!(out, "jest.mock('aws-sdk', () => awsStub);\n");
}

#[test]
fn relative_registration_is_rebased_on_the_last_nested_require() {
    let source = "\
const mockery = require('mockery');
const top = require('./top-level');
beforeEach(() => {
  mockery.registerMock('../../lib/services/x', mockObj);
  other = require('../../../../src/lib/services/x');
  first = require('../../../../src/handlers/api/first');
  subject = require('../../../../src/handlers/api/do-something');
});
";
    let expected = "\
const top = require('./top-level');
beforeEach(() => {
  jest.mock('../../../../src/lib/services/x', () => mockObj);
  other = jest.requireActual('../../../../src/lib/services/x');
  first = require('../../../../src/handlers/api/first');
  subject = require('../../../../src/handlers/api/do-something');
});
";
    assert_eq!(common::code(source), expected);
}

#[test]
fn global_loads_of_mocked_paths_are_left_alone() {
    let source = "\
const mockery = require('mockery');
const dep = require('dep');
it('works', () => {
  mockery.registerMock('dep', {});
  const again = require('dep');
});
";
    let out = common::code(source);
    assert!(out.contains("const dep = require('dep');"), "output: {}", out);
    assert!(out.contains("const again = jest.requireActual('dep');"), "output: {}", out);
    assert!(out.contains("jest.mock('dep', () => ({}));"), "output: {}", out);
}

#[test]
fn three_argument_registration_yields_one_diagnostic() {
    let source = "\
const mockery = require('mockery');
function setup() {
  mockery.registerMock('dep', stub, extra);
  require('./subject');
}
";
    let out = common::run(source);
    assert_eq!(
        common::messages(&out),
        vec!["Unsupported mockery registerMock found (should have 2 args, first being string literal)"]
    );
    assert!(out.code().expect("code").contains("mockery.registerMock('dep', stub, extra);"));
}

#[test]
fn relative_registration_without_subject_yields_one_diagnostic() {
    let source = "\
const mockery = require('mockery');
const subject = require('./subject');
mockery.registerMock('./dep', stub);
";
    let out = common::run(source);
    assert_eq!(out.diagnostics.len(), 1);
    assert_eq!(out.diagnostics[0].kind, DiagnosticKind::UnresolvablePath);
    assert_eq!(out.diagnostics[0].position.line, 3);
    assert_eq!(
        out.code().expect("code"),
        "const subject = require('./subject');\nmockery.registerMock('./dep', stub);\n"
    );
}

#[test]
fn quote_style_applies_to_rewritten_paths_only() {
    let source = "\
const mockery = require('mockery');
function setup() {
  mockery.registerMock('./dep', a);
  mockery.registerMock('pkg', b);
  require('./lib/subject');
}
";
    let options = TransformOptions {
        quote: QuoteStyle::Double,
        ..TransformOptions::default()
    };
    let out = common::run_with(source, &options);
    let code = out.code().expect("code");
    assert!(code.contains("jest.mock(\"./lib/dep\", () => a);"), "output: {}", code);
    assert!(code.contains("jest.mock('pkg', () => b);"), "output: {}", code);
}

#[test]
fn mock_values_keep_their_nested_rewrites() {
    let source = "\
const mockery = require('mockery');
beforeEach(() => {
  mockery.registerMock('./dep', { ...require('./dep'), extra: 1 });
  subject = require('./subject');
});
";
    let code = common::code(source);
    assert!(
        code.contains("jest.mock('./dep', () => ({ ...jest.requireActual('./dep'), extra: 1 }));"),
        "output: {}",
        code
    );
}

#[test]
fn leftover_methods_are_reported() {
    let source = "\
const mockery = require('mockery');
mockery.registerAllowable('./x');
mockery.warnOnUnregistered(false);
";
    let out = common::run(source);
    assert_eq!(
        common::messages(&out),
        vec![
            "Unsupported mockery method registerAllowable() left in place",
            "Unsupported mockery method warnOnUnregistered() left in place",
        ]
    );
}

#[test]
fn passes_can_be_driven_one_by_one() {
    let mut tree = common::parse_js(
        "const m = require('mockery');\nbeforeEach(() => { m.enable(); m.registerMock('./a', a); s = require('./s'); });\n",
    );
    let api = ApiNames::default();
    let binding = remove_import(&mut tree, &api.legacy_package, &api.loader).expect("binding");
    assert_eq!(binding, "m");
    assert_eq!(remove_lifecycle_calls(&mut tree, &binding, &api), 1);
    let loads = discover_loads(&tree, &api);
    assert_eq!(loads.len(), 1);
    assert_eq!(loads[0].path, "./s");

    let resolver = MockPathResolver::new(loads.last().map(|l| l.path.clone()));
    let mut diagnostics = Diagnostics::default();
    let mocked = rewrite_registrations(&mut tree, &binding, &resolver, &TransformOptions::default(), &mut diagnostics);
    assert!(diagnostics.is_empty());
    assert!(mocked.contains("./a"));
    assert_eq!(rewrite_loads(&mut tree, &loads, &mocked, &api), 0);
}
