use mockshift::*;

#[test]
fn relative_markers() {
    assert!(is_relative("./x"));
    assert!(is_relative("../x"));
    assert!(!is_relative("x"));
    assert!(!is_relative(".x"));
    assert!(!is_relative("/abs/x"));
    assert!(!is_relative("@scope/pkg"));
}

#[test]
fn rebase_against_subject_directory() {
    let resolver = MockPathResolver::new(Some(
        "../../../../src/handlers/api/do-something".to_string(),
    ));
    assert_eq!(
        resolver.resolve("../../lib/services/x").as_deref(),
        Some("../../../../src/lib/services/x")
    );
    assert_eq!(
        resolver.resolve("./helpers").as_deref(),
        Some("../../../../src/handlers/api/helpers")
    );
}

#[test]
fn rebase_keeps_a_relative_marker() {
    assert_eq!(rebase("./subject", "./dep"), "./dep");
    assert_eq!(rebase("lib/subject", "./dep"), "./lib/dep");
    assert_eq!(rebase("lib/subject", "../dep"), "./dep");
    assert_eq!(rebase("./a/subject", "../../dep"), "../dep");
    assert_eq!(rebase("./a/subject", "../"), "./");
    assert_eq!(rebase("./subject", "../"), "../");
}

#[test]
fn absolute_subject_stays_absolute() {
    assert_eq!(rebase("/src/app/subject", "../dep"), "/src/dep");
}

#[test]
fn non_relative_paths_pass_through() {
    let resolver = MockPathResolver::new(None);
    assert_eq!(resolver.resolve("aws-sdk").as_deref(), Some("aws-sdk"));
    assert_eq!(resolver.resolve("/abs/mod").as_deref(), Some("/abs/mod"));
}

#[test]
fn relative_path_without_subject_is_unresolvable() {
    let resolver = MockPathResolver::new(None);
    assert!(resolver.subject().is_none());
    assert_eq!(resolver.resolve("./dep"), None);
}
