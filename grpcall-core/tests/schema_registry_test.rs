use grpcall_core::schema::{ResolveError, SchemaLoadError, SchemaRegistry};

mod fixture;

#[test]
fn test_list_services() {
    let registry = fixture::registry();
    let mut services = registry.list_services();
    services.sort();

    assert_eq!(services, vec!["UserService".to_string(), "pkg.Svc".to_string()]);
}

#[test]
fn test_resolve_method() {
    let registry = fixture::registry();

    let method = registry.resolve("UserService", "GetUser").unwrap();
    assert_eq!(method.input().full_name(), "GetUserRequest");
    assert_eq!(method.output().full_name(), "User");

    let method = registry.resolve("pkg.Svc", "Create").unwrap();
    assert_eq!(method.input().full_name(), "pkg.Item");
}

#[test]
fn test_missing_method_is_not_a_missing_service() {
    let registry = fixture::registry();

    assert_eq!(
        registry.resolve("pkg.Svc", "Missing").unwrap_err(),
        ResolveError::MethodNotFound {
            service: "pkg.Svc".to_string(),
            method: "Missing".to_string(),
        }
    );
    assert_eq!(
        registry.resolve("pkg.Other", "Get").unwrap_err(),
        ResolveError::ServiceNotFound("pkg.Other".to_string())
    );
}

#[test]
fn test_overlapping_sets_are_merged() {
    // Both sets carry common.proto; the second copy is skipped.
    let mut registry = SchemaRegistry::from_bytes(&fixture::user_set()).unwrap();
    registry.load(&fixture::pkg_set()).unwrap();

    assert!(registry.contains_file("common.proto"));
    assert!(registry.contains_file("user.proto"));
    assert!(registry.contains_file("pkg/svc.proto"));
    assert!(registry.service("pkg.Svc").is_some());
    assert!(registry.service("UserService").is_some());
}

#[test]
fn test_loading_the_same_set_twice_is_not_an_error() {
    let mut registry = SchemaRegistry::new();
    registry.load(&fixture::user_set()).unwrap();
    registry.load(&fixture::user_set()).unwrap();

    assert_eq!(registry.list_services(), vec!["UserService".to_string()]);
}

#[test]
fn test_duplicate_files_in_one_set_are_skipped() {
    let set = fixture::encode(vec![
        fixture::common_file(),
        fixture::common_file(),
        fixture::pkg_file(),
    ]);

    let registry = SchemaRegistry::from_bytes(&set).unwrap();
    assert!(registry.resolve("pkg.Svc", "Get").is_ok());
}

#[test]
fn test_invalid_bytes_are_rejected() {
    let err = SchemaRegistry::from_bytes(&[0xff, 0xff, 0xff]).unwrap_err();
    assert!(matches!(err, SchemaLoadError::Decode(_)));
}

#[test]
fn test_unresolved_imports_are_rejected() {
    // pkg/svc.proto needs common.proto, which is neither in the set nor registered.
    let set = fixture::encode(vec![fixture::pkg_file()]);

    let err = SchemaRegistry::from_bytes(&set).unwrap_err();
    assert!(matches!(err, SchemaLoadError::Descriptor(_)));
}

#[test]
fn test_dependencies_may_come_from_an_earlier_load() {
    let mut registry = SchemaRegistry::from_bytes(&fixture::encode(vec![fixture::common_file()]))
        .unwrap();

    registry
        .load(&fixture::encode(vec![fixture::pkg_file()]))
        .unwrap();

    let method = registry.resolve("pkg.Svc", "Get").unwrap();
    let location = method.input().get_field_by_name("location").unwrap();
    assert_eq!(
        location.kind().as_message().unwrap().full_name(),
        "common.Address"
    );
}

#[test]
fn test_load_file() {
    let path = std::env::temp_dir().join(format!("grpcall-user-set-{}.bin", std::process::id()));
    std::fs::write(&path, fixture::user_set()).unwrap();

    let mut registry = SchemaRegistry::new();
    let result = registry.load_file(&path);
    std::fs::remove_file(&path).unwrap();

    result.unwrap();
    assert!(registry.resolve("UserService", "CreateUser").is_ok());
}

#[test]
fn test_load_missing_file() {
    let mut registry = SchemaRegistry::new();

    let err = registry.load_file("/definitely/not/here.bin").unwrap_err();
    match err {
        SchemaLoadError::Io { path, .. } => {
            assert_eq!(path, std::path::PathBuf::from("/definitely/not/here.bin"))
        }
        other => panic!("Expected an IO error, got {other:?}"),
    }
}
