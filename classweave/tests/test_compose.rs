use classweave::{compose, ComposeError, ComposedClassNameRequest, ExtraClassSpec};

#[test]
fn test_base_only_is_base() {
    for base in ["toolbar", "a", "nuclide-ui-toolbar"] {
        assert_eq!(compose(&ComposedClassNameRequest::new(base)).as_deref(), Ok(base));
    }
}

#[test]
fn test_location_suffix() {
    for location in ["top", "bottom", "0"] {
        let request = ComposedClassNameRequest::new("toolbar").location(location);
        assert_eq!(
            compose(&request),
            Ok(format!("toolbar toolbar--{location}"))
        );
    }
}

#[test]
fn test_examples() {
    let top = ComposedClassNameRequest::new("toolbar").location("top");
    assert_eq!(compose(&top).as_deref(), Ok("toolbar toolbar--top"));

    let extra = ComposedClassNameRequest::new("toolbar").extra("user-class");
    assert_eq!(compose(&extra).as_deref(), Ok("toolbar user-class"));

    let plain = ComposedClassNameRequest::new("toolbar");
    assert_eq!(compose(&plain).as_deref(), Ok("toolbar"));

    let null_location = ComposedClassNameRequest::new("toolbar").maybe_location(None::<&str>);
    assert_eq!(compose(&null_location).as_deref(), Ok("toolbar"));
}

#[test]
fn test_flags_order() {
    let request = ComposedClassNameRequest::new("toolbar")
        .location("top")
        .flag("a", true)
        .flag("b", false)
        .flag("c", true);
    assert_eq!(compose(&request).as_deref(), Ok("toolbar toolbar--top a c"));
}

#[test]
fn test_idempotent() {
    let request = ComposedClassNameRequest::new("toolbar")
        .location("right")
        .extra([("wide", true), ("hidden", false)]);
    assert_eq!(compose(&request), compose(&request));
}

#[test]
fn test_output_shape() {
    let request = ComposedClassNameRequest::new("toolbar")
        .location("top")
        .extra(" padded ");
    let class_name = compose(&request).expect("should compose");
    assert!(!class_name.is_empty());
    assert_eq!(class_name.trim(), class_name);
    assert!(!class_name.contains('\n'));
    assert_eq!(class_name, "toolbar toolbar--top padded");
}

#[test]
fn test_empty_base_is_invalid() {
    let request = ComposedClassNameRequest::new("").location("top");
    assert!(matches!(
        compose(&request),
        Err(ComposeError::InvalidArgument(_))
    ));
}

#[test]
fn test_from_json() {
    let request: ComposedClassNameRequest = serde_json::from_str(
        r#"{"baseClass": "toolbar", "location": null, "extraClass": {"a": true, "b": false, "c": true}}"#,
    )
    .expect("should deserialize");
    assert_eq!(compose(&request).as_deref(), Ok("toolbar a c"));

    let request: ComposedClassNameRequest =
        serde_json::from_str(r#"{"baseClass": "toolbar", "extraClass": 7}"#)
            .expect("should deserialize");
    assert_eq!(request.extra_class, ExtraClassSpec::Ignored);
    assert_eq!(compose(&request).as_deref(), Ok("toolbar"));
}
