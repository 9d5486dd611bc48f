use crate::{
    decompose_ref, is_app_ref, keyfile_value, pretty_ref, runtime_from_metadata, runtime_ref,
    CancellationToken, RefKind, Subpaths, TransactionError,
};

#[test]
fn decompose_app_ref() {
    let parts = decompose_ref("app/org.gnome.Recipes/x86_64/stable").expect("must decompose");
    assert_eq!(parts.kind, RefKind::App);
    assert_eq!(parts.name, "org.gnome.Recipes");
    assert_eq!(parts.arch, "x86_64");
    assert_eq!(parts.branch, "stable");
    assert_eq!(parts.pretty(), "org.gnome.Recipes/x86_64/stable");
}

#[test]
fn decompose_runtime_ref() {
    let parts = decompose_ref("runtime/org.gnome.Platform/x86_64/3.28").expect("must decompose");
    assert_eq!(parts.kind, RefKind::Runtime);
    assert_eq!(parts.branch, "3.28");
}

#[test]
fn decompose_rejects_bad_refs() {
    for bad in [
        "",
        "app",
        "app/org.foo",
        "app/org.foo/x86_64",
        "app/org.foo/x86_64/stable/extra",
        "extension/org.foo/x86_64/stable",
        "app//x86_64/stable",
        "app/org.foo//stable",
        "app/org.foo/x86_64/",
    ] {
        let err = decompose_ref(bad).expect_err("must reject");
        assert!(
            matches!(
                err.downcast_ref::<TransactionError>(),
                Some(TransactionError::MalformedRef(_))
            ),
            "unexpected error for {bad:?}: {err}"
        );
    }
}

#[test]
fn pretty_strips_kind() {
    assert_eq!(
        pretty_ref("app/org.foo/x86_64/stable").expect("must split"),
        "org.foo/x86_64/stable"
    );
    let err = pretty_ref("no-slash-here").expect_err("must reject");
    assert!(matches!(
        err.downcast_ref::<TransactionError>(),
        Some(TransactionError::MalformedRef(_))
    ));
}

#[test]
fn app_ref_prefix_check() {
    assert!(is_app_ref("app/org.foo/x86_64/stable"));
    assert!(!is_app_ref("runtime/org.foo/x86_64/stable"));
    assert!(!is_app_ref("application/org.foo/x86_64/stable"));
}

#[test]
fn runtime_ref_prepends_kind() {
    assert_eq!(
        runtime_ref("org.gnome.Platform/x86_64/3.28"),
        "runtime/org.gnome.Platform/x86_64/3.28"
    );
}

#[test]
fn subpaths_normalize_empty_to_all() {
    assert_eq!(Subpaths::from_list(Vec::new()), Subpaths::All);
    assert_eq!(
        Subpaths::from_list(vec!["/de".to_string()]),
        Subpaths::Only(vec!["/de".to_string()])
    );
    assert_eq!(Subpaths::from_option(None), Subpaths::Inherit);
    assert_eq!(Subpaths::from_option(Some(Vec::new())), Subpaths::All);
}

#[test]
fn subpaths_render_forms() {
    assert_eq!(Subpaths::Inherit.render(), "[$old]");
    assert_eq!(Subpaths::All.render(), "[*]");
    assert_eq!(
        Subpaths::Only(vec!["/de".to_string(), "/fr".to_string()]).render(),
        "[/de, /fr]"
    );
}

#[test]
fn keyfile_reads_runtime_key() {
    let metadata = "[Application]\nname=org.gnome.Recipes\nruntime=org.gnome.Platform/x86_64/3.28\n\n[Context]\nshared=network;\n";
    assert_eq!(
        runtime_from_metadata(metadata).as_deref(),
        Some("org.gnome.Platform/x86_64/3.28")
    );
}

#[test]
fn keyfile_misses_are_none() {
    assert_eq!(keyfile_value("", "Application", "runtime"), None);
    assert_eq!(
        keyfile_value("[Runtime]\nruntime=x\n", "Application", "runtime"),
        None
    );
    assert_eq!(
        keyfile_value("[Application]\nname=x\n", "Application", "runtime"),
        None
    );
    // runtime key outside any section header
    assert_eq!(
        keyfile_value("runtime=x\n[Application]\n", "Application", "runtime"),
        None
    );
}

#[test]
fn keyfile_tolerates_noise() {
    let metadata = "# comment\n; other comment\n[Application]\nnot a key value line\nruntime = org.base.Platform/x86_64/1.0 \n";
    assert_eq!(
        keyfile_value(metadata, "Application", "runtime").as_deref(),
        Some("org.base.Platform/x86_64/1.0")
    );
}

#[test]
fn error_messages_use_pretty_forms() {
    assert_eq!(
        TransactionError::NotInstalled("org.foo/x86_64/stable".to_string()).to_string(),
        "org.foo/x86_64/stable not installed"
    );
    assert_eq!(
        TransactionError::AlreadyInstalled("org.foo/x86_64/stable".to_string()).to_string(),
        "org.foo/x86_64/stable already installed"
    );
    assert_eq!(
        TransactionError::RuntimeMissing {
            app: "org.foo/x86_64/stable".to_string(),
            runtime: "org.base.Platform/x86_64/1.0".to_string(),
        }
        .to_string(),
        "the application org.foo/x86_64/stable requires the runtime org.base.Platform/x86_64/1.0 which is not installed"
    );
    assert_eq!(
        TransactionError::Failed.to_string(),
        "One or more operations failed"
    );
}

#[test]
fn cancellation_flag_is_shared() {
    let token = CancellationToken::new();
    let clone = token.clone();
    assert!(token.check().is_ok());

    clone.cancel();
    assert!(token.is_cancelled());
    assert_eq!(token.check(), Err(TransactionError::Cancelled));
}
