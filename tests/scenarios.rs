use std::collections::HashMap;
use std::sync::Arc;
use std::thread;

use cspm_names::{
    CancelFlag, DeclarationKind, Document, DocumentBuilder, ImportingResolver,
    NamesAreUniqueValidator, NeverCancel, PerModuleResolver, ResolverRegistry, SourceSpan,
    ValidationError, ValidatorConfig,
};

fn channels(uri: &str, names: &[&str]) -> Document {
    let mut builder = DocumentBuilder::new(uri);
    for (i, name) in names.iter().enumerate() {
        builder = builder.declare(DeclarationKind::Channel, name, SourceSpan::line(i + 1));
    }
    builder.build()
}

#[test]
fn test_duplicate_process_is_reported_once() {
    let doc = channels("file:///pqp.csp", &["P", "Q", "P"]);
    let findings = NamesAreUniqueValidator::new()
        .validate(&doc, &NeverCancel)
        .unwrap();

    assert_eq!(findings.len(), 1);
    assert_eq!(
        findings[0].to_string(),
        "file:///pqp.csp:3:1: error: duplicate name 'P' (first declared at file:///pqp.csp:1:1)"
    );
}

#[test]
fn test_configured_profile_from_registry() {
    let doc = DocumentBuilder::new("file:///mods.csp")
        .open_module("M", SourceSpan::line(1))
        .declare(DeclarationKind::Process, "A", SourceSpan::line(2))
        .close()
        .open_module("N", SourceSpan::line(3))
        .declare(DeclarationKind::Process, "A", SourceSpan::line(4))
        .close()
        .build();

    let config = ValidatorConfig::default().profile("per-module");
    let validator =
        NamesAreUniqueValidator::from_config(config, &ResolverRegistry::with_defaults()).unwrap();
    assert!(validator.validate(&doc, &NeverCancel).unwrap().is_empty());
}

#[test]
fn test_imported_names_clash_with_local_ones() {
    let mut library = HashMap::new();
    library.insert(
        "file:///lib.csp".to_string(),
        Arc::new(channels("file:///lib.csp", &["tick", "tock"])),
    );

    let doc = DocumentBuilder::new("file:///main.csp")
        .import("file:///lib.csp")
        .declare(DeclarationKind::Channel, "tock", SourceSpan::line(2))
        .build();

    let mut registry = ResolverRegistry::with_defaults();
    registry.register(ImportingResolver::new(Arc::new(library)));
    let validator = NamesAreUniqueValidator::from_config(
        ValidatorConfig::default().profile("imports"),
        &registry,
    )
    .unwrap();

    let findings = validator.validate(&doc, &NeverCancel).unwrap();
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].name, "tock");
    assert_eq!(&*findings[0].first_location.uri, "file:///lib.csp");

    let flag = CancelFlag::new();
    flag.cancel();
    let cancelled = validator.validate(&doc, &flag);
    assert!(matches!(cancelled, Err(ValidationError::Cancelled { .. })));
}

#[test]
fn test_passes_run_independently_on_many_threads() {
    let validator = Arc::new(NamesAreUniqueValidator::with_resolver(PerModuleResolver));

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let validator = Arc::clone(&validator);
            thread::spawn(move || {
                let names: Vec<String> = (0..=i).map(|_| "X".to_string()).collect();
                let refs: Vec<&str> = names.iter().map(String::as_str).collect();
                let doc = channels(&format!("file:///t{}.csp", i), &refs);
                validator.validate(&doc, &NeverCancel).unwrap().len()
            })
        })
        .collect();

    let counts: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(counts, vec![0, 1, 2, 3]);
}
