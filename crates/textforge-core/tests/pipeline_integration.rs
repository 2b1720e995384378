//! End-to-end tests for the public pipeline API
//!
//! These tests only use what the crate re-exports at its root.

use pretty_assertions::assert_eq;
use textforge_core::{transform, Error, Pipeline, PipelineBuilder, TransformKind, DEFAULT_TRANSFORMS};

#[test]
fn test_full_pipeline_over_polish_sentence() {
    let text = "np. 21 kotów i 3 psy psy, m.in. {Burek}";
    let out = transform(
        ["expand", "numbertotext", "removeduplicates", "latex", "capitalize"],
        text,
    )
    .expect("all names are known");

    assert_eq!(
        out,
        r"Na przykład dwadzieścia jeden kotów i trzy psy, między innymi \{Burek\}"
    );
}

#[test]
fn test_default_transforms_resolve_to_upper() {
    let pipeline = Pipeline::resolve(DEFAULT_TRANSFORMS.iter()).unwrap();
    assert_eq!(pipeline.stages(), &[TransformKind::Upper]);
    assert_eq!(pipeline.apply("domyślnie"), "DOMYŚLNIE");
}

#[test]
fn test_owned_names_from_user_input() {
    let names: Vec<String> = "lower,capitalize"
        .split(',')
        .map(str::to_string)
        .collect();
    let pipeline = PipelineBuilder::new().names(names).build().unwrap();
    assert_eq!(pipeline.apply("HELLO WORLD"), "Hello world");
}

#[test]
fn test_unknown_name_prevents_any_work() {
    let result = transform(["upper", "frobnicate"], "text");
    assert_eq!(result, Err(Error::unknown_transformation("frobnicate")));
}

#[test]
fn test_same_kind_twice() {
    assert_eq!(
        transform(["inverse", "inverse"], "Hello Ma").unwrap(),
        "Hello Ma"
    );
    assert_eq!(
        transform(["latex", "latex"], "&").unwrap(),
        r"\\&"
    );
}

#[test]
fn test_pipelines_are_independent_across_threads() {
    let handles: Vec<_> = (0..8)
        .map(|n| {
            std::thread::spawn(move || {
                let names = if n % 2 == 0 {
                    vec!["numbertotext", "upper"]
                } else {
                    vec!["numbertotext", "capitalize"]
                };
                transform(names, &format!("{n} kot")).unwrap()
            })
        })
        .collect();

    let results: Vec<String> = handles
        .into_iter()
        .map(|handle| handle.join().expect("worker thread finished"))
        .collect();

    assert_eq!(results[0], "ZERO KOT");
    assert_eq!(results[1], "Jeden kot");
    assert_eq!(results[7], "Siedem kot");
}
