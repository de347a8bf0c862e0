//! End-to-end generation against the stub engine.

mod common;

use common::{context, dict, quad, Fixture, StubEngine, OBJ_ENCODER, RULE_FILE_KEY, TEXTURE_KEY};
use config::constants::{
    GeneratorDefaults, AUXILIARY_ENCODERS, ENCODER_ID_PYTHON, FALLBACK_OUTPUT_DIR_NAME,
};
use prt_api::{Geometry, Status};
use prt_client::{
    AttributeDict, EvaluatedAttribute, GenerateError, GenerateRequest, ModelGenerator,
    ReportValue, ShapeDescriptor,
};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::atomic::Ordering;

fn no_options() -> AttributeDict {
    AttributeDict::new()
}

/// Scenario A: a quad passed through an echoing rule keeps its single face.
#[test]
fn test_quad_generates_single_face() {
    let engine = StubEngine::new();
    let fixture = Fixture::new();
    let mut generator = ModelGenerator::with_context(context(&engine), &[quad()]);

    let models = generator.generate_model(
        &[AttributeDict::new()],
        fixture.rule_package(),
        ENCODER_ID_PYTHON,
        &no_options(),
    );

    assert_eq!(models.len(), 1);
    assert_eq!(models[0].initial_shape_index(), 0);
    assert_eq!(models[0].faces(), &[4]);
    assert_eq!(models[0].indices(), &[0, 1, 2, 3]);
    assert_eq!(models[0].positions().len(), 4);
}

/// Generated buffers form a valid explicit-geometry descriptor again.
#[test]
fn test_generated_geometry_round_trips_into_descriptor() {
    let engine = StubEngine::new();
    let fixture = Fixture::new();
    let shape = ShapeDescriptor::from_faces(
        vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 1.0, 2.0, 0.0, 0.0],
        vec![0, 1, 2, 3, 1, 4, 2],
        vec![4, 3],
        Vec::new(),
    )
    .unwrap();
    let mut generator = ModelGenerator::with_context(context(&engine), &[shape]);

    let models = generator.generate_model(
        &[no_options()],
        fixture.rule_package(),
        ENCODER_ID_PYTHON,
        &no_options(),
    );
    let model = &models[0];
    let again = ShapeDescriptor::from_faces(
        model.vertices().to_vec(),
        model.indices().to_vec(),
        model.faces().to_vec(),
        Vec::new(),
    );
    assert!(again.is_ok());
}

/// Scenario B: one dictionary is broadcast to every shape.
#[test]
fn test_single_dictionary_is_broadcast() {
    let engine = StubEngine::new();
    let fixture = Fixture::new();
    let mut generator = ModelGenerator::with_context(context(&engine), &[quad(), quad()]);

    let models = generator.generate_model(
        &[dict(json!({"seed": 555, "shapeName": "A"}))],
        fixture.rule_package(),
        ENCODER_ID_PYTHON,
        &no_options(),
    );

    assert_eq!(models.len(), 2);
    let seen = engine.seen_shapes.lock().clone();
    assert_eq!(seen.len(), 2);
    for shape in &seen {
        assert_eq!(shape.seed, 555);
        assert_eq!(shape.name, "A");
        assert_eq!(shape.rule_file, RULE_FILE_KEY);
        assert_eq!(shape.start_rule, "Default$Lot");
    }
    for model in &models {
        assert_eq!(model.report()["seed"], ReportValue::Float(555.0));
        assert_eq!(model.report()["shapeName"], ReportValue::String("A".into()));
    }
}

/// Scenario C: per-shape dictionaries reach their own shapes.
#[test]
fn test_per_shape_dictionaries_change_reports() {
    let engine = StubEngine::new();
    let fixture = Fixture::new();
    let mut generator = ModelGenerator::with_context(context(&engine), &[quad(), quad()]);

    let models = generator.generate_model(
        &[
            dict(json!({"minBuildingHeight": 10.0})),
            dict(json!({"minBuildingHeight": 30.0})),
        ],
        fixture.rule_package(),
        ENCODER_ID_PYTHON,
        &no_options(),
    );

    assert_eq!(models.len(), 2);
    assert_eq!(models[0].report()["minBuildingHeight"], ReportValue::Float(10.0));
    assert_eq!(models[1].report()["minBuildingHeight"], ReportValue::Float(30.0));
}

/// Scenario D: a file encoder without `outputPath` writes to the fallback
/// directory and returns no models.
///
/// The fallback directory outlives test runs, so the stale file is removed
/// first and the new one is matched by content unique to this run. The
/// directory itself is left in place for other tests sharing it.
#[test]
fn test_file_encoder_writes_to_fallback_directory() {
    let engine = StubEngine::new();
    let fixture = Fixture::new();
    let marker = f64::from(std::process::id()) + 0.25;
    let shape = ShapeDescriptor::from_vertices(vec![
        0.0, 0.0, 0.0, 0.0, 0.0, marker, marker, 0.0, marker,
    ])
    .unwrap();
    let mut generator = ModelGenerator::with_context(context(&engine), &[shape]);

    let fallback = std::env::temp_dir().join(FALLBACK_OUTPUT_DIR_NAME);
    let written = fallback.join("shape_0.obj");
    let _ = std::fs::remove_file(&written);
    assert!(!written.exists());

    let models =
        generator.generate_model(&[no_options()], fixture.rule_package(), OBJ_ENCODER, &no_options());

    assert!(models.is_empty());
    assert_eq!(engine.generate_calls(), 1);
    assert!(fallback.is_dir());
    let contents = std::fs::read_to_string(&written).unwrap();
    assert!(contents.contains(&format!("v 0 0 {marker}\n")));
    assert_eq!(generator.encoders(), &[OBJ_ENCODER.to_string()]);
}

#[test]
fn test_file_encoder_writes_to_output_path() {
    let engine = StubEngine::new();
    let fixture = Fixture::new();
    let output = tempfile::TempDir::new().unwrap();
    let mut generator = ModelGenerator::with_context(context(&engine), &[quad(), quad()]);

    let options = dict(json!({"outputPath": output.path().to_str().unwrap()}));
    let models = generator.generate_model(&[no_options()], fixture.rule_package(), OBJ_ENCODER, &options);

    assert!(models.is_empty());
    assert!(output.path().join("shape_0.obj").is_file());
    assert!(output.path().join("shape_1.obj").is_file());
}

#[test]
fn test_file_encoder_with_missing_output_path_skips_engine() {
    let engine = StubEngine::new();
    let fixture = Fixture::new();
    let mut generator = ModelGenerator::with_context(context(&engine), &[quad()]);

    let missing = fixture.path().join("missing");
    let options = dict(json!({"outputPath": missing.to_str().unwrap()}));
    let attrs = [no_options()];
    let rpk = fixture.rule_package();
    let request = GenerateRequest::new(&attrs, &rpk, OBJ_ENCODER, &options);

    assert_eq!(
        generator.try_generate(&request).unwrap_err(),
        GenerateError::OutputPath { path: missing }
    );
    assert_eq!(engine.generate_calls(), 0);
}

/// Scenario E: a missing rule package never reaches the engine.
#[test]
fn test_missing_rule_package_skips_engine() {
    let engine = StubEngine::new();
    let fixture = Fixture::new();
    let mut generator = ModelGenerator::with_context(context(&engine), &[quad()]);
    let missing = fixture.path().join("missing.rpk");

    let models = generator.generate_model(&[no_options()], &missing, ENCODER_ID_PYTHON, &no_options());
    assert!(models.is_empty());

    let options = no_options();
    let attrs = [no_options()];
    let err = generator
        .try_generate(&GenerateRequest::new(&attrs, &missing, ENCODER_ID_PYTHON, &options))
        .unwrap_err();
    match err {
        GenerateError::RulePackage(err) => assert_eq!(err.status, Status::FileNotFound),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(engine.generate_calls(), 0);
}

#[test]
fn test_rule_package_without_rule_file_is_invalid_uri() {
    let engine = StubEngine::new();
    let fixture = Fixture::new();
    let mut generator = ModelGenerator::with_context(context(&engine), &[quad()]);

    let attrs = [no_options()];
    let options = no_options();
    let rpk = fixture.rule_package_without_rule_file();
    let err = generator
        .try_generate(&GenerateRequest::new(&attrs, &rpk, ENCODER_ID_PYTHON, &options))
        .unwrap_err();

    assert!(matches!(
        err,
        GenerateError::RulePackage(ref e) if e.status == Status::InvalidUri
    ));
    assert_eq!(engine.generate_calls(), 0);
}

/// Too few dictionaries fail before the engine is called; extras are ignored.
#[test]
fn test_attribute_dictionary_count_rules() {
    let engine = StubEngine::new();
    let fixture = Fixture::new();
    let rpk = fixture.rule_package();
    let options = no_options();
    let mut generator = ModelGenerator::with_context(context(&engine), &[quad(), quad(), quad()]);

    let two = [dict(json!({"seed": 1})), dict(json!({"seed": 2}))];
    assert_eq!(
        generator
            .try_generate(&GenerateRequest::new(&two, &rpk, ENCODER_ID_PYTHON, &options))
            .unwrap_err(),
        GenerateError::AttributeCount { given: 2, shapes: 3 }
    );
    assert_eq!(
        generator
            .try_generate(&GenerateRequest::new(&[], &rpk, ENCODER_ID_PYTHON, &options))
            .unwrap_err(),
        GenerateError::AttributeCount { given: 0, shapes: 3 }
    );
    assert_eq!(engine.generate_calls(), 0);

    let four: Vec<AttributeDict> = (1..=4).map(|seed| dict(json!({ "seed": seed }))).collect();
    let models = generator
        .try_generate(&GenerateRequest::new(&four, &rpk, ENCODER_ID_PYTHON, &options))
        .unwrap();
    assert_eq!(models.len(), 3);
    let seeds: Vec<i32> = engine.seen_shapes.lock().iter().map(|s| s.seed).collect();
    assert_eq!(seeds, vec![1, 2, 3]);
}

#[test]
fn test_defaults_apply_without_reserved_keys() {
    let engine = StubEngine::new();
    let fixture = Fixture::new();
    let mut generator = ModelGenerator::with_context(context(&engine), &[quad(), quad()]);

    generator.generate_model(
        &[dict(json!({"seed": 1.5})), dict(json!({"shapeName": 7}))],
        fixture.rule_package(),
        ENCODER_ID_PYTHON,
        &no_options(),
    );
    let seen = engine.seen_shapes.lock().clone();
    assert_eq!((seen[0].seed, seen[0].name.as_str()), (0, "InitialShape"));
    assert_eq!((seen[1].seed, seen[1].name.as_str()), (0, "InitialShape"));

    let mut generator = ModelGenerator::with_context(context(&engine), &[quad()])
        .with_defaults(GeneratorDefaults::new(7, "Lot").unwrap());
    generator.generate_model(&[no_options()], fixture.rule_package(), ENCODER_ID_PYTHON, &no_options());
    let seen = engine.seen_shapes.lock().clone();
    assert_eq!((seen[0].seed, seen[0].name.as_str()), (7, "Lot"));
}

#[test]
fn test_attributes_reach_the_engine_typed() {
    let engine = StubEngine::new();
    let fixture = Fixture::new();
    let mut generator = ModelGenerator::with_context(context(&engine), &[quad()]);

    generator.generate_model(
        &[dict(json!({"height": 22.5, "floors": 4, "style": "modern", "tags": ["a", "b"]}))],
        fixture.rule_package(),
        ENCODER_ID_PYTHON,
        &no_options(),
    );
    let seen = engine.seen_shapes.lock().clone();
    let attributes = &seen[0].attributes;
    assert_eq!(attributes.get_float("height"), Some(22.5));
    assert_eq!(attributes.get_int("floors"), Some(4));
    assert_eq!(attributes.get_string("style"), Some("modern"));
    assert!(attributes.has_key("tags"));
}

/// Hidden attributes never surface; default style prefixes are removed.
#[test]
fn test_evaluated_attributes_are_filtered_and_cleaned() {
    let engine = StubEngine::new();
    let fixture = Fixture::new();
    let mut generator = ModelGenerator::with_context(context(&engine), &[quad()]);

    let models = generator.generate_model(
        &[dict(json!({"height": 15.0}))],
        fixture.rule_package(),
        ENCODER_ID_PYTHON,
        &no_options(),
    );
    let attributes = models[0].attributes();

    assert_eq!(attributes["height"], EvaluatedAttribute::Float(15.0));
    assert_eq!(
        attributes["levels"],
        EvaluatedAttribute::FloatMatrix(vec![vec![1.0, 2.0], vec![3.0, 4.0]])
    );
    assert!(!attributes.contains_key("secret"));
    assert!(!attributes.contains_key("Default$secret"));
    assert!(generator
        .rule_package()
        .unwrap()
        .hidden_attributes
        .contains("Default$secret"));
}

#[test]
fn test_prints_and_errors_are_collected() {
    let engine = StubEngine::new();
    let fixture = Fixture::new();
    let mut generator = ModelGenerator::with_context(context(&engine), &[quad(), quad()]);

    let models = generator.generate_model(
        &[no_options()],
        fixture.rule_package(),
        ENCODER_ID_PYTHON,
        &no_options(),
    );
    assert_eq!(models[1].cga_prints(), "shape 1\n");
    assert_eq!(models[1].cga_errors(), &["CGA Warning: stub warning".to_string()]);
}

#[test]
fn test_in_memory_encoder_adds_auxiliary_encoders() {
    let engine = StubEngine::new();
    let fixture = Fixture::new();
    let mut generator = ModelGenerator::with_context(context(&engine), &[quad()]);

    generator.generate_model(&[no_options()], fixture.rule_package(), ENCODER_ID_PYTHON, &no_options());

    let mut expected = vec![ENCODER_ID_PYTHON.to_string()];
    expected.extend(AUXILIARY_ENCODERS.iter().map(|e| e.to_string()));
    assert_eq!(generator.encoders(), expected.as_slice());
    assert_eq!(*engine.seen_encoders.lock(), expected);
    assert_eq!(generator.encoder_options().len(), expected.len());
    assert_eq!(generator.encoder_options()[1].get_bool("triangulate"), Some(false));
}

#[test]
fn test_unknown_encoder_fails_before_generate() {
    let engine = StubEngine::new();
    let fixture = Fixture::new();
    let mut generator = ModelGenerator::with_context(context(&engine), &[quad()]);

    let attrs = [no_options()];
    let options = no_options();
    let rpk = fixture.rule_package();
    let err = generator
        .try_generate(&GenerateRequest::new(&attrs, &rpk, "com.example.Missing", &options))
        .unwrap_err();

    assert_eq!(
        err,
        GenerateError::EncoderOptions {
            encoder: "com.example.Missing".into(),
            status: Status::EncoderNotFound,
        }
    );
    assert_eq!(engine.generate_calls(), 0);
}

#[test]
fn test_engine_failure_is_reported() {
    let engine = StubEngine::new();
    *engine.fail_generate.lock() = Some(Status::UnspecifiedError);
    let fixture = Fixture::new();
    let mut generator = ModelGenerator::with_context(context(&engine), &[quad()]);

    let attrs = [no_options()];
    let options = no_options();
    let rpk = fixture.rule_package();
    let request = GenerateRequest::new(&attrs, &rpk, ENCODER_ID_PYTHON, &options);
    assert_eq!(
        generator.try_generate(&request).unwrap_err(),
        GenerateError::Engine(Status::UnspecifiedError)
    );
    assert!(generator
        .generate_model(&attrs, &rpk, ENCODER_ID_PYTHON, &options)
        .is_empty());
}

#[test]
fn test_engine_panic_is_caught() {
    let engine = StubEngine::new();
    engine.panic_on_generate.store(true, Ordering::SeqCst);
    let fixture = Fixture::new();
    let mut generator = ModelGenerator::with_context(context(&engine), &[quad()]);

    let attrs = [no_options()];
    let options = no_options();
    let rpk = fixture.rule_package();
    let err = generator
        .try_generate(&GenerateRequest::new(&attrs, &rpk, ENCODER_ID_PYTHON, &options))
        .unwrap_err();
    assert_eq!(err, GenerateError::Panicked("engine exploded".into()));
}

/// One bad descriptor invalidates the generator; the others still build.
#[test]
fn test_invalid_descriptor_invalidates_generator() {
    let engine = StubEngine::new();
    let fixture = Fixture::new();
    let broken = ShapeDescriptor::from_faces(vec![0.0; 9], vec![0, 1, 7], vec![3], Vec::new()).unwrap();
    let missing = ShapeDescriptor::from_path(fixture.path().join("missing.json"), None);
    let mut generator =
        ModelGenerator::with_context(context(&engine), &[quad(), broken, missing]);

    assert!(!generator.is_valid());
    assert_eq!(
        generator.shape_status(),
        &[Ok(()), Err(Status::InvalidGeometry), Err(Status::FileNotFound)]
    );

    let models = generator.generate_model(
        &[no_options()],
        fixture.rule_package(),
        ENCODER_ID_PYTHON,
        &no_options(),
    );
    assert!(models.is_empty());

    let attrs = [no_options()];
    let options = no_options();
    let rpk = fixture.rule_package();
    assert_eq!(
        generator
            .try_generate(&GenerateRequest::new(&attrs, &rpk, ENCODER_ID_PYTHON, &options))
            .unwrap_err(),
        GenerateError::InvalidGenerator { failed: 2, total: 3 }
    );
    assert_eq!(engine.generate_calls(), 0);
}

#[test]
fn test_asset_shape_is_resolved_with_neighbouring_files() {
    let engine = StubEngine::new();
    let fixture = Fixture::new();
    let asset = fixture.asset(&Geometry {
        vertex_coords: vec![0.0, 0.0, 0.0, 5.0, 0.0, 0.0, 5.0, 0.0, 5.0],
        indices: vec![0, 1, 2],
        face_counts: vec![3],
        holes: Vec::new(),
    });
    let mut generator =
        ModelGenerator::with_context(context(&engine), &[ShapeDescriptor::from_path(&asset, None)]);

    assert!(generator.is_valid());
    // asset itself plus the texture next to it
    assert_eq!(*engine.asset_map_sizes.lock(), vec![2]);

    let models = generator.generate_model(
        &[no_options()],
        fixture.rule_package(),
        ENCODER_ID_PYTHON,
        &no_options(),
    );
    assert_eq!(models[0].faces(), &[3]);
}

/// The cache outlives single calls, so rule info is decoded once.
#[test]
fn test_cache_persists_across_calls() {
    let engine = StubEngine::new();
    let fixture = Fixture::new();
    let mut generator = ModelGenerator::with_context(context(&engine), &[quad()]);

    for _ in 0..3 {
        let models = generator.generate_model(
            &[no_options()],
            fixture.rule_package(),
            ENCODER_ID_PYTHON,
            &no_options(),
        );
        assert_eq!(models.len(), 1);
    }
    assert_eq!(engine.generate_calls(), 3);
    assert_eq!(engine.rule_info_loads.load(Ordering::SeqCst), 1);
    assert!(!generator.cache().is_empty());
}

#[test]
fn test_assets_override_package_entries() {
    let engine = StubEngine::new();
    let fixture = Fixture::new();
    let mut generator = ModelGenerator::with_context(context(&engine), &[quad()]);

    let assets = BTreeMap::from([
        (TEXTURE_KEY.to_string(), "file:/override/brick.jpg".to_string()),
        ("assets/extra.jpg".to_string(), "file:/extra.jpg".to_string()),
    ]);
    let attrs = [no_options()];
    let options = no_options();
    let rpk = fixture.rule_package();
    let request =
        GenerateRequest::new(&attrs, &rpk, ENCODER_ID_PYTHON, &options).with_assets(&assets);
    generator.try_generate(&request).unwrap();

    let package = generator.rule_package().unwrap();
    assert_eq!(
        package.resolve_map.get_string(TEXTURE_KEY),
        Some("file:/override/brick.jpg")
    );
    assert_eq!(package.resolve_map.get_string("assets/extra.jpg"), Some("file:/extra.jpg"));
    assert!(package.resolve_map.get_string(RULE_FILE_KEY).is_some());
}

#[test]
fn test_shut_down_context_rejects_generation() {
    let engine = StubEngine::new();
    let fixture = Fixture::new();
    let context = context(&engine);
    let mut generator = ModelGenerator::with_context(context.clone(), &[quad()]);
    context.shutdown();

    let attrs = [no_options()];
    let options = no_options();
    let rpk = fixture.rule_package();
    assert_eq!(
        generator
            .try_generate(&GenerateRequest::new(&attrs, &rpk, ENCODER_ID_PYTHON, &options))
            .unwrap_err(),
        GenerateError::NotInitialized
    );
    assert_eq!(engine.shutdown_calls.load(Ordering::SeqCst), 1);
}

/// Shapes are not built against an engine that was already shut down.
#[test]
fn test_shut_down_context_rejects_construction() {
    let engine = StubEngine::new();
    let fixture = Fixture::new();
    let context = context(&engine);
    context.shutdown();

    let asset = ShapeDescriptor::from_path(fixture.path().join("lot.json"), None);
    let generator = ModelGenerator::with_context(context, &[quad(), asset]);

    assert!(!generator.is_valid());
    assert_eq!(
        generator.shape_status(),
        &[Err(Status::NotInitialized), Err(Status::NotInitialized)]
    );
    assert!(engine.asset_map_sizes.lock().is_empty());
}

#[test]
fn test_model_json_contains_payload() {
    let engine = StubEngine::new();
    let fixture = Fixture::new();
    let mut generator = ModelGenerator::with_context(context(&engine), &[quad()]);

    let models = generator.generate_model(
        &[dict(json!({"seed": 3}))],
        fixture.rule_package(),
        ENCODER_ID_PYTHON,
        &no_options(),
    );
    let json = models[0].to_json().unwrap();
    assert_eq!(json["faces"], json!([4]));
    assert_eq!(json["report"]["seed"], 3.0);
    assert_eq!(json["attributes"]["height"], 10.0);
}

proptest::proptest! {
    #![proptest_config(proptest::prelude::ProptestConfig::with_cases(16))]

    /// A single dictionary reaches every shape, whatever the shape count.
    #[test]
    fn prop_single_dictionary_broadcasts(shapes in 1usize..6, seed in proptest::prelude::any::<i32>()) {
        let engine = StubEngine::new();
        let fixture = Fixture::new();
        let descriptors = vec![quad(); shapes];
        let mut generator = ModelGenerator::with_context(context(&engine), &descriptors);

        let models = generator.generate_model(
            &[dict(json!({ "seed": seed }))],
            fixture.rule_package(),
            ENCODER_ID_PYTHON,
            &no_options(),
        );

        proptest::prop_assert_eq!(models.len(), shapes);
        let seeds: Vec<i32> = engine.seen_shapes.lock().iter().map(|s| s.seed).collect();
        proptest::prop_assert_eq!(seeds, vec![seed; shapes]);
    }
}
