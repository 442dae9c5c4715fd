//! Unit tests for special-format detection and exclusion planning.

use super::*;
use rstest::{fixture, rstest};
use tempfile::TempDir;

#[fixture]
fn model_dir() -> TempDir {
    let dir = TempDir::new().expect("temp dir creation succeeds");
    fs::write(dir.path().join("signature.json"), b"{}").expect("write signature");
    dir
}

#[fixture]
fn name() -> ModelName {
    ModelName::try_from("squeezenet").expect("valid name")
}

fn onnx_mock() -> MockModelConverter {
    let mut converter = MockModelConverter::new();
    converter.expect_suffix().return_const(".onnx");
    converter
}

fn squeezenet_outputs() -> ConvertedFiles {
    ConvertedFiles {
        symbol_file: "squeezenet-symbol.json".to_owned(),
        params_file: "squeezenet-0000.params".to_owned(),
    }
}

#[rstest]
fn no_special_files_yields_empty_plan(model_dir: TempDir, name: ModelName) {
    let mut converter = onnx_mock();
    converter.expect_convert().never();
    let resolver = ExclusionResolver::new(vec![Box::new(converter)]);

    let plan = resolver.resolve(model_dir.path(), &name).expect("resolves");
    assert!(plan.is_empty());
    assert!(plan.temporary_files.is_empty());
    assert!(plan.excluded_originals.is_empty());
}

#[rstest]
fn single_special_file_is_converted_and_excluded(model_dir: TempDir, name: ModelName) {
    fs::write(model_dir.path().join("squeezenet.onnx"), b"graph").expect("write onnx");
    let dir_path = model_dir.path().to_path_buf();
    let expected_dir = dir_path.clone();

    let mut converter = onnx_mock();
    converter
        .expect_convert()
        .withf(move |dir, file, model| {
            dir == expected_dir.as_path()
                && file == "squeezenet.onnx"
                && model.as_str() == "squeezenet"
        })
        .times(1)
        .returning(|_, _, _| Ok(squeezenet_outputs()));
    let resolver = ExclusionResolver::new(vec![Box::new(converter)]);

    let plan = resolver.resolve(model_dir.path(), &name).expect("resolves");
    assert_eq!(
        plan.temporary_files,
        vec![
            dir_path.join("squeezenet-symbol.json"),
            dir_path.join("squeezenet-0000.params"),
        ]
    );
    assert_eq!(
        plan.excluded_originals,
        BTreeSet::from(["squeezenet.onnx".to_owned()])
    );
}

#[rstest]
fn ambiguous_special_files_fail_without_converting(model_dir: TempDir, name: ModelName) {
    fs::write(model_dir.path().join("b.onnx"), b"graph").expect("write");
    fs::write(model_dir.path().join("a.onnx"), b"graph").expect("write");

    let mut converter = onnx_mock();
    converter.expect_convert().never();
    let resolver = ExclusionResolver::new(vec![Box::new(converter)]);

    let err = resolver
        .resolve(model_dir.path(), &name)
        .expect_err("ambiguous");
    match err {
        ArchiveError::MultipleCandidateFiles {
            suffix,
            count,
            files,
        } => {
            assert_eq!(suffix, ".onnx");
            assert_eq!(count, 2);
            assert_eq!(files, vec!["a.onnx".to_owned(), "b.onnx".to_owned()]);
        }
        other => panic!("expected MultipleCandidateFiles, got {other:?}"),
    }
}

#[rstest]
fn ambiguity_in_any_detector_prevents_all_conversions(model_dir: TempDir, name: ModelName) {
    fs::write(model_dir.path().join("model.onnx"), b"graph").expect("write");
    fs::write(model_dir.path().join("a.tflite"), b"x").expect("write");
    fs::write(model_dir.path().join("b.tflite"), b"x").expect("write");

    let mut onnx = onnx_mock();
    onnx.expect_convert().never();
    let mut tflite = MockModelConverter::new();
    tflite.expect_suffix().return_const(".tflite");
    tflite.expect_convert().never();
    let resolver = ExclusionResolver::new(vec![Box::new(onnx), Box::new(tflite)]);

    let result = resolver.resolve(model_dir.path(), &name);
    assert!(matches!(
        result,
        Err(ArchiveError::MultipleCandidateFiles { count: 2, .. })
    ));
}

#[rstest]
fn results_from_several_converters_accumulate(model_dir: TempDir, name: ModelName) {
    fs::write(model_dir.path().join("model.onnx"), b"graph").expect("write");
    fs::write(model_dir.path().join("model.tflite"), b"x").expect("write");

    let mut onnx = onnx_mock();
    onnx.expect_convert()
        .times(1)
        .returning(|_, _, _| Ok(squeezenet_outputs()));
    let mut tflite = MockModelConverter::new();
    tflite.expect_suffix().return_const(".tflite");
    tflite.expect_convert().times(1).returning(|_, _, _| {
        Ok(ConvertedFiles {
            symbol_file: "lite-symbol.json".to_owned(),
            params_file: "lite-0000.params".to_owned(),
        })
    });
    let resolver = ExclusionResolver::new(vec![Box::new(onnx), Box::new(tflite)]);

    let plan = resolver.resolve(model_dir.path(), &name).expect("resolves");
    assert_eq!(plan.temporary_files.len(), 4);
    assert_eq!(
        plan.excluded_originals,
        BTreeSet::from(["model.onnx".to_owned(), "model.tflite".to_owned()])
    );
}

#[rstest]
fn converter_failure_propagates(model_dir: TempDir, name: ModelName) {
    fs::write(model_dir.path().join("broken.onnx"), b"not a graph").expect("write");

    let mut converter = onnx_mock();
    converter.expect_convert().returning(|_, file, _| {
        Err(ArchiveError::ConversionFailed {
            file: file.to_owned(),
            reason: "malformed graph".to_owned(),
        })
    });
    let resolver = ExclusionResolver::new(vec![Box::new(converter)]);

    let result = resolver.resolve(model_dir.path(), &name);
    assert!(matches!(
        result,
        Err(ArchiveError::ConversionFailed { ref file, .. }) if file == "broken.onnx"
    ));
}

#[rstest]
fn later_failure_removes_earlier_conversion_outputs(model_dir: TempDir, name: ModelName) {
    fs::write(model_dir.path().join("model.onnx"), b"graph").expect("write");
    fs::write(model_dir.path().join("model.tflite"), b"x").expect("write");

    let mut onnx = onnx_mock();
    onnx.expect_convert().times(1).returning(|dir, _, _| {
        let outputs = squeezenet_outputs();
        fs::write(dir.join(&outputs.symbol_file), b"{}").expect("write symbol");
        fs::write(dir.join(&outputs.params_file), b"p").expect("write params");
        Ok(outputs)
    });
    let mut tflite = MockModelConverter::new();
    tflite.expect_suffix().return_const(".tflite");
    tflite.expect_convert().times(1).returning(|_, file, _| {
        Err(ArchiveError::ConversionFailed {
            file: file.to_owned(),
            reason: "unsupported operator".to_owned(),
        })
    });
    let resolver = ExclusionResolver::new(vec![Box::new(onnx), Box::new(tflite)]);

    let result = resolver.resolve(model_dir.path(), &name);
    assert!(matches!(
        result,
        Err(ArchiveError::ConversionFailed { ref file, .. }) if file == "model.tflite"
    ));
    assert!(!model_dir.path().join("squeezenet-symbol.json").exists());
    assert!(!model_dir.path().join("squeezenet-0000.params").exists());
    assert!(model_dir.path().join("model.onnx").exists());
}

#[rstest]
fn directories_with_special_suffix_are_ignored(model_dir: TempDir, name: ModelName) {
    fs::create_dir(model_dir.path().join("weights.onnx")).expect("mkdir");

    let mut converter = onnx_mock();
    converter.expect_convert().never();
    let resolver = ExclusionResolver::new(vec![Box::new(converter)]);

    let plan = resolver.resolve(model_dir.path(), &name).expect("resolves");
    assert!(plan.is_empty());
}

#[rstest]
fn nested_special_files_are_not_detected(model_dir: TempDir, name: ModelName) {
    let nested = model_dir.path().join("extra");
    fs::create_dir(&nested).expect("mkdir");
    fs::write(nested.join("model.onnx"), b"graph").expect("write");

    let mut converter = onnx_mock();
    converter.expect_convert().never();
    let resolver = ExclusionResolver::new(vec![Box::new(converter)]);

    assert!(
        resolver
            .resolve(model_dir.path(), &name)
            .expect("resolves")
            .is_empty()
    );
}

#[rstest]
#[case::none(&["a.py", "b.bin"], None)]
#[case::one(&["a.py", "m.onnx"], Some("m.onnx"))]
#[case::suffix_only_match(&["onnx", "m.onnx.bak"], None)]
fn find_unique_cases(#[case] names: &[&str], #[case] expected: Option<&str>) {
    let files: BTreeSet<String> = names.iter().map(|n| (*n).to_owned()).collect();
    assert_eq!(
        find_unique(&files, ".onnx").expect("not ambiguous"),
        expected.map(str::to_owned)
    );
}
