use ecgnorm::{
    npy, DType, FailurePolicy, FileOutcome, Mode, NamedVariable, NormalizeError, Normalizer,
    NormalizerConfig, Samples,
};
use std::fs;
use std::path::{Path, PathBuf};

fn write_dat(path: &Path, count: usize) {
    let bytes: Vec<u8> = (0..count)
        .flat_map(|i| ((i % 3000) as i16 - 1500).to_ne_bytes())
        .collect();
    fs::write(path, bytes).unwrap();
}

fn write_json(path: &Path) {
    let rows: Vec<Vec<f64>> = (0..12)
        .map(|lead| (0..5000).map(|t| lead as f64 * 1e4 + t as f64).collect())
        .collect();
    fs::write(path, serde_json::to_vec(&rows).unwrap()).unwrap();
}

#[test]
fn test_dat_values_survive_to_npy() {
    let tmp = tempfile::tempdir().unwrap();
    let input = tmp.path().join("record.dat");
    let output = tmp.path().join("record.npy");
    write_dat(&input, 12000);

    let conversion = Normalizer::default().convert(&input, &output).unwrap();
    assert_eq!(conversion.output, output);
    assert_eq!(conversion.dtype, DType::Int16);
    assert_eq!(conversion.extension, ".dat");
    assert_eq!(conversion.variable, None);

    let Samples::Int16(array) = npy::read_npy(&output).unwrap() else {
        panic!("expected int16 samples");
    };
    assert_eq!(array.dim(), (1000, 12));
    // Row-major: the k-th stored value lands at (k / 12, k % 12).
    assert_eq!(array[[0, 0]], -1500);
    assert_eq!(array[[0, 11]], 11 - 1500);
    assert_eq!(array[[1, 0]], 12 - 1500);
    assert_eq!(array[[999, 11]], (11999 % 3000) as i16 - 1500);
}

#[test]
fn test_json_downsampled_and_transposed() {
    let tmp = tempfile::tempdir().unwrap();
    let input = tmp.path().join("record.json");
    write_json(&input);

    let normalized = Normalizer::default()
        .normalize_file(&input, Mode::Batch)
        .unwrap();
    assert_eq!(normalized.source_shape, (12, 5000));

    let Samples::Float64(array) = normalized.matrix.samples() else {
        panic!("expected float64 samples");
    };
    assert_eq!(array.dim(), (1000, 12));
    assert_eq!(array[[0, 0]], 0.0);
    assert_eq!(array[[1, 0]], 5.0);
    assert_eq!(array[[999, 3]], 3e4 + 4995.0);
}

#[test]
fn test_single_mode_rejects_text_before_reading() {
    let tmp = tempfile::tempdir().unwrap();
    let missing = tmp.path().join("never-created.txt");

    let err = Normalizer::default()
        .normalize_file(&missing, Mode::Single)
        .unwrap_err();
    assert!(err.is_input_error());
    assert!(matches!(err.root(), NormalizeError::UnsupportedFormat(ext) if ext == ".txt"));
}

#[test]
fn test_named_selector_on_non_mat_input_is_ignored() {
    let tmp = tempfile::tempdir().unwrap();
    let input = tmp.path().join("record.dat");
    write_dat(&input, 12000);

    let normalizer = Normalizer::new(NormalizerConfig {
        selector: Box::new(NamedVariable("ecg".to_string())),
        ..Default::default()
    });
    let normalized = normalizer.normalize_file(&input, Mode::Single).unwrap();
    assert_eq!(normalized.variable, None);
}

#[test]
fn test_batch_continue_keeps_order() {
    let tmp = tempfile::tempdir().unwrap();
    let good = tmp.path().join("good.dat");
    let short = tmp.path().join("short.dat");
    let text = tmp.path().join("text.json");
    write_dat(&good, 12000);
    write_dat(&short, 120);
    write_json(&text);
    let out_dir = tmp.path().join("out");

    let normalizer = Normalizer::new(NormalizerConfig {
        failure_policy: FailurePolicy::Continue,
        ..Default::default()
    });
    let inputs: Vec<PathBuf> = vec![good, short.clone(), text];
    let report = normalizer.convert_batch(&inputs, &out_dir).unwrap();

    assert_eq!(report.succeeded(), 2);
    assert_eq!(report.failed(), 1);
    assert_eq!(
        report.joined_outputs(),
        format!(
            "{},{}",
            out_dir.join("good.npy").display(),
            out_dir.join("text.npy").display()
        )
    );
    match &report.outcomes[1] {
        FileOutcome::Failed { input, error } => {
            assert_eq!(input, &short);
            assert!(error.contains("expected 12000, got 120"));
        }
        other => panic!("expected failure, got {:?}", other),
    }
    assert!(!out_dir.join("short.npy").exists());
}
