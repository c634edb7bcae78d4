use std::io::Write;
use std::path::Path;
use tempfile::{tempdir, NamedTempFile};
use translator_utils::config::{RunConfig, PRELOAD_LATEST};
use translator_utils::error::UtilsError;

#[test]
fn test_run_config_default_values_ct() {
    let config = RunConfig::default();
    assert_eq!(config.batch_size, 8);
    assert_eq!(config.num_epochs, 20);
    assert!((config.lr - 1e-4).abs() < f64::EPSILON);
    assert_eq!(config.seq_len, 350);
    assert_eq!(config.d_model, 512);
    assert_eq!(config.lang_src, "en");
    assert_eq!(config.lang_tgt, "it");
    assert_eq!(config.model_folder, "weights");
    assert_eq!(config.model_basename, "tmodel_");
    assert_eq!(config.preload.as_deref(), Some(PRELOAD_LATEST));
}

#[test]
fn test_run_config_load_from_toml_exists_ct() {
    let mut temp_file = NamedTempFile::new().unwrap();
    let toml_content = r#"
        batch_size = 32
        num_epochs = 5
        lr = 0.001
        seq_len = 64
        d_model = 128
        lang_src = "en"
        lang_tgt = "fr"
        model_folder = "/tmp/weights"
        model_basename = "enfr_"
        preload = "03"
    "#;
    writeln!(temp_file, "{toml_content}").unwrap();

    let config = RunConfig::load_from_toml(temp_file.path()).unwrap();
    assert_eq!(config.batch_size, 32);
    assert_eq!(config.num_epochs, 5);
    assert_eq!(config.seq_len, 64);
    assert_eq!(config.lang_tgt, "fr");
    assert_eq!(config.preload.as_deref(), Some("03"));
    assert_eq!(
        config.weights_file_path("03"),
        Path::new("/tmp/weights").join("enfr_03")
    );
}

#[test]
fn test_run_config_partial_deserialization_ct() {
    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(temp_file, "seq_len = 99").unwrap();
    let config = RunConfig::load_from_toml(temp_file.path()).unwrap();

    assert_eq!(config.seq_len, 99);
    assert_eq!(config.batch_size, RunConfig::default().batch_size);
    assert_eq!(config.model_basename, RunConfig::default().model_basename);
}

#[test]
fn test_run_config_file_not_found_ct() {
    let non_existent_path = Path::new("/totally/non/existent/path/config.toml");
    let config = RunConfig::load_from_toml(non_existent_path).unwrap();
    assert_eq!(config, RunConfig::default());
}

#[test]
fn test_run_config_invalid_toml_ct() {
    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(temp_file, "seq_len = \"not_a_number\"").unwrap();

    let result = RunConfig::load_from_toml(temp_file.path());
    match result {
        Err(UtilsError::Config(msg)) => {
            assert!(msg.contains("Failed to parse RunConfig from TOML"));
        }
        other => panic!("Expected a Config error for invalid TOML, got {other:?}"),
    }
}

#[test]
fn test_tokenizer_path_substitutes_language_ct() {
    let config = RunConfig::default();
    assert_eq!(config.tokenizer_path("it"), Path::new("tokenizer_it.json"));
}

#[test]
fn test_preload_resolution_ct() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let mut config = RunConfig {
        model_folder: dir.path().to_string_lossy().into_owned(),
        ..RunConfig::default()
    };

    // "latest" без сохраненных весов: обучение с нуля.
    assert_eq!(config.preload_weights_file()?, None);

    std::fs::File::create(dir.path().join("tmodel_01.mpk"))?;
    std::fs::File::create(dir.path().join("tmodel_02.mpk"))?;
    assert_eq!(
        config.preload_weights_file()?,
        Some(dir.path().join("tmodel_02"))
    );

    config.preload = Some("01".to_string());
    assert_eq!(
        config.preload_weights_file()?,
        Some(dir.path().join("tmodel_01"))
    );

    config.preload = None;
    assert_eq!(config.preload_weights_file()?, None);
    Ok(())
}
