//! Конфигурация запуска обучения.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::UtilsError;
use crate::path::{latest_weights_file, weights_file_path};
#[cfg(feature = "config_toml")]
use tracing::warn;

/// Значение `preload`, означающее «последний сохраненный чекпоинт».
pub const PRELOAD_LATEST: &str = "latest";

/// Конфигурация запуска обучения/валидации переводчика.
///
/// Все поля имеют значения по умолчанию, поэтому TOML-файл может содержать
/// только переопределяемые параметры.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Размер батча при обучении.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Количество эпох обучения.
    #[serde(default = "default_num_epochs")]
    pub num_epochs: usize,
    /// Скорость обучения оптимизатора.
    #[serde(default = "default_lr")]
    pub lr: f64,
    /// Фиксированная длина последовательностей (источник и цель).
    #[serde(default = "default_seq_len")]
    pub seq_len: usize,
    /// Размерность модели.
    #[serde(default = "default_d_model")]
    pub d_model: usize,
    /// Имя корпуса параллельных текстов.
    #[serde(default = "default_datasource")]
    pub datasource: String,
    /// Код исходного языка.
    #[serde(default = "default_lang_src")]
    pub lang_src: String,
    /// Код целевого языка.
    #[serde(default = "default_lang_tgt")]
    pub lang_tgt: String,
    /// Директория для файлов весов.
    #[serde(default = "default_model_folder")]
    pub model_folder: String,
    /// Префикс имен файлов весов.
    #[serde(default = "default_model_basename")]
    pub model_basename: String,
    /// Что загрузить перед стартом: `"latest"`, тег эпохи (`"07"`) или ничего.
    #[serde(default = "default_preload")]
    pub preload: Option<String>,
    /// Шаблон имени файла токенизатора, `{0}` заменяется кодом языка.
    #[serde(default = "default_tokenizer_file")]
    pub tokenizer_file: String,
    /// Имя эксперимента (директория для метрик).
    #[serde(default = "default_experiment_name")]
    pub experiment_name: String,
}

fn default_batch_size() -> usize {
    8
}
fn default_num_epochs() -> usize {
    20
}
fn default_lr() -> f64 {
    1e-4
}
fn default_seq_len() -> usize {
    350
}
fn default_d_model() -> usize {
    512
}
fn default_datasource() -> String {
    "opus_books".to_string()
}
fn default_lang_src() -> String {
    "en".to_string()
}
fn default_lang_tgt() -> String {
    "it".to_string()
}
fn default_model_folder() -> String {
    "weights".to_string()
}
fn default_model_basename() -> String {
    "tmodel_".to_string()
}
#[allow(clippy::unnecessary_wraps)]
fn default_preload() -> Option<String> {
    Some(PRELOAD_LATEST.to_string())
}
fn default_tokenizer_file() -> String {
    "tokenizer_{0}.json".to_string()
}
fn default_experiment_name() -> String {
    "runs/tmodel".to_string()
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            num_epochs: default_num_epochs(),
            lr: default_lr(),
            seq_len: default_seq_len(),
            d_model: default_d_model(),
            datasource: default_datasource(),
            lang_src: default_lang_src(),
            lang_tgt: default_lang_tgt(),
            model_folder: default_model_folder(),
            model_basename: default_model_basename(),
            preload: default_preload(),
            tokenizer_file: default_tokenizer_file(),
            experiment_name: default_experiment_name(),
        }
    }
}

impl RunConfig {
    /// Загружает конфигурацию из TOML файла.
    /// Если файл не найден, возвращается конфигурация по умолчанию.
    ///
    /// # Errors
    /// Возвращает `UtilsError::Io` при ошибках чтения файла или `UtilsError::Config`
    /// при ошибках парсинга TOML.
    #[cfg(feature = "config_toml")]
    pub fn load_from_toml(file_path: &Path) -> Result<Self, UtilsError> {
        if !file_path.exists() {
            warn!(
                "RunConfig file not found at {:?}, using default configuration.",
                file_path
            );
            return Ok(Self::default());
        }
        let config_str = std::fs::read_to_string(file_path)
            .map_err(|e| UtilsError::io_with_path(e, file_path.display().to_string()))?;
        toml::from_str(&config_str).map_err(|e| {
            UtilsError::Config(format!(
                "Failed to parse RunConfig from TOML at {file_path:?}: {e}"
            ))
        })
    }

    /// Путь к файлу токенизатора для языка `lang`.
    #[must_use]
    pub fn tokenizer_path(&self, lang: &str) -> PathBuf {
        PathBuf::from(self.tokenizer_file.replace("{0}", lang))
    }

    /// Путь к файлу весов для тега эпохи (например, `"07"`).
    #[must_use]
    pub fn weights_file_path(&self, epoch_tag: &str) -> PathBuf {
        weights_file_path(
            Path::new(&self.model_folder),
            &self.model_basename,
            epoch_tag,
        )
    }

    /// Путь к последнему сохраненному файлу весов, если такой есть.
    ///
    /// # Errors
    /// Возвращает `UtilsError`, если директорию весов не удалось прочитать.
    pub fn latest_weights_file_path(&self) -> Result<Option<PathBuf>, UtilsError> {
        latest_weights_file(Path::new(&self.model_folder), &self.model_basename)
    }

    /// Разрешает `preload` в конкретный файл весов.
    ///
    /// `None` означает обучение с нуля: либо `preload` не задан, либо задан
    /// `"latest"`, но сохраненных весов еще нет.
    ///
    /// # Errors
    /// Пробрасывает ошибки чтения директории весов.
    pub fn preload_weights_file(&self) -> Result<Option<PathBuf>, UtilsError> {
        match self.preload.as_deref() {
            None => Ok(None),
            Some(PRELOAD_LATEST) => self.latest_weights_file_path(),
            Some(tag) => Ok(Some(self.weights_file_path(tag))),
        }
    }
}
