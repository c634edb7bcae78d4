//! Ошибки сохранения и загрузки чекпоинтов.

use thiserror::Error;
use translator_core::TranslatorCoreError;
use translator_utils::UtilsError;

/// Ошибки крейта `translator_checkpoint`.
///
/// Покрывают файловый ввод-вывод, (де)сериализацию метаданных, сбои
/// рекордера Burn и несоответствие сохраненной конфигурации модели.
#[derive(Error, Debug)]
pub enum CheckpointError {
    /// Сбой файлового ввода-вывода.
    #[error("Ошибка ввода/вывода по пути '{path}': {source}")]
    Io {
        /// Путь к файлу.
        path: String,
        /// Исходная ошибка.
        #[source]
        source: std::io::Error,
    },

    /// Не удалось прочитать или записать метаданные чекпоинта.
    #[error("Ошибка метаданных '{path}': {source}")]
    Metadata {
        /// Путь к файлу метаданных.
        path: String,
        /// Исходная ошибка `serde_json`.
        #[source]
        source: serde_json::Error,
    },

    /// Рекордер Burn не смог сохранить или загрузить запись.
    #[error("Ошибка рекордера для '{path}': {message}")]
    Recorder {
        /// Путь к файлу записи (без расширения).
        path: String,
        /// Описание ошибки рекордера.
        message: String,
    },

    /// Чекпоинт с запрошенным тегом не найден.
    #[error("Чекпоинт не найден: {0}")]
    NotFound(String),

    /// Нет ни одного чекпоинта для продолжения обучения.
    #[error("В директории '{0}' нет чекпоинтов для продолжения обучения")]
    NothingToResume(String),

    /// Сохраненная конфигурация модели не совпадает с ожидаемой.
    #[error("Конфигурация чекпоинта не совпадает с ожидаемой: {message}")]
    ConfigMismatch {
        /// Перечень расхождений.
        message: String,
    },

    /// Параметры запуска не позволяют начать обучение.
    #[error("Некорректная конфигурация запуска: {0}")]
    InvalidRunConfig(String),

    /// Ошибка ядра модели (например, невалидная конфигурация).
    #[error("Ошибка модели: {0}")]
    Core(#[from] TranslatorCoreError),

    /// Ошибка утилит (пути, директории).
    #[error("Ошибка утилит: {0}")]
    Utils(#[from] UtilsError),
}

impl CheckpointError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }

    pub(crate) fn recorder(path: &std::path::Path, err: &burn::record::RecorderError) -> Self {
        Self::Recorder {
            path: path.display().to_string(),
            message: format!("{err:?}"),
        }
    }
}
