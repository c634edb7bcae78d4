#![warn(
    missing_docs, // Предупреждать, если публичные элементы не документированы.
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::unwrap_used, // Предупреждать об использовании .unwrap()
    clippy::expect_used  // Предупреждать об использовании .expect()
)]
#![deny(
    unsafe_code,        // Запретить использование unsafe блоков.
    unused_mut,         // Запретить неиспользуемые изменяемые переменные.
    unused_imports,     // Запретить неиспользуемые импорты.
    unused_attributes   // Запретить неиспользуемые атрибуты.
)]

//! `translator_utils` предоставляет общие структуры данных, обработку ошибок
//! и вспомогательные утилиты для рабочего пространства переводчика.
//!
//! # Основные модули:
//!
//! - [`error`]: Определяет общий тип ошибки `UtilsError`.
//! - [`config`]: Конфигурация запуска `RunConfig` (гиперпараметры, пути к весам,
//!   языки). Загрузка из TOML активируется фичей `config_toml`.
//! - [`path`]: Утилиты для работы с директориями и именами файлов весов.
//! - [`logger`]: (активируется фичей `logger_utils_feature`) Инициализация
//!   системы логирования на базе `tracing`.
//!
//! Фича `default` включает логирование и загрузку конфигурации из TOML.

// --- Модуль для общих ошибок ---
pub mod error;
pub use error::UtilsError;

// --- Конфигурация запуска ---
pub mod config;
pub use config::RunConfig;

// --- Пути к директориям и файлам весов ---
pub mod path;
pub use path::{ensure_dir_exists, epoch_tag, latest_epoch_tag, latest_weights_file, weights_file_path};

/// Модуль с утилитами для инициализации логирования.
///
/// Активируется фичей `logger_utils_feature`.
#[cfg(feature = "logger_utils_feature")]
pub mod logger;
#[cfg(feature = "logger_utils_feature")]
pub use logger::init_tracing_logger;
