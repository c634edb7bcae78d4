#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![deny(unsafe_code, clippy::unwrap_used, clippy::expect_used)]

//! # `translator_checkpoint`
//!
//! Обучение переводчика по эпохам и его чекпоинты: веса модели, состояние
//! оптимизатора, номер эпохи и счетчик шагов. Чекпоинты адресуются тегом
//! эпохи (`"07"`), поддерживается поиск последнего полного.
//!
//! - [`trainer`]: `Trainer`, цикл обучения с Adam, валидацией и сохранением.
//! - [`loader`]: `CheckpointStore`, запись и чтение через рекордеры Burn.
//! - [`types`]: метаданные чекпоинта и точка продолжения обучения.
//! - [`validation`]: сверка сохраненной конфигурации модели с ожидаемой.
//! - [`error`]: тип ошибки крейта.

pub mod error;
pub mod loader;
pub mod trainer;
pub mod types;
pub mod validation;

pub use error::CheckpointError;
pub use loader::{CheckpointRecorder, CheckpointStore};
pub use trainer::{model_config, EpochReport, Trainer, TrainingReport};
pub use types::{CheckpointMeta, ResumePoint};
pub use validation::ConfigValidator;
