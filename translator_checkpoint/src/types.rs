//! Метаданные чекпоинта.

use serde::{Deserialize, Serialize};
use translator_core::{ModelInfo, TransformerConfig};

/// Метаданные чекпоинта, хранящиеся в `<basename><epoch>.json` рядом с весами.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckpointMeta {
    /// Номер завершенной эпохи.
    pub epoch: usize,
    /// Счетчик шагов оптимизатора на момент сохранения.
    pub global_step: usize,
    /// Конфигурация модели, с которой сохранены веса.
    pub model_config: TransformerConfig,
    /// Сводка модели (для логов и ручного просмотра).
    pub model_info: ModelInfo,
    /// Сохранено ли состояние оптимизатора (`<basename><epoch>_optim.mpk`).
    #[serde(default)]
    pub has_optimizer: bool,
}

/// С какой эпохи и шага продолжать обучение.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResumePoint {
    /// Первая эпоха, которую нужно выполнить.
    pub initial_epoch: usize,
    /// Значение счетчика шагов.
    pub global_step: usize,
}

impl CheckpointMeta {
    /// Точка продолжения: эпоха, следующая за сохраненной, и тот же счетчик шагов.
    #[must_use]
    pub const fn resume_point(&self) -> ResumePoint {
        ResumePoint {
            initial_epoch: self.epoch + 1,
            global_step: self.global_step,
        }
    }
}
