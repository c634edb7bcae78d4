// translator_core/src/architectures/mod.rs

//! Архитектуры моделей и общая мета-информация о них.

pub mod transformer;

use serde::{Deserialize, Serialize};

use crate::config::TransformerConfig;

/// Общая мета-информация о построенной модели.
///
/// Используется для логирования и в метаданных чекпоинтов.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Название архитектуры.
    pub architecture: String,
    /// Размерность модели.
    pub d_model: usize,
    /// Количество голов внимания.
    pub num_heads: usize,
    /// Количество блоков в каждом стеке.
    pub num_layers: usize,
    /// Размер исходного словаря.
    pub src_vocab_size: usize,
    /// Размер целевого словаря.
    pub tgt_vocab_size: usize,
    /// Общее число обучаемых скаляров.
    pub num_params: usize,
}

impl ModelInfo {
    /// Собирает информацию из конфигурации и числа параметров.
    #[must_use]
    pub fn from_config(config: &TransformerConfig, num_params: usize) -> Self {
        Self {
            architecture: "encoder-decoder-transformer".to_string(),
            d_model: config.d_model,
            num_heads: config.h,
            num_layers: config.n,
            src_vocab_size: config.src_vocab_size,
            tgt_vocab_size: config.tgt_vocab_size,
            num_params,
        }
    }
}
