// translator_core/src/config.rs

//! Конфигурация модели `Transformer`.

use std::path::Path;

use burn::tensor::backend::Backend;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::architectures::transformer::Transformer;
use crate::TranslatorCoreError;

/// Гиперпараметры encoder-decoder трансформера.
///
/// Значения по умолчанию: `n = 6`, `h = 8`, `d_model = 512`, `d_ff = 2048`,
/// `dropout = 0.1`, `eps = 1e-6`. Размеры словарей и длины последовательностей
/// задаются явно через [`TransformerConfig::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformerConfig {
    /// Размерность модели.
    #[serde(default = "default_d_model")]
    pub d_model: usize,
    /// Количество голов внимания.
    #[serde(default = "default_h")]
    pub h: usize,
    /// Количество блоков в кодировщике и декодере (может быть 0).
    #[serde(default = "default_n")]
    pub n: usize,
    /// Размерность скрытого слоя feed-forward.
    #[serde(default = "default_d_ff")]
    pub d_ff: usize,
    /// Длина позиционной таблицы кодировщика.
    pub src_seq_len: usize,
    /// Длина позиционной таблицы декодера.
    pub tgt_seq_len: usize,
    /// Размер исходного словаря.
    pub src_vocab_size: usize,
    /// Размер целевого словаря.
    pub tgt_vocab_size: usize,
    /// Вероятность дропаута.
    #[serde(default = "default_dropout")]
    pub dropout: f64,
    /// Эпсилон нормализации слоя (не обучается).
    #[serde(default = "default_eps")]
    pub eps: f64,
}

const fn default_d_model() -> usize {
    512
}
const fn default_h() -> usize {
    8
}
const fn default_n() -> usize {
    6
}
const fn default_d_ff() -> usize {
    2048
}
const fn default_dropout() -> f64 {
    0.1
}
const fn default_eps() -> f64 {
    1e-6
}

impl TransformerConfig {
    /// Конфигурация со стандартной архитектурой для заданных словарей и длин.
    #[must_use]
    pub const fn new(
        src_vocab_size: usize,
        tgt_vocab_size: usize,
        src_seq_len: usize,
        tgt_seq_len: usize,
    ) -> Self {
        Self {
            d_model: default_d_model(),
            h: default_h(),
            n: default_n(),
            d_ff: default_d_ff(),
            src_seq_len,
            tgt_seq_len,
            src_vocab_size,
            tgt_vocab_size,
            dropout: default_dropout(),
            eps: default_eps(),
        }
    }

    /// Устанавливает `d_model`.
    #[must_use]
    pub const fn with_d_model(mut self, d_model: usize) -> Self {
        self.d_model = d_model;
        self
    }

    /// Устанавливает количество голов.
    #[must_use]
    pub const fn with_h(mut self, h: usize) -> Self {
        self.h = h;
        self
    }

    /// Устанавливает количество блоков.
    #[must_use]
    pub const fn with_n(mut self, n: usize) -> Self {
        self.n = n;
        self
    }

    /// Устанавливает `d_ff`.
    #[must_use]
    pub const fn with_d_ff(mut self, d_ff: usize) -> Self {
        self.d_ff = d_ff;
        self
    }

    /// Устанавливает вероятность дропаута.
    #[must_use]
    pub const fn with_dropout(mut self, dropout: f64) -> Self {
        self.dropout = dropout;
        self
    }

    /// Размерность одной головы внимания, `d_model / h`.
    #[must_use]
    pub const fn d_k(&self) -> usize {
        self.d_model / self.h
    }

    /// Проверяет инварианты конфигурации.
    ///
    /// # Errors
    /// `TranslatorCoreError::InvalidConfig`, если `d_model % h != 0`, какой-либо
    /// размер (кроме `n`) равен нулю или `dropout` вне `[0, 1)`.
    pub fn validate(&self) -> Result<(), TranslatorCoreError> {
        let sizes = [
            ("d_model", self.d_model),
            ("h", self.h),
            ("d_ff", self.d_ff),
            ("src_seq_len", self.src_seq_len),
            ("tgt_seq_len", self.tgt_seq_len),
            ("src_vocab_size", self.src_vocab_size),
            ("tgt_vocab_size", self.tgt_vocab_size),
        ];
        if let Some((name, _)) = sizes.iter().find(|(_, value)| *value == 0) {
            return Err(TranslatorCoreError::InvalidConfig(format!(
                "{name} должно быть больше нуля"
            )));
        }
        // Несмещенное std в нормализации определено только при d_model >= 2.
        if self.d_model < 2 {
            return Err(TranslatorCoreError::InvalidConfig(format!(
                "d_model ({}) должно быть не меньше 2",
                self.d_model
            )));
        }
        if self.d_model % self.h != 0 {
            return Err(TranslatorCoreError::InvalidConfig(format!(
                "d_model ({}) должно делиться на h ({})",
                self.d_model, self.h
            )));
        }
        if !(0.0..1.0).contains(&self.dropout) {
            return Err(TranslatorCoreError::InvalidConfig(format!(
                "dropout ({}) должен быть в диапазоне [0, 1)",
                self.dropout
            )));
        }
        if self.eps <= 0.0 {
            return Err(TranslatorCoreError::InvalidConfig(format!(
                "eps ({}) должен быть положительным",
                self.eps
            )));
        }
        Ok(())
    }

    /// Строит модель с Xavier-инициализацией весов.
    ///
    /// # Errors
    /// Пробрасывает ошибки [`TransformerConfig::validate`].
    pub fn init<B: Backend>(&self, device: &B::Device) -> Result<Transformer<B>, TranslatorCoreError> {
        self.validate()?;
        let model = Transformer::new(self, device);
        info!(
            "Transformer инициализирован: d_model={}, h={}, n={}, d_ff={}, параметров {}.",
            self.d_model,
            self.h,
            self.n,
            self.d_ff,
            model.info().num_params
        );
        Ok(model)
    }

    /// Загружает конфигурацию из JSON файла.
    ///
    /// # Errors
    /// Ошибки чтения файла, разбора JSON или валидации.
    pub fn load_json(path: &Path) -> Result<Self, TranslatorCoreError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| TranslatorCoreError::io_with_path(e, path.display().to_string()))?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Сохраняет конфигурацию в JSON файл.
    ///
    /// # Errors
    /// Ошибки сериализации или записи файла.
    pub fn save_json(&self, path: &Path) -> Result<(), TranslatorCoreError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .map_err(|e| TranslatorCoreError::io_with_path(e, path.display().to_string()))
    }
}
