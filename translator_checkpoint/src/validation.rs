//! Сверка конфигурации модели из чекпоинта.

use tracing::{debug, warn};
use translator_core::TransformerConfig;

use crate::error::CheckpointError;

/// Проверяет, что веса чекпоинта совместимы с ожидаемой конфигурацией модели.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Сравнивает сохраненную конфигурацию с ожидаемой.
    ///
    /// Любое расхождение в размерах (формы весов, длины позиционных таблиц)
    /// является ошибкой. Различие в `dropout` или `eps` на веса не влияет и
    /// только логируется.
    ///
    /// # Errors
    /// `CheckpointError::ConfigMismatch` со списком всех расхождений.
    pub fn check_matches(
        stored: &TransformerConfig,
        expected: &TransformerConfig,
    ) -> Result<(), CheckpointError> {
        debug!("Сверка конфигурации чекпоинта с ожидаемой.");
        let mut errors: Vec<String> = Vec::new();

        macro_rules! check_field {
            ($field:ident) => {
                if stored.$field != expected.$field {
                    errors.push(format!(
                        "{}: в чекпоинте {}, ожидалось {}",
                        stringify!($field),
                        stored.$field,
                        expected.$field
                    ));
                }
            };
        }

        check_field!(d_model);
        check_field!(h);
        check_field!(n);
        check_field!(d_ff);
        check_field!(src_seq_len);
        check_field!(tgt_seq_len);
        check_field!(src_vocab_size);
        check_field!(tgt_vocab_size);

        if (stored.dropout - expected.dropout).abs() > f64::EPSILON {
            warn!(
                "dropout в чекпоинте {} отличается от ожидаемого {}; используется ожидаемый.",
                stored.dropout, expected.dropout
            );
        }
        if (stored.eps - expected.eps).abs() > f64::EPSILON {
            warn!(
                "eps в чекпоинте {} отличается от ожидаемого {}; используется ожидаемый.",
                stored.eps, expected.eps
            );
        }

        if !errors.is_empty() {
            let message = errors.join("; ");
            warn!("Конфигурация чекпоинта не прошла сверку: {}", message);
            return Err(CheckpointError::ConfigMismatch { message });
        }
        Ok(())
    }
}
