// translator_core/src/loss.rs

//! Функция потерь для обучения переводчика.

use burn::tensor::{activation::log_softmax, backend::Backend, Int, Tensor};

/// Сглаживание меток по умолчанию.
pub const DEFAULT_LABEL_SMOOTHING: f32 = 0.1;

/// Кросс-энтропия со сглаживанием меток, игнорирующая позиции паддинга.
///
/// Потери усредняются только по позициям, где метка не равна `pad_id`,
/// поэтому значение не зависит от длины паддинга. Сглаженная цель:
/// `(1 - smoothing)` на истинном классе плюс `smoothing / vocab` на каждом.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Seq2SeqLoss {
    pad_id: i64,
    label_smoothing: f32,
}

impl Seq2SeqLoss {
    /// Потери со сглаживанием [`DEFAULT_LABEL_SMOOTHING`].
    #[must_use]
    pub const fn new(pad_id: i64) -> Self {
        Self::with_smoothing(pad_id, DEFAULT_LABEL_SMOOTHING)
    }

    /// Потери с заданным сглаживанием из `[0, 1]`.
    #[must_use]
    pub const fn with_smoothing(pad_id: i64, label_smoothing: f32) -> Self {
        Self {
            pad_id,
            label_smoothing,
        }
    }

    /// Идентификатор паддинга.
    #[must_use]
    pub const fn pad_id(&self) -> i64 {
        self.pad_id
    }

    /// Сглаживание меток.
    #[must_use]
    pub const fn label_smoothing(&self) -> f32 {
        self.label_smoothing
    }

    /// Скаляр потерь по логитам `(batch, seq_len, vocab)` и меткам `(batch, seq_len)`.
    ///
    /// Если все метки равны `pad_id`, результат равен нулю.
    pub fn forward<B: Backend>(&self, logits: Tensor<B, 3>, labels: Tensor<B, 2, Int>) -> Tensor<B, 1> {
        let [batch, seq_len, vocab] = logits.dims();
        let tokens = batch * seq_len;
        let log_probs = log_softmax(logits.reshape([tokens, vocab]), 1);
        let labels = labels.reshape([tokens]);

        let true_class = log_probs
            .clone()
            .gather(1, labels.clone().reshape([tokens, 1]))
            .reshape([tokens]);
        let uniform = log_probs.mean_dim(1).reshape([tokens]);
        let smoothing = f64::from(self.label_smoothing);
        let per_token = (true_class.mul_scalar(1.0 - smoothing) + uniform.mul_scalar(smoothing)).neg();

        let weights = labels.not_equal_elem(self.pad_id).float();
        let count = weights.clone().sum().clamp_min(1.0);
        (per_token * weights).sum().div(count)
    }
}
