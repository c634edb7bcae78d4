// translator_core/src/embedding.rs

//! Входное представление токенов: таблица эмбеддингов, масштабированная на `sqrt(d_model)`.

use burn::{
    module::{Module, Param},
    tensor::{backend::Backend, module::embedding, Distribution, ElementConversion, Int, Tensor},
};

use crate::TranslatorCoreError;

/// Граница равномерного распределения Xavier для матрицы `fan_in x fan_out`.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn xavier_uniform_bound(fan_in: usize, fan_out: usize) -> f64 {
    (6.0 / (fan_in + fan_out) as f64).sqrt()
}

/// Таблица эмбеддингов `vocab_size x d_model`.
#[derive(Module, Debug)]
pub struct InputEmbedding<B: Backend> {
    /// Обучаемая таблица.
    pub weight: Param<Tensor<B, 2>>,
    /// Размерность модели.
    d_model: usize,
    /// Размер словаря.
    vocab_size: usize,
}

impl<B: Backend> InputEmbedding<B> {
    /// Создает таблицу с Xavier-uniform инициализацией.
    pub fn new(vocab_size: usize, d_model: usize, device: &B::Device) -> Self {
        let bound = xavier_uniform_bound(vocab_size, d_model);
        let weight = Tensor::random(
            [vocab_size, d_model],
            Distribution::Uniform(-bound, bound),
            device,
        );
        Self {
            weight: Param::from_tensor(weight),
            d_model,
            vocab_size,
        }
    }

    /// Размер словаря.
    pub const fn vocab_size(&self) -> usize {
        self.vocab_size
    }

    /// `(batch, seq_len)` идентификаторов -> `(batch, seq_len, d_model)`.
    ///
    /// # Errors
    /// `TranslatorCoreError::TokenOutOfRange`, если какой-либо идентификатор вне `[0, vocab_size)`.
    #[allow(clippy::cast_precision_loss)]
    pub fn forward(&self, ids: Tensor<B, 2, Int>) -> Result<Tensor<B, 3>, TranslatorCoreError> {
        self.check_range(&ids)?;
        let scale = (self.d_model as f64).sqrt();
        Ok(embedding(self.weight.val(), ids).mul_scalar(scale))
    }

    fn check_range(&self, ids: &Tensor<B, 2, Int>) -> Result<(), TranslatorCoreError> {
        if ids.shape().num_elements() == 0 {
            return Ok(());
        }
        let min = ids.clone().min().into_scalar().elem::<i64>();
        if min < 0 {
            return Err(TranslatorCoreError::TokenOutOfRange {
                id: min,
                vocab_size: self.vocab_size,
            });
        }
        let max = ids.clone().max().into_scalar().elem::<i64>();
        if usize::try_from(max).map_or(true, |max| max >= self.vocab_size) {
            return Err(TranslatorCoreError::TokenOutOfRange {
                id: max,
                vocab_size: self.vocab_size,
            });
        }
        Ok(())
    }
}
