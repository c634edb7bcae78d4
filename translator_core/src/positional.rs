// translator_core/src/positional.rs

//! Синусоидальное позиционное кодирование.

use burn::{
    module::Module,
    tensor::{backend::Backend, Tensor, TensorData},
};

use crate::dropout::{Dropout, Mode};
use crate::TranslatorCoreError;

/// Строит таблицу `(seq_len, d_model)` в построчном порядке.
///
/// `(p, 2i) = sin(p * w_i)`, `(p, 2i + 1) = cos(p * w_i)`, где
/// `w_i = exp(-2i * ln(10000) / d_model)`. При нечетном `d_model` последний
/// столбец без пары содержит синус.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
pub fn sinusoidal_table(seq_len: usize, d_model: usize) -> Vec<f32> {
    let mut table = vec![0.0_f32; seq_len * d_model];
    let log_base = 10_000_f64.ln();
    for pos in 0..seq_len {
        let row = &mut table[pos * d_model..(pos + 1) * d_model];
        for even in (0..d_model).step_by(2) {
            let div_term = (-(even as f64) * log_base / d_model as f64).exp();
            let angle = pos as f64 * div_term;
            row[even] = angle.sin() as f32;
            if even + 1 < d_model {
                row[even + 1] = angle.cos() as f32;
            }
        }
    }
    table
}

/// Позиционное кодирование с фиксированной таблицей.
///
/// Таблица хранится как константный тензор: оптимизатор ее не видит и в
/// запись параметров она не попадает.
#[derive(Module, Debug)]
pub struct PositionalEncoding<B: Backend> {
    pe: Tensor<B, 2>,
    dropout: Dropout,
    max_len: usize,
}

impl<B: Backend> PositionalEncoding<B> {
    /// Предвычисляет таблицу для `max_len` позиций.
    pub fn new(d_model: usize, max_len: usize, dropout: f64, device: &B::Device) -> Self {
        let data = TensorData::new(sinusoidal_table(max_len, d_model), [max_len, d_model]);
        Self {
            pe: Tensor::from_data(data, device),
            dropout: Dropout::new(dropout),
            max_len,
        }
    }

    /// Копия позиционной таблицы `(max_len, d_model)`.
    pub fn table(&self) -> Tensor<B, 2> {
        self.pe.clone()
    }

    /// Максимальная поддерживаемая длина последовательности.
    pub const fn max_len(&self) -> usize {
        self.max_len
    }

    /// Прибавляет первые `seq_len` строк таблицы к `(batch, seq_len, d_model)`.
    ///
    /// # Errors
    /// `TranslatorCoreError::SequenceTooLong`, если `seq_len > max_len`.
    pub fn forward(&self, x: Tensor<B, 3>, mode: Mode) -> Result<Tensor<B, 3>, TranslatorCoreError> {
        let [_, seq_len, d_model] = x.dims();
        if seq_len > self.max_len {
            return Err(TranslatorCoreError::SequenceTooLong {
                len: seq_len,
                max_len: self.max_len,
            });
        }
        let positions = self.pe.clone().slice([0..seq_len, 0..d_model]).unsqueeze::<3>();
        Ok(self.dropout.forward(x + positions, mode))
    }
}
