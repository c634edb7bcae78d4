// translator_core/src/architectures/transformer/residual.rs

//! Остаточное соединение с pre-norm.

use burn::{
    module::Module,
    tensor::{backend::Backend, Tensor},
};

use super::norm::LayerNormalization;
use crate::dropout::{Dropout, Mode};

/// Pre-norm остаточное соединение: `x + dropout(sublayer(norm(x)))`.
#[derive(Module, Debug)]
pub struct ResidualConnection<B: Backend> {
    norm: LayerNormalization<B>,
    dropout: Dropout,
}

impl<B: Backend> ResidualConnection<B> {
    /// Создает соединение со своей нормализацией.
    pub fn new(dropout: f64, eps: f64, device: &B::Device) -> Self {
        Self {
            norm: LayerNormalization::new(eps, device),
            dropout: Dropout::new(dropout),
        }
    }

    /// Применяет `sublayer` к нормализованному входу и прибавляет результат к `x`.
    ///
    /// Выход `sublayer` должен иметь ту же форму, что и его вход.
    pub fn forward<F>(&self, x: Tensor<B, 3>, mode: Mode, sublayer: F) -> Tensor<B, 3>
    where
        F: FnOnce(Tensor<B, 3>) -> Tensor<B, 3>,
    {
        let out = sublayer(self.norm.forward(x.clone()));
        x + self.dropout.forward(out, mode)
    }
}
