// translator_core/src/architectures/transformer/ffn.rs

//! Позиционная полносвязная сеть: `Linear -> ReLU -> Dropout -> Linear`.

use burn::{
    module::Module,
    nn::{Initializer, Linear, LinearConfig},
    tensor::{activation::relu, backend::Backend, Tensor},
};

use crate::dropout::{Dropout, Mode};

/// Блок feed-forward `d_model -> d_ff -> d_model`.
#[derive(Module, Debug)]
pub struct FeedForwardBlock<B: Backend> {
    linear_1: Linear<B>,
    linear_2: Linear<B>,
    dropout: Dropout,
}

impl<B: Backend> FeedForwardBlock<B> {
    /// Создает блок с Xavier-инициализацией обоих слоев.
    pub fn new(d_model: usize, d_ff: usize, dropout: f64, device: &B::Device) -> Self {
        let linear = |d_input, d_output| {
            LinearConfig::new(d_input, d_output)
                .with_initializer(Initializer::XavierUniform { gain: 1.0 })
                .init(device)
        };
        Self {
            linear_1: linear(d_model, d_ff),
            linear_2: linear(d_ff, d_model),
            dropout: Dropout::new(dropout),
        }
    }

    /// `(batch, seq_len, d_model)` -> `(batch, seq_len, d_model)`.
    pub fn forward(&self, x: Tensor<B, 3>, mode: Mode) -> Tensor<B, 3> {
        let hidden = relu(self.linear_1.forward(x));
        self.linear_2.forward(self.dropout.forward(hidden, mode))
    }
}
