// translator_core/src/architectures/transformer/projection.rs

//! Выходная проекция в логиты целевого словаря.

use burn::{
    module::Module,
    nn::{Initializer, Linear, LinearConfig},
    tensor::{backend::Backend, Tensor},
};

/// Проекция скрытого состояния в логиты словаря `(.., d_model) -> (.., vocab_size)`.
///
/// Возвращает сырые логиты; softmax применяется в функции потерь или при выборе токена.
#[derive(Module, Debug)]
pub struct ProjectionLayer<B: Backend> {
    proj: Linear<B>,
}

impl<B: Backend> ProjectionLayer<B> {
    /// Создает проекцию.
    pub fn new(d_model: usize, vocab_size: usize, device: &B::Device) -> Self {
        Self {
            proj: LinearConfig::new(d_model, vocab_size)
                .with_initializer(Initializer::XavierUniform { gain: 1.0 })
                .init(device),
        }
    }

    /// Прямой проход.
    pub fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 3> {
        self.proj.forward(x)
    }
}
