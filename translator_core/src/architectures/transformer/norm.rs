// translator_core/src/architectures/transformer/norm.rs

//! Нормализация слоя по последнему измерению.

use burn::{
    module::{Module, Param},
    tensor::{backend::Backend, Tensor},
};

/// `scale * (x - mean) / (std + eps) + bias`.
///
/// `std` несмещенное (делитель `n - 1`), `eps` фиксирован. `scale` и `bias`
/// обучаемые скаляры, инициализируются единицей и нулем.
#[derive(Module, Debug)]
pub struct LayerNormalization<B: Backend> {
    /// Множитель.
    pub scale: Param<Tensor<B, 1>>,
    /// Сдвиг.
    pub bias: Param<Tensor<B, 1>>,
    eps: f64,
}

impl<B: Backend> LayerNormalization<B> {
    /// Создает нормализацию с `scale = 1`, `bias = 0`.
    pub fn new(eps: f64, device: &B::Device) -> Self {
        Self {
            scale: Param::from_tensor(Tensor::ones([1], device)),
            bias: Param::from_tensor(Tensor::zeros([1], device)),
            eps,
        }
    }

    /// Нормализует `(batch, seq_len, d_model)` по `d_model`.
    pub fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 3> {
        let mean = x.clone().mean_dim(2);
        let std = x.clone().var(2).sqrt();
        let normalized = (x - mean).div(std.add_scalar(self.eps));
        normalized.mul(self.scale.val().unsqueeze::<3>()) + self.bias.val().unsqueeze::<3>()
    }
}
