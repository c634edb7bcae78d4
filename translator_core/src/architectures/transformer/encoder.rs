// translator_core/src/architectures/transformer/encoder.rs

//! Блок кодировщика и стек кодировщика.

use burn::{
    module::Module,
    tensor::{backend::Backend, Bool, Tensor},
};

use super::{
    attention::MultiHeadAttention, ffn::FeedForwardBlock, norm::LayerNormalization,
    residual::ResidualConnection,
};
use crate::{config::TransformerConfig, dropout::Mode};

/// Self-attention и feed-forward, каждый в своем остаточном соединении.
#[derive(Module, Debug)]
pub struct EncoderBlock<B: Backend> {
    self_attention: MultiHeadAttention<B>,
    feed_forward: FeedForwardBlock<B>,
    attention_residual: ResidualConnection<B>,
    feed_forward_residual: ResidualConnection<B>,
}

impl<B: Backend> EncoderBlock<B> {
    /// Создает блок по конфигурации.
    pub fn new(config: &TransformerConfig, device: &B::Device) -> Self {
        Self {
            self_attention: MultiHeadAttention::new(config.d_model, config.h, config.dropout, device),
            feed_forward: FeedForwardBlock::new(config.d_model, config.d_ff, config.dropout, device),
            attention_residual: ResidualConnection::new(config.dropout, config.eps, device),
            feed_forward_residual: ResidualConnection::new(config.dropout, config.eps, device),
        }
    }

    /// `(batch, seq_len, d_model)` -> та же форма.
    pub fn forward(&self, x: Tensor<B, 3>, src_mask: Option<Tensor<B, 4, Bool>>, mode: Mode) -> Tensor<B, 3> {
        let x = self.attention_residual.forward(x, mode, |normed| {
            self.self_attention
                .forward(normed.clone(), normed.clone(), normed, src_mask, mode)
                .output
        });
        self.feed_forward_residual
            .forward(x, mode, |normed| self.feed_forward.forward(normed, mode))
    }
}

/// Стек из `n` блоков и финальная нормализация.
#[derive(Module, Debug)]
pub struct Encoder<B: Backend> {
    layers: Vec<EncoderBlock<B>>,
    norm: LayerNormalization<B>,
}

impl<B: Backend> Encoder<B> {
    /// Создает `config.n` блоков; количество блоков после создания не меняется.
    pub fn new(config: &TransformerConfig, device: &B::Device) -> Self {
        Self {
            layers: (0..config.n).map(|_| EncoderBlock::new(config, device)).collect(),
            norm: LayerNormalization::new(config.eps, device),
        }
    }

    /// Количество блоков.
    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    /// Прогоняет вход через все блоки. При `n = 0` остается только нормализация.
    pub fn forward(&self, x: Tensor<B, 3>, src_mask: Option<Tensor<B, 4, Bool>>, mode: Mode) -> Tensor<B, 3> {
        let x = self
            .layers
            .iter()
            .fold(x, |x, layer| layer.forward(x, src_mask.clone(), mode));
        self.norm.forward(x)
    }
}
