// translator_core/src/architectures/transformer/decoder.rs

//! Блок декодера и стек декодера.

use burn::{
    module::Module,
    tensor::{backend::Backend, Bool, Tensor},
};

use super::{
    attention::MultiHeadAttention, ffn::FeedForwardBlock, norm::LayerNormalization,
    residual::ResidualConnection,
};
use crate::{config::TransformerConfig, dropout::Mode};

/// Маскированное self-attention, cross-attention к памяти кодировщика и feed-forward.
#[derive(Module, Debug)]
pub struct DecoderBlock<B: Backend> {
    self_attention: MultiHeadAttention<B>,
    cross_attention: MultiHeadAttention<B>,
    feed_forward: FeedForwardBlock<B>,
    self_attention_residual: ResidualConnection<B>,
    cross_attention_residual: ResidualConnection<B>,
    feed_forward_residual: ResidualConnection<B>,
}

impl<B: Backend> DecoderBlock<B> {
    /// Создает блок по конфигурации.
    pub fn new(config: &TransformerConfig, device: &B::Device) -> Self {
        let attention = || MultiHeadAttention::new(config.d_model, config.h, config.dropout, device);
        let residual = || ResidualConnection::new(config.dropout, config.eps, device);
        Self {
            self_attention: attention(),
            cross_attention: attention(),
            feed_forward: FeedForwardBlock::new(config.d_model, config.d_ff, config.dropout, device),
            self_attention_residual: residual(),
            cross_attention_residual: residual(),
            feed_forward_residual: residual(),
        }
    }

    /// Прямой проход блока.
    ///
    /// * `x` - `(batch, tgt_len, d_model)`.
    /// * `memory` - выход кодировщика `(batch, src_len, d_model)`.
    pub fn forward(
        &self,
        x: Tensor<B, 3>,
        memory: Tensor<B, 3>,
        src_mask: Option<Tensor<B, 4, Bool>>,
        tgt_mask: Option<Tensor<B, 4, Bool>>,
        mode: Mode,
    ) -> Tensor<B, 3> {
        let x = self.self_attention_residual.forward(x, mode, |normed| {
            self.self_attention
                .forward(normed.clone(), normed.clone(), normed, tgt_mask, mode)
                .output
        });
        let x = self.cross_attention_residual.forward(x, mode, |normed| {
            self.cross_attention
                .forward(normed, memory.clone(), memory, src_mask, mode)
                .output
        });
        self.feed_forward_residual
            .forward(x, mode, |normed| self.feed_forward.forward(normed, mode))
    }
}

/// Стек из `n` блоков, разделяющих память кодировщика, и финальная нормализация.
#[derive(Module, Debug)]
pub struct Decoder<B: Backend> {
    layers: Vec<DecoderBlock<B>>,
    norm: LayerNormalization<B>,
}

impl<B: Backend> Decoder<B> {
    /// Создает `config.n` блоков.
    pub fn new(config: &TransformerConfig, device: &B::Device) -> Self {
        Self {
            layers: (0..config.n).map(|_| DecoderBlock::new(config, device)).collect(),
            norm: LayerNormalization::new(config.eps, device),
        }
    }

    /// Количество блоков.
    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    /// Прогоняет цель через все блоки.
    pub fn forward(
        &self,
        x: Tensor<B, 3>,
        memory: Tensor<B, 3>,
        src_mask: Option<Tensor<B, 4, Bool>>,
        tgt_mask: Option<Tensor<B, 4, Bool>>,
        mode: Mode,
    ) -> Tensor<B, 3> {
        let x = self.layers.iter().fold(x, |x, layer| {
            layer.forward(x, memory.clone(), src_mask.clone(), tgt_mask.clone(), mode)
        });
        self.norm.forward(x)
    }
}
