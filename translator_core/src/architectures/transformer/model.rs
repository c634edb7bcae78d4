// translator_core/src/architectures/transformer/model.rs

//! Полная модель: эмбеддинги, позиционное кодирование, кодировщик, декодер, проекция.

use burn::{
    module::{Ignored, Module},
    tensor::{backend::Backend, Bool, Int, Tensor},
};

use super::{decoder::Decoder, encoder::Encoder, projection::ProjectionLayer};
use crate::{
    architectures::ModelInfo, batch::Seq2SeqBatch, config::TransformerConfig, dropout::Mode,
    embedding::InputEmbedding, positional::PositionalEncoding, TranslatorCoreError,
};

/// Encoder-decoder трансформер.
///
/// Каждый метод является чистой функцией входов и параметров; состояние между
/// вызовами не сохраняется.
#[derive(Module, Debug)]
pub struct Transformer<B: Backend> {
    /// Эмбеддинги исходного языка.
    pub src_embed: InputEmbedding<B>,
    /// Эмбеддинги целевого языка.
    pub tgt_embed: InputEmbedding<B>,
    src_pos: PositionalEncoding<B>,
    tgt_pos: PositionalEncoding<B>,
    encoder: Encoder<B>,
    decoder: Decoder<B>,
    projection: ProjectionLayer<B>,
    config: Ignored<TransformerConfig>,
}

impl<B: Backend> Transformer<B> {
    /// Собирает модель. Конфигурация должна быть уже проверена, см. [`TransformerConfig::init`].
    pub(crate) fn new(config: &TransformerConfig, device: &B::Device) -> Self {
        Self {
            src_embed: InputEmbedding::new(config.src_vocab_size, config.d_model, device),
            tgt_embed: InputEmbedding::new(config.tgt_vocab_size, config.d_model, device),
            src_pos: PositionalEncoding::new(config.d_model, config.src_seq_len, config.dropout, device),
            tgt_pos: PositionalEncoding::new(config.d_model, config.tgt_seq_len, config.dropout, device),
            encoder: Encoder::new(config, device),
            decoder: Decoder::new(config, device),
            projection: ProjectionLayer::new(config.d_model, config.tgt_vocab_size, device),
            config: Ignored(config.clone()),
        }
    }

    /// Конфигурация, по которой построена модель.
    pub fn config(&self) -> &TransformerConfig {
        &self.config
    }

    /// Сводная информация о модели.
    pub fn info(&self) -> ModelInfo {
        ModelInfo::from_config(&self.config, self.num_params())
    }

    /// Кодирует `(batch, src_len)` идентификаторов в память `(batch, src_len, d_model)`.
    ///
    /// # Errors
    /// `TokenOutOfRange` или `SequenceTooLong` для недопустимого входа.
    pub fn encode(
        &self,
        src: Tensor<B, 2, Int>,
        src_mask: Option<Tensor<B, 4, Bool>>,
        mode: Mode,
    ) -> Result<Tensor<B, 3>, TranslatorCoreError> {
        let x = self.src_pos.forward(self.src_embed.forward(src)?, mode)?;
        Ok(self.encoder.forward(x, src_mask, mode))
    }

    /// Декодирует `(batch, tgt_len)` идентификаторов с учетом памяти кодировщика.
    ///
    /// Возвращает скрытые состояния `(batch, tgt_len, d_model)`.
    ///
    /// # Errors
    /// `TokenOutOfRange` или `SequenceTooLong` для недопустимого входа.
    pub fn decode(
        &self,
        memory: Tensor<B, 3>,
        src_mask: Option<Tensor<B, 4, Bool>>,
        tgt: Tensor<B, 2, Int>,
        tgt_mask: Option<Tensor<B, 4, Bool>>,
        mode: Mode,
    ) -> Result<Tensor<B, 3>, TranslatorCoreError> {
        let x = self.tgt_pos.forward(self.tgt_embed.forward(tgt)?, mode)?;
        Ok(self.decoder.forward(x, memory, src_mask, tgt_mask, mode))
    }

    /// Логиты словаря для скрытых состояний.
    pub fn project(&self, hidden: Tensor<B, 3>) -> Tensor<B, 3> {
        self.projection.forward(hidden)
    }

    /// Прямой проход по батчу с эталонным входом декодера: логиты `(batch, seq_len, tgt_vocab_size)`.
    ///
    /// # Errors
    /// Пробрасывает ошибки [`Transformer::encode`] и [`Transformer::decode`].
    pub fn forward(&self, batch: &Seq2SeqBatch<B>, mode: Mode) -> Result<Tensor<B, 3>, TranslatorCoreError> {
        let memory = self.encode(
            batch.encoder_input.clone(),
            Some(batch.encoder_mask.clone()),
            mode,
        )?;
        let hidden = self.decode(
            memory,
            Some(batch.encoder_mask.clone()),
            batch.decoder_input.clone(),
            Some(batch.decoder_mask.clone()),
            mode,
        )?;
        Ok(self.project(hidden))
    }
}
