// translator_core/src/batch.rs

//! Подготовка пар предложений для модели: кадрирование служебными токенами,
//! паддинг до фиксированной длины и сборка батча с масками.

use burn::tensor::{backend::Backend, Bool, Int, Tensor, TensorData};
use tracing::debug;

use crate::mask::{decoder_mask, padding_mask};
use crate::tokenizer::{SpecialTokens, Tokenizer};
use crate::TranslatorCoreError;

/// Одна пара предложений, закодированная и дополненная до `seq_len`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seq2SeqItem {
    /// `[SOS] src [EOS] [PAD]*`.
    pub encoder_input: Vec<i64>,
    /// `[SOS] tgt [PAD]*`.
    pub decoder_input: Vec<i64>,
    /// `tgt [EOS] [PAD]*`.
    pub label: Vec<i64>,
    /// Паддинг исходного словаря.
    pub src_pad_id: i64,
    /// Паддинг целевого словаря.
    pub tgt_pad_id: i64,
    /// Исходный текст.
    pub src_text: String,
    /// Целевой текст.
    pub tgt_text: String,
}

fn padded(mut ids: Vec<i64>, seq_len: usize, pad_id: i64) -> Vec<i64> {
    ids.resize(seq_len, pad_id);
    ids
}

impl Seq2SeqItem {
    /// Кодирует пару и дополняет ее до `seq_len`.
    ///
    /// Служебные токены кодировщика берутся из исходного токенизатора,
    /// декодера и меток из целевого.
    ///
    /// # Errors
    /// * `MissingSpecialToken`, если в словаре нет служебного токена.
    /// * `SentenceTooLong`, если `len(src) + 2 > seq_len` или `len(tgt) + 1 > seq_len`.
    pub fn from_pair<S, T>(
        src_text: &str,
        tgt_text: &str,
        tokenizer_src: &S,
        tokenizer_tgt: &T,
        seq_len: usize,
    ) -> Result<Self, TranslatorCoreError>
    where
        S: Tokenizer + ?Sized,
        T: Tokenizer + ?Sized,
    {
        let src_special = SpecialTokens::resolve(tokenizer_src)?;
        let tgt_special = SpecialTokens::resolve(tokenizer_tgt)?;
        let src_tokens = tokenizer_src.encode(src_text);
        let tgt_tokens = tokenizer_tgt.encode(tgt_text);

        for framed_len in [src_tokens.len() + 2, tgt_tokens.len() + 1] {
            if framed_len > seq_len {
                return Err(TranslatorCoreError::SentenceTooLong {
                    len: framed_len,
                    seq_len,
                });
            }
        }

        let mut encoder_input = Vec::with_capacity(seq_len);
        encoder_input.push(src_special.sos);
        encoder_input.extend_from_slice(&src_tokens);
        encoder_input.push(src_special.eos);

        let mut decoder_input = Vec::with_capacity(seq_len);
        decoder_input.push(tgt_special.sos);
        decoder_input.extend_from_slice(&tgt_tokens);

        let mut label = tgt_tokens;
        label.push(tgt_special.eos);

        Ok(Self {
            encoder_input: padded(encoder_input, seq_len, src_special.pad),
            decoder_input: padded(decoder_input, seq_len, tgt_special.pad),
            label: padded(label, seq_len, tgt_special.pad),
            src_pad_id: src_special.pad,
            tgt_pad_id: tgt_special.pad,
            src_text: src_text.to_string(),
            tgt_text: tgt_text.to_string(),
        })
    }

    /// Фиксированная длина последовательностей элемента.
    #[must_use]
    pub fn seq_len(&self) -> usize {
        self.encoder_input.len()
    }
}

/// Батч тензоров для одного шага обучения или валидации.
#[derive(Debug, Clone)]
pub struct Seq2SeqBatch<B: Backend> {
    /// `(batch, seq_len)`.
    pub encoder_input: Tensor<B, 2, Int>,
    /// `(batch, seq_len)`.
    pub decoder_input: Tensor<B, 2, Int>,
    /// `(batch, 1, 1, seq_len)`.
    pub encoder_mask: Tensor<B, 4, Bool>,
    /// `(batch, 1, seq_len, seq_len)`.
    pub decoder_mask: Tensor<B, 4, Bool>,
    /// `(batch, seq_len)`.
    pub label: Tensor<B, 2, Int>,
    /// Исходные тексты.
    pub src_text: Vec<String>,
    /// Целевые тексты.
    pub tgt_text: Vec<String>,
}

impl<B: Backend> Seq2SeqBatch<B> {
    /// Складывает элементы в батч и строит маски.
    ///
    /// # Errors
    /// `IncompatibleShape` для пустого списка или элементов разной длины.
    pub fn from_items(items: &[Seq2SeqItem], device: &B::Device) -> Result<Self, TranslatorCoreError> {
        let first = items.first().ok_or_else(|| {
            TranslatorCoreError::IncompatibleShape("батч не может быть пустым".to_string())
        })?;
        let seq_len = first.seq_len();
        if let Some(bad) = items.iter().find(|item| {
            item.seq_len() != seq_len
                || item.decoder_input.len() != seq_len
                || item.label.len() != seq_len
        }) {
            return Err(TranslatorCoreError::IncompatibleShape(format!(
                "ожидалась длина {seq_len}, элемент {:?} имеет другую",
                bad.src_text
            )));
        }

        let stack = |values: Vec<i64>| {
            Tensor::<B, 2, Int>::from_data(TensorData::new(values, [items.len(), seq_len]), device)
        };
        let encoder_input = stack(items.iter().flat_map(|item| item.encoder_input.iter().copied()).collect());
        let decoder_input = stack(items.iter().flat_map(|item| item.decoder_input.iter().copied()).collect());
        let label = stack(items.iter().flat_map(|item| item.label.iter().copied()).collect());

        debug!("Собран батч: {} элементов, seq_len {}.", items.len(), seq_len);
        Ok(Self {
            encoder_mask: padding_mask(encoder_input.clone(), first.src_pad_id),
            decoder_mask: decoder_mask(decoder_input.clone(), first.tgt_pad_id),
            encoder_input,
            decoder_input,
            label,
            src_text: items.iter().map(|item| item.src_text.clone()).collect(),
            tgt_text: items.iter().map(|item| item.tgt_text.clone()).collect(),
        })
    }

    /// Размер батча.
    pub fn batch_size(&self) -> usize {
        self.encoder_input.dims()[0]
    }
}
