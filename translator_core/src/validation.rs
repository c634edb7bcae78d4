// translator_core/src/validation.rs

//! Валидационный прогон: жадное декодирование нескольких примеров и их логирование.

use burn::tensor::backend::Backend;
use tracing::info;

use crate::architectures::transformer::Transformer;
use crate::batch::{Seq2SeqBatch, Seq2SeqItem};
use crate::greedy::GreedyDecoder;
use crate::tokenizer::{SpecialTokens, Tokenizer};
use crate::TranslatorCoreError;

/// Один переведенный пример.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationSample {
    /// Исходный текст.
    pub source: String,
    /// Эталонный перевод.
    pub target: String,
    /// Перевод модели.
    pub predicted: String,
    /// Идентификаторы, выданные декодером (начинаются с `[SOS]`).
    pub predicted_ids: Vec<i64>,
}

/// Переводит первые `num_examples` элементов и пишет `SOURCE`/`TARGET`/`PREDICTED` в лог.
///
/// # Errors
/// Ошибки построения батча, декодера или прямого прохода модели.
pub fn run_validation<B, T>(
    model: &Transformer<B>,
    items: &[Seq2SeqItem],
    tokenizer_tgt: &T,
    max_len: usize,
    num_examples: usize,
    device: &B::Device,
) -> Result<Vec<ValidationSample>, TranslatorCoreError>
where
    B: Backend,
    T: Tokenizer + ?Sized,
{
    let special = SpecialTokens::resolve(tokenizer_tgt)?;
    let decoder = GreedyDecoder::new(model, special.sos, special.eos, max_len)?;

    let mut samples = Vec::with_capacity(num_examples.min(items.len()));
    for item in items.iter().take(num_examples) {
        let batch = Seq2SeqBatch::<B>::from_items(std::slice::from_ref(item), device)?;
        let predicted_ids = decoder.decode(batch.encoder_input, Some(batch.encoder_mask))?;
        let predicted = tokenizer_tgt.decode(&predicted_ids);

        info!("{:-<80}", "");
        info!("{:>12}{}", "SOURCE: ", item.src_text);
        info!("{:>12}{}", "TARGET: ", item.tgt_text);
        info!("{:>12}{}", "PREDICTED: ", predicted);

        samples.push(ValidationSample {
            source: item.src_text.clone(),
            target: item.tgt_text.clone(),
            predicted,
            predicted_ids,
        });
    }
    Ok(samples)
}
