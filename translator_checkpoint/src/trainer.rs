//! Цикл обучения по эпохам с продолжением с последнего чекпоинта.

use burn::{
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    tensor::{backend::AutodiffBackend, ElementConversion},
};
use tracing::{debug, info};
use translator_core::{
    run_validation, Mode, Seq2SeqBatch, Seq2SeqItem, Seq2SeqLoss, SpecialTokens, Tokenizer,
    Transformer, TransformerConfig, ValidationSample,
};
use translator_utils::{epoch_tag, RunConfig};

use crate::{error::CheckpointError, loader::CheckpointStore, types::ResumePoint};

/// `epsilon` оптимизатора Adam.
pub const ADAM_EPSILON: f32 = 1e-9;

/// Сколько примеров декодируется и логируется после каждой эпохи.
pub const VALIDATION_EXAMPLES: usize = 2;

/// Конфигурация модели для запуска: `seq_len` и `d_model` из [`RunConfig`],
/// размеры словарей из токенизаторов, остальное по умолчанию.
#[must_use]
pub fn model_config(run: &RunConfig, src_vocab_size: usize, tgt_vocab_size: usize) -> TransformerConfig {
    TransformerConfig::new(src_vocab_size, tgt_vocab_size, run.seq_len, run.seq_len).with_d_model(run.d_model)
}

/// Итоги одной эпохи.
#[derive(Debug, Clone, PartialEq)]
pub struct EpochReport {
    /// Номер эпохи.
    pub epoch: usize,
    /// Средние потери по батчам; `None`, если батчей не было.
    pub mean_loss: Option<f32>,
    /// Значение `global_step` после эпохи.
    pub global_step: usize,
    /// Переводы валидационных примеров.
    pub samples: Vec<ValidationSample>,
}

/// Итоги запуска [`Trainer::train`].
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingReport {
    /// Откуда продолжено обучение.
    pub resumed_from: ResumePoint,
    /// Пройденные в этом запуске эпохи.
    pub epochs: Vec<EpochReport>,
}

/// Обучает [`Transformer`] по [`RunConfig`] и сохраняет чекпоинт после каждой эпохи.
#[derive(Debug, Clone)]
pub struct Trainer {
    run: RunConfig,
    store: CheckpointStore,
}

impl Trainer {
    /// Тренер с хранилищем из `model_folder` и `model_basename`.
    #[must_use]
    pub fn new(run: RunConfig) -> Self {
        let store = CheckpointStore::from_run_config(&run);
        Self { run, store }
    }

    /// Конфигурация запуска.
    #[must_use]
    pub const fn run_config(&self) -> &RunConfig {
        &self.run
    }

    /// Хранилище чекпоинтов.
    #[must_use]
    pub const fn store(&self) -> &CheckpointStore {
        &self.store
    }

    /// Проходит эпохи `[initial_epoch, num_epochs)`.
    ///
    /// Модель и состояние Adam восстанавливаются по `preload`. Каждая эпоха:
    /// батчи по `batch_size` (forward, потери, backward, шаг оптимизатора),
    /// затем валидация и сохранение чекпоинта вместе с оптимизатором.
    ///
    /// # Errors
    /// `InvalidRunConfig` при `batch_size = 0`; ошибки загрузки и сохранения
    /// чекпоинтов, сборки батчей и прямого прохода.
    pub fn train<B, T>(
        &self,
        config: &TransformerConfig,
        train_items: &[Seq2SeqItem],
        val_items: &[Seq2SeqItem],
        tokenizer_tgt: &T,
        device: &B::Device,
    ) -> Result<(Transformer<B>, TrainingReport), CheckpointError>
    where
        B: AutodiffBackend,
        T: Tokenizer + ?Sized,
    {
        if self.run.batch_size == 0 {
            return Err(CheckpointError::InvalidRunConfig(
                "batch_size должен быть больше нуля".to_string(),
            ));
        }
        let special = SpecialTokens::resolve(tokenizer_tgt)?;
        let loss_fn = Seq2SeqLoss::new(special.pad);
        let mut optimizer = AdamConfig::new()
            .with_epsilon(ADAM_EPSILON)
            .init::<B, Transformer<B>>();

        let (mut model, resumed_from) =
            match self.store.preload::<B>(self.run.preload.as_deref(), config, device)? {
                Some((model, meta)) => {
                    if let Some(record) = self
                        .store
                        .load_optimizer_record::<B, _>(&epoch_tag(meta.epoch), device)?
                    {
                        optimizer = optimizer.load_record(record);
                    }
                    (model, meta.resume_point())
                }
                None => (config.init::<B>(device)?, ResumePoint::default()),
            };
        info!(
            "Обучение с эпохи {} до {} (global_step {}), батч {}, lr {}.",
            resumed_from.initial_epoch,
            self.run.num_epochs,
            resumed_from.global_step,
            self.run.batch_size,
            self.run.lr
        );

        let mut global_step = resumed_from.global_step;
        let mut epochs = Vec::new();
        for epoch in resumed_from.initial_epoch..self.run.num_epochs {
            let mut loss_sum = 0.0_f32;
            let mut batches = 0_usize;
            for chunk in train_items.chunks(self.run.batch_size) {
                let batch = Seq2SeqBatch::<B>::from_items(chunk, device)?;
                let logits = model.forward(&batch, Mode::Train)?;
                let loss = loss_fn.forward(logits, batch.label);
                let value = loss.clone().into_scalar().elem::<f32>();

                let grads = GradientsParams::from_grads(loss.backward(), &model);
                model = optimizer.step(self.run.lr, model, grads);
                global_step += 1;
                loss_sum += value;
                batches += 1;
                debug!("Эпоха {:02}, шаг {}: потери {:.4}.", epoch, global_step, value);
            }
            #[allow(clippy::cast_precision_loss)]
            let mean_loss = (batches > 0).then(|| loss_sum / batches as f32);
            info!("Эпоха {:02} завершена: средние потери {:?}.", epoch, mean_loss);

            let samples = run_validation(
                &model.valid(),
                val_items,
                tokenizer_tgt,
                config.tgt_seq_len,
                VALIDATION_EXAMPLES,
                device,
            )?;

            self.store
                .save_with_optimizer(epoch, global_step, &model, optimizer.to_record())?;
            epochs.push(EpochReport {
                epoch,
                mean_loss,
                global_step,
                samples,
            });
        }

        Ok((model, TrainingReport { resumed_from, epochs }))
    }
}
