// translator_core/src/greedy.rs

//! Жадное авторегрессионное декодирование.

use burn::tensor::{backend::Backend, Bool, ElementConversion, Int, Tensor, TensorData};
use tracing::debug;

use crate::architectures::transformer::Transformer;
use crate::dropout::Mode;
use crate::mask::causal_mask;
use crate::TranslatorCoreError;

/// Состояние цикла декодирования.
#[derive(Debug)]
enum DecodeState<B: Backend> {
    /// Память кодировщика еще не вычислена.
    Start,
    /// Последовательность растет; память вычислена один раз.
    Generating {
        memory: Tensor<B, 3>,
        tokens: Vec<i64>,
    },
    /// Достигнут `[EOS]` или `max_len`.
    Done(Vec<i64>),
}

/// Жадный декодер поверх обученной модели.
///
/// На каждом шаге выбирается токен с максимальным логитом. Работает в
/// [`Mode::Eval`] и только с батчем из одной последовательности.
#[derive(Debug)]
pub struct GreedyDecoder<'a, B: Backend> {
    model: &'a Transformer<B>,
    sos_id: i64,
    eos_id: i64,
    max_len: usize,
}

impl<'a, B: Backend> GreedyDecoder<'a, B> {
    /// Создает декодер.
    ///
    /// # Errors
    /// `InvalidDecodeLength`, если `max_len` равен нулю или больше длины
    /// позиционной таблицы декодера.
    pub fn new(
        model: &'a Transformer<B>,
        sos_id: i64,
        eos_id: i64,
        max_len: usize,
    ) -> Result<Self, TranslatorCoreError> {
        let tgt_seq_len = model.config().tgt_seq_len;
        if max_len == 0 || max_len > tgt_seq_len {
            return Err(TranslatorCoreError::InvalidDecodeLength { max_len, tgt_seq_len });
        }
        Ok(Self {
            model,
            sos_id,
            eos_id,
            max_len,
        })
    }

    /// Декодирует одну исходную последовательность `(1, src_len)`.
    ///
    /// Возвращает идентификаторы, начинающиеся с `sos_id`, длиной от 1 до `max_len`.
    ///
    /// # Errors
    /// `BatchSizeNotOne` для батча другого размера; ошибки `encode`/`decode` модели.
    pub fn decode(
        &self,
        source: Tensor<B, 2, Int>,
        source_mask: Option<Tensor<B, 4, Bool>>,
    ) -> Result<Vec<i64>, TranslatorCoreError> {
        let [batch, _] = source.dims();
        if batch != 1 {
            return Err(TranslatorCoreError::BatchSizeNotOne(batch));
        }
        let device = source.device();

        let mut state = DecodeState::Start;
        loop {
            state = match state {
                DecodeState::Start => DecodeState::Generating {
                    memory: self.model.encode(source.clone(), source_mask.clone(), Mode::Eval)?,
                    tokens: vec![self.sos_id],
                },
                DecodeState::Generating { tokens, .. }
                    if tokens.len() >= self.max_len || self.ends_with_eos(&tokens) =>
                {
                    DecodeState::Done(tokens)
                }
                DecodeState::Generating { memory, mut tokens } => {
                    let next = self.step(memory.clone(), source_mask.clone(), &tokens, &device)?;
                    debug!("Шаг {}: выбран токен {}.", tokens.len(), next);
                    tokens.push(next);
                    DecodeState::Generating { memory, tokens }
                }
                DecodeState::Done(tokens) => return Ok(tokens),
            };
        }
    }

    /// Один шаг: логиты `(1, 1, vocab)` для последней позиции и их arg-max.
    fn step(
        &self,
        memory: Tensor<B, 3>,
        source_mask: Option<Tensor<B, 4, Bool>>,
        tokens: &[i64],
        device: &B::Device,
    ) -> Result<i64, TranslatorCoreError> {
        let len = tokens.len();
        let target = Tensor::<B, 2, Int>::from_data(TensorData::new(tokens.to_vec(), [1, len]), device);
        let hidden = self.model.decode(
            memory,
            source_mask,
            target,
            Some(causal_mask::<B>(len, device)),
            Mode::Eval,
        )?;
        let logits = self.next_token_logits(hidden);
        Ok(logits.argmax(2).into_scalar().elem::<i64>())
    }

    /// Стартовый `sos_id` концом не считается, даже если совпадает с `eos_id`.
    fn ends_with_eos(&self, tokens: &[i64]) -> bool {
        tokens.len() > 1 && tokens.last() == Some(&self.eos_id)
    }

    /// Логиты следующего токена по скрытым состояниям `(1, len, d_model)`, `len >= 1`.
    fn next_token_logits(&self, hidden: Tensor<B, 3>) -> Tensor<B, 3> {
        let [batch, len, d_model] = hidden.dims();
        let last = hidden.slice([0..batch, len - 1..len, 0..d_model]);
        self.model.project(last)
    }
}
