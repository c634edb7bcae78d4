// translator_core/src/architectures/transformer/attention.rs

//! Многоголовое внимание (multi-head attention) и его ядро, scaled dot-product.

use burn::{
    module::Module,
    nn::{Initializer, Linear, LinearConfig},
    tensor::{activation::softmax, backend::Backend, Bool, Tensor},
};

use crate::dropout::{Dropout, Mode};

/// Значение, которым заполняются запрещенные позиции перед softmax.
pub const MASK_FILL_VALUE: f64 = -1e9;

/// Результат вызова внимания.
///
/// Веса возвращаются вызывающему коду; модуль внимания их не хранит.
#[derive(Debug, Clone)]
pub struct AttentionOutput<B: Backend> {
    /// Выход `(batch, q_len, d_model)`.
    pub output: Tensor<B, 3>,
    /// Веса внимания `(batch, h, q_len, k_len)`.
    pub weights: Tensor<B, 4>,
}

/// Ядро внимания над тензорами `(batch, h, len, d_k)`.
///
/// Возвращает `(weights · V, weights)`. Маска `(batch | 1, 1 | h, q_len | 1, k_len)`
/// расширяется до формы оценок; запрещенные позиции получают [`MASK_FILL_VALUE`]
/// в новом тензоре оценок, который и подается в softmax. Без маски ограничений нет.
#[allow(clippy::cast_precision_loss)]
pub fn scaled_dot_product_attention<B: Backend>(
    query: Tensor<B, 4>,
    key: Tensor<B, 4>,
    value: Tensor<B, 4>,
    mask: Option<Tensor<B, 4, Bool>>,
    dropout: &Dropout,
    mode: Mode,
) -> (Tensor<B, 4>, Tensor<B, 4>) {
    let [_, _, _, d_k] = query.dims();
    let scores = query.matmul(key.swap_dims(2, 3)).div_scalar((d_k as f64).sqrt());

    let scores = match mask {
        Some(mask) => {
            let allowed = mask.expand(scores.dims());
            scores.mask_fill(allowed.bool_not(), MASK_FILL_VALUE)
        }
        None => scores,
    };

    let weights = softmax(scores, 3);
    let weights = dropout.forward(weights, mode);
    (weights.clone().matmul(value), weights)
}

/// Многоголовое внимание с четырьмя проекциями `d_model x d_model`.
#[derive(Module, Debug)]
pub struct MultiHeadAttention<B: Backend> {
    w_q: Linear<B>,
    w_k: Linear<B>,
    w_v: Linear<B>,
    w_o: Linear<B>,
    dropout: Dropout,
    h: usize,
    d_k: usize,
}

impl<B: Backend> MultiHeadAttention<B> {
    /// Создает блок внимания. Делимость `d_model` на `h` проверяется в конфигурации.
    pub fn new(d_model: usize, h: usize, dropout: f64, device: &B::Device) -> Self {
        let projection = || {
            LinearConfig::new(d_model, d_model)
                .with_initializer(Initializer::XavierUniform { gain: 1.0 })
                .init(device)
        };
        Self {
            w_q: projection(),
            w_k: projection(),
            w_v: projection(),
            w_o: projection(),
            dropout: Dropout::new(dropout),
            h,
            d_k: d_model / h,
        }
    }

    /// `(batch, len, d_model)` -> `(batch, h, len, d_k)`.
    fn split_heads(&self, x: Tensor<B, 3>) -> Tensor<B, 4> {
        let [batch, len, _] = x.dims();
        x.reshape([batch, len, self.h, self.d_k]).swap_dims(1, 2)
    }

    /// Прямой проход.
    ///
    /// * `query` - `(batch, q_len, d_model)`.
    /// * `key`, `value` - `(batch, k_len, d_model)`.
    /// * `mask` - булева маска, `true` = разрешено; `None` = без ограничений.
    pub fn forward(
        &self,
        query: Tensor<B, 3>,
        key: Tensor<B, 3>,
        value: Tensor<B, 3>,
        mask: Option<Tensor<B, 4, Bool>>,
        mode: Mode,
    ) -> AttentionOutput<B> {
        let [batch, q_len, _] = query.dims();

        // 1. Проекции и разбиение на головы.
        let query = self.split_heads(self.w_q.forward(query));
        let key = self.split_heads(self.w_k.forward(key));
        let value = self.split_heads(self.w_v.forward(value));

        // 2. Ядро внимания.
        let (context, weights) =
            scaled_dot_product_attention(query, key, value, mask, &self.dropout, mode);

        // 3. Склеивание голов и выходная проекция.
        let context = context.swap_dims(1, 2).reshape([batch, q_len, self.h * self.d_k]);
        AttentionOutput {
            output: self.w_o.forward(context),
            weights,
        }
    }
}
