// translator_core/src/mask.rs

//! Построение масок внимания.
//!
//! Соглашение: `true` означает, что позиция доступна для внимания.

use burn::tensor::{backend::Backend, Bool, Int, Tensor, TensorData};

/// Маска паддинга `(batch, 1, 1, seq_len)`: `false` там, где стоит `pad_id`.
pub fn padding_mask<B: Backend>(ids: Tensor<B, 2, Int>, pad_id: i64) -> Tensor<B, 4, Bool> {
    let [batch, seq_len] = ids.dims();
    ids.not_equal_elem(pad_id).reshape([batch, 1, 1, seq_len])
}

/// Нижнетреугольная маска `(1, 1, len, len)`: запрос `i` видит ключи `0..=i`.
pub fn causal_mask<B: Backend>(len: usize, device: &B::Device) -> Tensor<B, 4, Bool> {
    let values: Vec<bool> = (0..len)
        .flat_map(|query| (0..len).map(move |key| key <= query))
        .collect();
    Tensor::from_data(TensorData::new(values, [1, 1, len, len]), device)
}

/// Маска декодера `(batch, 1, seq_len, seq_len)`: паддинг И причинность.
pub fn decoder_mask<B: Backend>(ids: Tensor<B, 2, Int>, pad_id: i64) -> Tensor<B, 4, Bool> {
    let [batch, seq_len] = ids.dims();
    let device = ids.device();
    let shape = [batch, 1, seq_len, seq_len];
    let padding = padding_mask(ids, pad_id).expand(shape).int();
    let causal = causal_mask::<B>(seq_len, &device).expand(shape).int();
    padding.mul(causal).equal_elem(1)
}
