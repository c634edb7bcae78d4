// translator_core/src/architectures/transformer/mod.rs

//! Encoder-decoder трансформер для перевода последовательностей.
//!
//! Подмодули следуют от листьев к корню: внимание, feed-forward, нормализация,
//! остаточное соединение, блоки кодировщика и декодера, проекция, модель.

pub mod attention;
pub mod decoder;
pub mod encoder;
pub mod ffn;
pub mod model;
pub mod norm;
pub mod projection;
pub mod residual;

pub use attention::{scaled_dot_product_attention, AttentionOutput, MultiHeadAttention, MASK_FILL_VALUE};
pub use decoder::{Decoder, DecoderBlock};
pub use encoder::{Encoder, EncoderBlock};
pub use ffn::FeedForwardBlock;
pub use model::{Transformer, TransformerRecord};
pub use norm::LayerNormalization;
pub use projection::ProjectionLayer;
pub use residual::ResidualConnection;
