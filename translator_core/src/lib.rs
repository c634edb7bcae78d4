// translator_core/src/lib.rs

#![warn(
    missing_docs, // Предупреждать об отсутствующей документации для публичных элементов.
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
#![deny(
    unsafe_code,
    clippy::unwrap_used,
    clippy::expect_used
)]

//! # `translator_core`
//!
//! Ядро переводчика на [Burn](https://burn.dev/): encoder-decoder трансформер
//! для перевода последовательностей и все, что нужно для его прямого прохода.
//!
//! ## Структура
//!
//! - `architectures::transformer`: внимание, feed-forward, нормализация,
//!   остаточные соединения, стеки кодировщика и декодера, проекция, модель.
//! - `config`: гиперпараметры `TransformerConfig` и построение модели.
//! - `embedding`, `positional`: входные эмбеддинги и синусоидальное кодирование позиций.
//! - `dropout`: явный режим `Mode` и дропаут, управляемый им.
//! - `mask`: маски паддинга, причинная и маска декодера.
//! - `tokenizer`, `batch`: контракт токенизатора, кадрирование пар и сборка батчей.
//! - `greedy`: жадное декодирование.
//! - `loss`: кросс-энтропия со сглаживанием меток.
//! - `validation`: валидационный прогон с логированием примеров.
//! - `error`: тип ошибки крейта.
//!
//! Обучение (autodiff, оптимизатор) выполняет Burn; крейт гарантирует только,
//! что все обучаемые веса являются `Param` и градиенты проходят через модель.

pub mod architectures;
pub mod batch;
pub mod config;
pub mod dropout;
pub mod embedding;
pub mod error;
pub mod greedy;
pub mod loss;
pub mod mask;
pub mod positional;
pub mod tokenizer;
pub mod validation;

pub use error::TranslatorCoreError;

pub use architectures::transformer::{
    scaled_dot_product_attention, AttentionOutput, Decoder, DecoderBlock, Encoder, EncoderBlock,
    FeedForwardBlock, LayerNormalization, MultiHeadAttention, ProjectionLayer, ResidualConnection,
    Transformer, TransformerRecord,
};
pub use architectures::ModelInfo;
pub use batch::{Seq2SeqBatch, Seq2SeqItem};
pub use config::TransformerConfig;
pub use dropout::{Dropout, Mode};
pub use embedding::InputEmbedding;
pub use greedy::GreedyDecoder;
pub use loss::Seq2SeqLoss;
pub use mask::{causal_mask, decoder_mask, padding_mask};
pub use positional::{sinusoidal_table, PositionalEncoding};
pub use tokenizer::{SpecialTokens, Tokenizer, WordLevelTokenizer};
pub use validation::{run_validation, ValidationSample};
