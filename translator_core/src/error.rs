// translator_core/src/error.rs

//! Тип ошибки крейта `translator_core`.

/// Перечисление всех ошибок, которые могут возникнуть в `translator_core`.
///
/// Ошибки конфигурации обнаруживаются при построении модели, ошибки входных
/// данных (длина последовательности, идентификаторы токенов, размер батча)
/// обнаруживаются до вызова тензорных операций. Отсутствующая маска ошибкой
/// не является: она означает внимание без ограничений.
#[derive(thiserror::Error, Debug)]
pub enum TranslatorCoreError {
    /// Некорректная конфигурация модели (например, `d_model` не делится на `h`).
    #[error("Некорректная конфигурация: {0}")]
    InvalidConfig(String),

    /// Последовательность длиннее предвычисленной позиционной таблицы.
    #[error("Длина последовательности {len} превышает максимальную {max_len}")]
    SequenceTooLong {
        /// Фактическая длина.
        len: usize,
        /// Число строк позиционной таблицы.
        max_len: usize,
    },

    /// Идентификатор токена вне диапазона `[0, vocab_size)`.
    #[error("Идентификатор токена {id} вне словаря размера {vocab_size}")]
    TokenOutOfRange {
        /// Первый найденный недопустимый идентификатор.
        id: i64,
        /// Размер словаря.
        vocab_size: usize,
    },

    /// Жадное декодирование поддерживает только батч из одной последовательности.
    #[error("Жадное декодирование требует batch_size = 1, получено {0}")]
    BatchSizeNotOne(usize),

    /// Недопустимая максимальная длина декодирования.
    #[error("max_len = {max_len} вне диапазона [1, {tgt_seq_len}]")]
    InvalidDecodeLength {
        /// Запрошенная длина.
        max_len: usize,
        /// Длина позиционной таблицы декодера.
        tgt_seq_len: usize,
    },

    /// В словаре нет обязательного специального токена.
    #[error("Специальный токен {0} отсутствует в словаре")]
    MissingSpecialToken(String),

    /// Пара предложений не помещается в `seq_len` вместе со служебными токенами.
    #[error("Предложение слишком длинное: {len} токенов не помещаются в seq_len = {seq_len}")]
    SentenceTooLong {
        /// Длина с учетом служебных токенов.
        len: usize,
        /// Фиксированная длина последовательности.
        seq_len: usize,
    },

    /// Несовместимые размеры или форма входных данных.
    #[error("Несовместимые размеры или форма: {0}")]
    IncompatibleShape(String),

    /// Ошибка ввода-вывода (чтение/запись конфигурации или словаря).
    #[error("Ошибка ввода-вывода ({path}): {source}")]
    Io {
        /// Исходная ошибка.
        source: std::io::Error,
        /// Путь, с которым связана ошибка.
        path: String,
    },

    /// Ошибка (де)сериализации JSON.
    #[error("Ошибка JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl TranslatorCoreError {
    /// Вспомогательный конструктор для `TranslatorCoreError::Io` с путем.
    pub fn io_with_path(source: std::io::Error, path: impl Into<String>) -> Self {
        Self::Io {
            source,
            path: path.into(),
        }
    }
}
