// translator_core/src/tokenizer.rs

//! Контракт токенизатора и простой словный (word-level) токенизатор
//! с фиксированным словарем.
//!
//! Обучение токенизаторов сюда не входит: словарь либо передается готовым,
//! либо читается из JSON в формате `WordLevel` библиотеки `tokenizers`.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::TranslatorCoreError;

/// Неизвестное слово.
pub const UNK_TOKEN: &str = "[UNK]";
/// Паддинг.
pub const PAD_TOKEN: &str = "[PAD]";
/// Начало последовательности.
pub const SOS_TOKEN: &str = "[SOS]";
/// Конец последовательности.
pub const EOS_TOKEN: &str = "[EOS]";

/// Все специальные токены в порядке их идентификаторов в новом словаре.
pub const SPECIAL_TOKENS: [&str; 4] = [UNK_TOKEN, PAD_TOKEN, SOS_TOKEN, EOS_TOKEN];

/// Минимальный контракт токенизатора, который использует модель.
pub trait Tokenizer {
    /// Текст -> идентификаторы. Неизвестные слова отображаются в `[UNK]`.
    fn encode(&self, text: &str) -> Vec<i64>;
    /// Идентификаторы -> текст, специальные токены пропускаются.
    fn decode(&self, ids: &[i64]) -> String;
    /// Идентификатор токена, если он есть в словаре.
    fn token_to_id(&self, token: &str) -> Option<i64>;
    /// Размер словаря.
    fn vocab_size(&self) -> usize;
}

/// Идентификаторы специальных токенов одного словаря.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecialTokens {
    /// `[UNK]`.
    pub unk: i64,
    /// `[PAD]`.
    pub pad: i64,
    /// `[SOS]`.
    pub sos: i64,
    /// `[EOS]`.
    pub eos: i64,
}

impl SpecialTokens {
    /// Находит специальные токены в словаре токенизатора.
    ///
    /// # Errors
    /// `TranslatorCoreError::MissingSpecialToken`, если какого-то токена нет.
    pub fn resolve<T: Tokenizer + ?Sized>(tokenizer: &T) -> Result<Self, TranslatorCoreError> {
        let lookup = |token: &str| {
            tokenizer
                .token_to_id(token)
                .ok_or_else(|| TranslatorCoreError::MissingSpecialToken(token.to_string()))
        };
        Ok(Self {
            unk: lookup(UNK_TOKEN)?,
            pad: lookup(PAD_TOKEN)?,
            sos: lookup(SOS_TOKEN)?,
            eos: lookup(EOS_TOKEN)?,
        })
    }

    fn contains(&self, id: i64) -> bool {
        [self.unk, self.pad, self.sos, self.eos].contains(&id)
    }
}

/// Разбивает текст на слова и знаки препинания (`\w+|[^\w\s]+`).
fn pre_tokenize(text: &str) -> Vec<&str> {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let mut pieces = Vec::new();
    let mut start: Option<(usize, bool)> = None;
    for (idx, c) in text.char_indices() {
        if c.is_whitespace() {
            if let Some((begin, _)) = start.take() {
                pieces.push(&text[begin..idx]);
            }
            continue;
        }
        match start {
            Some((begin, word)) if word != is_word(c) => {
                pieces.push(&text[begin..idx]);
                start = Some((idx, is_word(c)));
            }
            Some(_) => {}
            None => start = Some((idx, is_word(c))),
        }
    }
    if let Some((begin, _)) = start {
        pieces.push(&text[begin..]);
    }
    pieces
}

/// Раздел `model` файла токенизатора.
#[derive(Debug, Serialize, Deserialize)]
struct WordLevelModel {
    #[serde(rename = "type", default = "word_level_type")]
    kind: String,
    vocab: HashMap<String, i64>,
    #[serde(default = "unk_token")]
    unk_token: String,
}

fn word_level_type() -> String {
    "WordLevel".to_string()
}
fn unk_token() -> String {
    UNK_TOKEN.to_string()
}

#[derive(Debug, Serialize, Deserialize)]
struct TokenizerFile {
    model: WordLevelModel,
}

/// Словный токенизатор над фиксированным словарем.
#[derive(Debug, Clone)]
pub struct WordLevelTokenizer {
    vocab: HashMap<String, i64>,
    id_to_token: HashMap<i64, String>,
    unk_id: i64,
    special: SpecialTokens,
}

impl WordLevelTokenizer {
    /// Создает токенизатор из готового словаря.
    ///
    /// # Errors
    /// `MissingSpecialToken`, если в словаре нет какого-либо специального токена.
    pub fn from_vocab(vocab: HashMap<String, i64>) -> Result<Self, TranslatorCoreError> {
        let id_to_token = vocab.iter().map(|(token, id)| (*id, token.clone())).collect();
        let mut tokenizer = Self {
            vocab,
            id_to_token,
            unk_id: 0,
            special: SpecialTokens { unk: 0, pad: 0, sos: 0, eos: 0 },
        };
        tokenizer.special = SpecialTokens::resolve(&tokenizer)?;
        tokenizer.unk_id = tokenizer.special.unk;
        Ok(tokenizer)
    }

    /// Строит словарь: сначала специальные токены (id 0..4), затем слова в порядке появления.
    ///
    /// # Errors
    /// `InvalidConfig`, если число слов не помещается в `i64`.
    pub fn from_words<'a, I>(words: I) -> Result<Self, TranslatorCoreError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut vocab: HashMap<String, i64> = HashMap::new();
        for token in SPECIAL_TOKENS.into_iter().chain(words) {
            let next_id = i64::try_from(vocab.len()).map_err(|_| {
                TranslatorCoreError::InvalidConfig("словарь слишком большой".to_string())
            })?;
            vocab.entry(token.to_string()).or_insert(next_id);
        }
        Self::from_vocab(vocab)
    }

    /// Читает словарь из JSON файла формата `tokenizers` (модель `WordLevel`).
    ///
    /// # Errors
    /// Ошибки чтения файла, разбора JSON, неподдерживаемый тип модели или
    /// отсутствие специальных токенов.
    pub fn from_json_file(path: &Path) -> Result<Self, TranslatorCoreError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| TranslatorCoreError::io_with_path(e, path.display().to_string()))?;
        let file: TokenizerFile = serde_json::from_str(&content)?;
        if file.model.kind != "WordLevel" {
            return Err(TranslatorCoreError::InvalidConfig(format!(
                "неподдерживаемый тип токенизатора {} в {path:?}",
                file.model.kind
            )));
        }
        let tokenizer = Self::from_vocab(file.model.vocab)?;
        info!(
            "Токенизатор загружен из {:?}, размер словаря {}.",
            path,
            tokenizer.vocab_size()
        );
        Ok(tokenizer)
    }

    /// Сохраняет словарь в JSON файл формата `tokenizers`.
    ///
    /// # Errors
    /// Ошибки сериализации или записи.
    pub fn save_json(&self, path: &Path) -> Result<(), TranslatorCoreError> {
        let file = TokenizerFile {
            model: WordLevelModel {
                kind: word_level_type(),
                vocab: self.vocab.clone(),
                unk_token: unk_token(),
            },
        };
        std::fs::write(path, serde_json::to_string_pretty(&file)?)
            .map_err(|e| TranslatorCoreError::io_with_path(e, path.display().to_string()))
    }

    /// Идентификаторы специальных токенов.
    #[must_use]
    pub const fn special_tokens(&self) -> SpecialTokens {
        self.special
    }
}

impl Tokenizer for WordLevelTokenizer {
    fn encode(&self, text: &str) -> Vec<i64> {
        let ids: Vec<i64> = pre_tokenize(text)
            .into_iter()
            .map(|word| self.vocab.get(word).copied().unwrap_or(self.unk_id))
            .collect();
        debug!("encode: {} слов -> {:?}", ids.len(), ids);
        ids
    }

    fn decode(&self, ids: &[i64]) -> String {
        ids.iter()
            .filter(|id| !self.special.contains(**id))
            .filter_map(|id| self.id_to_token.get(id).map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn token_to_id(&self, token: &str) -> Option<i64> {
        self.vocab.get(token).copied()
    }

    fn vocab_size(&self) -> usize {
        self.vocab.len()
    }
}
