//! Общий тип ошибки утилит.

use thiserror::Error;

/// Общий тип ошибки для утилит `translator_utils`.
///
/// Агрегирует ошибки ввода-вывода, конфигурации и параметров, предоставляя
/// единый способ их обработки в остальных крейтах рабочего пространства.
#[derive(Error, Debug)]
pub enum UtilsError {
    /// Файловая операция не удалась; `path`, если известен, указывает на файл или директорию.
    #[error("Ошибка ввода-вывода ({path:?}): {source}")]
    Io {
        /// Исходная ошибка.
        #[source]
        source: std::io::Error,
        /// Путь, на котором случилась ошибка.
        path: Option<String>,
    },

    /// Конфигурацию запуска не удалось прочитать или разобрать.
    #[error("Ошибка конфигурации: {0}")]
    Config(String),

    /// Аргумент не подходит для операции (например, путь к директории занят файлом).
    #[error("Неверный параметр: {0}")]
    InvalidParameter(String),

    /// Глобальный подписчик `tracing` не удалось установить.
    #[error("Ошибка инициализации логгера: {0}")]
    Logger(String),
}

impl From<std::io::Error> for UtilsError {
    fn from(source: std::io::Error) -> Self {
        Self::Io { source, path: None }
    }
}

#[cfg(feature = "config_toml")]
impl From<toml::de::Error> for UtilsError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(format!("Ошибка десериализации TOML: {err}"))
    }
}

impl UtilsError {
    /// `UtilsError::Io` с путем.
    pub fn io_with_path(source: std::io::Error, path: impl Into<String>) -> Self {
        Self::Io {
            source,
            path: Some(path.into()),
        }
    }
}
