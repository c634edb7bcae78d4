//! Логирование переводчика: консоль и, по желанию, файл с ежедневной ротацией.
//!
//! Доступно с фичей `logger_utils_feature`.

use tracing::Level;
use tracing_subscriber::{
    filter::Directive,
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
    Layer,
    Registry,
};

use std::{fs, io, path::Path};

use crate::error::UtilsError;

/// Строит директиву `app_name=level` для `EnvFilter`.
fn level_directive(app_name: &str, level: Level) -> Result<Directive, UtilsError> {
    // Дефисы в имени крейта в путях модулей заменяются подчеркиваниями.
    let sanitized_app_name = app_name.replace('-', "_");
    format!("{sanitized_app_name}={level}")
        .parse()
        .map_err(|e| UtilsError::Config(format!("Неверная директива уровня логирования: {e}")))
}

/// Базовый фильтр из `RUST_LOG`, по умолчанию `info`.
fn base_env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Инициализирует глобальный подписчик `tracing`.
///
/// Настраивает вывод в консоль (stderr) и, опционально, в файл с ежедневной
/// ротацией. Базовый фильтр берется из `RUST_LOG` (по умолчанию `info`),
/// поверх него добавляется явный уровень для `app_name`.
///
/// `app_name` задает и цель фильтра, и имя файла `<app_name>.log` в `log_dir`.
///
/// # Ошибки
/// Возвращает `UtilsError::Config` при невалидной директиве фильтра и
/// `UtilsError::Logger`, если глобальный подписчик уже установлен.
/// Проблемы с созданием директории лога не считаются ошибкой: приложение
/// продолжает работать с выводом только в консоль.
#[allow(clippy::module_name_repetitions)]
pub fn init_tracing_logger(
    app_name: &str,
    console_level: Level,
    file_level: Level,
    log_dir: Option<&Path>,
) -> Result<(), UtilsError> {
    let console_filter = base_env_filter().add_directive(level_directive(app_name, console_level)?);

    let console_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(true)
        .with_filter(console_filter);

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync + 'static>> = Vec::new();
    layers.push(console_layer.boxed());

    let mut file_dir_ready = false;
    if let Some(dir) = log_dir {
        if let Err(e) = fs::create_dir_all(dir) {
            // tracing еще не инициализирован, поэтому только stderr.
            eprintln!(
                "[ПРЕДУПРЕЖДЕНИЕ] Не удалось создать директорию логов {dir:?}: {e}. Логирование в файл будет отключено."
            );
        } else {
            let file_appender = tracing_appender::rolling::daily(dir, format!("{app_name}.log"));
            let file_filter = base_env_filter().add_directive(level_directive(app_name, file_level)?);
            let file_layer = fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_filter(file_filter);
            layers.push(file_layer.boxed());
            file_dir_ready = true;
        }
    }

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| UtilsError::Logger(format!("Failed to initialize logger: {e}")))?;

    match log_dir {
        Some(dir) if file_dir_ready => tracing::info!(
            "Логгер инициализирован. Уровень консоли: {}. Логирование в файл: {:?} (уровень {}).",
            console_level,
            dir,
            file_level
        ),
        Some(dir) => tracing::warn!(
            "Логгер инициализирован. Уровень консоли: {}. Логирование в файл в {:?} недоступно.",
            console_level,
            dir
        ),
        None => tracing::info!(
            "Логгер инициализирован. Только вывод в консоль (уровень {}).",
            console_level
        ),
    }
    Ok(())
}
