//! Директории и файлы весов по тегу эпохи.

use std::fs;
use std::path::{Path, PathBuf};
use crate::error::UtilsError;
use tracing::{debug, error, info};

/// Расширение файлов весов, которое добавляет рекордер Burn.
pub const WEIGHTS_EXTENSION: &str = "mpk";

/// Гарантирует, что директория существует, создавая ее при необходимости.
///
/// # Arguments
/// * `dir_path` - Путь к директории, существование которой нужно обеспечить.
///
/// # Errors
/// Возвращает `UtilsError::Io`, если директория не может быть создана.
/// Возвращает `UtilsError::InvalidParameter`, если по указанному пути существует файл.
pub fn ensure_dir_exists(dir_path: &Path) -> Result<(), UtilsError> {
    if !dir_path.exists() {
        info!("Creating directory: {:?}", dir_path);
        fs::create_dir_all(dir_path).map_err(|e| {
            UtilsError::io_with_path(e, dir_path.to_string_lossy().into_owned())
        })?;
        debug!("Directory created: {:?}", dir_path);
    } else if !dir_path.is_dir() {
        let err_msg = format!("Path {dir_path:?} exists but is not a directory.");
        error!("{}", err_msg);
        return Err(UtilsError::InvalidParameter(err_msg));
    } else {
        debug!("Directory already exists: {:?}", dir_path);
    }
    Ok(())
}

/// Путь к файлу весов `<folder>/<basename><epoch_tag>` без расширения.
///
/// Расширение добавляет рекордер при записи, поэтому здесь его нет.
#[must_use]
pub fn weights_file_path(folder: &Path, basename: &str, epoch_tag: &str) -> PathBuf {
    folder.join(format!("{basename}{epoch_tag}"))
}

/// Ищет наибольший числовой тег среди файлов `<basename><tag>.<extension>` в директории.
///
/// Теги сравниваются как числа, поэтому `"100"` идет после `"99"`. Файлы с
/// нечисловым хвостом (например, `..._optim.mpk`) пропускаются.
///
/// # Errors
/// Возвращает `UtilsError::Io`, если директорию не удалось прочитать.
/// Несуществующая директория ошибкой не считается: результат `Ok(None)`.
pub fn latest_epoch_tag(folder: &Path, basename: &str, extension: &str) -> Result<Option<String>, UtilsError> {
    if !folder.is_dir() {
        debug!("Folder {:?} does not exist yet.", folder);
        return Ok(None);
    }
    let mut latest_tag: Option<(u64, String)> = None;
    for entry in fs::read_dir(folder)
        .map_err(|e| UtilsError::io_with_path(e, folder.to_string_lossy().into_owned()))?
    {
        let entry = entry.map_err(|e| UtilsError::io_with_path(e, folder.to_string_lossy().into_owned()))?;
        let path = entry.path();
        if !path.is_file() || path.extension().map_or(true, |ext| ext != extension) {
            continue;
        }
        let Some(tag) = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(|stem| stem.strip_prefix(basename))
        else {
            continue;
        };
        if let Ok(epoch) = tag.parse::<u64>() {
            if latest_tag.as_ref().map_or(true, |(best, _)| epoch > *best) {
                latest_tag = Some((epoch, tag.to_string()));
            }
        }
    }
    Ok(latest_tag.map(|(_, tag)| tag))
}

/// Ищет последний (по тегу эпохи) файл весов `<basename>*.mpk` в директории.
///
/// Возвращает путь без расширения, как [`weights_file_path`].
///
/// # Errors
/// Те же, что у [`latest_epoch_tag`].
pub fn latest_weights_file(folder: &Path, basename: &str) -> Result<Option<PathBuf>, UtilsError> {
    let latest = latest_epoch_tag(folder, basename, WEIGHTS_EXTENSION)?
        .map(|tag| weights_file_path(folder, basename, &tag));
    info!("Latest weights file in {:?}: {:?}", folder, latest);
    Ok(latest)
}

/// Форматирует номер эпохи в тег, дополненный нулями до двух знаков (`7` -> `"07"`).
#[must_use]
pub fn epoch_tag(epoch: usize) -> String {
    format!("{epoch:02}")
}
