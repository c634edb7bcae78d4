//! Хранилище чекпоинтов: веса, метаданные и состояние оптимизатора по тегу эпохи.

use std::fs;
use std::path::{Path, PathBuf};

use burn::{
    module::Module,
    record::{FullPrecisionSettings, NamedMpkFileRecorder, Record, Recorder},
    tensor::backend::Backend,
};
use tracing::{debug, info, warn};
use translator_core::{Transformer, TransformerConfig};
use translator_utils::{
    config::PRELOAD_LATEST, ensure_dir_exists, epoch_tag, latest_epoch_tag, weights_file_path,
    RunConfig,
};

use crate::{
    error::CheckpointError,
    types::CheckpointMeta,
    validation::ConfigValidator,
};

/// Рекордер для весов и состояния оптимизатора: `MessagePack` с полной точностью.
pub type CheckpointRecorder = NamedMpkFileRecorder<FullPrecisionSettings>;

const OPTIMIZER_SUFFIX: &str = "_optim";
const META_EXTENSION: &str = "json";

/// Хранилище чекпоинтов в одной директории.
///
/// Для эпохи `e` создаются файлы `<folder>/<basename><e:02>.mpk` (веса),
/// `<folder>/<basename><e:02>.json` (метаданные) и, если передано состояние
/// оптимизатора, `<folder>/<basename><e:02>_optim.mpk`.
#[derive(Debug, Clone)]
pub struct CheckpointStore {
    folder: PathBuf,
    basename: String,
    recorder: CheckpointRecorder,
}

impl CheckpointStore {
    /// Создает хранилище. Директория создается при первом сохранении.
    pub fn new(folder: impl Into<PathBuf>, basename: impl Into<String>) -> Self {
        Self {
            folder: folder.into(),
            basename: basename.into(),
            recorder: CheckpointRecorder::new(),
        }
    }

    /// Хранилище по `model_folder` и `model_basename` из конфигурации запуска.
    #[must_use]
    pub fn from_run_config(config: &RunConfig) -> Self {
        Self::new(&config.model_folder, &config.model_basename)
    }

    /// Директория чекпоинтов.
    #[must_use]
    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// Путь к весам без расширения (его добавляет рекордер).
    #[must_use]
    pub fn weights_path(&self, tag: &str) -> PathBuf {
        weights_file_path(&self.folder, &self.basename, tag)
    }

    fn optimizer_path(&self, tag: &str) -> PathBuf {
        weights_file_path(&self.folder, &self.basename, &format!("{tag}{OPTIMIZER_SUFFIX}"))
    }

    fn meta_path(&self, tag: &str) -> PathBuf {
        weights_file_path(&self.folder, &self.basename, &format!("{tag}.{META_EXTENSION}"))
    }

    /// Сохраняет веса модели и метаданные эпохи `epoch`.
    ///
    /// # Errors
    /// Ошибки создания директории, рекордера или записи метаданных.
    pub fn save<B: Backend>(
        &self,
        epoch: usize,
        global_step: usize,
        model: &Transformer<B>,
    ) -> Result<CheckpointMeta, CheckpointError> {
        self.save_model_and_meta(epoch, global_step, model, false)
    }

    /// Сохраняет веса, метаданные и запись оптимизатора (`optimizer.to_record()`).
    ///
    /// # Errors
    /// Те же, что у [`CheckpointStore::save`].
    pub fn save_with_optimizer<B: Backend, R: Record<B>>(
        &self,
        epoch: usize,
        global_step: usize,
        model: &Transformer<B>,
        optimizer_record: R,
    ) -> Result<CheckpointMeta, CheckpointError> {
        ensure_dir_exists(&self.folder)?;
        let optimizer_path = self.optimizer_path(&epoch_tag(epoch));
        <CheckpointRecorder as Recorder<B>>::record(&self.recorder, optimizer_record, optimizer_path.clone())
            .map_err(|e| CheckpointError::recorder(&optimizer_path, &e))?;
        self.save_model_and_meta(epoch, global_step, model, true)
    }

    fn save_model_and_meta<B: Backend>(
        &self,
        epoch: usize,
        global_step: usize,
        model: &Transformer<B>,
        has_optimizer: bool,
    ) -> Result<CheckpointMeta, CheckpointError> {
        ensure_dir_exists(&self.folder)?;
        let tag = epoch_tag(epoch);

        let weights_path = self.weights_path(&tag);
        model
            .clone()
            .save_file(weights_path.clone(), &self.recorder)
            .map_err(|e| CheckpointError::recorder(&weights_path, &e))?;

        // Метаданные пишутся последними: их наличие означает полный чекпоинт.
        let meta = CheckpointMeta {
            epoch,
            global_step,
            model_config: model.config().clone(),
            model_info: model.info(),
            has_optimizer,
        };
        let meta_path = self.meta_path(&tag);
        let content = serde_json::to_string_pretty(&meta).map_err(|source| CheckpointError::Metadata {
            path: meta_path.display().to_string(),
            source,
        })?;
        fs::write(&meta_path, content).map_err(|e| CheckpointError::io(&meta_path, e))?;

        info!(
            "Чекпоинт эпохи {} сохранен в {:?} (global_step {}, оптимизатор: {}).",
            epoch, weights_path, global_step, has_optimizer
        );
        Ok(meta)
    }

    /// Читает метаданные чекпоинта с тегом `tag`.
    ///
    /// # Errors
    /// `NotFound`, если файла метаданных нет; ошибки чтения или разбора JSON.
    pub fn load_meta(&self, tag: &str) -> Result<CheckpointMeta, CheckpointError> {
        let meta_path = self.meta_path(tag);
        if !meta_path.is_file() {
            return Err(CheckpointError::NotFound(meta_path.display().to_string()));
        }
        let content = fs::read_to_string(&meta_path).map_err(|e| CheckpointError::io(&meta_path, e))?;
        serde_json::from_str(&content).map_err(|source| CheckpointError::Metadata {
            path: meta_path.display().to_string(),
            source,
        })
    }

    /// Загружает модель и метаданные чекпоинта `tag`.
    ///
    /// Модель строится по `expected`, после чего в нее загружаются веса.
    ///
    /// # Errors
    /// `NotFound`, `ConfigMismatch`, ошибки рекордера или построения модели.
    pub fn load<B: Backend>(
        &self,
        tag: &str,
        expected: &TransformerConfig,
        device: &B::Device,
    ) -> Result<(Transformer<B>, CheckpointMeta), CheckpointError> {
        let meta = self.load_meta(tag)?;
        ConfigValidator::check_matches(&meta.model_config, expected)?;

        let weights_path = self.weights_path(tag);
        debug!("Загрузка весов из {:?}.", weights_path);
        let model = expected
            .init::<B>(device)?
            .load_file(weights_path.clone(), &self.recorder, device)
            .map_err(|e| CheckpointError::recorder(&weights_path, &e))?;

        info!(
            "Загружен чекпоинт эпохи {} (global_step {}).",
            meta.epoch, meta.global_step
        );
        Ok((model, meta))
    }

    /// Загружает запись оптимизатора, если она была сохранена.
    ///
    /// Результат передается в `optimizer.load_record(..)`.
    ///
    /// # Errors
    /// Ошибки чтения метаданных или рекордера.
    pub fn load_optimizer_record<B: Backend, R: Record<B>>(
        &self,
        tag: &str,
        device: &B::Device,
    ) -> Result<Option<R>, CheckpointError> {
        if !self.load_meta(tag)?.has_optimizer {
            warn!("Чекпоинт {} сохранен без состояния оптимизатора.", tag);
            return Ok(None);
        }
        let optimizer_path = self.optimizer_path(tag);
        let record = <CheckpointRecorder as Recorder<B>>::load(&self.recorder, optimizer_path.clone(), device)
            .map_err(|e| CheckpointError::recorder(&optimizer_path, &e))?;
        Ok(Some(record))
    }

    /// Тег последнего полного чекпоинта, если есть.
    ///
    /// Ищется по файлам метаданных: веса без `.json` остались от прерванного
    /// сохранения и пропускаются.
    ///
    /// # Errors
    /// Ошибка чтения директории.
    pub fn latest_tag(&self) -> Result<Option<String>, CheckpointError> {
        let latest = latest_epoch_tag(&self.folder, &self.basename, META_EXTENSION)?;
        debug!("Последний полный чекпоинт в {:?}: {:?}", self.folder, latest);
        Ok(latest)
    }

    /// Загружает последний чекпоинт.
    ///
    /// # Errors
    /// `NothingToResume`, если чекпоинтов нет; ошибки [`CheckpointStore::load`].
    pub fn load_latest<B: Backend>(
        &self,
        expected: &TransformerConfig,
        device: &B::Device,
    ) -> Result<(Transformer<B>, CheckpointMeta), CheckpointError> {
        let tag = self
            .latest_tag()?
            .ok_or_else(|| CheckpointError::NothingToResume(self.folder.display().to_string()))?;
        self.load(&tag, expected, device)
    }

    /// Выполняет `preload` из конфигурации запуска.
    ///
    /// * `None` - обучение с нуля.
    /// * `"latest"` - последний чекпоинт или обучение с нуля, если их нет.
    /// * тег эпохи - этот чекпоинт; его отсутствие является ошибкой.
    ///
    /// # Errors
    /// Ошибки [`CheckpointStore::load`].
    pub fn preload<B: Backend>(
        &self,
        preload: Option<&str>,
        expected: &TransformerConfig,
        device: &B::Device,
    ) -> Result<Option<(Transformer<B>, CheckpointMeta)>, CheckpointError> {
        match preload {
            None => {
                info!("Предзагрузка не задана, обучение с нуля.");
                Ok(None)
            }
            Some(PRELOAD_LATEST) => match self.latest_tag()? {
                Some(tag) => self.load(&tag, expected, device).map(Some),
                None => {
                    info!("Чекпоинтов в {:?} нет, обучение с нуля.", self.folder);
                    Ok(None)
                }
            },
            Some(tag) => self.load(tag, expected, device).map(Some),
        }
    }
}
