// translator_core/src/dropout.rs

//! Режим работы модели и дропаут, управляемый этим режимом.
//!
//! Стандартный `burn::nn::Dropout` решает, активен ли он, по наличию
//! autodiff у бэкенда. Здесь режим передается явно в каждый вызов.

use burn::{
    module::Module,
    tensor::{backend::Backend, Distribution, Tensor},
};
use serde::{Deserialize, Serialize};

/// Режим прямого прохода.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    /// Обучение: дропаут активен.
    Train,
    /// Инференс: дропаут отключен.
    Eval,
}

impl Mode {
    /// `true` для [`Mode::Train`].
    #[must_use]
    pub const fn is_train(self) -> bool {
        matches!(self, Self::Train)
    }
}

/// Дропаут с явным режимом.
#[derive(Module, Clone, Debug)]
pub struct Dropout {
    /// Вероятность обнуления элемента.
    pub prob: f64,
}

impl Dropout {
    /// Создает дропаут с вероятностью `prob`.
    #[must_use]
    pub const fn new(prob: f64) -> Self {
        Self { prob }
    }

    /// Применяет дропаут в режиме обучения; в режиме инференса возвращает вход без изменений.
    ///
    /// Сохраненные элементы масштабируются на `1 / (1 - prob)`.
    pub fn forward<B: Backend, const D: usize>(&self, input: Tensor<B, D>, mode: Mode) -> Tensor<B, D> {
        if !mode.is_train() || self.prob == 0.0 {
            return input;
        }
        let keep = 1.0 - self.prob;
        let keep_mask = input.random_like(Distribution::Bernoulli(keep));
        input.mul(keep_mask).div_scalar(keep)
    }
}
