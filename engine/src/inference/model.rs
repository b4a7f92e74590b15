use log::info;
use ndarray::Array4;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, TryLockError};
use std::thread;
use std::time::{Duration, Instant};

use tch::{CModule, Device, Kind, Tensor};

use crate::error::{InferenceError, ModelError};

/// The validator was trained at 128x128, the risk model at 224x224. Each
/// geometry is wired to its model handle here and nowhere else.
pub const VALIDATOR_INPUT_SIZE: (u32, u32) = (128, 128);
pub const RISK_INPUT_SIZE: (u32, u32) = (224, 224);

const LOCK_POLL_INTERVAL: Duration = Duration::from_millis(25);

/// A binary classifier producing a scalar score in [0,1] for a normalized
/// singleton-batch image tensor of its own fixed input geometry.
pub trait Classifier: Send + Sync {
    /// (width, height) the model expects.
    fn input_size(&self) -> (u32, u32);

    fn score(&self, input: &Array4<f32>) -> Result<f32, InferenceError>;
}

/// TorchScript-backed classifier. The module is not safe for concurrent
/// forward passes, so every call goes through a mutex with a bounded wait.
pub struct TorchClassifier {
    module: Mutex<CModule>,
    input_size: (u32, u32),
    lock_timeout: Duration,
}

impl TorchClassifier {
    pub fn load(
        path: &Path,
        input_size: (u32, u32),
        lock_timeout: Duration,
    ) -> Result<Self, ModelError> {
        let device = Device::cuda_if_available();
        let module =
            CModule::load_on_device(path, device).map_err(|source| ModelError::Load {
                path: path.to_path_buf(),
                source,
            })?;
        info!(
            "loaded TorchScript module {} ({}x{} input) on {:?}",
            path.display(),
            input_size.0,
            input_size.1,
            device
        );
        Ok(Self {
            module: Mutex::new(module),
            input_size,
            lock_timeout,
        })
    }

    fn lock_module(&self) -> Result<MutexGuard<'_, CModule>, InferenceError> {
        let deadline = Instant::now() + self.lock_timeout;
        loop {
            match self.module.try_lock() {
                Ok(guard) => return Ok(guard),
                Err(TryLockError::Poisoned(_)) => return Err(InferenceError::Poisoned),
                Err(TryLockError::WouldBlock) => {
                    if Instant::now() >= deadline {
                        return Err(InferenceError::Busy(self.lock_timeout));
                    }
                    thread::sleep(LOCK_POLL_INTERVAL);
                }
            }
        }
    }
}

impl Classifier for TorchClassifier {
    fn input_size(&self) -> (u32, u32) {
        self.input_size
    }

    fn score(&self, input: &Array4<f32>) -> Result<f32, InferenceError> {
        let (_, height, width, channels) = input.dim();
        let (want_width, want_height) = self.input_size;
        if width != want_width as usize || height != want_height as usize {
            return Err(InferenceError::Geometry {
                got_width: width,
                got_height: height,
                want_width,
                want_height,
            });
        }

        let data: Vec<f32> = input.iter().copied().collect();
        // The loader emits NHWC; torch modules take NCHW.
        let tensor = Tensor::from_slice(&data)
            .reshape([1, height as i64, width as i64, channels as i64])
            .permute([0, 3, 1, 2]);

        let module = self.lock_module()?;
        let output = tch::no_grad(|| module.forward_ts(&[tensor]))?;
        drop(module);

        let flat = output.to_kind(Kind::Float).view([-1]);
        let numel = flat.size()[0] as usize;
        if numel == 0 {
            return Err(InferenceError::EmptyOutput);
        }
        let mut values = vec![0.0f32; numel];
        flat.copy_data(&mut values, numel);
        Ok(values[0].clamp(0.0, 1.0))
    }
}
