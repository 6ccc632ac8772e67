use burn::backend::ndarray::NdArrayDevice;
use burn::backend::wgpu::WgpuDevice;
use burn::backend::{NdArray, Wgpu};
use serde::Deserialize;

pub type GpuBackend = Wgpu<f32, i32>;
pub type CpuBackend = NdArray<f32>;

#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Wgpu,
    #[default]
    NdArray,
}

pub fn gpu_device() -> WgpuDevice {
    WgpuDevice::BestAvailable
}

pub fn cpu_device() -> NdArrayDevice {
    NdArrayDevice::Cpu
}
