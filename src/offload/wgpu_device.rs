//! wgpu-backed compute device.
//!
//! Cells are stored as one `u32` per cell on the device since WGSL storage
//! arrays have no byte element type. Every host call that touches the GPU is
//! wrapped in a validation error scope so failures come back as errors
//! instead of panics from the default uncaptured-error handler.

use std::borrow::Cow;

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use super::device::{ComputeDevice, DeviceSelector};
use super::shader::{ENTRY_POINT, LIFE_SHADER, WORKGROUP_SIZE};
use crate::error::{LifeError, Result};
use crate::topology::Grid;

/// Platform list indexed by [`DeviceSelector::platform`].
const PLATFORMS: [(wgpu::Backends, &str); 4] = [
    (wgpu::Backends::VULKAN, "Vulkan"),
    (wgpu::Backends::METAL, "Metal"),
    (wgpu::Backends::DX12, "DX12"),
    (wgpu::Backends::GL, "GL"),
];

const CELL_BYTES: u64 = std::mem::size_of::<u32>() as u64;

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
struct Params {
    width: u32,
    height: u32,
    total: u32,
    /// Invocations per dispatch row (`groups_x * WORKGROUP_SIZE`).
    row_pitch: u32,
}

/// Device-resident cell buffer.
pub struct WgpuBuffer {
    buffer: wgpu::Buffer,
    cells: usize,
}

impl WgpuBuffer {
    pub fn cells(&self) -> usize {
        self.cells
    }
}

/// Adapter summary used when listing platforms and devices.
#[derive(Clone, Debug)]
pub struct AdapterSummary {
    pub platform: usize,
    pub device: usize,
    pub name: String,
    pub backend: wgpu::Backend,
    pub device_type: wgpu::DeviceType,
}

pub struct WgpuDevice {
    device: wgpu::Device,
    queue: wgpu::Queue,
    pipeline: wgpu::ComputePipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    params_buffer: wgpu::Buffer,
    info: wgpu::AdapterInfo,
}

/// Every adapter reachable through the platform list, with the selector
/// indices that open it.
pub fn enumerate_adapters() -> Vec<AdapterSummary> {
    let mut out = Vec::new();
    for (platform, &(backends, _)) in PLATFORMS.iter().enumerate() {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends,
            ..Default::default()
        });
        for (device, adapter) in instance.enumerate_adapters(backends).into_iter().enumerate() {
            let info = adapter.get_info();
            out.push(AdapterSummary {
                platform,
                device,
                name: info.name,
                backend: info.backend,
                device_type: info.device_type,
            });
        }
    }
    out
}

impl WgpuDevice {
    pub fn open(selector: DeviceSelector) -> Result<Self> {
        pollster::block_on(Self::open_async(selector))
    }

    async fn open_async(selector: DeviceSelector) -> Result<Self> {
        let &(backends, platform_name) = PLATFORMS.get(selector.platform).ok_or_else(|| {
            LifeError::DeviceUnavailable(format!(
                "platform {} not available ({} known)",
                selector.platform,
                PLATFORMS.len()
            ))
        })?;

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends,
            ..Default::default()
        });
        let mut adapters = instance.enumerate_adapters(backends);
        if selector.device >= adapters.len() {
            return Err(LifeError::DeviceUnavailable(format!(
                "device {} not available on platform {platform_name} ({} found)",
                selector.device,
                adapters.len()
            )));
        }
        let adapter = adapters.swap_remove(selector.device);
        let info = adapter.get_info();

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("life device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: adapter.limits(),
                },
                None,
            )
            .await
            .map_err(|e| LifeError::DeviceUnavailable(format!("{}: {e}", info.name)))?;

        tracing::info!(
            platform = platform_name,
            "using device: {} ({:?})",
            info.name,
            info.device_type
        );

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("life kernel"),
            source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(LIFE_SHADER)),
        });

        let storage_entry = |binding: u32, read_only: bool| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::COMPUTE,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Storage { read_only },
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("life bind group layout"),
            entries: &[
                storage_entry(0, true),
                storage_entry(1, false),
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("life pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("life pipeline"),
            layout: Some(&pipeline_layout),
            module: &shader,
            entry_point: ENTRY_POINT,
            compilation_options: Default::default(),
        });

        if let Some(err) = device.pop_error_scope().await {
            return Err(LifeError::KernelBuildFailure(err.to_string()));
        }

        let params_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("life params"),
            size: std::mem::size_of::<Params>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Ok(Self {
            device,
            queue,
            pipeline,
            bind_group_layout,
            params_buffer,
            info,
        })
    }

    pub fn info(&self) -> &wgpu::AdapterInfo {
        &self.info
    }

    fn check_capacity(&self, cells: usize) -> Result<u64> {
        let limits = self.device.limits();
        let bytes = (cells as u64).saturating_mul(CELL_BYTES);
        let max = (limits.max_storage_buffer_binding_size as u64).min(limits.max_buffer_size);
        if cells > i32::MAX as usize || bytes > max {
            return Err(LifeError::DeviceUnavailable(format!(
                "{} cannot hold {cells} cells ({bytes} bytes, limit {max})",
                self.info.name
            )));
        }
        Ok(bytes)
    }

    fn storage_usage() -> wgpu::BufferUsages {
        wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC | wgpu::BufferUsages::COPY_DST
    }
}

impl ComputeDevice for WgpuDevice {
    type Buffer = WgpuBuffer;

    fn describe(&self) -> String {
        format!("{} ({:?})", self.info.name, self.info.backend)
    }

    fn upload(&mut self, cells: &[u8]) -> Result<WgpuBuffer> {
        self.check_capacity(cells.len())?;
        let words: Vec<u32> = cells.iter().map(|&c| (c != 0) as u32).collect();
        let buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("life cells"),
                contents: bytemuck::cast_slice(&words),
                usage: Self::storage_usage(),
            });
        Ok(WgpuBuffer {
            buffer,
            cells: cells.len(),
        })
    }

    fn allocate(&mut self, cells: usize) -> Result<WgpuBuffer> {
        let size = self.check_capacity(cells)?;
        let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("life scratch"),
            size,
            usage: Self::storage_usage(),
            mapped_at_creation: false,
        });
        Ok(WgpuBuffer { buffer, cells })
    }

    fn dispatch(&mut self, current: &WgpuBuffer, scratch: &WgpuBuffer, grid: Grid) -> Result<()> {
        let total = grid.total() as u32;
        let groups = total.div_ceil(WORKGROUP_SIZE);
        let max_per_dim = self.device.limits().max_compute_workgroups_per_dimension.max(1);
        let groups_x = groups.clamp(1, max_per_dim);
        let groups_y = groups.div_ceil(groups_x).max(1);

        let params = Params {
            width: grid.width() as u32,
            height: grid.height() as u32,
            total,
            row_pitch: groups_x * WORKGROUP_SIZE,
        };
        self.queue
            .write_buffer(&self.params_buffer, 0, bytemuck::bytes_of(&params));

        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("life bind group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: current.buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: scratch.buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: self.params_buffer.as_entire_binding(),
                },
            ],
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("life generation"),
            });
        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("life pass"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &bind_group, &[]);
            pass.dispatch_workgroups(groups_x, groups_y, 1);
        }
        self.queue.submit(Some(encoder.finish()));

        match pollster::block_on(self.device.pop_error_scope()) {
            Some(err) => Err(LifeError::DispatchFailed(err.to_string())),
            None => Ok(()),
        }
    }

    fn finish(&mut self) -> Result<()> {
        self.device.poll(wgpu::Maintain::Wait);
        Ok(())
    }

    fn download(&mut self, buffer: &WgpuBuffer, cells: usize) -> Result<Vec<u8>> {
        let cells = cells.min(buffer.cells);
        let size = cells as u64 * CELL_BYTES;
        let staging = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("life readback"),
            size,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("life readback"),
            });
        encoder.copy_buffer_to_buffer(&buffer.buffer, 0, &staging, 0, size);
        self.queue.submit(Some(encoder.finish()));

        let slice = staging.slice(..size);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        self.device.poll(wgpu::Maintain::Wait);
        rx.recv()
            .map_err(|_| LifeError::Readback("map callback dropped".to_string()))?
            .map_err(|e| LifeError::Readback(e.to_string()))?;

        let states = {
            let data = slice.get_mapped_range();
            let words: &[u32] = bytemuck::cast_slice(&data[..]);
            words.iter().map(|&w| (w != 0) as u8).collect()
        };
        staging.unmap();
        Ok(states)
    }
}
