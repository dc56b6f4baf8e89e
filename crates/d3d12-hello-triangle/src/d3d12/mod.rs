//! The hello-triangle sample on Direct3D 12, with DXR acceleration structures.

pub mod acceleration_structures;
pub mod adapter;
pub mod check_raytracing_support;
pub mod compile_shader;
pub mod create_buffer;
pub mod create_device;
pub mod create_pipeline_state;
pub mod create_root_signature;
pub mod create_vertex_buffer;
pub mod debug_messages;
pub mod fence;
pub mod load_assets;
pub mod load_pipeline;
pub mod populate_command_list;
pub mod transition_barrier;

use tracing::error;
use tracing::info;
use windows::Win32::Foundation::HWND;
use windows::Win32::Graphics::Direct3D12::*;
use windows::Win32::Graphics::Dxgi::Common::*;
use windows::Win32::Graphics::Dxgi::*;
use windows::core::Interface;

use crate::config::SampleArgs;
use crate::error::SampleResult;
use crate::render_mode::RenderMode;
use crate::sample::DxSample;
use crate::sample::SampleBase;
use acceleration_structures::AccelerationStructures;
use acceleration_structures::create_acceleration_structures;
use check_raytracing_support::check_raytracing_support;
use create_device::create_device;
use debug_messages::log_dxgi_debug_messages;
use load_assets::Assets;
use load_assets::load_assets;
use load_pipeline::Pipeline;
use load_pipeline::load_pipeline;
use populate_command_list::populate_command_list;

pub const FRAME_COUNT: usize = 2;
pub const RENDER_TARGET_FORMAT: DXGI_FORMAT = DXGI_FORMAT_R8G8B8A8_UNORM;

struct Resources {
    pipeline: Pipeline,
    assets: Assets,
    // Held for the raytracing pass; the raster path never reads them.
    #[allow(dead_code)]
    acceleration_structures: AccelerationStructures,
}

pub struct HelloTriangle {
    base: SampleBase,
    args: SampleArgs,
    mode: RenderMode,
    info_queue: Option<IDXGIInfoQueue>,
    resources: Option<Resources>,
}

impl HelloTriangle {
    /// Records the window parameters only; GPU objects are created in `on_init`.
    pub fn new(width: u32, height: u32, title: impl Into<String>, args: &SampleArgs) -> Self {
        Self {
            base: SampleBase::new(width, height, title, args.warp),
            args: args.clone(),
            mode: RenderMode::default(),
            info_queue: None,
            resources: None,
        }
    }

    fn wait_for_previous_frame(resources: &mut Resources) -> SampleResult<()> {
        // Each frame waits for the previous one; CPU and GPU never overlap.
        let pipeline = &mut resources.pipeline;
        resources.assets.fence.wait_for_gpu(&pipeline.command_queue)?;
        pipeline.frame_index = unsafe { pipeline.swap_chain.GetCurrentBackBufferIndex() };
        Ok(())
    }
}

impl DxSample for HelloTriangle {
    fn base(&self) -> &SampleBase {
        &self.base
    }

    fn on_init(&mut self, hwnd: HWND) -> SampleResult<()> {
        let context = create_device(&self.args)?;
        self.info_queue = context.info_queue.clone();

        let pipeline = load_pipeline(&context, &self.base, hwnd)?;
        check_raytracing_support(&pipeline.device)?;
        let mut assets = load_assets(&pipeline, self.base.aspect_ratio())?;
        let acceleration_structures = create_acceleration_structures(&pipeline, &mut assets)?;

        let mut resources = Resources {
            pipeline,
            assets,
            acceleration_structures,
        };
        Self::wait_for_previous_frame(&mut resources)?;
        self.resources = Some(resources);

        info!(title = self.base.title(), "sample initialised");
        Ok(())
    }

    fn on_render(&mut self) -> SampleResult<()> {
        let Some(resources) = &mut self.resources else {
            return Ok(());
        };

        populate_command_list(&resources.pipeline, &resources.assets, self.mode)?;

        let command_lists = [Some(resources.assets.command_list.cast::<ID3D12CommandList>()?)];
        unsafe {
            resources
                .pipeline
                .command_queue
                .ExecuteCommandLists(&command_lists)
        };

        unsafe { resources.pipeline.swap_chain.Present(1, DXGI_PRESENT(0)) }.ok()?;

        Self::wait_for_previous_frame(resources)
    }

    fn on_destroy(&mut self) {
        if let Some(mut resources) = self.resources.take() {
            // The GPU must be done with everything about to be released.
            if let Err(e) = Self::wait_for_previous_frame(&mut resources) {
                error!("waiting for the GPU on destroy: {e:?}");
            }
            if let Err(e) = resources.assets.fence.close() {
                error!("closing the fence event: {e:?}");
            }
        }
    }

    fn on_key_up(&mut self, key: u8) {
        if self.mode.handle_key_up(key) {
            info!(mode = ?self.mode, "render mode toggled");
        }
    }

    fn report_debug_messages(&self) {
        log_dxgi_debug_messages(self.info_queue.as_ref());
    }
}
