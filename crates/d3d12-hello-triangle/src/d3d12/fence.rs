use tracing::error;
use tracing::trace;
use windows::Win32::Foundation::*;
use windows::Win32::Graphics::Direct3D12::*;
use windows::Win32::System::Threading::*;

use crate::error::SampleResult;
use crate::frame_sync::FenceTracker;

/// Auto-reset event the fence signals on completion. Closed on drop.
pub struct FenceEvent {
    handle: HANDLE,
}

impl FenceEvent {
    pub fn new() -> SampleResult<Self> {
        let handle = unsafe { CreateEventW(None, false, false, None) }?;
        Ok(Self { handle })
    }

    pub fn handle(&self) -> HANDLE {
        self.handle
    }

    pub fn close(&mut self) -> SampleResult<()> {
        if !self.handle.is_invalid() {
            let handle = std::mem::take(&mut self.handle);
            unsafe { CloseHandle(handle) }?;
        }
        Ok(())
    }
}

impl Drop for FenceEvent {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            error!("closing the fence event: {e:?}");
        }
    }
}

/// The fence, its completion event and the CPU-side counter.
pub struct FrameFence {
    fence: ID3D12Fence,
    event: FenceEvent,
    tracker: FenceTracker,
}

impl FrameFence {
    pub fn new(device: &ID3D12Device5) -> SampleResult<Self> {
        let fence = unsafe { device.CreateFence(0, D3D12_FENCE_FLAG_NONE) }?;
        let event = FenceEvent::new()?;
        Ok(Self {
            fence,
            event,
            tracker: FenceTracker::new(),
        })
    }

    /// Signals the next fence value on `queue` and blocks until the GPU reaches it.
    pub fn wait_for_gpu(&mut self, queue: &ID3D12CommandQueue) -> SampleResult<()> {
        let value = self.tracker.next_signal();
        unsafe { queue.Signal(&self.fence, value) }?;

        let completed = unsafe { self.fence.GetCompletedValue() };
        if FenceTracker::must_wait(completed, value) {
            trace!(completed, value, "waiting for fence");
            unsafe {
                self.fence
                    .SetEventOnCompletion(value, self.event.handle())?;
                WaitForSingleObject(self.event.handle(), INFINITE);
            }
        }
        Ok(())
    }

    pub fn close(&mut self) -> SampleResult<()> {
        self.event.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_open(handle: HANDLE) -> bool {
        let mut flags = 0;
        unsafe { GetHandleInformation(handle, &mut flags) }.is_ok()
    }

    #[test]
    fn dropping_the_event_closes_its_handle() {
        let event = FenceEvent::new().unwrap();
        let handle = event.handle();
        assert!(is_open(handle));
        drop(event);
        assert!(!is_open(handle));
    }

    #[test]
    fn closing_twice_is_harmless() {
        let mut event = FenceEvent::new().unwrap();
        event.close().unwrap();
        assert!(event.handle().is_invalid());
        event.close().unwrap();
    }
}
