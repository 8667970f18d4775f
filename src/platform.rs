//! Interface boundary to the platform front-end.
//!
//! The core never touches the screen, the pasteboard, or real pixels. The
//! front-end captures the desktop, watches the drag pasteboard, and resolves
//! drop previews; everything crosses this boundary as opaque handles and
//! timestamped events. [`apply_event`] is the thin wiring a front-end calls
//! from its input callbacks.

use glam::DVec2;
use instant::Instant;
use smallvec::SmallVec;
use std::path::{Path, PathBuf};

use crate::controller::DropController;

/// Cheap opaque handle to a renderer-owned raster.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageHandle {
    /// Generic document icon, used when no preview resolves.
    GenericIcon,
    /// A texture the renderer uploaded and owns.
    Texture(u64),
}

/// Point-in-time raster of the desktop. Best-effort: failure yields no
/// background rather than an error.
pub trait ScreenCapture {
    fn capture_background(&mut self) -> Option<ImageHandle>;
}

/// Turns a dropped file reference into a small preview image.
pub trait PreviewResolver {
    fn resolve_preview(&mut self, file: &Path) -> Option<ImageHandle>;

    /// Preview with the generic-icon failover.
    fn resolve_preview_or_icon(&mut self, file: &Path) -> ImageHandle {
        self.resolve_preview(file)
            .unwrap_or(ImageHandle::GenericIcon)
    }
}

/// Drag notifications as delivered by the input monitor. Drags are only
/// reported when the pasteboard carries at least one file reference.
#[derive(Clone, Debug)]
pub enum DragEvent {
    Started,
    Released,
    Dropped {
        location: DVec2,
        files: SmallVec<[PathBuf; 1]>,
    },
}

/// Forward one input event into the controller, resolving platform resources
/// on the way: the backdrop is captured when a drag actually opens the disc,
/// and the drop preview is resolved (with icon failover inside the
/// controller) before the spiral starts.
pub fn apply_event<P>(controller: &mut DropController, now: f64, event: DragEvent, platform: &mut P)
where
    P: ScreenCapture + PreviewResolver,
{
    match event {
        DragEvent::Started => {
            if controller.drag_started(now) {
                controller.set_background(platform.capture_background());
            }
        }
        DragEvent::Released => controller.drag_released(now),
        DragEvent::Dropped { location, files } => {
            let Some(first) = files.first() else {
                log::debug!("ignoring drop without a file payload");
                return;
            };
            let image = platform.resolve_preview(first);
            controller.drop_received(now, location, image);
        }
    }
}

/// Monotonic clock producing the `f64`-seconds timestamps the core runs on.
pub struct FrameClock {
    origin: Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    pub fn now_sec(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
