//! Photo capture.
//!
//! [`Camera`] drives a [`CameraDevice`] through a small state machine:
//!
//! ```text
//! Idle --start--> Previewing --capture--> Captured
//!  ^                  |                      |
//!  +-----cancel-------+                      |
//!  +-----------------reset-------------------+
//! Captured --retake--> Previewing
//! ```
//!
//! Acquiring the device is the only operation that waits. A failed
//! acquisition leaves the camera idle and is reported to the caller; it is
//! never retried automatically.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::photo::{Photo, DEFAULT_MIME};

/// Which way the requested camera faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    /// The rear camera, pointed at the monitor.
    #[default]
    Environment,
    /// The front camera.
    User,
}

impl std::fmt::Display for Facing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Environment => write!(f, "environment"),
            Self::User => write!(f, "user"),
        }
    }
}

/// A single still image sampled from a device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// MIME type of `data`.
    pub mime: String,
    /// Encoded image bytes.
    pub data: Vec<u8>,
}

/// A video device that can be acquired, sampled and released.
#[async_trait]
pub trait CameraDevice: Send {
    /// Name of the device (for logging and errors).
    fn name(&self) -> &'static str;

    /// Request access to the device and start its frame source.
    ///
    /// # Errors
    ///
    /// Returns an error if access is denied or the device is unavailable.
    async fn acquire(&mut self, facing: Facing) -> Result<()>;

    /// Sample the current frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the device has not been acquired.
    fn capture_frame(&mut self) -> Result<Frame>;

    /// Stop the frame source and give the device back.
    fn release(&mut self);
}

/// State of a [`Camera`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraState {
    /// No device held, no photo.
    Idle,
    /// Device held, showing a live feed.
    Previewing,
    /// Device released, one photo taken.
    Captured(Photo),
}

impl CameraState {
    fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Previewing => "previewing",
            Self::Captured(_) => "captured",
        }
    }
}

/// Photo capture state machine over a [`CameraDevice`].
#[derive(Debug)]
pub struct Camera<D> {
    device: D,
    facing: Facing,
    state: CameraState,
}

impl<D: CameraDevice> Camera<D> {
    /// Create an idle camera that will request the rear-facing device.
    #[must_use]
    pub fn new(device: D) -> Self {
        Self {
            device,
            facing: Facing::Environment,
            state: CameraState::Idle,
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> &CameraState {
        &self.state
    }

    /// The captured photo, if any.
    #[must_use]
    pub fn photo(&self) -> Option<&Photo> {
        match &self.state {
            CameraState::Captured(photo) => Some(photo),
            _ => None,
        }
    }

    /// Acquire the device and start previewing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CameraState`] unless idle, or the device's error if
    /// it cannot be acquired. The camera stays idle on failure.
    pub async fn start(&mut self) -> Result<()> {
        self.expect_state("idle", matches!(self.state, CameraState::Idle))?;

        self.device.acquire(self.facing).await?;
        debug!("Camera {} previewing", self.device.name());
        self.state = CameraState::Previewing;
        Ok(())
    }

    /// Take one frame, encode it and release the device.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CameraState`] unless previewing, or the device's
    /// error if the frame cannot be read. The device is released either way.
    pub fn capture(&mut self) -> Result<Photo> {
        self.expect_state("previewing", matches!(self.state, CameraState::Previewing))?;

        let frame = self.device.capture_frame();
        self.device.release();
        let frame = match frame {
            Ok(frame) => frame,
            Err(e) => {
                self.state = CameraState::Idle;
                return Err(e);
            }
        };

        let mime = if frame.mime.is_empty() {
            DEFAULT_MIME
        } else {
            frame.mime.as_str()
        };
        let photo = Photo::encode(mime, &frame.data);
        info!(
            "Captured photo from {} ({} bytes)",
            self.device.name(),
            frame.data.len()
        );
        self.state = CameraState::Captured(photo.clone());
        Ok(photo)
    }

    /// Stop previewing without taking a photo.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CameraState`] unless previewing.
    pub fn cancel(&mut self) -> Result<()> {
        self.expect_state("previewing", matches!(self.state, CameraState::Previewing))?;

        self.device.release();
        debug!("Camera {} cancelled", self.device.name());
        self.state = CameraState::Idle;
        Ok(())
    }

    /// Discard the captured photo and start previewing again.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CameraState`] unless a photo was captured, or the
    /// device's error if it cannot be re-acquired. The photo is discarded
    /// before acquisition, so a failure leaves the camera idle.
    pub async fn retake(&mut self) -> Result<()> {
        self.expect_state("captured", matches!(self.state, CameraState::Captured(_)))?;

        self.state = CameraState::Idle;
        self.start().await
    }

    /// Return to idle from any state, releasing the device if held and
    /// dropping any photo.
    pub fn reset(&mut self) {
        if self.state == CameraState::Previewing {
            self.device.release();
        }
        self.state = CameraState::Idle;
    }

    fn expect_state(&self, expected: &'static str, ok: bool) -> Result<()> {
        if ok {
            Ok(())
        } else {
            Err(Error::CameraState {
                expected,
                actual: self.state.name(),
            })
        }
    }
}

/// A device backed by a still image on disk.
///
/// Acquiring reads the file; capturing returns its bytes. It stands in for a
/// live camera when photos are taken with another app.
#[derive(Debug, Clone)]
pub struct FileCamera {
    path: PathBuf,
    frame: Option<Frame>,
}

impl FileCamera {
    /// Create a device serving the image at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            frame: None,
        }
    }

    /// Path of the image file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Guess an image MIME type from a file extension.
#[must_use]
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("heic") => "image/heic",
        _ => DEFAULT_MIME,
    }
}

#[async_trait]
impl CameraDevice for FileCamera {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn acquire(&mut self, facing: Facing) -> Result<()> {
        debug!(
            "Reading {} as {} camera frame",
            self.path.display(),
            facing
        );
        let data = tokio::fs::read(&self.path).await.map_err(|e| {
            Error::camera_unavailable(self.name(), format!("{}: {e}", self.path.display()))
        })?;
        self.frame = Some(Frame {
            mime: mime_for_path(&self.path).to_string(),
            data,
        });
        Ok(())
    }

    fn capture_frame(&mut self) -> Result<Frame> {
        self.frame.clone().ok_or(Error::CameraState {
            expected: "previewing",
            actual: "idle",
        })
    }

    fn release(&mut self) {
        self.frame = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Device that counts calls and can be told to refuse access.
    #[derive(Debug, Default)]
    struct MockDevice {
        deny: bool,
        held: bool,
        acquires: usize,
        releases: usize,
        last_facing: Option<Facing>,
    }

    #[async_trait]
    impl CameraDevice for MockDevice {
        fn name(&self) -> &'static str {
            "mock"
        }

        async fn acquire(&mut self, facing: Facing) -> Result<()> {
            self.last_facing = Some(facing);
            if self.deny {
                return Err(Error::camera_unavailable("mock", "permission denied"));
            }
            self.acquires += 1;
            self.held = true;
            Ok(())
        }

        fn capture_frame(&mut self) -> Result<Frame> {
            Ok(Frame {
                mime: "image/jpeg".to_string(),
                data: vec![0xff, 0xd8, u8::try_from(self.acquires).unwrap()],
            })
        }

        fn release(&mut self) {
            self.held = false;
            self.releases += 1;
        }
    }

    #[tokio::test]
    async fn test_start_capture_releases() {
        let mut camera = Camera::new(MockDevice::default());
        assert_eq!(camera.state(), &CameraState::Idle);

        camera.start().await.unwrap();
        assert_eq!(camera.state(), &CameraState::Previewing);
        assert!(camera.device.held);
        assert_eq!(camera.device.last_facing, Some(Facing::Environment));

        let photo = camera.capture().unwrap();
        assert_eq!(photo.mime(), Some("image/jpeg"));
        assert!(!camera.device.held);
        assert_eq!(camera.photo(), Some(&photo));
    }

    #[tokio::test]
    async fn test_denied_access_leaves_idle() {
        let mut camera = Camera::new(MockDevice {
            deny: true,
            ..MockDevice::default()
        });
        let err = camera.start().await.unwrap_err();
        assert!(err.is_camera_error());
        assert_eq!(camera.state(), &CameraState::Idle);
    }

    #[tokio::test]
    async fn test_cancel_releases_without_photo() {
        let mut camera = Camera::new(MockDevice::default());
        camera.start().await.unwrap();
        camera.cancel().unwrap();
        assert_eq!(camera.state(), &CameraState::Idle);
        assert_eq!(camera.device.releases, 1);
        assert!(camera.photo().is_none());
    }

    #[tokio::test]
    async fn test_retake_replaces_photo() {
        let mut camera = Camera::new(MockDevice::default());
        camera.start().await.unwrap();
        let first = camera.capture().unwrap();

        camera.retake().await.unwrap();
        assert_eq!(camera.state(), &CameraState::Previewing);
        let second = camera.capture().unwrap();
        assert_ne!(first, second);
        assert_eq!(camera.photo(), Some(&second));
    }

    #[tokio::test]
    async fn test_invalid_transitions() {
        let mut camera = Camera::new(MockDevice::default());
        assert!(matches!(
            camera.capture(),
            Err(Error::CameraState { expected: "previewing", actual: "idle" })
        ));
        assert!(camera.cancel().is_err());
        assert!(camera.retake().await.is_err());

        camera.start().await.unwrap();
        assert!(camera.start().await.is_err());
    }

    #[tokio::test]
    async fn test_reset_from_previewing_releases() {
        let mut camera = Camera::new(MockDevice::default());
        camera.start().await.unwrap();
        camera.reset();
        assert_eq!(camera.state(), &CameraState::Idle);
        assert!(!camera.device.held);
    }

    #[tokio::test]
    async fn test_file_camera_reads_image() {
        let path = std::env::temp_dir().join(format!("bplog_camera_{}.png", std::process::id()));
        std::fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();

        let mut camera = Camera::new(FileCamera::new(&path));
        camera.start().await.unwrap();
        let photo = camera.capture().unwrap();
        assert_eq!(photo.mime(), Some("image/png"));
        assert_eq!(photo.decode(), Some(vec![0x89, b'P', b'N', b'G']));

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_file_camera_missing_file() {
        let mut camera = Camera::new(FileCamera::new("/nonexistent/bplog/photo.jpg"));
        let err = camera.start().await.unwrap_err();
        assert!(matches!(err, Error::CameraUnavailable { device: "file", .. }));
        assert_eq!(camera.state(), &CameraState::Idle);
    }

    #[test]
    fn test_mime_for_path() {
        assert_eq!(mime_for_path(Path::new("a.PNG")), "image/png");
        assert_eq!(mime_for_path(Path::new("a.jpg")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("noext")), "image/jpeg");
    }

    #[test]
    fn test_facing_display() {
        assert_eq!(Facing::Environment.to_string(), "environment");
        assert_eq!(Facing::User.to_string(), "user");
    }
}
