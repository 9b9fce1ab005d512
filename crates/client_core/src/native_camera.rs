//! Camera backend for attached video devices, built on `nokhwa`.

use nokhwa::{
    pixel_format::RgbFormat,
    query,
    utils::{ApiBackend, CameraIndex, CameraInfo, RequestedFormat, RequestedFormatType},
    Camera,
};

use crate::{
    capture::{CameraBackend, CameraStream, FacingPreference, RgbFrame},
    error::StagingError,
};

const REAR_HINTS: &[&str] = &["back", "rear", "environment", "world"];
const FRONT_HINTS: &[&str] = &["front", "user", "facetime", "integrated"];

#[derive(Debug, Default, Clone, Copy)]
pub struct NativeCamera;

fn device_error(context: &str, err: impl std::fmt::Display) -> StagingError {
    StagingError::DeviceAccess(format!("{context}: {err}"))
}

fn pick_device(devices: &[CameraInfo], facing: FacingPreference) -> Option<CameraIndex> {
    let hints: &[&str] = match facing {
        FacingPreference::Environment => REAR_HINTS,
        FacingPreference::User => FRONT_HINTS,
        FacingPreference::Any => &[],
    };
    devices
        .iter()
        .find(|info| {
            let name = info.human_name().to_ascii_lowercase();
            hints.iter().any(|hint| name.contains(hint))
        })
        .or_else(|| devices.first())
        .map(|info| info.index().clone())
}

impl CameraBackend for NativeCamera {
    fn open(&mut self, facing: FacingPreference) -> Result<Box<dyn CameraStream>, StagingError> {
        let devices =
            query(ApiBackend::Auto).map_err(|err| device_error("camera query failed", err))?;
        let index = pick_device(&devices, facing).ok_or_else(|| {
            StagingError::DeviceAccess("no video input device found".to_string())
        })?;

        let format =
            RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestResolution);
        let mut camera = Camera::new(index.clone(), format)
            .map_err(|err| device_error("camera open failed", err))?;
        camera
            .open_stream()
            .map_err(|err| device_error("camera stream failed to start", err))?;
        tracing::info!(device = %index, "opened native camera");
        Ok(Box::new(NativeStream { camera }))
    }
}

struct NativeStream {
    camera: Camera,
}

impl CameraStream for NativeStream {
    fn next_frame(&mut self) -> Result<RgbFrame, StagingError> {
        let buffer = self
            .camera
            .frame()
            .map_err(|err| device_error("camera frame unavailable", err))?;
        let decoded = buffer
            .decode_image::<RgbFormat>()
            .map_err(|err| device_error("camera frame decode failed", err))?;
        let (width, height) = (decoded.width(), decoded.height());
        Ok(RgbFrame {
            width,
            height,
            rgb: decoded.into_raw(),
        })
    }

    fn stop(&mut self) {
        if let Err(err) = self.camera.stop_stream() {
            tracing::warn!("failed to stop camera stream: {err}");
        }
    }
}
