use super::*;
use std::{cell::RefCell, rc::Rc};

use crate::{
    captured::{PreviewHandle, PreviewStore},
    workflow::{ImageChange, StagingWorkflow, WorkflowStatus},
};

#[derive(Default)]
struct CameraLog {
    opened: Vec<FacingPreference>,
    stops: u32,
}

struct TestStream {
    log: Rc<RefCell<CameraLog>>,
    frames: Vec<Result<RgbFrame, StagingError>>,
}

impl CameraStream for TestStream {
    fn next_frame(&mut self) -> Result<RgbFrame, StagingError> {
        if self.frames.len() > 1 {
            self.frames.remove(0)
        } else {
            self.frames
                .first()
                .cloned()
                .unwrap_or_else(|| Err(StagingError::DeviceAccess("no frames".to_string())))
        }
    }

    fn stop(&mut self) {
        self.log.borrow_mut().stops += 1;
    }
}

struct TestCamera {
    log: Rc<RefCell<CameraLog>>,
    deny: bool,
    frames: Vec<Result<RgbFrame, StagingError>>,
}

impl TestCamera {
    fn with_frames(frames: Vec<Result<RgbFrame, StagingError>>) -> Self {
        Self {
            log: Rc::new(RefCell::new(CameraLog::default())),
            deny: false,
            frames,
        }
    }

    fn working() -> Self {
        Self::with_frames(vec![Ok(solid_frame(4, 2))])
    }

    fn denied() -> Self {
        let mut camera = Self::working();
        camera.deny = true;
        camera
    }

    fn stops(&self) -> u32 {
        self.log.borrow().stops
    }
}

impl CameraBackend for TestCamera {
    fn open(&mut self, facing: FacingPreference) -> Result<Box<dyn CameraStream>, StagingError> {
        if self.deny {
            return Err(StagingError::DeviceAccess("permission denied".to_string()));
        }
        self.log.borrow_mut().opened.push(facing);
        Ok(Box::new(TestStream {
            log: self.log.clone(),
            frames: self.frames.clone(),
        }))
    }
}

fn solid_frame(width: u32, height: u32) -> RgbFrame {
    RgbFrame {
        width,
        height,
        rgb: [200u8, 120, 40].repeat((width * height) as usize),
    }
}

#[test]
fn opens_rear_camera_by_default() {
    let mut camera = TestCamera::working();
    let mut widget = CaptureWidget::default();

    widget.open_camera(&mut camera);

    assert!(widget.is_live());
    assert_eq!(camera.log.borrow().opened, vec![FacingPreference::Environment]);
}

#[test]
fn cancel_releases_stream_without_producing_image() {
    let mut camera = TestCamera::working();
    let mut widget = CaptureWidget::default();
    widget.open_camera(&mut camera);

    widget.cancel();

    assert!(!widget.is_open());
    assert_eq!(camera.stops(), 1);
    assert!(widget.take_photo().is_err());
    assert_eq!(camera.stops(), 1);
}

#[test]
fn take_photo_encodes_jpeg_and_releases_stream() {
    let mut camera = TestCamera::working();
    let mut widget = CaptureWidget::default();
    widget.open_camera(&mut camera);

    let photo = widget.take_photo().expect("photo");

    assert_eq!(photo.mime_type(), ImageMimeType::Jpeg);
    assert!(photo.file_name().starts_with("photo-"));
    assert!(photo.file_name().ends_with(".jpg"));
    assert_eq!(&photo.bytes()[..2], &[0xFF, 0xD8]);
    let decoded = image::load_from_memory(photo.bytes()).expect("valid jpeg");
    assert_eq!((decoded.width(), decoded.height()), (4, 2));
    assert!(!widget.is_open());
    assert_eq!(camera.stops(), 1);
}

#[test]
fn dropping_widget_releases_open_stream() {
    let mut camera = TestCamera::working();
    {
        let mut widget = CaptureWidget::default();
        widget.open_camera(&mut camera);
        assert_eq!(camera.stops(), 0);
    }
    assert_eq!(camera.stops(), 1);
}

#[test]
fn reopening_releases_previous_stream_first() {
    let mut camera = TestCamera::working();
    let mut widget = CaptureWidget::default();
    widget.open_camera(&mut camera);
    widget.open_camera(&mut camera);

    assert_eq!(camera.stops(), 1);
    widget.cancel();
    assert_eq!(camera.stops(), 2);
}

#[test]
fn denied_access_shows_message_and_holds_no_stream() {
    let mut camera = TestCamera::denied();
    let mut widget = CaptureWidget::default();

    widget.open_camera(&mut camera);

    assert!(widget.is_open());
    assert!(!widget.is_live());
    assert_eq!(widget.error_message(), Some(CAMERA_DENIED_MESSAGE));
    widget.cancel();
    assert!(!widget.is_open());
    assert_eq!(camera.stops(), 0);
}

#[test]
fn failed_capture_still_releases_stream() {
    let mut camera = TestCamera::with_frames(vec![Ok(RgbFrame {
        width: 3,
        height: 3,
        rgb: vec![0; 4],
    })]);
    let mut widget = CaptureWidget::default();
    widget.open_camera(&mut camera);

    let err = widget.take_photo().expect_err("bad frame");

    assert!(matches!(err, StagingError::Encoding(_)));
    assert_eq!(camera.stops(), 1);
    assert!(widget.error_message().is_some());
}

#[test]
fn disconnect_mid_session_closes_stream_and_reports() {
    let mut camera = TestCamera::with_frames(vec![
        Ok(solid_frame(2, 2)),
        Err(StagingError::DeviceAccess("device unplugged".to_string())),
    ]);
    let mut widget = CaptureWidget::default();
    widget.open_camera(&mut camera);

    assert!(widget.preview_frame().is_some());
    assert!(widget.preview_frame().is_none());

    assert!(!widget.is_live());
    assert_eq!(camera.stops(), 1);
    assert_eq!(
        widget.error_message(),
        Some("Camera disconnected: device unplugged")
    );
}

#[derive(Clone, Default)]
struct ReleaseLog {
    released: Rc<RefCell<Vec<PreviewHandle>>>,
}

impl PreviewStore for ReleaseLog {
    fn create(&mut self, _image: &CapturedImage) -> PreviewHandle {
        PreviewHandle::next()
    }

    fn release(&mut self, handle: PreviewHandle) {
        self.released.borrow_mut().push(handle);
    }
}

#[test]
fn cancelling_or_denied_camera_keeps_previous_photo() {
    let previews = ReleaseLog::default();
    let mut workflow = StagingWorkflow::new(previews.clone());
    let mut camera = TestCamera::working();
    let mut widget = CaptureWidget::default();

    widget.open_camera(&mut camera);
    let photo = widget.take_photo().expect("photo");
    let ImageChange::Accepted(handle) = workflow.replace_image(photo.clone()) else {
        panic!("photo should be accepted while idle");
    };
    assert_eq!(camera.stops(), 1);

    widget.open_camera(&mut camera);
    widget.cancel();

    assert_eq!(camera.stops(), 2);
    assert_eq!(workflow.image(), Some(&photo));
    assert_eq!(workflow.preview(), Some(handle));
    assert_eq!(workflow.status(), WorkflowStatus::AwaitingInput);
    assert!(previews.released.borrow().is_empty());

    camera.deny = true;
    widget.open_camera(&mut camera);
    assert_eq!(widget.error_message(), Some(CAMERA_DENIED_MESSAGE));
    widget.cancel();

    assert_eq!(camera.stops(), 2);
    assert_eq!(workflow.image(), Some(&photo));
    assert_eq!(workflow.preview(), Some(handle));
    assert_eq!(workflow.status(), WorkflowStatus::AwaitingInput);
    assert!(workflow.error().is_none());
    assert!(previews.released.borrow().is_empty());
}

#[test]
fn frame_validation_checks_buffer_length() {
    assert!(solid_frame(3, 2).validate().is_ok());
    let short = RgbFrame {
        width: 3,
        height: 2,
        rgb: vec![0; 5],
    };
    assert!(matches!(short.validate(), Err(StagingError::Encoding(_))));
}

#[test]
fn unavailable_backend_denies_access() {
    let mut widget = CaptureWidget::default();
    widget.open_camera(&mut UnavailableCamera);
    assert_eq!(widget.error_message(), Some(CAMERA_DENIED_MESSAGE));
}

#[test]
fn rgba_conversion_adds_opaque_alpha() {
    let frame = solid_frame(1, 1);
    assert_eq!(frame.to_rgba(), vec![200, 120, 40, 255]);
}

#[test]
fn parses_facing_aliases() {
    assert_eq!(FacingPreference::parse("rear"), Some(FacingPreference::Environment));
    assert_eq!(FacingPreference::parse("Front"), Some(FacingPreference::User));
    assert_eq!(FacingPreference::parse("sideways"), None);
}
