//! A tracking session.
//!
//! [`Tracker`] owns everything a user interacts with in one sitting: the
//! reading store, the entry form, the camera and a pending delete
//! confirmation. Front ends drive it; it holds no global state.

use chrono::NaiveDateTime;
use tracing::debug;

use crate::camera::{Camera, CameraDevice, CameraState};
use crate::chart::{self, ChartOptions, ChartOutcome, Surface};
use crate::error::Result;
use crate::form::EntryForm;
use crate::history::{self, HistoryView};
use crate::locale::Locale;
use crate::period::{self, Period};
use crate::photo::Photo;
use crate::reading::{Reading, ReadingId};
use crate::storage::Backend;
use crate::store::ReadingStore;

/// One user session over a reading store.
#[derive(Debug)]
pub struct Tracker<B, D> {
    store: ReadingStore<B>,
    form: EntryForm,
    camera: Camera<D>,
    pending_delete: Option<ReadingId>,
    locale: Locale,
}

impl<B: Backend, D: CameraDevice> Tracker<B, D> {
    /// Start a session with a fresh form and an idle camera.
    #[must_use]
    pub fn new(store: ReadingStore<B>, device: D, locale: Locale) -> Self {
        Self {
            store,
            form: EntryForm::new(),
            camera: Camera::new(device),
            pending_delete: None,
            locale,
        }
    }

    /// The reading store.
    #[must_use]
    pub fn store(&self) -> &ReadingStore<B> {
        &self.store
    }

    /// The entry form.
    #[must_use]
    pub fn form(&self) -> &EntryForm {
        &self.form
    }

    /// The entry form, for filling in fields.
    pub fn form_mut(&mut self) -> &mut EntryForm {
        &mut self.form
    }

    /// Current camera state.
    #[must_use]
    pub fn camera_state(&self) -> &CameraState {
        self.camera.state()
    }

    /// Display locale.
    #[must_use]
    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Open the camera preview.
    ///
    /// # Errors
    ///
    /// Returns an error if the camera is not idle or the device is unavailable.
    pub async fn start_camera(&mut self) -> Result<()> {
        self.camera.start().await
    }

    /// Take a photo and attach it to the form.
    ///
    /// # Errors
    ///
    /// Returns an error if the camera is not previewing or the frame cannot
    /// be read.
    pub fn capture_photo(&mut self) -> Result<&Photo> {
        let photo = self.camera.capture()?;
        Ok(self.form.set_photo(photo))
    }

    /// Close the preview without taking a photo.
    ///
    /// # Errors
    ///
    /// Returns an error if the camera is not previewing.
    pub fn cancel_camera(&mut self) -> Result<()> {
        self.camera.cancel()
    }

    /// Drop the captured photo and reopen the preview.
    ///
    /// # Errors
    ///
    /// Returns an error if no photo was captured or the device is unavailable.
    /// The form keeps its photo when the camera had nothing captured.
    pub async fn retake_photo(&mut self) -> Result<()> {
        if matches!(self.camera.state(), CameraState::Captured(_)) {
            self.form.clear_photo();
        }
        self.camera.retake().await
    }

    /// Submit the form as a new reading.
    ///
    /// On success the form is reset and the camera returns to idle.
    ///
    /// # Errors
    ///
    /// Returns the form's validation error or the store's persistence error.
    pub fn submit(&mut self) -> Result<&Reading> {
        let reading = self.form.submit(&mut self.store)?;
        self.camera.reset();
        Ok(reading)
    }

    /// Ask to delete the reading with `id`. Nothing is removed until
    /// [`confirm_delete`](Self::confirm_delete).
    pub fn request_delete(&mut self, id: ReadingId) {
        debug!("Delete requested for reading {}", id);
        self.pending_delete = Some(id);
    }

    /// The reading awaiting confirmation, if any.
    #[must_use]
    pub fn pending_delete(&self) -> Option<ReadingId> {
        self.pending_delete
    }

    /// Forget the pending delete.
    pub fn cancel_delete(&mut self) {
        if let Some(id) = self.pending_delete.take() {
            debug!("Delete cancelled for reading {}", id);
        }
    }

    /// Delete the pending reading.
    ///
    /// Returns `false` when nothing was pending or the reading no longer
    /// exists. The pending target is cleared either way.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be persisted.
    pub fn confirm_delete(&mut self) -> Result<bool> {
        match self.pending_delete.take() {
            Some(id) => self.store.remove(id),
            None => Ok(false),
        }
    }

    /// History rows for `period`, newest first.
    #[must_use]
    pub fn history(&self, period: Period) -> HistoryView<'_> {
        let readings = period::filter(self.store.readings(), period);
        history::render(&readings, self.locale)
    }

    /// Like [`history`](Self::history) with an explicit clock value.
    #[must_use]
    pub fn history_at(&self, period: Period, now: NaiveDateTime) -> HistoryView<'_> {
        let readings = period::filter_at(self.store.readings(), period, now);
        history::render(&readings, self.locale)
    }

    /// Draw the readings in `period` onto `surface`.
    pub fn chart<S: Surface + ?Sized>(
        &self,
        period: Period,
        surface: &mut S,
        options: &ChartOptions,
    ) -> ChartOutcome {
        let readings = period::filter(self.store.readings(), period);
        chart::render(&readings, surface, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::FileCamera;
    use crate::chart::SvgSurface;
    use crate::classify::Category;
    use crate::error::Error;
    use crate::storage::MemoryBackend;
    use chrono::{Duration, Local};

    fn tracker(photo: Option<&std::path::Path>) -> Tracker<MemoryBackend, FileCamera> {
        let store = ReadingStore::load(MemoryBackend::new(), "bp").unwrap();
        let device = FileCamera::new(photo.map_or_else(
            || std::path::PathBuf::from("/nonexistent/bplog.jpg"),
            std::path::Path::to_path_buf,
        ));
        Tracker::new(store, device, Locale::En)
    }

    fn fill(tracker: &mut Tracker<MemoryBackend, FileCamera>, systolic: &str, diastolic: &str) {
        let form = tracker.form_mut();
        form.systolic = systolic.to_string();
        form.diastolic = diastolic.to_string();
    }

    #[test]
    fn test_submit_classifies_and_resets() {
        let mut tracker = tracker(None);
        fill(&mut tracker, "150", "70");

        let reading = tracker.submit().unwrap();
        assert_eq!(reading.category, Category::High);
        assert_eq!(tracker.store().len(), 1);
        assert!(tracker.form().systolic.is_empty());
    }

    #[test]
    fn test_invalid_submit_stores_nothing() {
        let mut tracker = tracker(None);
        fill(&mut tracker, "", "70");

        assert!(tracker.submit().unwrap_err().is_invalid_input());
        assert!(tracker.store().is_empty());
    }

    #[tokio::test]
    async fn test_photo_flow() {
        let path = std::env::temp_dir().join(format!("bplog_tracker_{}.jpg", std::process::id()));
        std::fs::write(&path, b"jpeg").unwrap();

        let mut tracker = tracker(Some(&path));
        tracker.start_camera().await.unwrap();
        assert_eq!(tracker.camera_state(), &CameraState::Previewing);

        tracker.capture_photo().unwrap();
        assert!(tracker.form().photo().is_some());

        tracker.retake_photo().await.unwrap();
        assert!(tracker.form().photo().is_none());
        tracker.capture_photo().unwrap();

        fill(&mut tracker, "118", "76");
        let reading = tracker.submit().unwrap();
        assert!(reading.photo.is_some());
        assert_eq!(tracker.camera_state(), &CameraState::Idle);
        assert!(tracker.form().photo().is_none());

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_camera_unavailable() {
        let mut tracker = tracker(None);
        let err = tracker.start_camera().await.unwrap_err();
        assert!(matches!(err, Error::CameraUnavailable { .. }));
        assert_eq!(tracker.camera_state(), &CameraState::Idle);
    }

    #[test]
    fn test_delete_confirmation() {
        let mut tracker = tracker(None);
        fill(&mut tracker, "120", "80");
        let first = tracker.submit().unwrap().id;
        fill(&mut tracker, "130", "85");
        let second = tracker.submit().unwrap().id;

        tracker.request_delete(first);
        tracker.cancel_delete();
        assert_eq!(tracker.pending_delete(), None);
        assert!(!tracker.confirm_delete().unwrap());
        assert_eq!(tracker.store().len(), 2);

        tracker.request_delete(first);
        assert!(tracker.confirm_delete().unwrap());
        assert_eq!(tracker.pending_delete(), None);
        let ids: Vec<_> = tracker.store().readings().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![second]);
    }

    #[test]
    fn test_history_and_chart_respect_period() {
        let mut tracker = tracker(None);
        let now = Local::now().naive_local();
        let old = now - Duration::days(40);

        fill(&mut tracker, "120", "80");
        tracker.form_mut().datetime = old.format(crate::reading::DATETIME_FORMAT).to_string();
        tracker.submit().unwrap();
        fill(&mut tracker, "125", "82");
        tracker.submit().unwrap();

        assert_eq!(tracker.history_at(Period::All, now).rows().len(), 2);
        assert_eq!(tracker.history_at(Period::Days(30), now).rows().len(), 1);

        let mut svg = SvgSurface::new();
        let outcome = tracker.chart(Period::Days(30), &mut svg, &ChartOptions::default());
        assert!(matches!(outcome, ChartOutcome::Drawn { points: 1, .. }));
    }

    #[tokio::test]
    async fn test_retake_without_capture_keeps_form_photo() {
        let mut tracker = tracker(None);
        tracker
            .form_mut()
            .set_photo(Photo::encode("image/jpeg", b"attached"));

        let err = tracker.retake_photo().await.unwrap_err();
        assert!(matches!(err, Error::CameraState { expected: "captured", .. }));
        assert_eq!(
            tracker.form().photo().and_then(Photo::decode),
            Some(b"attached".to_vec())
        );
    }
}
