//! Annotation session state machine

use log::{debug, info, warn};
use pcannotate_core::{
    AnnotateAction, Display, DisplayEvent, Instance, InstanceId, KeyMap, Label, PointStyle,
    Result,
};
use pcannotate_io::{AnnotationStore, InstanceSource};
use std::collections::VecDeque;
use std::path::PathBuf;

/// Where the session stands between two key presses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Ready for the next instance
    Idle,
    /// Showing this instance and waiting for a label
    AwaitingLabel(InstanceId),
    /// The end key was pressed; nothing else is presented
    Terminating,
    /// Every instance has been seen
    Closed,
}

/// Result of offering an instance to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation {
    /// Rendered; the session now waits for a label
    Presented,
    /// Already in the annotation log; nothing rendered
    Skipped,
    /// The session is done; nothing rendered
    Stopped,
}

/// Effect of one key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    Labeled(InstanceId, Label),
    Terminated,
    Ignored,
}

/// Counters of one [`AnnotationSession::run`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub files: usize,
    pub presented: usize,
    pub labeled: usize,
    pub skipped: usize,
    /// Whether the run ended on the end key or a window close rather than
    /// running out of instances
    pub stopped: bool,
}

/// Labels instances one at a time and persists every decision.
///
/// Resuming is based on key presence only: an id found in the log is never
/// presented again, whatever its stored value.
pub struct AnnotationSession {
    store: AnnotationStore,
    key_map: KeyMap<AnnotateAction>,
    style: PointStyle,
    state: SessionState,
    /// Input pumped together with a decision but not handled yet
    pending: VecDeque<DisplayEvent>,
}

impl AnnotationSession {
    /// Open (creating it if needed) the log at `log_path` and start a session
    pub fn start(log_path: impl Into<PathBuf>, key_map: KeyMap<AnnotateAction>) -> Result<Self> {
        Ok(Self::with_store(AnnotationStore::open(log_path)?, key_map))
    }

    pub fn with_store(store: AnnotationStore, key_map: KeyMap<AnnotateAction>) -> Self {
        Self {
            store,
            key_map,
            style: PointStyle::annotation(),
            state: SessionState::Idle,
            pending: VecDeque::new(),
        }
    }

    pub fn with_style(mut self, style: PointStyle) -> Self {
        self.style = style;
        self
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn store(&self) -> &AnnotationStore {
        &self.store
    }

    pub fn into_store(self) -> AnnotationStore {
        self.store
    }

    pub fn key_map(&self) -> &KeyMap<AnnotateAction> {
        &self.key_map
    }

    pub fn is_awaiting(&self) -> bool {
        matches!(self.state, SessionState::AwaitingLabel(_))
    }

    pub fn is_stop_requested(&self) -> bool {
        self.state == SessionState::Terminating
    }

    /// True once the end key was pressed or the instances ran out
    pub fn is_done(&self) -> bool {
        matches!(self.state, SessionState::Terminating | SessionState::Closed)
    }

    /// Offer the next instance.
    ///
    /// Pending input that does not need an instance, such as the end key, is
    /// handled first. Instances already in the log are skipped without
    /// rendering. Otherwise the instance is shown and becomes the one the
    /// next label applies to.
    pub fn present_next<D: Display + ?Sized>(
        &mut self,
        id: InstanceId,
        instance: &Instance,
        display: &mut D,
    ) -> Result<Presentation> {
        self.drain_idle_events()?;
        if self.is_done() {
            return Ok(Presentation::Stopped);
        }
        if self.store.contains(&id) {
            debug!("Skipping already-labeled instance: {}", id);
            return Ok(Presentation::Skipped);
        }
        if let SessionState::AwaitingLabel(previous) = &self.state {
            debug!("Leaving {} unlabeled", previous);
        }

        display.show_points(instance, &self.style)?;
        info!(
            "Instance {} ({} points). Keys: {}",
            id,
            instance.len(),
            self.key_map
        );
        self.state = SessionState::AwaitingLabel(id);
        Ok(Presentation::Presented)
    }

    /// Handle one key press.
    ///
    /// A label key records the label for the active instance and saves the
    /// log. The end key saves the log and stops the session, even when no
    /// instance is active. Every other key is ignored.
    pub fn on_key(&mut self, key: char) -> Result<KeyOutcome> {
        let Some(action) = self.key_map.action(key) else {
            debug!("Ignoring unmapped key '{}'", key);
            return Ok(KeyOutcome::Ignored);
        };

        match action {
            AnnotateAction::End => {
                if self.state == SessionState::Closed {
                    return Ok(KeyOutcome::Ignored);
                }
                self.terminate()?;
                Ok(KeyOutcome::Terminated)
            }
            AnnotateAction::Label(label) => {
                let SessionState::AwaitingLabel(id) = &self.state else {
                    debug!("Ignoring '{}' with no instance shown", label);
                    return Ok(KeyOutcome::Ignored);
                };
                let id = id.clone();
                self.store.insert(&id, label);
                info!("Labeled '{}' as {}", id, label);
                self.store.save()?;
                self.state = SessionState::Idle;
                Ok(KeyOutcome::Labeled(id, label))
            }
        }
    }

    /// Stop as if the end key had been pressed, e.g. when the window closes
    pub fn request_stop(&mut self) -> Result<()> {
        if self.is_done() {
            return Ok(());
        }
        self.terminate()
    }

    /// Mark the instance sequence as exhausted
    pub fn finish(&mut self) {
        if !self.is_stop_requested() {
            self.state = SessionState::Closed;
        }
    }

    fn terminate(&mut self) -> Result<()> {
        if self.state != SessionState::Terminating {
            info!("Exiting annotation mode.");
            self.store.save()?;
            self.state = SessionState::Terminating;
        }
        Ok(())
    }

    /// Pump `display` until the active instance is labeled or the session
    /// stops, returning what ended the wait.
    ///
    /// Events pumped after the deciding one are kept for the next instance.
    pub fn wait_for_label<D: Display + ?Sized>(&mut self, display: &mut D) -> Result<KeyOutcome> {
        while self.is_awaiting() {
            let Some(event) = self.pending.pop_front() else {
                self.pending.extend(display.pump_events()?);
                continue;
            };
            let outcome = self.on_event(event)?;
            if outcome != KeyOutcome::Ignored {
                return Ok(outcome);
            }
        }
        Ok(KeyOutcome::Ignored)
    }

    /// Events pumped but not handled yet
    pub fn pending_events(&self) -> usize {
        self.pending.len()
    }

    fn on_event(&mut self, event: DisplayEvent) -> Result<KeyOutcome> {
        match event {
            DisplayEvent::Key(key) => self.on_key(key),
            DisplayEvent::Closed => {
                warn!("Window closed, stopping annotation");
                self.request_stop()?;
                Ok(KeyOutcome::Terminated)
            }
        }
    }

    /// Handle pending events up to the first label key, which is left for
    /// the next instance shown
    fn drain_idle_events(&mut self) -> Result<()> {
        while let Some(event) = self.pending.front().copied() {
            if let DisplayEvent::Key(key) = event {
                if let Some(AnnotateAction::Label(_)) = self.key_map.action(key) {
                    break;
                }
            }
            self.pending.pop_front();
            self.on_event(event)?;
        }
        if self.is_done() {
            self.pending.clear();
        }
        Ok(())
    }

    /// Annotate every instance of `source`, then close `display`.
    ///
    /// The display is closed on failure as well.
    pub fn run<D: Display + ?Sized>(
        &mut self,
        source: &InstanceSource,
        display: &mut D,
    ) -> Result<RunSummary> {
        for key in self.key_map.keys() {
            display.register_key(key);
        }

        let result = self.annotate(source, display);
        display.close();
        let summary = result?;
        info!(
            "Annotation finished: {} labeled, {} skipped, {} in the log",
            summary.labeled,
            summary.skipped,
            self.store.len()
        );
        Ok(summary)
    }

    fn annotate<D: Display + ?Sized>(
        &mut self,
        source: &InstanceSource,
        display: &mut D,
    ) -> Result<RunSummary> {
        source.check_readable()?;
        let mut summary = RunSummary::default();
        let files = source.discover()?;
        info!("{} files to process under {}", files.len(), source.root().display());

        'files: for file in &files {
            if self.is_done() {
                break;
            }
            let instances = source.decode(file)?;
            info!("{} instances found in file {}", instances.len(), file.display());
            summary.files += 1;

            for (i, instance) in instances.iter().enumerate() {
                let id = source.instance_id(file, i);
                match self.present_next(id, instance, display)? {
                    Presentation::Skipped => summary.skipped += 1,
                    Presentation::Stopped => break 'files,
                    Presentation::Presented => {
                        summary.presented += 1;
                        if let KeyOutcome::Labeled(..) = self.wait_for_label(display)? {
                            summary.labeled += 1;
                        }
                    }
                }
            }
        }

        while let Some(event) = self.pending.pop_front() {
            self.on_event(event)?;
        }
        summary.stopped = self.is_stop_requested();
        self.finish();
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedDisplay;
    use pcannotate_core::Point3f;
    use std::fs;

    fn cloud(x: f32) -> Instance {
        Instance::from_points(vec![Point3f::new(x, 0.0, 0.0), Point3f::new(0.0, x, 0.0)])
    }

    fn session(dir: &tempfile::TempDir) -> AnnotationSession {
        AnnotationSession::start(dir.path().join("log.json"), KeyMap::default()).unwrap()
    }

    #[test]
    fn test_start_creates_log_and_idles() {
        let dir = tempfile::tempdir().unwrap();
        let session = session(&dir);
        assert!(dir.path().join("log.json").exists());
        assert_eq!(session.state(), &SessionState::Idle);
        assert!(!session.is_done());
    }

    #[test]
    fn test_label_key_records_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(&dir);
        let mut display = ScriptedDisplay::new();
        let id = InstanceId::new("a.h5", 0);

        let shown = session.present_next(id.clone(), &cloud(1.0), &mut display).unwrap();
        assert_eq!(shown, Presentation::Presented);
        assert_eq!(session.state(), &SessionState::AwaitingLabel(id.clone()));
        assert_eq!(display.shown().len(), 1);
        assert_eq!(display.shown()[0].1, PointStyle::annotation());

        let outcome = session.on_key('1').unwrap();
        assert_eq!(outcome, KeyOutcome::Labeled(id.clone(), Label::Take));
        assert_eq!(session.state(), &SessionState::Idle);
        assert_eq!(session.store().label(&id), Some(Label::Take));

        let reloaded = AnnotationStore::load(dir.path().join("log.json")).unwrap();
        assert_eq!(&reloaded, session.store());
    }

    #[test]
    fn test_labeled_instances_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("log.json");
        fs::write(&log, "{\"a.h5_0\": \"leave\", \"a.h5_1\": \"unsure\"}").unwrap();

        let mut session = AnnotationSession::start(&log, KeyMap::default()).unwrap();
        let before = session.store().clone();
        let mut display = ScriptedDisplay::new();

        for i in 0..2 {
            let outcome = session
                .present_next(InstanceId::new("a.h5", i), &cloud(1.0), &mut display)
                .unwrap();
            assert_eq!(outcome, Presentation::Skipped);
        }
        assert!(display.shown().is_empty());
        assert_eq!(session.state(), &SessionState::Idle);
        assert_eq!(session.store(), &before);
    }

    #[test]
    fn test_unmapped_key_changes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(&dir);
        let mut display = ScriptedDisplay::new();
        let id = InstanceId::new("a.h5", 0);
        session.present_next(id.clone(), &cloud(1.0), &mut display).unwrap();

        assert_eq!(session.on_key('x').unwrap(), KeyOutcome::Ignored);
        assert_eq!(session.on_key('9').unwrap(), KeyOutcome::Ignored);
        assert_eq!(session.state(), &SessionState::AwaitingLabel(id));
        assert!(session.store().is_empty());
        assert_eq!(fs::read_to_string(dir.path().join("log.json")).unwrap(), "");
    }

    #[test]
    fn test_label_key_while_idle_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(&dir);
        assert_eq!(session.on_key('1').unwrap(), KeyOutcome::Ignored);
        assert!(session.store().is_empty());
    }

    #[test]
    fn test_end_key_while_idle_terminates() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(&dir);
        let mut display = ScriptedDisplay::new();

        assert_eq!(session.on_key('q').unwrap(), KeyOutcome::Terminated);
        assert!(session.is_done());
        assert_eq!(fs::read_to_string(dir.path().join("log.json")).unwrap(), "{}");

        let outcome = session
            .present_next(InstanceId::new("a.h5", 0), &cloud(1.0), &mut display)
            .unwrap();
        assert_eq!(outcome, Presentation::Stopped);
        assert!(display.shown().is_empty());
    }

    #[test]
    fn test_end_key_while_awaiting_keeps_instance_unlabeled() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(&dir);
        let mut display = ScriptedDisplay::new();
        session
            .present_next(InstanceId::new("a.h5", 0), &cloud(1.0), &mut display)
            .unwrap();

        assert_eq!(session.on_key('q').unwrap(), KeyOutcome::Terminated);
        assert_eq!(session.state(), &SessionState::Terminating);
        assert!(session.store().is_empty());
        assert_eq!(session.on_key('1').unwrap(), KeyOutcome::Ignored);
    }

    #[test]
    fn test_custom_end_key() {
        let dir = tempfile::tempdir().unwrap();
        let keys = KeyMap::parse(&["1=take", "2=leave", "9=end"]).unwrap();
        let mut session = AnnotationSession::start(dir.path().join("log.json"), keys).unwrap();
        assert_eq!(session.on_key('q').unwrap(), KeyOutcome::Ignored);
        assert_eq!(session.on_key('9').unwrap(), KeyOutcome::Terminated);
    }

    #[test]
    fn test_wait_for_label_pumps_until_decision() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(&dir);
        let mut display = ScriptedDisplay::new().idle(3).keys("2");
        display.register_key('2');
        let id = InstanceId::new("a.h5", 0);
        session.present_next(id.clone(), &cloud(1.0), &mut display).unwrap();

        let outcome = session.wait_for_label(&mut display).unwrap();
        assert_eq!(outcome, KeyOutcome::Labeled(id, Label::Leave));
        assert_eq!(display.pumps(), 4);
    }

    #[test]
    fn test_end_key_batched_after_label_stops_before_next_instance() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(&dir);
        let mut display = ScriptedDisplay::new()
            .pump(vec![DisplayEvent::Key('2'), DisplayEvent::Key('q')]);
        display.register_key('2');
        display.register_key('q');
        let first = InstanceId::new("a.h5", 0);
        session.present_next(first.clone(), &cloud(1.0), &mut display).unwrap();

        let outcome = session.wait_for_label(&mut display).unwrap();
        assert_eq!(outcome, KeyOutcome::Labeled(first.clone(), Label::Leave));
        assert_eq!(session.pending_events(), 1);

        let next = session
            .present_next(InstanceId::new("a.h5", 1), &cloud(2.0), &mut display)
            .unwrap();
        assert_eq!(next, Presentation::Stopped);
        assert_eq!(session.state(), &SessionState::Terminating);
        assert_eq!(session.pending_events(), 0);
        assert_eq!(display.shown().len(), 1);
        assert_eq!(session.store().label(&first), Some(Label::Leave));
    }

    #[test]
    fn test_batched_labels_apply_to_successive_instances() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(&dir);
        let mut display = ScriptedDisplay::new().pump(vec![
            DisplayEvent::Key('1'),
            DisplayEvent::Key('x'),
            DisplayEvent::Key('2'),
        ]);
        display.register_key('1');
        display.register_key('2');
        display.register_key('x');

        for i in 0..2 {
            let id = InstanceId::new("a.h5", i);
            session.present_next(id, &cloud(1.0), &mut display).unwrap();
            session.wait_for_label(&mut display).unwrap();
        }

        assert_eq!(display.pumps(), 1);
        assert_eq!(session.store().label(&InstanceId::new("a.h5", 0)), Some(Label::Take));
        assert_eq!(session.store().label(&InstanceId::new("a.h5", 1)), Some(Label::Leave));
    }

    #[test]
    fn test_window_close_stops_session() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(&dir);
        let mut display = ScriptedDisplay::new().pump(vec![DisplayEvent::Closed]);
        session
            .present_next(InstanceId::new("a.h5", 0), &cloud(1.0), &mut display)
            .unwrap();

        assert_eq!(session.wait_for_label(&mut display).unwrap(), KeyOutcome::Terminated);
        assert!(session.is_stop_requested());
    }

    #[test]
    fn test_finish_closes_unless_terminating() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(&dir);
        session.finish();
        assert_eq!(session.state(), &SessionState::Closed);
        assert!(session.is_done());
        assert_eq!(session.on_key('q').unwrap(), KeyOutcome::Ignored);

        let mut stopped = AnnotationSession::with_store(
            AnnotationStore::empty(dir.path().join("other.json")),
            KeyMap::default(),
        );
        stopped.request_stop().unwrap();
        stopped.finish();
        assert_eq!(stopped.state(), &SessionState::Terminating);
    }
}
