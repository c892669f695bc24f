//! QuoteRunner – loads a form session, applies one user action, and saves it back.
//!
//! Field edits and button presses are separate calls: [`QuoteRunner::update`] only
//! touches the controls, while [`QuoteRunner::submit`] is the one place that reaches the
//! prediction collaborator, exactly once per call.
//!
//! A submission blocks its session until the collaborator answers. A second press on
//! the same session in the meantime is refused with [`QuoteError::SubmissionPending`];
//! other sessions carry on independently.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info};

use crate::{
    error::{QuoteError, Result},
    form::FormState,
    options::Field,
    predictor::{Predictor, submit},
    present::{Presentation, present},
    storage::{FormSession, SessionStorage},
};

#[derive(Clone)]
pub struct QuoteRunner {
    predictor: Arc<dyn Predictor>,
    storage: Arc<dyn SessionStorage>,
    in_flight: Arc<DashMap<String, ()>>,
    write_locks: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

/// Marks a session busy for as long as it lives.
struct PendingGuard {
    in_flight: Arc<DashMap<String, ()>>,
    session_id: String,
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.in_flight.remove(&self.session_id);
    }
}

impl QuoteRunner {
    pub fn new(predictor: Arc<dyn Predictor>, storage: Arc<dyn SessionStorage>) -> Self {
        Self {
            predictor,
            storage,
            in_flight: Arc::new(DashMap::new()),
            write_locks: Arc::new(DashMap::new()),
        }
    }

    /// Creates and stores a session with every control at its default.
    pub async fn start(&self) -> Result<FormSession> {
        let session = FormSession::new();
        self.storage.save(session.clone()).await?;
        info!(session_id = %session.id, "created form session");
        Ok(session)
    }

    pub async fn load(&self, session_id: &str) -> Result<FormSession> {
        self.storage
            .get(session_id)
            .await?
            .ok_or_else(|| QuoteError::SessionNotFound(session_id.to_string()))
    }

    /// Every load-modify-save of a stored session runs under this lock, so an edit and
    /// the end of a submission cannot overwrite each other.
    async fn lock_session(&self, session_id: &str) -> OwnedMutexGuard<()> {
        let lock = self
            .write_locks
            .entry(session_id.to_string())
            .or_default()
            .clone();
        lock.lock_owned().await
    }

    /// Edits one control. Never calls the collaborator.
    pub async fn update(&self, session_id: &str, field: Field, raw: &str) -> Result<FormSession> {
        self.load(session_id).await?;
        let _write = self.lock_session(session_id).await;

        let mut session = self.load(session_id).await?;
        session.form.set(field, raw)?;
        debug!(
            session_id = %session_id,
            field = %field,
            value = %session.form.control(field).display_value(),
            "updated field"
        );
        self.storage.save(session).await?;
        self.load(session_id).await
    }

    pub fn is_pending(&self, session_id: &str) -> bool {
        self.in_flight.contains_key(session_id)
    }

    fn begin(&self, session_id: &str) -> Result<PendingGuard> {
        if self.in_flight.insert(session_id.to_string(), ()).is_some() {
            return Err(QuoteError::SubmissionPending(session_id.to_string()));
        }
        Ok(PendingGuard {
            in_flight: self.in_flight.clone(),
            session_id: session_id.to_string(),
        })
    }

    /// Button press for a stored session: collect, predict once, present, save.
    pub async fn submit(&self, session_id: &str) -> Result<Presentation> {
        // check existence before marking busy so unknown ids never linger in the map
        self.load(session_id).await?;
        let _pending = self.begin(session_id)?;

        let session = self.load(session_id).await?;
        let presentation = self.quote(&session.form).await;

        // the model call is not under the write lock; edits made meanwhile are kept
        let _write = self.lock_session(session_id).await;
        let mut session = self.load(session_id).await?;
        session.last_presentation = Some(presentation.clone());
        self.storage.save(session).await?;

        let outcome = if presentation.is_error() { "error" } else { "estimate" };
        info!(session_id = %session_id, outcome, "submission completed");
        Ok(presentation)
    }

    /// Stateless button press for a form the caller holds.
    pub async fn quote(&self, form: &FormState) -> Presentation {
        let request = form.collect();
        let result = submit(self.predictor.as_ref(), &request).await;
        present(&result, &request)
    }

    pub async fn end(&self, session_id: &str) -> Result<()> {
        self.load(session_id).await?;
        let write = self.lock_session(session_id).await;
        self.storage.delete(session_id).await?;
        drop(write);
        self.write_locks.remove(session_id);
        info!(session_id = %session_id, "deleted form session");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{present::QuoteSummary, request::QuoteRequest, storage::InMemorySessionStorage};
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::{Notify, oneshot};

    #[derive(Default)]
    struct CountingPredictor {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Predictor for CountingPredictor {
        async fn predict(&self, _request: &QuoteRequest) -> anyhow::Result<Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(json!(28000))
        }
    }

    fn runner_with(predictor: Arc<dyn Predictor>) -> QuoteRunner {
        QuoteRunner::new(predictor, Arc::new(InMemorySessionStorage::new()))
    }

    #[tokio::test]
    async fn field_edits_never_call_the_predictor() {
        let predictor = Arc::new(CountingPredictor::default());
        let runner = runner_with(predictor.clone());
        let session = runner.start().await.unwrap();

        runner.update(&session.id, Field::Age, "40").await.unwrap();
        runner.update(&session.id, Field::Region, "Northeast").await.unwrap();
        assert_eq!(predictor.calls.load(Ordering::SeqCst), 0);

        runner.submit(&session.id).await.unwrap();
        assert_eq!(predictor.calls.load(Ordering::SeqCst), 1);

        runner.submit(&session.id).await.unwrap();
        assert_eq!(predictor.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn end_to_end_estimate() {
        let runner = runner_with(Arc::new(CountingPredictor::default()));
        let session = runner.start().await.unwrap();
        for (field, value) in [
            (Field::Age, "40"),
            (Field::NumberOfDependants, "2"),
            (Field::IncomeLakhs, "10"),
            (Field::GeneticalRisk, "1"),
            (Field::InsurancePlan, "Gold"),
            (Field::EmploymentStatus, "Salaried"),
            (Field::Gender, "Male"),
            (Field::MaritalStatus, "Married"),
            (Field::BmiCategory, "Normal"),
            (Field::SmokingStatus, "No Smoking"),
            (Field::Region, "Northeast"),
            (Field::MedicalHistory, "No Disease"),
        ] {
            runner.update(&session.id, field, value).await.unwrap();
        }

        let presentation = runner.submit(&session.id).await.unwrap();
        assert_eq!(
            presentation,
            Presentation::Estimate {
                amount: 28000.0,
                display: "₹28,000".to_string(),
                label: crate::present::RESULT_LABEL,
                summary: QuoteSummary {
                    age_group: "25 and above",
                    medical_history: "No Disease",
                    region: "Northeast",
                    selected_plan: "Gold",
                },
            }
        );

        let stored = runner.load(&session.id).await.unwrap();
        assert_eq!(stored.last_presentation, Some(presentation));
    }

    #[tokio::test]
    async fn failures_are_presented_as_errors() {
        let predictor = |_: &QuoteRequest| -> anyhow::Result<Value> { Ok(json!("Model unavailable")) };
        let runner = runner_with(Arc::new(predictor));
        let session = runner.start().await.unwrap();

        let presentation = runner.submit(&session.id).await.unwrap();
        assert_eq!(
            presentation,
            Presentation::Error {
                message: "Model unavailable".to_string()
            }
        );
    }

    #[tokio::test]
    async fn rejected_edits_leave_the_session_unchanged() {
        let runner = runner_with(Arc::new(CountingPredictor::default()));
        let session = runner.start().await.unwrap();
        runner.update(&session.id, Field::Age, "30").await.unwrap();

        let err = runner
            .update(&session.id, Field::Age, "thirty")
            .await
            .unwrap_err();
        assert!(matches!(err, QuoteError::InvalidNumber { .. }));
        let stored = runner.load(&session.id).await.unwrap();
        assert_eq!(stored.form.collect().age, 30);
    }

    #[tokio::test]
    async fn unknown_sessions_are_reported() {
        let runner = runner_with(Arc::new(CountingPredictor::default()));
        assert!(matches!(
            runner.submit("missing").await,
            Err(QuoteError::SessionNotFound(_))
        ));
        assert!(!runner.is_pending("missing"));
    }

    struct GatedPredictor {
        entered: Notify,
        release: tokio::sync::Mutex<Option<oneshot::Receiver<()>>>,
    }

    #[async_trait]
    impl Predictor for GatedPredictor {
        async fn predict(&self, _request: &QuoteRequest) -> anyhow::Result<Value> {
            self.entered.notify_one();
            let release = self.release.lock().await.take();
            if let Some(release) = release {
                let _ = release.await;
            }
            Ok(json!(1000))
        }
    }

    #[tokio::test]
    async fn second_press_while_pending_is_refused() {
        let (release_tx, release_rx) = oneshot::channel();
        let predictor = Arc::new(GatedPredictor {
            entered: Notify::new(),
            release: tokio::sync::Mutex::new(Some(release_rx)),
        });
        let runner = runner_with(predictor.clone());
        let busy = runner.start().await.unwrap();
        let other = runner.start().await.unwrap();

        let first = tokio::spawn({
            let runner = runner.clone();
            let id = busy.id.clone();
            async move { runner.submit(&id).await }
        });
        predictor.entered.notified().await;

        assert!(runner.is_pending(&busy.id));
        assert!(matches!(
            runner.submit(&busy.id).await,
            Err(QuoteError::SubmissionPending(_))
        ));
        // the gate only holds the first call; other sessions are independent
        assert!(runner.submit(&other.id).await.is_ok());

        release_tx.send(()).unwrap();
        let presentation = first.await.unwrap().unwrap();
        assert!(!presentation.is_error());
        assert!(!runner.is_pending(&busy.id));
    }

    #[tokio::test]
    async fn quote_leaves_stored_sessions_alone() {
        let runner = runner_with(Arc::new(CountingPredictor::default()));
        let session = runner.start().await.unwrap();

        let mut form = FormState::new();
        form.set(Field::Age, "60").unwrap();
        let presentation = runner.quote(&form).await;
        assert!(!presentation.is_error());

        let stored = runner.load(&session.id).await.unwrap();
        assert_eq!(stored.form, FormState::new());
        assert_eq!(stored.last_presentation, None);
    }

    /// Holds the first save after `arm` until released.
    #[derive(Default)]
    struct HeldSaveStorage {
        inner: InMemorySessionStorage,
        save_held: Notify,
        release: std::sync::Mutex<Option<oneshot::Receiver<()>>>,
    }

    impl HeldSaveStorage {
        fn arm(&self) -> oneshot::Sender<()> {
            let (tx, rx) = oneshot::channel();
            *self.release.lock().unwrap() = Some(rx);
            tx
        }
    }

    #[async_trait]
    impl SessionStorage for HeldSaveStorage {
        async fn save(&self, session: FormSession) -> Result<()> {
            let release = self.release.lock().unwrap().take();
            if let Some(release) = release {
                self.save_held.notify_one();
                let _ = release.await;
            }
            self.inner.save(session).await
        }

        async fn get(&self, id: &str) -> Result<Option<FormSession>> {
            self.inner.get(id).await
        }

        async fn delete(&self, id: &str) -> Result<()> {
            self.inner.delete(id).await
        }
    }

    #[tokio::test]
    async fn slow_edit_and_submission_keep_both_writes() {
        let storage = Arc::new(HeldSaveStorage::default());
        let runner = QuoteRunner::new(Arc::new(CountingPredictor::default()), storage.clone());
        let session = runner.start().await.unwrap();

        let release = storage.arm();
        let edit = tokio::spawn({
            let runner = runner.clone();
            let id = session.id.clone();
            async move { runner.update(&id, Field::Age, "40").await }
        });
        storage.save_held.notified().await;

        let press = tokio::spawn({
            let runner = runner.clone();
            let id = session.id.clone();
            async move { runner.submit(&id).await }
        });
        // let the submission get as far as it can while the edit is still saving
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;

        release.send(()).unwrap();
        edit.await.unwrap().unwrap();
        let presentation = press.await.unwrap().unwrap();

        let stored = runner.load(&session.id).await.unwrap();
        assert_eq!(stored.form.collect().age, 40);
        assert_eq!(stored.last_presentation, Some(presentation));
    }

    #[tokio::test]
    async fn end_removes_the_session() {
        let runner = runner_with(Arc::new(CountingPredictor::default()));
        let session = runner.start().await.unwrap();
        runner.end(&session.id).await.unwrap();
        assert!(matches!(
            runner.load(&session.id).await,
            Err(QuoteError::SessionNotFound(_))
        ));
    }
}
