use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;

use log::{debug, info, warn};
use tokio::runtime::Handle;

use super::engine::{FormEngine, Ticket};
use super::error::{EngineError, FetchError, SubmissionError};
use super::repository::{SubmissionSink, SurveyRepository};
use super::types::{QuestionId, Survey, SurveyId};

/// Called from the runtime after a completion is queued, so the UI can wake up.
pub type RepaintHook = Arc<dyn Fn() + Send + Sync>;

#[derive(Debug)]
pub enum Completion {
    Loaded {
        ticket: Ticket,
        result: Result<Survey, FetchError>,
    },
    Submitted {
        ticket: Ticket,
        result: Result<(), SubmissionError>,
    },
}

/// Drives one form session: owns the engine, spawns repository and sink
/// calls on the runtime, and applies their results when polled.
pub struct FormController<R, S> {
    engine: FormEngine,
    repository: Arc<R>,
    sink: Arc<S>,
    runtime: Handle,
    sender: Sender<Completion>,
    receiver: Receiver<Completion>,
    repaint: RepaintHook,
}

impl<R: SurveyRepository, S: SubmissionSink> FormController<R, S> {
    /// Opens a session for `survey_id` and starts fetching it.
    pub fn load(
        survey_id: SurveyId,
        repository: Arc<R>,
        sink: Arc<S>,
        runtime: Handle,
        repaint: RepaintHook,
    ) -> Self {
        let (engine, ticket) = FormEngine::open(survey_id);
        let (sender, receiver) = channel();
        let controller = Self {
            engine,
            repository,
            sink,
            runtime,
            sender,
            receiver,
            repaint,
        };
        controller.spawn_fetch(ticket);
        controller
    }

    pub fn engine(&self) -> &FormEngine {
        &self.engine
    }

    pub fn retry_load(&mut self) -> Result<(), EngineError> {
        let ticket = self.engine.retry_load()?;
        self.spawn_fetch(ticket);
        Ok(())
    }

    pub fn set_answer(
        &mut self,
        question_id: QuestionId,
        value: impl AsRef<str>,
    ) -> Result<(), EngineError> {
        self.engine.set_answer(question_id, value)
    }

    pub fn clear_answer(&mut self, question_id: QuestionId) -> Result<(), EngineError> {
        self.engine.clear_answer(question_id)
    }

    /// Validation failures come back synchronously and never reach the sink.
    pub fn submit(&mut self) -> Result<(), EngineError> {
        let (ticket, payload) = self.engine.begin_submit()?;
        info!(
            "Submitting {} answers for survey {}",
            payload.answers.len(),
            payload.survey_id
        );

        let sink = Arc::clone(&self.sink);
        let sender = self.sender.clone();
        let repaint = Arc::clone(&self.repaint);
        self.runtime.spawn(async move {
            let result = sink.submit(payload).await;
            if sender.send(Completion::Submitted { ticket, result }).is_err() {
                debug!("Form was dropped before the submission finished");
            }
            repaint();
        });
        Ok(())
    }

    /// Discards answers; anything still in flight is ignored when it lands.
    pub fn close(&mut self) {
        info!("Closing form for survey {}", self.engine.survey_id());
        self.engine.close();
    }

    /// Applies queued completions. Returns how many changed the engine.
    pub fn poll(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(completion) = self.receiver.try_recv() {
            if self.apply(completion) {
                applied += 1;
            }
        }
        applied
    }

    fn apply(&mut self, completion: Completion) -> bool {
        let applied = match completion {
            Completion::Loaded { ticket, result } => {
                if let Err(e) = &result {
                    warn!("Failed to load survey {}: {}", self.engine.survey_id(), e);
                }
                self.engine.finish_load(ticket, result)
            }
            Completion::Submitted { ticket, result } => {
                if let Err(e) = &result {
                    warn!("Submission for survey {} failed: {}", self.engine.survey_id(), e);
                }
                self.engine.finish_submit(ticket, result)
            }
        };
        if !applied {
            debug!(
                "Ignoring stale completion while form is {}",
                self.engine.state().name()
            );
        }
        applied
    }

    fn spawn_fetch(&self, ticket: Ticket) {
        let survey_id = self.engine.survey_id();
        let repository = Arc::clone(&self.repository);
        let sender = self.sender.clone();
        let repaint = Arc::clone(&self.repaint);
        self.runtime.spawn(async move {
            let result = repository.get_survey_by_id(survey_id).await;
            if sender.send(Completion::Loaded { ticket, result }).is_err() {
                debug!("Form was dropped before survey {} arrived", survey_id);
            }
            repaint();
        });
    }

    #[cfg(test)]
    fn wait(&mut self) -> bool {
        match self.receiver.recv_timeout(std::time::Duration::from_secs(5)) {
            Ok(completion) => self.apply(completion),
            Err(_) => false,
        }
    }
}
