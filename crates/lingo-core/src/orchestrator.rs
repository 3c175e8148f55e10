use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::config::CoreConfig;
use crate::error::{Capability, ServiceError};
use crate::gateway::{InitReport, ServiceGateway};
use crate::language::{DetectedLanguage, LanguageSet, LanguageTag, UNKNOWN};
use crate::log::MessageLog;
use crate::message::{IdGenerator, Message, MessageBody, MessageId, Summary};
use crate::ports::{Capabilities, SummarizeOptions};
use crate::status::{self, Status, StatusChannel};

/// What an operation did to the conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Appended(MessageId),
    Updated(MessageId),
    Removed(MessageId),
    Selected(LanguageTag),
    Unchanged(Unchanged),
    /// A service or precondition refused; the status line carries the error.
    Failed(ServiceError),
}

/// No-op results: the log is left as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unchanged {
    EmptyInput,
    EmptyLog,
    AlreadyInTargetLanguage,
    NotEligible,
    NotFound,
}

/// What the primary control does right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryAction {
    Send,
    Summarize,
}

/// A service call the orchestrator committed to, with its inputs captured
/// when it was triggered.
#[derive(Debug)]
pub struct Job(JobKind);

#[derive(Debug)]
enum JobKind {
    Detect {
        id: MessageId,
        text: String,
    },
    Translate {
        source_id: MessageId,
        source: LanguageTag,
        target: LanguageTag,
        text: String,
    },
    SummarizeOriginal {
        id: MessageId,
        text: String,
        options: SummarizeOptions,
        summary_lang: LanguageTag,
    },
    SummarizeTranslation {
        source_id: MessageId,
        text: String,
        lang: LanguageTag,
    },
}

/// First half of an operation: either finished on the spot, or a job whose
/// service call still has to run.
#[derive(Debug)]
pub enum Step {
    Done(Outcome),
    Pending(Job),
}

/// Owns the message log, the detected language, the target selection and
/// the status line. Every log change goes through the single `watch` sender
/// and is derived from the latest snapshot, so concurrent completions never
/// overwrite each other.
pub struct Orchestrator {
    gateway: ServiceGateway,
    threshold: usize,
    ids: IdGenerator,
    log: watch::Sender<MessageLog>,
    detected: watch::Sender<DetectedLanguage>,
    selected: watch::Sender<LanguageTag>,
    status: StatusChannel,
}

impl Orchestrator {
    pub fn new(gateway: ServiceGateway, config: &CoreConfig) -> Self {
        let default_target = if gateway.languages().contains(config.default_target_language.as_str()) {
            config.default_target_language.clone()
        } else {
            gateway
                .languages()
                .first()
                .cloned()
                .unwrap_or_else(|| config.default_target_language.clone())
        };
        Self {
            gateway,
            threshold: config.summarization_threshold,
            ids: IdGenerator::new(),
            log: watch::Sender::new(MessageLog::new()),
            detected: watch::Sender::new(DetectedLanguage::Pending),
            selected: watch::Sender::new(default_target),
            status: StatusChannel::new(),
        }
    }

    /// Initializes the services and reports readiness on the status line.
    pub async fn start(capabilities: Capabilities, config: &CoreConfig) -> Self {
        let (gateway, report) = ServiceGateway::initialize(capabilities, config.languages.clone()).await;
        let orchestrator = Self::new(gateway, config);
        orchestrator.status.set(startup_status(&report));
        orchestrator
    }

    pub fn gateway(&self) -> &ServiceGateway {
        &self.gateway
    }

    pub fn languages(&self) -> &LanguageSet {
        self.gateway.languages()
    }

    pub fn snapshot(&self) -> MessageLog {
        self.log.borrow().clone()
    }

    pub fn subscribe_log(&self) -> watch::Receiver<MessageLog> {
        self.log.subscribe()
    }

    pub fn detected_language(&self) -> DetectedLanguage {
        self.detected.borrow().clone()
    }

    pub fn subscribe_detected(&self) -> watch::Receiver<DetectedLanguage> {
        self.detected.subscribe()
    }

    pub fn selected_language(&self) -> LanguageTag {
        self.selected.borrow().clone()
    }

    pub fn status(&self) -> Status {
        self.status.current()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<Status> {
        self.status.subscribe()
    }

    pub fn select_language(&self, tag: &str) -> Result<LanguageTag, ServiceError> {
        if !self.languages().contains(tag) {
            return Err(ServiceError::UnsupportedLanguage(tag.to_string()));
        }
        let tag = LanguageTag::new(tag);
        debug!(lang = %tag, "target language selected");
        self.selected.send_replace(tag.clone());
        Ok(tag)
    }

    /// `Summarize` while the last message still needs summarizing.
    pub fn primary_action(&self) -> PrimaryAction {
        match self.log.borrow().last() {
            Some(last) if last.needs_summarization() => PrimaryAction::Summarize,
            _ => PrimaryAction::Send,
        }
    }

    pub async fn submit(&self, text: &str) -> Outcome {
        let step = self.begin_submit(text);
        self.drive(step).await
    }

    pub async fn send(&self, text: &str) -> Outcome {
        let step = self.begin_send(text);
        self.drive(step).await
    }

    pub async fn translate(&self) -> Outcome {
        let step = self.begin_translate();
        self.drive(step).await
    }

    pub async fn summarize_original_text(&self) -> Outcome {
        let step = self.begin_summarize_original();
        self.drive(step).await
    }

    pub async fn summarize_translated_text(&self, id: MessageId) -> Outcome {
        let step = self.begin_summarize_translation(id);
        self.drive(step).await
    }

    /// Filters the message out. No cascade, no status change.
    pub fn remove(&self, id: MessageId) -> Outcome {
        let removed = self.log.send_if_modified(|log| {
            if !log.contains(id) {
                return false;
            }
            *log = log.remove(id);
            true
        });
        if removed {
            info!(message_id = %id, "message removed");
            Outcome::Removed(id)
        } else {
            debug!(message_id = %id, "remove of unknown message ignored");
            Outcome::Unchanged(Unchanged::NotFound)
        }
    }

    pub fn begin_submit(&self, text: &str) -> Step {
        match self.primary_action() {
            PrimaryAction::Summarize => self.begin_summarize_original(),
            PrimaryAction::Send => self.begin_send(text),
        }
    }

    /// Appends the sent message now; detection runs as the pending job.
    pub fn begin_send(&self, text: &str) -> Step {
        if text.trim().is_empty() {
            debug!("ignoring blank input");
            return Step::Done(Outcome::Unchanged(Unchanged::EmptyInput));
        }
        let message = Message::sent(self.ids.next_id(), text, self.threshold);
        let id = message.id();
        let words = message.word_count();
        let needs_summarization = message.needs_summarization();
        self.log.send_modify(|log| *log = log.append(message));
        info!(message_id = %id, words, needs_summarization, "message sent");

        self.status.set(Status::new(status::DETECTING));
        Step::Pending(Job(JobKind::Detect { id, text: text.to_string() }))
    }

    pub fn begin_translate(&self) -> Step {
        let log = self.snapshot();
        let Some(last) = log.last() else {
            return Step::Done(Outcome::Unchanged(Unchanged::EmptyLog));
        };
        let target = self.selected_language();
        if last.lang() == Some(&target) {
            debug!(message_id = %last.id(), lang = %target, "last message already in target language");
            return Step::Done(Outcome::Unchanged(Unchanged::AlreadyInTargetLanguage));
        }
        let source = match self.detected_language() {
            DetectedLanguage::Detected(tag) if self.languages().contains(tag.as_str()) => tag,
            other => {
                let shown = other.tag().map(|t| t.to_string()).unwrap_or_else(|| UNKNOWN.to_string());
                return Step::Done(self.failed(ServiceError::UnsupportedSourceLanguage(shown)));
            }
        };

        self.status.set(Status::new(status::TRANSLATING));
        Step::Pending(Job(JobKind::Translate {
            source_id: last.id(),
            source,
            target,
            text: last.text().to_string(),
        }))
    }

    /// Summarizes the last message in place. A translation is never edited,
    /// so a long received message gets an appended summary instead.
    pub fn begin_summarize_original(&self) -> Step {
        let log = self.snapshot();
        let Some(last) = log.last() else {
            return Step::Done(Outcome::Unchanged(Unchanged::EmptyLog));
        };
        if !last.needs_summarization() {
            return Step::Done(Outcome::Unchanged(Unchanged::NotEligible));
        }
        let (id, text) = match last.body() {
            MessageBody::Sent(sent) => (last.id(), sent.text().to_string()),
            MessageBody::Received(_) => return self.begin_summarize_translation(last.id()),
            MessageBody::SummaryOfTranslation(_) => {
                return Step::Done(Outcome::Unchanged(Unchanged::NotEligible));
            }
        };
        if !self.gateway.is_available(Capability::Summarizer) {
            return Step::Done(self.failed(ServiceError::ServiceUnavailable(Capability::Summarizer)));
        }

        let target = self.selected_language();
        let options = SummarizeOptions::new(self.detected_language().tag().cloned(), Some(target.clone()));
        self.status.set(Status::new(status::SUMMARIZING));
        Step::Pending(Job(JobKind::SummarizeOriginal { id, text, options, summary_lang: target }))
    }

    pub fn begin_summarize_translation(&self, id: MessageId) -> Step {
        let log = self.snapshot();
        let Some(message) = log.get(id) else {
            return Step::Done(Outcome::Unchanged(Unchanged::NotFound));
        };
        let MessageBody::Received(received) = message.body() else {
            return Step::Done(Outcome::Unchanged(Unchanged::NotEligible));
        };
        if !self.gateway.is_available(Capability::Summarizer) {
            return Step::Done(self.failed(ServiceError::ServiceUnavailable(Capability::Summarizer)));
        }

        self.status.set(Status::new(status::SUMMARIZING));
        Step::Pending(Job(JobKind::SummarizeTranslation {
            source_id: id,
            text: received.text().to_string(),
            lang: received.lang().clone(),
        }))
    }

    /// Runs the job's service call and applies the result to the latest
    /// snapshot. Failures only change the status line.
    pub async fn complete(&self, job: Job) -> Outcome {
        match job.0 {
            JobKind::Detect { id, text } => {
                match self.gateway.detect(&text).await {
                    Ok(candidates) => {
                        let detected =
                            DetectedLanguage::from_candidate(candidates.first().map(|c| c.language.as_str()));
                        info!(message_id = %id, detected = %detected, "language detected");
                        self.detected.send_replace(detected);
                        self.status.set(Status::new(status::DETECTED));
                    }
                    Err(e) => {
                        warn!(message_id = %id, error = %e, "language detection failed");
                        self.status.set(Status::error(&e));
                    }
                }
                Outcome::Appended(id)
            }
            JobKind::Translate { source_id, source, target, text } => {
                match self.gateway.translate(source.as_str(), &target, &text).await {
                    Ok(translated) => {
                        let message = Message::received(self.ids.next_id(), translated, target.clone(), text, self.threshold);
                        let id = message.id();
                        self.log.send_modify(|log| *log = log.append(message));
                        info!(message_id = %id, %source_id, source_lang = %source, target_lang = %target, "translation appended");
                        self.status.set(Status::new(status::TRANSLATED));
                        Outcome::Appended(id)
                    }
                    Err(e) => self.failed(e),
                }
            }
            JobKind::SummarizeOriginal { id, text, options, summary_lang } => {
                match self.gateway.summarize(&text, &options).await {
                    Ok(summary) => {
                        let summary = Summary { text: summary, lang: summary_lang };
                        let updated = self.log.send_if_modified(|log| {
                            if !log.contains(id) {
                                return false;
                            }
                            *log = log.update(id, |m| m.with_summary(summary));
                            true
                        });
                        self.status.set(Status::new(status::SUMMARIZED));
                        if updated {
                            info!(message_id = %id, "summary attached");
                            Outcome::Updated(id)
                        } else {
                            debug!(message_id = %id, "message removed before its summary arrived");
                            Outcome::Unchanged(Unchanged::NotFound)
                        }
                    }
                    Err(e) => self.failed(e),
                }
            }
            JobKind::SummarizeTranslation { source_id, text, lang } => {
                match self.gateway.summarize(&text, &SummarizeOptions::within(lang.clone())).await {
                    Ok(summary) => {
                        let message = Message::summary_of_translation(self.ids.next_id(), summary, lang, source_id);
                        let id = message.id();
                        self.log.send_modify(|log| *log = log.append(message));
                        info!(message_id = %id, %source_id, "translation summary appended");
                        self.status.set(Status::new(status::SUMMARIZED));
                        Outcome::Appended(id)
                    }
                    Err(e) => self.failed(e),
                }
            }
        }
    }

    async fn drive(&self, step: Step) -> Outcome {
        match step {
            Step::Done(outcome) => outcome,
            Step::Pending(job) => self.complete(job).await,
        }
    }

    fn failed(&self, error: ServiceError) -> Outcome {
        warn!(error = %error, "operation failed");
        self.status.set(Status::error(&error));
        Outcome::Failed(error)
    }
}

fn startup_status(report: &InitReport) -> Status {
    if report.any_absent() {
        Status::new(status::SERVICES_MISSING)
    } else if report.any_failed() {
        Status::new(status::SERVICES_FAILED)
    } else {
        Status::new(status::SERVICES_READY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{FailingFactory, MockDetector, MockSummarizer, MockTranslatorFactory};
    use crate::status::StatusLevel;

    fn capabilities() -> Capabilities {
        Capabilities::new()
            .with_detector(MockDetector::new())
            .with_translator(MockTranslatorFactory::new())
            .with_summarizer(MockSummarizer::new())
    }

    #[tokio::test]
    async fn startup_status_reflects_readiness() {
        let ready = Orchestrator::start(capabilities(), &CoreConfig::default()).await;
        assert_eq!(ready.status().text(), status::SERVICES_READY);

        let missing = Orchestrator::start(Capabilities::new(), &CoreConfig::default()).await;
        assert_eq!(missing.status().text(), status::SERVICES_MISSING);

        let broken = Capabilities::new()
            .with_detector(FailingFactory::new("no weights"))
            .with_translator(MockTranslatorFactory::new())
            .with_summarizer(MockSummarizer::new());
        let failed = Orchestrator::start(broken, &CoreConfig::default()).await;
        assert_eq!(failed.status().text(), status::SERVICES_FAILED);
        assert_eq!(failed.status().level(), StatusLevel::Error);
    }

    #[tokio::test]
    async fn defaults_before_any_message() {
        let orchestrator = Orchestrator::start(capabilities(), &CoreConfig::default()).await;
        assert_eq!(orchestrator.detected_language(), DetectedLanguage::Pending);
        assert_eq!(orchestrator.selected_language().as_str(), "es");
        assert_eq!(orchestrator.primary_action(), PrimaryAction::Send);
        assert!(orchestrator.snapshot().is_empty());
    }

    #[tokio::test]
    async fn select_language_rejects_unsupported_tags() {
        let orchestrator = Orchestrator::start(capabilities(), &CoreConfig::default()).await;
        assert_eq!(
            orchestrator.select_language("de"),
            Err(ServiceError::UnsupportedLanguage("de".into()))
        );
        assert_eq!(orchestrator.selected_language().as_str(), "es");
        assert_eq!(orchestrator.select_language("FR").unwrap().as_str(), "fr");
    }

    #[tokio::test]
    async fn begin_send_appends_before_detection_runs() {
        let orchestrator = Orchestrator::start(capabilities(), &CoreConfig::default()).await;
        let step = orchestrator.begin_send("hello there");

        assert_eq!(orchestrator.snapshot().len(), 1);
        assert_eq!(orchestrator.status().text(), status::DETECTING);
        let Step::Pending(job) = step else { panic!("expected a pending detection") };

        let outcome = orchestrator.complete(job).await;
        assert!(matches!(outcome, Outcome::Appended(_)));
        assert_eq!(orchestrator.status().text(), status::DETECTED);
    }
}
