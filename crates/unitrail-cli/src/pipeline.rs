//! Ingest pipeline: normalize, then publish or dead-letter.
//!
//! Every invocation takes exactly one of two routes. A payload that
//! normalizes is handed to the publisher and nowhere else; a payload that
//! is rejected is recorded as a dead letter and nowhere else. Publisher
//! failures are system failures, not event rejections -- the event was
//! valid, so it is never dead-lettered.

use std::io;

use serde_json::Value;
use thiserror::Error;
use unitrail_core::error::NormalizeError;
use unitrail_core::event::NormalizedEvent;
use unitrail_core::sink::{DeadLetterEntry, DeadLetterSink, EventPublisher};
use unitrail_ingest::normalize;

/// Why an ingest invocation did not publish.
#[derive(Debug, Error)]
pub(crate) enum IngestError {
    /// The payload failed normalization and was dead-lettered.
    #[error("event rejected: {reason}")]
    Rejected {
        reason: NormalizeError,
        dlq_id: String,
    },
    /// The event normalized but the publisher could not take it.
    #[error("publish failed: {0}")]
    Publish(io::Error),
}

/// Runs one payload through normalization and routes the outcome.
///
/// A dead-letter write failure does not mask the rejection itself: the
/// entry's id is still reported so the operator can tell what was lost.
pub(crate) fn run_ingest<P, D>(
    provider: &str,
    payload: &Value,
    publisher: &mut P,
    dead_letters: &mut D,
) -> Result<NormalizedEvent, IngestError>
where
    P: EventPublisher,
    D: DeadLetterSink,
{
    match normalize(provider, payload) {
        Ok(event) => {
            publisher.publish(&event).map_err(IngestError::Publish)?;
            tracing::debug!(event_id = %event.event_id, "event published");
            Ok(event)
        }
        Err(reason) => {
            let entry = DeadLetterEntry::new(provider, payload.clone(), reason.to_string());
            let dlq_id = entry.dlq_id.clone();
            if let Err(err) = dead_letters.record(&entry) {
                tracing::warn!(%dlq_id, error = %err, "failed to record dead letter");
            }
            tracing::debug!(%dlq_id, code = reason.code(), "event dead-lettered");
            Err(IngestError::Rejected { reason, dlq_id })
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use serde_json::json;
    use unitrail_core::event::ProviderId;

    use super::*;

    #[derive(Default)]
    struct RecordingPublisher {
        published: Vec<NormalizedEvent>,
        fail: bool,
    }

    impl EventPublisher for RecordingPublisher {
        fn publish(&mut self, event: &NormalizedEvent) -> io::Result<()> {
            if self.fail {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "bus down"));
            }
            self.published.push(event.clone());
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        recorded: Vec<DeadLetterEntry>,
        fail: bool,
    }

    impl DeadLetterSink for RecordingSink {
        fn record(&mut self, entry: &DeadLetterEntry) -> io::Result<()> {
            if self.fail {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "disk full"));
            }
            self.recorded.push(entry.clone());
            Ok(())
        }
    }

    fn good_payload() -> Value {
        json!({
            "eventName": "GetObject",
            "eventTime": "2024-03-10T14:22:05Z",
            "resources": [{"ARN": "arn:aws:s3:::b/k"}],
        })
    }

    fn bad_payload() -> Value {
        json!({"eventName": "GetObject"})
    }

    #[test]
    fn valid_payload_publishes_and_leaves_no_dead_letter() {
        let mut publisher = RecordingPublisher::default();
        let mut sink = RecordingSink::default();

        let event = run_ingest("aws", &good_payload(), &mut publisher, &mut sink).unwrap();

        assert_eq!(publisher.published.len(), 1);
        assert_eq!(publisher.published[0], event);
        assert!(sink.recorded.is_empty());
        assert_eq!(event.cloud_provider, ProviderId::Aws);
    }

    #[test]
    fn rejected_payload_dead_letters_and_publishes_nothing() {
        let mut publisher = RecordingPublisher::default();
        let mut sink = RecordingSink::default();

        let err = run_ingest("aws", &bad_payload(), &mut publisher, &mut sink).unwrap_err();

        assert!(publisher.published.is_empty());
        assert_eq!(sink.recorded.len(), 1);
        match err {
            IngestError::Rejected { reason, dlq_id } => {
                assert_eq!(
                    reason,
                    NormalizeError::MissingRequiredFields {
                        provider: ProviderId::Aws,
                        missing: vec!["eventTime"],
                    }
                );
                assert_eq!(dlq_id, sink.recorded[0].dlq_id);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn dead_letter_entry_carries_the_raw_payload_and_reason_text() {
        let mut publisher = RecordingPublisher::default();
        let mut sink = RecordingSink::default();
        let payload = bad_payload();

        let err = run_ingest(" AwS ", &payload, &mut publisher, &mut sink).unwrap_err();
        let reason = match err {
            IngestError::Rejected { reason, .. } => reason,
            other => panic!("unexpected error: {other:?}"),
        };

        let entry = &sink.recorded[0];
        assert_eq!(entry.provider, " AwS ");
        assert_eq!(entry.raw_payload, payload);
        assert_eq!(entry.error_details, reason.to_string());
    }

    #[test]
    fn publish_failure_is_a_system_failure_not_a_rejection() {
        let mut publisher = RecordingPublisher {
            fail: true,
            ..Default::default()
        };
        let mut sink = RecordingSink::default();

        let err = run_ingest("aws", &good_payload(), &mut publisher, &mut sink).unwrap_err();

        assert!(matches!(err, IngestError::Publish(_)));
        assert!(
            sink.recorded.is_empty(),
            "a publishable event must never be dead-lettered"
        );
    }

    #[test]
    fn dead_letter_write_failure_still_reports_the_rejection() {
        let mut publisher = RecordingPublisher::default();
        let mut sink = RecordingSink {
            fail: true,
            ..Default::default()
        };

        let err = run_ingest("aws", &bad_payload(), &mut publisher, &mut sink).unwrap_err();

        match err {
            IngestError::Rejected { dlq_id, .. } => assert!(!dlq_id.is_empty()),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn each_rejection_gets_a_fresh_dlq_id() {
        let mut publisher = RecordingPublisher::default();
        let mut sink = RecordingSink::default();

        run_ingest("aws", &bad_payload(), &mut publisher, &mut sink).unwrap_err();
        run_ingest("aws", &bad_payload(), &mut publisher, &mut sink).unwrap_err();

        assert_eq!(sink.recorded.len(), 2);
        assert_ne!(sink.recorded[0].dlq_id, sink.recorded[1].dlq_id);
    }
}
