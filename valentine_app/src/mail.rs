//! Best-effort quiz report delivery.
//!
//! The quiz page fires the finished answer list at a tiny relay endpoint and
//! moves on — delivery happens on its own thread, every failure is logged and
//! swallowed. Without the `mail` feature, or without credentials in the
//! environment, the report is written to the log instead (so nothing is ever
//! silently lost).

use std::env;
use std::thread;

use serde::Serialize;

use crate::quiz::QuizAnswer;

/// Relay URL, e.g. `https://example.com/api/send-quiz`.
const ENDPOINT_VAR: &str = "VALENTINE_MAIL_ENDPOINT";
/// Bearer token the relay expects.
const KEY_VAR: &str = "VALENTINE_MAIL_KEY";

#[derive(Debug, Serialize)]
pub struct QuizReport {
    pub answers: Vec<QuizAnswer>,
}

/// Hand the answers off for delivery; returns immediately.
pub fn deliver(answers: Vec<QuizAnswer>) {
    thread::spawn(move || {
        send_report(&QuizReport { answers });
    });
}

fn send_report(report: &QuizReport) {
    let endpoint = env::var(ENDPOINT_VAR).ok();
    let key = env::var(KEY_VAR).ok();

    match (endpoint, key) {
        (Some(endpoint), Some(key)) => post_report(report, &endpoint, &key),
        _ => {
            log::info!("mail relay not configured ({ENDPOINT_VAR}/{KEY_VAR} unset)");
            log_report(report);
        }
    }
}

#[cfg(feature = "mail")]
fn post_report(report: &QuizReport, endpoint: &str, key: &str) {
    let client = reqwest::blocking::Client::new();
    match client.post(endpoint).bearer_auth(key).json(report).send() {
        Ok(resp) if resp.status().is_success() => {
            log::info!("quiz report delivered ({} answers)", report.answers.len());
        }
        Ok(resp) => {
            log::warn!("mail relay answered {} — report logged instead", resp.status());
            log_report(report);
        }
        Err(e) => {
            log::warn!("mail relay unreachable ({e}) — report logged instead");
            log_report(report);
        }
    }
}

#[cfg(not(feature = "mail"))]
fn post_report(report: &QuizReport, _endpoint: &str, _key: &str) {
    log::info!("built without the `mail` feature — report logged instead");
    log_report(report);
}

fn log_report(report: &QuizReport) {
    log::info!("=== quiz answers ===");
    for (i, a) in report.answers.iter().enumerate() {
        match &a.selected_option {
            Some(label) => log::info!("Q{}: {} -> [{}] {}", i + 1, a.question, label, a.answer),
            None => log::info!("Q{}: {} -> {}", i + 1, a.question, a.answer),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> QuizReport {
        QuizReport {
            answers: vec![
                QuizAnswer {
                    question_id: 1,
                    question: "first".into(),
                    answer: "an answer".into(),
                    selected_option: None,
                },
                QuizAnswer {
                    question_id: 3,
                    question: "second".into(),
                    answer: "picked".into(),
                    selected_option: Some("B".into()),
                },
            ],
        }
    }

    #[test]
    fn report_payload_shape() {
        let json = serde_json::to_value(sample_report()).unwrap();
        let answers = json.get("answers").and_then(|v| v.as_array()).unwrap();
        assert_eq!(answers.len(), 2);
        assert_eq!(answers[0]["questionId"], 1);
        assert_eq!(answers[1]["selectedOption"], "B");
        assert!(answers[0].get("selectedOption").is_none());
    }

    #[test]
    fn unconfigured_send_logs_and_returns() {
        // No endpoint/key in the test environment: must not panic or block.
        send_report(&sample_report());
    }
}
