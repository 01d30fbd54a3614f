//! Property tests over the public evaluators.
//!
//! Quality bounds, boundary behaviour of the validator, idempotent tier
//! evaluation and the shape of generated credential IDs.

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use regex::Regex;

use skllable_core::session::QuizResult;
use skllable_core::{
    current_tier, generate_credential_id, validate_credential_format, CredentialEvaluator,
    CredentialLevel, QualityScore, SessionCandidate, SessionRecord, SessionValidator,
};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 30, 18, 0, 0).unwrap()
}

fn record(days_ago: i64, quiz: QuizResult, valid: bool) -> SessionRecord {
    let start = now() - Duration::days(days_ago) - Duration::hours(8);
    let candidate = SessionCandidate::new(
        format!("p-{days_ago}"),
        "data-analysis",
        start,
        start + Duration::minutes(30),
    )
    .unwrap()
    .with_quiz(quiz)
    .unwrap();
    SessionRecord::new(candidate, valid)
}

#[test]
fn session_length_boundaries() {
    let validator = SessionValidator::new();
    let start = now() - Duration::days(1);
    let verdict = |minutes: i64| {
        let candidate =
            SessionCandidate::new("b", "data-analysis", start, start + Duration::minutes(minutes)).unwrap();
        validator.validate(&candidate, &[])
    };

    assert!(verdict(15).is_valid);
    assert_eq!(verdict(14).reason.as_deref(), Some("Session must be at least 15 minutes"));
    assert!(verdict(180).is_valid);
    assert_eq!(verdict(181).reason.as_deref(), Some("Session cannot exceed 180 minutes"));
}

#[test]
fn cooldown_boundaries() {
    let validator = SessionValidator::new();
    let first_start = now() - Duration::days(1);
    let first = SessionRecord::new(
        SessionCandidate::new("a", "data-analysis", first_start, first_start + Duration::minutes(30))
            .unwrap(),
        true,
    );
    let after = |hours: i64| {
        let start = first.end_time() + Duration::hours(hours);
        let candidate =
            SessionCandidate::new("b", "data-analysis", start, start + Duration::minutes(30)).unwrap();
        validator.validate(&candidate, std::slice::from_ref(&first))
    };

    assert!(!after(3).is_valid);
    assert!(after(4).is_valid);
}

#[test]
fn inverted_time_range_is_an_error() {
    let start = now();
    assert!(SessionCandidate::new("x", "data-analysis", start, start).is_err());
    assert!(SessionCandidate::new("x", "data-analysis", start, start - Duration::minutes(5)).is_err());
}

#[test]
fn streak_stops_at_the_first_gap() {
    let sessions: Vec<_> = [0, 1, 2, 4, 5]
        .into_iter()
        .map(|d| record(d, QuizResult::default(), true))
        .collect();
    let intent = CredentialEvaluator::default().check_intent(&sessions, now());
    assert_eq!(intent.current_streak, 3);
    assert!(!intent.eligible);
}

#[test]
fn generated_ids_match_the_published_pattern() {
    let id = generate_credential_id("data-analysis", CredentialLevel::Intent);
    let pattern = Regex::new(r"^DA-INT-[0-9]{4}-[A-Z0-9]{6}$").unwrap();
    assert!(pattern.is_match(id.as_str()));
    assert!(validate_credential_format(id.as_str()).is_valid);
    assert!(validate_credential_format("DA-INT-2024-789ABC").is_valid);
    assert!(!validate_credential_format("bad-id").is_valid);
}

fn quiz_strategy() -> impl Strategy<Value = QuizResult> {
    (
        proptest::option::of(0.0f64..=100.0),
        proptest::option::of(0.0f64..=300.0),
    )
        .prop_map(|(score, rt)| QuizResult {
            quiz_score: score,
            avg_response_time: rt,
            ..Default::default()
        })
}

proptest! {
    #[test]
    fn quality_is_always_within_bounds(quiz in quiz_strategy()) {
        let q = QualityScore::for_session(&quiz).value();
        prop_assert!((0.3..=1.0).contains(&q), "{q}");
        if let Some(agg) = QualityScore::for_aggregate(&quiz) {
            prop_assert!((0.3..=1.0).contains(&agg.value()));
        }
    }

    #[test]
    fn tier_evaluation_is_idempotent(
        days in proptest::collection::vec((0i64..400, quiz_strategy(), any::<bool>()), 0..60)
    ) {
        let sessions: Vec<_> = days
            .into_iter()
            .map(|(d, quiz, valid)| record(d, quiz, valid))
            .collect();
        let evaluator = CredentialEvaluator::default();
        prop_assert_eq!(
            evaluator.evaluate_all(&sessions, now()),
            evaluator.evaluate_all(&sessions, now())
        );
    }

    #[test]
    fn point_tiers_never_decrease(p1 in 0u32..3000, delta in 0u32..3000) {
        prop_assert!(current_tier(p1) <= current_tier(p1 + delta));
    }
}
