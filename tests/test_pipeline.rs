mod common;
use common::{protocol, remove_nth, standard_block, to_table, Run};
use innerspeech::codes::EXCLUDE;
use innerspeech::{
    process_block, Class, Condition, ConditionOverride, CorrectionConfig, Event, EventError,
};

fn with_noise(mut events: Vec<Event>) -> Vec<Event> {
    let stamps: Vec<u64> = events.iter().step_by(17).map(|e| e.timestamp + 3).collect();
    for t in stamps {
        events.push(Event::new(t, 65536, EXCLUDE));
    }
    events
}

#[test]
fn clean_block_end_to_end() {
    let events = standard_block();
    let last = events.last().unwrap().timestamp;
    let out = process_block(&to_table(&events), 1, 2, &CorrectionConfig::default()).unwrap();

    assert!(out.repaired.anomalies.is_empty());
    assert!(!out.baseline_inserted);
    assert_eq!(out.trials.len(), 24);
    assert_eq!(out.condition_counts, [[2, 2, 2, 2]; 3]);
    assert_eq!(out.report.subject, "sub-01");
    assert_eq!(out.report.block, 2);
    assert_eq!(out.report.ans_r, 6);
    assert_eq!(out.report.ans_w, 0);
    assert_eq!(out.report.n_corrections, 0);
    assert_eq!(out.report.n_events, events.len());
    assert_eq!(out.report.recording_time_s, (last as f64 / 1024.0).round() as u64);
}

#[test]
fn excluded_codes_and_omissions_are_handled() {
    let events = remove_nth(&standard_block(), 45, 4);
    let events = remove_nth(&events, 42, 17);
    let events = remove_nth(&events, 14, 0);
    let n_clean = events.len();
    let table = to_table(&with_noise(events));

    let out = process_block(&table, 12, 3, &CorrectionConfig::default()).unwrap();
    let s = &out.repaired.stream;
    assert!(out.baseline_inserted);
    assert!(s.codes().all(|c| c != EXCLUDE));
    assert_eq!(s[3].code, 14);
    assert_eq!(s[3].timestamp, s[2].timestamp + 15360);
    assert_eq!(out.repaired.inserted.len(), 2);
    assert_eq!(s.len(), n_clean + 3);
    assert!(s.is_sorted());
    assert_eq!(out.report.subject, "sub-12");
    assert_eq!(out.report.n_corrections, 2);
}

#[test]
fn trials_carry_condition_block_and_label() {
    let out = process_block(&to_table(&standard_block()), 4, 1, &CorrectionConfig::default()).unwrap();
    let first_inner = out.trials.iter().find(|t| t.condition == Condition::Inner).unwrap();
    assert_eq!(first_inner.class, Class::Up);
    assert_eq!(first_inner.class.label(), 0);
    assert!(out.trials.iter().all(|t| t.block == 1));
    assert!(out.trials.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    assert_eq!(out.trials[..8].iter().filter(|t| t.condition == Condition::Pronounced).count(), 8);
}

#[test]
fn double_omission_aborts_block() {
    let events = remove_nth(&standard_block(), 45, 6);
    let events = remove_nth(&events, 46, 6);
    let err = process_block(&to_table(&events), 1, 1, &CorrectionConfig::default()).unwrap_err();
    assert!(matches!(err, EventError::UnrepairedSequence { .. }), "{err}");
}

#[test]
fn short_table_is_malformed() {
    let events = &standard_block()[..3];
    let err = process_block(&to_table(events), 1, 1, &CorrectionConfig::default()).unwrap_err();
    assert!(matches!(err, EventError::MalformedInput(_)));
}

#[test]
fn baseline_check_can_be_disabled() {
    let events = remove_nth(&standard_block(), 14, 0);
    let cfg = CorrectionConfig { check_baseline: false, ..CorrectionConfig::default() };
    let err = process_block(&to_table(&events), 1, 1, &cfg).unwrap_err();
    assert_eq!(err, EventError::MissingStartMarkers { counts: [1, 1, 1, 0] });
}

#[test]
fn unbalanced_condition_fails_unless_disabled() {
    // Same tag totals overall, but the pronounced run has two extra ups
    // and the inner run two extra downs.
    let mut pron = Run::balanced(21, 8, 0);
    pron.trials[1].tag = 31;
    let mut inner = Run::balanced(22, 8, 0);
    inner.trials[0].tag = 32;
    let events = protocol(&[pron, inner, Run::balanced(23, 8, 0)]);
    let table = to_table(&events);

    let err = process_block(&table, 1, 1, &CorrectionConfig::default()).unwrap_err();
    assert_eq!(err, EventError::UnbalancedConditionTags {
        condition: "pronounced",
        counts: [3, 1, 2, 2],
    });

    let cfg = CorrectionConfig { check_condition_balance: false, ..CorrectionConfig::default() };
    let out = process_block(&table, 1, 1, &cfg).unwrap();
    assert_eq!(out.condition_counts[1], [1, 3, 2, 2]);
}

#[test]
fn known_override_applies_only_to_its_recording() {
    let events = protocol(&[
        Run::balanced(21, 40, 0),
        Run::balanced(22, 80, 0),
        Run::balanced(23, 80, 0),
    ]);
    let table = to_table(&events);
    let cfg = CorrectionConfig { overrides: ConditionOverride::known(), ..CorrectionConfig::default() };

    let out = process_block(&table, 3, 1, &cfg).unwrap();
    let counts = innerspeech::annotate::condition_counts(&out.trials);
    assert_eq!(counts, [40, 40, 120]);

    let other = process_block(&table, 3, 2, &cfg).unwrap();
    assert_eq!(innerspeech::annotate::condition_counts(&other.trials), [40, 80, 80]);
}
