use std::sync::{Arc, Mutex};

use fourc_scoring::{
    PlotUpdate, RiskBand, ScoreError, ScoreTable, Session, SessionState, UnitMapping,
    UnitSystem, ValueScore, VariableDefinition,
};

const HIGH_RISK: [(&str, &str); 8] = [
    ("age", "70-79"),
    ("sex", "Male"),
    ("comorbidities", "⩾2"),
    ("respiratory_rate", "⩾30"),
    ("oxygen_saturation", "<92"),
    ("gcs", "<15"),
    ("urea", ">14"),
    ("crp", "⩾100"),
];

fn session() -> Session {
    Session::new(Arc::new(ScoreTable::isaric_4c().expect("built-in table is valid")))
}

fn answer_all(session: &mut Session, answers: &[(&str, &str)]) {
    for (key, label) in answers {
        session.select_value(key, label).unwrap();
    }
}

/// All orderings of `items`, by Heap's algorithm.
fn permutations<T: Clone>(items: &[T]) -> Vec<Vec<T>> {
    let mut items = items.to_vec();
    let mut counters = vec![0; items.len()];
    let mut out = vec![items.clone()];
    let mut i = 0;
    while i < items.len() {
        if counters[i] < i {
            if i % 2 == 0 {
                items.swap(0, i);
            } else {
                items.swap(counters[i], i);
            }
            out.push(items.clone());
            counters[i] += 1;
            i = 0;
        } else {
            counters[i] = 0;
            i += 1;
        }
    }
    out
}

#[test]
fn high_risk_patient_scores_20() {
    let mut session = session();
    answer_all(&mut session, &HIGH_RISK);

    assert_eq!(session.state(), SessionState::Complete);
    let total = session.current_total().unwrap();
    assert_eq!(total.value(), 20);

    let result = session.result_for(total).unwrap();
    assert_eq!(result.score, 20);
    assert_eq!(result.band.name, "Very High");
    assert!((result.mortality - 82.9).abs() < 0.05);
}

#[test]
fn partial_answers_have_no_total() {
    let mut session = session();
    answer_all(&mut session, &HIGH_RISK[..5]);

    assert_eq!(session.answered(), 5);
    assert_eq!(session.state(), SessionState::Incomplete);
    assert_eq!(session.current_total(), None);
    assert_eq!(session.result().unwrap(), None);
}

#[test]
fn total_is_absent_until_the_last_variable_is_answered() {
    let mut session = session();
    for (i, (key, label)) in HIGH_RISK.iter().enumerate() {
        assert!(session.current_total().is_none(), "after {i} answers");
        session.select_value(key, label).unwrap();
    }
    assert!(session.current_total().is_some());
}

#[test]
fn selection_order_does_not_change_total() {
    for order in permutations(&HIGH_RISK) {
        let mut session = session();
        answer_all(&mut session, &order);
        assert_eq!(session.current_total().map(|t| t.value()), Some(20));
    }
}

#[test]
fn reselecting_overwrites_previous_contribution() {
    let mut session = session();
    answer_all(&mut session, &HIGH_RISK);

    session.select_value("age", "18-49").unwrap();
    session.select_value("urea", "<7").unwrap();
    session.select_value("urea", "7-14").unwrap();

    assert_eq!(session.contribution("age"), Some(0));
    assert_eq!(session.contribution("urea"), Some(1));
    assert_eq!(session.state(), SessionState::Complete);
    assert_eq!(session.current_total().unwrap().value(), 12);
}

#[test]
fn lowest_risk_patient_scores_0() {
    let mut session = session();
    answer_all(
        &mut session,
        &[
            ("age", "18-49"),
            ("sex", "Female"),
            ("comorbidities", "0"),
            ("respiratory_rate", "<20"),
            ("oxygen_saturation", "⩾92"),
            ("gcs", "15"),
            ("urea", "<7"),
            ("crp", "<50"),
        ],
    );
    let result = session.result().unwrap().unwrap();
    assert_eq!(result.score, 0);
    assert_eq!(result.band.name, "Low");
    assert_eq!(result.mortality, 0.0);
}

#[test]
fn unknown_variable_is_rejected() {
    let mut session = session();
    assert_eq!(
        session.select_value("heart_rate", "100").unwrap_err(),
        ScoreError::UnknownVariable("heart_rate".to_string())
    );
    assert_eq!(session.answered(), 0);
}

#[test]
fn unknown_value_is_rejected() {
    let mut session = session();
    assert_eq!(
        session.select_value("age", "90+").unwrap_err(),
        ScoreError::UnknownValue {
            variable: "age".to_string(),
            label: "90+".to_string()
        }
    );
    assert_eq!(session.contribution("age"), None);
}

#[test]
fn alternate_urea_scores_like_primary() {
    let mut primary = session();
    let mut alternate = session();
    alternate.set_unit_system("urea", UnitSystem::Alternate).unwrap();

    assert_eq!(primary.select_value("urea", ">14").unwrap(), 3);
    assert_eq!(alternate.select_value("urea", ">39.2").unwrap(), 3);
    assert_eq!(primary.selection("urea"), alternate.selection("urea"));
}

#[test]
fn labels_resolve_against_displayed_units_only() {
    let mut session = session();
    assert!(matches!(
        session.select_value("crp", "⩾10"),
        Err(ScoreError::UnknownValue { .. })
    ));

    session.toggle_units("crp").unwrap();
    assert!(matches!(
        session.select_value("crp", "⩾100"),
        Err(ScoreError::UnknownValue { .. })
    ));
    assert_eq!(session.select_value("crp", "⩾10").unwrap(), 2);
}

#[test]
fn toggling_units_keeps_the_answer() {
    let mut session = session();
    session.select_value("urea", "7-14").unwrap();
    assert_eq!(session.highlighted_label("urea").unwrap(), Some("7-14"));

    assert_eq!(session.toggle_units("urea").unwrap(), UnitSystem::Alternate);
    assert_eq!(session.highlighted_label("urea").unwrap(), Some("19.6-39.2"));
    assert_eq!(session.contribution("urea"), Some(1));

    assert_eq!(session.toggle_units("urea").unwrap(), UnitSystem::Primary);
    assert_eq!(session.highlighted_label("urea").unwrap(), Some("7-14"));
}

#[test]
fn variables_without_alternate_cannot_switch() {
    let mut session = session();
    assert_eq!(
        session.toggle_units("age").unwrap_err(),
        ScoreError::NoAlternateUnits("age".to_string())
    );
    assert_eq!(session.unit_system("age"), UnitSystem::Primary);
    session.set_unit_system("age", UnitSystem::Primary).unwrap();
}

#[test]
fn highlighted_label_for_unknown_or_unanswered() {
    let session = session();
    assert_eq!(session.highlighted_label("gcs").unwrap(), None);
    assert!(session.highlighted_label("bmi").is_err());
}

#[test]
fn plot_sink_sees_changes_only() {
    let seen: Arc<Mutex<Vec<PlotUpdate>>> = Arc::default();
    let mut session = session();
    let sink = Arc::clone(&seen);
    session.subscribe(Box::new(move |update: &PlotUpdate| {
        sink.lock().unwrap().push(update.clone());
    }));

    answer_all(&mut session, &HIGH_RISK);
    // Same points in other words: no change to report.
    session.select_value("age", "70-79").unwrap();
    session.select_value("age", "⩾80").unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 3);
    assert_eq!(seen[0], PlotUpdate::default());
    assert_eq!(seen[1].score, Some(20));
    assert_eq!(seen[1].band.as_ref().unwrap().name, "Very High");
    assert_eq!(seen[2].score, Some(21));
    assert_eq!(seen[2].mortality, Some(87.5));
}

#[test]
fn sessions_share_a_table_but_not_answers() {
    let table = Arc::new(ScoreTable::isaric_4c().unwrap());
    let mut first = Session::new(Arc::clone(&table));
    let second = Session::new(Arc::clone(&table));

    answer_all(&mut first, &HIGH_RISK);
    assert_eq!(first.state(), SessionState::Complete);
    assert_eq!(second.answered(), 0);
    assert_eq!(second.current_total(), None);
}

#[test]
fn rejected_selection_leaves_state_untouched() {
    let mut session = session();
    answer_all(&mut session, &HIGH_RISK);

    assert!(session.select_value("urea", ">39.2").is_err());
    assert!(session.select_value("pulse", "fast").is_err());

    assert_eq!(session.contribution("urea"), Some(3));
    assert_eq!(session.highlighted_label("urea").unwrap(), Some(">14"));
    assert_eq!(session.current_total().unwrap().value(), 20);
}

#[test]
fn total_from_a_larger_table_is_out_of_range() {
    let small = ScoreTable::new(
        vec![VariableDefinition {
            key: "flag".to_string(),
            primary: UnitMapping {
                display_name: "Flag".to_string(),
                value_scores: vec![
                    ValueScore { label: "no".to_string(), points: 0 },
                    ValueScore { label: "yes".to_string(), points: 1 },
                ],
            },
            alternate: None,
            help: None,
        }],
        vec![0.0, 50.0],
        vec![10, 10],
        vec![RiskBand {
            name: "Any".to_string(),
            min: 0,
            max: 1,
            color: "#000000".to_string(),
            mortality: 25.0,
        }],
    )
    .unwrap();
    let mut small = Session::new(Arc::new(small));
    small.select_value("flag", "yes").unwrap();
    assert_eq!(small.result().unwrap().unwrap().score, 1);

    let mut large = session();
    answer_all(&mut large, &HIGH_RISK);
    let total = large.current_total().unwrap();

    assert_eq!(
        small.result_for(total).unwrap_err(),
        ScoreError::OutOfRange { score: 20, max: 1 }
    );
}
