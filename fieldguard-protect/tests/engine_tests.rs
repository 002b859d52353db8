use fieldguard_crypto::EncryptionCodec;
use fieldguard_datasets::{Column, Dataset};
use fieldguard_protect::{
    Classification, ColumnClassifier, ColumnOutcome, ConfidentialFieldSet, DECRYPTION_FAILED_MARKER,
    Operation, ProtectError, ProtectionEngine, Transform, TransformState,
};
use pretty_assertions::assert_eq;

fn engine() -> ProtectionEngine {
    ProtectionEngine::new(EncryptionCodec::generate())
}

fn people() -> Dataset {
    Dataset::new(vec![
        Column::from_values("name", ["Ann", "Bob"]),
        Column::from_values("email", ["a@x.com", "b@y.org"]),
        Column::from_values("salary", ["1000", "2000"]),
    ])
    .unwrap()
}

fn fields(names: &[&str]) -> ConfidentialFieldSet {
    ConfidentialFieldSet::explicit(names.iter().copied())
}

fn cells<'a>(dataset: &'a Dataset, column: &str) -> Vec<Option<&'a str>> {
    let column = dataset.column(column).unwrap();
    (0..column.len()).map(|row| column.get(row)).collect()
}

// ── forward transforms ───────────────────────────────────────────

#[test]
fn mask_only_touches_confidential_columns() {
    let engine = engine();
    let input = people();
    let out = engine
        .apply(&input, &fields(&["email"]), &TransformState::new(), Transform::Mask)
        .unwrap();

    assert_eq!(cells(&out.dataset, "email"), vec![Some("*@x.com"), Some("*@y.org")]);
    assert_eq!(cells(&out.dataset, "name"), cells(&input, "name"));
    assert_eq!(cells(&out.dataset, "salary"), cells(&input, "salary"));
    assert!(!out.state.has_encrypted());
    assert_eq!(out.report.touched_columns(), vec!["email"]);
    assert_eq!(out.report.summary, "Masking applied to 1 confidential field(s): email.");
}

#[test]
fn inputs_are_not_mutated() {
    let engine = engine();
    let input = people();
    let state = TransformState::new();
    engine
        .apply(&input, &fields(&["salary"]), &state, Transform::Encrypt)
        .unwrap();

    assert_eq!(input, people());
    assert!(!state.has_encrypted());
}

#[test]
fn null_cells_survive_transforms() {
    let engine = engine();
    let input = Dataset::new(vec![Column::new(
        "phone",
        vec![Some("555-0101".into()), None, Some(" ".into())],
    )])
    .unwrap();

    for transform in Transform::ALL {
        let out = engine
            .apply(&input, &fields(&["phone"]), &TransformState::new(), transform)
            .unwrap();
        let column = out.dataset.column("phone").unwrap();
        assert_eq!(column.cells()[1], None, "{transform}");
        assert_eq!(column.cells()[2].as_deref(), Some(" "), "{transform}");
        assert_ne!(column.get(0), Some("555-0101"), "{transform}");
    }
}

#[test]
fn apply_all_leaves_column_plaintext_in_state() {
    let engine = engine();
    let out = engine
        .apply(&people(), &fields(&["email"]), &TransformState::new(), Transform::ApplyAll)
        .unwrap();

    assert!(!out.state.is_encrypted("email"));
    assert_ne!(cells(&out.dataset, "email"), cells(&people(), "email"));
}

// ── encryption state machine ─────────────────────────────────────

#[test]
fn encrypt_then_decrypt_restores_values() {
    let engine = engine();
    let selection = fields(&["salary"]);

    let encrypted = engine
        .apply(&people(), &selection, &TransformState::new(), Transform::Encrypt)
        .unwrap();
    assert!(encrypted.state.is_encrypted("salary"));
    for value in cells(&encrypted.dataset, "salary") {
        let value = value.unwrap();
        assert!(value != "1000" && value != "2000");
    }

    let decrypted = engine
        .decrypt(&encrypted.dataset, &selection, &encrypted.state)
        .unwrap();
    assert!(!decrypted.state.is_encrypted("salary"));
    assert_eq!(cells(&decrypted.dataset, "salary"), vec![Some("1000"), Some("2000")]);
    assert_eq!(decrypted.report.outcome_of("salary"), Some(&ColumnOutcome::Decrypted));
    assert!(decrypted.report.failures.is_empty());
}

#[test]
fn encrypting_twice_is_a_no_op() {
    let engine = engine();
    let selection = fields(&["salary"]);
    let once = engine
        .apply(&people(), &selection, &TransformState::new(), Transform::Encrypt)
        .unwrap();
    let twice = engine
        .apply(&once.dataset, &selection, &once.state, Transform::Encrypt)
        .unwrap();

    assert_eq!(twice.dataset, once.dataset);
    assert_eq!(twice.report.outcome_of("salary"), Some(&ColumnOutcome::AlreadyEncrypted));
    assert_eq!(
        twice.report.summary,
        "Encryption made no changes. Already encrypted: salary."
    );

    // a single decrypt is enough
    let plain = engine.decrypt(&twice.dataset, &selection, &twice.state).unwrap();
    assert_eq!(cells(&plain.dataset, "salary"), vec![Some("1000"), Some("2000")]);
}

#[test]
fn decrypting_plaintext_is_a_no_op() {
    let engine = engine();
    let out = engine
        .decrypt(&people(), &fields(&["salary"]), &TransformState::new())
        .unwrap();

    assert_eq!(out.dataset, people());
    assert_eq!(out.report.outcome_of("salary"), Some(&ColumnOutcome::NotEncrypted));
}

#[test]
fn irreversible_transforms_skip_encrypted_columns() {
    let engine = engine();
    let selection = fields(&["email", "salary"]);
    let mut state = TransformState::new();
    let encrypted = engine
        .apply(&people(), &fields(&["salary"]), &state, Transform::Encrypt)
        .unwrap();
    state = encrypted.state;

    let masked = engine
        .apply(&encrypted.dataset, &selection, &state, Transform::Mask)
        .unwrap();
    assert_eq!(masked.report.outcome_of("salary"), Some(&ColumnOutcome::SkippedEncrypted));
    assert_eq!(cells(&masked.dataset, "salary"), cells(&encrypted.dataset, "salary"));
    assert_eq!(
        masked.report.summary,
        "Masking applied to 1 confidential field(s): email. \
         Skipped encrypted field(s), decrypt first: salary."
    );

    let plain = engine.decrypt(&masked.dataset, &selection, &masked.state).unwrap();
    assert_eq!(cells(&plain.dataset, "salary"), vec![Some("1000"), Some("2000")]);
    assert_eq!(plain.report.outcome_of("email"), Some(&ColumnOutcome::NotEncrypted));
}

#[test]
fn decrypt_with_wrong_key_marks_failed_cells() {
    let selection = fields(&["salary"]);
    let encrypted = engine()
        .apply(&people(), &selection, &TransformState::new(), Transform::Encrypt)
        .unwrap();
    let tokens: Vec<String> = cells(&encrypted.dataset, "salary")
        .into_iter()
        .map(|c| c.unwrap().to_string())
        .collect();

    let out = engine()
        .decrypt(&encrypted.dataset, &selection, &encrypted.state)
        .unwrap();

    assert_eq!(
        cells(&out.dataset, "salary"),
        vec![Some(DECRYPTION_FAILED_MARKER), Some(DECRYPTION_FAILED_MARKER)]
    );
    assert!(!out.state.is_encrypted("salary"));
    assert_eq!(out.report.failures.len(), 2);
    assert_eq!(out.report.failures[0].row, 0);
    assert_eq!(out.report.failures[1].token, tokens[1]);
    assert!(out.report.summary.ends_with("2 cell(s) could not be decrypted."));
}

#[test]
fn failed_token_survives_only_in_report() {
    let owner = engine();
    let selection = fields(&["salary"]);
    let encrypted = owner
        .apply(&people(), &selection, &TransformState::new(), Transform::Encrypt)
        .unwrap();

    let out = engine()
        .decrypt(&encrypted.dataset, &selection, &encrypted.state)
        .unwrap();

    // The committed dataset no longer carries any ciphertext.
    for failure in &out.report.failures {
        let column = out.dataset.column(&failure.column).unwrap();
        assert!((0..column.len()).all(|row| column.get(row) != Some(failure.token.as_str())));
    }

    // Decrypting the output again, even with the right key, changes nothing.
    let again = owner.decrypt(&out.dataset, &selection, &out.state).unwrap();
    assert_eq!(again.report.columns[0].outcome, ColumnOutcome::NotEncrypted);
    assert_eq!(
        cells(&again.dataset, "salary"),
        vec![Some(DECRYPTION_FAILED_MARKER), Some(DECRYPTION_FAILED_MARKER)]
    );

    // The report tokens still open with the right key.
    let recovered: Vec<Option<String>> = out
        .report
        .failures
        .iter()
        .map(|f| owner.codec().decrypt_value(Some(&f.token)).unwrap())
        .collect();
    assert_eq!(recovered, vec![Some("1000".to_string()), Some("2000".to_string())]);
}

// ── selection handling ───────────────────────────────────────────

#[test]
fn empty_selection_is_rejected() {
    let result = engine().apply(&people(), &fields(&[]), &TransformState::new(), Transform::Mask);
    assert!(matches!(result, Err(ProtectError::NoConfidentialFields)));
}

#[test]
fn empty_dataset_is_rejected() {
    let empty = Dataset::new(vec![Column::new("email", vec![])]).unwrap();
    let result = engine().apply(&empty, &fields(&["email"]), &TransformState::new(), Transform::Mask);
    assert!(matches!(result, Err(ProtectError::NoData)));

    let result = engine().decrypt(&Dataset::default(), &fields(&["email"]), &TransformState::new());
    assert!(matches!(result, Err(ProtectError::NoData)));
}

#[test]
fn unmatched_fields_are_reported_not_fatal() {
    let out = engine()
        .apply(&people(), &fields(&["email", "ssn"]), &TransformState::new(), Transform::Hash)
        .unwrap();

    assert_eq!(out.report.unmatched_fields, vec!["ssn".to_string()]);
    assert_eq!(out.report.touched_columns(), vec!["email"]);
    assert_eq!(cells(&out.dataset, "email")[0].map(str::len), Some(10));
}

#[test]
fn only_unmatched_fields_change_nothing() {
    let out = engine()
        .apply(&people(), &fields(&["ssn"]), &TransformState::new(), Transform::Mask)
        .unwrap();
    assert_eq!(out.dataset, people());
    assert!(out.report.columns.is_empty());
    assert_eq!(out.report.summary, "Masking made no changes.");
}

// ── recommended ──────────────────────────────────────────────────

#[test]
fn recommended_applies_category_transforms() {
    let dataset = Dataset::new(vec![
        Column::from_values("email", ["a@x.com"]),
        Column::from_values("card_number", ["4111111111111111"]),
        Column::from_values("phone", ["555-0101"]),
        Column::from_values("salary", ["1000"]),
        Column::from_values("notes", ["hi"]),
    ])
    .unwrap();
    let classification: Classification = ColumnClassifier::new().classify(dataset.column_names());
    let mut selection_names: Vec<&str> = classification.columns().iter().map(|c| c.column.as_str()).collect();
    selection_names.push("notes");
    let selection = fields(&selection_names);

    let out = engine()
        .run(&dataset, &selection, &classification, &TransformState::new(), Operation::Recommended)
        .unwrap();

    let report = &out.report;
    assert_eq!(report.outcome_of("email"), Some(&ColumnOutcome::Transformed { transform: Transform::Mask }));
    assert_eq!(report.outcome_of("card_number"), Some(&ColumnOutcome::Transformed { transform: Transform::Hash }));
    assert_eq!(report.outcome_of("phone"), Some(&ColumnOutcome::Transformed { transform: Transform::Tokenize }));
    assert_eq!(report.outcome_of("salary"), Some(&ColumnOutcome::Transformed { transform: Transform::Encrypt }));
    assert_eq!(report.outcome_of("notes"), Some(&ColumnOutcome::NoCategory));

    assert_eq!(cells(&out.dataset, "email"), vec![Some("*@x.com")]);
    assert_eq!(cells(&out.dataset, "notes"), vec![Some("hi")]);
    assert!(out.state.is_encrypted("salary"));
    assert_eq!(out.report.operation, "recommended");
}
