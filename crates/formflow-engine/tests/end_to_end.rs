//! Whole-instance walks through the engine.

use std::cell::RefCell;
use std::rc::Rc;

use formflow_core::codec::{DocumentFormat, parse_app_yaml};
use formflow_core::submission::WriteTemplate;
use formflow_core::value::ValueContainer;
use formflow_core::{App, Form, InputField, PermissionLevel, Permissions, Section, Task, Workflow};
use formflow_engine::{
    Engine, EngineError, EngineOptions, InstanceStatus, SectionMode, SubmissionError,
    ViewOutcome, WriteOutcome, WriteValidation,
};
use pretty_assertions::assert_eq;

const ONBOARDING: &str = include_str!("../../formflow-core/tests/fixtures/onboarding_app.yaml");

fn two_step_app() -> App {
    App::new(
        "A",
        None,
        Form::new([
            Section::new("S1").field(InputField::text("Name")),
            Section::new("S2"),
        ]),
        Workflow::new(vec![
            Task::start(
                "anyone",
                Permissions::new(PermissionLevel::Hidden).section("S1", PermissionLevel::Editable),
            ),
            Task::input("T1", ["req.initiator"], Permissions::new(PermissionLevel::Hidden)),
        ])
        .unwrap(),
    )
    .unwrap()
}

#[test]
fn start_then_initiator_input() {
    let mut engine = Engine::new();
    let app = engine.register_app(two_step_app());
    let inst = engine.new_app_instance(app, "u").unwrap();

    let view = engine.view_as(inst, "u").unwrap();
    let sections: Vec<_> = view
        .view()
        .unwrap()
        .sections
        .iter()
        .map(|s| (s.name.clone(), s.mode))
        .collect();
    assert_eq!(sections, vec![("S1".to_string(), SectionMode::ReadWrite)]);

    let template = engine.write_template(inst, "u").unwrap();
    engine.write_as(inst, "u", &template).unwrap();

    let instance = engine.instance(inst).unwrap();
    assert_eq!(instance.current_step(), "T1");
    assert_eq!(instance.current_assignee(), Some("req.initiator"));
    assert!(instance.compare_user(instance.current_assignee(), "u"));
    assert_eq!(
        engine.view_as(inst, "u").unwrap().to_string(),
        "Task::: T1"
    );
}

#[test]
fn submitted_template_round_trips_through_json() {
    let mut engine = Engine::new();
    let app = engine.register_app(two_step_app());
    let inst = engine.new_app_instance(app, "u").unwrap();

    let mut template = engine.write_template(inst, "u").unwrap();
    if let Some(data) = template.data.as_mut() {
        data.insert(
            "S1".into(),
            vec![ValueContainer::Text {
                id: "Name".into(),
                value: "Jane".into(),
            }],
        );
    }
    let json = serde_json::to_string(&template).unwrap();
    engine
        .write_as_document(inst, "u", &json, DocumentFormat::Json)
        .unwrap();

    let ctx = engine.instance(inst).unwrap().context();
    assert_eq!(ctx.latest_value("S1", "Name").and_then(|v| v.as_text()), Some("Jane"));
}

#[test]
fn stale_template_is_rejected_after_advance() {
    let mut engine = Engine::new();
    let app = engine.register_app(two_step_app());
    let inst = engine.new_app_instance(app, "u").unwrap();

    let template = engine.write_template(inst, "u").unwrap();
    engine.write_as(inst, "u", &template).unwrap();

    let err = engine.write_as(inst, "u", &template).unwrap_err();
    assert!(matches!(
        err,
        EngineError::Submission(SubmissionError::StaleSubmission {
            expected: Some(1),
            submitted: 0
        })
    ));
}

#[test]
fn onboarding_walk_in_strict_mode() {
    let mut engine = Engine::new();
    let app = engine.register_app(parse_app_yaml(ONBOARDING).unwrap());
    let inst = engine.new_app_instance(app, "ian@test.com").unwrap();

    let template = engine.write_template(inst, "ian@test.com").unwrap();
    assert_eq!(template.section_names(), vec!["Employee Onboarding"]);
    engine.write_as(inst, "ian@test.com", &template).unwrap();

    let template = engine.write_template(inst, "ian@test.com").unwrap();
    assert_eq!(
        template.section_names(),
        vec!["Employee Personal Details", "Employee Bank Details", "Document Proofs"]
    );
    let dumped =
        formflow_core::codec::dump_write_template(&template, DocumentFormat::Yaml).unwrap();
    let personal = dumped.find("Employee Personal Details:").unwrap();
    let proofs = dumped.find("Document Proofs:").unwrap();
    assert!(personal < proofs);
    assert_eq!(
        engine.write_as(inst, "ian@test.com", &template).unwrap(),
        WriteOutcome::Advanced {
            from: "Update Employee Information".into(),
            to: "Approve".into()
        }
    );

    // Dynamic identity expressions are not resolved.
    assert_eq!(
        engine.view_as(inst, "ian@test.com").unwrap(),
        ViewOutcome::Denied {
            assignee: Some("form.reporting manager".into())
        }
    );
    assert!(engine.write_template(inst, "ian@test.com").unwrap().is_denied());
}

#[test]
fn onboarding_runs_to_completion_without_validation() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut engine = Engine::with_options(EngineOptions::permissive());
    let sink = Rc::clone(&log);
    engine.on_complete(move |index, instance| {
        sink.borrow_mut().push((index, instance.current_step().to_string()));
    });

    let app = engine.register_app(parse_app_yaml(ONBOARDING).unwrap());
    let inst = engine.new_app_instance(app, "ian@test.com").unwrap();

    let mut steps = Vec::new();
    loop {
        let step = engine.instance(inst).unwrap().current_step().to_string();
        match engine.write_as(inst, "ian@test.com", &WriteTemplate::default()).unwrap() {
            WriteOutcome::Advanced { .. } => steps.push(step),
            WriteOutcome::Completed { .. } => {
                steps.push(step);
                break;
            }
            WriteOutcome::AlreadyCompleted => unreachable!("loop exits on completion"),
        }
    }

    assert_eq!(
        steps,
        vec![
            "start",
            "Update Employee Information",
            "Approve",
            "permission_branch",
            "Reporting Manager's Review",
            "HR Review",
        ]
    );
    assert_eq!(
        engine.write_as(inst, "anyone", &WriteTemplate::default()).unwrap(),
        WriteOutcome::AlreadyCompleted
    );
    assert_eq!(*log.borrow(), vec![(0, "HR Review".to_string())]);

    let instance = engine.instance(inst).unwrap();
    assert_eq!(instance.status(), InstanceStatus::Completed);
    assert_eq!(instance.submissions().len(), 6);
}

#[test]
fn warn_mode_records_violating_writes() {
    let mut engine = Engine::with_options(EngineOptions {
        write_validation: WriteValidation::Warn,
        ..EngineOptions::default()
    });
    let app = engine.register_app(two_step_app());
    let inst = engine.new_app_instance(app, "u").unwrap();

    engine
        .write_as(inst, "intruder", &WriteTemplate::default())
        .unwrap();
    let instance = engine.instance(inst).unwrap();
    assert_eq!(instance.current_step(), "T1");
    assert_eq!(instance.submissions()[0].user, "intruder");
}

#[test]
fn start_policy_sees_the_app() {
    let mut engine = Engine::new()
        .with_start_policy(|app: &App, user: &str| app.name() != "A" || user.ends_with("@test.com"));
    let app = engine.register_app(two_step_app());

    let err = engine.new_app_instance(app, "guest@example.org").unwrap_err();
    assert!(matches!(err, EngineError::StartDenied { .. }));
    assert_eq!(engine.new_app_instance(app, "ian@test.com").unwrap(), 0);
}
