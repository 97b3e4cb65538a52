use calendrift_core::bootstrap::BootstrapOutcome;
use calendrift_core::form::{EntryForm, SubmitError, DATE_ERROR};
use calendrift_core::header::VisibilityReport;
use calendrift_core::scroll::ScrollRestore;
use calendrift_core::storage::{FileStore, KeyValueStore};
use calendrift_core::store::ModalCommand;
use calendrift_core::window::{Boundary, SentinelSignal};
use calendrift_core::{CalendarConfig, Calendrift, EntryPatch, MonthKey};
use chrono::NaiveDate;

const SAMPLE: &str = r#"[
    {"imgUrl": "https://example.com/1.jpg", "rating": 4.5, "categories": ["food"], "date": "12/09/2025", "description": "Ramen"},
    {"imgUrl": "https://example.com/2.jpg", "rating": 3, "categories": ["walk"], "date": "02/09/2025", "description": "Park"},
    {"imgUrl": "https://example.com/3.jpg", "rating": 5, "categories": [], "date": "12/09/2025", "description": "Concert"},
    {"imgUrl": "https://example.com/4.jpg", "rating": 2, "categories": ["misc"], "date": "not a date", "description": "Broken"}
]"#;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, 14).unwrap()
}

#[test]
fn first_run_to_second_run() {
    let dir = tempfile::tempdir().unwrap();

    // First run: nothing persisted, sample data fills the store.
    let mut app = Calendrift::open(FileStore::new(dir.path()), CalendarConfig::default(), today());
    assert!(app.journal().is_empty());
    assert_eq!(app.bootstrap(|_| Ok::<_, String>(SAMPLE.into())), BootstrapOutcome::Loaded(3));

    let sorted: Vec<_> = app.journal().sorted().iter().map(|e| e.description.as_str()).collect();
    assert_eq!(sorted, ["Park", "Ramen", "Concert"]);
    assert_eq!(app.journal().entries_on("2025-9-12").count(), 2);

    // Browse in the modal.
    let ramen = app.journal().sorted()[1].id().clone();
    assert!(app.open_entry(ramen.as_str()));
    assert_eq!(app.journal().position_label(), "2 / 3");
    app.modal_command(ModalCommand::from_key("ArrowRight").unwrap());
    app.modal_command(ModalCommand::from_key("ArrowRight").unwrap());
    assert_eq!(app.journal().active_entry().unwrap().description, "Concert");
    app.modal_command(ModalCommand::Close);
    assert!(app.journal().active_entry().is_none());

    // Add through the form; a bad date keeps the form and reports the field.
    let mut form = EntryForm {
        date: "31/09/2025".into(),
        description: "Museum".into(),
        categories: "art, indoors".into(),
        ..EntryForm::default()
    };
    match app.submit_form(&mut form) {
        Err(SubmitError::Invalid(errors)) => assert_eq!(errors.date, Some(DATE_ERROR)),
        other => panic!("expected invalid form, got {other:?}"),
    }
    form.date = "13/09/2025".into();
    let museum = app.submit_form(&mut form).unwrap();
    assert_eq!(app.journal().position_of(museum.as_str()), Some(3));

    // Edit moves the entry in chronological order.
    let patch = EntryPatch {
        date: Some("01/09/2025".into()),
        ..EntryPatch::default()
    };
    assert_eq!(app.edit_entry(museum.as_str(), patch), Ok(true));
    assert_eq!(app.journal().position_of(museum.as_str()), Some(0));

    // Scroll: grow the window, focus October, save the position.
    app.on_sentinels(&[SentinelSignal::visible(Boundary::Bottom)]);
    assert_eq!(app.window().end(), 18);
    let september = app.mount_section(0, || 700.0);
    let october = app.mount_section(1, || 700.0);
    app.on_visibility(&[
        VisibilityReport::new(september.id(), 0.1),
        VisibilityReport::new(october.id(), 0.9),
    ]);
    assert_eq!(app.view().header(), MonthKey::new(2025, 9));
    assert!(app.record_scroll(3200.0, 1_757_800_000_000));
    app.unmount_section(september);
    app.unmount_section(october);

    // Second run: entries come from disk and the sample is not fetched again.
    let storage = app.into_storage();
    assert!(storage.get("calendrift-journal-v1").unwrap().is_some());
    let mut app = Calendrift::open(storage, CalendarConfig::default(), today());
    assert_eq!(app.journal().len(), 4);
    assert_eq!(app.journal().sorted()[0].description, "Museum");
    assert_eq!(
        app.bootstrap(|_: &str| -> Result<String, String> { Err("offline".into()) }),
        BootstrapOutcome::Skipped
    );
    assert_eq!(app.initial_scroll(today()), ScrollRestore::Restore(3200.0));
}

#[test]
fn monday_config_shifts_grids() {
    let config = CalendarConfig::from_json(r#"{"weekStart": 1, "windowRadius": 2}"#).unwrap();
    let mut kv = calendrift_core::storage::MemoryStore::new();
    kv.set("calendrift-scroll", "{}").unwrap();
    let app = Calendrift::open(kv, config, today());

    let sections: Vec<_> = app.sections().collect();
    assert_eq!(sections.len(), 5);
    assert_eq!(sections[0].key, MonthKey::new(2025, 6));
    // 1 September 2025 is a Monday.
    let current = &sections[2].grid;
    assert_eq!(current.cells[0], NaiveDate::from_ymd_opt(2025, 9, 1).unwrap());
    assert!(!app.storage().contains_key("calendrift-scroll"));
}

#[test]
fn delete_with_modal_open_keeps_cursor_in_range() {
    let mut app = Calendrift::open(
        calendrift_core::storage::MemoryStore::new(),
        CalendarConfig::default(),
        today(),
    );
    app.bootstrap(|_| Ok::<_, String>(SAMPLE.into()));
    let last = app.journal().sorted()[2].id().clone();
    assert!(app.open_entry(last.as_str()));
    assert!(app.delete_entry(last.as_str()));
    assert_eq!(app.journal().active_index(), 1);
    assert_eq!(app.journal().position_label(), "2 / 2");
    assert!(!app.delete_entry(last.as_str()));
}
