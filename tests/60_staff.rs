mod common;

use std::time::Duration;

use anyhow::Result;
use chrono::NaiveDate;
use serde_json::{json, Value};

use common::{course, department, FakeBackend};
use impronta_backoffice::models::StaffCard;
use impronta_backoffice::screens::staff_edit::CroppedImage;
use impronta_backoffice::screens::{EditTab, StaffScreen};

fn card(id: i64, name: &str, email: &str) -> Value {
    json!({
        "id": id, "nome": name, "cognome": "Verdi", "mail": email,
        "ruoli": ["STAFF"],
        "corsoDiStudi": course(8, "Fisica", 2),
        "annoCorso": 2,
        "rappresentanze": [
            {"id": 40, "organoRappresentanzaId": 1, "organoNome": "Senato Accademico", "dataInizio": "2024-10-01"}
        ]
    })
}

fn directory() -> Value {
    json!([card(5, "Sara", "sara@uni.it"), card(1, "Anna", "anna@uni.it")])
}

/// Replies every staff page needs.
fn serve_directory(backend: &FakeBackend) {
    backend.reply("GET", "staff/all", 200, directory());
    backend.reply(
        "GET",
        "public/dipartimenti/all",
        200,
        json!([department(1, "Lettere", "LET"), department(2, "Scienze", "SCI")]),
    );
    backend.reply("GET", "public/dipartimento/1/corsi", 200, json!([course(3, "Storia", 1)]));
    backend.reply("GET", "public/dipartimento/2/corsi", 200, json!([course(8, "Fisica", 2)]));
    backend.reply(
        "GET",
        "admin/organi",
        200,
        json!([{"id": 1, "nome": "Senato Accademico"}, {"id": 2, "nome": "Consiglio di Amministrazione"}]),
    );
}

fn target(screen: &StaffScreen, id: i64) -> StaffCard {
    screen
        .cards
        .iter()
        .find(|c| c.id == id)
        .cloned()
        .expect("card in directory")
}

#[tokio::test]
async fn late_courses_for_previous_department_are_dropped() -> Result<()> {
    let backend = FakeBackend::start().await?;
    let app = backend.logged_in(1, &["DIRETTIVO"]).await?;
    serve_directory(&backend);
    backend.reply_after(
        "GET",
        "public/dipartimento/1/corsi",
        Duration::from_millis(150),
        json!([course(3, "Storia", 1)]),
    );

    let mut screen = StaffScreen::new(&app);
    screen.open_create().await;
    assert_eq!(screen.department_options.len(), 2);

    let first = screen.begin_department_change(Some(1)).expect("fetch for first department");
    let second = screen.begin_department_change(Some(2)).expect("fetch for second department");
    let (slow, fast) = tokio::join!(screen.fetch_courses(first), screen.fetch_courses(second));

    // the answer for department 2 lands first, the slow one for department 1 after it
    screen.finish_course_load(second, fast);
    screen.finish_course_load(first, slow);

    let names: Vec<_> = screen
        .course_options
        .options()
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(names, ["Fisica"]);
    assert_eq!(screen.course_options.parent(), Some(2));
    assert!(screen.course_options.is_enabled());
    assert!(screen.select_course(Some(8)));
    assert!(!screen.select_course(Some(3)));
    Ok(())
}

#[tokio::test]
async fn create_person_requires_course_once_enabled() -> Result<()> {
    let backend = FakeBackend::start().await?;
    let app = backend.logged_in(1, &["DIRETTIVO"]).await?;
    serve_directory(&backend);
    backend.ok("POST", "admin/persona");

    let mut screen = StaffScreen::new(&app);
    screen.open_create().await;
    screen.create_form.name = "Giulia".into();
    screen.create_form.surname = "Neri".into();
    screen.create_form.email = "giulia@uni.it".into();
    screen.select_department(Some(2)).await;

    screen.save_create().await;
    assert!(screen.create_form.touched);
    assert!(backend.requests_to("POST", "admin/persona").is_empty());

    assert!(screen.select_course(Some(8)));
    screen.save_create().await;

    let created = backend.requests_to("POST", "admin/persona");
    assert_eq!(created.len(), 1);
    let body = created[0].json();
    assert_eq!(body["corsoDiStudiId"], json!(8));
    assert_eq!(body["ruoli"], json!(["USER", "STAFF"]));
    assert_eq!(body["staff"], json!(true));
    assert!(!screen.create_open);
    assert_eq!(backend.requests_to("GET", "staff/all").len(), 1);
    Ok(())
}

#[tokio::test]
async fn representative_save_patches_card_without_reload() -> Result<()> {
    let backend = FakeBackend::start().await?;
    let app = backend.logged_in(1, &["DIRETTIVO"]).await?;
    serve_directory(&backend);
    backend.reply("POST", "admin/rappresentante", 200, json!({"id": 41}));

    let mut screen = StaffScreen::new(&app);
    screen.activate().await;
    let sara = target(&screen, 5);
    assert!(screen.open_edit(&sara).await);

    let panel = screen.edit.as_mut().expect("panel open");
    assert_eq!(panel.representatives.len(), 1);
    panel.set_tab(EditTab::Representatives);
    panel.representative_form.body_id = Some(2);
    panel.representative_form.start = NaiveDate::from_ymd_opt(2025, 1, 15);
    panel.save_representative().await;
    assert!(panel.error_msg.is_none());
    assert_eq!(panel.representatives.len(), 2);
    assert_eq!(panel.representatives[0].id, Some(41));

    screen.sync_edit_panel().await;

    assert!(screen.edit.is_some(), "panel stays open on the representatives tab");
    assert_eq!(backend.requests_to("GET", "staff/all").len(), 1);
    let patched = target(&screen, 5);
    let names: Vec<_> = patched
        .representatives
        .expect("representatives kept")
        .to_views(&[])
        .into_iter()
        .map(|v| v.body_name)
        .collect();
    assert_eq!(names, ["Consiglio di Amministrazione", "Senato Accademico"]);

    let sent = &backend.requests_to("POST", "admin/rappresentante")[0];
    assert_eq!(
        sent.json(),
        json!({"personaId": 5, "organoRappresentanzaId": 2, "dataInizio": "2025-01-15", "dataFine": null})
    );
    Ok(())
}

#[tokio::test]
async fn representative_save_stays_local_after_switching_tabs() -> Result<()> {
    let backend = FakeBackend::start().await?;
    let app = backend.logged_in(1, &["DIRETTIVO"]).await?;
    serve_directory(&backend);
    backend.reply("POST", "admin/rappresentante", 200, json!({"id": 42}));

    let mut screen = StaffScreen::new(&app);
    screen.activate().await;
    let sara = target(&screen, 5);
    screen.open_edit(&sara).await;

    let panel = screen.edit.as_mut().expect("panel open");
    panel.set_tab(EditTab::Representatives);
    panel.representative_form.body_id = Some(2);
    panel.representative_form.start = NaiveDate::from_ymd_opt(2025, 2, 1);
    panel.save_representative().await;
    assert!(panel.error_msg.is_none());
    panel.set_tab(EditTab::PersonalData);

    screen.sync_edit_panel().await;

    assert!(screen.edit.is_some());
    assert_eq!(backend.requests_to("GET", "staff/all").len(), 1);
    let patched = target(&screen, 5).representatives.expect("representatives kept");
    assert_eq!(patched.to_views(&[]).len(), 2);
    Ok(())
}

#[tokio::test]
async fn photo_saved_from_representatives_tab_reloads_directory() -> Result<()> {
    let backend = FakeBackend::start().await?;
    let app = backend.logged_in(1, &["DIRETTIVO"]).await?;
    serve_directory(&backend);
    backend.ok("POST", "staff/persona/5/foto");

    let mut screen = StaffScreen::new(&app);
    screen.activate().await;
    let sara = target(&screen, 5);
    screen.open_edit(&sara).await;

    let panel = screen.edit.as_mut().expect("panel open");
    panel.set_tab(EditTab::Representatives);
    assert!(panel.pick_photo("ritratto.jpg", "image/jpeg", b"PHOTO".to_vec()));
    panel.save_photo().await;
    assert!(panel.error_msg.is_none());

    screen.sync_edit_panel().await;

    assert!(screen.edit.is_none());
    assert_eq!(backend.requests_to("GET", "staff/all").len(), 2);
    assert_eq!(backend.requests_to("POST", "staff/persona/5/foto").len(), 1);
    Ok(())
}

#[tokio::test]
async fn representative_end_before_start_is_rejected_locally() -> Result<()> {
    let backend = FakeBackend::start().await?;
    let app = backend.logged_in(1, &["DIRETTIVO"]).await?;
    serve_directory(&backend);

    let mut screen = StaffScreen::new(&app);
    screen.activate().await;
    let sara = target(&screen, 5);
    screen.open_edit(&sara).await;

    let panel = screen.edit.as_mut().expect("panel open");
    panel.set_tab(EditTab::Representatives);
    panel.representative_form.body_id = Some(2);
    panel.representative_form.start = NaiveDate::from_ymd_opt(2025, 3, 1);
    panel.representative_form.end = NaiveDate::from_ymd_opt(2025, 1, 1);
    panel.save_representative().await;

    assert_eq!(
        panel.error_msg.as_deref(),
        Some("La data fine non può essere precedente alla data inizio.")
    );
    assert!(backend.requests_to("POST", "admin/rappresentante").is_empty());
    Ok(())
}

#[tokio::test]
async fn personal_data_save_reloads_and_closes_panel() -> Result<()> {
    let backend = FakeBackend::start().await?;
    let app = backend.logged_in(1, &["DIRETTIVO"]).await?;
    serve_directory(&backend);
    backend.ok("PUT", "staff/persona");

    let mut screen = StaffScreen::new(&app);
    screen.activate().await;
    let sara = target(&screen, 5);
    screen.open_edit(&sara).await;

    let panel = screen.edit.as_mut().expect("panel open");
    assert_eq!(panel.form.department_id, Some(2));
    assert_eq!(panel.form.course_id, Some(8));
    panel.form.surname = "Verdini".into();
    panel.save_personal_data().await;

    screen.sync_edit_panel().await;

    assert!(screen.edit.is_none());
    assert_eq!(backend.requests_to("GET", "staff/all").len(), 2);
    let sent = &backend.requests_to("PUT", "staff/persona")[0];
    assert_eq!(sent.json()["id"], json!(5));
    assert_eq!(sent.json()["cognome"], json!("Verdini"));
    assert_eq!(sent.json()["ruoli"], json!([]));
    Ok(())
}

#[tokio::test]
async fn cropped_photo_is_uploaded_as_multipart() -> Result<()> {
    let backend = FakeBackend::start().await?;
    let app = backend.logged_in(1, &["DIRETTIVO"]).await?;
    serve_directory(&backend);
    backend.ok("POST", "staff/persona/5/foto");

    let mut screen = StaffScreen::new(&app);
    screen.activate().await;
    let sara = target(&screen, 5);
    screen.open_edit(&sara).await;

    let panel = screen.edit.as_mut().expect("panel open");
    assert!(panel.pick_photo("ritratto.png", "image/png", b"ORIGINAL".to_vec()));
    panel.on_image_cropped(CroppedImage {
        bytes: Some(b"CROPPED".to_vec()),
        mime: Some("image/jpeg".into()),
        preview: None,
    });
    panel.save_photo().await;
    assert!(panel.photo.is_none());

    let upload = &backend.requests_to("POST", "staff/persona/5/foto")[0];
    assert!(upload
        .content_type
        .as_deref()
        .is_some_and(|ct| ct.starts_with("multipart/form-data")));
    let body = upload.body_text();
    assert!(body.contains("name=\"file\""));
    assert!(body.contains("filename=\"ritratto.png\""));
    assert!(body.contains("image/jpeg"));
    assert!(body.contains("CROPPED"));
    assert!(!body.contains("ORIGINAL"));
    Ok(())
}

#[tokio::test]
async fn oversized_photo_is_refused() -> Result<()> {
    let backend = FakeBackend::start().await?;
    let app = backend.logged_in(1, &["DIRETTIVO"]).await?;
    serve_directory(&backend);

    let mut screen = StaffScreen::new(&app);
    screen.activate().await;
    let sara = target(&screen, 5);
    screen.open_edit(&sara).await;

    let panel = screen.edit.as_mut().expect("panel open");
    let too_big = vec![0u8; (app.max_photo_bytes() + 1) as usize];
    assert!(!panel.pick_photo("big.jpg", "image/jpeg", too_big));
    assert_eq!(panel.error_msg.as_deref(), Some("Il file è troppo grande. Max 10MB."));
    assert!(panel.photo.is_none());
    Ok(())
}

#[tokio::test]
async fn staff_member_only_edits_own_card() -> Result<()> {
    let backend = FakeBackend::start().await?;
    let app = backend.logged_in(1, &["STAFF"]).await?;
    serve_directory(&backend);

    let mut screen = StaffScreen::new(&app);
    screen.activate().await;
    assert!(!screen.can_manage());

    let sara = target(&screen, 5);
    assert!(!screen.can_manage_card(&sara));
    assert!(!screen.open_edit(&sara).await);
    assert!(screen.edit.is_none());

    let me = target(&screen, 1);
    assert!(screen.can_manage_card(&me));
    assert!(screen.open_edit(&me).await);

    let panel = screen.edit.as_mut().expect("own panel");
    assert!(panel.form.disabled);
    panel.set_tab(EditTab::Representatives);
    assert_eq!(panel.tab, EditTab::PersonalData);
    panel.save_personal_data().await;

    assert!(backend.requests_to("PUT", "staff/persona").is_empty());
    assert!(backend.requests_to("GET", "admin/organi").is_empty());
    Ok(())
}

#[tokio::test]
async fn deleting_edited_person_closes_panel() -> Result<()> {
    let backend = FakeBackend::start().await?;
    let app = backend.logged_in(1, &["DIRETTIVO"]).await?;
    serve_directory(&backend);
    backend.ok("DELETE", "staff/persona/5");

    let mut screen = StaffScreen::new(&app);
    screen.activate().await;
    let sara = target(&screen, 5);
    screen.open_edit(&sara).await;

    screen.open_delete(&sara);
    screen.confirm_delete().await;

    assert_eq!(backend.requests_to("DELETE", "staff/persona/5").len(), 1);
    assert!(!screen.delete.is_armed());
    assert!(screen.edit.is_none());
    assert_eq!(backend.requests_to("GET", "staff/all").len(), 2);
    Ok(())
}

#[tokio::test]
async fn filters_search_names_roles_and_representatives() -> Result<()> {
    let backend = FakeBackend::start().await?;
    let app = backend.logged_in(1, &["DIRETTIVO"]).await?;
    serve_directory(&backend);

    let mut screen = StaffScreen::new(&app);
    screen.activate().await;
    assert_eq!(screen.filtered().len(), 2);

    screen.filters.search = "senato".into();
    assert_eq!(screen.filtered().len(), 2);

    screen.filters.search = "sara".into();
    let found: Vec<_> = screen.filtered().iter().map(|c| c.id).collect();
    assert_eq!(found, [5]);

    screen.filters.search.clear();
    screen.filters.department_id = Some(1);
    assert!(screen.filtered().is_empty());
    Ok(())
}
