mod common;

use anyhow::Result;
use serde_json::json;

use common::{course, department, FakeBackend};
use impronta_backoffice::models::CourseType;
use impronta_backoffice::navigation::Route;
use impronta_backoffice::screens::{CoursesScreen, DepartmentsScreen};

#[tokio::test]
async fn create_sends_uppercased_code_and_reloads() -> Result<()> {
    let backend = FakeBackend::start().await?;
    let app = backend.logged_in(1, &["DIRETTIVO"]).await?;
    backend.reply("GET", "public/dipartimenti/all", 200, json!([department(1, "Economia", "ECO")]));
    backend.ok("POST", "admin/dipartimento");

    let mut screen = DepartmentsScreen::new(&app);
    assert!(screen.can_manage());
    screen.activate().await;
    assert_eq!(screen.departments.len(), 1);

    screen.open_create();
    screen.form.name = "  Ingegneria ".into();
    screen.form.code = "ing".into();
    screen.save().await;

    let created = &backend.requests_to("POST", "admin/dipartimento")[0];
    assert_eq!(created.json(), json!({"nome": "Ingegneria", "codice": "ING"}));
    assert!(!screen.modal_open);
    assert_eq!(backend.requests_to("GET", "public/dipartimenti/all").len(), 2);
    Ok(())
}

#[tokio::test]
async fn edit_sends_id_with_put() -> Result<()> {
    let backend = FakeBackend::start().await?;
    let app = backend.logged_in(1, &["DIRETTIVO"]).await?;
    backend.reply("GET", "public/dipartimenti/all", 200, json!([department(3, "Economia", "ECO")]));
    backend.ok("PUT", "admin/dipartimento");

    let mut screen = DepartmentsScreen::new(&app);
    screen.activate().await;
    let target = screen.departments[0].clone();
    screen.open_edit(&target);
    screen.form.name = "Economia e Management".into();
    screen.save().await;

    let updated = &backend.requests_to("PUT", "admin/dipartimento")[0];
    assert_eq!(
        updated.json(),
        json!({"id": 3, "nome": "Economia e Management", "codice": "ECO"})
    );
    Ok(())
}

#[tokio::test]
async fn invalid_form_is_not_submitted() -> Result<()> {
    let backend = FakeBackend::start().await?;
    let app = backend.logged_in(1, &["DIRETTIVO"]).await?;

    let mut screen = DepartmentsScreen::new(&app);
    screen.open_create();
    screen.form.name = "I".into();
    screen.save().await;

    assert!(screen.form.touched);
    assert!(screen.modal_open);
    assert!(backend.requests().is_empty());
    Ok(())
}

#[tokio::test]
async fn delete_requires_confirmation() -> Result<()> {
    let backend = FakeBackend::start().await?;
    let app = backend.logged_in(1, &["DIRETTIVO"]).await?;
    backend.reply("GET", "public/dipartimenti/all", 200, json!([department(5, "Lettere", "LET")]));
    backend.ok("DELETE", "admin/dipartimento");

    let mut screen = DepartmentsScreen::new(&app);
    screen.activate().await;
    let target = screen.departments[0].clone();

    screen.open_delete(&target);
    screen.escape();
    assert!(!screen.delete.is_armed());
    screen.confirm_delete().await;
    assert!(backend.requests_to("DELETE", "admin/dipartimento").is_empty());

    screen.open_delete(&target);
    screen.confirm_delete().await;
    let deleted = backend.requests_to("DELETE", "admin/dipartimento");
    assert_eq!(deleted.len(), 1);
    assert_eq!(deleted[0].json()["id"], json!(5));
    assert_eq!(backend.requests_to("GET", "public/dipartimenti/all").len(), 2);
    Ok(())
}

#[tokio::test]
async fn staff_cannot_manage_departments() -> Result<()> {
    let backend = FakeBackend::start().await?;
    let app = backend.logged_in(1, &["STAFF"]).await?;
    assert!(!DepartmentsScreen::new(&app).can_manage());
    Ok(())
}

#[tokio::test]
async fn courses_page_uses_handed_over_department() -> Result<()> {
    let backend = FakeBackend::start().await?;
    let app = backend.logged_in(1, &["DIRETTIVO"]).await?;
    backend.reply("GET", "public/dipartimenti/all", 200, json!([department(2, "Scienze", "SCI")]));
    backend.reply("GET", "public/dipartimento/2/corsi", 200, json!([course(8, "Fisica", 2)]));
    backend.ok("POST", "admin/corso");

    let mut departments = DepartmentsScreen::new(&app);
    departments.activate().await;
    let target = departments.departments[0].clone();
    assert_eq!(
        departments.open_courses(&target).await,
        Route::Courses { department_id: 2 }
    );

    let mut courses = CoursesScreen::new(&app, 2);
    courses.activate().await;
    assert_eq!(courses.courses.len(), 1);

    courses.open_create();
    courses.form.name = " Chimica ".into();
    courses.form.course_type = CourseType::Magistrale;
    courses.save().await;

    let created = &backend.requests_to("POST", "admin/corso")[0];
    assert_eq!(
        created.json(),
        json!({"nome": "Chimica", "dipartimentoId": 2, "tipoCorso": "MAGISTRALE"})
    );
    assert_eq!(backend.requests_to("GET", "public/dipartimento/2/corsi").len(), 2);
    Ok(())
}

#[tokio::test]
async fn course_edit_form_is_rebuilt_from_each_course() -> Result<()> {
    let backend = FakeBackend::start().await?;
    let app = backend.logged_in(1, &["DIRETTIVO"]).await?;
    let mut magistrale = course(9, "Fisica teorica", 2);
    magistrale["tipoCorso"] = json!("MAGISTRALE");
    backend.reply(
        "GET",
        "public/dipartimento/2/corsi",
        200,
        json!([magistrale, course(8, "Fisica", 2)]),
    );

    let mut courses = CoursesScreen::new(&app, 2);
    courses.activate().await;
    let first = courses.courses[0].clone();
    let second = courses.courses[1].clone();

    courses.open_edit(&first);
    assert_eq!(courses.form.course_type, CourseType::Magistrale);
    courses.form.name = "x".into();
    courses.form.touched = true;

    courses.open_edit(&second);
    assert_eq!(courses.form.name, "Fisica");
    assert_eq!(courses.form.course_type, CourseType::Triennale);
    assert!(!courses.form.touched);
    Ok(())
}
