use quest_core::model::{CourseId, MAX_LIVES};
use quest_core::time::fixed_clock;
use services::{AppServices, Effects};

#[tokio::test]
async fn sqlite_backed_services_survive_reconnect() {
    let url = "sqlite:file:services_reconnect?mode=memory&cache=shared";
    let app = AppServices::new_sqlite(url, fixed_clock(), Effects::silent())
        .await
        .expect("sqlite services");

    app.auth().login("me@example.com", "").await.unwrap();
    let sessions = app.sessions();
    let mut session = sessions.open_course(&CourseId::new("6")).await.unwrap();
    session.select_option(0).unwrap();
    sessions.submit_answer(&mut session).await.unwrap();
    sessions.advance(&mut session).await.unwrap();

    // keep the first pool alive so the shared in-memory database persists
    let again = AppServices::new_sqlite(url, fixed_clock(), Effects::silent())
        .await
        .expect("second connection");
    let lives = again.lives().get_lives().await.unwrap();
    assert_eq!(lives.count(), MAX_LIVES - 1);

    let course = again
        .catalog()
        .find_course(&CourseId::new("6"))
        .await
        .unwrap();
    assert_eq!(course.progress(), 33);
    assert!(again.auth().is_signed_in().await.unwrap());
    drop(app);
}
