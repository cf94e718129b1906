use chomp_classroom::{ClassroomClient, ClassroomConfig, ClassroomError};
use mockito::Matcher;

fn client_for(server: &mockito::ServerGuard) -> ClassroomClient {
    ClassroomClient::new(ClassroomConfig {
        api_base: server.url(),
        page_size: 2,
        timeout_secs: 5,
    })
    .unwrap()
}

#[tokio::test]
async fn courses_follow_next_page_token() {
    let mut server = mockito::Server::new_async().await;
    let first = server
        .mock("GET", "/v1/courses")
        .match_header("authorization", "Bearer tok")
        .match_query(Matcher::Exact("courseStates=ACTIVE&pageSize=2".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"courses":[{"id":"1","name":"Physics"},{"id":"2","name":"Chemistry"}],"nextPageToken":"p2"}"#)
        .create_async()
        .await;
    let second = server
        .mock("GET", "/v1/courses")
        .match_query(Matcher::UrlEncoded("pageToken".to_string(), "p2".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"courses":[{"id":"3","name":"Biology","section":"B"}]}"#)
        .create_async()
        .await;

    let courses = client_for(&server).list_active_courses("tok").await.unwrap();

    first.assert_async().await;
    second.assert_async().await;
    let names: Vec<_> = courses.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Physics", "Chemistry", "Biology"]);
    assert_eq!(courses[2].section.as_deref(), Some("B"));
}

#[tokio::test]
async fn fetch_classes_maps_student_emails() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/v1/courses")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"courses":[{"id":"42","name":"Physics","descriptionHeading":"Period 3"}]}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/v1/courses/42/students")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"students":[
                {"userId":"a","profile":{"emailAddress":"Bob@School.edu"}},
                {"userId":"b","profile":{"emailAddress":"ann@school.edu"}},
                {"userId":"c","profile":{}}
            ]}"#,
        )
        .create_async()
        .await;

    let classes = client_for(&server).fetch_classes("tok").await.unwrap();

    assert_eq!(classes.len(), 1);
    assert_eq!(classes[0].name, "Physics");
    assert_eq!(classes[0].description.as_deref(), Some("Period 3"));
    assert_eq!(classes[0].participants, ["ann@school.edu", "bob@school.edu"]);
}

#[tokio::test]
async fn rejected_token_is_unauthorized() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/v1/courses")
        .match_query(Matcher::Any)
        .with_status(401)
        .with_body(r#"{"error":{"code":401}}"#)
        .create_async()
        .await;

    let err = client_for(&server).list_active_courses("expired").await.unwrap_err();
    assert!(matches!(err, ClassroomError::Unauthorized));
}

#[tokio::test]
async fn server_error_keeps_status_and_body() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/v1/courses/9/students")
        .match_query(Matcher::Any)
        .with_status(503)
        .with_body("backend unavailable")
        .create_async()
        .await;

    let err = client_for(&server).list_students("tok", "9").await.unwrap_err();
    match err {
        ClassroomError::Api { status, body } => {
            assert_eq!(status.as_u16(), 503);
            assert_eq!(body, "backend unavailable");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
