use axum::http::StatusCode;
use axum_test::TestServer;
use database::{DbRepository, Gateway, connect_in_memory, run_migrations};
use serde_json::{Value, json};
use std::sync::Arc;
use web_server::{AppState, app};

async fn server() -> TestServer {
    let pool = connect_in_memory().await.unwrap();
    run_migrations(&pool).await.unwrap();
    let gateway = Gateway::new(DbRepository::new(pool));
    TestServer::new(app(Arc::new(AppState { gateway }))).unwrap()
}

async fn call(server: &TestServer, method: &str, params: Value) -> Value {
    let response = server
        .post("/BackendService")
        .json(&json!({
            "jsonrpc": "2.0",
            "method": format!("BackendService.{method}"),
            "params": params,
            "id": 1,
        }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["jsonrpc"], "2.0");
    assert_eq!(body["id"], 1);
    assert!(body.get("error").is_none(), "unexpected error: {body}");
    body["result"].clone()
}

async fn call_error(server: &TestServer, payload: Value) -> Value {
    let response = server.post("/rpc").json(&payload).await;
    response.assert_status_ok();
    let body: Value = response.json();
    body["error"].clone()
}

#[tokio::test]
async fn student_create_list_delete_scenario() {
    let server = server().await;

    let created = call(
        &server,
        "createStudent",
        json!(["Ana", "Pop", "2000-01-01", "Main St", "a@x.com", "555"]),
    )
    .await;
    assert_eq!(created, json!(true));

    let students = call(&server, "getStudents", json!([])).await;
    let students = students.as_array().unwrap();
    assert_eq!(students.len(), 1);
    let student = &students[0];
    assert_eq!(student["firstName"], "Ana");
    assert_eq!(student["lastName"], "Pop");
    assert_eq!(student["birthDate"], "2000-01-01");
    assert_eq!(student["address"], "Main St");
    assert_eq!(student["email"], "a@x.com");
    assert_eq!(student["phone"], "555");
    assert!(!student["id"].as_str().unwrap().is_empty());
    assert!(student["createdAt"].is_string());

    let id = student["id"].clone();
    assert_eq!(call(&server, "deleteStudent", json!([id])).await, json!(true));
    assert_eq!(call(&server, "getStudents", json!([])).await, json!([]));
}

#[tokio::test]
async fn search_for_a_nonexistent_id_returns_null() {
    let server = server().await;
    let result = call(&server, "searchStudentbyId", json!(["nonexistent-uuid"])).await;
    assert_eq!(result, Value::Null);

    let random = uuid::Uuid::new_v4().to_string();
    let result = call(&server, "searchSubjectbyId", json!([random])).await;
    assert_eq!(result, Value::Null);
}

#[tokio::test]
async fn professor_update_by_name_keeps_identity() {
    let server = server().await;
    assert_eq!(
        call(&server, "createProfessor", json!(["Ion", "Popa", "ion@x.com"])).await,
        json!(true)
    );
    let professors = call(&server, "getProfessors", Value::Null).await;
    let original = professors[0].clone();
    let id = original["id"].as_str().unwrap().to_string();

    let updated = call(
        &server,
        "updateProfessor",
        json!({"id": id, "firstName": "Ioan", "lastName": "Popa", "email": "ioan@x.com"}),
    )
    .await;
    assert_eq!(updated, json!(true));

    let found = call(&server, "searchProfessorbyId", json!([id])).await;
    assert_eq!(found["id"], original["id"]);
    assert_eq!(found["createdAt"], original["createdAt"]);
    assert_eq!(found["firstName"], "Ioan");
    assert_eq!(found["email"], "ioan@x.com");
}

#[tokio::test]
async fn writes_against_missing_rows_return_false() {
    let server = server().await;
    let missing = uuid::Uuid::new_v4().to_string();

    assert_eq!(
        call(&server, "updateSubject", json!([missing, "Math", "Algebra", null])).await,
        json!(false)
    );
    assert_eq!(call(&server, "deleteSubject", json!([missing])).await, json!(false));
    assert_eq!(call(&server, "getSubjects", json!([])).await, json!([]));
}

#[tokio::test]
async fn enrollment_accepts_browser_timestamps() {
    let server = server().await;
    let student_id = uuid::Uuid::new_v4().to_string();
    let subject_id = uuid::Uuid::new_v4().to_string();

    let created = call(
        &server,
        "createRegisterStudentSubject",
        json!([student_id, subject_id, 10, "2024-09-15T00:00:00.000Z"]),
    )
    .await;
    assert_eq!(created, json!(true));

    let enrollments = call(&server, "getRegisterStudentSubject", json!([])).await;
    assert_eq!(enrollments.as_array().unwrap().len(), 1);
    let enrollment = &enrollments[0];
    assert_eq!(enrollment["studentId"], json!(student_id));
    assert_eq!(enrollment["subjectId"], json!(subject_id));
    assert_eq!(enrollment["grade"], 10);
    assert_eq!(enrollment["dateRegistered"], "2024-09-15");

    let plural = call(&server, "getRegisterStudentSubjects", json!([])).await;
    assert_eq!(plural, enrollments);
}

#[tokio::test]
async fn unprefixed_method_names_work_too() {
    let server = server().await;
    let response = server
        .post("/rpc")
        .json(&json!({"jsonrpc": "2.0", "method": "getProfessors", "params": [], "id": "a"}))
        .await;
    let body: Value = response.json();
    assert_eq!(body["id"], "a");
    assert_eq!(body["result"], json!([]));
}

#[tokio::test]
async fn envelope_errors_use_json_rpc_codes() {
    let server = server().await;

    let error = call_error(
        &server,
        json!({"jsonrpc": "2.0", "method": "dropTables", "params": [], "id": 1}),
    )
    .await;
    assert_eq!(error["code"], -32601);

    let error = call_error(&server, json!({"jsonrpc": "2.0", "id": 1})).await;
    assert_eq!(error["code"], -32600);

    let response = server.post("/rpc").text("{not json").await;
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], -32700);
}

#[tokio::test]
async fn undecodable_arguments_answer_with_failure_values() {
    let server = server().await;

    assert_eq!(
        call(&server, "createSubject", json!(["Math", "Algebra", ""])).await,
        json!(false)
    );
    assert_eq!(
        call(
            &server,
            "createRegisterStudentSubject",
            json!([null, null, "9", "2024-01-01"])
        )
        .await,
        json!(false)
    );
    assert_eq!(call(&server, "searchStudentbyId", json!([42])).await, Value::Null);
    assert_eq!(call(&server, "deleteStudent", json!([])).await, json!(false));
    assert_eq!(
        call(&server, "updateProfessor", json!({"firstName": "Ion"})).await,
        json!(false)
    );

    assert_eq!(call(&server, "getSubjects", json!([])).await, json!([]));
    assert_eq!(call(&server, "getRegisterStudentSubject", json!([])).await, json!([]));
}

#[tokio::test]
async fn notifications_run_without_a_reply() {
    let server = server().await;

    let response = server
        .post("/rpc")
        .json(&json!({"jsonrpc": "2.0", "method": "createProfessor", "params": ["A", "B", "c@d.e"]}))
        .await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);
    assert!(response.text().is_empty());

    let response = server
        .post("/rpc")
        .json(&json!([
            {"jsonrpc": "2.0", "method": "createProfessor", "params": ["D", "E", "f@g.h"]},
            {"jsonrpc": "2.0", "method": "getProfessors", "params": [], "id": 7},
        ]))
        .await;
    let body: Value = response.json();
    let replies = body.as_array().unwrap();
    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0]["id"], 7);
    assert_eq!(replies[0]["result"].as_array().unwrap().len(), 2);

    let response = server
        .post("/rpc")
        .json(&json!({"jsonrpc": "2.0", "method": "getProfessors", "params": [], "id": null}))
        .await;
    let body: Value = response.json();
    assert_eq!(body["id"], Value::Null);
    assert_eq!(body["result"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn batches_are_answered_in_order() {
    let server = server().await;
    let response = server
        .post("/rpc")
        .json(&json!([
            {"jsonrpc": "2.0", "method": "createProfessor", "params": ["A", "B", "c@d.e"], "id": 1},
            {"jsonrpc": "2.0", "method": "getProfessors", "params": [], "id": 2},
        ]))
        .await;
    let body: Value = response.json();
    let replies = body.as_array().unwrap();
    assert_eq!(replies.len(), 2);
    assert_eq!(replies[0]["result"], json!(true));
    assert_eq!(replies[1]["result"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn disconnected_gateway_answers_with_failure_values() {
    let server = TestServer::new(app(Arc::new(AppState {
        gateway: Gateway::disconnected(),
    })))
    .unwrap();

    assert_eq!(
        call(&server, "createProfessor", json!(["A", "B", "c@d.e"])).await,
        json!(false)
    );
    assert_eq!(call(&server, "getProfessors", json!([])).await, json!([]));
    let id = uuid::Uuid::new_v4().to_string();
    assert_eq!(call(&server, "searchProfessorbyId", json!([id])).await, Value::Null);
}

#[tokio::test]
async fn health_check_answers_ok() {
    let server = server().await;
    let response = server.get("/api/health").await;
    response.assert_status_ok();
    assert_eq!(response.text(), "OK");
}
