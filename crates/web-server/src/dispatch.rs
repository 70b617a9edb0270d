//! Maps remote method names onto gateway calls.
//!
//! The names and argument orders are the ones the dashboard calls:
//! `createStudent`, `getStudents`, `searchStudentbyId`, `updateStudent`,
//! `deleteStudent`, and the same five for Subject, Professor and
//! RegisterStudentSubject.

use crate::error::RpcError;
use crate::rpc::Params;
use core_types::{Enrollment, Professor, Record, Student, Subject};
use database::{DbRepository, Gateway, Repository};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Prefix the generated dashboard client puts in front of every method.
const SERVICE_PREFIX: &str = "BackendService.";

const STUDENT_FIELDS: &[&str] = &["firstName", "lastName", "birthDate", "address", "email", "phone"];
const SUBJECT_FIELDS: &[&str] = &["subjectName", "subjectDescription", "professorId"];
const PROFESSOR_FIELDS: &[&str] = &["firstName", "lastName", "email"];
const ENROLLMENT_FIELDS: &[&str] = &["studentId", "subjectId", "grade", "dateRegistered"];

/// Runs one remote method.
///
/// Only an unknown method is an error. Arguments that do not decode for a
/// known method are logged and answered with the method's failure value,
/// the same as a store failure.
pub async fn dispatch(gateway: &Gateway, method: &str, params: &Value) -> Result<Value, RpcError> {
    let params = Params::new(params);
    let method = method.strip_prefix(SERVICE_PREFIX).unwrap_or(method);

    match method {
        "createStudent" => create::<Student>(gateway, method, &params, STUDENT_FIELDS).await,
        "getStudents" => list::<Student>(gateway).await,
        "searchStudentbyId" => search::<Student>(gateway, method, &params).await,
        "updateStudent" => update::<Student>(gateway, method, &params, STUDENT_FIELDS).await,
        "deleteStudent" => delete::<Student>(gateway, method, &params).await,

        "createSubject" => create::<Subject>(gateway, method, &params, SUBJECT_FIELDS).await,
        "getSubjects" => list::<Subject>(gateway).await,
        "searchSubjectbyId" => search::<Subject>(gateway, method, &params).await,
        "updateSubject" => update::<Subject>(gateway, method, &params, SUBJECT_FIELDS).await,
        "deleteSubject" => delete::<Subject>(gateway, method, &params).await,

        "createProfessor" => create::<Professor>(gateway, method, &params, PROFESSOR_FIELDS).await,
        "getProfessors" => list::<Professor>(gateway).await,
        "searchProfessorbyId" => search::<Professor>(gateway, method, &params).await,
        "updateProfessor" => update::<Professor>(gateway, method, &params, PROFESSOR_FIELDS).await,
        "deleteProfessor" => delete::<Professor>(gateway, method, &params).await,

        "createRegisterStudentSubject" => {
            create::<Enrollment>(gateway, method, &params, ENROLLMENT_FIELDS).await
        }
        "getRegisterStudentSubject" | "getRegisterStudentSubjects" => {
            list::<Enrollment>(gateway).await
        }
        "searchRegisterStudentSubjectbyId" => {
            search::<Enrollment>(gateway, method, &params).await
        }
        "updateRegisterStudentSubject" => {
            update::<Enrollment>(gateway, method, &params, ENROLLMENT_FIELDS).await
        }
        "deleteRegisterStudentSubject" => delete::<Enrollment>(gateway, method, &params).await,

        other => Err(RpcError::MethodNotFound(other.to_string())),
    }
}

fn unusable_arguments(method: &str, error: &RpcError) {
    tracing::warn!(method, error = %error, "Arguments did not decode, call failed.");
}

async fn create<E>(
    gateway: &Gateway,
    method: &str,
    params: &Params<'_>,
    names: &[&str],
) -> Result<Value, RpcError>
where
    E: Record,
    E::Fields: DeserializeOwned,
    DbRepository: Repository<E>,
{
    let created = match params.fields(names, 0) {
        Ok(fields) => gateway.create::<E>(fields).await,
        Err(e) => {
            unusable_arguments(method, &e);
            false
        }
    };
    Ok(Value::Bool(created))
}

async fn list<E>(gateway: &Gateway) -> Result<Value, RpcError>
where
    E: Record,
    DbRepository: Repository<E>,
{
    Ok(serde_json::to_value(gateway.get_all::<E>().await)?)
}

async fn search<E>(gateway: &Gateway, method: &str, params: &Params<'_>) -> Result<Value, RpcError>
where
    E: Record,
    DbRepository: Repository<E>,
{
    let id = match params.id() {
        Ok(id) => id,
        Err(e) => {
            unusable_arguments(method, &e);
            return Ok(Value::Null);
        }
    };
    Ok(serde_json::to_value(gateway.search_by_id::<E>(id).await)?)
}

async fn update<E>(
    gateway: &Gateway,
    method: &str,
    params: &Params<'_>,
    names: &[&str],
) -> Result<Value, RpcError>
where
    E: Record,
    E::Fields: DeserializeOwned,
    DbRepository: Repository<E>,
{
    let decoded = params
        .id()
        .and_then(|id| params.fields::<E::Fields>(names, 1).map(|fields| (id, fields)));
    let updated = match decoded {
        Ok((id, fields)) => gateway.update::<E>(id, fields).await,
        Err(e) => {
            unusable_arguments(method, &e);
            false
        }
    };
    Ok(Value::Bool(updated))
}

async fn delete<E>(gateway: &Gateway, method: &str, params: &Params<'_>) -> Result<Value, RpcError>
where
    E: Record,
    DbRepository: Repository<E>,
{
    let deleted = match params.id() {
        Ok(id) => gateway.delete::<E>(id).await,
        Err(e) => {
            unusable_arguments(method, &e);
            false
        }
    };
    Ok(Value::Bool(deleted))
}
