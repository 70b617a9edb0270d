use crate::dates::lenient_date;
use crate::error::CoreError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Common shape of the four stored records.
///
/// Every record has a server-generated `id` and `createdAt`, plus a set of
/// mutable fields that create and update both take as a whole.
pub trait Record: Serialize + Send + Sync + Unpin + 'static {
    /// The mutable part of the record.
    type Fields: Clone + Send + Sync + 'static;

    /// Short name used in log lines.
    const KIND: &'static str;

    fn id(&self) -> Uuid;
    fn created_at(&self) -> DateTime<Utc>;
    fn fields(&self) -> Self::Fields;
}

/// Parses a record id received as a string.
pub fn parse_id(raw: &str) -> Result<Uuid, CoreError> {
    Uuid::parse_str(raw.trim()).map_err(|e| CoreError::InvalidId(raw.to_string(), e.to_string()))
}

// ==============================================================================
// Student
// ==============================================================================

/// A row of the `students` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[sqlx(rename_all = "camelCase")]
pub struct Student {
    pub id: Uuid,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub birth_date: Option<NaiveDate>,
    pub address: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudentFields {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(deserialize_with = "lenient_date")]
    pub birth_date: Option<NaiveDate>,
    pub address: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl Student {
    pub fn new(id: Uuid, fields: StudentFields, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            first_name: fields.first_name,
            last_name: fields.last_name,
            birth_date: fields.birth_date,
            address: fields.address,
            email: fields.email,
            phone: fields.phone,
            created_at,
        }
    }
}

impl Record for Student {
    type Fields = StudentFields;
    const KIND: &'static str = "student";

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn fields(&self) -> StudentFields {
        StudentFields {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            birth_date: self.birth_date,
            address: self.address.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
        }
    }
}

// ==============================================================================
// Subject
// ==============================================================================

/// A row of the `subjects` table.
///
/// `professor_id` points at a professor by convention only; nothing checks
/// that the professor exists.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[sqlx(rename_all = "camelCase")]
pub struct Subject {
    pub id: Uuid,
    pub subject_name: Option<String>,
    pub subject_description: Option<String>,
    pub professor_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubjectFields {
    pub subject_name: Option<String>,
    pub subject_description: Option<String>,
    pub professor_id: Option<Uuid>,
}

impl Subject {
    pub fn new(id: Uuid, fields: SubjectFields, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            subject_name: fields.subject_name,
            subject_description: fields.subject_description,
            professor_id: fields.professor_id,
            created_at,
        }
    }
}

impl Record for Subject {
    type Fields = SubjectFields;
    const KIND: &'static str = "subject";

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn fields(&self) -> SubjectFields {
        SubjectFields {
            subject_name: self.subject_name.clone(),
            subject_description: self.subject_description.clone(),
            professor_id: self.professor_id,
        }
    }
}

// ==============================================================================
// Professor
// ==============================================================================

/// A row of the `professors` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[sqlx(rename_all = "camelCase")]
pub struct Professor {
    pub id: Uuid,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfessorFields {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

impl Professor {
    pub fn new(id: Uuid, fields: ProfessorFields, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            first_name: fields.first_name,
            last_name: fields.last_name,
            email: fields.email,
            created_at,
        }
    }
}

impl Record for Professor {
    type Fields = ProfessorFields;
    const KIND: &'static str = "professor";

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn fields(&self) -> ProfessorFields {
        ProfessorFields {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
        }
    }
}

// ==============================================================================
// Enrollment (registerStudentSubject)
// ==============================================================================

/// A row of the `registerStudentSubject` table: one student registered in
/// one subject, with the grade obtained.
///
/// Like `Subject::professor_id`, the two ids are loose references.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[sqlx(rename_all = "camelCase")]
pub struct Enrollment {
    pub id: Uuid,
    pub student_id: Option<Uuid>,
    pub subject_id: Option<Uuid>,
    pub grade: Option<i32>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub date_registered: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EnrollmentFields {
    pub student_id: Option<Uuid>,
    pub subject_id: Option<Uuid>,
    pub grade: Option<i32>,
    #[serde(deserialize_with = "lenient_date")]
    pub date_registered: Option<NaiveDate>,
}

impl Enrollment {
    pub fn new(id: Uuid, fields: EnrollmentFields, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            student_id: fields.student_id,
            subject_id: fields.subject_id,
            grade: fields.grade,
            date_registered: fields.date_registered,
            created_at,
        }
    }
}

impl Record for Enrollment {
    type Fields = EnrollmentFields;
    const KIND: &'static str = "enrollment";

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn fields(&self) -> EnrollmentFields {
        EnrollmentFields {
            student_id: self.student_id,
            subject_id: self.subject_id,
            grade: self.grade,
            date_registered: self.date_registered,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn student_fields_read_browser_payloads() {
        let fields: StudentFields = serde_json::from_value(json!({
            "firstName": "Ana",
            "lastName": "Pop",
            "birthDate": "2000-01-01T00:00:00.000Z",
            "email": "a@x.com"
        }))
        .unwrap();

        assert_eq!(fields.first_name.as_deref(), Some("Ana"));
        assert_eq!(fields.birth_date, NaiveDate::from_ymd_opt(2000, 1, 1));
        assert_eq!(fields.address, None);
        assert_eq!(fields.phone, None);
    }

    #[test]
    fn records_serialize_with_camel_case_and_iso_dates() {
        let id = Uuid::new_v4();
        let created_at = DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let enrollment = Enrollment::new(
            id,
            EnrollmentFields {
                grade: Some(9),
                date_registered: NaiveDate::from_ymd_opt(2024, 4, 30),
                ..Default::default()
            },
            created_at,
        );

        let value = serde_json::to_value(&enrollment).unwrap();
        assert_eq!(value["id"], json!(id.to_string()));
        assert_eq!(value["grade"], json!(9));
        assert_eq!(value["dateRegistered"], json!("2024-04-30"));
        assert_eq!(value["studentId"], json!(null));
        assert_eq!(value["createdAt"], json!("2024-05-01T12:00:00Z"));
    }

    #[test]
    fn fields_round_trip_through_the_record() {
        let fields = SubjectFields {
            subject_name: Some("Algebra".into()),
            subject_description: None,
            professor_id: Some(Uuid::new_v4()),
        };
        let subject = Subject::new(Uuid::new_v4(), fields.clone(), Utc::now());
        assert_eq!(subject.fields(), fields);
    }

    #[test]
    fn parse_id_rejects_non_uuids() {
        assert!(parse_id("nonexistent-uuid").is_err());
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&format!(" {id} ")).unwrap(), id);
    }
}
