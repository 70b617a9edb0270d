pub mod dates;
pub mod error;
pub mod records;

// Re-export the core types to provide a clean public API.
pub use error::CoreError;
pub use records::{
    Enrollment, EnrollmentFields, Professor, ProfessorFields, Record, Student, StudentFields,
    Subject, SubjectFields, parse_id,
};
