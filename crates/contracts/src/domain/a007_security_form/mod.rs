pub mod aggregate;
pub mod validation;

pub use aggregate::{
    AnswerValue, FieldAnswer, FormReport, FormReportQuery, FormReportRow, FormSubmission,
    SubmitFormDto,
};
pub use validation::{validate_answers, FieldError};
