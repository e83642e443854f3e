//! Applicant attributes as collected by the loan application form.
//!
//! `input` holds the typed record every calculation works from, `categories`
//! the caller-supplied label-to-code tables, and `form` the lenient parser
//! that turns raw submitted values into an `ApplicantInput`.

pub mod categories;
pub mod form;
pub mod input;

pub use categories::{CategoryEntry, CategoryTable};
pub use form::{FormSubmission, ParsedApplicant};
pub use input::ApplicantInput;
