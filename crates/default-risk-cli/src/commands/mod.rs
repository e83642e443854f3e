pub mod applicant;
pub mod scoring;
