pub(crate) mod google_auth;
pub(crate) mod grading;
pub(crate) mod pdf_extract;
pub(crate) mod question_gen;
pub(crate) mod storage;
