//! quizsmith-report: self-contained HTML reports for reviewed quiz attempts.

pub mod html;

pub use html::{generate_attempt_html, write_attempt_html};
