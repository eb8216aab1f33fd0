pub mod batch;
pub mod feedback;
pub mod profile;
pub mod question;
pub mod subject;
pub mod timetable;

pub use batch::Batch;
pub use feedback::{Answer, AnsweredQuestion, FeedbackRecord};
pub use profile::{Profile, StudentProfile};
pub use question::{FeedbackQuestion, QuestionKind};
pub use subject::Subject;
pub use timetable::ScheduledSession;
