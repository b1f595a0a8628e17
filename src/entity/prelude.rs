//! Réexports courants

pub use super::announcements::{
    ActiveModel as AnnouncementActiveModel, Entity as Announcements, Model as AnnouncementModel,
};
pub use super::assignments::{
    ActiveModel as AssignmentActiveModel, Entity as Assignments, Model as AssignmentModel,
};
pub use super::classes::{ActiveModel as ClassActiveModel, Entity as Classes, Model as ClassModel};
pub use super::courses::{ActiveModel as CourseActiveModel, Entity as Courses, Model as CourseModel};
pub use super::events::{ActiveModel as EventActiveModel, Entity as Events, Model as EventModel};
pub use super::files::{ActiveModel as FileActiveModel, Entity as Files, Model as FileModel};
pub use super::messages::{
    ActiveModel as MessageActiveModel, Entity as Messages, Model as MessageModel,
};
pub use super::quiz_responses::{
    ActiveModel as QuizResponseActiveModel, Entity as QuizResponses, Model as QuizResponseModel,
};
pub use super::quizzes::{ActiveModel as QuizActiveModel, Entity as Quizzes, Model as QuizModel};
pub use super::subjects::{
    ActiveModel as SubjectActiveModel, Entity as Subjects, Model as SubjectModel,
};
pub use super::submissions::{
    ActiveModel as SubmissionActiveModel, Entity as Submissions, Model as SubmissionModel,
};
pub use super::teachings::{
    ActiveModel as TeachingActiveModel, Entity as Teachings, Model as TeachingModel,
};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
