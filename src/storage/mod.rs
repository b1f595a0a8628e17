use std::collections::HashMap;
use std::sync::Arc;

use crate::models::{
    PaginatedResponse,
    announcements::{
        entities::{Announcement, AnnouncementVisibility, NewAnnouncement},
        responses::AnnouncementListResponse,
    },
    assignments::{
        entities::Assignment,
        requests::{AssignmentListQuery, CreateAssignmentRequest, UpdateAssignmentRequest},
    },
    classes::{
        entities::Class,
        requests::{CreateClassRequest, UpdateClassRequest},
        responses::ClassWithCount,
    },
    courses::{
        entities::Course,
        requests::{CourseListQuery, CreateCourseRequest, UpdateCourseRequest},
        responses::CourseListResponse,
    },
    events::{
        entities::{Event, EventRange, NewEvent},
        requests::UpdateEventRequest,
    },
    files::entities::File,
    messages::entities::Message,
    quizzes::{
        entities::{NewQuizResponse, Quiz, QuizDraft, QuizResponse},
        requests::QuizListQuery,
        responses::QuizResponseWithStudent,
    },
    subjects::entities::Subject,
    submissions::{
        entities::{GradeOutcome, NewSubmission, Submission},
        responses::{MySubmissionItem, SubmissionWithStudent},
    },
    teachings::{
        entities::{Teaching, TeachingDetail},
        requests::TeachingListQuery,
    },
    users::{
        entities::{NewUser, User, UserRole},
        requests::{UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};

use crate::errors::Result;

pub mod sea_orm_storage;

/// Compteurs (rendus, corrigés) par devoir ou par quiz
pub type ProgressCounts = HashMap<i64, (i64, i64)>;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// Comptes
    async fn create_user(&self, user: NewUser) -> Result<User>;
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    async fn get_user_by_login_code(&self, login_code: &str) -> Result<Option<User>>;
    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse>;
    async fn get_users_by_ids(&self, ids: &[i64]) -> Result<Vec<User>>;
    // élèves actifs des classes données, triés par nom
    async fn list_students_in_classes(&self, class_ids: &[i64]) -> Result<Vec<User>>;
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    // remplace le mot de passe ; `initial_password` à None une fois choisi par l'utilisateur
    async fn set_user_password(
        &self,
        id: i64,
        password_hash: &str,
        initial_password: Option<String>,
    ) -> Result<bool>;
    async fn delete_user(&self, id: i64) -> Result<bool>;
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // comptes dont le mot de passe provisoire n'a pas encore été changé
    async fn list_pending_credentials(&self, class_id: Option<i64>) -> Result<Vec<User>>;
    async fn count_users_by_role(&self, role: UserRole) -> Result<i64>;

    /// Classes
    async fn create_class(&self, class: CreateClassRequest) -> Result<Class>;
    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>>;
    async fn get_class_by_name(&self, name: &str) -> Result<Option<Class>>;
    async fn list_classes(&self) -> Result<Vec<ClassWithCount>>;
    async fn update_class(&self, class_id: i64, update: UpdateClassRequest)
    -> Result<Option<Class>>;
    async fn delete_class(&self, class_id: i64) -> Result<bool>;
    async fn count_students_in_class(&self, class_id: i64) -> Result<i64>;

    /// Matières
    async fn create_subject(&self, name: &str) -> Result<Subject>;
    async fn get_subject_by_id(&self, subject_id: i64) -> Result<Option<Subject>>;
    async fn get_subject_by_name(&self, name: &str) -> Result<Option<Subject>>;
    async fn list_subjects(&self) -> Result<Vec<Subject>>;
    async fn update_subject(&self, subject_id: i64, name: &str) -> Result<Option<Subject>>;
    async fn delete_subject(&self, subject_id: i64) -> Result<bool>;

    /// Enseignements
    async fn create_teaching(
        &self,
        teacher_id: i64,
        class_id: i64,
        subject_id: i64,
    ) -> Result<Teaching>;
    async fn get_teaching_by_id(&self, teaching_id: i64) -> Result<Option<Teaching>>;
    async fn find_teaching(
        &self,
        teacher_id: i64,
        class_id: i64,
        subject_id: i64,
    ) -> Result<Option<Teaching>>;
    async fn teaches_class(&self, teacher_id: i64, class_id: i64) -> Result<bool>;
    async fn list_teachings(&self, query: TeachingListQuery) -> Result<Vec<TeachingDetail>>;
    async fn delete_teaching(&self, teaching_id: i64) -> Result<bool>;
    async fn list_teacher_classes(&self, teacher_id: i64) -> Result<Vec<Class>>;
    async fn list_teacher_subjects(&self, teacher_id: i64) -> Result<Vec<Subject>>;
    async fn list_class_teachers(&self, class_id: i64) -> Result<Vec<User>>;

    /// Cours
    async fn create_course(&self, teacher_id: i64, course: CreateCourseRequest) -> Result<Course>;
    async fn get_course_by_id(&self, course_id: i64) -> Result<Option<Course>>;
    async fn list_courses_with_pagination(
        &self,
        query: CourseListQuery,
    ) -> Result<CourseListResponse>;
    async fn update_course(
        &self,
        course_id: i64,
        update: UpdateCourseRequest,
    ) -> Result<Option<Course>>;
    async fn delete_course(&self, course_id: i64) -> Result<bool>;

    /// Devoirs
    async fn create_assignment(
        &self,
        teacher_id: i64,
        assignment: CreateAssignmentRequest,
    ) -> Result<Assignment>;
    async fn get_assignment_by_id(&self, assignment_id: i64) -> Result<Option<Assignment>>;
    async fn list_assignments_with_pagination(
        &self,
        query: AssignmentListQuery,
    ) -> Result<PaginatedResponse<Assignment>>;
    async fn update_assignment(
        &self,
        assignment_id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>>;
    async fn delete_assignment(&self, assignment_id: i64) -> Result<bool>;
    async fn assignment_progress(&self, assignment_ids: &[i64]) -> Result<ProgressCounts>;

    /// Soumissions
    // Err(Conflict) si l'élève a déjà rendu ce devoir
    async fn create_submission(&self, submission: NewSubmission) -> Result<Submission>;
    async fn get_submission_by_id(&self, submission_id: i64) -> Result<Option<Submission>>;
    async fn get_student_submission(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>>;
    async fn list_student_submissions_for(
        &self,
        student_id: i64,
        assignment_ids: &[i64],
    ) -> Result<Vec<Submission>>;
    async fn list_submissions_by_assignment(
        &self,
        assignment_id: i64,
    ) -> Result<Vec<SubmissionWithStudent>>;
    async fn list_submissions_by_student(&self, student_id: i64) -> Result<Vec<MySubmissionItem>>;
    // None si la soumission est introuvable ou déjà corrigée
    async fn update_submission_content(
        &self,
        submission_id: i64,
        content: Option<String>,
        file_token: Option<String>,
    ) -> Result<Option<Submission>>;
    async fn grade_submission(
        &self,
        submission_id: i64,
        grade: f64,
        comment: Option<String>,
        grader_id: i64,
    ) -> Result<GradeOutcome<Submission>>;
    async fn count_graded_submissions(&self, assignment_id: i64) -> Result<i64>;

    /// Quiz
    async fn create_quiz(&self, draft: QuizDraft) -> Result<Quiz>;
    async fn get_quiz_by_id(&self, quiz_id: i64) -> Result<Option<Quiz>>;
    async fn list_quizzes(&self, query: QuizListQuery) -> Result<Vec<Quiz>>;
    async fn update_quiz(&self, quiz_id: i64, draft: QuizDraft) -> Result<Option<Quiz>>;
    async fn delete_quiz(&self, quiz_id: i64) -> Result<bool>;
    async fn quiz_progress(&self, quiz_ids: &[i64]) -> Result<ProgressCounts>;
    // Err(Conflict) si l'élève a déjà répondu
    async fn create_quiz_response(&self, response: NewQuizResponse) -> Result<QuizResponse>;
    async fn get_quiz_response_by_id(&self, response_id: i64) -> Result<Option<QuizResponse>>;
    async fn get_student_quiz_response(
        &self,
        quiz_id: i64,
        student_id: i64,
    ) -> Result<Option<QuizResponse>>;
    async fn list_student_quiz_responses(
        &self,
        student_id: i64,
        quiz_ids: &[i64],
    ) -> Result<Vec<QuizResponse>>;
    async fn list_quiz_responses(&self, quiz_id: i64) -> Result<Vec<QuizResponseWithStudent>>;
    async fn grade_quiz_response(
        &self,
        response_id: i64,
        grade: f64,
        grader_id: i64,
    ) -> Result<GradeOutcome<QuizResponse>>;

    /// Avis
    async fn create_announcement(&self, announcement: NewAnnouncement) -> Result<Announcement>;
    async fn get_announcement_by_id(&self, announcement_id: i64)
    -> Result<Option<Announcement>>;
    async fn list_announcements(
        &self,
        visibility: AnnouncementVisibility,
        page: Option<i64>,
        size: Option<i64>,
    ) -> Result<AnnouncementListResponse>;
    async fn delete_announcement(&self, announcement_id: i64) -> Result<bool>;

    /// Événements
    async fn create_event(&self, event: NewEvent) -> Result<Event>;
    async fn get_event_by_id(&self, event_id: i64) -> Result<Option<Event>>;
    async fn list_events(&self, range: EventRange) -> Result<Vec<Event>>;
    async fn update_event(&self, event_id: i64, update: UpdateEventRequest)
    -> Result<Option<Event>>;
    async fn delete_event(&self, event_id: i64) -> Result<bool>;

    /// Messagerie
    async fn create_message(
        &self,
        sender_id: i64,
        recipient_id: i64,
        content: &str,
    ) -> Result<Message>;
    // messages entre deux comptes, par id croissant
    async fn list_conversation(
        &self,
        user_id: i64,
        other_id: i64,
        after_id: Option<i64>,
        limit: u64,
    ) -> Result<Vec<Message>>;
    async fn mark_conversation_read(&self, reader_id: i64, sender_id: i64) -> Result<u64>;
    // non lus par expéditeur
    async fn unread_counts_by_sender(&self, recipient_id: i64) -> Result<HashMap<i64, i64>>;
    async fn count_unread_messages(&self, recipient_id: i64) -> Result<i64>;

    /// Fichiers
    async fn upload_file(&self, file: File) -> Result<File>;
    async fn get_file_by_token(&self, token: &str) -> Result<Option<File>>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
