//! Stockage SeaORM
//!
//! Couche de persistance unique pour SQLite, PostgreSQL et MySQL.

mod announcements;
mod assignments;
mod classes;
mod courses;
mod events;
mod files;
mod messages;
mod quizzes;
mod subjects;
mod submissions;
mod teachings;
mod users;

use crate::config::AppConfig;
use crate::errors::{PortalError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// Connexion, puis migrations
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        Migrator::up(&db, None)
            .await
            .map_err(|e| PortalError::database_operation(format!("Migration failed: {e}")))?;

        info!("SeaORM storage ready: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite : WAL et pragmas de performance
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| PortalError::database_config(format!("Invalid SQLite URL: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| PortalError::database_connection(format!("SQLite connection failed: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// PostgreSQL, MySQL
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| PortalError::database_connection(format!("Database connection failed: {e}")))
    }

    /// Déduit le type de base depuis l'URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(PortalError::database_config(format!(
                "Cannot infer database type from URL: {url}. Supported: sqlite://, postgres://, mysql://, or a .db/.sqlite path"
            )))
        }
    }
}

impl SeaOrmStorage {
    /// Base SQLite en mémoire, migrée ; une seule connexion pour que toutes
    /// les requêtes voient la même base
    #[cfg(test)]
    pub(crate) async fn new_in_memory() -> Result<Self> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| PortalError::database_config(format!("Invalid SQLite URL: {e}")))?
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(opt)
            .await
            .map_err(|e| PortalError::database_connection(format!("SQLite connection failed: {e}")))?;
        let db = SqlxSqliteConnector::from_sqlx_sqlite_pool(pool);

        Migrator::up(&db, None)
            .await
            .map_err(|e| PortalError::database_operation(format!("Migration failed: {e}")))?;

        Ok(Self { db })
    }
}

use std::collections::HashMap;

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
use crate::storage::{ProgressCounts, Storage};
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    async fn create_user(&self, user: NewUser) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_login_code(&self, login_code: &str) -> Result<Option<User>> {
        self.get_user_by_login_code_impl(login_code).await
    }

    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse> {
        self.list_users_with_pagination_impl(query).await
    }

    async fn get_users_by_ids(&self, ids: &[i64]) -> Result<Vec<User>> {
        self.get_users_by_ids_impl(ids).await
    }

    async fn list_students_in_classes(&self, class_ids: &[i64]) -> Result<Vec<User>> {
        self.list_students_in_classes_impl(class_ids).await
    }

    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>> {
        self.update_user_impl(id, update).await
    }

    async fn set_user_password(
        &self,
        id: i64,
        password_hash: &str,
        initial_password: Option<String>,
    ) -> Result<bool> {
        self.set_user_password_impl(id, password_hash, initial_password).await
    }

    async fn delete_user(&self, id: i64) -> Result<bool> {
        self.delete_user_impl(id).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn list_pending_credentials(&self, class_id: Option<i64>) -> Result<Vec<User>> {
        self.list_pending_credentials_impl(class_id).await
    }

    async fn count_users_by_role(&self, role: UserRole) -> Result<i64> {
        self.count_users_by_role_impl(role).await
    }

    async fn create_class(&self, class: CreateClassRequest) -> Result<Class> {
        self.create_class_impl(class).await
    }

    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>> {
        self.get_class_by_id_impl(class_id).await
    }

    async fn get_class_by_name(&self, name: &str) -> Result<Option<Class>> {
        self.get_class_by_name_impl(name).await
    }

    async fn list_classes(&self) -> Result<Vec<ClassWithCount>> {
        self.list_classes_impl().await
    }

    async fn update_class(
        &self,
        class_id: i64,
        update: UpdateClassRequest,
    ) -> Result<Option<Class>> {
        self.update_class_impl(class_id, update).await
    }

    async fn delete_class(&self, class_id: i64) -> Result<bool> {
        self.delete_class_impl(class_id).await
    }

    async fn count_students_in_class(&self, class_id: i64) -> Result<i64> {
        self.count_students_in_class_impl(class_id).await
    }

    async fn create_subject(&self, name: &str) -> Result<Subject> {
        self.create_subject_impl(name).await
    }

    async fn get_subject_by_id(&self, subject_id: i64) -> Result<Option<Subject>> {
        self.get_subject_by_id_impl(subject_id).await
    }

    async fn get_subject_by_name(&self, name: &str) -> Result<Option<Subject>> {
        self.get_subject_by_name_impl(name).await
    }

    async fn list_subjects(&self) -> Result<Vec<Subject>> {
        self.list_subjects_impl().await
    }

    async fn update_subject(&self, subject_id: i64, name: &str) -> Result<Option<Subject>> {
        self.update_subject_impl(subject_id, name).await
    }

    async fn delete_subject(&self, subject_id: i64) -> Result<bool> {
        self.delete_subject_impl(subject_id).await
    }

    async fn create_teaching(
        &self,
        teacher_id: i64,
        class_id: i64,
        subject_id: i64,
    ) -> Result<Teaching> {
        self.create_teaching_impl(teacher_id, class_id, subject_id).await
    }

    async fn get_teaching_by_id(&self, teaching_id: i64) -> Result<Option<Teaching>> {
        self.get_teaching_by_id_impl(teaching_id).await
    }

    async fn find_teaching(
        &self,
        teacher_id: i64,
        class_id: i64,
        subject_id: i64,
    ) -> Result<Option<Teaching>> {
        self.find_teaching_impl(teacher_id, class_id, subject_id).await
    }

    async fn teaches_class(&self, teacher_id: i64, class_id: i64) -> Result<bool> {
        self.teaches_class_impl(teacher_id, class_id).await
    }

    async fn list_teachings(&self, query: TeachingListQuery) -> Result<Vec<TeachingDetail>> {
        self.list_teachings_impl(query).await
    }

    async fn delete_teaching(&self, teaching_id: i64) -> Result<bool> {
        self.delete_teaching_impl(teaching_id).await
    }

    async fn list_teacher_classes(&self, teacher_id: i64) -> Result<Vec<Class>> {
        self.list_teacher_classes_impl(teacher_id).await
    }

    async fn list_teacher_subjects(&self, teacher_id: i64) -> Result<Vec<Subject>> {
        self.list_teacher_subjects_impl(teacher_id).await
    }

    async fn list_class_teachers(&self, class_id: i64) -> Result<Vec<User>> {
        self.list_class_teachers_impl(class_id).await
    }

    async fn create_course(&self, teacher_id: i64, course: CreateCourseRequest) -> Result<Course> {
        self.create_course_impl(teacher_id, course).await
    }

    async fn get_course_by_id(&self, course_id: i64) -> Result<Option<Course>> {
        self.get_course_by_id_impl(course_id).await
    }

    async fn list_courses_with_pagination(
        &self,
        query: CourseListQuery,
    ) -> Result<CourseListResponse> {
        self.list_courses_with_pagination_impl(query).await
    }

    async fn update_course(
        &self,
        course_id: i64,
        update: UpdateCourseRequest,
    ) -> Result<Option<Course>> {
        self.update_course_impl(course_id, update).await
    }

    async fn delete_course(&self, course_id: i64) -> Result<bool> {
        self.delete_course_impl(course_id).await
    }

    async fn create_assignment(
        &self,
        teacher_id: i64,
        assignment: CreateAssignmentRequest,
    ) -> Result<Assignment> {
        self.create_assignment_impl(teacher_id, assignment).await
    }

    async fn get_assignment_by_id(&self, assignment_id: i64) -> Result<Option<Assignment>> {
        self.get_assignment_by_id_impl(assignment_id).await
    }

    async fn list_assignments_with_pagination(
        &self,
        query: AssignmentListQuery,
    ) -> Result<PaginatedResponse<Assignment>> {
        self.list_assignments_with_pagination_impl(query).await
    }

    async fn update_assignment(
        &self,
        assignment_id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>> {
        self.update_assignment_impl(assignment_id, update).await
    }

    async fn delete_assignment(&self, assignment_id: i64) -> Result<bool> {
        self.delete_assignment_impl(assignment_id).await
    }

    async fn assignment_progress(&self, assignment_ids: &[i64]) -> Result<ProgressCounts> {
        self.assignment_progress_impl(assignment_ids).await
    }

    async fn create_submission(&self, submission: NewSubmission) -> Result<Submission> {
        self.create_submission_impl(submission).await
    }

    async fn get_submission_by_id(&self, submission_id: i64) -> Result<Option<Submission>> {
        self.get_submission_by_id_impl(submission_id).await
    }

    async fn get_student_submission(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>> {
        self.get_student_submission_impl(assignment_id, student_id).await
    }

    async fn list_student_submissions_for(
        &self,
        student_id: i64,
        assignment_ids: &[i64],
    ) -> Result<Vec<Submission>> {
        self.list_student_submissions_for_impl(student_id, assignment_ids).await
    }

    async fn list_submissions_by_assignment(
        &self,
        assignment_id: i64,
    ) -> Result<Vec<SubmissionWithStudent>> {
        self.list_submissions_by_assignment_impl(assignment_id).await
    }

    async fn list_submissions_by_student(&self, student_id: i64) -> Result<Vec<MySubmissionItem>> {
        self.list_submissions_by_student_impl(student_id).await
    }

    async fn update_submission_content(
        &self,
        submission_id: i64,
        content: Option<String>,
        file_token: Option<String>,
    ) -> Result<Option<Submission>> {
        self.update_submission_content_impl(submission_id, content, file_token).await
    }

    async fn grade_submission(
        &self,
        submission_id: i64,
        grade: f64,
        comment: Option<String>,
        grader_id: i64,
    ) -> Result<GradeOutcome<Submission>> {
        self.grade_submission_impl(submission_id, grade, comment, grader_id).await
    }

    async fn count_graded_submissions(&self, assignment_id: i64) -> Result<i64> {
        self.count_graded_submissions_impl(assignment_id).await
    }

    async fn create_quiz(&self, draft: QuizDraft) -> Result<Quiz> {
        self.create_quiz_impl(draft).await
    }

    async fn get_quiz_by_id(&self, quiz_id: i64) -> Result<Option<Quiz>> {
        self.get_quiz_by_id_impl(quiz_id).await
    }

    async fn list_quizzes(&self, query: QuizListQuery) -> Result<Vec<Quiz>> {
        self.list_quizzes_impl(query).await
    }

    async fn update_quiz(&self, quiz_id: i64, draft: QuizDraft) -> Result<Option<Quiz>> {
        self.update_quiz_impl(quiz_id, draft).await
    }

    async fn delete_quiz(&self, quiz_id: i64) -> Result<bool> {
        self.delete_quiz_impl(quiz_id).await
    }

    async fn quiz_progress(&self, quiz_ids: &[i64]) -> Result<ProgressCounts> {
        self.quiz_progress_impl(quiz_ids).await
    }

    async fn create_quiz_response(&self, response: NewQuizResponse) -> Result<QuizResponse> {
        self.create_quiz_response_impl(response).await
    }

    async fn get_quiz_response_by_id(&self, response_id: i64) -> Result<Option<QuizResponse>> {
        self.get_quiz_response_by_id_impl(response_id).await
    }

    async fn get_student_quiz_response(
        &self,
        quiz_id: i64,
        student_id: i64,
    ) -> Result<Option<QuizResponse>> {
        self.get_student_quiz_response_impl(quiz_id, student_id).await
    }

    async fn list_student_quiz_responses(
        &self,
        student_id: i64,
        quiz_ids: &[i64],
    ) -> Result<Vec<QuizResponse>> {
        self.list_student_quiz_responses_impl(student_id, quiz_ids).await
    }

    async fn list_quiz_responses(&self, quiz_id: i64) -> Result<Vec<QuizResponseWithStudent>> {
        self.list_quiz_responses_impl(quiz_id).await
    }

    async fn grade_quiz_response(
        &self,
        response_id: i64,
        grade: f64,
        grader_id: i64,
    ) -> Result<GradeOutcome<QuizResponse>> {
        self.grade_quiz_response_impl(response_id, grade, grader_id).await
    }

    async fn create_announcement(&self, announcement: NewAnnouncement) -> Result<Announcement> {
        self.create_announcement_impl(announcement).await
    }

    async fn get_announcement_by_id(&self, announcement_id: i64) -> Result<Option<Announcement>> {
        self.get_announcement_by_id_impl(announcement_id).await
    }

    async fn list_announcements(
        &self,
        visibility: AnnouncementVisibility,
        page: Option<i64>,
        size: Option<i64>,
    ) -> Result<AnnouncementListResponse> {
        self.list_announcements_impl(visibility, page, size).await
    }

    async fn delete_announcement(&self, announcement_id: i64) -> Result<bool> {
        self.delete_announcement_impl(announcement_id).await
    }

    async fn create_event(&self, event: NewEvent) -> Result<Event> {
        self.create_event_impl(event).await
    }

    async fn get_event_by_id(&self, event_id: i64) -> Result<Option<Event>> {
        self.get_event_by_id_impl(event_id).await
    }

    async fn list_events(&self, range: EventRange) -> Result<Vec<Event>> {
        self.list_events_impl(range).await
    }

    async fn update_event(
        &self,
        event_id: i64,
        update: UpdateEventRequest,
    ) -> Result<Option<Event>> {
        self.update_event_impl(event_id, update).await
    }

    async fn delete_event(&self, event_id: i64) -> Result<bool> {
        self.delete_event_impl(event_id).await
    }

    async fn create_message(
        &self,
        sender_id: i64,
        recipient_id: i64,
        content: &str,
    ) -> Result<Message> {
        self.create_message_impl(sender_id, recipient_id, content).await
    }

    async fn list_conversation(
        &self,
        user_id: i64,
        other_id: i64,
        after_id: Option<i64>,
        limit: u64,
    ) -> Result<Vec<Message>> {
        self.list_conversation_impl(user_id, other_id, after_id, limit).await
    }

    async fn mark_conversation_read(&self, reader_id: i64, sender_id: i64) -> Result<u64> {
        self.mark_conversation_read_impl(reader_id, sender_id).await
    }

    async fn unread_counts_by_sender(&self, recipient_id: i64) -> Result<HashMap<i64, i64>> {
        self.unread_counts_by_sender_impl(recipient_id).await
    }

    async fn count_unread_messages(&self, recipient_id: i64) -> Result<i64> {
        self.count_unread_messages_impl(recipient_id).await
    }

    async fn upload_file(&self, file: File) -> Result<File> {
        self.upload_file_impl(file).await
    }

    async fn get_file_by_token(&self, token: &str) -> Result<Option<File>> {
        self.get_file_by_token_impl(token).await
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::SeaOrmStorage;
    use crate::models::{
        assignments::{
            entities::{Assignment, SubmissionType},
            requests::CreateAssignmentRequest,
        },
        classes::{entities::Class, requests::CreateClassRequest},
        subjects::entities::Subject,
        users::entities::{NewUser, User, UserRole},
    };

    pub async fn memory_storage() -> SeaOrmStorage {
        SeaOrmStorage::new_in_memory().await.expect("in-memory storage")
    }

    pub async fn seed_class(storage: &SeaOrmStorage, name: &str) -> Class {
        storage
            .create_class_impl(CreateClassRequest {
                name: name.to_string(),
                level: None,
            })
            .await
            .expect("seed class")
    }

    pub async fn seed_subject(storage: &SeaOrmStorage, name: &str) -> Subject {
        storage.create_subject_impl(name).await.expect("seed subject")
    }

    pub fn new_user(login_code: &str, role: UserRole, class_id: Option<i64>) -> NewUser {
        NewUser {
            login_code: login_code.to_string(),
            password_hash: "hash".into(),
            initial_password: Some("Provisoire1".into()),
            role,
            first_name: "Camille".into(),
            last_name: format!("Nom-{login_code}"),
            email: None,
            class_id,
        }
    }

    /// Une classe, une matière, un admin, un prof qui y enseigne, un élève et un devoir
    pub struct Fixture {
        pub storage: SeaOrmStorage,
        pub class: Class,
        pub subject: Subject,
        pub admin: User,
        pub prof: User,
        pub student: User,
        pub assignment: Assignment,
    }

    impl Fixture {
        /// Le stockage tel que les services le reçoivent
        pub fn shared(&self) -> std::sync::Arc<dyn crate::storage::Storage> {
            std::sync::Arc::new(self.storage.clone())
        }
    }

    pub async fn fixture() -> Fixture {
        let storage = memory_storage().await;
        let class = seed_class(&storage, "5e A").await;
        let subject = seed_subject(&storage, "Français").await;
        let admin = storage
            .create_user_impl(new_user("admin", UserRole::Admin, None))
            .await
            .expect("admin");
        let prof = storage
            .create_user_impl(new_user("prof", UserRole::Prof, None))
            .await
            .expect("prof");
        let student = storage
            .create_user_impl(new_user("eleve", UserRole::Eleve, Some(class.id)))
            .await
            .expect("eleve");
        storage
            .create_teaching_impl(prof.id, class.id, subject.id)
            .await
            .expect("teaching");
        let assignment = storage
            .create_assignment_impl(
                prof.id,
                CreateAssignmentRequest {
                    class_id: class.id,
                    subject_id: subject.id,
                    title: "Rédaction".into(),
                    description: None,
                    due_date: chrono::Utc::now() + chrono::Duration::days(7),
                    submission_type: SubmissionType::Texte,
                    max_grade: None,
                },
            )
            .await
            .expect("assignment");

        Fixture {
            storage,
            class,
            subject,
            admin,
            prof,
            student,
            assignment,
        }
    }
}
