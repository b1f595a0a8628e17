use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Classes
        manager
            .create_table(
                Table::create()
                    .table(Classes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Classes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Classes::Name).string().not_null().unique_key())
                    .col(ColumnDef::new(Classes::Level).string().null())
                    .col(ColumnDef::new(Classes::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Classes::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // Matières
        manager
            .create_table(
                Table::create()
                    .table(Subjects::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Subjects::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Subjects::Name).string().not_null().unique_key())
                    .col(ColumnDef::new(Subjects::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // Utilisateurs
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::LoginCode)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::Email).string().null())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::InitialPassword).string().null())
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .col(ColumnDef::new(Users::FirstName).string().not_null())
                    .col(ColumnDef::new(Users::LastName).string().not_null())
                    .col(ColumnDef::new(Users::ClassId).big_integer().null())
                    .col(
                        ColumnDef::new(Users::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Users::LastLogin).big_integer().null())
                    .col(ColumnDef::new(Users::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Users::Table, Users::ClassId)
                            .to(Classes::Table, Classes::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Fichiers
        manager
            .create_table(
                Table::create()
                    .table(Files::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Files::Token)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Files::OriginalName).string().not_null())
                    .col(ColumnDef::new(Files::StoredName).string().not_null())
                    .col(ColumnDef::new(Files::FileSize).big_integer().not_null())
                    .col(ColumnDef::new(Files::FileType).string().not_null())
                    .col(ColumnDef::new(Files::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Files::UploadedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Files::Table, Files::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Enseignements (prof -> classe -> matière)
        manager
            .create_table(
                Table::create()
                    .table(Teachings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Teachings::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Teachings::TeacherId).big_integer().not_null())
                    .col(ColumnDef::new(Teachings::ClassId).big_integer().not_null())
                    .col(ColumnDef::new(Teachings::SubjectId).big_integer().not_null())
                    .col(ColumnDef::new(Teachings::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Teachings::Table, Teachings::TeacherId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Teachings::Table, Teachings::ClassId)
                            .to(Classes::Table, Classes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Teachings::Table, Teachings::SubjectId)
                            .to(Subjects::Table, Subjects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Cours (fiches de cours)
        manager
            .create_table(
                Table::create()
                    .table(Courses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Courses::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Courses::TeacherId).big_integer().not_null())
                    .col(ColumnDef::new(Courses::ClassId).big_integer().not_null())
                    .col(ColumnDef::new(Courses::SubjectId).big_integer().not_null())
                    .col(ColumnDef::new(Courses::Title).string().not_null())
                    .col(ColumnDef::new(Courses::Content).text().not_null())
                    .col(ColumnDef::new(Courses::FileToken).string().null())
                    .col(ColumnDef::new(Courses::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Courses::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Courses::Table, Courses::TeacherId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Courses::Table, Courses::ClassId)
                            .to(Classes::Table, Classes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Courses::Table, Courses::SubjectId)
                            .to(Subjects::Table, Subjects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Devoirs
        manager
            .create_table(
                Table::create()
                    .table(Assignments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Assignments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Assignments::TeacherId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Assignments::ClassId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Assignments::SubjectId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Assignments::Title).string().not_null())
                    .col(ColumnDef::new(Assignments::Description).text().null())
                    .col(ColumnDef::new(Assignments::DueDate).big_integer().not_null())
                    .col(
                        ColumnDef::new(Assignments::SubmissionType)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Assignments::MaxGrade).double().not_null())
                    .col(
                        ColumnDef::new(Assignments::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Assignments::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Assignments::Table, Assignments::TeacherId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Assignments::Table, Assignments::ClassId)
                            .to(Classes::Table, Classes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Assignments::Table, Assignments::SubjectId)
                            .to(Subjects::Table, Subjects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Soumissions
        manager
            .create_table(
                Table::create()
                    .table(Submissions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Submissions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Submissions::AssignmentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Submissions::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Submissions::Content).text().null())
                    .col(ColumnDef::new(Submissions::FileToken).string().null())
                    .col(ColumnDef::new(Submissions::Grade).double().null())
                    .col(ColumnDef::new(Submissions::Comment).text().null())
                    .col(
                        ColumnDef::new(Submissions::IsGraded)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Submissions::GradedBy).big_integer().null())
                    .col(ColumnDef::new(Submissions::GradedAt).big_integer().null())
                    .col(
                        ColumnDef::new(Submissions::SubmittedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Submissions::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Submissions::Table, Submissions::AssignmentId)
                            .to(Assignments::Table, Assignments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Submissions::Table, Submissions::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Quiz (questions embarquées en JSON)
        manager
            .create_table(
                Table::create()
                    .table(Quizzes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Quizzes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Quizzes::TeacherId).big_integer().not_null())
                    .col(ColumnDef::new(Quizzes::ClassId).big_integer().not_null())
                    .col(ColumnDef::new(Quizzes::SubjectId).big_integer().not_null())
                    .col(ColumnDef::new(Quizzes::Title).string().not_null())
                    .col(ColumnDef::new(Quizzes::Description).text().null())
                    .col(ColumnDef::new(Quizzes::StartsAt).big_integer().not_null())
                    .col(ColumnDef::new(Quizzes::Deadline).big_integer().not_null())
                    .col(ColumnDef::new(Quizzes::GradingMode).string().not_null())
                    .col(ColumnDef::new(Quizzes::Scale).double().not_null())
                    .col(ColumnDef::new(Quizzes::Questions).text().not_null())
                    .col(ColumnDef::new(Quizzes::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Quizzes::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Quizzes::Table, Quizzes::TeacherId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Quizzes::Table, Quizzes::ClassId)
                            .to(Classes::Table, Classes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Quizzes::Table, Quizzes::SubjectId)
                            .to(Subjects::Table, Subjects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Réponses aux quiz
        manager
            .create_table(
                Table::create()
                    .table(QuizResponses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(QuizResponses::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(QuizResponses::QuizId).big_integer().not_null())
                    .col(
                        ColumnDef::new(QuizResponses::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(QuizResponses::Answers).text().not_null())
                    .col(ColumnDef::new(QuizResponses::AutoScore).double().not_null())
                    .col(ColumnDef::new(QuizResponses::FinalGrade).double().null())
                    .col(
                        ColumnDef::new(QuizResponses::IsGraded)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(QuizResponses::GradedBy).big_integer().null())
                    .col(ColumnDef::new(QuizResponses::GradedAt).big_integer().null())
                    .col(
                        ColumnDef::new(QuizResponses::SubmittedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(QuizResponses::Table, QuizResponses::QuizId)
                            .to(Quizzes::Table, Quizzes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(QuizResponses::Table, QuizResponses::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Avis
        manager
            .create_table(
                Table::create()
                    .table(Announcements::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Announcements::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Announcements::AuthorId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Announcements::Title).string().not_null())
                    .col(ColumnDef::new(Announcements::Content).text().not_null())
                    .col(ColumnDef::new(Announcements::Audience).string().not_null())
                    .col(ColumnDef::new(Announcements::ClassId).big_integer().null())
                    .col(
                        ColumnDef::new(Announcements::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Announcements::Table, Announcements::AuthorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Announcements::Table, Announcements::ClassId)
                            .to(Classes::Table, Classes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Événements
        manager
            .create_table(
                Table::create()
                    .table(Events::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Events::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Events::AuthorId).big_integer().not_null())
                    .col(ColumnDef::new(Events::Title).string().not_null())
                    .col(ColumnDef::new(Events::Description).text().null())
                    .col(ColumnDef::new(Events::StartAt).big_integer().not_null())
                    .col(ColumnDef::new(Events::EndAt).big_integer().null())
                    .col(ColumnDef::new(Events::Location).string().null())
                    .col(ColumnDef::new(Events::ClassId).big_integer().null())
                    .col(ColumnDef::new(Events::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Events::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Events::Table, Events::AuthorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Events::Table, Events::ClassId)
                            .to(Classes::Table, Classes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Messages
        manager
            .create_table(
                Table::create()
                    .table(Messages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Messages::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Messages::SenderId).big_integer().not_null())
                    .col(ColumnDef::new(Messages::RecipientId).big_integer().not_null())
                    .col(ColumnDef::new(Messages::Content).text().not_null())
                    .col(
                        ColumnDef::new(Messages::IsRead)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Messages::SentAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Messages::Table, Messages::SenderId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Messages::Table, Messages::RecipientId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_users_role")
                    .table(Users::Table)
                    .col(Users::Role)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_users_class_id")
                    .table(Users::Table)
                    .col(Users::ClassId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_teachings_teacher_class_subject")
                    .table(Teachings::Table)
                    .col(Teachings::TeacherId)
                    .col(Teachings::ClassId)
                    .col(Teachings::SubjectId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // une seule soumission par (devoir, élève)
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_submissions_assignment_student")
                    .table(Submissions::Table)
                    .col(Submissions::AssignmentId)
                    .col(Submissions::StudentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // une seule réponse par (quiz, élève)
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_quiz_responses_quiz_student")
                    .table(QuizResponses::Table)
                    .col(QuizResponses::QuizId)
                    .col(QuizResponses::StudentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_assignments_class_id")
                    .table(Assignments::Table)
                    .col(Assignments::ClassId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_quizzes_class_id")
                    .table(Quizzes::Table)
                    .col(Quizzes::ClassId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_events_start_at")
                    .table(Events::Table)
                    .col(Events::StartAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_messages_pair")
                    .table(Messages::Table)
                    .col(Messages::SenderId)
                    .col(Messages::RecipientId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ordre inverse de la création
        manager
            .drop_table(Table::drop().table(Messages::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Events::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Announcements::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(QuizResponses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Quizzes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Submissions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Assignments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Courses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Teachings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Files::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Subjects::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Classes::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Classes {
    #[sea_orm(iden = "classes")]
    Table,
    Id,
    Name,
    Level,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Subjects {
    #[sea_orm(iden = "subjects")]
    Table,
    Id,
    Name,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Users {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    LoginCode,
    Email,
    PasswordHash,
    InitialPassword,
    Role,
    FirstName,
    LastName,
    ClassId,
    IsActive,
    LastLogin,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Files {
    #[sea_orm(iden = "files")]
    Table,
    Token,
    OriginalName,
    StoredName,
    FileSize,
    FileType,
    UserId,
    UploadedAt,
}

#[derive(DeriveIden)]
enum Teachings {
    #[sea_orm(iden = "teachings")]
    Table,
    Id,
    TeacherId,
    ClassId,
    SubjectId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Courses {
    #[sea_orm(iden = "courses")]
    Table,
    Id,
    TeacherId,
    ClassId,
    SubjectId,
    Title,
    Content,
    FileToken,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Assignments {
    #[sea_orm(iden = "assignments")]
    Table,
    Id,
    TeacherId,
    ClassId,
    SubjectId,
    Title,
    Description,
    DueDate,
    SubmissionType,
    MaxGrade,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Submissions {
    #[sea_orm(iden = "submissions")]
    Table,
    Id,
    AssignmentId,
    StudentId,
    Content,
    FileToken,
    Grade,
    Comment,
    IsGraded,
    GradedBy,
    GradedAt,
    SubmittedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Quizzes {
    #[sea_orm(iden = "quizzes")]
    Table,
    Id,
    TeacherId,
    ClassId,
    SubjectId,
    Title,
    Description,
    StartsAt,
    Deadline,
    GradingMode,
    Scale,
    Questions,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum QuizResponses {
    #[sea_orm(iden = "quiz_responses")]
    Table,
    Id,
    QuizId,
    StudentId,
    Answers,
    AutoScore,
    FinalGrade,
    IsGraded,
    GradedBy,
    GradedAt,
    SubmittedAt,
}

#[derive(DeriveIden)]
enum Announcements {
    #[sea_orm(iden = "announcements")]
    Table,
    Id,
    AuthorId,
    Title,
    Content,
    Audience,
    ClassId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Events {
    #[sea_orm(iden = "events")]
    Table,
    Id,
    AuthorId,
    Title,
    Description,
    StartAt,
    EndAt,
    Location,
    ClassId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Messages {
    #[sea_orm(iden = "messages")]
    Table,
    Id,
    SenderId,
    RecipientId,
    Content,
    IsRead,
    SentAt,
}
