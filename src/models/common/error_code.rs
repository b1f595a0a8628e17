/// Codes d'erreur renvoyés dans le champ `code` de [`ApiResponse`](super::ApiResponse).
///
/// Par tranches : 1xxx requête, 2xxx authentification et droits, 3xxx
/// ressource absente, 4xxx conflit, 5xxx calendrier, 6xxx règles métier,
/// 7xxx fichiers, 9xxx serveur.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    BadRequest = 1000,
    ValidationFailed = 1001,
    InvalidDateRange = 1002,

    Unauthorized = 2000,
    InvalidCredentials = 2001,
    AccountDisabled = 2002,
    Forbidden = 2003,
    NotTeachingClass = 2004,
    RateLimitExceeded = 2005,

    NotFound = 3000,
    UserNotFound = 3001,
    ClassNotFound = 3002,
    SubjectNotFound = 3003,
    TeachingNotFound = 3004,
    CourseNotFound = 3005,
    AssignmentNotFound = 3006,
    SubmissionNotFound = 3007,
    QuizNotFound = 3008,
    QuizResponseNotFound = 3009,
    AnnouncementNotFound = 3010,
    EventNotFound = 3011,
    FileNotFound = 3012,

    Conflict = 4000,
    AlreadyGraded = 4001,
    DuplicateSubmission = 4002,
    QuizAlreadyAnswered = 4003,
    QuizHasResponses = 4004,
    ClassNotEmpty = 4005,
    NameAlreadyExists = 4006,
    TeachingAlreadyExists = 4007,

    DeadlinePassed = 5000,
    QuizNotOpen = 5001,
    QuizClosed = 5002,

    PointBudgetMismatch = 6000,
    InvalidQuestion = 6001,
    InvalidAnswers = 6002,
    GradeOutOfRange = 6003,
    PasswordPolicy = 6004,
    InvalidSubmissionContent = 6005,
    NotManualQuiz = 6006,

    FileTooLarge = 7000,
    FileTypeNotAllowed = 7001,
    FileUploadFailed = 7002,

    InternalServerError = 9000,
}

impl ErrorCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_ranges() {
        assert_eq!(ErrorCode::Success.as_i32(), 0);
        assert_eq!(ErrorCode::AlreadyGraded.as_i32(), 4001);
        assert_eq!(ErrorCode::QuizClosed.as_i32(), 5002);
        assert_eq!(ErrorCode::PointBudgetMismatch.as_i32(), 6000);
    }
}
