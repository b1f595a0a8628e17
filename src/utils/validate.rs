use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("Invalid email regex")
});

pub const NAME_MAX_LEN: usize = 64;
pub const TITLE_MAX_LEN: usize = 200;

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if !EMAIL_RE.is_match(email) {
        return Err("Adresse e-mail invalide");
    }
    Ok(())
}

/// Prénom / nom : non vide après trim, 64 caractères au plus
pub fn validate_person_name(name: &str) -> Result<(), &'static str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Le nom ne peut pas être vide");
    }
    if trimmed.chars().count() > NAME_MAX_LEN {
        return Err("Le nom est trop long (64 caractères maximum)");
    }
    Ok(())
}

/// Titre d'un cours, devoir, quiz, avis ou événement
pub fn validate_title(title: &str) -> Result<(), &'static str> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err("Le titre est obligatoire");
    }
    if trimmed.chars().count() > TITLE_MAX_LEN {
        return Err("Le titre est trop long (200 caractères maximum)");
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct PasswordValidationResult {
    pub is_valid: bool,
    pub errors: Vec<&'static str>,
}

impl PasswordValidationResult {
    pub fn error_message(&self) -> String {
        self.errors.join(" ; ")
    }
}

/// Politique : 8 caractères, une majuscule, une minuscule, un chiffre,
/// pas un mot de passe courant.
pub fn validate_password(password: &str) -> PasswordValidationResult {
    let mut errors = Vec::new();

    if password.chars().count() < 8 {
        errors.push("Le mot de passe doit contenir au moins 8 caractères");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.push("Le mot de passe doit contenir au moins une majuscule");
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        errors.push("Le mot de passe doit contenir au moins une minuscule");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("Le mot de passe doit contenir au moins un chiffre");
    }

    const COMMON: [&str; 8] = [
        "password1",
        "motdepasse1",
        "azerty123",
        "azertyuiop1",
        "qwerty123",
        "soleil123",
        "bonjour123",
        "ecole2024",
    ];
    if COMMON.iter().any(|weak| password.eq_ignore_ascii_case(weak)) {
        errors.push("Ce mot de passe est trop courant");
    }

    PasswordValidationResult {
        is_valid: errors.is_empty(),
        errors,
    }
}
