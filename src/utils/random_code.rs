//! Génération des identifiants de connexion, mots de passe provisoires et
//! jetons de fichiers.

use rand::Rng;
use rand::seq::SliceRandom;

// sans 0/O, 1/l/I pour des fiches d'identifiants lisibles
const UPPER: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ";
const LOWER: &[u8] = b"abcdefghijkmnpqrstuvwxyz";
const DIGITS: &[u8] = b"23456789";

fn fold_char(c: char) -> Option<&'static str> {
    let folded = match c {
        'à' | 'â' | 'ä' | 'á' | 'ã' | 'å' => "a",
        'ç' => "c",
        'é' | 'è' | 'ê' | 'ë' => "e",
        'î' | 'ï' | 'í' | 'ì' => "i",
        'ñ' => "n",
        'ô' | 'ö' | 'ó' | 'ò' | 'õ' => "o",
        'ù' | 'û' | 'ü' | 'ú' => "u",
        'ÿ' | 'ý' => "y",
        'œ' => "oe",
        'æ' => "ae",
        _ => return None,
    };
    Some(folded)
}

/// Minuscules ASCII : accents repliés, tout autre caractère supprimé
pub fn ascii_fold(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            out.push(c);
        } else if let Some(folded) = fold_char(c) {
            out.push_str(folded);
        }
    }
    out
}

/// Initiale du prénom + nom, ex. « Éloïse Le Bihan » -> `elebihan`
pub fn login_code_base(first_name: &str, last_name: &str) -> String {
    let first = ascii_fold(first_name);
    let last = ascii_fold(last_name);
    let mut base = String::new();
    if let Some(initial) = first.chars().next() {
        base.push(initial);
    }
    base.push_str(&last);
    if base.is_empty() {
        base.push_str("utilisateur");
    }
    base
}

pub fn random_digits(count: usize) -> String {
    let mut rng = rand::rng();
    (0..count)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}

/// Identifiant candidat ; l'unicité est vérifiée par l'appelant
pub fn generate_login_code(first_name: &str, last_name: &str, digits: usize) -> String {
    format!("{}{}", login_code_base(first_name, last_name), random_digits(digits))
}

/// Mot de passe provisoire respectant la politique (majuscule, minuscule, chiffre)
pub fn generate_password(length: usize) -> String {
    let length = length.max(8);
    let mut rng = rand::rng();
    let pick = |set: &[u8], rng: &mut rand::rngs::ThreadRng| {
        set[rng.random_range(0..set.len())] as char
    };

    let mut chars = vec![
        pick(UPPER, &mut rng),
        pick(LOWER, &mut rng),
        pick(DIGITS, &mut rng),
    ];
    let all: Vec<u8> = [UPPER, LOWER, DIGITS].concat();
    while chars.len() < length {
        chars.push(pick(&all, &mut rng));
    }
    chars.shuffle(&mut rng);
    chars.into_iter().collect()
}

/// Jeton de fichier : uuid v4 sans tirets
pub fn generate_file_token() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::extractor::is_valid_file_token;
    use crate::utils::validate::validate_password;

    #[test]
    fn test_login_code_base_folds_accents() {
        assert_eq!(login_code_base("Éloïse", "Le Bihan"), "elebihan");
        assert_eq!(login_code_base("Jean-Noël", "N'Diaye"), "jndiaye");
        assert_eq!(login_code_base("", ""), "utilisateur");
    }

    #[test]
    fn test_generate_login_code_suffix() {
        let code = generate_login_code("Marie", "Curie", 3);
        assert!(code.starts_with("mcurie"));
        assert_eq!(code.len(), "mcurie".len() + 3);
        assert!(code["mcurie".len()..].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_generated_password_meets_policy() {
        for _ in 0..50 {
            let password = generate_password(10);
            assert_eq!(password.len(), 10);
            assert!(validate_password(&password).is_valid, "{password}");
        }
    }

    #[test]
    fn test_file_token_shape() {
        assert!(is_valid_file_token(&generate_file_token()));
    }
}
