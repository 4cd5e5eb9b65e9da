//! Legal basis suggestions for processing purposes (LGPD art. 7).

use serde::Serialize;

pub const BASIS_LEGAL_OBLIGATION: &str = "LEGAL_OBLIGATION";
pub const BASIS_CONSENT: &str = "CONSENT";
pub const BASIS_LEGITIMATE_INTEREST: &str = "LEGITIMATE_INTEREST";
pub const BASIS_CONTRACT: &str = "CONTRACT";

/// A suggested legal basis with the article it rests on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LegalBasisSuggestion {
    pub basis: &'static str,
    pub article: &'static str,
    pub description: &'static str,
}

/// Known purpose keys and their suggestions.
pub const SUGGESTIONS: &[(&str, LegalBasisSuggestion)] = &[
    (
        "PLD",
        LegalBasisSuggestion {
            basis: BASIS_LEGAL_OBLIGATION,
            article: "Art. 7º, II",
            description: "Obrigação Legal - Lei 9.613/98 (PLD/FT)",
        },
    ),
    (
        "KYC",
        LegalBasisSuggestion {
            basis: BASIS_LEGAL_OBLIGATION,
            article: "Art. 7º, II",
            description: "Obrigação Legal - Lei 14.790/2023",
        },
    ),
    (
        "MARKETING",
        LegalBasisSuggestion {
            basis: BASIS_CONSENT,
            article: "Art. 7º, I",
            description: "Consentimento do titular",
        },
    ),
    (
        "RESPONSIBLE_GAMING",
        LegalBasisSuggestion {
            basis: BASIS_LEGITIMATE_INTEREST,
            article: "Art. 7º, IX",
            description: "Interesse Legítimo - Proteção do jogador",
        },
    ),
    (
        "FRAUD_PREVENTION",
        LegalBasisSuggestion {
            basis: BASIS_LEGITIMATE_INTEREST,
            article: "Art. 7º, IX",
            description: "Interesse Legítimo - Prevenção a fraudes",
        },
    ),
    (
        "CONTRACT_EXECUTION",
        LegalBasisSuggestion {
            basis: BASIS_CONTRACT,
            article: "Art. 7º, V",
            description: "Execução de contrato",
        },
    ),
];

/// Suggestion for purposes outside the table.
pub const FALLBACK_SUGGESTION: LegalBasisSuggestion = LegalBasisSuggestion {
    basis: BASIS_LEGITIMATE_INTEREST,
    article: "Art. 7º, IX",
    description: "Interesse Legítimo (verificar necessidade)",
};

/// Normalize a free-form purpose into a table key: upper-case, runs of
/// whitespace collapsed into `_`.
pub fn purpose_key(purpose: &str) -> String {
    purpose
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_uppercase()
}

/// Suggest a legal basis for a purpose.
pub fn suggest_legal_basis(purpose: &str) -> LegalBasisSuggestion {
    let key = purpose_key(purpose);
    SUGGESTIONS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, suggestion)| *suggestion)
        .unwrap_or(FALLBACK_SUGGESTION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_purpose_key_normalization() {
        assert_eq!(purpose_key("fraud prevention"), "FRAUD_PREVENTION");
        assert_eq!(purpose_key("  Responsible   Gaming "), "RESPONSIBLE_GAMING");
    }

    #[test]
    fn test_known_purposes() {
        assert_eq!(suggest_legal_basis("kyc").basis, BASIS_LEGAL_OBLIGATION);
        assert_eq!(suggest_legal_basis("Marketing").basis, BASIS_CONSENT);
        assert_eq!(suggest_legal_basis("contract execution").article, "Art. 7º, V");
    }

    #[test]
    fn test_unknown_purpose_falls_back_to_legitimate_interest() {
        let suggestion = suggest_legal_basis("analytics");
        assert_eq!(suggestion, FALLBACK_SUGGESTION);
        assert!(suggestion.description.contains("verificar"));
    }
}
