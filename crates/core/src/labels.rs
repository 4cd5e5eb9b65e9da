//! Display labels for the report and the wizard.
//!
//! Each table is closed. Values outside it are returned unchanged so that a
//! newer storage value never breaks rendering.

/// Project lifecycle status -> label.
pub fn project_status_label(status: &str) -> &str {
    match status {
        "DRAFT" => "Rascunho",
        "IN_REVIEW" => "Em Análise",
        "APPROVED" => "Aprovado",
        "ARCHIVED" => "Arquivado",
        other => other,
    }
}

/// Action status -> label.
pub fn action_status_label(status: &str) -> &str {
    match status {
        "PENDING" => "Pendente",
        "IN_PROGRESS" => "Em Andamento",
        "COMPLETED" => "Concluído",
        other => other,
    }
}

/// Risk level -> label.
pub fn risk_level_label(level: &str) -> &str {
    match level {
        "LOW" => "Baixo",
        "MEDIUM" => "Médio",
        "HIGH" => "Alto",
        "CRITICAL" => "Crítico",
        other => other,
    }
}

/// Data category key -> label.
pub fn data_category_label(category: &str) -> &str {
    match category {
        "identification" => "Identificação",
        "financial" => "Financeiro",
        "biometric" => "Biométrico",
        "health" => "Saúde",
        "location" => "Localização",
        "behavioral" => "Comportamental",
        "gaming" => "Apostas/Jogos",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_values_are_translated() {
        assert_eq!(project_status_label("IN_REVIEW"), "Em Análise");
        assert_eq!(action_status_label("COMPLETED"), "Concluído");
        assert_eq!(risk_level_label("CRITICAL"), "Crítico");
        assert_eq!(data_category_label("gaming"), "Apostas/Jogos");
    }

    #[test]
    fn test_unknown_values_pass_through() {
        assert_eq!(project_status_label("SUSPENDED"), "SUSPENDED");
        assert_eq!(action_status_label("BLOCKED"), "BLOCKED");
        assert_eq!(risk_level_label("SEVERE"), "SEVERE");
        assert_eq!(data_category_label("genetic"), "genetic");
        assert_eq!(data_category_label(""), "");
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert_eq!(data_category_label("Health"), "Health");
        assert_eq!(risk_level_label("low"), "low");
    }
}
