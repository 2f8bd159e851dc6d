//! Reply rule table for the health assistant.
//!
//! The default table carries the French responses of the MediConnect
//! chat screen. Custom tables can be loaded from JSON, e.g. to localize
//! the assistant, as long as every rule keeps at least one trigger and
//! a non-empty response.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when loading a custom rule table.
#[derive(Error, Debug)]
pub enum RulesError {
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Rule {0} has no triggers")]
    EmptyTriggers(usize),

    #[error("Rule {0} has an empty response")]
    EmptyResponse(usize),
}

pub type RulesResult<T> = Result<T, RulesError>;

/// One entry of the ordered reply table: trigger keywords → response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReplyRule {
    /// Trigger substrings, matched case-insensitively. Any one suffices.
    pub triggers: Vec<String>,
    /// Canned response returned when this rule fires.
    pub response: String,
}

impl ReplyRule {
    /// Build a rule from trigger literals.
    pub fn new(triggers: &[&str], response: &str) -> Self {
        Self {
            triggers: triggers.iter().map(|t| t.to_lowercase()).collect(),
            response: response.to_string(),
        }
    }
}

/// Response returned when no rule matches.
pub const FALLBACK_RESPONSE: &str = "Je comprends votre question. Pour des conseils médicaux \
    personnalisés, je vous recommande de consulter un professionnel de santé. Je peux vous aider \
    à trouver des pharmacies ou à commander des médicaments prescrits via l'application.";

/// Default rule table, in canonical order.
pub fn default_rules() -> Vec<ReplyRule> {
    vec![
        ReplyRule::new(
            &["bonjour", "salut", "hello"],
            "Bonjour ! Comment puis-je vous aider aujourd'hui ? Je peux vous renseigner sur les \
             médicaments, leurs interactions, ou vous orienter vers un professionnel de santé si \
             nécessaire.",
        ),
        ReplyRule::new(
            &["mal de tête", "migraine"],
            "Pour un mal de tête, vous pouvez prendre du paracétamol (500mg à 1g toutes les 6 \
             heures, maximum 4g par jour). Si les maux de tête persistent ou sont très intenses, \
             consultez un médecin.",
        ),
        ReplyRule::new(
            &["fièvre"],
            "Pour la fièvre, le paracétamol est recommandé. Hydratez-vous bien. Si la fièvre \
             dépasse 39°C ou persiste plus de 3 jours, consultez un médecin.",
        ),
        ReplyRule::new(
            &["grippe", "rhume"],
            "Pour un rhume ou une grippe : repos, hydratation, paracétamol pour la fièvre et les \
             douleurs. Les symptômes durent généralement 7-10 jours. Consultez si les symptômes \
             s'aggravent.",
        ),
        ReplyRule::new(
            &["interaction"],
            "Les interactions médicamenteuses peuvent être dangereuses. Je vous recommande de \
             consulter un pharmacien ou votre médecin pour vérifier les interactions entre vos \
             médicaments.",
        ),
        ReplyRule::new(
            &["ordonnance"],
            "Vous pouvez scanner votre ordonnance via l'onglet Scanner de l'application. Cela \
             vous permettra d'obtenir automatiquement la liste des médicaments et de les \
             commander.",
        ),
        ReplyRule::new(
            &["pharmacie"],
            "Vous pouvez trouver les pharmacies proches de vous via l'onglet Accueil de \
             l'application. Recherchez un médicament pour voir où il est disponible.",
        ),
        ReplyRule::new(
            &["urgence", "grave", "douleur intense"],
            "Si vous avez une urgence médicale, contactez immédiatement les services d'urgence \
             ou rendez-vous à l'hôpital le plus proche. N'attendez pas !",
        ),
    ]
}

/// Parse a custom rule table from JSON, validating each rule.
///
/// Triggers are lowercased on load; matching is case-insensitive on
/// the message side only.
pub fn rules_from_json(json: &str) -> RulesResult<Vec<ReplyRule>> {
    let mut rules: Vec<ReplyRule> = serde_json::from_str(json)?;

    for (index, rule) in rules.iter().enumerate() {
        if rule.triggers.is_empty() || rule.triggers.iter().all(|t| t.trim().is_empty()) {
            return Err(RulesError::EmptyTriggers(index));
        }
        if rule.response.trim().is_empty() {
            return Err(RulesError::EmptyResponse(index));
        }
    }

    for rule in &mut rules {
        for trigger in &mut rule.triggers {
            *trigger = trigger.to_lowercase();
        }
    }

    Ok(rules)
}
