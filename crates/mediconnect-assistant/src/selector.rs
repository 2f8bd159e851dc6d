//! First-match reply selection.

use crate::rules::{default_rules, ReplyRule, FALLBACK_RESPONSE};

/// Selects one canned response per message.
///
/// Rules are evaluated top-to-bottom; the first rule whose trigger set
/// contains any substring of the lowercased message wins. Unmatched
/// messages (including the empty message) get the fallback.
pub struct ReplySelector {
    rules: Vec<ReplyRule>,
    fallback: String,
}

impl Default for ReplySelector {
    fn default() -> Self {
        Self::new()
    }
}

impl ReplySelector {
    /// Create a selector with the default MediConnect rule table.
    pub fn new() -> Self {
        Self {
            rules: default_rules(),
            fallback: FALLBACK_RESPONSE.to_string(),
        }
    }

    /// Create a selector over a custom, already-validated rule table.
    pub fn with_rules(rules: Vec<ReplyRule>, fallback: String) -> Self {
        Self { rules, fallback }
    }

    /// Select the reply for a free-text message. Never fails.
    pub fn select(&self, message: &str) -> &str {
        let lower = message.to_lowercase();

        for rule in &self.rules {
            if rule.triggers.iter().any(|t| lower.contains(t.as_str())) {
                return &rule.response;
            }
        }

        &self.fallback
    }

    /// The configured rule table, in evaluation order.
    pub fn rules(&self) -> &[ReplyRule] {
        &self.rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greeting_triggers() {
        let selector = ReplySelector::new();

        for msg in ["bonjour", "Salut !", "HELLO there"] {
            assert!(selector.select(msg).starts_with("Bonjour !"), "msg: {msg}");
        }
    }

    #[test]
    fn test_case_insensitive() {
        let selector = ReplySelector::new();
        assert_eq!(selector.select("FIÈVRE"), selector.select("fièvre"));
    }

    #[test]
    fn test_first_match_wins_over_later_rules() {
        let selector = ReplySelector::new();

        // Contains both a greeting token and a headache token; greeting
        // is ordered first in the table.
        let reply = selector.select("bonjour, j'ai une migraine terrible");
        assert!(reply.starts_with("Bonjour !"));
    }

    #[test]
    fn test_symptom_rules() {
        let selector = ReplySelector::new();

        assert!(selector.select("j'ai de la fièvre").contains("paracétamol"));
        assert!(selector.select("c'est la grippe").contains("repos"));
        assert!(selector.select("un gros rhume").contains("repos"));
        assert!(selector
            .select("interaction entre médicaments ?")
            .contains("pharmacien"));
    }

    #[test]
    fn test_guidance_rules() {
        let selector = ReplySelector::new();

        assert!(selector.select("où envoyer mon ordonnance ?").contains("Scanner"));
        assert!(selector.select("pharmacie ouverte ?").contains("Accueil"));
    }

    #[test]
    fn test_emergency_rule() {
        let selector = ReplySelector::new();

        assert!(selector.select("c'est une urgence").contains("services d'urgence"));
        assert!(selector.select("douleur intense au ventre").contains("services d'urgence"));
    }

    #[test]
    fn test_empty_message_returns_fallback() {
        let selector = ReplySelector::new();
        assert_eq!(selector.select(""), FALLBACK_RESPONSE);
    }

    #[test]
    fn test_unmatched_message_returns_fallback() {
        let selector = ReplySelector::new();
        assert_eq!(selector.select("quel temps fait-il ?"), FALLBACK_RESPONSE);
    }

    #[test]
    fn test_json_loaded_mixed_case_trigger_matches() {
        let json = r#"[{"triggers": ["Bonjour"], "response": "salut!"}]"#;
        let selector = ReplySelector::with_rules(
            crate::rules::rules_from_json(json).unwrap(),
            FALLBACK_RESPONSE.to_string(),
        );

        assert_eq!(selector.select("bonjour docteur"), "salut!");
        assert_eq!(selector.select("BONJOUR"), "salut!");
    }

    #[test]
    fn test_custom_rules() {
        let selector = ReplySelector::with_rules(
            vec![ReplyRule::new(&["ping"], "pong")],
            "default".to_string(),
        );

        assert_eq!(selector.select("ping?"), "pong");
        assert_eq!(selector.select("bonjour"), "default");
    }
}
