//! Persona definitions used to decorate agents
//!
//! A persona is a short role description prepended to every prompt an agent
//! receives, so that otherwise identical models argue from different angles.

use serde::{Deserialize, Serialize};

/// A role an agent is asked to play
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    pub name: String,
    pub role: String,
    pub characteristics: Vec<String>,
}

impl Persona {
    /// Resolve a persona by preset key (case-insensitive), falling back to a
    /// custom persona named after the identifier.
    ///
    /// ```
    /// use consensus_domain::Persona;
    ///
    /// assert_eq!(Persona::resolve("Critical").name, "Critical Thinker");
    /// assert_eq!(Persona::resolve("Pirate").role, "Pirate");
    /// ```
    pub fn resolve(identifier: &str) -> Self {
        Self::preset(identifier).unwrap_or_else(|| Self::custom(identifier))
    }

    /// Look up one of the built-in personas.
    pub fn preset(key: &str) -> Option<Self> {
        let (name, role, characteristics): (&str, &str, [&str; 3]) =
            match key.to_lowercase().as_str() {
                "critical" => (
                    "Critical Thinker",
                    "critic and skeptic",
                    [
                        "Identify logical fallacies and gaps in reasoning",
                        "Question assumptions and evidence",
                        "Look for potential risks and downsides",
                    ],
                ),
                "creative" => (
                    "Creative Thinker",
                    "innovator and idea generator",
                    [
                        "Propose novel and out-of-the-box solutions",
                        "Connect seemingly unrelated concepts",
                        "Focus on possibilities rather than constraints",
                    ],
                ),
                "pragmatic" => (
                    "Pragmatist",
                    "practical implementer",
                    [
                        "Focus on feasibility and real-world application",
                        "Prioritize efficient and actionable solutions",
                        "Consider resource constraints and implementation details",
                    ],
                ),
                "optimistic" => (
                    "Optimist",
                    "positive visionary",
                    [
                        "Highlight benefits and opportunities",
                        "Focus on positive outcomes and potential",
                        "Encourage constructive progress",
                    ],
                ),
                "analytical" => (
                    "Analyst",
                    "data-driven analyzer",
                    [
                        "Rely on facts, data, and logical deduction",
                        "Break down complex problems into components",
                        "Maintain objectivity and neutrality",
                    ],
                ),
                "empathetic" => (
                    "Empathetic Thinker",
                    "user advocate",
                    [
                        "Prioritize user experience and emotional impact",
                        "Consider ethical implications and human factors",
                        "Ensure inclusivity and accessibility",
                    ],
                ),
                _ => return None,
            };

        Some(Self {
            name: name.to_string(),
            role: role.to_string(),
            characteristics: characteristics.iter().map(|c| c.to_string()).collect(),
        })
    }

    fn custom(identifier: &str) -> Self {
        Self {
            name: identifier.to_string(),
            role: identifier.to_string(),
            characteristics: vec![
                "Act according to your specific character/persona".to_string(),
                "Provide unique insights based on your identity".to_string(),
            ],
        }
    }

    /// Instruction block placed in front of every prompt.
    pub fn system_prompt(&self) -> String {
        let guidelines = self
            .characteristics
            .iter()
            .map(|c| format!("- {}", c))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"IMPORTANT INSTRUCTION: You are acting as a specific persona in a multi-agent discussion.

Identity: {}
Role: {}

Guidelines for your response:
{}

Please stay in character throughout your response. Do not mention that you are an AI unless specifically asked about your nature, but assume the persona's perspective."#,
            self.name, self.role, guidelines
        )
    }

    /// Decorate an outgoing prompt with the persona instructions.
    pub fn apply(&self, prompt: &str) -> String {
        format!("{}\n\n{}", self.system_prompt(), prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_presets_resolve() {
        for key in [
            "critical",
            "creative",
            "pragmatic",
            "optimistic",
            "analytical",
            "empathetic",
        ] {
            let persona = Persona::preset(key).unwrap();
            assert_eq!(persona.characteristics.len(), 3);
        }
    }

    #[test]
    fn test_preset_lookup_is_case_insensitive() {
        assert_eq!(Persona::resolve("ANALYTICAL").name, "Analyst");
    }

    #[test]
    fn test_custom_persona() {
        let persona = Persona::resolve("Security Auditor");
        assert_eq!(persona.name, "Security Auditor");
        assert_eq!(persona.role, "Security Auditor");
        assert_eq!(persona.characteristics.len(), 2);
    }

    #[test]
    fn test_apply_prepends_instructions() {
        let persona = Persona::resolve("pragmatic");
        let prompt = persona.apply("How do I ship faster?");
        assert!(prompt.starts_with("IMPORTANT INSTRUCTION"));
        assert!(prompt.contains("Identity: Pragmatist"));
        assert!(prompt.contains("- Focus on feasibility and real-world application"));
        assert!(prompt.ends_with("\n\nHow do I ship faster?"));
    }
}
