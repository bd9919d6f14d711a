//! Grounded-answer prompt

/// Sentence the model must use when the retrieved context cannot answer
pub const FALLBACK_ANSWER: &str =
    "I'm sorry, my current medical database doesn't have specific information on that.";

/// Fill the fixed Respi-Guard prompt. Inputs are inserted verbatim.
pub fn build_prompt(context: &str, user_profile: &str, aqi_data: &str, question: &str) -> String {
    format!(
        r#"
You are Respi-Guard, a medical AI specialized in respiratory health.
Your goal is to provide specific, evidence-based advice grounded ONLY in the provided context.

CONTEXT FROM MEDICAL GUIDELINES:
{context}

USER HEALTH PROFILE:
{user_profile}

LIVE AIR QUALITY DATA:
{aqi_data}

USER QUESTION:
{question}

INSTRUCTIONS:
1. If the context contains specific limits (like WHO targets) or treatments (like GINA steps), use them.
2. ALWAYS mention which source you are using (e.g., "Based on the GINA 2023 guidelines...").
3. If you don't know the answer based on the context, say: "{FALLBACK_ANSWER}"
4. Be empathetic but professional.

RESPONSE:
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_carries_all_inputs() {
        let prompt = build_prompt(
            "CONTENT: \"Avoid smoking\"\nSOURCE: Unknown Source\n---",
            "Asthmatic, age 34",
            "Unknown",
            "Can I jog today?",
        );

        assert!(prompt.contains("grounded ONLY in the provided context"));
        assert!(prompt.contains("CONTEXT FROM MEDICAL GUIDELINES:\nCONTENT: \"Avoid smoking\""));
        assert!(prompt.contains("USER HEALTH PROFILE:\nAsthmatic, age 34"));
        assert!(prompt.contains("LIVE AIR QUALITY DATA:\nUnknown"));
        assert!(prompt.contains("USER QUESTION:\nCan I jog today?"));
        assert!(prompt.contains(&format!("say: \"{}\"", FALLBACK_ANSWER)));
        assert!(prompt.contains("empathetic but professional"));
    }

    #[test]
    fn test_braces_in_inputs_are_kept() {
        let prompt = build_prompt(r#"CONTENT: {"pollutant":"PM2.5"}"#, "{user_profile}", "{}", "q");
        assert!(prompt.contains(r#"CONTENT: {"pollutant":"PM2.5"}"#));
        assert!(prompt.contains("USER HEALTH PROFILE:\n{user_profile}"));
        assert!(prompt.contains("LIVE AIR QUALITY DATA:\n{}"));
    }
}
