//! Prompt text and prompt assembly for the conditional pipeline.

/// Instructions appended to every validation prompt so the validator
/// answers with a machine-readable verdict.
pub const VALIDATION_RESPONSE_FORMAT: &str = r#"Please verify if the following data in the dialog meets the requirements described above.
Consider the entire conversation context.
You need to explicitly specify whether the data meet requirements.
If you consider that data doesn't meet requirements explicitly and in details specify why.
Respond strictly in JSON with the shape:
{"is_valid": bool, "message": string}
Return json as plain text without any formatting."#;

/// Generation-stage system prompt when no other is configured.
pub const DEFAULT_GENERATION_PROMPT: &str =
    "You are a friendly assistant. Provide detailed and helpful answers.";

/// Shown when the validator rejects a request without saying why.
pub const FALLBACK_VERDICT_MESSAGE: &str = "Validation failed without message.";

/// Validation rules for the deployed schema-generator assistant.
pub const SCHEMA_VALIDATION_PROMPT: &str = "\
You are validating requests for a JSON schema generator that automates the creation and \
modification of schemas for business logic and integration descriptions. Your task is to \
determine if the user's input contains sufficient information to proceed based on the \
documentation.

Check the following criteria:
1. Is the request clearly about creating or modifying a JSON schema for business logic or integration?
2. Does the request contain all required fields as specified in the documentation for the relevant schema type?
3. If the user mentions specific integration steps, verify these steps exist in the documented JSON schema structure.
4. Is there enough contextual information to generate a structurally valid JSON schema?

Important: Do not make assumptions about missing information. If any required fields are \
missing according to the documentation, identify them specifically. If the user references \
integration steps not documented in the JSON specification, flag this explicitly as an issue.";

/// Generation persona for the deployed schema-generator assistant.
pub const SCHEMA_GENERATION_PROMPT: &str = "\
You are a JSON Schema Generator Assistant specializing in business logic and integration \
descriptions. You create and modify JSON schemas based on user requests and documentation \
guidelines.

Core functions:
1. Generate complete, syntactically correct JSON schemas from business process descriptions
2. Modify existing schemas via natural language instructions
3. Request specific missing information when required fields are absent
4. Notify users when they reference integration steps not implemented in the schema

Follow these rules:
- Strictly adhere to the JSON structure defined in the documentation
- Always format JSON in code blocks with proper syntax, indentation, and nesting
- After any modification, display the entire updated schema
- When information is missing, ask targeted questions to obtain required fields
- If a user references an integration step not in the documentation, clearly state: \"This integration step is not implemented in the current JSON schema specification\"
- Validate all generated schemas for structural correctness
- Explain changes made to help users understand modifications

Your responses should be technically accurate while remaining helpful and user-friendly. \
Focus on producing correct JSON schemas that meet the documentation requirements.";

/// Header line placed above retrieved snippets in a compiled prompt.
pub const CONTEXT_HEADER: &str = "Relevant documentation excerpts, most relevant first:";

/// Full validation-stage instructions for a given validation prompt.
pub fn validation_instructions(validation_prompt: &str) -> String {
    format!("{validation_prompt} {VALIDATION_RESPONSE_FORMAT}")
}

/// Prefix stage instructions with retrieved context. Empty context
/// leaves the instructions untouched.
pub fn with_context(context: &str, instructions: &str) -> String {
    if context.is_empty() {
        return instructions.to_string();
    }
    format!("{CONTEXT_HEADER}\n\n{context}\n\n{instructions}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_instructions_join_with_single_space() {
        let compiled = validation_instructions("Check the request.");
        assert!(compiled.starts_with("Check the request. Please verify"));
        assert!(compiled.contains("{\"is_valid\": bool, \"message\": string}"));
    }

    #[test]
    fn context_precedes_instructions() {
        let compiled = with_context("snippet one\n\n---\n\nsnippet two", "Answer the user.");
        assert!(compiled.starts_with(CONTEXT_HEADER));

        let header_end = compiled.find("snippet one").unwrap();
        let instructions_start = compiled.find("Answer the user.").unwrap();
        assert!(header_end < instructions_start);
    }

    #[test]
    fn empty_context_is_skipped() {
        assert_eq!(with_context("", "Answer the user."), "Answer the user.");
    }
}
