//! Prompt templates for the consensus flow

/// Placeholder that stands in for a chunk whose consensus run failed
pub const CHUNK_FAILURE_PLACEHOLDER: &str = "[Processing Error]";

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// Instruction asking an agent to score another agent's response.
    ///
    /// Always built from the original user prompt, never from a refined one,
    /// so critiques measure fidelity to the user's request.
    pub fn evaluation_prompt(original_prompt: &str, target_content: &str) -> String {
        format!(
            r#"You are an expert evaluator. Evaluate the following response to the given prompt.
Judge it on four criteria: Accuracy, Relevance, Completeness and Clarity.
Score each criterion with an integer from 1 to 10.

Original Prompt:
"{}"

Response to Evaluate:
"{}"

Output must be a valid JSON object with exactly this structure:
{{
  "scores": {{
    "accuracy": number,
    "relevance": number,
    "completeness": number,
    "clarity": number
  }},
  "feedback": "string (constructive feedback explaining the scores)"
}}

Do not include any text outside the JSON object."#,
            original_prompt, target_content
        )
    }

    /// Next-iteration prompt: the original request plus the winner's critique.
    pub fn refinement_prompt(original_prompt: &str, feedback: &str) -> String {
        format!(
            "{}\n\nPrevious attempt feedback: {}\nPlease improve the answer based on this feedback.",
            original_prompt, feedback
        )
    }

    /// Prompt for a document small enough to process in one pass.
    pub fn direct_document_prompt(task: &str, document: &str) -> String {
        format!("{}\n\nDocument:\n{}", task, document)
    }

    /// Map-phase prompt for one chunk (`index` is 0-based).
    pub fn chunk_prompt(task: &str, index: usize, total: usize, content: &str) -> String {
        format!(
            r#"You are processing a part of a larger document.
Task: {}

Content Part {}/{}:
{}

Provide the result for this part only."#,
            task,
            index + 1,
            total,
            content
        )
    }

    /// Reduce-phase prompt combining every partial result in order.
    pub fn reduce_prompt(task: &str, partial_results: &[String]) -> String {
        let parts = partial_results
            .iter()
            .enumerate()
            .map(|(i, result)| format!("--- Part {} ---\n{}", i + 1, result))
            .collect::<Vec<_>>()
            .join("\n\n");

        format!(
            r#"Here are the results from processing parts of a document.
Please combine them into a coherent final output according to the original task.

Task: {}

Partial Results:
{}

Final Output:"#,
            task, parts
        )
    }
}
