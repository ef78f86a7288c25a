//! Prompt builder: fixed introduction, ranked handbook passages packed under a
//! token budget, trailing question.

use corpus_store::RankedCandidate;
use tracing::debug;

use crate::error::ContextorError;
use crate::tokenizer::count_tokens;

/// System instruction sent alongside every prompt.
pub const DEFAULT_SYSTEM: &str =
    "You answer questions using california dmv handbook and list all rules to drive safely.";

/// Opening sentence of every user prompt.
pub const DEFAULT_INTRODUCTION: &str = "Use the below article on the California Driver’s Handbook & Aid to answer the subsequent question. If the answer cannot be found, write I dont know.";

/// Label printed above each quoted passage.
pub const DEFAULT_SECTION_LABEL: &str = "Handbook article section";

/// Label in front of the trailing question.
pub const DEFAULT_QUESTION_LABEL: &str = "Question";

/// The fixed texts a prompt is built from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PromptTemplate {
    pub introduction: String,
    pub section_label: String,
    pub question_label: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            introduction: DEFAULT_INTRODUCTION.to_string(),
            section_label: DEFAULT_SECTION_LABEL.to_string(),
            question_label: DEFAULT_QUESTION_LABEL.to_string(),
        }
    }
}

impl PromptTemplate {
    /// A passage quoted between triple quotes under the section label.
    pub fn passage_block(&self, text: &str) -> String {
        format!("\n\n{}:\n\"\"\"\n{}\n\"\"\"", self.section_label, text)
    }

    pub fn question_line(&self, query: &str) -> String {
        format!("\n\n{}: {}", self.question_label, query)
    }
}

/// A finished prompt plus what went into it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssembledPrompt {
    pub text: String,
    /// How many leading ranked passages were included.
    pub passages_used: usize,
    /// Token count of `text` under the model's encoding.
    pub token_count: usize,
}

/// Greedily packs the most related passages that fit into `token_budget`.
///
/// Passages are appended in ranked order while `introduction + passages +
/// question` stays within budget. The first passage that would overflow ends
/// packing; later (less related) passages are not considered even if shorter.
/// When introduction and question alone exceed the budget the minimal prompt
/// is still returned with no passages.
///
/// # Errors
/// [`ContextorError::UnsupportedModel`] if `model_id` has no known encoding.
pub fn assemble_prompt(
    template: &PromptTemplate,
    query: &str,
    ranked: &[RankedCandidate],
    model_id: &str,
    token_budget: usize,
) -> Result<AssembledPrompt, ContextorError> {
    let question = template.question_line(query);
    let mut message = template.introduction.clone();
    let mut passages_used = 0;
    let mut last_fit = None;

    for passage in ranked {
        let block = template.passage_block(&passage.text);
        let candidate = format!("{message}{block}{question}");
        let tokens = count_tokens(&candidate, model_id)?;
        if tokens > token_budget {
            debug!(
                included = passages_used,
                rejected_tokens = tokens,
                token_budget,
                "token budget reached"
            );
            break;
        }
        message.push_str(&block);
        passages_used += 1;
        last_fit = Some(tokens);
    }

    message.push_str(&question);
    let token_count = match last_fit {
        Some(t) => t,
        None => count_tokens(&message, model_id)?,
    };

    Ok(AssembledPrompt {
        text: message,
        passages_used,
        token_count,
    })
}

/// Builds the prompt text with the default handbook template.
///
/// # Errors
/// See [`assemble_prompt`].
///
/// # Example
/// ```
/// use contextor::prompt::build_prompt;
/// let prompt = build_prompt("How do I choose a lane?", &[], "gpt-3.5-turbo", 3596).unwrap();
/// assert!(prompt.ends_with("\n\nQuestion: How do I choose a lane?"));
/// ```
pub fn build_prompt(
    query: &str,
    ranked: &[RankedCandidate],
    model_id: &str,
    token_budget: usize,
) -> Result<String, ContextorError> {
    assemble_prompt(&PromptTemplate::default(), query, ranked, model_id, token_budget)
        .map(|p| p.text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODEL: &str = "gpt-3.5-turbo";
    const QUERY: &str = "How do I choose a lane?";

    fn cand(text: &str, score: f32) -> RankedCandidate {
        RankedCandidate {
            text: text.to_string(),
            score,
        }
    }

    fn minimal() -> String {
        format!("{DEFAULT_INTRODUCTION}\n\nQuestion: {QUERY}")
    }

    fn ranked() -> Vec<RankedCandidate> {
        vec![
            cand("Use the left lane to pass or turn left.", 0.91),
            cand("Use the right lane to enter or exit traffic.", 0.87),
            cand("Stay in the middle lane for smoother traffic flow.", 0.80),
        ]
    }

    #[test]
    fn empty_ranking_yields_introduction_and_question() {
        let p = build_prompt(QUERY, &[], MODEL, 3596).unwrap();
        assert_eq!(p, minimal());
    }

    #[test]
    fn generous_budget_includes_all_in_rank_order() {
        let p = assemble_prompt(&PromptTemplate::default(), QUERY, &ranked(), MODEL, 3596).unwrap();
        assert_eq!(p.passages_used, 3);
        let left = p.text.find("left lane").unwrap();
        let right = p.text.find("right lane").unwrap();
        let middle = p.text.find("middle lane").unwrap();
        assert!(left < right && right < middle);
        assert!(p.text.contains("\n\nHandbook article section:\n\"\"\"\nUse the left lane"));
        assert_eq!(p.token_count, count_tokens(&p.text, MODEL).unwrap());
    }

    #[test]
    fn budget_below_minimal_prompt_returns_minimal_prompt() {
        let p = assemble_prompt(&PromptTemplate::default(), QUERY, &ranked(), MODEL, 5).unwrap();
        assert_eq!(p.text, minimal());
        assert_eq!(p.passages_used, 0);
        assert!(p.token_count > 5);
    }

    #[test]
    fn budget_is_respected_at_exact_boundary() {
        let t = PromptTemplate::default();
        let one = format!(
            "{DEFAULT_INTRODUCTION}{}{}",
            t.passage_block(&ranked()[0].text),
            t.question_line(QUERY)
        );
        let budget = count_tokens(&one, MODEL).unwrap();

        let p = assemble_prompt(&t, QUERY, &ranked(), MODEL, budget).unwrap();
        assert_eq!(p.passages_used, 1);
        assert_eq!(p.text, one);
        assert!(count_tokens(&p.text, MODEL).unwrap() <= budget);

        let p = assemble_prompt(&t, QUERY, &ranked(), MODEL, budget - 1).unwrap();
        assert_eq!(p.passages_used, 0);
    }

    #[test]
    fn stops_at_first_overflow_even_if_later_passage_fits() {
        let t = PromptTemplate::default();
        let long = "Never drive while impaired. ".repeat(200);
        let list = vec![
            cand("Yield to pedestrians.", 0.9),
            cand(&long, 0.8),
            cand("Stop.", 0.7),
        ];
        let with_short = format!(
            "{DEFAULT_INTRODUCTION}{}{}{}",
            t.passage_block("Yield to pedestrians."),
            t.passage_block("Stop."),
            t.question_line(QUERY)
        );
        let budget = count_tokens(&with_short, MODEL).unwrap() + 5;

        let p = assemble_prompt(&t, QUERY, &list, MODEL, budget).unwrap();
        assert_eq!(p.passages_used, 1);
        assert!(!p.text.contains("Stop."));
    }

    #[test]
    fn output_never_exceeds_budget_when_minimal_fits() {
        let min_tokens = count_tokens(&minimal(), MODEL).unwrap();
        for budget in [min_tokens, min_tokens + 10, min_tokens + 25, min_tokens + 40, 3596] {
            let p = build_prompt(QUERY, &ranked(), MODEL, budget).unwrap();
            assert!(count_tokens(&p, MODEL).unwrap() <= budget, "budget {budget}");
        }
    }

    #[test]
    fn idempotent() {
        let a = build_prompt(QUERY, &ranked(), MODEL, 60).unwrap();
        let b = build_prompt(QUERY, &ranked(), MODEL, 60).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn custom_template_labels_are_used() {
        let t = PromptTemplate {
            introduction: "Answer from the handbook.".into(),
            section_label: "Passage".into(),
            question_label: "Q".into(),
        };
        let p = assemble_prompt(&t, QUERY, &ranked()[..1], MODEL, 3596).unwrap();
        assert_eq!(
            p.text,
            format!(
                "Answer from the handbook.\n\nPassage:\n\"\"\"\n{}\n\"\"\"\n\nQ: {QUERY}",
                ranked()[0].text
            )
        );
    }

    #[test]
    fn unsupported_model_propagates() {
        let err = build_prompt(QUERY, &[], "no-such-model", 100).unwrap_err();
        assert!(matches!(err, ContextorError::UnsupportedModel(_)));
    }
}
