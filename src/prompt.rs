//! Payload for a downstream life-event classifier.
//!
//! The engine never calls a model. It only wraps a rendered report in
//! instructions, and turns whatever reply comes back into a [`Verdict`].

use serde::{Deserialize, Serialize};

pub const LIFE_EVENTS: &[&str] = &["newBaby", "jobChange", "wedding", "homePurchase"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    #[serde(rename = "eventName")]
    pub event_name: String,
    pub reasoning: String,
}

impl Verdict {
    /// Parse a model reply. Accepts bare JSON or a ```json fenced block;
    /// anything else becomes an `"error"` verdict rather than a failure.
    pub fn parse(reply: &str) -> Self {
        let body = extract_json(reply);
        serde_json::from_str(body).unwrap_or_else(|e| Self {
            event_name: "error".to_string(),
            reasoning: format!("Could not parse classifier reply: {e}"),
        })
    }
}

fn extract_json(reply: &str) -> &str {
    let trimmed = reply.trim();
    for fence in ["```json", "```"] {
        if let Some(rest) = trimmed.split_once(fence).map(|(_, r)| r) {
            if let Some((inner, _)) = rest.split_once("```") {
                return inner.trim();
            }
        }
    }
    trimmed
}

pub fn build_prompt(rendered_report: &str) -> String {
    let events: Vec<String> = LIFE_EVENTS.iter().map(|e| format!("\"{e}\"")).collect();
    let events = events.join(", ");
    format!(
        "You are provided with structured financial data that includes monthly aggregates, \
category/subcategory aggregates, recurring transaction details, recurring transaction \
month-to-month increases and decreases, large single transactions, and a summary. \
Analyze the data and determine which of the following life events is most likely \
represented by the changes in the data: {{{events}}}.

Respond with a single JSON object and nothing else, with these fields:
- eventName: a string that is exactly one of {{{events}}}
- reasoning: a short explanation, addressed to the account holder, citing the \
transactions and changes that support the conclusion

Example:
{{\"eventName\": \"jobChange\", \"reasoning\": \"Your regular salary deposit from one \
employer stopped and a deposit from a new employer appeared the following month.\"}}

Financial data:
{rendered_report}
"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_report_and_events() {
        let p = build_prompt("=== SUMMARY ===\nNo significant patterns found.");
        for e in LIFE_EVENTS {
            assert!(p.contains(e), "missing {e}");
        }
        assert!(p.contains("{\"newBaby\", \"jobChange\", \"wedding\", \"homePurchase\"}"));
        assert!(p.ends_with("No significant patterns found.\n"));
    }

    #[test]
    fn test_verdict_parses_bare_json() {
        let v = Verdict::parse(r#"{"eventName": "wedding", "reasoning": "Venue deposit."}"#);
        assert_eq!(v.event_name, "wedding");
        assert_eq!(v.reasoning, "Venue deposit.");
    }

    #[test]
    fn test_verdict_parses_fenced_json() {
        let reply = "Here you go:\n```json\n{\"eventName\": \"newBaby\", \"reasoning\": \"Diapers.\"}\n```\n";
        assert_eq!(Verdict::parse(reply).event_name, "newBaby");
    }

    #[test]
    fn test_verdict_garbage_becomes_error() {
        let v = Verdict::parse("I am not sure.");
        assert_eq!(v.event_name, "error");
        assert!(v.reasoning.starts_with("Could not parse classifier reply"));
    }

    #[test]
    fn test_verdict_serializes_with_camel_case_key() {
        let v = Verdict {
            event_name: "homePurchase".into(),
            reasoning: "Escrow.".into(),
        };
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, r#"{"eventName":"homePurchase","reasoning":"Escrow."}"#);
    }
}
