use crate::mock_data::{self, SuggestionContext};
use crate::types::{MetricsSnapshot, Reply};

/// Keyword-driven canned responder.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplyPolicy {
    /// (keyword, response), matched in order against the lowercased input.
    pub table: Vec<(String, String)>,
    /// Response used when nothing matches; `{input}` is replaced with the input.
    pub default_template: String,
    pub metric_triggers: Vec<String>,
    pub suggestions: Vec<String>,
    pub metrics: MetricsSnapshot,
    pub greeting: String,
}

impl Default for ReplyPolicy {
    fn default() -> Self {
        Self {
            table: mock_data::REPLY_TABLE
                .iter()
                .map(|(keyword, response)| (keyword.to_string(), response.to_string()))
                .collect(),
            default_template: mock_data::DEFAULT_REPLY.to_string(),
            metric_triggers: mock_data::METRIC_TRIGGERS.iter().map(|t| t.to_string()).collect(),
            suggestions: mock_data::suggestions(SuggestionContext::Morning),
            metrics: mock_data::health_metrics(),
            greeting: mock_data::GREETING.to_string(),
        }
    }
}

impl ReplyPolicy {
    /// Response text for the first keyword contained in `input`.
    pub fn matched_response(&self, input: &str) -> Option<&str> {
        let lowered = input.to_lowercase();
        self.table
            .iter()
            .find(|(keyword, _)| lowered.contains(keyword.as_str()))
            .map(|(_, response)| response.as_str())
    }

    pub fn wants_metrics(&self, input: &str) -> bool {
        let lowered = input.to_lowercase();
        self.metric_triggers
            .iter()
            .any(|trigger| lowered.contains(trigger.as_str()))
    }

    pub fn respond(&self, input: &str) -> Reply {
        let text = match self.matched_response(input) {
            Some(response) => response.to_string(),
            None => self.default_template.replace("{input}", input),
        };

        Reply {
            text,
            suggestions: self.suggestions.clone(),
            metrics: self.wants_metrics(input).then(|| self.metrics.clone()),
        }
    }

    pub fn greeting(&self) -> Reply {
        Reply {
            text: self.greeting.clone(),
            suggestions: self.suggestions.clone(),
            metrics: Some(self.metrics.clone()),
        }
    }
}
