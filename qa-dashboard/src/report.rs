//! Plain formatting of API results, shared by the TUI and one-shot mode.

use std::fmt::{self, Display};

use qa_client::types::{ClassificationResponse, GenerationResponse};

use crate::tui::dashboard::Mode;

/// Two decimals, like every number on the dashboard.
pub fn format_score(value: f64) -> String {
    format!("{value:.2}")
}

/// The result currently on display.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Generation(GenerationResponse),
    Classification(ClassificationResponse),
}

impl Outcome {
    pub fn mode(&self) -> Mode {
        match self {
            Outcome::Generation(_) => Mode::Generation,
            Outcome::Classification(_) => Mode::Classification,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Outcome::Generation(_) => "Response:",
            Outcome::Classification(_) => "Classification Result:",
        }
    }

    pub fn metrics(&self) -> Vec<Metric> {
        match self {
            Outcome::Generation(response) => vec![
                Metric::score("Accuracy", response.metrics.accuracy),
                Metric::score("Hallucination", response.metrics.hallucination),
                Metric::seconds("Latency", response.metrics.latency),
            ],
            Outcome::Classification(response) => vec![
                Metric::score("Confidence", response.confidence),
                Metric::seconds("Latency", response.latency),
            ],
        }
    }

    /// Category name and formatted probability, in server order.
    pub fn probability_rows(&self) -> Vec<(String, String)> {
        match self {
            Outcome::Generation(_) => vec![],
            Outcome::Classification(response) => response
                .probabilities
                .iter()
                .map(|(category, p)| (category.to_string(), format_score(p)))
                .collect(),
        }
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title())?;
        match self {
            Outcome::Generation(response) => writeln!(f, "{}", response.response.text)?,
            Outcome::Classification(response) => {
                writeln!(f, "Predicted Category: {}", response.category)?;
                for (category, probability) in self.probability_rows() {
                    writeln!(f, "  {category:<24} {probability:>6}")?;
                }
            }
        }

        writeln!(f)?;
        writeln!(f, "Metrics:")?;
        let metrics: Vec<String> = self.metrics().iter().map(ToString::to_string).collect();
        write!(f, "{}", metrics.join("  "))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metric {
    pub label: &'static str,
    pub value: f64,
    pub unit: &'static str,
}

impl Metric {
    fn score(label: &'static str, value: f64) -> Self {
        Metric {
            label,
            value,
            unit: "",
        }
    }

    fn seconds(label: &'static str, value: f64) -> Self {
        Metric {
            label,
            value,
            unit: "s",
        }
    }
}

impl Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}{}", self.label, format_score(self.value), self.unit)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use qa_client::types::{GeneratedText, GenerationMetrics};
    use rstest::rstest;

    use super::*;

    fn generated() -> Outcome {
        Outcome::Generation(GenerationResponse {
            response: GeneratedText {
                text: "Response to: hello".into(),
            },
            metrics: GenerationMetrics {
                accuracy: 0.8734,
                hallucination: 0.0412,
                latency: 0.0019,
            },
        })
    }

    fn classified() -> Outcome {
        Outcome::Classification(ClassificationResponse {
            category: "ham".into(),
            probabilities: [("spam", 0.12), ("ham", 0.88)].into_iter().collect(),
            confidence: 0.88,
            latency: 0.0,
        })
    }

    #[rstest]
    #[case(0.0, "0.00")]
    #[case(0.1249, "0.12")]
    #[case(0.876, "0.88")]
    #[case(1.0, "1.00")]
    fn scores_have_two_decimals(#[case] value: f64, #[case] expected: &str) {
        assert_eq!(format_score(value), expected);
    }

    #[test]
    fn generation_metrics() {
        let metrics: Vec<String> = generated().metrics().iter().map(ToString::to_string).collect();

        assert_eq!(
            metrics,
            vec!["Accuracy: 0.87", "Hallucination: 0.04", "Latency: 0.00s"]
        );
    }

    #[test]
    fn classification_metrics_default_latency() {
        let metrics: Vec<String> = classified().metrics().iter().map(ToString::to_string).collect();

        assert_eq!(metrics, vec!["Confidence: 0.88", "Latency: 0.00s"]);
    }

    #[test]
    fn probability_rows_in_server_order() {
        assert_eq!(
            classified().probability_rows(),
            vec![
                ("spam".to_string(), "0.12".to_string()),
                ("ham".to_string(), "0.88".to_string())
            ]
        );
    }

    #[test]
    fn plain_report() {
        let report = classified().to_string();

        assert!(report.starts_with("Classification Result:\nPredicted Category: ham\n"));
        assert!(report.ends_with("Confidence: 0.88  Latency: 0.00s"));
    }
}
