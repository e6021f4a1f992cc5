//! Request and response bodies of the inference API.

use std::{fmt, sync::Arc};

use serde::{
    de::{MapAccess, Visitor},
    ser::SerializeMap as _,
    Deserialize, Deserializer, Serialize, Serializer,
};

/// Sampling temperature the dashboard sends with every generation request.
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Body of `POST /api/v1/llm/generate`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub prompt: Arc<str>,
    #[serde(default)]
    pub context: serde_json::Map<String, serde_json::Value>,
    pub temperature: f64,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<Arc<str>>) -> Self {
        GenerationRequest {
            prompt: prompt.into(),
            context: Default::default(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_temperature(self, temperature: f64) -> Self {
        GenerationRequest {
            temperature,
            ..self
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationResponse {
    pub response: GeneratedText,
    pub metrics: GenerationMetrics,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeneratedText {
    pub text: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationMetrics {
    pub accuracy: f64,
    pub hallucination: f64,
    /// Seconds.
    pub latency: f64,
}

/// Body of `POST /api/v1/classify`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClassificationRequest {
    pub text: Arc<str>,
    pub categories: Vec<String>,
}

impl ClassificationRequest {
    /// Build a request, dropping empty category names.
    pub fn new<I, S>(text: impl Into<Arc<str>>, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let categories = categories
            .into_iter()
            .filter(|category| !category.as_ref().is_empty())
            .map(|category| category.as_ref().to_string())
            .collect();

        ClassificationRequest {
            text: text.into(),
            categories,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResponse {
    pub category: String,
    pub probabilities: Probabilities,
    pub confidence: f64,
    /// Seconds. Older servers omit it or send `null`.
    #[serde(default, deserialize_with = "null_as_zero")]
    pub latency: f64,
}

fn null_as_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or_default())
}

/// Per-category probabilities in the order the server sent them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Probabilities(Vec<(String, f64)>);

impl Probabilities {
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(name, p)| (name.as_str(), *p))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, category: &str) -> Option<f64> {
        self.iter()
            .find_map(|(name, p)| (name == category).then_some(p))
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for Probabilities {
    fn from_iter<T: IntoIterator<Item = (S, f64)>>(iter: T) -> Self {
        Probabilities(iter.into_iter().map(|(name, p)| (name.into(), p)).collect())
    }
}

impl Serialize for Probabilities {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, p) in &self.0 {
            map.serialize_entry(name, p)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Probabilities {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ProbabilitiesVisitor;

        impl<'de> Visitor<'de> for ProbabilitiesVisitor {
            type Value = Probabilities;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of category names to probabilities")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some(entry) = access.next_entry::<String, f64>()? {
                    entries.push(entry);
                }
                Ok(Probabilities(entries))
            }
        }

        deserializer.deserialize_map(ProbabilitiesVisitor)
    }
}

/// Body of `GET /api/v1/health`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<chrono::NaiveDateTime>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}
