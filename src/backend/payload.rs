//! Generation request payload
//!
//! Each agent type declares its exact field set. Fields that do not apply to
//! an agent are not part of its variant, so they never reach the wire.

use serde::Serialize;

use crate::conversation::IdSource;
use crate::selection::{Feature, Task};

/// Scenario-refinement passes requested from the test case generator
pub const TEST_GENERATOR_ITERATIONS: u32 = 2;

/// Script language used when the Selenium generator has no task selected
pub const DEFAULT_LANGUAGE: &str = "python";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "agentType")]
pub enum GenerateRequest {
    #[serde(rename = "test_generator")]
    TestGenerator {
        requirement: String,
        #[serde(rename = "featureName")]
        feature_name: String,
        iterations: u32,
    },
    #[serde(rename = "selenium_generator")]
    SeleniumGenerator {
        requirement: String,
        #[serde(rename = "testName")]
        test_name: String,
        language: String,
    },
}

impl GenerateRequest {
    /// Build the payload for the selected feature. `requirement` is sent verbatim.
    pub fn build(
        feature: Feature,
        task: Option<&Task>,
        requirement: &str,
        ids: &IdSource,
    ) -> Self {
        match feature {
            Feature::TestCaseGenerator => GenerateRequest::TestGenerator {
                requirement: requirement.to_string(),
                feature_name: ids.token("feature"),
                iterations: TEST_GENERATOR_ITERATIONS,
            },
            Feature::SeleniumScriptGenerator => GenerateRequest::SeleniumGenerator {
                requirement: requirement.to_string(),
                test_name: ids.token("test"),
                language: task
                    .map(|t| t.as_str().to_string())
                    .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            },
        }
    }

    pub fn agent_type(&self) -> &'static str {
        match self {
            GenerateRequest::TestGenerator { .. } => Feature::TestCaseGenerator.agent_type(),
            GenerateRequest::SeleniumGenerator { .. } => {
                Feature::SeleniumScriptGenerator.agent_type()
            }
        }
    }

    pub fn requirement(&self) -> &str {
        match self {
            GenerateRequest::TestGenerator { requirement, .. }
            | GenerateRequest::SeleniumGenerator { requirement, .. } => requirement,
        }
    }

    /// The same fields as text parts for the multipart route
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("requirement", self.requirement().to_string()),
            ("agentType", self.agent_type().to_string()),
        ];

        match self {
            GenerateRequest::TestGenerator {
                feature_name,
                iterations,
                ..
            } => {
                fields.push(("featureName", feature_name.clone()));
                fields.push(("iterations", iterations.to_string()));
            }
            GenerateRequest::SeleniumGenerator {
                test_name,
                language,
                ..
            } => {
                fields.push(("testName", test_name.clone()));
                fields.push(("language", language.clone()));
            }
        }

        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_test_generator_fields() {
        let ids = IdSource::new();
        let request = GenerateRequest::build(
            Feature::TestCaseGenerator,
            None,
            "login should work",
            &ids,
        );
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["agentType"], "test_generator");
        assert_eq!(value["requirement"], "login should work");
        assert_eq!(value["iterations"], 2);
        assert!(value["featureName"].as_str().unwrap().starts_with("feature_"));
        assert!(value.get("testName").is_none());
        assert!(value.get("language").is_none());
    }

    #[test]
    fn test_selenium_defaults_to_python() {
        let ids = IdSource::new();
        let request =
            GenerateRequest::build(Feature::SeleniumScriptGenerator, None, "click button", &ids);
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["agentType"], "selenium_generator");
        assert_eq!(value["language"], "python");
        assert!(value["testName"].as_str().unwrap().starts_with("test_"));
        assert!(value.get("featureName").is_none());
        assert!(value.get("iterations").is_none());
    }

    #[test]
    fn test_selenium_uses_selected_language() {
        let ids = IdSource::new();
        let task = Task::language("java");
        let request = GenerateRequest::build(
            Feature::SeleniumScriptGenerator,
            Some(&task),
            "click button",
            &ids,
        );

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["language"], "java");
    }

    #[test]
    fn test_no_null_fields() {
        let ids = IdSource::new();
        let request = GenerateRequest::build(Feature::TestCaseGenerator, None, "", &ids);
        let value = serde_json::to_value(&request).unwrap();

        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 4);
        assert!(object.values().all(|v| !v.is_null()));
        assert_eq!(object["requirement"], Value::String(String::new()));
    }

    #[test]
    fn test_form_fields_match_json_fields() {
        let ids = IdSource::new();
        let request =
            GenerateRequest::build(Feature::SeleniumScriptGenerator, None, "open page", &ids);

        let fields = request.form_fields();
        let names: Vec<_> = fields.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, ["requirement", "agentType", "testName", "language"]);
        assert_eq!(fields[3].1, "python");
    }
}
