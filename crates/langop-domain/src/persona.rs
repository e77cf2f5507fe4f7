use serde::{Deserialize, Serialize};

use crate::condition::{Condition, Phase};
use crate::metadata::ObjectMeta;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaSpec {
    pub display_name: String,
    pub description: String,
    pub system_prompt: String,
    pub tone: Option<String>,
    pub language: Option<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PersonaStatus {
    pub observed_generation: u64,
    #[serde(default)]
    pub phase: Phase,
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    pub metadata: ObjectMeta,
    pub spec: PersonaSpec,
    #[serde(default)]
    pub status: PersonaStatus,
}

impl Persona {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>, spec: PersonaSpec) -> Self {
        Self {
            metadata: ObjectMeta::new(namespace, name),
            spec,
            status: PersonaStatus::default(),
        }
    }
}
