use langop_domain::{ChildMeta, ConfigObjectManifest, Kind, OwnerRef, Persona};

use crate::naming::{config_name, selector_labels};

/// Render a Persona into the flat ConfigObject its Agents mount for system
/// prompt, tone, and instruction text. Has no workload of its own.
pub fn persona_config(persona: &Persona) -> ConfigObjectManifest {
    let mut data = std::collections::BTreeMap::new();
    data.insert(
        "persona.json".to_string(),
        serde_json::to_string(&persona.spec).expect("PersonaSpec always serializes"),
    );
    data.insert("displayName".to_string(), persona.spec.display_name.clone());
    data.insert("description".to_string(), persona.spec.description.clone());
    data.insert("systemPrompt".to_string(), persona.spec.system_prompt.clone());
    if let Some(tone) = &persona.spec.tone {
        data.insert("tone".to_string(), tone.clone());
    }
    if let Some(language) = &persona.spec.language {
        data.insert("language".to_string(), language.clone());
    }
    if !persona.spec.instructions.is_empty() {
        data.insert(
            "instructions.json".to_string(),
            serde_json::to_string(&persona.spec.instructions).expect("Vec<String> always serializes"),
        );
    }

    ConfigObjectManifest {
        metadata: ChildMeta {
            name: config_name(&persona.metadata.name, "config"),
            namespace: persona.metadata.namespace.clone(),
            labels: selector_labels("Persona", &persona.metadata.name),
            owner_references: vec![OwnerRef::new(Kind::Persona, &persona.metadata.key())],
        },
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use langop_domain::PersonaSpec;

    fn persona() -> Persona {
        Persona::new(
            "default",
            "friendly",
            PersonaSpec {
                display_name: "Friendly".to_string(),
                description: "A warm assistant".to_string(),
                system_prompt: "Be warm and concise.".to_string(),
                tone: Some("warm".to_string()),
                language: None,
                instructions: vec!["Greet the user".to_string(), "Ask one question at a time".to_string()],
            },
        )
    }

    #[test]
    fn config_name_derives_from_persona_name() {
        let config = persona_config(&persona());
        assert_eq!(config.metadata.name, "friendly-config");
    }

    #[test]
    fn optional_fields_only_present_when_set() {
        let config = persona_config(&persona());
        assert_eq!(config.data.get("tone"), Some(&"warm".to_string()));
        assert!(!config.data.contains_key("language"));
    }

    #[test]
    fn instructions_render_as_a_json_array() {
        let config = persona_config(&persona());
        assert_eq!(
            config.data.get("instructions.json"),
            Some(&serde_json::to_string(&vec!["Greet the user", "Ask one question at a time"]).unwrap())
        );
    }

    #[test]
    fn persona_json_carries_the_full_spec() {
        let p = persona();
        let config = persona_config(&p);
        let rendered: PersonaSpec = serde_json::from_str(config.data.get("persona.json").unwrap()).unwrap();
        assert_eq!(rendered, p.spec);
    }
}
