use std::collections::BTreeMap;

/// Name a child object from its parent's name and a fixed kind suffix
/// (`"deployment"`, `"svc"`, `"config"`, `"route"`). Deterministic so the
/// same parent always produces the same child name across reconciles.
pub fn config_name(parent_name: &str, kind_suffix: &str) -> String {
    format!("{parent_name}-{kind_suffix}")
}

/// Selector/owner labels stamped on a child object and matched by its
/// sibling Service. `owner_kind` distinguishes Tool-owned from Agent-owned
/// children so two same-named resources of different kinds never collide.
pub fn selector_labels(owner_kind: &str, parent_name: &str) -> BTreeMap<String, String> {
    let mut labels = BTreeMap::new();
    labels.insert("langop.io/owner-kind".to_string(), owner_kind.to_string());
    labels.insert("langop.io/owner-name".to_string(), parent_name.to_string());
    labels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_name_appends_suffix() {
        assert_eq!(config_name("search", "deployment"), "search-deployment");
    }

    #[test]
    fn selector_labels_are_deterministic() {
        let a = selector_labels("Tool", "search");
        let b = selector_labels("Tool", "search");
        assert_eq!(a, b);
    }
}
