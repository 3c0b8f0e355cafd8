//! Static tag tables for catalog events.

/// conf42 topic keywords and their tags. The first keyword contained in the
/// topic wins, so longer keywords come before their substrings.
const CONF42_TOPIC_TAGS: &[(&str, &[&str])] = &[
    ("sitereliability", &["sre", "devops"]),
    ("sre", &["sre", "devops"]),
    ("devsecops", &["security", "devops"]),
    ("devops", &["devops", "cloud"]),
    ("platform", &["platform-engineering", "devops"]),
    ("kubenative", &["kubernetes", "cloud"]),
    ("kube", &["kubernetes", "cloud"]),
    ("cloud", &["cloud"]),
    ("chaos", &["chaos-engineering", "sre"]),
    ("observability", &["observability", "sre"]),
    ("incident", &["incident-management", "sre"]),
    ("golang", &["go", "programming"]),
    ("python", &["python", "programming"]),
    ("rustlang", &["rust", "programming"]),
    ("javascript", &["javascript", "programming"]),
    ("js", &["javascript", "programming"]),
    ("java", &["java", "programming"]),
    ("machinelearning", &["ai", "machine-learning"]),
    ("llms", &["ai", "llm"]),
    ("ml", &["ai", "machine-learning"]),
    ("ai", &["ai"]),
    ("prompt", &["ai", "llm"]),
    ("security", &["security"]),
    ("iot", &["iot"]),
    ("quantum", &["quantum"]),
    ("database", &["databases"]),
    ("api", &["api"]),
];

const CONF42_FALLBACK_TAG: &str = "tech";

/// Tags of family catalogs, keyed by source prefix.
const FAMILY_SOURCE_TAGS: &[(&str, &[&str])] = &[
    ("sreday", &["sre", "devops"]),
    ("llmday", &["ai", "llm"]),
    ("devopsnotts", &["devops", "community"]),
];

const FAMILY_FALLBACK_TAG: &str = "conference";

/// Tags for a conf42 topic such as `golang` or `Kube Native`.
pub fn conf42_topic_tags(topic: &str) -> Vec<String> {
    let key: String = topic
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();
    CONF42_TOPIC_TAGS
        .iter()
        .find(|(keyword, _)| key.contains(keyword))
        .map(|(_, tags)| tags.iter().map(|t| t.to_string()).collect())
        .unwrap_or_else(|| vec![CONF42_FALLBACK_TAG.to_string()])
}

pub fn family_source_tags(prefix: &str) -> Vec<String> {
    FAMILY_SOURCE_TAGS
        .iter()
        .find(|(p, _)| p.eq_ignore_ascii_case(prefix))
        .map(|(_, tags)| tags.iter().map(|t| t.to_string()).collect())
        .unwrap_or_else(|| vec![FAMILY_FALLBACK_TAG.to_string()])
}
