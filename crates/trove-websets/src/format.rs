//! Entity-aware item formatting.
//!
//! Raw item `properties` are an untyped JSON document whose shape depends on
//! the entity type. The formatter shapes known types into flat records the
//! agent can consume directly and falls back to a generic record carrying the
//! full `properties` for anything else, so no item is ever dropped.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use trove_provider::{ItemEvaluation, WebsetItem};

/// A shaped item record. Serializes untagged: each variant carries its own
/// field set, and the generic variant carries an explicit `type` field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FormattedItem {
    Company {
        id: String,
        name: String,
        industry: String,
        location: String,
        logo_url: String,
        description: String,
        url: String,
        evaluations: Vec<ItemEvaluation>,
        enrichments: BTreeMap<String, Value>,
    },
    Person {
        id: String,
        name: String,
        position: String,
        company_name: String,
        location: String,
        picture_url: String,
        description: String,
        url: String,
        evaluations: Vec<ItemEvaluation>,
        enrichments: BTreeMap<String, Value>,
    },
    ResearchPaper {
        id: String,
        title: String,
        authors: Vec<Value>,
        publication: String,
        year: Option<Value>,
        citations: u64,
        r#abstract: String,
        url: String,
        evaluations: Vec<ItemEvaluation>,
        enrichments: BTreeMap<String, Value>,
    },
    Article {
        id: String,
        title: String,
        publisher: String,
        date: String,
        summary: String,
        url: String,
        evaluations: Vec<ItemEvaluation>,
        enrichments: BTreeMap<String, Value>,
    },
    Other {
        id: String,
        r#type: String,
        description: String,
        url: String,
        properties: Value,
        evaluations: Vec<ItemEvaluation>,
        enrichments: BTreeMap<String, Value>,
    },
}

fn str_field(obj: &Value, key: &str) -> String {
    obj.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Enrichment results keyed by enrichment id. Only completed enrichments are
/// included; the first result element is the canonical value.
fn enrichment_map(item: &WebsetItem) -> BTreeMap<String, Value> {
    item.enrichments
        .iter()
        .filter(|e| e.status_str().as_deref() == Some("completed"))
        .map(|e| {
            (
                e.enrichment_id.clone(),
                e.result.first().cloned().unwrap_or(Value::Null),
            )
        })
        .collect()
}

/// Shape an item according to its entity type.
///
/// Total over all inputs: unknown types, missing sub-objects, and malformed
/// `properties` all land in [`FormattedItem::Other`] or produce empty fields
/// rather than failing.
#[must_use]
pub fn format_item(item: &WebsetItem) -> FormattedItem {
    let props = &item.properties;
    let entity_type = props
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_lowercase();
    let evaluations = item.evaluations.clone();
    let enrichments = enrichment_map(item);
    let description = str_field(props, "description");
    let url = str_field(props, "url");

    match entity_type.as_str() {
        "company" => {
            let company = props.get("company").cloned().unwrap_or(Value::Null);
            FormattedItem::Company {
                id: item.id.clone(),
                name: str_field(&company, "name"),
                industry: str_field(&company, "industry"),
                location: str_field(&company, "location"),
                logo_url: str_field(&company, "logoUrl"),
                description,
                url,
                evaluations,
                enrichments,
            }
        }
        "person" => {
            let person = props.get("person").cloned().unwrap_or(Value::Null);
            let company_name = person
                .get("company")
                .map(|c| str_field(c, "name"))
                .unwrap_or_default();
            FormattedItem::Person {
                id: item.id.clone(),
                name: str_field(&person, "name"),
                position: str_field(&person, "position"),
                company_name,
                location: str_field(&person, "location"),
                picture_url: str_field(&person, "pictureUrl"),
                description,
                url,
                evaluations,
                enrichments,
            }
        }
        "research_paper" | "researchpaper" => {
            let paper = props.get("researchPaper").cloned().unwrap_or(Value::Null);
            FormattedItem::ResearchPaper {
                id: item.id.clone(),
                title: str_field(&paper, "title"),
                authors: paper
                    .get("authors")
                    .and_then(Value::as_array)
                    .cloned()
                    .unwrap_or_default(),
                publication: str_field(&paper, "publication"),
                year: paper.get("year").filter(|v| !v.is_null()).cloned(),
                citations: paper.get("citations").and_then(Value::as_u64).unwrap_or(0),
                r#abstract: str_field(&paper, "abstract"),
                url,
                evaluations,
                enrichments,
            }
        }
        "article" => {
            let article = props.get("article").cloned().unwrap_or(Value::Null);
            FormattedItem::Article {
                id: item.id.clone(),
                title: str_field(&article, "title"),
                publisher: str_field(&article, "publisher"),
                date: str_field(&article, "date"),
                summary: str_field(&article, "summary"),
                url,
                evaluations,
                enrichments,
            }
        }
        _ => FormattedItem::Other {
            id: item.id.clone(),
            r#type: entity_type,
            description,
            url,
            properties: props.clone(),
            evaluations,
            enrichments,
        },
    }
}
