use chrono::{NaiveDate, NaiveTime};
use jirai_layout::config::{Config, parse_config};
use jirai_layout::ingest::ingest_ai_response_with;
use jirai_layout::layout::{NoJitter, RandomJitter};
use jirai_layout::{GraphDocument, LayoutPreference, Layouter, ViewMode};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JiraiLayoutOptions {
    view_mode: Option<ViewMode>,
    layout_preference: Option<LayoutPreference>,
    /// `YYYY-MM-DD`, treated as UTC midnight.
    today: Option<String>,
    seed: Option<u64>,
    no_jitter: Option<bool>,
    config: Option<serde_json::Value>,
}

fn parse_options(options_json: Option<&str>) -> Result<JiraiLayoutOptions, String> {
    match options_json {
        Some(raw) if !raw.trim().is_empty() => {
            serde_json::from_str(raw).map_err(|error| error.to_string())
        }
        _ => Ok(JiraiLayoutOptions::default()),
    }
}

fn build_layouter(options: &JiraiLayoutOptions) -> Result<(Layouter, Config), String> {
    let config = match &options.config {
        Some(value) => parse_config(&value.to_string()).map_err(|error| error.to_string())?,
        None => Config::default(),
    };
    let mut layouter = Layouter::new(config.layout.clone());
    if let Some(today) = &options.today {
        let date = NaiveDate::parse_from_str(today, "%Y-%m-%d")
            .map_err(|error| format!("invalid today {today:?}: {error}"))?;
        layouter = layouter.with_now(date.and_time(NaiveTime::MIN));
    }
    if options.no_jitter.unwrap_or(false) {
        layouter = layouter.with_jitter(NoJitter);
    } else if let Some(seed) = options.seed {
        layouter = layouter.with_jitter(RandomJitter::seeded(seed));
    }
    Ok((layouter, config))
}

fn reapply_layout_json(document_json: &str, options_json: Option<&str>) -> Result<String, String> {
    let options = parse_options(options_json)?;
    let mut document = GraphDocument::from_json(document_json).map_err(|error| error.to_string())?;
    let (mut layouter, _) = build_layouter(&options)?;

    let mode = options.view_mode.unwrap_or(document.view_mode());
    let preference = options
        .layout_preference
        .unwrap_or(document.layout_preference());
    document.nodes = layouter.reapply(&document.nodes, &document.edges, mode, preference);
    document.view_mode = Some(mode);
    document.layout_preference = Some(preference);
    serde_json::to_string(&document).map_err(|error| error.to_string())
}

fn ingest_ai_response_json(text: &str, options_json: Option<&str>) -> Result<String, String> {
    let options = parse_options(options_json)?;
    let (mut layouter, config) = build_layouter(&options)?;
    let mode = options.view_mode.unwrap_or_default();
    let generated = ingest_ai_response_with(text, mode, &mut layouter, &config.ingest)
        .map_err(|error| error.to_string())?;
    serde_json::to_string(&generated).map_err(|error| error.to_string())
}

/// Lays out a serialized graph document and returns it with new positions.
#[wasm_bindgen]
pub fn reapply_layout(document_json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    reapply_layout_json(document_json, options_json.as_deref())
        .map_err(|error| JsValue::from_str(&error))
}

/// Converts a raw model response into laid-out `{nodes, edges}` JSON.
#[wasm_bindgen]
pub fn ingest_ai_response(text: &str, options_json: Option<String>) -> Result<String, JsValue> {
    ingest_ai_response_json(text, options_json.as_deref()).map_err(|error| JsValue::from_str(&error))
}

#[cfg(test)]
mod tests {
    use crate::{ingest_ai_response_json, reapply_layout_json};
    use jirai_layout::GraphDocument;

    #[test]
    fn lays_out_a_management_board() {
        let document = r#"{
            "nodes": [
                {"id": "kickoff", "type": "project", "workflow": {"start": "2026-10-19"}},
                {"id": "review", "type": "task"}
            ],
            "edges": [{"from": "kickoff", "to": "review"}],
            "viewMode": "management"
        }"#;
        let out = reapply_layout_json(document, Some(r#"{"today":"2026-10-16"}"#))
            .expect("management board should lay out");
        let doc = GraphDocument::from_json(&out).unwrap();
        assert_eq!(doc.nodes[0].id, "kickoff");
        assert_eq!(doc.nodes[0].position.x, 1040.0);
        assert_eq!(doc.nodes[1].visual.width, Some(280.0));
    }

    #[test]
    fn options_override_the_document_view() {
        let document = r#"{"nodes":[{"id":"a"},{"id":"b"}],"edges":[{"from":"a","to":"b"}]}"#;
        let out = reapply_layout_json(
            document,
            Some(r#"{"layoutPreference":"VERTICAL","config":{"layered":{"backend":"ranked"}}}"#),
        )
        .unwrap();
        let doc = GraphDocument::from_json(&out).unwrap();
        assert!(doc.nodes[1].position.y > doc.nodes[0].position.y);
        assert_eq!(doc.layout_preference(), jirai_layout::LayoutPreference::Vertical);
    }

    #[test]
    fn reports_bad_input() {
        assert!(reapply_layout_json("{", None).is_err());
        assert!(reapply_layout_json("{}", Some(r#"{"today":"soon"}"#)).is_err());
        assert!(ingest_ai_response_json("", None).is_err());
    }

    #[test]
    fn ingests_model_output() {
        let out = ingest_ai_response_json(
            "```json\n{\"nodes\":[{\"type\":\"task\",\"title\":\"Draft\"}]}\n```",
            Some(r#"{"viewMode":"workflow","today":"2026-10-16","noJitter":true}"#),
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["nodes"][0]["workflow"]["start"], "2026-10-16T00:00:00.000Z");
        assert_eq!(value["nodes"][0]["position"]["x"], 10.0);
    }
}
