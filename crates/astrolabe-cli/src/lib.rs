//! CLI logic for the Astrolabe model query tool.
//!
//! Reads a JSON document of normalized sources and views, builds the model,
//! then either runs an ad-hoc selection or composes views, and writes the
//! result as JSON.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::{fs, io::Write};

use log::{info, warn};
use serde::Deserialize;
use serde_json::{Value, json};

use astrolabe::{
    AstrolabeError, Engine, ViewError,
    compose::ViewSet,
    criteria::{Criteria, RawCriteria},
    decl::Source,
    identifier::Id,
    model::Model,
    view::{RawView, View},
};

/// The input document: ordered sources and the views over them.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct Document {
    #[serde(default)]
    sources: Vec<Source>,
    #[serde(default)]
    views: Vec<RawView>,
}

/// Run the Astrolabe CLI application
///
/// # Errors
///
/// Returns `AstrolabeError` for:
/// - File I/O and configuration errors
/// - Malformed input documents or criteria
/// - Fatal model errors (duplicate ids, containment cycles)
/// - Duplicate view ids, or a `--view` that is unknown or invalid
pub fn run(args: &Args) -> Result<(), AstrolabeError> {
    info!(input_path = args.input; "Processing model");

    let app_config = config::load_config(args.config.as_ref())?;
    let engine = Engine::new(app_config);

    let text = fs::read_to_string(&args.input)?;
    let document: Document = parse_json(&text)?;

    let built = engine.build_model(&document.sources)?;
    for warning in &built.warnings {
        warn!(diagnostic = warning.to_diagnostic().to_string(); "Model warning");
    }
    let model_warnings: Vec<String> = built
        .warnings
        .iter()
        .map(|w| w.to_diagnostic().to_string())
        .collect();

    let output = match &args.select {
        Some(criteria) => {
            let criteria = parse_criteria(criteria)?;
            let selection = engine.select_expanded(&built.model, &criteria, &args.include);
            json!({ "warnings": model_warnings, "selection": selection })
        }
        None => {
            let loaded = load_views(document.views)?;
            let composed = compose_views(&engine, &built.model, &loaded, args.view.as_deref())?;
            json!({ "warnings": model_warnings, "views": composed })
        }
    };

    let rendered = serde_json::to_string_pretty(&output)
        .map_err(|e| AstrolabeError::Input(e.to_string()))?;

    match &args.output {
        Some(path) => {
            fs::write(path, rendered)?;
            info!(output_file = path; "Result written");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{rendered}")?;
        }
    }

    Ok(())
}

fn parse_json<'de, T: Deserialize<'de>>(text: &'de str) -> Result<T, AstrolabeError> {
    serde_json::from_str(text).map_err(|e| AstrolabeError::Input(e.to_string()))
}

/// Parses `--select` criteria, keeping criteria errors typed.
fn parse_criteria(text: &str) -> Result<Criteria, AstrolabeError> {
    let raw: RawCriteria = parse_json(text)?;
    Ok(Criteria::try_from(raw)?)
}

/// Views from the document: the valid ones, plus validation failures with
/// their declaration position.
struct LoadedViews {
    views: ViewSet,
    invalid: Vec<(usize, ViewError)>,
    declared: usize,
}

fn load_views(raw: Vec<RawView>) -> Result<LoadedViews, AstrolabeError> {
    let declared = raw.len();
    let mut valid = Vec::with_capacity(declared);
    let mut invalid = Vec::new();

    for (position, raw_view) in raw.into_iter().enumerate() {
        match View::try_from(raw_view) {
            Ok(view) => valid.push(view),
            Err(err) => invalid.push((position, err)),
        }
    }

    Ok(LoadedViews {
        views: ViewSet::new(valid)?,
        invalid,
        declared,
    })
}

/// Composes one view, or all of them with failures reported inline in
/// declaration order.
fn compose_views(
    engine: &Engine,
    model: &Model,
    loaded: &LoadedViews,
    only: Option<&str>,
) -> Result<Vec<Value>, AstrolabeError> {
    if let Some(id) = only {
        let id = Id::new(id);
        if let Some((_, err)) = loaded.invalid.iter().find(|(_, err)| err.view() == id) {
            return Err(err.clone().into());
        }
        let content = engine.compose(model, &loaded.views, id)?;
        return Ok(vec![to_value(&content)?]);
    }

    let mut composed = engine.compose_all(model, &loaded.views).into_iter();
    let mut invalid = loaded.invalid.iter().peekable();
    let mut entries = Vec::with_capacity(loaded.declared);

    for position in 0..loaded.declared {
        let outcome = match invalid.next_if(|(at, _)| *at == position) {
            Some((_, err)) => Err(err.clone()),
            None => match composed.next() {
                Some(outcome) => outcome,
                None => break,
            },
        };
        entries.push(match outcome {
            Ok(content) => to_value(&content)?,
            Err(err) => error_entry(&err),
        });
    }

    Ok(entries)
}

fn error_entry(err: &ViewError) -> Value {
    let diagnostic = err.to_diagnostic();
    warn!(view = err.view().to_string(), diagnostic = diagnostic.to_string(); "View failed");
    json!({ "view": err.view(), "error": diagnostic.to_string() })
}

fn to_value<T: serde::Serialize>(value: &T) -> Result<Value, AstrolabeError> {
    serde_json::to_value(value).map_err(|e| AstrolabeError::Input(e.to_string()))
}
