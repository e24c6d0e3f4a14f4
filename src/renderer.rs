//! Template environment and rendering functionality for jinjautils.
//! Builds MiniJinja environments scoped to a directory and hands out renderable
//! template handles.
use crate::config::SessionConfig;
use crate::constants::TO_JSON_FILTER;
use crate::error::{Error, Result};
use minijinja::{AutoEscape, Environment, ErrorKind, Template, UndefinedBehavior, Value};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// MiniJinja environment that loads templates from one directory.
#[derive(Clone)]
pub struct MiniJinjaRenderer {
    /// Shared so loaded templates outlive a rebind of the session.
    env: Arc<Environment<'static>>,
    root: PathBuf,
}

impl MiniJinjaRenderer {
    /// Creates an environment that resolves template names against `root`.
    ///
    /// # Arguments
    /// * `root` - Directory templates are loaded from
    /// * `config` - Whitespace options applied to the environment
    pub fn new<P: AsRef<Path>>(root: P, config: &SessionConfig) -> Self {
        let root = root.as_ref().to_path_buf();
        let mut env = Environment::new();
        env.set_loader(minijinja::path_loader(&root));
        env.set_trim_blocks(config.trim_blocks);
        env.set_lstrip_blocks(config.lstrip_blocks);
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        // Not a Jinja2 global; it would shadow a missing `debug` variable.
        env.remove_global("debug");
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.add_filter(TO_JSON_FILTER, to_json);

        Self { env: Arc::new(env), root }
    }

    /// Directory this environment loads templates from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Compiles the named template and returns a handle to it.
    ///
    /// # Errors
    /// * `Error::TemplateNotFoundError` if no such template exists below the root
    /// * `Error::MinijinjaError` if the template fails to compile
    pub fn get_template(&self, name: &str) -> Result<LoadedTemplate> {
        match self.env.get_template(name) {
            Ok(_) => Ok(LoadedTemplate {
                env: Arc::clone(&self.env),
                name: name.to_string(),
                source_path: Some(self.root.join(name)),
            }),
            Err(e) if e.kind() == ErrorKind::TemplateNotFound => {
                Err(Error::TemplateNotFoundError { name: name.to_string() })
            }
            Err(e) => Err(Error::MinijinjaError(e)),
        }
    }
}

impl fmt::Debug for MiniJinjaRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MiniJinjaRenderer").field("root", &self.root).finish()
    }
}

/// A compiled template ready to be rendered.
#[derive(Clone)]
pub struct LoadedTemplate {
    env: Arc<Environment<'static>>,
    name: String,
    source_path: Option<PathBuf>,
}

impl LoadedTemplate {
    /// Display name of the template.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// File the template was read from.
    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    /// Renders the template with the given context.
    ///
    /// # Errors
    /// * `Error::UndefinedVariableError` if the template uses variables missing
    ///   from `context`
    /// * `Error::MinijinjaError` for any other rendering failure
    pub fn render<S: Serialize>(&self, context: S) -> Result<String> {
        let tmpl = self.env.get_template(&self.name)?;
        let context = Value::from_serialize(context);
        tmpl.render(&context).map_err(|err| {
            let names = self.missing_variables(&tmpl, &context);
            match err.kind() {
                ErrorKind::UndefinedError | ErrorKind::InvalidOperation if !names.is_empty() => {
                    Error::UndefinedVariableError { names, source: err }
                }
                _ => Error::MinijinjaError(err),
            }
        })
    }

    /// Top-level variables the template reads that are neither in `context` nor globals.
    fn missing_variables(&self, tmpl: &Template<'_, '_>, context: &Value) -> Vec<String> {
        let mut names: Vec<String> = tmpl
            .undeclared_variables(false)
            .into_iter()
            .filter(|name| !self.env.globals().any(|(global, _)| global == name.as_str()))
            .filter(|name| context.get_attr(name).map_or(true, |v| v.is_undefined()))
            .collect();
        names.sort();
        names
    }
}

impl fmt::Debug for LoadedTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedTemplate")
            .field("name", &self.name)
            .field("source_path", &self.source_path)
            .finish()
    }
}

impl fmt::Display for LoadedTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Serializes any value to its JSON text.
fn to_json(value: Value) -> std::result::Result<String, minijinja::Error> {
    serde_json::to_string(&value).map_err(|e| {
        minijinja::Error::new(ErrorKind::InvalidOperation, "cannot serialize value to JSON")
            .with_source(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn renderer_with(
        name: &str,
        source: &str,
        config: &SessionConfig,
    ) -> (TempDir, MiniJinjaRenderer) {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(name), source).unwrap();
        let renderer = MiniJinjaRenderer::new(dir.path(), config);
        (dir, renderer)
    }

    #[test]
    fn test_to_json_filter() {
        let (_dir, renderer) =
            renderer_with("j.j2", "{{ data|to_json }}", &SessionConfig::default());
        let tmpl = renderer.get_template("j.j2").unwrap();
        let out = tmpl
            .render(serde_json::json!({"data": {"key": "value", "n": [1, 2]}}))
            .unwrap();
        assert_eq!(out, r#"{"key":"value","n":[1,2]}"#);
    }

    #[test]
    fn test_no_auto_escape_for_html_names() {
        let (_dir, renderer) =
            renderer_with("page.html", "{{ markup }}", &SessionConfig::default());
        let tmpl = renderer.get_template("page.html").unwrap();
        let out = tmpl.render(serde_json::json!({"markup": "<b>&</b>"})).unwrap();
        assert_eq!(out, "<b>&</b>");
    }

    #[test]
    fn test_trim_blocks_toggle() {
        let source = "{% if flag %}\nyes\n{% endif %}\n";
        let context = serde_json::json!({"flag": true});

        let (_dir, trimmed) = renderer_with("t.j2", source, &SessionConfig::default());
        assert_eq!(trimmed.get_template("t.j2").unwrap().render(&context).unwrap(), "yes\n");

        let config = SessionConfig { trim_blocks: false, ..SessionConfig::default() };
        let (_dir, untrimmed) = renderer_with("t.j2", source, &config);
        assert_eq!(
            untrimmed.get_template("t.j2").unwrap().render(&context).unwrap(),
            "\nyes\n"
        );
    }

    #[test]
    fn test_missing_template_is_not_found() {
        let dir = TempDir::new().unwrap();
        let renderer = MiniJinjaRenderer::new(dir.path(), &SessionConfig::default());
        match renderer.get_template("missing.j2") {
            Err(Error::TemplateNotFoundError { name }) => assert_eq!(name, "missing.j2"),
            other => panic!("Expected TemplateNotFoundError, got {other:?}"),
        }
    }

    #[test]
    fn test_strict_undefined() {
        let (_dir, renderer) =
            renderer_with("u.j2", "{{ nope }}", &SessionConfig::default());
        let tmpl = renderer.get_template("u.j2").unwrap();
        let err = tmpl.render(minijinja::context! {}).unwrap_err();
        assert!(err.is_undefined_reference());
    }

    #[test]
    fn test_debug_is_not_a_global() {
        let (_dir, renderer) =
            renderer_with("d.j2", "a = {{ name }}\nb = {{ debug }}", &SessionConfig::default());
        let tmpl = renderer.get_template("d.j2").unwrap();

        let err = tmpl.render(serde_json::json!({"name": "only"})).unwrap_err();
        assert!(err.is_undefined_reference());
        match err {
            Error::UndefinedVariableError { names, .. } => assert_eq!(names, vec!["debug"]),
            other => panic!("Expected UndefinedVariableError, got {other:?}"),
        }

        let out = tmpl.render(serde_json::json!({"name": "n", "debug": 1})).unwrap();
        assert_eq!(out, "a = n\nb = 1");
    }

    #[test]
    fn test_undefined_value_in_filter_and_loop() {
        let (_dir, renderer) = renderer_with(
            "l.j2",
            "{% for k, v in ctx|items %}{{ k }}={{ v }}{% endfor %}",
            &SessionConfig::default(),
        );
        let tmpl = renderer.get_template("l.j2").unwrap();

        let err = tmpl.render(minijinja::context! {}).unwrap_err();
        assert!(err.is_undefined_reference());
        match err {
            Error::UndefinedVariableError { names, .. } => assert_eq!(names, vec!["ctx"]),
            other => panic!("Expected UndefinedVariableError, got {other:?}"),
        }

        let out = tmpl.render(serde_json::json!({"ctx": {"a": 1}})).unwrap();
        assert_eq!(out, "a=1");
    }

    #[test]
    fn test_jinja_globals_are_not_reported_missing() {
        let (_dir, renderer) = renderer_with(
            "g.j2",
            "{% for i in range(2) %}{{ i }}{% endfor %}{{ pairs|items }}",
            &SessionConfig::default(),
        );
        let tmpl = renderer.get_template("g.j2").unwrap();
        match tmpl.render(minijinja::context! {}).unwrap_err() {
            Error::UndefinedVariableError { names, .. } => assert_eq!(names, vec!["pairs"]),
            other => panic!("Expected UndefinedVariableError, got {other:?}"),
        }
    }
}
