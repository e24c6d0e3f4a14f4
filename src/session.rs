//! The template session: binds a template directory, loads a template by name or
//! path, renders it and writes the result to disk.
//!
//! A session is owned by a single caller and used sequentially; it performs no
//! internal locking. Each operation returns a typed [`Result`] and reports failures
//! once to the session's log sink, so the session stays usable after any error.
//!
//! ```no_run
//! use jinjautils::{OutputRequest, TemplateSession};
//!
//! let mut session = TemplateSession::new(true);
//! session.bind_directory("templates")?;
//! session.load("app.conf.j2")?;
//! session.render(serde_json::json!({ "name": "demo" }))?;
//! session.write(&OutputRequest::new("out", "app.conf"))?;
//! # Ok::<(), jinjautils::error::Error>(())
//! ```

use crate::config::SessionConfig;
use crate::constants::{NO_TEMPLATE_DIRECTORY, NO_TEMPLATE_LOADED, NO_TEMPLATE_RENDERED};
use crate::error::{Error, Result};
use crate::loader::{
    discover_templates, load_template_file, validate_template_dir, TemplateSource,
};
use crate::logger::{format_message, ConsoleSink, LogSink};
use crate::renderer::{LoadedTemplate, MiniJinjaRenderer};
use crate::writer::{
    backup_file, output_file_name, validate_output_dir, write_file, OutputRequest,
};
use log::Level;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// State for one load, render and write workflow.
pub struct TemplateSession {
    config: SessionConfig,
    /// Falls back to a [`ConsoleSink`] when unset.
    sink: Option<Box<dyn LogSink>>,
    template_directory: Option<PathBuf>,
    available_templates: Vec<String>,
    renderer: Option<MiniJinjaRenderer>,
    loaded_template: Option<LoadedTemplate>,
    rendered_text: Option<String>,
    output_directory: Option<PathBuf>,
    output_file: Option<String>,
}

impl TemplateSession {
    /// Creates a session that logs to the console.
    pub fn new(verbose: bool) -> Self {
        Self::with_config(SessionConfig { verbose, ..SessionConfig::default() }, None)
    }

    /// Creates a session that reports every event to `sink`.
    pub fn with_sink<L: LogSink + 'static>(verbose: bool, sink: L) -> Self {
        Self::with_config(
            SessionConfig { verbose, ..SessionConfig::default() },
            Some(Box::new(sink)),
        )
    }

    /// Creates a session from explicit options. Without a sink it logs to the console.
    pub fn with_config(config: SessionConfig, sink: Option<Box<dyn LogSink>>) -> Self {
        Self {
            config,
            sink,
            template_directory: None,
            available_templates: Vec::new(),
            renderer: None,
            loaded_template: None,
            rendered_text: None,
            output_directory: None,
            output_file: None,
        }
    }

    /// Current session options.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Whether the console sink writes debug, info and warning lines.
    pub fn verbose(&self) -> bool {
        self.config.verbose
    }

    /// Turns console output of non-error lines on or off.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.config.verbose = verbose;
        self.log(Level::Debug, "verbose", &format!("Verbose set to: {verbose}"));
    }

    /// Whether the first newline after a block tag is removed.
    pub fn trim_blocks(&self) -> bool {
        self.config.trim_blocks
    }

    /// Takes effect the next time an environment is built.
    pub fn set_trim_blocks(&mut self, trim_blocks: bool) {
        self.log(
            Level::Info,
            "trim_blocks",
            &format!("Call to set trim_blocks setting: {trim_blocks}"),
        );
        self.config.trim_blocks = trim_blocks;
        self.log(
            Level::Debug,
            "trim_blocks",
            &format!("Successfully updated trim_blocks: {trim_blocks}"),
        );
    }

    /// Whether whitespace before a block tag is stripped.
    pub fn lstrip_blocks(&self) -> bool {
        self.config.lstrip_blocks
    }

    /// Takes effect the next time an environment is built.
    pub fn set_lstrip_blocks(&mut self, lstrip_blocks: bool) {
        self.log(
            Level::Info,
            "lstrip_blocks",
            &format!("Call to set lstrip_blocks setting: {lstrip_blocks}"),
        );
        self.config.lstrip_blocks = lstrip_blocks;
        self.log(
            Level::Debug,
            "lstrip_blocks",
            &format!("Successfully updated lstrip_blocks: {lstrip_blocks}"),
        );
    }

    /// Binds `path` as the template directory.
    ///
    /// Lists the regular files directly inside it and builds a fresh environment
    /// from the current whitespace options. Any previous directory state is
    /// discarded first, so a failed bind leaves the session without a directory.
    ///
    /// # Returns
    /// * `Result<&[String]>` - Names of the templates found, possibly empty
    ///
    /// # Errors
    /// * `Error::TemplateDirectoryError` if the path is empty or does not exist
    /// * `Error::NotADirectoryError` if the path is not a directory
    pub fn bind_directory<P: AsRef<Path>>(&mut self, path: P) -> Result<&[String]> {
        let path = path.as_ref();
        self.log(
            Level::Info,
            "template_directory",
            &format!("Call to set template_directory to path: {}", path.display()),
        );

        self.template_directory = None;
        self.available_templates.clear();
        self.renderer = None;

        let outcome = self.scan_directory(path);
        let (directory, templates, renderer) = self.report("template_directory", outcome)?;

        self.template_directory = Some(directory);
        self.available_templates = templates;
        self.renderer = Some(renderer);
        Ok(&self.available_templates)
    }

    fn scan_directory(
        &self,
        path: &Path,
    ) -> Result<(PathBuf, Vec<String>, MiniJinjaRenderer)> {
        let directory = validate_template_dir(path)?;
        self.log(
            Level::Debug,
            "template_directory",
            &format!("Template directory path set to: {}", directory.display()),
        );

        let templates = discover_templates(&directory)?;
        self.log(
            Level::Debug,
            "template_directory",
            &format!("Available templates set to: {templates:?}"),
        );

        let renderer = MiniJinjaRenderer::new(&directory, &self.config);
        self.log(
            Level::Debug,
            "template_directory",
            "Jinja loaded the provided template_directory successfully!",
        );
        self.log(
            Level::Debug,
            "template_directory",
            "Added to_json filter to Jinja Environment object.",
        );

        Ok((directory, templates, renderer))
    }

    /// The bound template directory.
    pub fn template_directory(&self) -> Option<&Path> {
        self.template_directory.as_deref()
    }

    /// The bound directory, or a message saying none is configured.
    pub fn template_directory_display(&self) -> String {
        match &self.template_directory {
            Some(dir) => dir.display().to_string(),
            None => NO_TEMPLATE_DIRECTORY.to_string(),
        }
    }

    /// Template files found when the directory was bound. Not a live view.
    pub fn available_templates(&self) -> &[String] {
        &self.available_templates
    }

    /// Loads a template by name from the bound directory, or from a file path.
    ///
    /// An identifier naming an existing file is loaded in a one-off environment
    /// rooted at the file's directory, regardless of any bound directory. The
    /// previously loaded template is cleared before resolution starts.
    ///
    /// # Errors
    /// * `Error::TemplateNotFoundError` if the name is unknown or no directory is bound
    /// * `Error::MinijinjaError` if the template fails to compile
    pub fn load(&mut self, template: &str) -> Result<&LoadedTemplate> {
        self.log(Level::Info, "load", &format!("Call to load template: {template}"));
        self.loaded_template = None;

        let outcome = self.resolve(template);
        let loaded = self.report("load", outcome)?;
        self.log(Level::Debug, "load", &format!("Loaded template name set to: {}", loaded.name()));

        Ok(&*self.loaded_template.insert(loaded))
    }

    fn resolve(&self, template: &str) -> Result<LoadedTemplate> {
        if template.is_empty() {
            return Err(Error::TemplateNotFoundError { name: String::new() });
        }

        match TemplateSource::from_string(template) {
            TemplateSource::FileSystem(path) => {
                let loaded = load_template_file(&path, &self.config)?;
                self.log(
                    Level::Info,
                    "load",
                    &format!("Loaded template file from path: {}", path.display()),
                );
                Ok(loaded)
            }
            TemplateSource::Name(name) => {
                let renderer = self
                    .renderer
                    .as_ref()
                    .ok_or_else(|| Error::TemplateNotFoundError { name: name.clone() })?;
                let loaded = renderer.get_template(&name)?;
                self.log(
                    Level::Info,
                    "load",
                    &format!("Loaded template file from template_directory: {name}"),
                );
                Ok(loaded)
            }
        }
    }

    /// The loaded template handle.
    pub fn loaded_template(&self) -> Option<&LoadedTemplate> {
        self.loaded_template.as_ref()
    }

    /// Name of the loaded template, or a message saying none is loaded.
    pub fn loaded(&self) -> &str {
        self.loaded_template.as_ref().map_or(NO_TEMPLATE_LOADED, LoadedTemplate::name)
    }

    /// Renders the loaded template with `context` and keeps the result.
    ///
    /// On failure the previous rendered text is left in place.
    ///
    /// # Errors
    /// * `Error::NoTemplateLoadedError` if nothing is loaded
    /// * `Error::UndefinedVariableError` if the template reads variables not in `context`
    /// * `Error::MinijinjaError` for any other rendering failure
    pub fn render<S: Serialize>(&mut self, context: S) -> Result<&str> {
        self.log(
            Level::Info,
            "render",
            &format!("Call to render loaded template: {}", self.loaded()),
        );

        let outcome = match &self.loaded_template {
            Some(template) => template.render(context),
            None => Err(Error::NoTemplateLoadedError),
        };
        let text = self.report("render", outcome)?;
        self.log(Level::Info, "render", &format!("{} rendered successfully!", self.loaded()));

        Ok(self.rendered_text.insert(text).as_str())
    }

    /// Text produced by the last successful render.
    pub fn rendered_text(&self) -> Option<&str> {
        self.rendered_text.as_deref()
    }

    /// The rendered text, or a message saying nothing has been rendered.
    pub fn rendered(&self) -> &str {
        self.rendered_text.as_deref().unwrap_or(NO_TEMPLATE_RENDERED)
    }

    /// Writes the rendered text to `<directory>/<base file name>`.
    ///
    /// The output fields are reset first and set as each part of the request is
    /// validated. An existing file is copied to a `.bak` sibling before it is
    /// overwritten unless `request.backup` is false.
    ///
    /// # Returns
    /// * `Result<PathBuf>` - Path of the written file
    ///
    /// # Errors
    /// * `Error::MissingOutputError` if the directory or file name is absent
    /// * `Error::OutputDirectoryError` if the directory does not exist
    /// * `Error::OutputFileNameError` if the file name has no base name
    /// * `Error::NotRenderedError` if nothing has been rendered
    /// * `Error::BackupError` / `Error::IoError` on filesystem failures
    pub fn write(&mut self, request: &OutputRequest) -> Result<PathBuf> {
        self.output_directory = None;
        self.output_file = None;
        self.log(Level::Info, "write", "Call to write rendered template");

        let outcome = self.write_output(request);
        self.report("write", outcome)
    }

    fn write_output(&mut self, request: &OutputRequest) -> Result<PathBuf> {
        let (Some(directory), Some(file_name)) = (&request.directory, &request.file_name) else {
            return Err(Error::MissingOutputError);
        };

        let directory = validate_output_dir(directory)?;
        self.output_directory = Some(directory.clone());

        let file_name = output_file_name(file_name)?;
        self.output_file = Some(file_name.clone());
        self.log(Level::Debug, "write", &format!("Output file has been set to: {file_name}!"));

        let text = self.rendered_text.as_deref().ok_or(Error::NotRenderedError)?;
        let target = directory.join(&file_name);
        self.log(
            Level::Debug,
            "write",
            &format!("Writing rendered template to output file: {}", target.display()),
        );

        if target.exists() {
            if request.backup {
                let backup = backup_file(&target)?;
                self.log(
                    Level::Info,
                    "write",
                    &format!("{file_name} backed up to: {}", backup.display()),
                );
            } else {
                self.log(
                    Level::Warn,
                    "write",
                    &format!("File backup is disabled, overwriting: {file_name}!"),
                );
            }
        }

        write_file(text, &target)?;
        self.log(Level::Info, "write", &format!("{} written successfully!", target.display()));

        Ok(target)
    }

    /// Last validated output directory.
    pub fn output_directory(&self) -> Option<&Path> {
        self.output_directory.as_deref()
    }

    /// Last validated output file base name.
    pub fn output_file(&self) -> Option<&str> {
        self.output_file.as_deref()
    }

    /// Logs a failed outcome at the error's level and passes it through.
    fn report<T>(&self, operation: &str, outcome: Result<T>) -> Result<T> {
        if let Err(err) = &outcome {
            self.log(err.level(), operation, &err.to_string());
        }
        outcome
    }

    fn log(&self, level: Level, operation: &str, message: &str) {
        let message = format_message(operation, message);
        let console;
        let sink: &dyn LogSink = match &self.sink {
            Some(sink) => sink.as_ref(),
            None => {
                console = ConsoleSink::new(self.config.verbose);
                &console
            }
        };
        match level {
            Level::Error => sink.error(&message),
            Level::Warn => sink.warning(&message),
            Level::Info => sink.info(&message),
            Level::Debug | Level::Trace => sink.debug(&message),
        }
    }
}

impl Default for TemplateSession {
    fn default() -> Self {
        TemplateSession::new(false)
    }
}

impl fmt::Debug for TemplateSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateSession")
            .field("config", &self.config)
            .field("template_directory", &self.template_directory)
            .field("available_templates", &self.available_templates)
            .field("loaded_template", &self.loaded_template)
            .field("rendered", &self.rendered_text.is_some())
            .field("output_directory", &self.output_directory)
            .field("output_file", &self.output_file)
            .finish()
    }
}
