//! Common constants used throughout jinjautils.

/// Context prefix attached to every log line emitted by a session.
pub const LOG_CONTEXT: &str = "CLS->JinjaUtils";

/// Log target used when forwarding to the `log` facade.
pub const LOG_TARGET: &str = "jinjautils";

/// Returned by the template directory getter when no directory is bound.
pub const NO_TEMPLATE_DIRECTORY: &str = "A template directory has not yet been configured.";

/// Returned by the loaded template getter when nothing is loaded.
pub const NO_TEMPLATE_LOADED: &str = "No template has been loaded!";

/// Returned by the rendered text getter when nothing has been rendered.
pub const NO_TEMPLATE_RENDERED: &str = "No template has been rendered!";

/// Suffix appended to backups of overwritten output files.
pub const BACKUP_SUFFIX: &str = "bak";

/// Name of the JSON filter registered on every environment.
pub const TO_JSON_FILTER: &str = "to_json";
